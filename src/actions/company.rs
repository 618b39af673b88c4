//! Company pages: follow, open jobs, employees

use serde_json::{json, Value};
use tracing::info;

use super::{isolate, list_field, ActionResult, Actions};
use crate::error::Result;
use crate::scraping::urls::{company_url, BASE};

const TOGGLE_FOLLOW: &str = r#"() => {
    for (const btn of document.querySelectorAll('button')) {
        const label = (btn.getAttribute('aria-label') || '').toLowerCase();
        const text = btn.innerText.trim().toLowerCase();
        if (text === 'following' || label.includes('unfollow')) {
            btn.click();
            return { clicked: true, wasFollowing: true };
        }
        if (text === 'follow' || label.includes('follow')) {
            btn.click();
            return { clicked: true, wasFollowing: false };
        }
    }
    return { clicked: false };
}"#;

const TOTAL_JOBS: &str = r#"() => {
    const header = document.querySelector('h2');
    if (header) {
        const match = header.innerText.match(/(\d[\d,]*) job/i);
        if (match) return parseInt(match[1].replace(/,/g, ''));
    }
    return 0;
}"#;

const COMPANY_JOBS: &str = r#"(maxCount) => {
    const items = [];
    for (const card of document.querySelectorAll('li')) {
        if (items.length >= maxCount) break;
        const titleEl = card.querySelector('a[href*="/jobs/"]');
        if (!titleEl) continue;
        const title = titleEl.innerText.trim();
        if (!title || title.length < 3) continue;

        const jobUrl = titleEl.href;
        const idMatch = jobUrl.match(/jobs\/view\/(\d+)/) || jobUrl.match(/jobs\/.*?\/(\d+)/);
        let location = '';
        let postedTime = '';
        for (const span of card.querySelectorAll('span')) {
            const text = span.innerText.trim();
            if (text.includes(',') && !location) {
                location = text;
            } else if (/ago|posted|hour|day|week|month/i.test(text) && !postedTime) {
                postedTime = text;
            }
        }
        items.push({
            job_id: idMatch ? idMatch[1] : null,
            title,
            location,
            posted_time: postedTime,
            job_url: jobUrl,
            easy_apply: card.innerText.toLowerCase().includes('easy apply'),
        });
    }
    return items;
}"#;

const TOTAL_EMPLOYEES: &str = r#"() => {
    for (const span of document.querySelectorAll('span')) {
        const match = span.innerText.match(/(\d[\d,]*) associated members/i);
        if (match) return parseInt(match[1].replace(/,/g, ''));
    }
    return 0;
}"#;

/// Type into the people-page filter whose placeholder mentions `hint`,
/// falling back to opening the matching filter panel
const APPLY_PEOPLE_FILTER: &str = r#"({ hint, panel, value }) => {
    const input = document.querySelector(`input[placeholder*="${hint}"], input[aria-label*="${hint}"]`);
    if (input) {
        input.value = value;
        input.dispatchEvent(new Event('input', { bubbles: true }));
        return true;
    }
    for (const btn of document.querySelectorAll('button')) {
        if (btn.innerText.toLowerCase().includes(panel)) {
            btn.click();
            return true;
        }
    }
    return false;
}"#;

const COMPANY_EMPLOYEES: &str = r#"(maxCount) => {
    const items = [];
    const seen = new Set();
    for (const card of document.querySelectorAll('li')) {
        if (items.length >= maxCount) break;
        const nameEl = card.querySelector('a[href*="/in/"]');
        if (!nameEl) continue;
        const name = nameEl.innerText.trim();
        if (!name || name.length < 2 || seen.has(name)) continue;
        seen.add(name);

        const profileUrl = nameEl.href;
        const usernameMatch = profileUrl.match(/\/in\/([^/?]+)/);
        const spans = Array.from(card.querySelectorAll('span'));
        const titleEl = card.querySelector('span[dir="ltr"]') ||
            spans.find(s => s.innerText.length > 5 && !s.innerText.includes('degree'));
        const locationEl = spans.find(s =>
            s.innerText.includes(',') || /[A-Z][a-z]+( Area)?$/.test(s.innerText.trim()));

        const cardText = card.innerText.toLowerCase();
        let degree = 'none';
        if (cardText.includes('1st')) degree = '1st';
        else if (cardText.includes('2nd')) degree = '2nd';
        else if (cardText.includes('3rd')) degree = '3rd';
        const mutual = card.innerText.match(/(\d+) mutual connection/i);

        items.push({
            name,
            username: usernameMatch ? usernameMatch[1] : null,
            title: titleEl ? titleEl.innerText.trim() : '',
            location: locationEl ? locationEl.innerText.trim() : '',
            profile_url: profileUrl,
            connection_degree: degree,
            mutual_connections: mutual ? parseInt(mutual[1]) : 0,
        });
    }
    return items;
}"#;

/// Pages to scroll on list views: one per ten items, at most five
fn list_scrolls(limit: u32) -> u32 {
    (limit / 10).min(5)
}

impl Actions {
    /// Toggle following a company
    pub async fn follow_company(&self, company: &str) -> Result<ActionResult> {
        let result = isolate(self.follow_company_inner(company).await, "following company");
        result.map(|r| r.with_default("company_name", company))
    }

    async fn follow_company_inner(&self, company: &str) -> Result<ActionResult> {
        let url = company_url(company);
        self.open(&url).await?;
        self.settle(2.0).await;

        let outcome = self.run(TOGGLE_FOLLOW).await?;
        if !outcome["clicked"].as_bool().unwrap_or(false) {
            return Ok(ActionResult::error("Could not find Follow button"));
        }
        self.settle(1.0).await;
        let action = if outcome["wasFollowing"].as_bool().unwrap_or(false) {
            "unfollowed"
        } else {
            "followed"
        };
        info!("Company {} {}", company, action);
        Ok(ActionResult::success(format!("Company {} successfully", action))
            .with("company_url", url)
            .with("action", action))
    }

    /// Open positions listed on a company's jobs tab
    pub async fn get_company_jobs(&self, company: &str, limit: u32) -> Result<ActionResult> {
        let result = isolate(
            self.company_jobs_inner(company, limit).await,
            "getting company jobs",
        );
        result.map(|r| r.with_default("company", company))
    }

    async fn company_jobs_inner(&self, company: &str, limit: u32) -> Result<ActionResult> {
        let url = format!("{}/company/{}/jobs/", BASE, company);
        self.open(&url).await?;
        self.settle(2.0).await;

        let total = self.run(TOTAL_JOBS).await?.as_u64().unwrap_or(0);
        self.scroll(list_scrolls(limit), 1.0).await?;

        let jobs = self.call(COMPANY_JOBS, json!(limit)).await?;
        let jobs = jobs.as_array().cloned().unwrap_or_default();
        Ok(ActionResult::success(format!("Found {} jobs at {}", jobs.len(), company))
            .with("total_jobs", total)
            .with("count", jobs.len())
            .with("jobs", jobs)
            .with("url", url))
    }

    /// Members listed on a company's people tab
    pub async fn get_company_employees(
        &self,
        company: &str,
        role_filter: Option<&str>,
        location_filter: Option<&str>,
        limit: u32,
    ) -> Result<ActionResult> {
        let role_filter = role_filter.filter(|r| !r.is_empty());
        let location_filter = location_filter.filter(|l| !l.is_empty());
        let result = isolate(
            self.company_employees_inner(company, role_filter, location_filter, limit)
                .await,
            "getting company employees",
        );
        result.map(|r| r.with_default("company", company))
    }

    async fn company_employees_inner(
        &self,
        company: &str,
        role_filter: Option<&str>,
        location_filter: Option<&str>,
        limit: u32,
    ) -> Result<ActionResult> {
        let url = format!("{}/company/{}/people/", BASE, company);
        self.open(&url).await?;
        self.settle(2.0).await;

        let total = self.run(TOTAL_EMPLOYEES).await?.as_u64().unwrap_or(0);

        if let Some(role) = role_filter {
            self.call(
                APPLY_PEOPLE_FILTER,
                json!({ "hint": "function", "panel": "what they do", "value": role }),
            )
            .await?;
            self.settle(2.0).await;
        }
        if let Some(location) = location_filter {
            self.call(
                APPLY_PEOPLE_FILTER,
                json!({ "hint": "location", "panel": "where they live", "value": location }),
            )
            .await?;
            self.settle(2.0).await;
        }

        self.scroll(list_scrolls(limit), 1.0).await?;
        let employees = self.call(COMPANY_EMPLOYEES, json!(limit)).await?;
        let employees = match employees {
            Value::Array(items) => items,
            other => list_field(&other, "items"),
        };

        Ok(ActionResult::success(format!(
            "Found {} employees at {}",
            employees.len(),
            company
        ))
        .with("total_employees", total)
        .with("count", employees.len())
        .with("employees", employees)
        .with("url", url)
        .with(
            "filters_applied",
            json!({ "role": role_filter, "location": location_filter }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_scrolls_is_capped() {
        assert_eq!(list_scrolls(5), 0);
        assert_eq!(list_scrolls(25), 2);
        assert_eq!(list_scrolls(500), 5);
    }
}
