//! Job workflows: save, apply, Easy Apply, My Jobs lists and alerts

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::{isolate, str_field, ActionResult, Actions, Status};
use crate::browser::dom;
use crate::error::Result;
use crate::scraping::urls::{job_search_url, job_url, BASE};

/// Upper bound on Easy Apply modal pages
const MAX_APPLY_STEPS: usize = 10;

static APPLIED_DATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?i)Applied (\d+ \w+ ago)", r"(?i)Applied (on \w+ \d+)"]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

const CLICK_SAVE: &str = r#"() => {
    for (const btn of document.querySelectorAll('button')) {
        const aria = (btn.getAttribute('aria-label') || '').toLowerCase();
        const text = btn.innerText.toLowerCase();
        if (aria.includes('save') || text.includes('save')) {
            const wasSaved = aria.includes('unsave') || text.includes('unsave');
            btn.click();
            return { clicked: true, wasSaved };
        }
    }
    return { clicked: false };
}"#;

const APPLY_BUTTON: &str = r#"() => {
    for (const btn of document.querySelectorAll('button')) {
        const aria = (btn.getAttribute('aria-label') || '').toLowerCase();
        const text = btn.innerText.toLowerCase();
        if (text.includes('easy apply') || aria.includes('easy apply')) {
            btn.click();
            return 'easy_apply';
        }
        if ((text === 'apply' || aria.includes('apply')) && !text.includes('easy')) {
            return 'external';
        }
    }
    return 'not_found';
}"#;

const EXTERNAL_APPLY_URL: &str = r#"() => {
    for (const link of document.querySelectorAll('a')) {
        if (link.innerText.toLowerCase().includes('apply')) return link.href;
    }
    return null;
}"#;

const APPLY_MODAL: &str = r#"() => {
    for (const dialog of document.querySelectorAll('[role="dialog"]')) {
        const text = dialog.innerText.toLowerCase();
        if (text.includes('apply') || text.includes('resume') || text.includes('contact info')) {
            return Array.from(dialog.querySelectorAll('button')).map(b => b.innerText.trim());
        }
    }
    return null;
}"#;

const MODAL_INFO: &str = r#"() => {
    const dialog = document.querySelector('[role="dialog"]');
    if (!dialog) return { found: false };
    const buttons = Array.from(dialog.querySelectorAll('button'))
        .map(b => ({ text: b.innerText.trim().toLowerCase(), disabled: b.disabled }));
    return { found: true, text: dialog.innerText.slice(0, 500), buttons };
}"#;

const APPLICATION_SENT: &str = r#"() => {
    const body = document.body.innerText.toLowerCase();
    return body.includes('application submitted') ||
        body.includes('applied successfully') ||
        body.includes('your application was sent');
}"#;

const FILL_PHONE: &str = r#"(phone) => {
    const input = document.querySelector('input[type="tel"], input[name*="phone"], input[id*="phone"]');
    if (!input) return false;
    const setter = Object.getOwnPropertyDescriptor(window.HTMLInputElement.prototype, 'value').set;
    setter.call(input, phone);
    input.dispatchEvent(new Event('input', { bubbles: true }));
    input.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
}"#;

const PICK_FIRST_RESUME: &str = r#"() => {
    const radio = document.querySelector('[role="dialog"] input[type="radio"]');
    if (radio) { radio.click(); return true; }
    return false;
}"#;

/// Answer form questions whose label contains a keyword
const ANSWER_QUESTIONS: &str = r#"(answers) => {
    let answered = 0;
    for (const [keyword, answer] of Object.entries(answers)) {
        const key = keyword.toLowerCase();
        const wanted = String(answer).toLowerCase();
        for (const label of document.querySelectorAll('[role="dialog"] label')) {
            if (!label.innerText.toLowerCase().includes(key)) continue;
            const id = label.getAttribute('for');
            const input = id ? document.getElementById(id)
                : (label.parentElement && label.parentElement.querySelector('input, select, textarea'));
            if (!input) continue;
            if (input.tagName === 'SELECT') {
                const opt = Array.from(input.options).find(o => o.text.toLowerCase().includes(wanted));
                if (opt) input.value = opt.value;
            } else if (input.type === 'radio' || input.type === 'checkbox') {
                for (const choice of document.querySelectorAll(`input[name="${input.name}"]`)) {
                    const l = document.querySelector(`label[for="${choice.id}"]`);
                    if (l && l.innerText.toLowerCase().includes(wanted)) { choice.click(); break; }
                }
            } else {
                const proto = input.tagName === 'TEXTAREA'
                    ? window.HTMLTextAreaElement.prototype
                    : window.HTMLInputElement.prototype;
                Object.getOwnPropertyDescriptor(proto, 'value').set.call(input, String(answer));
            }
            input.dispatchEvent(new Event('input', { bubbles: true }));
            input.dispatchEvent(new Event('change', { bubbles: true }));
            answered++;
        }
    }
    return answered;
}"#;

const CLICK_TAB: &str = r#"(name) => {
    for (const tab of document.querySelectorAll('button[role="tab"]')) {
        if (tab.innerText.toLowerCase().includes(name)) { tab.click(); return true; }
    }
    return false;
}"#;

/// Cards on the My Jobs page; status parsing happens on the Rust side
const MY_JOBS: &str = r#"(maxCount) => {
    const items = [];
    for (const card of document.querySelectorAll('li[class*="list"]')) {
        if (items.length >= maxCount) break;
        const titleEl = card.querySelector('a[href*="/jobs/view/"]');
        if (!titleEl) continue;
        const companyEl = card.querySelector('a[href*="/company/"]') || card.querySelector('span[class*="company"]');
        const locationEl = Array.from(card.querySelectorAll('span'))
            .find(s => s.innerText.includes(',') || /[A-Z][a-z]+ ?\(/.test(s.innerText));
        const dateEl = Array.from(card.querySelectorAll('span, time'))
            .find(el => /saved|ago|posted/i.test(el.innerText));
        const match = titleEl.href.match(/jobs\/view\/(\d+)/);
        items.push({
            job_id: match ? match[1] : null,
            title: titleEl.innerText.trim(),
            company: companyEl ? companyEl.innerText.trim() : '',
            location: locationEl ? locationEl.innerText.trim() : '',
            job_url: titleEl.href,
            date_text: dateEl ? dateEl.innerText.trim() : '',
            card_text: card.innerText
        });
    }
    return items;
}"#;

const SHOW_MORE_ALERTS: &str = r#"() => {
    for (const btn of document.querySelectorAll('button')) {
        const text = btn.innerText.toLowerCase();
        if (text.includes('show') && /\d+ more/i.test(text)) { btn.click(); return true; }
    }
    return false;
}"#;

const JOB_ALERTS: &str = r#"() => {
    const items = [];
    for (const item of document.querySelectorAll('li')) {
        const editBtn = item.querySelector('button[aria-label*="Edit"], button[aria-label*="edit"]');
        if (!editBtn) continue;
        const text = item.innerText;
        const match = (editBtn.getAttribute('aria-label') || '').match(/Edit (.*?) job alert in (.*)/i);
        let keywords = '';
        let location = '';
        if (match) {
            keywords = match[1];
            location = match[2];
        } else {
            const lines = text.split('\n').filter(l => l.trim());
            if (lines.length >= 2) {
                keywords = lines[0].trim();
                location = lines[1].trim();
            }
        }
        if (keywords) items.push({ keywords, location, raw_text: text.substring(0, 200) });
    }
    return items;
}"#;

const ALERT_TOGGLE: &str = r#"() => {
    for (const btn of document.querySelectorAll('button')) {
        const text = btn.innerText.toLowerCase();
        const aria = (btn.getAttribute('aria-label') || '').toLowerCase();
        if (text.includes('set alert') || text.includes('get notified') ||
            aria.includes('alert') || aria.includes('notif')) {
            if (text.includes('alert on') || aria.includes('turn off')) return 'already_exists';
            btn.click();
            return 'clicked';
        }
    }
    return 'not_found';
}"#;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModalButton {
    pub text: String,
    #[serde(default)]
    pub disabled: bool,
}

/// Snapshot of the Easy Apply dialog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModalInfo {
    pub found: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub buttons: Vec<ModalButton>,
}

/// What to press on the current Easy Apply page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStep {
    Submit,
    Review,
    Next,
    Stuck,
}

impl ApplyStep {
    /// Submit wins over review, review over next. Disabled buttons (an
    /// unanswered required field) never count.
    pub fn choose(modal: &ModalInfo) -> Self {
        let has = |needles: &[&str]| {
            modal
                .buttons
                .iter()
                .filter(|b| !b.disabled)
                .any(|b| needles.iter().any(|n| b.text.contains(n)))
        };
        if has(&["submit"]) {
            ApplyStep::Submit
        } else if has(&["review"]) {
            ApplyStep::Review
        } else if has(&["next", "continue"]) {
            ApplyStep::Next
        } else {
            ApplyStep::Stuck
        }
    }

    fn needles(self) -> &'static [&'static str] {
        match self {
            ApplyStep::Submit => &["submit"],
            ApplyStep::Review => &["review"],
            ApplyStep::Next => &["next", "continue"],
            ApplyStep::Stuck => &[],
        }
    }
}

/// Application state shown on an applied-job card
pub fn application_status(card_text: &str) -> &'static str {
    let text = card_text.to_lowercase();
    if text.contains("viewed") || text.contains("seen") {
        "viewed"
    } else if text.contains("in progress") {
        "in_progress"
    } else if text.contains("not selected") || text.contains("rejected") {
        "rejected"
    } else if text.contains("hired") || text.contains("offer") {
        "offered"
    } else {
        "applied"
    }
}

/// `3 days ago` or `on Mar 4` from "Applied ..." card text
pub fn applied_date(card_text: &str) -> String {
    APPLIED_DATE
        .iter()
        .find_map(|re| re.captures(card_text))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn is_active(card_text: &str) -> bool {
    let text = card_text.to_lowercase();
    !text.contains("no longer accepting") && !text.contains("job closed")
}

fn saved_job(card: &Value) -> Value {
    let text = str_field(card, "card_text");
    json!({
        "job_id": card.get("job_id").cloned().unwrap_or(Value::Null),
        "title": str_field(card, "title"),
        "company": str_field(card, "company"),
        "location": str_field(card, "location"),
        "job_url": str_field(card, "job_url"),
        "saved_date": str_field(card, "date_text"),
        "is_active": is_active(text),
    })
}

fn applied_job(card: &Value) -> Value {
    let text = str_field(card, "card_text");
    json!({
        "job_id": card.get("job_id").cloned().unwrap_or(Value::Null),
        "title": str_field(card, "title"),
        "company": str_field(card, "company"),
        "location": str_field(card, "location"),
        "job_url": str_field(card, "job_url"),
        "applied_date": applied_date(text),
        "status": application_status(text),
    })
}

impl Actions {
    /// Toggle the saved state of a job
    pub async fn save_job(&self, job_id: &str) -> Result<ActionResult> {
        let result = isolate(self.save_job_inner(job_id).await, "saving job");
        result.map(|r| r.with_default("job_id", job_id))
    }

    async fn save_job_inner(&self, job_id: &str) -> Result<ActionResult> {
        let url = job_url(job_id);
        self.open(&url).await?;
        self.settle(2.0).await;

        let outcome = self.run(CLICK_SAVE).await?;
        if !outcome["clicked"].as_bool().unwrap_or(false) {
            return Ok(ActionResult::error("Could not find Save button"));
        }
        self.settle(1.0).await;
        let action = if outcome["wasSaved"].as_bool().unwrap_or(false) {
            "unsaved"
        } else {
            "saved"
        };
        Ok(ActionResult::success(format!("Job {} successfully", action))
            .with("job_url", url)
            .with("action", action))
    }

    /// Open the Easy Apply dialog, or report the external application link
    pub async fn apply_to_job(&self, job_id: &str) -> Result<ActionResult> {
        let result = isolate(self.apply_inner(job_id).await, "applying to job");
        result.map(|r| r.with_default("job_id", job_id))
    }

    async fn apply_inner(&self, job_id: &str) -> Result<ActionResult> {
        let url = job_url(job_id);
        self.open(&url).await?;
        self.settle(2.0).await;

        let result = match self.run(APPLY_BUTTON).await?.as_str().unwrap_or("not_found") {
            "easy_apply" => {
                self.settle(2.0).await;
                match self.run(APPLY_MODAL).await? {
                    Value::Array(buttons) => ActionResult::new(
                        Status::ModalOpened,
                        "Easy Apply modal opened. Additional steps required (resume, questions, etc.)",
                    )
                    .with("modal_buttons", buttons),
                    _ => ActionResult::new(
                        Status::Clicked,
                        "Easy Apply button clicked but modal not detected",
                    ),
                }
            }
            "external" => ActionResult::new(Status::External, "This job requires external application")
                .with("external_url", self.run(EXTERNAL_APPLY_URL).await?),
            _ => ActionResult::new(
                Status::NotAvailable,
                "No Apply button found. Job may be closed or not available.",
            ),
        };
        Ok(result.with("job_url", url))
    }

    /// Walk the Easy Apply dialog to submission.
    ///
    /// `answers` maps question keywords to answers, e.g. `years experience`
    /// to `5`.
    pub async fn easy_apply_complete(
        &self,
        job_id: &str,
        phone_number: Option<&str>,
        answers: &BTreeMap<String, String>,
    ) -> Result<ActionResult> {
        let result = isolate(
            self.easy_apply_inner(job_id, phone_number.filter(|p| !p.is_empty()), answers)
                .await,
            "in Easy Apply",
        );
        result.map(|r| r.with_default("job_id", job_id))
    }

    async fn easy_apply_inner(
        &self,
        job_id: &str,
        phone_number: Option<&str>,
        answers: &BTreeMap<String, String>,
    ) -> Result<ActionResult> {
        let url = job_url(job_id);
        self.open(&url).await?;
        self.settle(2.0).await;

        let opened = dom::click_button(self.page(), &["easy apply"], dom::ButtonMatch::default())
            .await?
            .is_some();
        if !opened {
            return match self.run(EXTERNAL_APPLY_URL).await? {
                Value::String(external) => Ok(ActionResult::new(
                    Status::External,
                    "This job requires external application",
                )
                .with("external_url", external)),
                _ => Ok(ActionResult::new(Status::NotAvailable, "No Easy Apply button found")),
            };
        }
        self.settle(2.0).await;

        let answers: Map<String, Value> = answers
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        let mut steps: Vec<String> = Vec::new();

        for step_no in 1..=MAX_APPLY_STEPS {
            let modal: ModalInfo = dom::decode(self.run(MODAL_INFO).await?)?;
            if !modal.found {
                if self.run(APPLICATION_SENT).await?.as_bool().unwrap_or(false) {
                    return Ok(submitted(&url, steps));
                }
                break;
            }

            let text = modal.text.to_lowercase();
            if let Some(phone) = phone_number {
                if (text.contains("phone") || text.contains("mobile"))
                    && self.call(FILL_PHONE, json!(phone)).await?.as_bool().unwrap_or(false)
                {
                    steps.push("phone_number".into());
                    self.settle(0.5).await;
                }
            }
            if text.contains("resume") || text.contains("cv") {
                self.run(PICK_FIRST_RESUME).await?;
                steps.push("resume_selected".into());
                self.settle(0.5).await;
            }
            if !answers.is_empty() {
                let answered = self.call(ANSWER_QUESTIONS, Value::Object(answers.clone())).await?;
                debug!("Answered {} questions on step {}", answered, step_no);
                steps.push("questions_answered".into());
                self.settle(0.5).await;
            }

            let step = ApplyStep::choose(&modal);
            if step == ApplyStep::Stuck {
                warn!("Easy Apply for {} has no way forward on step {}", job_id, step_no);
                break;
            }
            let clicked = dom::click_button(
                self.page(),
                step.needles(),
                dom::ButtonMatch {
                    scope: Some("[role=\"dialog\"]"),
                    exact: false,
                    aria: false,
                },
            )
            .await?
            .is_some();

            match step {
                ApplyStep::Submit if clicked => {
                    steps.push("submitted".into());
                    self.settle(3.0).await;
                    info!("Easy Apply submitted for job {}", job_id);
                    return Ok(submitted(&url, steps));
                }
                ApplyStep::Submit => {}
                ApplyStep::Review => {
                    steps.push("review".into());
                    self.settle(2.0).await;
                }
                _ => {
                    steps.push(format!("step_{}", step_no));
                    self.settle(2.0).await;
                }
            }
        }

        Ok(ActionResult::new(
            Status::Incomplete,
            "Easy Apply flow did not complete. May need manual intervention.",
        )
        .with("job_url", url)
        .with("steps_completed", steps))
    }

    pub async fn get_saved_jobs(&self, limit: u32) -> Result<ActionResult> {
        isolate(self.my_jobs(limit, "saved").await, "getting saved jobs")
    }

    pub async fn get_applied_jobs(&self, limit: u32) -> Result<ActionResult> {
        isolate(self.my_jobs(limit, "applied").await, "getting applied jobs")
    }

    async fn my_jobs(&self, limit: u32, tab: &str) -> Result<ActionResult> {
        let url = format!("{}/my-items/saved-jobs/", BASE);
        self.open(&url).await?;
        self.settle(2.0).await;

        let switched = self.call(CLICK_TAB, json!(tab)).await?.as_bool().unwrap_or(false);
        if !switched && tab == "applied" {
            return Ok(ActionResult::error("Could not find Applied tab"));
        }
        self.settle(2.0).await;
        self.scroll((limit / 10).min(5), 1.0).await?;

        let cards = self.call(MY_JOBS, json!(limit)).await?;
        let cards = cards.as_array().cloned().unwrap_or_default();
        let jobs: Vec<Value> = if tab == "applied" {
            cards.iter().map(applied_job).collect()
        } else {
            cards.iter().map(saved_job).collect()
        };
        Ok(ActionResult::success(format!("Found {} {} jobs", jobs.len(), tab))
            .with("count", jobs.len())
            .with("jobs", jobs)
            .with("url", url))
    }

    pub async fn get_job_alerts(&self) -> Result<ActionResult> {
        isolate(self.job_alerts_inner().await, "getting job alerts")
    }

    async fn job_alerts_inner(&self) -> Result<ActionResult> {
        let url = format!("{}/jobs/jam/", BASE);
        self.open(&url).await?;
        self.settle(2.0).await;

        for _ in 0..3 {
            if !self.run(SHOW_MORE_ALERTS).await?.as_bool().unwrap_or(false) {
                break;
            }
            self.settle(1.0).await;
        }

        let alerts = self.run(JOB_ALERTS).await?.as_array().cloned().unwrap_or_default();
        Ok(ActionResult::success(format!("Found {} job alerts", alerts.len()))
            .with("count", alerts.len())
            .with("alerts", alerts)
            .with("url", url))
    }

    /// Turn on an alert for a job search
    pub async fn create_job_alert(&self, keywords: &str, location: Option<&str>) -> Result<ActionResult> {
        let location = location.filter(|l| !l.is_empty());
        let result = isolate(self.create_alert_inner(keywords, location).await, "creating job alert");
        result.map(|r| r.with_default("keywords", keywords).with_default("location", location))
    }

    async fn create_alert_inner(&self, keywords: &str, location: Option<&str>) -> Result<ActionResult> {
        self.open(&job_search_url(keywords, location)).await?;
        self.settle(2.0).await;

        match self.run(ALERT_TOGGLE).await?.as_str().unwrap_or("not_found") {
            "already_exists" => Ok(ActionResult::new(
                Status::AlreadyExists,
                format!("Job alert for '{}' already exists", keywords),
            )),
            "clicked" => {
                self.settle(2.0).await;
                let place = location.map(|l| format!(" in {}", l)).unwrap_or_default();
                Ok(ActionResult::success(format!(
                    "Job alert created for '{}'{}",
                    keywords, place
                )))
            }
            _ => Ok(ActionResult::new(
                Status::NotFound,
                "Could not find alert button. Try searching for jobs first.",
            )),
        }
    }
}

fn submitted(url: &str, steps: Vec<String>) -> ActionResult {
    ActionResult::success("Application submitted successfully")
        .with("job_url", url)
        .with("steps_completed", steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modal(buttons: &[&str]) -> ModalInfo {
        ModalInfo {
            found: true,
            text: String::new(),
            buttons: buttons
                .iter()
                .map(|t| ModalButton {
                    text: t.to_string(),
                    disabled: false,
                })
                .collect(),
        }
    }

    #[test]
    fn test_apply_step_priority() {
        assert_eq!(ApplyStep::choose(&modal(&["back", "submit application"])), ApplyStep::Submit);
        assert_eq!(ApplyStep::choose(&modal(&["back", "review"])), ApplyStep::Review);
        assert_eq!(ApplyStep::choose(&modal(&["continue to next step"])), ApplyStep::Next);
        assert_eq!(ApplyStep::choose(&modal(&["dismiss"])), ApplyStep::Stuck);
        assert_eq!(ApplyStep::choose(&modal(&["review", "submit"])), ApplyStep::Submit);
    }

    #[test]
    fn test_disabled_buttons_are_skipped() {
        let info: ModalInfo = serde_json::from_value(json!({
            "found": true,
            "buttons": [
                {"text": "submit application", "disabled": true},
                {"text": "back", "disabled": false}
            ]
        }))
        .unwrap();
        assert_eq!(ApplyStep::choose(&info), ApplyStep::Stuck);

        let info: ModalInfo = serde_json::from_value(json!({
            "found": true,
            "buttons": [
                {"text": "submit application", "disabled": true},
                {"text": "next"}
            ]
        }))
        .unwrap();
        assert_eq!(ApplyStep::choose(&info), ApplyStep::Next);
    }

    #[test]
    fn test_modal_info_decodes_missing_dialog() {
        let info: ModalInfo = serde_json::from_value(json!({"found": false})).unwrap();
        assert!(!info.found);
        assert!(info.buttons.is_empty());
    }

    #[test]
    fn test_application_status() {
        assert_eq!(application_status("Applied 3 days ago\nResume viewed"), "viewed");
        assert_eq!(application_status("Application in progress"), "in_progress");
        assert_eq!(application_status("Not selected"), "rejected");
        assert_eq!(application_status("You received an offer"), "offered");
        assert_eq!(application_status("Applied 1 week ago"), "applied");
    }

    #[test]
    fn test_applied_date() {
        assert_eq!(applied_date("Rust Engineer\nApplied 3 days ago"), "3 days ago");
        assert_eq!(applied_date("applied on March 4"), "on March 4");
        assert_eq!(applied_date("Saved yesterday"), "");
    }

    #[test]
    fn test_saved_job_marks_closed() {
        let card = json!({
            "job_id": "42",
            "title": "Rust Engineer",
            "job_url": "https://www.linkedin.com/jobs/view/42/",
            "card_text": "Rust Engineer\nNo longer accepting applications"
        });
        let job = saved_job(&card);
        assert_eq!(job["is_active"], false);
        assert_eq!(job["job_id"], "42");
        assert_eq!(job["company"], "");
    }
}
