//! innerText extraction engine
//!
//! Every read-only tool goes through one state machine:
//!
//! ```text
//! goto ─► detect_redirect ─► wait for region ─► detect_rate_limit ─► dismiss modals ─► scroll
//!      ─► read innerText ─► strip noise ─┬─► text
//!                                        └─► only chrome left ─► backoff ─► one retry
//! ```
//!
//! Classified errors escape; anything else degrades to an empty string.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::fields::{CompanySections, PersonSections};
use super::noise::strip_noise;
use super::result::ScrapeResult;
use super::urls;
use crate::browser::dom::{detect_rate_limit, detect_redirect, handle_modal_close, scroll_to_bottom};
use crate::browser::PageDriver;
use crate::config::Timing;
use crate::error::{Result, ScraperError};

/// Returned as section text when LinkedIn rate-limits the page
pub const RATE_LIMITED_MSG: &str =
    "[Rate limited] LinkedIn blocked this section. Try again later or request fewer sections.";

/// How to wait for, load and read one kind of page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub label: &'static str,
    pub wait_selector: &'static str,
    pub wait_timeout: Duration,
    pub dismiss_modals: bool,
    /// (pause seconds, max scrolls); `None` skips scrolling
    pub scroll: Option<(f64, u32)>,
    /// Zero-argument JS function returning the region's text
    pub script: &'static str,
}

impl Region {
    pub const MAIN: Region = Region {
        label: "Page",
        wait_selector: "main",
        wait_timeout: Duration::from_secs(5),
        dismiss_modals: true,
        scroll: Some((0.5, 5)),
        script: r#"() => {
            const main = document.querySelector('main');
            return main ? main.innerText : document.body.innerText;
        }"#,
    };

    /// Contact info and similar dialogs. The dialog is the content, so it is
    /// never dismissed.
    pub const OVERLAY: Region = Region {
        label: "Overlay",
        wait_selector: "dialog[open], .artdeco-modal__content",
        wait_timeout: Duration::from_secs(5),
        dismiss_modals: false,
        scroll: None,
        script: r#"() => {
            const dialog = document.querySelector('dialog[open]');
            if (dialog) return dialog.innerText.trim();
            const modal = document.querySelector('.artdeco-modal__content');
            if (modal) return modal.innerText.trim();
            const main = document.querySelector('main');
            return main ? main.innerText.trim() : document.body.innerText.trim();
        }"#,
    };

    pub const POSTS: Region = Region {
        label: "Posts page",
        wait_selector: ".search-results-container, .scaffold-finite-scroll__content",
        wait_timeout: Duration::from_secs(10),
        dismiss_modals: true,
        scroll: Some((0.8, 8)),
        script: r#"() => {
            const container = document.querySelector('.search-results-container') ||
                              document.querySelector('.scaffold-finite-scroll__content') ||
                              document.querySelector('main');
            return container ? container.innerText : document.body.innerText;
        }"#,
    };

    pub const PEOPLE: Region = Region {
        label: "People search page",
        wait_selector: ".search-results-container, .reusable-search__entity-result-list",
        wait_timeout: Duration::from_secs(10),
        dismiss_modals: true,
        scroll: Some((0.8, 5)),
        script: r#"() => {
            const results = [];
            const cards = document.querySelectorAll(
                '.reusable-search__result-container, [data-view-name="search-entity-result-universal-template"]'
            );
            for (const card of cards) {
                const link = card.querySelector('a[href*="/in/"]');
                const profileUrl = link ? link.href.split('?')[0] : '';
                const text = card.innerText;
                results.push(profileUrl ? 'Profile: ' + profileUrl + '\n' + text : text);
            }
            if (results.length > 0) return results.join('\n---\n');
            const container = document.querySelector('.search-results-container') ||
                              document.querySelector('.reusable-search__entity-result-list') ||
                              document.querySelector('main');
            return container ? container.innerText : document.body.innerText;
        }"#,
    };
}

/// Outcome of one attempt
#[derive(Debug, PartialEq)]
enum Attempt {
    Text(String),
    /// Only page chrome came back
    SoftRateLimited,
}

/// Extracts LinkedIn page content via navigate-scroll-innerText
#[derive(Clone)]
pub struct Extractor {
    page: Arc<dyn PageDriver>,
    timing: Timing,
}

impl Extractor {
    pub fn new(page: Arc<dyn PageDriver>, timing: Timing) -> Self {
        Self { page, timing }
    }

    /// Navigate to a page, load lazy content and return its main text.
    ///
    /// Returns [`RATE_LIMITED_MSG`] when the page is still soft rate-limited
    /// after one retry, and `""` on unclassified failures.
    pub async fn extract_page(&self, url: &str) -> Result<String> {
        self.extract(url, &Region::MAIN).await
    }

    /// Read a modal page such as contact info
    pub async fn extract_overlay(&self, url: &str) -> Result<String> {
        self.extract(url, &Region::OVERLAY).await
    }

    /// Read a content search results page
    pub async fn extract_posts_page(&self, url: &str) -> Result<String> {
        self.extract(url, &Region::POSTS).await
    }

    /// Read a people search results page as profile cards
    pub async fn extract_people_page(&self, url: &str) -> Result<String> {
        self.extract(url, &Region::PEOPLE).await
    }

    /// Run the retry state machine for one region
    pub async fn extract(&self, url: &str, region: &Region) -> Result<String> {
        match self.extract_with_retry(url, region).await {
            Ok(text) => Ok(text),
            Err(e) if e.is_classified() => Err(e),
            Err(e) => {
                warn!("Failed to extract {} {}: {}", region.label.to_lowercase(), url, e);
                Ok(String::new())
            }
        }
    }

    async fn extract_with_retry(&self, url: &str, region: &Region) -> Result<String> {
        if let Attempt::Text(text) = self.attempt(url, region).await? {
            return Ok(text);
        }

        info!(
            "Retrying {} after {:.0}s backoff",
            url,
            self.timing.rate_limit_backoff.as_secs_f64()
        );
        tokio::time::sleep(self.timing.rate_limit_backoff).await;

        match self.attempt(url, region).await? {
            Attempt::Text(text) => Ok(text),
            Attempt::SoftRateLimited => Ok(RATE_LIMITED_MSG.to_string()),
        }
    }

    async fn attempt(&self, url: &str, region: &Region) -> Result<Attempt> {
        let page = self.page.as_ref();
        page.goto(url).await?;
        detect_redirect(page).await?;

        if let Err(e) = page.wait_for_selector(region.wait_selector, region.wait_timeout).await {
            match e {
                ScraperError::Timeout(_) => debug!("No `{}` found on {}", region.wait_selector, url),
                other => return Err(other),
            }
        }
        detect_rate_limit(page).await?;

        if region.dismiss_modals {
            handle_modal_close(page).await;
        }

        if let Some((pause, max_scrolls)) = region.scroll {
            scroll_to_bottom(page, self.timing.settle(pause), max_scrolls).await?;
        }

        let raw = page.run(region.script).await?;
        let raw = raw.as_str().unwrap_or("");
        if raw.is_empty() {
            return Ok(Attempt::Text(String::new()));
        }

        let cleaned = strip_noise(raw);
        if cleaned.is_empty() && !raw.trim().is_empty() {
            warn!(
                "{} {} returned only LinkedIn chrome (likely rate-limited)",
                region.label, url
            );
            return Ok(Attempt::SoftRateLimited);
        }
        Ok(Attempt::Text(cleaned.to_string()))
    }

    /// Scrape a person profile. The main profile page is always visited.
    pub async fn scrape_person(&self, username: &str, sections: &PersonSections) -> Result<ScrapeResult> {
        let base_url = format!("{}/in/{}", urls::BASE, username);
        let mut result = ScrapeResult::new(format!("{}/", base_url));

        for section in sections.iter() {
            let url = format!("{}{}", base_url, section.suffix());
            let text = if section.is_overlay() {
                self.extract_overlay(&url).await?
            } else {
                self.extract_page(&url).await?
            };
            result.insert(section.name(), text);
            result.pages_visited.push(url);

            tokio::time::sleep(self.timing.nav_delay).await;
        }

        result.sections_requested = sections.iter().map(|s| s.name().to_string()).collect();
        Ok(result)
    }

    /// Scrape a company profile. The about page is always visited.
    pub async fn scrape_company(&self, company: &str, sections: &CompanySections) -> Result<ScrapeResult> {
        let base_url = format!("{}/company/{}", urls::BASE, company);
        let mut result = ScrapeResult::new(format!("{}/", base_url));

        for section in sections.iter() {
            let url = format!("{}{}", base_url, section.suffix());
            let text = self.extract_page(&url).await?;
            result.insert(section.name(), text);
            result.pages_visited.push(url);

            tokio::time::sleep(self.timing.nav_delay).await;
        }

        result.sections_requested = sections.iter().map(|s| s.name().to_string()).collect();
        Ok(result)
    }

    /// Recent posts from a company feed
    pub async fn company_posts(&self, company: &str) -> Result<ScrapeResult> {
        let url = format!("{}/company/{}/posts/", urls::BASE, company);
        let text = self.extract_page(&url).await?;
        Ok(ScrapeResult::single(url, "posts", text))
    }

    pub async fn scrape_job(&self, job_id: &str) -> Result<ScrapeResult> {
        let url = urls::job_url(job_id);
        let text = self.extract_page(&url).await?;
        Ok(ScrapeResult::single(url, "job_posting", text))
    }

    pub async fn search_jobs(&self, keywords: &str, location: Option<&str>) -> Result<ScrapeResult> {
        let url = urls::job_search_url(keywords, location);
        let text = self.extract_page(&url).await?;
        Ok(ScrapeResult::single(url, "search_results", text))
    }

    /// Content search, e.g. job offers shared as posts.
    ///
    /// `date_posted` is one of `past-24h`, `past-week`, `past-month`;
    /// `sort_by` is `date_posted` or `relevance`.
    pub async fn search_posts(
        &self,
        keywords: &str,
        date_posted: Option<&str>,
        sort_by: Option<&str>,
    ) -> Result<ScrapeResult> {
        let url = urls::post_search_url(keywords, date_posted, sort_by);
        let text = self.extract_posts_page(&url).await?;
        Ok(ScrapeResult::single(url, "posts", text))
    }

    /// People search. `network` holds connection degrees (`F`, `S`, `O`) and
    /// `location` a geoUrn code.
    pub async fn search_people(
        &self,
        keywords: &str,
        network: &[String],
        location: Option<&str>,
        current_company: Option<&str>,
    ) -> Result<ScrapeResult> {
        let url = urls::people_search_url(keywords, network, location, current_company);
        let text = self.extract_people_page(&url).await?;
        Ok(ScrapeResult::single(url, "people", text))
    }
}
