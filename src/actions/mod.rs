//! UI workflows on the live LinkedIn tab
//!
//! Each action opens a page, pokes at the DOM and reports what happened as
//! an [`ActionResult`]. Classified errors (sign-in walls, rate limits,
//! checkpoints) still escape; every other failure becomes `status: error`.

pub mod company;
pub mod jobs;
pub mod messaging;
pub mod network;
pub mod person;
pub mod post;
pub mod profile;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

use crate::browser::dom::detect_rate_limit;
use crate::browser::PageDriver;
use crate::config::Timing;
use crate::error::{Result, ScraperError};

/// Outcome vocabulary shared by all actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Error,
    Partial,
    Warning,
    AlreadyConnected,
    Pending,
    AlreadyFollowing,
    NoPending,
    NotFound,
    ModalOpened,
    Clicked,
    External,
    NotAvailable,
    Incomplete,
    AlreadyExists,
}

/// `{status, message, ...details}` record returned by every action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub status: Status,
    pub message: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ActionResult {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: Map::new(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Status::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Status::Error, message)
    }

    /// Attach a detail field
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.details.insert(key.to_string(), value);
        self
    }

    /// Attach a detail field only if it is not already set
    pub fn with_default(mut self, key: &str, value: impl Serialize) -> Self {
        if !self.details.contains_key(key) {
            self = self.with(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }
}

/// Runs UI scripts against the session page
#[derive(Clone)]
pub struct Actions {
    page: Arc<dyn PageDriver>,
    timing: Timing,
}

impl Actions {
    pub fn new(page: Arc<dyn PageDriver>, timing: Timing) -> Self {
        Self { page, timing }
    }

    pub fn page(&self) -> &dyn PageDriver {
        self.page.as_ref()
    }

    /// Navigate and check for blocks
    async fn open(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        detect_rate_limit(self.page.as_ref()).await
    }

    /// Sleep a fixed UI settle time, scaled by pace
    async fn settle(&self, secs: f64) {
        tokio::time::sleep(self.timing.settle(secs)).await;
    }

    /// Wait for a selector. `Ok(false)` on timeout.
    async fn wait_for(&self, selector: &str, secs: u64) -> Result<bool> {
        match self
            .page
            .wait_for_selector(selector, Duration::from_secs(secs))
            .await
        {
            Ok(()) => Ok(true),
            Err(ScraperError::Timeout(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Evaluate a zero-argument function
    async fn run(&self, script: &str) -> Result<Value> {
        self.page.run(script).await
    }

    /// Evaluate a function with JSON arguments
    async fn call(&self, script: &str, args: Value) -> Result<Value> {
        self.page.call(script, args).await
    }

    /// First selector that matches something on the page
    async fn first_existing<'a>(&self, candidates: &[&'a str]) -> Result<Option<&'a str>> {
        for candidate in candidates {
            if self.page.exists(candidate).await? {
                return Ok(Some(*candidate));
            }
        }
        Ok(None)
    }

    /// Scroll the window `times` times with a pause between
    async fn scroll(&self, times: u32, pause: f64) -> Result<()> {
        crate::browser::dom::scroll_times(self.page.as_ref(), self.timing.settle(pause), times).await
    }
}

/// Error isolation boundary for actions: classified errors propagate, anything
/// else turns into a `status: error` record mentioning `what`.
pub(crate) fn isolate(result: Result<ActionResult>, what: &str) -> Result<ActionResult> {
    match result {
        Ok(result) => Ok(result),
        Err(e) if e.is_classified() => {
            warn!("{} blocked: {}", what, e);
            Err(e)
        }
        Err(e) => {
            error!("Error {}: {}", what, e);
            Ok(ActionResult::error(format!("Error {}: {}", what, e)))
        }
    }
}

/// Truncate to at most `max` characters
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Read a string field from a script result
pub(crate) fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Read a list field from a script result
pub(crate) fn list_field(value: &Value, key: &str) -> Vec<Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_result_serialization() {
        let result = ActionResult::new(Status::AlreadyConnected, "Already connected with jdoe")
            .with("profile_url", "https://www.linkedin.com/in/jdoe/");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "status": "already_connected",
                "message": "Already connected with jdoe",
                "profile_url": "https://www.linkedin.com/in/jdoe/"
            })
        );
    }

    #[test]
    fn test_with_default_keeps_existing() {
        let result = ActionResult::success("ok")
            .with("job_id", "1")
            .with_default("job_id", "2")
            .with_default("url", "u");
        assert_eq!(result.get("job_id"), Some(&json!("1")));
        assert_eq!(result.get("url"), Some(&json!("u")));
    }

    #[test]
    fn test_isolate_converts_unclassified() {
        let isolated = isolate(Err(ScraperError::Script("boom".into())), "following jdoe").unwrap();
        assert_eq!(isolated.status, Status::Error);
        assert_eq!(isolated.message, "Error following jdoe: Script error: boom");

        let blocked = isolate(Err(ScraperError::RateLimited("slow".into())), "following jdoe");
        assert!(matches!(blocked, Err(ScraperError::RateLimited(_))));
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_status_round_trip_names() {
        let status: Status = serde_json::from_value(json!("not_available")).unwrap();
        assert_eq!(status, Status::NotAvailable);
        assert_eq!(serde_json::to_value(Status::NoPending).unwrap(), json!("no_pending"));
    }
}
