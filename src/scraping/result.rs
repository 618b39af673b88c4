//! Scrape result record

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw section text gathered from one or more pages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub url: String,
    /// Section name to raw innerText. Empty sections are never stored.
    pub sections: BTreeMap<String, String>,
    pub pages_visited: Vec<String>,
    pub sections_requested: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_sections: Option<Vec<String>>,
}

impl ScrapeResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Single-page result: the page is always recorded as visited
    pub fn single(url: impl Into<String>, section: &str, text: String) -> Self {
        let url = url.into();
        let mut result = Self::new(url.clone());
        result.pages_visited.push(url);
        result.sections_requested.push(section.to_string());
        result.insert(section, text);
        result
    }

    /// Store section text unless it is empty
    pub fn insert(&mut self, section: &str, text: String) {
        if !text.is_empty() {
            self.sections.insert(section.to_string(), text);
        }
    }

    pub fn with_unknown(mut self, unknown: Vec<String>) -> Self {
        if !unknown.is_empty() {
            self.unknown_sections = Some(unknown);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sections_are_dropped() {
        let result = ScrapeResult::single("https://www.linkedin.com/jobs/view/1/", "job_posting", String::new());
        assert!(result.sections.is_empty());
        assert_eq!(result.pages_visited.len(), 1);
        assert_eq!(result.sections_requested, vec!["job_posting"]);
    }

    #[test]
    fn test_serialization_shape() {
        let result = ScrapeResult::single("u", "posts", "text".into());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["sections"]["posts"], "text");
        assert!(value.get("unknown_sections").is_none());

        let value = serde_json::to_value(result.with_unknown(vec!["x".into()])).unwrap();
        assert_eq!(value["unknown_sections"][0], "x");
    }
}
