//! Publishing to the feed

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{isolate, truncate_chars, ActionResult, Actions, Status};
use crate::browser::session::FEED_URL;
use crate::error::{Result, ScraperError};

const PREVIEW_CHARS: usize = 100;

/// Who can see a new post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Anyone,
    Connections,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anyone => "anyone",
            Self::Connections => "connections",
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "anyone" => Ok(Self::Anyone),
            "connections" => Ok(Self::Connections),
            other => Err(ScraperError::InvalidInput(format!(
                "visibility must be \"anyone\" or \"connections\", got \"{}\"",
                other
            ))),
        }
    }
}

const START_POST: &str = r#"() => {
    for (const btn of document.querySelectorAll('button')) {
        const text = btn.innerText.toLowerCase();
        const label = (btn.getAttribute('aria-label') || '').toLowerCase();
        if (text.includes('start a post') || label.includes('start a post') ||
            text.includes('share') || label.includes('create a post')) {
            btn.click();
            return true;
        }
    }
    const shareBox = document.querySelector('.share-box-feed-entry__trigger, .share-box__open');
    if (shareBox) { shareBox.click(); return true; }
    return false;
}"#;

const EDITOR: &str = "[role=\"textbox\"], .ql-editor, .editor-content, [contenteditable=\"true\"]";

const OPEN_VISIBILITY: &str = r#"() => {
    for (const btn of document.querySelectorAll('button')) {
        const label = (btn.getAttribute('aria-label') || '').toLowerCase();
        const text = btn.innerText.toLowerCase();
        if (label.includes('visibility') || label.includes('who can see') ||
            text.includes('anyone') || text.includes('connections only')) {
            btn.click();
            return true;
        }
    }
    return false;
}"#;

const PICK_CONNECTIONS_ONLY: &str = r#"() => {
    const options = document.querySelectorAll('[role="radio"], [role="option"], .share-visibility-list__item');
    for (const opt of options) {
        const text = opt.innerText.toLowerCase();
        if (text.includes('connections only') || text.includes('conexões')) {
            opt.click();
            return true;
        }
    }
    return false;
}"#;

const CLICK_PUBLISH: &str = r#"() => {
    for (const btn of document.querySelectorAll('button')) {
        const text = btn.innerText.trim().toLowerCase();
        const label = (btn.getAttribute('aria-label') || '').toLowerCase();
        if ((text === 'post' || text === 'publicar' || label === 'post') &&
            !text.includes('start') && btn.offsetParent !== null) {
            if (btn.disabled) return { clicked: false, reason: 'button_disabled' };
            btn.click();
            return { clicked: true };
        }
    }
    return { clicked: false, reason: 'not_found' };
}"#;

const COMPOSER_CLOSED: &str = r#"() => {
    const modal = document.querySelector('[role="dialog"]');
    if (!modal) return true;
    const text = modal.innerText.toLowerCase();
    return !(text.includes('create a post') || text.includes('start a post'));
}"#;

/// First characters of a post, with an ellipsis when cut
pub fn content_preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_CHARS {
        format!("{}...", truncate_chars(content, PREVIEW_CHARS))
    } else {
        content.to_string()
    }
}

impl Actions {
    /// Publish a text post from the feed composer
    pub async fn create_post(&self, content: &str, visibility: Visibility) -> Result<ActionResult> {
        isolate(self.create_post_inner(content, visibility).await, "creating post")
    }

    async fn create_post_inner(&self, content: &str, visibility: Visibility) -> Result<ActionResult> {
        self.open(FEED_URL).await?;
        self.settle(2.0).await;

        if !self.run(START_POST).await?.as_bool().unwrap_or(false) {
            return Ok(ActionResult::error("Could not find 'Start a post' button"));
        }
        self.settle(2.0).await;

        if !self.wait_for(EDITOR, 5).await? {
            return Ok(ActionResult::error("Post editor not found"));
        }
        self.page().click(EDITOR).await?;
        self.settle(0.3).await;
        self.page().type_text(content).await?;
        info!("Filled post content");
        self.settle(1.0).await;

        if visibility == Visibility::Connections
            && self.run(OPEN_VISIBILITY).await?.as_bool().unwrap_or(false)
        {
            self.settle(1.0).await;
            self.run(PICK_CONNECTIONS_ONLY).await?;
            self.settle(0.5).await;
        }

        let publish = self.run(CLICK_PUBLISH).await?;
        if !publish["clicked"].as_bool().unwrap_or(false) {
            let reason = publish["reason"].as_str().unwrap_or("unknown");
            return Ok(ActionResult::error(format!(
                "Could not click Post button: {}",
                reason
            )));
        }
        self.settle(3.0).await;

        if self.run(COMPOSER_CLOSED).await?.as_bool().unwrap_or(false) {
            Ok(ActionResult::success(format!(
                "Post published successfully! Visibility: {}",
                visibility.as_str()
            ))
            .with("content_preview", content_preview(content)))
        } else {
            Ok(ActionResult::new(
                Status::Partial,
                "Post may not have been published - modal still visible",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_parsing() {
        assert_eq!("anyone".parse::<Visibility>().unwrap(), Visibility::Anyone);
        assert_eq!(" Connections ".parse::<Visibility>().unwrap(), Visibility::Connections);
        assert_eq!("".parse::<Visibility>().unwrap(), Visibility::Anyone);
        assert!(matches!(
            "public".parse::<Visibility>(),
            Err(ScraperError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("hello"), "hello");
        let long = "é".repeat(150);
        let preview = content_preview(&long);
        assert_eq!(preview.chars().count(), 103);
        assert!(preview.ends_with("..."));
    }
}
