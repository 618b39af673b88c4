//! Scraper error types
//!
//! Three variants are *classified*: they always reach the caller so the agent
//! can react (log in again, slow down, solve a checkpoint). Everything else is
//! isolated by the extractor and the action methods.

/// Error types for browser-driven LinkedIn operations
#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Security challenge: {0}")]
    SecurityChallenge(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session error: {0}")]
    Session(String),
}

pub type Result<T, E = ScraperError> = std::result::Result<T, E>;

impl ScraperError {
    /// Whether this error must propagate instead of being isolated
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationRequired(_) | Self::RateLimited(_) | Self::SecurityChallenge(_)
        )
    }

    /// Stable snake_case identifier used in tool error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthenticationRequired(_) => "authentication_required",
            Self::RateLimited(_) => "rate_limited",
            Self::SecurityChallenge(_) => "security_challenge",
            Self::Navigation(_) => "navigation_error",
            Self::Timeout(_) => "timeout",
            Self::Browser(_) => "browser_error",
            Self::Script(_) => "script_error",
            Self::InvalidInput(_) => "invalid_input",
            Self::Session(_) => "session_error",
        }
    }

    /// Hint for the agent on how to recover
    pub fn resolution(&self) -> &'static str {
        match self {
            Self::AuthenticationRequired(_) => {
                "Run `linkedin-mcp --login` to sign in, or set LINKEDIN_COOKIE to a valid li_at cookie"
            }
            Self::RateLimited(_) => "Wait a few minutes before retrying and request fewer sections",
            Self::SecurityChallenge(_) => {
                "Open a headed session with `linkedin-mcp --login` and complete the challenge"
            }
            Self::InvalidInput(_) => "Check the tool arguments",
            Self::Session(_) | Self::Browser(_) => {
                "Call close_session to restart the browser, then retry"
            }
            Self::Navigation(_) | Self::Timeout(_) | Self::Script(_) => "Retry the call",
        }
    }
}

impl From<chromiumoxide::error::CdpError> for ScraperError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::Browser(err.to_string())
    }
}

impl From<serde_json::Error> for ScraperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Script(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classified_errors() {
        assert!(ScraperError::AuthenticationRequired("login".into()).is_classified());
        assert!(ScraperError::RateLimited("slow".into()).is_classified());
        assert!(ScraperError::SecurityChallenge("captcha".into()).is_classified());
        assert!(!ScraperError::Timeout("main".into()).is_classified());
        assert!(!ScraperError::Script("boom".into()).is_classified());
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(ScraperError::RateLimited("x".into()).kind(), "rate_limited");
        assert_eq!(
            ScraperError::InvalidInput("x".into()).to_string(),
            "Invalid input: x"
        );
    }
}
