//! Configuration management

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

use crate::browser::BrowserConfig;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Browser launch settings
    pub browser: BrowserConfig,

    /// Delays used while driving pages
    pub timing: Timing,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            browser: BrowserConfig::from_env(),
            timing: Timing::from_env(),
        })
    }
}

/// Pacing for page navigation and UI scripting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Pause after each section page of a multi-page scrape
    pub nav_delay: Duration,
    /// Pause before the single retry of a soft rate-limited page
    pub rate_limit_backoff: Duration,
    /// Multiplier applied to fixed UI settle sleeps and scroll pauses
    pub pace: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            nav_delay: Duration::from_secs_f64(2.0),
            rate_limit_backoff: Duration::from_secs_f64(5.0),
            pace: 1.0,
        }
    }
}

impl Timing {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            nav_delay: env_secs("LINKEDIN_NAV_DELAY").unwrap_or(defaults.nav_delay),
            rate_limit_backoff: env_secs("LINKEDIN_RATE_LIMIT_BACKOFF")
                .unwrap_or(defaults.rate_limit_backoff),
            pace: std::env::var("LINKEDIN_PACE")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|p| p.is_finite() && *p >= 0.0)
                .unwrap_or(defaults.pace),
        }
    }

    /// No waiting at all; scripted pages in tests resolve immediately
    pub fn instant() -> Self {
        Self {
            nav_delay: Duration::ZERO,
            rate_limit_backoff: Duration::ZERO,
            pace: 0.0,
        }
    }

    /// Scale a fixed settle time (in seconds) by the pace
    pub fn settle(&self, secs: f64) -> Duration {
        Duration::from_secs_f64((secs * self.pace).max(0.0))
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|s| s.is_finite() && *s >= 0.0)
        .map(Duration::from_secs_f64)
}

/// Default persistent browser profile location
pub fn default_user_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("linkedin-mcp")
        .join("profile")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let timing = Timing::default();
        assert_eq!(timing.nav_delay, Duration::from_secs(2));
        assert_eq!(timing.rate_limit_backoff, Duration::from_secs(5));
    }

    #[test]
    fn test_settle_scales_with_pace() {
        let mut timing = Timing::default();
        timing.pace = 0.5;
        assert_eq!(timing.settle(2.0), Duration::from_secs(1));
        assert_eq!(Timing::instant().settle(2.0), Duration::ZERO);
    }

    #[test]
    fn test_default_user_data_dir() {
        let dir = default_user_data_dir();
        assert!(dir.ends_with("linkedin-mcp/profile"));
    }
}
