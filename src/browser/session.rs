//! LinkedIn browser session
//!
//! Owns the single Chromium instance and tab every tool drives. The browser
//! is launched on first use with a persistent profile directory, so a login
//! made with `--login` survives restarts.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::cdp::browser_protocol::network::SetCookieParams;
use chromiumoxide::handler::Handler;
use futures_util::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::dom::{is_checkpoint_url, is_login_url};
use super::page::{ChromePage, PageDriver};
use crate::config::default_user_data_dir;
use crate::error::{Result, ScraperError};

pub const FEED_URL: &str = "https://www.linkedin.com/feed/";

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Browser executable path (auto-detect if None)
    pub chrome_path: Option<PathBuf>,
    /// Persistent Chromium profile
    pub user_data_dir: PathBuf,
    /// Default viewport width
    pub viewport_width: u32,
    /// Default viewport height
    pub viewport_height: u32,
    /// Page load timeout
    pub timeout_secs: u64,
    /// Enable headless mode
    pub headless: bool,
    /// User agent string
    pub user_agent: Option<String>,
    /// `li_at` session cookie injected before the first navigation
    pub cookie: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            user_data_dir: default_user_data_dir(),
            viewport_width: 1280,
            viewport_height: 900,
            timeout_secs: 30,
            headless: true,
            user_agent: None,
            cookie: None,
        }
    }
}

impl BrowserConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            chrome_path: std::env::var("CHROME_PATH").ok().map(PathBuf::from),
            user_data_dir: std::env::var("LINKEDIN_USER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.user_data_dir),
            viewport_width: std::env::var("BROWSER_VIEWPORT_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.viewport_width),
            viewport_height: std::env::var("BROWSER_VIEWPORT_HEIGHT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.viewport_height),
            timeout_secs: std::env::var("BROWSER_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            headless: std::env::var("BROWSER_HEADLESS")
                .map(|s| s != "false" && s != "0")
                .unwrap_or(true),
            user_agent: std::env::var("BROWSER_USER_AGENT").ok(),
            cookie: std::env::var("LINKEDIN_COOKIE")
                .ok()
                .map(|c| c.trim().trim_start_matches("li_at=").to_string())
                .filter(|c| !c.is_empty()),
        }
    }

    /// Upper bound for one navigation
    pub fn nav_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Same settings with a visible window
    pub fn headed(mut self) -> Self {
        self.headless = false;
        self
    }

    fn to_chrome(&self) -> Result<ChromeConfig> {
        let mut builder = ChromeConfig::builder()
            .user_data_dir(&self.user_data_dir)
            .window_size(self.viewport_width, self.viewport_height)
            .request_timeout(self.nav_timeout())
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--lang=en-US,en");
        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.chrome_path {
            builder = builder.chrome_executable(path);
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.arg(format!("--user-agent={}", agent));
        }
        builder.build().map_err(ScraperError::Session)
    }
}

struct Live {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Arc<ChromePage>,
    authenticated: bool,
}

/// Lazily launched browser holding one LinkedIn tab
pub struct LinkedInSession {
    config: BrowserConfig,
    live: Mutex<Option<Live>>,
}

impl LinkedInSession {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            live: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub async fn is_running(&self) -> bool {
        self.live.lock().await.is_some()
    }

    /// The session page, launching the browser on first use
    pub async fn page(&self) -> Result<Arc<dyn PageDriver>> {
        let mut live = self.live.lock().await;
        let live = self.launch_if_needed(&mut live).await?;
        Ok(live.page.clone())
    }

    /// Fail with `AuthenticationRequired` unless the tab can reach the feed
    pub async fn ensure_authenticated(&self) -> Result<Arc<dyn PageDriver>> {
        let mut guard = self.live.lock().await;
        let live = self.launch_if_needed(&mut guard).await?;
        if live.authenticated {
            return Ok(live.page.clone());
        }

        live.page.goto(FEED_URL).await?;
        let url = live.page.current_url().await?;
        if is_checkpoint_url(&url) {
            return Err(ScraperError::SecurityChallenge(format!(
                "LinkedIn security checkpoint at {}",
                url
            )));
        }
        if is_login_url(&url) {
            return Err(ScraperError::AuthenticationRequired(
                "LinkedIn session is not signed in".into(),
            ));
        }

        info!("LinkedIn session authenticated");
        live.authenticated = true;
        Ok(live.page.clone())
    }

    /// Open a headed window and wait until the user reaches the feed
    pub async fn interactive_login(&self, timeout: Duration) -> Result<()> {
        let page = self.page().await?;
        page.goto("https://www.linkedin.com/login").await?;
        info!("Sign in to LinkedIn in the opened window");

        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let url = page.current_url().await.unwrap_or_default();
            if url.contains("linkedin.com/feed") {
                info!("Login complete, profile saved to {}", self.config.user_data_dir.display());
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ScraperError::AuthenticationRequired(format!(
                    "login not completed within {}s",
                    timeout.as_secs()
                )));
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
    }

    /// Close the browser; the next call launches a fresh one
    pub async fn close(&self) -> Result<bool> {
        let Some(mut live) = self.live.lock().await.take() else {
            return Ok(false);
        };
        if let Err(e) = live.browser.close().await {
            warn!("Browser close failed: {}", e);
        }
        if let Err(e) = live.browser.wait().await {
            debug!("Browser process wait failed: {}", e);
        }
        live.handler.abort();
        info!("Browser session closed");
        Ok(true)
    }

    async fn launch_if_needed<'a>(&self, slot: &'a mut Option<Live>) -> Result<&'a mut Live> {
        if slot.is_none() {
            *slot = Some(self.launch().await?);
        }
        slot.as_mut()
            .ok_or_else(|| ScraperError::Session("browser slot empty after launch".into()))
    }

    async fn launch(&self) -> Result<Live> {
        std::fs::create_dir_all(&self.config.user_data_dir)
            .map_err(|e| ScraperError::Session(format!("profile dir: {}", e)))?;
        info!(
            "Launching browser (headless: {}, profile: {})",
            self.config.headless,
            self.config.user_data_dir.display()
        );

        let (browser, handler) = Browser::launch(self.config.to_chrome()?)
            .await
            .map_err(|e| ScraperError::Session(format!("failed to launch browser: {}", e)))?;
        let handler = tokio::spawn(handler_loop(handler));

        let page = browser.new_page("about:blank").await?;
        if let Some(cookie) = &self.config.cookie {
            let params = SetCookieParams::builder()
                .name("li_at")
                .value(cookie.as_str())
                .domain(".linkedin.com")
                .path("/")
                .secure(true)
                .http_only(true)
                .build()
                .map_err(ScraperError::Session)?;
            page.execute(params).await?;
            debug!("Injected li_at cookie");
        }

        let page = Arc::new(ChromePage::new(page, self.config.nav_timeout()));
        Ok(Live {
            browser,
            handler,
            page,
            authenticated: false,
        })
    }
}

/// Where tool handlers get their page from
#[async_trait]
pub trait PageProvider: Send + Sync {
    /// A signed-in page ready for scripting
    async fn authenticated_page(&self) -> Result<Arc<dyn PageDriver>>;

    /// Release the browser. Returns false when nothing was running.
    async fn close(&self) -> Result<bool>;
}

#[async_trait]
impl PageProvider for LinkedInSession {
    async fn authenticated_page(&self) -> Result<Arc<dyn PageDriver>> {
        self.ensure_authenticated().await
    }

    async fn close(&self) -> Result<bool> {
        LinkedInSession::close(self).await
    }
}

async fn handler_loop(mut handler: Handler) {
    while let Some(event) = handler.next().await {
        if let Err(e) = event {
            debug!("Browser handler stopped: {}", e);
            break;
        }
    }
}
