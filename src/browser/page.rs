//! Page driver abstraction
//!
//! Scripts only need a narrow slice of a browser tab. `PageDriver` is that
//! slice; `ChromePage` implements it over a Chrome DevTools Protocol page.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{Result, ScraperError};

const SELECTOR_POLL: Duration = Duration::from_millis(250);

#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate and wait for the document to load
    async fn goto(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// Evaluate a JS expression, awaiting promises, and return its JSON value
    async fn evaluate(&self, expression: &str) -> Result<Value>;

    /// Click the first element matching a CSS selector
    async fn click(&self, selector: &str) -> Result<()>;

    /// Type text into the focused element
    async fn type_text(&self, text: &str) -> Result<()>;

    async fn press_key(&self, key: &str) -> Result<()>;

    /// Invoke a JS function source with JSON arguments
    async fn call(&self, function: &str, args: Value) -> Result<Value> {
        let expression = format!("({})({})", function, args);
        self.evaluate(&expression).await
    }

    /// Invoke a zero-argument JS function source
    async fn run(&self, function: &str) -> Result<Value> {
        let expression = format!("({})()", function);
        self.evaluate(&expression).await
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        let found = self
            .call(
                "(sel) => { try { return !!document.querySelector(sel); } catch (e) { return false; } }",
                Value::String(selector.to_string()),
            )
            .await?;
        Ok(found.as_bool().unwrap_or(false))
    }

    /// Poll until an element matching `selector` exists
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.exists(selector).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ScraperError::Timeout(format!(
                    "waiting for `{}` ({}ms)",
                    selector,
                    timeout.as_millis()
                )));
            }
            tokio::time::sleep(SELECTOR_POLL).await;
        }
    }

    /// Focus an input, textarea or contenteditable, clear it and type `text`
    async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        let focused = self.call(FOCUS_AND_CLEAR, Value::String(selector.to_string())).await?;
        if !focused.as_bool().unwrap_or(false) {
            return Err(ScraperError::Script(format!("no fillable element for `{}`", selector)));
        }
        self.type_text(text).await
    }
}

const FOCUS_AND_CLEAR: &str = r#"(sel) => {
    const el = document.querySelector(sel);
    if (!el) return false;
    el.scrollIntoView({ block: 'center' });
    el.focus();
    if (el.isContentEditable) {
        const range = document.createRange();
        range.selectNodeContents(el);
        const selection = window.getSelection();
        selection.removeAllRanges();
        selection.addRange(range);
        document.execCommand('delete');
    } else if ('value' in el) {
        el.select && el.select();
        el.value = '';
        el.dispatchEvent(new Event('input', { bubbles: true }));
    }
    return true;
}"#;

/// `PageDriver` over a chromiumoxide page
#[derive(Clone)]
pub struct ChromePage {
    page: Page,
    nav_timeout: Duration,
}

impl ChromePage {
    pub fn new(page: Page, nav_timeout: Duration) -> Self {
        Self { page, nav_timeout }
    }

    async fn key_event(&self, kind: DispatchKeyEventType, key: &str) -> Result<()> {
        let mut builder = DispatchKeyEventParams::builder().r#type(kind.clone()).key(key);
        if let Some((code, text)) = special_key(key) {
            builder = builder
                .code(key)
                .windows_virtual_key_code(code)
                .native_virtual_key_code(code);
            if kind == DispatchKeyEventType::KeyDown && !text.is_empty() {
                builder = builder.text(text);
            }
        }
        let params = builder.build().map_err(ScraperError::Browser)?;
        self.page.execute(params).await?;
        Ok(())
    }
}

fn special_key(key: &str) -> Option<(i64, &'static str)> {
    match key {
        "Enter" => Some((13, "\r")),
        "Tab" => Some((9, "")),
        "Escape" => Some((27, "")),
        "Backspace" => Some((8, "")),
        "ArrowDown" => Some((40, "")),
        "ArrowUp" => Some((38, "")),
        _ => None,
    }
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!("goto {}", url);
        match tokio::time::timeout(self.nav_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(ScraperError::Navigation(format!("{}: {}", url, e))),
            Err(_) => Err(ScraperError::Timeout(format!(
                "navigation to {} exceeded {}s",
                url,
                self.nav_timeout.as_secs()
            ))),
        }
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn evaluate(&self, expression: &str) -> Result<Value> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(ScraperError::Script)?;
        let result = self.page.evaluate_expression(params).await?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self.page.find_element(selector).await?;
        element.scroll_into_view().await?;
        element.click().await?;
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        for c in text.chars() {
            let key = if c == '\n' { "\r".to_string() } else { c.to_string() };
            let params = DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::Char)
                .text(key)
                .build()
                .map_err(ScraperError::Browser)?;
            self.page.execute(params).await?;
        }
        Ok(())
    }

    async fn press_key(&self, key: &str) -> Result<()> {
        self.key_event(DispatchKeyEventType::KeyDown, key).await?;
        self.key_event(DispatchKeyEventType::KeyUp, key).await
    }
}
