//! Scripted in-memory page used by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use linkedin_mcp::{PageDriver, PageProvider, Result, ScraperError};

enum Reply {
    Value(Value),
    Fail,
}

/// A page that answers scripts by substring match.
///
/// Region text scripts pop from a queue, one entry per attempt. Selector
/// waits always succeed and mark the page rendered. The document never
/// grows, so scrolling stops immediately.
#[derive(Default)]
pub struct ScriptedPage {
    url: Mutex<String>,
    redirect: Mutex<Option<String>>,
    probe: Mutex<Option<Value>>,
    loading_probe: Mutex<Option<Value>>,
    rendered: Mutex<bool>,
    texts: Mutex<VecDeque<std::result::Result<String, ScraperError>>>,
    replies: Mutex<Vec<(String, Reply)>>,
    visited: Mutex<Vec<String>>,
    typed: Mutex<String>,
}

impl ScriptedPage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the raw innerText of the next region read
    pub fn push_text(&self, text: &str) {
        self.texts.lock().unwrap().push_back(Ok(text.to_string()));
    }

    /// Make the next region read fail
    pub fn push_error(&self, err: ScraperError) {
        self.texts.lock().unwrap().push_back(Err(err));
    }

    /// Pretend every navigation ends at `url`
    pub fn redirect_to(&self, url: &str) {
        *self.redirect.lock().unwrap() = Some(url.to_string());
    }

    /// Override the rate-limit probe result
    pub fn set_probe(&self, probe: Value) {
        *self.probe.lock().unwrap() = Some(probe);
    }

    /// Probe result seen before any selector wait since the last `goto`,
    /// while the page shell is still rendering
    pub fn set_loading_probe(&self, probe: Value) {
        *self.loading_probe.lock().unwrap() = Some(probe);
    }

    /// Answer scripts containing `needle` with `value`
    pub fn reply(&self, needle: &str, value: Value) {
        self.replies
            .lock()
            .unwrap()
            .push((needle.to_string(), Reply::Value(value)));
    }

    /// Fail scripts containing `needle`
    pub fn fail(&self, needle: &str) {
        self.replies.lock().unwrap().push((needle.to_string(), Reply::Fail));
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    pub fn typed(&self) -> String {
        self.typed.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageDriver for ScriptedPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.visited.lock().unwrap().push(url.to_string());
        *self.url.lock().unwrap() = url.to_string();
        *self.rendered.lock().unwrap() = false;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        if let Some(redirect) = self.redirect.lock().unwrap().clone() {
            return Ok(redirect);
        }
        Ok(self.url.lock().unwrap().clone())
    }

    async fn evaluate(&self, expression: &str) -> Result<Value> {
        if expression.contains("captcha") {
            if !*self.rendered.lock().unwrap() {
                if let Some(loading) = self.loading_probe.lock().unwrap().clone() {
                    return Ok(loading);
                }
            }
            let probe = self.probe.lock().unwrap().clone();
            return Ok(probe.unwrap_or_else(|| json!({"mainText": 5000, "body": "", "captcha": false})));
        }
        if expression.contains("scrollHeight : 0") {
            return Ok(json!(0));
        }
        if expression.contains("!!document.querySelector(sel)") {
            *self.rendered.lock().unwrap() = true;
            return Ok(json!(true));
        }
        if expression.contains("aria-label=\"Dismiss\"") {
            return Ok(json!(false));
        }
        for (needle, reply) in self.replies.lock().unwrap().iter() {
            if expression.contains(needle.as_str()) {
                return match reply {
                    Reply::Value(value) => Ok(value.clone()),
                    Reply::Fail => Err(ScraperError::Script(format!("scripted failure on {}", needle))),
                };
            }
        }
        if expression.contains("innerText") {
            return match self.texts.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(Value::String(text)),
                Some(Err(e)) => Err(e),
                None => Ok(Value::String(String::new())),
            };
        }
        Ok(Value::Null)
    }

    async fn click(&self, _selector: &str) -> Result<()> {
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        self.typed.lock().unwrap().push_str(text);
        Ok(())
    }

    async fn press_key(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

/// Hands out one scripted page, or a fixed sign-in failure
pub struct FakeProvider {
    pub page: Arc<ScriptedPage>,
    signed_out: bool,
    closed: AtomicBool,
}

impl FakeProvider {
    pub fn new(page: Arc<ScriptedPage>) -> Arc<Self> {
        Arc::new(Self {
            page,
            signed_out: false,
            closed: AtomicBool::new(false),
        })
    }

    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self {
            page: ScriptedPage::new(),
            signed_out: true,
            closed: AtomicBool::new(false),
        })
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageProvider for FakeProvider {
    async fn authenticated_page(&self) -> Result<Arc<dyn PageDriver>> {
        if self.signed_out {
            return Err(ScraperError::AuthenticationRequired(
                "LinkedIn session is not signed in".into(),
            ));
        }
        Ok(self.page.clone())
    }

    async fn close(&self) -> Result<bool> {
        Ok(!self.closed.swap(true, Ordering::SeqCst))
    }
}
