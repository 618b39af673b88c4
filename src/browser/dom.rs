//! Shared in-page helpers
//!
//! Rate-limit detection, modal dismissal and lazy-load scrolling, plus the
//! small JS snippets the action scripts keep reaching for.

use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::page::PageDriver;
use crate::error::{Result, ScraperError};

const RATE_LIMIT_PHRASES: &[&str] = &[
    "too many requests",
    "rate limit",
    "slow down",
    "try again later",
];

const PROBE_PAGE: &str = r#"() => {
    const main = document.querySelector('main');
    const mainText = main ? main.innerText.length : 0;
    const body = document.body ? document.body.innerText.slice(0, 2000).toLowerCase() : '';
    const captcha = !!document.querySelector(
        'iframe[title*="captcha" i], iframe[src*="captcha"], #captcha-internal'
    );
    return { mainText, body, captcha };
}"#;

/// Raise a classified error when navigation ended on a checkpoint or sign-in
/// page
pub async fn detect_redirect(page: &dyn PageDriver) -> Result<()> {
    let url = page.current_url().await?;
    if is_checkpoint_url(&url) {
        return Err(ScraperError::SecurityChallenge(format!(
            "LinkedIn security checkpoint at {}",
            url
        )));
    }
    if is_login_url(&url) {
        return Err(ScraperError::AuthenticationRequired(format!(
            "redirected to sign-in at {}",
            url
        )));
    }
    Ok(())
}

/// Raise a classified error when LinkedIn blocks or challenges the session.
///
/// The phrase check trusts a short `main`, so call this once the page has
/// rendered; right after `goto` a SPA shell is short too.
pub async fn detect_rate_limit(page: &dyn PageDriver) -> Result<()> {
    detect_redirect(page).await?;

    let probe = page.run(PROBE_PAGE).await?;
    if probe["captcha"].as_bool().unwrap_or(false) {
        return Err(ScraperError::SecurityChallenge("CAPTCHA challenge detected".into()));
    }

    // Pages with real content never carry these phrases in a short body
    let main_text = probe["mainText"].as_u64().unwrap_or(0);
    if main_text < 200 {
        let body = probe["body"].as_str().unwrap_or("");
        if let Some(phrase) = RATE_LIMIT_PHRASES.iter().find(|p| body.contains(*p)) {
            return Err(ScraperError::RateLimited(format!(
                "page reports \"{}\"",
                phrase
            )));
        }
    }
    Ok(())
}

pub fn is_checkpoint_url(url: &str) -> bool {
    url.contains("linkedin.com/checkpoint")
}

pub fn is_login_url(url: &str) -> bool {
    url.contains("linkedin.com/login")
        || url.contains("linkedin.com/uas/login")
        || url.contains("linkedin.com/authwall")
        || url.contains("linkedin.com/signup")
}

const DISMISS_MODAL: &str = r#"() => {
    const selectors = [
        'button[aria-label="Dismiss"]',
        '.artdeco-modal__dismiss',
        'button.msg-overlay-bubble-header__control--close',
        'button[data-test-modal-close-btn]'
    ];
    for (const sel of selectors) {
        const btn = document.querySelector(sel);
        if (btn && btn.offsetParent !== null) {
            btn.click();
            return true;
        }
    }
    return false;
}"#;

/// Close a blocking modal if one is visible. Returns whether one was closed.
pub async fn handle_modal_close(page: &dyn PageDriver) -> bool {
    match page.run(DISMISS_MODAL).await {
        Ok(closed) => {
            let closed = closed.as_bool().unwrap_or(false);
            if closed {
                debug!("Dismissed blocking modal");
            }
            closed
        }
        Err(e) => {
            debug!("Modal dismissal skipped: {}", e);
            false
        }
    }
}

/// Scroll until the document stops growing or `max_scrolls` is reached
pub async fn scroll_to_bottom(page: &dyn PageDriver, pause: Duration, max_scrolls: u32) -> Result<()> {
    let mut height = scroll_height(page).await?;
    if height == 0 {
        return Ok(());
    }
    for _ in 0..max_scrolls {
        page.run("() => { window.scrollTo(0, document.body.scrollHeight); return true; }")
            .await?;
        tokio::time::sleep(pause).await;
        let next = scroll_height(page).await?;
        if next == height {
            break;
        }
        height = next;
    }
    Ok(())
}

async fn scroll_height(page: &dyn PageDriver) -> Result<u64> {
    let value = page
        .run("() => document.body ? document.body.scrollHeight : 0")
        .await?;
    Ok(value.as_f64().map(|h| h.max(0.0) as u64).unwrap_or(0))
}

/// Scroll a fixed number of times without checking height, for feeds that
/// keep growing
pub async fn scroll_times(page: &dyn PageDriver, pause: Duration, times: u32) -> Result<()> {
    for _ in 0..times {
        page.run("() => { window.scrollTo(0, document.body.scrollHeight); return true; }")
            .await?;
        tokio::time::sleep(pause).await;
    }
    Ok(())
}

const CLICK_BUTTON: &str = r#"({ scope, needles, exact, aria }) => {
    const root = scope ? document.querySelector(scope) : document;
    if (!root) return null;
    const buttons = root.querySelectorAll('button, [role="button"]');
    for (const btn of buttons) {
        if (btn.disabled) continue;
        const text = (btn.innerText || '').trim().toLowerCase();
        const label = (btn.getAttribute('aria-label') || '').toLowerCase();
        for (const needle of needles) {
            const hit = exact
                ? text === needle || (aria && label === needle)
                : text.includes(needle) || (aria && label.includes(needle));
            if (hit) {
                btn.click();
                return text || label;
            }
        }
    }
    return null;
}"#;

/// Which buttons `click_button` considers
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonMatch<'a> {
    /// Only search inside the first element matching this selector
    pub scope: Option<&'a str>,
    /// Require the whole text to equal a needle
    pub exact: bool,
    /// Also compare against `aria-label`
    pub aria: bool,
}

/// Click the first enabled button whose text contains one of `needles`
/// (lowercase). Returns the matched label.
pub async fn click_button(page: &dyn PageDriver, needles: &[&str], how: ButtonMatch<'_>) -> Result<Option<String>> {
    let args = json!({
        "scope": how.scope,
        "needles": needles,
        "exact": how.exact,
        "aria": how.aria,
    });
    let clicked = page.call(CLICK_BUTTON, args).await?;
    Ok(clicked.as_str().map(str::to_string))
}

/// Click inside the open dialog
pub async fn click_dialog_button(page: &dyn PageDriver, needles: &[&str]) -> Result<Option<String>> {
    click_button(
        page,
        needles,
        ButtonMatch {
            scope: Some("[role=\"dialog\"]"),
            exact: false,
            aria: true,
        },
    )
    .await
}

const FILL_FIELD: &str = r#"({ selectors, value }) => {
    for (const sel of selectors) {
        const el = document.querySelector(sel);
        if (!el) continue;
        el.scrollIntoView({ block: 'center' });
        el.focus();
        if (el.tagName === 'SELECT') {
            const wanted = String(value).toLowerCase();
            const opt = Array.from(el.options).find(o =>
                o.value.toLowerCase() === wanted || o.text.trim().toLowerCase() === wanted
            ) || Array.from(el.options).find(o => o.text.trim().toLowerCase().includes(wanted));
            if (!opt) return null;
            el.value = opt.value;
        } else if (el.isContentEditable) {
            el.innerText = value;
        } else {
            const proto = el.tagName === 'TEXTAREA'
                ? window.HTMLTextAreaElement.prototype
                : window.HTMLInputElement.prototype;
            const setter = Object.getOwnPropertyDescriptor(proto, 'value').set;
            setter.call(el, value);
        }
        el.dispatchEvent(new Event('input', { bubbles: true }));
        el.dispatchEvent(new Event('change', { bubbles: true }));
        return sel;
    }
    return null;
}"#;

/// Set the value of the first matching input, textarea, select or
/// contenteditable through the native setter so framework listeners fire.
/// Returns the selector that matched.
pub async fn fill_field(page: &dyn PageDriver, selectors: &[&str], value: &str) -> Result<Option<String>> {
    let filled = page
        .call(FILL_FIELD, json!({ "selectors": selectors, "value": value }))
        .await?;
    Ok(filled.as_str().map(str::to_string))
}

const SELECT_BY_LABEL: &str = r#"({ labels, option }) => {
    const wanted = option.toLowerCase();
    for (const select of document.querySelectorAll('select')) {
        const labelEl = select.id ? document.querySelector(`label[for="${select.id}"]`) : null;
        const text = ((labelEl && labelEl.innerText) || select.getAttribute('aria-label') || '').toLowerCase();
        if (!labels.some(l => text.includes(l))) continue;
        for (const opt of select.options) {
            if (opt.innerText.toLowerCase().includes(wanted)) {
                select.value = opt.value;
                select.dispatchEvent(new Event('change', { bubbles: true }));
                return true;
            }
        }
    }
    return false;
}"#;

/// Choose the option containing `option` in a select labelled with any of
/// `labels` (lowercase)
pub async fn select_by_label(page: &dyn PageDriver, labels: &[&str], option: &str) -> Result<bool> {
    let picked = page
        .call(SELECT_BY_LABEL, json!({ "labels": labels, "option": option }))
        .await?;
    Ok(picked.as_bool().unwrap_or(false))
}

/// Read the open dialog's text, lowercase
pub async fn dialog_text(page: &dyn PageDriver) -> Result<String> {
    let text = page
        .run(
            r#"() => {
                const d = document.querySelector('[role="dialog"]');
                return d ? d.innerText.toLowerCase() : '';
            }"#,
        )
        .await?;
    Ok(text.as_str().unwrap_or("").to_string())
}

/// Decode a JS result into a typed value, treating `null` as missing
pub fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        warn!("Unexpected script result shape: {}", e);
        ScraperError::Script(e.to_string())
    })
}
