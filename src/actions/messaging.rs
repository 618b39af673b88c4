//! Inbox reading and conversation housekeeping

use serde_json::{json, Value};

use super::{isolate, list_field, ActionResult, Actions};
use crate::error::Result;
use crate::scraping::urls::BASE;

const MAX_THREAD_MESSAGES: usize = 20;
const MAX_CONVERSATIONS: usize = 15;

const THREAD_MESSAGES: &str = r#"() => {
    const messages = [];
    for (const el of document.querySelectorAll('.msg-s-message-list__event, .msg-s-event-listitem')) {
        const senderEl = el.querySelector('.msg-s-message-group__name, .msg-s-event-listitem__sender');
        const contentEl = el.querySelector('.msg-s-event-listitem__body, .msg-s-message-group__content');
        const timeEl = el.querySelector('.msg-s-message-list__time-heading, time');
        if (contentEl) {
            messages.push({
                sender: senderEl ? senderEl.innerText.trim() : 'Unknown',
                content: contentEl.innerText.trim(),
                time: timeEl ? timeEl.innerText.trim() : ''
            });
        }
    }
    return messages;
}"#;

const CONVERSATION_LIST: &str = r#"() => {
    const conversations = [];
    const items = document.querySelectorAll('.msg-conversation-listitem, .msg-conversations-container__convo-item');
    for (const el of items) {
        const nameEl = el.querySelector('.msg-conversation-listitem__participant-names, .msg-conversation-card__participant-names');
        const previewEl = el.querySelector('.msg-conversation-listitem__message-snippet, .msg-conversation-card__message-snippet');
        const timeEl = el.querySelector('.msg-conversation-listitem__time-stamp, .msg-conversation-card__time-stamp');
        const linkEl = el.querySelector('a[href*="/messaging/"]');
        const unreadEl = el.querySelector('.msg-conversation-listitem__unread-count, .notification-badge');
        if (!nameEl) continue;
        const match = linkEl ? linkEl.href.match(/thread\/([^\/\?]+)/) : null;
        conversations.push({
            name: nameEl.innerText.trim(),
            last_message: previewEl ? previewEl.innerText.trim() : '',
            time: timeEl ? timeEl.innerText.trim() : '',
            unread: unreadEl ? (parseInt(unreadEl.innerText.trim(), 10) || 1) : 0,
            thread_id: match ? match[1] : ''
        });
    }
    return conversations;
}"#;

const OPEN_CONVERSATION: &str = r#"(username) => {
    const wanted = username.toLowerCase();
    const cards = document.querySelectorAll(
        '[class*="msg-conversation-card"], li[class*="message"], [data-control-name*="conversation"]'
    );
    for (const conv of cards) {
        const link = conv.querySelector('a');
        const href = link ? link.href : '';
        if (conv.innerText.toLowerCase().includes(wanted) || href.includes(username)) {
            conv.click();
            return true;
        }
    }
    for (const r of document.querySelectorAll('[role="option"], [role="listitem"]')) {
        if (r.innerText.toLowerCase().includes(wanted)) {
            r.click();
            return true;
        }
    }
    return false;
}"#;

const SCROLL_THREAD_TOP: &str = r#"() => {
    const list = document.querySelector('[class*="msg-s-message-list"], [class*="conversation-content"]');
    if (list) list.scrollTop = 0;
    return !!list;
}"#;

const CONVERSATION_MESSAGES: &str = r#"({ limit, username }) => {
    const messages = [];
    const events = document.querySelectorAll(
        '[class*="msg-s-message-list__event"], [class*="message-event"], .msg-s-event-listitem'
    );
    for (const msg of events) {
        if (messages.length >= limit) break;
        const senderEl = msg.querySelector(
            '[class*="msg-s-message-group__name"], .msg-s-message-group__profile-link, [class*="actor-name"]'
        );
        const textEl = msg.querySelector(
            '[class*="msg-s-event-listitem__body"], .msg-s-event__content, [class*="message-body"], p'
        );
        const timeEl = msg.querySelector('time, [class*="msg-s-message-group__timestamp"], [class*="time"]');
        const sender = senderEl && senderEl.innerText ? senderEl.innerText.trim() : '';
        const text = textEl && textEl.innerText ? textEl.innerText.trim() : '';
        if (!text) continue;
        const isYou = msg.classList.toString().includes('outgoing') ||
            msg.querySelector('[class*="outgoing"]') !== null ||
            sender.toLowerCase() === 'you';
        messages.push({
            sender: isYou ? 'You' : (sender || username),
            text,
            time: timeEl ? (timeEl.innerText.trim() || timeEl.getAttribute('datetime')) : null,
            is_you: isYou
        });
    }
    if (messages.length === 0) {
        const thread = document.querySelector('[class*="msg-s-message-list"], [class*="conversation"]');
        if (thread) return { raw_text: thread.innerText.slice(0, 5000), messages: [] };
    }
    return { messages: messages.reverse() };
}"#;

const OPEN_CONVERSATION_MENU: &str = r#"(username) => {
    const wanted = username.toLowerCase();
    for (const conv of document.querySelectorAll('[class*="msg-conversation-card"], li[class*="conversation"]')) {
        const link = conv.querySelector('a');
        const href = link ? link.href : '';
        if (!conv.innerText.toLowerCase().includes(wanted) && !href.includes(username)) continue;
        const options = conv.querySelector(
            'button[aria-label*="option"], button[aria-label*="more"], [data-control-name*="option"]'
        );
        if (options) {
            options.click();
        } else {
            conv.dispatchEvent(new MouseEvent('contextmenu', { bubbles: true }));
        }
        return true;
    }
    return false;
}"#;

const CLICK_ARCHIVE: &str = r#"() => {
    for (const item of document.querySelectorAll('[role="menuitem"], [role="option"], button, [class*="dropdown__item"]')) {
        if (item.innerText.toLowerCase().includes('archive')) {
            item.click();
            return true;
        }
    }
    return false;
}"#;

impl Actions {
    /// Inbox overview, or the latest messages with one member
    pub async fn get_messages(&self, username: Option<&str>) -> Result<ActionResult> {
        let username = username.filter(|u| !u.is_empty());
        isolate(self.messages_inner(username).await, "getting messages")
    }

    async fn messages_inner(&self, username: Option<&str>) -> Result<ActionResult> {
        match username {
            Some(username) => {
                self.open(&format!("{}/messaging/thread/new/?recipients={}", BASE, username))
                    .await?;
                self.settle(2.0).await;

                let all = self.run(THREAD_MESSAGES).await?.as_array().cloned().unwrap_or_default();
                let message = format!("Found {} messages with {}", all.len(), username);
                let recent = all[all.len().saturating_sub(MAX_THREAD_MESSAGES)..].to_vec();
                Ok(ActionResult::success(message)
                    .with("messages", recent)
                    .with("conversation_with", username))
            }
            None => {
                self.open(&format!("{}/messaging/", BASE)).await?;
                self.settle(2.0).await;

                let mut conversations = self
                    .run(CONVERSATION_LIST)
                    .await?
                    .as_array()
                    .cloned()
                    .unwrap_or_default();
                let message = format!("Found {} conversations", conversations.len());
                conversations.truncate(MAX_CONVERSATIONS);
                Ok(ActionResult::success(message).with("conversations", conversations))
            }
        }
    }

    /// Full thread with one member, oldest first
    pub async fn get_conversation(&self, username: &str, limit: u32) -> Result<ActionResult> {
        isolate(self.conversation_inner(username, limit).await, "getting conversation")
    }

    async fn conversation_inner(&self, username: &str, limit: u32) -> Result<ActionResult> {
        self.search_inbox(username).await?;

        if !self.call(OPEN_CONVERSATION, json!(username)).await?.as_bool().unwrap_or(false) {
            return Ok(ActionResult::error(format!(
                "Conversation with {} not found",
                username
            )));
        }
        self.settle(2.0).await;
        self.run(SCROLL_THREAD_TOP).await?;
        self.settle(1.0).await;

        let data = self
            .call(CONVERSATION_MESSAGES, json!({ "limit": limit, "username": username }))
            .await?;
        let messages = list_field(&data, "messages");
        let raw_text = data.get("raw_text").cloned().unwrap_or(Value::Null);

        Ok(ActionResult::success(format!(
            "Retrieved {} messages with {}",
            messages.len(),
            username
        ))
        .with("conversation_with", username)
        .with("messages_count", messages.len())
        .with("messages", messages)
        .with("raw_text", raw_text))
    }

    /// Move a conversation out of the inbox
    pub async fn archive_conversation(&self, username: &str) -> Result<ActionResult> {
        isolate(self.archive_inner(username).await, "archiving conversation")
    }

    async fn archive_inner(&self, username: &str) -> Result<ActionResult> {
        self.open(&format!("{}/messaging/", BASE)).await?;
        self.settle(2.0).await;

        if !self
            .call(OPEN_CONVERSATION_MENU, json!(username))
            .await?
            .as_bool()
            .unwrap_or(false)
        {
            return Ok(ActionResult::error(format!(
                "Conversation with {} not found",
                username
            )));
        }
        self.settle(1.0).await;

        if !self.run(CLICK_ARCHIVE).await?.as_bool().unwrap_or(false) {
            return Ok(ActionResult::error("Archive option not found in menu"));
        }
        self.settle(1.0).await;
        Ok(ActionResult::success(format!(
            "Conversation with {} archived",
            username
        )))
    }

    /// Open the inbox and type into its search box when there is one
    async fn search_inbox(&self, query: &str) -> Result<()> {
        self.open(&format!("{}/messaging/", BASE)).await?;
        self.settle(2.0).await;
        let search = self
            .first_existing(&["input[placeholder*=\"Search messages\"]", "input[aria-label*=\"Search\"]"])
            .await?;
        if let Some(selector) = search {
            self.page().fill(selector, query).await?;
            self.settle(1.0).await;
        }
        Ok(())
    }
}
