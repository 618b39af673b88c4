//! Actions aimed at another member: connect, message, follow, withdraw

use serde::Deserialize;
use tracing::{info, warn};

use super::{isolate, truncate_chars, ActionResult, Actions, Status};
use crate::browser::dom::{self, handle_modal_close};
use crate::error::Result;
use crate::scraping::urls::{profile_url, BASE};

/// Free accounts may attach at most this many characters to an invite
pub const INVITE_NOTE_LIMIT: usize = 200;

const INVITE_DIALOG_STATE: &str = r#"() => {
    const dialogs = document.querySelectorAll('[role="dialog"]');
    for (const dialog of dialogs) {
        const text = dialog.innerText.toLowerCase();
        const buttons = Array.from(dialog.querySelectorAll('button')).map(b => b.innerText.trim());
        if (text.includes('add a note') && text.includes('invitation')) {
            return { type: 'invite_modal', buttons };
        }
        if (text.includes('personalized invitations') ||
            (dialog.querySelector('textarea') && text.includes('personal note'))) {
            return { type: 'note_input_modal', buttons };
        }
        if (text.includes('pending') || text.includes('withdraw')) {
            return { type: 'pending', buttons };
        }
        if (text.includes('already connected') || text.includes('1st degree')) {
            return { type: 'already_connected', buttons };
        }
    }
    const pageText = document.body.innerText.toLowerCase();
    if (pageText.includes('pending')) return { type: 'pending_on_page', buttons: [] };
    return {
        type: 'unknown',
        buttons: [],
        dialogTexts: Array.from(dialogs).map(d => d.innerText.substring(0, 100))
    };
}"#;

const INVITE_MODAL_CLOSED: &str = r#"() => {
    const dialog = document.querySelector('[role="dialog"]');
    if (!dialog) return true;
    const text = dialog.innerText.toLowerCase();
    return !(text.includes('add a note') || text.includes('invitation') || text.includes('personal note'));
}"#;

const CLICK_SEND_MESSAGE: &str = r#"() => {
    for (const btn of document.querySelectorAll('button')) {
        const text = btn.innerText.toLowerCase().trim();
        const label = (btn.getAttribute('aria-label') || '').toLowerCase();
        if (text === 'send' || label.includes('send message') || label === 'send') {
            btn.click();
            return true;
        }
    }
    const submit = document.querySelector('button[type="submit"]');
    if (submit) { submit.click(); return true; }
    return false;
}"#;

const CLICK_FOLLOW: &str = r#"() => {
    for (const btn of document.querySelectorAll('main button')) {
        const text = btn.innerText.trim().toLowerCase();
        const label = (btn.getAttribute('aria-label') || '').toLowerCase();
        if (text === 'following' || label.includes('unfollow')) return 'already_following';
        if (text === 'follow' || (label.includes('follow') && !label.includes('following'))) {
            btn.click();
            return 'clicked';
        }
    }
    return 'not_found';
}"#;

const CLICK_PENDING: &str = r#"() => {
    for (const btn of document.querySelectorAll('main button')) {
        const text = btn.innerText.trim().toLowerCase();
        const label = (btn.getAttribute('aria-label') || '').toLowerCase();
        if (text === 'pending' || label.includes('pending') || label.includes('withdraw')) {
            btn.click();
            return true;
        }
    }
    return false;
}"#;

const CONFIRM_WITHDRAW: &str = r#"() => {
    for (const dialog of document.querySelectorAll('[role="dialog"], .artdeco-modal')) {
        for (const btn of dialog.querySelectorAll('button')) {
            const text = btn.innerText.toLowerCase().trim();
            if (text.includes('withdraw') || text.includes('confirm')) {
                btn.click();
                return true;
            }
        }
    }
    return false;
}"#;

#[derive(Debug, Deserialize)]
struct DialogState {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, rename = "dialogTexts")]
    dialog_texts: Vec<String>,
}

impl Actions {
    /// Send a connection request, optionally with a note
    pub async fn connect_with_person(&self, username: &str, note: Option<&str>) -> Result<ActionResult> {
        let url = profile_url(username);
        let result = isolate(
            self.connect_inner(username, note.filter(|n| !n.is_empty())).await,
            &format!("connecting with {}", username),
        );
        result.map(|r| r.with("profile_url", url))
    }

    async fn connect_inner(&self, username: &str, note: Option<&str>) -> Result<ActionResult> {
        // The custom-invite URL opens the invite dialog directly
        self.open(&format!("{}/preload/custom-invite/?vanityName={}", BASE, username))
            .await?;
        self.settle(2.0).await;

        let state: DialogState = dom::decode(self.run(INVITE_DIALOG_STATE).await?)?;
        info!("Invite dialog state for {}: {}", username, state.kind);

        match state.kind.as_str() {
            "already_connected" => {
                return Ok(ActionResult::new(
                    Status::AlreadyConnected,
                    format!("Already connected with {}", username),
                ))
            }
            "pending" | "pending_on_page" => {
                return Ok(ActionResult::new(
                    Status::Pending,
                    format!("Connection request already pending for {}", username),
                ))
            }
            "invite_modal" => {}
            _ => {
                return Ok(ActionResult::error(format!(
                    "Could not determine invite modal state for {}",
                    username
                ))
                .with("dialog_state", &state.kind)
                .with("dialog_texts", &state.dialog_texts))
            }
        }

        match note {
            Some(note) => {
                if dom::click_dialog_button(self.page(), &["add a note"]).await?.is_some() {
                    self.settle(2.0).await;
                    if !self.wait_for("[role=\"dialog\"] textarea", 5).await? {
                        return Ok(ActionResult::error("Error filling note: note field did not appear"));
                    }
                    self.page()
                        .fill("[role=\"dialog\"] textarea", &truncate_chars(note, INVITE_NOTE_LIMIT))
                        .await?;
                    self.settle(0.5).await;
                    let mut sent = dom::click_dialog_button(self.page(), &["send invitation"]).await?;
                    if sent.is_none() {
                        let exact = dom::ButtonMatch {
                            scope: Some("[role=\"dialog\"]"),
                            exact: true,
                            aria: false,
                        };
                        sent = dom::click_button(self.page(), &["send"], exact).await?;
                    }
                    info!("Send invitation clicked: {} for {}", sent.is_some(), username);
                } else {
                    warn!("Could not find 'Add a note' for {}, sending without", username);
                    dom::click_dialog_button(self.page(), &["send without"]).await?;
                }
            }
            None => {
                let sent = dom::click_dialog_button(self.page(), &["send without"]).await?;
                info!("Send without note clicked: {} for {}", sent.is_some(), username);
            }
        }

        self.settle(2.0).await;
        let closed = self.run(INVITE_MODAL_CLOSED).await?.as_bool().unwrap_or(false);
        if closed {
            let suffix = if note.is_some() { " with note" } else { "" };
            Ok(ActionResult::success(format!(
                "Connection request sent to {}{}",
                username, suffix
            )))
        } else {
            Ok(ActionResult::new(
                Status::Partial,
                format!("Modal may still be visible for {}", username),
            ))
        }
    }

    /// Send a direct message through the compose window
    pub async fn send_message(&self, username: &str, message: &str) -> Result<ActionResult> {
        let url = profile_url(username);
        let result = isolate(
            self.send_message_inner(username, message).await,
            "sending message",
        );
        result.map(|r| r.with("profile_url", url))
    }

    async fn send_message_inner(&self, username: &str, message: &str) -> Result<ActionResult> {
        self.open(&format!("{}/messaging/compose/?recipients={}", BASE, username))
            .await?;
        self.settle(2.0).await;

        let compose = match self.find_compose_box().await? {
            Some(selector) => selector,
            None => {
                return Ok(ActionResult::error(format!(
                    "Message compose area not found for {}. They may have messaging disabled.",
                    username
                )))
            }
        };

        self.page().fill(compose, message).await?;
        info!("Filled message for {}", username);
        self.settle(0.5).await;

        if self.run(CLICK_SEND_MESSAGE).await?.as_bool().unwrap_or(false) {
            self.settle(2.0).await;
            Ok(ActionResult::success(format!("Message sent to {}", username)))
        } else {
            Ok(ActionResult::error(format!(
                "Could not find send button for {}",
                username
            )))
        }
    }

    /// First visible message box on the page, if any
    pub(crate) async fn find_compose_box(&self) -> Result<Option<&'static str>> {
        const CANDIDATES: &[&str] = &[
            ".msg-form__contenteditable",
            "[role=\"textbox\"]",
            "textarea[name=\"message\"]",
        ];
        if !self.wait_for(&CANDIDATES.join(", "), 10).await? {
            return Ok(None);
        }
        self.first_existing(CANDIDATES).await
    }

    /// Follow a member from their profile page
    pub async fn follow_person(&self, username: &str) -> Result<ActionResult> {
        let url = profile_url(username);
        let result = isolate(self.follow_inner(username, &url).await, "following");
        result.map(|r| r.with("profile_url", url))
    }

    async fn follow_inner(&self, username: &str, url: &str) -> Result<ActionResult> {
        self.open(url).await?;
        if !self.wait_for("main", 10).await? {
            return Ok(ActionResult::error(format!(
                "Profile page did not load for {}",
                username
            )));
        }
        self.settle(1.5).await;
        handle_modal_close(self.page()).await;

        let outcome = self.run(CLICK_FOLLOW).await?;
        match outcome.as_str().unwrap_or("not_found") {
            "already_following" => Ok(ActionResult::new(
                Status::AlreadyFollowing,
                format!("Already following {}", username),
            )),
            "clicked" => {
                self.settle(1.0).await;
                Ok(ActionResult::success(format!("Now following {}", username)))
            }
            _ => Ok(ActionResult::error(format!(
                "Follow button not found for {}",
                username
            ))),
        }
    }

    /// Withdraw a pending invitation from the member's profile
    pub async fn withdraw_connection(&self, username: &str) -> Result<ActionResult> {
        let url = profile_url(username);
        let result = isolate(self.withdraw_inner(username, &url).await, "withdrawing");
        result.map(|r| r.with("profile_url", url))
    }

    async fn withdraw_inner(&self, username: &str, url: &str) -> Result<ActionResult> {
        self.open(url).await?;
        if !self.wait_for("main", 10).await? {
            return Ok(ActionResult::error(format!(
                "Profile page did not load for {}",
                username
            )));
        }
        self.settle(1.5).await;
        handle_modal_close(self.page()).await;

        if !self.run(CLICK_PENDING).await?.as_bool().unwrap_or(false) {
            return Ok(ActionResult::new(
                Status::NoPending,
                format!("No pending connection request for {}", username),
            ));
        }

        self.settle(1.5).await;
        if self.run(CONFIRM_WITHDRAW).await?.as_bool().unwrap_or(false) {
            self.settle(1.0).await;
            Ok(ActionResult::success(format!(
                "Withdrawn connection request from {}",
                username
            )))
        } else {
            Ok(ActionResult::error(format!(
                "Could not confirm withdrawal for {}",
                username
            )))
        }
    }
}

