//! My Network: invitations, connections, notifications, endorsements

use serde_json::{json, Value};
use std::collections::HashSet;
use tracing::info;

use super::{isolate, list_field, str_field, ActionResult, Actions, Status};
use crate::browser::dom;
use crate::error::Result;
use crate::scraping::urls::{profile_url, BASE};

const MAX_SUGGESTIONS: usize = 10;

const NETWORK_OVERVIEW: &str = r#"() => {
    const result = { pending_invitations: [], suggestions: [] };
    const inviteCards = document.querySelectorAll('.invitation-card, [data-view-name="profile-pending-invite-card"]');
    inviteCards.forEach(card => {
        const nameEl = card.querySelector('.invitation-card__name, a[href*="/in/"]');
        const headlineEl = card.querySelector('.invitation-card__subtitle, .invitation-card__occupation');
        const linkEl = card.querySelector('a[href*="/in/"]');
        if (nameEl) {
            result.pending_invitations.push({
                name: nameEl.innerText.trim(),
                headline: headlineEl ? headlineEl.innerText.trim() : '',
                profile_url: linkEl ? linkEl.href : ''
            });
        }
    });
    const suggestionCards = document.querySelectorAll('.discover-entity-card, .mn-pymk-list__card');
    suggestionCards.forEach(card => {
        const nameEl = card.querySelector('.discover-person-card__name, .mn-connection-card__name');
        const headlineEl = card.querySelector('.discover-person-card__occupation, .mn-connection-card__occupation');
        const linkEl = card.querySelector('a[href*="/in/"]');
        if (nameEl && linkEl) {
            const profileUrl = linkEl.href.split('?')[0];
            const username = (profileUrl.split('/in/')[1] || '').replace('/', '');
            result.suggestions.push({
                name: nameEl.innerText.trim(),
                headline: headlineEl ? headlineEl.innerText.trim() : '',
                profile_url: profileUrl,
                username
            });
        }
    });
    return result;
}"#;

const PENDING_INVITATIONS: &str = r#"() => {
    const items = [];
    for (const card of document.querySelectorAll('[class*="invitation-card"], li[class*="invitation"]')) {
        const nameEl = card.querySelector('strong, [class*="name"]');
        const subtitleEl = card.querySelector('[class*="subtitle"], [class*="headline"]');
        const imgEl = card.querySelector('img');
        const linkEl = card.querySelector('a[href*="/in/"]');
        const name = nameEl ? nameEl.innerText.trim() : '';
        if (name) {
            items.push({
                name,
                headline: subtitleEl ? subtitleEl.innerText.trim() : '',
                profile_url: linkEl ? linkEl.href : '',
                profile_image: imgEl ? imgEl.src : ''
            });
        }
    }
    for (const li of document.querySelectorAll('main ul li')) {
        const linkEl = li.querySelector('a[href*="/in/"]');
        const acceptBtn = li.querySelector('button[aria-label*="Accept"]');
        if (acceptBtn && linkEl) {
            const lines = li.innerText.split('\n').filter(l => l.trim());
            items.push({ name: lines[0] || '', headline: lines[1] || '', profile_url: linkEl.href });
        }
    }
    return items;
}"#;

/// Click the accept or ignore button of the invitation naming a person
const ANSWER_INVITATION: &str = r#"({ name, verb, label }) => {
    const wanted = name.toLowerCase();
    for (const btn of document.querySelectorAll('button')) {
        const aria = (btn.getAttribute('aria-label') || '').toLowerCase();
        if (aria.includes(verb) && aria.includes(wanted)) {
            btn.click();
            return true;
        }
    }
    for (const card of document.querySelectorAll('li')) {
        if (card.innerText.toLowerCase().includes(wanted)) {
            const btn = card.querySelector(`button[aria-label*="${label}"]`);
            if (btn) { btn.click(); return true; }
        }
    }
    return false;
}"#;

const CONNECTIONS: &str = r#"(maxCount) => {
    const items = [];
    const usernameOf = href => (href.match(/\/in\/([^\/\?]+)/) || [])[1] || '';
    for (const card of document.querySelectorAll('li[class*="connection"], [class*="mn-connection-card"]')) {
        if (items.length >= maxCount) break;
        const nameEl = card.querySelector('[class*="name"], strong, a[href*="/in/"]');
        const subtitleEl = card.querySelector('[class*="subtitle"], [class*="occupation"]');
        const linkEl = card.querySelector('a[href*="/in/"]');
        const imgEl = card.querySelector('img');
        const timeEl = card.querySelector('[class*="time"], time');
        const name = nameEl ? nameEl.innerText.trim() : '';
        const profileUrl = linkEl ? linkEl.href : '';
        if (name && profileUrl) {
            items.push({
                name,
                headline: subtitleEl ? subtitleEl.innerText.trim() : '',
                username: usernameOf(profileUrl),
                profile_url: profileUrl,
                profile_image: imgEl ? imgEl.src : '',
                connected_time: timeEl ? timeEl.innerText.trim() : ''
            });
        }
    }
    if (items.length === 0) {
        for (const li of document.querySelectorAll('main li')) {
            if (items.length >= maxCount) break;
            const linkEl = li.querySelector('a[href*="/in/"]');
            if (!linkEl) continue;
            const lines = li.innerText.split('\n').filter(l => l.trim());
            items.push({
                name: lines[0] || '',
                headline: lines[1] || '',
                username: usernameOf(linkEl.href),
                profile_url: linkEl.href
            });
        }
    }
    const countEl = document.querySelector('[class*="connections-count"], h1, h2');
    const match = countEl ? countEl.innerText.match(/([\d,]+)/) : null;
    const total = match ? parseInt(match[1].replace(/,/g, ''), 10) : 0;
    return { items, total };
}"#;

const OPEN_MORE_MENU: &str = r#"() => {
    for (const btn of document.querySelectorAll('main button')) {
        const aria = (btn.getAttribute('aria-label') || '').toLowerCase();
        const text = btn.innerText.trim().toLowerCase();
        if (aria.includes('more actions') || text === 'more' || aria.includes('more options')) {
            btn.click();
            return true;
        }
    }
    return false;
}"#;

const CLICK_REMOVE_CONNECTION: &str = r#"() => {
    for (const item of document.querySelectorAll('[role="menuitem"], [role="option"], [role="button"], button, a')) {
        const text = item.innerText.toLowerCase();
        if (text.includes('remove connection')) {
            item.click();
            return true;
        }
    }
    return false;
}"#;

const CONFIRM_REMOVE: &str = r#"() => {
    for (const dialog of document.querySelectorAll('[role="dialog"], [role="alertdialog"]')) {
        for (const btn of dialog.querySelectorAll('button')) {
            const text = btn.innerText.toLowerCase();
            if (text.includes('remove') || text.includes('confirm')) {
                btn.click();
                return true;
            }
        }
    }
    return false;
}"#;

const NOTIFICATION_FILTER: &str = r#"(target) => {
    for (const radio of document.querySelectorAll('input[type="radio"]')) {
        const label = document.querySelector(`label[for="${radio.id}"]`);
        if (label && label.innerText.trim() === target) {
            radio.click();
            return true;
        }
    }
    for (const btn of document.querySelectorAll('button')) {
        if (btn.innerText.trim() === target) { btn.click(); return true; }
    }
    return false;
}"#;

const NOTIFICATIONS: &str = r#"(maxCount) => {
    const items = [];
    const seen = new Set();
    for (const el of document.querySelectorAll('main a[href*="linkedin.com"]')) {
        if (items.length >= maxCount) break;
        const parent = el.closest('li') || (el.parentElement && el.parentElement.parentElement);
        if (!parent) continue;
        const text = el.innerText.trim();
        if (!text || text.length < 10 || seen.has(text)) continue;
        seen.add(text);
        const timeEl = parent.querySelector('time') ||
            Array.from(parent.querySelectorAll('span')).find(s => /^\d+[hdwm]$/.test(s.innerText.trim()));
        items.push({
            text: text.substring(0, 500),
            time: timeEl ? timeEl.innerText.trim() : '',
            url: el.href,
            is_unread: parent.innerText.toLowerCase().includes('unread')
        });
    }
    return items;
}"#;

const PROFILE_VIEWS: &str = r#"(limit) => {
    const viewers = [];
    let totalViews = 0;
    for (const h of document.querySelectorAll('h1, h2, .t-bold')) {
        const match = h.innerText.match(/(\d+)\s*(profile\s+view|viewer)/i);
        if (match) { totalViews = parseInt(match[1], 10); break; }
    }
    const cards = document.querySelectorAll(
        '[data-view-name*="viewer"], .profile-viewer-card, li[class*="viewer"], .pvs-list__item--one-column'
    );
    for (const el of cards) {
        if (viewers.length >= limit) break;
        const linkEl = el.querySelector('a[href*="/in/"]');
        const nameEl = el.querySelector('.t-bold, .t-16, [class*="name"]') || linkEl;
        const headlineEl = el.querySelector('.t-normal, .t-14, [class*="headline"]');
        const timeEl = el.querySelector('.t-black--light, time, [class*="time"]');
        const name = nameEl && nameEl.innerText ? nameEl.innerText.trim() : '';
        const time = timeEl && timeEl.innerText ? timeEl.innerText.trim() : null;
        if (!name || name.toLowerCase().includes('linkedin member')) {
            viewers.push({ name: 'LinkedIn Member', headline: 'Profile hidden', time, profile_url: null, is_anonymous: true });
        } else {
            viewers.push({
                name: name.split('\n')[0].trim(),
                headline: headlineEl && headlineEl.innerText ? headlineEl.innerText.trim() : null,
                time,
                profile_url: linkEl ? linkEl.href : null,
                is_anonymous: false
            });
        }
    }
    if (viewers.length === 0) {
        const main = document.querySelector('main');
        const lines = (main ? main.innerText : '').split('\n').filter(l => l.trim());
        const when = /\d+[hmd]\s*ago|yesterday|today/i;
        let i = 0;
        while (viewers.length < limit && i < lines.length) {
            const line = lines[i].trim();
            if (line && !line.includes('profile view') && !line.includes('Premium')) {
                const next = (lines[i + 1] || '').trim();
                const timeLine = (lines[i + 2] || '').trim();
                if (when.test(timeLine) || /at\s+\w+|engineer|manager|developer/i.test(next)) {
                    viewers.push({
                        name: line,
                        headline: next,
                        time: when.test(timeLine) ? timeLine : null,
                        profile_url: null,
                        is_anonymous: false
                    });
                    i += 3;
                    continue;
                }
            }
            i++;
        }
    }
    return { total_views: totalViews, viewers: viewers.slice(0, limit) };
}"#;

const ENDORSE_ON_PROFILE: &str = r#"(skillName) => {
    const skill = skillName.toLowerCase();
    const items = document.querySelectorAll(
        '[class*="skill-card"], [class*="pv-skill-entity"], li[class*="skill"], [data-field="skill"]'
    );
    for (const item of items) {
        if (!item.innerText.toLowerCase().includes(skill)) continue;
        const endorseBtn = item.querySelector(
            'button[aria-label*="ndorse"], button[class*="endorse"], .pv-skill-entity__featured-endorse-button-shared'
        );
        if (endorseBtn && !endorseBtn.disabled) {
            endorseBtn.click();
            return { found: true, endorsed: true };
        }
        const icon = item.querySelector('button svg, button[class*="icon"]');
        if (icon && icon.closest('button')) {
            icon.closest('button').click();
            return { found: true, endorsed: true };
        }
        return { found: true, endorsed: false, reason: 'Endorse button not available' };
    }
    return { found: false };
}"#;

const ENDORSE_ON_DETAILS: &str = r#"(skillName) => {
    const skill = skillName.toLowerCase();
    for (const item of document.querySelectorAll('li, [class*="skill"]')) {
        if (!item.innerText.toLowerCase().includes(skill)) continue;
        const btn = item.querySelector('button');
        if (btn && btn.innerText.toLowerCase().includes('endorse')) {
            btn.click();
            return { found: true, endorsed: true };
        }
    }
    return { found: false };
}"#;

/// Keep the first invitation per profile URL, or per name when the URL is
/// missing
pub fn dedup_invitations(invitations: Vec<Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    invitations
        .into_iter()
        .filter(|inv| {
            let key = match str_field(inv, "profile_url") {
                "" => str_field(inv, "name"),
                url => url,
            };
            !key.is_empty() && seen.insert(key.to_string())
        })
        .collect()
}

/// Notification filter names mapped to LinkedIn's query values
pub fn notification_filter(filter: &str) -> Option<(&'static str, &'static str)> {
    match filter {
        "all" => Some(("all", "All")),
        "jobs" => Some(("JOB", "Jobs")),
        "my_posts" => Some(("MY_POSTS", "My posts")),
        "mentions" => Some(("MENTIONS", "Mentions")),
        _ => None,
    }
}

/// Rough category of a notification from its text
pub fn classify_notification(text: &str) -> &'static str {
    let text = text.to_lowercase();
    let has = |needle: &str| text.contains(needle);
    if has("job") || has("opportunities") {
        "job_alert"
    } else if has("posted") {
        "post"
    } else if has("reacted") || has("liked") {
        "reaction"
    } else if has("commented") {
        "comment"
    } else if has("mentioned") {
        "mention"
    } else if has("hiring") {
        "hiring"
    } else if has("congratulate") || has("new position") {
        "job_change"
    } else if has("birthday") {
        "birthday"
    } else if has("endorsed") {
        "endorsement"
    } else {
        "unknown"
    }
}

impl Actions {
    /// Pending invitations and people-you-may-know suggestions
    pub async fn get_my_network(&self) -> Result<ActionResult> {
        isolate(self.my_network_inner().await, "getting network")
    }

    async fn my_network_inner(&self) -> Result<ActionResult> {
        self.open(&format!("{}/mynetwork/", BASE)).await?;
        if !self.wait_for("main", 10).await? {
            return Ok(ActionResult::error("Network page did not load"));
        }
        self.settle(2.0).await;

        let data = self.run(NETWORK_OVERVIEW).await?;
        let invitations = list_field(&data, "pending_invitations");
        let mut suggestions = list_field(&data, "suggestions");
        let message = format!(
            "Found {} pending invitations and {} suggestions",
            invitations.len(),
            suggestions.len()
        );
        suggestions.truncate(MAX_SUGGESTIONS);

        Ok(ActionResult::success(message)
            .with("pending_invitations", invitations)
            .with("suggestions", suggestions))
    }

    /// Invitations waiting in the invitation manager
    pub async fn get_pending_invitations(&self) -> Result<ActionResult> {
        isolate(self.pending_invitations_inner().await, "getting invitations")
    }

    async fn pending_invitations_inner(&self) -> Result<ActionResult> {
        self.open(&format!("{}/mynetwork/invitation-manager/", BASE)).await?;
        self.settle(2.0).await;

        let raw = self.run(PENDING_INVITATIONS).await?;
        let invitations = dedup_invitations(raw.as_array().cloned().unwrap_or_default());
        Ok(ActionResult::success(format!("Found {} pending invitations", invitations.len()))
            .with("count", invitations.len())
            .with("invitations", invitations))
    }

    pub async fn accept_connection(&self, person_name: &str) -> Result<ActionResult> {
        isolate(
            self.answer_invitation(person_name, "accept", "Accept").await,
            "accepting connection",
        )
    }

    pub async fn reject_connection(&self, person_name: &str) -> Result<ActionResult> {
        isolate(
            self.answer_invitation(person_name, "ignore", "Ignore").await,
            "rejecting connection",
        )
    }

    async fn answer_invitation(&self, person_name: &str, verb: &str, label: &str) -> Result<ActionResult> {
        self.open(&format!("{}/mynetwork/invitation-manager/", BASE)).await?;
        self.settle(2.0).await;

        let clicked = self
            .call(
                ANSWER_INVITATION,
                json!({ "name": person_name, "verb": verb, "label": label }),
            )
            .await?
            .as_bool()
            .unwrap_or(false);
        self.settle(1.0).await;

        if !clicked {
            return Ok(ActionResult::new(
                Status::NotFound,
                format!("No pending invitation found from {}", person_name),
            ));
        }
        let message = if verb == "accept" {
            format!("Connection accepted for {}", person_name)
        } else {
            format!("Connection invitation ignored from {}", person_name)
        };
        Ok(ActionResult::success(message))
    }

    /// First-degree connections, scrolling to load up to `limit`
    pub async fn get_connections(&self, limit: u32) -> Result<ActionResult> {
        isolate(self.connections_inner(limit).await, "getting connections")
    }

    async fn connections_inner(&self, limit: u32) -> Result<ActionResult> {
        self.open(&format!("{}/mynetwork/invite-connect/connections/", BASE))
            .await?;
        self.settle(2.0).await;
        self.scroll((limit / 10).min(10), 1.0).await?;

        let data = self.call(CONNECTIONS, json!(limit)).await?;
        let connections = list_field(&data, "items");
        let total = data.get("total").and_then(Value::as_u64).unwrap_or(0);
        Ok(ActionResult::success(format!("Retrieved {} connections", connections.len()))
            .with("total_connections", total)
            .with("retrieved", connections.len())
            .with("connections", connections))
    }

    /// Remove a first-degree connection through the profile's More menu
    pub async fn remove_connection(&self, username: &str) -> Result<ActionResult> {
        let url = profile_url(username);
        let result = isolate(self.remove_inner(username, &url).await, "removing connection");
        result.map(|r| r.with("profile_url", url))
    }

    async fn remove_inner(&self, username: &str, url: &str) -> Result<ActionResult> {
        self.open(url).await?;
        self.settle(2.0).await;

        if !self.run(OPEN_MORE_MENU).await?.as_bool().unwrap_or(false) {
            return Ok(ActionResult::error("Could not find More actions button"));
        }
        self.settle(1.0).await;

        if !self.run(CLICK_REMOVE_CONNECTION).await?.as_bool().unwrap_or(false) {
            return Ok(ActionResult::error(
                "Could not find 'Remove connection' option. User might not be a connection.",
            ));
        }
        self.settle(1.0).await;
        self.run(CONFIRM_REMOVE).await?;
        self.settle(1.0).await;

        Ok(ActionResult::success(format!("Connection removed: {}", username)))
    }

    /// Notifications, optionally filtered to `jobs`, `my_posts` or `mentions`
    pub async fn get_notifications(&self, filter: &str, limit: u32) -> Result<ActionResult> {
        isolate(self.notifications_inner(filter, limit).await, "getting notifications")
    }

    async fn notifications_inner(&self, filter: &str, limit: u32) -> Result<ActionResult> {
        let (param, label) = notification_filter(filter).unwrap_or(("all", "All"));
        self.open(&format!("{}/notifications/?filter={}", BASE, param))
            .await?;
        self.settle(2.0).await;

        if param != "all" {
            self.call(NOTIFICATION_FILTER, json!(label)).await?;
            self.settle(2.0).await;
        }
        self.scroll((limit / 10).min(5), 1.0).await?;

        let raw = self.call(NOTIFICATIONS, json!(limit)).await?;
        let notifications: Vec<Value> = raw
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|mut item| {
                let kind = classify_notification(str_field(&item, "text"));
                if let Some(obj) = item.as_object_mut() {
                    obj.insert("type".into(), json!(kind));
                }
                item
            })
            .collect();

        let filter = if notification_filter(filter).is_some() { filter } else { "all" };
        Ok(ActionResult::success(format!("Found {} notifications", notifications.len()))
            .with("filter", filter)
            .with("count", notifications.len())
            .with("notifications", notifications))
    }

    /// Who viewed my profile
    pub async fn get_profile_views(&self, limit: u32) -> Result<ActionResult> {
        isolate(self.profile_views_inner(limit).await, "getting profile views")
    }

    async fn profile_views_inner(&self, limit: u32) -> Result<ActionResult> {
        self.open(&format!("{}/analytics/profile-views/", BASE)).await?;
        self.settle(2.0).await;
        dom::scroll_to_bottom(self.page(), self.timing.settle(1.0), 5).await?;
        self.settle(1.0).await;

        let data = self.call(PROFILE_VIEWS, json!(limit)).await?;
        let viewers = list_field(&data, "viewers");
        let total = data.get("total_views").and_then(Value::as_u64).unwrap_or(0);
        Ok(ActionResult::success(format!("Found {} profile viewers", viewers.len()))
            .with("total_views", total)
            .with("viewers_count", viewers.len())
            .with("viewers", viewers)
            .with("note", "Some viewers may be hidden. LinkedIn Premium shows all viewers."))
    }

    /// Endorse one skill on a connection's profile
    pub async fn endorse_skill(&self, username: &str, skill: &str) -> Result<ActionResult> {
        let url = profile_url(username);
        let result = isolate(self.endorse_inner(username, skill, &url).await, "endorsing skill");
        result.map(|r| r.with("profile_url", url))
    }

    async fn endorse_inner(&self, username: &str, skill: &str, url: &str) -> Result<ActionResult> {
        self.open(url).await?;
        self.settle(2.0).await;
        dom::scroll_to_bottom(self.page(), self.timing.settle(1.0), 5).await?;
        self.settle(1.0).await;

        let mut outcome = self.call(ENDORSE_ON_PROFILE, json!(skill)).await?;
        if !outcome["found"].as_bool().unwrap_or(false) {
            info!("Skill {} not on profile page, trying details/skills", skill);
            self.open(&format!("{}/in/{}/details/skills/", BASE, username))
                .await?;
            self.settle(2.0).await;
            outcome = self.call(ENDORSE_ON_DETAILS, json!(skill)).await?;
        }

        if outcome["endorsed"].as_bool().unwrap_or(false) {
            self.settle(1.0).await;
            Ok(ActionResult::success(format!("Endorsed {} for {}", skill, username)))
        } else if outcome["found"].as_bool().unwrap_or(false) {
            let reason = match str_field(&outcome, "reason") {
                "" => "Could not endorse skill",
                reason => reason,
            };
            Ok(ActionResult::error(reason))
        } else {
            Ok(ActionResult::error(format!(
                "Skill '{}' not found on {}'s profile",
                skill, username
            )))
        }
    }

    /// Ask a connection for a recommendation
    pub async fn request_recommendation(
        &self,
        username: &str,
        message: Option<&str>,
        relationship: Option<&str>,
        position_at_time: Option<&str>,
    ) -> Result<ActionResult> {
        isolate(
            self.recommendation_inner(username, message, relationship, position_at_time)
                .await,
            "requesting recommendation",
        )
    }

    async fn recommendation_inner(
        &self,
        username: &str,
        message: Option<&str>,
        relationship: Option<&str>,
        position_at_time: Option<&str>,
    ) -> Result<ActionResult> {
        self.open(&format!("{}/in/me/details/recommendations/edit/request/", BASE))
            .await?;
        self.settle(2.0).await;

        let search = self
            .first_existing(&[
                "input[placeholder*=\"Search\"]",
                "input[aria-label*=\"Search for people\"]",
            ])
            .await?;
        if let Some(selector) = search {
            self.page().fill(selector, username).await?;
            self.settle(1.5).await;
            self.page().press_key("ArrowDown").await?;
            self.page().press_key("Enter").await?;
            self.settle(1.0).await;
        }

        if dom::click_button(self.page(), &["continue", "next"], dom::ButtonMatch::default())
            .await?
            .is_some()
        {
            self.settle(2.0).await;
        }

        for (label, value) in [("relationship", relationship), ("position", position_at_time)] {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                dom::select_by_label(self.page(), &[label], value).await?;
                self.settle(0.3).await;
            }
        }

        if let Some(message) = message.filter(|m| !m.is_empty()) {
            if let Some(selector) = self.first_existing(&["textarea", "[role=\"textbox\"]"]).await? {
                self.page().fill(selector, message).await?;
                self.settle(0.3).await;
            }
        }

        if dom::click_button(self.page(), &["send", "request"], dom::ButtonMatch::default())
            .await?
            .is_some()
        {
            self.settle(2.0).await;
        }

        Ok(ActionResult::success(format!(
            "Recommendation request sent to {}",
            username
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_invitations() {
        let invitations = vec![
            json!({"name": "Ana", "profile_url": "https://www.linkedin.com/in/ana/"}),
            json!({"name": "Ana Souza", "profile_url": "https://www.linkedin.com/in/ana/"}),
            json!({"name": "Bob", "profile_url": ""}),
            json!({"name": "Bob", "profile_url": ""}),
            json!({"name": "", "profile_url": ""}),
        ];
        let unique = dedup_invitations(invitations);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0]["name"], "Ana");
        assert_eq!(unique[1]["name"], "Bob");
    }

    #[test]
    fn test_notification_filter_mapping() {
        assert_eq!(notification_filter("jobs"), Some(("JOB", "Jobs")));
        assert_eq!(notification_filter("my_posts"), Some(("MY_POSTS", "My posts")));
        assert_eq!(notification_filter("mentions").unwrap().0, "MENTIONS");
        assert_eq!(notification_filter("weird"), None);
    }

    #[test]
    fn test_classify_notification() {
        assert_eq!(classify_notification("New jobs for Rust engineer"), "job_alert");
        assert_eq!(classify_notification("Ana reacted to your post"), "reaction");
        assert_eq!(classify_notification("Bob commented on your update"), "comment");
        assert_eq!(classify_notification("Cara mentioned you in a comment"), "mention");
        assert_eq!(classify_notification("Dan mentioned you"), "mention");
        assert_eq!(classify_notification("Congratulate Eve on her new role"), "job_change");
        assert_eq!(classify_notification("Wish Fay a happy birthday"), "birthday");
        assert_eq!(classify_notification("Gus endorsed you for Rust"), "endorsement");
        assert_eq!(classify_notification("Hal posted: shipping day"), "post");
        assert_eq!(classify_notification("Ivy is hiring"), "hiring");
        assert_eq!(classify_notification("Something else"), "unknown");
    }
}
