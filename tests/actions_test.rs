//! UI actions against a scripted page

mod common;

use serde_json::json;
use std::sync::Arc;

use common::ScriptedPage;
use linkedin_mcp::actions::post::Visibility;
use linkedin_mcp::{Actions, ScraperError, Status, Timing};

fn actions(page: &Arc<ScriptedPage>) -> Actions {
    Actions::new(page.clone(), Timing::instant())
}

#[tokio::test]
async fn test_follow_when_already_following() {
    let page = ScriptedPage::new();
    page.reply("return 'already_following'", json!("already_following"));

    let result = actions(&page).follow_person("jdoe").await.unwrap();

    assert_eq!(result.status, Status::AlreadyFollowing);
    assert_eq!(result.message, "Already following jdoe");
    assert_eq!(
        result.get("profile_url"),
        Some(&json!("https://www.linkedin.com/in/jdoe/"))
    );
}

#[tokio::test]
async fn test_follow_script_failure_becomes_error_record() {
    let page = ScriptedPage::new();
    page.fail("return 'already_following'");

    let result = actions(&page).follow_person("jdoe").await.unwrap();

    assert_eq!(result.status, Status::Error);
    assert!(result.message.starts_with("Error following: Script error"));
    assert!(result.get("profile_url").is_some());
}

#[tokio::test]
async fn test_follow_signed_out_propagates() {
    let page = ScriptedPage::new();
    page.redirect_to("https://www.linkedin.com/authwall?trk=1");

    let err = actions(&page).follow_person("jdoe").await.unwrap_err();

    assert!(matches!(err, ScraperError::AuthenticationRequired(_)));
}

#[tokio::test]
async fn test_connect_already_connected() {
    let page = ScriptedPage::new();
    page.reply("invite_modal", json!({"type": "already_connected", "buttons": []}));

    let result = actions(&page).connect_with_person("jdoe", None).await.unwrap();

    assert_eq!(result.status, Status::AlreadyConnected);
    assert_eq!(
        page.visited(),
        vec!["https://www.linkedin.com/preload/custom-invite/?vanityName=jdoe"]
    );
}

#[tokio::test]
async fn test_connect_unknown_dialog_reports_texts() {
    let page = ScriptedPage::new();
    page.reply(
        "invite_modal",
        json!({"type": "unknown", "buttons": [], "dialogTexts": ["Messaging"]}),
    );

    let result = actions(&page).connect_with_person("jdoe", Some("")).await.unwrap();

    assert_eq!(result.status, Status::Error);
    assert_eq!(result.get("dialog_state"), Some(&json!("unknown")));
    assert_eq!(result.get("dialog_texts"), Some(&json!(["Messaging"])));
}

#[tokio::test]
async fn test_send_message_types_into_compose_box() {
    let page = ScriptedPage::new();
    page.reply("selection.removeAllRanges", json!(true));
    page.reply("send message", json!(true));

    let result = actions(&page).send_message("jdoe", "Hi Jane").await.unwrap();

    assert_eq!(result.status, Status::Success);
    assert_eq!(result.message, "Message sent to jdoe");
    assert_eq!(page.typed(), "Hi Jane");
}

#[tokio::test]
async fn test_send_message_without_send_button() {
    let page = ScriptedPage::new();
    page.reply("selection.removeAllRanges", json!(true));
    page.reply("send message", json!(false));

    let result = actions(&page).send_message("jdoe", "Hi").await.unwrap();

    assert_eq!(result.status, Status::Error);
    assert_eq!(result.message, "Could not find send button for jdoe");
}

#[tokio::test]
async fn test_save_job_toggles_to_unsaved() {
    let page = ScriptedPage::new();
    page.reply("wasSaved", json!({"clicked": true, "wasSaved": true}));

    let result = actions(&page).save_job("4012345678").await.unwrap();

    assert_eq!(result.get("action"), Some(&json!("unsaved")));
    assert_eq!(result.get("job_id"), Some(&json!("4012345678")));
}

#[tokio::test]
async fn test_create_post_publishes() {
    let page = ScriptedPage::new();
    page.reply("share-box-feed-entry__trigger", json!(true));
    page.reply("button_disabled", json!({"clicked": true}));
    page.reply("text.includes('create a post')", json!(true));

    let content = "Shipping a new Rust crate today. ".repeat(5);
    let result = actions(&page)
        .create_post(&content, Visibility::Anyone)
        .await
        .unwrap();

    assert_eq!(result.status, Status::Success);
    assert_eq!(page.typed(), content);
    let preview = result.get("content_preview").and_then(|v| v.as_str()).unwrap();
    assert!(preview.ends_with("..."));
}
