//! MCP request handling with a fake page provider

mod common;

use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use common::{FakeProvider, ScriptedPage};
use linkedin_mcp::mcp::error_codes;
use linkedin_mcp::{McpRequest, McpResponse, McpServer, Timing, ToolRegistry};

fn server(provider: Arc<FakeProvider>) -> McpServer {
    McpServer::with_registry(ToolRegistry::new(provider, Timing::instant()))
}

fn channel() -> (UnboundedSender<String>, UnboundedReceiver<String>) {
    mpsc::unbounded_channel()
}

fn request(value: Value) -> McpRequest {
    serde_json::from_value(value).unwrap()
}

fn call(id: u64, name: &str, arguments: Value) -> McpRequest {
    request(json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    }))
}

/// Decode the JSON body of a tool result
fn tool_body(response: &McpResponse) -> (Value, bool) {
    let result = response.result.as_ref().unwrap();
    let text = result["content"][0]["text"].as_str().unwrap();
    (
        serde_json::from_str(text).unwrap(),
        result["isError"].as_bool().unwrap(),
    )
}

#[tokio::test]
async fn test_initialize_without_browser() {
    let provider = FakeProvider::signed_out();
    let server = server(provider);
    let (tx, _rx) = channel();

    let response = server
        .handle_request(
            request(json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}})),
            &tx,
        )
        .await
        .unwrap();

    let result = response.result.unwrap();
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "linkedin-mcp");
    assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
}

#[tokio::test]
async fn test_notification_gets_no_response() {
    let server = server(FakeProvider::signed_out());
    let (tx, _rx) = channel();

    let response = server
        .handle_request(
            request(json!({"jsonrpc": "2.0", "method": "notifications/initialized"})),
            &tx,
        )
        .await;

    assert!(response.is_none());
}

#[tokio::test]
async fn test_tools_list_publishes_every_tool() {
    let server = server(FakeProvider::signed_out());
    let (tx, _rx) = channel();

    let response = server
        .handle_request(request(json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})), &tx)
        .await
        .unwrap();

    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    for expected in [
        "get_person_profile",
        "search_people",
        "connect_with_person",
        "easy_apply_complete",
        "create_post",
        "close_session",
    ] {
        assert!(names.contains(&expected), "missing {}", expected);
    }
    assert!(tools.len() >= 45);
    assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));

    let profile = tools.iter().find(|t| t["name"] == "get_person_profile").unwrap();
    assert_eq!(profile["annotations"]["readOnlyHint"], true);
    let post = tools.iter().find(|t| t["name"] == "create_post").unwrap();
    assert_eq!(post["annotations"]["readOnlyHint"], false);
}

#[tokio::test]
async fn test_unknown_method() {
    let server = server(FakeProvider::signed_out());
    let (tx, _rx) = channel();

    let response = server
        .handle_request(request(json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"})), &tx)
        .await
        .unwrap();

    assert_eq!(response.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_jsonrpc_version() {
    let server = server(FakeProvider::signed_out());
    let (tx, _rx) = channel();

    let response = server
        .handle_request(request(json!({"jsonrpc": "1.0", "id": 4, "method": "ping"})), &tx)
        .await
        .unwrap();

    assert_eq!(response.error.unwrap().code, error_codes::INVALID_REQUEST);
}

#[tokio::test]
async fn test_wrong_version_notification_gets_no_response() {
    let server = server(FakeProvider::signed_out());
    let (tx, mut rx) = channel();

    let response = server
        .handle_request(request(json!({"jsonrpc": "1.0", "method": "ping"})), &tx)
        .await;

    assert!(response.is_none());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_unknown_tool() {
    let server = server(FakeProvider::signed_out());
    let (tx, _rx) = channel();

    let response = server.handle_request(call(5, "post_to_myspace", json!({})), &tx).await.unwrap();

    let error = response.error.unwrap();
    assert_eq!(error.code, error_codes::TOOL_NOT_FOUND);
    assert_eq!(error.message, "Tool not found: post_to_myspace");
}

#[tokio::test]
async fn test_missing_required_argument() {
    let page = ScriptedPage::new();
    let server = server(FakeProvider::new(page.clone()));
    let (tx, _rx) = channel();

    let response = server.handle_request(call(6, "get_job_details", json!({})), &tx).await.unwrap();

    assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
    assert!(page.visited().is_empty());
}

#[tokio::test]
async fn test_invalid_enum_argument() {
    let server = server(FakeProvider::new(ScriptedPage::new()));
    let (tx, _rx) = channel();

    let response = server
        .handle_request(
            call(7, "search_posts", json!({"keywords": "rust", "date_posted": "yesterday"})),
            &tx,
        )
        .await
        .unwrap();

    assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_job_details_with_progress() {
    let page = ScriptedPage::new();
    page.push_text("Senior Rust Engineer\nAcme Corp\nRemote");
    let server = server(FakeProvider::new(page.clone()));
    let (tx, mut rx) = channel();

    let response = server
        .handle_request(
            request(json!({
                "jsonrpc": "2.0",
                "id": 8,
                "method": "tools/call",
                "params": {
                    "name": "get_job_details",
                    "arguments": {"job_id": "4012345678"},
                    "_meta": {"progressToken": "job-1"}
                }
            })),
            &tx,
        )
        .await
        .unwrap();

    let (body, is_error) = tool_body(&response);
    assert!(!is_error);
    assert_eq!(body["url"], "https://www.linkedin.com/jobs/view/4012345678/");
    assert_eq!(body["sections"]["job_posting"], "Senior Rust Engineer\nAcme Corp\nRemote");

    let mut notifications = Vec::new();
    while let Ok(message) = rx.try_recv() {
        notifications.push(serde_json::from_str::<Value>(&message).unwrap());
    }
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0]["method"], "notifications/progress");
    assert_eq!(notifications[0]["params"]["progressToken"], "job-1");
    assert_eq!(notifications[0]["params"]["progress"], 0);
    assert_eq!(notifications[1]["params"]["progress"], 100);
    assert_eq!(notifications[1]["params"]["message"], "Complete");
}

#[tokio::test]
async fn test_no_progress_without_token() {
    let page = ScriptedPage::new();
    page.push_text("Senior Rust Engineer");
    let server = server(FakeProvider::new(page));
    let (tx, mut rx) = channel();

    server
        .handle_request(call(9, "get_job_details", json!({"job_id": "1"})), &tx)
        .await
        .unwrap();

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_signed_out_is_tool_error() {
    let server = server(FakeProvider::signed_out());
    let (tx, _rx) = channel();

    let response = server
        .handle_request(call(10, "get_person_profile", json!({"linkedin_username": "jdoe"})), &tx)
        .await
        .unwrap();

    assert!(response.error.is_none());
    let (body, is_error) = tool_body(&response);
    assert!(is_error);
    assert_eq!(body["error"], "authentication_required");
    assert!(body["resolution"].as_str().unwrap().contains("--login"));
}

#[tokio::test]
async fn test_rate_limit_mid_scrape_is_tool_error() {
    let page = ScriptedPage::new();
    page.set_probe(json!({"mainText": 0, "body": "please slow down", "captcha": false}));
    let server = server(FakeProvider::new(page));
    let (tx, _rx) = channel();

    let response = server
        .handle_request(call(11, "get_company_posts", json!({"company_name": "acme"})), &tx)
        .await
        .unwrap();

    let (body, is_error) = tool_body(&response);
    assert!(is_error);
    assert_eq!(body["error"], "rate_limited");
}

#[tokio::test]
async fn test_person_profile_reports_unknown_sections() {
    let page = ScriptedPage::new();
    page.push_text("Jane Doe");
    page.push_text("Experience\nAcme Corp");
    let server = server(FakeProvider::new(page.clone()));
    let (tx, _rx) = channel();

    let response = server
        .handle_request(
            call(
                12,
                "get_person_profile",
                json!({"linkedin_username": "jdoe", "sections": "experience, bogus"}),
            ),
            &tx,
        )
        .await
        .unwrap();

    let (body, is_error) = tool_body(&response);
    assert!(!is_error);
    assert_eq!(body["unknown_sections"], json!(["bogus"]));
    assert_eq!(body["sections"]["experience"], "Experience\nAcme Corp");
    assert_eq!(page.visited().len(), 2);
}

#[tokio::test]
async fn test_action_tool_returns_status_record() {
    let page = ScriptedPage::new();
    page.reply("return 'already_following'", json!("already_following"));
    let server = server(FakeProvider::new(page));
    let (tx, _rx) = channel();

    let response = server
        .handle_request(call(13, "follow_person", json!({"linkedin_username": "jdoe"})), &tx)
        .await
        .unwrap();

    let (body, is_error) = tool_body(&response);
    assert!(!is_error);
    assert_eq!(body["status"], "already_following");
}

#[tokio::test]
async fn test_close_session() {
    let provider = FakeProvider::new(ScriptedPage::new());
    let server = server(provider.clone());
    let (tx, _rx) = channel();

    let response = server.handle_request(call(14, "close_session", json!({})), &tx).await.unwrap();
    let (body, _) = tool_body(&response);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Browser session closed");
    assert!(provider.was_closed());

    let response = server.handle_request(call(15, "close_session", json!({})), &tx).await.unwrap();
    let (body, _) = tool_body(&response);
    assert_eq!(body["message"], "No browser session was running");
}
