//! Extraction state machine against a scripted page

mod common;

use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use common::ScriptedPage;
use linkedin_mcp::scraping::{parse_company_sections, parse_person_sections};
use linkedin_mcp::{Extractor, ScraperError, Timing, RATE_LIMITED_MSG};

const CHROME_ONLY: &str = "\nMore profiles for you\nJohn Smith\nAbout\nAccessibility";

fn extractor(page: &std::sync::Arc<ScriptedPage>) -> Extractor {
    Extractor::new(page.clone(), Timing::instant())
}

#[tokio::test]
async fn test_clean_page_returns_stripped_text() {
    let page = ScriptedPage::new();
    page.push_text("Jane Doe\nEngineer\nAbout\nAccessibility\nCareers");

    let text = assert_ok!(
        extractor(&page)
            .extract_page("https://www.linkedin.com/in/jdoe/")
            .await
    );

    assert_eq!(text, "Jane Doe\nEngineer");
    assert_eq!(page.visited().len(), 1);
}

#[tokio::test]
async fn test_chrome_only_page_is_retried_once() {
    let page = ScriptedPage::new();
    page.push_text(CHROME_ONLY);
    page.push_text("Experience\nAcme Corp");

    let text = assert_ok!(
        extractor(&page)
            .extract_page("https://www.linkedin.com/in/jdoe/details/experience/")
            .await
    );

    assert_eq!(text, "Experience\nAcme Corp");
    assert_eq!(page.visited().len(), 2);
}

#[tokio::test]
async fn test_chrome_only_twice_yields_sentinel() {
    let page = ScriptedPage::new();
    page.push_text(CHROME_ONLY);
    page.push_text(CHROME_ONLY);
    page.push_text("never read");

    let text = assert_ok!(
        extractor(&page)
            .extract_page("https://www.linkedin.com/in/jdoe/")
            .await
    );

    assert_eq!(text, RATE_LIMITED_MSG);
    assert_eq!(page.visited().len(), 2);
}

#[tokio::test]
async fn test_empty_page_is_not_retried() {
    let page = ScriptedPage::new();

    let text = assert_ok!(
        extractor(&page)
            .extract_page("https://www.linkedin.com/jobs/view/1/")
            .await
    );

    assert_eq!(text, "");
    assert_eq!(page.visited().len(), 1);
}

#[tokio::test]
async fn test_login_redirect_propagates() {
    let page = ScriptedPage::new();
    page.redirect_to("https://www.linkedin.com/login?session_redirect=x");
    page.push_text("Sign in");

    let err = assert_err!(
        extractor(&page)
            .extract_page("https://www.linkedin.com/in/jdoe/")
            .await
    );

    assert!(matches!(err, ScraperError::AuthenticationRequired(_)));
}

#[tokio::test]
async fn test_checkpoint_propagates() {
    let page = ScriptedPage::new();
    page.redirect_to("https://www.linkedin.com/checkpoint/challenge/abc");

    let err = assert_err!(
        extractor(&page)
            .extract_page("https://www.linkedin.com/in/jdoe/")
            .await
    );

    assert!(matches!(err, ScraperError::SecurityChallenge(_)));
}

#[tokio::test]
async fn test_rate_limit_phrase_propagates() {
    let page = ScriptedPage::new();
    page.set_probe(json!({"mainText": 12, "body": "too many requests", "captcha": false}));

    let err = assert_err!(
        extractor(&page)
            .extract_page("https://www.linkedin.com/in/jdoe/")
            .await
    );

    assert!(matches!(err, ScraperError::RateLimited(_)));
}

#[tokio::test]
async fn test_captcha_propagates() {
    let page = ScriptedPage::new();
    page.set_probe(json!({"mainText": 5000, "body": "", "captcha": true}));

    let err = assert_err!(
        extractor(&page)
            .extract_page("https://www.linkedin.com/in/jdoe/")
            .await
    );

    assert!(matches!(err, ScraperError::SecurityChallenge(_)));
}

#[tokio::test]
async fn test_unclassified_failure_degrades_to_empty() {
    let page = ScriptedPage::new();
    page.push_error(ScraperError::Script("Execution context was destroyed".into()));

    let text = assert_ok!(
        extractor(&page)
            .extract_page("https://www.linkedin.com/in/jdoe/")
            .await
    );

    assert_eq!(text, "");
}

#[tokio::test]
async fn test_scrape_person_visits_each_section() {
    let page = ScriptedPage::new();
    page.push_text("Jane Doe\nEngineer");
    page.push_text("Experience\nAcme Corp");
    page.push_text("");

    let (sections, unknown) = parse_person_sections(Some("experience,contact_info"));
    assert!(unknown.is_empty());

    let result = extractor(&page).scrape_person("jdoe", &sections).await.unwrap();

    assert_eq!(result.url, "https://www.linkedin.com/in/jdoe/");
    assert_eq!(
        result.pages_visited,
        vec![
            "https://www.linkedin.com/in/jdoe/",
            "https://www.linkedin.com/in/jdoe/details/experience/",
            "https://www.linkedin.com/in/jdoe/overlay/contact-info/",
        ]
    );
    assert_eq!(result.pages_visited, page.visited());
    assert_eq!(result.sections["main_profile"], "Jane Doe\nEngineer");
    assert_eq!(result.sections["experience"], "Experience\nAcme Corp");
    assert!(!result.sections.contains_key("contact_info"));
    assert_eq!(
        result.sections_requested,
        vec!["main_profile", "experience", "contact_info"]
    );
}

#[tokio::test]
async fn test_scrape_person_stops_on_classified_error() {
    let page = ScriptedPage::new();
    page.push_text("Jane Doe");
    page.push_error(ScraperError::RateLimited("page reports \"slow down\"".into()));

    let (sections, _) = parse_person_sections(Some("experience,education"));
    let err = assert_err!(extractor(&page).scrape_person("jdoe", &sections).await);

    assert!(matches!(err, ScraperError::RateLimited(_)));
    assert_eq!(page.visited().len(), 2);
}

#[tokio::test]
async fn test_search_people_records_url() {
    let page = ScriptedPage::new();
    page.push_text("Profile: https://www.linkedin.com/in/jdoe\nJane Doe\nEngineer");

    let network = vec!["F".to_string(), "S".to_string()];
    let result = extractor(&page)
        .search_people("rust engineer", &network, None, None)
        .await
        .unwrap();

    assert_eq!(result.pages_visited, vec![result.url.clone()]);
    assert!(result.url.starts_with("https://www.linkedin.com/search/results/people/"));
    assert!(result.sections["people"].starts_with("Profile: https://www.linkedin.com/in/jdoe"));
}

#[tokio::test]
async fn test_loading_shell_phrase_is_not_a_hard_limit() {
    let page = ScriptedPage::new();
    page.set_loading_probe(json!({"mainText": 150, "body": "jobs for you try again later", "captcha": false}));
    page.push_text(CHROME_ONLY);
    page.push_text("Experience\nAcme Corp");

    let text = assert_ok!(
        extractor(&page)
            .extract_page("https://www.linkedin.com/in/jdoe/details/experience/")
            .await
    );

    assert_eq!(text, "Experience\nAcme Corp");
    assert_eq!(page.visited().len(), 2);
}

#[tokio::test]
async fn test_overlay_chrome_only_twice_yields_sentinel() {
    let page = ScriptedPage::new();
    page.push_text("Contact info\nGet up to 2x more replies when you message with InMail");
    page.push_text("Get up to 2x more replies when you message with InMail\nTry Premium");

    let text = assert_ok!(
        extractor(&page)
            .extract_overlay("https://www.linkedin.com/in/jdoe/overlay/contact-info/")
            .await
    );

    assert_eq!(text, "Contact info");
    assert_eq!(page.visited().len(), 1);

    let page = ScriptedPage::new();
    page.push_text("Get up to 2x more replies when you message with InMail");
    page.push_text("Get up to 3x more replies when you message with InMail");

    let text = assert_ok!(
        extractor(&page)
            .extract_overlay("https://www.linkedin.com/in/jdoe/overlay/contact-info/")
            .await
    );

    assert_eq!(text, RATE_LIMITED_MSG);
    assert_eq!(page.visited().len(), 2);
}

#[tokio::test]
async fn test_posts_page_retry_recovers() {
    let page = ScriptedPage::new();
    page.push_text("Explore premium profiles\nAd");
    page.push_text("Jane Doe\nWe are hiring Rust engineers");

    let result = extractor(&page)
        .search_posts("rust hiring", Some("past-week"), Some("date_posted"))
        .await
        .unwrap();

    assert_eq!(result.sections["posts"], "Jane Doe\nWe are hiring Rust engineers");
    assert_eq!(page.visited(), vec![result.url.clone(), result.url.clone()]);
}

#[tokio::test]
async fn test_scrape_company_visits_each_section() {
    let page = ScriptedPage::new();
    page.push_text("Acme Corp\nSoftware");
    page.push_text("Acme Corp posts");
    page.push_text("Rust Engineer\nRemote");

    let (sections, unknown) = parse_company_sections(Some("jobs,posts"));
    assert!(unknown.is_empty());

    let result = extractor(&page).scrape_company("acme", &sections).await.unwrap();

    assert_eq!(result.url, "https://www.linkedin.com/company/acme/");
    assert_eq!(
        result.pages_visited,
        vec![
            "https://www.linkedin.com/company/acme/about/",
            "https://www.linkedin.com/company/acme/posts/",
            "https://www.linkedin.com/company/acme/jobs/",
        ]
    );
    assert_eq!(result.sections_requested, vec!["about", "posts", "jobs"]);
    assert_eq!(result.sections["jobs"], "Rust Engineer\nRemote");
}
