//! MCP Tool Registry
//!
//! Publishes one tool per LinkedIn operation and runs calls against the
//! session page. Read-only scrapes go through the [`Extractor`]; everything
//! that clicks goes through [`Actions`].

pub mod args;
pub mod catalog;
pub mod progress;
pub mod schema;

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::actions::post::Visibility;
use crate::actions::profile::{CertificationEntry, EducationEntry, ExperienceEntry, IntroUpdate, ProjectEntry};
use crate::actions::Actions;
use crate::browser::{LinkedInSession, PageDriver, PageProvider};
use crate::config::{Config, Timing};
use crate::error::ScraperError;
use crate::scraping::{parse_company_sections, parse_person_sections, Extractor};

pub use args::{parse_network, Args};
pub use progress::Progress;
pub use schema::{ToolAnnotations, ToolSchema};

/// Why a `tools/call` produced no tool result
#[derive(Debug, thiserror::Error)]
pub enum ToolCallError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Scraper(#[from] ScraperError),
}

/// Body returned with `isError: true` when a call fails
pub fn error_body(err: &ScraperError) -> Value {
    json!({
        "error": err.kind(),
        "message": err.to_string(),
        "resolution": err.resolution(),
    })
}

fn to_json(value: impl Serialize) -> Result<Value, ToolCallError> {
    Ok(serde_json::to_value(value).map_err(ScraperError::from)?)
}

/// Tool registry bound to one page provider
pub struct ToolRegistry {
    provider: Arc<dyn PageProvider>,
    timing: Timing,
    schemas: Vec<ToolSchema>,
}

impl ToolRegistry {
    pub fn new(provider: Arc<dyn PageProvider>, timing: Timing) -> Self {
        Self {
            provider,
            timing,
            schemas: catalog::all(),
        }
    }

    /// Registry driving a lazily launched LinkedIn browser
    pub fn from_config(config: &Config) -> Self {
        let session = LinkedInSession::new(config.browser.clone());
        Self::new(Arc::new(session), config.timing)
    }

    /// List all tool definitions
    pub fn list_definitions(&self) -> Vec<Value> {
        self.schemas.iter().map(ToolSchema::to_definition).collect()
    }

    pub fn schema(&self, name: &str) -> Option<&ToolSchema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    /// Call a tool by name
    pub async fn call(&self, name: &str, args: Value, progress: &Progress) -> Result<Value, ToolCallError> {
        let schema = self
            .schema(name)
            .ok_or_else(|| ToolCallError::NotFound(name.to_string()))?;
        schema.validate(&args).map_err(ToolCallError::InvalidParams)?;

        info!("Tool call: {} with args: {}", name, args);
        let start = Instant::now();

        let result = if name == "close_session" {
            self.close_session().await
        } else {
            match self.provider.authenticated_page().await {
                Ok(page) => {
                    progress.report(0, 100, &schema.start_message).await;
                    let result = self.dispatch(name, Args(&args), page).await;
                    if result.is_ok() {
                        progress.report(100, 100, "Complete").await;
                    }
                    result
                }
                Err(e) => Err(e.into()),
            }
        };

        match &result {
            Ok(_) => info!("Tool {} completed in {}ms", name, start.elapsed().as_millis()),
            Err(e) => warn!("Tool {} failed after {}ms: {}", name, start.elapsed().as_millis(), e),
        }
        result
    }

    /// Release the browser on shutdown
    pub async fn close(&self) {
        if let Err(e) = self.provider.close().await {
            warn!("Browser close failed: {}", e);
        }
    }

    async fn close_session(&self) -> Result<Value, ToolCallError> {
        let closed = self.provider.close().await?;
        let message = if closed {
            "Browser session closed"
        } else {
            "No browser session was running"
        };
        Ok(json!({ "status": "success", "message": message }))
    }

    async fn dispatch(&self, name: &str, args: Args<'_>, page: Arc<dyn PageDriver>) -> Result<Value, ToolCallError> {
        let extractor = Extractor::new(page.clone(), self.timing);
        let actions = Actions::new(page, self.timing);

        match name {
            // ========== Scraping ==========
            "get_person_profile" => {
                let (sections, unknown) = parse_person_sections(args.opt_str("sections"));
                let username = args.str("linkedin_username")?;
                info!("Scraping profile: {} ({} sections)", username, sections.len());
                let result = extractor.scrape_person(username, &sections).await?;
                to_json(result.with_unknown(unknown))
            }
            "get_company_profile" => {
                let (sections, unknown) = parse_company_sections(args.opt_str("sections"));
                let company = args.str("company_name")?;
                info!("Scraping company: {} ({} sections)", company, sections.len());
                let result = extractor.scrape_company(company, &sections).await?;
                to_json(result.with_unknown(unknown))
            }
            "get_company_posts" => to_json(extractor.company_posts(args.str("company_name")?).await?),
            "get_job_details" => to_json(extractor.scrape_job(args.str("job_id")?).await?),
            "search_jobs" => to_json(
                extractor
                    .search_jobs(args.str("keywords")?, args.opt_str("location"))
                    .await?,
            ),
            "search_posts" => to_json(
                extractor
                    .search_posts(
                        args.str("keywords")?,
                        args.opt_str("date_posted"),
                        args.opt_str("sort_by"),
                    )
                    .await?,
            ),
            "search_people" => {
                let network = parse_network(args.opt_str("network"));
                to_json(
                    extractor
                        .search_people(
                            args.str("keywords")?,
                            &network,
                            args.opt_str("location"),
                            args.opt_str("current_company"),
                        )
                        .await?,
                )
            }

            // ========== Person ==========
            "connect_with_person" => to_json(
                actions
                    .connect_with_person(args.str("linkedin_username")?, args.opt_str("note"))
                    .await?,
            ),
            "send_message" => to_json(
                actions
                    .send_message(args.str("linkedin_username")?, args.str("message")?)
                    .await?,
            ),
            "follow_person" => to_json(actions.follow_person(args.str("linkedin_username")?).await?),
            "withdraw_connection" => {
                to_json(actions.withdraw_connection(args.str("linkedin_username")?).await?)
            }

            // ========== Network ==========
            "get_my_network" => to_json(actions.get_my_network().await?),
            "get_pending_invitations" => to_json(actions.get_pending_invitations().await?),
            "accept_connection" => to_json(actions.accept_connection(args.str("person_name")?).await?),
            "reject_connection" => to_json(actions.reject_connection(args.str("person_name")?).await?),
            "get_connections" => to_json(actions.get_connections(args.u32_or("limit", 50)).await?),
            "remove_connection" => {
                to_json(actions.remove_connection(args.str("linkedin_username")?).await?)
            }
            "get_notifications" => to_json(
                actions
                    .get_notifications(args.str_or("filter_type", "all"), args.u32_or("limit", 20))
                    .await?,
            ),
            "get_profile_views" => to_json(actions.get_profile_views(args.u32_or("limit", 20)).await?),
            "endorse_skill" => to_json(
                actions
                    .endorse_skill(args.str("linkedin_username")?, args.str("skill_name")?)
                    .await?,
            ),
            "request_recommendation" => to_json(
                actions
                    .request_recommendation(
                        args.str("linkedin_username")?,
                        args.opt_str("message"),
                        args.opt_str("relationship"),
                        args.opt_str("position_at_time"),
                    )
                    .await?,
            ),

            // ========== Messaging ==========
            "get_messages" => to_json(actions.get_messages(args.opt_str("linkedin_username")).await?),
            "get_conversation" => to_json(
                actions
                    .get_conversation(args.str("linkedin_username")?, args.u32_or("limit", 50))
                    .await?,
            ),
            "archive_conversation" => {
                to_json(actions.archive_conversation(args.str("linkedin_username")?).await?)
            }

            // ========== Own profile ==========
            "get_my_profile" => to_json(actions.get_my_profile(args.str_or("language", "en")).await?),
            "update_profile_intro" => {
                let update: IntroUpdate = args.parse()?;
                to_json(
                    actions
                        .update_profile_intro(&update, args.str_or("profile_language", "en"))
                        .await?,
                )
            }
            "update_profile_about" => to_json(
                actions
                    .update_profile_about(args.str("about_text")?, args.str_or("profile_language", "en"))
                    .await?,
            ),
            "add_experience" => {
                let entry: ExperienceEntry = args.parse()?;
                to_json(
                    actions
                        .add_experience(&entry, args.str_or("profile_language", "en"))
                        .await?,
                )
            }
            "add_education" => {
                let entry: EducationEntry = args.parse()?;
                to_json(
                    actions
                        .add_education(&entry, args.str_or("profile_language", "en"))
                        .await?,
                )
            }
            "add_skill" => to_json(actions.add_skill(args.str("skill_name")?).await?),
            "switch_profile_language" => {
                to_json(actions.switch_profile_language(args.str("language")?).await?)
            }
            "add_certification" => {
                let entry: CertificationEntry = args.parse()?;
                to_json(actions.add_certification(&entry).await?)
            }
            "add_project" => {
                let entry: ProjectEntry = args.parse()?;
                to_json(actions.add_project(&entry).await?)
            }
            "add_language" => to_json(
                actions
                    .add_language(
                        args.str("language")?,
                        args.str_or("proficiency", "Professional working"),
                    )
                    .await?,
            ),

            // ========== Jobs ==========
            "save_job" => to_json(actions.save_job(args.str("job_id")?).await?),
            "apply_to_job" => to_json(actions.apply_to_job(args.str("job_id")?).await?),
            "easy_apply_complete" => {
                let answers = args.string_map("answers");
                to_json(
                    actions
                        .easy_apply_complete(args.str("job_id")?, args.opt_str("phone_number"), &answers)
                        .await?,
                )
            }
            "get_saved_jobs" => to_json(actions.get_saved_jobs(args.u32_or("limit", 50)).await?),
            "get_applied_jobs" => to_json(actions.get_applied_jobs(args.u32_or("limit", 50)).await?),
            "get_job_alerts" => to_json(actions.get_job_alerts().await?),
            "create_job_alert" => to_json(
                actions
                    .create_job_alert(args.str("keywords")?, args.opt_str("location"))
                    .await?,
            ),

            // ========== Company and posts ==========
            "follow_company" => to_json(actions.follow_company(args.str("company_name")?).await?),
            "get_company_jobs" => to_json(
                actions
                    .get_company_jobs(args.str("company_name")?, args.u32_or("limit", 50))
                    .await?,
            ),
            "get_company_employees" => to_json(
                actions
                    .get_company_employees(
                        args.str("company_name")?,
                        args.opt_str("role_filter"),
                        args.opt_str("location_filter"),
                        args.u32_or("limit", 50),
                    )
                    .await?,
            ),
            "create_post" => {
                let visibility: Visibility = args.str_or("visibility", "anyone").parse()?;
                to_json(actions.create_post(args.str("content")?, visibility).await?)
            }

            _ => Err(ToolCallError::NotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body() {
        let err = ScraperError::AuthenticationRequired("LinkedIn session is not signed in".into());
        let body = error_body(&err);
        assert_eq!(body["error"], "authentication_required");
        assert_eq!(
            body["message"],
            "Authentication required: LinkedIn session is not signed in"
        );
        assert!(body["resolution"].as_str().unwrap().contains("--login"));
    }

    #[test]
    fn test_tool_call_error_display() {
        assert_eq!(
            ToolCallError::NotFound("nope".into()).to_string(),
            "Tool not found: nope"
        );
        let err: ToolCallError = ScraperError::RateLimited("slow".into()).into();
        assert_eq!(err.to_string(), "Rate limited: slow");
    }
}
