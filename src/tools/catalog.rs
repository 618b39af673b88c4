//! Every tool the server publishes

use serde_json::json;

use super::schema::ToolSchema;

const USERNAME: &str = "LinkedIn username from the profile URL (e.g. \"williamhgates\")";
const COMPANY: &str = "LinkedIn company identifier from the URL (e.g. \"docker\", \"anthropic\")";
const JOB_ID: &str = "LinkedIn job ID from the job URL (e.g. \"4252026496\")";
const PROFILE_LANGUAGE: &str = "Profile language to edit";
const MONTH: &str = "Month name (e.g. \"January\")";
const YEAR: &str = "Four digit year";

fn scraping() -> Vec<ToolSchema> {
    vec![
        ToolSchema::new(
            "get_person_profile",
            "Get Person Profile",
            "Get a person's LinkedIn profile as raw text per section. The main profile page is \
             always included. Returns url, sections (name -> raw text), pages_visited and \
             sections_requested; parse the raw text yourself.",
        )
        .with_string_param("linkedin_username", USERNAME, true)
        .with_string_param(
            "sections",
            "Comma separated extra sections: experience, education, interests, honors, \
             languages, contact_info",
            false,
        )
        .with_start_message("Starting person profile scrape"),
        ToolSchema::new(
            "get_company_profile",
            "Get Company Profile",
            "Get a company's LinkedIn page as raw text per section. The about page is always \
             included.",
        )
        .with_string_param("company_name", COMPANY, true)
        .with_string_param("sections", "Comma separated extra sections: posts, jobs", false)
        .with_start_message("Starting company profile scrape"),
        ToolSchema::new(
            "get_company_posts",
            "Get Company Posts",
            "Get recent posts from a company's LinkedIn feed as raw text.",
        )
        .with_string_param("company_name", COMPANY, true)
        .with_start_message("Starting company posts scrape"),
        ToolSchema::new(
            "get_job_details",
            "Get Job Details",
            "Get the full text of a LinkedIn job posting.",
        )
        .with_string_param("job_id", JOB_ID, true)
        .with_start_message("Starting job scrape"),
        ToolSchema::new(
            "search_jobs",
            "Search Jobs",
            "Search LinkedIn jobs and return the results page as raw text.",
        )
        .with_string_param("keywords", "Search terms (e.g. \"rust engineer\")", true)
        .with_string_param("location", "Optional location filter (e.g. \"Berlin\")", false)
        .with_start_message("Starting job search"),
        ToolSchema::new(
            "search_posts",
            "Search Posts",
            "Search LinkedIn posts, e.g. job offers shared in the feed.",
        )
        .with_string_param("keywords", "Search terms (e.g. \"hiring rust\")", true)
        .with_enum_param(
            "date_posted",
            "Only posts from this period",
            &["past-24h", "past-week", "past-month"],
            false,
        )
        .with_enum_param("sort_by", "Result order", &["date_posted", "relevance"], false)
        .with_start_message("Starting post search"),
        ToolSchema::new(
            "search_people",
            "Search People",
            "Search LinkedIn members, e.g. recruiters or people in a role. Each result card \
             starts with `Profile: <url>`.",
        )
        .with_string_param("keywords", "Search terms (e.g. \"tech recruiter\")", true)
        .with_string_param(
            "network",
            "Comma separated connection degrees: F (1st), S (2nd), O (3rd+)",
            false,
        )
        .with_string_param(
            "location",
            "geoUrn location code (e.g. \"103644278\" United States, \"101165590\" United Kingdom)",
            false,
        )
        .with_string_param("current_company", "Current company filter", false)
        .with_start_message("Starting people search"),
    ]
}

fn person() -> Vec<ToolSchema> {
    vec![
        ToolSchema::new(
            "connect_with_person",
            "Connect with Person",
            "Send a connection request, optionally with a note of up to 200 characters.",
        )
        .writes()
        .with_string_param("linkedin_username", USERNAME, true)
        .with_string_param("note", "Personal note (truncated to 200 characters)", false),
        ToolSchema::new("send_message", "Send Message", "Send a direct message to a member.")
            .writes()
            .with_string_param("linkedin_username", USERNAME, true)
            .with_string_param("message", "Message text", true),
        ToolSchema::new("follow_person", "Follow Person", "Follow a member's activity.")
            .writes()
            .with_string_param("linkedin_username", USERNAME, true),
        ToolSchema::new(
            "withdraw_connection",
            "Withdraw Connection Request",
            "Withdraw a pending connection request.",
        )
        .destructive()
        .with_string_param("linkedin_username", USERNAME, true),
    ]
}

fn network() -> Vec<ToolSchema> {
    vec![
        ToolSchema::new(
            "get_my_network",
            "Get My Network",
            "Pending invitations and people-you-may-know suggestions.",
        )
        .closed_world(),
        ToolSchema::new(
            "get_pending_invitations",
            "Get Pending Invitations",
            "Connection invitations waiting for a reply.",
        )
        .closed_world(),
        ToolSchema::new(
            "accept_connection",
            "Accept Connection",
            "Accept a pending invitation by the sender's name.",
        )
        .writes()
        .closed_world()
        .with_string_param("person_name", "Name as shown on the invitation", true),
        ToolSchema::new(
            "reject_connection",
            "Reject Connection",
            "Ignore a pending invitation by the sender's name.",
        )
        .writes()
        .closed_world()
        .with_string_param("person_name", "Name as shown on the invitation", true),
        ToolSchema::new("get_connections", "Get Connections", "List first-degree connections.")
            .closed_world()
            .with_int_param("limit", "Maximum connections to return", 50),
        ToolSchema::new(
            "remove_connection",
            "Remove Connection",
            "Remove a first-degree connection.",
        )
        .destructive()
        .closed_world()
        .with_string_param("linkedin_username", USERNAME, true),
        ToolSchema::new("get_notifications", "Get Notifications", "Recent notifications.")
            .closed_world()
            .with_enum_param(
                "filter_type",
                "Notification tab",
                &["all", "jobs", "my_posts", "mentions"],
                false,
            )
            .with_default("filter_type", json!("all"))
            .with_int_param("limit", "Maximum notifications to return", 20),
        ToolSchema::new(
            "get_profile_views",
            "Get Profile Views",
            "Who viewed your profile recently.",
        )
        .closed_world()
        .with_int_param("limit", "Maximum viewers to return", 20),
        ToolSchema::new("endorse_skill", "Endorse Skill", "Endorse a skill on a connection's profile.")
            .writes()
            .closed_world()
            .with_string_param("linkedin_username", USERNAME, true)
            .with_string_param("skill_name", "Skill as listed on the profile", true),
        ToolSchema::new(
            "request_recommendation",
            "Request Recommendation",
            "Ask a connection to write a recommendation.",
        )
        .writes()
        .closed_world()
        .with_string_param("linkedin_username", USERNAME, true)
        .with_string_param("message", "Personal message", false)
        .with_string_param("relationship", "How you know each other", false)
        .with_string_param("position_at_time", "Your position at the time", false),
    ]
}

fn messaging() -> Vec<ToolSchema> {
    vec![
        ToolSchema::new(
            "get_messages",
            "Get Messages",
            "Read the thread with one member, or the inbox when no username is given.",
        )
        .closed_world()
        .with_string_param("linkedin_username", USERNAME, false),
        ToolSchema::new(
            "get_conversation",
            "Get Conversation",
            "Read the message history with one member.",
        )
        .closed_world()
        .with_string_param("linkedin_username", USERNAME, true)
        .with_int_param("limit", "Maximum messages to return", 50),
        ToolSchema::new(
            "archive_conversation",
            "Archive Conversation",
            "Archive the conversation with one member.",
        )
        .writes()
        .closed_world()
        .with_string_param("linkedin_username", USERNAME, true),
    ]
}

fn dated(schema: ToolSchema) -> ToolSchema {
    schema
        .with_string_param("start_month", MONTH, false)
        .with_string_param("start_year", YEAR, false)
        .with_string_param("end_month", MONTH, false)
        .with_string_param("end_year", YEAR, false)
        .with_bool_param("is_current", "Still ongoing", false)
}

fn profile() -> Vec<ToolSchema> {
    vec![
        ToolSchema::new(
            "get_my_profile",
            "Get My Profile",
            "Structured data from your own profile.",
        )
        .closed_world()
        .with_enum_param("language", "Profile language to read", &["en", "pt"], false)
        .with_default("language", json!("en")),
        ToolSchema::new(
            "update_profile_intro",
            "Update Profile Intro",
            "Update name, headline, industry, location or pronouns. Unset fields are left alone.",
        )
        .writes()
        .closed_world()
        .with_string_param("first_name", "First name", false)
        .with_string_param("last_name", "Last name", false)
        .with_string_param("headline", "Headline", false)
        .with_string_param("industry", "Industry", false)
        .with_string_param("city", "City", false)
        .with_string_param("country", "Country or region", false)
        .with_string_param("pronouns", "Pronouns", false)
        .with_enum_param("profile_language", PROFILE_LANGUAGE, &["en", "pt"], false)
            .with_default("profile_language", json!("en")),
        ToolSchema::new(
            "update_profile_about",
            "Update Profile About",
            "Replace the About section.",
        )
        .writes()
        .closed_world()
        .with_string_param("about_text", "New About text", true)
        .with_enum_param("profile_language", PROFILE_LANGUAGE, &["en", "pt"], false)
            .with_default("profile_language", json!("en")),
        dated(
            ToolSchema::new("add_experience", "Add Experience", "Add a position to Experience.")
                .writes()
                .closed_world()
                .with_string_param("title", "Job title", true)
                .with_string_param("company", "Company name", true)
                .with_string_param("location", "Location", false)
                .with_string_param("description", "Description", false)
                .with_string_param(
                    "employment_type",
                    "Full-time, Part-time, Contract, Internship, ...",
                    false,
                ),
        )
        .with_enum_param("profile_language", PROFILE_LANGUAGE, &["en", "pt"], false)
            .with_default("profile_language", json!("en")),
        ToolSchema::new("add_education", "Add Education", "Add a school to Education.")
            .writes()
            .closed_world()
            .with_string_param("school", "School name", true)
            .with_string_param("degree", "Degree", false)
            .with_string_param("field_of_study", "Field of study", false)
            .with_string_param("start_year", YEAR, false)
            .with_string_param("end_year", YEAR, false)
            .with_string_param("description", "Description", false)
            .with_enum_param("profile_language", PROFILE_LANGUAGE, &["en", "pt"], false)
            .with_default("profile_language", json!("en")),
        ToolSchema::new("add_skill", "Add Skill", "Add a skill to your profile.")
            .writes()
            .closed_world()
            .with_string_param("skill_name", "Skill name", true),
        ToolSchema::new(
            "switch_profile_language",
            "Switch Profile Language",
            "Switch which language version of your profile is shown.",
        )
        .writes()
        .closed_world()
        .with_enum_param("language", "Profile language", &["en", "pt"], true),
        ToolSchema::new(
            "add_certification",
            "Add Certification",
            "Add a license or certification.",
        )
        .writes()
        .closed_world()
        .with_string_param("name", "Certification name", true)
        .with_string_param("issuing_organization", "Issuing organization", true)
        .with_string_param("issue_month", MONTH, false)
        .with_string_param("issue_year", YEAR, false)
        .with_string_param("expiration_month", MONTH, false)
        .with_string_param("expiration_year", YEAR, false)
        .with_bool_param("has_expiration", "Whether the credential expires", true)
        .with_string_param("credential_id", "Credential ID (max 80 characters)", false)
        .with_string_param("credential_url", "Credential URL", false),
        dated(
            ToolSchema::new("add_project", "Add Project", "Add a project to your profile.")
                .writes()
                .closed_world()
                .with_string_param("name", "Project name", true)
                .with_string_param("description", "Description (max 2000 characters)", false)
                .with_string_param("project_url", "Project URL", false),
        ),
        ToolSchema::new("add_language", "Add Language", "Add a language you speak.")
            .writes()
            .closed_world()
            .with_string_param("language", "Language name", true)
            .with_string_param(
                "proficiency",
                "Elementary, Limited working, Professional working, Full professional or \
                 Native or bilingual",
                false,
            )
            .with_default("proficiency", json!("Professional working")),
    ]
}

fn jobs() -> Vec<ToolSchema> {
    vec![
        ToolSchema::new("save_job", "Save Job", "Toggle the saved state of a job.")
            .writes()
            .with_string_param("job_id", JOB_ID, true),
        ToolSchema::new(
            "apply_to_job",
            "Apply to Job",
            "Open the Easy Apply dialog, or report the external application link.",
        )
        .writes()
        .with_string_param("job_id", JOB_ID, true),
        ToolSchema::new(
            "easy_apply_complete",
            "Easy Apply Complete",
            "Walk the Easy Apply dialog to submission, filling phone and known questions.",
        )
        .writes()
        .with_string_param("job_id", JOB_ID, true)
        .with_string_param("phone_number", "Phone number for the contact step", false)
        .with_map_param(
            "answers",
            "Question keyword to answer, e.g. {\"years of experience\": \"5\"}",
        ),
        ToolSchema::new("get_saved_jobs", "Get Saved Jobs", "Jobs you saved.")
            .with_int_param("limit", "Maximum jobs to return", 50),
        ToolSchema::new("get_applied_jobs", "Get Applied Jobs", "Jobs you applied to, with status.")
            .with_int_param("limit", "Maximum jobs to return", 50),
        ToolSchema::new("get_job_alerts", "Get Job Alerts", "Your job search alerts."),
        ToolSchema::new(
            "create_job_alert",
            "Create Job Alert",
            "Turn on an alert for a job search.",
        )
        .writes()
        .with_string_param("keywords", "Search terms", true)
        .with_string_param("location", "Optional location", false),
    ]
}

fn company() -> Vec<ToolSchema> {
    vec![
        ToolSchema::new("follow_company", "Follow Company", "Toggle following a company.")
            .writes()
            .with_string_param("company_name", COMPANY, true),
        ToolSchema::new(
            "get_company_jobs",
            "Get Company Jobs",
            "Open positions at a company.",
        )
        .with_string_param("company_name", COMPANY, true)
        .with_int_param("limit", "Maximum jobs to return", 50),
        ToolSchema::new(
            "get_company_employees",
            "Get Company Employees",
            "Members working at a company.",
        )
        .with_string_param("company_name", COMPANY, true)
        .with_string_param("role_filter", "Role filter (e.g. \"Engineer\")", false)
        .with_string_param("location_filter", "Location filter (e.g. \"London\")", false)
        .with_int_param("limit", "Maximum employees to return", 50),
        ToolSchema::new("create_post", "Create Post", "Publish a text post to your feed.")
            .writes()
            .with_string_param("content", "Post text", true)
            .with_enum_param("visibility", "Who can see the post", &["anyone", "connections"], false)
            .with_default("visibility", json!("anyone")),
    ]
}

fn session() -> Vec<ToolSchema> {
    vec![ToolSchema::new(
        "close_session",
        "Close Session",
        "Close the browser. The next call launches a fresh one.",
    )
    .writes()
    .closed_world()]
}

/// All tool schemas in listing order
pub fn all() -> Vec<ToolSchema> {
    [
        scraping(),
        person(),
        network(),
        messaging(),
        profile(),
        jobs(),
        company(),
        session(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let tools = all();
        let names: HashSet<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn test_hints() {
        let tools = all();
        let find = |name: &str| tools.iter().find(|t| t.name == name).unwrap();

        assert!(find("get_person_profile").annotations.read_only);
        assert!(find("get_person_profile").annotations.open_world);
        assert!(!find("send_message").annotations.read_only);
        assert!(find("remove_connection").annotations.destructive);
        assert!(find("withdraw_connection").annotations.destructive);
        assert!(!find("get_my_network").annotations.open_world);
    }

    #[test]
    fn test_certification_expires_by_default() {
        let tools = all();
        let cert = tools.iter().find(|t| t.name == "add_certification").unwrap();
        assert_eq!(
            cert.parameters["properties"]["has_expiration"]["default"],
            serde_json::json!(true)
        );
    }
}
