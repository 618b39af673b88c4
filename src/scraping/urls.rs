//! LinkedIn URL construction

use url::form_urlencoded::byte_serialize;

pub const BASE: &str = "https://www.linkedin.com";

/// Form-encode a query value (spaces become `+`)
pub fn quote_plus(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

pub fn profile_url(username: &str) -> String {
    format!("{}/in/{}/", BASE, username)
}

pub fn company_url(company: &str) -> String {
    format!("{}/company/{}/", BASE, company)
}

pub fn job_url(job_id: &str) -> String {
    format!("{}/jobs/view/{}/", BASE, job_id)
}

pub fn job_search_url(keywords: &str, location: Option<&str>) -> String {
    let mut params = format!("keywords={}", quote_plus(keywords));
    if let Some(location) = location.filter(|l| !l.is_empty()) {
        params.push_str(&format!("&location={}", quote_plus(location)));
    }
    format!("{}/jobs/search/?{}", BASE, params)
}

/// Content search. Date and sort values are wrapped in double quotes.
pub fn post_search_url(keywords: &str, date_posted: Option<&str>, sort_by: Option<&str>) -> String {
    let mut params = format!("keywords={}&origin=FACETED_SEARCH", quote_plus(keywords));
    if let Some(date) = date_posted.filter(|d| !d.is_empty()) {
        params.push_str(&format!("&datePosted={}", quote_plus(&format!("\"{}\"", date))));
    }
    if let Some(sort) = sort_by.filter(|s| !s.is_empty()) {
        params.push_str(&format!("&sortBy={}", quote_plus(&format!("\"{}\"", sort))));
    }
    format!("{}/search/results/content/?{}", BASE, params)
}

/// People search. `network` and `geoUrn` are JSON arrays of quoted strings.
pub fn people_search_url(
    keywords: &str,
    network: &[String],
    location: Option<&str>,
    current_company: Option<&str>,
) -> String {
    let mut params = format!("keywords={}&origin=FACETED_SEARCH", quote_plus(keywords));
    if !network.is_empty() {
        let degrees: Vec<String> = network.iter().map(|n| format!("\"{}\"", n)).collect();
        params.push_str(&format!("&network={}", quote_plus(&format!("[{}]", degrees.join(",")))));
    }
    if let Some(location) = location.filter(|l| !l.is_empty()) {
        params.push_str(&format!("&geoUrn={}", quote_plus(&format!("[\"{}\"]", location))));
    }
    if let Some(company) = current_company.filter(|c| !c.is_empty()) {
        params.push_str(&format!("&currentCompany={}", quote_plus(company)));
    }
    format!("{}/search/results/people/?{}", BASE, params)
}
