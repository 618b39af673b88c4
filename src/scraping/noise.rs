//! Page chrome stripping
//!
//! innerText of a LinkedIn page ends with sidebar recommendations, upsells
//! and the footer. Everything from the earliest known marker onwards goes.

use once_cell::sync::Lazy;
use regex::Regex;

static NOISE_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Footer nav: "About" directly followed by "Accessibility" or "Talent Solutions"
        r"(?m)^About\n+(?:Accessibility|Talent Solutions)",
        // Sidebar recommendations
        r"(?m)^More profiles for you$",
        // Sidebar premium upsell
        r"(?m)^Explore premium profiles$",
        // InMail upsell in the contact info overlay
        r"(?m)^Get up to .+ replies when you message with InMail$",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Truncate `text` at the earliest noise marker and trim the rest
pub fn strip_noise(text: &str) -> &str {
    let earliest = NOISE_MARKERS
        .iter()
        .filter_map(|marker| marker.find(text).map(|m| m.start()))
        .min()
        .unwrap_or(text.len());
    text[..earliest].trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_compile() {
        assert_eq!(NOISE_MARKERS.len(), 4);
    }

    #[test]
    fn test_no_markers_returns_trimmed() {
        assert_eq!(strip_noise("  Jane Doe\nEngineer  \n"), "Jane Doe\nEngineer");
        assert_eq!(strip_noise(""), "");
    }

    #[test]
    fn test_footer_marker() {
        let text = "Jane Doe\nEngineer\nAbout\nAccessibility\nTalent Solutions";
        assert_eq!(strip_noise(text), "Jane Doe\nEngineer");
    }

    #[test]
    fn test_footer_marker_with_blank_lines() {
        let text = "Experience\nAcme\n\nAbout\n\n\nTalent Solutions\nCareers";
        assert_eq!(strip_noise(text), "Experience\nAcme");
    }

    #[test]
    fn test_about_section_heading_is_kept() {
        // A profile's own "About" heading is not followed by footer links
        let text = "Jane Doe\nAbout\nI build things.";
        assert_eq!(strip_noise(text), text);
    }

    #[test]
    fn test_earliest_marker_wins() {
        let text = "Content\nExplore premium profiles\nAd\nMore profiles for you\nPeople";
        assert_eq!(strip_noise(text), "Content");

        let text = "Content\nMore profiles for you\nPeople\nExplore premium profiles";
        assert_eq!(strip_noise(text), "Content");
    }

    #[test]
    fn test_marker_must_fill_the_line() {
        let text = "See More profiles for you here\nreal content";
        assert_eq!(strip_noise(text), text);
    }

    #[test]
    fn test_inmail_upsell() {
        let text = "Contact info\njane@example.com\nGet up to 2x more replies when you message with InMail\nTry Premium";
        assert_eq!(strip_noise(text), "Contact info\njane@example.com");
    }

    #[test]
    fn test_only_chrome_strips_to_empty() {
        let text = "\nMore profiles for you\nJohn Smith\nAbout\nAccessibility";
        assert_eq!(strip_noise(text), "");
    }
}
