//! Section selection for person and company scrapes

use std::fmt;

/// Pages of a person profile that can be scraped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PersonSection {
    MainProfile,
    Experience,
    Education,
    Interests,
    Honors,
    Languages,
    ContactInfo,
}

impl PersonSection {
    pub const ALL: [PersonSection; 7] = [
        Self::MainProfile,
        Self::Experience,
        Self::Education,
        Self::Interests,
        Self::Honors,
        Self::Languages,
        Self::ContactInfo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::MainProfile => "main_profile",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Interests => "interests",
            Self::Honors => "honors",
            Self::Languages => "languages",
            Self::ContactInfo => "contact_info",
        }
    }

    /// Path under `/in/{username}`
    pub fn suffix(self) -> &'static str {
        match self {
            Self::MainProfile => "/",
            Self::Experience => "/details/experience/",
            Self::Education => "/details/education/",
            Self::Interests => "/details/interests/",
            Self::Honors => "/details/honors/",
            Self::Languages => "/details/languages/",
            Self::ContactInfo => "/overlay/contact-info/",
        }
    }

    /// Contact info renders as a dialog over the profile
    pub fn is_overlay(self) -> bool {
        matches!(self, Self::ContactInfo)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for PersonSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pages of a company profile that can be scraped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompanySection {
    About,
    Posts,
    Jobs,
}

impl CompanySection {
    pub const ALL: [CompanySection; 3] = [Self::About, Self::Posts, Self::Jobs];

    pub fn name(self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Posts => "posts",
            Self::Jobs => "jobs",
        }
    }

    /// Path under `/company/{name}`
    pub fn suffix(self) -> &'static str {
        match self {
            Self::About => "/about/",
            Self::Posts => "/posts/",
            Self::Jobs => "/jobs/",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for CompanySection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered, duplicate-free set of sections that always holds the base one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSet<S> {
    sections: Vec<S>,
}

impl<S: Copy + Ord> SectionSet<S> {
    pub fn with_base(base: S) -> Self {
        Self { sections: vec![base] }
    }

    pub fn insert(&mut self, section: S) {
        if let Err(at) = self.sections.binary_search(&section) {
            self.sections.insert(at, section);
        }
    }

    pub fn contains(&self, section: S) -> bool {
        self.sections.binary_search(&section).is_ok()
    }

    /// Sections in declaration order
    pub fn iter(&self) -> impl Iterator<Item = S> + '_ {
        self.sections.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

pub type PersonSections = SectionSet<PersonSection>;
pub type CompanySections = SectionSet<CompanySection>;

impl Default for PersonSections {
    fn default() -> Self {
        Self::with_base(PersonSection::MainProfile)
    }
}

impl Default for CompanySections {
    fn default() -> Self {
        Self::with_base(CompanySection::About)
    }
}

fn parse_sections<S: Copy + Ord>(
    base: S,
    raw: Option<&str>,
    lookup: impl Fn(&str) -> Option<S>,
) -> (SectionSet<S>, Vec<String>) {
    let mut set = SectionSet::with_base(base);
    let mut unknown: Vec<String> = Vec::new();

    let names = raw
        .unwrap_or("")
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    for name in names {
        match lookup(&name) {
            Some(section) => set.insert(section),
            None if !unknown.contains(&name) => unknown.push(name),
            None => {}
        }
    }
    (set, unknown)
}

/// Parse a comma separated list of person sections. Returns the sections to
/// visit and the names that matched nothing.
pub fn parse_person_sections(raw: Option<&str>) -> (PersonSections, Vec<String>) {
    parse_sections(PersonSection::MainProfile, raw, PersonSection::from_name)
}

/// Parse a comma separated list of company sections
pub fn parse_company_sections(raw: Option<&str>) -> (CompanySections, Vec<String>) {
    parse_sections(CompanySection::About, raw, CompanySection::from_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_base_only() {
        let (set, unknown) = parse_person_sections(None);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![PersonSection::MainProfile]);
        assert!(unknown.is_empty());

        let (set, _) = parse_company_sections(Some(""));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![CompanySection::About]);
    }

    #[test]
    fn test_canonical_order_and_dedup() {
        let (set, unknown) = parse_person_sections(Some("contact_info, Experience,education,experience"));
        assert_eq!(
            set.iter().map(PersonSection::name).collect::<Vec<_>>(),
            vec!["main_profile", "experience", "education", "contact_info"]
        );
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_unknown_sections_reported() {
        let (set, unknown) = parse_person_sections(Some("skills,honors,,skills, posts"));
        assert_eq!(set.len(), 2);
        assert!(set.contains(PersonSection::Honors));
        assert_eq!(unknown, vec!["skills".to_string(), "posts".to_string()]);
    }

    #[test]
    fn test_company_sections() {
        let (set, unknown) = parse_company_sections(Some("jobs,posts,about,people"));
        assert_eq!(
            set.iter().map(CompanySection::name).collect::<Vec<_>>(),
            vec!["about", "posts", "jobs"]
        );
        assert_eq!(unknown, vec!["people".to_string()]);
    }

    #[test]
    fn test_explicit_base_is_not_unknown() {
        let (set, unknown) = parse_person_sections(Some("main_profile"));
        assert_eq!(set.len(), 1);
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_overlay_flag() {
        assert!(PersonSection::ContactInfo.is_overlay());
        assert!(!PersonSection::Experience.is_overlay());
        assert_eq!(PersonSection::ContactInfo.suffix(), "/overlay/contact-info/");
    }
}
