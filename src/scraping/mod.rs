//! LinkedIn page scraping
//!
//! Read-only tools return raw innerText per section; the calling model does
//! the parsing.

pub mod extractor;
pub mod fields;
pub mod noise;
pub mod result;
pub mod urls;

pub use extractor::{Extractor, Region, RATE_LIMITED_MSG};
pub use fields::{
    parse_company_sections, parse_person_sections, CompanySection, CompanySections, PersonSection,
    PersonSections,
};
pub use noise::strip_noise;
pub use result::ScrapeResult;
