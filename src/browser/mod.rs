//! Browser automation
//!
//! A single Chromium tab driven over the DevTools protocol.

pub mod dom;
pub mod page;
pub mod session;

pub use page::{ChromePage, PageDriver};
pub use session::{BrowserConfig, LinkedInSession, PageProvider};
