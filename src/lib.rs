//! LinkedIn MCP Server
//!
//! Model Context Protocol server that drives a signed-in LinkedIn tab in
//! Chromium and exposes scraping, messaging, network, profile and job
//! workflows as MCP tools.
//!
//! # Architecture
//!
//! ```text
//! MCP client ──► MCP Protocol ──► ToolRegistry ──► Extractor ─┐
//!                  (stdio)             │                      ├──► PageDriver ──► Chromium
//!                                      └──────────► Actions ──┘        ▲
//!                                                                      │
//!                                                     LinkedInSession ─┘
//! ```
//!
//! Read-only tools return raw innerText per section and leave parsing to the
//! calling model. Classified failures (sign-in required, rate limits,
//! security checkpoints) surface as tool errors; anything else degrades to an
//! empty section or a `status: error` record.

pub mod actions;
pub mod browser;
pub mod config;
pub mod error;
pub mod mcp;
pub mod scraping;
pub mod tools;

pub use actions::{ActionResult, Actions, Status};
pub use browser::{BrowserConfig, ChromePage, LinkedInSession, PageDriver, PageProvider};
pub use config::{Config, Timing};
pub use error::{Result, ScraperError};
pub use mcp::{McpRequest, McpResponse, McpServer};
pub use scraping::{Extractor, ScrapeResult, RATE_LIMITED_MSG};
pub use tools::{Progress, ToolCallError, ToolRegistry};
