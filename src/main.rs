//! LinkedIn MCP Server - Entry Point
//!
//! Modes:
//! - Default: MCP server over stdio
//! - --login / -l: open a visible browser to sign in and keep the session

use linkedin_mcp::{Config, LinkedInSession, McpServer};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// How long `--login` waits for the user to reach the feed
const LOGIN_TIMEOUT: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Parse args
    let args: Vec<String> = std::env::args().collect();
    let login_mode = args.iter().any(|a| a == "--login" || a == "-l");
    let help_mode = args.iter().any(|a| a == "--help" || a == "-h");

    if help_mode {
        println!("LinkedIn MCP Server v{}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Usage: linkedin-mcp [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --login, -l   Open a browser window to sign in to LinkedIn");
        println!("  --help, -h    Show this help");
        println!();
        println!("Default: Run as MCP server (stdio)");
        println!();
        println!("Environment variables:");
        println!("  LINKEDIN_COOKIE              li_at session cookie");
        println!("  LINKEDIN_USER_DATA_DIR       Persistent browser profile directory");
        println!("  CHROME_PATH                  Browser executable");
        println!("  BROWSER_HEADLESS             Headless mode (default: true)");
        println!("  BROWSER_TIMEOUT              Navigation timeout in seconds (default: 30)");
        println!("  BROWSER_USER_AGENT           User agent override");
        println!("  BROWSER_VIEWPORT_WIDTH       Window width (default: 1280)");
        println!("  BROWSER_VIEWPORT_HEIGHT      Window height (default: 900)");
        println!("  LINKEDIN_NAV_DELAY           Seconds between section pages (default: 2.0)");
        println!("  LINKEDIN_RATE_LIMIT_BACKOFF  Seconds before retrying a blocked page (default: 5.0)");
        println!("  LINKEDIN_PACE                Multiplier for UI settle sleeps (default: 1.0)");
        println!("  RUST_LOG                     Log filter (default: info)");
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if login_mode {
        // Interactive mode - readable logs on stderr
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        // MCP mode - stdout carries the protocol, log to stderr as JSON
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .json()
            .init();
    }

    let config = Config::from_env()?;

    if login_mode {
        info!("LinkedIn login v{}", env!("CARGO_PKG_VERSION"));

        let session = LinkedInSession::new(config.browser.headed());
        let outcome = session.interactive_login(LOGIN_TIMEOUT).await;
        session.close().await?;
        outcome?;
    } else {
        info!("LinkedIn MCP Server v{}", env!("CARGO_PKG_VERSION"));

        let server = McpServer::new(config);
        let outcome = server.run().await;
        server.tools().close().await;
        outcome?;
    }

    Ok(())
}
