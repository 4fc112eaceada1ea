// src/config.rs

use clap::Parser;
use std::time::Duration;
use url::Url;

/// Terminal monitor for DORK-X reconnaissance scans.
#[derive(Debug, Clone, Parser)]
#[command(name = "dorkx-monitor", version, about)]
pub struct Cli {
    /// Base URL of the DORK-X backend.
    #[arg(long, env = "DORKX_API_URL", default_value = "http://localhost:8000")]
    pub api_url: Url,

    /// Seconds between two status polls of a running scan.
    #[arg(long = "poll-interval", env = "DORKX_POLL_INTERVAL", default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval_secs: u64,

    /// Upper bound, in seconds, for every API request.
    #[arg(long = "request-timeout", env = "DORKX_REQUEST_TIMEOUT", default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,

    /// Number of scans fetched for the dashboard.
    #[arg(long, default_value_t = 50)]
    pub page_size: u32,

    /// Identifier recorded with new scans.
    #[arg(long, env = "DORKX_USER_ID", default_value = "anonymous")]
    pub user_id: String,

    /// Open this scan directly instead of the launch screen.
    #[arg(long, conflicts_with = "dashboard")]
    pub scan: Option<String>,

    /// Start on the dashboard.
    #[arg(long)]
    pub dashboard: bool,
}

/// The screen the application opens on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartScreen {
    Launch,
    Scan(String),
    Dashboard,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub page_size: u32,
    pub user_id: String,
    pub start: StartScreen,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let start = match (cli.scan, cli.dashboard) {
            (Some(scan_id), _) => StartScreen::Scan(scan_id),
            (None, true) => StartScreen::Dashboard,
            (None, false) => StartScreen::Launch,
        };
        Self {
            api_url: cli.api_url,
            poll_interval: Duration::from_secs(cli.poll_interval_secs),
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            page_size: cli.page_size,
            user_id: cli.user_id,
            start,
        }
    }
}

impl Config {
    pub fn from_args() -> Self {
        Cli::parse().into()
    }
}
