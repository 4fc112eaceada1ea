// src/logging.rs

use color_eyre::eyre::Result;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use std::path::PathBuf;
use tracing_error::ErrorLayer;
use tracing_subscriber::{self, EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase();
    /// Level override consulted when `RUST_LOG` is unset.
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.as_str());
    /// Directory override for the log file, mostly for sandboxes and CI.
    pub static ref DATA_ENV: String = format!("{}_DATA", PROJECT_NAME.as_str());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Where the log file lives: `DORKX_MONITOR_DATA` if set, else the platform's
/// local data directory, else `./.data`.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_ENV.as_str()) {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("com", "dorkx", env!("CARGO_PKG_NAME"))
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join(".data"))
}

/// Picks the filter directive: `RUST_LOG` first, then the crate's own level
/// variable, then `info` for this crate only so dependency chatter stays out.
fn filter_directive(rust_log: Option<String>, crate_level: Option<String>) -> String {
    rust_log
        .filter(|v| !v.trim().is_empty())
        .or_else(|| {
            crate_level
                .filter(|v| !v.trim().is_empty())
                .map(|level| format!("{}={}", env!("CARGO_CRATE_NAME"), level.trim()))
        })
        .unwrap_or_else(|| format!("{}=info", env!("CARGO_CRATE_NAME")))
}

/// Installs the file subscriber and returns the path it writes to.
///
/// The terminal belongs to the TUI, so nothing is ever logged to stdout or
/// stderr. `ErrorLayer` captures span traces for `color-eyre` reports.
pub fn initialize_logging() -> Result<PathBuf> {
    let directory = data_dir();
    std::fs::create_dir_all(&directory)?;
    let path = directory.join(LOG_FILE.as_str());
    let log_file = std::fs::File::create(&path)?;

    let directive = filter_directive(std::env::var("RUST_LOG").ok(), std::env::var(LOG_ENV.as_str()).ok());

    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(path)
}
