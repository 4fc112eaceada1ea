// src/core/launch.rs

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::core::api::ScanApi;
use crate::core::error::LaunchError;
use crate::core::models::{NewScan, Scan, ScanProfile};

lazy_static! {
    static ref DOMAIN_PATTERN: Regex =
        Regex::new(r"^(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}$")
            .expect("domain pattern is valid");
}

/// Everything the launch screen collects before a scan can start.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRequest {
    pub target: String,
    pub profile: ScanProfile,
    pub consent_accepted: bool,
    pub user_id: String,
}

/// Brings user input to the form the backend validates: no scheme, no
/// leading `www.`, no trailing slash, lower case.
pub fn normalize_target(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
    without_www.trim_end_matches('/').to_lowercase()
}

/// Local format check, so obviously malformed input never reaches the backend.
pub fn check_target_format(target: &str) -> Result<(), LaunchError> {
    if target.is_empty() {
        return Err(LaunchError::EmptyTarget);
    }
    if !DOMAIN_PATTERN.is_match(target) {
        return Err(LaunchError::InvalidTarget {
            reason: "Invalid domain format. Please provide a valid domain (e.g., example.com)".to_string(),
        });
    }
    Ok(())
}

/// Validates the target and creates the scan.
///
/// Consent and format problems are reported before any network call. The
/// backend's validation verdict is honoured next, and only then is the scan
/// created for the normalized target it returned.
///
/// # Arguments
/// * `api` - The remote boundary.
/// * `request` - The launch form.
///
/// # Returns
/// The freshly created `Scan` (normally in `pending` state).
pub async fn launch_scan(api: &dyn ScanApi, request: &LaunchRequest) -> Result<Scan, LaunchError> {
    if !request.consent_accepted {
        return Err(LaunchError::ConsentRequired);
    }

    let target = normalize_target(&request.target);
    check_target_format(&target)?;

    let verdict = api.validate_target(&target).await?;
    if !verdict.valid {
        let reason = verdict.reason.unwrap_or_else(|| "Target rejected by the server".to_string());
        warn!(%target, %reason, "Target rejected.");
        return Err(LaunchError::InvalidTarget { reason });
    }
    for warning in &verdict.warnings {
        info!(%target, %warning, "Target validation warning.");
    }

    let scan = api
        .create_scan(&NewScan {
            target_domain: verdict.normalized_target.unwrap_or(target),
            scan_profile: request.profile,
            consent_accepted: true,
            user_id: request.user_id.clone(),
        })
        .await?;

    info!(scan_id = %scan.id, target = %scan.target_domain, profile = %scan.scan_profile, "Scan created.");
    Ok(scan)
}
