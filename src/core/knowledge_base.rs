//! Static display metadata for risk levels and scan statuses.
//!
//! Labels and colors live here so the reducer and every screen agree on them,
//! and so an unrecognised risk value has a single neutral bucket to fall into.

use crate::core::models::{RiskLevel, ScanStatus};

/// Display metadata for one risk bucket.
pub struct RiskDetail {
    /// The bucket this entry describes.
    pub level: RiskLevel,
    /// Title-cased label used in charts and cards (e.g. "Critical").
    pub label: &'static str,
    /// Hex color shared by charts and badges.
    pub color: &'static str,
    /// One-line explanation shown next to the filter.
    pub description: &'static str,
}

static RISK_LEVELS: &[RiskDetail] = &[
    RiskDetail {
        level: RiskLevel::Critical,
        label: "Critical",
        color: "#DC2626",
        description: "Directly exploitable exposure such as leaked credentials, database dumps or private keys.",
    },
    RiskDetail {
        level: RiskLevel::High,
        label: "High",
        color: "#EA580C",
        description: "Sensitive files or admin surfaces that materially help an attacker.",
    },
    RiskDetail {
        level: RiskLevel::Medium,
        label: "Medium",
        color: "#FACC15",
        description: "Information disclosure that widens the attack surface.",
    },
    RiskDetail {
        level: RiskLevel::Low,
        label: "Low",
        color: "#22C55E",
        description: "Minor exposure with limited impact on its own.",
    },
    RiskDetail {
        level: RiskLevel::Info,
        label: "Info",
        color: "#3B82F6",
        description: "Public information worth knowing about, not a weakness by itself.",
    },
];

// Values outside the five fixed buckets render here instead of failing.
static NEUTRAL_RISK: RiskDetail = RiskDetail {
    level: RiskLevel::Unknown,
    label: "Unrated",
    color: "#6B7280",
    description: "The backend reported a risk level this client does not recognise.",
};

/// Retrieves the display metadata for a risk level.
///
/// # Arguments
///
/// * `level` - Any risk level, including the neutral `Unknown` bucket.
///
/// # Returns
///
/// The matching entry, or the neutral entry for unrecognised levels.
pub fn risk_detail(level: RiskLevel) -> &'static RiskDetail {
    RISK_LEVELS.iter().find(|d| d.level == level).unwrap_or(&NEUTRAL_RISK)
}

/// Badge color of a scan status.
pub fn status_color(status: ScanStatus) -> &'static str {
    match status {
        ScanStatus::Completed => "#22C55E",
        ScanStatus::Running => "#3B82F6",
        ScanStatus::Failed | ScanStatus::Aborted => "#DC2626",
        ScanStatus::Pending => "#FACC15",
        ScanStatus::Unknown => NEUTRAL_RISK.color,
    }
}
