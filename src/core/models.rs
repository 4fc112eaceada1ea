// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use strum::{Display, IntoStaticStr};

use crate::core::error::ApiError;

// --- Reusable Result Types ---

// Every remote read settles into one of these. Failures carry the API error so
// the aggregator can log it before discarding it.
pub type ApiResult<T> = Result<T, ApiError>;

// --- Enumerations ---

// The depth of a scan as chosen at launch time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScanProfile {
    Quick,
    #[default]
    Standard,
    Deep,
    // Anything the backend invents later lands here instead of failing the payload.
    #[serde(other)]
    Unknown,
}

impl ScanProfile {
    /// The profiles a user can pick at launch time.
    pub const ALL: [ScanProfile; 3] = [ScanProfile::Quick, ScanProfile::Standard, ScanProfile::Deep];
}

// The lifecycle state of a scan job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScanStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Aborted,
    #[serde(other)]
    Unknown,
}

impl ScanStatus {
    /// Every status the backend is known to emit.
    pub const KNOWN: [ScanStatus; 5] = [
        ScanStatus::Pending,
        ScanStatus::Running,
        ScanStatus::Completed,
        ScanStatus::Failed,
        ScanStatus::Aborted,
    ];

    /// A job in one of these states may still change, so it is worth polling.
    pub fn is_active(self) -> bool {
        matches!(self, ScanStatus::Pending | ScanStatus::Running)
    }

    /// No further transition is expected once a job reaches one of these states.
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Failed | ScanStatus::Aborted)
    }

    fn rank(self) -> Option<u8> {
        match self {
            ScanStatus::Pending => Some(0),
            ScanStatus::Running => Some(1),
            ScanStatus::Completed | ScanStatus::Failed | ScanStatus::Aborted => Some(2),
            ScanStatus::Unknown => None,
        }
    }

    /// Returns `true` when moving from `self` to `next` respects the monotonic
    /// lifecycle `pending -> running -> {completed, failed, aborted}`.
    ///
    /// Staying in the same state is always allowed. A terminal state only
    /// accepts itself. A known state never gives way to `Unknown`, while an
    /// `Unknown` start accepts any status.
    pub fn can_transition_to(self, next: ScanStatus) -> bool {
        if self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), next.rank()) {
            (Some(current), Some(incoming)) => incoming > current,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

// The five fixed risk buckets, plus a neutral bucket for values the backend
// might send that this client does not recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
    Info,
    #[serde(other)]
    Unknown,
}

impl RiskLevel {
    /// The fixed levels in display order, most severe first.
    pub const FIXED: [RiskLevel; 5] = [
        RiskLevel::Critical,
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
        RiskLevel::Info,
    ];
}

// Export formats the backend can render a scan into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Html,
    Csv,
    #[serde(other)]
    Unknown,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Pdf, ReportFormat::Html, ReportFormat::Csv];
}

// --- Core Data Models ---

/// One reconnaissance job against a single target domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    pub id: String,
    pub target_domain: String,
    pub scan_profile: ScanProfile,
    pub status: ScanStatus,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub started_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_queries: u32,
    #[serde(default)]
    pub total_findings: u32,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// One discovered URL together with its assigned risk level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub scan_id: String,
    pub category: String,
    pub risk_level: RiskLevel,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub risk_rationale: Option<String>,
    #[serde(default)]
    pub owasp_mapping: Option<String>,
    #[serde(default)]
    pub remediation: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub discovered_at: DateTime<Utc>,
    #[serde(default)]
    pub is_false_positive: bool,
}

// The envelope returned by the findings endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingsPage {
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub total: u32,
}

// A condensed entry of the statistics endpoint's `top_risks` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopRisk {
    pub url: String,
    pub risk_level: RiskLevel,
    pub category: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Per-scan statistics with one counter per fixed risk bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanStatistics {
    // The backend leaves this out; the client fills it in from the request.
    #[serde(default)]
    pub scan_id: String,
    #[serde(default)]
    pub total_findings: u32,
    #[serde(default, alias = "critical")]
    pub critical_findings: u32,
    #[serde(default, alias = "high")]
    pub high_findings: u32,
    #[serde(default, alias = "medium")]
    pub medium_findings: u32,
    #[serde(default, alias = "low")]
    pub low_findings: u32,
    #[serde(default, alias = "info")]
    pub info_findings: u32,
    #[serde(default)]
    pub categories: OrderedCounts,
    #[serde(default)]
    pub top_risks: Vec<TopRisk>,
}

impl ScanStatistics {
    /// The counter for one risk bucket. The neutral bucket has no counter.
    pub fn count(&self, level: RiskLevel) -> u32 {
        match level {
            RiskLevel::Critical => self.critical_findings,
            RiskLevel::High => self.high_findings,
            RiskLevel::Medium => self.medium_findings,
            RiskLevel::Low => self.low_findings,
            RiskLevel::Info => self.info_findings,
            RiskLevel::Unknown => 0,
        }
    }

    /// Sum of the five per-level counters.
    pub fn level_total(&self) -> u32 {
        RiskLevel::FIXED.iter().map(|level| self.count(*level)).sum()
    }

    /// Checks `Scan.total_findings == sum(per-level counts)`.
    pub fn agrees_with(&self, scan: &Scan) -> bool {
        self.level_total() == scan.total_findings
    }
}

/// A generated export of a scan's findings in one format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub id: String,
    pub scan_id: String,
    pub report_type: ReportFormat,
    pub download_url: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub generated_at: Option<DateTime<Utc>>,
}

// --- Launch Models ---

#[derive(Debug, Clone, Serialize)]
pub struct TargetValidationRequest<'a> {
    pub target: &'a str,
}

/// The backend's verdict on a target domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetValidation {
    pub valid: bool,
    #[serde(default)]
    pub normalized_target: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Body of the scan creation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewScan {
    pub target_domain: String,
    pub scan_profile: ScanProfile,
    pub consent_accepted: bool,
    pub user_id: String,
}

/// Body of the report generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    pub scan_id: String,
    pub report_type: ReportFormat,
    pub include_low_risk: bool,
    pub include_info: bool,
}

impl ReportRequest {
    /// A request with the backend's defaults for the optional sections.
    pub fn new(scan_id: &str, report_type: ReportFormat) -> Self {
        Self {
            scan_id: scan_id.to_string(),
            report_type,
            include_low_risk: true,
            include_info: false,
        }
    }
}

// --- Dashboard Models ---

// One page of the scan listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanPage {
    #[serde(default)]
    pub scans: Vec<Scan>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSummary {
    pub total_scans: u64,
    pub completed_scans: u64,
    pub failed_scans: u64,
    pub running_scans: u64,
    pub total_findings: u64,
    pub average_findings_per_scan: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskDistribution {
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
    pub info: u64,
}

impl RiskDistribution {
    pub fn count(&self, level: RiskLevel) -> u64 {
        match level {
            RiskLevel::Critical => self.critical,
            RiskLevel::High => self.high,
            RiskLevel::Medium => self.medium,
            RiskLevel::Low => self.low,
            RiskLevel::Info => self.info,
            RiskLevel::Unknown => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: String,
    pub count: u64,
}

/// The cross-scan aggregate shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analytics {
    pub summary: AnalyticsSummary,
    pub risk_distribution: RiskDistribution,
    pub most_scanned_domains: Vec<DomainCount>,
    pub category_distribution: OrderedCounts,
    pub scan_timeline: Vec<TimelinePoint>,
    pub profile_distribution: OrderedCounts,
}

// --- Ordered Counters ---

/// A `name -> count` mapping that keeps the order in which entries arrived.
///
/// The dashboard truncates category series positionally, so the upstream
/// ordering of the JSON object has to survive deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedCounts(Vec<(String, u64)>);

impl OrderedCounts {
    pub fn new(entries: Vec<(String, u64)>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.iter().find(|(key, _)| *key == name).map(|(_, count)| count)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for OrderedCounts {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, count)| (name.into(), count)).collect())
    }
}

impl Serialize for OrderedCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, count)| (name, count)))
    }
}

impl<'de> Deserialize<'de> for OrderedCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedCountsVisitor)
    }
}

struct OrderedCountsVisitor;

impl<'de> Visitor<'de> for OrderedCountsVisitor {
    type Value = OrderedCounts;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of names to counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, count)) = access.next_entry::<String, u64>()? {
            entries.push((name, count));
        }
        Ok(OrderedCounts(entries))
    }
}

// --- Timestamps ---

// The backend stores naive UTC datetimes and serializes them without an
// offset. RFC 3339 with an explicit offset is accepted as well.
mod timestamp {
    use super::*;
    use chrono::NaiveDateTime;

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("unrecognised timestamp `{raw}`")))
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("unrecognised timestamp `{raw}`"))),
            None => Ok(None),
        }
    }
}
