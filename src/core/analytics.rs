// src/core/analytics.rs

//! Pure reductions from fetched payloads to chart-ready series and filtered
//! lists. Nothing in here performs I/O.

use std::fmt;

use crate::core::knowledge_base::risk_detail;
use crate::core::models::{
    Analytics, Finding, OrderedCounts, RiskDistribution, RiskLevel, Scan, ScanProfile, ScanStatistics,
    ScanStatus, TimelinePoint,
};

/// Number of category bars shown on the dashboard.
pub const CATEGORY_SERIES_LIMIT: usize = 8;

/// One slice of the risk distribution chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSlice {
    pub level: RiskLevel,
    pub label: &'static str,
    pub value: u64,
    pub color: &'static str,
}

/// A labelled value of a bar or line series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedValue {
    pub name: String,
    pub value: u64,
}

/// Maps the five fixed levels to chart slices, leaving out empty levels.
pub fn risk_series(distribution: &RiskDistribution) -> Vec<ChartSlice> {
    RiskLevel::FIXED
        .iter()
        .map(|level| {
            let detail = risk_detail(*level);
            ChartSlice {
                level: *level,
                label: detail.label,
                value: distribution.count(*level),
                color: detail.color,
            }
        })
        .filter(|slice| slice.value > 0)
        .collect()
}

/// Category bars: display names with spaces instead of underscores, cut to
/// the first `CATEGORY_SERIES_LIMIT` entries in the order the backend sent
/// them. The entries are not re-sorted by value.
pub fn category_series(counts: &OrderedCounts) -> Vec<NamedValue> {
    counts
        .iter()
        .map(|(name, value)| NamedValue { name: name.replace('_', " "), value })
        .take(CATEGORY_SERIES_LIMIT)
        .collect()
}

/// Profile bars with upper-cased names.
pub fn profile_series(counts: &OrderedCounts) -> Vec<NamedValue> {
    counts
        .iter()
        .map(|(name, value)| NamedValue { name: name.to_uppercase(), value })
        .collect()
}

pub fn timeline_series(points: &[TimelinePoint]) -> Vec<NamedValue> {
    points
        .iter()
        .map(|point| NamedValue { name: point.date.clone(), value: point.count })
        .collect()
}

// --- Filters ---

/// A filter criterion that either admits everything or one exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: Copy + PartialEq> Selection<T> {
    pub fn admits(&self, value: T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => *wanted == value,
        }
    }

    /// Steps through `All`, then each option in turn, then back to `All`.
    pub fn cycle(self, options: &[T]) -> Self {
        let next = match self {
            Selection::All => 0,
            Selection::Only(current) => match options.iter().position(|o| *o == current) {
                Some(index) => index + 1,
                None => options.len(),
            },
        };
        options.get(next).map_or(Selection::All, |o| Selection::Only(*o))
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(value) => value.fmt(f),
        }
    }
}

/// Client-side criteria for the dashboard's scan list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanFilter {
    pub status: Selection<ScanStatus>,
    pub profile: Selection<ScanProfile>,
    /// Case-insensitive substring of the target domain; empty admits all.
    pub domain: String,
}

impl ScanFilter {
    pub fn matches(&self, scan: &Scan) -> bool {
        self.status.admits(scan.status)
            && self.profile.admits(scan.scan_profile)
            && (self.domain.is_empty()
                || scan
                    .target_domain
                    .to_lowercase()
                    .contains(&self.domain.to_lowercase()))
    }
}

/// Applies `filter` to an already fetched page of scans, keeping order.
pub fn filter_scans(scans: &[Scan], filter: &ScanFilter) -> Vec<Scan> {
    scans.iter().filter(|scan| filter.matches(scan)).cloned().collect()
}

/// The scan detail's risk filter over findings.
pub fn filter_findings(findings: &[Finding], risk: Selection<RiskLevel>) -> Vec<&Finding> {
    findings.iter().filter(|f| risk.admits(f.risk_level)).collect()
}

// --- Cards ---

/// Headline numbers of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCards {
    pub total_scans: u64,
    pub completed_scans: u64,
    pub running_scans: u64,
    pub failed_scans: u64,
    pub total_findings: u64,
    pub average_findings_per_scan: f64,
    pub critical_findings: u64,
    pub high_findings: u64,
}

pub fn summary_cards(analytics: &Analytics) -> SummaryCards {
    let summary = &analytics.summary;
    SummaryCards {
        total_scans: summary.total_scans,
        completed_scans: summary.completed_scans,
        running_scans: summary.running_scans,
        failed_scans: summary.failed_scans,
        total_findings: summary.total_findings,
        average_findings_per_scan: summary.average_findings_per_scan,
        critical_findings: analytics.risk_distribution.critical,
        high_findings: analytics.risk_distribution.high,
    }
}

/// One statistic card of the scan detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: u32,
    pub color: Option<&'static str>,
}

/// Total plus one card per fixed level, zeros included.
pub fn statistic_cards(statistics: &ScanStatistics) -> Vec<StatCard> {
    let mut cards = vec![StatCard { label: "Total", value: statistics.total_findings, color: None }];
    cards.extend(RiskLevel::FIXED.iter().map(|level| {
        let detail = risk_detail(*level);
        StatCard {
            label: detail.label,
            value: statistics.count(*level),
            color: Some(detail.color),
        }
    }));
    cards
}

// --- Dashboard Model ---

/// Everything the dashboard renders, derived from the current view state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardModel {
    pub summary: Option<SummaryCards>,
    pub risk: Vec<ChartSlice>,
    pub categories: Vec<NamedValue>,
    pub profiles: Vec<NamedValue>,
    pub timeline: Vec<NamedValue>,
    pub scans: Vec<Scan>,
}

/// Derives the dashboard model. Missing analytics only empties the charts;
/// the scan list is filtered regardless.
pub fn reduce(analytics: Option<&Analytics>, scans: &[Scan], filter: &ScanFilter) -> DashboardModel {
    let scans = filter_scans(scans, filter);
    match analytics {
        Some(analytics) => DashboardModel {
            summary: Some(summary_cards(analytics)),
            risk: risk_series(&analytics.risk_distribution),
            categories: category_series(&analytics.category_distribution),
            profiles: profile_series(&analytics.profile_distribution),
            timeline: timeline_series(&analytics.scan_timeline),
            scans,
        },
        None => DashboardModel { scans, ..Default::default() },
    }
}
