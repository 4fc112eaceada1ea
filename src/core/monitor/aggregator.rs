// src/core/monitor/aggregator.rs

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::core::api::ScanApi;
use crate::core::error::ViewError;
use crate::core::models::{ApiResult, Finding, RiskLevel, Scan, ScanStatistics, ScanStatus};
use crate::core::monitor::ViewLifetime;

/// The three settled sub-reads of one aggregation pass.
///
/// Each slot is an independent outcome; none of them can abort the others.
#[derive(Debug)]
pub struct ScanSnapshot {
    pub scan: ApiResult<Scan>,
    pub findings: ApiResult<Vec<Finding>>,
    pub statistics: ApiResult<ScanStatistics>,
}

impl ScanSnapshot {
    fn all_failed(&self) -> bool {
        matches!((&self.scan, &self.findings, &self.statistics), (Err(_), Err(_), Err(_)))
    }
}

/// Issues the scan, findings and statistics reads concurrently and waits for
/// all of them to settle.
///
/// Failures are logged here and handed back as values; nothing is raised.
///
/// # Arguments
/// * `api` - The remote boundary to read from.
/// * `scan_id` - The scan whose detail view is being aggregated.
///
/// # Returns
/// A `ScanSnapshot` holding one outcome per sub-read.
pub async fn fetch_snapshot(api: &dyn ScanApi, scan_id: &str) -> ScanSnapshot {
    // Completion order of the three reads is unspecified and never relied upon.
    let (scan, findings, statistics) = tokio::join!(
        api.get_scan(scan_id),
        api.get_scan_findings(scan_id),
        api.get_scan_statistics(scan_id)
    );

    if let Err(e) = &scan {
        warn!(scan_id, error = %e, "Failed to load scan details.");
    }
    if let Err(e) = &findings {
        warn!(scan_id, error = %e, "Failed to load findings.");
    }
    if let Err(e) = &statistics {
        warn!(scan_id, error = %e, "Failed to load statistics.");
    }

    ScanSnapshot {
        scan,
        findings: findings.map(|page| page.findings),
        statistics,
    }
}

/// View state of one scan detail screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanView {
    pub scan: Option<Scan>,
    pub findings: Vec<Finding>,
    pub statistics: Option<ScanStatistics>,
    /// Set only when every sub-read of the latest pass failed.
    pub error: Option<ViewError>,
    /// `false` until the first aggregation pass has settled.
    pub loaded: bool,
}

impl ScanView {
    /// Applies the scan sub-read. Returns `true` when the stored scan changed.
    ///
    /// A payload that would move the status backwards is a stale, out of order
    /// completion and is dropped so the lifecycle stays monotonic.
    pub fn set_scan(&mut self, outcome: ApiResult<Scan>) -> bool {
        let Ok(incoming) = outcome else {
            return false;
        };
        if let Some(current) = &self.scan {
            if !current.status.can_transition_to(incoming.status) {
                debug!(
                    scan_id = %incoming.id,
                    current = %current.status,
                    incoming = %incoming.status,
                    "Discarding stale scan payload."
                );
                return false;
            }
        }
        self.scan = Some(incoming);
        true
    }

    /// Replaces the findings when their sub-read succeeded.
    pub fn set_findings(&mut self, outcome: ApiResult<Vec<Finding>>) -> bool {
        match outcome {
            Ok(findings) => {
                self.findings = findings;
                true
            }
            Err(_) => false,
        }
    }

    /// Replaces the statistics when their sub-read succeeded.
    pub fn set_statistics(&mut self, outcome: ApiResult<ScanStatistics>) -> bool {
        match outcome {
            Ok(statistics) => {
                self.statistics = Some(statistics);
                true
            }
            Err(_) => false,
        }
    }

    /// Merges a settled snapshot into the view.
    ///
    /// Fields whose read failed keep their previous value. The blocking error
    /// is raised exactly when all three reads failed and cleared otherwise.
    pub fn apply(&mut self, scan_id: &str, snapshot: ScanSnapshot) {
        let all_failed = snapshot.all_failed();
        let ScanSnapshot { scan, findings, statistics } = snapshot;

        self.set_scan(scan);
        self.set_findings(findings);
        self.set_statistics(statistics);

        self.error = if all_failed {
            Some(ViewError::ScanUnavailable { scan_id: scan_id.to_string() })
        } else {
            None
        };
        self.loaded = true;
    }

    pub fn status(&self) -> Option<ScanStatus> {
        self.scan.as_ref().map(|scan| scan.status)
    }

    /// The "Critical Findings" card value.
    pub fn critical_findings(&self) -> u32 {
        self.statistics
            .as_ref()
            .map(|stats| stats.count(RiskLevel::Critical))
            .unwrap_or(0)
    }

    /// `true` when the screen should show the blocking error page.
    pub fn is_blocked(&self) -> bool {
        self.loaded && (self.error.is_some() || self.scan.is_none())
    }
}

/// Owns the view state of one mounted scan detail screen and performs the
/// aggregation passes that refresh it.
pub struct ScanMonitor {
    api: Arc<dyn ScanApi>,
    scan_id: String,
    view: RwLock<ScanView>,
    lifetime: ViewLifetime,
}

impl ScanMonitor {
    pub fn new(api: Arc<dyn ScanApi>, scan_id: impl Into<String>, lifetime: ViewLifetime) -> Arc<Self> {
        Arc::new(Self {
            api,
            scan_id: scan_id.into(),
            view: RwLock::new(ScanView::default()),
            lifetime,
        })
    }

    pub fn scan_id(&self) -> &str {
        &self.scan_id
    }

    pub fn lifetime(&self) -> &ViewLifetime {
        &self.lifetime
    }

    /// Runs one aggregation pass.
    ///
    /// Safe to call while another pass is still outstanding; the last pass to
    /// settle wins. If the view was torn down while the reads were in flight,
    /// the results are discarded.
    pub async fn refresh(&self) {
        if self.lifetime.is_closed() {
            return;
        }

        let snapshot = fetch_snapshot(self.api.as_ref(), &self.scan_id).await;

        if self.lifetime.is_closed() {
            debug!(scan_id = %self.scan_id, "View closed while reads were in flight, discarding results.");
            return;
        }

        let mut view = self.view.write().await;
        view.apply(&self.scan_id, snapshot);
        match &view.error {
            Some(e) => warn!(scan_id = %self.scan_id, error = %e, "All scan reads failed."),
            None => info!(
                scan_id = %self.scan_id,
                status = ?view.status(),
                findings = view.findings.len(),
                "Scan view refreshed."
            ),
        }
    }

    /// A copy of the current view state for rendering.
    pub async fn snapshot(&self) -> ScanView {
        self.view.read().await.clone()
    }

    /// The last scan status observed by any aggregation pass.
    pub async fn last_status(&self) -> Option<ScanStatus> {
        self.view.read().await.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ApiError;
    use crate::core::models::ScanProfile;
    use chrono::Utc;

    fn scan(status: ScanStatus, total_findings: u32) -> Scan {
        Scan {
            id: "scan-1".into(),
            target_domain: "example.com".into(),
            scan_profile: ScanProfile::Quick,
            status,
            started_at: Utc::now(),
            completed_at: None,
            total_queries: 10,
            total_findings,
            user_id: None,
            error_message: None,
        }
    }

    fn finding(id: &str) -> Finding {
        Finding {
            id: id.into(),
            scan_id: "scan-1".into(),
            category: "login_pages".into(),
            risk_level: RiskLevel::High,
            url: format!("https://example.com/{id}"),
            title: None,
            query: None,
            snippet: None,
            file_type: None,
            risk_rationale: None,
            owasp_mapping: None,
            remediation: None,
            discovered_at: Utc::now(),
            is_false_positive: false,
        }
    }

    fn statistics(critical: u32) -> ScanStatistics {
        ScanStatistics {
            scan_id: "scan-1".into(),
            total_findings: critical,
            critical_findings: critical,
            ..Default::default()
        }
    }

    fn unavailable() -> ApiError {
        ApiError::Status { endpoint: "test".into(), status: 503, message: None }
    }

    fn prior_view() -> ScanView {
        ScanView {
            scan: Some(scan(ScanStatus::Running, 1)),
            findings: vec![finding("old")],
            statistics: Some(statistics(1)),
            error: None,
            loaded: true,
        }
    }

    #[test]
    fn every_success_failure_combination_updates_exactly_the_succeeded_fields() {
        for mask in 0u8..8 {
            let scan_ok = mask & 0b001 != 0;
            let findings_ok = mask & 0b010 != 0;
            let stats_ok = mask & 0b100 != 0;

            let mut view = prior_view();
            let before = view.clone();
            let fresh_scan = scan(ScanStatus::Completed, 2);
            let fresh_findings = vec![finding("new-a"), finding("new-b")];
            let fresh_stats = statistics(2);

            view.apply(
                "scan-1",
                ScanSnapshot {
                    scan: if scan_ok { Ok(fresh_scan.clone()) } else { Err(unavailable()) },
                    findings: if findings_ok { Ok(fresh_findings.clone()) } else { Err(unavailable()) },
                    statistics: if stats_ok { Ok(fresh_stats.clone()) } else { Err(unavailable()) },
                },
            );

            let expected_scan = if scan_ok { Some(fresh_scan) } else { before.scan.clone() };
            let expected_findings = if findings_ok { fresh_findings } else { before.findings.clone() };
            let expected_stats = if stats_ok { Some(fresh_stats) } else { before.statistics.clone() };

            assert_eq!(view.scan, expected_scan, "scan slot, mask {mask:03b}");
            assert_eq!(view.findings, expected_findings, "findings slot, mask {mask:03b}");
            assert_eq!(view.statistics, expected_stats, "statistics slot, mask {mask:03b}");
            assert_eq!(view.error.is_some(), mask == 0, "blocking error, mask {mask:03b}");
            assert!(view.loaded);
        }
    }

    #[test]
    fn a_partial_success_clears_a_previous_blocking_error() {
        let mut view = ScanView::default();
        view.apply(
            "scan-1",
            ScanSnapshot { scan: Err(unavailable()), findings: Err(unavailable()), statistics: Err(unavailable()) },
        );
        assert!(view.is_blocked());

        view.apply(
            "scan-1",
            ScanSnapshot {
                scan: Ok(scan(ScanStatus::Pending, 0)),
                findings: Err(unavailable()),
                statistics: Err(unavailable()),
            },
        );
        assert!(view.error.is_none());
        assert!(!view.is_blocked());
        assert!(view.findings.is_empty());
    }

    #[test]
    fn stale_payloads_cannot_move_the_status_backwards() {
        let mut view = ScanView::default();
        assert!(view.set_scan(Ok(scan(ScanStatus::Completed, 3))));
        assert!(!view.set_scan(Ok(scan(ScanStatus::Running, 1))));
        assert_eq!(view.status(), Some(ScanStatus::Completed));
    }

    #[test]
    fn unknown_payload_cannot_open_a_path_back_to_pending() {
        let mut view = ScanView::default();
        assert!(view.set_scan(Ok(scan(ScanStatus::Running, 1))));
        assert!(!view.set_scan(Ok(scan(ScanStatus::Unknown, 1))));
        assert!(!view.set_scan(Ok(scan(ScanStatus::Pending, 0))));
        assert_eq!(view.status(), Some(ScanStatus::Running));
    }

    #[test]
    fn critical_findings_come_from_statistics() {
        let mut view = ScanView::default();
        assert_eq!(view.critical_findings(), 0);
        view.set_statistics(Ok(statistics(4)));
        assert_eq!(view.critical_findings(), 4);
    }
}
