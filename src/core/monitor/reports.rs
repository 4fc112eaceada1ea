// src/core/monitor/reports.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::core::api::ScanApi;
use crate::core::error::ReportError;
use crate::core::models::{ApiResult, Report, ReportFormat, ReportRequest};
use crate::core::monitor::ViewLifetime;

/// Availability of one report format for one scan.
///
/// Transitions are one way, `Absent -> Generating -> Present`, except that a
/// failed generation falls back to `Absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactState {
    Absent,
    Generating,
    Present { url: String },
}

/// What the UI should offer for a format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportAction {
    /// A current report exists; link straight to it.
    Download { url: String },
    /// No report yet; offer to generate one.
    Generate,
}

/// Picks the current report of `format` from a fetched list.
///
/// When the backend holds several reports of the same type the most recently
/// generated one wins; without timestamps the later entry wins.
pub fn current_report(reports: &[Report], format: ReportFormat) -> Option<&Report> {
    reports
        .iter()
        .filter(|report| report.report_type == format)
        .max_by(|a, b| a.generated_at.cmp(&b.generated_at))
}

/// Resolves a format against an already fetched report list. Never touches
/// the network.
pub fn resolve_in(reports: &[Report], format: ReportFormat) -> ReportAction {
    match current_report(reports, format) {
        Some(report) => ReportAction::Download { url: report.download_url.clone() },
        None => ReportAction::Generate,
    }
}

/// Tracks report availability for one scan view and serializes generation.
pub struct ReportResolver {
    api: Arc<dyn ScanApi>,
    scan_id: String,
    lifetime: ViewLifetime,
    reports: RwLock<Vec<Report>>,
    in_flight: AtomicBool,
    generating: RwLock<Option<ReportFormat>>,
}

// Clears the in-flight flag however the generation future ends, including
// being dropped half way.
struct InFlight<'a> {
    resolver: &'a ReportResolver,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.resolver.in_flight.store(false, Ordering::SeqCst);
    }
}

impl ReportResolver {
    pub fn new(api: Arc<dyn ScanApi>, scan_id: impl Into<String>, lifetime: ViewLifetime) -> Arc<Self> {
        Arc::new(Self {
            api,
            scan_id: scan_id.into(),
            lifetime,
            reports: RwLock::new(Vec::new()),
            in_flight: AtomicBool::new(false),
            generating: RwLock::new(None),
        })
    }

    pub fn scan_id(&self) -> &str {
        &self.scan_id
    }

    /// Re-reads the report list from the backend.
    pub async fn reload(&self) -> ApiResult<()> {
        let fetched = match self.api.get_scan_reports(&self.scan_id).await {
            Ok(reports) => reports,
            Err(e) => {
                warn!(scan_id = %self.scan_id, error = %e, "Failed to load reports.");
                return Err(e);
            }
        };
        if self.lifetime.is_closed() {
            debug!(scan_id = %self.scan_id, "View closed, discarding report list.");
            return Ok(());
        }
        debug!(scan_id = %self.scan_id, reports = fetched.len(), "Report list refreshed.");
        *self.reports.write().await = fetched;
        Ok(())
    }

    /// The resolved action for `format` given the current list.
    pub async fn resolve(&self, format: ReportFormat) -> ReportAction {
        resolve_in(&self.reports.read().await, format)
    }

    pub async fn state(&self, format: ReportFormat) -> ArtifactState {
        if *self.generating.read().await == Some(format) {
            return ArtifactState::Generating;
        }
        match self.resolve(format).await {
            ReportAction::Download { url } => ArtifactState::Present { url },
            ReportAction::Generate => ArtifactState::Absent,
        }
    }

    /// `true` while a generation request for this scan is in flight.
    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Handles a user request for `format`.
    ///
    /// An existing report resolves to its download without any network call.
    /// Otherwise a generation request is issued; on success the report list is
    /// re-read so the format flips to `Download`. While one generation is in
    /// flight for this scan, further requests are rejected.
    ///
    /// # Returns
    /// The action resolved after the request, or a `ReportError` meant for a
    /// transient notification.
    pub async fn request(&self, format: ReportFormat) -> Result<ReportAction, ReportError> {
        if format == ReportFormat::Unknown {
            return Err(ReportError::UnsupportedFormat);
        }

        if let action @ ReportAction::Download { .. } = self.resolve(format).await {
            debug!(scan_id = %self.scan_id, %format, "Report already available.");
            return Ok(action);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            info!(scan_id = %self.scan_id, %format, "Rejecting duplicate report generation.");
            return Err(ReportError::AlreadyGenerating { scan_id: self.scan_id.clone() });
        }
        let _guard = InFlight { resolver: self };

        // Another generation may have finished and reloaded the list meanwhile.
        if let action @ ReportAction::Download { .. } = self.resolve(format).await {
            debug!(scan_id = %self.scan_id, %format, "Report appeared while waiting for the flag.");
            return Ok(action);
        }

        *self.generating.write().await = Some(format);
        info!(scan_id = %self.scan_id, %format, "Generating report.");
        let outcome = self
            .api
            .generate_report(&ReportRequest::new(&self.scan_id, format))
            .await;
        *self.generating.write().await = None;

        match outcome {
            Ok(()) => {
                if let Err(e) = self.reload().await {
                    warn!(scan_id = %self.scan_id, %format, error = %e, "Report generated but the list could not be refreshed.");
                }
                Ok(self.resolve(format).await)
            }
            Err(source) => {
                warn!(scan_id = %self.scan_id, %format, error = %source, "Report generation failed.");
                Err(ReportError::Failed { format, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn report(format: ReportFormat, url: &str, hour: Option<u32>) -> Report {
        Report {
            id: url.into(),
            scan_id: "scan-1".into(),
            report_type: format,
            download_url: url.into(),
            file_size: None,
            generated_at: hour.map(|h| Utc.with_ymd_and_hms(2025, 3, 1, h, 0, 0).unwrap()),
        }
    }

    #[test]
    fn empty_list_resolves_to_generate() {
        assert_eq!(resolve_in(&[], ReportFormat::Csv), ReportAction::Generate);
    }

    #[test]
    fn matching_report_resolves_to_its_download() {
        let reports = vec![report(ReportFormat::Csv, "/r/1", None)];
        assert_eq!(
            resolve_in(&reports, ReportFormat::Csv),
            ReportAction::Download { url: "/r/1".into() }
        );
        assert_eq!(resolve_in(&reports, ReportFormat::Pdf), ReportAction::Generate);
    }

    #[test]
    fn newest_report_of_a_type_is_current() {
        let reports = vec![
            report(ReportFormat::Pdf, "/r/new", Some(12)),
            report(ReportFormat::Pdf, "/r/old", Some(9)),
        ];
        assert_eq!(current_report(&reports, ReportFormat::Pdf).unwrap().download_url, "/r/new");
    }
}
