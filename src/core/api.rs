// src/core/api.rs

use async_trait::async_trait;

use crate::core::models::{
    Analytics, ApiResult, FindingsPage, NewScan, Report, ReportRequest, Scan, ScanPage, ScanStatistics,
    TargetValidation,
};

/// The remote read/write boundary of the scanning backend.
///
/// Everything behind this trait (query execution, risk classification, the
/// task queue, persistence) is opaque to this crate. `ApiClient` is the HTTP
/// implementation; tests substitute scripted stubs.
#[async_trait]
pub trait ScanApi: Send + Sync {
    async fn validate_target(&self, target: &str) -> ApiResult<TargetValidation>;

    async fn create_scan(&self, request: &NewScan) -> ApiResult<Scan>;

    async fn get_scan(&self, scan_id: &str) -> ApiResult<Scan>;

    async fn get_scan_findings(&self, scan_id: &str) -> ApiResult<FindingsPage>;

    async fn get_scan_statistics(&self, scan_id: &str) -> ApiResult<ScanStatistics>;

    async fn get_scan_reports(&self, scan_id: &str) -> ApiResult<Vec<Report>>;

    /// Asks the backend to render a report. Only the confirmation matters; the
    /// report list is re-read afterwards to learn the download URL.
    async fn generate_report(&self, request: &ReportRequest) -> ApiResult<()>;

    async fn list_scans(&self, page: u32, page_size: u32) -> ApiResult<ScanPage>;

    async fn get_analytics_overview(&self) -> ApiResult<Analytics>;
}
