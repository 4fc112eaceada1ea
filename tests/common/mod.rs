// tests/common/mod.rs

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use dorkx_monitor::ScanApi;
use dorkx_monitor::core::error::ApiError;
use dorkx_monitor::core::models::{
    Analytics, ApiResult, Finding, FindingsPage, NewScan, Report, ReportRequest, RiskLevel, Scan, ScanPage,
    ScanProfile, ScanStatistics, ScanStatus, TargetValidation,
};

pub const SCAN_ID: &str = "scan-1";

pub fn unavailable(endpoint: &str) -> ApiError {
    ApiError::Status { endpoint: endpoint.to_string(), status: 503, message: Some("unavailable".into()) }
}

pub fn scan(status: ScanStatus, total_findings: u32) -> Scan {
    Scan {
        id: SCAN_ID.into(),
        target_domain: "example.com".into(),
        scan_profile: ScanProfile::Quick,
        status,
        started_at: Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
        completed_at: None,
        total_queries: 12,
        total_findings,
        user_id: Some("anonymous".into()),
        error_message: None,
    }
}

pub fn finding(index: usize, risk_level: RiskLevel) -> Finding {
    Finding {
        id: format!("f-{index}"),
        scan_id: SCAN_ID.into(),
        category: "sensitive_files".into(),
        risk_level,
        url: format!("https://example.com/file-{index}"),
        title: None,
        query: None,
        snippet: None,
        file_type: None,
        risk_rationale: None,
        owasp_mapping: None,
        remediation: None,
        discovered_at: Utc.with_ymd_and_hms(2025, 3, 1, 10, 5, 0).unwrap(),
        is_false_positive: false,
    }
}

pub fn statistics(critical: u32, high: u32, medium: u32, low: u32, info: u32) -> ScanStatistics {
    ScanStatistics {
        scan_id: SCAN_ID.into(),
        total_findings: critical + high + medium + low + info,
        critical_findings: critical,
        high_findings: high,
        medium_findings: medium,
        low_findings: low,
        info_findings: info,
        ..Default::default()
    }
}

pub fn report(format: dorkx_monitor::core::models::ReportFormat, url: &str) -> Report {
    Report {
        id: url.into(),
        scan_id: SCAN_ID.into(),
        report_type: format,
        download_url: url.into(),
        file_size: Some(1024),
        generated_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 11, 0, 0).unwrap()),
    }
}

/// Scripted in-memory backend.
///
/// `get_scan` walks `scan_script`, repeating the last entry once the script is
/// exhausted. A `None` payload answers with a 503.
#[derive(Default)]
pub struct StubApi {
    pub scan_script: Mutex<VecDeque<Option<Scan>>>,
    pub findings: Mutex<Option<Vec<Finding>>>,
    pub statistics: Mutex<Option<ScanStatistics>>,
    pub reports: Mutex<Vec<Report>>,
    pub validation: Mutex<Option<TargetValidation>>,
    pub created: Mutex<Option<NewScan>>,

    pub fail_generate: AtomicBool,
    pub scan_gate: Option<Arc<Notify>>,
    pub generate_gate: Option<Arc<Notify>>,

    pub validate_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub scan_calls: AtomicUsize,
    pub findings_calls: AtomicUsize,
    pub statistics_calls: AtomicUsize,
    pub report_list_calls: AtomicUsize,
    pub generate_calls: AtomicUsize,
}

impl StubApi {
    pub fn with_scans(script: impl IntoIterator<Item = Scan>) -> Self {
        Self {
            scan_script: Mutex::new(script.into_iter().map(Some).collect()),
            findings: Mutex::new(Some(Vec::new())),
            statistics: Mutex::new(Some(ScanStatistics::default())),
            ..Default::default()
        }
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScanApi for StubApi {
    async fn validate_target(&self, target: &str) -> ApiResult<TargetValidation> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.validation.lock().unwrap().clone();
        Ok(scripted.unwrap_or(TargetValidation {
            valid: true,
            normalized_target: Some(target.to_string()),
            reason: None,
            warnings: Vec::new(),
        }))
    }

    async fn create_scan(&self, request: &NewScan) -> ApiResult<Scan> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.created.lock().unwrap() = Some(request.clone());
        let mut created = scan(ScanStatus::Pending, 0);
        created.target_domain = request.target_domain.clone();
        created.scan_profile = request.scan_profile;
        Ok(created)
    }

    async fn get_scan(&self, _scan_id: &str) -> ApiResult<Scan> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.scan_gate {
            gate.notified().await;
        }
        let next = {
            let mut script = self.scan_script.lock().unwrap();
            if script.len() > 1 { script.pop_front().flatten() } else { script.front().cloned().flatten() }
        };
        next.ok_or_else(|| unavailable("scan"))
    }

    async fn get_scan_findings(&self, _scan_id: &str) -> ApiResult<FindingsPage> {
        self.findings_calls.fetch_add(1, Ordering::SeqCst);
        let findings = self.findings.lock().unwrap().clone().ok_or_else(|| unavailable("findings"))?;
        let total = findings.len() as u32;
        Ok(FindingsPage { findings, total })
    }

    async fn get_scan_statistics(&self, _scan_id: &str) -> ApiResult<ScanStatistics> {
        self.statistics_calls.fetch_add(1, Ordering::SeqCst);
        self.statistics.lock().unwrap().clone().ok_or_else(|| unavailable("statistics"))
    }

    async fn get_scan_reports(&self, _scan_id: &str) -> ApiResult<Vec<Report>> {
        self.report_list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reports.lock().unwrap().clone())
    }

    async fn generate_report(&self, request: &ReportRequest) -> ApiResult<()> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.generate_gate {
            gate.notified().await;
        }
        if self.fail_generate.load(Ordering::SeqCst) {
            return Err(unavailable("reports"));
        }
        let url = format!("/api/v1/reports/{}-{}/download", request.scan_id, request.report_type);
        self.reports.lock().unwrap().push(report(request.report_type, &url));
        Ok(())
    }

    async fn list_scans(&self, _page: u32, _page_size: u32) -> ApiResult<ScanPage> {
        Ok(ScanPage::default())
    }

    async fn get_analytics_overview(&self) -> ApiResult<Analytics> {
        Ok(Analytics::default())
    }
}
