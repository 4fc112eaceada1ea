// tests/reports_test.rs

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::Notify;

use common::{SCAN_ID, StubApi, report};
use dorkx_monitor::core::error::ReportError;
use dorkx_monitor::core::models::ReportFormat;
use dorkx_monitor::core::monitor::ViewLifetime;
use dorkx_monitor::core::monitor::reports::{ArtifactState, ReportAction, ReportResolver};

fn resolver(api: Arc<StubApi>) -> Arc<ReportResolver> {
    ReportResolver::new(api, SCAN_ID, ViewLifetime::new())
}

#[tokio::test]
async fn test_generation_flips_format_to_download() {
    let api = Arc::new(StubApi::default());
    let reports = resolver(api.clone());
    reports.reload().await.unwrap();
    assert_eq!(reports.state(ReportFormat::Pdf).await, ArtifactState::Absent);

    let action = reports.request(ReportFormat::Pdf).await.unwrap();

    let url = format!("/api/v1/reports/{SCAN_ID}-pdf/download");
    assert_eq!(action, ReportAction::Download { url: url.clone() });
    assert_eq!(reports.state(ReportFormat::Pdf).await, ArtifactState::Present { url });
    assert_eq!(reports.state(ReportFormat::Csv).await, ArtifactState::Absent);
    assert_eq!(api.generate_calls(), 1);
}

#[tokio::test]
async fn test_existing_report_needs_no_generation() {
    let api = Arc::new(StubApi::default());
    api.reports.lock().unwrap().push(report(ReportFormat::Csv, "/r/1"));
    let reports = resolver(api.clone());
    reports.reload().await.unwrap();

    let action = reports.request(ReportFormat::Csv).await.unwrap();

    assert_eq!(action, ReportAction::Download { url: "/r/1".into() });
    assert_eq!(api.generate_calls(), 0);
}

#[tokio::test]
async fn test_second_request_while_generating_is_rejected() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(StubApi { generate_gate: Some(gate.clone()), ..Default::default() });
    let reports = resolver(api.clone());

    let first = {
        let reports = reports.clone();
        tokio::spawn(async move { reports.request(ReportFormat::Pdf).await })
    };
    while !reports.is_generating() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert_eq!(reports.state(ReportFormat::Pdf).await, ArtifactState::Generating);

    let second = reports.request(ReportFormat::Html).await;
    assert!(matches!(second, Err(ReportError::AlreadyGenerating { .. })));

    gate.notify_one();
    let first = first.await.unwrap().unwrap();
    assert!(matches!(first, ReportAction::Download { .. }));
    assert!(!reports.is_generating());
    assert_eq!(api.generate_calls(), 1);
}

#[tokio::test]
async fn test_failed_generation_returns_to_absent() {
    let api = Arc::new(StubApi::default());
    api.fail_generate.store(true, Ordering::SeqCst);
    let reports = resolver(api.clone());

    let outcome = reports.request(ReportFormat::Html).await;

    assert!(matches!(outcome, Err(ReportError::Failed { format: ReportFormat::Html, .. })));
    assert!(!reports.is_generating());
    assert_eq!(reports.state(ReportFormat::Html).await, ArtifactState::Absent);

    // The flag was released, so a retry reaches the backend again.
    api.fail_generate.store(false, Ordering::SeqCst);
    assert!(reports.request(ReportFormat::Html).await.is_ok());
    assert_eq!(api.generate_calls(), 2);
}

#[tokio::test]
async fn test_unknown_format_is_rejected_locally() {
    let api = Arc::new(StubApi::default());
    let reports = resolver(api.clone());

    let outcome = reports.request(ReportFormat::Unknown).await;

    assert!(matches!(outcome, Err(ReportError::UnsupportedFormat)));
    assert_eq!(api.generate_calls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_requests_for_one_format_generate_once() {
    for _ in 0..200 {
        let api = Arc::new(StubApi::default());
        let reports = resolver(api.clone());

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let reports = reports.clone();
                tokio::spawn(async move { reports.request(ReportFormat::Pdf).await })
            })
            .collect();
        for handle in handles {
            match handle.await.unwrap() {
                Ok(action) => assert!(matches!(action, ReportAction::Download { .. })),
                Err(e) => assert!(matches!(e, ReportError::AlreadyGenerating { .. })),
            }
        }

        assert_eq!(api.generate_calls(), 1);
    }
}
