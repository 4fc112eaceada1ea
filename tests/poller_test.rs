// tests/poller_test.rs

mod common;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use common::{SCAN_ID, StubApi, scan};
use dorkx_monitor::core::models::ScanStatus;
use dorkx_monitor::core::monitor::aggregator::ScanMonitor;
use dorkx_monitor::core::monitor::poller::PollScheduler;
use dorkx_monitor::core::monitor::{ScanSession, ViewLifetime};

const INTERVAL: Duration = Duration::from_secs(5);

#[tokio::test(start_paused = true)]
async fn test_poller_stops_itself_on_terminal_status() {
    let api = Arc::new(StubApi::with_scans([
        scan(ScanStatus::Running, 0),
        scan(ScanStatus::Completed, 3),
    ]));
    let session = ScanSession::mount(api.clone(), SCAN_ID, INTERVAL);

    tokio::time::sleep(Duration::from_secs(60)).await;

    // Mount-time refresh plus exactly one tick.
    assert_eq!(api.scan_calls(), 2);
    assert!(!session.is_polling());
    assert_eq!(session.monitor.last_status().await, Some(ScanStatus::Completed));
    session.unmount();
}

#[tokio::test(start_paused = true)]
async fn test_active_status_refreshes_on_every_tick() {
    let api = Arc::new(StubApi::with_scans([scan(ScanStatus::Running, 0)]));
    let session = ScanSession::mount(api.clone(), SCAN_ID, INTERVAL);

    tokio::time::sleep(Duration::from_millis(12_500)).await;

    assert_eq!(api.scan_calls(), 3);
    assert!(session.is_polling());
    session.unmount();
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_further_requests() {
    let api = Arc::new(StubApi::with_scans([scan(ScanStatus::Running, 0)]));
    let session = ScanSession::mount(api.clone(), SCAN_ID, INTERVAL);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(api.scan_calls(), 1);

    session.unmount();
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert_eq!(api.scan_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_results_arriving_after_teardown_are_discarded() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(StubApi {
        scan_gate: Some(gate.clone()),
        ..StubApi::with_scans([scan(ScanStatus::Running, 0)])
    });
    let lifetime = ViewLifetime::new();
    let monitor = ScanMonitor::new(api.clone(), SCAN_ID, lifetime.clone());

    let pending = {
        let monitor = monitor.clone();
        tokio::spawn(async move { monitor.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(api.scan_calls(), 1);

    lifetime.close();
    gate.notify_one();
    pending.await.unwrap();

    let view = monitor.snapshot().await;
    assert!(!view.loaded);
    assert!(view.scan.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_unknown_status_skips_ticks() {
    let api = Arc::new(StubApi::with_scans([scan(ScanStatus::Unknown, 0)]));
    let monitor = ScanMonitor::new(api.clone(), SCAN_ID, ViewLifetime::new());
    let handle = PollScheduler::new(INTERVAL).start(monitor.clone());

    tokio::time::sleep(Duration::from_secs(30)).await;

    // Only the mount-time refresh went out.
    assert_eq!(api.scan_calls(), 1);
    assert!(handle.is_polling());
    handle.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_failed_scan_is_terminal() {
    let mut failed = scan(ScanStatus::Failed, 0);
    failed.error_message = Some("Search API quota exhausted".into());
    let api = Arc::new(StubApi::with_scans([scan(ScanStatus::Pending, 0), failed]));
    let session = ScanSession::mount(api.clone(), SCAN_ID, INTERVAL);

    tokio::time::sleep(Duration::from_secs(60)).await;

    let view = session.monitor.snapshot().await;
    assert_eq!(view.status(), Some(ScanStatus::Failed));
    assert_eq!(
        view.scan.and_then(|s| s.error_message).as_deref(),
        Some("Search API quota exhausted")
    );
    assert!(!session.is_polling());
    session.unmount();
}

#[tokio::test(start_paused = true)]
async fn test_unknown_payload_mid_scan_keeps_polling() {
    let api = Arc::new(StubApi::with_scans([
        scan(ScanStatus::Running, 0),
        scan(ScanStatus::Unknown, 0),
        scan(ScanStatus::Completed, 2),
    ]));
    let session = ScanSession::mount(api.clone(), SCAN_ID, INTERVAL);

    tokio::time::sleep(Duration::from_secs(7)).await;
    assert_eq!(session.monitor.last_status().await, Some(ScanStatus::Running));

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(api.scan_calls(), 3);
    assert_eq!(session.monitor.last_status().await, Some(ScanStatus::Completed));
    assert!(!session.is_polling());
    session.unmount();
}
