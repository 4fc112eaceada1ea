// src/core/monitor/mod.rs

// Everything that keeps a mounted view in sync with the backend: the
// aggregation passes, the status-driven poller, the report resolver and the
// dashboard's own two-source aggregation.
pub mod aggregator;
pub mod dashboard;
pub mod poller;
pub mod reports;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::info;

use crate::core::api::ScanApi;
use self::aggregator::ScanMonitor;
use self::poller::{PollHandle, PollScheduler};
use self::reports::ReportResolver;

/// Shared "is this view still mounted" flag.
///
/// Every asynchronous completion that belongs to a view checks it before
/// touching state, so results that arrive after teardown are dropped.
#[derive(Debug, Clone, Default)]
pub struct ViewLifetime {
    closed: Arc<AtomicBool>,
}

impl ViewLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// One mounted scan detail view.
///
/// Mounting starts the poller (which performs the initial aggregation) and
/// loads the report list. `unmount` is the only teardown path.
pub struct ScanSession {
    pub monitor: Arc<ScanMonitor>,
    pub reports: Arc<ReportResolver>,
    poll: PollHandle,
}

impl ScanSession {
    /// Mounts the detail view for `scan_id`.
    ///
    /// # Arguments
    /// * `api` - The remote boundary shared by the whole application.
    /// * `scan_id` - The scan to monitor.
    /// * `poll_interval` - Tick period of the poller.
    pub fn mount(api: Arc<dyn ScanApi>, scan_id: &str, poll_interval: Duration) -> Self {
        info!(scan_id, "Mounting scan view.");
        let lifetime = ViewLifetime::new();
        let monitor = ScanMonitor::new(api.clone(), scan_id, lifetime.clone());
        let reports = ReportResolver::new(api, scan_id, lifetime);

        let poll = PollScheduler::new(poll_interval).start(monitor.clone());

        let loader = reports.clone();
        tokio::spawn(async move {
            // A failed list read leaves every format on "generate"; already logged.
            let _ = loader.reload().await;
        });

        Self { monitor, reports, poll }
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_polling()
    }

    /// Tears the view down: stops the poller and discards any completion that
    /// is still on its way.
    pub fn unmount(self) {
        info!(scan_id = %self.monitor.scan_id(), "Unmounting scan view.");
        self.poll.cancel();
    }
}
