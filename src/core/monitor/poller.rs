// src/core/monitor/poller.rs

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::core::monitor::aggregator::ScanMonitor;

/// Default tick period of the scan poller.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Starts status-driven polling for scan views.
#[derive(Debug, Clone, Copy)]
pub struct PollScheduler {
    interval: Duration,
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Moves a view from Idle to Polling.
    ///
    /// The spawned task performs the mount-time aggregation right away, then
    /// wakes once per interval. A tick refreshes the view only while the last
    /// known status is pending or running; an unknown status skips the tick.
    /// The task ends by itself as soon as a terminal status is observed.
    ///
    /// # Returns
    /// The handle whose `cancel` is the only way to tear the poller down.
    pub fn start(&self, monitor: Arc<ScanMonitor>) -> PollHandle {
        info!(scan_id = %monitor.scan_id(), interval_secs = self.interval.as_secs_f64(), "Starting scan poller.");
        let task = tokio::spawn(poll_loop(monitor.clone(), self.interval));
        PollHandle { monitor, task }
    }
}

async fn poll_loop(monitor: Arc<ScanMonitor>, period: Duration) {
    monitor.refresh().await;

    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if let Some(status) = monitor.last_status().await {
            if status.is_terminal() {
                info!(scan_id = %monitor.scan_id(), %status, "Terminal status observed, stopping poller.");
                return;
            }
        }

        ticker.tick().await;
        if monitor.lifetime().is_closed() {
            return;
        }

        match monitor.last_status().await {
            Some(status) if status.is_active() => monitor.refresh().await,
            status => debug!(scan_id = %monitor.scan_id(), ?status, "Skipping poll tick."),
        }
    }
}

/// Handle to a running poller. Dropping it does not stop the poller.
#[must_use = "a poller runs until `cancel` is called"]
pub struct PollHandle {
    monitor: Arc<ScanMonitor>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// `true` while the timer is alive.
    pub fn is_polling(&self) -> bool {
        !self.task.is_finished()
    }

    /// Clears the timer unconditionally and closes the view, so any
    /// aggregation still in flight is discarded when it settles.
    ///
    /// Takes `self`, so it can run at most once per handle.
    pub fn cancel(self) {
        debug!(scan_id = %self.monitor.scan_id(), "Cancelling scan poller.");
        self.monitor.lifetime().close();
        self.task.abort();
    }
}
