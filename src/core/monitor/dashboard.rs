// src/core/monitor/dashboard.rs

use tracing::{info, warn};

use crate::core::analytics::{self, DashboardModel, ScanFilter};
use crate::core::api::ScanApi;
use crate::core::error::ViewError;
use crate::core::models::{Analytics, ApiResult, Scan};

/// The two settled reads behind the dashboard.
#[derive(Debug)]
pub struct DashboardSnapshot {
    pub scans: ApiResult<Vec<Scan>>,
    pub analytics: ApiResult<Analytics>,
}

/// Reads one page of scans and the analytics overview concurrently.
pub async fn fetch_dashboard(api: &dyn ScanApi, page: u32, page_size: u32) -> DashboardSnapshot {
    let (scans, analytics) = tokio::join!(api.list_scans(page, page_size), api.get_analytics_overview());

    if let Err(e) = &scans {
        warn!(error = %e, "Failed to load scan list.");
    }
    if let Err(e) = &analytics {
        warn!(error = %e, "Failed to load analytics overview.");
    }

    DashboardSnapshot {
        scans: scans.map(|page| page.scans),
        analytics,
    }
}

/// View state of the dashboard screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub scans: Vec<Scan>,
    pub analytics: Option<Analytics>,
    pub error: Option<ViewError>,
    pub loaded: bool,
}

impl DashboardView {
    /// Same policy as the scan view: keep whatever failed, block only when
    /// both sources failed together.
    pub fn apply(&mut self, snapshot: DashboardSnapshot) {
        let both_failed = matches!((&snapshot.scans, &snapshot.analytics), (Err(_), Err(_)));

        if let Ok(scans) = snapshot.scans {
            self.scans = scans;
        }
        if let Ok(analytics) = snapshot.analytics {
            self.analytics = Some(analytics);
        }

        self.error = both_failed.then_some(ViewError::DashboardUnavailable);
        self.loaded = true;
        info!(scans = self.scans.len(), analytics = self.analytics.is_some(), "Dashboard refreshed.");
    }

    /// Chart series and the filtered scan list for the current filter.
    pub fn derive(&self, filter: &ScanFilter) -> DashboardModel {
        analytics::reduce(self.analytics.as_ref(), &self.scans, filter)
    }
}
