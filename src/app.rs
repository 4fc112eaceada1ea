// src/app.rs

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use dorkx_monitor::ScanApi;
use dorkx_monitor::config::{Config, StartScreen};
use dorkx_monitor::core::analytics::{ScanFilter, Selection};
use dorkx_monitor::core::client::ApiClient;
use dorkx_monitor::core::error::{LaunchError, Recovery, ReportError};
use dorkx_monitor::core::launch::{self, LaunchRequest};
use dorkx_monitor::core::models::{ReportFormat, RiskLevel, Scan, ScanProfile, ScanStatus};
use dorkx_monitor::core::monitor::ScanSession;
use dorkx_monitor::core::monitor::aggregator::ScanView;
use dorkx_monitor::core::monitor::dashboard::{self, DashboardSnapshot, DashboardView};
use dorkx_monitor::core::monitor::reports::{ArtifactState, ReportAction};

pub const SPINNER_CHARS: [char; 4] = ['|', '/', '-', '\\'];

const NOTIFICATION_TTL: Duration = Duration::from_secs(6);

/// Results of background work, delivered to the UI loop.
pub enum AppEvent {
    Launched(Result<Scan, LaunchError>),
    ReportOutcome {
        scan_id: String,
        format: ReportFormat,
        outcome: Result<ReportAction, ReportError>,
    },
    DashboardLoaded {
        epoch: u64,
        snapshot: DashboardSnapshot,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Launch,
    Scan,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStage {
    Editing,
    Consent,
    Submitting,
}

/// A transient, dismissible message.
pub struct Notification {
    pub message: String,
    pub is_error: bool,
    raised_at: Instant,
}

pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub config: Config,
    client: Arc<ApiClient>,
    events: mpsc::Sender<AppEvent>,

    // Launch screen
    pub input: String,
    pub profile: ScanProfile,
    pub launch_stage: LaunchStage,
    pub launch_error: Option<String>,

    // Scan detail screen
    session: Option<ScanSession>,
    pub scan_view: ScanView,
    pub report_states: Vec<(ReportFormat, ArtifactState)>,
    pub risk_filter: Selection<RiskLevel>,
    pub scroll_offset: usize,

    // Dashboard screen
    pub dashboard: DashboardView,
    dashboard_epoch: u64,
    pub scan_filter: ScanFilter,
    pub selected_scan: usize,

    pub notification: Option<Notification>,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(client: Arc<ApiClient>, config: Config, events: mpsc::Sender<AppEvent>) -> Self {
        Self {
            should_quit: false,
            screen: Screen::Launch,
            config,
            client,
            events,
            input: String::new(),
            profile: ScanProfile::default(),
            launch_stage: LaunchStage::Editing,
            launch_error: None,
            session: None,
            scan_view: ScanView::default(),
            report_states: Vec::new(),
            risk_filter: Selection::All,
            scroll_offset: 0,
            dashboard: DashboardView::default(),
            dashboard_epoch: 0,
            scan_filter: ScanFilter::default(),
            selected_scan: 0,
            notification: None,
            spinner_frame: 0,
        }
    }

    fn api(&self) -> Arc<dyn ScanApi> {
        self.client.clone()
    }

    pub fn open_start_screen(&mut self) {
        match self.config.start.clone() {
            StartScreen::Launch => self.screen = Screen::Launch,
            StartScreen::Scan(scan_id) => self.open_scan(&scan_id),
            StartScreen::Dashboard => self.open_dashboard(),
        }
    }

    // --- Navigation ---

    /// Mounts the detail view for `scan_id`, tearing down any previous one.
    pub fn open_scan(&mut self, scan_id: &str) {
        self.leave_scan();
        self.session = Some(ScanSession::mount(self.api(), scan_id, self.config.poll_interval));
        self.scan_view = ScanView::default();
        self.report_states.clear();
        self.risk_filter = Selection::All;
        self.scroll_offset = 0;
        self.screen = Screen::Scan;
    }

    /// Unmounts the detail view, if one is mounted.
    pub fn leave_scan(&mut self) {
        if let Some(session) = self.session.take() {
            session.unmount();
        }
    }

    pub fn open_dashboard(&mut self) {
        self.leave_scan();
        self.screen = Screen::Dashboard;
        self.selected_scan = 0;
        self.reload_dashboard();
    }

    pub fn go_home(&mut self) {
        self.leave_scan();
        self.dashboard_epoch += 1;
        self.screen = Screen::Launch;
        self.launch_stage = LaunchStage::Editing;
    }

    pub fn recover(&mut self, recovery: Recovery) {
        match recovery {
            Recovery::ReturnHome => self.go_home(),
        }
    }

    pub fn quit(&mut self) {
        self.leave_scan();
        self.should_quit = true;
    }

    // --- Launch ---

    /// Checks the typed target locally and, if it looks like a domain, asks
    /// for consent.
    pub fn submit_target(&mut self) {
        let target = launch::normalize_target(&self.input);
        match launch::check_target_format(&target) {
            Ok(()) => {
                self.launch_error = None;
                self.launch_stage = LaunchStage::Consent;
            }
            Err(e) => self.launch_error = Some(e.to_string()),
        }
    }

    pub fn answer_consent(&mut self, accepted: bool) {
        if !accepted {
            self.launch_error = Some(LaunchError::ConsentRequired.to_string());
            self.launch_stage = LaunchStage::Editing;
            return;
        }

        self.launch_stage = LaunchStage::Submitting;
        let request = LaunchRequest {
            target: self.input.clone(),
            profile: self.profile,
            consent_accepted: true,
            user_id: self.config.user_id.clone(),
        };
        let api = self.api();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let outcome = launch::launch_scan(api.as_ref(), &request).await;
            let _ = tx.send(AppEvent::Launched(outcome)).await;
        });
    }

    pub fn cycle_profile(&mut self) {
        let index = ScanProfile::ALL.iter().position(|p| *p == self.profile).unwrap_or(0);
        self.profile = ScanProfile::ALL[(index + 1) % ScanProfile::ALL.len()];
    }

    // --- Scan detail ---

    pub fn refresh_scan(&self) {
        if let Some(session) = &self.session {
            let monitor = session.monitor.clone();
            tokio::spawn(async move { monitor.refresh().await });
        }
    }

    pub fn cycle_risk_filter(&mut self) {
        self.risk_filter = self.risk_filter.cycle(&RiskLevel::FIXED);
        self.scroll_offset = 0;
    }

    /// User asked for a report in `format`.
    pub fn request_report(&mut self, format: ReportFormat) {
        if self.session.is_none() {
            return;
        }
        if self.scan_view.status() != Some(ScanStatus::Completed) {
            self.notify("Reports are available once the scan has completed.", true);
            return;
        }
        let Some(resolver) = self.session.as_ref().map(|s| s.reports.clone()) else {
            return;
        };

        let scan_id = resolver.scan_id().to_string();
        let tx = self.events.clone();
        tokio::spawn(async move {
            let outcome = resolver.request(format).await;
            let _ = tx.send(AppEvent::ReportOutcome { scan_id, format, outcome }).await;
        });
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    // --- Dashboard ---

    pub fn reload_dashboard(&mut self) {
        self.dashboard_epoch += 1;
        let epoch = self.dashboard_epoch;
        let api = self.api();
        let page_size = self.config.page_size;
        let tx = self.events.clone();
        tokio::spawn(async move {
            let snapshot = dashboard::fetch_dashboard(api.as_ref(), 1, page_size).await;
            let _ = tx.send(AppEvent::DashboardLoaded { epoch, snapshot }).await;
        });
    }

    pub fn cycle_status_filter(&mut self) {
        self.scan_filter.status = self.scan_filter.status.cycle(&ScanStatus::KNOWN);
        self.selected_scan = 0;
    }

    pub fn cycle_profile_filter(&mut self) {
        self.scan_filter.profile = self.scan_filter.profile.cycle(&ScanProfile::ALL);
        self.selected_scan = 0;
    }

    pub fn select_previous_scan(&mut self) {
        self.selected_scan = self.selected_scan.saturating_sub(1);
    }

    pub fn select_next_scan(&mut self) {
        self.selected_scan = self.selected_scan.saturating_add(1);
    }

    pub fn open_selected_scan(&mut self) {
        let model = self.dashboard.derive(&self.scan_filter);
        let index = self.selected_scan.min(model.scans.len().saturating_sub(1));
        if let Some(scan) = model.scans.get(index) {
            let scan_id = scan.id.clone();
            self.open_scan(&scan_id);
        }
    }

    // --- Loop hooks ---

    /// Pulls the latest view state of the mounted scan, if any.
    pub async fn sync(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        self.scan_view = session.monitor.snapshot().await;
        let mut states = Vec::with_capacity(ReportFormat::ALL.len());
        for format in ReportFormat::ALL {
            states.push((format, session.reports.state(format).await));
        }
        self.report_states = states;
    }

    pub fn on_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Launched(Ok(scan)) => {
                info!(scan_id = %scan.id, "Opening newly created scan.");
                self.input.clear();
                self.launch_stage = LaunchStage::Editing;
                self.open_scan(&scan.id);
            }
            AppEvent::Launched(Err(e)) => {
                warn!(error = %e, "Scan launch failed.");
                self.launch_error = Some(e.to_string());
                self.launch_stage = LaunchStage::Editing;
            }
            AppEvent::ReportOutcome { scan_id, format, outcome } => {
                let mounted = self.session.as_ref().map(|s| s.monitor.scan_id()) == Some(scan_id.as_str());
                if !mounted {
                    debug!(%scan_id, "Dropping report outcome for an unmounted view.");
                    return;
                }
                let label = format.to_string().to_uppercase();
                match outcome {
                    Ok(ReportAction::Download { url }) => {
                        let link = self
                            .client
                            .base_url()
                            .join(&url)
                            .map(|u| u.to_string())
                            .unwrap_or(url);
                        self.notify(format!("{label} report ready: {link}"), false);
                    }
                    Ok(ReportAction::Generate) => {
                        self.notify(format!("{label} report requested; it will appear once listed."), false);
                    }
                    Err(e) => self.notify(e.to_string(), true),
                }
            }
            AppEvent::DashboardLoaded { epoch, snapshot } => {
                if epoch != self.dashboard_epoch || self.screen != Screen::Dashboard {
                    debug!(epoch, "Dropping stale dashboard load.");
                    return;
                }
                self.dashboard.apply(snapshot);
            }
        }
    }

    pub fn on_tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.raised_at.elapsed() > NOTIFICATION_TTL)
        {
            self.notification = None;
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, is_error: bool) {
        self.notification = Some(Notification {
            message: message.into(),
            is_error,
            raised_at: Instant::now(),
        });
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    pub fn is_polling(&self) -> bool {
        self.session.as_ref().is_some_and(ScanSession::is_polling)
    }
}
