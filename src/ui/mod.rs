// src/ui/mod.rs

use crate::app::{App, LaunchStage, Screen};
use ratatui::prelude::*;

mod layout;
mod widgets;

pub fn render(app: &mut App, frame: &mut Frame) {
    let layout = layout::create_layout(frame.area());

    match app.screen {
        Screen::Launch => {
            widgets::input::render_input(frame, app, layout.header);
            widgets::input::render_launch_help(frame, app, layout.body);
        }
        Screen::Scan => {
            widgets::scan_view::render_scan_header(frame, app, layout.header);
            if app.scan_view.is_blocked() {
                widgets::render_blocking_error(frame, app.scan_view.error.as_ref(), layout.body);
            } else {
                let body = layout::split_detail(layout.body);
                widgets::scan_view::render_findings(frame, app, body.main);
                widgets::summary::render_summary(frame, app, body.side);
            }
        }
        Screen::Dashboard => {
            widgets::dashboard::render_filter_bar(frame, app, layout.header);
            if app.dashboard.error.is_some() {
                widgets::render_blocking_error(frame, app.dashboard.error.as_ref(), layout.body);
            } else {
                widgets::dashboard::render_dashboard(frame, app, layout.body);
            }
        }
    }

    widgets::footer::render_notification(frame, app, layout.status);
    widgets::footer::render_footer(frame, app, layout.footer);

    if app.screen == Screen::Launch && app.launch_stage == LaunchStage::Consent {
        let area = frame.area();
        widgets::disclaimer_popup::render_consent_popup(frame, app, area);
    }
}
