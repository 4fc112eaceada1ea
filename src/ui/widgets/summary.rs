// src/ui/widgets/summary.rs

use crate::app::{App, SPINNER_CHARS};
use dorkx_monitor::core::analytics::statistic_cards;
use dorkx_monitor::core::knowledge_base::risk_detail;
use dorkx_monitor::core::models::{ScanStatus, TopRisk};
use dorkx_monitor::core::monitor::reports::ArtifactState;
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use super::hex_color;

/// Renders the side panel of the scan detail screen: statistic cards, the
/// top risks and one action per report format.
///
/// # Arguments
/// * `frame` - The `Frame` used for rendering the UI.
/// * `app` - A reference to the application's state.
/// * `area` - The `Rect` defining the drawable area for this widget.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Summary");
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(8), // Statistic cards
            Constraint::Length(1), // Spacer
            Constraint::Length(5), // Reports
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Top risks
        ])
        .split(area);

    // --- Statistic Cards ---
    let mut card_lines = vec![Line::from("FINDINGS".bold())];
    match &app.scan_view.statistics {
        Some(statistics) => {
            for card in statistic_cards(statistics) {
                let style = card.color.map(hex_color).map(|c| Style::default().fg(c)).unwrap_or_default();
                card_lines.push(Line::from(vec![
                    Span::raw(format!("{:<10}", card.label)),
                    Span::styled(card.value.to_string(), style.bold()),
                ]));
            }
        }
        None => card_lines.push(Line::from("Statistics not available yet.")),
    }
    frame.render_widget(Paragraph::new(card_lines), summary_chunks[0]);

    // --- Reports ---
    let mut report_lines = vec![Line::from("REPORTS".bold())];
    let completed = app.scan_view.status() == Some(ScanStatus::Completed);
    for (format, state) in &app.report_states {
        let key = match format.to_string().chars().next() {
            Some(c) => c,
            None => continue,
        };
        let (action, style) = match state {
            ArtifactState::Present { .. } => ("download", Style::default().fg(Color::Green)),
            ArtifactState::Generating => (
                "generating",
                Style::default().fg(Color::Yellow),
            ),
            ArtifactState::Absent if completed => ("generate", Style::default().fg(Color::Cyan)),
            ArtifactState::Absent => ("unavailable", Style::default().fg(Color::DarkGray)),
        };
        let spinner = if *state == ArtifactState::Generating {
            format!(" {}", SPINNER_CHARS[app.spinner_frame])
        } else {
            String::new()
        };
        report_lines.push(Line::from(vec![
            Span::styled(format!("[{key}] "), Style::default().bold().fg(Color::Yellow)),
            Span::raw(format!("{:<5}", format.to_string().to_uppercase())),
            Span::styled(format!("{action}{spinner}"), style),
        ]));
    }
    frame.render_widget(Paragraph::new(report_lines), summary_chunks[2]);

    // --- Top Risks ---
    let mut risk_lines = vec![Line::from("TOP RISKS".bold())];
    let top_risks: &[TopRisk] = app
        .scan_view
        .statistics
        .as_ref()
        .map(|s| s.top_risks.as_slice())
        .unwrap_or_default();
    if top_risks.is_empty() {
        risk_lines.push(Line::from("None."));
    }
    for risk in top_risks {
        let detail = risk_detail(risk.risk_level);
        risk_lines.push(Line::from(vec![
            Span::styled("- ", Style::default().fg(hex_color(detail.color))),
            Span::raw(risk.title.clone().unwrap_or_else(|| risk.url.clone())),
        ]));
    }
    frame.render_widget(Paragraph::new(risk_lines), summary_chunks[4]);
}
