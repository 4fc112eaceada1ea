// src/ui/widgets/scan_view.rs

use crate::app::{App, SPINNER_CHARS};
use dorkx_monitor::core::analytics::filter_findings;
use dorkx_monitor::core::knowledge_base::{risk_detail, status_color};
use dorkx_monitor::core::models::{Finding, ScanStatus};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use super::hex_color;

/// Renders the one-line scan header: target, status, profile and timing.
pub fn render_scan_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Scan");

    let Some(scan) = &app.scan_view.scan else {
        let spinner = SPINNER_CHARS[app.spinner_frame];
        let loading = Paragraph::new(format!("{spinner} Loading scan...")).block(block);
        frame.render_widget(loading, area);
        return;
    };

    let mut spans = vec![
        Span::styled(scan.target_domain.clone(), Style::default().bold()),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", scan.status.to_string().to_uppercase()),
            Style::default().fg(hex_color(status_color(scan.status))).bold(),
        ),
        Span::raw(format!("  profile: {}", scan.scan_profile.to_string().to_uppercase())),
        Span::raw(format!("  started: {}", scan.started_at.format("%Y-%m-%d %H:%M:%S"))),
    ];
    if let Some(completed_at) = scan.completed_at {
        spans.push(Span::raw(format!("  completed: {}", completed_at.format("%Y-%m-%d %H:%M:%S"))));
    }
    spans.push(Span::raw(format!("  queries: {}", scan.total_queries)));
    if app.is_polling() && scan.status.is_active() {
        spans.push(Span::styled(
            format!("  {} live", SPINNER_CHARS[app.spinner_frame]),
            Style::default().fg(Color::Cyan),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Renders the findings list under the current risk filter.
pub fn render_findings(frame: &mut Frame, app: &App, area: Rect) {
    let visible = filter_findings(&app.scan_view.findings, app.risk_filter);
    let title = format!(
        "Findings ({}/{}) - risk: {}",
        visible.len(),
        app.scan_view.findings.len(),
        app.risk_filter
    );
    let block = Block::default().borders(Borders::ALL).title(title);

    if let Some(message) = failure_message(app) {
        let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::Red)))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    if visible.is_empty() {
        let text = match app.scan_view.status() {
            Some(status) if status.is_active() => "Scan in progress. Findings will appear as they are discovered.",
            _ => "No findings match the current filter.",
        };
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let offset = app.scroll_offset.min(visible.len().saturating_sub(1));
    let items: Vec<ListItem> = visible.into_iter().skip(offset).map(finding_item).collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn failure_message(app: &App) -> Option<String> {
    let scan = app.scan_view.scan.as_ref()?;
    if scan.status != ScanStatus::Failed {
        return None;
    }
    Some(format!(
        "Scan failed: {}",
        scan.error_message.as_deref().unwrap_or("no reason given")
    ))
}

fn finding_item(finding: &Finding) -> ListItem<'static> {
    let detail = risk_detail(finding.risk_level);
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("[{:<8}] ", detail.label.to_uppercase()),
            Style::default().fg(hex_color(detail.color)).bold(),
        ),
        Span::styled(finding.category.replace('_', " "), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::raw(finding.title.clone().unwrap_or_default()),
    ])];
    lines.push(Line::from(Span::styled(
        format!("    {}", finding.url),
        Style::default().fg(Color::Gray),
    )));
    if let Some(remediation) = &finding.remediation {
        lines.push(Line::from(Span::styled(
            format!("    fix: {remediation}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    ListItem::new(lines)
}
