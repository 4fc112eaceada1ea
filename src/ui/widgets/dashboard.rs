// src/ui/widgets/dashboard.rs

use crate::app::{App, SPINNER_CHARS};
use dorkx_monitor::core::analytics::{ChartSlice, DashboardModel, NamedValue, SummaryCards};
use dorkx_monitor::core::knowledge_base::status_color;
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::hex_color;

// Number of most recent timeline points that fit next to the other charts.
const TIMELINE_POINTS: usize = 14;

/// Renders the filter bar: status, profile and the domain search text.
pub fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let filter = &app.scan_filter;
    let line = Line::from(vec![
        Span::raw("status: "),
        Span::styled(filter.status.to_string(), Style::default().fg(Color::Cyan).bold()),
        Span::raw("   profile: "),
        Span::styled(filter.profile.to_string(), Style::default().fg(Color::Cyan).bold()),
        Span::raw("   domain: "),
        Span::styled(filter.domain.clone(), Style::default().fg(Color::Yellow)),
    ]);
    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Dashboard"));
    frame.render_widget(paragraph, area);
    frame.set_cursor_position((area.x + line_width(app) + 1, area.y + 1));
}

fn line_width(app: &App) -> u16 {
    let filter = &app.scan_filter;
    let text = format!(
        "status: {}   profile: {}   domain: {}",
        filter.status, filter.profile, filter.domain
    );
    text.chars().count() as u16
}

/// Renders summary cards, the charts and the filtered scan table.
pub fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    if !app.dashboard.loaded {
        let spinner = SPINNER_CHARS[app.spinner_frame];
        frame.render_widget(Paragraph::new(format!("{spinner} Loading dashboard...")), area);
        return;
    }

    let model = app.dashboard.derive(&app.scan_filter);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(12), Constraint::Min(5)])
        .split(area);
    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(35),
            Constraint::Percentage(15),
            Constraint::Percentage(25),
        ])
        .split(rows[1]);

    render_summary_cards(frame, model.summary.as_ref(), rows[0]);
    render_risk_chart(frame, &model.risk, charts[0]);
    render_named_chart(frame, "Categories", &model.categories, Direction::Horizontal, charts[1]);
    render_named_chart(frame, "Profiles", &model.profiles, Direction::Vertical, charts[2]);
    let recent = model.timeline.len().saturating_sub(TIMELINE_POINTS);
    render_named_chart(frame, "Scans per day", &model.timeline[recent..], Direction::Vertical, charts[3]);
    render_scan_table(frame, app, &model, rows[2]);
}

fn render_summary_cards(frame: &mut Frame, summary: Option<&SummaryCards>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Overview");
    let Some(cards) = summary else {
        frame.render_widget(Paragraph::new("Analytics not available.").block(block), area);
        return;
    };

    let line = Line::from(vec![
        Span::raw("Scans "),
        Span::styled(cards.total_scans.to_string(), Style::default().bold()),
        Span::raw(format!(
            " ({} completed, {} running, {} failed)   ",
            cards.completed_scans, cards.running_scans, cards.failed_scans
        )),
        Span::raw("Findings "),
        Span::styled(cards.total_findings.to_string(), Style::default().bold()),
        Span::raw(format!(" (avg {:.1}/scan)   ", cards.average_findings_per_scan)),
        Span::styled(format!("Critical {}", cards.critical_findings), Style::default().fg(Color::Red).bold()),
        Span::raw("   "),
        Span::styled(format!("High {}", cards.high_findings), Style::default().fg(Color::LightRed).bold()),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_risk_chart(frame: &mut Frame, slices: &[ChartSlice], area: Rect) {
    let bars: Vec<Bar> = slices
        .iter()
        .map(|slice| {
            Bar::default()
                .value(slice.value)
                .label(Line::from(slice.label))
                .style(Style::default().fg(hex_color(slice.color)))
        })
        .collect();
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("Risk distribution"))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn render_named_chart(frame: &mut Frame, title: &str, series: &[NamedValue], direction: Direction, area: Rect) {
    let bars: Vec<Bar> = series
        .iter()
        .map(|point| Bar::default().value(point.value).label(Line::from(point.name.clone())))
        .collect();
    let bar_width = if direction == Direction::Horizontal { 1 } else { 5 };
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .direction(direction)
        .bar_width(bar_width)
        .bar_gap(if direction == Direction::Horizontal { 0 } else { 1 })
        .bar_style(Style::default().fg(Color::Cyan))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn render_scan_table(frame: &mut Frame, app: &App, model: &DashboardModel, area: Rect) {
    let title = format!("Scans ({}/{})", model.scans.len(), app.dashboard.scans.len());
    let block = Block::default().borders(Borders::ALL).title(title);

    if model.scans.is_empty() {
        frame.render_widget(Paragraph::new("No scans match the current filters.").block(block), area);
        return;
    }

    let header = Row::new(["Target", "Status", "Profile", "Findings", "Started"])
        .style(Style::default().bold().fg(Color::Yellow));
    let rows = model.scans.iter().map(|scan| {
        Row::new(vec![
            Cell::from(scan.target_domain.clone()),
            Cell::from(scan.status.to_string().to_uppercase())
                .style(Style::default().fg(hex_color(status_color(scan.status)))),
            Cell::from(scan.scan_profile.to_string().to_uppercase()),
            Cell::from(scan.total_findings.to_string()),
            Cell::from(scan.started_at.format("%Y-%m-%d %H:%M").to_string()),
        ])
    });
    let widths = [
        Constraint::Percentage(35),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
        Constraint::Percentage(10),
        Constraint::Percentage(25),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray).bold())
        .highlight_symbol("> ");

    let selected = app.selected_scan.min(model.scans.len().saturating_sub(1));
    let mut state = TableState::default().with_selected(Some(selected));
    frame.render_stateful_widget(table, area, &mut state);
}
