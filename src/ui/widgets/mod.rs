// src/ui/widgets/mod.rs

// Module declarations for all UI widgets, plus the few helpers they share.

pub mod dashboard; // Summary cards, charts and the scan table.
pub mod disclaimer_popup; // The consent popup shown before a scan starts.
pub mod footer; // Key hints and the notification line.
pub mod input; // The launch form.
pub mod scan_view; // Header and findings of the scan detail screen.
pub mod summary; // Statistic cards and report actions.

use std::str::FromStr;

use dorkx_monitor::core::error::{Recovery, ViewError};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Terminal color for one of the `#RRGGBB` strings of the risk table.
pub fn hex_color(hex: &str) -> Color {
    Color::from_str(hex).unwrap_or(Color::Gray)
}

/// The full-body error page shown when every source of a view failed.
pub fn render_blocking_error(frame: &mut Frame, error: Option<&ViewError>, area: Rect) {
    let message = error.map(ToString::to_string).unwrap_or_else(|| "Scan not found".to_string());
    let hint = match error.map(ViewError::recovery) {
        Some(Recovery::ReturnHome) | None => "Press Enter to return home.",
    };

    let text = Text::from(vec![
        Line::from(Span::styled(message, Style::default().bold().fg(Color::Red))),
        Line::from(""),
        Line::from(hint),
    ]);
    let popup_area = centered_rect(60, 30, area);
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Error"))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, popup_area);
}

/// Helper function to create a centered rectangle for a popup.
///
/// # Arguments
/// * `percent_x` - The desired width of the popup as a percentage of the parent area.
/// * `percent_y` - The desired height of the popup as a percentage of the parent area.
/// * `r` - The parent `Rect` to center the new area within.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
