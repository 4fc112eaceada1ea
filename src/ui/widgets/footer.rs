// src/ui/widgets/footer.rs

use crate::app::{App, LaunchStage, Screen};
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

fn key(label: &'static str) -> Span<'static> {
    Span::styled(label, Style::new().bold().fg(Color::Yellow))
}

/// Renders the footer widget, which displays available actions.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let spans = match (app.screen, app.launch_stage) {
        (Screen::Launch, LaunchStage::Consent) => Line::from(vec![
            key("[Y]"),
            Span::raw(" accept and start, "),
            key("[N]"),
            Span::raw(" go back"),
        ]),
        (Screen::Launch, LaunchStage::Submitting) => Line::from("Creating scan..."),
        (Screen::Launch, LaunchStage::Editing) => Line::from(vec![
            key("Enter"),
            Span::raw(" scan, "),
            key("Tab"),
            Span::raw(" profile, "),
            key("F2"),
            Span::raw(" dashboard, "),
            key("Esc"),
            Span::raw(" quit"),
        ]),
        (Screen::Scan, _) if app.scan_view.is_blocked() => Line::from(vec![
            key("Enter"),
            Span::raw(" return home, "),
            key("[Q]"),
            Span::raw("uit"),
        ]),
        (Screen::Scan, _) => Line::from(vec![
            key("[R]"),
            Span::raw("efresh, "),
            key("[F]"),
            Span::raw("ilter, "),
            key("[P]"),
            Span::raw("DF "),
            key("[H]"),
            Span::raw("TML "),
            key("[C]"),
            Span::raw("SV, "),
            key("[D]"),
            Span::raw("ashboard, "),
            key("[B]"),
            Span::raw("ack, "),
            key("[Q]"),
            Span::raw("uit"),
        ]),
        (Screen::Dashboard, _) => Line::from(vec![
            key("Tab"),
            Span::raw(" status, "),
            key("S-Tab"),
            Span::raw(" profile, type to search, "),
            key("Enter"),
            Span::raw(" open, "),
            key("F5"),
            Span::raw(" reload, "),
            key("Esc"),
            Span::raw(" back"),
        ]),
    };

    let footer = Paragraph::new(spans).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

/// Renders the transient notification line, if any.
pub fn render_notification(frame: &mut Frame, app: &App, area: Rect) {
    let Some(notification) = &app.notification else {
        return;
    };
    let color = if notification.is_error { Color::Red } else { Color::Green };
    let line = Line::from(vec![
        Span::styled(notification.message.clone(), Style::new().fg(color)),
        Span::raw("  "),
        Span::styled("[X] dismiss", Style::new().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
