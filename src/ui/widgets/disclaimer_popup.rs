// src/ui/widgets/disclaimer_popup.rs

use crate::app::App;
use dorkx_monitor::core::launch::normalize_target;
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect;

/// Renders the consent popup on top of the launch screen.
///
/// A scan is only created after the user explicitly accepts here; declining
/// returns to the form with an inline error.
///
/// # Arguments
/// * `frame` - A mutable reference to the `Frame` used for rendering the TUI.
/// * `app` - Application state, for the target being confirmed.
/// * `area` - The `Rect` representing the total area available for rendering.
pub fn render_consent_popup(frame: &mut Frame, app: &App, area: Rect) {
    let target = normalize_target(&app.input);
    let disclaimer_text = Text::from(vec![
        Line::from("IMPORTANT LEGAL DISCLAIMER".bold().yellow()),
        Line::from(""),
        Line::from(vec![Span::raw("Target: "), Span::styled(target, Style::default().fg(Color::Cyan).bold())]),
        Line::from(""),
        Line::from("DORK-X runs passive search-engine reconnaissance. Only assess domains you own or have explicit, written permission to test."),
        Line::from(""),
        Line::from("Unauthorized reconnaissance may be illegal in your jurisdiction. You are solely responsible for how you use the results."),
        Line::from(""),
        Line::from("Press ".bold() + "Y".bold().yellow() + " to accept and start, ".bold() + "N".bold().yellow() + " to go back.".bold()),
    ]);

    let block = Block::default()
        .title("Consent")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let popup_area = centered_rect(70, 60, area);

    let popup = Paragraph::new(disclaimer_text)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    // Clear first so the launch form does not bleed through.
    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}
