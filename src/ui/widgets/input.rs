// src/ui/widgets/input.rs

use crate::app::{App, LaunchStage, SPINNER_CHARS};
use dorkx_monitor::core::models::ScanProfile;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Renders the target input box.
pub fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("Target Domain [{}]", app.profile.to_string().to_uppercase());
    let input_block = Block::default().borders(Borders::ALL).title(title);
    let input_paragraph = Paragraph::new(app.input.as_str())
        .block(input_block)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(input_paragraph, area);

    // The cursor only makes sense while the user can type.
    if app.launch_stage == LaunchStage::Editing {
        frame.set_cursor_position((area.x + app.input.chars().count() as u16 + 1, area.y + 1));
    }
}

/// Renders the body of the launch screen: profile choice, inline error and
/// the submission spinner.
pub fn render_launch_help(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from("Enter a domain you are authorized to assess, e.g. example.com."),
        Line::from(""),
        Line::from("SCAN PROFILE".bold()),
    ];
    for profile in ScanProfile::ALL {
        let marker = if profile == app.profile { "(*) " } else { "( ) " };
        let style = if profile == app.profile {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(marker, style),
            Span::styled(profile.to_string().to_uppercase(), style),
            Span::raw(format!("  {}", profile_description(profile))),
        ]));
    }
    lines.push(Line::from(""));

    if let Some(error) = &app.launch_error {
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }
    if app.launch_stage == LaunchStage::Submitting {
        let spinner = SPINNER_CHARS[app.spinner_frame];
        lines.push(Line::from(Span::styled(
            format!("{spinner} Validating target and creating scan..."),
            Style::default().fg(Color::Cyan),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("New Scan"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn profile_description(profile: ScanProfile) -> &'static str {
    match profile {
        ScanProfile::Quick => "A handful of high-signal queries.",
        ScanProfile::Standard => "Balanced coverage of every category.",
        ScanProfile::Deep => "Exhaustive query set; slowest.",
        ScanProfile::Unknown => "",
    }
}
