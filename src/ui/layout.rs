// src/ui/layout.rs

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Defines the areas shared by every screen.
///
/// Each screen decides what goes into `header` and `body`; the status line
/// and the footer are always the notification and the key hints.
pub struct AppLayout {
    pub header: Rect,
    pub body: Rect,
    pub status: Rect,
    pub footer: Rect,
}

/// Splits the frame into header, body, status line and footer.
///
/// # Arguments
/// * `frame_size` - The `Rect` representing the total size of the terminal frame.
///
/// # Returns
/// An `AppLayout` with the calculated `Rect` for each area.
pub fn create_layout(frame_size: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame_size);

    AppLayout {
        header: chunks[0],
        body: chunks[1],
        status: chunks[2],
        footer: chunks[3],
    }
}

/// Findings on the left, statistics and reports on the right.
pub struct DetailLayout {
    pub main: Rect,
    pub side: Rect,
}

pub fn split_detail(body: Rect) -> DetailLayout {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(body);

    DetailLayout { main: chunks[0], side: chunks[1] }
}
