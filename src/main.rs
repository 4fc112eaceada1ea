// src/main.rs

use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::{Stdout, stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use dorkx_monitor::config::Config;
use dorkx_monitor::core::client::ApiClient;
use dorkx_monitor::core::models::ReportFormat;
use dorkx_monitor::logging;

mod app;
mod ui;

use app::{App, AppEvent, LaunchStage, Screen};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = Config::from_args();
    let log_path = logging::initialize_logging()?;
    info!(
        api_url = %config.api_url,
        poll_interval = ?config.poll_interval,
        log = %log_path.display(),
        "Starting dorkx-monitor."
    );

    let client = Arc::new(ApiClient::new(config.api_url.clone(), config.request_timeout)?);
    let (tx, mut rx) = mpsc::channel(16);
    let mut app = App::new(client, config, tx);

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let outcome = run(&mut terminal, &mut app, &mut rx).await;
    app.leave_scan();

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;

    info!("Exiting.");
    outcome
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    app.open_start_screen();

    while !app.should_quit {
        app.sync().await;
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(app)?;
        }

        while let Ok(event) = rx.try_recv() {
            app.on_event(event);
        }
        app.on_tick();
    }
    Ok(())
}

/// Single entry point for terminal events.
fn handle_events(app: &mut App) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            match app.screen {
                Screen::Launch => handle_launch_input(app, key),
                Screen::Scan => handle_scan_input(app, key.code),
                Screen::Dashboard => handle_dashboard_input(app, key.code),
            }
        }
    }
    Ok(())
}

fn handle_launch_input(app: &mut App, key: KeyEvent) {
    match app.launch_stage {
        LaunchStage::Consent => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.answer_consent(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_consent(false),
            _ => {}
        },
        LaunchStage::Submitting => {}
        LaunchStage::Editing => match key.code {
            KeyCode::Esc => app.quit(),
            KeyCode::F(2) => app.open_dashboard(),
            KeyCode::Tab => app.cycle_profile(),
            KeyCode::Enter => app.submit_target(),
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Char(c) => {
                app.input.push(c);
                app.launch_error = None;
            }
            _ => {}
        },
    }
}

fn handle_scan_input(app: &mut App, key_code: KeyCode) {
    if app.scan_view.is_blocked() {
        match key_code {
            KeyCode::Char('h') | KeyCode::Enter | KeyCode::Esc => {
                if let Some(error) = &app.scan_view.error {
                    let recovery = error.recovery();
                    app.recover(recovery);
                } else {
                    app.go_home();
                }
            }
            KeyCode::Char('q') => app.quit(),
            _ => {}
        }
        return;
    }

    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('b') | KeyCode::Esc => app.go_home(),
        KeyCode::Char('d') => app.open_dashboard(),
        KeyCode::Char('r') => app.refresh_scan(),
        KeyCode::Char('f') => app.cycle_risk_filter(),
        KeyCode::Char('p') => app.request_report(ReportFormat::Pdf),
        KeyCode::Char('h') => app.request_report(ReportFormat::Html),
        KeyCode::Char('c') => app.request_report(ReportFormat::Csv),
        KeyCode::Char('x') => app.dismiss_notification(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        _ => {}
    }
}

fn handle_dashboard_input(app: &mut App, key_code: KeyCode) {
    if app.dashboard.error.is_some() {
        match key_code {
            KeyCode::Enter | KeyCode::Esc => {
                if let Some(error) = &app.dashboard.error {
                    let recovery = error.recovery();
                    app.recover(recovery);
                }
            }
            KeyCode::F(5) => app.reload_dashboard(),
            _ => {}
        }
        return;
    }

    match key_code {
        KeyCode::Esc => app.go_home(),
        KeyCode::F(5) => app.reload_dashboard(),
        KeyCode::Tab => app.cycle_status_filter(),
        KeyCode::BackTab => app.cycle_profile_filter(),
        KeyCode::Up => app.select_previous_scan(),
        KeyCode::Down => app.select_next_scan(),
        KeyCode::Enter => app.open_selected_scan(),
        KeyCode::Backspace => {
            app.scan_filter.domain.pop();
            app.selected_scan = 0;
        }
        KeyCode::Char(c) => {
            app.scan_filter.domain.push(c);
            app.selected_scan = 0;
        }
        _ => {}
    }
}
