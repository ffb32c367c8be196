// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, renderer host events)
// - Rendering the chrome and the mount surface

pub mod app;
pub mod clipboard;
pub mod components;
pub mod modal;
pub mod theme;
pub mod views;

use crate::viz::HostEvent;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// when done, also when the loop failed.
pub async fn run_tui(mut app: App, mut host_rx: mpsc::UnboundedReceiver<HostEvent>) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &mut host_rx).await;

    // Drop the session stack first so renderer tasks stop drawing
    app.controller.remove_from_stack(0);

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on three sources at once:
/// 1. Keyboard input
/// 2. Timer ticks (toast expiry, redraw after renderer task draws)
/// 3. Host events posted by renderer capabilities
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    host_rx: &mut mpsc::UnboundedReceiver<HostEvent>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        if let Some(title) = app.take_pending_title() {
            execute!(terminal.backend_mut(), SetTitle(title)).context("Failed to set title")?;
        }

        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key)) = event::read() {
                        if key.kind == KeyEventKind::Press {
                            app.handle_key(key);
                        }
                    }
                }
            } => {}

            // Periodic tick for redrawing
            _ = tick_interval.tick() => {
                app.clear_expired_toast();
            }

            // Requests from renderers
            Some(event) = host_rx.recv() => {
                app.handle_host_event(event);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
