// Views module - screen-level rendering
//
// A single screen: title bar, results panel beside the visualization panel,
// status bar. Modals and toasts are drawn over it.

mod modal;

use super::app::App;
use crate::tui::components::{self, results_panel, viz_panel};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

/// Width of the results panel, in columns
const RESULTS_WIDTH: u16 = 34;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(bg_block, f.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(2),
        ])
        .split(f.area());

    components::render_title(f, rows[0], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(RESULTS_WIDTH), Constraint::Min(20)])
        .split(rows[1]);
    results_panel::render(f, columns[0], app);
    viz_panel::render(f, columns[1], app);

    components::render_status(f, rows[2], app);

    // Take modal temporarily to avoid borrow conflict with mutable app
    if let Some(modal_state) = app.modal.take() {
        modal::render(f, &modal_state, app);
        app.modal = Some(modal_state);
    }

    if let Some(ref toast) = app.toast {
        toast.render(f, f.area(), &app.theme);
    }
    app.clear_expired_toast();
}
