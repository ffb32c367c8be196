// Components module - building blocks of the host chrome
//
// - Title bar: workspace operator and the visualization breadcrumb
// - Results panel: operator results, with the renderer each one would open in
// - Viz panel: the mount surface renderers draw into
// - Status bar: mode, focus, gestures of the active renderer
// - Toast: transient notifications

pub mod results_panel;
pub mod scrollbar;
pub mod status_bar;
pub mod title_bar;
pub mod toast;
pub mod viz_panel;

use crate::tui::app::App;
use ratatui::{layout::Rect, Frame};

/// Render the title bar (convenience wrapper)
pub fn render_title(f: &mut Frame, area: Rect, app: &App) {
    title_bar::render(f, area, app);
}

/// Render the status bar (convenience wrapper)
pub fn render_status(f: &mut Frame, area: Rect, app: &App) {
    status_bar::render(f, area, app);
}
