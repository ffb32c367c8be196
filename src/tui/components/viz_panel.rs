// Viz panel component
//
// Frames the mount surface. Whatever the active renderer last drew is shown
// here verbatim; the host only adds a border, a scroll offset and a scrollbar.

use super::scrollbar::render_scrollbar;
use crate::tui::app::{App, Focus};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    app.sync_viz_scroll();

    let theme = &app.theme;
    let border = if app.focus == Focus::Viz {
        theme.border_focused
    } else {
        theme.border
    };

    let title = match app.controller.active_name() {
        Some(name) => {
            let ready = if app.last_ready.as_deref() == Some(name) {
                " ✓"
            } else {
                ""
            };
            format!(" {name}{ready} ")
        }
        None => " Visualization ".to_string(),
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(border))
        .title(title);
    if let Some(desc) = app.controller.active_name().and_then(|n| app.controller.describe(n)) {
        if !desc.is_empty() {
            block = block.title_bottom(Line::from(format!(" {desc} ")).right_aligned());
        }
    }

    let lines = if app.controller.surface().is_empty() {
        vec![
            Line::default(),
            Line::from(Span::styled(
                "  Select a result and press Enter to visualize it",
                Style::default().fg(theme.muted),
            )),
        ]
    } else {
        app.controller.surface().lines()
    };

    let total = lines.len();
    let viewport = area.height.saturating_sub(2) as usize;
    let max_scroll = total.saturating_sub(viewport) as u16;
    if app.viz_scroll > max_scroll {
        app.viz_scroll = max_scroll;
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.viz_scroll, 0));
    f.render_widget(paragraph, area);

    render_scrollbar(f, area, total, viewport, app.viz_scroll as usize);
}
