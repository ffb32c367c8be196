//! Scrollbar rendering helper shared by the viz panel and the logs modal

use ratatui::{
    layout::Rect,
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Render a vertical scrollbar on the right edge of `area`
///
/// Nothing is drawn when `total` lines fit in the `viewport`.
pub fn render_scrollbar(f: &mut Frame, area: Rect, total: usize, viewport: usize, offset: usize) {
    if total <= viewport {
        return;
    }

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"));

    // ScrollbarState wants how far the content can scroll, not its length
    let content_length = total.saturating_sub(viewport);
    let mut state = ScrollbarState::new(content_length).position(offset.min(content_length));

    f.render_stateful_widget(scrollbar, area, &mut state);
}
