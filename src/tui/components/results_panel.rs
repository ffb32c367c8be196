// Results panel component
//
// Lists the operator results of the workspace. Each row shows the result
// name, its type, and the renderer Enter would open it with under the
// current mode.

use crate::tui::app::{App, Focus};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let focused = app.focus == Focus::Results;

    let items: Vec<ListItem> = app
        .workspace
        .results
        .iter()
        .map(|result| {
            let renderer = app
                .default_renderer_name(result)
                .unwrap_or_else(|| "—".to_string());
            ListItem::new(vec![
                Line::from(Span::styled(
                    result.name.clone(),
                    Style::default()
                        .fg(theme.foreground)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![
                    Span::styled(format!("  {}", result.result_type), Style::default().fg(theme.muted)),
                    Span::styled(" → ", Style::default().fg(theme.muted)),
                    Span::styled(renderer, Style::default().fg(theme.key)),
                ]),
            ])
        })
        .collect();

    let border = if focused {
        theme.border_focused
    } else {
        theme.border
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(border))
        .title(format!(" Results ({}) ", app.workspace.results.len()));

    if items.is_empty() {
        let empty = List::new(vec![ListItem::new(Span::styled(
            " (no results in this workspace)",
            Style::default().fg(theme.muted),
        ))])
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(theme.selected_bg)
            .fg(theme.selected_fg),
    );

    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}
