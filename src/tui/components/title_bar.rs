// Title bar component
//
// Renders the workspace operator and the breadcrumb of the visualization
// stack, with the active entry highlighted.

use crate::tui::app::App;
use crate::viz::Breadcrumb;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Breadcrumb spans: entries joined by `›`, the active one emphasized
pub fn breadcrumb_spans(crumb: &Breadcrumb, active: Style, inactive: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(crumb.entries.len() * 2);
    for (i, name) in crumb.entries.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", inactive));
        }
        let style = if crumb.active == Some(i) { active } else { inactive };
        spans.push(Span::styled(name.clone(), style));
    }
    spans
}

/// Render the title bar at the top of the screen
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let title_style = Style::default()
        .fg(theme.title)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled(" 📊 vizdeck", title_style),
        Span::styled(
            format!(" ── {}", app.workspace.title()),
            Style::default().fg(theme.foreground),
        ),
    ];

    let crumb = app.controller.breadcrumb();
    if !crumb.entries.is_empty() {
        spans.push(Span::styled(" ── ", Style::default().fg(theme.muted)));
        spans.extend(breadcrumb_spans(
            &crumb,
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            Style::default().fg(theme.muted),
        ));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.title))
            .title_top(Line::from(" ? ").right_aligned()),
    );

    f.render_widget(title, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breadcrumb_marks_active_entry() {
        let crumb = Breadcrumb {
            entries: vec!["Table".into(), "TsTable".into(), "Curve".into()],
            active: Some(1),
        };
        let active = Style::default().add_modifier(Modifier::BOLD);
        let spans = breadcrumb_spans(&crumb, active, Style::default());

        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Table › TsTable › Curve");
        assert_eq!(spans[2].style, active);
        assert_eq!(spans[0].style, Style::default());
    }
}
