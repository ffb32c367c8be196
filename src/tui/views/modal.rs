// Modal overlay rendering
//
// - Help: host keys plus the gestures of the active renderer
// - Renderer menu: every renderer that accepts the selected result's type
// - Logs: entries captured by the TUI log layer

use crate::logging::LogLevel;
use crate::tui::app::App;
use crate::tui::components::scrollbar::render_scrollbar;
use crate::tui::modal::{Modal, RendererMenu};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render a modal dialog as a centered overlay
pub fn render(f: &mut Frame, modal: &Modal, app: &App) {
    match modal {
        Modal::Help => render_help(f, app),
        Modal::RendererMenu(menu) => render_renderer_menu(f, app, menu),
        Modal::Logs { scroll } => render_logs(f, app, *scroll),
    }
}

/// Calculate centered rect for modal dialog
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn modal_block<'a>(app: &App, title: &'a str, footer: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight))
        .border_type(app.theme.border_type)
        .title(title)
        .title_bottom(Line::from(footer).centered())
}

fn render_help(f: &mut Frame, app: &App) {
    let key_style = Style::default().fg(app.theme.key);
    let desc_style = Style::default().fg(app.theme.foreground);
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .add_modifier(Modifier::BOLD);

    let kb = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<12}", key), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::styled("  Results", header_style)),
        kb("↑/↓", "Select a result"),
        kb("Enter", "Open with the default renderer"),
        kb("v", "Choose another renderer"),
        Line::raw(""),
        Line::from(Span::styled("  Visualizations", header_style)),
        kb("[ / ]", "Previous / next in history"),
        kb("Backspace", "Close the active visualization"),
        kb("X", "Close every visualization"),
        kb("↑/↓ PgUp/Dn", "Scroll (when unused by the renderer)"),
        kb("Esc", "Back to the results"),
        Line::raw(""),
        Line::from(Span::styled("  General", header_style)),
        kb("Tab", "Switch pane focus"),
        kb("D", "Toggle debug mode"),
        kb("T", "Cycle theme"),
        kb("L", "Show logs"),
        kb("?", "Toggle this help"),
        kb("q", "Quit"),
    ];

    if let Some(name) = app.controller.active_name() {
        if let Some(controls) = app.controller.controls_of(name) {
            if !controls.is_empty() {
                lines.push(Line::raw(""));
                lines.push(Line::from(Span::styled(format!("  {name}"), header_style)));
                for (gesture, effect) in controls {
                    lines.push(kb(gesture, effect));
                }
            }
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("  Theme: ", desc_style),
        Span::styled(app.theme.name, key_style),
        Span::styled("  |  Mode: ", desc_style),
        Span::styled(app.controller.policy().mode().get().label(), key_style),
    ]));

    let height = lines.len() as u16 + 2;
    let area = centered_rect(60, height, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(Text::from(lines))
        .style(Style::default().bg(app.theme.background))
        .block(modal_block(app, " Help ", " Press ? or Esc to close "));
    f.render_widget(paragraph, area);
}

fn render_renderer_menu(f: &mut Frame, app: &App, menu: &RendererMenu) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" Renderers for \"{}\"", menu.result_type),
            Style::default().fg(app.theme.muted),
        )),
        Line::raw(""),
    ];

    if menu.options.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (none available in this mode)",
            Style::default().fg(app.theme.muted),
        )));
    }

    for (i, (name, description)) in menu.options.iter().enumerate() {
        let style = if i == menu.selected {
            Style::default()
                .bg(app.theme.selected_bg)
                .fg(app.theme.selected_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.foreground)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<22}", name), style),
            Span::styled(description.clone(), Style::default().fg(app.theme.muted)),
        ]));
    }

    let height = lines.len() as u16 + 2;
    let area = centered_rect(72, height, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(Text::from(lines))
        .style(Style::default().bg(app.theme.background))
        .block(modal_block(app, " Open with ", " Enter open · Esc cancel "));
    f.render_widget(paragraph, area);
}

fn render_logs(f: &mut Frame, app: &App, scroll: usize) {
    let outer = f.area();
    let area = centered_rect(
        outer.width.saturating_sub(8),
        outer.height.saturating_sub(4),
        outer,
    );
    let viewport = area.height.saturating_sub(2) as usize;

    // `scroll` counts lines up from the newest entry
    let entries = app.log_buffer.recent(usize::MAX);
    let total = entries.len();
    let max_scroll = total.saturating_sub(viewport);
    let scroll = scroll.min(max_scroll);
    let end = total - scroll;
    let start = end.saturating_sub(viewport);

    let lines: Vec<Line> = entries[start..end]
        .iter()
        .map(|entry| {
            let color = match entry.level {
                LogLevel::Error => app.theme.log_error,
                LogLevel::Warn => app.theme.log_warn,
                LogLevel::Info => app.theme.log_info,
                LogLevel::Debug | LogLevel::Trace => app.theme.log_debug,
            };
            Line::from(vec![
                Span::styled(
                    entry.timestamp.format("%H:%M:%S ").to_string(),
                    Style::default().fg(app.theme.muted),
                ),
                Span::styled(format!("{:<5} ", entry.level.as_str()), Style::default().fg(color)),
                Span::styled(format!("{} ", entry.module()), Style::default().fg(app.theme.muted)),
                Span::styled(entry.display_message(), Style::default().fg(app.theme.foreground)),
            ])
        })
        .collect();

    f.render_widget(Clear, area);
    let title = format!(" Logs ({total}) ");
    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(app.theme.background))
        .block(modal_block(app, &title, " ↑/↓ scroll · End newest · Esc close "));
    f.render_widget(paragraph, area);

    render_scrollbar(f, area, total, viewport, max_scroll - scroll);
}
