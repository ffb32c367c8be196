// Status bar component
//
// Renders the mode badge, focused pane, the active renderer's gestures and
// the host key hints at the bottom of the screen.

use crate::tui::app::{App, Focus};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Gestures of the active renderer as `key: effect` pairs
fn gesture_hint(app: &App) -> Option<String> {
    let name = app.controller.active_name()?;
    let controls = app.controller.controls_of(name)?;
    if controls.is_empty() {
        return None;
    }
    Some(
        controls
            .iter()
            .map(|(gesture, _)| *gesture)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mode = app.controller.policy().mode().get();

    let badge_style = if mode.is_debug() {
        Style::default()
            .fg(theme.debug_badge)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.status_bar)
    };

    let focus = match app.focus {
        Focus::Results => "results",
        Focus::Viz => "viz",
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", mode.label().to_uppercase()), badge_style),
        Span::styled(
            format!(
                "│ {} │ {} │ {} open │ {} logs │ ",
                app.uptime(),
                focus,
                app.controller.len(),
                app.log_buffer.len()
            ),
            Style::default().fg(theme.status_bar),
        ),
    ];

    if let Some(hint) = gesture_hint(app) {
        spans.push(Span::styled(hint, Style::default().fg(theme.key)));
        spans.push(Span::styled(" │ ", Style::default().fg(theme.status_bar)));
    }

    let host_keys = match app.focus {
        Focus::Results => "Enter open · v renderers · Tab focus · ? help",
        Focus::Viz => "[ ] history · ⌫ close · Esc results · ? help",
    };
    spans.push(Span::styled(host_keys, Style::default().fg(theme.muted)));

    let status = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::TOP));
    f.render_widget(status, area);
}
