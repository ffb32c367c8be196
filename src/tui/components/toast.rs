//! Toast notifications
//!
//! Renderer notifications and host messages float bottom-right above every
//! other widget. A message repeated while its toast is still up bumps a
//! counter instead of replacing it.

use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    /// Messages starting with `⚠` or `✗`
    Warning,
}

impl Severity {
    fn of(message: &str) -> Self {
        if message.starts_with('⚠') || message.starts_with('✗') {
            Self::Warning
        } else {
            Self::Info
        }
    }

    fn lifetime(self) -> Duration {
        match self {
            Self::Info => Duration::from_secs(2),
            Self::Warning => Duration::from_secs(5),
        }
    }
}

#[derive(Debug)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    repeats: u32,
    shown_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            severity: Severity::of(&message),
            message,
            repeats: 1,
            shown_at: Instant::now(),
        }
    }

    /// Fold `message` into this toast if it is the same text.
    /// Returns false when it is a different message.
    pub fn absorb(&mut self, message: &str) -> bool {
        if self.is_expired() || self.message != message {
            return false;
        }
        self.repeats += 1;
        self.shown_at = Instant::now();
        true
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= self.severity.lifetime()
    }

    fn text(&self) -> String {
        if self.repeats > 1 {
            format!("{} (×{})", self.message, self.repeats)
        } else {
            self.message.clone()
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let text = self.text();
        let width = (text.width() as u16 + 4).min(area.width.saturating_sub(4));
        let height = 3;

        let x = area.right().saturating_sub(width + 2);
        let y = area.bottom().saturating_sub(height + 2);
        let toast_area = Rect::new(x, y, width, height);

        let border = match self.severity {
            Severity::Info => theme.highlight,
            Severity::Warning => theme.log_warn,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme.background));

        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.foreground))
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(paragraph, toast_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_stay_longer() {
        assert_eq!(Toast::new("✓ Copied").severity, Severity::Info);
        assert_eq!(Toast::new("⚠ No renderer named Foo").severity, Severity::Warning);
        assert!(Severity::Warning.lifetime() > Severity::Info.lifetime());
        assert!(!Toast::new("hi").is_expired());
    }

    #[test]
    fn repeats_are_counted() {
        let mut toast = Toast::new("⚠ Curve: failed to load series");
        assert!(toast.absorb("⚠ Curve: failed to load series"));
        assert!(toast.absorb("⚠ Curve: failed to load series"));
        assert!(!toast.absorb("✓ Copied 3 lines to clipboard"));
        assert_eq!(toast.text(), "⚠ Curve: failed to load series (×3)");
    }
}
