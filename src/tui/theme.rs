// Theme system for the TUI
//
// Colors for the host chrome (title, panels, status bar, modals). Renderers
// style their own surface content; themes only frame it.

use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
    Nord,
    Solarized,
}

impl ThemeKind {
    pub fn all() -> &'static [ThemeKind] {
        &[
            ThemeKind::Dark,
            ThemeKind::Light,
            ThemeKind::Nord,
            ThemeKind::Solarized,
        ]
    }

    /// Next theme in the cycle
    pub fn next(self) -> Self {
        let themes = Self::all();
        let current = themes.iter().position(|&t| t == self).unwrap_or(0);
        themes[(current + 1) % themes.len()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
            ThemeKind::Nord => "nord",
            ThemeKind::Solarized => "solarized",
        }
    }

    /// Case-insensitive lookup, unknown names fall back to the default
    pub fn from_name(name: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
            ThemeKind::Nord => Theme::nord(),
            ThemeKind::Solarized => Theme::solarized(),
        }
    }
}

/// Complete theme definition for the chrome
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub border_type: BorderType,
    pub highlight: Color,
    pub title: Color,
    pub status_bar: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub key: Color,
    pub debug_badge: Color,

    // Log levels
    pub log_error: Color,
    pub log_warn: Color,
    pub log_info: Color,
    pub log_debug: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Color::Reset,
            foreground: Color::White,
            muted: Color::DarkGray,
            border: Color::Gray,
            border_focused: Color::Cyan,
            border_type: BorderType::Rounded,
            highlight: Color::Cyan,
            title: Color::Cyan,
            status_bar: Color::Gray,
            selected_bg: Color::DarkGray,
            selected_fg: Color::White,
            key: Color::Yellow,
            debug_badge: Color::Magenta,
            log_error: Color::Red,
            log_warn: Color::Yellow,
            log_info: Color::Green,
            log_debug: Color::Blue,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: Color::Rgb(250, 250, 250),
            foreground: Color::Black,
            muted: Color::Gray,
            border: Color::DarkGray,
            border_focused: Color::Blue,
            border_type: BorderType::Plain,
            highlight: Color::Blue,
            title: Color::Blue,
            status_bar: Color::DarkGray,
            selected_bg: Color::Rgb(210, 220, 240),
            selected_fg: Color::Black,
            key: Color::Rgb(160, 90, 0),
            debug_badge: Color::Magenta,
            log_error: Color::Red,
            log_warn: Color::Rgb(180, 120, 0),
            log_info: Color::Rgb(0, 128, 0),
            log_debug: Color::Blue,
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord",
            background: Color::Rgb(46, 52, 64),
            foreground: Color::Rgb(216, 222, 233),
            muted: Color::Rgb(76, 86, 106),
            border: Color::Rgb(76, 86, 106),
            border_focused: Color::Rgb(136, 192, 208),
            border_type: BorderType::Rounded,
            highlight: Color::Rgb(136, 192, 208),
            title: Color::Rgb(143, 188, 187),
            status_bar: Color::Rgb(129, 161, 193),
            selected_bg: Color::Rgb(67, 76, 94),
            selected_fg: Color::Rgb(236, 239, 244),
            key: Color::Rgb(235, 203, 139),
            debug_badge: Color::Rgb(180, 142, 173),
            log_error: Color::Rgb(191, 97, 106),
            log_warn: Color::Rgb(235, 203, 139),
            log_info: Color::Rgb(163, 190, 140),
            log_debug: Color::Rgb(129, 161, 193),
        }
    }

    pub fn solarized() -> Self {
        Self {
            name: "solarized",
            background: Color::Rgb(0, 43, 54),
            foreground: Color::Rgb(131, 148, 150),
            muted: Color::Rgb(88, 110, 117),
            border: Color::Rgb(88, 110, 117),
            border_focused: Color::Rgb(38, 139, 210),
            border_type: BorderType::Plain,
            highlight: Color::Rgb(38, 139, 210),
            title: Color::Rgb(42, 161, 152),
            status_bar: Color::Rgb(147, 161, 161),
            selected_bg: Color::Rgb(7, 54, 66),
            selected_fg: Color::Rgb(238, 232, 213),
            key: Color::Rgb(181, 137, 0),
            debug_badge: Color::Rgb(211, 54, 130),
            log_error: Color::Rgb(220, 50, 47),
            log_warn: Color::Rgb(181, 137, 0),
            log_info: Color::Rgb(133, 153, 0),
            log_debug: Color::Rgb(38, 139, 210),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_theme() {
        let mut kind = ThemeKind::default();
        let mut seen = vec![kind];
        for _ in 1..ThemeKind::all().len() {
            kind = kind.next();
            seen.push(kind);
        }
        assert_eq!(seen, ThemeKind::all());
        assert_eq!(kind.next(), ThemeKind::Dark);
    }

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(ThemeKind::from_name("Nord"), ThemeKind::Nord);
        assert_eq!(ThemeKind::from_name(" solarized "), ThemeKind::Solarized);
        assert_eq!(ThemeKind::from_name("Spy Dark"), ThemeKind::Dark);
        for kind in ThemeKind::all() {
            assert_eq!(kind.theme().name, kind.name());
        }
    }
}
