// Modal system for TUI overlays
//
// Self-contained modal dialogs that handle their own input and return actions.
// App just holds Option<Modal>, input routing acts on returned ModalAction.

use crossterm::event::KeyCode;

/// Actions returned by modal input handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    /// Input consumed, no state change needed
    None,
    /// Close the modal
    Close,
    /// Open the named renderer on the given result, in a new session
    OpenRenderer { result: usize, renderer: String },
}

/// Renderers offered for one result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererMenu {
    pub result: usize,
    pub result_type: String,
    /// `(name, description)` in registration order
    pub options: Vec<(String, String)>,
    pub selected: usize,
}

/// Available modal types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Keyboard shortcuts, plus the gestures of the active renderer
    Help,
    /// Pick a renderer other than the default one
    RendererMenu(RendererMenu),
    /// Captured log entries; `scroll` counts lines up from the newest
    Logs { scroll: usize },
}

impl Modal {
    pub fn help() -> Self {
        Modal::Help
    }

    pub fn logs() -> Self {
        Modal::Logs { scroll: 0 }
    }

    pub fn renderer_menu(
        result: usize,
        result_type: impl Into<String>,
        options: Vec<(String, String)>,
    ) -> Self {
        Modal::RendererMenu(RendererMenu {
            result,
            result_type: result_type.into(),
            options,
            selected: 0,
        })
    }

    /// Handle keyboard input, return action for caller to execute
    pub fn handle_input(&mut self, key: KeyCode) -> ModalAction {
        match self {
            Modal::Help => match key {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => ModalAction::Close,
                _ => ModalAction::None,
            },
            Modal::Logs { scroll } => match key {
                KeyCode::Esc | KeyCode::Char('L') | KeyCode::Char('q') => ModalAction::Close,
                KeyCode::Up | KeyCode::Char('k') => {
                    *scroll += 1;
                    ModalAction::None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    *scroll = scroll.saturating_sub(1);
                    ModalAction::None
                }
                KeyCode::PageUp => {
                    *scroll += 10;
                    ModalAction::None
                }
                KeyCode::PageDown => {
                    *scroll = scroll.saturating_sub(10);
                    ModalAction::None
                }
                KeyCode::End => {
                    *scroll = 0;
                    ModalAction::None
                }
                _ => ModalAction::None,
            },
            Modal::RendererMenu(menu) => match key {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('v') => ModalAction::Close,
                KeyCode::Up | KeyCode::Char('k') => {
                    menu.selected = menu.selected.saturating_sub(1);
                    ModalAction::None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if menu.selected + 1 < menu.options.len() {
                        menu.selected += 1;
                    }
                    ModalAction::None
                }
                KeyCode::Enter => match menu.options.get(menu.selected) {
                    Some((name, _)) => ModalAction::OpenRenderer {
                        result: menu.result,
                        renderer: name.clone(),
                    },
                    None => ModalAction::Close,
                },
                _ => ModalAction::None,
            },
        }
    }
}
