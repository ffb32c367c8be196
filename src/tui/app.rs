// TUI application state
//
// Holds the loaded workspace, the navigation controller that owns the
// visualization stack, and the chrome state around it (focus, modal, toast,
// theme). Key handling is layered: modal, then the active renderer when the
// visualization pane has focus, then host keys.

use super::components::toast::Toast;
use super::modal::{Modal, ModalAction};
use super::theme::{Theme, ThemeKind};
use crate::logging::LogBuffer;
use crate::viz::{Breadcrumb, HostEvent, Mode, NavigationController};
use crate::workspace::{ResultEntry, Workspace};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Results,
    Viz,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Results => Focus::Viz,
            Focus::Viz => Focus::Results,
        }
    }
}

/// Main application state for the TUI
pub struct App {
    pub workspace: Workspace,
    pub controller: NavigationController,

    /// Selected row of the results panel
    pub selected: usize,
    pub focus: Focus,
    pub modal: Option<Modal>,
    pub toast: Option<Toast>,

    pub theme_kind: ThemeKind,
    pub theme: Theme,

    pub log_buffer: LogBuffer,

    /// Vertical scroll of the visualization pane
    pub viz_scroll: u16,
    /// Surface revision the scroll offset belongs to
    viz_revision: u64,

    /// Name of the renderer whose asynchronous work last completed
    pub last_ready: Option<String>,

    /// Terminal title requested by the refresh hook, applied by the run loop
    pending_title: Arc<Mutex<Option<String>>>,

    pub should_quit: bool,
    pub start_time: Instant,
}

impl App {
    pub fn new(
        workspace: Workspace,
        mut controller: NavigationController,
        theme_kind: ThemeKind,
        log_buffer: LogBuffer,
    ) -> Self {
        controller.set_host_context(workspace.host_context());

        let pending_title = Arc::new(Mutex::new(None));
        let hook_title = Arc::clone(&pending_title);
        let operator = workspace.title().to_string();
        controller.on_refresh(move |crumb: &Breadcrumb| {
            tracing::debug!(trail = %crumb.label(), active = ?crumb.active, "visualization stack changed");
            let title = match crumb.active_name() {
                Some(active) => format!("vizdeck · {operator} · {active}"),
                None => format!("vizdeck · {operator}"),
            };
            if let Ok(mut slot) = hook_title.lock() {
                *slot = Some(title);
            }
        });

        Self {
            workspace,
            controller,
            selected: 0,
            focus: Focus::default(),
            modal: None,
            toast: None,
            theme_kind,
            theme: theme_kind.theme(),
            log_buffer,
            viz_scroll: 0,
            viz_revision: 0,
            last_ready: None,
            pending_title,
            should_quit: false,
            start_time: Instant::now(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host events
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a request posted by a renderer capability
    pub fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Open { name, payload } => {
                if self.controller.add_visualization(&name, payload, false) {
                    self.focus = Focus::Viz;
                }
            }
            HostEvent::Toast(message) => self.show_toast(message),
            HostEvent::Ready {
                generation,
                renderer,
            } => {
                if self.controller.is_active_generation(generation) {
                    tracing::debug!(%renderer, %generation, "renderer ready");
                    self.last_ready = Some(renderer);
                } else {
                    tracing::debug!(%renderer, %generation, "ready signal from an inactive instance ignored");
                }
            }
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        let message = message.into();
        if let Some(toast) = self.toast.as_mut() {
            if toast.absorb(&message) {
                return;
            }
        }
        self.toast = Some(Toast::new(message));
    }

    pub fn clear_expired_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    /// Title set by the last refresh, if not yet applied
    pub fn take_pending_title(&self) -> Option<String> {
        self.pending_title.lock().ok().and_then(|mut t| t.take())
    }

    /// Reset the scroll offset when the surface content changed
    pub fn sync_viz_scroll(&mut self) {
        let revision = self.controller.surface().revision();
        if revision != self.viz_revision {
            self.viz_revision = revision;
            self.viz_scroll = 0;
        }
    }

    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Results
    // ─────────────────────────────────────────────────────────────────────────

    pub fn selected_result(&self) -> Option<&ResultEntry> {
        self.workspace.results.get(self.selected)
    }

    /// Default renderer name for a result, under the current mode
    pub fn default_renderer_name(&self, result: &ResultEntry) -> Option<String> {
        self.controller
            .default_renderer_for(&result.result_type)
            .map(|d| d.name.clone())
    }

    /// Open the default renderer of the selected result in a new session
    pub fn open_selected(&mut self) {
        let Some(result) = self.selected_result().cloned() else {
            return;
        };
        tracing::info!(result = %result.name, result_type = %result.result_type, "opening result");
        if self
            .controller
            .open_default(&result.result_type, result.value, true)
        {
            self.focus = Focus::Viz;
        }
    }

    /// Open `renderer` on result `index` in a new session
    pub fn open_with(&mut self, index: usize, renderer: &str) {
        let Some(result) = self.workspace.results.get(index).cloned() else {
            return;
        };
        if self.controller.add_visualization(renderer, result.value, true) {
            self.selected = index;
            self.focus = Focus::Viz;
        }
    }

    fn open_renderer_menu(&mut self) {
        let Some(result) = self.selected_result() else {
            return;
        };
        let options = self
            .controller
            .available_renderers(&result.result_type)
            .into_iter()
            .map(|d| (d.name.clone(), d.description.clone()))
            .collect();
        self.modal = Some(Modal::renderer_menu(
            self.selected,
            result.result_type.clone(),
            options,
        ));
    }

    fn toggle_mode(&mut self) {
        let mode = self.controller.policy().mode().toggle();
        tracing::info!(%mode, "mode changed");
        self.show_toast(match mode {
            Mode::Debug => "Debug mode: debug-only renderers offered",
            Mode::Production => "Production mode",
        });
    }

    fn cycle_theme(&mut self) {
        self.theme_kind = self.theme_kind.next();
        self.theme = self.theme_kind.theme();
        self.show_toast(format!("Theme: {}", self.theme_kind.name()));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Keys
    // ─────────────────────────────────────────────────────────────────────────

    /// Layered key dispatch: modal → active renderer → host
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if let Some(modal) = self.modal.as_mut() {
            match modal.handle_input(key.code) {
                ModalAction::None => {}
                ModalAction::Close => self.modal = None,
                ModalAction::OpenRenderer { result, renderer } => {
                    self.modal = None;
                    self.open_with(result, &renderer);
                }
            }
            return;
        }

        if self.focus == Focus::Viz && self.controller.dispatch_key(key).was_handled() {
            return;
        }

        if self.handle_global_key(key) {
            return;
        }

        match self.focus {
            Focus::Results => self.handle_results_key(key),
            Focus::Viz => self.handle_viz_key(key),
        }
    }

    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.modal = Some(Modal::help()),
            KeyCode::Char('L') => self.modal = Some(Modal::logs()),
            KeyCode::Char('D') => self.toggle_mode(),
            KeyCode::Char('T') => self.cycle_theme(),
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.toggle(),
            KeyCode::Char('[') => {
                self.controller.back();
            }
            KeyCode::Char(']') => {
                self.controller.forward();
            }
            KeyCode::Backspace => {
                // Close the active visualization, back to the one below it
                if let Some(active) = self.controller.active_index() {
                    self.controller.remove_from_stack(active);
                    if self.controller.is_empty() {
                        self.focus = Focus::Results;
                    }
                }
            }
            KeyCode::Char('X') => {
                self.controller.remove_from_stack(0);
                self.focus = Focus::Results;
            }
            _ => return false,
        }
        true
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        let len = self.workspace.results.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') if self.selected + 1 < len => self.selected += 1,
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = len.saturating_sub(1),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('v') => self.open_renderer_menu(),
            _ => {}
        }
    }

    fn handle_viz_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Results,
            KeyCode::Up | KeyCode::Char('k') => self.viz_scroll = self.viz_scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.viz_scroll = self.viz_scroll.saturating_add(1),
            KeyCode::PageUp => self.viz_scroll = self.viz_scroll.saturating_sub(10),
            KeyCode::PageDown => self.viz_scroll = self.viz_scroll.saturating_add(10),
            KeyCode::Home => self.viz_scroll = 0,
            _ => {}
        }
    }
}
