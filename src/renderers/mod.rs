//! Built-in renderers
//!
//! Each renderer module exposes:
//! - `IMPLEMENTATION`: the name contributed definitions use in `classRef`
//! - `factory()`: the constructor stored in descriptors
//! - `descriptor()`: the built-in registration (name, accepted types, gestures)
//!
//! Registration order matters for default selection: specific renderers come
//! first, then the generic fallbacks (`Raw` before the debug-only `Inspector`).

pub mod curve;
pub mod inspector;
pub mod percentage;
pub mod raw;
pub mod table;
pub mod text;
pub mod ts_table;
pub mod tsuid;

use crate::viz::{
    ContributedRenderer, ImplementationTable, Registry, RegistryError, RendererContext,
    RendererDescriptor,
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use serde::{Deserialize, Serialize};

/// Reference to one time series, as carried by `ts_list` payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsRef {
    pub tsuid: String,
    #[serde(rename = "funcId", default, skip_serializing_if = "Option::is_none")]
    pub func_id: Option<String>,
}

impl TsRef {
    /// Functional id when known, tsuid otherwise
    pub fn label(&self) -> &str {
        self.func_id.as_deref().unwrap_or(&self.tsuid)
    }
}

/// Built-in descriptors, in registration order
pub fn builtin_descriptors() -> Vec<RendererDescriptor> {
    vec![
        table::descriptor(),
        ts_table::descriptor(),
        curve::descriptor(),
        percentage::descriptor(),
        text::descriptor(),
        tsuid::descriptor(),
        raw::descriptor(),
        inspector::descriptor(),
    ]
}

/// Implementations contributed definitions may refer to
pub fn implementations() -> ImplementationTable {
    let mut table = ImplementationTable::new();
    table.insert(table::IMPLEMENTATION, table::factory());
    table.insert(ts_table::IMPLEMENTATION, ts_table::factory());
    table.insert(curve::IMPLEMENTATION, curve::factory());
    table.insert(percentage::IMPLEMENTATION, percentage::factory());
    table.insert(text::IMPLEMENTATION, text::factory());
    table.insert(tsuid::IMPLEMENTATION, tsuid::factory());
    table.insert(raw::IMPLEMENTATION, raw::factory());
    table.insert(inspector::IMPLEMENTATION, inspector::factory());
    table
}

/// Built-ins followed by contributed renderers, frozen
pub fn builtin_registry(contributions: Vec<ContributedRenderer>) -> Result<Registry, RegistryError> {
    let mut builder = Registry::builder();
    builder.register_all(builtin_descriptors())?;
    builder.merge_contributions(contributions, &implementations())?;
    Ok(builder.build())
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared drawing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

pub(crate) fn muted(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::DarkGray)))
}

pub(crate) fn selected_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::REVERSED)
}

/// Report a renderer-internal failure and leave a readable view behind
pub(crate) fn degrade(ctx: &RendererContext, renderer: &str, message: impl Into<String>) {
    let message = message.into();
    tracing::warn!(renderer, %message, "renderer degraded");
    ctx.notifier.notify(format!("{renderer}: {message}"));
    ctx.pen.draw(vec![
        Line::from(Span::styled(
            format!("⚠ {renderer} cannot display this result"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        muted(message),
    ]);
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::data::{DataSource, DemoDataSource};
    use crate::viz::context::{ContextSnapshot, Navigator, Notifier, ReadySignal};
    use crate::viz::surface::Generation;
    use crate::viz::{HostEvent, MountSurface, RendererContext};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    /// A surface owned by a single renderer context, plus the host event stream
    pub(crate) struct Bench {
        pub surface: MountSurface,
        pub events: mpsc::UnboundedReceiver<HostEvent>,
        pub ctx: RendererContext,
    }

    impl Bench {
        pub(crate) fn new() -> Self {
            Self::with(Arc::new(DemoDataSource::default()), ContextSnapshot::default())
        }

        pub(crate) fn with(data: Arc<dyn DataSource>, snapshot: ContextSnapshot) -> Self {
            let (tx, events) = mpsc::unbounded_channel();
            let surface = MountSurface::new();
            let generation = Generation::new(1);
            surface.claim(generation);
            let ctx = RendererContext {
                snapshot,
                navigator: Navigator::new(tx.clone()),
                notifier: Notifier::new(tx.clone()),
                ready: ReadySignal::new(tx, generation, "bench"),
                pen: surface.pen(generation),
                data,
            };
            Self {
                surface,
                events,
                ctx,
            }
        }

        /// Surface content as plain strings
        pub(crate) fn text(&self) -> Vec<String> {
            self.surface.lines().iter().map(|l| l.to_string()).collect()
        }

        pub(crate) fn contains(&self, needle: &str) -> bool {
            self.text().iter().any(|l| l.contains(needle))
        }

        pub(crate) fn next_event(&mut self) -> Option<HostEvent> {
            self.events.try_recv().ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::{Mode, ModeFlag, SelectionPolicy};

    #[test]
    fn builtin_registry_has_no_clashes() {
        let registry = builtin_registry(Vec::new()).unwrap();
        assert_eq!(registry.len(), builtin_descriptors().len());
        assert!(registry.lookup_by_name("Raw").is_some());
    }

    #[test]
    fn default_selection_over_builtins() {
        let registry = builtin_registry(Vec::new()).unwrap();
        let policy = SelectionPolicy::new(ModeFlag::new(Mode::Production));
        let pick = |ty| policy.default_renderer_for(&registry, ty).map(|d| d.name.clone());

        assert_eq!(pick("table").as_deref(), Some("Table"));
        assert_eq!(pick("ts_list").as_deref(), Some("TsTable"));
        assert_eq!(pick("percentage").as_deref(), Some("Percentage"));
        assert_eq!(pick("ds_name").as_deref(), Some("Text"));
        // override points at a renderer that is not built in
        assert_eq!(pick("kmeans_mds").as_deref(), Some("Raw"));
        assert_eq!(pick("whatever").as_deref(), Some("Raw"));
    }

    #[test]
    fn inspector_only_offered_in_debug() {
        let registry = builtin_registry(Vec::new()).unwrap();
        let offered = |debug| {
            registry
                .descriptors_accepting("whatever", debug)
                .iter()
                .map(|d| d.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(offered(false), ["Raw"]);
        assert_eq!(offered(true), ["Raw", "Inspector"]);
    }

    #[test]
    fn contributions_reuse_builtin_implementations() {
        let matrix: ContributedRenderer = serde_json::from_str(
            r#"{"name": "Correlation matrix", "types": ["correlation_dataset"], "classRef": "Table"}"#,
        )
        .unwrap();
        let registry = builtin_registry(vec![matrix]).unwrap();

        let policy = SelectionPolicy::new(ModeFlag::default());
        let picked = policy.default_renderer_for(&registry, "correlation_dataset").unwrap();
        assert_eq!(picked.name, "Correlation matrix");
    }

    #[test]
    fn ts_ref_label_prefers_func_id() {
        let with: TsRef = serde_json::from_str(r#"{"tsuid": "00A1", "funcId": "VIB2"}"#).unwrap();
        let without: TsRef = serde_json::from_str(r#"{"tsuid": "00A1"}"#).unwrap();
        assert_eq!(with.label(), "VIB2");
        assert_eq!(without.label(), "00A1");
    }
}
