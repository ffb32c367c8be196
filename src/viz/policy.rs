//! Default-renderer selection
//!
//! Picking a renderer for a result type takes two steps:
//! 1. an explicit override table (type -> renderer name), used only when the
//!    named renderer is actually registered
//! 2. otherwise the first descriptor accepting the type under the current mode
//!
//! The mode flag is shared with the host and can flip at runtime, so every
//! query reads it fresh.

use super::registry::{Registry, RendererDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Built-in type -> renderer defaults
const BUILTIN_OVERRIDES: &[(&str, &str)] = &[
    ("correlation_by_context", "D3CurveNonTemporal"),
    ("correlation_dataset", "Correlation matrix"),
    ("ds_name", "Text"),
    ("kmeans_mds", "Clusters"),
    ("md_list", "MDList"),
    ("pattern", "pattern"),
    ("percentage", "Percentage"),
    ("randproj", "random_projection"),
    ("SAX_result", "SAX"),
    ("table", "Table"),
    ("tdt", "Text"),
    ("text", "Text"),
    ("ts_bucket", "Curve"),
    ("ts_list", "TsTable"),
    ("tsuid_list", "TsTable"),
];

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Production,
    Debug,
}

impl Mode {
    pub fn is_debug(self) -> bool {
        self == Mode::Debug
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Production => "production",
            Mode::Debug => "debug",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shared, runtime-togglable mode flag
#[derive(Debug, Clone, Default)]
pub struct ModeFlag(Arc<AtomicBool>);

impl ModeFlag {
    pub fn new(mode: Mode) -> Self {
        Self(Arc::new(AtomicBool::new(mode.is_debug())))
    }

    pub fn get(&self) -> Mode {
        if self.is_debug() {
            Mode::Debug
        } else {
            Mode::Production
        }
    }

    /// Flip the mode, returning the new one
    pub fn toggle(&self) -> Mode {
        let was_debug = self.0.fetch_xor(true, Ordering::Relaxed);
        if was_debug {
            Mode::Production
        } else {
            Mode::Debug
        }
    }

    pub fn is_debug(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Chooses the default renderer for a result type
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    overrides: HashMap<String, String>,
    mode: ModeFlag,
}

impl SelectionPolicy {
    /// Policy with the built-in override table
    pub fn new(mode: ModeFlag) -> Self {
        let overrides = BUILTIN_OVERRIDES
            .iter()
            .map(|(ty, name)| (ty.to_string(), name.to_string()))
            .collect();
        Self { overrides, mode }
    }

    /// Add or replace override entries
    pub fn with_overrides<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (ty, name) in entries {
            self.overrides.insert(ty.into(), name.into());
        }
        self
    }

    pub fn override_for(&self, result_type: &str) -> Option<&str> {
        self.overrides.get(result_type).map(String::as_str)
    }

    pub fn mode(&self) -> &ModeFlag {
        &self.mode
    }

    /// Renderers offered to the user for `result_type` under the current mode
    pub fn available<'r>(&self, registry: &'r Registry, result_type: &str) -> Vec<&'r RendererDescriptor> {
        registry.descriptors_accepting(result_type, self.mode.is_debug())
    }

    /// The renderer to open when the user does not pick one
    pub fn default_renderer_for<'r>(
        &self,
        registry: &'r Registry,
        result_type: &str,
    ) -> Option<&'r RendererDescriptor> {
        if let Some(name) = self.override_for(result_type) {
            match registry.lookup_by_name(name) {
                Some(descriptor) => return Some(descriptor),
                None => {
                    tracing::trace!(result_type, renderer = name, "override target not registered");
                }
            }
        }

        self.available(registry, result_type).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::registry::tests::{abc_registry, inert_factory};

    fn default_name<'r>(policy: &SelectionPolicy, registry: &'r Registry, ty: &str) -> Option<&'r str> {
        policy
            .default_renderer_for(registry, ty)
            .map(|d| d.name.as_str())
    }

    #[test]
    fn first_match_scenario() {
        let registry = abc_registry();
        let policy = SelectionPolicy::new(ModeFlag::new(Mode::Production));

        let names: Vec<_> = policy.available(&registry, "x").iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(default_name(&policy, &registry, "x"), Some("A"));
        assert_eq!(default_name(&policy, &registry, "y"), Some("B"));

        assert_eq!(policy.mode().toggle(), Mode::Debug);
        let names: Vec<_> = policy.available(&registry, "x").iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        // Registration order still decides: A precedes the debug-only C
        assert_eq!(default_name(&policy, &registry, "x"), Some("A"));
        assert_eq!(default_name(&policy, &registry, "y"), Some("B"));
    }

    #[test]
    fn override_wins_when_registered() {
        let registry = abc_registry();
        let policy = SelectionPolicy::new(ModeFlag::default()).with_overrides([("x", "B")]);
        assert_eq!(default_name(&policy, &registry, "x"), Some("B"));
    }

    #[test]
    fn override_to_missing_renderer_falls_through() {
        let registry = abc_registry();
        let policy = SelectionPolicy::new(ModeFlag::default()).with_overrides([("x", "Ghost")]);
        assert_eq!(policy.override_for("x"), Some("Ghost"));
        assert_eq!(default_name(&policy, &registry, "x"), Some("A"));
    }

    #[test]
    fn builtin_table_is_loaded() {
        let policy = SelectionPolicy::new(ModeFlag::default());
        assert_eq!(policy.override_for("ts_list"), Some("TsTable"));
        assert_eq!(policy.override_for("SAX_result"), Some("SAX"));
        assert_eq!(policy.override_for("unheard_of"), None);
    }

    #[test]
    fn no_candidate_yields_none() {
        let mut builder = Registry::builder();
        builder
            .register(crate::viz::RendererDescriptor::new("OnlyX", inert_factory()).accepting(["x"]))
            .unwrap();
        let registry = builder.build();
        let policy = SelectionPolicy::new(ModeFlag::default());
        assert_eq!(default_name(&policy, &registry, "y"), None);
    }

    #[test]
    fn mode_flag_is_shared_between_clones() {
        let flag = ModeFlag::new(Mode::Production);
        let host_side = flag.clone();
        assert_eq!(host_side.toggle(), Mode::Debug);
        assert!(flag.is_debug());
        assert_eq!(flag.toggle(), Mode::Production);
        assert_eq!(host_side.get(), Mode::Production);
    }
}
