//! Renderer registry - the static catalog of available renderers
//!
//! Built once at startup through [`RegistryBuilder`] (built-in renderers
//! first, then statically discovered contributions) and frozen into an
//! immutable [`Registry`]. The registry is shared by reference; nothing can
//! mutate it after `build()`.
//!
//! Registration order is significant: when no explicit default exists for a
//! result type, the selection policy takes the first matching descriptor.

use super::context::{ContextKind, RendererContext};
use super::contract::{Renderer, RendererFactory};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Static metadata describing one kind of renderer
#[derive(Clone)]
pub struct RendererDescriptor {
    /// Unique key
    pub name: String,
    /// Result types this renderer can show; empty means any type (fallback)
    pub accepted_types: Vec<String>,
    /// Host context the renderer needs beyond its payload
    pub required_context: Vec<ContextKind>,
    /// Hidden unless debug mode is on
    pub debug_only: bool,
    /// Input gesture -> effect description (documentation only)
    pub gesture_map: BTreeMap<String, String>,
    pub description: String,
    factory: RendererFactory,
}

impl RendererDescriptor {
    pub fn new(name: impl Into<String>, factory: RendererFactory) -> Self {
        Self {
            name: name.into(),
            accepted_types: Vec::new(),
            required_context: Vec::new(),
            debug_only: false,
            gesture_map: BTreeMap::new(),
            description: String::new(),
            factory,
        }
    }

    pub fn accepting<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_types.extend(types.into_iter().map(Into::into));
        self
    }

    pub fn requiring(mut self, kind: ContextKind) -> Self {
        if !self.required_context.contains(&kind) {
            self.required_context.push(kind);
        }
        self
    }

    pub fn debug_only(mut self, debug_only: bool) -> Self {
        self.debug_only = debug_only;
        self
    }

    pub fn gesture(mut self, gesture: impl Into<String>, effect: impl Into<String>) -> Self {
        self.gesture_map.insert(gesture.into(), effect.into());
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Accepts any result type
    pub fn is_fallback(&self) -> bool {
        self.accepted_types.is_empty()
    }

    /// Whether this renderer can show `result_type`, by explicit listing or as a fallback
    pub fn accepts(&self, result_type: &str) -> bool {
        self.is_fallback() || self.accepted_types.iter().any(|t| t == result_type)
    }

    /// Whether the descriptor is visible under the given mode
    pub fn visible(&self, debug_mode_enabled: bool) -> bool {
        !self.debug_only || debug_mode_enabled
    }

    /// Construct a renderer instance
    pub fn instantiate(&self, ctx: RendererContext, payload: Value) -> Box<dyn Renderer> {
        (self.factory)(ctx, payload)
    }
}

impl fmt::Debug for RendererDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererDescriptor")
            .field("name", &self.name)
            .field("accepted_types", &self.accepted_types)
            .field("required_context", &self.required_context)
            .field("debug_only", &self.debug_only)
            .field("gesture_map", &self.gesture_map)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Errors raised while assembling the registry
///
/// All of them are configuration errors: the application cannot start with
/// an inconsistent catalog.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("renderer \"{0}\" is registered twice")]
    DuplicateName(String),

    #[error("renderer \"{renderer}\" refers to unknown implementation \"{implementation}\" (known: {known})")]
    UnknownImplementation {
        renderer: String,
        implementation: String,
        known: String,
    },

    #[error("renderer \"{renderer}\" requests unsupported context \"{kind}\" (expected inputs or parameters)")]
    UnknownContext { renderer: String, kind: String },

    #[error("failed to read renderer definitions from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid renderer definition in {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Mutable assembly stage of the registry
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: Vec<RendererDescriptor>,
    names: HashSet<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor, rejecting duplicate names
    pub fn register(&mut self, descriptor: RendererDescriptor) -> Result<&mut Self, RegistryError> {
        if !self.names.insert(descriptor.name.clone()) {
            return Err(RegistryError::DuplicateName(descriptor.name));
        }
        tracing::trace!(renderer = %descriptor.name, "registered renderer");
        self.descriptors.push(descriptor);
        Ok(self)
    }

    /// Append several descriptors in order
    pub fn register_all(
        &mut self,
        descriptors: impl IntoIterator<Item = RendererDescriptor>,
    ) -> Result<&mut Self, RegistryError> {
        for descriptor in descriptors {
            self.register(descriptor)?;
        }
        Ok(self)
    }

    /// Freeze the catalog
    pub fn build(self) -> Registry {
        tracing::debug!(count = self.descriptors.len(), "renderer registry built");
        Registry {
            descriptors: self.descriptors,
        }
    }
}

/// Immutable catalog of renderer descriptors, in registration order
#[derive(Debug, Default)]
pub struct Registry {
    descriptors: Vec<RendererDescriptor>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Freeze into a shareable handle
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<&RendererDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Descriptors able to show `result_type` and visible under the given mode,
    /// in registration order
    pub fn descriptors_accepting(
        &self,
        result_type: &str,
        debug_mode_enabled: bool,
    ) -> Vec<&RendererDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.accepts(result_type) && d.visible(debug_mode_enabled))
            .collect()
    }

    /// Human-readable summary of a renderer
    pub fn describe(&self, name: &str) -> Option<&str> {
        self.lookup_by_name(name).map(|d| d.description.as_str())
    }

    /// Gesture/effect pairs of a renderer, for help screens
    pub fn controls_of(&self, name: &str) -> Option<Vec<(&str, &str)>> {
        self.lookup_by_name(name).map(|d| {
            d.gesture_map
                .iter()
                .map(|(gesture, effect)| (gesture.as_str(), effect.as_str()))
                .collect()
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &RendererDescriptor> {
        self.descriptors.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
