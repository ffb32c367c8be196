//! Renderer context - what a renderer receives besides its payload
//!
//! Two kinds of things live here:
//! - a [`ContextSnapshot`] of the host's operator `inputs`/`parameters`,
//!   deep-copied at creation time so later host edits never leak in
//! - narrow host capabilities: a [`Navigator`] to open another renderer on top
//!   of the stack, a [`Notifier`] for user-facing messages, a [`ReadySignal`]
//!   fired when asynchronous work completes, a [`SurfacePen`], and the data source
//!
//! Capabilities talk to the host through a [`HostEvent`] channel, so a
//! renderer never holds a reference to the controller.

use super::surface::{Generation, SurfacePen};
use crate::data::DataSource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Contextual data a renderer may ask for beyond its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Inputs,
    Parameters,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Inputs => "inputs",
            ContextKind::Parameters => "parameters",
        }
    }
}

impl FromStr for ContextKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inputs" => Ok(ContextKind::Inputs),
            "parameters" => Ok(ContextKind::Parameters),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parameter of the operator whose output is being visualized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorParameter {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Value,
}

/// Live contextual data owned by the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostContext {
    /// Data feeding each input connector of the focused operator, by connector name
    pub inputs: Map<String, Value>,
    pub parameters: Vec<OperatorParameter>,
}

/// Deep copy of the host context parts a renderer declared it needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextSnapshot {
    pub inputs: Option<Map<String, Value>>,
    pub parameters: Option<Vec<OperatorParameter>>,
}

impl ContextSnapshot {
    /// Copy the requested parts of `host`
    pub fn capture(host: &HostContext, required: &[ContextKind]) -> Self {
        let mut snapshot = Self::default();
        for kind in required {
            match kind {
                ContextKind::Inputs => snapshot.inputs = Some(host.inputs.clone()),
                ContextKind::Parameters => snapshot.parameters = Some(host.parameters.clone()),
            }
        }
        snapshot
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_none() && self.parameters.is_none()
    }
}

/// Requests flowing from renderers to the host loop
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Open a renderer by name on top of the current stack position
    Open { name: String, payload: Value },
    /// Show a message to the user
    Toast(String),
    /// Asynchronous work started by `display`/`wake_up` has completed
    Ready {
        generation: Generation,
        renderer: String,
    },
}

pub type HostEventSender = mpsc::UnboundedSender<HostEvent>;

/// Lets a renderer drill into related data, keeping back-navigation intact
///
/// Requests never start a new session.
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: HostEventSender,
}

impl Navigator {
    pub fn new(tx: HostEventSender) -> Self {
        Self { tx }
    }

    /// Open `name` with `payload` on top of the active renderer
    pub fn add_viz(&self, name: impl Into<String>, payload: Value) {
        let name = name.into();
        tracing::debug!(renderer = %name, "renderer requested a nested visualization");
        let _ = self.tx.send(HostEvent::Open { name, payload });
    }
}

/// User-facing message channel (rendered as a toast by the host)
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: HostEventSender,
}

impl Notifier {
    pub fn new(tx: HostEventSender) -> Self {
        Self { tx }
    }

    pub fn notify(&self, message: impl Into<String>) {
        let _ = self.tx.send(HostEvent::Toast(message.into()));
    }
}

/// Fired by a renderer once its asynchronous display work is complete
#[derive(Debug, Clone)]
pub struct ReadySignal {
    tx: HostEventSender,
    generation: Generation,
    renderer: String,
}

impl ReadySignal {
    pub fn new(tx: HostEventSender, generation: Generation, renderer: impl Into<String>) -> Self {
        Self {
            tx,
            generation,
            renderer: renderer.into(),
        }
    }

    pub fn fire(&self) {
        let _ = self.tx.send(HostEvent::Ready {
            generation: self.generation,
            renderer: self.renderer.clone(),
        });
    }
}

/// Everything a renderer instance is constructed with, besides its payload
#[derive(Clone)]
pub struct RendererContext {
    pub snapshot: ContextSnapshot,
    pub navigator: Navigator,
    pub notifier: Notifier,
    pub ready: ReadySignal,
    pub pen: SurfacePen,
    pub data: Arc<dyn DataSource>,
}

impl RendererContext {
    pub fn generation(&self) -> Generation {
        self.pen.generation()
    }
}

impl fmt::Debug for RendererContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererContext")
            .field("snapshot", &self.snapshot)
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn host() -> HostContext {
        let mut inputs = Map::new();
        inputs.insert("ds".to_string(), json!({"name": "Portfolio", "size": 12}));
        HostContext {
            inputs,
            parameters: vec![OperatorParameter {
                name: "nb_clusters".to_string(),
                kind: Some("number".to_string()),
                value: json!(3),
            }],
        }
    }

    #[test]
    fn capture_takes_only_requested_parts() {
        let host = host();
        let none = ContextSnapshot::capture(&host, &[]);
        assert!(none.is_empty());

        let inputs = ContextSnapshot::capture(&host, &[ContextKind::Inputs]);
        assert!(inputs.inputs.is_some());
        assert!(inputs.parameters.is_none());

        let both = ContextSnapshot::capture(&host, &[ContextKind::Inputs, ContextKind::Parameters]);
        assert_eq!(both.parameters.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn snapshot_is_isolated_from_later_host_edits() {
        let mut host = host();
        let snapshot = ContextSnapshot::capture(&host, &[ContextKind::Inputs, ContextKind::Parameters]);

        host.inputs.insert("ds".to_string(), json!("replaced"));
        host.parameters[0].value = json!(99);

        let inputs = snapshot.inputs.expect("inputs captured");
        assert_eq!(inputs["ds"]["name"], json!("Portfolio"));
        assert_eq!(snapshot.parameters.expect("parameters captured")[0].value, json!(3));
    }

    #[test]
    fn context_kind_parsing() {
        assert_eq!("inputs".parse::<ContextKind>(), Ok(ContextKind::Inputs));
        assert_eq!("parameters".parse::<ContextKind>(), Ok(ContextKind::Parameters));
        assert_eq!("outputs".parse::<ContextKind>(), Err("outputs".to_string()));
    }

    #[test]
    fn capabilities_post_host_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        Navigator::new(tx.clone()).add_viz("Curve", json!([{"tsuid": "T1"}]));
        Notifier::new(tx.clone()).notify("boom");
        ReadySignal::new(tx, Generation::new(4), "Curve").fire();

        assert_eq!(
            rx.try_recv().ok(),
            Some(HostEvent::Open {
                name: "Curve".to_string(),
                payload: json!([{"tsuid": "T1"}]),
            })
        );
        assert_eq!(rx.try_recv().ok(), Some(HostEvent::Toast("boom".to_string())));
        assert_eq!(
            rx.try_recv().ok(),
            Some(HostEvent::Ready {
                generation: Generation::new(4),
                renderer: "Curve".to_string(),
            })
        );
    }
}
