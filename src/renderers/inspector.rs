//! Context inspector - debug view of what a renderer is constructed with
//!
//! Shows the payload shape alongside the operator inputs and parameters
//! captured in the context snapshot. Only offered in debug mode.

use super::{heading, muted};
use crate::viz::{ContextKind, Renderer, RendererContext, RendererDescriptor, RendererFactory};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::Value;
use std::sync::Arc;

pub const IMPLEMENTATION: &str = "ContextInspector";

pub fn factory() -> RendererFactory {
    Arc::new(|ctx, payload| Box::new(InspectorRenderer::new(ctx, payload)))
}

pub fn descriptor() -> RendererDescriptor {
    RendererDescriptor::new("Inspector", factory())
        .requiring(ContextKind::Inputs)
        .requiring(ContextKind::Parameters)
        .debug_only(true)
        .described("Debug view of the payload and the operator context")
}

pub struct InspectorRenderer {
    ctx: RendererContext,
    payload: Value,
}

impl InspectorRenderer {
    pub fn new(ctx: RendererContext, payload: Value) -> Self {
        Self { ctx, payload }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let label = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let field = |name: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {name:<12}"), label),
                Span::raw(value),
            ])
        };

        let captured = if self.ctx.snapshot.is_empty() {
            " · no host context captured"
        } else {
            ""
        };
        let mut lines = vec![
            heading("Context inspector"),
            muted(format!("instance {}{captured}", self.ctx.generation())),
            Line::default(),
            heading("Payload"),
            field("shape", shape(&self.payload)),
            Line::default(),
            heading("Inputs"),
        ];

        match &self.ctx.snapshot.inputs {
            Some(inputs) if !inputs.is_empty() => {
                for (name, value) in inputs {
                    lines.push(field(name, summarize(value)));
                }
            }
            Some(_) => lines.push(muted("  (none)")),
            None => lines.push(muted("  (not captured)")),
        }

        lines.push(Line::default());
        lines.push(heading("Parameters"));
        match &self.ctx.snapshot.parameters {
            Some(params) if !params.is_empty() => {
                for p in params {
                    let kind = p.kind.as_deref().unwrap_or("?");
                    lines.push(field(&p.name, format!("{} ({kind})", summarize(&p.value))));
                }
            }
            Some(_) => lines.push(muted("  (none)")),
            None => lines.push(muted("  (not captured)")),
        }
        lines
    }
}

/// `object{3}`, `array[12]`, `string`, ...
fn shape(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => format!("array[{}]", items.len()),
        Value::Object(map) => format!("object{{{}}}", map.len()),
    }
}

fn summarize(value: &Value) -> String {
    const MAX: usize = 60;
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.chars().count() > MAX {
        format!("{}…", text.chars().take(MAX).collect::<String>())
    } else {
        text
    }
}

impl Renderer for InspectorRenderer {
    fn display(&mut self) {
        self.ctx.pen.draw(self.lines());
    }

    fn wake_up(&mut self) {
        self.display();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DemoDataSource;
    use crate::renderers::testing::Bench;
    use crate::viz::context::ContextSnapshot;
    use crate::viz::OperatorParameter;
    use serde_json::{json, Map};

    #[test]
    fn shows_captured_context() {
        let mut inputs = Map::new();
        inputs.insert("ds".into(), json!("Portfolio"));
        let snapshot = ContextSnapshot {
            inputs: Some(inputs),
            parameters: Some(vec![OperatorParameter {
                name: "nb_clusters".into(),
                kind: Some("number".into()),
                value: json!(3),
            }]),
        };
        let bench = Bench::with(Arc::new(DemoDataSource::default()), snapshot);
        InspectorRenderer::new(bench.ctx.clone(), json!([1, 2, 3])).display();

        assert!(bench.contains("array[3]"));
        assert!(bench.contains("Portfolio"));
        assert!(bench.contains("3 (number)"));
        assert!(bench.contains("instance #1"));
    }

    #[test]
    fn missing_context_is_explicit() {
        let bench = Bench::new();
        InspectorRenderer::new(bench.ctx.clone(), json!({})).display();
        assert!(bench.contains("object{0}"));
        assert!(bench.contains("(not captured)"));
    }

    #[test]
    fn long_values_are_cut() {
        let long = "x".repeat(100);
        let s = summarize(&json!(long));
        assert_eq!(s.chars().count(), 61);
        assert!(s.ends_with('…'));
    }
}
