//! Text renderer - plain text results (`text`, `ds_name`, `tdt`)

use super::{heading, muted};
use crate::viz::{Renderer, RendererContext, RendererDescriptor, RendererFactory};
use ratatui::text::Line;
use serde_json::Value;
use std::sync::Arc;

pub const IMPLEMENTATION: &str = "TextViz";

pub fn factory() -> RendererFactory {
    Arc::new(|ctx, payload| Box::new(TextRenderer::new(ctx, payload)))
}

pub fn descriptor() -> RendererDescriptor {
    RendererDescriptor::new("Text", factory())
        .accepting(["text", "ds_name", "tdt"])
        .described("Plain text result")
}

pub struct TextRenderer {
    ctx: RendererContext,
    text: String,
}

impl TextRenderer {
    pub fn new(ctx: RendererContext, payload: Value) -> Self {
        let text = match payload {
            Value::String(s) => s,
            Value::Null => String::new(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        };
        Self { ctx, text }
    }

    fn draw(&self) {
        let mut lines = vec![heading("Text"), Line::default()];
        if self.text.is_empty() {
            lines.push(muted("(empty)"));
        } else {
            lines.extend(self.text.lines().map(|l| Line::raw(l.to_string())));
        }
        self.ctx.pen.draw(lines);
    }
}

impl Renderer for TextRenderer {
    fn display(&mut self) {
        self.draw();
    }

    fn wake_up(&mut self) {
        self.draw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::testing::Bench;
    use serde_json::json;

    #[test]
    fn strings_are_shown_unquoted_line_by_line() {
        let bench = Bench::new();
        TextRenderer::new(bench.ctx.clone(), json!("first\nsecond")).display();
        let text = bench.text();
        assert!(text.contains(&"first".to_string()));
        assert!(text.contains(&"second".to_string()));
    }

    #[test]
    fn arrays_become_lines_and_null_is_empty() {
        let bench = Bench::new();
        TextRenderer::new(bench.ctx.clone(), json!(["Portfolio", 3])).display();
        assert!(bench.text().contains(&"3".to_string()));

        TextRenderer::new(bench.ctx.clone(), Value::Null).display();
        assert!(bench.contains("(empty)"));
    }
}
