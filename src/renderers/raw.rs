//! Raw renderer - pretty-printed JSON of any payload
//!
//! The generic fallback: accepts every result type.

use super::{heading, muted};
use crate::tui::clipboard;
use crate::viz::{Handled, Renderer, RendererContext, RendererDescriptor, RendererFactory};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::Line;
use serde_json::Value;
use std::sync::Arc;

pub const IMPLEMENTATION: &str = "RawViz";

pub fn factory() -> RendererFactory {
    Arc::new(|ctx, payload| Box::new(RawRenderer::new(ctx, payload)))
}

pub fn descriptor() -> RendererDescriptor {
    RendererDescriptor::new("Raw", factory())
        .described("Raw view of the result, as indented JSON")
        .gesture("y", "Copy the JSON to the clipboard")
}

pub struct RawRenderer {
    ctx: RendererContext,
    text: String,
}

impl RawRenderer {
    pub fn new(ctx: RendererContext, payload: Value) -> Self {
        let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        Self { ctx, text }
    }

    fn draw(&self) {
        let mut lines = vec![heading("Raw data"), muted("y: copy to clipboard"), Line::default()];
        lines.extend(self.text.lines().map(|l| Line::raw(l.to_string())));
        self.ctx.pen.draw(lines);
    }
}

impl Renderer for RawRenderer {
    fn display(&mut self) {
        self.draw();
    }

    fn wake_up(&mut self) {
        self.draw();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        if key.code != KeyCode::Char('y') {
            return Handled::No;
        }
        match clipboard::copy_to_clipboard(&self.text) {
            Ok(lines) => self
                .ctx
                .notifier
                .notify(format!("✓ Copied {lines} lines to clipboard")),
            Err(e) => {
                tracing::debug!(error = %e, "clipboard copy failed");
                self.ctx.notifier.notify("✗ Failed to copy");
            }
        }
        Handled::Yes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::testing::Bench;
    use serde_json::json;

    #[test]
    fn shows_indented_json() {
        let bench = Bench::new();
        let mut raw = RawRenderer::new(bench.ctx.clone(), json!({"a": [1, 2]}));
        raw.display();

        assert!(bench.contains("Raw data"));
        assert!(bench.contains("  \"a\": ["));
        assert!(bench.contains("    1,"));
    }

    #[test]
    fn wake_up_redraws_after_release() {
        let bench = Bench::new();
        let mut raw = RawRenderer::new(bench.ctx.clone(), json!("hello"));
        raw.display();
        bench.surface.clear();
        assert!(bench.surface.is_empty());

        raw.wake_up();
        assert!(bench.contains("\"hello\""));
    }

    #[test]
    fn other_keys_fall_through() {
        let bench = Bench::new();
        let mut raw = RawRenderer::new(bench.ctx.clone(), json!(null));
        let key = KeyEvent::from(KeyCode::Down);
        assert_eq!(raw.handle_key(key), Handled::No);
    }
}
