//! Percentage renderer - a ratio shown as a value and a progress bar
//!
//! The payload is a fraction: `1.0` is 100%. Values above 1 are drawn in red.

use super::{degrade, heading, muted};
use crate::viz::{Renderer, RendererContext, RendererDescriptor, RendererFactory};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::Value;
use std::sync::Arc;

pub const IMPLEMENTATION: &str = "PercentViz";

const BAR_WIDTH: usize = 50;

pub fn factory() -> RendererFactory {
    Arc::new(|ctx, payload| Box::new(PercentageRenderer::new(ctx, payload)))
}

pub fn descriptor() -> RendererDescriptor {
    RendererDescriptor::new("Percentage", factory())
        .accepting(["percentage"])
        .described("Ratio displayed as a percentage and a progress bar")
}

pub struct PercentageRenderer {
    ctx: RendererContext,
    payload: Value,
}

impl PercentageRenderer {
    pub fn new(ctx: RendererContext, payload: Value) -> Self {
        Self { ctx, payload }
    }
}

/// `(filled cells, overflow)` for a ratio
fn bar_fill(ratio: f64, width: usize) -> (usize, bool) {
    let clamped = ratio.clamp(0.0, 1.0);
    ((clamped * width as f64).round() as usize, ratio > 1.0)
}

impl Renderer for PercentageRenderer {
    fn display(&mut self) {
        let Some(ratio) = self.payload.as_f64() else {
            degrade(&self.ctx, "Percentage", format!("{} is not a number", self.payload));
            return;
        };

        let (filled, overflow) = bar_fill(ratio, BAR_WIDTH);
        let color = if overflow { Color::Red } else { Color::Green };

        self.ctx.pen.draw(vec![
            heading("Percentage"),
            Line::default(),
            Line::from(Span::styled(
                format!("{:.2}%", ratio * 100.0),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(vec![
                Span::raw("["),
                Span::styled("█".repeat(filled), Style::default().fg(color)),
                Span::styled("░".repeat(BAR_WIDTH - filled), Style::default().fg(Color::DarkGray)),
                Span::raw("]"),
            ]),
            if overflow {
                muted("value exceeds 100%")
            } else {
                Line::default()
            },
        ]);
    }

    fn wake_up(&mut self) {
        self.display();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::testing::Bench;
    use crate::viz::HostEvent;
    use serde_json::json;

    #[test]
    fn fill_is_clamped() {
        assert_eq!(bar_fill(0.5, 10), (5, false));
        assert_eq!(bar_fill(1.7, 10), (10, true));
        assert_eq!(bar_fill(-0.2, 10), (0, false));
    }

    #[test]
    fn shows_two_decimals() {
        let bench = Bench::new();
        PercentageRenderer::new(bench.ctx.clone(), json!(0.4567)).display();
        assert!(bench.contains("45.67%"));
        assert!(!bench.contains("exceeds"));
    }

    #[test]
    fn overflow_is_flagged() {
        let bench = Bench::new();
        PercentageRenderer::new(bench.ctx.clone(), json!(1.25)).display();
        assert!(bench.contains("125.00%"));
        assert!(bench.contains("exceeds 100%"));
    }

    #[test]
    fn non_numbers_degrade_and_notify() {
        let mut bench = Bench::new();
        PercentageRenderer::new(bench.ctx.clone(), json!("lots")).display();
        assert!(bench.contains("cannot display"));
        assert!(matches!(
            bench.next_event(),
            Some(HostEvent::Toast(msg)) if msg.contains("is not a number")
        ));
    }
}
