//! Tsuid renderer - lists the identifiers of a set of time series

use super::{degrade, heading, TsRef};
use crate::viz::{Renderer, RendererContext, RendererDescriptor, RendererFactory};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use serde_json::Value;
use std::sync::Arc;

pub const IMPLEMENTATION: &str = "TsuidViz";

pub fn factory() -> RendererFactory {
    Arc::new(|ctx, payload| Box::new(TsuidRenderer::new(ctx, payload)))
}

pub fn descriptor() -> RendererDescriptor {
    RendererDescriptor::new("Tsuid", factory())
        .accepting(["ts_list", "tsuid_list"])
        .described("Identifiers of the time series")
}

pub struct TsuidRenderer {
    ctx: RendererContext,
    series: Result<Vec<TsRef>, String>,
}

impl TsuidRenderer {
    pub fn new(ctx: RendererContext, payload: Value) -> Self {
        let series = serde_json::from_value(payload).map_err(|e| e.to_string());
        Self { ctx, series }
    }
}

impl Renderer for TsuidRenderer {
    fn display(&mut self) {
        let series = match &self.series {
            Ok(series) => series,
            Err(e) => {
                degrade(&self.ctx, "Tsuid", format!("expected a list of time series: {e}"));
                return;
            }
        };

        let mut lines = vec![heading("TSUIDs"), Line::default()];
        lines.extend(series.iter().map(|ts| {
            Line::from(vec![
                Span::styled("TSUID = ", Style::default().fg(Color::DarkGray)),
                Span::raw(ts.tsuid.clone()),
            ])
        }));
        self.ctx.pen.draw(lines);
    }

    fn wake_up(&mut self) {
        self.display();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::testing::Bench;
    use serde_json::json;

    #[test]
    fn one_line_per_series() {
        let bench = Bench::new();
        TsuidRenderer::new(
            bench.ctx.clone(),
            json!([{"tsuid": "00A1", "funcId": "VIB2"}, {"tsuid": "00A2"}]),
        )
        .display();
        assert!(bench.contains("TSUID = 00A1"));
        assert!(bench.contains("TSUID = 00A2"));
    }

    #[test]
    fn malformed_payload_degrades() {
        let bench = Bench::new();
        TsuidRenderer::new(bench.ctx.clone(), json!({"tsuid": 4})).display();
        assert!(bench.contains("cannot display"));
    }
}
