//! TsTable renderer - a selectable list of time series
//!
//! Each row can be drilled into: plotted as a curve, focused on alone, or
//! shown by identifier. Drilling keeps back-navigation intact.

use super::{degrade, heading, muted, selected_style, TsRef};
use crate::viz::{Handled, Renderer, RendererContext, RendererDescriptor, RendererFactory};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::Value;
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

pub const IMPLEMENTATION: &str = "TsTable";

pub fn factory() -> RendererFactory {
    Arc::new(|ctx, payload| Box::new(TsTableRenderer::new(ctx, payload)))
}

pub fn descriptor() -> RendererDescriptor {
    RendererDescriptor::new("TsTable", factory())
        .accepting(["ts_list", "tsuid_list"])
        .described("List of time series with drill-down actions")
        .gesture("Up/Down", "Select a time series")
        .gesture("Enter", "Visualize the selected time series as a curve")
        .gesture("f", "Focus on the selected time series")
        .gesture("t", "Show the TSUID of the selected time series")
}

pub struct TsTableRenderer {
    ctx: RendererContext,
    series: Result<Vec<TsRef>, String>,
    selected: usize,
}

impl TsTableRenderer {
    pub fn new(ctx: RendererContext, payload: Value) -> Self {
        let series = serde_json::from_value(payload).map_err(|e| e.to_string());
        Self {
            ctx,
            series,
            selected: 0,
        }
    }

    fn rows(&self) -> &[TsRef] {
        self.series.as_deref().unwrap_or_default()
    }

    fn draw(&self) {
        let series = match &self.series {
            Ok(series) => series,
            Err(e) => {
                degrade(&self.ctx, "TsTable", format!("expected a list of time series: {e}"));
                return;
            }
        };

        let width = series
            .iter()
            .map(|ts| ts.label().width())
            .max()
            .unwrap_or(0)
            .max("FuncId(s)".len());

        let mut lines = vec![
            heading(format!("Time series ({})", series.len())),
            muted("Enter: curve · f: focus · t: tsuid"),
            Line::default(),
            Line::from(Span::styled(
                format!("  {:<width$}  TSUID", "FuncId(s)"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];

        for (i, ts) in series.iter().enumerate() {
            let pad = width.saturating_sub(ts.label().width());
            let text = format!("  {}{}  {}", ts.label(), " ".repeat(pad), ts.tsuid);
            lines.push(if i == self.selected {
                Line::from(Span::styled(text, selected_style()))
            } else {
                Line::raw(text)
            });
        }

        if series.is_empty() {
            lines.push(muted("  (no time series)"));
        }
        self.ctx.pen.draw(lines);
    }

    fn open(&self, renderer: &str) {
        if let Some(ts) = self.rows().get(self.selected) {
            let payload = serde_json::to_value(vec![ts.clone()]).unwrap_or(Value::Null);
            self.ctx.navigator.add_viz(renderer, payload);
        }
    }
}

impl Renderer for TsTableRenderer {
    fn display(&mut self) {
        self.draw();
    }

    fn wake_up(&mut self) {
        self.draw();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        let len = self.rows().len();
        match key.code {
            KeyCode::Up if self.selected > 0 => self.selected -= 1,
            KeyCode::Down if self.selected + 1 < len => self.selected += 1,
            KeyCode::Up | KeyCode::Down => {}
            KeyCode::Enter => self.open("Curve"),
            KeyCode::Char('f') => self.open("TsTable"),
            KeyCode::Char('t') => self.open("Tsuid"),
            _ => return Handled::No,
        }
        self.draw();
        Handled::Yes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::testing::Bench;
    use crate::viz::HostEvent;
    use serde_json::json;

    fn payload() -> Value {
        json!([
            {"tsuid": "00A1", "funcId": "VIB2"},
            {"tsuid": "00A2", "funcId": "VIB3"},
        ])
    }

    #[test]
    fn lists_every_series() {
        let bench = Bench::new();
        TsTableRenderer::new(bench.ctx.clone(), payload()).display();
        assert!(bench.contains("Time series (2)"));
        assert!(bench.contains("VIB2"));
        assert!(bench.contains("00A2"));
    }

    #[test]
    fn drill_down_requests_nested_renderers() {
        let mut bench = Bench::new();
        let mut table = TsTableRenderer::new(bench.ctx.clone(), payload());
        table.display();

        table.handle_key(KeyEvent::from(KeyCode::Down));
        assert_eq!(table.handle_key(KeyEvent::from(KeyCode::Enter)), Handled::Yes);
        assert_eq!(
            bench.next_event(),
            Some(HostEvent::Open {
                name: "Curve".into(),
                payload: json!([{"tsuid": "00A2", "funcId": "VIB3"}]),
            })
        );

        table.handle_key(KeyEvent::from(KeyCode::Char('f')));
        assert!(matches!(bench.next_event(), Some(HostEvent::Open { name, .. }) if name == "TsTable"));
        table.handle_key(KeyEvent::from(KeyCode::Char('t')));
        assert!(matches!(bench.next_event(), Some(HostEvent::Open { name, .. }) if name == "Tsuid"));
    }

    #[test]
    fn selection_stays_in_bounds() {
        let bench = Bench::new();
        let mut table = TsTableRenderer::new(bench.ctx.clone(), payload());
        for _ in 0..5 {
            table.handle_key(KeyEvent::from(KeyCode::Down));
        }
        assert_eq!(table.selected, 1);
        for _ in 0..5 {
            table.handle_key(KeyEvent::from(KeyCode::Up));
        }
        assert_eq!(table.selected, 0);
    }

    #[test]
    fn unrelated_keys_fall_through() {
        let bench = Bench::new();
        let mut table = TsTableRenderer::new(bench.ctx.clone(), payload());
        assert_eq!(table.handle_key(KeyEvent::from(KeyCode::Char('x'))), Handled::No);
    }
}
