//! Curve renderer - block-character plots of time series
//!
//! Series and their metadata are fetched asynchronously from the data
//! source. Point counts and date bounds come from the metadata when it
//! carries them, since a backend may serve fewer points than it stores.
//! `display` draws
//! a loading view and returns at once; the spawned task draws the plots
//! through the pen and fires the ready signal. `sleep` aborts an unfinished
//! fetch, and `wake_up` redraws from the cached series (or fetches again if
//! the previous fetch never completed).

use super::{degrade, heading, muted, TsRef};
use crate::data::{Metadata, Series};
use crate::viz::{Handled, Renderer, RendererContext, RendererDescriptor, RendererFactory};
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use futures::future::{try_join, try_join_all};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;

pub const IMPLEMENTATION: &str = "D3Curve";

const DEFAULT_WIDTH: usize = 80;
const MIN_WIDTH: usize = 20;
const MAX_WIDTH: usize = 200;
const WIDTH_STEP: usize = 10;
/// Rows per plot
const PLOT_HEIGHT: usize = 6;

const BLOCKS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const PALETTE: [Color; 5] = [
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Yellow,
    Color::LightBlue,
];

pub fn factory() -> RendererFactory {
    Arc::new(|ctx, payload| Box::new(CurveRenderer::new(ctx, payload)))
}

pub fn descriptor() -> RendererDescriptor {
    RendererDescriptor::new("Curve", factory())
        .accepting(["ts_list", "ts_bucket"])
        .described("Time series curves with min/max/mean statistics")
        .gesture("+", "Widen the curves")
        .gesture("-", "Narrow the curves")
        .gesture("r", "Reload the series")
}

/// A fetched series with its metadata
type Loaded = (Series, Metadata);
type Cache = Arc<Mutex<Option<Vec<Loaded>>>>;

pub struct CurveRenderer {
    ctx: RendererContext,
    refs: Result<Vec<TsRef>, String>,
    cache: Cache,
    task: Option<JoinHandle<()>>,
    width: usize,
}

impl CurveRenderer {
    pub fn new(ctx: RendererContext, payload: Value) -> Self {
        let refs = serde_json::from_value(payload).map_err(|e| e.to_string());
        Self {
            ctx,
            refs,
            cache: Cache::default(),
            task: None,
            width: DEFAULT_WIDTH,
        }
    }

    fn cached(&self) -> Option<Vec<Loaded>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn load(&mut self) {
        let refs = match &self.refs {
            Ok(refs) => refs.clone(),
            Err(e) => {
                degrade(&self.ctx, "Curve", format!("expected a list of time series: {e}"));
                return;
            }
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            degrade(&self.ctx, "Curve", "no async runtime available to fetch series");
            return;
        };

        self.ctx.pen.draw(vec![
            heading("Curve"),
            Line::default(),
            muted(format!("Loading {} series…", refs.len())),
        ]);

        let data = Arc::clone(&self.ctx.data);
        let pen = self.ctx.pen.clone();
        let notifier = self.ctx.notifier.clone();
        let ready = self.ctx.ready.clone();
        let cache = Arc::clone(&self.cache);
        let width = self.width;

        self.abort();
        self.task = Some(runtime.spawn(async move {
            let fetches = refs
                .iter()
                .map(|ts| try_join(data.series(&ts.tsuid), data.metadata(&ts.tsuid)));
            let fetched = try_join_all(fetches).await;
            if let Ok(loaded) = &fetched {
                *cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());
            }
            if !pen.is_current() {
                tracing::debug!(generation = %pen.generation(), "curve fetch finished after losing the surface");
                return;
            }
            match fetched {
                Ok(loaded) => {
                    pen.draw(plot(&refs, &loaded, width));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "curve fetch failed");
                    notifier.notify(format!("Curve: failed to load series: {e:#}"));
                    pen.draw(vec![
                        heading("Curve"),
                        Line::default(),
                        Line::from(Span::styled(
                            format!("⚠ {e:#}"),
                            Style::default().fg(Color::Red),
                        )),
                    ]);
                }
            }
            ready.fire();
        }));
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                tracing::debug!(generation = %self.ctx.generation(), "aborting curve fetch");
                task.abort();
            }
        }
    }

    fn redraw(&mut self) {
        match (self.cached(), &self.refs) {
            (Some(loaded), Ok(refs)) => {
                self.ctx.pen.draw(plot(refs, &loaded, self.width));
            }
            _ => self.load(),
        }
    }
}

impl Renderer for CurveRenderer {
    fn display(&mut self) {
        self.load();
    }

    fn wake_up(&mut self) {
        self.redraw();
    }

    fn sleep(&mut self) {
        self.abort();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Char('+') => self.width = (self.width + WIDTH_STEP).min(MAX_WIDTH),
            KeyCode::Char('-') => self.width = self.width.saturating_sub(WIDTH_STEP).max(MIN_WIDTH),
            KeyCode::Char('r') => {
                *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
            }
            _ => return Handled::No,
        }
        self.redraw();
        Handled::Yes
    }
}

impl Drop for CurveRenderer {
    fn drop(&mut self) {
        self.abort();
    }
}

fn format_ts(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Rows of block characters, top row first
fn sparkline_rows(values: &[f64], height: usize) -> Vec<String> {
    if values.is_empty() || height == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let levels = height * 8;

    let filled: Vec<usize> = values
        .iter()
        .map(|v| {
            if range <= f64::EPSILON {
                levels / 2
            } else {
                (((v - min) / range) * (levels - 1) as f64).round() as usize + 1
            }
        })
        .collect();

    (0..height)
        .rev()
        .map(|row| {
            let base = row * 8;
            filled
                .iter()
                .map(|f| BLOCKS[f.saturating_sub(base).min(8)])
                .collect()
        })
        .collect()
}

/// Millisecond timestamp stored under `key`
fn meta_timestamp(meta: &Metadata, key: &str) -> Option<i64> {
    meta.get(key)?.trim().parse().ok()
}

/// "N points", noting when fewer were fetched than the metadata counts
fn point_count(s: &Series, meta: &Metadata) -> String {
    match meta.get("qual_nb_points").and_then(|n| n.trim().parse::<usize>().ok()) {
        Some(stored) if stored != s.len() => format!("{stored} points ({} shown)", s.len()),
        _ => format!("{} points", s.len()),
    }
}

fn plot(refs: &[TsRef], loaded: &[Loaded], width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading(format!("Curve ({} series)", loaded.len())),
        muted(format!("width {width} · +/-: resize · r: reload")),
    ];

    for (i, (ts, (s, meta))) in refs.iter().zip(loaded).enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled(
                ts.label().to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", ts.tsuid), Style::default().fg(Color::DarkGray)),
        ]));

        if s.is_empty() {
            lines.push(muted("(no points)"));
            continue;
        }

        for row in sparkline_rows(&s.downsample(width), PLOT_HEIGHT) {
            lines.push(Line::from(Span::styled(row, Style::default().fg(color))));
        }

        let (first, last) = s.span().unwrap_or_default();
        let start = meta_timestamp(meta, "ikats_start_date").unwrap_or(first);
        let end = meta_timestamp(meta, "ikats_end_date").unwrap_or(last);
        lines.push(muted(format!(
            "{} → {}  ·  {}  ·  min {:.3}  max {:.3}  mean {:.3}",
            format_ts(start),
            format_ts(end),
            point_count(s, meta),
            s.min().unwrap_or_default(),
            s.max().unwrap_or_default(),
            s.mean().unwrap_or_default(),
        )));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataSource, DemoDataSource};
    use crate::renderers::testing::Bench;
    use crate::viz::context::ContextSnapshot;
    use crate::viz::HostEvent;
    use serde_json::json;
    use std::time::Duration;

    async fn next_ready(bench: &mut Bench) -> HostEvent {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(2), bench.events.recv())
                .await
                .expect("renderer finished in time")
                .expect("channel open");
            if matches!(event, HostEvent::Ready { .. }) {
                return event;
            }
        }
    }

    #[test]
    fn sparkline_spans_full_height() {
        let rows = sparkline_rows(&[0.0, 1.0], 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], " █");
        assert_eq!(rows[1], "▁█");
    }

    #[test]
    fn flat_series_sit_mid_height() {
        let rows = sparkline_rows(&[3.0, 3.0, 3.0], 2);
        assert_eq!(rows[0], "   ");
        assert_eq!(rows[1], "███");
    }

    #[test]
    fn timestamps_are_readable() {
        assert_eq!(format_ts(0), "1970-01-01 00:00");
    }

    #[test]
    fn metadata_supplies_stored_count_and_bounds() {
        let refs: Vec<TsRef> = serde_json::from_value(json!([{"tsuid": "00A1"}])).unwrap();
        let series = Series::new("00A1", vec![(60_000, 1.0), (120_000, 2.0)]);
        let meta = Metadata::from([
            ("qual_nb_points".to_string(), "1440".to_string()),
            ("ikats_start_date".to_string(), "0".to_string()),
            ("ikats_end_date".to_string(), "86340000".to_string()),
        ]);

        let text: Vec<String> = plot(&refs, &[(series.clone(), meta)], 40)
            .iter()
            .map(|l| l.to_string())
            .collect();
        let footer = text.last().unwrap();
        assert!(footer.starts_with("1970-01-01 00:00 → 1970-01-01 23:59"), "{footer}");
        assert!(footer.contains("1440 points (2 shown)"));

        let bare = plot(&refs, &[(series, Metadata::new())], 40);
        let footer = bare.last().unwrap().to_string();
        assert!(footer.starts_with("1970-01-01 00:01 → 1970-01-01 00:02"), "{footer}");
        assert!(footer.contains("  2 points"));
    }

    #[tokio::test]
    async fn display_fetches_then_plots_and_signals_ready() {
        let data = DemoDataSource::default()
            .with_inline([Series::new("00A1", vec![(0, 1.0), (60_000, 3.0)])]);
        let mut bench = Bench::with(Arc::new(data), ContextSnapshot::default());
        let mut curve = CurveRenderer::new(bench.ctx.clone(), json!([{"tsuid": "00A1", "funcId": "VIB2"}]));

        curve.display();
        assert!(bench.contains("Loading 1 series"));

        assert!(matches!(next_ready(&mut bench).await, HostEvent::Ready { .. }));
        assert!(bench.contains("VIB2"));
        assert!(bench.contains("2 points"));
        assert!(bench.contains("mean 2.000"));
        assert!(curve.cached().is_some());
    }

    #[tokio::test]
    async fn sleep_aborts_and_wake_up_refetches() {
        let data: Arc<dyn DataSource> = Arc::new(DemoDataSource::new(Duration::from_millis(200)));
        let mut bench = Bench::with(data, ContextSnapshot::default());
        let mut curve = CurveRenderer::new(bench.ctx.clone(), json!([{"tsuid": "00A1"}]));

        curve.display();
        curve.sleep();
        assert!(curve.task.is_none());
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(curve.cached().is_none(), "aborted fetch must not populate the model");

        curve.wake_up();
        next_ready(&mut bench).await;
        assert!(curve.cached().is_some());
        assert!(bench.contains("240 points"));
    }

    #[tokio::test]
    async fn wake_up_reuses_the_model() {
        let mut bench = Bench::new();
        let mut curve = CurveRenderer::new(bench.ctx.clone(), json!([{"tsuid": "00A1"}]));
        curve.display();
        next_ready(&mut bench).await;

        bench.surface.clear();
        curve.wake_up();
        assert!(bench.contains("Curve (1 series)"), "redrawn synchronously from cache");
        assert!(bench.events.try_recv().is_err(), "no new fetch");
    }

    #[tokio::test]
    async fn fetch_errors_are_notified() {
        let mut bench = Bench::new();
        let mut curve = CurveRenderer::new(bench.ctx.clone(), json!([{"tsuid": ""}]));
        curve.display();

        let toast = tokio::time::timeout(Duration::from_secs(2), bench.events.recv())
            .await
            .unwrap();
        assert!(matches!(toast, Some(HostEvent::Toast(msg)) if msg.contains("failed to load")));
    }

    #[tokio::test]
    async fn resize_keys_redraw_from_cache() {
        let mut bench = Bench::new();
        let mut curve = CurveRenderer::new(bench.ctx.clone(), json!([{"tsuid": "00A1"}]));
        curve.display();
        next_ready(&mut bench).await;

        assert_eq!(curve.handle_key(KeyEvent::from(KeyCode::Char('+'))), Handled::Yes);
        assert!(bench.contains("width 90"));
        for _ in 0..20 {
            curve.handle_key(KeyEvent::from(KeyCode::Char('-')));
        }
        assert!(bench.contains(&format!("width {MIN_WIDTH}")));
    }

    #[test]
    fn without_runtime_the_view_degrades() {
        let bench = Bench::new();
        let mut curve = CurveRenderer::new(bench.ctx.clone(), json!([{"tsuid": "00A1"}]));
        curve.display();
        assert!(bench.contains("cannot display"));
    }
}
