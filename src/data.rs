//! Data-access layer used by renderers that fetch auxiliary data
//!
//! Renderers never talk to a backend directly. They receive an
//! `Arc<dyn DataSource>` through their context and await its futures from
//! inside spawned tasks.

use anyhow::{anyhow, bail, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

/// First timestamp of synthesized series (ms since epoch)
const SYNTH_START_MS: i64 = 1_500_000_000_000;
/// Spacing of synthesized points
const SYNTH_STEP_MS: i64 = 60_000;
const SYNTH_POINTS: usize = 240;

/// A time series: `(timestamp_ms, value)` pairs in time order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub tsuid: String,
    pub points: Vec<(i64, f64)>,
}

impl Series {
    pub fn new(tsuid: impl Into<String>, points: Vec<(i64, f64)>) -> Self {
        Self {
            tsuid: tsuid.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }

    pub fn min(&self) -> Option<f64> {
        self.values().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.values().reduce(f64::max)
    }

    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.values().sum::<f64>() / self.len() as f64)
    }

    /// First and last timestamps
    pub fn span(&self) -> Option<(i64, i64)> {
        Some((self.points.first()?.0, self.points.last()?.0))
    }

    /// Average consecutive values into at most `width` buckets
    pub fn downsample(&self, width: usize) -> Vec<f64> {
        if width == 0 || self.is_empty() {
            return Vec::new();
        }
        if self.len() <= width {
            return self.values().collect();
        }

        let chunk = self.len().div_ceil(width);
        self.points
            .chunks(chunk)
            .map(|c| c.iter().map(|(_, v)| v).sum::<f64>() / c.len() as f64)
            .collect()
    }
}

/// Metadata attached to a series (`qual_nb_points`, `funcId`, ...)
pub type Metadata = BTreeMap<String, String>;

/// Asynchronous, read-only access to series data keyed by opaque identifiers
pub trait DataSource: Send + Sync {
    fn series(&self, tsuid: &str) -> BoxFuture<'static, Result<Series>>;

    fn metadata(&self, tsuid: &str) -> BoxFuture<'static, Result<Metadata>>;

    /// Content of a stored operator result, looked up by result id
    fn result(&self, rid: &str) -> BoxFuture<'static, Result<Value>>;
}

/// Offline data source
///
/// Serves series embedded in the workspace first and synthesizes a
/// deterministic series for any other identifier. Stored operator results
/// only exist when the workspace embeds them. An artificial latency
/// makes asynchronous behaviour (cancellation on sleep, late completions)
/// observable in the TUI.
#[derive(Debug, Clone, Default)]
pub struct DemoDataSource {
    latency: Duration,
    inline: Arc<HashMap<String, Series>>,
    results: Arc<HashMap<String, Value>>,
}

impl DemoDataSource {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            inline: Arc::default(),
            results: Arc::default(),
        }
    }

    /// Serve these series verbatim
    pub fn with_inline(mut self, series: impl IntoIterator<Item = Series>) -> Self {
        self.inline = Arc::new(series.into_iter().map(|s| (s.tsuid.clone(), s)).collect());
        self
    }

    /// Serve these operator results, keyed by result id
    pub fn with_results(mut self, results: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.results = Arc::new(results.into_iter().collect());
        self
    }

    fn lookup(&self, tsuid: &str) -> Result<Series> {
        if tsuid.is_empty() {
            bail!("empty tsuid");
        }
        Ok(match self.inline.get(tsuid) {
            Some(series) => series.clone(),
            None => synthesize(tsuid),
        })
    }
}

impl DataSource for DemoDataSource {
    fn series(&self, tsuid: &str) -> BoxFuture<'static, Result<Series>> {
        let latency = self.latency;
        let result = self.lookup(tsuid);
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            result
        }
        .boxed()
    }

    fn metadata(&self, tsuid: &str) -> BoxFuture<'static, Result<Metadata>> {
        let latency = self.latency;
        let result = self.lookup(tsuid).map(|series| {
            let mut meta = Metadata::new();
            meta.insert("qual_nb_points".to_string(), series.len().to_string());
            if let Some((start, end)) = series.span() {
                meta.insert("ikats_start_date".to_string(), start.to_string());
                meta.insert("ikats_end_date".to_string(), end.to_string());
            }
            meta
        });
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            result
        }
        .boxed()
    }

    fn result(&self, rid: &str) -> BoxFuture<'static, Result<Value>> {
        let latency = self.latency;
        let result = self
            .results
            .get(rid)
            .cloned()
            .ok_or_else(|| anyhow!("no stored result with id {rid:?}"));
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            result
        }
        .boxed()
    }
}

/// FNV-1a, stable across runs and platforms
fn seed_of(tsuid: &str) -> u64 {
    tsuid.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Sine waves plus bounded noise, shaped by the identifier
///
/// The output is a pure function of `tsuid`: the shape parameters and the
/// xorshift64 noise state are all derived from `seed_of`, so reopening a
/// series redraws the same curve and tests can assert on its values. No RNG
/// crate is involved because nothing here needs unpredictability.
fn synthesize(tsuid: &str) -> Series {
    let seed = seed_of(tsuid);
    let period = 20.0 + (seed % 60) as f64;
    let amplitude = 5.0 + ((seed >> 8) % 50) as f64;
    let offset = ((seed >> 16) % 200) as f64 - 100.0;

    let mut state = seed | 1;
    let points = (0..SYNTH_POINTS)
        .map(|i| {
            // xorshift64
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let noise = (state % 1000) as f64 / 1000.0 - 0.5;

            let t = i as f64;
            let value = offset
                + amplitude * (t * std::f64::consts::TAU / period).sin()
                + amplitude * 0.3 * (t * std::f64::consts::TAU / (period * 3.7)).cos()
                + amplitude * 0.2 * noise;
            (SYNTH_START_MS + i as i64 * SYNTH_STEP_MS, value)
        })
        .collect();

    Series::new(tsuid, points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_on_known_series() {
        let s = Series::new("T", vec![(0, 1.0), (1, 3.0), (2, 2.0)]);
        assert_eq!(s.min(), Some(1.0));
        assert_eq!(s.max(), Some(3.0));
        assert_eq!(s.mean(), Some(2.0));
        assert_eq!(s.span(), Some((0, 2)));

        let empty = Series::new("E", vec![]);
        assert_eq!(empty.mean(), None);
        assert_eq!(empty.span(), None);
    }

    #[test]
    fn downsample_averages_buckets() {
        let s = Series::new("T", (0..10).map(|i| (i, i as f64)).collect());
        assert_eq!(s.downsample(5), vec![0.5, 2.5, 4.5, 6.5, 8.5]);
        assert_eq!(s.downsample(20).len(), 10);
        assert!(s.downsample(0).is_empty());
    }

    #[tokio::test]
    async fn synthesized_series_are_deterministic() {
        let source = DemoDataSource::default();
        let a = source.series("TS_A").await.unwrap();
        let again = source.series("TS_A").await.unwrap();
        let b = source.series("TS_B").await.unwrap();

        assert_eq!(a, again);
        assert_ne!(a.points, b.points);
        assert_eq!(a.len(), SYNTH_POINTS);
    }

    #[tokio::test]
    async fn inline_series_are_served_first() {
        let source = DemoDataSource::default()
            .with_inline([Series::new("TS_A", vec![(10, 4.0), (20, 5.0)])]);
        let s = source.series("TS_A").await.unwrap();
        assert_eq!(s.points, vec![(10, 4.0), (20, 5.0)]);

        let meta = source.metadata("TS_A").await.unwrap();
        assert_eq!(meta["qual_nb_points"], "2");
        assert_eq!(meta["ikats_end_date"], "20");
    }

    #[tokio::test]
    async fn empty_identifier_is_an_error() {
        let source = DemoDataSource::default();
        assert!(source.series("").await.is_err());
        assert!(source.metadata("").await.is_err());
    }

    #[tokio::test]
    async fn stored_results_are_looked_up_by_id() {
        let source = DemoDataSource::default()
            .with_results([("B1".to_string(), serde_json::json!([{"tsuid": "B1_FL1"}]))]);
        let content = source.result("B1").await.unwrap();
        assert_eq!(content[0]["tsuid"], "B1_FL1");

        let err = source.result("B2").await.unwrap_err();
        assert!(err.to_string().contains("B2"));
    }

    #[tokio::test]
    async fn latency_delays_the_answer() {
        let source = DemoDataSource::new(Duration::from_millis(30));
        let started = tokio::time::Instant::now();
        source.series("TS_A").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
