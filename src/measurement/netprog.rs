//! Network programming latency measurement
//!
//! Collects the kube-proxy network programming latency quantiles (50th, 90th
//! and 99th percentile) from Prometheus and turns them into a perf-dash
//! summary.

use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use super::perfdata::{DataItem, PerfData};
use super::summary::Summary;
use crate::prometheus::{QueryError, QueryExecutor};
use crate::utils::timer::Timer;

/// Measurement name, also used as the summary name and metric label
pub const NETPROG_MEASUREMENT: &str = "NetworkProgrammingLatency";

/// Perf data format version
pub const PERF_DATA_VERSION: &str = "v1";

/// Unit of the reported latencies
pub const LATENCY_UNIT: &str = "ms";

/// Summary content extension
pub const SUMMARY_EXT: &str = "json";

/// Factor converting the queried seconds into reported milliseconds
pub const SECONDS_TO_MILLIS: f64 = 1000.0;

/// Default lookback window of the latency query
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(600);

/// Perf data keys, in ascending latency order
pub const QUANTILE_KEYS: [&str; 3] = ["Perc50", "Perc90", "Perc99"];

/// Errors raised while gathering the measurement
#[derive(Error, Debug)]
pub enum GatherError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("got unexpected number of samples: {0}")]
    UnexpectedSampleCount(usize),

    #[error("got non-finite latency: {0:?}")]
    NonFiniteLatency([f64; 3]),

    #[error("Failed to encode perf data: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Gatherer for the network programming latency measurement
#[derive(Clone, Debug)]
pub struct NetProgGatherer {
    window: Duration,
}

impl Default for NetProgGatherer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl NetProgGatherer {
    /// Create a gatherer looking back over `window`
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Build the latency query for the configured window
    pub fn query(&self) -> String {
        format!(
            "quantile_over_time(0.99, kubeproxy:kubeproxy_network_programming_duration:histogram_quantile{{}}[{}s])",
            self.window.as_secs()
        )
    }

    /// Run the query at `time` and build the summary.
    ///
    /// Exactly three samples are expected. Executor errors are returned
    /// unchanged and never retried.
    pub async fn gather(
        &self,
        executor: &dyn QueryExecutor,
        time: DateTime<Utc>,
    ) -> Result<Summary, GatherError> {
        let query = self.query();
        debug!("Gathering {} at {}", NETPROG_MEASUREMENT, time);

        let timer = Timer::start(format!("{NETPROG_MEASUREMENT} query"));
        let result = executor.query(&query, time).await;
        timer.stop();
        let samples = result?;

        let mut latency = match samples.as_slice() {
            [a, b, c] => [a.value, b.value, c.value],
            other => return Err(GatherError::UnexpectedSampleCount(other.len())),
        };
        latency.sort_by(f64::total_cmp);
        for value in &mut latency {
            *value *= SECONDS_TO_MILLIS;
        }
        // JSON has no NaN or infinity; such values would not decode back.
        if !latency.iter().all(|v| v.is_finite()) {
            return Err(GatherError::NonFiniteLatency(latency));
        }

        let content = serde_json::to_string_pretty(&create_perf_data(latency))?;

        info!(
            "{}: p50={:.2}ms p90={:.2}ms p99={:.2}ms",
            NETPROG_MEASUREMENT, latency[0], latency[1], latency[2]
        );

        Ok(Summary::new(NETPROG_MEASUREMENT, SUMMARY_EXT, time, content))
    }
}

/// Build perf data from ascending latencies in milliseconds
pub fn create_perf_data(latency: [f64; 3]) -> PerfData {
    let item = QUANTILE_KEYS
        .iter()
        .zip(latency)
        .fold(DataItem::new(LATENCY_UNIT), |item, (key, value)| {
            item.with_value(*key, value)
        })
        .with_label("Metric", NETPROG_MEASUREMENT);

    PerfData::new(PERF_DATA_VERSION, vec![item])
}

impl PerfData {
    /// The three latencies of a network programming data item, ascending
    pub fn latencies(&self) -> Option<[f64; 3]> {
        let item = self.data_items.first()?;
        Some([
            item.value(QUANTILE_KEYS[0])?,
            item.value(QUANTILE_KEYS[1])?,
            item.value(QUANTILE_KEYS[2])?,
        ])
    }
}
