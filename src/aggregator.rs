use std::collections::BTreeMap;
use std::time::Duration;

use hdrhistogram::Histogram;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::RunError;
use crate::outcome::{LatencySummary, RequestOutcome, RunSummary};

// One hour, in microseconds. Slower requests saturate at the top bucket.
const MAX_TRACKED_LATENCY_US: u64 = 3_600_000_000;

/// Folds request outcomes into a [`RunSummary`].
pub struct Aggregator {
    status_histogram: BTreeMap<u16, u64>,
    success_count: u64,
    total: u64,
    latency_us: Histogram<u64>,
}

impl Aggregator {
    pub fn new() -> Result<Self, RunError> {
        Ok(Self {
            status_histogram: BTreeMap::new(),
            success_count: 0,
            total: 0,
            latency_us: Histogram::<u64>::new_with_bounds(1, MAX_TRACKED_LATENCY_US, 3)?,
        })
    }

    pub fn consume(&mut self, outcome: &RequestOutcome) {
        *self.status_histogram.entry(outcome.status_code).or_insert(0) += 1;
        if outcome.is_success() {
            self.success_count += 1;
        }
        self.total += 1;

        let micros = u64::try_from(outcome.duration.as_micros()).unwrap_or(u64::MAX);
        self.latency_us.saturating_record(micros.max(1));
    }

    /// Consumes outcomes until every sender is dropped and the buffer is empty.
    pub async fn drain(&mut self, outcomes: &mut mpsc::Receiver<RequestOutcome>) -> u64 {
        let mut drained = 0;
        while let Some(outcome) = outcomes.recv().await {
            self.consume(&outcome);
            drained += 1;
        }
        debug!("Drained {} outcomes", drained);
        drained
    }

    pub fn finish(self, total_duration: Duration) -> RunSummary {
        let latency = if self.latency_us.len() == 0 {
            LatencySummary::default()
        } else {
            let ms = |us: u64| us as f64 / 1_000.0;
            LatencySummary {
                min: ms(self.latency_us.min()),
                mean: self.latency_us.mean() / 1_000.0,
                p50: ms(self.latency_us.value_at_quantile(0.50)),
                p95: ms(self.latency_us.value_at_quantile(0.95)),
                p99: ms(self.latency_us.value_at_quantile(0.99)),
                max: ms(self.latency_us.max()),
            }
        };

        RunSummary {
            total_duration,
            total_requests: self.total,
            success_count: self.success_count,
            status_histogram: self.status_histogram,
            latency,
        }
    }
}
