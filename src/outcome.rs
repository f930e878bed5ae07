use std::collections::BTreeMap;
use std::time::Duration;

/// Status recorded when a request failed before any status line arrived.
pub const FAILURE_STATUS: u16 = 0;

pub const SUCCESS_STATUS: u16 = 200;

/// Result of a single GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    pub status_code: u16,
    pub duration: Duration,
}

impl RequestOutcome {
    pub fn status(status_code: u16, duration: Duration) -> Self {
        Self {
            status_code,
            duration,
        }
    }

    pub fn failed(duration: Duration) -> Self {
        Self {
            status_code: FAILURE_STATUS,
            duration,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == SUCCESS_STATUS
    }

    pub fn is_failure(&self) -> bool {
        self.status_code == FAILURE_STATUS
    }
}

/// Number of requests one worker owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerAssignment {
    pub worker_id: usize,
    pub request_count: u64,
}

/// Latency distribution in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatencySummary {
    pub min: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub max: f64,
}

/// Final result of a run.
///
/// `status_histogram` includes [`FAILURE_STATUS`] for transport failures; its
/// counts always sum to `total_requests` and `success_count` always equals the
/// entry for 200.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub total_duration: Duration,
    pub total_requests: u64,
    pub success_count: u64,
    pub status_histogram: BTreeMap<u16, u64>,
    pub latency: LatencySummary,
}

impl RunSummary {
    pub fn failure_count(&self) -> u64 {
        self.status_histogram
            .get(&FAILURE_STATUS)
            .copied()
            .unwrap_or(0)
    }

    /// Every status other than 200, ascending by code.
    pub fn other_statuses(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.status_histogram
            .iter()
            .filter(|(code, _)| **code != SUCCESS_STATUS)
            .map(|(code, count)| (*code, *count))
    }

    pub fn requests_per_second(&self) -> f64 {
        let secs = self.total_duration.as_secs_f64();
        if secs > 0.0 {
            self.total_requests as f64 / secs
        } else {
            0.0
        }
    }
}
