use std::fmt;
use std::future::Future;
use std::time::Instant;

use futures_util::future::join_all;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

use crate::aggregator::Aggregator;
use crate::config::RunConfig;
use crate::error::{ConfigError, RunError};
use crate::outcome::{RequestOutcome, RunSummary, WorkerAssignment};

// =============================================================================
// Run Phases
// =============================================================================

/// Lifecycle of a run. Phases are entered in declaration order and never skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Configuring,
    Splitting,
    Running,
    Draining,
    Reporting,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Configuring => "configuring",
            RunPhase::Splitting => "splitting",
            RunPhase::Running => "running",
            RunPhase::Draining => "draining",
            RunPhase::Reporting => "reporting",
            RunPhase::Done => "done",
        };
        f.write_str(name)
    }
}

pub fn enter_phase(phase: RunPhase) {
    debug!("Run phase: {}", phase);
}

// =============================================================================
// Work Splitting
// =============================================================================

/// Splits `total_requests` into `concurrency` shares: everybody gets the floor
/// of the even split and the last worker also takes the remainder.
pub fn split_requests(
    total_requests: u64,
    concurrency: usize,
) -> Result<Vec<WorkerAssignment>, ConfigError> {
    if total_requests == 0 {
        return Err(ConfigError::InvalidRequests);
    }
    if concurrency == 0 {
        return Err(ConfigError::InvalidConcurrency);
    }

    let workers = concurrency as u64;
    let base = total_requests / workers;
    let remainder = total_requests % workers;

    Ok((0..concurrency)
        .map(|worker_id| {
            let extra = if worker_id == concurrency - 1 { remainder } else { 0 };
            WorkerAssignment {
                worker_id,
                request_count: base + extra,
            }
        })
        .collect())
}

// =============================================================================
// Worker
// =============================================================================

/// Runs `action` sequentially `assignment.request_count` times, pushing every
/// outcome into `outcomes`. Returns how many outcomes were delivered.
pub async fn run_worker<F, Fut>(
    assignment: WorkerAssignment,
    action: F,
    outcomes: mpsc::Sender<RequestOutcome>,
) -> u64
where
    F: Fn() -> Fut,
    Fut: Future<Output = RequestOutcome>,
{
    let id = assignment.worker_id;
    debug!("Worker {} starting with {} requests", id, assignment.request_count);

    let mut emitted = 0;
    for _ in 0..assignment.request_count {
        let outcome = action().await;
        if outcomes.send(outcome).await.is_err() {
            warn!("Worker {} lost its outcome stream after {} requests", id, emitted);
            break;
        }
        emitted += 1;
    }

    debug!("Worker {} finished, emitted {} outcomes", id, emitted);
    emitted
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Executes one full run from an already validated config: split, fan out one
/// task per worker, wait for all of them, then finalize the summary.
pub async fn dispatch<F, Fut>(config: &RunConfig, action: F) -> Result<RunSummary, RunError>
where
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = RequestOutcome> + Send + 'static,
{
    // Room for every outcome, so no worker ever waits on a slot.
    let capacity = usize::try_from(config.total_requests())
        .unwrap_or(usize::MAX)
        .min(Semaphore::MAX_PERMITS);
    dispatch_with_capacity(config, action, capacity).await
}

async fn dispatch_with_capacity<F, Fut>(
    config: &RunConfig,
    action: F,
    capacity: usize,
) -> Result<RunSummary, RunError>
where
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = RequestOutcome> + Send + 'static,
{
    enter_phase(RunPhase::Splitting);
    let total_requests = config.total_requests();
    let assignments = split_requests(total_requests, config.concurrency())?;
    let mut aggregator = Aggregator::new()?;

    let (tx, mut rx) = mpsc::channel::<RequestOutcome>(capacity.max(1));
    // Drains alongside the workers so a short buffer never stalls them; the
    // summary is only built once the barrier has released.
    let drain = tokio::spawn(async move {
        aggregator.drain(&mut rx).await;
        aggregator
    });

    enter_phase(RunPhase::Running);
    info!(
        "Spawning {} workers for {} requests against {}",
        assignments.len(),
        total_requests,
        config.url()
    );
    let start = Instant::now();

    let handles: Vec<_> = assignments
        .into_iter()
        .map(|assignment| {
            let action = action.clone();
            let outcomes = tx.clone();
            tokio::spawn(async move { run_worker(assignment, action, outcomes).await })
        })
        .collect();
    // Workers hold the only remaining senders; the stream closes when the last one exits.
    drop(tx);

    let joined = join_all(handles).await;
    let total_duration = start.elapsed();

    let mut emitted = 0;
    for result in joined {
        emitted += result?;
    }
    info!("All workers finished in {:?}, {} outcomes emitted", total_duration, emitted);

    enter_phase(RunPhase::Draining);
    let aggregator = drain.await.map_err(RunError::AggregatorPanicked)?;

    Ok(aggregator.finish(total_duration))
}
