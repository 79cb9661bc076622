//! Benchmark driver
//!
//! Spawns one worker thread per connection and joins on their results.
//!
//! ```text
//!   worker 0 ──┐
//!   worker 1 ──┼──► bounded channel (capacity = workers) ──► merge ──► RunSummary
//!   worker N ──┘
//! ```
//!
//! Workers share nothing but the read-only config. The driver blocks until
//! every worker has reported; one failing worker fails the whole run.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel;

use crate::client::{self, Client};
use crate::config::BenchConfig;
use crate::error::{BenchError, Result};

use super::{BenchResult, Worker};

/// Merged outcome of a benchmark run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub result: BenchResult,

    /// Wall-clock time from spawning the first worker to the last result
    pub elapsed: Duration,
}

/// Run the benchmark against the configured server
pub fn run(config: BenchConfig) -> Result<RunSummary> {
    run_with(config, |_, config| client::connect(config))
}

/// Run the benchmark with a custom connector
///
/// `connect(id, config)` is called on worker `id`'s own thread to open the
/// client that worker will use for its whole run.
pub fn run_with<C, F>(config: BenchConfig, connect: F) -> Result<RunSummary>
where
    C: Client + 'static,
    F: Fn(usize, &BenchConfig) -> Result<C> + Send + Sync + 'static,
{
    config.validate()?;

    let workers = config.connections;
    let per_worker = config.requests_per_worker();
    let dropped = config.total_requests - per_worker * workers;
    if dropped > 0 {
        tracing::warn!(
            total = config.total_requests,
            workers,
            dropped,
            "total requests not divisible by connection count; remainder is not issued"
        );
    }

    let config = Arc::new(config);
    let connect = Arc::new(connect);

    // Capacity covers every worker, so no worker blocks on handoff
    let (tx, rx) = channel::bounded::<(usize, Result<BenchResult>)>(workers);

    let start = Instant::now();

    for id in 0..workers {
        let tx = tx.clone();
        let config = Arc::clone(&config);
        let connect = Arc::clone(&connect);

        thread::Builder::new()
            .name(format!("kvbench-worker-{}", id))
            .spawn(move || {
                let outcome = (*connect)(id, &*config)
                    .and_then(|client| Worker::new(id, config, client).run());
                let _ = tx.send((id, outcome));
            })?;
    }
    drop(tx);

    let mut merged = BenchResult::new();
    let mut reported = vec![false; workers];

    for _ in 0..workers {
        let (id, outcome) = match rx.recv() {
            Ok(message) => message,
            Err(_) => {
                // Every sender is gone: some worker died without reporting
                let lost = reported.iter().position(|done| !done).unwrap_or(0);
                return Err(BenchError::WorkerLost(lost));
            }
        };
        reported[id] = true;

        match outcome {
            Ok(result) => merged.merge(&result),
            Err(e) => {
                tracing::error!(worker = id, "worker failed: {}", e);
                return Err(e);
            }
        }
    }

    let elapsed = start.elapsed();
    tracing::info!(
        workers,
        requests = merged.total_count(),
        elapsed_ms = elapsed.as_millis() as u64,
        "benchmark finished"
    );

    Ok(RunSummary {
        result: merged,
        elapsed,
    })
}
