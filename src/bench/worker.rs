//! Benchmark worker
//!
//! A worker owns one client for its whole life, issues its share of the
//! workload and returns a private `BenchResult`.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::client::{Client, Request};
use crate::config::{BenchConfig, Operation};
use crate::error::{BenchError, Result};
use crate::protocol::{CommandType, Reply};

use super::{BenchResult, Classification};

/// Runs a fixed number of requests over one client
pub struct Worker<C> {
    /// Worker index, used for sequential key ranges
    id: usize,

    /// Requests this worker issues
    count: usize,

    config: Arc<BenchConfig>,

    client: C,

    rng: StdRng,

    /// `value_size` filler bytes; the numeric key is appended per request
    value_prefix: String,
}

impl<C: Client> Worker<C> {
    /// Create worker `id` with its share of `config.total_requests`
    pub fn new(id: usize, config: Arc<BenchConfig>, client: C) -> Self {
        let count = config.requests_per_worker();
        let value_prefix = "v".repeat(config.value_size);
        Self {
            id,
            count,
            config,
            client,
            rng: StdRng::from_entropy(),
            value_prefix,
        }
    }

    /// Use a deterministic random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Number of requests this worker will issue
    pub fn count(&self) -> usize {
        self.count
    }

    /// Issue every request and collect statistics
    ///
    /// Stops at the first transport, protocol or consistency error.
    pub fn run(mut self) -> Result<BenchResult> {
        let mut result = BenchResult::new();
        let pipeline = self.config.pipeline;
        let mut batch: Vec<Request> = Vec::new();

        tracing::info!(
            worker = self.id,
            requests = self.count,
            pipeline,
            operation = %self.config.operation,
            "worker started"
        );

        for i in 0..self.count {
            let request = self.next_request(i);

            if self.config.is_pipelined() {
                batch.push(request);
                if batch.len() == pipeline {
                    self.run_pipeline(&mut batch, &mut result)?;
                    batch.clear();
                }
            } else {
                self.run_single(request, &mut result)?;
            }
        }

        // Trailing partial batch
        if !batch.is_empty() {
            self.run_pipeline(&mut batch, &mut result)?;
        }

        tracing::info!(
            worker = self.id,
            gets = result.get_count,
            misses = result.miss_count,
            sets = result.set_count,
            dels = result.del_count,
            "worker finished"
        );

        Ok(result)
    }

    /// Build request `i`: pick the key, the expected value and the operation
    fn next_request(&mut self, i: usize) -> Request {
        let key = if self.config.key_space > 0 {
            self.rng.gen_range(0..self.config.key_space)
        } else {
            sequential_key(self.id, self.count, i)
        };

        let command = match self.config.operation {
            Operation::Get => CommandType::Get,
            Operation::Set => CommandType::Set,
            Operation::Del => CommandType::Del,
            Operation::Mixed => {
                if self.rng.gen_bool(0.5) {
                    CommandType::Get
                } else {
                    CommandType::Set
                }
            }
        };

        Request::new(command, key.to_string(), format!("{}{}", self.value_prefix, key))
    }

    /// Execute one request with its own latency measurement
    fn run_single(&mut self, mut request: Request, result: &mut BenchResult) -> Result<()> {
        let start = Instant::now();
        self.client.execute_one(&mut request)?;
        let elapsed = start.elapsed();

        result.record_duration(elapsed, classify(&request)?);
        Ok(())
    }

    /// Execute a batch; every request is charged the whole batch duration
    fn run_pipeline(&mut self, batch: &mut [Request], result: &mut BenchResult) -> Result<()> {
        tracing::debug!(worker = self.id, batch = batch.len(), "process pipeline");

        let start = Instant::now();
        self.client.execute_pipeline(batch)?;
        let elapsed = start.elapsed();

        for request in batch.iter() {
            result.record_duration(elapsed, classify(request)?);
        }
        Ok(())
    }
}

/// Globally unique key for request `i` of worker `id` when each worker
/// issues `count` requests
pub fn sequential_key(id: usize, count: usize, i: usize) -> u64 {
    (id * count + i) as u64
}

/// Classify an executed request
///
/// GET replies are checked against the value the worker expects: an empty
/// value or an error reply is a miss, any other value must match exactly.
pub fn classify(request: &Request) -> Result<Classification> {
    match request.command {
        CommandType::Set => Ok(Classification::Set),
        CommandType::Del => Ok(Classification::Del),
        CommandType::Get => match &request.outcome {
            Some(Reply::Value(value)) if value.is_empty() => Ok(Classification::Miss),
            Some(Reply::Value(value)) if value.as_slice() == request.value.as_bytes() => {
                Ok(Classification::Get)
            }
            Some(Reply::Value(value)) => Err(BenchError::ConsistencyViolation {
                key: request.key.clone(),
                expected: request.value.clone(),
                actual: String::from_utf8_lossy(value).into_owned(),
            }),
            Some(Reply::Error(message)) => {
                tracing::debug!(
                    key = %request.key,
                    "GET answered with error: {}",
                    String::from_utf8_lossy(message)
                );
                Ok(Classification::Miss)
            }
            None => Ok(Classification::Miss),
        },
    }
}
