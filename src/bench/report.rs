//! Final statistics of a benchmark run

use std::fmt;
use std::time::Duration;

use super::BenchResult;

/// One row of the cumulative latency table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentileRow {
    /// Upper bound of the bucket, in milliseconds
    pub below_ms: u64,

    /// Percentage of all requests that completed below `below_ms`
    pub percent: u64,
}

/// Summary statistics computed from a merged result
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub get_count: u64,
    pub miss_count: u64,
    pub set_count: u64,
    pub del_count: u64,
    pub total_count: u64,

    /// Cumulative latency table, one row per non-empty bucket
    pub percentiles: Vec<PercentileRow>,

    /// Mean latency per request in microseconds
    pub average_latency_us: u64,

    /// (GET + SET) * value_size bytes over the run, in MB/s
    pub throughput_mb_s: f64,

    pub requests_per_sec: f64,

    pub elapsed: Duration,
}

impl Report {
    /// Compute the report for `result`, collected over `elapsed`
    ///
    /// Throughput uses the configured value size as the per-request payload,
    /// not the bytes actually transferred.
    pub fn new(result: &BenchResult, elapsed: Duration, value_size: usize) -> Self {
        let total_count = result.total_count();

        let mut percentiles = Vec::new();
        let mut running_count = 0u64;
        let mut running_time = Duration::ZERO;
        for (bucket, stat) in result.buckets().iter().enumerate() {
            if stat.count == 0 {
                continue;
            }
            running_count += stat.count;
            running_time += stat.time;
            if total_count > 0 {
                percentiles.push(PercentileRow {
                    below_ms: bucket as u64 + 1,
                    percent: running_count * 100 / total_count,
                });
            }
        }

        let average_latency_us = if running_count > 0 {
            (running_time.as_micros() / running_count as u128) as u64
        } else {
            0
        };

        let secs = elapsed.as_secs_f64();
        let (throughput_mb_s, requests_per_sec) = if secs > 0.0 {
            let bytes = ((result.get_count + result.set_count) * value_size as u64) as f64;
            (bytes / 1e6 / secs, total_count as f64 / secs)
        } else {
            (0.0, 0.0)
        };

        Self {
            get_count: result.get_count,
            miss_count: result.miss_count,
            set_count: result.set_count,
            del_count: result.del_count,
            total_count,
            percentiles,
            average_latency_us,
            throughput_mb_s,
            requests_per_sec,
            elapsed,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} records get", self.get_count)?;
        writeln!(f, "{} records missing", self.miss_count)?;
        writeln!(f, "{} records were set", self.set_count)?;
        if self.del_count > 0 {
            writeln!(f, "{} records were deleted", self.del_count)?;
        }
        writeln!(f, "{} records total", self.total_count)?;

        for row in &self.percentiles {
            writeln!(f, "{}% requests < {} ms", row.percent, row.below_ms)?;
        }

        writeln!(f, "{} usec average for each request", self.average_latency_us)?;
        writeln!(f, "throughput is {:.6} MB/s", self.throughput_mb_s)?;
        write!(f, "rps is {:.6}", self.requests_per_sec)
    }
}
