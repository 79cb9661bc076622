//! Benchmark result aggregation
//!
//! A `BenchResult` is a per-millisecond latency histogram plus request
//! counters. Each worker fills its own result; the driver merges them.

use std::time::Duration;

/// Width of one latency bucket
pub const BUCKET_WIDTH: Duration = Duration::from_millis(1);

/// How a completed request is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// GET that returned the expected value
    Get,
    /// GET that found nothing
    Miss,
    Set,
    Del,
}

impl Classification {
    pub fn name(self) -> &'static str {
        match self {
            Classification::Get => "get",
            Classification::Miss => "miss",
            Classification::Set => "set",
            Classification::Del => "del",
        }
    }
}

/// One latency bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistic {
    /// Requests whose latency fell in this bucket
    pub count: u64,

    /// Sum of those latencies
    pub time: Duration,
}

/// Latency histogram and request counters
///
/// ## Invariants
/// - `buckets[b].count` is the number of recorded durations `d` with
///   `floor(d / 1ms) == b`
/// - `buckets.len()` is the highest bucket index seen plus one; the vector
///   only ever grows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchResult {
    pub get_count: u64,
    pub miss_count: u64,
    pub set_count: u64,
    pub del_count: u64,
    buckets: Vec<Statistic>,
}

impl BenchResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed request
    pub fn record_duration(&mut self, duration: Duration, classification: Classification) {
        let index = bucket_index(duration);
        let bucket = self.bucket_mut(index);
        bucket.count += 1;
        bucket.time += duration;

        match classification {
            Classification::Get => self.get_count += 1,
            Classification::Miss => self.miss_count += 1,
            Classification::Set => self.set_count += 1,
            Classification::Del => self.del_count += 1,
        }
    }

    /// Fold another result into this one
    ///
    /// Bucket-wise and counter-wise addition, so the merge order of worker
    /// results does not matter.
    pub fn merge(&mut self, other: &BenchResult) {
        for (index, stat) in other.buckets.iter().enumerate() {
            let bucket = self.bucket_mut(index);
            bucket.count += stat.count;
            bucket.time += stat.time;
        }

        self.get_count += other.get_count;
        self.miss_count += other.miss_count;
        self.set_count += other.set_count;
        self.del_count += other.del_count;
    }

    /// Latency buckets, indexed by millisecond
    pub fn buckets(&self) -> &[Statistic] {
        &self.buckets
    }

    /// Total requests by classification
    pub fn total_count(&self) -> u64 {
        self.get_count + self.miss_count + self.set_count + self.del_count
    }

    /// Total requests recorded in the histogram
    pub fn recorded_count(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Sum of all recorded latencies
    pub fn total_time(&self) -> Duration {
        self.buckets.iter().map(|b| b.time).sum()
    }

    /// Bucket at `index`, growing the vector when needed
    fn bucket_mut(&mut self, index: usize) -> &mut Statistic {
        if index >= self.buckets.len() {
            self.buckets.resize(index + 1, Statistic::default());
        }
        &mut self.buckets[index]
    }
}

/// Bucket index of a latency: whole milliseconds, rounded down
pub fn bucket_index(duration: Duration) -> usize {
    (duration.as_nanos() / BUCKET_WIDTH.as_nanos()) as usize
}
