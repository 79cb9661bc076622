//! Tests for Worker
//!
//! These tests verify:
//! - Key and value selection (sequential, bounded random)
//! - Single and pipelined execution, including the trailing batch
//! - GET classification: hit, miss, mismatch

use std::collections::HashMap;
use std::sync::Arc;

use kvbench::bench::{classify, sequential_key, Classification, Worker};
use kvbench::protocol::{CommandType, Reply};
use kvbench::{BenchConfig, BenchError, Client, Operation, Request, Result};
use parking_lot::Mutex;

// =============================================================================
// Helper Functions
// =============================================================================

/// Everything a FakeClient saw, shared with the test after the worker ends
#[derive(Default)]
struct Log {
    requests: Vec<(CommandType, String, String)>,
    single_calls: usize,
    batch_sizes: Vec<usize>,
}

/// In-memory client backed by a map
struct FakeClient {
    data: HashMap<String, String>,
    log: Arc<Mutex<Log>>,
}

impl FakeClient {
    fn new() -> (Self, Arc<Mutex<Log>>) {
        let log = Arc::new(Mutex::new(Log::default()));
        let client = Self {
            data: HashMap::new(),
            log: Arc::clone(&log),
        };
        (client, log)
    }

    fn with_data(mut self, key: &str, value: &str) -> Self {
        self.data.insert(key.to_string(), value.to_string());
        self
    }

    fn apply(&mut self, request: &mut Request) {
        self.log.lock().requests.push((
            request.command,
            request.key.clone(),
            request.value.clone(),
        ));
        let reply = match request.command {
            CommandType::Get => Reply::value(self.data.get(&request.key).cloned().unwrap_or_default()),
            CommandType::Set => {
                self.data.insert(request.key.clone(), request.value.clone());
                Reply::empty()
            }
            CommandType::Del => {
                self.data.remove(&request.key);
                Reply::empty()
            }
        };
        request.outcome = Some(reply);
    }
}

impl Client for FakeClient {
    fn execute_one(&mut self, request: &mut Request) -> Result<()> {
        self.log.lock().single_calls += 1;
        self.apply(request);
        Ok(())
    }

    fn execute_pipeline(&mut self, requests: &mut [Request]) -> Result<()> {
        self.log.lock().batch_sizes.push(requests.len());
        for request in requests.iter_mut() {
            self.apply(request);
        }
        Ok(())
    }
}

fn config(operation: Operation, total: usize, pipeline: usize) -> Arc<BenchConfig> {
    Arc::new(
        BenchConfig::builder()
            .operation(operation)
            .total_requests(total)
            .value_size(4)
            .pipeline(pipeline)
            .build(),
    )
}

// =============================================================================
// Key and Value Tests
// =============================================================================

#[test]
fn test_sequential_keys_are_disjoint_across_workers() {
    let (workers, count) = (7, 13);
    let mut seen = std::collections::HashSet::new();
    for id in 0..workers {
        for i in 0..count {
            assert!(seen.insert(sequential_key(id, count, i)));
        }
    }
    assert_eq!(seen.len(), workers * count);
}

#[test]
fn test_worker_uses_its_sequential_key_range() {
    let cfg = Arc::new(
        BenchConfig::builder()
            .total_requests(15)
            .connections(3)
            .value_size(2)
            .build(),
    );
    let (client, log) = FakeClient::new();

    let worker = Worker::new(2, cfg, client);
    assert_eq!(worker.count(), 5);
    worker.run().unwrap();

    let keys: Vec<String> = log.lock().requests.iter().map(|r| r.1.clone()).collect();
    assert_eq!(keys, vec!["10", "11", "12", "13", "14"]);
}

#[test]
fn test_value_is_filler_plus_key() {
    let (client, log) = FakeClient::new();
    Worker::new(0, config(Operation::Set, 3, 1), client).run().unwrap();

    let log = log.lock();
    assert_eq!(log.requests[0].2, "vvvv0");
    assert_eq!(log.requests[2].2, "vvvv2");
}

#[test]
fn test_key_space_bounds_random_keys() {
    let cfg = Arc::new(
        BenchConfig::builder()
            .total_requests(200)
            .key_space(5)
            .value_size(1)
            .build(),
    );
    let (client, log) = FakeClient::new();
    Worker::new(0, cfg, client).with_seed(42).run().unwrap();

    for (_, key, value) in &log.lock().requests {
        let n: u64 = key.parse().unwrap();
        assert!(n < 5);
        assert_eq!(value, &format!("v{}", n));
    }
}

// =============================================================================
// Execution Mode Tests
// =============================================================================

#[test]
fn test_single_mode_ten_sets() {
    let (client, log) = FakeClient::new();
    let result = Worker::new(0, config(Operation::Set, 10, 1), client).run().unwrap();

    assert_eq!(result.set_count, 10);
    assert_eq!(result.get_count, 0);
    assert_eq!(result.miss_count, 0);
    assert_eq!(result.recorded_count(), 10);
    assert_eq!(log.lock().single_calls, 10);
    assert!(log.lock().batch_sizes.is_empty());
}

#[test]
fn test_pipeline_mode_flushes_trailing_batch() {
    let (client, log) = FakeClient::new();
    let result = Worker::new(0, config(Operation::Set, 10, 4), client).run().unwrap();

    assert_eq!(result.set_count, 10);
    assert_eq!(log.lock().batch_sizes, vec![4, 4, 2]);
    assert_eq!(log.lock().single_calls, 0);
}

#[test]
fn test_pipeline_batch_shares_one_duration() {
    let (client, _log) = FakeClient::new();
    let result = Worker::new(0, config(Operation::Set, 6, 6), client).run().unwrap();

    // One batch: all six requests carry the same latency, so one bucket
    let non_empty: Vec<_> = result.buckets().iter().filter(|b| b.count > 0).collect();
    assert_eq!(non_empty.len(), 1);
    assert_eq!(non_empty[0].count, 6);
}

#[test]
fn test_pipeline_length_one_is_single_mode() {
    let (client, log) = FakeClient::new();
    Worker::new(0, config(Operation::Set, 3, 0), client).run().unwrap();
    assert_eq!(log.lock().single_calls, 3);
}

#[test]
fn test_get_on_empty_store_counts_misses() {
    let (client, _log) = FakeClient::new();
    let result = Worker::new(0, config(Operation::Get, 5, 1), client).run().unwrap();

    assert_eq!(result.miss_count, 5);
    assert_eq!(result.get_count, 0);
}

#[test]
fn test_get_hits_values_written_by_set_convention() {
    let (client, _log) = FakeClient::new();
    let client = client.with_data("0", "vvvv0").with_data("1", "vvvv1");
    let result = Worker::new(0, config(Operation::Get, 3, 2), client).run().unwrap();

    assert_eq!(result.get_count, 2);
    assert_eq!(result.miss_count, 1);
}

#[test]
fn test_del_mode_counts_deletes() {
    let (client, log) = FakeClient::new();
    let result = Worker::new(0, config(Operation::Del, 4, 1), client).run().unwrap();

    assert_eq!(result.del_count, 4);
    assert!(log.lock().requests.iter().all(|r| r.0 == CommandType::Del));
}

#[test]
fn test_mixed_mode_only_gets_and_sets() {
    let (client, log) = FakeClient::new();
    let result = Worker::new(0, config(Operation::Mixed, 200, 1), client)
        .with_seed(7)
        .run()
        .unwrap();

    let log = log.lock();
    let gets = log.requests.iter().filter(|r| r.0 == CommandType::Get).count() as u64;
    let sets = log.requests.iter().filter(|r| r.0 == CommandType::Set).count() as u64;

    assert_eq!(gets + sets, 200);
    assert!(gets > 0 && sets > 0);
    assert_eq!(result.set_count, sets);
    assert_eq!(result.get_count + result.miss_count, gets);
}

#[test]
fn test_worker_aborts_on_mismatch() {
    let (client, _log) = FakeClient::new();
    let client = client.with_data("1", "zzzz");
    let err = Worker::new(0, config(Operation::Get, 5, 1), client)
        .run()
        .unwrap_err();

    match err {
        BenchError::ConsistencyViolation {
            key,
            expected,
            actual,
        } => {
            assert_eq!(key, "1");
            assert_eq!(expected, "vvvv1");
            assert_eq!(actual, "zzzz");
        }
        other => panic!("Expected consistency violation, got {:?}", other),
    }
}

#[test]
fn test_worker_aborts_on_mismatch_in_pipeline() {
    let (client, _log) = FakeClient::new();
    let client = client.with_data("2", "wrong");
    let err = Worker::new(0, config(Operation::Get, 4, 4), client)
        .run()
        .unwrap_err();

    assert!(matches!(err, BenchError::ConsistencyViolation { ref key, .. } if key == "2"));
}

// =============================================================================
// Classification Tests
// =============================================================================

fn executed(mut request: Request, reply: Reply) -> Request {
    request.outcome = Some(reply);
    request
}

#[test]
fn test_classify_get_hit() {
    let request = executed(Request::get("7", "abcd"), Reply::value("abcd"));
    assert_eq!(classify(&request).unwrap(), Classification::Get);
}

#[test]
fn test_classify_get_empty_is_miss() {
    let request = executed(Request::get("7", "abcd"), Reply::empty());
    assert_eq!(classify(&request).unwrap(), Classification::Miss);
}

#[test]
fn test_classify_get_error_reply_is_miss() {
    let request = executed(Request::get("7", "abcd"), Reply::error("not found"));
    assert_eq!(classify(&request).unwrap(), Classification::Miss);
}

#[test]
fn test_classify_get_mismatch() {
    let request = executed(Request::get("7", "abcd"), Reply::value("zzzz"));
    let err = classify(&request).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("key=7"));
    assert!(message.contains("expected=abcd"));
    assert!(message.contains("actual=zzzz"));
}

#[test]
fn test_classify_set_and_del_ignore_reply() {
    let set = executed(Request::set("1", "x"), Reply::value("anything"));
    let del = executed(Request::del("1"), Reply::error("whatever"));
    assert_eq!(classify(&set).unwrap(), Classification::Set);
    assert_eq!(classify(&del).unwrap(), Classification::Del);
}
