//! Bench Module
//!
//! The concurrent benchmark: workers generate load over their own client,
//! the driver merges their latency histograms, the report summarises them.
//!
//! ## Flow
//! ```text
//!   BenchConfig ──► driver ──► Worker × N ──► BenchResult × N
//!                                                   │
//!                     Report ◄── merged BenchResult ◄┘
//! ```

mod driver;
mod report;
mod result;
mod worker;

pub use driver::{run, run_with, RunSummary};
pub use report::{PercentileRow, Report};
pub use result::{bucket_index, BenchResult, Classification, Statistic, BUCKET_WIDTH};
pub use worker::{classify, sequential_key, Worker};
