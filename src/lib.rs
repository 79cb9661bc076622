//! # kvbench
//!
//! A load-generating benchmark client for key-value stores speaking a
//! length-prefixed text protocol over TCP:
//! - GET/SET/DEL requests, one at a time or pipelined in batches
//! - One worker thread per connection, no shared state between workers
//! - Per-millisecond latency histograms merged into one report
//! - GET responses verified against the value the benchmark wrote
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Driver                                │
//! │            (spawn N workers, join, merge, report)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Worker 0   │   ...    │  Worker N   │
//!   │ BenchResult │          │ BenchResult │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          ▼                        ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Connection  │          │ Connection  │
//!   │   (codec)   │          │   (codec)   │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod client;
pub mod network;
pub mod bench;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BenchError, Result};
pub use config::{BenchConfig, ClientKind, Operation};
pub use client::{Client, Request};
pub use bench::{BenchResult, Report, RunSummary};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvbench
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
