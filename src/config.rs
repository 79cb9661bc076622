//! Configuration for kvbench
//!
//! Centralized configuration with sensible defaults. A `BenchConfig` is built
//! once (from CLI flags, an optional TOML file, or the builder) and handed to
//! the driver, which shares it read-only with every worker.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{BenchError, Result};

/// Default TCP port of the key-value server
pub const DEFAULT_PORT: u16 = 12346;

/// Main configuration for a benchmark run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    // -------------------------------------------------------------------------
    // Target Configuration
    // -------------------------------------------------------------------------
    /// Which client implementation to use
    pub client_kind: ClientKind,

    /// Server host name or IP address
    pub server: String,

    /// Server TCP port
    pub port: u16,

    /// Connection read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Workload Configuration
    // -------------------------------------------------------------------------
    /// Total number of requests across all connections
    pub total_requests: usize,

    /// Size of the SET/GET value filler in bytes
    pub value_size: usize,

    /// Number of parallel connections (one worker each)
    pub connections: usize,

    /// Operation mode
    pub operation: Operation,

    /// Key space bound: keys are drawn from `0..key_space` when non-zero,
    /// otherwise every request uses a unique sequential key
    pub key_space: u64,

    /// Pipeline length; values <= 1 disable pipelining
    pub pipeline: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            client_kind: ClientKind::Tcp,
            server: "localhost".to_string(),
            port: DEFAULT_PORT,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            total_requests: 1000,
            value_size: 1000,
            connections: 1,
            operation: Operation::Set,
            key_space: 0,
            pipeline: 1,
        }
    }
}

impl BenchConfig {
    /// Create a new config builder
    pub fn builder() -> BenchConfigBuilder {
        BenchConfigBuilder::default()
    }

    /// Load a config from a TOML file; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BenchError::Config(format!("failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
            .map_err(|e| BenchError::Config(format!("'{}': {}", path.display(), e)))
    }

    /// Parse a config from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| BenchError::Config(e.to_string()))
    }

    /// `host:port` of the target server
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }

    /// Number of requests each worker issues
    ///
    /// The remainder of an uneven split is not issued, so sequential keys
    /// `id * per_worker + i` stay disjoint across workers.
    pub fn requests_per_worker(&self) -> usize {
        self.total_requests / self.connections.max(1)
    }

    /// Whether requests are batched into pipelines
    pub fn is_pipelined(&self) -> bool {
        self.pipeline > 1
    }

    /// Reject configurations the driver cannot run
    pub fn validate(&self) -> Result<()> {
        if self.connections == 0 {
            return Err(BenchError::Config(
                "connection count must be at least 1".to_string(),
            ));
        }
        if self.server.is_empty() {
            return Err(BenchError::Config("server address is empty".to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for BenchConfig
#[derive(Default)]
pub struct BenchConfigBuilder {
    config: BenchConfig,
}

impl BenchConfigBuilder {
    /// Start from an existing config (e.g. one loaded from a file)
    pub fn from_config(config: BenchConfig) -> Self {
        Self { config }
    }

    pub fn client_kind(mut self, kind: ClientKind) -> Self {
        self.config.client_kind = kind;
        self
    }

    /// Set the server host
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.config.server = server.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the total number of requests
    pub fn total_requests(mut self, total: usize) -> Self {
        self.config.total_requests = total;
        self
    }

    /// Set the value size in bytes
    pub fn value_size(mut self, size: usize) -> Self {
        self.config.value_size = size;
        self
    }

    /// Set the number of parallel connections
    pub fn connections(mut self, count: usize) -> Self {
        self.config.connections = count;
        self
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.config.operation = operation;
        self
    }

    /// Set the key space bound (0 = sequential keys)
    pub fn key_space(mut self, bound: u64) -> Self {
        self.config.key_space = bound;
        self
    }

    /// Set the pipeline length
    pub fn pipeline(mut self, len: usize) -> Self {
        self.config.pipeline = len;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> BenchConfig {
        self.config
    }
}

// =============================================================================
// Named Settings
// =============================================================================

/// Operation mode for a benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Operation {
    Get,
    Set,
    Del,
    /// Each request independently picks GET or SET with equal probability
    Mixed,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Set => "set",
            Operation::Del => "del",
            Operation::Mixed => "mixed",
        }
    }
}

impl FromStr for Operation {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Operation::Get),
            "set" => Ok(Operation::Set),
            "del" => Ok(Operation::Del),
            "mixed" => Ok(Operation::Mixed),
            _ => Err(BenchError::UnknownOperation(s.to_string())),
        }
    }
}

impl TryFrom<String> for Operation {
    type Error = BenchError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client implementation selected by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ClientKind {
    /// Length-prefixed TCP protocol
    Tcp,
    /// Cache protocol client (not implemented)
    Redis,
    /// HTTP client (not implemented)
    Http,
}

impl ClientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientKind::Tcp => "tcp",
            ClientKind::Redis => "redis",
            ClientKind::Http => "http",
        }
    }
}

impl FromStr for ClientKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(ClientKind::Tcp),
            "redis" => Ok(ClientKind::Redis),
            "http" => Ok(ClientKind::Http),
            _ => Err(BenchError::UnsupportedClient(s.to_string())),
        }
    }
}

impl TryFrom<String> for ClientKind {
    type Error = BenchError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
