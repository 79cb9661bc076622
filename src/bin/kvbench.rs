//! kvbench CLI
//!
//! Runs a benchmark against a key-value server and prints the report.

use std::path::PathBuf;

use clap::Parser;
use kvbench::config::BenchConfigBuilder;
use kvbench::{bench, BenchConfig, ClientKind, Operation, Report};
use tracing_subscriber::{fmt, EnvFilter};

/// kvbench
#[derive(Parser, Debug)]
#[command(name = "kvbench")]
#[command(about = "Benchmark client for length-prefixed TCP key-value stores")]
#[command(version)]
struct Args {
    /// TOML config file; flags given on the command line take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Client type (tcp, redis, http)
    #[arg(long = "type")]
    client_kind: Option<ClientKind>,

    /// Server address
    #[arg(short = 'H', long = "host")]
    server: Option<String>,

    /// Server port
    #[arg(long)]
    port: Option<u16>,

    /// Total number of requests
    #[arg(short = 'n', long)]
    requests: Option<usize>,

    /// Data size of SET/GET value in bytes
    #[arg(short = 'd', long)]
    data_size: Option<usize>,

    /// Number of parallel connections
    #[arg(short = 'c', long)]
    connections: Option<usize>,

    /// Operation: get, set, del or mixed
    #[arg(short = 't', long)]
    operation: Option<Operation>,

    /// Key space length; random keys from 0 to (key-space - 1), 0 = sequential keys
    #[arg(short = 'r', long)]
    key_space: Option<u64>,

    /// Pipeline length
    #[arg(short = 'p', long)]
    pipeline: Option<usize>,
}

impl Args {
    /// Layer command-line flags over the config file (or the defaults)
    fn into_config(self) -> kvbench::Result<BenchConfig> {
        let base = match &self.config {
            Some(path) => BenchConfig::from_file(path)?,
            None => BenchConfig::default(),
        };

        let mut builder = BenchConfigBuilder::from_config(base);
        if let Some(kind) = self.client_kind {
            builder = builder.client_kind(kind);
        }
        if let Some(server) = self.server {
            builder = builder.server(server);
        }
        if let Some(port) = self.port {
            builder = builder.port(port);
        }
        if let Some(n) = self.requests {
            builder = builder.total_requests(n);
        }
        if let Some(size) = self.data_size {
            builder = builder.value_size(size);
        }
        if let Some(c) = self.connections {
            builder = builder.connections(c);
        }
        if let Some(op) = self.operation {
            builder = builder.operation(op);
        }
        if let Some(r) = self.key_space {
            builder = builder.key_space(r);
        }
        if let Some(p) = self.pipeline {
            builder = builder.pipeline(p);
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvbench=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .init();

    let args = Args::parse();

    let config = match args.into_config() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!("kvbench v{} info:", kvbench::VERSION);
    println!("[cli-type]: {}", config.client_kind);
    println!("[target-server]: {}", config.server_addr());
    println!("[total-req]: {}", config.total_requests);
    println!("[data-size]: {}", config.value_size);
    println!("[conn-threads]: {}", config.connections);
    println!("[operation]: {}", config.operation);
    println!("[key-space-len]: {}", config.key_space);
    println!("[pipeline]: {}", config.pipeline);

    let value_size = config.value_size;
    match bench::run(config) {
        Ok(summary) => {
            println!("{}", Report::new(&summary.result, summary.elapsed, value_size));
        }
        Err(e) => {
            tracing::error!("Benchmark aborted: {}", e);
            std::process::exit(1);
        }
    }
}
