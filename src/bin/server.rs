//! kvbench Reference Server
//!
//! In-memory key-value server speaking the benchmark wire protocol, for
//! running kvbench locally.

use clap::Parser;
use kvbench::config::DEFAULT_PORT;
use kvbench::network::Server;
use tracing_subscriber::{fmt, EnvFilter};

/// kvbench reference server
#[derive(Parser, Debug)]
#[command(name = "kvbench-server")]
#[command(about = "In-memory key-value server for the kvbench wire protocol")]
#[command(version)]
struct Args {
    /// Listen host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Listen port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvbench=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let addr = format!("{}:{}", args.host, args.port);

    tracing::info!("kvbench server v{}", kvbench::VERSION);

    let server = match Server::bind(&addr) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
