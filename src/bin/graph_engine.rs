//! graph-engine server binary.
//!
//! Usage:
//!   graph-engine [--listen 0.0.0.0:50061] [--max-frame-bytes N]
//!                [--expand-timeout-ms MS] [--bootstrap graph.jsonl]
//!
//! Logging is controlled by `RUST_LOG` (default `graph_engine=info`) and
//! goes to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use graph_engine::ServerConfig;

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "graph_engine=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    init_tracing();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.listen_addr,
        max_frame_bytes = config.max_frame_bytes,
        expand_timeout_ms = ?config.expand_timeout_ms,
        "starting graph engine"
    );

    graph_engine::server::run(config)
        .await
        .context("graph engine server failed")
}
