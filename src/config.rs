//! Server configuration.
//!
//! Read from command-line flags, each with an environment fallback:
//!
//! | Flag | Env | Default |
//! |------|-----|---------|
//! | `--listen` | `GRAPH_ENGINE_ADDR` | `0.0.0.0:50061` |
//! | `--max-frame-bytes` | `GRAPH_ENGINE_MAX_FRAME_BYTES` | 64 MiB |
//! | `--expand-timeout-ms` | `GRAPH_ENGINE_EXPAND_TIMEOUT_MS` | none |
//! | `--bootstrap` | `GRAPH_ENGINE_BOOTSTRAP` | none |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::service::wire::DEFAULT_MAX_FRAME_BYTES;
use crate::{Error, Result};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:50061";

#[derive(Debug, Clone, Parser)]
#[command(name = "graph-engine", version, about = "In-memory news graph with time-windowed expansion")]
pub struct ServerConfig {
    /// Address to bind the TCP listener to.
    #[arg(long = "listen", env = "GRAPH_ENGINE_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Largest accepted request frame, in bytes.
    #[arg(long, env = "GRAPH_ENGINE_MAX_FRAME_BYTES", default_value_t = DEFAULT_MAX_FRAME_BYTES)]
    pub max_frame_bytes: usize,

    /// Cancel expansions that run longer than this.
    #[arg(long, env = "GRAPH_ENGINE_EXPAND_TIMEOUT_MS")]
    pub expand_timeout_ms: Option<u64>,

    /// JSON-lines upsert stream to replay before accepting connections.
    #[arg(long, env = "GRAPH_ENGINE_BOOTSTRAP")]
    pub bootstrap: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 50061)),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            expand_timeout_ms: None,
            bootstrap: None,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_frame_bytes == 0 {
            return Err(Error::InvalidArgument("max_frame_bytes must be positive".into()));
        }
        if self.max_frame_bytes > u32::MAX as usize {
            return Err(Error::InvalidArgument(format!(
                "max_frame_bytes {} exceeds the 4-byte length prefix",
                self.max_frame_bytes
            )));
        }
        if self.expand_timeout_ms == Some(0) {
            return Err(Error::InvalidArgument("expand_timeout_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn expand_timeout(&self) -> Option<Duration> {
        self.expand_timeout_ms.map(Duration::from_millis)
    }
}
