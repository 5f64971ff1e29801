//! # graph-engine — In-memory News Graph with Windowed Expansion
//!
//! A mutable entity/document property graph fed by an ingestion pipeline and
//! queried by a dashboard gateway. The only query is a multi-seed,
//! time-filtered, hop-bounded breadth-first expansion.
//!
//! ## Design Principles
//!
//! 1. **One owner**: [`GraphStore`] owns every record; callers only ever get copies
//! 2. **One lock**: a single reader/writer lock covers nodes, edges and adjacency
//! 3. **Pure queries**: expansion is a function of store state plus parameters
//! 4. **Trait at the seam**: [`GraphService`] is served in-process by [`GraphEngine`]
//!    and over TCP by `RemoteGraph`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use graph_engine::{GraphEngine, GraphService, Node, Edge, ExpandRequest, TimeWindow};
//!
//! # async fn example() -> graph_engine::Result<()> {
//! let engine = GraphEngine::new();
//!
//! engine.upsert_nodes(vec![
//!     Node::new("ent:FOXCONN", "entity").with_attr("name", "Foxconn"),
//!     Node::new("doc:1", "doc").with_timestamp(1_700_000_000_000),
//! ]).await?;
//! engine.upsert_edges(vec![
//!     Edge::new("ent:FOXCONN", "doc:1", "MENTION").with_timestamp(1_700_000_000_000),
//! ]).await?;
//!
//! let fragment = engine.expand_time_window(ExpandRequest {
//!     seed_ids: vec!["ent:FOXCONN".into()],
//!     window: TimeWindow::all(),
//!     max_hops: 2,
//! }).await?;
//! assert_eq!(fragment.nodes.len(), 2);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod storage;
pub mod expand;
pub mod service;
pub mod export;
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod server;
#[cfg(feature = "server")]
pub mod client;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{Node, Edge, Attributes, TimeWindow, GraphFragment};
pub use storage::{GraphStore, EdgeHandle, StoreStats};
pub use expand::{ExpandRequest, CancelToken};
pub use service::{GraphService, GraphEngine, Ack, UpsertNodesRequest, UpsertEdgesRequest};

#[cfg(feature = "server")]
pub use config::ServerConfig;
#[cfg(feature = "server")]
pub use client::RemoteGraph;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was rejected as a whole. Nothing was applied.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A store invariant does not hold. Unreachable while validation holds.
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Expansion cancelled")]
    Cancelled,

    /// Malformed frame or message on the wire.
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable code carried by error responses on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "INVALID_ARGUMENT",
            Error::Internal(_) => "INTERNAL",
            Error::Cancelled => "CANCELLED",
            Error::Protocol(_) | Error::Json(_) => "PROTOCOL",
            Error::Io(_) => "IO",
        }
    }

    /// The message without the variant prefix, as sent on the wire.
    pub fn detail(&self) -> String {
        match self {
            Error::InvalidArgument(m) | Error::Internal(m) | Error::Protocol(m) => m.clone(),
            other => other.to_string(),
        }
    }

    /// Rebuild an error from a wire code and message.
    pub fn from_code(code: &str, message: String) -> Self {
        match code {
            "INVALID_ARGUMENT" => Error::InvalidArgument(message),
            "CANCELLED" => Error::Cancelled,
            "PROTOCOL" => Error::Protocol(message),
            "IO" => Error::Io(std::io::Error::other(message)),
            _ => Error::Internal(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
