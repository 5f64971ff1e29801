//! # Graph Service
//!
//! The remote-callable boundary of the engine.
//!
//! | Operation | Lock | Effect |
//! |-----------|------|--------|
//! | `upsert_nodes` | exclusive | insert or replace nodes by id |
//! | `upsert_edges` | exclusive | append edges, index both endpoints |
//! | `expand_time_window` | shared | read-only windowed BFS |
//! | `stats` | shared | node/edge counts |
//! | `ping` | none | liveness |
//!
//! ## Implementations
//!
//! | Type | Module | Description |
//! |------|--------|-------------|
//! | `GraphEngine` | here | In-process, owns the store |
//! | `RemoteGraph` | `client` | TCP client for a running `graph-engine` server |

pub mod wire;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::expand::{self, CancelToken, ExpandRequest};
use crate::model::{Edge, GraphFragment, Node};
use crate::storage::{GraphStore, StoreStats};
use crate::Result;

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpsertNodesRequest {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpsertEdgesRequest {
    pub edges: Vec<Edge>,
}

/// Acknowledgement of a write or a ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

// ============================================================================
// GraphService Trait
// ============================================================================

/// The service contract shared by the in-process engine and the TCP client.
///
/// Every operation either succeeds as a whole or fails with no effect.
#[async_trait]
pub trait GraphService: Send + Sync + 'static {
    /// Insert or replace nodes. Rejects the batch if any id is empty.
    async fn upsert_nodes(&self, nodes: Vec<Node>) -> Result<Ack>;

    /// Append edges. Rejects the batch if any endpoint is empty.
    async fn upsert_edges(&self, edges: Vec<Edge>) -> Result<Ack>;

    /// Windowed multi-seed expansion. Rejects an inverted window.
    async fn expand_time_window(&self, request: ExpandRequest) -> Result<GraphFragment>;

    async fn stats(&self) -> Result<StoreStats>;

    async fn ping(&self) -> Result<Ack> {
        Ok(Ack::ok())
    }
}

// ============================================================================
// GraphEngine
// ============================================================================

/// In-process engine. Cheap to clone; clones share one store.
///
/// Created once by the owning process and dropped with it.
///
/// The [`GraphService`] impl runs each operation inline on the calling task
/// and may wait on the store lock there. It suits tests and embedders with
/// small batches; async servers should hand store work to a blocking pool,
/// as `server::dispatch` does.
#[derive(Debug, Clone, Default)]
pub struct GraphEngine {
    store: Arc<GraphStore>,
}

impl GraphEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<GraphStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Blocking expansion under the shared lock, with optional cancellation.
    pub fn expand(&self, request: &ExpandRequest, cancel: Option<&CancelToken>) -> Result<GraphFragment> {
        let snapshot = self.store.read();
        expand::expand(&snapshot, request, cancel)
    }
}

#[async_trait]
impl GraphService for GraphEngine {
    async fn upsert_nodes(&self, nodes: Vec<Node>) -> Result<Ack> {
        self.store.upsert_nodes(nodes)?;
        Ok(Ack::ok())
    }

    async fn upsert_edges(&self, edges: Vec<Edge>) -> Result<Ack> {
        self.store.upsert_edges(edges)?;
        Ok(Ack::ok())
    }

    async fn expand_time_window(&self, request: ExpandRequest) -> Result<GraphFragment> {
        self.expand(&request, None)
    }

    async fn stats(&self) -> Result<StoreStats> {
        Ok(self.store.stats())
    }
}

// ============================================================================
// Tests
// ============================================================================
