//! In-memory graph store.
//!
//! HashMaps plus an append-only edge log, all behind one `parking_lot::RwLock`.
//!
//! ## Semantics
//!
//! - **Nodes are upserted**: an existing id is replaced wholesale.
//! - **Edges are appended**: no identity, no deduplication. Ingesting the same
//!   relation twice stores it twice.
//! - **Dangling endpoints are fine**: an edge may name ids that were never
//!   upserted as nodes. Those ids still get adjacency entries.
//! - **Batches are all-or-nothing**: a batch is validated in full before the
//!   write lock is taken, so a rejected batch never touches the store.
//!
//! Nothing is persisted. A restarted process is rebuilt by replaying upserts
//! from the system of record (see [`crate::export`]).

use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard};

use crate::model::{Edge, Node};
use crate::{Error, Result};
use super::{EdgeHandle, StoreStats};

// ============================================================================
// StoreInner
// ============================================================================

/// The lock-protected contents of a [`GraphStore`].
///
/// Only reachable through a [`StoreSnapshot`] (shared) or from inside the
/// store's own write paths.
#[derive(Debug, Default)]
pub struct StoreInner {
    nodes: HashMap<String, Node>,
    edges: Vec<Edge>,
    /// node id → incident edges, in insertion order
    adjacency: HashMap<String, Vec<EdgeHandle>>,
}

impl StoreInner {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, handle: EdgeHandle) -> Option<&Edge> {
        self.edges.get(handle.0)
    }

    /// Edges incident to `id` in insertion order. Empty for unknown ids.
    pub fn incident(&self, id: &str) -> &[EdgeHandle] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All nodes, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    fn stats(&self) -> StoreStats {
        StoreStats {
            nodes: self.nodes.len() as u64,
            edges: self.edges.len() as u64,
            indexed_ids: self.adjacency.len() as u64,
        }
    }

    fn append_edge(&mut self, edge: Edge) {
        let handle = EdgeHandle(self.edges.len());
        self.adjacency.entry(edge.src.clone()).or_default().push(handle);
        if !edge.is_self_loop() {
            self.adjacency.entry(edge.dst.clone()).or_default().push(handle);
        }
        self.edges.push(edge);
    }
}

/// Shared read access to the store. Holding one blocks writers.
pub type StoreSnapshot<'a> = RwLockReadGuard<'a, StoreInner>;

// ============================================================================
// GraphStore
// ============================================================================

/// In-memory entity/document graph.
#[derive(Debug, Default)]
pub struct GraphStore {
    inner: RwLock<StoreInner>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the shared lock for a consistent view across several reads.
    pub fn read(&self) -> StoreSnapshot<'_> {
        self.inner.read()
    }

    /// Insert or replace nodes by id. Returns the number of records written.
    ///
    /// Fails with [`Error::InvalidArgument`] if any node has an empty id, in
    /// which case nothing is written.
    pub fn upsert_nodes(&self, nodes: Vec<Node>) -> Result<usize> {
        if let Some(pos) = nodes.iter().position(|n| n.id.is_empty()) {
            return Err(Error::InvalidArgument(format!(
                "node at index {pos} has an empty id"
            )));
        }

        let count = nodes.len();
        let mut inner = self.inner.write();
        inner.nodes.reserve(count);
        for node in nodes {
            inner.nodes.insert(node.id.clone(), node);
        }
        tracing::debug!(count, total = inner.nodes.len(), "upserted nodes");
        Ok(count)
    }

    /// Append edges and index each under both endpoints. Returns the number
    /// of records appended.
    ///
    /// Fails with [`Error::InvalidArgument`] if any edge has an empty `src`
    /// or `dst`, in which case nothing is written.
    pub fn upsert_edges(&self, edges: Vec<Edge>) -> Result<usize> {
        if let Some(pos) = edges.iter().position(|e| e.src.is_empty() || e.dst.is_empty()) {
            return Err(Error::InvalidArgument(format!(
                "edge at index {pos} has an empty endpoint"
            )));
        }

        let count = edges.len();
        let mut inner = self.inner.write();
        inner.edges.reserve(count);
        for edge in edges {
            inner.append_edge(edge);
        }
        tracing::debug!(count, total = inner.edges.len(), "appended edges");
        Ok(count)
    }

    pub fn get_node(&self, id: &str) -> Option<Node> {
        self.inner.read().node(id).cloned()
    }

    /// Number of edges incident to `id`, counting each self-loop once.
    pub fn degree(&self, id: &str) -> usize {
        self.inner.read().incident(id).len()
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.read().edge_count()
    }

    pub fn stats(&self) -> StoreStats {
        self.inner.read().stats()
    }
}

// ============================================================================
// Tests
// ============================================================================
