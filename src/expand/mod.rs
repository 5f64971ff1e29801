//! # Windowed Expansion
//!
//! Multi-seed, time-filtered, hop-bounded breadth-first search over a
//! [`StoreSnapshot`].
//!
//! Traversal is undirected: an edge is walked from whichever endpoint is
//! being expanded, although the emitted copy keeps its stored direction.
//!
//! ## Ordering
//!
//! Results are reproducible for a fixed store and input. Seeds are visited in
//! the order given; at each node, incident edges are considered in adjacency
//! insertion order. Nodes come out in BFS discovery order.
//!
//! ## Emission rules
//!
//! - A dequeued id is emitted as a node only if it has a node record.
//!   Dangling ids are walked through but never emitted as nodes.
//! - Nodes at `max_hops` are emitted but not expanded.
//! - An edge outside the window is skipped entirely: not emitted, not walked.
//! - Each stored edge is emitted at most once, from the first of its
//!   endpoints to be expanded. Parallel edges are distinct and all emitted.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::model::{GraphFragment, TimeWindow};
use crate::storage::{EdgeHandle, StoreSnapshot};
use crate::{Error, Result};

// ============================================================================
// Request
// ============================================================================

/// Parameters of one expansion. Also the wire shape of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandRequest {
    pub seed_ids: Vec<String>,
    pub window: TimeWindow,
    pub max_hops: u32,
}

impl ExpandRequest {
    pub fn new(seed_ids: impl IntoIterator<Item = impl Into<String>>, window: TimeWindow, max_hops: u32) -> Self {
        Self {
            seed_ids: seed_ids.into_iter().map(Into::into).collect(),
            window,
            max_hops,
        }
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Cooperative cancellation flag, checked once per dequeued node.
///
/// Clones share the flag. Cancelling a read-only traversal is always safe.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ============================================================================
// Expansion
// ============================================================================

/// Run the expansion against a consistent snapshot.
///
/// Fails with [`Error::InvalidArgument`] for an inverted window and with
/// [`Error::Cancelled`] if `cancel` trips mid-traversal. Unknown seeds are
/// not an error; they just contribute nothing.
pub fn expand(
    snapshot: &StoreSnapshot<'_>,
    query: &ExpandRequest,
    cancel: Option<&CancelToken>,
) -> Result<GraphFragment> {
    query.window.validate()?;

    let mut fragment = GraphFragment::default();
    let mut visited: HashSet<&str> = HashSet::with_capacity(query.seed_ids.len());
    let mut emitted: HashSet<EdgeHandle> = HashSet::new();
    let mut queue: VecDeque<(&str, u32)> = VecDeque::new();

    for seed in &query.seed_ids {
        if visited.insert(seed.as_str()) {
            queue.push_back((seed.as_str(), 0));
        }
    }

    while let Some((id, depth)) = queue.pop_front() {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            tracing::debug!(
                nodes = fragment.nodes.len(),
                edges = fragment.edges.len(),
                "expansion cancelled"
            );
            return Err(Error::Cancelled);
        }

        if let Some(node) = snapshot.node(id) {
            fragment.nodes.push(node.clone());
        }

        if depth >= query.max_hops {
            continue;
        }

        for &handle in snapshot.incident(id) {
            let edge = snapshot.edge(handle).ok_or_else(|| {
                Error::Internal(format!("adjacency of {id:?} references missing edge {handle}"))
            })?;

            if !query.window.contains(edge.timestamp) {
                continue;
            }

            if emitted.insert(handle) {
                fragment.edges.push(edge.clone());
            }

            let far = edge.other_end(id).ok_or_else(|| {
                Error::Internal(format!("edge {handle} indexed under {id:?} does not touch it"))
            })?;
            if visited.insert(far) {
                queue.push_back((far, depth + 1));
            }
        }
    }

    Ok(fragment)
}

// ============================================================================
// Tests
// ============================================================================
