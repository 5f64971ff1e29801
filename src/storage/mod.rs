//! # Graph Store
//!
//! The single owner of every [`Node`](crate::model::Node) and
//! [`Edge`](crate::model::Edge) record in the process.
//!
//! ```text
//! GraphStore
//!   └─ RwLock<StoreInner>
//!        ├─ nodes:     id → Node              (last write wins)
//!        ├─ edges:     Vec<Edge>              (append-only log)
//!        └─ adjacency: id → Vec<EdgeHandle>   (both endpoints, insertion order)
//! ```
//!
//! One lock covers all three structures. Upserts hold it exclusively for the
//! duration of a batch; expansions share it. A traversal therefore never sees
//! a half-appended adjacency list or a partially applied batch.

pub mod memory;

use serde::{Deserialize, Serialize};

pub use memory::{GraphStore, StoreInner, StoreSnapshot};

// ============================================================================
// Edge handles
// ============================================================================

/// Stable reference to an edge in the store's edge log.
///
/// The log is append-only and never compacted, so a handle stays valid for
/// the lifetime of the store. If deletion is ever added this must become a
/// generation-tagged handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeHandle(pub usize);

impl std::fmt::Display for EdgeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Point-in-time counts, served to admin dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Upserted node records.
    pub nodes: u64,
    /// Stored edge records, duplicates included.
    pub edges: u64,
    /// Distinct ids present in the adjacency index, dangling ones included.
    pub indexed_ids: u64,
}
