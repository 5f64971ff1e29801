//! GraphFragment — the bounded subgraph returned by an expansion.

use serde::{Deserialize, Serialize};
use super::{Edge, Node};

/// Nodes in BFS discovery order, edges in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphFragment {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphFragment {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// `(src, dst)` pairs of the emitted edges.
    pub fn edge_pairs(&self) -> Vec<(&str, &str)> {
        self.edges.iter().map(|e| (e.src.as_str(), e.dst.as_str())).collect()
    }
}
