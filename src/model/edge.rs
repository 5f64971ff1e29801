//! Edge in the entity/document graph.

use serde::{Deserialize, Serialize};
use super::Attributes;

fn default_weight() -> f64 {
    1.0
}

/// A directed, typed, timestamped relation between two node ids.
///
/// Endpoints are plain ids and need not name an upserted [`Node`](super::Node).
/// Edges carry no identity: two equal edges are two distinct relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub src: String,
    pub dst: String,
    #[serde(rename = "type", default)]
    pub edge_type: String,
    /// Reserved for ranking. Traversal ignores it.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Epoch milliseconds. Compared against the expansion time window.
    #[serde(rename = "ts", default)]
    pub timestamp: i64,
    #[serde(rename = "attrs", default)]
    pub attributes: Attributes,
}

impl Edge {
    pub fn new(src: impl Into<String>, dst: impl Into<String>, edge_type: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            edge_type: edge_type.into(),
            weight: default_weight(),
            timestamp: 0,
            attributes: Attributes::new(),
        }
    }

    pub fn with_timestamp(mut self, ts: i64) -> Self {
        self.timestamp = ts;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The "other" end of the edge from the given node id.
    pub fn other_end(&self, from: &str) -> Option<&str> {
        if from == self.src { Some(&self.dst) }
        else if from == self.dst { Some(&self.src) }
        else { None }
    }

    pub fn is_self_loop(&self) -> bool {
        self.src == self.dst
    }
}
