//! Node in the entity/document graph.

use serde::{Deserialize, Serialize};
use super::Attributes;

/// A graph vertex representing an entity or a document.
///
/// `id` is the stable external key (e.g. `"ent:FOXCONN"`, `"doc:42"`).
/// Upserting a node with an existing id replaces everything else wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    /// Epoch milliseconds, as defined by the producer.
    #[serde(rename = "ts", default)]
    pub timestamp: i64,
    #[serde(rename = "attrs", default)]
    pub attributes: Attributes,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            timestamp: 0,
            attributes: Attributes::new(),
        }
    }

    pub fn with_timestamp(mut self, ts: i64) -> Self {
        self.timestamp = ts;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}
