//! JSON-lines dump and replay.
//!
//! The store is never persisted; it is rebuilt by replaying upserts. This
//! module writes and reads that replay stream. Every line is one upsert batch
//! in the same shape as the wire requests:
//!
//! ```text
//! {"nodes":[{"id":"ent:TATA","type":"entity","ts":0,"attrs":{"name":"TATA"}}, ...]}
//! {"edges":[{"src":"ent:TATA","dst":"doc:1","type":"MENTION","weight":1.0,"ts":5,"attrs":{}}, ...]}
//! ```
//!
//! Dumps list node batches first (sorted by id) and edge batches after, in
//! edge insertion order, so replaying a dump into an empty store reproduces
//! the adjacency order and therefore the expansion results.

use std::io::{BufRead, Write};

use serde::Deserialize;

use crate::model::{Edge, Node};
use crate::service::{UpsertEdgesRequest, UpsertNodesRequest};
use crate::storage::GraphStore;
use crate::{Error, Result};

/// Records per line when dumping.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Counts of what was written or applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub batches: usize,
    pub nodes: usize,
    pub edges: usize,
}

/// One replay line. Exactly one of the two keys must be present.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Batch {
    #[serde(default)]
    nodes: Option<Vec<Node>>,
    #[serde(default)]
    edges: Option<Vec<Edge>>,
}

/// Dump the whole store under a single read lock.
pub fn export_jsonl(store: &GraphStore, writer: &mut dyn Write, batch_size: usize) -> Result<ReplayStats> {
    if batch_size == 0 {
        return Err(Error::InvalidArgument("batch_size must be positive".into()));
    }

    let snapshot = store.read();
    let mut stats = ReplayStats::default();

    let mut nodes: Vec<&Node> = snapshot.nodes().collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));
    for chunk in nodes.chunks(batch_size) {
        let batch = UpsertNodesRequest { nodes: chunk.iter().map(|n| (*n).clone()).collect() };
        serde_json::to_writer(&mut *writer, &batch)?;
        writeln!(writer)?;
        stats.batches += 1;
        stats.nodes += chunk.len();
    }

    let edges: Vec<&Edge> = snapshot.edges().collect();
    for chunk in edges.chunks(batch_size) {
        let batch = UpsertEdgesRequest { edges: chunk.iter().map(|e| (*e).clone()).collect() };
        serde_json::to_writer(&mut *writer, &batch)?;
        writeln!(writer)?;
        stats.batches += 1;
        stats.edges += chunk.len();
    }

    writer.flush()?;
    Ok(stats)
}

/// Apply a replay stream through the regular upsert paths.
///
/// Each line is applied atomically; the stream as a whole is not. On error,
/// lines before the failing one have already been applied.
pub fn replay_jsonl(store: &GraphStore, reader: impl BufRead) -> Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let batch: Batch = serde_json::from_str(line).map_err(|e| {
            Error::InvalidArgument(format!("line {}: {e}", index + 1))
        })?;

        match (batch.nodes, batch.edges) {
            (Some(nodes), None) => stats.nodes += store.upsert_nodes(nodes).map_err(|e| at_line(index, e))?,
            (None, Some(edges)) => stats.edges += store.upsert_edges(edges).map_err(|e| at_line(index, e))?,
            (Some(_), Some(_)) => {
                return Err(Error::InvalidArgument(format!(
                    "line {}: batch carries both nodes and edges",
                    index + 1
                )));
            }
            (None, None) => {
                return Err(Error::InvalidArgument(format!(
                    "line {}: batch carries neither nodes nor edges",
                    index + 1
                )));
            }
        }
        stats.batches += 1;
    }

    tracing::debug!(?stats, "replay complete");
    Ok(stats)
}

fn at_line(index: usize, err: Error) -> Error {
    match err {
        Error::InvalidArgument(msg) => Error::InvalidArgument(format!("line {}: {msg}", index + 1)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_batches() {
        let store = GraphStore::new();
        store.upsert_nodes((0..5).map(|i| Node::new(format!("n{i}"), "entity")).collect()).unwrap();
        store.upsert_edges(vec![Edge::new("n0", "n1", "R"), Edge::new("n1", "n2", "R")]).unwrap();

        let mut buf: Vec<u8> = Vec::new();
        let stats = export_jsonl(&store, &mut buf, 2).unwrap();
        assert_eq!(stats, ReplayStats { batches: 4, nodes: 5, edges: 2 });

        let dump = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with(r#"{"nodes":[{"id":"n0""#));
        assert!(lines[3].starts_with(r#"{"edges":"#));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let store = GraphStore::new();
        assert!(export_jsonl(&store, &mut Vec::<u8>::new(), 0).is_err());
    }

    #[test]
    fn test_replay_skips_blank_lines() {
        let input = "\n{\"nodes\":[{\"id\":\"a\",\"type\":\"entity\"}]}\n\n{\"edges\":[{\"src\":\"a\",\"dst\":\"b\"}]}\n";
        let store = GraphStore::new();
        let stats = replay_jsonl(&store, input.as_bytes()).unwrap();

        assert_eq!(stats, ReplayStats { batches: 2, nodes: 1, edges: 1 });
        assert_eq!(store.degree("b"), 1);
    }

    #[test]
    fn test_replay_reports_line_of_invalid_batch() {
        let input = "{\"nodes\":[{\"id\":\"a\"}]}\n{\"nodes\":[{\"id\":\"\"}]}\n";
        let store = GraphStore::new();
        let err = replay_jsonl(&store, input.as_bytes()).unwrap_err();

        match err {
            Error::InvalidArgument(msg) => assert!(msg.starts_with("line 2:"), "{msg}"),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn test_replay_rejects_garbage() {
        let store = GraphStore::new();
        let err = replay_jsonl(&store, "not json\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    fn expect_line_error(input: &str, line: usize) {
        let store = GraphStore::new();
        match replay_jsonl(&store, input.as_bytes()) {
            Err(Error::InvalidArgument(msg)) => assert!(msg.starts_with(&format!("line {line}:")), "{msg}"),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_replay_rejects_mixed_batch() {
        let input = r#"{"nodes":[{"id":"a"}],"edges":[{"src":"a","dst":"b"}]}"#;
        expect_line_error(input, 1);

        let store = GraphStore::new();
        let _ = replay_jsonl(&store, input.as_bytes());
        assert_eq!((store.node_count(), store.edge_count()), (0, 0));
    }

    #[test]
    fn test_replay_rejects_empty_batch() {
        expect_line_error("{}\n", 1);
    }

    #[test]
    fn test_replay_rejects_unknown_keys() {
        expect_line_error("{\"nodes\":[]}\n{\"nodes\":[],\"extra\":1}\n", 2);
        expect_line_error("{\"extra\":1}\n", 1);
    }
}
