//! End-to-end tests for upserts and the store's concurrency contract.

use std::sync::Arc;
use std::thread;

use graph_engine::model::attrs;
use graph_engine::{
    Edge, ExpandRequest, GraphEngine, GraphService, GraphStore, Node, StoreStats, TimeWindow,
};

// ============================================================================
// 1. Node upsert semantics
// ============================================================================

#[tokio::test]
async fn test_identical_node_upsert_is_idempotent() {
    let engine = GraphEngine::new();
    let node = Node::new("ent:ADA", "entity").with_timestamp(7).with_attr("name", "Ada");

    engine.upsert_nodes(vec![node.clone()]).await.unwrap();
    engine.upsert_nodes(vec![node.clone()]).await.unwrap();

    assert_eq!(engine.store().node_count(), 1);
    assert_eq!(engine.store().get_node("ent:ADA"), Some(node));
}

#[tokio::test]
async fn test_second_upsert_overwrites_attributes() {
    let engine = GraphEngine::new();
    engine.upsert_nodes(vec![
        Node::new("X", "entity").with_attr("name", "first").with_attr("lang", "en"),
    ]).await.unwrap();
    engine.upsert_nodes(vec![Node::new("X", "entity").with_attr("name", "second")]).await.unwrap();

    let x = engine.store().get_node("X").unwrap();
    assert_eq!(engine.store().node_count(), 1);
    assert_eq!(x.attributes, attrs([("name", "second")]));
}

#[tokio::test]
async fn test_last_write_wins_within_batch() {
    let engine = GraphEngine::new();
    engine.upsert_nodes(vec![
        Node::new("X", "entity").with_timestamp(1),
        Node::new("X", "entity").with_timestamp(2),
    ]).await.unwrap();

    assert_eq!(engine.store().get_node("X").unwrap().timestamp, 2);
}

// ============================================================================
// 2. All-or-nothing batches
// ============================================================================

#[tokio::test]
async fn test_rejected_node_batch_leaves_store_unchanged() {
    let engine = GraphEngine::new();
    engine.upsert_nodes(vec![Node::new("keep", "entity").with_attr("v", "1")]).await.unwrap();
    let before = engine.store().stats();

    let mut batch: Vec<Node> = (0..10).map(|i| Node::new(format!("n{i}"), "entity")).collect();
    batch.push(Node::new("keep", "entity").with_attr("v", "2"));
    batch.insert(3, Node::new("", "entity"));

    let err = engine.upsert_nodes(batch).await.unwrap_err();
    assert_eq!(err.code(), "INVALID_ARGUMENT");
    assert_eq!(engine.store().stats(), before);
    assert_eq!(engine.store().get_node("keep").unwrap().get("v"), Some("1"));
}

#[tokio::test]
async fn test_rejected_edge_batch_leaves_store_unchanged() {
    let engine = GraphEngine::new();

    let mut batch: Vec<Edge> = (0..10).map(|i| Edge::new("hub", format!("n{i}"), "R")).collect();
    batch.push(Edge::new("hub", "", "R"));

    assert!(engine.upsert_edges(batch).await.is_err());
    assert_eq!(engine.store().stats(), StoreStats::default());
    assert_eq!(engine.store().degree("hub"), 0);
}

// ============================================================================
// 3. Edge append semantics
// ============================================================================

#[tokio::test]
async fn test_equal_edges_accumulate() {
    let engine = GraphEngine::new();
    let edge = Edge::new("ent:A", "doc:1", "MENTION").with_timestamp(3);
    for _ in 0..3 {
        engine.upsert_edges(vec![edge.clone()]).await.unwrap();
    }

    let stats = engine.stats().await.unwrap();
    assert_eq!(stats.edges, 3);
    assert_eq!(stats.nodes, 0);
    assert_eq!(stats.indexed_ids, 2);
}

// ============================================================================
// 4. Concurrent readers and writers
// ============================================================================

/// Writers append edge pairs incident to a hub in single batches. Readers
/// must never observe half a batch.
#[test]
fn test_readers_never_see_partial_batches() {
    let engine = GraphEngine::with_store(Arc::new(GraphStore::new()));
    engine.store().upsert_nodes(vec![Node::new("hub", "entity")]).unwrap();

    thread::scope(|scope| {
        for w in 0..4 {
            let engine = engine.clone();
            scope.spawn(move || {
                for i in 0..200 {
                    let leaf = format!("w{w}-{i}");
                    engine.store().upsert_edges(vec![
                        Edge::new("hub", leaf.clone(), "R").with_timestamp(1),
                        Edge::new(leaf, "hub", "R").with_timestamp(1),
                    ]).unwrap();
                }
            });
        }

        for _ in 0..4 {
            let engine = engine.clone();
            scope.spawn(move || {
                let request = ExpandRequest::new(["hub"], TimeWindow::all(), 1);
                for _ in 0..200 {
                    let frag = engine.expand(&request, None).unwrap();
                    assert_eq!(frag.edges.len() % 2, 0, "saw half of a batch");
                }
            });
        }
    });

    assert_eq!(engine.store().edge_count(), 4 * 200 * 2);
    assert_eq!(engine.store().degree("hub"), 4 * 200 * 2);
}
