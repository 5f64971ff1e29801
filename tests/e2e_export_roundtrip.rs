//! Replay round-trip: dump a store → replay into a fresh store → expansions
//! agree.
//!
//! This is the rebuild path after a restart: the engine holds nothing on disk
//! and is refilled from the system of record through the upsert operations.

use graph_engine::export::{export_jsonl, replay_jsonl, ReplayStats, DEFAULT_BATCH_SIZE};
use graph_engine::{Edge, ExpandRequest, GraphEngine, GraphService, GraphStore, Node, TimeWindow};
use pretty_assertions::assert_eq;

/// Two entities, three documents, one dangling endpoint and a duplicate edge.
async fn seed_graph(engine: &GraphEngine) {
    engine.upsert_nodes(vec![
        Node::new("ent:TATA", "entity").with_attr("name", "TATA"),
        Node::new("ent:FOX", "entity").with_attr("name", "Foxconn"),
        Node::new("doc:1", "doc").with_timestamp(1_000).with_attr("title", "Plant opens"),
        Node::new("doc:2", "doc").with_timestamp(2_000).with_attr("title", "Supply deal"),
        Node::new("doc:3", "doc").with_timestamp(9_000),
    ]).await.unwrap();

    engine.upsert_edges(vec![
        Edge::new("ent:TATA", "doc:1", "about").with_timestamp(1_000),
        Edge::new("ent:FOX", "doc:1", "mentions").with_timestamp(1_000),
        Edge::new("ent:FOX", "doc:2", "about").with_timestamp(2_000).with_weight(2.5),
        Edge::new("doc:2", "doc:3", "related").with_timestamp(9_000).with_attr("shared", "2"),
        Edge::new("ent:TATA", "doc:missing", "mentions").with_timestamp(1_500),
    ]).await.unwrap();
    engine.upsert_edges(vec![
        Edge::new("ent:TATA", "doc:1", "about").with_timestamp(1_000),
    ]).await.unwrap();
}

#[tokio::test]
async fn test_dump_counts() {
    let engine = GraphEngine::new();
    seed_graph(&engine).await;

    let mut buf: Vec<u8> = Vec::new();
    let stats = export_jsonl(engine.store(), &mut buf, DEFAULT_BATCH_SIZE).unwrap();

    assert_eq!(stats, ReplayStats { batches: 2, nodes: 5, edges: 6 });
    assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 2);
}

#[tokio::test]
async fn test_replay_reproduces_store() {
    let original = GraphEngine::new();
    seed_graph(&original).await;

    let mut buf: Vec<u8> = Vec::new();
    export_jsonl(original.store(), &mut buf, 2).unwrap();

    let rebuilt = GraphStore::new();
    let stats = replay_jsonl(&rebuilt, buf.as_slice()).unwrap();
    assert_eq!((stats.nodes, stats.edges), (5, 6));
    assert_eq!(rebuilt.stats(), original.store().stats());

    for id in ["ent:TATA", "ent:FOX", "doc:1", "doc:2", "doc:3"] {
        assert_eq!(rebuilt.get_node(id), original.store().get_node(id), "node {id}");
    }
}

#[tokio::test]
async fn test_replayed_store_expands_identically() {
    let original = GraphEngine::new();
    seed_graph(&original).await;

    let mut buf: Vec<u8> = Vec::new();
    export_jsonl(original.store(), &mut buf, 3).unwrap();
    let rebuilt = GraphEngine::new();
    replay_jsonl(rebuilt.store(), buf.as_slice()).unwrap();

    let windows = [TimeWindow::all(), TimeWindow::new(0, 1_500), TimeWindow::new(2_000, 9_000)];
    for window in windows {
        for hops in 0..4 {
            let request = ExpandRequest::new(["ent:TATA", "ent:FOX"], window, hops);
            assert_eq!(
                rebuilt.expand_time_window(request.clone()).await.unwrap(),
                original.expand_time_window(request).await.unwrap(),
            );
        }
    }
}
