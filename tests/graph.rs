//! Tests for the GraphStore mutation primitives and transactions.
mod common;
use common::*;
use stepflow::prelude::*;

#[test]
fn test_add_and_lookup() {
    let mut store = GraphStore::with_start("start", Position::default());
    store.add_node(node("A", "email")).unwrap();
    store.add_edge(edge("e1", "start", "A")).unwrap();

    assert_eq!(store.start_node().map(|n| n.id.as_str()), Some("start"));
    assert_eq!(store.outgoing("start").count(), 1);
    assert_eq!(store.incoming("A").count(), 1);
    assert!(store.has_outgoing("start"));
    assert!(!store.has_outgoing("A"));
    assert!(store.reaches("start", "A"));
    assert!(!store.reaches("A", "start"));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let mut store = create_store(create_linear_workflow());
    assert_eq!(
        store.add_node(node("A", "task")).unwrap_err(),
        GraphError::DuplicateNode("A".to_string())
    );
    assert_eq!(
        store.add_edge(edge("e1", "B", "C")).unwrap_err(),
        GraphError::DuplicateEdge("e1".to_string())
    );
}

#[test]
fn test_edge_endpoints_must_exist() {
    let mut store = create_store(create_linear_workflow());
    assert_eq!(
        store.add_edge(edge("e9", "A", "ghost")).unwrap_err(),
        GraphError::MissingEndpoint {
            edge_id: "e9".to_string(),
            missing_node_id: "ghost".to_string(),
        }
    );
}

#[test]
fn test_remove_node_leaves_edges_to_caller() {
    let mut store = create_store(create_linear_workflow());
    assert_eq!(store.remove_node("ghost"), None);

    let removed = store.remove_node("C").unwrap();
    assert_eq!(removed.id, "C");
    // The dangling edge is still there until the caller removes it.
    assert_eq!(store.edges().len(), 3);

    let edges = store.remove_edges(|e| e.target == "C");
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].id, "e3");
    assert_eq!(store.edges().len(), 2);
}

#[test]
fn test_allocated_ids_skip_existing() {
    let mut store = GraphStore::with_start("start", Position::default());
    store.add_node(node("step-1", "email")).unwrap();
    store.add_edge(edge("edge-1", "start", "step-1")).unwrap();

    assert_eq!(store.allocate_node_id(), "step-2");
    assert_eq!(store.allocate_edge_id(), "edge-2");
    assert_eq!(store.allocate_edge_ids(2), vec!["edge-3", "edge-4"]);
}

#[test]
fn test_transaction_applies_removals_before_additions() {
    let mut store = create_store(create_linear_workflow());
    let transaction = Transaction::new()
        .remove_node("B")
        .remove_edge("e2")
        .remove_edge("e3")
        .add_edge(edge("e4", "A", "C"));
    store.apply(transaction).unwrap();

    assert!(!store.contains_node("B"));
    assert_eq!(
        edge_triples(store.edges()),
        triples(&[("start", None, "A"), ("A", None, "C")])
    );
}

#[test]
fn test_invalid_transaction_changes_nothing() {
    let mut store = create_store(create_linear_workflow());
    let before = store.clone();

    // Removing B while keeping e3 would leave a dangling edge.
    let dangling = Transaction::new().remove_node("B").remove_edge("e2");
    assert!(matches!(
        store.apply(dangling),
        Err(GraphError::MissingEndpoint { .. })
    ));

    let unknown = Transaction::new()
        .add_node(node("D", "task"))
        .remove_edge("ghost");
    assert_eq!(
        store.apply(unknown).unwrap_err(),
        GraphError::EdgeNotFound("ghost".to_string())
    );

    let duplicate = Transaction::new()
        .add_node(node("D", "task"))
        .add_node(node("D", "wait"));
    assert_eq!(
        store.apply(duplicate).unwrap_err(),
        GraphError::DuplicateNode("D".to_string())
    );

    assert_eq!(store, before);
}

#[test]
fn test_empty_transaction() {
    let mut store = create_store(create_linear_workflow());
    let before = store.clone();
    let transaction = Transaction::new();
    assert!(transaction.is_empty());
    store.apply(transaction).unwrap();
    assert_eq!(store, before);
}

#[test]
fn test_edge_lookups_outlive_the_queried_id() {
    let store = create_store(create_condition_workflow());

    let yes_edge = {
        let id = String::from("Condition");
        store.branch_edge(&id, Branch::Yes)
    };
    assert_eq!(yes_edge.map(|e| e.target.as_str()), Some("Y"));

    let into_n: Vec<&Edge> = {
        let id = "N".to_string();
        store.incoming(&id).collect()
    };
    assert_eq!(into_n.len(), 1);
    assert_eq!(into_n[0].source_handle, Some(Branch::No));
}
