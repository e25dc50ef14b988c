//! Common test utilities for building workflow graphs.
use stepflow::prelude::*;

/// A kind with an empty payload, by name.
#[allow(dead_code)]
pub fn kind(name: &str) -> NodeKind {
    NodeKind::from_name(name).unwrap_or_else(|| panic!("unknown kind '{}'", name))
}

#[allow(dead_code)]
pub fn node(id: &str, kind_name: &str) -> Node {
    Node::new(id, kind(kind_name), Position::default())
}

#[allow(dead_code)]
pub fn edge(id: &str, source: &str, target: &str) -> Edge {
    Edge::new(id, source, None, target)
}

#[allow(dead_code)]
pub fn branch_edge(id: &str, source: &str, branch: Branch, target: &str) -> Edge {
    Edge::new(id, source, Some(branch), target)
}

/// `start -> A -> B -> C`
#[allow(dead_code)]
pub fn create_linear_workflow() -> WorkflowSnapshot {
    WorkflowSnapshot {
        nodes: vec![
            node("start", "start"),
            node("A", "email"),
            node("B", "task"),
            node("C", "wait"),
        ],
        edges: vec![
            edge("e1", "start", "A"),
            edge("e2", "A", "B"),
            edge("e3", "B", "C"),
        ],
    }
}

/// `start -> Condition`, `Condition --yes--> Y`, `Condition --no--> N`
#[allow(dead_code)]
pub fn create_condition_workflow() -> WorkflowSnapshot {
    WorkflowSnapshot {
        nodes: vec![
            node("start", "start"),
            node("Condition", "condition"),
            node("Y", "email"),
            node("N", "task"),
        ],
        edges: vec![
            edge("e1", "start", "Condition"),
            branch_edge("e2", "Condition", Branch::Yes, "Y"),
            branch_edge("e3", "Condition", Branch::No, "N"),
        ],
    }
}

/// The condition workflow with both branches reconverging on `Join`.
#[allow(dead_code)]
pub fn create_join_workflow() -> WorkflowSnapshot {
    let mut snapshot = create_condition_workflow();
    snapshot.nodes.push(node("Join", "wait"));
    snapshot.edges.push(edge("e4", "Y", "Join"));
    snapshot.edges.push(edge("e5", "N", "Join"));
    snapshot
}

#[allow(dead_code)]
pub fn create_store(snapshot: WorkflowSnapshot) -> GraphStore {
    GraphStore::try_from(snapshot).expect("fixture should be a valid workflow")
}

#[allow(dead_code)]
pub fn create_editor(snapshot: WorkflowSnapshot) -> WorkflowEditor {
    WorkflowEditor::from_workflow(snapshot).expect("fixture should be a valid workflow")
}

/// Step numbers of the given nodes, in the given order.
#[allow(dead_code)]
pub fn numbers_of(editor: &WorkflowEditor, ids: &[&str]) -> Vec<Option<u32>> {
    ids.iter().map(|id| editor.step_number(id)).collect()
}

/// Asserts the numbers are exactly `1..=k` with no gaps or duplicates.
#[allow(dead_code)]
pub fn assert_consecutive(numbers: &StepNumbers) {
    let mut values: Vec<u32> = numbers.as_map().values().copied().collect();
    values.sort_unstable();
    let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
    assert_eq!(values, expected, "step numbers are not consecutive");
}

type Triple = (String, Option<Branch>, String);

#[allow(dead_code)]
fn sort_triples(mut triples: Vec<Triple>) -> Vec<Triple> {
    triples.sort_by_key(|(source, handle, target)| {
        (source.clone(), target.clone(), handle.map(|b| b.as_str()))
    });
    triples
}

/// Edges as sorted `(source, handle, target)` triples, ignoring ids.
#[allow(dead_code)]
pub fn edge_triples(edges: &[Edge]) -> Vec<Triple> {
    sort_triples(
        edges
            .iter()
            .map(|e| (e.source.clone(), e.source_handle, e.target.clone()))
            .collect(),
    )
}

/// Expected edges, sorted the same way as [`edge_triples`].
#[allow(dead_code)]
pub fn triples(expected: &[(&str, Option<Branch>, &str)]) -> Vec<Triple> {
    sort_triples(
        expected
            .iter()
            .map(|(s, b, t)| (s.to_string(), *b, t.to_string()))
            .collect(),
    )
}
