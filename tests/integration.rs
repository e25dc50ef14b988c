//! Integration tests for stepflow
//!
//! End-to-end editing sessions, including long randomized insert/delete runs.
//!
mod common;
use common::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stepflow::prelude::*;

/// Picks a random valid command for the current graph, or `None` if the picked
/// node has no room for a new step.
fn random_command(editor: &WorkflowEditor, rng: &mut StdRng) -> Option<Command> {
    let nodes = editor.store().nodes();
    let node = &nodes[rng.random_range(0..nodes.len())];

    if !node.kind.is_start() && rng.random_bool(0.3) {
        return Some(Command::delete(node.id.clone()));
    }

    let branch = if node.kind.is_branching() {
        let open: Vec<Branch> = node
            .kind
            .branches()
            .iter()
            .copied()
            .filter(|b| editor.store().branch_edge(&node.id, *b).is_none())
            .collect();
        if open.is_empty() {
            return None;
        }
        Some(open[rng.random_range(0..open.len())])
    } else {
        None
    };

    let names = &NodeKind::NAMES[1..];
    let kind = NodeKind::from_name(names[rng.random_range(0..names.len())])?;
    Some(Command::insert(node.id.clone(), branch, kind))
}

#[test]
fn test_random_sessions_keep_numbers_consecutive() {
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut editor = WorkflowEditor::new();

        for _ in 0..150 {
            let Some(command) = random_command(&editor, &mut rng) else {
                continue;
            };
            editor
                .dispatch(command)
                .unwrap_or_else(|e| panic!("seed {}: valid command rejected: {}", seed, e));

            let numbers = editor.step_numbers();
            assert_consecutive(numbers);
            // Inserts and deletes never disconnect a step from the start node.
            assert_eq!(numbers.len(), editor.store().nodes().len() - 1, "seed {}", seed);
            assert_eq!(
                &StepNumberer::number(editor.store().nodes(), editor.store().edges()),
                numbers
            );
        }
    }
}

#[test]
fn test_random_deletions_reconnect_exactly() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut editor = WorkflowEditor::new();
    for _ in 0..60 {
        if let Some(Command::Insert { source, branch, kind }) = random_command(&editor, &mut rng) {
            editor.insert(&source, branch, kind).unwrap();
        }
    }

    while editor.store().nodes().len() > 1 {
        let nodes = editor.store().nodes();
        let victim = nodes[rng.random_range(1..nodes.len())].id.clone();
        let m = editor.store().incoming(&victim).count();
        let n = editor.store().outgoing(&victim).count();
        let edges_before = editor.store().edges().len();

        let deletion = editor.delete(&victim).unwrap().unwrap();
        assert_eq!(deletion.removed_edges.len(), m + n);
        assert_eq!(deletion.added_edges.len(), m * n);
        assert_eq!(editor.store().edges().len(), edges_before - (m + n) + m * n);
        assert_consecutive(editor.step_numbers());
    }
    assert!(editor.step_numbers().is_empty());
    assert!(editor.store().edges().is_empty());
}

#[test]
fn test_outreach_sequence_session() {
    let mut editor = WorkflowEditor::new();

    let intro = editor.insert("start", None, kind("email")).unwrap();
    let wait = editor.insert(&intro.node.id, None, kind("wait")).unwrap();
    let opened = editor.insert(&wait.node.id, None, kind("condition")).unwrap();
    let review = editor
        .insert(&opened.node.id, Some(Branch::Yes), kind("review"))
        .unwrap();
    let nudge = editor
        .insert(&opened.node.id, Some(Branch::No), kind("followUp"))
        .unwrap();
    let call = editor
        .insert(&review.node.id, Some(Branch::Accept), kind("task"))
        .unwrap();

    assert_eq!(
        numbers_of(
            &editor,
            &[
                &intro.node.id,
                &wait.node.id,
                &opened.node.id,
                &review.node.id,
                &nudge.node.id,
                &call.node.id,
            ]
        ),
        vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)]
    );

    // Drop the wait step, then the review gate.
    editor.dispatch(Command::delete(wait.node.id.clone())).unwrap();
    editor.dispatch(Command::delete(review.node.id.clone())).unwrap();

    assert_eq!(
        edge_triples(editor.store().edges()),
        triples(&[
            ("start", None, intro.node.id.as_str()),
            (intro.node.id.as_str(), None, opened.node.id.as_str()),
            (opened.node.id.as_str(), Some(Branch::No), nudge.node.id.as_str()),
            (opened.node.id.as_str(), Some(Branch::Yes), call.node.id.as_str()),
        ])
    );
    assert_eq!(
        numbers_of(&editor, &[&intro.node.id, &opened.node.id, &call.node.id, &nudge.node.id]),
        vec![Some(1), Some(2), Some(4), Some(3)]
    );

    // The reconnection re-occupies the condition's "yes" branch.
    let view = editor.view();
    assert!(view.node(&opened.node.id).unwrap().open_branches.is_empty());
    assert!(view.to_string().contains("no -> "));
}
