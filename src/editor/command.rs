use super::deleter::Deletion;
use super::inserter::{EdgeSplit, Insertion};
use crate::workflow::{Branch, Edge, NodeKind, Position};
use serde::{Deserialize, Serialize};

/// A user intent addressed to a [`WorkflowEditor`](super::WorkflowEditor).
///
/// Commands carry node ids only and are resolved against the live store when
/// dispatched, so a command never acts on a stale copy of the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Command {
    /// Add a step below `source`, through `branch` when `source` is branching.
    Insert {
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        branch: Option<Branch>,
        kind: NodeKind,
    },
    /// Add a step in the middle of an existing transition.
    InsertOnEdge { edge: String, kind: NodeKind },
    /// Link two existing steps.
    Connect {
        source: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        branch: Option<Branch>,
        target: String,
    },
    Delete { node: String },
    /// Replace a step's payload; the kind itself must not change.
    UpdatePayload { node: String, kind: NodeKind },
    Move { node: String, position: Position },
}

impl Command {
    pub fn insert(source: impl Into<String>, branch: Option<Branch>, kind: NodeKind) -> Self {
        Command::Insert {
            source: source.into(),
            branch,
            kind,
        }
    }

    pub fn delete(node: impl Into<String>) -> Self {
        Command::Delete { node: node.into() }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Insert { .. } => "insert",
            Command::InsertOnEdge { .. } => "insertOnEdge",
            Command::Connect { .. } => "connect",
            Command::Delete { .. } => "delete",
            Command::UpdatePayload { .. } => "updatePayload",
            Command::Move { .. } => "move",
        }
    }
}

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Outcome {
    Inserted(Insertion),
    Split(EdgeSplit),
    Connected { edge: Edge },
    /// `None` when the node did not exist and nothing changed.
    Deleted { deletion: Option<Deletion> },
    Updated { node: String },
    Moved { node: String },
}
