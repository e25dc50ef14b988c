use super::definition::{Edge, Node};
use crate::error::WorkflowConversionError;
use crate::graph::GraphStore;
use serde::{Deserialize, Serialize};
use std::fs;

/// A plain copy of a workflow graph, as exchanged with the presentation layer.
///
/// This is the interchange shape of the builder (camelCase JSON with `nodes`
/// and `edges` arrays). It is checked when turned into a [`GraphStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl WorkflowSnapshot {
    pub fn from_json(json: &str) -> Result<Self, WorkflowConversionError> {
        serde_json::from_str(json).map_err(|e| WorkflowConversionError::JsonParseError(e.to_string()))
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&GraphStore> for WorkflowSnapshot {
    fn from(store: &GraphStore) -> Self {
        Self {
            nodes: store.nodes().to_vec(),
            edges: store.edges().to_vec(),
        }
    }
}

impl TryFrom<WorkflowSnapshot> for GraphStore {
    type Error = WorkflowConversionError;

    /// Rebuilds a store, checking ids, edge endpoints and the start node rules.
    fn try_from(snapshot: WorkflowSnapshot) -> Result<Self, Self::Error> {
        let mut starts = snapshot.nodes.iter().filter(|n| n.kind.is_start());
        let start_id = match (starts.next(), starts.next()) {
            (None, _) => return Err(WorkflowConversionError::MissingStart),
            (Some(first), Some(second)) => {
                return Err(WorkflowConversionError::MultipleStarts(
                    first.id.clone(),
                    second.id.clone(),
                ));
            }
            (Some(start), None) => start.id.clone(),
        };
        if snapshot.edges.iter().any(|e| e.target == start_id) {
            return Err(WorkflowConversionError::StartHasIncoming(start_id));
        }

        let mut store = GraphStore::new();
        for node in snapshot.nodes {
            store.add_node(node)?;
        }
        for edge in snapshot.edges {
            store.add_edge(edge)?;
        }
        Ok(store)
    }
}

/// A trait for custom data models that can be converted into a [`WorkflowSnapshot`].
///
/// Implement it on the structs of another builder format to load that format
/// into the engine.
///
/// # Example
///
/// ```rust
/// use stepflow::prelude::{Edge, IntoWorkflow, Node, NodeKind, Position, WorkflowEditor, WorkflowSnapshot};
/// use stepflow::error::WorkflowConversionError;
///
/// struct Sequence { steps: Vec<String> }
///
/// impl IntoWorkflow for Sequence {
///     fn into_workflow(self) -> Result<WorkflowSnapshot, WorkflowConversionError> {
///         let mut snapshot = WorkflowSnapshot::default();
///         snapshot.nodes.push(Node::new("start", NodeKind::Start, Position::default()));
///         let mut previous = "start".to_string();
///         for (i, step) in self.steps.into_iter().enumerate() {
///             let kind = NodeKind::from_name(&step)
///                 .ok_or_else(|| WorkflowConversionError::JsonParseError(format!("unknown step '{}'", step)))?;
///             let id = format!("s{}", i);
///             snapshot.nodes.push(Node::new(id.clone(), kind, Position::default()));
///             snapshot.edges.push(Edge::new(format!("e{}", i), previous, None, id.clone()));
///             previous = id;
///         }
///         Ok(snapshot)
///     }
/// }
///
/// let editor = WorkflowEditor::from_workflow(Sequence { steps: vec!["email".into(), "task".into()] }).unwrap();
/// assert_eq!(editor.step_number("s1"), Some(2));
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into a workflow snapshot.
    fn into_workflow(self) -> Result<WorkflowSnapshot, WorkflowConversionError>;
}

impl IntoWorkflow for WorkflowSnapshot {
    fn into_workflow(self) -> Result<WorkflowSnapshot, WorkflowConversionError> {
        Ok(self)
    }
}
