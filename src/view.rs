use crate::graph::GraphStore;
use crate::numbering::StepNumbers;
use crate::workflow::{Branch, Edge, NodeShape, Position};
use serde::Serialize;
use std::fmt;

/// Everything the presentation layer needs to draw one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub id: String,
    pub kind: &'static str,
    pub position: Position,
    pub step_number: Option<u32>,
    pub has_outgoing_connection: bool,
    /// Branches of a branching node that are not connected yet.
    pub open_branches: Vec<Branch>,
    /// Whether the node should offer its own "add step" affordance.
    pub can_add_step: bool,
}

/// A read-only picture of the workflow, rebuilt after each mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowView {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<Edge>,
}

impl WorkflowView {
    pub fn build(store: &GraphStore, numbers: &StepNumbers) -> Self {
        let nodes = store
            .nodes()
            .iter()
            .map(|node| {
                let has_outgoing_connection = store.has_outgoing(&node.id);
                let open_branches: Vec<Branch> = node
                    .kind
                    .branches()
                    .iter()
                    .copied()
                    .filter(|b| store.branch_edge(&node.id, *b).is_none())
                    .collect();
                let can_add_step = match node.kind.shape() {
                    NodeShape::Branching => !open_branches.is_empty(),
                    NodeShape::Start | NodeShape::Linear => !has_outgoing_connection,
                };
                NodeView {
                    id: node.id.clone(),
                    kind: node.kind.name(),
                    position: node.position,
                    step_number: numbers.get(&node.id),
                    has_outgoing_connection,
                    open_branches,
                    can_add_step,
                }
            })
            .collect();

        Self {
            nodes,
            edges: store.edges().to_vec(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Numbered nodes in step order.
    pub fn steps(&self) -> Vec<&NodeView> {
        let mut steps: Vec<&NodeView> = self
            .nodes
            .iter()
            .filter(|n| n.step_number.is_some())
            .collect();
        steps.sort_by_key(|n| n.step_number);
        steps
    }

    fn write_node(&self, f: &mut fmt::Formatter, label: &str, node: &NodeView) -> fmt::Result {
        write!(f, "{:>4} {} [{}]", label, node.id, node.kind)?;
        let targets: Vec<String> = self
            .edges
            .iter()
            .filter(|e| e.source == node.id)
            .map(|e| match e.source_handle {
                Some(branch) => format!("{} -> {}", branch, e.target),
                None => e.target.clone(),
            })
            .collect();
        if !targets.is_empty() {
            write!(f, " => {}", targets.join(", "))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for WorkflowView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for start in self.nodes.iter().filter(|n| n.kind == "start") {
            self.write_node(f, "*", start)?;
        }
        for step in self.steps() {
            let label = format!("{}.", step.step_number.unwrap_or_default());
            self.write_node(f, &label, step)?;
        }
        let unreachable = self
            .nodes
            .iter()
            .filter(|n| n.step_number.is_none() && n.kind != "start")
            .count();
        if unreachable > 0 {
            writeln!(f, "({} unreachable step(s))", unreachable)?;
        }
        Ok(())
    }
}
