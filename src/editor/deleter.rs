use crate::error::GraphError;
use crate::graph::{GraphStore, Transaction};
use crate::workflow::{Branch, Edge, Node};
use itertools::Itertools;
use serde::Serialize;

/// An edge to be created when a node is removed, linking one of its
/// predecessors to one of its successors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconnection {
    pub source: String,
    pub source_handle: Option<Branch>,
    pub target: String,
    pub target_handle: Option<String>,
}

impl Reconnection {
    /// Joins `incoming` (into the removed node) with `outgoing` (out of it).
    ///
    /// The branch label upstream of the removed node wins; when the incoming
    /// edge has none, the outgoing edge's label is carried over so the branches
    /// of a removed branching node stay distinguishable.
    fn join(incoming: &Edge, outgoing: &Edge) -> Self {
        Self {
            source: incoming.source.clone(),
            source_handle: incoming.source_handle.or(outgoing.source_handle),
            target: outgoing.target.clone(),
            target_handle: outgoing.target_handle.clone(),
        }
    }

    fn into_edge(self, id: String) -> Edge {
        Edge {
            id,
            source: self.source,
            source_handle: self.source_handle,
            target: self.target,
            target_handle: self.target_handle,
        }
    }
}

/// What removing a node would do, computed without touching the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletionPlan {
    pub node_id: String,
    pub incoming: Vec<Edge>,
    pub outgoing: Vec<Edge>,
    /// Edges from the node to itself; removed, never reconnected.
    pub loops: Vec<Edge>,
    /// One entry per (incoming, outgoing) pair, in incoming-major order.
    pub reconnections: Vec<Reconnection>,
}

/// The applied result of removing a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deletion {
    pub node: Node,
    pub removed_edges: Vec<Edge>,
    pub added_edges: Vec<Edge>,
}

pub struct NodeDeleter;

impl NodeDeleter {
    /// Plans the removal of `node_id`.
    ///
    /// Returns `Ok(None)` when no such node exists. The start node can never be removed.
    pub fn plan(store: &GraphStore, node_id: &str) -> Result<Option<DeletionPlan>, GraphError> {
        let Some(node) = store.node(node_id) else {
            return Ok(None);
        };
        if node.kind.is_start() {
            return Err(GraphError::StartNodeProtected(node.id.clone()));
        }

        let mut incoming = Vec::new();
        let mut outgoing = Vec::new();
        let mut loops = Vec::new();
        for edge in store.edges() {
            match (edge.source == node_id, edge.target == node_id) {
                (true, true) => loops.push(edge.clone()),
                (false, true) => incoming.push(edge.clone()),
                (true, false) => outgoing.push(edge.clone()),
                (false, false) => {}
            }
        }

        let reconnections = incoming
            .iter()
            .cartesian_product(outgoing.iter())
            .map(|(i, o)| Reconnection::join(i, o))
            .collect();

        Ok(Some(DeletionPlan {
            node_id: node_id.to_string(),
            incoming,
            outgoing,
            loops,
            reconnections,
        }))
    }

    /// Removes `node_id` and reconnects its predecessors to its successors.
    ///
    /// All removals and additions land in a single transaction.
    pub fn delete(store: &mut GraphStore, node_id: &str) -> Result<Option<Deletion>, GraphError> {
        let Some(plan) = Self::plan(store, node_id)? else {
            tracing::debug!(node = node_id, "delete ignored, no such node");
            return Ok(None);
        };
        let Some(node) = store.node(node_id).cloned() else {
            return Ok(None);
        };

        let ids = store.allocate_edge_ids(plan.reconnections.len());
        let added_edges: Vec<Edge> = plan
            .reconnections
            .into_iter()
            .zip(ids)
            .map(|(reconnection, id)| reconnection.into_edge(id))
            .collect();
        let removed_edges: Vec<Edge> = plan
            .incoming
            .into_iter()
            .chain(plan.outgoing)
            .chain(plan.loops)
            .collect();

        let transaction = Transaction {
            remove_nodes: vec![node.id.clone()],
            remove_edges: removed_edges.iter().map(|e| e.id.clone()).unique().collect(),
            add_nodes: Vec::new(),
            add_edges: added_edges.clone(),
        };
        store.apply(transaction)?;

        tracing::debug!(
            node = node_id,
            removed = removed_edges.len(),
            added = added_edges.len(),
            "deleted step"
        );
        Ok(Some(Deletion {
            node,
            removed_edges,
            added_edges,
        }))
    }
}
