//! The canonical store of workflow nodes and edges.
//!
//! [`GraphStore`] owns the graph exclusively. Everything else (numbering,
//! insertion and deletion planning, rendering) reads it through shared borrows or
//! a cloned [`WorkflowSnapshot`](crate::workflow::WorkflowSnapshot).

use crate::error::GraphError;
use crate::workflow::{Branch, Edge, Node, NodeKind, Position};
use ahash::AHashSet;

mod transaction;

pub use transaction::Transaction;

/// Ordered collections of nodes and edges with structural mutation primitives.
///
/// The store checks identifiers and endpoints, but it does not check that the
/// edge set is acyclic. The editor only ever adds edges that cannot close a cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_node_id: u64,
    next_edge_id: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding a single start node.
    pub fn with_start(id: impl Into<String>, position: Position) -> Self {
        let mut store = Self::new();
        store.nodes.push(Node::new(id, NodeKind::Start, position));
        store
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// The first node of kind start, if any.
    pub fn start_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.kind.is_start())
    }

    pub fn incoming<'a, 'b>(&'a self, id: &'b str) -> impl Iterator<Item = &'a Edge> + use<'a, 'b> {
        self.edges.iter().filter(move |e| e.target == id)
    }

    pub fn outgoing<'a, 'b>(&'a self, id: &'b str) -> impl Iterator<Item = &'a Edge> + use<'a, 'b> {
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn has_outgoing(&self, id: &str) -> bool {
        self.outgoing(id).next().is_some()
    }

    /// The outgoing edge of `id` leaving through `branch`, if connected.
    pub fn branch_edge(&self, id: &str, branch: Branch) -> Option<&Edge> {
        self.outgoing(id).find(|e| e.source_handle == Some(branch))
    }

    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.contains_node(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Removes a node by id. Edges touching it are left for the caller to remove.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(index))
    }

    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if self.edge(&edge.id).is_some() {
            return Err(GraphError::DuplicateEdge(edge.id));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !self.contains_node(endpoint) {
                return Err(GraphError::MissingEndpoint {
                    edge_id: edge.id.clone(),
                    missing_node_id: endpoint.clone(),
                });
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Removes every edge matching `predicate`, returning the removed edges in order.
    pub fn remove_edges<F>(&mut self, mut predicate: F) -> Vec<Edge>
    where
        F: FnMut(&Edge) -> bool,
    {
        let (removed, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.edges)
            .into_iter()
            .partition(|e| predicate(e));
        self.edges = kept;
        removed
    }

    /// Returns an unused node id.
    pub fn allocate_node_id(&mut self) -> String {
        loop {
            self.next_node_id += 1;
            let id = format!("step-{}", self.next_node_id);
            if !self.contains_node(&id) {
                return id;
            }
        }
    }

    /// Returns an unused edge id.
    pub fn allocate_edge_id(&mut self) -> String {
        loop {
            self.next_edge_id += 1;
            let id = format!("edge-{}", self.next_edge_id);
            if self.edge(&id).is_none() {
                return id;
            }
        }
    }

    /// Returns `count` distinct unused edge ids.
    pub fn allocate_edge_ids(&mut self, count: usize) -> Vec<String> {
        (0..count).map(|_| self.allocate_edge_id()).collect()
    }

    /// True if `to` is reachable from `from` by following edges forward.
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        let mut seen = AHashSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            stack.extend(self.outgoing(current).map(|e| e.target.as_str()));
        }
        false
    }

    /// Applies a batch of removals and additions as one unit.
    ///
    /// The whole transaction is checked against the store first; if any part of
    /// it is invalid, nothing is changed and the error is returned.
    pub fn apply(&mut self, transaction: Transaction) -> Result<(), GraphError> {
        transaction.validate(self)?;

        let Transaction {
            remove_nodes,
            remove_edges,
            add_nodes,
            add_edges,
        } = transaction;

        self.remove_edges(|e| remove_edges.contains(&e.id));
        for id in &remove_nodes {
            self.remove_node(id);
        }
        self.nodes.extend(add_nodes);
        self.edges.extend(add_edges);
        Ok(())
    }
}
