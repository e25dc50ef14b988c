use super::GraphStore;
use crate::error::GraphError;
use crate::workflow::{Edge, Node};
use ahash::AHashSet;

/// A batch of structural changes applied by [`GraphStore::apply`].
///
/// Removals are applied before additions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    pub remove_nodes: Vec<String>,
    pub remove_edges: Vec<String>,
    pub add_nodes: Vec<Node>,
    pub add_edges: Vec<Edge>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove_node(mut self, id: impl Into<String>) -> Self {
        self.remove_nodes.push(id.into());
        self
    }

    pub fn remove_edge(mut self, id: impl Into<String>) -> Self {
        self.remove_edges.push(id.into());
        self
    }

    pub fn add_node(mut self, node: Node) -> Self {
        self.add_nodes.push(node);
        self
    }

    pub fn add_edge(mut self, edge: Edge) -> Self {
        self.add_edges.push(edge);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.remove_nodes.is_empty()
            && self.remove_edges.is_empty()
            && self.add_nodes.is_empty()
            && self.add_edges.is_empty()
    }

    /// Checks that the transaction would leave `store` consistent.
    pub(super) fn validate(&self, store: &GraphStore) -> Result<(), GraphError> {
        for id in &self.remove_nodes {
            if !store.contains_node(id) {
                return Err(GraphError::NodeNotFound(id.clone()));
            }
        }
        for id in &self.remove_edges {
            if store.edge(id).is_none() {
                return Err(GraphError::EdgeNotFound(id.clone()));
            }
        }

        let removed_nodes: AHashSet<&str> = self.remove_nodes.iter().map(String::as_str).collect();
        let removed_edges: AHashSet<&str> = self.remove_edges.iter().map(String::as_str).collect();

        let mut node_ids: AHashSet<&str> = store
            .nodes()
            .iter()
            .map(|n| n.id.as_str())
            .filter(|id| !removed_nodes.contains(id))
            .collect();
        for node in &self.add_nodes {
            if !node_ids.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }

        let surviving_edges = store
            .edges()
            .iter()
            .filter(|e| !removed_edges.contains(e.id.as_str()));
        let mut edge_ids: AHashSet<&str> = AHashSet::new();
        for edge in surviving_edges.chain(self.add_edges.iter()) {
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(GraphError::DuplicateEdge(edge.id.clone()));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !node_ids.contains(endpoint.as_str()) {
                    return Err(GraphError::MissingEndpoint {
                        edge_id: edge.id.clone(),
                        missing_node_id: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
