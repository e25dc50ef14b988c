use crate::error::GraphError;
use crate::graph::{GraphStore, Transaction};
use crate::layout::LayoutEstimator;
use crate::workflow::{Branch, Edge, Node, NodeKind, NodeShape, Position};
use serde::Serialize;

/// Asks the presentation layer to center the view on a freshly placed node.
///
/// Only the target is reported; re-centering happens once the node is rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusRequest {
    pub node_id: String,
    pub center: Position,
}

/// The result of attaching a new node below an existing one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insertion {
    pub node: Node,
    pub edge: Edge,
    pub focus: FocusRequest,
}

/// The result of inserting a node in the middle of an existing edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSplit {
    pub node: Node,
    pub removed: Edge,
    pub incoming: Edge,
    pub outgoing: Edge,
    /// Nodes pushed down to make room for the new node.
    pub shifted: Vec<String>,
    pub focus: FocusRequest,
}

/// Places new nodes relative to existing ones and wires them in.
pub struct NodeInserter<'a> {
    layout: &'a LayoutEstimator,
    gap: f64,
}

impl<'a> NodeInserter<'a> {
    pub fn new(layout: &'a LayoutEstimator, gap: f64) -> Self {
        Self { layout, gap }
    }

    /// Resolves `source_id` and checks that a new edge may leave it through `branch`.
    pub fn check_attach<'s>(
        store: &'s GraphStore,
        source_id: &str,
        branch: Option<Branch>,
    ) -> Result<&'s Node, GraphError> {
        let source = store
            .node(source_id)
            .ok_or_else(|| GraphError::NodeNotFound(source_id.to_string()))?;

        match (source.kind.shape(), branch) {
            (NodeShape::Branching, None) => Err(GraphError::MissingBranch {
                node_id: source.id.clone(),
                kind: source.kind.name().to_string(),
            }),
            (NodeShape::Branching, Some(branch)) => {
                if !source.kind.branches().contains(&branch) {
                    return Err(GraphError::InvalidBranch {
                        node_id: source.id.clone(),
                        kind: source.kind.name().to_string(),
                        branch,
                    });
                }
                if store.branch_edge(&source.id, branch).is_some() {
                    return Err(GraphError::BranchOccupied {
                        node_id: source.id.clone(),
                        branch,
                    });
                }
                Ok(source)
            }
            (NodeShape::Start | NodeShape::Linear, Some(branch)) => {
                Err(GraphError::InvalidBranch {
                    node_id: source.id.clone(),
                    kind: source.kind.name().to_string(),
                    branch,
                })
            }
            (NodeShape::Start | NodeShape::Linear, None) => Ok(source),
        }
    }

    /// Where a new node goes when attached below `source`.
    ///
    /// Below the source by at least the gap, and never above the lowest point
    /// already occupied on the canvas.
    pub fn position_for(&self, store: &GraphStore, source: &Node) -> Position {
        let below_source = source.position.y + self.layout.height(&source.kind) + self.gap;
        let lowest = self.layout.bottom(store.nodes()).unwrap_or(below_source);
        Position::new(source.position.x, lowest.max(below_source))
    }

    /// Creates a node of `kind` attached to `source_id`, through `branch` if given.
    pub fn insert(
        &self,
        store: &mut GraphStore,
        source_id: &str,
        branch: Option<Branch>,
        kind: NodeKind,
    ) -> Result<Insertion, GraphError> {
        Self::check_insertable(&kind)?;
        let position = {
            let source = Self::check_attach(store, source_id, branch)?;
            self.position_for(store, source)
        };

        let node = Node::new(store.allocate_node_id(), kind, position);
        let edge = Edge::new(store.allocate_edge_id(), source_id, branch, node.id.clone());

        store.apply(
            Transaction::new()
                .add_node(node.clone())
                .add_edge(edge.clone()),
        )?;

        tracing::debug!(node = %node.id, source = source_id, branch = ?branch, kind = %node.kind, "inserted step");
        let focus = self.focus(&node);
        Ok(Insertion { node, edge, focus })
    }

    /// Splits `edge_id` by inserting a node of `kind` between its endpoints.
    ///
    /// The upstream half keeps the edge's branch label, the downstream half keeps
    /// its target handle. A branching node leaves through its first branch.
    pub fn split_edge(
        &self,
        store: &mut GraphStore,
        edge_id: &str,
        kind: NodeKind,
    ) -> Result<EdgeSplit, GraphError> {
        Self::check_insertable(&kind)?;
        let removed = store
            .edge(edge_id)
            .cloned()
            .ok_or_else(|| GraphError::EdgeNotFound(edge_id.to_string()))?;
        let source = store
            .node(&removed.source)
            .ok_or_else(|| GraphError::NodeNotFound(removed.source.clone()))?;

        let position = Position::new(
            source.position.x,
            source.position.y + self.layout.height(&source.kind) + self.gap,
        );
        let shift = self.layout.height(&kind) + self.gap;
        let shifted: Vec<String> = store
            .nodes()
            .iter()
            .filter(|n| n.id != source.id && n.position.y >= position.y)
            .map(|n| n.id.clone())
            .collect();

        let exit_branch = kind.branches().first().copied();
        let node = Node::new(store.allocate_node_id(), kind, position);
        let incoming = Edge::new(
            store.allocate_edge_id(),
            removed.source.clone(),
            removed.source_handle,
            node.id.clone(),
        );
        let outgoing = Edge {
            id: store.allocate_edge_id(),
            source: node.id.clone(),
            source_handle: exit_branch,
            target: removed.target.clone(),
            target_handle: removed.target_handle.clone(),
        };

        store.apply(
            Transaction::new()
                .remove_edge(removed.id.clone())
                .add_node(node.clone())
                .add_edge(incoming.clone())
                .add_edge(outgoing.clone()),
        )?;

        for id in &shifted {
            if let Some(n) = store.node_mut(id) {
                n.position.y += shift;
            }
        }

        tracing::debug!(node = %node.id, edge = edge_id, shifted = shifted.len(), "split edge");
        let focus = self.focus(&node);
        Ok(EdgeSplit {
            node,
            removed,
            incoming,
            outgoing,
            shifted,
            focus,
        })
    }

    /// Links two existing nodes, refusing any link that would close a cycle.
    pub fn connect(
        store: &mut GraphStore,
        source_id: &str,
        branch: Option<Branch>,
        target_id: &str,
    ) -> Result<Edge, GraphError> {
        Self::check_attach(store, source_id, branch)?;
        let target = store
            .node(target_id)
            .ok_or_else(|| GraphError::NodeNotFound(target_id.to_string()))?;
        if target.kind.is_start() {
            return Err(GraphError::StartNodeProtected(target.id.clone()));
        }
        if store.reaches(target_id, source_id) {
            return Err(GraphError::CycleDetected {
                source_id: source_id.to_string(),
                target_id: target_id.to_string(),
            });
        }

        let edge = Edge::new(store.allocate_edge_id(), source_id, branch, target_id);
        store.apply(Transaction::new().add_edge(edge.clone()))?;
        tracing::debug!(source = source_id, target = target_id, branch = ?branch, "connected steps");
        Ok(edge)
    }

    fn check_insertable(kind: &NodeKind) -> Result<(), GraphError> {
        if kind.is_start() {
            return Err(GraphError::StartKindNotInsertable(kind.name().to_string()));
        }
        Ok(())
    }

    fn focus(&self, node: &Node) -> FocusRequest {
        FocusRequest {
            node_id: node.id.clone(),
            center: self.layout.center(node),
        }
    }
}
