use crate::error::{ConfigError, GraphError, WorkflowConversionError};
use crate::graph::GraphStore;
use crate::layout::LayoutEstimator;
use crate::numbering::{StepNumberer, StepNumbers};
use crate::view::WorkflowView;
use crate::workflow::{Branch, Edge, IntoWorkflow, NodeKind, Position, WorkflowSnapshot};

mod command;
mod config;
pub mod deleter;
pub mod inserter;

pub use command::{Command, Outcome};
pub use config::{DEFAULT_START_ID, DEFAULT_VERTICAL_GAP, EditorConfig};
pub use deleter::{Deletion, DeletionPlan, NodeDeleter, Reconnection};
pub use inserter::{EdgeSplit, FocusRequest, Insertion, NodeInserter};

/// The single entry point for editing a workflow graph.
///
/// Owns the [`GraphStore`], resolves [`Command`]s against it and keeps the
/// step numbering current: numbers are recomputed after every successful
/// mutation and never while one is in progress.
#[derive(Debug, Clone)]
pub struct WorkflowEditor {
    store: GraphStore,
    layout: LayoutEstimator,
    gap: f64,
    numbers: StepNumbers,
}

pub struct EditorBuilder {
    config: EditorConfig,
    layout_overrides: Vec<(String, f64)>,
    store: Option<GraphStore>,
}

impl EditorBuilder {
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
            layout_overrides: Vec::new(),
            store: None,
        }
    }
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.config.vertical_gap = gap;
        self
    }
    pub fn with_height(mut self, kind_name: &str, height: f64) -> Self {
        self.layout_overrides.push((kind_name.to_string(), height));
        self
    }
    /// Start from an existing graph instead of a lone start node.
    pub fn with_store(mut self, store: GraphStore) -> Self {
        self.store = Some(store);
        self
    }
    /// Start from a converted workflow, rejecting it if it is malformed.
    pub fn with_workflow(self, workflow: impl IntoWorkflow) -> Result<Self, WorkflowConversionError> {
        let store = GraphStore::try_from(workflow.into_workflow()?)?;
        Ok(self.with_store(store))
    }
    /// Builds the editor, rejecting gaps or sizes that are negative or not finite.
    pub fn build(self) -> Result<WorkflowEditor, ConfigError> {
        let mut config = self.config;
        config.heights.extend(self.layout_overrides);
        config.validate()?;
        Ok(Self::assemble(config, self.store))
    }

    fn assemble(config: EditorConfig, store: Option<GraphStore>) -> WorkflowEditor {
        let store = store.unwrap_or_else(|| {
            GraphStore::with_start(config.start_id.clone(), config.start_position)
        });
        let numbers = StepNumberer::number(store.nodes(), store.edges());
        WorkflowEditor {
            store,
            layout: config.layout(),
            gap: config.vertical_gap,
            numbers,
        }
    }
}

impl Default for EditorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for WorkflowEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowEditor {
    /// An editor holding only a start node, with the default layout.
    pub fn new() -> Self {
        EditorBuilder::assemble(EditorConfig::default(), None)
    }

    pub fn builder() -> EditorBuilder {
        EditorBuilder::new()
    }

    pub fn from_workflow(workflow: impl IntoWorkflow) -> Result<Self, WorkflowConversionError> {
        let builder = Self::builder().with_workflow(workflow)?;
        Ok(EditorBuilder::assemble(builder.config, builder.store))
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn layout(&self) -> &LayoutEstimator {
        &self.layout
    }

    pub fn start_id(&self) -> Option<&str> {
        self.store.start_node().map(|n| n.id.as_str())
    }

    pub fn step_numbers(&self) -> &StepNumbers {
        &self.numbers
    }

    pub fn step_number(&self, node_id: &str) -> Option<u32> {
        self.numbers.get(node_id)
    }

    pub fn has_outgoing_connection(&self, node_id: &str) -> bool {
        self.store.has_outgoing(node_id)
    }

    pub fn view(&self) -> WorkflowView {
        WorkflowView::build(&self.store, &self.numbers)
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot::from(&self.store)
    }

    /// Resolves and applies a command, then refreshes the step numbers.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, GraphError> {
        let name = command.name();
        let result = match command {
            Command::Insert {
                source,
                branch,
                kind,
            } => self.insert(&source, branch, kind).map(Outcome::Inserted),
            Command::InsertOnEdge { edge, kind } => {
                self.insert_on_edge(&edge, kind).map(Outcome::Split)
            }
            Command::Connect {
                source,
                branch,
                target,
            } => self
                .connect(&source, branch, &target)
                .map(|edge| Outcome::Connected { edge }),
            Command::Delete { node } => self
                .delete(&node)
                .map(|deletion| Outcome::Deleted { deletion }),
            Command::UpdatePayload { node, kind } => self
                .update_payload(&node, kind)
                .map(|()| Outcome::Updated { node }),
            Command::Move { node, position } => self
                .move_node(&node, position)
                .map(|()| Outcome::Moved { node }),
        };
        if let Err(e) = &result {
            tracing::warn!(command = name, error = %e, "command rejected");
        }
        result
    }

    pub fn insert(
        &mut self,
        source_id: &str,
        branch: Option<Branch>,
        kind: NodeKind,
    ) -> Result<Insertion, GraphError> {
        let insertion =
            NodeInserter::new(&self.layout, self.gap).insert(&mut self.store, source_id, branch, kind)?;
        self.renumber();
        Ok(insertion)
    }

    pub fn insert_on_edge(&mut self, edge_id: &str, kind: NodeKind) -> Result<EdgeSplit, GraphError> {
        let split = NodeInserter::new(&self.layout, self.gap).split_edge(&mut self.store, edge_id, kind)?;
        self.renumber();
        Ok(split)
    }

    pub fn connect(
        &mut self,
        source_id: &str,
        branch: Option<Branch>,
        target_id: &str,
    ) -> Result<Edge, GraphError> {
        let edge = NodeInserter::connect(&mut self.store, source_id, branch, target_id)?;
        self.renumber();
        Ok(edge)
    }

    /// Removes a node and reconnects around it. Unknown ids are a no-op.
    pub fn delete(&mut self, node_id: &str) -> Result<Option<Deletion>, GraphError> {
        let deletion = NodeDeleter::delete(&mut self.store, node_id)?;
        if deletion.is_some() {
            self.renumber();
        }
        Ok(deletion)
    }

    /// The kind and payload of a node, for the per-step configuration editors.
    pub fn payload(&self, node_id: &str) -> Option<&NodeKind> {
        self.store.node(node_id).map(|n| &n.kind)
    }

    /// Replaces a node's payload. Changing the kind would change the graph's
    /// shape, so the new payload must be of the same kind.
    pub fn update_payload(&mut self, node_id: &str, kind: NodeKind) -> Result<(), GraphError> {
        let node = self
            .store
            .node_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        if !node.kind.same_kind(&kind) {
            return Err(GraphError::KindMismatch {
                node_id: node_id.to_string(),
                expected: node.kind.name().to_string(),
                found: kind.name().to_string(),
            });
        }
        node.kind = kind;
        Ok(())
    }

    pub fn move_node(&mut self, node_id: &str, position: Position) -> Result<(), GraphError> {
        let node = self
            .store
            .node_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        node.position = position;
        Ok(())
    }

    fn renumber(&mut self) {
        self.numbers = StepNumberer::number(self.store.nodes(), self.store.edges());
    }
}
