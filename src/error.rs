use crate::workflow::Branch;
use thiserror::Error;

/// Errors raised by structural operations on the workflow graph.
///
/// Every variant is reported before any mutation takes place, so a caller that
/// receives one of these can keep using the store as if nothing happened.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Edge '{0}' not found")]
    EdgeNotFound(String),

    #[error("A node with id '{0}' already exists")]
    DuplicateNode(String),

    #[error("An edge with id '{0}' already exists")]
    DuplicateEdge(String),

    #[error("Edge '{edge_id}' references node '{missing_node_id}', which does not exist")]
    MissingEndpoint {
        edge_id: String,
        missing_node_id: String,
    },

    #[error("Node '{node_id}' is a {kind} step and requires a branch to attach to")]
    MissingBranch { node_id: String, kind: String },

    #[error("Branch '{branch}' is not available on {kind} node '{node_id}'")]
    InvalidBranch {
        node_id: String,
        kind: String,
        branch: Branch,
    },

    #[error("Branch '{branch}' of node '{node_id}' is already connected")]
    BranchOccupied { node_id: String, branch: Branch },

    #[error("Connecting '{source_id}' to '{target_id}' would create a cycle")]
    CycleDetected {
        source_id: String,
        target_id: String,
    },

    #[error("The start node '{0}' cannot be removed or targeted")]
    StartNodeProtected(String),

    #[error("A {0} step cannot be inserted; the workflow has exactly one start node")]
    StartKindNotInsertable(String),

    #[error("Payload for node '{node_id}' must be a {expected} payload, got {found}")]
    KindMismatch {
        node_id: String,
        expected: String,
        found: String,
    },
}

/// Errors that can occur while loading an editor configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors that can occur when importing a snapshot or a custom user format into a `GraphStore`.
#[derive(Error, Debug, Clone)]
pub enum WorkflowConversionError {
    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(String),

    #[error("Workflow has no start node")]
    MissingStart,

    #[error("Workflow has more than one start node: '{0}' and '{1}'")]
    MultipleStarts(String, String),

    #[error("Start node '{0}' must not have incoming edges")]
    StartHasIncoming(String),

    #[error("Invalid workflow structure: {0}")]
    Structure(#[from] GraphError),
}
