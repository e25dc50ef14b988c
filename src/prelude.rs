//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the stepflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use stepflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let snapshot = WorkflowSnapshot::from_file("path/to/workflow.json")?;
//! let mut editor = WorkflowEditor::from_workflow(snapshot)?;
//!
//! editor.dispatch(Command::insert("start", None, NodeKind::from_name("email").unwrap()))?;
//! println!("{}", editor.view());
//! # Ok(())
//! # }
//! ```

// Editing
pub use crate::editor::{Command, EditorBuilder, EditorConfig, Outcome, WorkflowEditor};

// Graph and derived data
pub use crate::graph::{GraphStore, Transaction};
pub use crate::layout::LayoutEstimator;
pub use crate::numbering::{StepNumberer, StepNumbers};
pub use crate::view::{NodeView, WorkflowView};

// Data model
pub use crate::workflow::{
    Branch, Edge, IntoWorkflow, Node, NodeKind, NodeShape, Position, WorkflowSnapshot,
};

// Error types
pub use crate::error::{ConfigError, GraphError, WorkflowConversionError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
