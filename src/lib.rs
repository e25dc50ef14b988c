//! # Stepflow - Workflow Graph Engine
//!
//! **Stepflow** is the structural core of a visual workflow builder. It keeps the
//! directed graph of workflow steps and their transitions, numbers the steps the
//! way the user sees them, and inserts or removes steps while keeping the graph
//! connected.
//!
//! ## Core Workflow
//!
//! 1.  **Create an Editor**: `WorkflowEditor::new()` starts from a lone start node.
//!     Use `WorkflowEditor::builder()` to tune layout sizes or to load an existing
//!     graph through the `IntoWorkflow` trait.
//! 2.  **Dispatch Commands**: every user intent (add a step, add a branch, delete a
//!     step) is a `Command` resolved against the live graph by `dispatch`.
//!     Rejected commands leave the graph untouched.
//! 3.  **Render the View**: after each command, `view()` returns the nodes with
//!     their step numbers, connection flags and open branches.
//!
//! ## Quick Start
//!
//! ```rust
//! use stepflow::prelude::{Branch, Command, NodeKind, WorkflowEditor};
//!
//! let mut editor = WorkflowEditor::new();
//!
//! // start -> email -> condition, then one step on each branch
//! let email = editor.insert("start", None, NodeKind::from_name("email").unwrap())?;
//! let check = editor.insert(&email.node.id, None, NodeKind::from_name("condition").unwrap())?;
//! let yes = editor.insert(&check.node.id, Some(Branch::Yes), NodeKind::from_name("task").unwrap())?;
//! let no = editor.insert(&check.node.id, Some(Branch::No), NodeKind::from_name("wait").unwrap())?;
//!
//! assert_eq!(editor.step_number(&email.node.id), Some(1));
//! assert_eq!(editor.step_number(&check.node.id), Some(2));
//! assert_eq!(editor.step_number(&yes.node.id), Some(3));
//! assert_eq!(editor.step_number(&no.node.id), Some(4));
//!
//! // Removing the condition hands its branches to the email step.
//! editor.dispatch(Command::delete(check.node.id.clone()))?;
//! assert_eq!(editor.step_number(&yes.node.id), Some(2));
//! assert_eq!(editor.step_number(&no.node.id), Some(3));
//!
//! println!("{}", editor.view());
//! # Ok::<(), stepflow::error::GraphError>(())
//! ```

pub mod editor;
pub mod error;
pub mod graph;
pub mod layout;
pub mod numbering;
pub mod prelude;
pub mod view;
pub mod workflow;
