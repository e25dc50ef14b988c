use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D canvas coordinate. Only used for layout, never for structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A named outgoing port on a branching node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Yes,
    No,
    Accept,
    Decline,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Yes => "yes",
            Branch::No => "no",
            Branch::Accept => "accept",
            Branch::Decline => "decline",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "yes" => Some(Branch::Yes),
            "no" => Some(Branch::No),
            "accept" => Some(Branch::Accept),
            "decline" => Some(Branch::Decline),
            _ => None,
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural role of a node, independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Start,
    Linear,
    Branching,
}

const CONDITION_BRANCHES: &[Branch] = &[Branch::Yes, Branch::No];
const REVIEW_BRANCHES: &[Branch] = &[Branch::Accept, Branch::Decline];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmailStep {
    pub subject: String,
    pub body: String,
    /// Instruction used by the AI rewrite panel.
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FollowUpStep {
    pub delay_days: u32,
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskStep {
    pub title: String,
    pub assignee: Option<String>,
    pub due_in_days: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaitStep {
    pub days: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConditionStep {
    pub condition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewStep {
    pub reviewer: Option<String>,
    pub instructions: String,
}

/// The kind of a workflow step together with its kind-specific payload.
///
/// The payload is owned by the per-step configuration editors; the engine only
/// looks at the variant to decide the node's [`NodeShape`] and branch handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Start,
    Email(EmailStep),
    FollowUp(FollowUpStep),
    Task(TaskStep),
    Wait(WaitStep),
    Condition(ConditionStep),
    Review(ReviewStep),
}

impl NodeKind {
    /// Every kind name accepted by [`NodeKind::from_name`].
    pub const NAMES: &'static [&'static str] = &[
        "start",
        "email",
        "followUp",
        "task",
        "wait",
        "condition",
        "review",
    ];

    /// Creates a kind with an empty payload from its name.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "start" => NodeKind::Start,
            "email" => NodeKind::Email(EmailStep::default()),
            "followUp" => NodeKind::FollowUp(FollowUpStep::default()),
            "task" => NodeKind::Task(TaskStep::default()),
            "wait" => NodeKind::Wait(WaitStep::default()),
            "condition" => NodeKind::Condition(ConditionStep::default()),
            "review" => NodeKind::Review(ReviewStep::default()),
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Email(_) => "email",
            NodeKind::FollowUp(_) => "followUp",
            NodeKind::Task(_) => "task",
            NodeKind::Wait(_) => "wait",
            NodeKind::Condition(_) => "condition",
            NodeKind::Review(_) => "review",
        }
    }

    pub fn shape(&self) -> NodeShape {
        match self {
            NodeKind::Start => NodeShape::Start,
            NodeKind::Email(_) | NodeKind::FollowUp(_) | NodeKind::Task(_) | NodeKind::Wait(_) => {
                NodeShape::Linear
            }
            NodeKind::Condition(_) | NodeKind::Review(_) => NodeShape::Branching,
        }
    }

    /// The outgoing branch handles of a branching kind, empty for every other kind.
    pub fn branches(&self) -> &'static [Branch] {
        match self {
            NodeKind::Condition(_) => CONDITION_BRANCHES,
            NodeKind::Review(_) => REVIEW_BRANCHES,
            _ => &[],
        }
    }

    pub fn is_start(&self) -> bool {
        self.shape() == NodeShape::Start
    }

    pub fn is_branching(&self) -> bool {
        self.shape() == NodeShape::Branching
    }

    pub fn same_kind(&self, other: &NodeKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single workflow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Position,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, position: Position) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
        }
    }
}

/// A transition between two steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<Branch>,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        source_handle: Option<Branch>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            source_handle,
            target: target.into(),
            target_handle: None,
        }
    }

    pub fn with_target_handle(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }
}
