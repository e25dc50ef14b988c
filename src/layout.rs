use crate::workflow::{Node, NodeKind, Position};
use ahash::AHashMap;

pub const DEFAULT_NODE_HEIGHT: f64 = 120.0;
pub const DEFAULT_NODE_WIDTH: f64 = 320.0;

const DEFAULT_HEIGHTS: &[(&str, f64)] = &[
    ("start", 80.0),
    ("email", 140.0),
    ("followUp", 140.0),
    ("task", 120.0),
    ("wait", 96.0),
    ("condition", 160.0),
    ("review", 160.0),
];

/// Estimates the rendered size of a node from its kind.
///
/// Sizes carry no structural meaning; they only keep new nodes from being
/// placed on top of existing ones.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEstimator {
    heights: AHashMap<String, f64>,
    default_height: f64,
    width: f64,
}

impl Default for LayoutEstimator {
    fn default() -> Self {
        Self {
            heights: DEFAULT_HEIGHTS
                .iter()
                .map(|(name, height)| (name.to_string(), *height))
                .collect(),
            default_height: DEFAULT_NODE_HEIGHT,
            width: DEFAULT_NODE_WIDTH,
        }
    }
}

impl LayoutEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_height(mut self, kind_name: &str, height: f64) -> Self {
        self.heights.insert(kind_name.to_string(), height);
        self
    }

    pub fn with_default_height(mut self, height: f64) -> Self {
        self.default_height = height;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Height for a kind name; unknown names fall back to the default height.
    pub fn height_of(&self, kind_name: &str) -> f64 {
        self.heights
            .get(kind_name)
            .copied()
            .unwrap_or(self.default_height)
    }

    pub fn height(&self, kind: &NodeKind) -> f64 {
        self.height_of(kind.name())
    }

    pub fn width(&self, _kind: &NodeKind) -> f64 {
        self.width
    }

    /// The lowest occupied point on the canvas, or `None` for an empty canvas.
    pub fn bottom(&self, nodes: &[Node]) -> Option<f64> {
        nodes
            .iter()
            .map(|n| n.position.y + self.height(&n.kind))
            .reduce(f64::max)
    }

    /// Visual center of a node, used to re-center the view on it.
    pub fn center(&self, node: &Node) -> Position {
        Position::new(
            node.position.x + self.width(&node.kind) / 2.0,
            node.position.y + self.height(&node.kind) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_heights() {
        let layout = LayoutEstimator::default();
        assert_eq!(layout.height(&NodeKind::Start), 80.0);
        assert_eq!(layout.height_of("condition"), 160.0);
        assert_eq!(layout.height_of("linkedinMessage"), DEFAULT_NODE_HEIGHT);
    }

    #[test]
    fn test_overrides() {
        let layout = LayoutEstimator::default()
            .with_height("task", 300.0)
            .with_default_height(50.0);
        assert_eq!(layout.height_of("task"), 300.0);
        assert_eq!(layout.height_of("unknown"), 50.0);
    }

    #[test]
    fn test_bottom_and_center() {
        let layout = LayoutEstimator::default();
        let nodes = vec![
            Node::new("start", NodeKind::Start, Position::new(0.0, 0.0)),
            Node::new("c", NodeKind::from_name("condition").unwrap(), Position::new(0.0, 200.0)),
        ];
        assert_eq!(layout.bottom(&nodes), Some(360.0));
        assert_eq!(layout.bottom(&[]), None);
        assert_eq!(layout.center(&nodes[0]), Position::new(160.0, 40.0));
    }
}
