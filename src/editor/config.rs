use crate::error::ConfigError;
use crate::layout::{DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, LayoutEstimator};
use crate::workflow::Position;
use ahash::AHashMap;
use serde::Deserialize;
use std::fs;

pub const DEFAULT_VERTICAL_GAP: f64 = 80.0;
pub const DEFAULT_START_ID: &str = "start";

/// Editor settings, typically loaded from a JSON file.
///
/// Every field is optional in the JSON form; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Space left between a source node and a node inserted below it.
    pub vertical_gap: f64,
    pub node_width: f64,
    /// Height used for kinds missing from the height table.
    pub default_height: f64,
    /// Per-kind height overrides, keyed by kind name (e.g. `"condition"`).
    pub heights: AHashMap<String, f64>,
    pub start_id: String,
    pub start_position: Position,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            vertical_gap: DEFAULT_VERTICAL_GAP,
            node_width: DEFAULT_NODE_WIDTH,
            default_height: DEFAULT_NODE_HEIGHT,
            heights: AHashMap::new(),
            start_id: DEFAULT_START_ID.to_string(),
            start_position: Position::default(),
        }
    }
}

impl EditorConfig {
    /// Load a config from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("verticalGap", self.vertical_gap),
            ("nodeWidth", self.node_width),
            ("defaultHeight", self.default_height),
        ];
        let overrides = self
            .heights
            .iter()
            .map(|(name, h)| (name.as_str(), *h));
        for (field, value) in sizes.into_iter().chain(overrides) {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("expected a non-negative number, got {}", value),
                });
            }
        }
        if self.start_id.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "startId".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Builds the layout table described by this config.
    pub fn layout(&self) -> LayoutEstimator {
        self.heights.iter().fold(
            LayoutEstimator::default()
                .with_width(self.node_width)
                .with_default_height(self.default_height),
            |layout, (name, height)| layout.with_height(name, *height),
        )
    }
}
