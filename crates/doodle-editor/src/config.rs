//! Engine configuration.

use doodle_core::Color;
use serde::{Deserialize, Serialize};

/// Size, background and history settings for one drawing engine.
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    /// Snapshots kept for undo. 0 = unbounded.
    pub history_depth: usize,
    /// Seed for the spray and grain recipes.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Color::WHITE,
            history_depth: 0,
            seed: 0x5EED,
        }
    }
}

impl EngineConfig {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid engine config: {e}"))
    }
}
