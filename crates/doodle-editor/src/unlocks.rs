//! Which brushes and colors a user may draw with.
//!
//! The catalogs carry a lock flag per entry for display. What a user may
//! actually select is decided by `Unlocks` alone: a new user starts with
//! [`STARTER_BRUSHES`] and [`STARTER_COLORS`], and the host persists the
//! set (it is serde-serializable) and hands it to the engine.

use doodle_core::{BrushCatalog, BrushId, Color, Palette};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Brushes every new user can draw with.
pub const STARTER_BRUSHES: [&str; 6] = [
    "thin_pencil",
    "pencil",
    "thick_pencil",
    "fine_brush",
    "brush",
    "large_brush",
];

/// Colors every new user can draw with.
pub const STARTER_COLORS: [Color; 5] = [
    Color::BLACK,
    Color::WHITE,
    Color::rgb(0xFF, 0x00, 0x00),
    Color::rgb(0x00, 0xFF, 0x00),
    Color::rgb(0x00, 0x00, 0xFF),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unlocks {
    #[serde(default)]
    brushes: BTreeSet<String>,
    #[serde(default)]
    colors: BTreeSet<Color>,
}

impl Unlocks {
    /// Everything the catalogs flag as unlocked. Handy for custom catalogs;
    /// the standard set for new users is [`Unlocks::starter`].
    pub fn from_catalogs(brushes: &BrushCatalog, palette: &Palette) -> Self {
        Self {
            brushes: brushes
                .profiles()
                .iter()
                .filter(|p| !p.locked)
                .map(|p| p.id.as_str().to_string())
                .collect(),
            colors: palette
                .entries()
                .iter()
                .filter(|e| !e.locked)
                .map(|e| e.color)
                .collect(),
        }
    }

    /// The set a new user starts with.
    pub fn starter() -> Self {
        Self {
            brushes: STARTER_BRUSHES.iter().map(|s| s.to_string()).collect(),
            colors: STARTER_COLORS.into_iter().collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid unlock set: {e}"))
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("unlock set serialization error: {e}"))
    }

    pub fn has_brush(&self, id: BrushId) -> bool {
        self.brushes.contains(id.as_str())
    }

    pub fn has_color(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }

    /// Returns `true` if the brush was newly unlocked.
    pub fn unlock_brush(&mut self, id: BrushId) -> bool {
        self.brushes.insert(id.as_str().to_string())
    }

    /// Returns `true` if the color was newly unlocked.
    pub fn unlock_color(&mut self, color: Color) -> bool {
        self.colors.insert(color)
    }

    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }
}
