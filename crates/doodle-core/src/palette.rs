//! The fixed color palette offered by the drawing page.

use crate::model::Color;
use serde::Serialize;
use std::sync::LazyLock;

/// A named palette color and whether it ships locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub name: &'static str,
    pub color: Color,
    pub locked: bool,
}

const fn entry(name: &'static str, r: u8, g: u8, b: u8, locked: bool) -> PaletteEntry {
    PaletteEntry {
        name,
        color: Color::rgb(r, g, b),
        locked,
    }
}

const STANDARD: [PaletteEntry; 40] = [
    entry("Black", 0x00, 0x00, 0x00, false),
    entry("White", 0xFF, 0xFF, 0xFF, false),
    entry("Crimson", 0xDC, 0x14, 0x3C, false),
    entry("Red", 0xFF, 0x00, 0x00, false),
    entry("Brick Red", 0xCB, 0x41, 0x54, true),
    entry("Rose", 0xFF, 0x00, 0x7F, true),
    entry("Coral", 0xFF, 0x7F, 0x50, true),
    entry("Sunset Orange", 0xFF, 0x45, 0x00, true),
    entry("Tangerine", 0xFF, 0x8C, 0x00, false),
    entry("Marigold", 0xFF, 0xA5, 0x00, true),
    entry("Gold", 0xFF, 0xD7, 0x00, true),
    entry("Yellow", 0xFF, 0xFF, 0x00, false),
    entry("Lime", 0x00, 0xFF, 0x00, false),
    entry("Grass", 0x7C, 0xFC, 0x00, true),
    entry("Forest", 0x22, 0x8B, 0x22, true),
    entry("Emerald", 0x50, 0xC8, 0x78, true),
    entry("Mint", 0x98, 0xFF, 0x98, true),
    entry("Teal", 0x00, 0x80, 0x80, true),
    entry("Turquoise", 0x40, 0xE0, 0xD0, true),
    entry("Cyan", 0x00, 0xFF, 0xFF, true),
    entry("Sky Blue", 0x87, 0xCE, 0xEB, true),
    entry("Blue", 0x00, 0x00, 0xFF, false),
    entry("Royal Blue", 0x41, 0x69, 0xE1, true),
    entry("Navy", 0x00, 0x00, 0x80, true),
    entry("Indigo", 0x4B, 0x00, 0x82, true),
    entry("Violet", 0x8B, 0x00, 0xFF, true),
    entry("Purple", 0x80, 0x00, 0x80, true),
    entry("Magenta", 0xFF, 0x00, 0xFF, true),
    entry("Hot Pink", 0xFF, 0x69, 0xB4, true),
    entry("Bubblegum", 0xFF, 0xB6, 0xC1, true),
    entry("Peach", 0xFF, 0xDA, 0xB9, true),
    entry("Beige", 0xF5, 0xF5, 0xDC, true),
    entry("Tan", 0xD2, 0xB4, 0x8C, true),
    entry("Brown", 0x8B, 0x45, 0x13, true),
    entry("Chocolate", 0xD2, 0x69, 0x1E, true),
    entry("Mahogany", 0xC0, 0x40, 0x00, true),
    entry("Slate", 0x70, 0x80, 0x90, true),
    entry("Steel", 0x71, 0x79, 0x7E, true),
    entry("Charcoal", 0x36, 0x45, 0x4F, true),
    entry("Silver", 0xC0, 0xC0, 0xC0, true),
];

static STANDARD_PALETTE: LazyLock<Palette> = LazyLock::new(|| Palette {
    entries: STANDARD.to_vec(),
});

/// Ordered color catalog. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// The 40-color palette of the drawing page.
    pub fn standard() -> &'static Palette {
        &STANDARD_PALETTE
    }

    pub fn from_entries(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn get(&self, color: Color) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.color == color)
    }

    pub fn contains(&self, color: Color) -> bool {
        self.get(color).is_some()
    }

    /// Display name for a color, if it's in the palette.
    pub fn name_of(&self, color: Color) -> Option<&'static str> {
        self.get(color).map(|e| e.name)
    }
}
