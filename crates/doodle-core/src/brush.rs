//! Brush profiles and the fixed brush catalog.
//!
//! A profile is an immutable recipe descriptor: the stroke kind, its base
//! width, opacity and jitter. How each kind turns a pointer move into
//! pixels lives in [`crate::render`].

use crate::id::BrushId;
use serde::Serialize;
use std::sync::LazyLock;

/// Largest `base_width` a brush may have, in pixels.
pub const MAX_BASE_WIDTH: f32 = 512.0;

/// How a brush deposits paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "texture")]
pub enum StrokeKind {
    /// Solid round-capped segment.
    Line,
    /// Random single pixels around the pointer, no interpolation.
    SprayDot,
    /// A segment (or dab) whose width, opacity and grain depend on the texture.
    TexturedLine(Texture),
}

/// Sub-kinds of [`StrokeKind::TexturedLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Texture {
    Pencil,
    Marker,
    Calligraphy,
    Ink,
    Charcoal,
    Watercolor,
}

/// Line end shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cap {
    Round,
    Square,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrushProfile {
    pub id: BrushId,
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: StrokeKind,
    /// Nominal brush size in pixels.
    pub base_width: f32,
    /// Opacity of the solid part of the stroke, 0.0 ..= 1.0.
    pub opacity: f32,
    /// Half-extent of random dot placement, as a fraction of `base_width`.
    pub jitter: f32,
    /// Default lock state the catalog ships with.
    pub locked: bool,
}

impl BrushProfile {
    pub fn new(id: &str, name: &'static str, kind: StrokeKind, base_width: f32) -> Self {
        let (opacity, jitter) = match kind {
            StrokeKind::Line => (1.0, 0.0),
            StrokeKind::SprayDot => (1.0, 1.0),
            StrokeKind::TexturedLine(t) => match t {
                Texture::Pencil => (1.0, 0.25),
                Texture::Marker => (0.7, 0.0),
                Texture::Calligraphy | Texture::Ink => (1.0, 0.0),
                Texture::Charcoal => (1.0, 0.75),
                Texture::Watercolor => (0.2, 0.0),
            },
        };
        Self {
            id: BrushId::intern(id),
            name,
            kind,
            base_width,
            opacity,
            jitter,
            locked: false,
        }
    }

    /// Whether the profile's numbers can be rendered: a finite width in
    /// `(0, MAX_BASE_WIDTH]`, finite non-negative jitter, finite opacity.
    pub fn is_renderable(&self) -> bool {
        self.base_width.is_finite()
            && self.base_width > 0.0
            && self.base_width <= MAX_BASE_WIDTH
            && self.jitter.is_finite()
            && self.jitter >= 0.0
            && self.opacity.is_finite()
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Width of the solid segment this brush draws, if it draws one.
    pub fn stroke_width(&self) -> Option<f32> {
        let w = self.base_width;
        match self.kind {
            StrokeKind::Line => Some(w),
            StrokeKind::SprayDot => None,
            StrokeKind::TexturedLine(t) => match t {
                Texture::Pencil => Some(w * 0.8),
                Texture::Marker => Some(w * 1.2),
                Texture::Calligraphy => Some(w * 1.5),
                Texture::Ink => Some((w * 0.5).max(1.0)),
                Texture::Charcoal | Texture::Watercolor => None,
            },
        }
    }

    pub fn cap(&self) -> Cap {
        match self.kind {
            StrokeKind::TexturedLine(Texture::Calligraphy) => Cap::Square,
            _ => Cap::Round,
        }
    }
}

// ─── Catalog ─────────────────────────────────────────────────────────────

static STANDARD_CATALOG: LazyLock<BrushCatalog> = LazyLock::new(|| {
    use StrokeKind::*;
    use Texture::*;
    BrushCatalog::from_profiles(vec![
        BrushProfile::new("thin_pencil", "Thin Pencil", TexturedLine(Pencil), 2.0),
        BrushProfile::new("pencil", "Pencil", TexturedLine(Pencil), 4.0),
        BrushProfile::new("thick_pencil", "Thick Pencil", TexturedLine(Pencil), 8.0),
        BrushProfile::new("fine_brush", "Fine Brush", Line, 3.0),
        BrushProfile::new("brush", "Brush", Line, 6.0),
        BrushProfile::new("large_brush", "Large Brush", Line, 12.0),
        BrushProfile::new("huge_brush", "Huge Brush", Line, 20.0),
        BrushProfile::new("thin_marker", "Thin Marker", TexturedLine(Marker), 4.0).locked(),
        BrushProfile::new("marker", "Marker", TexturedLine(Marker), 8.0).locked(),
        BrushProfile::new("wide_marker", "Wide Marker", TexturedLine(Marker), 14.0).locked(),
        BrushProfile::new("spray_small", "Spray Small", SprayDot, 8.0).locked(),
        BrushProfile::new("spray_large", "Spray Large", SprayDot, 16.0).locked(),
        BrushProfile::new("calligraphy_pen", "Calligraphy Pen", TexturedLine(Calligraphy), 5.0)
            .locked(),
        BrushProfile::new(
            "calligraphy_brush",
            "Calligraphy Brush",
            TexturedLine(Calligraphy),
            10.0,
        )
        .locked(),
        BrushProfile::new("watercolor_small", "Watercolor Small", TexturedLine(Watercolor), 10.0)
            .locked(),
        BrushProfile::new("watercolor_large", "Watercolor Large", TexturedLine(Watercolor), 20.0)
            .locked(),
        BrushProfile::new("ink_pen", "Ink Pen", TexturedLine(Ink), 2.0).locked(),
        BrushProfile::new("ink_brush", "Ink Brush", TexturedLine(Ink), 5.0).locked(),
        BrushProfile::new("charcoal_stick", "Charcoal Stick", TexturedLine(Charcoal), 8.0),
        BrushProfile::new("charcoal_block", "Charcoal Block", TexturedLine(Charcoal), 16.0),
    ])
});

/// Ordered, immutable set of brush profiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BrushCatalog {
    profiles: Vec<BrushProfile>,
}

impl BrushCatalog {
    /// The 20-brush catalog of the drawing page.
    pub fn standard() -> &'static BrushCatalog {
        &STANDARD_CATALOG
    }

    /// Build a catalog. Profiles that can't be rendered are left out.
    pub fn from_profiles(profiles: Vec<BrushProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .filter(|p| {
                let ok = p.is_renderable();
                if !ok {
                    log::warn!("brush `{}` dropped: width {} not renderable", p.id, p.base_width);
                }
                ok
            })
            .collect();
        Self { profiles }
    }

    pub fn profiles(&self) -> &[BrushProfile] {
        &self.profiles
    }

    pub fn get(&self, id: BrushId) -> Option<&BrushProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// First profile of the catalog, the engine's initial brush.
    pub fn first(&self) -> Option<&BrushProfile> {
        self.profiles.first()
    }
}
