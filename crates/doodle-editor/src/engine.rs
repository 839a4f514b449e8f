//! The canvas drawing engine.
//!
//! Owns the surface, the snapshot history, the active brush and color,
//! and the per-gesture stroke state. The host forwards pointer events in
//! surface coordinates; the engine paints in place and snapshots the
//! surface when a gesture ends.
//!
//! ## Gesture lifecycle
//!
//! | Event | Idle | Active |
//! |-------|------|--------|
//! | `begin_stroke` | → active | restart (previous gesture abandoned, no snapshot) |
//! | `extend_stroke` | no-op | paint segment, stay active |
//! | `end_stroke` | no-op | → idle, push snapshot |
//!
//! Undo, redo and clear don't touch the gesture state. A gesture that
//! spans one of them keeps painting onto the restored surface and commits
//! as usual on `end_stroke`.
//!
//! Nothing here fails. Calls whose preconditions don't hold (no surface,
//! no active gesture, history at a bound) are no-ops.

use crate::config::EngineConfig;
use crate::history::HistoryStack;
use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::unlocks::Unlocks;
use doodle_core::render::render_segment;
use doodle_core::{
    BrushCatalog, BrushId, BrushProfile, Color, ExportError, Palette, Point, Segment, Surface,
    encode_png,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;

/// Why a brush or color could not be selected or unlocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    UnknownBrush(String),
    UnknownColor(Color),
    /// The brush exists but the user hasn't unlocked it.
    LockedBrush(BrushId),
    /// The color is in the palette but the user hasn't unlocked it.
    LockedColor(Color),
}

impl SelectError {
    pub fn is_locked(&self) -> bool {
        matches!(self, SelectError::LockedBrush(_) | SelectError::LockedColor(_))
    }
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::UnknownBrush(id) => write!(f, "unknown brush `{id}`"),
            SelectError::UnknownColor(c) => write!(f, "color {c} is not in the palette"),
            SelectError::LockedBrush(id) => write!(f, "brush `{id}` is locked"),
            SelectError::LockedColor(c) => write!(f, "color {c} is locked"),
        }
    }
}

impl std::error::Error for SelectError {}

/// Per-gesture state: idle, or active with the last pointer position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct StrokeState {
    last_point: Option<Point>,
    /// Segments painted so far in this gesture.
    segments: usize,
}

impl StrokeState {
    fn is_active(&self) -> bool {
        self.last_point.is_some()
    }
}

/// The surface together with its history. Both exist or neither does.
struct Canvas {
    surface: Surface,
    history: HistoryStack,
}

pub struct DrawingEngine {
    config: EngineConfig,
    catalog: BrushCatalog,
    palette: Palette,
    unlocks: Unlocks,
    canvas: Option<Canvas>,
    stroke: StrokeState,
    /// `None` when the user has no brush unlocked; gestures then paint nothing.
    brush: Option<BrushProfile>,
    color: Option<Color>,
    rng: StdRng,
}

impl DrawingEngine {
    /// Engine with the standard brush catalog and palette.
    pub fn new(config: EngineConfig, unlocks: Unlocks) -> Self {
        Self::with_catalogs(
            config,
            BrushCatalog::standard().clone(),
            Palette::standard().clone(),
            unlocks,
        )
    }

    pub fn with_catalogs(
        config: EngineConfig,
        catalog: BrushCatalog,
        palette: Palette,
        unlocks: Unlocks,
    ) -> Self {
        let canvas = Surface::new(config.width, config.height, config.background).map(|s| {
            let history = HistoryStack::new(s.clone(), config.history_depth);
            Canvas {
                surface: s,
                history,
            }
        });
        if canvas.is_none() {
            log::debug!(
                "engine created without a surface ({}x{})",
                config.width,
                config.height
            );
        }

        let brush = initial_brush(&catalog, &unlocks);
        let color = initial_color(&palette, &unlocks);

        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            catalog,
            palette,
            unlocks,
            canvas,
            stroke: StrokeState::default(),
            brush,
            color,
        }
    }

    // ─── Gestures ────────────────────────────────────────────────────────

    /// Start a gesture at `point`. Restarting an active gesture abandons it.
    pub fn begin_stroke(&mut self, point: Point) {
        if self.canvas.is_none() {
            return;
        }
        if self.stroke.is_active() {
            log::debug!("gesture restarted without end; previous one abandoned");
        }
        self.stroke = StrokeState {
            last_point: Some(point),
            segments: 0,
        };
    }

    /// Paint from the last pointer position to `point` with the active brush.
    pub fn extend_stroke(&mut self, point: Point) {
        let Some(from) = self.stroke.last_point else {
            return;
        };
        let (Some(canvas), Some(brush), Some(color)) =
            (self.canvas.as_mut(), self.brush.as_ref(), self.color)
        else {
            return;
        };
        let seg = Segment::new(from, point, self.stroke.segments == 0);
        render_segment(&mut canvas.surface, seg, brush, color, &mut self.rng);
        self.stroke.last_point = Some(point);
        self.stroke.segments += 1;
    }

    /// Finish the gesture and snapshot the surface. Returns `true` if a
    /// gesture was active.
    pub fn end_stroke(&mut self) -> bool {
        if !self.stroke.is_active() {
            return false;
        }
        let segments = self.stroke.segments;
        self.stroke = StrokeState::default();
        self.commit();
        log::debug!("gesture committed ({segments} segments)");
        true
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_active()
    }

    // ─── Surface-wide operations ─────────────────────────────────────────

    /// Fill the surface with the background color and snapshot it.
    pub fn clear(&mut self) -> bool {
        let background = self.config.background;
        let Some(canvas) = self.canvas.as_mut() else {
            return false;
        };
        canvas.surface.fill(background);
        self.commit();
        log::debug!("canvas cleared");
        true
    }

    /// Restore the previous snapshot. Returns `false` at the oldest one.
    pub fn undo(&mut self) -> bool {
        let Some(Canvas { surface, history }) = self.canvas.as_mut() else {
            return false;
        };
        let Some(snapshot) = history.undo() else {
            return false;
        };
        surface.copy_from(snapshot);
        log::debug!("undo -> {}/{}", history.cursor(), history.len());
        true
    }

    /// Re-apply the next snapshot. Returns `false` at the newest one.
    pub fn redo(&mut self) -> bool {
        let Some(Canvas { surface, history }) = self.canvas.as_mut() else {
            return false;
        };
        let Some(snapshot) = history.redo() else {
            return false;
        };
        surface.copy_from(snapshot);
        log::debug!("redo -> {}/{}", history.cursor(), history.len());
        true
    }

    /// Encode the current surface as PNG.
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        let surface = self.surface().ok_or(ExportError::NoSurface)?;
        encode_png(surface)
    }

    fn commit(&mut self) {
        if let Some(Canvas { surface, history }) = self.canvas.as_mut() {
            history.push(surface.clone());
        }
    }

    // ─── Brush & color ───────────────────────────────────────────────────

    /// Make `id` the active brush. Locked or unknown brushes leave the
    /// active brush unchanged.
    pub fn select_brush(&mut self, id: &str) -> Result<(), SelectError> {
        let profile = self.lookup_brush(id)?.clone();
        if !self.unlocks.has_brush(profile.id) {
            log::debug!("select_brush: `{id}` is locked");
            return Err(SelectError::LockedBrush(profile.id));
        }
        self.brush = Some(profile);
        Ok(())
    }

    /// Make `color` the active color. It must be an unlocked palette entry.
    pub fn select_color(&mut self, color: Color) -> Result<(), SelectError> {
        if !self.palette.contains(color) {
            return Err(SelectError::UnknownColor(color));
        }
        if !self.unlocks.has_color(color) {
            log::debug!("select_color: {color} is locked");
            return Err(SelectError::LockedColor(color));
        }
        self.color = Some(color);
        Ok(())
    }

    /// Unlock a catalog brush. Returns `Ok(true)` if it was locked before.
    pub fn unlock_brush(&mut self, id: &str) -> Result<bool, SelectError> {
        let id = self.lookup_brush(id)?.id;
        Ok(self.unlocks.unlock_brush(id))
    }

    /// Unlock a palette color. Returns `Ok(true)` if it was locked before.
    pub fn unlock_color(&mut self, color: Color) -> Result<bool, SelectError> {
        if !self.palette.contains(color) {
            return Err(SelectError::UnknownColor(color));
        }
        Ok(self.unlocks.unlock_color(color))
    }

    fn lookup_brush(&self, id: &str) -> Result<&BrushProfile, SelectError> {
        BrushId::lookup(id)
            .and_then(|bid| self.catalog.get(bid))
            .ok_or_else(|| SelectError::UnknownBrush(id.to_string()))
    }

    // ─── Input dispatch ──────────────────────────────────────────────────

    /// Route a host event. Pointer events drive the gesture; key events go
    /// through the shortcut map. Undo, redo and clear are applied here;
    /// the resolved action is returned so the host can handle `Save`.
    pub fn handle_event(&mut self, event: &InputEvent) -> Option<ShortcutAction> {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.begin_stroke(Point::new(*x as f64, *y as f64));
                None
            }
            InputEvent::PointerMove { x, y } => {
                self.extend_stroke(Point::new(*x as f64, *y as f64));
                None
            }
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave => {
                self.end_stroke();
                None
            }
            InputEvent::Key { key, modifiers } => {
                let action = ShortcutMap::resolve(
                    key,
                    modifiers.ctrl,
                    modifiers.shift,
                    modifiers.alt,
                    modifiers.meta,
                )?;
                match action {
                    ShortcutAction::Undo => {
                        self.undo();
                    }
                    ShortcutAction::Redo => {
                        self.redo();
                    }
                    ShortcutAction::Clear => {
                        self.clear();
                    }
                    ShortcutAction::Save => {}
                }
                Some(action)
            }
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn surface(&self) -> Option<&Surface> {
        self.canvas.as_ref().map(|c| &c.surface)
    }

    pub fn history_len(&self) -> usize {
        self.canvas.as_ref().map_or(0, |c| c.history.len())
    }

    pub fn history_cursor(&self) -> usize {
        self.canvas.as_ref().map_or(0, |c| c.history.cursor())
    }

    pub fn can_undo(&self) -> bool {
        self.canvas.as_ref().is_some_and(|c| c.history.can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.canvas.as_ref().is_some_and(|c| c.history.can_redo())
    }

    pub fn active_brush(&self) -> Option<&BrushProfile> {
        self.brush.as_ref()
    }

    pub fn active_color(&self) -> Option<Color> {
        self.color
    }

    pub fn catalog(&self) -> &BrushCatalog {
        &self.catalog
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn unlocks(&self) -> &Unlocks {
        &self.unlocks
    }

    /// Replace the unlock set (e.g. after the host loads the user's record).
    /// An active brush or color the new set doesn't cover is swapped for the
    /// one a fresh engine would start with.
    pub fn set_unlocks(&mut self, unlocks: Unlocks) {
        self.unlocks = unlocks;
        if !self.brush.as_ref().is_some_and(|b| self.unlocks.has_brush(b.id)) {
            self.brush = initial_brush(&self.catalog, &self.unlocks);
        }
        if !self.color.is_some_and(|c| self.unlocks.has_color(c)) {
            self.color = initial_color(&self.palette, &self.unlocks);
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// First unlocked brush of the catalog.
fn initial_brush(catalog: &BrushCatalog, unlocks: &Unlocks) -> Option<BrushProfile> {
    catalog
        .profiles()
        .iter()
        .find(|p| unlocks.has_brush(p.id))
        .cloned()
}

/// Black if unlocked, otherwise the first unlocked palette color.
fn initial_color(palette: &Palette, unlocks: &Unlocks) -> Option<Color> {
    if palette.contains(Color::BLACK) && unlocks.has_color(Color::BLACK) {
        return Some(Color::BLACK);
    }
    palette
        .entries()
        .iter()
        .map(|e| e.color)
        .find(|c| unlocks.has_color(*c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> DrawingEngine {
        DrawingEngine::new(EngineConfig::with_size(64, 48), Unlocks::starter())
    }

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn starts_idle_with_one_snapshot() {
        let e = engine();
        assert!(!e.is_drawing());
        assert_eq!(e.history_len(), 1);
        assert_eq!(e.history_cursor(), 0);
        assert_eq!(e.active_brush().unwrap().id.as_str(), "thin_pencil");
        assert_eq!(e.active_color(), Some(Color::BLACK));
        assert!(e.surface().unwrap().is_filled_with(Color::WHITE));
    }

    #[test]
    fn extend_without_begin_is_noop() {
        let mut e = engine();
        e.extend_stroke(pt(10.0, 10.0));
        assert!(e.surface().unwrap().is_filled_with(Color::WHITE));
        assert!(!e.end_stroke());
        assert_eq!(e.history_len(), 1);
    }

    #[test]
    fn begin_alone_does_not_touch_history() {
        let mut e = engine();
        e.begin_stroke(pt(5.0, 5.0));
        assert!(e.is_drawing());
        assert_eq!(e.history_len(), 1);
        assert!(e.end_stroke());
        assert_eq!(e.history_len(), 2);
    }

    #[test]
    fn zero_sized_engine_ignores_everything() {
        let mut e = DrawingEngine::new(EngineConfig::with_size(0, 0), Unlocks::starter());
        e.begin_stroke(pt(1.0, 1.0));
        assert!(!e.is_drawing());
        e.extend_stroke(pt(2.0, 2.0));
        assert!(!e.end_stroke());
        assert!(!e.clear());
        assert!(!e.undo());
        assert!(!e.redo());
        assert!(e.surface().is_none());
        assert_eq!(e.history_len(), 0);
        assert!(matches!(e.export_png(), Err(ExportError::NoSurface)));
    }

    #[test]
    fn undo_at_oldest_snapshot_leaves_gesture_alone() {
        let mut e = engine();
        e.select_brush("brush").unwrap();
        e.begin_stroke(pt(5.0, 20.0));
        e.extend_stroke(pt(30.0, 20.0));
        let painted = e.surface().unwrap().clone();

        assert!(!e.undo());
        assert!(!e.redo());
        assert_eq!(e.surface().unwrap(), &painted);
        assert!(e.is_drawing());

        e.extend_stroke(pt(60.0, 20.0));
        assert!(e.end_stroke());
        assert_eq!(e.history_len(), 2);
        let s = e.surface().unwrap();
        assert_eq!(s.pixel(15, 20), Some(Color::BLACK));
        assert_eq!(s.pixel(45, 20), Some(Color::BLACK));
    }

    #[test]
    fn undo_mid_gesture_keeps_drawing_on_restored_surface() {
        let mut e = engine();
        e.select_brush("brush").unwrap();
        e.begin_stroke(pt(5.0, 10.0));
        e.extend_stroke(pt(60.0, 10.0));
        e.end_stroke();

        e.begin_stroke(pt(5.0, 30.0));
        e.extend_stroke(pt(30.0, 30.0));
        assert!(e.undo());
        assert!(e.is_drawing());
        // The restored snapshot is the blank one.
        assert!(e.surface().unwrap().is_filled_with(Color::WHITE));

        e.extend_stroke(pt(60.0, 30.0));
        assert!(e.end_stroke());
        assert_eq!(e.history_len(), 2);
        assert_eq!(e.history_cursor(), 1);
        let s = e.surface().unwrap();
        assert_eq!(s.pixel(30, 10), Some(Color::WHITE));
        assert_eq!(s.pixel(45, 30), Some(Color::BLACK));
    }

    #[test]
    fn clear_mid_gesture_keeps_gesture_active() {
        let mut e = engine();
        e.begin_stroke(pt(5.0, 5.0));
        e.extend_stroke(pt(20.0, 20.0));
        assert!(e.clear());
        assert!(e.is_drawing());
        assert_eq!(e.history_len(), 2);
        assert!(e.end_stroke());
        assert_eq!(e.history_len(), 3);
    }

    #[test]
    fn nothing_unlocked_means_nothing_is_painted() {
        let mut e = DrawingEngine::new(EngineConfig::with_size(64, 48), Unlocks::default());
        assert!(e.active_brush().is_none());
        assert_eq!(e.active_color(), None);

        e.begin_stroke(pt(5.0, 5.0));
        e.extend_stroke(pt(40.0, 40.0));
        assert!(e.end_stroke());
        assert!(e.surface().unwrap().is_filled_with(Color::WHITE));
    }

    #[test]
    fn first_unlocked_color_when_black_is_locked() {
        let red = Color::rgb(0xFF, 0, 0);
        let mut unlocks = Unlocks::default();
        unlocks.unlock_brush(BrushId::intern("brush"));
        unlocks.unlock_color(Color::from_hex("#0000FF").unwrap());
        unlocks.unlock_color(red);
        let e = DrawingEngine::new(EngineConfig::with_size(8, 8), unlocks);
        assert_eq!(e.active_brush().unwrap().id.as_str(), "brush");
        // Palette order: red comes before blue.
        assert_eq!(e.active_color(), Some(red));
    }

    #[test]
    fn set_unlocks_drops_brush_and_color_no_longer_unlocked() {
        let mut e = engine();
        e.unlock_brush("ink_pen").unwrap();
        e.select_brush("ink_pen").unwrap();
        let gold = Color::from_hex("#FFD700").unwrap();
        e.unlock_color(gold).unwrap();
        e.select_color(gold).unwrap();

        e.set_unlocks(Unlocks::starter());
        assert_eq!(e.active_brush().unwrap().id.as_str(), "thin_pencil");
        assert_eq!(e.active_color(), Some(Color::BLACK));

        e.set_unlocks(Unlocks::default());
        assert!(e.active_brush().is_none());
        assert_eq!(e.active_color(), None);
    }

    #[test]
    fn set_unlocks_keeps_selection_still_unlocked() {
        let mut e = engine();
        e.select_brush("brush").unwrap();
        let blue = Color::from_hex("#0000FF").unwrap();
        e.select_color(blue).unwrap();
        e.set_unlocks(Unlocks::starter());
        assert_eq!(e.active_brush().unwrap().id.as_str(), "brush");
        assert_eq!(e.active_color(), Some(blue));
    }

    #[test]
    fn oversized_config_has_no_surface() {
        let config = EngineConfig::from_json(r#"{"width":4294967295,"height":4294967295}"#).unwrap();
        let mut e = DrawingEngine::new(config, Unlocks::starter());
        assert!(e.surface().is_none());
        assert!(!e.clear());
        assert_eq!(e.history_len(), 0);
    }

    #[test]
    fn select_error_messages() {
        assert_eq!(
            SelectError::LockedBrush(BrushId::intern("marker")).to_string(),
            "brush `marker` is locked"
        );
        assert!(SelectError::LockedColor(Color::WHITE).is_locked());
        assert!(!SelectError::UnknownBrush("x".into()).is_locked());
    }
}
