//! WASM bridge for Doodle: exposes the drawing engine to the browser page.
//!
//! Compiled via `wasm-pack build --target web`. The page forwards pointer
//! events in canvas pixels, wires its toolbar buttons to the methods below
//! and calls `render` after anything that returns `true`.

use doodle_core::{BrushCatalog, Color, Palette};
use doodle_editor::{
    DrawingEngine, EngineConfig, InputEvent, Modifiers, SelectError, ShortcutAction, Unlocks,
};
use serde_json::json;
use wasm_bindgen::Clamped;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, ImageData};

/// The WASM-facing drawing canvas.
///
/// Holds one engine. The host owns persistence of the unlock set and of
/// exported PNGs; this struct only hands them across.
#[wasm_bindgen]
pub struct DoodleCanvas {
    engine: DrawingEngine,
}

#[wasm_bindgen]
impl DoodleCanvas {
    /// Create a canvas of the given size with the starter unlock set.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        console_error_panic_hook_setup();
        let config = EngineConfig {
            seed: entropy_seed(),
            ..EngineConfig::with_size(width, height)
        };
        Self {
            engine: DrawingEngine::new(config, Unlocks::starter()),
        }
    }

    /// Create a canvas from a JSON `EngineConfig` and a JSON unlock set.
    /// Malformed input falls back to defaults and is logged to the console.
    pub fn with_config(config_json: &str, unlocks_json: &str) -> DoodleCanvas {
        console_error_panic_hook_setup();
        let config = EngineConfig::from_json(config_json).unwrap_or_else(|e| {
            console_warn(&e);
            EngineConfig::default()
        });
        let unlocks = Unlocks::from_json(unlocks_json).unwrap_or_else(|e| {
            console_warn(&e);
            Unlocks::starter()
        });
        Self {
            engine: DrawingEngine::new(config, unlocks),
        }
    }

    /// Blit the surface into a Canvas2D context. Returns `false` if there
    /// is no surface or the browser rejected the image data.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) -> bool {
        let Some(surface) = self.engine.surface() else {
            return false;
        };
        let image = match ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(surface.pixels()),
            surface.width(),
            surface.height(),
        ) {
            Ok(img) => img,
            Err(_) => return false,
        };
        ctx.put_image_data(&image, 0.0, 0.0).is_ok()
    }

    // ─── Pointer API ─────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.engine
            .handle_event(&InputEvent::from_pointer_down(x, y));
    }

    /// Returns `true` while a gesture is painting (re-render needed).
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.engine
            .handle_event(&InputEvent::from_pointer_move(x, y));
        self.engine.is_drawing()
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.engine.handle_event(&InputEvent::from_pointer_up(x, y));
    }

    pub fn pointer_leave(&mut self) {
        self.engine.handle_event(&InputEvent::PointerLeave);
    }

    // ─── Toolbar API ─────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.engine.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.engine.redo()
    }

    pub fn clear(&mut self) -> bool {
        self.engine.clear()
    }

    pub fn can_undo(&self) -> bool {
        self.engine.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.engine.can_redo()
    }

    /// PNG bytes of the drawing, empty on failure.
    pub fn export_png(&self) -> Vec<u8> {
        self.engine.export_png().unwrap_or_else(|e| {
            console_warn(&e.to_string());
            Vec::new()
        })
    }

    // ─── Brush & color API ───────────────────────────────────────────────

    /// Select a brush by id. Returns JSON `{"ok":true}` or
    /// `{"ok":false,"locked":bool,"error":"..."}`.
    pub fn select_brush(&mut self, id: &str) -> String {
        select_result_json(self.engine.select_brush(id))
    }

    /// Select a palette color by hex string. Same JSON shape as `select_brush`.
    pub fn select_color(&mut self, hex: &str) -> String {
        match Color::from_hex(hex) {
            Some(c) => select_result_json(self.engine.select_color(c)),
            None => json!({"ok": false, "locked": false, "error": format!("invalid color `{hex}`")})
                .to_string(),
        }
    }

    /// Unlock a brush. Returns `true` if it was newly unlocked.
    pub fn unlock_brush(&mut self, id: &str) -> bool {
        self.engine.unlock_brush(id).unwrap_or(false)
    }

    /// Unlock a palette color. Returns `true` if it was newly unlocked.
    pub fn unlock_color(&mut self, hex: &str) -> bool {
        Color::from_hex(hex)
            .and_then(|c| self.engine.unlock_color(c).ok())
            .unwrap_or(false)
    }

    pub fn active_brush(&self) -> String {
        self.engine
            .active_brush()
            .map(|b| b.id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Hex of the active color, empty when no color is unlocked.
    pub fn active_color(&self) -> String {
        self.engine
            .active_color()
            .map(|c| c.to_hex())
            .unwrap_or_default()
    }

    /// The brush catalog with each entry's unlock state for this user.
    pub fn brush_catalog_json(&self) -> String {
        let unlocks = self.engine.unlocks();
        let entries: Vec<serde_json::Value> = self
            .engine
            .catalog()
            .profiles()
            .iter()
            .map(|p| {
                let mut v = serde_json::to_value(p).unwrap_or(serde_json::Value::Null);
                v["unlocked"] = json!(unlocks.has_brush(p.id));
                v
            })
            .collect();
        serde_json::Value::Array(entries).to_string()
    }

    /// The palette with each color's unlock state for this user.
    pub fn palette_json(&self) -> String {
        let unlocks = self.engine.unlocks();
        let entries: Vec<serde_json::Value> = self
            .engine
            .palette()
            .entries()
            .iter()
            .map(|e| json!({"name": e.name, "hex": e.color.to_hex(), "unlocked": unlocks.has_color(e.color)}))
            .collect();
        serde_json::Value::Array(entries).to_string()
    }

    /// The unlock set as JSON, `"{}"` if it could not be serialized.
    pub fn unlocks_json(&self) -> String {
        self.engine.unlocks().to_json().unwrap_or_else(|e| {
            console_warn(&e);
            "{}".to_string()
        })
    }

    /// Replace the unlock set from JSON. Returns `false` on malformed input.
    pub fn load_unlocks(&mut self, json: &str) -> bool {
        match Unlocks::from_json(json) {
            Ok(u) => {
                self.engine.set_unlocks(u);
                true
            }
            Err(e) => {
                console_warn(&e);
                false
            }
        }
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns the action name (`"undo"`, `"redo"`,
    /// `"clear"`, `"save"`) or `"none"`. `"save"` is left to the page.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let event = InputEvent::Key {
            key: key.to_string(),
            modifiers: Modifiers {
                ctrl,
                shift,
                alt,
                meta,
            },
        };
        self.engine
            .handle_event(&event)
            .map_or("none", action_to_name)
            .to_string()
    }
}

/// Standard catalog as JSON, for pages that render the brush menu before
/// a canvas exists.
#[wasm_bindgen]
pub fn standard_brushes_json() -> String {
    serde_json::to_string(BrushCatalog::standard()).unwrap_or_else(|_| "[]".to_string())
}

/// Standard palette as JSON.
#[wasm_bindgen]
pub fn standard_palette_json() -> String {
    serde_json::to_string(Palette::standard()).unwrap_or_else(|_| "[]".to_string())
}

fn select_result_json(result: Result<(), SelectError>) -> String {
    match result {
        Ok(()) => json!({"ok": true}).to_string(),
        Err(e) => json!({"ok": false, "locked": e.is_locked(), "error": e.to_string()}).to_string(),
    }
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::Clear => "clear",
        ShortcutAction::Save => "save",
    }
}

/// Seed for spray and grain recipes. Random in the browser, fixed elsewhere.
fn entropy_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * u64::MAX as f64) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        EngineConfig::default().seed
    }
}

// ─── Console helpers ─────────────────────────────────────────────────────

fn console_warn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&msg.into());
    log::warn!("{msg}");
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Doodle WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
