//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to the drawing page's toolbar actions.
//! The map lives in Rust so it's shared by the WASM bridge and native hosts.

/// Toolbar actions a shortcut can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    /// Wipe the canvas to the background color.
    Clear,
    /// Export the drawing. The engine only reports it; the host saves.
    Save,
}

/// Resolves key events into shortcut actions.
///
/// On macOS `meta` is ⌘, on other platforms `ctrl` serves the same role;
/// either one counts as the command modifier.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;
        if !cmd {
            return None;
        }

        if shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        match key {
            "z" | "Z" => Some(ShortcutAction::Undo),
            "y" | "Y" => Some(ShortcutAction::Redo),
            "s" | "S" => Some(ShortcutAction::Save),
            "Delete" | "Backspace" => Some(ShortcutAction::Clear),
            _ => None,
        }
    }
}
