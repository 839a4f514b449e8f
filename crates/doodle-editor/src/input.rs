//! Input abstraction layer.
//!
//! Normalizes mouse, touch and pen events into a unified `InputEvent` the
//! engine consumes. Coordinates are already surface-local pixels.

/// Keyboard modifier state for a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A normalized input event from any pointing device or the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pen contact).
    PointerDown { x: f32, y: f32 },

    /// Pointer moved.
    PointerMove { x: f32, y: f32 },

    /// Pointer released.
    PointerUp { x: f32, y: f32 },

    /// Pointer left the canvas. Ends the gesture like a release.
    PointerLeave,

    /// Keyboard shortcut candidate.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn from_pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown { x, y }
    }

    pub fn from_pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn from_pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp { x, y }
    }

    /// Extract position if this is a positioned pointer event.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown { x, y } | Self::PointerMove { x, y } | Self::PointerUp { x, y } => {
                Some((*x, *y))
            }
            _ => None,
        }
    }
}
