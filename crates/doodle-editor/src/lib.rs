pub mod config;
pub mod engine;
pub mod history;
pub mod input;
pub mod shortcuts;
pub mod unlocks;

pub use config::EngineConfig;
pub use engine::{DrawingEngine, SelectError};
pub use history::HistoryStack;
pub use input::{InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use unlocks::Unlocks;
