pub mod brush;
pub mod export;
pub mod id;
pub mod model;
pub mod palette;
pub mod render;
pub mod surface;

pub use brush::{BrushCatalog, BrushProfile, Cap, StrokeKind, Texture};
pub use export::{ExportError, encode_png};
pub use id::BrushId;
pub use model::*;
pub use palette::{Palette, PaletteEntry};
pub use surface::Surface;
