//! PNG export of a surface.

use crate::surface::Surface;
use image::{ImageFormat, RgbaImage};
use std::fmt;
use std::io::Cursor;

#[derive(Debug)]
pub enum ExportError {
    /// The engine has nothing to export (zero-sized canvas).
    NoSurface,
    Encode(image::ImageError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NoSurface => f.write_str("no surface to export"),
            ExportError::Encode(e) => write!(f, "png encoding failed: {e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::NoSurface => None,
            ExportError::Encode(e) => Some(e),
        }
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Encode(e)
    }
}

/// Encode the surface as a PNG file in memory.
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>, ExportError> {
    let img = RgbaImage::from_raw(surface.width(), surface.height(), surface.pixels().to_vec())
        .ok_or(ExportError::NoSurface)?;
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    log::debug!(
        "exported {}x{} surface as {} byte png",
        surface.width(),
        surface.height(),
        buf.get_ref().len()
    );
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    #[test]
    fn png_decodes_to_same_pixels() {
        let mut s = Surface::new(16, 9, Color::WHITE).unwrap();
        s.blend(3, 4, Color::rgb(255, 0, 0), 1.0);
        let bytes = encode_png(&s).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 9));
        assert_eq!(decoded.as_raw().as_slice(), s.pixels());
    }
}
