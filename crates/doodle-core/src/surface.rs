//! The raster buffer strokes are painted onto.

use crate::model::Color;

/// Largest width or height a surface may have.
pub const MAX_DIMENSION: u32 = 16_384;

/// Fixed-size RGBA8 raster, row-major, straight alpha.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// Allocate a surface filled with `background`. Returns `None` for an
    /// empty size, or one beyond [`MAX_DIMENSION`] on either axis.
    pub fn new(width: u32, height: u32, background: Color) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            log::debug!("surface {width}x{height} exceeds {MAX_DIMENSION} per side");
            return None;
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))?;
        let pixels = background.to_array().repeat(len / 4);
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, `width * height * 4` long.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + x as usize) * 4)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let i = self.index(x, y)?;
        let p = &self.pixels[i..i + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        let c = color.to_array();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&c);
        }
    }

    /// Whether every pixel equals `color`.
    pub fn is_filled_with(&self, color: Color) -> bool {
        let c = color.to_array();
        self.pixels.chunks_exact(4).all(|px| px == c)
    }

    /// Copy another surface's pixels into this one. Sizes must match;
    /// a mismatched source is ignored.
    pub fn copy_from(&mut self, other: &Surface) {
        if self.width == other.width && self.height == other.height {
            self.pixels.copy_from_slice(&other.pixels);
        } else {
            log::debug!(
                "copy_from: size mismatch {}x{} <- {}x{}",
                self.width,
                self.height,
                other.width,
                other.height
            );
        }
    }

    /// Composite `color` over the pixel at `(x, y)` with the given coverage
    /// (0.0 ..= 1.0), source-over. Out-of-bounds writes are dropped.
    pub fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let sa = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let dst = &mut self.pixels[i..i + 4];
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }
        let src = [color.r, color.g, color.b];
        for (d, s) in dst.iter_mut().zip(src) {
            let c = (s as f32 * sa + *d as f32 * da * (1.0 - sa)) / out_a;
            *d = c.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round() as u8;
    }

    /// Fill an axis-aligned `w × h` pixel block starting at `(x, y)`.
    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, coverage: f32) {
        for py in y..y + h {
            for px in x..x + w {
                self.blend(px, py, color, coverage);
            }
        }
    }
}
