//! Stroke render recipes.
//!
//! Each pointer move of an active gesture becomes one [`Segment`]; the
//! active brush decides what that segment paints:
//!
//! | Kind | Paints |
//! |------|--------|
//! | Line | anti-aliased round segment, full opacity |
//! | Pencil | jitter dots around the pointer, then a narrower round segment |
//! | Marker | wider round segment at reduced opacity |
//! | Calligraphy | square-capped wide segment |
//! | Ink | thin round segment |
//! | Charcoal | translucent 2×2 grain dots only |
//! | Watercolor | soft translucent disc at the pointer |
//! | SprayDot | single pixels scattered around the pointer |
//!
//! [`render_segment`] mutates in place; [`rendered`] is the pure form.

use crate::brush::{BrushProfile, Cap, MAX_BASE_WIDTH, StrokeKind, Texture};
use crate::model::{Color, Point, Segment};
use crate::surface::Surface;
use kurbo::{Rect, Vec2};
use rand::Rng;
use smallvec::SmallVec;

/// A square of paint deposited by a grain or spray recipe.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Dab {
    x: i32,
    y: i32,
    size: i32,
    alpha: f32,
}

const PENCIL_DOTS: usize = 5;
const CHARCOAL_DOTS: usize = 15;
const SPRAY_MIN_DOTS: usize = 20;

/// Number of pixels a spray brush deposits per pointer move.
pub fn spray_density(base_width: f32) -> usize {
    let w = if base_width.is_finite() {
        base_width.clamp(0.0, MAX_BASE_WIDTH)
    } else {
        0.0
    };
    ((w * 2.5).round() as usize).max(SPRAY_MIN_DOTS)
}

/// Paint one segment of a gesture with `brush` in `color`.
pub fn render_segment<R: Rng + ?Sized>(
    surface: &mut Surface,
    seg: Segment,
    brush: &BrushProfile,
    color: Color,
    rng: &mut R,
) {
    log::trace!(
        "RENDER {} ({:.1},{:.1})->({:.1},{:.1})",
        brush.id,
        seg.from.x,
        seg.from.y,
        seg.to.x,
        seg.to.y
    );
    if !brush.is_renderable() {
        log::debug!("brush `{}` not renderable, segment skipped", brush.id);
        return;
    }
    let spread = (brush.base_width * brush.jitter) as f64;

    match brush.kind {
        StrokeKind::SprayDot => {
            let dabs = scatter(rng, seg.to, spread, spray_density(brush.base_width), 1, |_| 1.0);
            paint_dabs(surface, &dabs, color);
        }
        StrokeKind::TexturedLine(Texture::Pencil) => {
            let dabs = scatter(rng, seg.to, spread, PENCIL_DOTS, 1, |_| 1.0);
            paint_dabs(surface, &dabs, color);
            stroke_line(surface, seg, brush, color);
        }
        StrokeKind::TexturedLine(Texture::Charcoal) => {
            let dabs = scatter(rng, seg.to, spread, CHARCOAL_DOTS, 2, |r| r.gen_range(0.1..0.4));
            paint_dabs(surface, &dabs, color);
        }
        StrokeKind::TexturedLine(Texture::Watercolor) => {
            soft_disc(surface, seg.to, brush.base_width as f64, color, brush.opacity);
        }
        StrokeKind::Line | StrokeKind::TexturedLine(_) => {
            stroke_line(surface, seg, brush, color);
        }
    }
}

/// Pure form of [`render_segment`]: returns a new surface, leaves the input alone.
pub fn rendered<R: Rng + ?Sized>(
    surface: &Surface,
    seg: Segment,
    brush: &BrushProfile,
    color: Color,
    rng: &mut R,
) -> Surface {
    let mut out = surface.clone();
    render_segment(&mut out, seg, brush, color, rng);
    out
}

/// Pure form of a clear: a surface of the same size filled with `background`.
pub fn cleared(surface: &Surface, background: Color) -> Surface {
    let mut out = surface.clone();
    out.fill(background);
    out
}

// ─── Solid segments ──────────────────────────────────────────────────────

fn stroke_line(surface: &mut Surface, seg: Segment, brush: &BrushProfile, color: Color) {
    let Some(width) = brush.stroke_width() else {
        return;
    };
    let half = width as f64 / 2.0;
    // Later segments of a translucent stroke subtract the start cap the
    // previous segment's end cap already painted.
    let subtract_start_cap = !seg.first && brush.opacity < 1.0;

    let d = seg.to - seg.from;
    let len = d.hypot();
    let cap = brush.cap();

    let pad = half * std::f64::consts::SQRT_2 + 1.0;
    let bounds = Rect::from_points(seg.from, seg.to).inflate(pad, pad);
    let (x0, y0, x1, y1) = clip(surface, bounds);

    for py in y0..=y1 {
        for px in x0..=x1 {
            let p = Point::new(px as f64 + 0.5, py as f64 + 0.5);
            let rel = p - seg.from;
            let mut coverage = match cap {
                Cap::Round => round_coverage(rel, d, len, half),
                Cap::Square => square_coverage(rel, d, len, half),
            };
            if subtract_start_cap {
                coverage -= (half + 0.5 - rel.hypot()).clamp(0.0, 1.0);
            }
            if coverage > 0.0 {
                surface.blend(px, py, color, coverage as f32 * brush.opacity);
            }
        }
    }
}

/// Coverage of a capsule around the segment, one pixel of anti-aliasing.
fn round_coverage(rel: Vec2, d: Vec2, len: f64, half: f64) -> f64 {
    let t = if len > 0.0 {
        (rel.dot(d) / (len * len)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let dist = (rel - d * t).hypot();
    (half + 0.5 - dist).clamp(0.0, 1.0)
}

/// Coverage of the rectangle swept by the segment, extended by `half` at both ends.
fn square_coverage(rel: Vec2, d: Vec2, len: f64, half: f64) -> f64 {
    let u = if len > 0.0 { d / len } else { Vec2::new(1.0, 0.0) };
    let along = rel.dot(u);
    let perp = rel.cross(u).abs();
    let edge = (half + 0.5 - perp)
        .min(along + half + 0.5)
        .min(len + half + 0.5 - along);
    edge.clamp(0.0, 1.0)
}

fn soft_disc(surface: &mut Surface, center: Point, radius: f64, color: Color, opacity: f32) {
    let outer = radius * 2.0;
    let bounds = Rect::from_center_size(center, (outer * 2.0 + 2.0, outer * 2.0 + 2.0));
    let (x0, y0, x1, y1) = clip(surface, bounds);
    for py in y0..=y1 {
        for px in x0..=x1 {
            let dist = (Point::new(px as f64 + 0.5, py as f64 + 0.5) - center).hypot();
            let coverage = if dist <= radius {
                1.0
            } else {
                ((outer - dist) / radius).max(0.0)
            };
            if coverage > 0.0 {
                surface.blend(px, py, color, coverage as f32 * opacity);
            }
        }
    }
}

/// Integer pixel range of `bounds` clipped to the surface. May be empty
/// (`x0 > x1`), which makes the caller's loops no-ops.
fn clip(surface: &Surface, bounds: Rect) -> (i32, i32, i32, i32) {
    let max_x = surface.width() as i32 - 1;
    let max_y = surface.height() as i32 - 1;
    let x0 = (bounds.x0.floor() as i32).max(0);
    let y0 = (bounds.y0.floor() as i32).max(0);
    let x1 = (bounds.x1.ceil() as i32).min(max_x);
    let y1 = (bounds.y1.ceil() as i32).min(max_y);
    (x0, y0, x1, y1)
}

// ─── Grain and spray ─────────────────────────────────────────────────────

fn scatter<R: Rng + ?Sized>(
    rng: &mut R,
    center: Point,
    spread: f64,
    count: usize,
    size: i32,
    mut alpha: impl FnMut(&mut R) -> f32,
) -> SmallVec<[Dab; 32]> {
    (0..count)
        .map(|_| {
            let dx = if spread > 0.0 { rng.gen_range(-spread..spread) } else { 0.0 };
            let dy = if spread > 0.0 { rng.gen_range(-spread..spread) } else { 0.0 };
            Dab {
                x: (center.x + dx).floor() as i32,
                y: (center.y + dy).floor() as i32,
                size,
                alpha: alpha(rng),
            }
        })
        .collect()
}

fn paint_dabs(surface: &mut Surface, dabs: &[Dab], color: Color) {
    for dab in dabs {
        surface.blend_rect(dab.x, dab.y, dab.size, dab.size, color, dab.alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::BrushCatalog;
    use crate::id::BrushId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn canvas() -> Surface {
        Surface::new(100, 100, Color::WHITE).unwrap()
    }

    fn brush(id: &str) -> &'static BrushProfile {
        BrushCatalog::standard().get(BrushId::intern(id)).unwrap()
    }

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::new(Point::new(x0, y0), Point::new(x1, y1), true)
    }

    fn changed(a: &Surface, b: &Surface) -> usize {
        a.pixels()
            .chunks_exact(4)
            .zip(b.pixels().chunks_exact(4))
            .filter(|(x, y)| x != y)
            .count()
    }

    #[test]
    fn line_covers_segment_and_respects_width() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = rendered(&canvas(), seg(10.0, 50.0, 90.0, 50.0), brush("brush"), Color::BLACK, &mut rng);
        // Width 6 centered on y=50: rows 47..=52 solid.
        for y in 47..=52 {
            assert_eq!(s.pixel(50, y), Some(Color::BLACK), "row {y}");
        }
        assert_eq!(s.pixel(50, 44), Some(Color::WHITE));
        assert_eq!(s.pixel(50, 56), Some(Color::WHITE));
        // Round caps reach past the endpoints by half the width.
        assert_eq!(s.pixel(91, 50), Some(Color::BLACK));
        assert_eq!(s.pixel(95, 50), Some(Color::WHITE));
    }

    #[test]
    fn zero_length_segment_paints_a_dot() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = rendered(&canvas(), seg(20.0, 20.0, 20.0, 20.0), brush("large_brush"), Color::BLACK, &mut rng);
        assert_eq!(s.pixel(20, 20), Some(Color::BLACK));
        assert_eq!(s.pixel(30, 20), Some(Color::WHITE));
    }

    #[test]
    fn marker_is_translucent() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = rendered(&canvas(), seg(10.0, 50.0, 90.0, 50.0), brush("marker"), Color::BLACK, &mut rng);
        let p = s.pixel(50, 50).unwrap();
        assert!(p.r > 60 && p.r < 90, "expected ~30% white left, got {p}");
    }

    #[test]
    fn marker_joins_are_not_double_blended() {
        let mut rng = StdRng::seed_from_u64(1);
        let b = brush("marker");
        let mut s = canvas();
        render_segment(&mut s, seg(10.0, 50.0, 50.0, 50.0), b, Color::BLACK, &mut rng);
        render_segment(
            &mut s,
            Segment::new(Point::new(50.0, 50.0), Point::new(90.0, 50.0), false),
            b,
            Color::BLACK,
            &mut rng,
        );
        assert_eq!(s.pixel(50, 50), s.pixel(30, 50));
        assert_eq!(s.pixel(50, 50), s.pixel(70, 50));
    }

    #[test]
    fn calligraphy_has_square_ends() {
        let mut rng = StdRng::seed_from_u64(1);
        // Width 15, half 7.5: the square cap fills the corner a round cap leaves empty.
        let s = rendered(&canvas(), seg(30.0, 50.0, 70.0, 50.0), brush("calligraphy_brush"), Color::BLACK, &mut rng);
        assert_eq!(s.pixel(75, 44), Some(Color::BLACK));
        let r = rendered(&canvas(), seg(30.0, 50.0, 70.0, 50.0), brush("huge_brush"), Color::BLACK, &mut rng);
        assert_ne!(r.pixel(78, 42), Some(Color::BLACK));
    }

    #[test]
    fn spray_does_not_interpolate() {
        let mut rng = StdRng::seed_from_u64(7);
        let base = canvas();
        let s = rendered(&base, seg(5.0, 5.0, 80.0, 80.0), brush("spray_small"), Color::BLACK, &mut rng);
        let n = changed(&base, &s);
        assert!(n > 0 && n <= spray_density(8.0));
        // Nothing near the segment start.
        for y in 0..20 {
            for x in 0..20 {
                assert_eq!(s.pixel(x, y), Some(Color::WHITE));
            }
        }
        // Everything within the spray radius of the end point.
        for (i, px) in s.pixels().chunks_exact(4).enumerate() {
            if px != Color::WHITE.to_array() {
                let (x, y) = ((i % 100) as i32, (i / 100) as i32);
                assert!((x - 80).abs() <= 8 && (y - 80).abs() <= 8, "stray dot at {x},{y}");
            }
        }
    }

    #[test]
    fn spray_density_scales_with_width() {
        assert_eq!(spray_density(8.0), 20);
        assert_eq!(spray_density(16.0), 40);
    }

    #[test]
    fn charcoal_only_leaves_grain() {
        let mut rng = StdRng::seed_from_u64(3);
        let base = canvas();
        let s = rendered(&base, seg(10.0, 10.0, 50.0, 50.0), brush("charcoal_stick"), Color::BLACK, &mut rng);
        let n = changed(&base, &s);
        assert!(n > 0 && n <= CHARCOAL_DOTS * 4);
        // No solid segment between the two pointer positions.
        assert_eq!(s.pixel(30, 30), Some(Color::WHITE));
        assert_eq!(s.pixel(20, 20), Some(Color::WHITE));
    }

    #[test]
    fn watercolor_is_a_soft_disc() {
        let mut rng = StdRng::seed_from_u64(3);
        let s = rendered(&canvas(), seg(0.0, 0.0, 50.0, 50.0), brush("watercolor_small"), Color::BLACK, &mut rng);
        let center = s.pixel(50, 50).unwrap();
        let edge = s.pixel(65, 50).unwrap();
        assert!(center.r < 255 && center.r > 180, "got {center}");
        assert!(edge.r > center.r);
        assert_eq!(s.pixel(75, 50), Some(Color::WHITE));
    }

    #[test]
    fn pencil_seeds_are_reproducible() {
        let a = rendered(&canvas(), seg(10.0, 10.0, 40.0, 30.0), brush("pencil"), Color::BLACK, &mut StdRng::seed_from_u64(9));
        let b = rendered(&canvas(), seg(10.0, 10.0, 40.0, 30.0), brush("pencil"), Color::BLACK, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn rendered_leaves_input_untouched() {
        let base = canvas();
        let mut rng = StdRng::seed_from_u64(1);
        let _ = rendered(&base, seg(0.0, 0.0, 99.0, 99.0), brush("huge_brush"), Color::BLACK, &mut rng);
        assert!(base.is_filled_with(Color::WHITE));
        assert!(cleared(&base, Color::BLACK).is_filled_with(Color::BLACK));
    }

    #[test]
    fn offscreen_segment_is_clipped() {
        let base = canvas();
        let mut rng = StdRng::seed_from_u64(1);
        let s = rendered(&base, seg(-50.0, -50.0, -10.0, -10.0), brush("brush"), Color::BLACK, &mut rng);
        assert_eq!(s, base);
    }

    #[test]
    fn unrenderable_brush_paints_nothing() {
        let base = canvas();
        let mut rng = StdRng::seed_from_u64(1);
        for width in [f32::NAN, f32::INFINITY, 1.0e30] {
            let spray = BrushProfile::new("bad_spray", "Bad", StrokeKind::SprayDot, width);
            let s = rendered(&base, seg(10.0, 10.0, 50.0, 50.0), &spray, Color::BLACK, &mut rng);
            assert_eq!(s, base, "width {width}");
        }
    }

    #[test]
    fn spray_density_is_bounded() {
        assert_eq!(spray_density(4.0), SPRAY_MIN_DOTS);
        assert_eq!(spray_density(f32::NAN), SPRAY_MIN_DOTS);
        assert_eq!(spray_density(1.0e30), (MAX_BASE_WIDTH * 2.5) as usize);
    }
}
