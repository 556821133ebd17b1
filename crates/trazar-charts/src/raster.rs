//! Per-pixel fill overlay.
//!
//! Area fills (and opt-in bar fills) resolve through one shared RGBA
//! buffer covering the plot area. Each pixel center is mapped back to
//! data space and offered to the fill layers in registration order; the
//! first layer that claims it paints it. Overlaps therefore resolve the
//! same way regardless of draw order.

use trazar_core::{Color, DrawCommand, Point, Rect};

/// Translucency applied to fill colors in the overlay.
const FILL_ALPHA: f32 = 0.35;

/// One fill layer: a color and a data-space membership test.
pub(crate) struct FillLayer<'a> {
    pub(crate) color: Color,
    pub(crate) claims: Box<dyn Fn(f64, f64) -> bool + 'a>,
}

/// Render the fill layers into a raster command over `bounds`.
///
/// `inverse` maps a pixel position to data coordinates; pixels it maps
/// to `None` (outside the polar disc, degenerate mappers) stay
/// transparent. Returns `None` when there is nothing to rasterize.
pub(crate) fn rasterize(
    bounds: Rect,
    layers: &[FillLayer<'_>],
    inverse: impl Fn(Point) -> Option<(f64, f64)>,
) -> Option<DrawCommand> {
    let width = bounds.width.round().max(0.0) as usize;
    let height = bounds.height.round().max(0.0) as usize;
    if width == 0 || height == 0 || layers.is_empty() {
        return None;
    }

    let mut pixels = vec![0u8; width * height * 4];
    for row in 0..height {
        for col in 0..width {
            let px = bounds.x + col as f32 + 0.5;
            let py = bounds.y + row as f32 + 0.5;
            let Some((dx, dy)) = inverse(Point::new(px, py)) else {
                continue;
            };
            let Some(layer) = layers.iter().find(|l| (l.claims)(dx, dy)) else {
                continue;
            };
            let [r, g, b, a] = layer.color.with_alpha(layer.color.a * FILL_ALPHA).to_rgba8();
            let offset = (row * width + col) * 4;
            pixels[offset] = r;
            pixels[offset + 1] = g;
            pixels[offset + 2] = b;
            pixels[offset + 3] = a;
        }
    }

    Some(DrawCommand::Raster {
        bounds,
        width: width as u32,
        height: height as u32,
        pixels,
    })
}
