//! Data-space ↔ screen-space transforms.
//!
//! Both mappers are pure math over an already-computed plot rectangle;
//! they hold no chart state. The inverse directions drive pointer
//! hit-testing for tooltips.

use std::f64::consts::PI;
use trazar_core::{Point, Rect};

/// Normalize an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a < 0.0 {
        a += 2.0 * PI;
    }
    a
}

/// Linear per-axis mapping between data values and pixels.
///
/// Screen y grows downward while data y grows upward; the mapper inverts
/// the vertical axis. The `transpose` flag swaps the axis roles so the
/// independent axis runs vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartesianMapper {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    plot: Rect,
    transpose: bool,
}

impl CartesianMapper {
    /// Create a mapper over the given data ranges and plot rectangle.
    ///
    /// Zero-span ranges are treated as spans of one unit so the mapper
    /// stays finite; callers normally never see that case because the
    /// auto-range engine widens degenerate ranges first.
    #[must_use]
    pub fn new(x_range: (f64, f64), y_range: (f64, f64), plot: Rect, transpose: bool) -> Self {
        Self {
            x_min: x_range.0,
            x_max: x_range.1,
            y_min: y_range.0,
            y_max: y_range.1,
            plot,
            transpose,
        }
    }

    fn x_span(&self) -> f64 {
        let span = self.x_max - self.x_min;
        if span.abs() < f64::EPSILON {
            1.0
        } else {
            span
        }
    }

    fn y_span(&self) -> f64 {
        let span = self.y_max - self.y_min;
        if span.abs() < f64::EPSILON {
            1.0
        } else {
            span
        }
    }

    /// Pixels per data unit along the independent axis.
    #[must_use]
    pub fn x_pixels_per_unit(&self) -> f64 {
        if self.transpose {
            f64::from(self.plot.height) / self.x_span()
        } else {
            f64::from(self.plot.width) / self.x_span()
        }
    }

    /// Pixels per data unit along the dependent axis.
    #[must_use]
    pub fn y_pixels_per_unit(&self) -> f64 {
        if self.transpose {
            f64::from(self.plot.width) / self.y_span()
        } else {
            f64::from(self.plot.height) / self.y_span()
        }
    }

    /// Map a data-space point to a pixel position.
    #[must_use]
    pub fn data_to_screen(&self, x: f64, y: f64) -> Point {
        let tx = (x - self.x_min) / self.x_span();
        let ty = (y - self.y_min) / self.y_span();
        if self.transpose {
            // Independent axis runs vertically, bottom to top.
            Point::new(
                (ty as f32).mul_add(self.plot.width, self.plot.x),
                (tx as f32).mul_add(-self.plot.height, self.plot.bottom()),
            )
        } else {
            Point::new(
                (tx as f32).mul_add(self.plot.width, self.plot.x),
                (ty as f32).mul_add(-self.plot.height, self.plot.bottom()),
            )
        }
    }

    /// Map a pixel position back to data space.
    #[must_use]
    pub fn screen_to_data(&self, p: Point) -> (f64, f64) {
        let (tx, ty) = if self.transpose {
            (
                f64::from(self.plot.bottom() - p.y) / f64::from(self.plot.height),
                f64::from(p.x - self.plot.x) / f64::from(self.plot.width),
            )
        } else {
            (
                f64::from(p.x - self.plot.x) / f64::from(self.plot.width),
                f64::from(self.plot.bottom() - p.y) / f64::from(self.plot.height),
            )
        };
        (
            tx.mul_add(self.x_span(), self.x_min),
            ty.mul_add(self.y_span(), self.y_min),
        )
    }
}

/// Polar mapping between `(phi, r)` data values and pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarMapper {
    center: Point,
    pixels_per_unit: f64,
    rotation: f64,
    clockwise: bool,
}

impl PolarMapper {
    /// Create a mapper with the given pixel center and radial scale.
    ///
    /// `rotation` offsets the zero angle; `clockwise` flips the angular
    /// direction.
    #[must_use]
    pub const fn new(center: Point, pixels_per_unit: f64, rotation: f64, clockwise: bool) -> Self {
        Self {
            center,
            pixels_per_unit,
            rotation,
            clockwise,
        }
    }

    /// Pixel center of the polar plane.
    #[must_use]
    pub const fn center(&self) -> Point {
        self.center
    }

    /// The corrected screen angle for a data-space angle.
    fn corrected(&self, phi: f64) -> f64 {
        if self.clockwise {
            normalize_angle(self.rotation - phi)
        } else {
            normalize_angle(phi + self.rotation)
        }
    }

    /// Map `(phi, r)` to a pixel position.
    ///
    /// A negative radius is taken as its absolute value with a π phase
    /// flip, so `(phi, -r)` lands opposite `(phi, r)`.
    #[must_use]
    pub fn data_to_screen(&self, phi: f64, r: f64) -> Point {
        let (phi, r) = if r < 0.0 { (phi + PI, -r) } else { (phi, r) };
        let angle = self.corrected(phi);
        let radius = r * self.pixels_per_unit;
        Point::new(
            (radius * angle.cos()) as f32 + self.center.x,
            (-radius * angle.sin()) as f32 + self.center.y,
        )
    }

    /// Map a pixel position back to `(phi, r)`.
    ///
    /// Returns `None` at the polar origin, where the angle is undefined.
    #[must_use]
    pub fn screen_to_data(&self, p: Point) -> Option<(f64, f64)> {
        let dx = f64::from(p.x - self.center.x);
        let dy = f64::from(self.center.y - p.y);
        let dist = dx.hypot(dy);
        if dist == 0.0 {
            return None;
        }
        // acos gives [0, π]; the sign of dy picks the quadrant mirror.
        let mut angle = (dx / dist).acos();
        if dy < 0.0 {
            angle = 2.0f64.mul_add(PI, -angle);
        }
        let phi = if self.clockwise {
            normalize_angle(self.rotation - angle)
        } else {
            normalize_angle(angle - self.rotation)
        };
        Some((phi, dist / self.pixels_per_unit))
    }
}
