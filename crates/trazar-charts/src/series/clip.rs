//! Segment-against-viewport clipping.

use super::{Edge, Viewport};

/// Clip a line segment against a viewport (Liang–Barsky).
///
/// An endpoint inside the viewport is returned unchanged; an endpoint
/// outside is moved onto the boundary it crossed by linear interpolation.
/// Returns `None` when the segment misses the viewport entirely or has a
/// non-finite coordinate.
#[must_use]
pub fn clip_segment(x1: f64, y1: f64, x2: f64, y2: f64, vp: &Viewport) -> Option<Edge> {
    if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
        return None;
    }

    let dx = x2 - x1;
    let dy = y2 - y1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    // (p, q) per boundary: p is the direction component against the
    // boundary, q the distance to it.
    let checks = [
        (-dx, x1 - vp.x_min),
        (dx, vp.x_max - x1),
        (-dy, y1 - vp.y_min),
        (dy, vp.y_max - y1),
    ];

    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                // Parallel to this boundary and outside it.
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                if t > t1 {
                    return None;
                }
                if t > t0 {
                    t0 = t;
                }
            } else {
                if t < t0 {
                    return None;
                }
                if t < t1 {
                    t1 = t;
                }
            }
        }
    }

    Some(Edge {
        x1: dx.mul_add(t0, x1),
        y1: dy.mul_add(t0, y1),
        x2: dx.mul_add(t1, x1),
        y2: dy.mul_add(t1, y1),
    })
}
