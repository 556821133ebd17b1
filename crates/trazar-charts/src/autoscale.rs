//! Auto-range, auto-origin, and tick generation.
//!
//! These are the algorithms the chart orchestrator runs on every data
//! change to derive sensible axis state from the aggregate extent of all
//! attached series. Tick positions use half-open interval semantics: a
//! tick belongs to a range when `min ≤ t < max + step·ε`.

/// Union of per-series `(min, max)` extents.
///
/// Series without data contribute nothing. With no data at all, the range
/// defaults to a unit interval around zero, or around the pinned origin
/// when one exists. The result is passed through [`widen_degenerate`].
#[must_use]
pub fn aggregate_range<I>(extents: I, pinned_origin: Option<f64>) -> (f64, f64)
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut acc: Option<(f64, f64)> = None;
    for (lo, hi) in extents {
        acc = Some(match acc {
            Some((min, max)) => (min.min(lo), max.max(hi)),
            None => (lo, hi),
        });
    }
    match acc {
        Some((min, max)) => widen_degenerate(min, max),
        None => {
            let origin = pinned_origin.unwrap_or(0.0);
            (origin - 1.0, origin + 1.0)
        }
    }
}

/// Widen a range whose span is negligible next to its endpoints.
///
/// A span smaller than 1/1000 of the larger-magnitude endpoint (or an
/// exactly empty span) becomes a span of 2 centered on the maximum.
#[must_use]
pub fn widen_degenerate(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    let larger = min.abs().max(max.abs());
    if span == 0.0 || span < larger / 1000.0 {
        (max - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}

/// De-duplicated union of category sets, in order of first appearance.
#[must_use]
pub fn aggregate_categories<'a, I>(sets: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut out: Vec<String> = Vec::new();
    for set in sets {
        for category in set {
            if !out.contains(category) {
                out.push(category.clone());
            }
        }
    }
    out
}

/// Default origin for a numerical range: zero, pulled inside the range
/// when zero falls outside it.
#[must_use]
pub fn auto_origin(min: f64, max: f64) -> f64 {
    0.0_f64.clamp(min, max)
}

/// Smallest power of ten strictly greater than `span`.
///
/// Used to derive the label-formatting magnitude for manual ticks.
#[must_use]
pub fn magnitude_order(span: f64) -> f64 {
    if span <= 0.0 || !span.is_finite() {
        return 1.0;
    }
    let mut order = 10.0_f64.powi(span.log10().floor() as i32);
    while order <= span {
        order *= 10.0;
    }
    order
}

/// Generate evenly spaced "nice" ticks covering `[min, max]`.
///
/// Returns the chosen step and the tick positions. The step is the 1/2/5
/// ladder value closest to `span / target` from above.
#[must_use]
pub fn nice_ticks(min: f64, max: f64, target: usize) -> (f64, Vec<f64>) {
    let span = max - min;
    if span <= 0.0 || !span.is_finite() {
        return (1.0, vec![min]);
    }

    let rough = span / target.max(2) as f64;
    let magnitude = 10.0_f64.powf(rough.log10().floor());
    let normalized = rough / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    let step = factor * magnitude;

    // First tick at or above min; half-open tolerance at the top end.
    let start = (min / step - 1e-9).ceil() * step;
    let mut ticks = Vec::new();
    let mut i = 0u32;
    loop {
        let v = f64::from(i).mul_add(step, start);
        if v > step.mul_add(1e-6, max) {
            break;
        }
        ticks.push(v);
        i += 1;
    }
    (step, ticks)
}

/// Format a tick value with precision appropriate for the step size.
#[must_use]
pub fn format_value(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    let decimals = decimals.min(6);
    let text = format!("{value:.decimals$}");
    // Avoid the "-0" label at the origin.
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        text.trim_start_matches('-').to_owned()
    } else {
        text
    }
}
