//! Pixel layout: axes, grid, series geometry, legend, and tooltip.
//!
//! The layout turns a chart's data-space state into canvas primitives.
//! Cartesian charts map through a linear [`CartesianMapper`]; polar
//! charts normalize the independent range onto a full turn and map
//! through a [`PolarMapper`]. Both keep the mapper around so pointer
//! positions can be inverted with the exact same transform.

use std::f64::consts::TAU;

use trazar_core::{Canvas, Color, Point, Rect, Size, StrokeStyle, TextStyle};

use crate::chart::{Chart, Plane};
use crate::coord::{CartesianMapper, PolarMapper};
use crate::raster::{self, FillLayer};
use crate::series::Series;
use crate::tooltip::TooltipState;

/// Tick mark length in pixels.
const TICK_PX: f32 = 4.0;
/// Distance from the axis to tick labels.
const TICK_LABEL_PX: f32 = 16.0;
/// Arrowhead wing length.
const ARROW_PX: f32 = 8.0;
/// Narrowest a box plot may render.
const MIN_BOX_PX: f32 = 5.0;
/// Legend row height.
const LEGEND_ROW_PX: f32 = 16.0;

/// The active screen/data transform, for drawing and pointer inversion.
pub(crate) enum Mapping {
    Cartesian(CartesianMapper),
    Polar {
        mapper: PolarMapper,
        x_min: f64,
        x_span: f64,
        r_max: f64,
    },
}

impl Mapping {
    /// Build the transform a chart of this size would draw with.
    pub(crate) fn new(chart: &Chart, size: Size) -> Self {
        match chart.plane() {
            Plane::Cartesian => {
                let plot = cartesian_plot(chart, size);
                Self::Cartesian(CartesianMapper::new(
                    chart.from_axis().numeric_range(),
                    chart.to_axis().numeric_range(),
                    plot,
                    chart.transpose(),
                ))
            }
            Plane::Polar => {
                let (center, radius_px) = polar_disc(chart, size);
                let (x_min, x_max) = chart.from_axis().numeric_range();
                let (_, r_max) = chart.to_axis().numeric_range();
                let r_max = r_max.max(f64::EPSILON);
                let x_span = (x_max - x_min).max(f64::EPSILON);
                Self::Polar {
                    mapper: PolarMapper::new(
                        center,
                        f64::from(radius_px) / r_max,
                        chart.rotation(),
                        chart.clockwise(),
                    ),
                    x_min,
                    x_span,
                    r_max,
                }
            }
        }
    }

    /// Map a data point to the screen.
    pub(crate) fn to_screen(&self, x: f64, y: f64) -> Point {
        match self {
            Self::Cartesian(m) => m.data_to_screen(x, y),
            Self::Polar {
                mapper,
                x_min,
                x_span,
                ..
            } => mapper.data_to_screen((x - x_min) / x_span * TAU, y),
        }
    }

    /// Invert a pointer position back to data coordinates.
    ///
    /// Returns `None` outside the mapped region (or at the polar center,
    /// where the angle is undefined).
    pub(crate) fn to_data(&self, p: Point) -> Option<(f64, f64)> {
        match self {
            Self::Cartesian(m) => Some(m.screen_to_data(p)),
            Self::Polar {
                mapper,
                x_min,
                x_span,
                r_max,
            } => {
                let (phi, r) = mapper.screen_to_data(p)?;
                (r <= *r_max).then(|| (phi / TAU * x_span + x_min, r))
            }
        }
    }
}

/// Render a chart into canvas primitives.
pub(crate) fn render(chart: &Chart, tooltip: &TooltipState, size: Size, canvas: &mut dyn Canvas) {
    canvas.fill_rect(
        Rect::new(0.0, 0.0, size.width, size.height),
        chart.theme().background,
    );
    match chart.plane() {
        Plane::Cartesian => render_cartesian(chart, size, canvas),
        Plane::Polar => render_polar(chart, size, canvas),
    }
    draw_legend(chart, size, canvas);
    draw_title(chart, size, canvas);
    draw_tooltip(chart, tooltip, canvas);
}

fn cartesian_plot(chart: &Chart, size: Size) -> Rect {
    let pad = chart.theme().padding;
    Rect::new(
        pad,
        pad,
        (size.width - 2.0 * pad).max(0.0),
        (size.height - 2.0 * pad).max(0.0),
    )
}

fn polar_disc(chart: &Chart, size: Size) -> (Point, f32) {
    let pad = chart.theme().padding;
    let radius = ((size.min_side() - 2.0 * pad) / 2.0).max(0.0);
    (Point::new(size.width / 2.0, size.height / 2.0), radius)
}

// =============================================================================
// Cartesian
// =============================================================================

fn render_cartesian(chart: &Chart, size: Size, canvas: &mut dyn Canvas) {
    let plot = cartesian_plot(chart, size);
    let mapping = Mapping::new(chart, size);
    let theme = chart.theme();
    let (x_min, x_max) = chart.from_axis().numeric_range();
    let (y_min, y_max) = chart.to_axis().numeric_range();

    // Grid under everything else.
    for tick in chart.from_axis().ticks() {
        let a = mapping.to_screen(tick.position, y_min);
        let b = mapping.to_screen(tick.position, y_max);
        canvas.draw_line(a, b, theme.grid_color, 1.0);
    }
    for tick in chart.to_axis().ticks() {
        let a = mapping.to_screen(x_min, tick.position);
        let b = mapping.to_screen(x_max, tick.position);
        canvas.draw_line(a, b, theme.grid_color, 1.0);
    }

    draw_fill_overlay(chart, plot, &mapping, canvas);

    // Axis lines run along the other axis's origin, pulled inside the
    // visible range when the origin sits outside it.
    if chart.from_axis().visible() {
        let o = chart.to_axis().origin().clamp(y_min, y_max);
        let a = mapping.to_screen(x_min, o);
        let b = mapping.to_screen(x_max, o);
        draw_axis_line(canvas, a, b, theme.axis_color);
        for tick in chart.from_axis().ticks() {
            let p = mapping.to_screen(tick.position, o);
            draw_tick(canvas, p, a, b, &tick.label, theme);
        }
        if !chart.from_axis().label().is_empty() {
            draw_text(canvas, chart.from_axis().label(), b, theme);
        }
    }
    if chart.to_axis().visible() {
        let o = chart.from_axis().origin().clamp(x_min, x_max);
        let a = mapping.to_screen(o, y_min);
        let b = mapping.to_screen(o, y_max);
        draw_axis_line(canvas, a, b, theme.axis_color);
        for tick in chart.to_axis().ticks() {
            let p = mapping.to_screen(o, tick.position);
            draw_tick(canvas, p, a, b, &tick.label, theme);
        }
        if !chart.to_axis().label().is_empty() {
            draw_text(canvas, chart.to_axis().label(), b, theme);
        }
    }

    let viewport = chart.viewport();
    for series in chart.series().iter().filter(|s| s.visible()) {
        if let Some(children) = series.stack_children() {
            for child in children.iter().filter(|c| c.visible()) {
                draw_series_rects(child, &viewport, &mapping, child.color(), false, canvas);
            }
        } else {
            draw_series_rects(
                series.as_ref(),
                &viewport,
                &mapping,
                series.color(),
                series.is_box(),
                canvas,
            );
        }
        for edge in series.edges(&viewport) {
            canvas.draw_line(
                mapping.to_screen(edge.x1, edge.y1),
                mapping.to_screen(edge.x2, edge.y2),
                series.color(),
                series.stroke_width(),
            );
        }
        for node in series.nodes(&viewport) {
            canvas.fill_circle(
                mapping.to_screen(node.x, node.y),
                series.marker_radius(),
                series.color(),
                None,
            );
        }
    }
}

fn draw_series_rects(
    series: &dyn Series,
    viewport: &crate::series::Viewport,
    mapping: &Mapping,
    color: Color,
    is_box: bool,
    canvas: &mut dyn Canvas,
) {
    for rect in series.rects(viewport) {
        let a = mapping.to_screen(rect.x_min, rect.y_min);
        let b = mapping.to_screen(rect.x_max, rect.y_max);
        let mut bounds = norm_rect(a, b);
        if is_box && bounds.width < MIN_BOX_PX {
            let center = bounds.x + bounds.width / 2.0;
            bounds.x = center - MIN_BOX_PX / 2.0;
            bounds.width = MIN_BOX_PX;
        }
        canvas.fill_rect(bounds, color);
    }
}

// =============================================================================
// Polar
// =============================================================================

fn render_polar(chart: &Chart, size: Size, canvas: &mut dyn Canvas) {
    let (center, radius_px) = polar_disc(chart, size);
    let mapping = Mapping::new(chart, size);
    let theme = chart.theme();
    let (x_min, x_max) = chart.from_axis().numeric_range();
    let (_, r_max) = chart.to_axis().numeric_range();
    let r_max = r_max.max(f64::EPSILON);

    // Radial grid circles at dependent-axis tick radii.
    for tick in chart.to_axis().ticks() {
        if tick.position <= 0.0 {
            continue;
        }
        let radius = (tick.position / r_max) as f32 * radius_px;
        canvas.fill_circle(
            center,
            radius,
            Color::TRANSPARENT,
            Some(StrokeStyle::new(theme.grid_color, 1.0)),
        );
    }

    let square = Rect::new(
        center.x - radius_px,
        center.y - radius_px,
        radius_px * 2.0,
        radius_px * 2.0,
    );
    draw_fill_overlay(chart, square, &mapping, canvas);

    // Angular axis: the outer circle plus spokes at independent ticks.
    if chart.from_axis().visible() {
        canvas.fill_circle(
            center,
            radius_px,
            Color::TRANSPARENT,
            Some(StrokeStyle::new(theme.axis_color, 1.0)),
        );
        for tick in chart.from_axis().ticks() {
            let rim = mapping.to_screen(tick.position, r_max);
            canvas.draw_line(center, rim, theme.grid_color, 1.0);
            let label_at = Point::new(
                (rim.x - center.x).mul_add(1.1, center.x),
                (rim.y - center.y).mul_add(1.1, center.y),
            );
            draw_text(canvas, &tick.label, label_at, theme);
        }
    }

    // Radial axis along the zero-angle ray, with an arrowhead.
    if chart.to_axis().visible() {
        let tip = mapping.to_screen(x_min, r_max);
        draw_axis_line(canvas, center, tip, theme.axis_color);
        for tick in chart.to_axis().ticks() {
            if tick.position < 0.0 {
                continue;
            }
            let p = mapping.to_screen(x_min, tick.position);
            draw_tick(canvas, p, center, tip, &tick.label, theme);
        }
    }

    let viewport = chart.viewport();
    for series in chart.series().iter().filter(|s| s.visible()) {
        if let Some(children) = series.stack_children() {
            for child in children.iter().filter(|c| c.visible()) {
                draw_polar_sectors(child, &viewport, &mapping, child.color(), canvas);
            }
        } else {
            draw_polar_sectors(series.as_ref(), &viewport, &mapping, series.color(), canvas);
        }
        for edge in series.edges(&viewport) {
            canvas.draw_line(
                mapping.to_screen(edge.x1, edge.y1),
                mapping.to_screen(edge.x2, edge.y2),
                series.color(),
                series.stroke_width(),
            );
        }
        for node in series.nodes(&viewport) {
            canvas.fill_circle(
                mapping.to_screen(node.x, node.y),
                series.marker_radius(),
                series.color(),
                None,
            );
        }
    }
}

/// A data-space rectangle on the polar plane is an annular sector; it is
/// drawn as a closed outline with the arcs sampled.
fn draw_polar_sectors(
    series: &dyn Series,
    viewport: &crate::series::Viewport,
    mapping: &Mapping,
    color: Color,
    canvas: &mut dyn Canvas,
) {
    const ARC_STEPS: usize = 12;
    for rect in series.rects(viewport) {
        let mut points = Vec::with_capacity(2 * (ARC_STEPS + 1) + 1);
        for i in 0..=ARC_STEPS {
            let t = i as f64 / ARC_STEPS as f64;
            let x = (rect.x_max - rect.x_min).mul_add(t, rect.x_min);
            points.push(mapping.to_screen(x, rect.y_max));
        }
        for i in (0..=ARC_STEPS).rev() {
            let t = i as f64 / ARC_STEPS as f64;
            let x = (rect.x_max - rect.x_min).mul_add(t, rect.x_min);
            points.push(mapping.to_screen(x, rect.y_min));
        }
        points.push(points[0]);
        canvas.draw_path(&points, color, 1.0);
    }
}

// =============================================================================
// Shared decoration
// =============================================================================

fn draw_fill_overlay(chart: &Chart, bounds: Rect, mapping: &Mapping, canvas: &mut dyn Canvas) {
    let layers: Vec<FillLayer<'_>> = chart
        .series()
        .iter()
        .filter(|s| s.visible() && s.uses_raster_fill())
        .map(|s| FillLayer {
            color: s.color(),
            claims: Box::new(move |x, y| s.claims(x, y)),
        })
        .collect();
    if let Some(trazar_core::DrawCommand::Raster {
        bounds,
        width,
        height,
        pixels,
    }) = raster::rasterize(bounds, &layers, |p| mapping.to_data(p))
    {
        canvas.draw_raster(bounds, width, height, pixels);
    }
}

fn draw_axis_line(canvas: &mut dyn Canvas, a: Point, b: Point, color: Color) {
    canvas.draw_line(a, b, color, 1.0);
    // Arrowhead at the max end.
    let len = a.distance(&b);
    if len < f32::EPSILON {
        return;
    }
    let back = ((a.x - b.x) / len, (a.y - b.y) / len);
    for angle in [std::f32::consts::PI / 7.0, -std::f32::consts::PI / 7.0] {
        let (sin, cos) = angle.sin_cos();
        let wing = (
            back.0.mul_add(cos, -back.1 * sin),
            back.0.mul_add(sin, back.1 * cos),
        );
        canvas.draw_line(
            b,
            Point::new(wing.0.mul_add(ARROW_PX, b.x), wing.1.mul_add(ARROW_PX, b.y)),
            color,
            1.0,
        );
    }
}

fn draw_tick(
    canvas: &mut dyn Canvas,
    p: Point,
    axis_a: Point,
    axis_b: Point,
    label: &str,
    theme: &trazar_core::ChartTheme,
) {
    let len = axis_a.distance(&axis_b);
    if len < f32::EPSILON {
        return;
    }
    let dir = ((axis_b.x - axis_a.x) / len, (axis_b.y - axis_a.y) / len);
    let perp = (-dir.1, dir.0);
    canvas.draw_line(
        p,
        Point::new(perp.0.mul_add(TICK_PX, p.x), perp.1.mul_add(TICK_PX, p.y)),
        theme.axis_color,
        1.0,
    );
    draw_text(
        canvas,
        label,
        Point::new(
            perp.0.mul_add(TICK_LABEL_PX, p.x),
            perp.1.mul_add(TICK_LABEL_PX, p.y),
        ),
        theme,
    );
}

fn draw_text(canvas: &mut dyn Canvas, content: &str, position: Point, theme: &trazar_core::ChartTheme) {
    canvas.draw_text(
        content,
        position,
        &TextStyle {
            size: theme.text_size,
            color: theme.text_color,
        },
    );
}

fn draw_legend(chart: &Chart, size: Size, canvas: &mut dyn Canvas) {
    let theme = chart.theme();
    let entries = chart.legend_entries();
    if entries.is_empty() {
        return;
    }
    let x = size.width - theme.padding - 90.0;
    let mut y = theme.padding + 4.0;
    for entry in &entries {
        draw_legend_row(canvas, x, &mut y, entry, theme);
        for child in &entry.children {
            draw_legend_row(canvas, x + 12.0, &mut y, child, theme);
        }
    }
}

fn draw_legend_row(
    canvas: &mut dyn Canvas,
    x: f32,
    y: &mut f32,
    entry: &crate::legend::LegendEntry,
    theme: &trazar_core::ChartTheme,
) {
    canvas.fill_rect(Rect::new(x, *y, 10.0, 10.0), entry.color);
    canvas.draw_text(
        &entry.name,
        Point::new(x + 14.0, *y + 9.0),
        &TextStyle {
            size: theme.text_size,
            color: theme.text_color,
        },
    );
    *y += LEGEND_ROW_PX;
}

fn draw_title(chart: &Chart, size: Size, canvas: &mut dyn Canvas) {
    if chart.title().is_empty() {
        return;
    }
    let theme = chart.theme();
    canvas.draw_text(
        chart.title(),
        Point::new(size.width / 2.0, theme.padding / 2.0),
        &TextStyle {
            size: theme.text_size * 1.3,
            color: theme.text_color,
        },
    );
}

fn draw_tooltip(chart: &Chart, tooltip: &TooltipState, canvas: &mut dyn Canvas) {
    let Some(text) = tooltip.text() else {
        return;
    };
    let theme = chart.theme();
    let anchor = tooltip.position();
    let width = (text.len() as f32).mul_add(theme.text_size * 0.55, 8.0);
    canvas.fill_rect(
        Rect::new(anchor.x + 8.0, anchor.y - 20.0, width, theme.text_size + 6.0),
        theme.background,
    );
    canvas.draw_text(
        text,
        Point::new(anchor.x + 12.0, anchor.y - 7.0),
        &TextStyle {
            size: theme.text_size,
            color: theme.text_color,
        },
    );
}

fn norm_rect(a: Point, b: Point) -> Rect {
    Rect::new(
        a.x.min(b.x),
        a.y.min(b.y),
        (a.x - b.x).abs(),
        (a.y - b.y).abs(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisDomain;
    use crate::series::{BoxSeries, BoxSummary, DataPoint, Key, PointSeries};
    use trazar_core::{ChartTheme, DrawCommand, RecordingCanvas};

    fn size() -> Size {
        Size::new(400.0, 300.0)
    }

    fn rendered(chart: &Chart) -> Vec<DrawCommand> {
        let mut canvas = RecordingCanvas::new();
        render(chart, &TooltipState::new(), size(), &mut canvas);
        canvas.take_commands()
    }

    #[test]
    fn test_background_first() {
        let chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
        let cmds = rendered(&chart);
        match &cmds[0] {
            DrawCommand::Rect { bounds, fill } => {
                assert_eq!(bounds.width, 400.0);
                assert_eq!(*fill, ChartTheme::light().background);
            }
            other => panic!("expected background rect, got {other:?}"),
        }
    }

    #[test]
    fn test_scatter_draws_one_circle_per_visible_point() {
        let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
        let mut s = PointSeries::scatter("pts");
        for x in 0..5 {
            s.push(DataPoint::new(Key::N(f64::from(x)), 1.0)).unwrap();
        }
        chart.add_series(Box::new(s)).unwrap();
        let circles = rendered(&chart)
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count();
        assert_eq!(circles, 5);
    }

    #[test]
    fn test_area_emits_raster_overlay() {
        let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
        let mut s = PointSeries::area("a");
        s.push(DataPoint::new(Key::N(0.0), 1.0)).unwrap();
        s.push(DataPoint::new(Key::N(1.0), 2.0)).unwrap();
        chart.add_series(Box::new(s)).unwrap();
        assert!(rendered(&chart)
            .iter()
            .any(|c| matches!(c, DrawCommand::Raster { .. })));
    }

    #[test]
    fn test_no_raster_without_fill_series() {
        let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
        let mut s = PointSeries::line("l");
        s.push(DataPoint::new(Key::N(0.0), 1.0)).unwrap();
        chart.add_series(Box::new(s)).unwrap();
        assert!(!rendered(&chart)
            .iter()
            .any(|c| matches!(c, DrawCommand::Raster { .. })));
    }

    #[test]
    fn test_hidden_axis_skips_arrow() {
        let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
        let baseline = rendered(&chart).len();
        chart.edit_from_axis(|a| a.set_visible(false));
        chart.edit_to_axis(|a| a.set_visible(false));
        assert!(rendered(&chart).len() < baseline);
    }

    #[test]
    fn test_box_width_clamped_to_minimum_pixels() {
        let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
        let mut s = BoxSeries::new("spread");
        // Many boxes over a wide range force a sub-pixel data width.
        for x in 0..200 {
            s.push(
                Key::N(f64::from(x) * 100.0),
                BoxSummary::new(1.0, 2.0, 3.0, 4.0, 5.0, vec![]).unwrap(),
            )
            .unwrap();
        }
        chart.add_series(Box::new(s)).unwrap();
        let widths: Vec<f32> = rendered(&chart)
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { bounds, fill } if *fill != ChartTheme::light().background => {
                    Some(bounds.width)
                }
                _ => None,
            })
            .collect();
        assert!(!widths.is_empty());
        assert!(widths.iter().all(|&w| w >= MIN_BOX_PX));
    }

    #[test]
    fn test_polar_draws_grid_circles() {
        let mut chart = Chart::new(Plane::Polar, AxisDomain::Numerical, ChartTheme::light());
        let mut s = PointSeries::scatter("r");
        s.push(DataPoint::new(Key::N(0.0), 5.0)).unwrap();
        s.push(DataPoint::new(Key::N(3.0), 8.0)).unwrap();
        chart.add_series(Box::new(s)).unwrap();
        let circles = rendered(&chart)
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { stroke: Some(_), .. }))
            .count();
        // At least the outer angular circle plus one radial grid ring.
        assert!(circles >= 2);
    }

    #[test]
    fn test_legend_lists_series_names() {
        let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
        let mut s = PointSeries::line("throughput");
        s.push(DataPoint::new(Key::N(0.0), 1.0)).unwrap();
        chart.add_series(Box::new(s)).unwrap();
        assert!(rendered(&chart).iter().any(|c| matches!(
            c,
            DrawCommand::Text { content, .. } if content == "throughput"
        )));
    }

    #[test]
    fn test_tooltip_rendered_when_visible() {
        let chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
        let mut tooltip = TooltipState::new();
        tooltip.show("x = 1.0, y = 2.0", Point::new(100.0, 100.0));
        let mut canvas = RecordingCanvas::new();
        render(&chart, &tooltip, size(), &mut canvas);
        assert!(canvas.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Text { content, .. } if content.contains("x = 1.0")
        )));
    }

    #[test]
    fn test_mapping_roundtrip_matches_render_transform() {
        let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
        let mut s = PointSeries::line("l");
        s.push(DataPoint::new(Key::N(0.0), 0.0)).unwrap();
        s.push(DataPoint::new(Key::N(10.0), 10.0)).unwrap();
        chart.add_series(Box::new(s)).unwrap();
        let mapping = Mapping::new(&chart, size());
        let p = mapping.to_screen(5.0, 5.0);
        let (x, y) = mapping.to_data(p).unwrap();
        assert!((x - 5.0).abs() < 1e-3);
        assert!((y - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_polar_inverse_rejects_outside_disc() {
        let mut chart = Chart::new(Plane::Polar, AxisDomain::Numerical, ChartTheme::light());
        let mut s = PointSeries::scatter("r");
        s.push(DataPoint::new(Key::N(0.0), 5.0)).unwrap();
        chart.add_series(Box::new(s)).unwrap();
        let mapping = Mapping::new(&chart, size());
        // A corner of the widget lies outside the disc radius.
        assert!(mapping.to_data(Point::new(0.0, 0.0)).is_none());
    }
}
