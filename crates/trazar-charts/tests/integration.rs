//! Integration tests for trazar-charts.
//!
//! These drive the public API end-to-end: charts, the auto engine,
//! series mutation, geometry, and the renderer.

use chrono::NaiveDate;
use trazar_charts::{
    Axis, AxisDomain, BarSeries, BoxSeries, BoxSummary, Chart, ChartRenderer, DataPoint, Key,
    Plane, PointSeries, Series, StackedSeries, Viewport,
};
use trazar_core::{ChartError, ChartTheme, DrawCommand, PointerEvent, Renderer, Size};

fn line(name: &str, points: &[(f64, f64)]) -> Box<PointSeries> {
    let mut s = PointSeries::line(name);
    for &(x, y) in points {
        s.push(DataPoint::new(Key::N(x), y)).unwrap();
    }
    Box::new(s)
}

// =============================================================================
// Auto-range end-to-end
// =============================================================================

#[test]
fn test_auto_range_and_strict_interior_delete() {
    let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
    chart
        .add_series(line(
            "s",
            &[(-1000.0, -1000.0), (0.0, 0.0), (1000.0, 1000.0)],
        ))
        .unwrap();

    assert_eq!(chart.from_axis().numeric_range(), (-1000.0, 1000.0));
    assert_eq!(chart.to_axis().numeric_range(), (-1000.0, 1000.0));
    assert_eq!(chart.to_axis().origin(), 0.0);

    // Deletion bounds are exclusive: only the point at -1000 is inside.
    let removed = chart
        .update_series::<PointSeries, _>("s", |s| s.delete_range(-1000.000_001, 0.0))
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(chart.from_axis().numeric_range(), (0.0, 1000.0));
    assert_eq!(chart.to_axis().numeric_range(), (0.0, 1000.0));
}

#[test]
fn test_recompute_reaches_fixed_point() {
    let mut chart = Chart::new(
        Plane::Cartesian,
        AxisDomain::Categorical,
        ChartTheme::light(),
    );
    let mut stack = StackedSeries::new("totals");
    for (name, vals) in [("a", [2.0, 1.0]), ("b", [3.0, 4.0])] {
        let mut child = BarSeries::new(name);
        for (i, &v) in vals.iter().enumerate() {
            let cat = if i == 0 { "x" } else { "y" };
            child.push(DataPoint::new(Key::C(cat.into()), v)).unwrap();
        }
        stack.add(child).unwrap();
    }
    chart.add_series(Box::new(stack)).unwrap();

    let range = chart.to_axis().numeric_range();
    let ticks = chart.to_axis().ticks().to_vec();
    chart.recompute();
    chart.recompute();
    assert_eq!(chart.to_axis().numeric_range(), range);
    assert_eq!(chart.to_axis().ticks(), ticks.as_slice());
    // Stacked totals: x = 2 + 3, y = 1 + 4.
    assert_eq!(range, (0.0, 5.0));
}

// =============================================================================
// Box plot visibility
// =============================================================================

#[test]
fn test_box_all_or_nothing_with_clipped_outliers() {
    let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
    let mut s = BoxSeries::new("spread");
    s.push(
        Key::N(0.0),
        BoxSummary::new(-1.0, -0.5, 0.0, 0.5, 1.0, vec![-2.0, 2.0]).unwrap(),
    )
    .unwrap();
    chart.add_series(Box::new(s)).unwrap();
    chart.edit_from_axis(|a| a.set_range(-1.0, 1.0)).unwrap();
    chart.edit_to_axis(|a| a.set_range(-1.0, 1.0)).unwrap();

    let vp = chart.viewport();
    let series = chart.series_by_name("spread").unwrap();
    // The whole box fits the viewport exactly, so all five edges render;
    // the outliers at plus/minus 2 are clipped away individually.
    assert_eq!(series.edges(&vp).len(), 5);
    assert_eq!(series.rects(&vp).len(), 1);
    assert!(series.nodes(&vp).is_empty());
}

// =============================================================================
// Error taxonomy: no partial mutation
// =============================================================================

#[test]
fn test_failed_operations_leave_state_untouched() {
    let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
    chart.add_series(line("a", &[(0.0, 1.0)])).unwrap();

    let err = chart.add_series(line("a", &[(5.0, 5.0)])).unwrap_err();
    assert!(matches!(err, ChartError::DuplicateSeriesName(_)));
    assert_eq!(chart.series().len(), 1);
    assert_eq!(chart.from_axis().numeric_range(), (-1.0, 1.0));

    let err = chart
        .edit_to_axis(|a| a.set_range(10.0, 0.0))
        .unwrap_err();
    assert!(matches!(err, ChartError::InvalidRange { .. }));
    assert!(chart.to_axis().is_auto_range());
}

#[test]
fn test_stacked_rejects_negative_push_without_storing() {
    let mut stack = StackedSeries::new("totals");
    stack.add(BarSeries::new("a")).unwrap();
    let child = stack.child_mut("a").unwrap();
    assert!(child.push(DataPoint::new(Key::C("x".into()), -1.0)).is_err());
    assert!(child.is_empty());
}

// =============================================================================
// Polar charts
// =============================================================================

#[test]
fn test_polar_chart_end_to_end() {
    let mut chart = Chart::new(Plane::Polar, AxisDomain::Numerical, ChartTheme::light());
    let mut s = PointSeries::line("orbit");
    for i in 0..8 {
        s.push(DataPoint::new(Key::N(f64::from(i)), 5.0)).unwrap();
    }
    chart.add_series(Box::new(s)).unwrap();

    // Radius range never dips below zero.
    let (r_min, _) = chart.to_axis().numeric_range();
    assert!(r_min >= 0.0);

    let mut renderer = ChartRenderer::new(chart);
    renderer.layout(Size::new(300.0, 300.0));
    assert!(!renderer.objects().is_empty());

    // Hovering the center leaves the tooltip hidden: no defined angle.
    renderer.pointer_event(&PointerEvent::Entered {
        position: trazar_core::Point::new(150.0, 150.0),
        viewport: Size::new(300.0, 300.0),
    });
    assert!(!renderer.tooltip().visible());
}

#[test]
fn test_polar_rejects_negative_series() {
    let mut chart = Chart::new(Plane::Polar, AxisDomain::Numerical, ChartTheme::light());
    assert!(matches!(
        chart.add_series(line("bad", &[(0.0, -3.0)])),
        Err(ChartError::InvalidValue(_))
    ));
    assert!(chart.series().is_empty());
}

// =============================================================================
// Temporal axes
// =============================================================================

#[test]
fn test_temporal_axis_mirrors_to_seconds() {
    let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Temporal, ChartTheme::light());
    let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let mut s = PointSeries::line("temp");
    for hour in [0, 6, 12] {
        s.push(DataPoint::new(
            Key::T(day.and_hms_opt(hour, 0, 0).unwrap()),
            f64::from(hour),
        ))
        .unwrap();
    }
    chart.add_series(Box::new(s)).unwrap();

    // Twelve hours of data map onto 0..43200 seconds.
    assert_eq!(chart.from_axis().numeric_range(), (0.0, 43200.0));
    assert_eq!(
        chart.from_axis().temporal_origin(),
        Some(day.and_hms_opt(0, 0, 0).unwrap())
    );
    assert!(!chart.from_axis().ticks().is_empty());
}

// =============================================================================
// Rendering and serialization
// =============================================================================

#[test]
fn test_render_commands_serialize() {
    let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::dark());
    chart.set_title("throughput");
    chart.add_series(line("rps", &[(0.0, 10.0), (1.0, 40.0)])).unwrap();

    let mut renderer = ChartRenderer::new(chart);
    renderer.layout(Size::new(640.0, 480.0));

    let json = serde_json::to_string(renderer.objects()).unwrap();
    let back: Vec<DrawCommand> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), renderer.objects().len());
    assert!(back
        .iter()
        .any(|c| matches!(c, DrawCommand::Text { content, .. } if content == "throughput")));
}

#[test]
fn test_viewport_tracks_axis_edits() {
    let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
    chart.edit_from_axis(|a| a.set_range(2.0, 4.0)).unwrap();
    chart.edit_to_axis(|a| a.set_range(-3.0, 3.0)).unwrap();
    assert_eq!(chart.viewport(), Viewport::new(2.0, 4.0, -3.0, 3.0));
}

#[test]
fn test_manual_axis_roundtrip_through_reset() {
    let mut axis = Axis::new(AxisDomain::Numerical);
    axis.set_range(0.0, 10.0).unwrap();
    axis.set_origin(2.0).unwrap();
    assert!(!axis.is_auto_range());
    axis.reset_range();
    axis.reset_origin();
    assert!(axis.is_auto_range() && axis.is_auto_origin());
}
