//! The chart renderer: a [`Renderer`] wrapping a [`Chart`].
//!
//! Hosting toolkits drive this object: `layout` replays the chart into a
//! recording canvas, `objects` hands back the draw commands, and pointer
//! events feed the hover tooltip through the inverse coordinate
//! transform.

use trazar_core::{DrawCommand, Point, PointerEvent, RecordingCanvas, Renderer, Size};

use crate::chart::{Chart, Plane};
use crate::layout::{self, Mapping};
use crate::tooltip::TooltipState;

/// Smallest widget size worth laying out.
const MIN_SIDE: f32 = 100.0;

/// Renders a [`Chart`] into draw commands and tracks hover state.
pub struct ChartRenderer {
    chart: Chart,
    tooltip: TooltipState,
    canvas: RecordingCanvas,
    size: Size,
}

impl ChartRenderer {
    /// Wrap a chart for rendering.
    #[must_use]
    pub fn new(chart: Chart) -> Self {
        Self {
            chart,
            tooltip: TooltipState::new(),
            canvas: RecordingCanvas::new(),
            size: Size::ZERO,
        }
    }

    /// The wrapped chart.
    #[must_use]
    pub const fn chart(&self) -> &Chart {
        &self.chart
    }

    /// Mutable access to the wrapped chart. Call
    /// [`refresh`](Renderer::refresh) afterwards to update the objects.
    pub fn chart_mut(&mut self) -> &mut Chart {
        &mut self.chart
    }

    /// Current tooltip state.
    #[must_use]
    pub const fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    fn update_tooltip(&mut self, position: Point) {
        let mapping = Mapping::new(&self.chart, self.size);
        match mapping.to_data(position) {
            Some((x, y)) => {
                let text = match self.chart.plane() {
                    Plane::Cartesian => format!("x = {x:.3}, y = {y:.3}"),
                    Plane::Polar => format!("phi = {x:.3}, r = {y:.3}"),
                };
                self.tooltip.show(text, position);
            }
            None => self.tooltip.hide(),
        }
    }

    fn replay(&mut self) {
        self.canvas.clear();
        layout::render(&self.chart, &self.tooltip, self.size, &mut self.canvas);
    }
}

impl Renderer for ChartRenderer {
    fn objects(&self) -> &[DrawCommand] {
        self.canvas.commands()
    }

    fn layout(&mut self, size: Size) {
        self.size = size;
        self.replay();
    }

    fn refresh(&mut self) {
        self.chart.recompute();
        self.replay();
    }

    fn min_size(&self) -> Size {
        Size::new(MIN_SIDE, MIN_SIDE)
    }

    fn pointer_event(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Entered { position, viewport } => {
                self.size = *viewport;
                self.tooltip.pointer_entered();
                self.update_tooltip(*position);
                self.replay();
            }
            PointerEvent::Moved { position, viewport } => {
                self.size = *viewport;
                if self.tooltip.pointer_moved() {
                    self.update_tooltip(*position);
                    self.replay();
                }
            }
            PointerEvent::Left => {
                self.tooltip.pointer_left();
                self.replay();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisDomain;
    use crate::series::{DataPoint, Key, PointSeries};
    use trazar_core::ChartTheme;

    fn renderer() -> ChartRenderer {
        let mut chart = Chart::new(Plane::Cartesian, AxisDomain::Numerical, ChartTheme::light());
        let mut s = PointSeries::line("l");
        s.push(DataPoint::new(Key::N(0.0), 0.0)).unwrap();
        s.push(DataPoint::new(Key::N(10.0), 10.0)).unwrap();
        chart.add_series(Box::new(s)).unwrap();
        let mut r = ChartRenderer::new(chart);
        r.layout(Size::new(400.0, 300.0));
        r
    }

    #[test]
    fn test_layout_produces_objects() {
        let r = renderer();
        assert!(!r.objects().is_empty());
    }

    #[test]
    fn test_refresh_after_mutation_changes_objects() {
        let circles = |r: &ChartRenderer| {
            r.objects()
                .iter()
                .filter(|c| matches!(c, DrawCommand::Circle { .. }))
                .count()
        };
        let mut r = renderer();
        // Two line points render as two dot markers.
        assert_eq!(circles(&r), 2);
        r.chart_mut()
            .update_series::<PointSeries, _>("l", |s| {
                s.push(DataPoint::new(Key::N(20.0), 5.0)).unwrap();
            })
            .unwrap();
        r.refresh();
        assert_eq!(circles(&r), 3);
    }

    #[test]
    fn test_enter_shows_tooltip() {
        let mut r = renderer();
        r.pointer_event(&PointerEvent::Entered {
            position: Point::new(200.0, 150.0),
            viewport: Size::new(400.0, 300.0),
        });
        assert!(r.tooltip().visible());
        assert!(r.tooltip().text().unwrap().starts_with("x = "));
    }

    #[test]
    fn test_moves_are_rate_limited() {
        let mut r = renderer();
        r.pointer_event(&PointerEvent::Entered {
            position: Point::new(200.0, 150.0),
            viewport: Size::new(400.0, 300.0),
        });
        let first = r.tooltip().text().unwrap().to_owned();
        // Three moves are absorbed; the fourth refreshes the content.
        for i in 1..=3 {
            r.pointer_event(&PointerEvent::Moved {
                position: Point::new(200.0 + i as f32 * 10.0, 150.0),
                viewport: Size::new(400.0, 300.0),
            });
            assert_eq!(r.tooltip().text().unwrap(), first);
        }
        r.pointer_event(&PointerEvent::Moved {
            position: Point::new(260.0, 150.0),
            viewport: Size::new(400.0, 300.0),
        });
        assert_ne!(r.tooltip().text().unwrap(), first);
    }

    #[test]
    fn test_leave_hides_tooltip() {
        let mut r = renderer();
        r.pointer_event(&PointerEvent::Entered {
            position: Point::new(200.0, 150.0),
            viewport: Size::new(400.0, 300.0),
        });
        r.pointer_event(&PointerEvent::Left);
        assert!(!r.tooltip().visible());
    }

    #[test]
    fn test_min_size() {
        let r = renderer();
        assert_eq!(r.min_size(), Size::new(100.0, 100.0));
    }
}
