//! Legend model.

use serde::{Deserialize, Serialize};
use trazar_core::Color;

use crate::series::Series;

/// One legend row: a color swatch and a name.
///
/// A stacked series contributes one parent row plus a row per child, so
/// each stack segment's color is identifiable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Display name
    pub name: String,
    /// Swatch color
    pub color: Color,
    /// Sub-entries for stacked children
    pub children: Vec<LegendEntry>,
}

/// Build legend rows from the chart's series, visible ones only.
pub(crate) fn build_entries(series: &[Box<dyn Series>]) -> Vec<LegendEntry> {
    series
        .iter()
        .filter(|s| s.visible())
        .map(|s| {
            let children = s.stack_children().map_or_else(Vec::new, |kids| {
                kids.iter()
                    .filter(|c| c.visible())
                    .map(|c| LegendEntry {
                        name: c.name().to_owned(),
                        color: c.color(),
                        children: Vec::new(),
                    })
                    .collect()
            });
            LegendEntry {
                name: s.name().to_owned(),
                color: s.color(),
                children,
            }
        })
        .collect()
}
