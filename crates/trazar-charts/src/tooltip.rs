//! Tooltip state with pointer-move rate limiting.

use serde::{Deserialize, Serialize};
use trazar_core::Point;

/// Number of pointer moves between tooltip refreshes.
const MOVE_INTERVAL: u32 = 4;

/// Hover tooltip content and throttling state.
///
/// Move events arrive at pointer-sampling rate; recomputing the tooltip
/// on each would re-run the inverse mapping per event for no visible
/// benefit. Only every fourth move (and the initial enter) triggers a
/// refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TooltipState {
    text: Option<String>,
    position: Point,
    move_count: u32,
}

impl TooltipState {
    /// Create an empty, hidden tooltip.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a pointer-enter. Always warrants a refresh.
    pub fn pointer_entered(&mut self) -> bool {
        self.move_count = 0;
        true
    }

    /// Note a pointer-move. Returns whether the content should be
    /// recomputed for this event.
    pub fn pointer_moved(&mut self) -> bool {
        self.move_count = self.move_count.wrapping_add(1);
        self.move_count % MOVE_INTERVAL == 0
    }

    /// Note a pointer-leave; hides the tooltip.
    pub fn pointer_left(&mut self) {
        self.text = None;
    }

    /// Set the tooltip content and anchor.
    pub fn show(&mut self, text: impl Into<String>, position: Point) {
        self.text = Some(text.into());
        self.position = position;
    }

    /// Hide without resetting the move counter.
    pub fn hide(&mut self) {
        self.text = None;
    }

    /// Whether the tooltip is currently shown.
    #[must_use]
    pub const fn visible(&self) -> bool {
        self.text.is_some()
    }

    /// Current text, if shown.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Anchor position in widget coordinates.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }
}
