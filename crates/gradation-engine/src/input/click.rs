use std::time::{Duration, Instant};

use crate::coords::Vec2;

use super::types::MouseButton;

/// Longest gap between two presses that still counts as a double click.
pub const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(400);

/// Farthest the pointer may travel between presses, in logical pixels.
pub const DOUBLE_CLICK_DISTANCE: f32 = 4.0;

/// Detects double clicks from a stream of button presses.
///
/// A third press right after a double click starts a new sequence rather than
/// producing another double click.
#[derive(Debug, Default, Clone)]
pub struct ClickTracker {
    last: Option<(Instant, Vec2, MouseButton)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a press; returns `true` when it completes a double click.
    pub fn register(&mut self, at: Instant, pos: Vec2, button: MouseButton) -> bool {
        let double = match self.last {
            Some((prev_at, prev_pos, prev_button)) => {
                prev_button == button
                    && at.saturating_duration_since(prev_at) <= DOUBLE_CLICK_INTERVAL
                    && prev_pos.distance(pos) <= DOUBLE_CLICK_DISTANCE
            }
            None => false,
        };

        self.last = if double { None } else { Some((at, pos, button)) };
        double
    }

    /// Forgets the pending press.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
