use gradation_engine::coords::Vec2;
use gradation_engine::input::{Key, MouseButton};

pub use gradation_engine::input::Modifiers;

/// Input events routed to the root widget, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Pointer moved to `pos` with the primary button up.
    Hover { pos: Vec2 },
    /// A mouse button went down at `pos`.
    Press { pos: Vec2, button: MouseButton },
    /// Pointer moved while the primary button is held.
    /// `start` is where the primary press happened.
    Drag { pos: Vec2, start: Vec2 },
    /// A mouse button went up at `pos`.
    ///
    /// Fires even when `pos` is outside the window. For the primary button,
    /// `start` is where the press happened; for others it equals `pos`.
    Release { pos: Vec2, start: Vec2, button: MouseButton },
    /// Second press of a double click, delivered right after its `Press`.
    DoubleClick { pos: Vec2, button: MouseButton },
    /// Key pressed (repeats included).
    KeyPress { key: Key, modifiers: Modifiers },
}

/// Result returned by [`crate::widget::Widget::on_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled; stop routing.
    Consumed,
    /// Event was not handled; keep routing.
    Ignored,
}
