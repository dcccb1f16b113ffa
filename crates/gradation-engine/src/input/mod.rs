//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates platform events into `InputEvent`s via `platform`.

mod click;
mod frame;
mod state;
mod types;

pub(crate) mod platform;

pub use click::{ClickTracker, DOUBLE_CLICK_DISTANCE, DOUBLE_CLICK_INTERVAL};
pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};
