use std::collections::HashSet;
use std::time::Instant;

use crate::coords::Vec2;

use super::click::ClickTracker;
use super::frame::InputFrame;
use super::types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state for a single window.
///
/// Holds "is down" information and current pointer position.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in logical pixels.
    ///
    /// Kept when the pointer leaves the window while a button is held, so a
    /// drag that ends outside still reports its last known position.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,

    clicks: ClickTracker,
}

impl InputState {
    /// Applies an input event stamped with the current time.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        self.apply_event_at(frame, ev, Instant::now());
    }

    /// Applies an input event to the current state and writes deltas to `frame`.
    ///
    /// A press that completes a double click is followed in `frame.events` by
    /// an `InputEvent::PointerDoubleClick` for the same button.
    pub fn apply_event_at(&mut self, frame: &mut InputFrame, ev: InputEvent, at: Instant) {
        let mut double_click = None;

        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoid stuck keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                    self.clicks.reset();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                if self.buttons_down.is_empty() {
                    self.pointer_pos = None;
                }
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton(pb) => {
                let PointerButtonEvent { button, state, x, y, modifiers } = *pb;
                self.pointer_pos = Some((x, y));
                self.modifiers = modifiers;

                match state {
                    MouseButtonState::Pressed => {
                        if self.buttons_down.insert(button) {
                            frame.buttons_pressed.insert(button);
                        }
                        if self.clicks.register(at, Vec2::new(x, y), button) {
                            double_click = Some(*pb);
                        }
                    }
                    MouseButtonState::Released => {
                        if self.buttons_down.remove(&button) {
                            frame.buttons_released.insert(button);
                        }
                    }
                }
            }

            InputEvent::PointerDoubleClick(_) => {}
        }

        frame.push_event(ev);

        if let Some(pb) = double_click {
            log::trace!("double click {:?} at ({}, {})", pb.button, pb.x, pb.y);
            frame.push_event(InputEvent::PointerDoubleClick(pb));
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }

    /// Pointer position as a `Vec2`, when known.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer_pos.map(|(x, y)| Vec2::new(x, y))
    }
}
