use gradation_engine::coords::{Rect, Vec2};
use gradation_engine::input::{
    InputEvent, KeyState, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent,
};
use gradation_engine::scene::DrawList;
use gradation_engine::window::CursorIcon;

use crate::event::UiEvent;
use crate::painter::Painter;
use crate::widget::Element;

// ── UiScene ───────────────────────────────────────────────────────────────

/// Drives a retained root widget from the engine's raw input stream.
///
/// Each frame the raw `InputEvent`s are turned into [`UiEvent`]s and routed to
/// the root in order. The draw list is cached and only rebuilt when the root
/// asks for a repaint or the viewport changed.
///
/// ```rust,ignore
/// if ui.frame(&mut root, viewport, &ctx.input_frame.events) {
///     log::trace!("draw list rebuilt");
/// }
/// rect_renderer.render(rctx, target, &mut ui.draw_list);
/// ```
pub struct UiScene {
    /// Draw list from the most recent repaint.
    pub draw_list: DrawList,

    viewport: Option<Vec2>,
    pointer: Vec2,
    /// Where the primary button went down, while it is held.
    press_start: Option<Vec2>,
}

impl UiScene {
    pub fn new() -> Self {
        Self {
            draw_list: DrawList::new(),
            viewport: None,
            pointer: Vec2::zero(),
            press_start: None,
        }
    }

    /// Last known pointer position in logical pixels.
    #[inline]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// True while the primary button is held after a press inside the window.
    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.press_start.is_some()
    }

    /// Converts raw input into widget events, tracking drag state across calls.
    pub fn translate(&mut self, events: &[InputEvent]) -> Vec<UiEvent> {
        let mut out = Vec::with_capacity(events.len());

        for ev in events {
            match ev {
                InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                    let pos = Vec2::new(*x, *y);
                    self.pointer = pos;
                    out.push(match self.press_start {
                        Some(start) => UiEvent::Drag { pos, start },
                        None => UiEvent::Hover { pos },
                    });
                }

                InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, .. }) => {
                    let pos = Vec2::new(*x, *y);
                    self.pointer = pos;
                    match state {
                        MouseButtonState::Pressed => {
                            if *button == MouseButton::Left {
                                self.press_start = Some(pos);
                            }
                            out.push(UiEvent::Press { pos, button: *button });
                        }
                        MouseButtonState::Released => {
                            let start = match button {
                                MouseButton::Left => self.press_start.take().unwrap_or(pos),
                                _ => pos,
                            };
                            out.push(UiEvent::Release { pos, start, button: *button });
                        }
                    }
                }

                InputEvent::PointerDoubleClick(pb) => {
                    out.push(UiEvent::DoubleClick { pos: Vec2::new(pb.x, pb.y), button: pb.button });
                }

                InputEvent::Key { key, state: KeyState::Pressed, modifiers, .. } => {
                    out.push(UiEvent::KeyPress { key: *key, modifiers: *modifiers });
                }

                // Losing focus mid-drag would otherwise leave the drag open forever.
                InputEvent::Focused(false) => {
                    if let Some(start) = self.press_start.take() {
                        out.push(UiEvent::Release { pos: self.pointer, start, button: MouseButton::Left });
                    }
                }

                _ => {}
            }
        }

        out
    }

    /// Routes `events` to `root`, then repaints if needed.
    ///
    /// Returns `true` when the draw list was rebuilt.
    pub fn frame(&mut self, root: &mut Element, viewport: Vec2, events: &[InputEvent]) -> bool {
        let rect = Rect::new(0.0, 0.0, viewport.x, viewport.y);

        for ev in self.translate(events) {
            root.on_event(&ev, rect);
        }

        let requested = root.take_repaint();
        let resized = self.viewport != Some(viewport);
        if !(requested || resized) {
            return false;
        }

        self.viewport = Some(viewport);
        self.draw_list.clear();
        {
            let mut painter = Painter::new(&mut self.draw_list);
            root.paint(&mut painter, rect);
        }
        true
    }

    /// Cursor the root wants at the current pointer position.
    #[inline]
    pub fn cursor(&self, root: &Element) -> CursorIcon {
        root.cursor(self.pointer)
    }
}

impl Default for UiScene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradation_engine::input::Modifiers;

    fn button(state: MouseButtonState, button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers: Modifiers::default() })
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    // ── translation ───────────────────────────────────────────────────────

    #[test]
    fn press_move_release_becomes_drag() {
        let mut ui = UiScene::new();
        let evs = ui.translate(&[
            moved(5.0, 5.0),
            button(MouseButtonState::Pressed, MouseButton::Left, 5.0, 5.0),
            moved(9.0, 6.0),
            button(MouseButtonState::Released, MouseButton::Left, 9.0, 6.0),
            moved(10.0, 6.0),
        ]);

        let start = Vec2::new(5.0, 5.0);
        assert_eq!(
            evs,
            vec![
                UiEvent::Hover { pos: start },
                UiEvent::Press { pos: start, button: MouseButton::Left },
                UiEvent::Drag { pos: Vec2::new(9.0, 6.0), start },
                UiEvent::Release { pos: Vec2::new(9.0, 6.0), start, button: MouseButton::Left },
                UiEvent::Hover { pos: Vec2::new(10.0, 6.0) },
            ]
        );
    }

    #[test]
    fn secondary_button_does_not_drag() {
        let mut ui = UiScene::new();
        let evs = ui.translate(&[
            button(MouseButtonState::Pressed, MouseButton::Right, 1.0, 1.0),
            moved(3.0, 1.0),
        ]);
        assert_eq!(evs[1], UiEvent::Hover { pos: Vec2::new(3.0, 1.0) });
        assert!(!ui.is_dragging());
    }

    #[test]
    fn double_click_follows_its_press() {
        let mut ui = UiScene::new();
        let press = PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 250.0,
            y: 12.0,
            modifiers: Modifiers::default(),
        };
        let evs = ui.translate(&[InputEvent::PointerButton(press), InputEvent::PointerDoubleClick(press)]);
        assert_eq!(evs[1], UiEvent::DoubleClick { pos: Vec2::new(250.0, 12.0), button: MouseButton::Left });
    }

    #[test]
    fn focus_loss_ends_a_drag() {
        let mut ui = UiScene::new();
        let evs = ui.translate(&[
            button(MouseButtonState::Pressed, MouseButton::Left, 2.0, 2.0),
            moved(40.0, 2.0),
            InputEvent::Focused(false),
        ]);
        assert_eq!(
            evs.last(),
            Some(&UiEvent::Release { pos: Vec2::new(40.0, 2.0), start: Vec2::new(2.0, 2.0), button: MouseButton::Left })
        );
        assert!(!ui.is_dragging());
    }

    // ── repaint caching ───────────────────────────────────────────────────

    struct Counter {
        dirty: bool,
    }

    impl crate::widget::Widget for Counter {
        fn paint(&self, painter: &mut Painter, rect: Rect) {
            painter.fill_rect(rect, gradation_engine::paint::Color::WHITE, None);
        }

        fn on_event(&mut self, event: &UiEvent, _rect: Rect) -> crate::event::EventResult {
            if matches!(event, UiEvent::Press { .. }) {
                self.dirty = true;
            }
            crate::event::EventResult::Consumed
        }

        fn take_repaint(&mut self) -> bool {
            std::mem::take(&mut self.dirty)
        }
    }

    #[test]
    fn repaints_only_when_asked_or_resized() {
        let mut ui = UiScene::new();
        let mut root: Element = Counter { dirty: false }.into();
        let vp = Vec2::new(500.0, 50.0);

        assert!(ui.frame(&mut root, vp, &[]));
        assert_eq!(ui.draw_list.len(), 1);
        assert!(!ui.frame(&mut root, vp, &[moved(1.0, 1.0)]));
        assert!(ui.frame(&mut root, vp, &[button(MouseButtonState::Pressed, MouseButton::Left, 1.0, 1.0)]));
        assert!(ui.frame(&mut root, Vec2::new(400.0, 50.0), &[]));
        assert_eq!(ui.draw_list.len(), 1);
    }
}
