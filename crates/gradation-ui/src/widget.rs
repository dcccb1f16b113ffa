use gradation_engine::coords::{Rect, Vec2};
use gradation_engine::window::CursorIcon;

use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;

// ── Widget trait ──────────────────────────────────────────────────────────

/// The core trait every UI component implements.
///
/// Widgets are retained: the same instance lives across frames, receives
/// events through [`on_event`](Widget::on_event) and is repainted only when
/// [`take_repaint`](Widget::take_repaint) says something changed.
pub trait Widget: 'static {
    /// Draw this widget into `painter` within the bounds of `rect`.
    fn paint(&self, painter: &mut Painter, rect: Rect);

    /// Route an input event. Return [`EventResult::Consumed`] to stop propagation.
    fn on_event(&mut self, _event: &UiEvent, _rect: Rect) -> EventResult {
        EventResult::Ignored
    }

    /// Cursor shape to show while the pointer is at `pos`.
    fn cursor(&self, _pos: Vec2) -> CursorIcon {
        CursorIcon::Default
    }

    /// Returns `true` once per pending repaint request and clears it.
    fn take_repaint(&mut self) -> bool {
        false
    }
}

// ── Element ───────────────────────────────────────────────────────────────

/// A type-erased widget; the root type hosted by [`crate::scene::UiScene`].
pub struct Element(Box<dyn Widget>);

impl Element {
    pub fn new<W: Widget>(w: W) -> Self {
        Self(Box::new(w))
    }

    #[inline]
    pub fn paint(&self, painter: &mut Painter, rect: Rect) {
        self.0.paint(painter, rect)
    }

    #[inline]
    pub fn on_event(&mut self, event: &UiEvent, rect: Rect) -> EventResult {
        self.0.on_event(event, rect)
    }

    #[inline]
    pub fn cursor(&self, pos: Vec2) -> CursorIcon {
        self.0.cursor(pos)
    }

    #[inline]
    pub fn take_repaint(&mut self) -> bool {
        self.0.take_repaint()
    }
}

impl<W: Widget> From<W> for Element {
    fn from(w: W) -> Self {
        Self::new(w)
    }
}
