use gradation_engine::coords::{Rect, Vec2};
use gradation_engine::input::MouseButton;
use gradation_engine::paint::Color;
use gradation_engine::window::CursorIcon;

use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;
use crate::widget::Widget;
use crate::widgets::color_stop::{ColorStop, StopId};
use crate::widgets::gradient_surface::{GradientSurface, SurfaceGeometry};
use crate::widgets::swatch_picker::{PickerOutcome, SwatchPicker};

/// Pointer input still owed to the palette after a press closed it.
///
/// The rest of the closing click, and a double click completed by the next
/// press, never reach the surface.
#[derive(Debug, Clone, PartialEq)]
enum Aftermath {
    /// The closing button is still down.
    Closing(MouseButton),
    /// The next press of this button may pair with the closing one.
    Pairable(MouseButton),
    /// A press waiting to learn whether a double click follows it.
    Held(UiEvent, MouseButton),
    /// Second half of a swallowed double click; ends on its release.
    Paired(MouseButton),
}

/// Top-level gradient editor: one surface seeded white → black, plus the
/// colour palette opened by a secondary click on a stop.
pub struct GradientEditorWindow {
    surface: GradientSurface,
    /// Stop being recoloured and the palette answering for it.
    picker: Option<(StopId, SwatchPicker)>,
    aftermath: Option<Aftermath>,
    dirty: bool,
}

impl GradientEditorWindow {
    pub fn new() -> Self {
        Self::with_geometry(SurfaceGeometry::default())
    }

    pub fn with_geometry(geometry: SurfaceGeometry) -> Self {
        let mut surface = GradientSurface::new(geometry);
        let seeds = surface.add_stops([
            ColorStop::new(0.0, Color::WHITE),
            ColorStop::new(1.0, Color::BLACK),
        ]);
        for id in seeds {
            surface.connect_to_repaint(id);
        }

        Self { surface, picker: None, aftermath: None, dirty: true }
    }

    #[inline]
    pub fn surface(&self) -> &GradientSurface {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut GradientSurface {
        &mut self.surface
    }

    /// Stop whose colour is being picked, while the palette is open.
    #[inline]
    pub fn picking(&self) -> Option<StopId> {
        self.picker.as_ref().map(|(id, _)| *id)
    }

    /// Opens the palette for `id`, seeded with its colour.
    pub fn open_picker(&mut self, id: StopId, bounds: Rect) -> bool {
        let Some(stop) = self.surface.stop(id) else {
            return false;
        };
        log::debug!("picker opened for stop {id:?}");
        self.picker = Some((id, SwatchPicker::new(stop.color(), bounds)));
        self.dirty = true;
        true
    }

    fn route_to_picker(&mut self, event: &UiEvent) -> EventResult {
        let Some((id, picker)) = self.picker.as_mut() else {
            return EventResult::Ignored;
        };
        let id = *id;

        let answer = match picker.on_event(event) {
            PickerOutcome::Pending => {
                self.dirty |= picker.take_dirty();
                return EventResult::Consumed;
            }
            PickerOutcome::Picked(c) => Some(c),
            PickerOutcome::Cancelled => None,
        };

        self.picker = None;
        self.dirty = true;
        if let UiEvent::Press { button, .. } = *event {
            self.aftermath = Some(Aftermath::Closing(button));
        }
        log::debug!("picker closed for stop {id:?} ({})", if answer.is_some() { "picked" } else { "cancelled" });
        self.surface.recolor_stop(id, &mut |_: Color| answer);
        EventResult::Consumed
    }

    /// Filters input that belongs to the click which closed the palette.
    fn settle(&mut self, aftermath: Aftermath, event: &UiEvent, rect: Rect) -> EventResult {
        use Aftermath::*;

        match (aftermath, event) {
            (Closing(b), UiEvent::Release { button, .. }) if *button == b => {
                self.aftermath = Some(Pairable(b));
                EventResult::Consumed
            }
            (Paired(b), UiEvent::Release { button, .. }) if *button == b => EventResult::Consumed,
            (pending @ (Closing(_) | Paired(_)), UiEvent::KeyPress { .. }) => {
                self.aftermath = Some(pending);
                self.dispatch(event, rect)
            }
            (pending @ (Closing(_) | Paired(_)), _) => {
                self.aftermath = Some(pending);
                EventResult::Consumed
            }

            (Pairable(b), UiEvent::Press { button, .. }) if *button == b => {
                self.aftermath = Some(Held(event.clone(), b));
                EventResult::Consumed
            }
            (Pairable(b), UiEvent::Hover { .. }) => {
                self.aftermath = Some(Pairable(b));
                self.dispatch(event, rect)
            }
            (Pairable(_), _) => self.on_event(event, rect),

            (Held(_, b), UiEvent::DoubleClick { button, .. }) if *button == b => {
                log::debug!("double click on the closed palette swallowed");
                self.aftermath = Some(Paired(b));
                EventResult::Consumed
            }
            (Held(press, _), _) => {
                self.dispatch(&press, rect);
                self.on_event(event, rect)
            }
        }
    }

    /// Routes `event` with the palette closed.
    fn dispatch(&mut self, event: &UiEvent, rect: Rect) -> EventResult {
        if let UiEvent::Press { pos, button: MouseButton::Right } = *event {
            if self.surface.dragging().is_none() {
                if let Some(id) = self.surface.stop_at(pos) {
                    self.open_picker(id, rect);
                    return EventResult::Consumed;
                }
            }
        }

        self.surface.on_event(event, rect)
    }
}

impl Default for GradientEditorWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for GradientEditorWindow {
    fn paint(&self, painter: &mut Painter, rect: Rect) {
        match &self.picker {
            Some((_, picker)) => picker.paint(painter),
            None => self.surface.paint(painter, rect),
        }
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect) -> EventResult {
        if self.picker.is_some() {
            return self.route_to_picker(event);
        }
        if let Some(aftermath) = self.aftermath.take() {
            return self.settle(aftermath, event, rect);
        }
        self.dispatch(event, rect)
    }

    fn cursor(&self, pos: Vec2) -> CursorIcon {
        match &self.picker {
            Some((_, picker)) if picker.swatch_at(pos).is_some() || picker.channel_at(pos).is_some() => {
                CursorIcon::Pointer
            }
            Some(_) => CursorIcon::Default,
            None => self.surface.cursor(pos),
        }
    }

    fn take_repaint(&mut self) -> bool {
        let surface = self.surface.take_repaint();
        std::mem::take(&mut self.dirty) | surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::UiScene;
    use crate::widgets::swatch_picker::PRESETS;
    use gradation_engine::input::{
        InputEvent,
        InputFrame,
        InputState,
        Key,
        KeyState,
        Modifiers,
        MouseButtonState,
        PointerButtonEvent,
        PointerMoveEvent,
    };

    fn rect() -> Rect {
        Rect::new(0.0, 0.0, 500.0, 50.0)
    }

    fn press(pos: Vec2, button: MouseButton) -> UiEvent {
        UiEvent::Press { pos, button }
    }

    fn first_stop(w: &GradientEditorWindow) -> (StopId, Vec2) {
        let (id, stop) = w.surface().stops().next().expect("seeded");
        (id, stop.position() + Vec2::new(3.0, 3.0))
    }

    #[test]
    fn starts_with_white_and_black() {
        let w = GradientEditorWindow::new();
        let seeded: Vec<(f32, Color)> = w.surface().stops().map(|(_, s)| (s.ratio(), s.color())).collect();
        assert_eq!(seeded, vec![(0.0, Color::WHITE), (1.0, Color::BLACK)]);

        let g = w.surface().composite().expect("seeded");
        assert_eq!(g.color_at(0.0), Color::WHITE);
        assert_eq!(g.color_at(1.0), Color::BLACK);
    }

    #[test]
    fn secondary_click_then_escape_keeps_colour() {
        let mut w = GradientEditorWindow::new();
        w.take_repaint();
        let (id, at) = first_stop(&w);

        w.on_event(&press(at, MouseButton::Right), rect());
        assert_eq!(w.picking(), Some(id));

        w.on_event(&UiEvent::KeyPress { key: Key::Escape, modifiers: Modifiers::default() }, rect());
        assert_eq!(w.picking(), None);
        assert_eq!(w.surface().stop(id).map(|s| s.color()), Some(Color::WHITE));
    }

    #[test]
    fn secondary_click_then_swatch_recolours_and_repaints() {
        let mut w = GradientEditorWindow::new();
        let (id, at) = first_stop(&w);
        w.on_event(&press(at, MouseButton::Right), rect());
        w.take_repaint();

        let swatch = w.picker.as_ref().map(|(_, p)| p.swatch_rect(6)).expect("open");
        let pos = swatch.origin + swatch.size * 0.5;
        w.on_event(&press(pos, MouseButton::Left), rect());

        assert_eq!(w.picking(), None);
        assert_eq!(w.surface().stop(id).map(|s| s.color()), Some(PRESETS[5]));
        assert!(w.take_repaint());
        assert!(w.surface().composite().expect("stops").stops().iter().any(|s| s.color == PRESETS[5]));
    }

    #[test]
    fn open_picker_swallows_surface_input() {
        let mut w = GradientEditorWindow::new();
        let (_, at) = first_stop(&w);
        w.on_event(&press(at, MouseButton::Right), rect());

        let dbl = UiEvent::DoubleClick { pos: Vec2::new(250.0, 12.0), button: MouseButton::Left };
        w.on_event(&dbl, rect());
        assert_eq!(w.surface().len(), 2);
    }

    /// Raw platform input driven through the same path the runtime uses.
    struct Pipeline {
        input: InputState,
        scene: UiScene,
        editor: GradientEditorWindow,
    }

    impl Pipeline {
        fn new() -> Self {
            Self { input: InputState::default(), scene: UiScene::new(), editor: GradientEditorWindow::new() }
        }

        fn feed(&mut self, raw: Vec<InputEvent>) {
            let mut frame = InputFrame::default();
            for ev in raw {
                self.input.apply_event(&mut frame, ev);
            }
            for ev in self.scene.translate(&frame.events) {
                self.editor.on_event(&ev, rect());
            }
        }

        fn click(&mut self, pos: Vec2, button: MouseButton) {
            self.feed(vec![
                raw_button(MouseButtonState::Pressed, button, pos),
                raw_button(MouseButtonState::Released, button, pos),
            ]);
        }
    }

    fn raw_button(state: MouseButtonState, button: MouseButton, pos: Vec2) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state,
            x: pos.x,
            y: pos.y,
            modifiers: Modifiers::default(),
        })
    }

    fn raw_move(pos: Vec2) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x: pos.x, y: pos.y })
    }

    #[test]
    fn double_clicking_a_swatch_leaves_the_stops_alone() {
        let mut p = Pipeline::new();
        let (id, at) = first_stop(&p.editor);
        p.click(at, MouseButton::Right);
        assert_eq!(p.editor.picking(), Some(id));

        let swatch = p.editor.picker.as_ref().map(|(_, pk)| pk.swatch_rect(6)).expect("open");
        let pos = swatch.origin + swatch.size * 0.5;
        p.click(pos, MouseButton::Left);
        p.click(pos, MouseButton::Left);

        assert_eq!(p.editor.picking(), None);
        assert_eq!(p.editor.surface().len(), 2);
        assert_eq!(p.editor.surface().stop(id).map(|s| s.color()), Some(PRESETS[5]));

        // Once the swallowed pair is over, double clicks reach the strip again.
        let strip = Vec2::new(250.0, 12.0);
        p.click(strip, MouseButton::Left);
        p.click(strip, MouseButton::Left);
        assert_eq!(p.editor.surface().len(), 3);
    }

    #[test]
    fn a_lone_press_after_closing_still_drags_a_stop() {
        let mut p = Pipeline::new();
        let (_, at) = first_stop(&p.editor);
        p.click(at, MouseButton::Right);
        let swatch = p.editor.picker.as_ref().map(|(_, pk)| pk.swatch_rect(6)).expect("open");
        p.click(swatch.origin + swatch.size * 0.5, MouseButton::Left);

        let black = p.editor.surface().stops().last().map(|(id, s)| (id, s.position())).expect("seeded");
        let grab = black.1 + Vec2::new(3.0, 3.0);
        p.feed(vec![
            raw_move(grab),
            raw_button(MouseButtonState::Pressed, MouseButton::Left, grab),
            raw_move(Vec2::new(300.0, grab.y)),
            raw_button(MouseButtonState::Released, MouseButton::Left, Vec2::new(300.0, grab.y)),
        ]);

        let ratio = p.editor.surface().stop(black.0).map(|s| s.ratio()).expect("kept");
        assert!(ratio < 0.7, "ratio {ratio}");
        assert_eq!(p.editor.surface().len(), 2);
    }

    #[test]
    fn closing_with_escape_leaves_no_pending_input() {
        let mut p = Pipeline::new();
        let (_, at) = first_stop(&p.editor);
        p.click(at, MouseButton::Right);
        p.feed(vec![InputEvent::Key {
            key: Key::Escape,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: false,
        }]);
        assert_eq!(p.editor.picking(), None);
        assert_eq!(p.editor.aftermath, None);
    }

    #[test]
    fn cursor_tracks_stops_and_drags() {
        let mut w = GradientEditorWindow::new();
        let (_, at) = first_stop(&w);
        assert_eq!(w.cursor(Vec2::new(250.0, 45.0)), CursorIcon::Default);
        assert_eq!(w.cursor(at), CursorIcon::Grab);

        w.on_event(&press(at, MouseButton::Left), rect());
        assert_eq!(w.cursor(Vec2::new(300.0, 10.0)), CursorIcon::Grabbing);
    }
}
