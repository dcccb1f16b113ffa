use std::cell::Cell;
use std::rc::Rc;

use gradation_engine::coords::{Rect, Vec2};
use gradation_engine::input::MouseButton;
use gradation_engine::paint::{Color, LinearGradient, Paint};
use gradation_engine::scene::Border;
use gradation_engine::window::CursorIcon;

use crate::event::{EventResult, UiEvent};
use crate::painter::Painter;
use crate::picker::ColorPicker;
use crate::widget::Widget;

use super::color_stop::{clamp_ratio, ColorStop, DragOutcome, StopId};

// ── SurfaceGeometry ───────────────────────────────────────────────────────

/// Fixed layout of a gradient surface, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceGeometry {
    /// Scene width.
    pub width: f32,
    /// Scene height.
    pub height: f32,
    /// Horizontal inset of the strip.
    pub margin: f32,
    /// Strip thickness.
    pub gradation_height: f32,
    /// How far outside the scene a drag must end to delete its stop.
    pub delete_margin: f32,
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 50.0,
            margin: 8.0,
            gradation_height: 25.0,
            delete_margin: 30.0,
        }
    }
}

impl SurfaceGeometry {
    /// Default insets on a scene of the given size.
    pub fn with_size(width: f32, height: f32) -> Self {
        Self { width, height, ..Self::default() }
    }

    #[inline]
    pub fn scene_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    #[inline]
    pub fn gradation_width(&self) -> f32 {
        self.width - self.margin * 2.0
    }

    /// The painted strip: `(margin, 0)` sized `gradation_width × gradation_height`.
    #[inline]
    pub fn strip_rect(&self) -> Rect {
        Rect::new(self.margin, 0.0, self.gradation_width(), self.gradation_height)
    }

    /// Ratio for a surface point: `x / (width - margin)`, clamped to [0, 1].
    pub fn coordinate_to_ratio(&self, point: Vec2) -> f32 {
        clamp_ratio(point.x / (self.width - self.margin))
    }

    /// True when `p` lies strictly outside the scene grown by `delete_margin`.
    #[inline]
    pub fn is_beyond_delete_margin(&self, p: Vec2) -> bool {
        !self.scene_rect().inflate(self.delete_margin).contains_inclusive(p)
    }
}

// ── RepaintFlag ───────────────────────────────────────────────────────────

/// Shared dirty bit. Any number of `set` calls collapse into one `take`.
#[derive(Debug, Clone, Default)]
pub struct RepaintFlag(Rc<Cell<bool>>);

impl RepaintFlag {
    #[inline]
    pub fn set(&self) {
        self.0.set(true);
    }

    #[inline]
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}

// ── GradientSurface ───────────────────────────────────────────────────────

/// The gradient strip and the stops that define it.
///
/// The stop list is authoritative and kept in insertion order; the draw list
/// built by [`Widget::paint`] is derived from it on every repaint. Blending
/// keys colours by ratio, so insertion order only decides which handle is on
/// top and which colour wins at a duplicate ratio.
pub struct GradientSurface {
    geometry: SurfaceGeometry,
    stops: Vec<(StopId, ColorStop)>,
    next_id: u64,
    dragging: Option<StopId>,
    repaint: RepaintFlag,
}

impl GradientSurface {
    pub fn new(geometry: SurfaceGeometry) -> Self {
        Self {
            geometry,
            stops: Vec::new(),
            next_id: 0,
            dragging: None,
            // Nothing has been painted yet.
            repaint: {
                let flag = RepaintFlag::default();
                flag.set();
                flag
            },
        }
    }

    #[inline]
    pub fn geometry(&self) -> &SurfaceGeometry {
        &self.geometry
    }

    /// Stops in insertion order.
    pub fn stops(&self) -> impl Iterator<Item = (StopId, &ColorStop)> + '_ {
        self.stops.iter().map(|(id, s)| (*id, s))
    }

    pub fn stop(&self, id: StopId) -> Option<&ColorStop> {
        self.stops.iter().find(|(i, _)| *i == id).map(|(_, s)| s)
    }

    pub fn stop_mut(&mut self, id: StopId) -> Option<&mut ColorStop> {
        self.stops.iter_mut().find(|(i, _)| *i == id).map(|(_, s)| s)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stop currently being dragged, if any.
    #[inline]
    pub fn dragging(&self) -> Option<StopId> {
        self.dragging
    }

    #[inline]
    pub fn coordinate_to_ratio(&self, point: Vec2) -> f32 {
        self.geometry.coordinate_to_ratio(point)
    }

    // ── membership ────────────────────────────────────────────────────────

    /// Adds `stop`, positions it on the strip and returns its id.
    pub fn add_stop(&mut self, mut stop: ColorStop) -> StopId {
        let id = StopId(self.next_id);
        self.next_id += 1;

        stop.set_pos_from_ratio(&self.geometry);
        log::debug!("stop {} added at ratio {:.3}", id.0, stop.ratio());
        self.stops.push((id, stop));
        self.update();
        id
    }

    /// Adds every stop in order; ids come back in the same order.
    pub fn add_stops(&mut self, stops: impl IntoIterator<Item = ColorStop>) -> Vec<StopId> {
        stops.into_iter().map(|s| self.add_stop(s)).collect()
    }

    /// Removes a stop. It is neither painted nor hit-testable afterwards.
    pub fn remove_stop(&mut self, id: StopId) -> Option<ColorStop> {
        let index = self.stops.iter().position(|(i, _)| *i == id)?;
        let (_, stop) = self.stops.remove(index);
        if self.dragging == Some(id) {
            self.dragging = None;
        }
        log::debug!("stop {} removed (ratio {:.3})", id.0, stop.ratio());
        self.update();
        Some(stop)
    }

    /// Removes every listed stop that exists; unknown ids are skipped.
    pub fn remove_stops(&mut self, ids: impl IntoIterator<Item = StopId>) -> Vec<ColorStop> {
        ids.into_iter().filter_map(|id| self.remove_stop(id)).collect()
    }

    /// Removes all stops.
    pub fn clear(&mut self) {
        if self.stops.is_empty() {
            return;
        }
        log::debug!("clearing {} stops", self.stops.len());
        self.stops.clear();
        self.dragging = None;
        self.update();
    }

    /// Makes movement and recolouring of `id` repaint the surface.
    pub fn connect_to_repaint(&mut self, id: StopId) -> bool {
        let flag = self.repaint.clone();
        match self.stop_mut(id) {
            Some(stop) => {
                stop.connect_moving(move || flag.set());
                true
            }
            None => false,
        }
    }

    /// Creates a dark-gray stop under `point`.
    pub fn on_double_click(&mut self, point: Vec2) -> StopId {
        let ratio = self.coordinate_to_ratio(point);
        let id = self.add_stop(ColorStop::new(ratio, Color::DARK_GRAY));
        self.connect_to_repaint(id);
        self.update();
        id
    }

    /// Topmost stop whose hit box contains `point`. Later stops sit on top.
    pub fn stop_at(&self, point: Vec2) -> Option<StopId> {
        self.stops
            .iter()
            .rev()
            .find(|(_, s)| s.hit_rect().contains(point))
            .map(|(id, _)| *id)
    }

    /// Asks `picker` for a new colour for `id`; repaints when it changed.
    pub fn recolor_stop<P>(&mut self, id: StopId, picker: &mut P) -> bool
    where
        P: ColorPicker + ?Sized,
    {
        let Some(stop) = self.stop_mut(id) else {
            return false;
        };
        let changed = stop.on_secondary_click(picker);
        if changed {
            log::debug!("stop {} recoloured to {:?}", id.0, stop.color().to_srgb_u8());
            self.update();
        }
        changed
    }

    // ── repaint ───────────────────────────────────────────────────────────

    /// Schedules a repaint.
    #[inline]
    pub fn update(&self) {
        self.repaint.set();
    }

    /// Reads and clears the pending repaint.
    #[inline]
    pub fn take_repaint(&self) -> bool {
        self.repaint.take()
    }

    // ── rendering ─────────────────────────────────────────────────────────

    /// The blend behind the stops, or `None` without stops.
    ///
    /// The axis runs from `(margin, 0)` to `(width - 2·margin, gradation_height)`.
    /// Colours are keyed by ratio; for duplicate ratios the later stop wins.
    pub fn composite(&self) -> Option<LinearGradient> {
        if self.stops.is_empty() {
            return None;
        }

        let g = &self.geometry;
        let mut gradient = LinearGradient::new(
            Vec2::new(g.margin, 0.0),
            Vec2::new(g.width - g.margin * 2.0, g.gradation_height),
        );
        for (_, stop) in &self.stops {
            gradient.set_color_at(clamp_ratio(stop.ratio()), stop.color());
        }
        Some(gradient)
    }

    /// Fill for the strip: nothing without stops, solid with one, a blend otherwise.
    pub fn strip_paint(&self) -> Paint {
        match self.composite() {
            None => Paint::Solid(Color::TRANSPARENT),
            Some(g) => match g.stops() {
                [only] => Paint::Solid(only.color),
                _ => Paint::LinearGradient(g),
            },
        }
    }

    /// Paints the strip with a 1-unit black outline.
    pub fn render_background(&self, painter: &mut Painter) {
        painter.fill_rect(
            self.geometry.strip_rect(),
            self.strip_paint(),
            Some(Border::new(1.0, Color::BLACK)),
        );
    }

    // ── drag plumbing ─────────────────────────────────────────────────────

    fn press(&mut self, pos: Vec2) -> EventResult {
        let Some(id) = self.stop_at(pos) else {
            return EventResult::Ignored;
        };
        if let Some(stop) = self.stop_mut(id) {
            stop.begin_drag(pos);
        }
        self.dragging = Some(id);
        EventResult::Consumed
    }

    fn drag(&mut self, pos: Vec2) -> EventResult {
        let Some(id) = self.dragging else {
            return EventResult::Ignored;
        };
        let geometry = self.geometry;
        if let Some(stop) = self.stop_mut(id) {
            let target = stop.drag_target(pos);
            stop.on_drag(target, &geometry);
        }
        EventResult::Consumed
    }

    fn release(&mut self, pos: Vec2) -> EventResult {
        let Some(id) = self.dragging.take() else {
            return EventResult::Ignored;
        };
        let geometry = self.geometry;
        let outcome = self
            .stop_mut(id)
            .map(|stop| stop.on_drag_release(pos, &geometry));

        if outcome == Some(DragOutcome::Delete) {
            self.remove_stop(id);
        }
        EventResult::Consumed
    }
}

impl Widget for GradientSurface {
    fn paint(&self, painter: &mut Painter, _rect: Rect) {
        self.render_background(painter);
        for (_, stop) in &self.stops {
            stop.paint(painter);
        }
    }

    fn on_event(&mut self, event: &UiEvent, _rect: Rect) -> EventResult {
        match *event {
            UiEvent::Press { pos, button: MouseButton::Left } => self.press(pos),
            UiEvent::Drag { pos, .. } => self.drag(pos),
            UiEvent::Release { pos, button: MouseButton::Left, .. } => self.release(pos),
            UiEvent::DoubleClick { pos, button: MouseButton::Left } => {
                self.on_double_click(pos);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn cursor(&self, pos: Vec2) -> CursorIcon {
        if self.dragging.is_some() {
            CursorIcon::Grabbing
        } else if self.stop_at(pos).is_some() {
            CursorIcon::Grab
        } else {
            CursorIcon::Default
        }
    }

    fn take_repaint(&mut self) -> bool {
        self.repaint.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradation_engine::scene::{DrawCmd, DrawList};

    fn seeded() -> (GradientSurface, StopId, StopId) {
        let mut s = GradientSurface::new(SurfaceGeometry::default());
        let ids = s.add_stops([ColorStop::new(0.0, Color::WHITE), ColorStop::new(1.0, Color::BLACK)]);
        for id in &ids {
            s.connect_to_repaint(*id);
        }
        s.take_repaint();
        (s, ids[0], ids[1])
    }

    fn painted(s: &GradientSurface) -> DrawList {
        let mut dl = DrawList::new();
        {
            let mut p = Painter::new(&mut dl);
            s.paint(&mut p, s.geometry().scene_rect());
        }
        dl
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn ratio_is_clamped_beyond_either_edge() {
        let g = SurfaceGeometry::default();
        assert_eq!(g.coordinate_to_ratio(Vec2::new(-40.0, 0.0)), 0.0);
        assert_eq!(g.coordinate_to_ratio(Vec2::new(800.0, 0.0)), 1.0);
        for x in [0.0, 3.0, 123.0, 491.9, 492.0] {
            let r = g.coordinate_to_ratio(Vec2::new(x, 0.0));
            assert!((0.0..=1.0).contains(&r));
        }
    }

    // ── membership ────────────────────────────────────────────────────────

    #[test]
    fn bulk_insertion_keeps_every_stop() {
        let mut s = GradientSurface::new(SurfaceGeometry::default());
        let ids = s.add_stops((0..200).map(|i| ColorStop::new(i as f32 / 199.0, Color::WHITE)));
        assert_eq!(ids.len(), 200);
        assert_eq!(s.len(), 200);
        assert!(ids.iter().all(|id| s.stop(*id).is_some()));
        assert_eq!(painted(&s).len(), 201);
    }

    #[test]
    fn added_stops_are_positioned() {
        let mut s = GradientSurface::new(SurfaceGeometry::default());
        let id = s.add_stop(ColorStop::new(1.0, Color::BLACK));
        assert_eq!(s.stop(id).map(|st| st.position()), Some(Vec2::new(492.0, 30.0)));
    }

    #[test]
    fn removed_stop_leaves_hit_testing_and_composition() {
        let (mut s, _white, black) = seeded();
        let mid = s.add_stop(ColorStop::new(0.5, Color::CYAN));
        let at = s.stop(mid).map(|st| st.position() + Vec2::new(1.0, 1.0));

        let removed = s.remove_stop(mid);
        assert!(removed.is_some());
        assert_eq!(s.len(), 2);
        assert_eq!(s.stop_at(at.unwrap_or_default()), None);

        let g = s.composite().expect("two stops remain");
        assert!(g.stops().iter().all(|gs| gs.color != Color::CYAN));
        assert!(s.stop(black).is_some());
    }

    #[test]
    fn stops_at_signed_zero_share_one_gradient_entry() {
        let mut s = GradientSurface::new(SurfaceGeometry::default());
        s.add_stops([ColorStop::new(-0.0, Color::WHITE), ColorStop::new(0.0, Color::CYAN)]);
        let g = s.composite().expect("stops");
        assert_eq!(g.stops().len(), 1);
        assert_eq!(g.color_at(0.0), Color::CYAN);
    }

    #[test]
    fn remove_stops_skips_unknown_ids() {
        let (mut s, white, black) = seeded();
        let gone = s.remove_stops([white, StopId(99), black]);
        assert_eq!(gone.len(), 2);
        assert!(s.is_empty());
    }

    #[test]
    fn clear_empties_the_surface() {
        let (mut s, _, _) = seeded();
        s.clear();
        assert!(s.is_empty());
        assert!(s.take_repaint());
    }

    // ── composition ───────────────────────────────────────────────────────

    #[test]
    fn seed_stops_blend_white_to_black() {
        let (s, _, _) = seeded();
        let g = s.composite().expect("seeded");
        assert_eq!(g.start, Vec2::new(8.0, 0.0));
        assert_eq!(g.end, Vec2::new(484.0, 25.0));
        assert_eq!(g.color_at(0.0), Color::WHITE);
        assert_eq!(g.color_at(1.0), Color::BLACK);
    }

    #[test]
    fn duplicate_ratio_last_insert_wins() {
        let mut s = GradientSurface::new(SurfaceGeometry::default());
        s.add_stops([ColorStop::new(0.5, Color::WHITE), ColorStop::new(0.5, Color::CYAN)]);
        let g = s.composite().expect("stops");
        assert_eq!(g.stops().len(), 1);
        assert_eq!(g.stops()[0].color, Color::CYAN);
    }

    #[test]
    fn degenerate_stop_counts() {
        let mut s = GradientSurface::new(SurfaceGeometry::default());
        assert_eq!(s.composite(), None);
        assert_eq!(s.strip_paint(), Paint::Solid(Color::TRANSPARENT));

        s.add_stop(ColorStop::new(0.3, Color::CYAN));
        assert_eq!(s.strip_paint(), Paint::Solid(Color::CYAN));
    }

    #[test]
    fn strip_is_drawn_below_handles() {
        let (s, _, _) = seeded();
        let dl = painted(&s);
        match &dl.items()[0].cmd {
            DrawCmd::Rect(r) => {
                assert_eq!(r.rect, Rect::new(8.0, 0.0, 484.0, 25.0));
                assert!(matches!(r.paint, Paint::LinearGradient(_)));
            }
            other => panic!("expected strip rect, got {other:?}"),
        }
        assert!(dl.items()[1..].iter().all(|i| matches!(i.cmd, DrawCmd::RoundedRect(_))));
    }

    // ── interaction ───────────────────────────────────────────────────────

    #[test]
    fn double_click_at_midpoint_adds_dark_gray_stop() {
        let (mut s, _, _) = seeded();
        let rect = s.geometry().scene_rect();
        s.on_event(&UiEvent::DoubleClick { pos: Vec2::new(250.0, 12.0), button: MouseButton::Left }, rect);

        assert_eq!(s.len(), 3);
        let (_, stop) = s.stops().last().expect("new stop");
        assert!((stop.ratio() - 0.5).abs() < 0.01);
        assert_eq!(stop.color(), Color::DARK_GRAY);
        assert!(s.take_repaint());
    }

    #[test]
    fn double_clicked_stop_repaints_when_dragged() {
        let mut s = GradientSurface::new(SurfaceGeometry::default());
        let id = s.on_double_click(Vec2::new(100.0, 10.0));
        s.take_repaint();

        let grab = s.stop(id).map(|st| st.position() + Vec2::new(2.0, 2.0)).unwrap_or_default();
        let rect = s.geometry().scene_rect();
        s.on_event(&UiEvent::Press { pos: grab, button: MouseButton::Left }, rect);
        s.on_event(&UiEvent::Drag { pos: grab + Vec2::new(50.0, 0.0), start: grab }, rect);
        assert!(s.take_repaint());
    }

    #[test]
    fn drag_and_release_inside_moves_stop() {
        let (mut s, white, _) = seeded();
        let rect = s.geometry().scene_rect();
        let grab = Vec2::new(12.0, 34.0);
        assert_eq!(s.stop_at(grab), Some(white));

        s.on_event(&UiEvent::Press { pos: grab, button: MouseButton::Left }, rect);
        assert_eq!(s.cursor(grab), CursorIcon::Grabbing);
        let to = Vec2::new(250.0, 34.0);
        s.on_event(&UiEvent::Drag { pos: to, start: grab }, rect);
        s.on_event(&UiEvent::Release { pos: to, start: grab, button: MouseButton::Left }, rect);

        let st = s.stop(white).expect("kept");
        assert!((st.ratio() - 246.0 / 492.0).abs() < 1e-6);
        assert_eq!(s.dragging(), None);
        assert!(s.take_repaint());
    }

    #[test]
    fn release_past_delete_margin_removes_stop() {
        let (mut s, _, black) = seeded();
        let rect = s.geometry().scene_rect();
        let grab = Vec2::new(495.0, 35.0);
        assert_eq!(s.stop_at(grab), Some(black));

        // 40 right of the strip's right edge and 50 below it.
        let out = Vec2::new(492.0 + 40.0, 25.0 + 50.0);
        s.on_event(&UiEvent::Press { pos: grab, button: MouseButton::Left }, rect);
        s.on_event(&UiEvent::Drag { pos: out, start: grab }, rect);
        s.on_event(&UiEvent::Release { pos: out, start: grab, button: MouseButton::Left }, rect);

        assert_eq!(s.len(), 1);
        assert!(s.stop(black).is_none());
    }

    #[test]
    fn repaint_requests_coalesce() {
        let (s, _, _) = seeded();
        s.update();
        s.update();
        s.update();
        assert!(s.take_repaint());
        assert!(!s.take_repaint());
    }

    #[test]
    fn recolor_cancel_and_confirm() {
        let (mut s, white, _) = seeded();
        assert!(!s.recolor_stop(white, &mut |_: Color| None::<Color>));
        assert_eq!(s.stop(white).map(|st| st.color()), Some(Color::WHITE));
        assert!(!s.take_repaint());

        let teal = Color::from_srgb_u8(0, 128, 128, 255);
        assert!(s.recolor_stop(white, &mut |_: Color| Some(teal)));
        assert_eq!(s.stop(white).map(|st| st.color()), Some(teal));
        assert!(s.take_repaint());
    }
}
