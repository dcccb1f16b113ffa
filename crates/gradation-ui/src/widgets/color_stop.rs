use std::f32::consts::FRAC_PI_4;
use std::fmt;

use gradation_engine::coords::{Rect, Vec2};
use gradation_engine::paint::Color;
use gradation_engine::scene::Border;

use crate::painter::Painter;
use crate::picker::ColorPicker;

use super::gradient_surface::SurfaceGeometry;

/// Stable handle for a stop within one surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct StopId(pub(crate) u64);

/// Interaction state of a stop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum StopState {
    Idle,
    /// Primary button held on the stop; the handle sits at `pointer + grab_offset`.
    Dragging { grab_offset: Vec2 },
}

/// What the owning surface should do once a drag ends.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DragOutcome {
    Keep,
    Delete,
}

/// A draggable handle for one gradient stop.
///
/// `position` is the handle's top-left corner in surface coordinates and is
/// always derived from `ratio` through [`set_pos_from_ratio`](Self::set_pos_from_ratio).
pub struct ColorStop {
    ratio: f32,
    color: Color,
    position: Vec2,
    state: StopState,
    moving: Vec<Box<dyn FnMut()>>,
}

impl ColorStop {
    /// Handle edge length.
    pub const SIZE: f32 = 10.0;
    /// Gap between the bottom of the strip and the handle.
    pub const STRIP_GAP: f32 = 5.0;
    /// Visual rotation of the handle (45°, clockwise).
    pub const ROTATION: f32 = FRAC_PI_4;
    /// Outline colour, `#00ffff`.
    pub const OUTLINE: Color = Color::CYAN;

    /// Creates an unpositioned stop. `ratio` is clamped into [0, 1].
    pub fn new(ratio: f32, color: Color) -> Self {
        Self {
            ratio: clamp_ratio(ratio),
            color,
            position: Vec2::zero(),
            state: StopState::Idle,
            moving: Vec::new(),
        }
    }

    #[inline]
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn state(&self) -> StopState {
        self.state
    }

    /// Sets the ratio (clamped) and repositions the handle.
    pub fn set_ratio(&mut self, ratio: f32, geometry: &SurfaceGeometry) {
        self.ratio = clamp_ratio(ratio);
        self.set_pos_from_ratio(geometry);
    }

    /// Places the handle under its ratio along the strip.
    pub fn set_pos_from_ratio(&mut self, geometry: &SurfaceGeometry) {
        self.position = Vec2::new(
            geometry.margin + self.ratio * geometry.gradation_width(),
            geometry.gradation_height + Self::STRIP_GAP,
        );
    }

    /// Registers a callback fired whenever the stop moves or changes colour.
    pub fn connect_moving(&mut self, f: impl FnMut() + 'static) {
        self.moving.push(Box::new(f));
    }

    fn emit_moving(&mut self) {
        for f in &mut self.moving {
            f();
        }
    }

    // ── gestures ──────────────────────────────────────────────────────────

    /// Starts a drag with the pointer at `pointer`.
    pub fn begin_drag(&mut self, pointer: Vec2) {
        self.state = StopState::Dragging { grab_offset: self.position - pointer };
    }

    /// Where the handle would sit with the pointer at `pointer`, given the drag offset.
    pub fn drag_target(&self, pointer: Vec2) -> Vec2 {
        match self.state {
            StopState::Dragging { grab_offset } => pointer + grab_offset,
            StopState::Idle => pointer,
        }
    }

    /// Moves the handle toward `new_pos` (the unsnapped handle position).
    ///
    /// Observers are notified before the ratio changes. The handle then snaps
    /// back onto the strip at the new ratio.
    pub fn on_drag(&mut self, new_pos: Vec2, geometry: &SurfaceGeometry) {
        self.emit_moving();
        self.ratio = geometry.coordinate_to_ratio(new_pos);
        self.set_pos_from_ratio(geometry);
    }

    /// Ends a drag released at `pointer`.
    ///
    /// Returns [`DragOutcome::Delete`] when `pointer` is beyond the delete
    /// margin around the scene.
    pub fn on_drag_release(&mut self, pointer: Vec2, geometry: &SurfaceGeometry) -> DragOutcome {
        self.state = StopState::Idle;
        if geometry.is_beyond_delete_margin(pointer) {
            DragOutcome::Delete
        } else {
            DragOutcome::Keep
        }
    }

    /// Asks `picker` for a new colour seeded with the current one.
    ///
    /// Returns `true` when the colour was replaced.
    pub fn on_secondary_click<P>(&mut self, picker: &mut P) -> bool
    where
        P: ColorPicker + ?Sized,
    {
        let Some(color) = picker.pick(self.color) else {
            return false;
        };
        self.color = color;
        self.emit_moving();
        true
    }

    // ── geometry / paint ──────────────────────────────────────────────────

    /// Hit-test box: the unrotated square at `position`.
    ///
    /// The painted diamond is rotated, the hit area is not.
    #[inline]
    pub fn hit_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, Vec2::new(Self::SIZE, Self::SIZE))
    }

    pub fn paint(&self, painter: &mut Painter) {
        painter.fill_rotated_rect(
            self.hit_rect(),
            0.0,
            self.color,
            Some(Border::new(1.0, Self::OUTLINE)),
            Self::ROTATION,
        );
    }
}

impl fmt::Debug for ColorStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorStop")
            .field("ratio", &self.ratio)
            .field("color", &self.color)
            .field("position", &self.position)
            .field("state", &self.state)
            .field("observers", &self.moving.len())
            .finish()
    }
}

/// Clamps into [0, 1]; NaN maps to 0 and `-0.0` to `0.0`.
#[inline]
pub(crate) fn clamp_ratio(r: f32) -> f32 {
    if r.is_nan() { 0.0 } else { r.clamp(0.0, 1.0) + 0.0 }
}
