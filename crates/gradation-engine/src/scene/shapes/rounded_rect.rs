use crate::coords::Rect;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

use super::Border;

/// Rounded rectangle draw payload.
///
/// `rotation` is in radians, clockwise on screen, about `rect.origin`
/// (the rect's top-left corner before rotation).
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedRectCmd {
    pub rect: Rect,
    pub radius: f32,
    pub fill: Color,
    pub border: Option<Border>,
    pub rotation: f32,
}

impl RoundedRectCmd {
    #[inline]
    pub fn new(rect: Rect, radius: f32, fill: Color, border: Option<Border>) -> Self {
        Self { rect, radius, fill, border, rotation: 0.0 }
    }

    #[inline]
    pub fn rotated(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }
}

impl DrawList {
    /// Records a rounded rectangle draw command.
    #[inline]
    pub fn push_rounded_rect(&mut self, z: ZIndex, cmd: RoundedRectCmd) {
        self.push(z, DrawCmd::RoundedRect(cmd));
    }

    /// Records a solid rounded rectangle with no border or rotation.
    #[inline]
    pub fn push_solid_rounded_rect(&mut self, z: ZIndex, rect: Rect, radius: f32, color: Color) {
        self.push_rounded_rect(z, RoundedRectCmd::new(rect, radius, color, None));
    }
}
