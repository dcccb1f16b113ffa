//! Paint model shared between UI and renderers.
//!
//! Scope:
//! - color representation (premultiplied alpha)
//! - paint sources (solid, multi-stop linear gradients)
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod gradient;

pub use color::Color;
pub use gradient::{GradientStop, LinearGradient};

/// Paint source for filling geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient(LinearGradient),
}

impl From<Color> for Paint {
    #[inline]
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}

impl From<LinearGradient> for Paint {
    #[inline]
    fn from(g: LinearGradient) -> Self {
        Paint::LinearGradient(g)
    }
}
