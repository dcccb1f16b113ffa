//! Shape renderers.

mod common;

pub mod rect;
pub mod rounded_rect;
