pub mod color_stop;
pub mod gradient_surface;
pub mod swatch_picker;
