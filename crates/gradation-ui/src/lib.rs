//! Gradation UI: retained widgets on top of `gradation-engine`, and the
//! gradient editor built from them.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use gradation_ui::prelude::*;
//!
//! Application::new()
//!     .title("gradation")
//!     .size(500.0, 50.0)
//!     .run_widget(|| GradientEditorWindow::new().into())?;
//! ```
//!
//! # Extending with custom widgets
//!
//! Implement [`widget::Widget`] for any type and wrap it in an [`widget::Element`]:
//!
//! ```rust,ignore
//! pub struct Swatch(Color);
//!
//! impl Widget for Swatch {
//!     fn paint(&self, painter: &mut Painter, rect: Rect) {
//!         painter.fill_rect(rect, self.0, None);
//!     }
//! }
//! ```

pub mod app;
pub mod editor;
pub mod event;
pub mod painter;
pub mod picker;
pub mod scene;
pub mod widget;
pub mod widgets;

pub use app::Application;
pub use editor::GradientEditorWindow;

/// Everything needed to build, host and extend the editor.
pub mod prelude {
    pub use crate::app::Application;
    pub use crate::editor::GradientEditorWindow;
    pub use crate::event::{EventResult, UiEvent};
    pub use crate::painter::Painter;
    pub use crate::picker::ColorPicker;
    pub use crate::scene::UiScene;
    pub use crate::widget::{Element, Widget};
    pub use crate::widgets::{
        color_stop::{ColorStop, DragOutcome, StopId, StopState},
        gradient_surface::{GradientSurface, RepaintFlag, SurfaceGeometry},
        swatch_picker::{PickerOutcome, SwatchPicker},
    };

    pub use gradation_engine::coords::{Rect, Vec2};
    pub use gradation_engine::paint::{Color, LinearGradient, Paint};
    pub use gradation_engine::scene::Border;
}
