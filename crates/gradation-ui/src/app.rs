use anyhow::Result;
use winit::dpi::LogicalSize;

use gradation_engine::coords::Vec2;
use gradation_engine::core::{App as EngineApp, AppControl, FrameCtx};
use gradation_engine::device::GpuInit;
use gradation_engine::paint::Color;
use gradation_engine::render::shapes::rect::RectRenderer;
use gradation_engine::render::shapes::rounded_rect::RoundedRectRenderer;
use gradation_engine::window::{CursorIcon, Runtime, RuntimeConfig};

use crate::scene::UiScene;
use crate::widget::Element;

/// Window background behind the strip.
const BACKGROUND: Color = Color::from_premul(0.94, 0.94, 0.94, 1.0);

// ── Application ───────────────────────────────────────────────────────────

/// Top-level UI application builder.
///
/// ```rust,ignore
/// Application::new()
///     .title("gradation")
///     .size(500.0, 50.0)
///     .run_widget(|| GradientEditorWindow::new().into())?;
/// ```
pub struct Application {
    title:     String,
    width:     f64,
    height:    f64,
    gpu_init:  GpuInit,
}

impl Application {
    pub fn new() -> Self {
        let defaults = RuntimeConfig::default();
        Self {
            title:     defaults.title,
            width:     defaults.initial_size.width,
            height:    defaults.initial_size.height,
            gpu_init:  GpuInit {
                // Colours are authored in sRGB and blended there.
                prefer_srgb: false,
                ..GpuInit::default()
            },
        }
    }

    /// Set the window title.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width  = width;
        self.height = height;
        self
    }

    /// Window configuration this builder will launch with.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title:        self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
            ..RuntimeConfig::default()
        }
    }

    /// Start the event loop with a retained root widget.
    ///
    /// `build` is called once before the loop starts; the returned [`Element`]
    /// persists across frames. Returns when the window closes, or with the
    /// startup error when the window or GPU could not be created.
    pub fn run_widget<F>(self, build: F) -> Result<()>
    where
        F: FnOnce() -> Element,
    {
        let config = self.runtime_config();
        log::info!("starting \"{}\" ({}x{})", config.title, self.width, self.height);

        let state = UiAppState::new(build());
        Runtime::run(config, self.gpu_init, state)
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

// ── UiAppState ────────────────────────────────────────────────────────────

/// Implements `gradation_engine::core::App` for a retained root widget.
struct UiAppState {
    ui_scene:              UiScene,
    rect_renderer:         RectRenderer,
    rounded_rect_renderer: RoundedRectRenderer,
    root:                  Element,
    cursor:                CursorIcon,
}

impl UiAppState {
    fn new(root: Element) -> Self {
        Self {
            ui_scene:              UiScene::new(),
            rect_renderer:         RectRenderer::new(),
            rounded_rect_renderer: RoundedRectRenderer::new(),
            root,
            cursor:                CursorIcon::Default,
        }
    }
}

impl EngineApp for UiAppState {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let (w, h) = ctx.window.logical_size();
        let viewport = Vec2::new(w, h);

        if self.ui_scene.frame(&mut self.root, viewport, &ctx.input_frame.events) {
            log::trace!("draw list rebuilt: {} items", self.ui_scene.draw_list.len());
        }

        let cursor = self.ui_scene.cursor(&self.root);
        if cursor != self.cursor {
            ctx.window.set_cursor(cursor);
            self.cursor = cursor;
        }

        let dl   = &mut self.ui_scene.draw_list;
        let r_r  = &mut self.rect_renderer;
        let r_rr = &mut self.rounded_rect_renderer;

        ctx.render(BACKGROUND, |rctx, target| {
            r_r.render(rctx, target, dl);
            r_rr.render(rctx, target, dl);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_feeds_runtime_config() {
        let cfg = Application::new().title("gradation").size(500.0, 50.0).runtime_config();
        assert_eq!(cfg.title, "gradation");
        assert_eq!(cfg.initial_size, LogicalSize::new(500.0, 50.0));
        assert!(!cfg.resizable);
    }
}
