use crate::state::AppState;
use crate::ui::hud::Hud;
use anyhow::{anyhow, Result};
use egui::{Context as EguiContext, ViewportId};
use egui_glow::Painter;
use egui_winit::State as EguiWinitState;
use std::sync::Arc;
use winit::event::WindowEvent;
use winit::window::Window;

/// egui on top of the scene: winit input in, glow painting out.
pub struct EguiRenderer {
    ctx: EguiContext,
    winit_state: EguiWinitState,
    painter: Painter,
    hud: Hud,
}

impl EguiRenderer {
    pub fn new(window: &Window, gl: Arc<glow::Context>) -> Result<Self> {
        let ctx = EguiContext::default();
        let winit_state = EguiWinitState::new(
            ctx.clone(),
            ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
        );
        let painter =
            Painter::new(gl, "", None).map_err(|e| anyhow!("Failed to create egui painter: {e}"))?;

        Ok(Self {
            ctx,
            winit_state,
            painter,
            hud: Hud::new(),
        })
    }

    /// Returns true when egui used the event and the scene should not see it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.winit_state.on_window_event(window, event).consumed
    }

    /// Runs the overlay for one frame and paints it over whatever is bound.
    pub fn run_frame(&mut self, window: &Window, state: &mut AppState) {
        let raw_input = self.winit_state.take_egui_input(window);
        let hud = &mut self.hud;
        let full_output = self.ctx.run(raw_input, |ctx| hud.draw(ctx, state));

        self.winit_state
            .handle_platform_output(window, full_output.platform_output);

        let clipped_primitives = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let size = window.inner_size();
        self.painter.paint_and_update_textures(
            [size.width, size.height],
            full_output.pixels_per_point,
            &clipped_primitives,
            &full_output.textures_delta,
        );
    }

    /// Frees GL resources. The context must be current.
    pub fn destroy(&mut self) {
        self.painter.destroy();
    }
}
