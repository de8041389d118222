use anyhow::Result;
use log::{error, info, warn};
use simple_logger::SimpleLogger;
use std::{path::PathBuf, time::Instant};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{EventLoopBuilder, EventLoopWindowTarget},
};

use displaythings::{
    config::{load_or_create_config, AppConfig},
    input::InputState,
    render::{capture, pipeline::SceneRenderer},
    state::AppState,
    ui::EguiRenderer,
    window::GlWindow,
};

/// Fields drop in order; `gl_window` owns the context and goes last.
struct App {
    renderer: Option<SceneRenderer>,
    overlay: EguiRenderer,
    state: AppState,
    input: InputState,
    screenshot_dir: PathBuf,
    applied_fullscreen: bool,
    start: Instant,
    gl_window: GlWindow,
}

impl App {
    fn new(event_loop: &EventLoopWindowTarget<()>, config: &AppConfig) -> Result<Self> {
        let gl_window = GlWindow::new(event_loop, &config.window, true)?;
        let overlay = EguiRenderer::new(&gl_window.window, gl_window.glow())?;

        let mut state = AppState::new(config);
        let size = gl_window.size();
        state.resize(size.width, size.height);

        let (renderer, file_error) = SceneRenderer::new(config)?;
        if let Some(err) = file_error {
            state.shader_error = Some(err.to_string());
        }

        Ok(Self {
            renderer: Some(renderer),
            overlay,
            state,
            input: InputState::default(),
            screenshot_dir: config.screenshot_dir.clone(),
            applied_fullscreen: false,
            start: Instant::now(),
            gl_window,
        })
    }

    fn handle_window_event(&mut self, event: WindowEvent, elwt: &EventLoopWindowTarget<()>) {
        match &event {
            WindowEvent::CloseRequested => {
                elwt.exit();
                return;
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw(elwt) {
                    error!("Frame failed: {:#}", e);
                    elwt.exit();
                }
                return;
            }
            WindowEvent::Resized(size) => {
                self.gl_window.resize(*size);
                self.state.resize(size.width, size.height);
            }
            _ => {}
        }

        if self.overlay.on_window_event(&self.gl_window.window, &event) {
            self.input.handle_consumed_event(&event);
        } else {
            self.input.handle_window_event(&event);
        }
    }

    fn redraw(&mut self, elwt: &EventLoopWindowTarget<()>) -> Result<()> {
        if self.input.quit_requested() {
            elwt.exit();
            return Ok(());
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };

        self.state
            .update(&self.input, self.start.elapsed().as_secs_f32());
        if self.input.take_reload_request() {
            self.state.request_reload();
        }

        renderer.draw(&self.state);
        self.overlay.run_frame(&self.gl_window.window, &mut self.state);

        if self.input.take_screenshot_request() {
            let viewport = self.state.viewport;
            if let Err(e) =
                capture::save_screenshot(&self.screenshot_dir, viewport.width, viewport.height)
            {
                error!("Screenshot failed: {:#}", e);
            }
        }

        self.gl_window.swap_buffers()?;

        if self.state.take_reload_request() {
            self.reload_shaders();
        }
        if self.state.fullscreen != self.applied_fullscreen {
            self.gl_window.set_fullscreen(self.state.fullscreen);
            self.applied_fullscreen = self.state.fullscreen;
        }

        self.input.end_frame();
        Ok(())
    }

    fn reload_shaders(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        match renderer.reload() {
            Ok(()) => {
                info!("Shaders reloaded");
                self.state.shader_error = None;
            }
            Err(e) => {
                error!("Shader reload failed, keeping current program: {}", e);
                self.state.shader_error = Some(e.to_string());
            }
        }
    }

    fn cleanup(&mut self) {
        if let Err(e) = self.gl_window.make_current() {
            warn!("Cleaning up without a current context: {:#}", e);
        }
        self.renderer = None;
        self.overlay.destroy();
    }
}

fn main() -> Result<()> {
    let (config, config_path) = load_or_create_config()?;
    SimpleLogger::new().with_level(config.log_level()).init()?;
    info!("Loaded config from {}", config_path.display());

    let event_loop = EventLoopBuilder::new().build()?;
    let mut app = App::new(&event_loop, &config)?;
    if app.renderer.as_ref().is_some_and(SceneRenderer::using_fallback) {
        warn!("Running with built-in shaders");
    }

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => app.handle_window_event(event, elwt),
        Event::AboutToWait => app.gl_window.window.request_redraw(),
        Event::LoopExiting => app.cleanup(),
        _ => (),
    })?;

    Ok(())
}
