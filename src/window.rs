use crate::config::WindowConfig;
use anyhow::{anyhow, Context as _, Result};
use glutin::{
    config::{Config, ConfigTemplateBuilder},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{Display, GetGlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use log::{debug, info, warn};
use raw_window_handle::HasRawWindowHandle;
use std::{
    ffi::{CStr, CString},
    num::NonZeroU32,
    ptr,
    sync::Arc,
};
use winit::{
    dpi::PhysicalSize,
    event_loop::EventLoopWindowTarget,
    window::{Fullscreen, Window, WindowBuilder},
};

/// A window with a current OpenGL 3.3 core context and loaded function
/// pointers, for both the raw `gl` bindings and `glow`.
pub struct GlWindow {
    pub window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    glow: Arc<glow::Context>,
}

impl GlWindow {
    pub fn new<T>(
        event_loop: &EventLoopWindowTarget<T>,
        config: &WindowConfig,
        visible: bool,
    ) -> Result<Self> {
        let window_builder = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(config.resizable)
            .with_visible(visible);

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_depth_size(24)
            .with_stencil_size(8);

        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(event_loop, template, pick_config)
            .map_err(|e| anyhow!("Failed to create display: {e}"))?;
        let window = window.context("Display builder returned no window")?;
        debug!(
            "Picked GL config with {} samples, depth {}",
            gl_config.num_samples(),
            gl_config.depth_size()
        );

        let gl_display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(window.raw_window_handle()));

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("Failed to create OpenGL context")?;

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .context("Failed to create GL surface")?;

        let gl_context = gl_context
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        if config.vsync {
            if let Err(e) =
                gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                warn!("Could not enable vsync: {}", e);
            }
        }

        gl::load_with(|symbol| get_proc_address(&gl_display, symbol));
        let glow = Arc::new(unsafe {
            glow::Context::from_loader_function(|symbol| get_proc_address(&gl_display, symbol))
        });

        log_gl_info();

        Ok(Self {
            window,
            gl_context,
            gl_surface,
            glow,
        })
    }

    pub fn glow(&self) -> Arc<glow::Context> {
        Arc::clone(&self.glow)
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }

    /// Zero-sized surfaces are skipped; the window is minimized.
    pub fn resize(&self, size: PhysicalSize<u32>) {
        if let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        {
            self.gl_surface.resize(&self.gl_context, width, height);
        }
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .context("Failed to swap buffers")
    }

    pub fn make_current(&self) -> Result<()> {
        self.gl_context
            .make_current(&self.gl_surface)
            .context("Failed to make context current")
    }

    pub fn set_fullscreen(&self, fullscreen: bool) {
        let mode = fullscreen.then(|| Fullscreen::Borderless(None));
        self.window.set_fullscreen(mode);
    }
}

/// Prefers the config with the most samples.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|accum, config| {
            if config.num_samples() > accum.num_samples() {
                config
            } else {
                accum
            }
        })
        .expect("no GL configs available")
}

fn get_proc_address(display: &Display, symbol: &str) -> *const std::ffi::c_void {
    match CString::new(symbol) {
        Ok(symbol) => display.get_proc_address(&symbol),
        Err(_) => ptr::null(),
    }
}

fn gl_string(name: gl::types::GLenum) -> String {
    unsafe {
        let raw = gl::GetString(name);
        if raw.is_null() {
            return "<unknown>".to_string();
        }
        CStr::from_ptr(raw.cast()).to_string_lossy().into_owned()
    }
}

fn log_gl_info() {
    info!("OpenGL vendor: {}", gl_string(gl::VENDOR));
    info!("OpenGL renderer: {}", gl_string(gl::RENDERER));
    info!("OpenGL version: {}", gl_string(gl::VERSION));
    info!(
        "GLSL version: {}",
        gl_string(gl::SHADING_LANGUAGE_VERSION)
    );
}
