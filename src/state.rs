use crate::config::AppConfig;
use crate::input::InputState;
use crate::render::camera::Camera;
use crate::render::transform::ObjectTransform;
use glam::Vec3;

/// Seconds between consecutive frames.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FrameTimer {
    last_frame: Option<f32>,
    delta_time: f32,
    time: f32,
}

impl FrameTimer {
    /// Records a frame at `now` seconds and returns the delta. The first
    /// frame has a delta of zero.
    pub fn tick(&mut self, now: f32) -> f32 {
        self.delta_time = match self.last_frame {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        };
        self.last_frame = Some(now);
        self.time = now;
        self.delta_time
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Time of the latest frame, in seconds since start.
    pub fn time(&self) -> f32 {
        self.time
    }
}

/// Framebuffer size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Everything one frame of update and render reads or changes. Owned by
/// the event loop.
#[derive(Debug, Clone)]
pub struct AppState {
    pub camera: Camera,
    pub transform: ObjectTransform,
    pub clear_color: [f32; 4],
    pub depth_test: bool,
    pub wireframe: bool,
    pub fullscreen: bool,
    pub show_object_panel: bool,
    pub show_camera_panel: bool,
    /// Last shader build failure, shown in the overlay.
    pub shader_error: Option<String>,
    pub timer: FrameTimer,
    pub viewport: Viewport,
    reload_requested: bool,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let rendering = &config.rendering;
        Self {
            camera: Camera::new(Vec3::new(0.0, 0.0, -3.0), rendering.fov),
            transform: ObjectTransform::with_speed(rendering.animation_speed),
            clear_color: rendering.clear_color,
            depth_test: rendering.depth_test,
            wireframe: rendering.wireframe,
            fullscreen: false,
            show_object_panel: true,
            show_camera_panel: true,
            shader_error: None,
            timer: FrameTimer::default(),
            viewport: Viewport {
                width: config.window.width,
                height: config.window.height,
            },
            reload_requested: false,
        }
    }

    /// Advances the clock to `now` and applies this frame's input.
    pub fn update(&mut self, input: &InputState, now: f32) {
        let delta_time = self.timer.tick(now);
        self.camera.update(input, delta_time);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport { width, height };
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.viewport.aspect_ratio()
    }

    pub fn request_reload(&mut self) {
        self.reload_requested = true;
    }

    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }
}
