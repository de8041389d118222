use crate::input::InputState;
use glam::{Mat4, Vec3};
use winit::keyboard::KeyCode;

/// Units per second.
pub const MOVE_SPEED: f32 = 2.5;
/// Degrees per pixel of mouse travel.
pub const LOOK_SENSITIVITY: f32 = 0.1;
pub const PITCH_LIMIT: f32 = 89.0;
pub const FOV_RANGE: std::ops::RangeInclusive<f32> = 30.0..=90.0;

/// Free-fly look-at camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    /// Degrees, measured from +X toward +Z.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -3.0), 45.0)
    }
}

impl Camera {
    /// Camera at `position` looking down +Z.
    pub fn new(position: Vec3, fov: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::Z,
            up: Vec3::Y,
            yaw: 90.0,
            pitch: 0.0,
            fov: fov.clamp(*FOV_RANGE.start(), *FOV_RANGE.end()),
            near: 0.01,
            far: 1000.0,
        };
        camera.update_vectors();
        camera
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect_ratio, self.near, self.far)
    }

    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    /// Applies one frame of keyboard movement and mouse look.
    pub fn update(&mut self, input: &InputState, delta_time: f32) {
        let step = MOVE_SPEED * delta_time;
        let right = self.right();

        if input.is_down(KeyCode::KeyW) {
            self.position += step * self.front;
        }
        if input.is_down(KeyCode::KeyS) {
            self.position -= step * self.front;
        }
        if input.is_down(KeyCode::KeyA) {
            self.position -= step * right;
        }
        if input.is_down(KeyCode::KeyD) {
            self.position += step * right;
        }
        if input.is_down(KeyCode::Space) {
            self.position += step * self.up;
        }
        if input.is_down(KeyCode::ControlLeft) {
            self.position -= step * self.up;
        }

        if input.look_held() {
            let delta = input.mouse_delta();
            self.rotate(delta.x * LOOK_SENSITIVITY, -delta.y * LOOK_SENSITIVITY);
        }
    }

    /// Adds to yaw and pitch (degrees); pitch stays within ±[`PITCH_LIMIT`].
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        self.yaw = (self.yaw + yaw) % 360.0;
        self.pitch = (self.pitch + pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov.clamp(*FOV_RANGE.start(), *FOV_RANGE.end());
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
    }
}
