use glam::{Mat4, Quat, Vec3};
use std::f32::consts::TAU;

pub const ROTATION_RANGE: std::ops::RangeInclusive<f32> = 0.0..=TAU;
pub const Z_OFFSET_RANGE: std::ops::RangeInclusive<f32> = -10.0..=10.0;
pub const DEFAULT_ANIMATION_SPEED: f32 = 0.390;

/// Slider-driven placement of the displayed object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    /// Radians added to the animated angle about each axis.
    pub rotation: Vec3,
    pub z_offset: f32,
    /// Extra orientation, applied only when non-zero. Normalized on use.
    pub orientation: [f32; 4],
    /// Radians per second of spin about every axis.
    pub animation_speed: f32,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            rotation: Vec3::ZERO,
            z_offset: 0.0,
            orientation: [0.0; 4],
            animation_speed: DEFAULT_ANIMATION_SPEED,
        }
    }
}

impl ObjectTransform {
    pub fn with_speed(animation_speed: f32) -> Self {
        Self {
            animation_speed,
            ..Self::default()
        }
    }

    /// Model matrix at `time` seconds since start.
    pub fn model_matrix(&self, time: f32) -> Mat4 {
        let spin = self.animation_speed * time;
        let mut model = Mat4::from_translation(Vec3::new(0.0, 0.0, self.z_offset))
            * Mat4::from_rotation_x(spin + self.rotation.x)
            * Mat4::from_rotation_y(spin + self.rotation.y)
            * Mat4::from_rotation_z(spin + self.rotation.z);

        if let Some(orientation) = self.orientation_quat() {
            model *= Mat4::from_quat(orientation);
        }
        model
    }

    pub fn orientation_quat(&self) -> Option<Quat> {
        let q = Quat::from_array(self.orientation);
        (q.length_squared() > f32::EPSILON).then(|| q.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_at_rest() {
        let transform = ObjectTransform::with_speed(0.0);
        assert_relative_eq!(transform.model_matrix(12.0), Mat4::IDENTITY);
    }

    #[test]
    fn test_z_offset_translates() {
        let transform = ObjectTransform {
            z_offset: -4.0,
            animation_speed: 0.0,
            ..Default::default()
        };
        let p = transform.model_matrix(0.0).transform_point3(Vec3::ZERO);
        assert_relative_eq!(p, Vec3::new(0.0, 0.0, -4.0));
    }

    #[test]
    fn test_animation_spins_over_time() {
        let transform = ObjectTransform {
            animation_speed: FRAC_PI_2,
            ..Default::default()
        };
        // After one second every axis has turned a quarter.
        let expected = Mat4::from_rotation_x(FRAC_PI_2)
            * Mat4::from_rotation_y(FRAC_PI_2)
            * Mat4::from_rotation_z(FRAC_PI_2);
        assert_relative_eq!(transform.model_matrix(1.0), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_slider_rotation_adds_to_spin() {
        let transform = ObjectTransform {
            rotation: Vec3::new(0.0, FRAC_PI_2, 0.0),
            animation_speed: 0.0,
            ..Default::default()
        };
        let p = transform.model_matrix(0.0).transform_point3(Vec3::X);
        assert_relative_eq!(p, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_zero_orientation_is_ignored() {
        let transform = ObjectTransform::default();
        assert!(transform.orientation_quat().is_none());

        let transform = ObjectTransform {
            orientation: [0.0, 0.0, 0.0, 2.0],
            ..Default::default()
        };
        assert_relative_eq!(transform.orientation_quat().unwrap(), Quat::IDENTITY);
    }
}
