use crate::render::mesh::MeshKind;
use crate::render::transform::DEFAULT_ANIMATION_SPEED;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// RGBA, each in 0..=1.
    pub clear_color: [f32; 4],
    pub depth_test: bool,
    pub wireframe: bool,
    /// Degrees.
    pub fov: f32,
    pub animation_speed: f32,
    pub mesh: MeshKind,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            depth_test: true,
            wireframe: false,
            fov: 45.0,
            animation_speed: DEFAULT_ANIMATION_SPEED,
            mesh: MeshKind::Cube,
        }
    }
}

/// Where the scene's vertex and fragment sources live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("assets/shaders/basic.vert"),
            fragment: PathBuf::from("assets/shaders/basic.frag"),
        }
    }
}
