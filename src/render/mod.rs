pub mod backend;
pub mod camera;
pub mod capture;
pub mod mesh;
pub mod pipeline;
pub mod shaders;
pub mod transform;

#[cfg(test)]
mod fake;

pub use backend::{GlBackend, ShaderBackend, UniformValue};
pub use camera::Camera;
pub use mesh::{Mesh, MeshKind, Vertex};
pub use pipeline::{ProgramSlot, SceneRenderer};
pub use shaders::{ShaderError, ShaderProgram, ShaderProgramBuilder, ShaderSource, ShaderStage};
pub use transform::ObjectTransform;
