// shaders.rs - shader program construction and ownership

use crate::render::backend::{GlBackend, ShaderBackend, UniformValue};
use gl::types::*;
use glam::{Mat4, Vec3, Vec4};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_kind(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("cannot read shader source {}: {source}", path.display())]
    ResourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("program failed to link:\n{log}")]
    Link { log: String },
    #[error("driver returned no {object} object")]
    ObjectCreation { object: &'static str },
}

/// Raw text of one shading-language unit and where it came from.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    name: String,
    text: String,
}

impl ShaderSource {
    /// Reads a UTF-8 source file. Empty files are rejected like missing ones.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let unreadable = |source| ShaderError::ResourceUnreadable {
            path: path.to_path_buf(),
            source,
        };

        let text = fs::read_to_string(path).map_err(unreadable)?;
        if text.trim().is_empty() {
            return Err(unreadable(io::Error::new(
                io::ErrorKind::InvalidData,
                "shader source is empty",
            )));
        }

        Ok(Self {
            name: path.display().to_string(),
            text,
        })
    }

    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One compiled stage. Deleted when dropped; GL defers the delete while
/// the object is still attached to a program.
struct StageObject<'a, B: ShaderBackend> {
    backend: &'a B,
    id: GLuint,
}

impl<'a, B: ShaderBackend> StageObject<'a, B> {
    fn compile(
        backend: &'a B,
        stage: ShaderStage,
        source: &ShaderSource,
    ) -> Result<Self, ShaderError> {
        let id = backend
            .create_shader(stage)
            .ok_or(ShaderError::ObjectCreation { object: "shader" })?;
        let object = Self { backend, id };

        backend.compile_shader(id, source.text());
        if !backend.shader_compile_status(id) {
            let log = backend.shader_info_log(id);
            debug!("{} stage from {} failed to compile", stage, source.name());
            return Err(ShaderError::Compile { stage, log });
        }

        Ok(object)
    }
}

impl<B: ShaderBackend> Drop for StageObject<'_, B> {
    fn drop(&mut self) {
        self.backend.delete_shader(self.id);
    }
}

/// A program under construction. Deleted when dropped unless released.
struct ProgramObject<'a, B: ShaderBackend> {
    backend: &'a B,
    id: GLuint,
}

impl<'a, B: ShaderBackend> ProgramObject<'a, B> {
    fn create(backend: &'a B) -> Result<Self, ShaderError> {
        let id = backend
            .create_program()
            .ok_or(ShaderError::ObjectCreation { object: "program" })?;
        Ok(Self { backend, id })
    }

    fn release(mut self) -> GLuint {
        std::mem::replace(&mut self.id, 0)
    }
}

impl<B: ShaderBackend> Drop for ProgramObject<'_, B> {
    fn drop(&mut self) {
        if self.id != 0 {
            self.backend.delete_program(self.id);
        }
    }
}

/// Turns a vertex and a fragment source into one linked program.
#[derive(Debug, Clone, Default)]
pub struct ShaderProgramBuilder<B: ShaderBackend + Clone = GlBackend> {
    backend: B,
}

impl ShaderProgramBuilder<GlBackend> {
    /// Builder for the context current on this thread.
    pub fn new() -> Self {
        Self {
            backend: GlBackend::new(),
        }
    }
}

impl<B: ShaderBackend + Clone> ShaderProgramBuilder<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Loads both files, then compiles and links them.
    ///
    /// Nothing touches the graphics API until both files have been read.
    /// Every failure releases whatever objects were created on the way.
    pub fn build(
        &self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<ShaderProgram<B>, ShaderError> {
        let vertex = ShaderSource::load(vertex_path)?;
        let fragment = ShaderSource::load(fragment_path)?;
        self.build_from_sources(&vertex, &fragment)
    }

    pub fn build_from_sources(
        &self,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> Result<ShaderProgram<B>, ShaderError> {
        let backend = &self.backend;

        let vertex_stage = StageObject::compile(backend, ShaderStage::Vertex, vertex)?;
        let fragment_stage = StageObject::compile(backend, ShaderStage::Fragment, fragment)?;

        let program = ProgramObject::create(backend)?;
        backend.attach_shader(program.id, vertex_stage.id);
        backend.attach_shader(program.id, fragment_stage.id);
        backend.link_program(program.id);

        if !backend.program_link_status(program.id) {
            let log = backend.program_info_log(program.id);
            debug!(
                "program from {} + {} failed to link",
                vertex.name(),
                fragment.name()
            );
            return Err(ShaderError::Link { log });
        }

        backend.detach_shader(program.id, vertex_stage.id);
        backend.detach_shader(program.id, fragment_stage.id);
        let id = program.release();

        debug!(
            "linked program {} from {} + {}",
            id,
            vertex.name(),
            fragment.name()
        );
        Ok(ShaderProgram::from_raw(self.backend.clone(), id))
    }
}

/// A linked program. The program object is deleted on drop.
pub struct ShaderProgram<B: ShaderBackend = GlBackend> {
    backend: B,
    id: GLuint,
    uniforms: HashMap<String, Option<GLint>>,
}

impl<B: ShaderBackend> ShaderProgram<B> {
    /// Takes ownership of an already linked program name.
    pub fn from_raw(backend: B, id: GLuint) -> Self {
        Self {
            backend,
            id,
            uniforms: HashMap::new(),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn use_program(&self) {
        self.backend.use_program(self.id);
    }

    /// Gives up ownership without deleting the program.
    pub fn into_raw(mut self) -> GLuint {
        std::mem::replace(&mut self.id, 0)
    }

    pub fn uniform_location(&mut self, name: &str) -> Option<GLint> {
        if let Some(location) = self.uniforms.get(name) {
            return *location;
        }

        let location = self.backend.uniform_location(self.id, name);
        if location.is_none() {
            warn!("Uniform '{}' not found in program {}", name, self.id);
        }

        self.uniforms.insert(name.to_string(), location);
        location
    }

    pub fn attrib_location(&self, name: &str) -> Option<GLuint> {
        self.backend.attrib_location(self.id, name)
    }

    /// Binds the program and uploads `value`. Unknown uniforms are skipped.
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.use_program();
        if let Some(location) = self.uniform_location(name) {
            self.backend.set_uniform(location, value);
        }
    }

    pub fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }

    pub fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    pub fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.set_uniform(name, UniformValue::Vec4(value));
    }

    pub fn set_f32(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    pub fn set_i32(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }
}

impl<B: ShaderBackend> fmt::Debug for ShaderProgram<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram").field("id", &self.id).finish()
    }
}

impl<B: ShaderBackend> Drop for ShaderProgram<B> {
    fn drop(&mut self) {
        if self.id != 0 {
            self.backend.delete_program(self.id);
        }
    }
}

/// Built-in sources used when the configured files cannot be built.
pub mod fallback {
    use super::ShaderSource;

    pub const VERTEX_SRC: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aColor;

out vec3 vColor;

uniform mat4 modelMatrix;
uniform mat4 viewMatrix;
uniform mat4 projMatrix;

void main() {
    vColor = aColor;
    gl_Position = projMatrix * viewMatrix * modelMatrix * vec4(aPos, 1.0);
}
"#;

    pub const FRAGMENT_SRC: &str = r#"#version 330 core
in vec3 vColor;

out vec4 FragColor;

void main() {
    FragColor = vec4(vColor, 1.0);
}
"#;

    pub fn sources() -> (ShaderSource, ShaderSource) {
        (
            ShaderSource::from_text("<fallback vertex>", VERTEX_SRC),
            ShaderSource::from_text("<fallback fragment>", FRAGMENT_SRC),
        )
    }
}
