// backend.rs - the graphics calls shader building goes through

use crate::render::shaders::ShaderStage;
use gl::types::*;
use glam::{Mat4, Vec3, Vec4};
use std::ffi::CString;

/// Upper bound on diagnostic text read back from the driver.
pub const MAX_INFO_LOG_LEN: usize = 4096;

/// A value that can be uploaded to a uniform location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

/// Shader and program object calls against the current context.
///
/// Handles are plain GL names. `0` is never a valid object, so creation
/// reports failure as `None`. Implementations are only ever driven from
/// the thread that holds the context.
pub trait ShaderBackend {
    fn create_shader(&self, stage: ShaderStage) -> Option<GLuint>;
    /// Uploads `source` and compiles it.
    fn compile_shader(&self, shader: GLuint, source: &str);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> Option<GLuint>;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn program_link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn delete_program(&self, program: GLuint);
    fn use_program(&self, program: GLuint);

    fn uniform_location(&self, program: GLuint, name: &str) -> Option<GLint>;
    fn attrib_location(&self, program: GLuint, name: &str) -> Option<GLuint>;
    /// Uploads to the program currently in use.
    fn set_uniform(&self, location: GLint, value: UniformValue);
}

/// Issues real calls through the loaded `gl` function pointers.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlBackend;

impl GlBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ShaderBackend for GlBackend {
    fn create_shader(&self, stage: ShaderStage) -> Option<GLuint> {
        let id = unsafe { gl::CreateShader(stage.gl_kind()) };
        (id != 0).then_some(id)
    }

    fn compile_shader(&self, shader: GLuint, source: &str) {
        // Explicit length, so the text needs no NUL terminator.
        let text = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe {
            gl::ShaderSource(shader, 1, &text, &len);
            gl::CompileShader(shader);
        }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut success = GLint::from(gl::FALSE);
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success != GLint::from(gl::FALSE)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        }
        read_info_log(len, |capacity, written, buffer| unsafe {
            gl::GetShaderInfoLog(shader, capacity, written, buffer);
        })
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn create_program(&self) -> Option<GLuint> {
        let id = unsafe { gl::CreateProgram() };
        (id != 0).then_some(id)
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) };
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) };
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) };
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        let mut success = GLint::from(gl::FALSE);
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        success != GLint::from(gl::FALSE)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        }
        read_info_log(len, |capacity, written, buffer| unsafe {
            gl::GetProgramInfoLog(program, capacity, written, buffer);
        })
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) };
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) };
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> Option<GLint> {
        let cname = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(program, cname.as_ptr()) };
        (location >= 0).then_some(location)
    }

    fn attrib_location(&self, program: GLuint, name: &str) -> Option<GLuint> {
        let cname = CString::new(name).ok()?;
        let location = unsafe { gl::GetAttribLocation(program, cname.as_ptr()) };
        GLuint::try_from(location).ok()
    }

    fn set_uniform(&self, location: GLint, value: UniformValue) {
        unsafe {
            match value {
                UniformValue::Int(v) => gl::Uniform1i(location, v),
                UniformValue::Float(v) => gl::Uniform1f(location, v),
                UniformValue::Vec3(v) => gl::Uniform3fv(location, 1, v.as_ref().as_ptr()),
                UniformValue::Vec4(v) => gl::Uniform4fv(location, 1, v.as_ref().as_ptr()),
                UniformValue::Mat4(m) => {
                    gl::UniformMatrix4fv(location, 1, gl::FALSE, m.as_ref().as_ptr())
                }
            }
        }
    }
}

/// Reads at most [`MAX_INFO_LOG_LEN`] bytes of a driver log.
fn read_info_log(
    reported_len: GLint,
    fetch: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar),
) -> String {
    let capacity = usize::try_from(reported_len)
        .unwrap_or(0)
        .min(MAX_INFO_LOG_LEN);
    if capacity == 0 {
        return String::new();
    }

    let mut buffer = vec![0u8; capacity];
    let mut written: GLsizei = 0;
    fetch(
        capacity as GLsizei,
        &mut written,
        buffer.as_mut_ptr() as *mut GLchar,
    );

    let written = usize::try_from(written).unwrap_or(0).min(capacity);
    buffer.truncate(written);
    clean_log(&buffer)
}

/// Drops trailing NULs and whitespace the driver pads logs with.
fn clean_log(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).trim_end().to_owned()
}
