// pipeline.rs - per-frame drawing of the configured scene

use crate::config::{AppConfig, ShaderConfig};
use crate::render::backend::{GlBackend, ShaderBackend};
use crate::render::mesh::Mesh;
use crate::render::shaders::{fallback, ShaderError, ShaderProgram, ShaderProgramBuilder};
use crate::state::AppState;
use log::{error, info, warn};

pub const MODEL_UNIFORM: &str = "modelMatrix";
pub const VIEW_UNIFORM: &str = "viewMatrix";
pub const PROJECTION_UNIFORM: &str = "projMatrix";

/// The program currently drawn with, plus where it is rebuilt from.
pub struct ProgramSlot<B: ShaderBackend + Clone = GlBackend> {
    builder: ShaderProgramBuilder<B>,
    sources: ShaderConfig,
    program: ShaderProgram<B>,
    using_fallback: bool,
}

impl<B: ShaderBackend + Clone> ProgramSlot<B> {
    /// Builds from the configured files, falling back to the built-in
    /// sources when they fail. The file error is returned alongside so the
    /// caller can report it.
    pub fn load(
        builder: ShaderProgramBuilder<B>,
        sources: ShaderConfig,
    ) -> Result<(Self, Option<ShaderError>), ShaderError> {
        match builder.build(&sources.vertex, &sources.fragment) {
            Ok(program) => {
                info!(
                    "Built shader program {} from {} + {}",
                    program.id(),
                    sources.vertex.display(),
                    sources.fragment.display()
                );
                let slot = Self {
                    builder,
                    sources,
                    program,
                    using_fallback: false,
                };
                Ok((slot, None))
            }
            Err(err) => {
                error!("Shader build failed, using built-in shaders: {}", err);
                let (vertex, fragment) = fallback::sources();
                let program = builder.build_from_sources(&vertex, &fragment)?;
                let slot = Self {
                    builder,
                    sources,
                    program,
                    using_fallback: true,
                };
                Ok((slot, Some(err)))
            }
        }
    }

    /// Rebuilds from the configured files. On failure the current program
    /// stays in place.
    pub fn reload(&mut self) -> Result<(), ShaderError> {
        let program = self
            .builder
            .build(&self.sources.vertex, &self.sources.fragment)?;
        info!("Reloaded shader program {}", program.id());
        self.program = program;
        self.using_fallback = false;
        Ok(())
    }

    pub fn program(&self) -> &ShaderProgram<B> {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut ShaderProgram<B> {
        &mut self.program
    }

    pub fn using_fallback(&self) -> bool {
        self.using_fallback
    }
}

/// Draws the configured mesh with the scene program.
pub struct SceneRenderer {
    slot: ProgramSlot<GlBackend>,
    mesh: Mesh,
}

impl SceneRenderer {
    /// Needs a current context. The second value is the configured
    /// shaders' build error, if the fallback had to be used.
    pub fn new(config: &AppConfig) -> Result<(Self, Option<ShaderError>), ShaderError> {
        let (slot, file_error) =
            ProgramSlot::load(ShaderProgramBuilder::new(), config.shaders.clone())?;

        for attribute in ["aPos", "aColor"] {
            if slot.program().attrib_location(attribute).is_none() {
                warn!("Attribute '{}' is not used by the scene program", attribute);
            }
        }

        let mesh = Mesh::new(&config.rendering.mesh.vertices());
        info!(
            "Uploaded {:?} mesh with {} vertices",
            config.rendering.mesh,
            mesh.vertex_count()
        );

        Ok((Self { slot, mesh }, file_error))
    }

    pub fn reload(&mut self) -> Result<(), ShaderError> {
        self.slot.reload()
    }

    pub fn using_fallback(&self) -> bool {
        self.slot.using_fallback()
    }

    /// Clears the framebuffer and draws one frame of the scene.
    pub fn draw(&mut self, state: &AppState) {
        let [r, g, b, a] = state.clear_color;
        unsafe {
            gl::Viewport(
                0,
                0,
                state.viewport.width as i32,
                state.viewport.height as i32,
            );
            if state.depth_test {
                gl::Enable(gl::DEPTH_TEST);
            } else {
                gl::Disable(gl::DEPTH_TEST);
            }
            gl::ClearColor(r * a, g * a, b * a, a);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        if state.viewport.is_empty() {
            return;
        }

        let program = self.slot.program_mut();
        program.set_mat4(
            MODEL_UNIFORM,
            state.transform.model_matrix(state.timer.time()),
        );
        program.set_mat4(VIEW_UNIFORM, state.camera.view_matrix());
        program.set_mat4(
            PROJECTION_UNIFORM,
            state.camera.projection_matrix(state.aspect_ratio()),
        );

        unsafe {
            if state.wireframe {
                gl::PolygonMode(gl::FRONT_AND_BACK, gl::LINE);
            }
        }
        self.mesh.draw();
        unsafe {
            gl::PolygonMode(gl::FRONT_AND_BACK, gl::FILL);
            gl::UseProgram(0);
        }
    }
}
