pub mod config;
pub mod input;
pub mod render;
pub mod state;
pub mod ui;
pub mod window;

// Re-export commonly used types
pub use config::core::AppConfig;
pub use input::InputState;
pub use render::pipeline::SceneRenderer;
pub use render::shaders::{ShaderError, ShaderProgram, ShaderProgramBuilder, ShaderStage};
pub use state::AppState;
pub use window::GlWindow;
