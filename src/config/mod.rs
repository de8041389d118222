pub mod core;
pub mod rendering;

pub use self::core::{load_or_create_at, load_or_create_config, AppConfig, WindowConfig};
pub use rendering::{RenderConfig, ShaderConfig};
