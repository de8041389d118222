//! User interface
pub mod egui_render;
pub mod hud;

pub use egui_render::EguiRenderer;
pub use hud::Hud;
