use super::rendering::{RenderConfig, ShaderConfig};
use anyhow::{ensure, Context, Result};
use directories::ProjectDirs;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides the platform config location when set.
pub const CONFIG_ENV_VAR: &str = "DISPLAYTHINGS_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "DisplayThings".to_string(),
            width: 800,
            height: 800,
            resizable: true,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    pub screenshot_dir: PathBuf,
    pub window: WindowConfig,
    pub shaders: ShaderConfig,
    pub rendering: RenderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            screenshot_dir: PathBuf::from("screenshots"),
            window: WindowConfig::default(),
            shaders: ShaderConfig::default(),
            rendering: RenderConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.window.width > 0 && self.window.height > 0,
            "window size must be non-zero, got {}x{}",
            self.window.width,
            self.window.height
        );
        ensure!(
            self.rendering
                .clear_color
                .iter()
                .all(|c| (0.0..=1.0).contains(c)),
            "clear_color components must be within 0..=1"
        );
        Ok(())
    }
}

/// Loads the config from [`config_path`], writing defaults on first run.
pub fn load_or_create_config() -> Result<(AppConfig, PathBuf)> {
    let path = config_path()?;
    let config = load_or_create_at(&path)?;
    Ok((config, path))
}

pub fn load_or_create_at(config_path: &Path) -> Result<AppConfig> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    if !config_path.exists() {
        let default_config = AppConfig::default();
        let toml_content = toml::to_string_pretty(&default_config)?;
        std::fs::write(config_path, toml_content).context("Failed to write default config")?;
        return Ok(default_config);
    }

    let content = std::fs::read_to_string(config_path).context("Failed to read config file")?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
    config.validate()?;
    Ok(config)
}

pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    let proj_dirs = ProjectDirs::from("com", "displaythings", "DisplayThings")
        .context("Couldn't determine project directory")?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}
