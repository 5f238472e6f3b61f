use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::models::common::ImageFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Environment variable naming an explicit renderer binary
pub const ENV_RENDERER_PATH: &str = "FLOWSCRIBE_MMDC";
/// Environment variable overriding the remote rendering endpoint (`none` disables it)
pub const ENV_RENDER_ENDPOINT: &str = "FLOWSCRIBE_RENDER_ENDPOINT";
/// Environment variable overriding the render timeout, in seconds
pub const ENV_RENDER_TIMEOUT: &str = "FLOWSCRIBE_RENDER_TIMEOUT";
/// Environment variable overriding the renderer install timeout, in seconds
pub const ENV_INSTALL_TIMEOUT: &str = "FLOWSCRIBE_INSTALL_TIMEOUT";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Name or path of the local renderer probed on the global tier
    pub renderer_command: String,

    /// Directory whose `node_modules` is probed and installed into
    pub project_dir: PathBuf,

    /// Program and arguments used to install the renderer on demand
    pub install_command: Vec<String>,

    /// Remote rendering service base URL; `None` disables remote rendering
    pub remote_endpoint: Option<String>,

    /// Theme passed to the local renderer
    pub theme: String,

    /// Background color passed to the local renderer
    pub background_color: String,

    /// Output image format
    pub image_format: ImageFormat,

    /// Upper bound for a single version check or render call, in seconds
    pub timeout_secs: u64,

    /// Upper bound for the on-demand install, in seconds
    pub install_timeout_secs: u64,

    /// Sub-directory of the output directory receiving images
    pub images_subdir: String,
}

impl RenderConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: RenderConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply `FLOWSCRIBE_*` environment overrides on top of the loaded values
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        use log::debug;

        if let Ok(path) = std::env::var(ENV_RENDERER_PATH) {
            debug!("Using renderer from {}: {}", ENV_RENDERER_PATH, path);
            self.renderer_command = path;
        }

        if let Ok(endpoint) = std::env::var(ENV_RENDER_ENDPOINT) {
            debug!("Using render endpoint from {}: {}", ENV_RENDER_ENDPOINT, endpoint);
            self.remote_endpoint = match endpoint.trim() {
                "" | "none" | "off" => None,
                url => Some(url.trim_end_matches('/').to_string()),
            };
        }

        if let Ok(timeout) = std::env::var(ENV_RENDER_TIMEOUT) {
            self.timeout_secs = parse_seconds(ENV_RENDER_TIMEOUT, &timeout)?;
        }

        if let Ok(timeout) = std::env::var(ENV_INSTALL_TIMEOUT) {
            self.install_timeout_secs = parse_seconds(ENV_INSTALL_TIMEOUT, &timeout)?;
        }

        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn install_timeout(&self) -> Duration {
        Duration::from_secs(self.install_timeout_secs.max(1))
    }

    /// Renderer location inside the project's `node_modules`
    pub fn project_renderer_path(&self) -> PathBuf {
        let bin = if cfg!(windows) { "mmdc.cmd" } else { "mmdc" };
        self.project_dir.join("node_modules").join(".bin").join(bin)
    }
}

fn parse_seconds(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Default configuration
impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            renderer_command: "mmdc".to_string(),
            project_dir: PathBuf::from("."),
            install_command: vec![
                "npm".to_string(),
                "install".to_string(),
                "--no-save".to_string(),
                "@mermaid-js/mermaid-cli".to_string(),
            ],
            remote_endpoint: Some("https://mermaid.ink".to_string()),
            theme: "default".to_string(),
            background_color: "white".to_string(),
            image_format: ImageFormat::Png,
            timeout_secs: 30,
            install_timeout_secs: 600,
            images_subdir: "images".to_string(),
        }
    }
}
