use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{ Deserialize, Serialize };

/// One step of the rendering fallback order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderTier {
    /// Renderer found on the PATH (or at an explicitly configured location)
    Global,
    /// Renderer installed under the project's `node_modules`
    Project,
    /// Install the renderer on demand, then use it as a project tool
    Install,
    /// Third-party rendering service over HTTP
    Remote,
}

impl RenderTier {
    pub fn default_order() -> Vec<RenderTier> {
        vec![RenderTier::Global, RenderTier::Project, RenderTier::Install, RenderTier::Remote]
    }

    /// Parse a comma separated tier list such as `global,remote`
    pub fn parse_order(value: &str) -> Result<Vec<RenderTier>, String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(RenderTier::from_str)
            .collect()
    }
}

impl FromStr for RenderTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "global" | "local" => Ok(RenderTier::Global),
            "project" => Ok(RenderTier::Project),
            "install" => Ok(RenderTier::Install),
            "remote" | "online" => Ok(RenderTier::Remote),
            other => Err(format!("Unknown rendering tier: {}", other)),
        }
    }
}

impl fmt::Display for RenderTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderTier::Global => "global",
            RenderTier::Project => "project",
            RenderTier::Install => "install",
            RenderTier::Remote => "remote",
        };
        write!(f, "{}", name)
    }
}

/// Rendering strategy resolved once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "tool", rename_all = "snake_case")]
pub enum RenderStrategy {
    Unavailable,
    LocalGlobal(PathBuf),
    LocalProject(PathBuf),
    Remote,
}

impl RenderStrategy {
    pub fn is_available(&self) -> bool {
        !matches!(self, RenderStrategy::Unavailable)
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStrategy::Unavailable => write!(f, "unavailable"),
            RenderStrategy::LocalGlobal(path) => write!(f, "local ({})", path.display()),
            RenderStrategy::LocalProject(path) => write!(f, "project ({})", path.display()),
            RenderStrategy::Remote => write!(f, "remote"),
        }
    }
}

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            other => Err(format!("Unsupported image format: {}", other)),
        }
    }
}
