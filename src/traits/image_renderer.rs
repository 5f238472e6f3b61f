use std::path::{ Path, PathBuf };
use async_trait::async_trait;

use crate::errors::FlowscribeResult;

/// Converts one persisted Mermaid source file into an image file
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Render `source` into `output`. A failure only concerns this artifact.
    async fn render(&self, source: &Path, output: &Path) -> FlowscribeResult<()>;
}

/// Finds or installs a local renderer
#[async_trait]
pub trait ToolLocator: Send + Sync {
    /// Renderer reachable globally, if it answers a version probe
    async fn probe_global(&self) -> Option<PathBuf>;

    /// Renderer installed in the project, if present
    async fn probe_project(&self) -> Option<PathBuf>;

    /// Install the renderer on demand and return its location
    async fn install(&self) -> FlowscribeResult<PathBuf>;
}
