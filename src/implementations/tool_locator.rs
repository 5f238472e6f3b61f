use async_trait::async_trait;
use log::{ debug, info, warn };
use std::path::{ Path, PathBuf };
use std::process::Stdio;
use tokio::process::Command;

use crate::errors::{ FlowscribeError, FlowscribeResult };
use crate::implementations::config::RenderConfig;
use crate::traits::image_renderer::ToolLocator;

/// Locates the Mermaid CLI on this machine, installing it with npm if asked
#[derive(Debug, Clone)]
pub struct SystemToolLocator {
    config: RenderConfig,
}

impl SystemToolLocator {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// True when `program --version` exits successfully within the timeout
    async fn answers_version_probe(&self, program: &Path) -> bool {
        let mut command = Command::new(program);
        command
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        match tokio::time::timeout(self.config.timeout(), command.status()).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                debug!("Probe of {} failed: {}", program.display(), e);
                false
            }
            Err(_) => {
                debug!("Probe of {} timed out", program.display());
                false
            }
        }
    }
}

#[async_trait]
impl ToolLocator for SystemToolLocator {
    async fn probe_global(&self) -> Option<PathBuf> {
        let program = PathBuf::from(&self.config.renderer_command);
        debug!("Probing for global renderer: {}", program.display());

        if self.answers_version_probe(&program).await {
            info!("Found global renderer: {}", program.display());
            Some(program)
        } else {
            None
        }
    }

    async fn probe_project(&self) -> Option<PathBuf> {
        let path = self.config.project_renderer_path();
        debug!("Probing for project renderer: {}", path.display());

        if path.is_file() {
            info!("Found project renderer: {}", path.display());
            Some(path)
        } else {
            None
        }
    }

    async fn install(&self) -> FlowscribeResult<PathBuf> {
        let (program, args) = self.config.install_command
            .split_first()
            .ok_or_else(|| FlowscribeError::InstallFailure("No install command configured".to_string()))?;

        info!("Installing renderer: {}", self.config.install_command.join(" "));

        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(&self.config.project_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.config.install_timeout(), command.output()).await
            .map_err(|_| {
                FlowscribeError::InstallFailure(
                    format!("{} timed out after {}s", program, self.config.install_timeout().as_secs())
                )
            })?
            .map_err(|e| FlowscribeError::InstallFailure(format!("{}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("Renderer install exited with {}", output.status);
            return Err(FlowscribeError::InstallFailure(format!("{} exited with {}: {}", program, output.status, stderr)));
        }

        let installed = self.config.project_renderer_path();
        if installed.is_file() {
            info!("Installed renderer at {}", installed.display());
            Ok(installed)
        } else {
            Err(
                FlowscribeError::InstallFailure(
                    format!("install finished but {} was not found", installed.display())
                )
            )
        }
    }
}
