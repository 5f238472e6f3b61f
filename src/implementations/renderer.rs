use async_trait::async_trait;
use base64::Engine as _;
use log::debug;
use std::path::{ Path, PathBuf };
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::errors::{ FlowscribeError, FlowscribeResult };
use crate::models::common::ImageFormat;
use crate::traits::image_renderer::ImageRenderer;

fn artifact_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Runs a local Mermaid CLI (`mmdc`) per artifact
#[derive(Debug, Clone)]
pub struct MermaidCliRenderer {
    program: PathBuf,
    theme: String,
    background_color: String,
    timeout: Duration,
}

impl MermaidCliRenderer {
    pub fn new(program: PathBuf, theme: &str, background_color: &str, timeout: Duration) -> Self {
        Self {
            program,
            theme: theme.to_string(),
            background_color: background_color.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl ImageRenderer for MermaidCliRenderer {
    fn name(&self) -> &str {
        "mermaid-cli"
    }

    async fn render(&self, source: &Path, output: &Path) -> FlowscribeResult<()> {
        let mut command = Command::new(&self.program);
        command
            .arg("-i")
            .arg(source)
            .arg("-o")
            .arg(output)
            .arg("-t")
            .arg(&self.theme)
            .arg("-b")
            .arg(&self.background_color)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!("Running {} for {}", self.program.display(), source.display());

        let result = tokio::time::timeout(self.timeout, command.output()).await.map_err(|_| {
            FlowscribeError::RenderTimeout {
                artifact: artifact_name(source),
                seconds: self.timeout.as_secs(),
            }
        })?;

        let output_status = result.map_err(|e| FlowscribeError::LocalRenderFailure {
            tool: self.program.display().to_string(),
            status: "spawn error".to_string(),
            stderr: e.to_string(),
        })?;

        if output_status.status.success() {
            Ok(())
        } else {
            let mut stderr = String::from_utf8_lossy(&output_status.stderr).trim().to_string();
            if stderr.is_empty() {
                stderr = String::from_utf8_lossy(&output_status.stdout).trim().to_string();
            }
            Err(FlowscribeError::LocalRenderFailure {
                tool: self.program.display().to_string(),
                status: output_status.status.to_string(),
                stderr,
            })
        }
    }
}

/// Renders through a mermaid.ink compatible HTTP service
#[derive(Debug, Clone)]
pub struct MermaidInkRenderer {
    http_client: reqwest::Client,
    endpoint: String,
    format: ImageFormat,
    timeout: Duration,
}

impl MermaidInkRenderer {
    /// The timeout bounds every request, connect and body included
    pub fn new(endpoint: &str, format: ImageFormat, timeout: Duration) -> FlowscribeResult<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http_client, endpoint, format, timeout))
    }

    /// Use a preconfigured client; `timeout` is only reported in errors
    pub fn with_client(http_client: reqwest::Client, endpoint: &str, format: ImageFormat, timeout: Duration) -> Self {
        Self {
            http_client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            format,
            timeout,
        }
    }

    /// Request URL with the source base64 encoded into the path
    pub fn request_url(&self, source: &str) -> String {
        let encoded = base64::engine::general_purpose::URL_SAFE.encode(source.as_bytes());
        match self.format {
            ImageFormat::Png => format!("{}/img/{}?type=png", self.endpoint, encoded),
            ImageFormat::Svg => format!("{}/svg/{}", self.endpoint, encoded),
        }
    }
}

#[async_trait]
impl ImageRenderer for MermaidInkRenderer {
    fn name(&self) -> &str {
        "mermaid.ink"
    }

    async fn render(&self, source: &Path, output: &Path) -> FlowscribeResult<()> {
        let content = tokio::fs::read_to_string(source).await?;
        let url = self.request_url(&content);
        debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FlowscribeError::RenderTimeout {
                    artifact: artifact_name(source),
                    seconds: self.timeout.as_secs(),
                }
            } else {
                FlowscribeError::Network(e)
            }
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FlowscribeError::RemoteRenderFailure {
                artifact: artifact_name(source),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(output, &bytes).await?;
        Ok(())
    }
}
