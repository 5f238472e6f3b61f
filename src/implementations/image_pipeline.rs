use log::{ debug, error, info };
use std::path::Path;

use crate::errors::{ log_with_recovery, FlowscribeError, FlowscribeResult };
use crate::implementations::config::RenderConfig;
use crate::implementations::renderer::{ MermaidCliRenderer, MermaidInkRenderer };
use crate::implementations::tool_locator::SystemToolLocator;
use crate::models::common::{ RenderStrategy, RenderTier };
use crate::models::report::{ ImageStageReport, PersistedArtifact, RenderedImage, StageCount };
use crate::traits::image_renderer::{ ImageRenderer, ToolLocator };

/// Walk the tier order and settle on one strategy for the whole run
pub async fn resolve_strategy(
    order: &[RenderTier],
    locator: &dyn ToolLocator,
    remote_available: bool
) -> RenderStrategy {
    for tier in order {
        debug!("Trying rendering tier: {}", tier);
        match tier {
            RenderTier::Global => {
                if let Some(path) = locator.probe_global().await {
                    return RenderStrategy::LocalGlobal(path);
                }
            }
            RenderTier::Project => {
                if let Some(path) = locator.probe_project().await {
                    return RenderStrategy::LocalProject(path);
                }
            }
            RenderTier::Install => {
                match locator.install().await {
                    Ok(path) => {
                        return RenderStrategy::LocalProject(path);
                    }
                    Err(e) => log_with_recovery("Install tier", &e),
                }
            }
            RenderTier::Remote => {
                if remote_available {
                    return RenderStrategy::Remote;
                }
                debug!("Remote rendering not configured");
            }
        }
    }

    RenderStrategy::Unavailable
}

/// Renders persisted diagram sources with a strategy chosen once per run
pub struct ImagePipeline {
    config: RenderConfig,
    order: Vec<RenderTier>,
    locator: Box<dyn ToolLocator>,
    http_client: Option<reqwest::Client>,
}

impl ImagePipeline {
    pub fn new(config: RenderConfig, order: Vec<RenderTier>) -> Self {
        let locator = Box::new(SystemToolLocator::new(config.clone()));
        Self::with_locator(config, order, locator)
    }

    pub fn with_locator(config: RenderConfig, order: Vec<RenderTier>, locator: Box<dyn ToolLocator>) -> Self {
        Self { config, order, locator, http_client: None }
    }

    /// Send remote render requests through `client` instead of a fresh one
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub async fn resolve(&self) -> RenderStrategy {
        resolve_strategy(&self.order, self.locator.as_ref(), self.config.remote_endpoint.is_some()).await
    }

    fn renderer_for(&self, strategy: &RenderStrategy) -> FlowscribeResult<Box<dyn ImageRenderer>> {
        match strategy {
            RenderStrategy::LocalGlobal(program) | RenderStrategy::LocalProject(program) =>
                Ok(
                    Box::new(
                        MermaidCliRenderer::new(
                            program.clone(),
                            &self.config.theme,
                            &self.config.background_color,
                            self.config.timeout()
                        )
                    )
                ),
            RenderStrategy::Remote => {
                let endpoint = self.config.remote_endpoint
                    .as_deref()
                    .ok_or_else(|| FlowscribeError::RenderUnavailable("no remote endpoint".to_string()))?;
                let renderer = match &self.http_client {
                    Some(client) =>
                        MermaidInkRenderer::with_client(
                            client.clone(),
                            endpoint,
                            self.config.image_format,
                            self.config.timeout()
                        ),
                    None => MermaidInkRenderer::new(endpoint, self.config.image_format, self.config.timeout())?,
                };
                Ok(Box::new(renderer))
            }
            RenderStrategy::Unavailable =>
                Err(
                    FlowscribeError::RenderUnavailable(
                        "no local renderer, install failed and no remote endpoint".to_string()
                    )
                ),
        }
    }

    /// Render every artifact under `output_dir/<images_subdir>`.
    ///
    /// Never fails: an unavailable renderer reports zero successes and a
    /// failed artifact is logged and skipped.
    pub async fn render_all(&self, artifacts: &[PersistedArtifact], output_dir: &Path) -> ImageStageReport {
        if artifacts.is_empty() {
            info!("No diagram sources to render");
        }

        let strategy = self.resolve().await;
        info!("Image rendering strategy: {}", strategy);

        let renderer = match self.renderer_for(&strategy) {
            Ok(renderer) => renderer,
            Err(e) => {
                log_with_recovery("Image stage", &e);
                return ImageStageReport::unavailable(artifacts.len());
            }
        };

        let images_dir = output_dir.join(&self.config.images_subdir);
        if let Err(e) = tokio::fs::create_dir_all(&images_dir).await {
            error!("Cannot create images directory {}: {}", images_dir.display(), e);
            return ImageStageReport {
                strategy,
                counts: StageCount { attempted: artifacts.len(), succeeded: 0 },
                images: Vec::new(),
            };
        }

        let mut counts = StageCount::default();
        let mut images = Vec::new();

        for artifact in artifacts {
            let output = images_dir.join(format!("{}.{}", artifact.name, self.config.image_format.extension()));
            match self.render_one(renderer.as_ref(), artifact, &output).await {
                Ok(image) => {
                    info!("Generated image: {} via {}", image.path.display(), renderer.name());
                    counts.record(true);
                    images.push(image);
                }
                Err(e) => {
                    log_with_recovery(&format!("Image for {}", artifact.name), &e);
                    counts.record(false);
                }
            }
        }

        info!("Image generation: {}/{} files", counts.succeeded, counts.attempted);

        ImageStageReport { strategy, counts, images }
    }

    async fn render_one(
        &self,
        renderer: &dyn ImageRenderer,
        artifact: &PersistedArtifact,
        output: &Path
    ) -> FlowscribeResult<RenderedImage> {
        renderer.render(&artifact.path, output).await?;

        let bytes = tokio::fs::metadata(output).await
            .map(|meta| meta.len())
            .unwrap_or(0);
        if bytes == 0 {
            return Err(FlowscribeError::WriteFailure {
                path: output.display().to_string(),
                message: "renderer produced no image".to_string(),
            });
        }

        Ok(RenderedImage {
            artifact: artifact.name.clone(),
            path: output.to_path_buf(),
            format: self.config.image_format,
            bytes,
        })
    }
}
