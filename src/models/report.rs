use std::path::PathBuf;

use serde::Serialize;

use crate::models::common::{ ImageFormat, RenderStrategy };

/// Attempted vs. succeeded counts for one stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub attempted: usize,
    pub succeeded: usize,
}

impl StageCount {
    pub fn record(&mut self, success: bool) {
        self.attempted += 1;
        if success {
            self.succeeded += 1;
        }
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}

/// A diagram source that made it to disk and passed verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedArtifact {
    pub name: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Image written by one rendering strategy for one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedImage {
    pub artifact: String,
    pub path: PathBuf,
    pub format: ImageFormat,
    pub bytes: u64,
}

/// Outcome of the image stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageStageReport {
    pub strategy: RenderStrategy,
    pub counts: StageCount,
    pub images: Vec<RenderedImage>,
}

impl ImageStageReport {
    pub fn unavailable(attempted: usize) -> Self {
        Self {
            strategy: RenderStrategy::Unavailable,
            counts: StageCount { attempted, succeeded: 0 },
            images: Vec::new(),
        }
    }
}

/// Summary of one pipeline run, returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub output_directory: PathBuf,
    pub diagrams: StageCount,
    pub analysis: StageCount,
    pub persisted: Vec<PersistedArtifact>,
    /// `None` when image rendering was disabled for the run
    pub images: Option<ImageStageReport>,
}

impl GenerationReport {
    /// Diagram sources plus the analysis record
    pub fn text_artifacts(&self) -> StageCount {
        StageCount {
            attempted: self.diagrams.attempted + self.analysis.attempted,
            succeeded: self.diagrams.succeeded + self.analysis.succeeded,
        }
    }

    pub fn image_counts(&self) -> StageCount {
        self.images
            .as_ref()
            .map(|stage| stage.counts)
            .unwrap_or_default()
    }

    pub fn is_success(&self) -> bool {
        self.text_artifacts().succeeded > 0
    }
}
