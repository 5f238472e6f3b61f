use log::{ info, warn };
use std::fs;
use std::path::{ Component, Path, PathBuf };

use crate::errors::{ log_with_recovery, FlowscribeError, FlowscribeResult };
use crate::models::diagram::DiagramArtifact;
use crate::models::report::{ PersistedArtifact, StageCount };
use crate::models::requirements::{ ExtractionResult, RequirementCorpus };

/// Analysis record file name
pub const ANALYSIS_FILE: &str = "analysis_results.json";
/// Copy of the requirements the run was generated from
pub const REQUIREMENTS_FILE: &str = "current_requirements.txt";

/// True when `name` is exactly one plain path component, so it cannot
/// leave the output directory
pub fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}

/// Result of persisting a batch of diagram sources
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub counts: StageCount,
    pub persisted: Vec<PersistedArtifact>,
}

/// Writes artifacts under one output directory and verifies each write
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    directory: PathBuf,
}

impl ArtifactWriter {
    /// Create the writer, creating the directory and its parents
    pub fn create(directory: &Path) -> FlowscribeResult<Self> {
        fs::create_dir_all(directory).map_err(|e| FlowscribeError::WriteFailure {
            path: directory.display().to_string(),
            message: format!("Failed to create output directory: {}", e),
        })?;
        info!("Diagrams directory: {}", directory.display());

        Ok(Self {
            directory: directory.to_path_buf(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write `content` to `file_name`, then confirm it exists and is non-empty
    pub fn write_verified(&self, file_name: &str, content: &[u8]) -> FlowscribeResult<PersistedArtifact> {
        if !is_plain_file_name(file_name) {
            return Err(FlowscribeError::WriteFailure {
                path: file_name.to_string(),
                message: "Artifact name must be a single file name".to_string(),
            });
        }
        let path = self.directory.join(file_name);

        fs::write(&path, content).map_err(|e| FlowscribeError::WriteFailure {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let bytes = fs::metadata(&path)
            .map(|meta| meta.len())
            .map_err(|e| FlowscribeError::WriteFailure {
                path: path.display().to_string(),
                message: format!("File missing after write: {}", e),
            })?;

        if bytes == 0 {
            return Err(FlowscribeError::WriteFailure {
                path: path.display().to_string(),
                message: "File is empty after write".to_string(),
            });
        }

        let name = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());

        Ok(PersistedArtifact { name, path, bytes })
    }

    /// Persist every artifact; a failed write is logged and counted, never fatal
    pub fn write_diagrams(&self, artifacts: &[DiagramArtifact]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for artifact in artifacts {
            let written = if is_plain_file_name(&artifact.name) {
                self.write_verified(&artifact.file_name(), artifact.source.as_bytes())
            } else {
                Err(FlowscribeError::WriteFailure {
                    path: artifact.file_name(),
                    message: format!("Invalid artifact name {:?}", artifact.name),
                })
            };
            match written {
                Ok(persisted) => {
                    info!("Generated: {} ({} bytes)", persisted.path.display(), persisted.bytes);
                    outcome.counts.record(true);
                    outcome.persisted.push(persisted);
                }
                Err(e) => {
                    log_with_recovery(&format!("Saving {}", artifact.file_name()), &e);
                    outcome.counts.record(false);
                }
            }
        }

        outcome
    }

    /// Write the category to phrases record as pretty JSON
    pub fn write_analysis(&self, extraction: &ExtractionResult) -> FlowscribeResult<PersistedArtifact> {
        let json = serde_json::to_string_pretty(extraction)?;
        self.write_verified(ANALYSIS_FILE, json.as_bytes())
    }

    /// Keep a copy of the input next to the diagrams; failures only warn
    pub fn write_requirements(&self, corpus: &RequirementCorpus) {
        match self.write_verified(REQUIREMENTS_FILE, corpus.text().as_bytes()) {
            Ok(persisted) => info!("Requirements saved to: {}", persisted.path.display()),
            Err(e) => warn!("Could not save requirements copy: {}", e),
        }
    }
}
