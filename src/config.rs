use std::collections::BTreeMap;
use std::path::{ Path, PathBuf };

use crate::errors::{ FlowscribeError, FlowscribeResult };
use crate::implementations::config::RenderConfig;
use crate::models::common::RenderTier;
use crate::models::requirements::RequirementsSource;

/// Default location of generated diagrams
pub const DEFAULT_OUTPUT_DIR: &str = "Stage1_Mermaid_Generation/diagrams";

/// Everything one pipeline run needs, passed to the entry point
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub requirements_source: RequirementsSource,
    pub output_directory: PathBuf,
    /// Slot name to literal Mermaid source; bypasses synthesis for that slot
    pub diagram_overrides: BTreeMap<String, String>,
    pub rendering_strategy_order: Vec<RenderTier>,
    pub render_images: bool,
    pub render: RenderConfig,
}

impl PipelineConfig {
    pub fn new(requirements_source: RequirementsSource, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            requirements_source,
            output_directory: output_directory.into(),
            ..Self::default()
        }
    }

    /// Load overrides from a JSON object of `slot -> source`
    pub fn load_overrides(path: &Path) -> FlowscribeResult<BTreeMap<String, String>> {
        let contents = std::fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&contents)?;
        let object = value
            .as_object()
            .ok_or_else(|| {
                FlowscribeError::InvalidInput(
                    format!("{} must contain a JSON object of diagram sources", path.display())
                )
            })?;

        object
            .iter()
            .map(|(slot, source)| match source.as_str() {
                Some(text) => Ok((slot.clone(), text.to_string())),
                None =>
                    Err(
                        FlowscribeError::InvalidInput(
                            format!("Override for '{}' must be a string", slot)
                        )
                    ),
            })
            .collect()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            requirements_source: RequirementsSource::Default,
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            diagram_overrides: BTreeMap::new(),
            rendering_strategy_order: RenderTier::default_order(),
            render_images: true,
            render: RenderConfig::default(),
        }
    }
}
