pub mod common;
pub mod requirements;
pub mod diagram;
pub mod report;

// Re-export common model types
pub use common::{ImageFormat, RenderStrategy, RenderTier};
pub use requirements::{Category, ExtractionResult, RequirementCorpus, RequirementsSource};
pub use diagram::{ArtifactOrigin, DiagramArtifact, DiagramKind};
pub use report::{GenerationReport, ImageStageReport, PersistedArtifact, RenderedImage, StageCount};
