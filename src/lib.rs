pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod implementations;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::{PipelineConfig, DEFAULT_OUTPUT_DIR};
pub use errors::{log_with_recovery, ErrorSeverity, FlowscribeError, FlowscribeResult, RecoverableError};
pub use implementations::config::{ConfigError, RenderConfig};
pub use implementations::extractor::PatternExtractor;
pub use implementations::image_pipeline::{resolve_strategy, ImagePipeline};
pub use implementations::pipeline::{load_corpus, PipelineRunner};
pub use implementations::sanitizer::sanitize;
pub use implementations::synthesizer::MermaidSynthesizer;
pub use models::{
    common::{
        ImageFormat,
        RenderStrategy,
        RenderTier,
    },
    requirements::{
        Category,
        ExtractionResult,
        RequirementCorpus,
        RequirementsSource,
    },
    diagram::{
        ArtifactOrigin,
        DiagramArtifact,
        DiagramKind,
    },
    report::{
        GenerationReport,
        ImageStageReport,
        RenderedImage,
        StageCount,
    },
};
pub use traits::{
    DiagramPipeline,
    DiagramSynthesizer,
    ImageRenderer,
    RequirementExtractor,
    ToolLocator,
};
