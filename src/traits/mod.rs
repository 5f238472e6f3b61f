pub mod requirement_extractor;
pub mod diagram_synthesizer;
pub mod image_renderer;
pub mod diagram_pipeline;

// Re-export traits
pub use requirement_extractor::RequirementExtractor;
pub use diagram_synthesizer::DiagramSynthesizer;
pub use image_renderer::{ ImageRenderer, ToolLocator };
pub use diagram_pipeline::DiagramPipeline;
