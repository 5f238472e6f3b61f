pub mod config;
pub mod sanitizer;
pub mod extractor;
pub mod synthesizer;
pub mod persistence;
pub mod tool_locator;
pub mod renderer;
pub mod image_pipeline;
pub mod pipeline;
pub mod document;
