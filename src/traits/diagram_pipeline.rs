use async_trait::async_trait;

use crate::config::PipelineConfig;
use crate::errors::FlowscribeResult;
use crate::models::report::GenerationReport;

/// End-to-end requirements to diagrams run
#[async_trait]
pub trait DiagramPipeline {
    /// Extract, synthesize, persist and render for one configuration.
    ///
    /// Only environment failures such as an output directory that cannot
    /// be created are returned as errors; everything else is counted in the
    /// report.
    async fn run(&self, config: &PipelineConfig) -> FlowscribeResult<GenerationReport>;
}
