use async_trait::async_trait;
use log::info;

use crate::config::PipelineConfig;
use crate::errors::{ log_with_recovery, FlowscribeError, FlowscribeResult };
use crate::implementations::extractor::PatternExtractor;
use crate::implementations::image_pipeline::ImagePipeline;
use crate::implementations::persistence::ArtifactWriter;
use crate::implementations::synthesizer::MermaidSynthesizer;
use crate::implementations::tool_locator::SystemToolLocator;
use crate::models::report::{ GenerationReport, StageCount };
use crate::models::requirements::{ RequirementCorpus, RequirementsSource, DEFAULT_REQUIREMENTS };
use crate::traits::diagram_pipeline::DiagramPipeline;
use crate::traits::diagram_synthesizer::DiagramSynthesizer;
use crate::traits::image_renderer::ToolLocator;
use crate::traits::requirement_extractor::RequirementExtractor;

/// Builds the tool locator used for a run's render config
pub type LocatorFactory = Box<dyn Fn(&PipelineConfig) -> Box<dyn ToolLocator> + Send + Sync>;

/// Load the corpus; an unreadable file falls back to the default requirements
pub fn load_corpus(source: &RequirementsSource) -> RequirementCorpus {
    match source {
        RequirementsSource::Text(text) => RequirementCorpus::new(text.clone()),
        RequirementsSource::Default => {
            info!("No requirements given, using built-in defaults");
            RequirementCorpus::new(DEFAULT_REQUIREMENTS)
        }
        RequirementsSource::File(path) =>
            match std::fs::read_to_string(path) {
                Ok(text) => {
                    info!("Loaded requirements from {}", path.display());
                    RequirementCorpus::new(text)
                }
                Err(e) => {
                    let err = FlowscribeError::MissingInput(format!("{}: {}", path.display(), e));
                    log_with_recovery("Requirements", &err);
                    RequirementCorpus::new(DEFAULT_REQUIREMENTS)
                }
            }
    }
}

/// Extractor, synthesizer, writer and image stage wired together
pub struct PipelineRunner {
    extractor: Box<dyn RequirementExtractor + Send + Sync>,
    synthesizer: Box<dyn DiagramSynthesizer + Send + Sync>,
    locator_factory: LocatorFactory,
}

impl PipelineRunner {
    pub fn new() -> Self {
        Self {
            extractor: Box::new(PatternExtractor::new()),
            synthesizer: Box::new(MermaidSynthesizer::new()),
            locator_factory: Box::new(|config: &PipelineConfig| {
                Box::new(SystemToolLocator::new(config.render.clone())) as Box<dyn ToolLocator>
            }),
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: impl DiagramSynthesizer + Send + Sync + 'static) -> Self {
        self.synthesizer = Box::new(synthesizer);
        self
    }

    pub fn with_locator_factory(mut self, factory: LocatorFactory) -> Self {
        self.locator_factory = factory;
        self
    }
}

impl Default for PipelineRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiagramPipeline for PipelineRunner {
    async fn run(&self, config: &PipelineConfig) -> FlowscribeResult<GenerationReport> {
        info!("Starting diagram generation into {}", config.output_directory.display());

        let writer = ArtifactWriter::create(&config.output_directory)?;

        info!("Analyzing requirements...");
        let corpus = load_corpus(&config.requirements_source);
        let extraction = self.extractor.extract(&corpus);

        if !config.diagram_overrides.is_empty() {
            info!("Using {} custom diagram override(s)", config.diagram_overrides.len());
        }
        let artifacts = self.synthesizer.synthesize_all(&extraction, &config.diagram_overrides);

        info!("Saving {} diagrams...", artifacts.len());
        let batch = writer.write_diagrams(&artifacts);

        writer.write_requirements(&corpus);

        let mut analysis = StageCount::default();
        match writer.write_analysis(&extraction) {
            Ok(persisted) => {
                info!("Generated: {}", persisted.path.display());
                analysis.record(true);
            }
            Err(e) => {
                log_with_recovery("Saving analysis", &e);
                analysis.record(false);
            }
        }

        let images = if config.render_images {
            info!("Generating images from {} diagram sources...", batch.persisted.len());
            let locator = (self.locator_factory)(config);
            let pipeline = ImagePipeline::with_locator(
                config.render.clone(),
                config.rendering_strategy_order.clone(),
                locator
            );
            Some(pipeline.render_all(&batch.persisted, writer.directory()).await)
        } else {
            info!("Image rendering disabled");
            None
        };

        let report = GenerationReport {
            output_directory: writer.directory().to_path_buf(),
            diagrams: batch.counts,
            analysis,
            persisted: batch.persisted,
            images,
        };

        info!(
            "Successfully generated: {}/{} text artifacts",
            report.text_artifacts().succeeded,
            report.text_artifacts().attempted
        );

        Ok(report)
    }
}
