use anyhow::{ Context, Result };
use std::path::{ Path, PathBuf };

use crate::cli::ui;
use flowscribe::{
    DiagramPipeline,
    GenerationReport,
    ImageFormat,
    PipelineConfig,
    PipelineRunner,
    RenderConfig,
    RenderTier,
    RequirementsSource,
};

/// Command line choices for one generation run
pub struct GenerateArgs<'a> {
    pub requirements: Option<&'a str>,
    pub custom_diagrams: Option<&'a Path>,
    pub output_dir: &'a Path,
    pub strategy: Vec<RenderTier>,
    pub render_images: bool,
    pub theme: Option<&'a str>,
    pub background: Option<&'a str>,
    pub format: Option<&'a str>,
}

/// Diagram generation command
pub async fn execute(args: GenerateArgs<'_>, mut render: RenderConfig, json_output: bool) -> Result<()> {
    ui::print_header("Mermaid Diagram Generator");

    if let Some(theme) = args.theme {
        render.theme = theme.to_string();
    }
    if let Some(background) = args.background {
        render.background_color = background.to_string();
    }
    if let Some(format) = args.format {
        render.image_format = format.parse::<ImageFormat>().map_err(anyhow::Error::msg)?;
    }

    let mut config = PipelineConfig::new(
        RequirementsSource::from_arg(args.requirements),
        PathBuf::from(args.output_dir)
    );
    config.rendering_strategy_order = args.strategy;
    config.render_images = args.render_images;
    config.render = render;

    if let Some(path) = args.custom_diagrams {
        if path.exists() {
            config.diagram_overrides = PipelineConfig::load_overrides(path).with_context(||
                format!("Failed to load custom diagrams from {}", path.display())
            )?;
            ui::print_info(
                format!("Loaded {} custom diagram(s)", config.diagram_overrides.len()).as_str()
            );
        } else {
            ui::print_warning(
                format!("Custom diagrams file {} not found, generating all slots", path.display()).as_str()
            );
        }
    }

    let spinner = ui::spinner_with_message("Generating diagrams...");
    let runner = PipelineRunner::new();
    let result = runner.run(&config).await;
    spinner.finish_and_clear();

    let report = result.context("Diagram generation failed")?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.is_success() {
        anyhow::bail!("No artifacts were written to {}", report.output_directory.display());
    }

    Ok(())
}

fn print_report(report: &GenerationReport) {
    ui::print_header("Generation Summary");
    ui::print_stage("Diagram sources", &report.diagrams);
    ui::print_stage("Analysis record", &report.analysis);

    for artifact in &report.persisted {
        println!("   {} ({} bytes)", artifact.path.display(), artifact.bytes);
    }

    match &report.images {
        Some(images) if images.strategy.is_available() => {
            ui::print_result("Rendering strategy", &images.strategy.to_string());
            ui::print_stage("Images", &images.counts);
        }
        Some(_) => {
            ui::print_warning("Image generation unavailable - MMD files available for manual conversion");
        }
        None => ui::print_info("Image rendering skipped"),
    }

    ui::print_success(format!("All files saved to: {}", report.output_directory.display()).as_str());
}
