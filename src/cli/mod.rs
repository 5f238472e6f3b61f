use anyhow::{ Context, Result };
use clap::{ Parser, Subcommand };
use std::path::{ Path, PathBuf };

use flowscribe::{ RenderConfig, RenderTier, DEFAULT_OUTPUT_DIR };

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "flowscribe",
    about = "Turns free-text requirements into Mermaid diagrams and a specification document",
    version,
    author,
    long_about = None
)]
pub struct FlowscribeCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Path to a YAML render configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    pub output_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate diagram sources, the analysis record and images
    Generate {
        /// Requirements text or path to a requirements file
        #[arg(short, long)]
        requirements: Option<String>,

        /// JSON file mapping diagram slots to custom Mermaid sources
        #[arg(short = 'd', long)]
        custom_diagrams: Option<PathBuf>,

        /// Output directory for all generated files
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// Rendering tiers to try, in order (global,project,install,remote)
        #[arg(short, long)]
        strategy: Option<String>,

        /// Skip image rendering
        #[arg(long, default_value = "false")]
        no_images: bool,

        /// Renderer theme
        #[arg(long)]
        theme: Option<String>,

        /// Renderer background color
        #[arg(long)]
        background: Option<String>,

        /// Image format (png, svg)
        #[arg(long)]
        format: Option<String>,
    },

    /// Print the categories extracted from requirements
    Analyze {
        /// Requirements text or path to a requirements file
        #[arg(short, long)]
        requirements: Option<String>,
    },

    /// Assemble the specification document from generated diagrams
    Document {
        /// Requirements text or path to a requirements file
        #[arg(short, long)]
        requirements: Option<String>,

        /// Directory holding the generated `.mmd` files
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        diagrams_dir: PathBuf,

        /// Output file for the document
        #[arg(short, long, default_value = "enhanced_fsd.md")]
        output: PathBuf,

        /// Project name used in the document title
        #[arg(short, long, default_value = "Requirements Specification")]
        project_name: String,
    },

    /// Check which image rendering strategy is available
    Check {
        /// Rendering tiers to try, in order
        #[arg(short, long)]
        strategy: Option<String>,

        /// Allow installing the renderer if it is missing
        #[arg(short, long, default_value = "false")]
        install: bool,
    },
}

/// Load the render configuration, then apply environment overrides
pub fn load_render_config(path: Option<&Path>) -> Result<RenderConfig> {
    let config = match path {
        Some(path) =>
            RenderConfig::from_file(path).with_context(||
                format!("Failed to load config from {}", path.display())
            )?,
        None => RenderConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

/// Parse `--strategy`, falling back to the default tier order
pub fn parse_strategy(value: Option<&str>) -> Result<Vec<RenderTier>> {
    match value {
        Some(v) => {
            let order = RenderTier::parse_order(v).map_err(anyhow::Error::msg)?;
            if order.is_empty() {
                anyhow::bail!("--strategy needs at least one tier");
            }
            Ok(order)
        }
        None => Ok(RenderTier::default_order()),
    }
}
