use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;
use cli::commands::generate::GenerateArgs;
use cli::{ Commands, FlowscribeCli };

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let cli = FlowscribeCli::parse();
    setup_logging(&cli.log_level);

    if let Err(e) = run(cli).await {
        cli::ui::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: FlowscribeCli) -> Result<()> {
    let json_output = cli.output_format.eq_ignore_ascii_case("json");

    match &cli.command {
        Commands::Generate {
            requirements,
            custom_diagrams,
            output_dir,
            strategy,
            no_images,
            theme,
            background,
            format,
        } => {
            let render = cli::load_render_config(cli.config.as_deref())?;
            let args = GenerateArgs {
                requirements: requirements.as_deref(),
                custom_diagrams: custom_diagrams.as_deref(),
                output_dir,
                strategy: cli::parse_strategy(strategy.as_deref())?,
                render_images: !*no_images,
                theme: theme.as_deref(),
                background: background.as_deref(),
                format: format.as_deref(),
            };
            cli::commands::generate::execute(args, render, json_output).await?;
        }

        Commands::Analyze { requirements } => {
            cli::commands::analyze::execute(requirements.as_deref(), json_output)?;
        }

        Commands::Document { requirements, diagrams_dir, output, project_name } => {
            cli::commands::document::execute(
                requirements.as_deref(),
                diagrams_dir,
                output,
                project_name
            )?;
        }

        Commands::Check { strategy, install } => {
            let render = cli::load_render_config(cli.config.as_deref())?;
            let order = cli::parse_strategy(strategy.as_deref())?;
            cli::commands::check::execute(render, order, *install).await?;
        }
    }

    Ok(())
}

fn setup_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new().filter_level(level).init();

    info!("Logger initialized with level: {}", log_level);
}
