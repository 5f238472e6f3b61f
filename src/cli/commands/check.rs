use anyhow::Result;

use crate::cli::ui;
use flowscribe::{ ImagePipeline, RenderConfig, RenderStrategy, RenderTier };

/// Report which rendering strategy a run would use
pub async fn execute(render: RenderConfig, mut order: Vec<RenderTier>, allow_install: bool) -> Result<()> {
    ui::print_header("Renderer Check");

    if !allow_install {
        order.retain(|tier| *tier != RenderTier::Install);
    }

    let order_names: Vec<String> = order.iter().map(|t| t.to_string()).collect();
    ui::print_result("Tier order", &order_names.join(" -> "));
    ui::print_result("Remote endpoint", render.remote_endpoint.as_deref().unwrap_or("disabled"));

    let spinner = ui::spinner_with_message("Probing renderers...");
    let strategy = ImagePipeline::new(render, order).resolve().await;
    spinner.finish_and_clear();

    match &strategy {
        RenderStrategy::Unavailable => {
            ui::print_error("No rendering strategy available; only .mmd files will be produced");
        }
        other => ui::print_success(format!("Images will be rendered via {}", other).as_str()),
    }

    Ok(())
}
