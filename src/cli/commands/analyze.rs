use anyhow::Result;

use crate::cli::ui;
use flowscribe::{ load_corpus, PatternExtractor, RequirementExtractor, RequirementsSource };

/// Print what the extractor finds without writing anything
pub fn execute(requirements: Option<&str>, json_output: bool) -> Result<()> {
    let corpus = load_corpus(&RequirementsSource::from_arg(requirements));
    let extraction = PatternExtractor::new().extract(&corpus);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&extraction)?);
        return Ok(());
    }

    ui::print_header("Requirements Analysis");
    ui::print_text(corpus.text().trim());
    println!();
    ui::print_extraction(&extraction);

    Ok(())
}
