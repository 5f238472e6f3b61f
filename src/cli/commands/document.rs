use anyhow::{ Context, Result };
use std::path::Path;

use crate::cli::ui;
use flowscribe::implementations::document;
use flowscribe::{ load_corpus, DiagramKind, RequirementsSource };

/// Specification document command
pub fn execute(
    requirements: Option<&str>,
    diagrams_dir: &Path,
    output: &Path,
    project_name: &str
) -> Result<()> {
    ui::print_header("Assembling Specification Document");

    let corpus = load_corpus(&RequirementsSource::from_arg(requirements));
    let embedded = document::write_document(project_name, corpus.text(), diagrams_dir, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if embedded < DiagramKind::ALL.len() {
        ui::print_warning(
            format!(
                "{} diagram(s) missing from {}, placeholders used",
                DiagramKind::ALL.len() - embedded,
                diagrams_dir.display()
            ).as_str()
        );
    }
    ui::print_success(format!("Document saved to {}", output.display()).as_str());

    Ok(())
}
