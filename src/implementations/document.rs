//! Markdown specification document with the generated diagrams embedded

use chrono::Local;
use log::{ debug, info };
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

use crate::errors::FlowscribeResult;
use crate::models::diagram::DiagramKind;

/// Characters of the requirements quoted in the executive summary
pub const SUMMARY_CHARS: usize = 500;

/// Shown when a slot has no persisted source
fn fallback_diagram(kind: DiagramKind) -> &'static str {
    match kind {
        DiagramKind::UserJourney =>
            "graph TD\n    A[User Login] --> B[Dashboard]\n    B --> C[Upload File]\n    C --> D[Review Data]\n    D --> E[Submit]\n",
        DiagramKind::DataModel =>
            "erDiagram\n    USER ||--o{ RECORD : creates\n    RECORD ||--o{ ENTRY : contains\n",
        DiagramKind::AuthenticationFlow | DiagramKind::ApiFlow =>
            "sequenceDiagram\n    participant U as User\n    participant S as System\n    U->>S: Action\n    S-->>U: Response\n",
        _ => "flowchart TD\n    A[Start] --> B{Valid?}\n    B -->|Yes| C[Continue]\n    B -->|No| D[Show Error]\n",
    }
}

/// Read `<slot>.mmd` for every built-in slot present in `directory`
pub fn read_diagrams(directory: &Path) -> BTreeMap<&'static str, String> {
    let mut diagrams = BTreeMap::new();
    for kind in DiagramKind::ALL {
        let path = directory.join(format!("{}.mmd", kind.slot()));
        match std::fs::read_to_string(&path) {
            Ok(source) if !source.trim().is_empty() => {
                diagrams.insert(kind.slot(), source);
            }
            Ok(_) => debug!("Skipping empty diagram {}", path.display()),
            Err(e) => debug!("Diagram {} not available: {}", path.display(), e),
        }
    }
    diagrams
}

fn executive_summary(requirements: &str) -> String {
    let trimmed = requirements.trim();
    if trimmed.chars().count() > SUMMARY_CHARS {
        let head: String = trimmed.chars().take(SUMMARY_CHARS).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    }
}

/// Assemble the document text
pub fn assemble(project_name: &str, requirements: &str, diagrams: &BTreeMap<&'static str, String>) -> String {
    let mut doc = String::new();
    let _ = writeln!(doc, "# FUNCTIONAL SPECIFICATION DOCUMENT (FSD)");
    let _ = writeln!(doc, "## {}\n", project_name);
    doc.push_str("---\n\n");
    doc.push_str("## 1. PROJECT OVERVIEW\n\n");
    doc.push_str("### 1.1 Project Information\n");
    let _ = writeln!(doc, "- **Project Name**: {}", project_name);
    doc.push_str("- **Version**: 1.0\n");
    let _ = writeln!(doc, "- **Date**: {}\n", Local::now().format("%Y-%m-%d"));
    doc.push_str("### 1.2 Executive Summary\n");
    let _ = writeln!(doc, "{}\n", executive_summary(requirements));
    doc.push_str("---\n\n");
    doc.push_str("## 2. DIAGRAMS\n");

    for (index, kind) in DiagramKind::ALL.iter().enumerate() {
        let source = diagrams
            .get(kind.slot())
            .map(String::as_str)
            .unwrap_or_else(|| fallback_diagram(*kind));
        let _ = writeln!(doc, "\n### 2.{} {}", index + 1, kind.title());
        doc.push_str("```mermaid\n");
        doc.push_str(source.trim_end());
        doc.push_str("\n```\n");
    }

    doc
}

/// Read the diagrams from `diagrams_dir` and write the document to `output`
pub fn write_document(
    project_name: &str,
    requirements: &str,
    diagrams_dir: &Path,
    output: &Path
) -> FlowscribeResult<usize> {
    let diagrams = read_diagrams(diagrams_dir);
    info!("Embedding {} of {} diagrams from {}", diagrams.len(), DiagramKind::ALL.len(), diagrams_dir.display());

    let document = assemble(project_name, requirements, &diagrams);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, &document)?;

    info!("Specification document written to {}", output.display());
    Ok(diagrams.len())
}
