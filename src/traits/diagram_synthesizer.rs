use std::collections::BTreeMap;

use crate::models::diagram::{ DiagramArtifact, DiagramKind };
use crate::models::requirements::ExtractionResult;

/// Produces Mermaid sources from extracted requirements
pub trait DiagramSynthesizer {
    /// Source text for a single built-in slot
    fn synthesize(&self, kind: DiagramKind, extraction: &ExtractionResult) -> String;

    /// All built-in slots in generation order, with caller overrides
    /// replacing synthesis slot by slot. Overrides for unknown slots are
    /// appended as additional artifacts.
    fn synthesize_all(
        &self,
        extraction: &ExtractionResult,
        overrides: &BTreeMap<String, String>
    ) -> Vec<DiagramArtifact> {
        let mut artifacts: Vec<DiagramArtifact> = DiagramKind::ALL.iter()
            .map(|kind| {
                let override_source = overrides
                    .iter()
                    .find(|(slot, _)| DiagramKind::from_slot(slot) == Some(*kind));
                match override_source {
                    Some((slot, source)) => DiagramArtifact::overridden(slot, source.clone()),
                    None => DiagramArtifact::synthesized(*kind, self.synthesize(*kind, extraction)),
                }
            })
            .collect();

        for (slot, source) in overrides {
            if DiagramKind::from_slot(slot).is_none() {
                artifacts.push(DiagramArtifact::overridden(slot, source.clone()));
            }
        }

        artifacts
    }
}
