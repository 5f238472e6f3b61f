use crate::models::requirements::{ ExtractionResult, RequirementCorpus };

/// Turns raw requirements text into categorized phrases
pub trait RequirementExtractor {
    /// Extract every category from the corpus.
    ///
    /// Never fails: categories without matches are filled with their
    /// default phrases.
    fn extract(&self, corpus: &RequirementCorpus) -> ExtractionResult;
}
