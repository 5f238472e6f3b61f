use log::{ debug, info };
use regex::Regex;

use crate::models::requirements::{ Category, ExtractionResult, RequirementCorpus };
use crate::traits::requirement_extractor::RequirementExtractor;

/// Case-insensitive pattern for a category; group 1 is the captured phrase
fn category_pattern(category: Category) -> &'static str {
    match category {
        Category::UserActions => r"(?i)user\s+(?:can\s+)?(?:should\s+)?(?:must\s+)?(\w+)",
        Category::DecisionPoints => r"(?i)(?:if|when|whether)\s+([^,.\n]+)",
        Category::ValidationRules => r"(?i)(?:validate|check|ensure)\s+([^,.]+)",
        Category::SystemInteractions =>
            r"(?i)(?:system|application|app)\s+(?:should|must|can)\s+([^,.]+)",
        Category::DataEntities => r"(?i)(?:create|store|save|update|delete)\s+([^,.]+)",
        Category::BusinessProcesses => r"(?i)(?:process|workflow|step)\s+([^,.]+)",
        Category::Integrations => r"(?i)(?:integrate|connect|api|service)\s+([^,.]+)",
    }
}

/// Regex-driven extractor.
///
/// Keeps every non-overlapping match in order of appearance. There is no
/// dedup and no relevance filtering, so noisy phrases pass straight through.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    patterns: Vec<(Category, Regex)>,
}

impl PatternExtractor {
    pub fn new() -> Self {
        let patterns = Category::ALL.iter()
            .map(|category| {
                let regex = Regex::new(category_pattern(*category)).expect(
                    "Failed to compile extraction pattern"
                );
                (*category, regex)
            })
            .collect();

        Self { patterns }
    }

    /// Raw matches for one category, before defaults are applied
    pub fn matches(&self, category: Category, text: &str) -> Vec<String> {
        let Some((_, regex)) = self.patterns.iter().find(|(c, _)| *c == category) else {
            return Vec::new();
        };

        regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|phrase| !phrase.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementExtractor for PatternExtractor {
    fn extract(&self, corpus: &RequirementCorpus) -> ExtractionResult {
        info!("Analyzing {} characters of requirements", corpus.text().len());

        let result = ExtractionResult::from_matches(|category| {
            let found = self.matches(category, corpus.text());
            if found.is_empty() {
                debug!("No matches for {}, using defaults", category);
            } else {
                debug!("{}: {} matches {:?}", category, found.len(), found);
            }
            found
        });

        for (category, phrases) in result.iter() {
            info!("  {}: {} phrases", category, phrases.len());
        }

        result
    }
}
