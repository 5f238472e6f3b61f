use std::fmt;
use std::path::{ Path, PathBuf };

use serde::ser::SerializeMap;
use serde::{ Serialize, Serializer };

/// Requirements used when no source is given or the source cannot be read
pub const DEFAULT_REQUIREMENTS: &str = "
User can login to the system
User can browse available options
User can select items
User can submit requests
System should validate user input
System should process requests
System should store data
";

/// Where the requirements text comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequirementsSource {
    Text(String),
    File(PathBuf),
    #[default]
    Default,
}

impl RequirementsSource {
    /// Interpret a command line value: an existing path is read as a file,
    /// anything else is taken as literal requirements text.
    pub fn from_arg(value: Option<&str>) -> Self {
        match value {
            None => RequirementsSource::Default,
            Some(v) if Path::new(v).is_file() => RequirementsSource::File(PathBuf::from(v)),
            Some(v) => RequirementsSource::Text(v.to_string()),
        }
    }
}

/// Raw requirements text for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementCorpus {
    text: String,
}

impl RequirementCorpus {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Fixed extraction categories, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    UserActions,
    DecisionPoints,
    ValidationRules,
    SystemInteractions,
    DataEntities,
    BusinessProcesses,
    Integrations,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::UserActions,
        Category::DecisionPoints,
        Category::ValidationRules,
        Category::SystemInteractions,
        Category::DataEntities,
        Category::BusinessProcesses,
        Category::Integrations,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::UserActions => "user_actions",
            Category::DecisionPoints => "decision_points",
            Category::ValidationRules => "validation_rules",
            Category::SystemInteractions => "system_interactions",
            Category::DataEntities => "data_entities",
            Category::BusinessProcesses => "business_processes",
            Category::Integrations => "integrations",
        }
    }

    /// Substituted when the category has no matches. Never empty.
    pub fn defaults(&self) -> &'static [&'static str] {
        match self {
            Category::UserActions => &["login", "browse", "select", "submit"],
            Category::DecisionPoints => &["valid input", "user authenticated", "data available"],
            Category::ValidationRules => &["input validation", "authentication check"],
            Category::SystemInteractions => &["process request", "store data", "send notification"],
            Category::DataEntities => &["user", "session", "data"],
            Category::BusinessProcesses => &["data processing", "user management"],
            Category::Integrations => &["external API", "database"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Categorized phrases pulled out of a corpus.
///
/// Every category holds at least one phrase; construction goes through
/// [`ExtractionResult::from_matches`], which fills empty categories with
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    categories: Vec<(Category, Vec<String>)>,
}

impl ExtractionResult {
    pub fn from_matches<F>(mut matches_for: F) -> Self where F: FnMut(Category) -> Vec<String> {
        let categories = Category::ALL
            .iter()
            .map(|category| {
                let found = matches_for(*category);
                let phrases = if found.is_empty() {
                    category
                        .defaults()
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                } else {
                    found
                };
                (*category, phrases)
            })
            .collect();

        Self { categories }
    }

    pub fn get(&self, category: Category) -> &[String] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, phrases)| phrases.as_slice())
            .unwrap_or(&[])
    }

    pub fn user_actions(&self) -> &[String] {
        self.get(Category::UserActions)
    }

    pub fn decision_points(&self) -> &[String] {
        self.get(Category::DecisionPoints)
    }

    pub fn validation_rules(&self) -> &[String] {
        self.get(Category::ValidationRules)
    }

    pub fn system_interactions(&self) -> &[String] {
        self.get(Category::SystemInteractions)
    }

    pub fn data_entities(&self) -> &[String] {
        self.get(Category::DataEntities)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.categories.iter().map(|(c, phrases)| (*c, phrases.as_slice()))
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (category, phrases) in &self.categories {
            map.serialize_entry(category.key(), phrases)?;
        }
        map.end()
    }
}
