use std::fmt;

use serde::Serialize;

/// Built-in diagram slots, in generation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    UserJourney,
    SystemArchitecture,
    BusinessProcess,
    DataFlow,
    DecisionTree,
    GanttChart,
    DataModel,
    ApiFlow,
    AuthenticationFlow,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 9] = [
        DiagramKind::UserJourney,
        DiagramKind::SystemArchitecture,
        DiagramKind::BusinessProcess,
        DiagramKind::DataFlow,
        DiagramKind::DecisionTree,
        DiagramKind::GanttChart,
        DiagramKind::DataModel,
        DiagramKind::ApiFlow,
        DiagramKind::AuthenticationFlow,
    ];

    /// File base name of the slot
    pub fn slot(&self) -> &'static str {
        match self {
            DiagramKind::UserJourney => "user_journey",
            DiagramKind::SystemArchitecture => "system_architecture",
            DiagramKind::BusinessProcess => "business_process",
            DiagramKind::DataFlow => "data_flow",
            DiagramKind::DecisionTree => "decision_tree",
            DiagramKind::GanttChart => "gantt_chart",
            DiagramKind::DataModel => "data_model",
            DiagramKind::ApiFlow => "api_flow",
            DiagramKind::AuthenticationFlow => "authentication_flow",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DiagramKind::UserJourney => "User Journey",
            DiagramKind::SystemArchitecture => "System Architecture",
            DiagramKind::BusinessProcess => "Business Process",
            DiagramKind::DataFlow => "Data Flow",
            DiagramKind::DecisionTree => "Decision Tree",
            DiagramKind::GanttChart => "Development Timeline",
            DiagramKind::DataModel => "Data Model",
            DiagramKind::ApiFlow => "API Flow",
            DiagramKind::AuthenticationFlow => "Authentication Flow",
        }
    }

    /// Resolve a slot name, tolerating a trailing `.mmd`
    pub fn from_slot(name: &str) -> Option<DiagramKind> {
        let stem = name.strip_suffix(".mmd").unwrap_or(name);
        DiagramKind::ALL.iter().copied().find(|kind| kind.slot() == stem)
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slot())
    }
}

/// How an artifact's source text was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactOrigin {
    Synthesized,
    Override,
}

/// One named Mermaid source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramArtifact {
    /// File base name; a built-in slot or a caller-defined one
    pub name: String,
    /// `None` for caller-defined slots
    pub kind: Option<DiagramKind>,
    pub source: String,
    pub origin: ArtifactOrigin,
}

impl DiagramArtifact {
    pub fn synthesized(kind: DiagramKind, source: String) -> Self {
        Self {
            name: kind.slot().to_string(),
            kind: Some(kind),
            source,
            origin: ArtifactOrigin::Synthesized,
        }
    }

    pub fn overridden(name: &str, source: String) -> Self {
        let kind = DiagramKind::from_slot(name);
        let name = name.strip_suffix(".mmd").unwrap_or(name).to_string();
        Self {
            name,
            kind,
            source,
            origin: ArtifactOrigin::Override,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.mmd", self.name)
    }
}
