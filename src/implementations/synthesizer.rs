use chrono::{ Duration, Local, NaiveDate };
use std::fmt::Write;

use crate::implementations::sanitizer::{ sanitize, title_case };
use crate::models::diagram::DiagramKind;
use crate::models::requirements::ExtractionResult;
use crate::traits::diagram_synthesizer::DiagramSynthesizer;

/// Most actions drawn in the user journey
pub const MAX_JOURNEY_STEPS: usize = 6;
/// Most branches leaving the business process decision
pub const MAX_PROCESS_BRANCHES: usize = 3;
/// Most nested levels in the decision tree
pub const MAX_TREE_LEVELS: usize = 3;
/// Decision phrases read by the decision tree, the last one labelling the default action
pub const MAX_TREE_PHRASES: usize = 4;

/// One bar of the development timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttPhase {
    pub section: &'static str,
    pub name: &'static str,
    pub start: NaiveDate,
    pub duration_days: i64,
}

/// (section, task, duration in days), in schedule order
const TIMELINE: [(&str, &str, i64); 8] = [
    ("Phase 1 - Setup", "Project Setup", 7),
    ("Phase 1 - Setup", "Authentication", 14),
    ("Phase 2 - Core Features", "File Upload", 21),
    ("Phase 2 - Core Features", "AI Processing", 28),
    ("Phase 3 - Integration", "Data Review", 14),
    ("Phase 3 - Integration", "Submission", 7),
    ("Phase 4 - Deployment", "Testing", 14),
    ("Phase 4 - Deployment", "Deployment", 7),
];

/// Mermaid generator for every built-in slot.
///
/// The timeline anchor defaults to today's local date; tests pin it with
/// [`MermaidSynthesizer::with_anchor`].
#[derive(Debug, Clone, Default)]
pub struct MermaidSynthesizer {
    anchor: Option<NaiveDate>,
}

impl MermaidSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_anchor(anchor: NaiveDate) -> Self {
        Self { anchor: Some(anchor) }
    }

    fn anchor(&self) -> NaiveDate {
        self.anchor.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl DiagramSynthesizer for MermaidSynthesizer {
    fn synthesize(&self, kind: DiagramKind, extraction: &ExtractionResult) -> String {
        match kind {
            DiagramKind::UserJourney => user_journey(extraction.user_actions()),
            DiagramKind::SystemArchitecture => system_architecture(),
            DiagramKind::BusinessProcess => business_process(extraction.decision_points()),
            DiagramKind::DataFlow => data_flow(),
            DiagramKind::DecisionTree => decision_tree(extraction.decision_points()),
            DiagramKind::GanttChart => gantt_chart(self.anchor()),
            DiagramKind::DataModel => data_model(extraction.data_entities()),
            DiagramKind::ApiFlow => api_flow(),
            DiagramKind::AuthenticationFlow => authentication_flow(),
        }
    }
}

fn node_id(index: usize) -> char {
    (b'A' + (index as u8)) as char
}

/// Linear chain of up to six title-cased actions
pub fn user_journey(actions: &[String]) -> String {
    let mut diagram = String::from("graph TD\n");

    if actions.is_empty() {
        diagram.push_str("    A[Start]\n");
        return diagram;
    }

    for (i, action) in actions.iter().take(MAX_JOURNEY_STEPS).enumerate() {
        let label = title_case(&sanitize(action));
        if i == 0 {
            let _ = writeln!(diagram, "    {}[{}]", node_id(i), label);
        } else {
            let _ = writeln!(diagram, "    {} --> {}[{}]", node_id(i - 1), node_id(i), label);
        }
    }

    diagram
}

/// One decision fanning into up to three labelled branches that share an end state
pub fn business_process(decisions: &[String]) -> String {
    const BRANCHES: [(char, &str); MAX_PROCESS_BRANCHES] = [
        ('D', "Process A"),
        ('E', "Process B"),
        ('F', "Process C"),
    ];

    let mut diagram = String::from("graph TD\n");
    diagram.push_str("    A[Business Event] --> B[Process Step 1]\n");
    diagram.push_str("    B --> C{Decision Point}\n");

    let branches: Vec<_> = decisions.iter().zip(BRANCHES.iter()).collect();
    if branches.is_empty() {
        diagram.push_str("    C --> G[End State]\n");
        return diagram;
    }

    for (decision, (id, label)) in &branches {
        let _ = writeln!(diagram, "    C -->|{}| {}[{}]", sanitize(decision), id, label);
    }
    for (i, (_, (id, _))) in branches.iter().enumerate() {
        if i == 0 {
            let _ = writeln!(diagram, "    {} --> G[End State]", id);
        } else {
            let _ = writeln!(diagram, "    {} --> G", id);
        }
    }

    diagram
}

/// Up to three nested Yes/No conditions; each branch ends on its own node
pub fn decision_tree(decisions: &[String]) -> String {
    const CONDITIONS: [char; MAX_TREE_LEVELS] = ['B', 'D', 'F'];
    const ACTIONS: [(char, &str); MAX_TREE_LEVELS] = [
        ('C', "Action A"),
        ('E', "Action B"),
        ('G', "Action C"),
    ];

    let mut diagram = String::from("graph TD\n");

    let levels = decisions.len().min(MAX_TREE_LEVELS);
    if levels == 0 {
        diagram.push_str("    A[Root Decision] --> B{Condition 1?}\n");
        return diagram;
    }

    let _ = writeln!(diagram, "    A[Root Decision] --> B{{{}?}}", sanitize(&decisions[0]));

    let default_action = decisions
        .get(MAX_TREE_PHRASES - 1)
        .map(|d| sanitize(d))
        .unwrap_or_else(|| "Default Action".to_string());

    for level in 0..levels {
        let condition = CONDITIONS[level];
        let (action_id, action_label) = ACTIONS[level];
        let _ = writeln!(diagram, "    {} -->|Yes| {}[{}]", condition, action_id, action_label);

        if level + 1 < levels {
            let _ = writeln!(
                diagram,
                "    {} -->|No| {}{{{}?}}",
                condition,
                CONDITIONS[level + 1],
                sanitize(&decisions[level + 1])
            );
        } else {
            let _ = writeln!(diagram, "    {} -->|No| H[{}]", condition, default_action);
        }
    }

    diagram
}

/// Static component view
pub fn system_architecture() -> String {
    let mut diagram = String::from("graph TD\n");
    diagram.push_str("    A[Frontend - Vue.js 3] --> B[API Gateway]\n");
    diagram.push_str("    B --> C[Authentication Service]\n");
    diagram.push_str("    B --> D[Business Logic Service]\n");
    diagram.push_str("    C --> E[Azure AD]\n");
    diagram.push_str("    D --> F[MongoDB Database]\n");
    diagram.push_str("    G[Load Balancer] --> A\n");
    diagram.push_str("    H[External APIs] --> B\n");
    diagram
}

/// Static data lifecycle
pub fn data_flow() -> String {
    let mut diagram = String::from("graph TD\n");
    diagram.push_str("    A[Data Source] --> B[Data Processing]\n");
    diagram.push_str("    B --> C[Data Validation]\n");
    diagram.push_str("    C --> D[Data Storage]\n");
    diagram.push_str("    D --> E[Data Retrieval]\n");
    diagram.push_str("    E --> F[Data Presentation]\n");
    diagram.push_str("    G[User Input] --> A\n");
    diagram.push_str("    F --> H[User Output]\n");
    diagram
}

pub fn api_flow() -> String {
    let mut diagram = String::from("graph TD\n");
    diagram.push_str("    A[Client Request] --> B[API Gateway]\n");
    diagram.push_str("    B --> C[Authentication]\n");
    diagram.push_str("    C --> D[Validation]\n");
    diagram.push_str("    D --> E[Business Logic]\n");
    diagram.push_str("    E --> F[Database]\n");
    diagram.push_str("    F --> G[Response]\n");
    diagram.push_str("    G --> H[Client]\n");
    diagram
}

pub fn authentication_flow() -> String {
    let mut diagram = String::from("sequenceDiagram\n");
    diagram.push_str("    participant U as User\n");
    diagram.push_str("    participant F as Frontend\n");
    diagram.push_str("    participant B as Backend\n");
    diagram.push_str("    participant D as Database\n");
    diagram.push_str("    U->>F: Enter Credentials\n");
    diagram.push_str("    F->>B: POST /auth/login\n");
    diagram.push_str("    B->>D: Validate User\n");
    diagram.push_str("    D-->>B: User Data\n");
    diagram.push_str("    B-->>F: JWT Token\n");
    diagram.push_str("    F-->>U: Redirect to Dashboard\n");
    diagram
}

/// Upper-case identifier for an entity phrase; non-word runs become `_`
pub fn entity_identifier(entity: &str) -> String {
    let mut ident = String::with_capacity(entity.len());
    for c in entity.trim().chars() {
        if c.is_alphanumeric() || c == '_' {
            ident.extend(c.to_uppercase());
        } else if !ident.ends_with('_') {
            ident.push('_');
        }
    }
    let ident = ident.trim_matches('_');
    if ident.is_empty() {
        "ENTITY".to_string()
    } else {
        ident.to_string()
    }
}

/// One record per entity, each with the same four fields
pub fn data_model(entities: &[String]) -> String {
    let mut diagram = String::from("erDiagram\n");

    let names: Vec<String> = if entities.is_empty() {
        vec!["ENTITY".to_string()]
    } else {
        entities.iter().map(|e| entity_identifier(e)).collect()
    };

    for name in names {
        let _ = writeln!(diagram, "    {} {{", name);
        diagram.push_str("        int id PK\n");
        diagram.push_str("        string name\n");
        diagram.push_str("        datetime created_at\n");
        diagram.push_str("        datetime updated_at\n");
        diagram.push_str("    }\n");
    }

    diagram
}

/// Schedule with every phase starting when the previous one ends.
///
/// Stops early when a start date would pass the last representable date.
pub fn gantt_phases(anchor: NaiveDate) -> Vec<GanttPhase> {
    let mut phases = Vec::with_capacity(TIMELINE.len());
    let mut start = Some(anchor);
    for &(section, name, days) in TIMELINE.iter() {
        let Some(current) = start else {
            break;
        };
        phases.push(GanttPhase {
            section,
            name,
            start: current,
            duration_days: days,
        });
        start = current.checked_add_signed(Duration::days(days));
    }
    phases
}

pub fn gantt_chart(anchor: NaiveDate) -> String {
    let mut diagram = String::from("gantt\n");
    diagram.push_str("    title Development Timeline\n");
    diagram.push_str("    dateFormat  YYYY-MM-DD\n");

    let mut current_section = "";
    for phase in gantt_phases(anchor) {
        if phase.section != current_section {
            let _ = writeln!(diagram, "    section {}", phase.section);
            current_section = phase.section;
        }
        let _ = writeln!(
            diagram,
            "    {:<16} :{}, {}d",
            phase.name,
            phase.start.format("%Y-%m-%d"),
            phase.duration_days
        );
    }

    diagram
}
