//! The fixed set of diagram types the pipeline knows how to ask for
//!
//! Both the HTTP and CLI surfaces read from [`DiagramType::ALL`]; there is no
//! other copy of this list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DiagramError;

/// Supported Mermaid diagram types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DiagramType {
    Flowchart,
    Sequence,
    Class,
    State,
    EntityRelationship,
    Gantt,
    Pie,
    Quadrant,
    Requirement,
    Timeline,
    GitGraph,
    Mindmap,
}

impl DiagramType {
    /// Every supported type, in the order surfaces present them
    pub const ALL: [DiagramType; 12] = [
        DiagramType::Flowchart,
        DiagramType::Sequence,
        DiagramType::Class,
        DiagramType::State,
        DiagramType::EntityRelationship,
        DiagramType::Gantt,
        DiagramType::Pie,
        DiagramType::Quadrant,
        DiagramType::Requirement,
        DiagramType::Timeline,
        DiagramType::GitGraph,
        DiagramType::Mindmap,
    ];

    /// Stable identifier used on the wire and in output file names
    pub fn id(&self) -> &'static str {
        match self {
            DiagramType::Flowchart => "flowchart-diagram",
            DiagramType::Sequence => "sequence-diagram",
            DiagramType::Class => "class-diagram",
            DiagramType::State => "state-diagram",
            DiagramType::EntityRelationship => "entity-relationship-diagram",
            DiagramType::Gantt => "gantt-chart",
            DiagramType::Pie => "pie-chart",
            DiagramType::Quadrant => "quadrant-chart",
            DiagramType::Requirement => "requirement-diagram",
            DiagramType::Timeline => "timeline",
            DiagramType::GitGraph => "git-graph",
            DiagramType::Mindmap => "mindmap",
        }
    }

    /// Mermaid keyword that opens a diagram of this type
    pub fn header(&self) -> &'static str {
        match self {
            DiagramType::Flowchart => "flowchart",
            DiagramType::Sequence => "sequenceDiagram",
            DiagramType::Class => "classDiagram",
            DiagramType::State => "stateDiagram-v2",
            DiagramType::EntityRelationship => "erDiagram",
            DiagramType::Gantt => "gantt",
            DiagramType::Pie => "pie",
            DiagramType::Quadrant => "quadrantChart",
            DiagramType::Requirement => "requirementDiagram",
            DiagramType::Timeline => "timeline",
            DiagramType::GitGraph => "gitGraph",
            DiagramType::Mindmap => "mindmap",
        }
    }

    /// Human-readable name for menus
    pub fn label(&self) -> &'static str {
        match self {
            DiagramType::Flowchart => "Flowchart",
            DiagramType::Sequence => "Sequence diagram",
            DiagramType::Class => "Class diagram",
            DiagramType::State => "State diagram",
            DiagramType::EntityRelationship => "Entity relationship diagram",
            DiagramType::Gantt => "Gantt chart",
            DiagramType::Pie => "Pie chart",
            DiagramType::Quadrant => "Quadrant chart",
            DiagramType::Requirement => "Requirement diagram",
            DiagramType::Timeline => "Timeline",
            DiagramType::GitGraph => "Git graph",
            DiagramType::Mindmap => "Mind map",
        }
    }

    /// Identifiers of all supported types, in order
    pub fn ids() -> Vec<&'static str> {
        Self::ALL.iter().map(DiagramType::id).collect()
    }

    /// Look up a type from its 1-based menu position
    pub fn from_menu_index(index: usize) -> Option<Self> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Whether `markup` opens with this type's keyword
    ///
    /// Skips blank lines, `%%` comments and a `---` front-matter block.
    /// `graph` is accepted as the legacy flowchart keyword.
    pub fn matches_header(&self, markup: &str) -> bool {
        let mut in_front_matter = false;
        for line in markup.lines().map(str::trim) {
            if line == "---" {
                in_front_matter = !in_front_matter;
                continue;
            }
            if in_front_matter || line.is_empty() || line.starts_with("%%") {
                continue;
            }
            let keyword = line.split_whitespace().next().unwrap_or_default();
            return match self {
                DiagramType::Flowchart => keyword == "flowchart" || keyword == "graph",
                DiagramType::State => keyword.starts_with("stateDiagram"),
                _ => keyword == self.header(),
            };
        }
        false
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for DiagramType {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.id() == wanted)
            .ok_or_else(|| DiagramError::invalid_type(wanted))
    }
}

impl TryFrom<String> for DiagramType {
    type Error = DiagramError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiagramType> for String {
    fn from(value: DiagramType) -> Self {
        value.id().to_string()
    }
}
