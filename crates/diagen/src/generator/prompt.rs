//! Instruction templates for the text model
//!
//! Each diagram type gets a system instruction naming the Mermaid dialect, the
//! keyword the answer must start with, and a few syntax reminders.

use crate::core::DiagramType;

/// Syntax hints appended to the instruction for a given type
fn syntax_hints(diagram_type: DiagramType) -> &'static str {
    match diagram_type {
        DiagramType::Flowchart => {
            "Declare a direction (TD or LR). Use A[Label] for steps, B{Label} for decisions and -->|text| for labelled edges."
        }
        DiagramType::Sequence => {
            "Declare participants first. Use ->> for calls and -->> for replies; alt/loop blocks must be closed with end."
        }
        DiagramType::Class => {
            "Use class Name { +field type; +method() ReturnType } and relations such as <|--, *--, o-- and -->."
        }
        DiagramType::State => "Use [*] for start and end states and State1 --> State2 : event for transitions.",
        DiagramType::EntityRelationship => {
            "Use ENTITY { type name PK } blocks and cardinalities such as ||--o{ with a quoted relationship label."
        }
        DiagramType::Gantt => {
            "Include title and dateFormat YYYY-MM-DD, group tasks with section, and give each task an id and duration."
        }
        DiagramType::Pie => "Optionally add title, then one \"Label\" : value line per slice.",
        DiagramType::Quadrant => {
            "Define title, x-axis, y-axis and quadrant-1..quadrant-4, then Point: [x, y] with coordinates between 0 and 1."
        }
        DiagramType::Requirement => {
            "Declare requirement and element blocks, then relationships like element - satisfies -> requirement."
        }
        DiagramType::Timeline => "Add a title, then period : event lines; group with section when useful.",
        DiagramType::GitGraph => "Use commit, branch, checkout and merge commands in chronological order.",
        DiagramType::Mindmap => "Put the root on the first line and express hierarchy with indentation only.",
    }
}

/// System instruction for generating a diagram of `diagram_type`
pub fn system_instruction(diagram_type: DiagramType) -> String {
    format!(
        "You are an expert at writing Mermaid.js diagrams.\n\
         Produce a {label} in valid Mermaid syntax that captures the user's description.\n\
         The first line of your answer must start with `{header}`.\n\
         {hints}\n\
         Reply with the Mermaid markup only: no explanations and no surrounding prose.",
        label = diagram_type.label().to_lowercase(),
        header = diagram_type.header(),
        hints = syntax_hints(diagram_type),
    )
}

/// User message carrying the caller's description
pub fn user_message(prompt: &str) -> String {
    format!("Create a diagram for the following description:\n\n{}", prompt.trim())
}
