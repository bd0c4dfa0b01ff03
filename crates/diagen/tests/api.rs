//! Integration tests for the public API

use diagen::prelude::*;
use diagen::{preview, supported_type_ids};
use proptest::prelude::*;

#[test]
fn test_supported_types_fixed_order() {
    assert_eq!(
        supported_type_ids(),
        vec![
            "flowchart-diagram",
            "sequence-diagram",
            "class-diagram",
            "state-diagram",
            "entity-relationship-diagram",
            "gantt-chart",
            "pie-chart",
            "quadrant-chart",
            "requirement-diagram",
            "timeline",
            "git-graph",
            "mindmap",
        ]
    );
}

#[test]
fn test_every_id_parses_back() {
    for diagram_type in DiagramType::ALL {
        assert_eq!(diagram_type.id().parse::<DiagramType>().unwrap(), diagram_type);
    }
}

#[test]
fn test_request_deserializes_from_wire_shape() {
    let request: DiagramRequest =
        serde_json::from_str(r#"{"prompt": "shop checkout", "diagram_type": "flowchart-diagram"}"#)
            .unwrap();
    let validated = request.validate().unwrap();
    assert_eq!(validated.diagram_type, DiagramType::Flowchart);
    assert_eq!(validated.prompt, "shop checkout");
}

#[test]
fn test_request_rejects_unknown_type() {
    let request = DiagramRequest::new("bogus-type", "anything");
    assert_eq!(request.validate().unwrap_err().kind(), ErrorKind::InvalidType);
}

proptest! {
    #[test]
    fn prop_preview_is_fenced_markup(markup in "\\PC*") {
        let wrapped = preview(&markup);
        prop_assert_eq!(wrapped, format!("```mermaid\n{}\n```", markup));
    }

    #[test]
    fn prop_unknown_ids_rejected(id in "[a-z\\-]{1,30}") {
        prop_assume!(!supported_type_ids().contains(&id.as_str()));
        let is_invalid_type = matches!(
            id.parse::<DiagramType>(),
            Err(DiagramError::InvalidType { .. })
        );
        prop_assert!(is_invalid_type);
    }
}
