use schema_draft_json_pointer::{
    format_json_pointer, get_mut, is_child, parse_json_pointer, push_step, validate_json_pointer,
    Path, SchemaStep,
};
use serde_json::json;

fn path_of(steps: &[SchemaStep]) -> Path {
    let mut path = Path::new();
    for step in steps {
        push_step(&mut path, step);
    }
    path
}

#[test]
fn pointer_parse_format_roundtrip_matrix() {
    let cases = [
        "",
        "/properties/field",
        "/properties/list/items",
        "/properties/a~0b/properties/c~1d",
        "/properties/",
        "/items/items",
    ];

    for pointer in cases {
        assert_eq!(format_json_pointer(&parse_json_pointer(pointer)), pointer);
        assert!(validate_json_pointer(pointer).is_ok());
    }
}

#[test]
fn schema_steps_resolve_against_document() {
    let mut doc = json!({
        "type": "object",
        "properties": {
            "user/name": {"type": "string", "default": ""},
            "tags": {"type": "array", "items": {"type": "string", "default": ""}}
        }
    });

    let name = path_of(&[SchemaStep::Property("user/name".to_string())]);
    assert_eq!(format_json_pointer(&name), "/properties/user~1name");
    assert_eq!(
        get_mut(&mut doc, &name).cloned(),
        Some(json!({"type": "string", "default": ""}))
    );

    let tag = path_of(&[SchemaStep::Property("tags".to_string()), SchemaStep::Items]);
    assert_eq!(
        doc.pointer(&format_json_pointer(&tag)),
        Some(&json!({"type": "string", "default": ""}))
    );

    let tags = path_of(&[SchemaStep::Property("tags".to_string())]);
    assert!(is_child(&tags, &tag));
}
