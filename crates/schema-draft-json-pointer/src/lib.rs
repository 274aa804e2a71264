//! JSON Pointer (RFC 6901) utilities for schema documents.
//!
//! Schema documents address their nodes through two kinds of edges:
//! an object property lives under `/properties/<key>` and an array's
//! element schema lives under `/items`. [`SchemaStep`] models those edges
//! and [`push_step`] appends one of them to a plain [`Path`] that can be
//! formatted as a pointer string.
//!
//! # Example
//!
//! ```
//! use schema_draft_json_pointer::{format_json_pointer, push_step, Path, SchemaStep};
//!
//! let mut path = Path::new();
//! push_step(&mut path, &SchemaStep::Property("tags".to_string()));
//! push_step(&mut path, &SchemaStep::Items);
//! assert_eq!(format_json_pointer(&path), "/properties/tags/items");
//! ```

use serde_json::Value;
use thiserror::Error;

pub mod schema;
pub use schema::{push_step, SchemaStep, ITEMS, PROPERTIES};

pub mod validate;
pub use validate::{validate_json_pointer, validate_path};

/// One unescaped reference token.
pub type PathStep = String;

/// A parsed pointer: the list of unescaped reference tokens, root first.
pub type Path = Vec<PathStep>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPointerError {
    #[error("POINTER_INVALID")]
    PointerInvalid,
    #[error("POINTER_TOO_LONG")]
    PointerTooLong,
    #[error("PATH_TOO_LONG")]
    PathTooLong,
}

/// Unescapes one reference token: `~1` becomes `/`, then `~0` becomes `~`.
///
/// ```
/// use schema_draft_json_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~1b"), "a/b");
/// assert_eq!(unescape_component("~01"), "~1");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes one reference token: `~` becomes `~0`, then `/` becomes `~1`.
///
/// ```
/// use schema_draft_json_pointer::escape_component;
///
/// assert_eq!(escape_component("created/at"), "created~1at");
/// assert_eq!(escape_component("plain"), "plain");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Splits a pointer string into unescaped tokens. The empty pointer is the root.
pub fn parse_json_pointer(pointer: &str) -> Path {
    if pointer.is_empty() {
        return Vec::new();
    }
    pointer[1..].split('/').map(unescape_component).collect()
}

/// Formats tokens as a pointer string; the root formats as `""`.
pub fn format_json_pointer(path: &[String]) -> String {
    let mut out = String::with_capacity(path.iter().map(|s| s.len() + 1).sum());
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// True when `child` lies strictly below `parent`.
pub fn is_child(parent: &[String], child: &[String]) -> bool {
    parent.len() < child.len() && child[..parent.len()] == *parent
}

/// Looks up the value at `path` for in-place editing. Array steps must be
/// decimal indices.
pub fn get_mut<'a>(doc: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let mut current = doc;
    for step in path {
        current = match current {
            Value::Object(map) => map.get_mut(step)?,
            Value::Array(arr) => arr.get_mut(step.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(steps: &[&str]) -> Path {
        steps.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn escape_and_unescape_are_inverse() {
        for key in ["a", "a/b", "a~b", "~1", "/~", ""] {
            assert_eq!(unescape_component(&escape_component(key)), key);
        }
    }

    #[test]
    fn parse_pointer() {
        assert_eq!(parse_json_pointer(""), Path::new());
        assert_eq!(parse_json_pointer("/"), path(&[""]));
        assert_eq!(
            parse_json_pointer("/properties/a~1b/items"),
            path(&["properties", "a/b", "items"])
        );
    }

    #[test]
    fn format_pointer() {
        assert_eq!(format_json_pointer(&[]), "");
        assert_eq!(
            format_json_pointer(&path(&["properties", "x~y"])),
            "/properties/x~0y"
        );
    }

    #[test]
    fn child_relationship() {
        let p = path(&["properties", "a"]);
        assert!(is_child(&p, &path(&["properties", "a", "items"])));
        assert!(!is_child(&p, &p));
        assert!(!is_child(&p, &path(&["properties", "b", "items"])));
    }

    #[test]
    fn get_mut_allows_in_place_edit() {
        let mut doc = json!({"properties": {"a": {"default": 1}}});
        *get_mut(&mut doc, &path(&["properties", "a", "default"])).unwrap() = json!(2);
        assert_eq!(doc, json!({"properties": {"a": {"default": 2}}}));
    }

    #[test]
    fn get_mut_walks_arrays_by_index() {
        let mut doc = json!({"list": [{"type": "string"}]});
        assert!(get_mut(&mut doc, &path(&["list", "0", "type"])).is_some());
        assert!(get_mut(&mut doc, &path(&["list", "x"])).is_none());
        assert!(get_mut(&mut doc, &path(&["missing"])).is_none());
    }
}
