//! Replaying schema patches against a plain schema document.
//!
//! Paths are navigated as plain JSON. On top of RFC 6902 semantics the
//! applier can keep every touched object's `required` list equal to the keys
//! of its `properties`, which is how committed schemas are stored.

use serde_json::Value;

use schema_draft_json_pointer::{get_mut, is_child, PROPERTIES};

use super::types::{ApplyPatchOptions, PatchError, SchemaPatch};

fn apply_add(doc: &mut Value, path: &[String], value: Value) -> Result<(), PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        *doc = value;
        return Ok(());
    };
    match get_mut(doc, parent_path).ok_or(PatchError::NotFound)? {
        Value::Object(map) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_remove(doc: &mut Value, path: &[String]) -> Result<Value, PatchError> {
    let (key, parent_path) = path.split_last().ok_or(PatchError::InvalidTarget)?;
    match get_mut(doc, parent_path).ok_or(PatchError::NotFound)? {
        Value::Object(map) => map.remove(key).ok_or(PatchError::NotFound),
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_replace(doc: &mut Value, path: &[String], value: Value) -> Result<(), PatchError> {
    let target = get_mut(doc, path).ok_or(PatchError::NotFound)?;
    *target = value;
    Ok(())
}

fn apply_move(doc: &mut Value, path: &[String], from: &[String]) -> Result<(), PatchError> {
    if is_child(from, path) {
        return Err(PatchError::InvalidTarget);
    }
    if path == from {
        return Ok(());
    }
    let value = apply_remove(doc, from)?;
    apply_add(doc, path, value)
}

/// If `path` addresses a property, rebuilds the owning object's `required`.
fn sync_required(doc: &mut Value, path: &[String]) {
    let len = path.len();
    if len < 2 || path[len - 2] != PROPERTIES {
        return;
    }
    let Some(Value::Object(owner)) = get_mut(doc, &path[..len - 2]) else {
        return;
    };
    let Some(Value::Object(properties)) = owner.get(PROPERTIES) else {
        return;
    };
    let required: Vec<Value> = properties.keys().cloned().map(Value::String).collect();
    owner.insert("required".into(), Value::Array(required));
}

/// Applies one operation in place.
pub fn apply_op(
    doc: &mut Value,
    op: &SchemaPatch,
    options: &ApplyPatchOptions,
) -> Result<(), PatchError> {
    match op {
        SchemaPatch::Add { path, value } => apply_add(doc, path, value.clone())?,
        SchemaPatch::Remove { path } => {
            apply_remove(doc, path)?;
        }
        SchemaPatch::Replace { path, value } => apply_replace(doc, path, value.clone())?,
        SchemaPatch::Move { from, path } => {
            apply_move(doc, path, from)?;
            if options.sync_required {
                sync_required(doc, from);
            }
        }
    }
    if options.sync_required && !matches!(op, SchemaPatch::Replace { .. }) {
        sync_required(doc, op.path());
    }
    Ok(())
}

/// Applies a whole patch list in order, returning the resulting document.
/// Stops at the first failing operation.
pub fn apply_patch(
    doc: Value,
    ops: &[SchemaPatch],
    options: &ApplyPatchOptions,
) -> Result<Value, PatchError> {
    let mut working = doc;
    for op in ops {
        apply_op(&mut working, op, options)?;
    }
    Ok(working)
}
