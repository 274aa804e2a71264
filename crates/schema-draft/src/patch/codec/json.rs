//! JSON codec: patches to and from RFC 6902 JSON values.

use serde_json::{json, Value};

use schema_draft_json_pointer::{
    format_json_pointer, parse_json_pointer, validate_json_pointer, validate_path,
};

use crate::patch::types::{PatchError, SchemaPatch};

fn encode_path(path: &[String]) -> Value {
    Value::String(format_json_pointer(path))
}

fn decode_path(v: &Value) -> Result<Vec<String>, PatchError> {
    let s = v
        .as_str()
        .ok_or_else(|| PatchError::InvalidOp("path must be a string".into()))?;
    validate_json_pointer(s).map_err(|e| PatchError::InvalidOp(format!("{s:?}: {e}")))?;
    let path = parse_json_pointer(s);
    validate_path(&path).map_err(|e| PatchError::InvalidOp(format!("{s:?}: {e}")))?;
    Ok(path)
}

/// Serializes one patch as `{"op", "path", ...}`.
pub fn to_json(op: &SchemaPatch) -> Value {
    match op {
        SchemaPatch::Add { path, value } => json!({
            "op": "add",
            "path": encode_path(path),
            "value": value
        }),
        SchemaPatch::Remove { path } => json!({
            "op": "remove",
            "path": encode_path(path)
        }),
        SchemaPatch::Replace { path, value } => json!({
            "op": "replace",
            "path": encode_path(path),
            "value": value
        }),
        SchemaPatch::Move { from, path } => json!({
            "op": "move",
            "from": encode_path(from),
            "path": encode_path(path)
        }),
    }
}

/// Parses one RFC 6902 operation. Only the operations the engine emits are
/// accepted.
pub fn from_json(v: &Value) -> Result<SchemaPatch, PatchError> {
    let obj = v
        .as_object()
        .ok_or_else(|| PatchError::InvalidOp("operation must be an object".into()))?;
    let op = obj
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| PatchError::InvalidOp("missing 'op' field".into()))?;
    let path = decode_path(
        obj.get("path")
            .ok_or_else(|| PatchError::InvalidOp("missing 'path' field".into()))?,
    )?;
    let value = || {
        obj.get("value")
            .cloned()
            .ok_or_else(|| PatchError::InvalidOp(format!("{op} requires 'value'")))
    };

    match op {
        "add" => Ok(SchemaPatch::Add { path, value: value()? }),
        "remove" => Ok(SchemaPatch::Remove { path }),
        "replace" => Ok(SchemaPatch::Replace { path, value: value()? }),
        "move" => {
            let from = decode_path(
                obj.get("from")
                    .ok_or_else(|| PatchError::InvalidOp("move requires 'from'".into()))?,
            )?;
            Ok(SchemaPatch::Move { from, path })
        }
        other => Err(PatchError::InvalidOp(format!("unsupported op: {other}"))),
    }
}

/// Serializes a patch list as a JSON array.
pub fn to_json_patch(ops: &[SchemaPatch]) -> Value {
    Value::Array(ops.iter().map(to_json).collect())
}

/// Parses a JSON array of operations.
pub fn from_json_patch(v: &Value) -> Result<Vec<SchemaPatch>, PatchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| PatchError::InvalidOp("patch must be an array".into()))?;
    arr.iter().map(from_json).collect()
}
