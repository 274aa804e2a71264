//! Core patch types.

use serde_json::Value;
use thiserror::Error;

pub use schema_draft_json_pointer::Path;
use schema_draft_json_pointer::format_json_pointer;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error("NOT_FOUND")]
    NotFound,
    #[error("INVALID_TARGET")]
    InvalidTarget,
    #[error("INVALID_OP: {0}")]
    InvalidOp(String),
}

/// One schema edit.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaPatch {
    Add { path: Path, value: Value },
    Remove { path: Path },
    Replace { path: Path, value: Value },
    Move { from: Path, path: Path },
}

impl SchemaPatch {
    pub fn op_name(&self) -> &'static str {
        match self {
            SchemaPatch::Add { .. } => "add",
            SchemaPatch::Remove { .. } => "remove",
            SchemaPatch::Replace { .. } => "replace",
            SchemaPatch::Move { .. } => "move",
        }
    }

    /// Target path of the operation.
    pub fn path(&self) -> &Path {
        match self {
            SchemaPatch::Add { path, .. }
            | SchemaPatch::Remove { path }
            | SchemaPatch::Replace { path, .. }
            | SchemaPatch::Move { path, .. } => path,
        }
    }

    /// Source path of a `move`.
    pub fn from(&self) -> Option<&Path> {
        match self {
            SchemaPatch::Move { from, .. } => Some(from),
            _ => None,
        }
    }

    /// Target path formatted as a pointer string.
    pub fn pointer(&self) -> String {
        format_json_pointer(self.path())
    }
}

/// Options for [`apply_patch`](super::apply_patch).
#[derive(Debug, Clone)]
pub struct ApplyPatchOptions {
    /// Rebuild an object's `required` list from its `properties` whenever an
    /// operation adds, removes or moves a property.
    pub sync_required: bool,
}

impl Default for ApplyPatchOptions {
    fn default() -> Self {
        Self { sync_required: true }
    }
}
