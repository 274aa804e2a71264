//! Schema patches (the RFC 6902 subset the diff engine emits).
//!
//! # Operations
//!
//! `add`, `remove`, `replace` and `move`, each addressed by an RFC 6901
//! pointer into a plain schema document.

pub mod types;
pub mod apply;
pub mod codec;

pub use types::{ApplyPatchOptions, PatchError, SchemaPatch};
pub use apply::{apply_op, apply_patch};
pub use codec::json::{from_json, from_json_patch, to_json, to_json_patch};
