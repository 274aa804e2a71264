//! schema-draft: an editable schema tree that can always describe itself as
//! a JSON Patch against its last committed version.
//!
//! # Overview
//!
//! A [`RootNodeStore`] owns an arena of [`SchemaNode`]s. Every node remembers
//! where it sat when the store was last committed (its *base* position) and
//! where it sits now (its *draft* position). Editing only ever touches the
//! draft side; [`RootNodeStore::get_patches`] compares both sides by node
//! identity and returns the `add` / `remove` / `replace` / `move` operations
//! that turn the base document into the draft document, and
//! [`RootNodeStore::submit_changes`] makes the draft the new base.
//!
//! ```
//! use schema_draft::{patch::to_json_patch, RootNodeStore};
//! use serde_json::json;
//!
//! let mut store = RootNodeStore::from_schema(&json!({
//!     "type": "object",
//!     "properties": {"field": {"type": "string", "default": ""}},
//!     "additionalProperties": false,
//!     "required": ["field"]
//! }))
//! .unwrap();
//! store.submit_changes();
//!
//! let root = store.root();
//! let field = store.child_by_key(root, "field").unwrap().unwrap();
//! store.set_id(field, "field2").unwrap();
//!
//! assert_eq!(
//!     to_json_patch(&store.get_patches()),
//!     json!([{"op": "move", "from": "/properties/field", "path": "/properties/field2"}])
//! );
//! ```

pub mod error;
pub mod node;
pub mod schema;
pub mod store;
pub mod patch;
pub mod diff;

pub use error::SchemaError;
pub use node::{NodeId, NodeKind, Position, ScalarKind, SchemaNode};
pub use patch::{ApplyPatchOptions, PatchError, SchemaPatch};
pub use store::{ReferenceResolver, RootNodeStore};
