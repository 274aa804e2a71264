//! Schema-shaped pointer steps.

use crate::Path;

/// Object member holding the property schemas.
pub const PROPERTIES: &str = "properties";

/// Object member holding an array's element schema.
pub const ITEMS: &str = "items";

/// One edge from a composite schema node to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaStep {
    /// `/properties/<key>` of an object schema.
    Property(String),
    /// `/items` of an array schema.
    Items,
    /// A bare member of the parent schema object. Used for temporary keys
    /// that live next to `items`.
    Member(String),
}

/// Appends the tokens of `step` to `path`.
pub fn push_step(path: &mut Path, step: &SchemaStep) {
    match step {
        SchemaStep::Property(key) => {
            path.push(PROPERTIES.to_string());
            path.push(key.clone());
        }
        SchemaStep::Items => path.push(ITEMS.to_string()),
        SchemaStep::Member(key) => path.push(key.clone()),
    }
}
