//! Pointer and path validation.

use crate::JsonPointerError;

/// Maximum allowed pointer string length.
const MAX_POINTER_LENGTH: usize = 1024;

/// Maximum allowed number of tokens in a path.
const MAX_PATH_LENGTH: usize = 256;

/// Checks that `pointer` is either the root (`""`) or starts with `/`, and
/// is not unreasonably long.
///
/// ```
/// use schema_draft_json_pointer::validate_json_pointer;
///
/// assert!(validate_json_pointer("").is_ok());
/// assert!(validate_json_pointer("/properties/a").is_ok());
/// assert!(validate_json_pointer("properties/a").is_err());
/// ```
pub fn validate_json_pointer(pointer: &str) -> Result<(), JsonPointerError> {
    if pointer.is_empty() {
        return Ok(());
    }
    if !pointer.starts_with('/') {
        return Err(JsonPointerError::PointerInvalid);
    }
    if pointer.len() > MAX_POINTER_LENGTH {
        return Err(JsonPointerError::PointerTooLong);
    }
    Ok(())
}

pub fn validate_path(path: &[String]) -> Result<(), JsonPointerError> {
    if path.len() > MAX_PATH_LENGTH {
        return Err(JsonPointerError::PathTooLong);
    }
    Ok(())
}
