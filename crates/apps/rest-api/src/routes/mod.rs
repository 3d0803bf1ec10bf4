pub mod todos;
pub mod users;

use uuid::Uuid;

use crate::error::ApiError;

/// Validity predicate for path identifiers
///
/// A malformed id is rejected here, before any persistence call.
pub fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::Validation(format!("Invalid id: {id}")))
}
