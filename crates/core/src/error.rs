use crate::types::DbId;

/// Domain error taxonomy shared by every crate in the workspace.
///
/// Each variant maps to exactly one HTTP status at the API boundary:
/// `Validation` 400, `Unauthorized` 401, `Forbidden` 403, `NotFound` 404,
/// `Conflict` 409, `Internal` 500. `Conflict` is the only kind a client
/// should react to by refreshing state and retrying the user action; the
/// others mean the action itself is invalid as submitted.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
