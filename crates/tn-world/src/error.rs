//! Object-interaction error type.

use thiserror::Error;

use tn_core::ObjectId;

/// Failures reported by an [`ObjectInteraction`](crate::ObjectInteraction)
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractError {
    #[error("object {0} is not present in the world")]
    ObjectNotFound(ObjectId),

    #[error("interaction with object {id} did not complete after {attempts} attempts")]
    Timeout { id: ObjectId, attempts: u32 },
}

pub type InteractResult<T> = Result<T, InteractError>;
