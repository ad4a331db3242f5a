//! Entity error types.

use thiserror::Error;

/// Errors from building an [`Entity`](crate::Entity) or configuring an
/// [`EntityStateSerializer`](crate::EntityStateSerializer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// A component of the same concrete type is already attached.
    #[error("entity already has component {0}")]
    DuplicateComponent(&'static str),

    /// A control of the same concrete type is already attached.
    #[error("entity already has control {0}")]
    DuplicateControl(&'static str),

    /// Components and controls were configured under the same root key.
    #[error("components and controls cannot share the category key {0:?}")]
    SharedCategoryKey(String),
}

/// Result type for entity operations.
pub type EntityResult<T> = Result<T, EntityError>;
