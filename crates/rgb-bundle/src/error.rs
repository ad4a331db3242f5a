//! Bundle error types.

use thiserror::Error;

use crate::ValueKind;

/// Errors returned by the probing accessors of [`Bundle`](crate::Bundle).
///
/// The plain [`get`](crate::Bundle::get) accessor folds both variants into
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BundleError {
    /// No entry is stored under the key.
    #[error("bundle `{bundle}` has no entry `{key}`")]
    MissingKey { bundle: String, key: String },

    /// An entry exists but holds a different kind of value.
    #[error("bundle `{bundle}` entry `{key}` is {found}, expected {expected}")]
    TypeMismatch {
        bundle: String,
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;
