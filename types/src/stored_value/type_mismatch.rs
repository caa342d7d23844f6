use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error struct representing a type mismatch in [`StoredValue`](super::StoredValue)
/// conversions.
#[derive(Error, PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[error("Type mismatch. Expected {expected} but found {found}.")]
pub struct TypeMismatch {
    /// The name of the expected type.
    pub expected: String,
    /// The actual type found.
    pub found: String,
}

impl TypeMismatch {
    /// Creates a new `TypeMismatch`.
    pub fn new(expected: String, found: String) -> TypeMismatch {
        TypeMismatch { expected, found }
    }
}
