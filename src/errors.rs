//! Errors that may occur when registering signatures

use derive_more::{Display, Error};

/// Two signatures with the same identity were added to one collection.
///
/// Signature ids must be unique within a collection because a collection is
/// the exclusive owner of its signatures. This is a programmer error at
/// registration time, not a runtime condition to recover from; lookups for
/// missing or mismatched signatures degrade to neutral values instead of
/// erroring.
#[derive(Debug, Clone, Display, Error, PartialEq, Eq)]
#[display(fmt = "a signature with id `{}` is already registered", id)]
pub struct DuplicateSignatureId {
    /// The identity that collided.
    #[error(not(source))]
    pub id: String,
}
