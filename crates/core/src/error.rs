//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on client-input failures. Storage faults belong to the
/// repository layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A record presented for creation already carries an identifier.
    #[error("identifier must be absent on create (got {0})")]
    IdentifierPresent(i64),

    /// A record presented for update carries no identifier.
    #[error("identifier is required on update")]
    IdentifierMissing,
}
