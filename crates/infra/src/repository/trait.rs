use async_trait::async_trait;
use thiserror::Error;

use carhub_core::{Car, CarId};

/// Result type returned by every repository operation.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage-level failure.
///
/// These are never produced by client input; the HTTP layer reports them as
/// server faults.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// The database rejected or failed a statement.
    #[error("database error: {0}")]
    Database(String),

    /// The store cannot be reached or is in an unusable state.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be mapped back into a `Car`.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// CRUD-style persistence for `Car` records.
///
/// ## `save` semantics
///
/// - `id == None`: insert and assign the next identifier.
/// - `id == Some(x)` and `x` is stored: replace every attribute of `x`.
/// - `id == Some(x)` and `x` is unknown: insert as a new record with a freshly
///   assigned identifier; the submitted id is not honored.
///
/// Identifiers start at 1, increase monotonically and are never reused.
#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Every stored car, in ascending id order.
    async fn find_all(&self) -> RepositoryResult<Vec<Car>>;

    async fn find_by_id(&self, id: CarId) -> RepositoryResult<Option<Car>>;

    /// Cars whose door count equals `doors`, in ascending id order.
    async fn find_by_doors(&self, doors: i32) -> RepositoryResult<Vec<Car>>;

    async fn save(&self, car: Car) -> RepositoryResult<Car>;

    /// Deleting an unknown id is a no-op.
    async fn delete_by_id(&self, id: CarId) -> RepositoryResult<()>;

    async fn delete_all(&self) -> RepositoryResult<()>;
}
