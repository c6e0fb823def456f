//! Car persistence boundary.
//!
//! Handlers only see the `CarRepository` trait; the concrete adapter is picked
//! when the application is composed.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryCarRepository;
pub use postgres::PostgresCarRepository;
pub use r#trait::{CarRepository, RepositoryError, RepositoryResult};
