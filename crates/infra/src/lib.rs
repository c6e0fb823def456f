//! Infrastructure layer: storage adapters and configuration.

pub mod config;
pub mod repository;

pub use config::{AppConfig, ConfigError, StorageBackend};
pub use repository::{
    CarRepository, InMemoryCarRepository, PostgresCarRepository, RepositoryError, RepositoryResult,
};
