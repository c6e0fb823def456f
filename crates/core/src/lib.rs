//! `carhub-core` — domain building blocks for the car catalogue.
//!
//! This crate contains **pure domain** types (no infrastructure concerns).

pub mod car;
pub mod error;
pub mod id;

pub use car::Car;
pub use error::{DomainError, DomainResult};
pub use id::CarId;
