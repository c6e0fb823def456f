//! The `Car` entity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::CarId;

/// A car record as stored by the repository and exchanged over HTTP.
///
/// Every attribute is nullable: an update replaces the whole record, so
/// attributes omitted from the payload end up null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(default)]
    pub id: Option<CarId>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Engine displacement.
    #[serde(default)]
    pub cc: Option<f64>,
    #[serde(default)]
    pub doors: Option<i32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
}

impl Car {
    /// Convenience constructor for a transient car with a door count.
    pub fn with_doors(doors: i32) -> Self {
        Self {
            doors: Some(doors),
            ..Self::default()
        }
    }

    /// Returns a copy carrying the given identifier.
    pub fn with_id(mut self, id: CarId) -> Self {
        self.id = Some(id);
        self
    }

    /// Creation requires a transient record.
    pub fn ensure_new(&self) -> DomainResult<()> {
        match self.id {
            None => Ok(()),
            Some(id) => Err(DomainError::IdentifierPresent(id.get())),
        }
    }

    /// Update requires a persisted record; returns the identifier to overwrite.
    pub fn ensure_persisted(&self) -> DomainResult<CarId> {
        self.id.ok_or(DomainError::IdentifierMissing)
    }

    pub fn has_doors(&self, doors: i32) -> bool {
        self.doors == Some(doors)
    }
}
