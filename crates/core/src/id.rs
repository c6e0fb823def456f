//! Strongly-typed identifiers used across the domain.

use serde::{Deserialize, Serialize};

/// Identifier of a persisted car.
///
/// Assigned by the repository on first save; never chosen by clients.
/// Path segments are decoded through `Deserialize`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(i64);

impl CarId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for CarId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_inner_value() {
        assert_eq!(CarId::new(42).to_string(), "42");
        assert_eq!(CarId::new(42).get(), 42);
    }

    #[test]
    fn serde_is_a_plain_number() {
        assert_eq!(serde_json::to_string(&CarId::new(7)).unwrap(), "7");
        assert_eq!(serde_json::from_str::<CarId>("7").unwrap(), CarId::new(7));
        assert!(serde_json::from_str::<CarId>("\"abc\"").is_err());
    }
}
