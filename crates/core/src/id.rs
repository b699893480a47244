//! Record identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Auto-assigned integer primary key of a stored record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|e| DomainError::invalid_id(format!("RecordId: {e}")))?;
        if value <= 0 {
            return Err(DomainError::invalid_id("RecordId: must be positive"));
        }
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_integers() {
        assert_eq!("42".parse::<RecordId>().unwrap(), RecordId::new(42));
        assert_eq!(" 7 ".parse::<RecordId>().unwrap().get(), 7);
    }

    #[test]
    fn rejects_malformed_and_non_positive_ids() {
        for raw in ["", "abc", "1.5", "0", "-3"] {
            assert!(matches!(raw.parse::<RecordId>(), Err(DomainError::InvalidId(_))), "{raw}");
        }
    }

    #[test]
    fn serializes_as_a_bare_number() {
        let json = serde_json::to_string(&RecordId::new(9)).unwrap();
        assert_eq!(json, "9");
    }
}
