//! Entity trait: identity + the table a record lives in.

use crate::RecordId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Name of the single table backing this entity.
    const TABLE: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> RecordId;
}
