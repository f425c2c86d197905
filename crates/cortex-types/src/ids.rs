//! Type-safe identifier wrapper around [`Uuid`].
//!
//! Cells are created in bulk by the population generator and are never
//! patched individually, so the only identifier the simulation needs is
//! [`CellId`]. IDs are built from random bytes supplied by the caller: the
//! generator feeds them from its seeded RNG, which makes a seeded rebuild
//! reproduce the exact same IDs.

use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

/// Unique identifier for a simulated cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellId(pub Uuid);

impl CellId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create an identifier from 16 random bytes (stamped as UUID v4).
    pub const fn from_random_bytes(bytes: [u8; 16]) -> Self {
        Self(Builder::from_random_bytes(bytes).into_uuid())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for CellId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for CellId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CellId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<CellId> for Uuid {
    fn from(id: CellId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_same_id() {
        let bytes = [7_u8; 16];
        assert_eq!(CellId::from_random_bytes(bytes), CellId::from_random_bytes(bytes));
    }

    #[test]
    fn random_bytes_are_stamped_v4() {
        let id = CellId::from_random_bytes([0xAB; 16]);
        assert_eq!(id.into_inner().get_version_num(), 4);
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(CellId::new(), CellId::new());
    }
}
