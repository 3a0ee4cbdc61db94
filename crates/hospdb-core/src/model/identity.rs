use serde::Serialize;
use std::fmt;

/// Sentinel object id of an entity that has no durable row yet
pub const INVALID_OBJECT_ID: i64 = -1;

/// The entity kinds the persistence layer knows how to map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    Patient,
    Ward,
    HospitalStay,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Patient => "Patient",
            EntityKind::Ward => "Ward",
            EntityKind::HospitalStay => "HospitalStay",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistence state of an entity instance
///
/// Transient while the id is `INVALID_OBJECT_ID`, persistent afterwards.
/// The transition happens exactly once: `assign` panics on a second call,
/// because overwriting a durable identity would silently detach the instance
/// from its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Identity(i64);

impl Identity {
    /// Identity of a freshly constructed instance
    pub fn transient() -> Self {
        Self(INVALID_OBJECT_ID)
    }

    /// Identity of an instance reconstructed from an existing row
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a valid generated key (must be positive).
    pub fn persistent(id: i64) -> Self {
        assert!(id > 0, "persistent identity requires a positive id, got {}", id);
        Self(id)
    }

    pub fn object_id(&self) -> i64 {
        self.0
    }

    pub fn is_persistent(&self) -> bool {
        self.0 != INVALID_OBJECT_ID
    }

    /// Record the generated key of the first successful insert
    ///
    /// # Panics
    ///
    /// Panics if the identity is already persistent or `id` is not positive.
    pub fn assign(&mut self, id: i64) {
        assert!(
            !self.is_persistent(),
            "identity already assigned: object id {} cannot become {}",
            self.0,
            id
        );
        assert!(id > 0, "generated key must be positive, got {}", id);
        self.0 = id;
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::transient()
    }
}

/// Capability shared by every mapped entity
pub trait PersistentObject {
    const KIND: EntityKind;

    fn identity(&self) -> &Identity;

    fn identity_mut(&mut self) -> &mut Identity;

    fn object_id(&self) -> i64 {
        self.identity().object_id()
    }

    fn is_persistent(&self) -> bool {
        self.identity().is_persistent()
    }
}
