//! Typed handles into an `EntityGraph`
//!
//! A key is the object identity of an entity instance: two keys are equal
//! exactly when they name the same in-memory instance. Keys are only minted
//! by the graph that owns the instance.

use serde::Serialize;

use super::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PatientKey(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WardKey(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StayKey(pub(crate) usize);

impl PatientKey {
    pub fn index(self) -> usize {
        self.0
    }
}

impl WardKey {
    pub fn index(self) -> usize {
        self.0
    }
}

impl StayKey {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Any storable entity, tagged by kind
///
/// The store dispatcher matches on this instead of inspecting runtime types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKey {
    Patient(PatientKey),
    Ward(WardKey),
    HospitalStay(StayKey),
}

impl EntityKey {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityKey::Patient(_) => EntityKind::Patient,
            EntityKey::Ward(_) => EntityKind::Ward,
            EntityKey::HospitalStay(_) => EntityKind::HospitalStay,
        }
    }
}

impl From<PatientKey> for EntityKey {
    fn from(key: PatientKey) -> Self {
        EntityKey::Patient(key)
    }
}

impl From<WardKey> for EntityKey {
    fn from(key: WardKey) -> Self {
        EntityKey::Ward(key)
    }
}

impl From<StayKey> for EntityKey {
    fn from(key: StayKey) -> Self {
        EntityKey::HospitalStay(key)
    }
}
