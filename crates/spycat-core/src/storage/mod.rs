//! # Storage Backends
//!
//! The engine is generic over [`AgencyStore`]. `StorageBackend` lets the
//! process entry point pick one at runtime:
//! - `InMemory`: the [`Ledger`] (fast, volatile)
//! - `Persistent`: the [`RedbLedger`] (ACID, disk-backed)

mod redb_ledger;

pub use redb_ledger::RedbLedger;

use crate::effect::Effect;
use crate::ledger::{AgencyStore, Ledger};
use crate::{AgencyError, Cat, CatId, MissionId, MissionRecord, Target, TargetId};
use std::path::Path;

/// Runtime-selected store.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory ledger (fast, volatile).
    InMemory(Ledger),
    /// Disk-backed ledger using redb (ACID, persistent).
    Persistent(RedbLedger),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(Ledger::new())
    }
}

// NOTE: StorageBackend does NOT implement Clone.
// The redb database handle cannot be cloned.

impl StorageBackend {
    /// An empty in-memory backend.
    #[must_use]
    pub fn memory() -> Self {
        Self::default()
    }

    /// Open or create a redb database at `path`.
    pub fn redb(path: impl AsRef<Path>) -> Result<Self, AgencyError> {
        Ok(Self::Persistent(RedbLedger::open(path)?))
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Persistent(_))
    }

    /// Short name for status output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InMemory(_) => "memory",
            Self::Persistent(_) => "redb",
        }
    }
}

impl AgencyStore for StorageBackend {
    fn cat(&self, id: CatId) -> Result<Option<Cat>, AgencyError> {
        match self {
            Self::InMemory(l) => l.cat(id),
            Self::Persistent(r) => r.cat(id),
        }
    }

    fn cats(&self) -> Result<Vec<Cat>, AgencyError> {
        match self {
            Self::InMemory(l) => l.cats(),
            Self::Persistent(r) => r.cats(),
        }
    }

    fn mission(&self, id: MissionId) -> Result<Option<MissionRecord>, AgencyError> {
        match self {
            Self::InMemory(l) => l.mission(id),
            Self::Persistent(r) => r.mission(id),
        }
    }

    fn missions(&self) -> Result<Vec<MissionRecord>, AgencyError> {
        match self {
            Self::InMemory(l) => l.missions(),
            Self::Persistent(r) => r.missions(),
        }
    }

    fn target(&self, id: TargetId) -> Result<Option<Target>, AgencyError> {
        match self {
            Self::InMemory(l) => l.target(id),
            Self::Persistent(r) => r.target(id),
        }
    }

    fn targets(&self) -> Result<Vec<Target>, AgencyError> {
        match self {
            Self::InMemory(l) => l.targets(),
            Self::Persistent(r) => r.targets(),
        }
    }

    fn targets_of(&self, mission: MissionId) -> Result<Vec<Target>, AgencyError> {
        match self {
            Self::InMemory(l) => l.targets_of(mission),
            Self::Persistent(r) => r.targets_of(mission),
        }
    }

    fn commit(&mut self, effects: &[Effect]) -> Result<Vec<u64>, AgencyError> {
        match self {
            Self::InMemory(l) => l.commit(effects),
            Self::Persistent(r) => r.commit(effects),
        }
    }
}
