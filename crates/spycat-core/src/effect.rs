//! # Persistence Effects
//!
//! The rules never write. A decision is a list of [`Effect`]s, and a store
//! applies the whole list in one all-or-nothing commit.

use crate::{AgencyError, CatId, MissionId, NewCat, TargetFields, TargetId};

/// Which mission an inserted target belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionRef {
    /// A mission that already exists.
    Existing(MissionId),
    /// The most recent `InsertMission` in the same batch.
    Inserted,
}

impl MissionRef {
    /// Resolve against the mission inserted earlier in the batch, if any.
    pub fn resolve(self, inserted: Option<MissionId>) -> Result<MissionId, AgencyError> {
        match self {
            Self::Existing(id) => Ok(id),
            Self::Inserted => inserted.ok_or_else(|| {
                AgencyError::Storage("target refers to a mission not inserted in this batch".into())
            }),
        }
    }
}

/// A single write against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    InsertCat(NewCat),
    SetSalary {
        cat: CatId,
        salary: f64,
    },
    InsertMission {
        cat: Option<CatId>,
        complete: bool,
    },
    /// Overwrite both mission fields.
    WriteMission {
        mission: MissionId,
        cat: Option<CatId>,
        complete: bool,
    },
    SetMissionCat {
        mission: MissionId,
        cat: CatId,
    },
    CompleteMission(MissionId),
    /// Removes the mission and every target it owns.
    DeleteMission(MissionId),
    InsertTarget {
        mission: MissionRef,
        fields: TargetFields,
    },
    /// Overwrite every writable target field.
    WriteTarget {
        target: TargetId,
        fields: TargetFields,
    },
    SetNotes {
        target: TargetId,
        notes: String,
    },
    DeleteTarget(TargetId),
}
