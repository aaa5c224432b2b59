//! # Lifecycle Rules
//!
//! Every mutating entry point is a [`Command`]. [`decide`] reads the
//! current state through an [`AgencyStore`], checks the lifecycle rules,
//! and returns the effects to commit. Rules never write.
//!
//! ## Rule Groups
//!
//! - [`cat`]: creation and salary updates
//! - [`mission`]: creation, completion, deletion, raw update
//! - [`assignment`]: binding a cat to a mission
//! - [`target`]: creation, overwrite, notes, deletion

pub mod assignment;
pub mod cat;
pub mod mission;
pub mod target;

use crate::breed::VerifiedCat;
use crate::effect::Effect;
use crate::ledger::AgencyStore;
use crate::{
    AgencyError, Cat, CatId, EntityRef, MissionId, MissionRecord, NewMission, Target, TargetFields,
    TargetId, Violation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How strictly the mission rules are applied on the secondary paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enforcement {
    /// The one-incomplete-mission rule is checked only at mission creation,
    /// and the raw mission update overwrites fields unchecked.
    #[default]
    Compatible,
    /// Every path that binds a cat checks the one-incomplete-mission rule,
    /// and completed missions cannot be reopened.
    Strict,
}

impl Enforcement {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compatible => "compatible",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for Enforcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Enforcement {
    type Err = AgencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compatible" => Ok(Self::Compatible),
            "strict" => Ok(Self::Strict),
            other => Err(AgencyError::Validation(format!(
                "Unknown enforcement mode '{}' (expected 'compatible' or 'strict')",
                other
            ))),
        }
    }
}

/// A mutating request against the agency.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateCat(VerifiedCat),
    UpdateSalary {
        cat: CatId,
        salary: f64,
    },
    CreateMission(NewMission),
    /// Raw overwrite of both mission fields.
    UpdateMission {
        mission: MissionId,
        cat: Option<CatId>,
        complete: bool,
    },
    CompleteMission(MissionId),
    DeleteMission(MissionId),
    AssignCat {
        cat: CatId,
        mission: MissionId,
    },
    CreateTarget {
        mission: MissionId,
        fields: TargetFields,
    },
    UpdateTarget {
        target: TargetId,
        fields: TargetFields,
    },
    UpdateNotes {
        target: TargetId,
        notes: String,
    },
    DeleteTarget(TargetId),
}

/// Decide whether `command` is permitted against the current state.
///
/// Returns the effects to commit, or the reason it was rejected.
pub fn decide<S: AgencyStore + ?Sized>(
    store: &S,
    enforcement: Enforcement,
    command: &Command,
) -> Result<Vec<Effect>, AgencyError> {
    match command {
        Command::CreateCat(verified) => Ok(cat::create(verified)),
        Command::UpdateSalary { cat, salary } => cat::update_salary(store, *cat, *salary),
        Command::CreateMission(draft) => mission::create(store, draft),
        Command::UpdateMission {
            mission,
            cat,
            complete,
        } => mission::update(store, enforcement, *mission, *cat, *complete),
        Command::CompleteMission(id) => mission::complete(store, *id),
        Command::DeleteMission(id) => mission::delete(store, *id),
        Command::AssignCat { cat, mission } => {
            assignment::assign(store, enforcement, *cat, *mission)
        }
        Command::CreateTarget { mission, fields } => target::create(store, *mission, fields),
        Command::UpdateTarget { target, fields } => target::update(store, *target, fields),
        Command::UpdateNotes { target, notes } => target::update_notes(store, *target, notes),
        Command::DeleteTarget(id) => target::delete(store, *id),
    }
}

// =============================================================================
// SHARED LOOKUPS
// =============================================================================

pub(crate) fn require_cat<S: AgencyStore + ?Sized>(
    store: &S,
    id: CatId,
) -> Result<Cat, AgencyError> {
    store.cat(id)?.ok_or(AgencyError::NotFound(EntityRef::Cat(id)))
}

pub(crate) fn require_mission<S: AgencyStore + ?Sized>(
    store: &S,
    id: MissionId,
) -> Result<MissionRecord, AgencyError> {
    store
        .mission(id)?
        .ok_or(AgencyError::NotFound(EntityRef::Mission(id)))
}

pub(crate) fn require_target<S: AgencyStore + ?Sized>(
    store: &S,
    id: TargetId,
) -> Result<Target, AgencyError> {
    store
        .target(id)?
        .ok_or(AgencyError::NotFound(EntityRef::Target(id)))
}

/// Reject if `cat` holds an incomplete mission other than `except`.
pub(crate) fn ensure_available<S: AgencyStore + ?Sized>(
    store: &S,
    cat: CatId,
    except: Option<MissionId>,
) -> Result<(), AgencyError> {
    let busy = store
        .incomplete_missions_of(cat)?
        .into_iter()
        .find(|&m| Some(m) != except);
    match busy {
        Some(mission) => Err(Violation::CatHasIncompleteMission { cat, mission }.into()),
        None => Ok(()),
    }
}
