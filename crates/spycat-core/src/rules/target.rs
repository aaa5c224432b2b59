//! Target rules.
//!
//! A target is frozen once it or its owning mission is complete. The
//! target's own flag is checked first, so its message wins when both hold.

use super::{require_mission, require_target};
use crate::effect::{Effect, MissionRef};
use crate::ledger::AgencyStore;
use crate::{Action, AgencyError, MissionId, TargetFields, TargetId, Violation, validate_notes};

pub fn create<S: AgencyStore + ?Sized>(
    store: &S,
    mission: MissionId,
    fields: &TargetFields,
) -> Result<Vec<Effect>, AgencyError> {
    fields.validate()?;
    let record = require_mission(store, mission)?;
    if record.complete {
        return Err(Violation::CompletedMission {
            mission,
            action: Action::AddTarget,
        }
        .into());
    }
    Ok(vec![Effect::InsertTarget {
        mission: MissionRef::Existing(mission),
        fields: fields.clone(),
    }])
}

/// Full overwrite. Setting `complete` here is how a target completes.
pub fn update<S: AgencyStore + ?Sized>(
    store: &S,
    id: TargetId,
    fields: &TargetFields,
) -> Result<Vec<Effect>, AgencyError> {
    fields.validate()?;
    ensure_mutable(store, id, Action::UpdateTarget)?;
    Ok(vec![Effect::WriteTarget {
        target: id,
        fields: fields.clone(),
    }])
}

pub fn update_notes<S: AgencyStore + ?Sized>(
    store: &S,
    id: TargetId,
    notes: &str,
) -> Result<Vec<Effect>, AgencyError> {
    validate_notes(notes)?;
    ensure_mutable(store, id, Action::UpdateNotes)?;
    Ok(vec![Effect::SetNotes {
        target: id,
        notes: notes.to_owned(),
    }])
}

pub fn delete<S: AgencyStore + ?Sized>(
    store: &S,
    id: TargetId,
) -> Result<Vec<Effect>, AgencyError> {
    ensure_mutable(store, id, Action::DeleteTarget)?;
    Ok(vec![Effect::DeleteTarget(id)])
}

fn ensure_mutable<S: AgencyStore + ?Sized>(
    store: &S,
    id: TargetId,
    action: Action,
) -> Result<(), AgencyError> {
    let target = require_target(store, id)?;
    if target.complete {
        return Err(Violation::CompletedTarget { target: id, action }.into());
    }
    let owner = require_mission(store, target.mission)?;
    if owner.complete {
        return Err(Violation::CompletedMission {
            mission: owner.id,
            action,
        }
        .into());
    }
    Ok(())
}
