//! Mission rules.
//!
//! A mission's completion flag only moves forward on the completion path,
//! and an assigned mission cannot be deleted whatever its completion state.
//! The raw update path is looser under [`Enforcement::Compatible`].

use super::{Enforcement, ensure_available, require_cat, require_mission};
use crate::effect::{Effect, MissionRef};
use crate::ledger::AgencyStore;
use crate::{AgencyError, CatId, MissionId, NewMission, Violation};

/// Insert a mission and its targets as one batch.
///
/// An assigned cat must exist and must not already hold an incomplete
/// mission. Unassigned missions skip that check.
pub fn create<S: AgencyStore + ?Sized>(
    store: &S,
    draft: &NewMission,
) -> Result<Vec<Effect>, AgencyError> {
    draft.validate()?;

    if let Some(cat) = draft.cat {
        require_cat(store, cat)?;
        ensure_available(store, cat, None)?;
    }

    let mut effects = Vec::with_capacity(draft.targets.len() + 1);
    effects.push(Effect::InsertMission {
        cat: draft.cat,
        complete: draft.complete,
    });
    effects.extend(draft.targets.iter().map(|fields| Effect::InsertTarget {
        mission: MissionRef::Inserted,
        fields: fields.clone(),
    }));
    Ok(effects)
}

/// Completing twice is rejected, not ignored.
pub fn complete<S: AgencyStore + ?Sized>(
    store: &S,
    id: MissionId,
) -> Result<Vec<Effect>, AgencyError> {
    let record = require_mission(store, id)?;
    if record.complete {
        return Err(Violation::MissionAlreadyComplete { mission: id }.into());
    }
    Ok(vec![Effect::CompleteMission(id)])
}

/// Only unassigned missions may be deleted. Targets go with the mission.
pub fn delete<S: AgencyStore + ?Sized>(
    store: &S,
    id: MissionId,
) -> Result<Vec<Effect>, AgencyError> {
    let record = require_mission(store, id)?;
    if let Some(cat) = record.cat {
        return Err(Violation::MissionAssigned { mission: id, cat }.into());
    }
    Ok(vec![Effect::DeleteMission(id)])
}

/// Overwrite the assignee and completion flag.
pub fn update<S: AgencyStore + ?Sized>(
    store: &S,
    enforcement: Enforcement,
    id: MissionId,
    cat: Option<CatId>,
    complete: bool,
) -> Result<Vec<Effect>, AgencyError> {
    let record = require_mission(store, id)?;

    if enforcement == Enforcement::Strict {
        if record.complete && !complete {
            return Err(Violation::CompletionReversal { mission: id }.into());
        }
        if let Some(cat) = cat {
            require_cat(store, cat)?;
            if !complete {
                ensure_available(store, cat, Some(id))?;
            }
        }
    }

    Ok(vec![Effect::WriteMission {
        mission: id,
        cat,
        complete,
    }])
}
