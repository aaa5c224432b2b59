//! Assignment rules.
//!
//! Under [`Enforcement::Compatible`] reassignment does not re-check the
//! one-incomplete-mission rule; that rule is only enforced at creation.

use super::{Enforcement, ensure_available, require_cat, require_mission};
use crate::effect::Effect;
use crate::ledger::AgencyStore;
use crate::{Action, AgencyError, CatId, MissionId, Violation};

pub fn assign<S: AgencyStore + ?Sized>(
    store: &S,
    enforcement: Enforcement,
    cat: CatId,
    mission: MissionId,
) -> Result<Vec<Effect>, AgencyError> {
    require_cat(store, cat)?;
    let record = require_mission(store, mission)?;

    if record.complete {
        return Err(Violation::CompletedMission {
            mission,
            action: Action::AssignCat,
        }
        .into());
    }

    if enforcement == Enforcement::Strict {
        ensure_available(store, cat, Some(mission))?;
    }

    Ok(vec![Effect::SetMissionCat { mission, cat }])
}
