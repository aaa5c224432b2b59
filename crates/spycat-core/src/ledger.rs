//! # Storage Gateway
//!
//! The `AgencyStore` trait is everything the rules need from persistence:
//! typed reads plus one atomic `commit`. This module also provides the
//! in-memory `Ledger` backend.
//!
//! All data structures use `BTreeMap` for deterministic ordering.

use crate::effect::Effect;
use crate::primitives::FIRST_ID;
use crate::{
    AgencyError, Cat, CatId, Counts, EntityRef, MissionId, MissionRecord, Target, TargetId,
};
use std::collections::BTreeMap;

// =============================================================================
// AGENCYSTORE TRAIT
// =============================================================================

/// The storage operations consumed by the invariant engine.
///
/// Reads return `Ok(None)` for absent rows; only lower-layer failures are
/// errors. `commit` applies a batch of effects all-or-nothing and returns
/// the identities allocated by its insert effects, in order.
pub trait AgencyStore {
    /// Look up a cat by identity.
    fn cat(&self, id: CatId) -> Result<Option<Cat>, AgencyError>;

    /// All cats, ordered by identity.
    fn cats(&self) -> Result<Vec<Cat>, AgencyError>;

    /// Look up a mission row by identity.
    fn mission(&self, id: MissionId) -> Result<Option<MissionRecord>, AgencyError>;

    /// All mission rows, ordered by identity.
    fn missions(&self) -> Result<Vec<MissionRecord>, AgencyError>;

    /// Look up a target by identity.
    fn target(&self, id: TargetId) -> Result<Option<Target>, AgencyError>;

    /// All targets, ordered by identity.
    fn targets(&self) -> Result<Vec<Target>, AgencyError>;

    /// Targets owned by one mission, in insertion order.
    fn targets_of(&self, mission: MissionId) -> Result<Vec<Target>, AgencyError>;

    /// Incomplete missions assigned to `cat`, ordered by identity.
    fn incomplete_missions_of(&self, cat: CatId) -> Result<Vec<MissionId>, AgencyError> {
        Ok(self
            .missions()?
            .into_iter()
            .filter(|m| !m.complete && m.cat == Some(cat))
            .map(|m| m.id)
            .collect())
    }

    /// Row counts for status reporting.
    fn counts(&self) -> Result<Counts, AgencyError> {
        let missions = self.missions()?;
        let targets = self.targets()?;
        Ok(Counts {
            cats: self.cats()?.len(),
            missions: missions.len(),
            incomplete_missions: missions.iter().filter(|m| !m.complete).count(),
            targets: targets.len(),
            complete_targets: targets.iter().filter(|t| t.complete).count(),
        })
    }

    /// Apply every effect, or none of them.
    fn commit(&mut self, effects: &[Effect]) -> Result<Vec<u64>, AgencyError>;
}

/// Step an id counter past the id just handed out.
///
/// The last id is never reused; an exhausted counter fails the commit.
pub(crate) fn advance(next: u64, entity: &str) -> Result<u64, AgencyError> {
    next.checked_add(1)
        .ok_or_else(|| AgencyError::Storage(format!("{entity} id space exhausted")))
}

// =============================================================================
// LEDGER IMPLEMENTATION
// =============================================================================

/// Prior state of one row touched by a commit.
#[derive(Debug)]
enum Undo {
    Cat(CatId, Option<Cat>),
    Mission(MissionId, Option<MissionRecord>),
    Target(TargetId, Option<Target>),
}

fn restore<K: Ord, V>(rows: &mut BTreeMap<K, V>, key: K, prior: Option<V>) {
    match prior {
        Some(row) => {
            rows.insert(key, row);
        }
        None => {
            rows.remove(&key);
        }
    }
}

/// The in-memory store.
///
/// A commit writes in place and keeps an undo entry for every row it
/// touches. If an effect fails, the entries are replayed in reverse and the
/// id counters reset, so a failed batch leaves no trace.
#[derive(Debug, Clone)]
pub struct Ledger {
    cats: BTreeMap<CatId, Cat>,
    missions: BTreeMap<MissionId, MissionRecord>,
    targets: BTreeMap<TargetId, Target>,
    next_cat_id: u64,
    next_mission_id: u64,
    next_target_id: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            cats: BTreeMap::new(),
            missions: BTreeMap::new(),
            targets: BTreeMap::new(),
            next_cat_id: FIRST_ID,
            next_mission_id: FIRST_ID,
            next_target_id: FIRST_ID,
        }
    }
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one effect. Every row is logged in `undo` before it changes.
    fn apply(
        &mut self,
        effect: &Effect,
        inserted: &mut Option<MissionId>,
        ids: &mut Vec<u64>,
        undo: &mut Vec<Undo>,
    ) -> Result<(), AgencyError> {
        match effect {
            Effect::InsertCat(draft) => {
                let id = CatId(self.next_cat_id);
                self.next_cat_id = advance(self.next_cat_id, "cat")?;
                let prior = self.cats.insert(id, draft.clone().into_cat(id));
                undo.push(Undo::Cat(id, prior));
                ids.push(id.0);
            }
            Effect::SetSalary { cat, salary } => {
                let row = self
                    .cats
                    .get_mut(cat)
                    .ok_or(AgencyError::NotFound(EntityRef::Cat(*cat)))?;
                undo.push(Undo::Cat(*cat, Some(row.clone())));
                row.salary = *salary;
            }
            Effect::InsertMission { cat, complete } => {
                let id = MissionId(self.next_mission_id);
                self.next_mission_id = advance(self.next_mission_id, "mission")?;
                let prior = self.missions.insert(
                    id,
                    MissionRecord {
                        id,
                        cat: *cat,
                        complete: *complete,
                    },
                );
                undo.push(Undo::Mission(id, prior));
                *inserted = Some(id);
                ids.push(id.0);
            }
            Effect::WriteMission {
                mission,
                cat,
                complete,
            } => {
                let row = Self::mission_mut(&mut self.missions, *mission, undo)?;
                row.cat = *cat;
                row.complete = *complete;
            }
            Effect::SetMissionCat { mission, cat } => {
                Self::mission_mut(&mut self.missions, *mission, undo)?.cat = Some(*cat);
            }
            Effect::CompleteMission(mission) => {
                Self::mission_mut(&mut self.missions, *mission, undo)?.complete = true;
            }
            Effect::DeleteMission(mission) => {
                let row = self
                    .missions
                    .remove(mission)
                    .ok_or(AgencyError::NotFound(EntityRef::Mission(*mission)))?;
                undo.push(Undo::Mission(*mission, Some(row)));
                let owned: Vec<TargetId> = self
                    .targets
                    .values()
                    .filter(|t| t.mission == *mission)
                    .map(|t| t.id)
                    .collect();
                for id in owned {
                    let prior = self.targets.remove(&id);
                    undo.push(Undo::Target(id, prior));
                }
            }
            Effect::InsertTarget { mission, fields } => {
                let owner = mission.resolve(*inserted)?;
                if !self.missions.contains_key(&owner) {
                    return Err(AgencyError::NotFound(EntityRef::Mission(owner)));
                }
                let id = TargetId(self.next_target_id);
                self.next_target_id = advance(self.next_target_id, "target")?;
                let prior = self.targets.insert(id, fields.clone().into_target(id, owner));
                undo.push(Undo::Target(id, prior));
                ids.push(id.0);
            }
            Effect::WriteTarget { target, fields } => {
                let row = Self::target_mut(&mut self.targets, *target, undo)?;
                row.name.clone_from(&fields.name);
                row.country.clone_from(&fields.country);
                row.notes.clone_from(&fields.notes);
                row.complete = fields.complete;
            }
            Effect::SetNotes { target, notes } => {
                Self::target_mut(&mut self.targets, *target, undo)?
                    .notes
                    .clone_from(notes);
            }
            Effect::DeleteTarget(target) => {
                let row = self
                    .targets
                    .remove(target)
                    .ok_or(AgencyError::NotFound(EntityRef::Target(*target)))?;
                undo.push(Undo::Target(*target, Some(row)));
            }
        }
        Ok(())
    }

    fn mission_mut<'a>(
        missions: &'a mut BTreeMap<MissionId, MissionRecord>,
        id: MissionId,
        undo: &mut Vec<Undo>,
    ) -> Result<&'a mut MissionRecord, AgencyError> {
        let row = missions
            .get_mut(&id)
            .ok_or(AgencyError::NotFound(EntityRef::Mission(id)))?;
        undo.push(Undo::Mission(id, Some(*row)));
        Ok(row)
    }

    fn target_mut<'a>(
        targets: &'a mut BTreeMap<TargetId, Target>,
        id: TargetId,
        undo: &mut Vec<Undo>,
    ) -> Result<&'a mut Target, AgencyError> {
        let row = targets
            .get_mut(&id)
            .ok_or(AgencyError::NotFound(EntityRef::Target(id)))?;
        undo.push(Undo::Target(id, Some(row.clone())));
        Ok(row)
    }

    /// Replay `undo` newest first, then reset the id counters.
    fn roll_back(&mut self, undo: Vec<Undo>, counters: [u64; 3]) {
        for entry in undo.into_iter().rev() {
            match entry {
                Undo::Cat(id, prior) => restore(&mut self.cats, id, prior),
                Undo::Mission(id, prior) => restore(&mut self.missions, id, prior),
                Undo::Target(id, prior) => restore(&mut self.targets, id, prior),
            }
        }
        [self.next_cat_id, self.next_mission_id, self.next_target_id] = counters;
    }
}

impl AgencyStore for Ledger {
    fn cat(&self, id: CatId) -> Result<Option<Cat>, AgencyError> {
        Ok(self.cats.get(&id).cloned())
    }

    fn cats(&self) -> Result<Vec<Cat>, AgencyError> {
        Ok(self.cats.values().cloned().collect())
    }

    fn mission(&self, id: MissionId) -> Result<Option<MissionRecord>, AgencyError> {
        Ok(self.missions.get(&id).copied())
    }

    fn missions(&self) -> Result<Vec<MissionRecord>, AgencyError> {
        Ok(self.missions.values().copied().collect())
    }

    fn target(&self, id: TargetId) -> Result<Option<Target>, AgencyError> {
        Ok(self.targets.get(&id).cloned())
    }

    fn targets(&self) -> Result<Vec<Target>, AgencyError> {
        Ok(self.targets.values().cloned().collect())
    }

    fn targets_of(&self, mission: MissionId) -> Result<Vec<Target>, AgencyError> {
        Ok(self
            .targets
            .values()
            .filter(|t| t.mission == mission)
            .cloned()
            .collect())
    }

    fn commit(&mut self, effects: &[Effect]) -> Result<Vec<u64>, AgencyError> {
        let counters = [self.next_cat_id, self.next_mission_id, self.next_target_id];
        let mut undo = Vec::new();
        let mut inserted = None;
        let mut ids = Vec::new();
        for effect in effects {
            if let Err(e) = self.apply(effect, &mut inserted, &mut ids, &mut undo) {
                self.roll_back(undo, counters);
                return Err(e);
            }
        }
        Ok(ids)
    }
}

// =============================================================================
// TESTS
// =============================================================================
