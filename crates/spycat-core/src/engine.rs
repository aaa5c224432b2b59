//! # Invariant Engine
//!
//! `Engine` owns a store and an [`Enforcement`] mode. Every mutating method
//! runs decide-then-commit while holding `&mut self`, so a caller that
//! serializes access (a lock, a single task) gets atomic read-verify-write.

use crate::breed::VerifiedCat;
use crate::ledger::AgencyStore;
use crate::rules::{self, Command, Enforcement};
use crate::{
    AgencyError, Cat, CatId, Counts, EntityRef, Mission, MissionId, MissionRecord, NewMission,
    Target, TargetFields, TargetId,
};

/// The mission-lifecycle engine over a store `S`.
#[derive(Debug)]
pub struct Engine<S> {
    store: S,
    enforcement: Enforcement,
}

impl<S: AgencyStore> Engine<S> {
    #[must_use]
    pub fn new(store: S, enforcement: Enforcement) -> Self {
        Self { store, enforcement }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn enforcement(&self) -> Enforcement {
        self.enforcement
    }

    /// Decide and commit a single command.
    ///
    /// Returns the identities allocated by the commit.
    pub fn execute(&mut self, command: &Command) -> Result<Vec<u64>, AgencyError> {
        let effects = rules::decide(&self.store, self.enforcement, command)?;
        self.store.commit(&effects)
    }

    fn first_id(ids: &[u64]) -> Result<u64, AgencyError> {
        ids.first()
            .copied()
            .ok_or_else(|| AgencyError::Storage("commit allocated no identity".into()))
    }

    // =========================================================================
    // CATS
    // =========================================================================

    pub fn create_cat(&mut self, cat: VerifiedCat) -> Result<Cat, AgencyError> {
        let ids = self.execute(&Command::CreateCat(cat.clone()))?;
        let id = CatId(Self::first_id(&ids)?);
        Ok(cat.into_inner().into_cat(id))
    }

    pub fn cats(&self) -> Result<Vec<Cat>, AgencyError> {
        self.store.cats()
    }

    pub fn cat(&self, id: CatId) -> Result<Cat, AgencyError> {
        rules::require_cat(&self.store, id)
    }

    /// Returns the cat as stored after the update.
    pub fn update_salary(&mut self, cat: CatId, salary: f64) -> Result<Cat, AgencyError> {
        self.execute(&Command::UpdateSalary { cat, salary })?;
        self.cat(cat)
    }

    // =========================================================================
    // MISSIONS
    // =========================================================================

    /// Create a mission and its targets in one commit.
    pub fn create_mission(&mut self, draft: NewMission) -> Result<Mission, AgencyError> {
        let ids = self.execute(&Command::CreateMission(draft))?;
        self.mission(MissionId(Self::first_id(&ids)?))
    }

    /// Every mission with its targets.
    pub fn missions(&self) -> Result<Vec<Mission>, AgencyError> {
        self.store
            .missions()?
            .into_iter()
            .map(|record| {
                let targets = self.store.targets_of(record.id)?;
                Ok(Mission::from_record(record, targets))
            })
            .collect()
    }

    pub fn mission(&self, id: MissionId) -> Result<Mission, AgencyError> {
        let record = rules::require_mission(&self.store, id)?;
        let targets = self.store.targets_of(id)?;
        Ok(Mission::from_record(record, targets))
    }

    /// Raw overwrite of the assignee and completion flag.
    pub fn update_mission(
        &mut self,
        id: MissionId,
        cat: Option<CatId>,
        complete: bool,
    ) -> Result<MissionRecord, AgencyError> {
        self.execute(&Command::UpdateMission {
            mission: id,
            cat,
            complete,
        })?;
        rules::require_mission(&self.store, id)
    }

    pub fn complete_mission(&mut self, id: MissionId) -> Result<(), AgencyError> {
        self.execute(&Command::CompleteMission(id)).map(drop)
    }

    pub fn delete_mission(&mut self, id: MissionId) -> Result<(), AgencyError> {
        self.execute(&Command::DeleteMission(id)).map(drop)
    }

    // =========================================================================
    // ASSIGNMENT
    // =========================================================================

    pub fn assign_cat(&mut self, cat: CatId, mission: MissionId) -> Result<(), AgencyError> {
        self.execute(&Command::AssignCat { cat, mission }).map(drop)
    }

    // =========================================================================
    // TARGETS
    // =========================================================================

    pub fn targets(&self) -> Result<Vec<Target>, AgencyError> {
        self.store.targets()
    }

    /// Add a target to an existing mission.
    pub fn create_target(
        &mut self,
        mission: MissionId,
        fields: TargetFields,
    ) -> Result<Target, AgencyError> {
        let ids = self.execute(&Command::CreateTarget {
            mission,
            fields: fields.clone(),
        })?;
        Ok(fields.into_target(TargetId(Self::first_id(&ids)?), mission))
    }

    pub fn update_target(
        &mut self,
        id: TargetId,
        fields: TargetFields,
    ) -> Result<Target, AgencyError> {
        self.execute(&Command::UpdateTarget { target: id, fields })?;
        self.target(id)
    }

    pub fn update_notes(&mut self, id: TargetId, notes: String) -> Result<Target, AgencyError> {
        self.execute(&Command::UpdateNotes { target: id, notes })?;
        self.target(id)
    }

    pub fn delete_target(&mut self, id: TargetId) -> Result<(), AgencyError> {
        self.execute(&Command::DeleteTarget(id)).map(drop)
    }

    fn target(&self, id: TargetId) -> Result<Target, AgencyError> {
        self.store
            .target(id)?
            .ok_or(AgencyError::NotFound(EntityRef::Target(id)))
    }

    // =========================================================================
    // STATUS
    // =========================================================================

    pub fn counts(&self) -> Result<Counts, AgencyError> {
        self.store.counts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breed::BreedList;
    use crate::ledger::Ledger;
    use crate::{NewCat, Violation};

    fn engine() -> Engine<Ledger> {
        Engine::new(Ledger::new(), Enforcement::Compatible)
    }

    fn verified(name: &str) -> VerifiedCat {
        let list: BreedList = ["Siamese"].into_iter().collect();
        VerifiedCat::verify(
            NewCat {
                name: name.into(),
                years_of_experience: 2,
                breed: "Siamese".into(),
                salary: 500.0,
            },
            &list,
        )
        .expect("verify")
    }

    #[test]
    fn create_cat_assigns_identity() {
        let mut engine = engine();
        let tom = engine.create_cat(verified("Tom")).expect("create");
        let ada = engine.create_cat(verified("Ada")).expect("create");
        assert_eq!(tom.id, CatId(1));
        assert_eq!(ada.id, CatId(2));
        assert_eq!(engine.cats().expect("list").len(), 2);
    }

    #[test]
    fn update_salary_returns_stored_cat() {
        let mut engine = engine();
        engine.create_cat(verified("Tom")).expect("create");
        let cat = engine.update_salary(CatId(1), 750.5).expect("update");
        assert_eq!(cat.salary, 750.5);
        assert_eq!(cat.name, "Tom");
    }

    #[test]
    fn create_mission_reads_back_targets() {
        let mut engine = engine();
        let mission = engine
            .create_mission(NewMission {
                cat: None,
                complete: false,
                targets: vec![TargetFields::default(), TargetFields::default()],
            })
            .expect("create");
        assert_eq!(mission.id, MissionId(1));
        assert_eq!(mission.targets.len(), 2);
        assert!(mission.targets.iter().all(|t| t.mission == MissionId(1)));
    }

    #[test]
    fn rejected_command_changes_nothing() {
        let mut engine = engine();
        engine.create_cat(verified("Tom")).expect("create");
        engine
            .create_mission(NewMission {
                cat: Some(CatId(1)),
                ..NewMission::default()
            })
            .expect("create");

        let before = engine.counts().expect("counts");
        let err = engine
            .create_mission(NewMission {
                cat: Some(CatId(1)),
                targets: vec![TargetFields::default()],
                ..NewMission::default()
            })
            .expect_err("busy");
        assert!(matches!(
            err,
            AgencyError::Violation(Violation::CatHasIncompleteMission { .. })
        ));
        assert_eq!(engine.counts().expect("counts"), before);
    }

    #[test]
    fn target_lifecycle() {
        let mut engine = engine();
        engine
            .create_mission(NewMission::default())
            .expect("create");
        let target = engine
            .create_target(
                MissionId(1),
                TargetFields {
                    name: "Dr. Claw".into(),
                    ..TargetFields::default()
                },
            )
            .expect("add");
        assert_eq!(target.id, TargetId(1));

        let notes = engine
            .update_notes(target.id, "spotted".into())
            .expect("notes");
        assert_eq!(notes.notes, "spotted");

        let done = engine
            .update_target(
                target.id,
                TargetFields {
                    complete: true,
                    ..TargetFields::from(&notes)
                },
            )
            .expect("complete");
        assert!(done.complete);
        assert!(engine.delete_target(target.id).is_err());
    }

    #[test]
    fn missing_mission_lookup() {
        let engine = engine();
        assert!(matches!(
            engine.mission(MissionId(4)),
            Err(AgencyError::NotFound(EntityRef::Mission(MissionId(4))))
        ));
    }
}
