//! # redb-backed Agency Storage
//!
//! A disk-backed store using the redb embedded database, providing:
//! - ACID transactions (a commit is exactly one redb write transaction)
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//! - Zero configuration
//!
//! Rows are postcard-encoded. A `(mission, target)` index table makes
//! per-mission target scans a range query instead of a full scan.

use crate::effect::Effect;
use crate::ledger::{AgencyStore, advance};
use crate::primitives::FIRST_ID;
use crate::{
    AgencyError, Cat, CatId, EntityRef, MissionId, MissionRecord, Target, TargetId,
};
use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, Table, TableDefinition,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

type RowTable = TableDefinition<'static, u64, &'static [u8]>;

/// Table for cats: CatId(u64) -> serialized Cat bytes
const CATS: RowTable = TableDefinition::new("cats");

/// Table for missions: MissionId(u64) -> serialized MissionRecord bytes
const MISSIONS: RowTable = TableDefinition::new("missions");

/// Table for targets: TargetId(u64) -> serialized Target bytes
const TARGETS: RowTable = TableDefinition::new("targets");

/// Ownership index: (mission_id, target_id) -> ()
const MISSION_TARGETS: TableDefinition<(u64, u64), ()> = TableDefinition::new("mission_targets");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const NEXT_CAT_ID: &str = "next_cat_id";
const NEXT_MISSION_ID: &str = "next_mission_id";
const NEXT_TARGET_ID: &str = "next_target_id";

fn storage(e: impl std::fmt::Display) -> AgencyError {
    AgencyError::Storage(e.to_string())
}

fn encode<T: Serialize>(row: &T) -> Result<Vec<u8>, AgencyError> {
    postcard::to_allocvec(row).map_err(|e| AgencyError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AgencyError> {
    postcard::from_bytes(bytes).map_err(|e| AgencyError::Serialization(e.to_string()))
}

fn fetch<T: DeserializeOwned>(
    table: &impl ReadableTable<u64, &'static [u8]>,
    id: u64,
) -> Result<Option<T>, AgencyError> {
    match table.get(id).map_err(storage)? {
        Some(data) => decode(data.value()).map(Some),
        None => Ok(None),
    }
}

fn put<T: Serialize>(
    table: &mut Table<'_, u64, &'static [u8]>,
    id: u64,
    row: &T,
) -> Result<(), AgencyError> {
    let bytes = encode(row)?;
    table.insert(id, bytes.as_slice()).map_err(storage)?;
    Ok(())
}

fn counter(table: &impl ReadableTable<&'static str, u64>, key: &str) -> Result<u64, AgencyError> {
    Ok(table
        .get(key)
        .map_err(storage)?
        .map(|v| v.value())
        .unwrap_or(FIRST_ID))
}

fn owned_targets(
    index: &impl ReadableTable<(u64, u64), ()>,
    mission: MissionId,
) -> Result<Vec<u64>, AgencyError> {
    let mut ids = Vec::new();
    for entry in index
        .range((mission.0, 0u64)..=(mission.0, u64::MAX))
        .map_err(storage)?
    {
        let (key, _) = entry.map_err(storage)?;
        ids.push(key.value().1);
    }
    Ok(ids)
}

/// A disk-backed agency store using redb.
pub struct RedbLedger {
    /// The redb database handle.
    db: Database,
    /// Where the database file lives.
    path: PathBuf,
}

impl std::fmt::Debug for RedbLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbLedger")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RedbLedger {
    /// Open or create an agency database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AgencyError> {
        let db = Database::create(path.as_ref()).map_err(|e| AgencyError::Io(e.to_string()))?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(storage)?;
            let _ = write_txn.open_table(CATS).map_err(storage)?;
            let _ = write_txn.open_table(MISSIONS).map_err(storage)?;
            let _ = write_txn.open_table(TARGETS).map_err(storage)?;
            let _ = write_txn.open_table(MISSION_TARGETS).map_err(storage)?;
            let _ = write_txn.open_table(METADATA).map_err(storage)?;
            write_txn.commit().map_err(storage)?;
        }

        Ok(Self {
            db,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Location of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn row<T: DeserializeOwned>(&self, def: RowTable, id: u64) -> Result<Option<T>, AgencyError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(def).map_err(storage)?;
        fetch(&table, id)
    }

    fn scan<T: DeserializeOwned>(&self, def: RowTable) -> Result<Vec<T>, AgencyError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let table = read_txn.open_table(def).map_err(storage)?;

        let mut rows = Vec::with_capacity(table.len().map_err(storage)? as usize);
        for entry in table.iter().map_err(storage)? {
            let (_, value) = entry.map_err(storage)?;
            rows.push(decode(value.value())?);
        }
        Ok(rows)
    }
}

// =============================================================================
// AGENCYSTORE TRAIT IMPLEMENTATION
// =============================================================================

impl AgencyStore for RedbLedger {
    fn cat(&self, id: CatId) -> Result<Option<Cat>, AgencyError> {
        self.row(CATS, id.0)
    }

    fn cats(&self) -> Result<Vec<Cat>, AgencyError> {
        self.scan(CATS)
    }

    fn mission(&self, id: MissionId) -> Result<Option<MissionRecord>, AgencyError> {
        self.row(MISSIONS, id.0)
    }

    fn missions(&self) -> Result<Vec<MissionRecord>, AgencyError> {
        self.scan(MISSIONS)
    }

    fn target(&self, id: TargetId) -> Result<Option<Target>, AgencyError> {
        self.row(TARGETS, id.0)
    }

    fn targets(&self) -> Result<Vec<Target>, AgencyError> {
        self.scan(TARGETS)
    }

    fn targets_of(&self, mission: MissionId) -> Result<Vec<Target>, AgencyError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let index = read_txn.open_table(MISSION_TARGETS).map_err(storage)?;
        let targets = read_txn.open_table(TARGETS).map_err(storage)?;

        let mut owned = Vec::new();
        for id in owned_targets(&index, mission)? {
            if let Some(target) = fetch::<Target>(&targets, id)? {
                owned.push(target);
            }
        }
        Ok(owned)
    }

    /// Apply all effects inside one redb write transaction.
    ///
    /// On any error the transaction is dropped uncommitted, which aborts
    /// every write made so far in the batch.
    fn commit(&mut self, effects: &[Effect]) -> Result<Vec<u64>, AgencyError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        let mut ids = Vec::new();

        {
            let mut cats = write_txn.open_table(CATS).map_err(storage)?;
            let mut missions = write_txn.open_table(MISSIONS).map_err(storage)?;
            let mut targets = write_txn.open_table(TARGETS).map_err(storage)?;
            let mut index = write_txn.open_table(MISSION_TARGETS).map_err(storage)?;
            let mut meta = write_txn.open_table(METADATA).map_err(storage)?;

            let mut next_cat = counter(&meta, NEXT_CAT_ID)?;
            let mut next_mission = counter(&meta, NEXT_MISSION_ID)?;
            let mut next_target = counter(&meta, NEXT_TARGET_ID)?;
            let mut inserted: Option<MissionId> = None;

            for effect in effects {
                match effect {
                    Effect::InsertCat(draft) => {
                        let id = CatId(next_cat);
                        next_cat = advance(next_cat, "cat")?;
                        put(&mut cats, id.0, &draft.clone().into_cat(id))?;
                        ids.push(id.0);
                    }
                    Effect::SetSalary { cat, salary } => {
                        let mut row: Cat = fetch(&cats, cat.0)?
                            .ok_or(AgencyError::NotFound(EntityRef::Cat(*cat)))?;
                        row.salary = *salary;
                        put(&mut cats, cat.0, &row)?;
                    }
                    Effect::InsertMission { cat, complete } => {
                        let id = MissionId(next_mission);
                        next_mission = advance(next_mission, "mission")?;
                        let row = MissionRecord {
                            id,
                            cat: *cat,
                            complete: *complete,
                        };
                        put(&mut missions, id.0, &row)?;
                        inserted = Some(id);
                        ids.push(id.0);
                    }
                    Effect::WriteMission {
                        mission,
                        cat,
                        complete,
                    } => {
                        let mut row = mission_row(&missions, *mission)?;
                        row.cat = *cat;
                        row.complete = *complete;
                        put(&mut missions, mission.0, &row)?;
                    }
                    Effect::SetMissionCat { mission, cat } => {
                        let mut row = mission_row(&missions, *mission)?;
                        row.cat = Some(*cat);
                        put(&mut missions, mission.0, &row)?;
                    }
                    Effect::CompleteMission(mission) => {
                        let mut row = mission_row(&missions, *mission)?;
                        row.complete = true;
                        put(&mut missions, mission.0, &row)?;
                    }
                    Effect::DeleteMission(mission) => {
                        if missions.remove(mission.0).map_err(storage)?.is_none() {
                            return Err(AgencyError::NotFound(EntityRef::Mission(*mission)));
                        }
                        for target in owned_targets(&index, *mission)? {
                            targets.remove(target).map_err(storage)?;
                            index.remove((mission.0, target)).map_err(storage)?;
                        }
                    }
                    Effect::InsertTarget { mission, fields } => {
                        let owner = mission.resolve(inserted)?;
                        mission_row(&missions, owner)?;
                        let id = TargetId(next_target);
                        next_target = advance(next_target, "target")?;
                        put(&mut targets, id.0, &fields.clone().into_target(id, owner))?;
                        index.insert((owner.0, id.0), ()).map_err(storage)?;
                        ids.push(id.0);
                    }
                    Effect::WriteTarget { target, fields } => {
                        let mut row = target_row(&targets, *target)?;
                        row.name.clone_from(&fields.name);
                        row.country.clone_from(&fields.country);
                        row.notes.clone_from(&fields.notes);
                        row.complete = fields.complete;
                        put(&mut targets, target.0, &row)?;
                    }
                    Effect::SetNotes { target, notes } => {
                        let mut row = target_row(&targets, *target)?;
                        row.notes.clone_from(notes);
                        put(&mut targets, target.0, &row)?;
                    }
                    Effect::DeleteTarget(target) => {
                        let row = target_row(&targets, *target)?;
                        targets.remove(target.0).map_err(storage)?;
                        index
                            .remove((row.mission.0, target.0))
                            .map_err(storage)?;
                    }
                }
            }

            meta.insert(NEXT_CAT_ID, next_cat).map_err(storage)?;
            meta.insert(NEXT_MISSION_ID, next_mission)
                .map_err(storage)?;
            meta.insert(NEXT_TARGET_ID, next_target).map_err(storage)?;
        }

        write_txn.commit().map_err(storage)?;
        Ok(ids)
    }
}

fn mission_row(
    table: &impl ReadableTable<u64, &'static [u8]>,
    id: MissionId,
) -> Result<MissionRecord, AgencyError> {
    fetch(table, id.0)?.ok_or(AgencyError::NotFound(EntityRef::Mission(id)))
}

fn target_row(
    table: &impl ReadableTable<u64, &'static [u8]>,
    id: TargetId,
) -> Result<Target, AgencyError> {
    fetch(table, id.0)?.ok_or(AgencyError::NotFound(EntityRef::Target(id)))
}

// =============================================================================
// TESTS
// =============================================================================
