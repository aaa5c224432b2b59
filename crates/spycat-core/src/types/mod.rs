//! # Core Type Definitions
//!
//! This module contains all core types for the Spycat agency domain:
//! - Identifiers (`CatId`, `MissionId`, `TargetId`)
//! - Entities (`Cat`, `MissionRecord`, `Mission`, `Target`)
//! - Drafts accepted by the engine (`NewCat`, `NewMission`, `TargetFields`)
//! - Error types (`AgencyError`, `Violation`, `ErrorKind`)
//!
//! ## Identity Guarantees
//!
//! - Identifiers are allocated from persisted counters starting at 1
//! - Identity `0` is never allocated; on the wire it means "unassigned"
//! - All identifiers implement `Ord` for deterministic ordering in `BTreeMap`

use crate::primitives::{
    MAX_NAME_LENGTH, MAX_NOTES_LENGTH, MAX_TARGETS_PER_MISSION, UNASSIGNED,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identity of a field agent (a cat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CatId(pub u64);

/// Identity of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MissionId(pub u64);

/// Identity of a target within a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u64);

impl CatId {
    /// Interpret a wire value where `0` means "no cat".
    #[must_use]
    pub const fn from_wire(raw: u64) -> Option<Self> {
        if raw == UNASSIGNED {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Encode an optional cat reference for the wire (`None` becomes `0`).
    #[must_use]
    pub fn to_wire(cat: Option<Self>) -> u64 {
        cat.map_or(UNASSIGNED, |c| c.0)
    }
}

impl fmt::Display for CatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reference to any stored entity, used in `NotFound` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Cat(CatId),
    Mission(MissionId),
    Target(TargetId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cat(id) => write!(f, "Cat {}", id),
            Self::Mission(id) => write!(f, "Mission {}", id),
            Self::Target(id) => write!(f, "Target {}", id),
        }
    }
}

// =============================================================================
// CAT
// =============================================================================

/// A field agent.
///
/// The breed is checked against the breed catalog once, at creation.
/// Only the salary changes afterwards; cats are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cat {
    pub id: CatId,
    pub name: String,
    pub years_of_experience: u32,
    pub breed: String,
    pub salary: f64,
}

/// A cat that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCat {
    pub name: String,
    pub years_of_experience: u32,
    pub breed: String,
    pub salary: f64,
}

impl NewCat {
    /// Check field shapes. Breed recognition is a separate step.
    pub fn validate(&self) -> Result<(), AgencyError> {
        if self.name.trim().is_empty() {
            return Err(AgencyError::Validation("Cat name must not be empty".into()));
        }
        check_length("name", &self.name, MAX_NAME_LENGTH)?;
        check_length("breed", &self.breed, MAX_NAME_LENGTH)?;
        validate_salary(self.salary)
    }

    /// Attach an identity after insertion.
    #[must_use]
    pub fn into_cat(self, id: CatId) -> Cat {
        Cat {
            id,
            name: self.name,
            years_of_experience: self.years_of_experience,
            breed: self.breed,
            salary: self.salary,
        }
    }
}

/// Salaries must be finite and non-negative.
pub fn validate_salary(salary: f64) -> Result<(), AgencyError> {
    if !salary.is_finite() || salary < 0.0 {
        return Err(AgencyError::Validation(format!(
            "Salary must be a non-negative number, got {}",
            salary
        )));
    }
    Ok(())
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), AgencyError> {
    if value.len() > max {
        return Err(AgencyError::Validation(format!(
            "Field '{}' length {} exceeds maximum {} bytes",
            field,
            value.len(),
            max
        )));
    }
    Ok(())
}

// =============================================================================
// TARGET
// =============================================================================

/// A sub-task owned by exactly one mission.
///
/// `mission` is fixed at creation. Once `complete` is true the target
/// is terminal: no field may change and it may not be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub mission: MissionId,
    pub name: String,
    pub country: String,
    pub notes: String,
    pub complete: bool,
}

/// The writable fields of a target.
///
/// Used both for creation and for the full-overwrite update path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFields {
    pub name: String,
    pub country: String,
    pub notes: String,
    pub complete: bool,
}

impl TargetFields {
    pub fn validate(&self) -> Result<(), AgencyError> {
        check_length("name", &self.name, MAX_NAME_LENGTH)?;
        check_length("country", &self.country, MAX_NAME_LENGTH)?;
        validate_notes(&self.notes)
    }

    #[must_use]
    pub fn into_target(self, id: TargetId, mission: MissionId) -> Target {
        Target {
            id,
            mission,
            name: self.name,
            country: self.country,
            notes: self.notes,
            complete: self.complete,
        }
    }
}

impl From<&Target> for TargetFields {
    fn from(target: &Target) -> Self {
        Self {
            name: target.name.clone(),
            country: target.country.clone(),
            notes: target.notes.clone(),
            complete: target.complete,
        }
    }
}

pub fn validate_notes(notes: &str) -> Result<(), AgencyError> {
    check_length("notes", notes, MAX_NOTES_LENGTH)
}

// =============================================================================
// MISSION
// =============================================================================

/// A persisted mission row, without its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionRecord {
    pub id: MissionId,
    /// The assigned cat. `None` means unassigned.
    pub cat: Option<CatId>,
    /// Monotonic on the completion path: false to true, never back.
    pub complete: bool,
}

/// A mission together with its targets, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub cat: Option<CatId>,
    pub complete: bool,
    pub targets: Vec<Target>,
}

impl Mission {
    #[must_use]
    pub fn from_record(record: MissionRecord, targets: Vec<Target>) -> Self {
        Self {
            id: record.id,
            cat: record.cat,
            complete: record.complete,
            targets,
        }
    }
}

/// A mission that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMission {
    pub cat: Option<CatId>,
    pub complete: bool,
    pub targets: Vec<TargetFields>,
}

impl NewMission {
    pub fn validate(&self) -> Result<(), AgencyError> {
        if self.targets.len() > MAX_TARGETS_PER_MISSION {
            return Err(AgencyError::Validation(format!(
                "Mission has {} targets, maximum is {}",
                self.targets.len(),
                MAX_TARGETS_PER_MISSION
            )));
        }
        self.targets.iter().try_for_each(TargetFields::validate)
    }
}

/// Row counts across the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub cats: usize,
    pub missions: usize,
    pub incomplete_missions: usize,
    pub targets: usize,
    pub complete_targets: usize,
}

// =============================================================================
// RULE VIOLATIONS
// =============================================================================

/// The operation that ran into a completed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddTarget,
    AssignCat,
    UpdateTarget,
    UpdateNotes,
    DeleteTarget,
}

/// A lifecycle rule that blocked an otherwise well-formed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The cat is already the assignee of an incomplete mission.
    CatHasIncompleteMission { cat: CatId, mission: MissionId },
    /// Assigned missions cannot be deleted.
    MissionAssigned { mission: MissionId, cat: CatId },
    /// Completing a completed mission is rejected, not ignored.
    MissionAlreadyComplete { mission: MissionId },
    /// A completed mission cannot be reopened (strict enforcement only).
    CompletionReversal { mission: MissionId },
    /// The owning mission is complete.
    CompletedMission { mission: MissionId, action: Action },
    /// The target itself is complete.
    CompletedTarget { target: TargetId, action: Action },
}

impl Violation {
    /// Violations the HTTP surface reports as `400` rather than `403`.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::CatHasIncompleteMission { .. } | Self::MissionAssigned { .. }
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatHasIncompleteMission { .. } => {
                write!(f, "Cat already has an incomplete mission")
            }
            Self::MissionAssigned { .. } => write!(
                f,
                "Mission cannot be deleted because it is assigned to a cat"
            ),
            Self::MissionAlreadyComplete { .. } => write!(f, "Mission is already completed"),
            Self::CompletionReversal { .. } => write!(f, "Cannot reopen a completed mission"),
            Self::CompletedMission { action, .. } => match action {
                Action::AddTarget => write!(f, "Cannot add a target to a completed mission"),
                Action::AssignCat => write!(f, "Cannot assign a cat to a completed mission"),
                Action::UpdateTarget => write!(f, "Cannot update a target in a completed mission"),
                Action::UpdateNotes => {
                    write!(f, "Cannot update notes for a target in a completed mission")
                }
                Action::DeleteTarget => {
                    write!(f, "Cannot delete a target from a completed mission")
                }
            },
            Self::CompletedTarget { action, .. } => match action {
                Action::UpdateNotes => write!(f, "Cannot update notes for a completed target"),
                Action::DeleteTarget => write!(f, "Cannot delete a completed target"),
                _ => write!(f, "Cannot update a completed target"),
            },
        }
    }
}

impl std::error::Error for Violation {}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// The closed set of error kinds surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    InvariantViolation,
    Storage,
    RateLimited,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::InvariantViolation => "invariant_violation",
            Self::Storage => "storage",
            Self::RateLimited => "rate_limited",
        }
    }
}

/// Errors that can occur in the Spycat engine.
///
/// - No silent failures
/// - Use `Result<T, AgencyError>` for fallible operations
/// - The engine never panics; all errors are recoverable
#[derive(Debug, Error)]
pub enum AgencyError {
    /// The payload is malformed or out of bounds.
    #[error("{0}")]
    Validation(String),

    /// The breed is not in the recognized list (or the list was unavailable).
    #[error("Invalid breed")]
    InvalidBreed(String),

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(EntityRef),

    /// A lifecycle rule rejected the operation.
    #[error("{0}")]
    Violation(#[from] Violation),

    /// The storage layer failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored row could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

impl AgencyError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidBreed(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Violation(_) => ErrorKind::InvariantViolation,
            Self::Storage(_) | Self::Serialization(_) | Self::Io(_) => ErrorKind::Storage,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
