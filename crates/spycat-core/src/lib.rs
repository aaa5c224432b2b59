//! # spycat-core
//!
//! The mission-lifecycle Invariant Engine for Spycat - THE RULES.
//!
//! This crate decides when cats, missions and targets may be created,
//! mutated or deleted, and applies each permitted decision to a store as
//! one atomic commit.
//!
//! ## Layers
//!
//! - `types`: identities, entities, drafts and the closed error set
//! - `rules`: pure decision functions producing `Effect`s
//! - `ledger` / `storage`: the `AgencyStore` gateway and its backends
//! - `engine`: decide-then-commit, one method per operation
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - Never logs; every failure is a returned `AgencyError`
//! - Breed recognition is injected through `BreedValidator`

// =============================================================================
// MODULES
// =============================================================================

pub mod breed;
pub mod effect;
pub mod engine;
pub mod ledger;
pub mod primitives;
pub mod rules;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Action, AgencyError, Cat, CatId, Counts, EntityRef, ErrorKind, Mission, MissionId,
    MissionRecord, NewCat, NewMission, Target, TargetFields, TargetId, Violation, validate_notes,
    validate_salary,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use breed::{BreedList, BreedValidator, VerifiedCat};
pub use effect::{Effect, MissionRef};
pub use engine::Engine;
pub use ledger::{AgencyStore, Ledger};
pub use rules::{Command, Enforcement};
pub use storage::{RedbLedger, StorageBackend};
