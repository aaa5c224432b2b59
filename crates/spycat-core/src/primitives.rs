//! # Fixed Limits
//!
//! Hardcoded runtime constants for the Spycat engine.
//! These are compiled into the binary and are immutable at runtime.

/// Wire value meaning "no cat assigned".
pub const UNASSIGNED: u64 = 0;

/// First identity handed out by a fresh store.
///
/// Identity 0 is reserved for [`UNASSIGNED`].
pub const FIRST_ID: u64 = 1;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for names, breeds and countries.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum length for target notes (64KB).
pub const MAX_NOTES_LENGTH: usize = 65536;

/// Maximum number of targets submitted with a single mission.
///
/// Bounds the size of the composite insert transaction.
pub const MAX_TARGETS_PER_MISSION: usize = 100;
