//! # Breed Validation
//!
//! A cat's breed is checked once, at creation. The check itself is a
//! capability supplied by the caller; the core only defines its shape.

use crate::{AgencyError, NewCat};
use std::collections::BTreeSet;

/// Reports whether a breed name is recognized.
///
/// Implementations backed by a remote lookup must answer `false` on any
/// transport or decode failure.
pub trait BreedValidator: Send + Sync {
    fn is_recognized_breed(&self, name: &str) -> bool;
}

/// A validator backed by a fixed set of breed names.
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreedList {
    names: BTreeSet<String>,
}

impl BreedList {
    #[must_use]
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    /// A list that recognizes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Recognized names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for BreedList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into))
    }
}

impl BreedValidator for BreedList {
    fn is_recognized_breed(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// A cat draft whose fields and breed have been checked.
///
/// The only constructor is [`VerifiedCat::verify`].
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedCat(NewCat);

impl VerifiedCat {
    pub fn verify(draft: NewCat, validator: &dyn BreedValidator) -> Result<Self, AgencyError> {
        draft.validate()?;
        if !validator.is_recognized_breed(&draft.breed) {
            return Err(AgencyError::InvalidBreed(draft.breed));
        }
        Ok(Self(draft))
    }

    #[must_use]
    pub fn get(&self) -> &NewCat {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> NewCat {
        self.0
    }
}
