//! Cat rules: creation and salary.

use super::require_cat;
use crate::breed::VerifiedCat;
use crate::effect::Effect;
use crate::ledger::AgencyStore;
use crate::{AgencyError, CatId, validate_salary};

/// A verified cat is always insertable.
pub fn create(cat: &VerifiedCat) -> Vec<Effect> {
    vec![Effect::InsertCat(cat.get().clone())]
}

/// Salary may change at any time, whatever the cat's missions.
pub fn update_salary<S: AgencyStore + ?Sized>(
    store: &S,
    cat: CatId,
    salary: f64,
) -> Result<Vec<Effect>, AgencyError> {
    validate_salary(salary)?;
    require_cat(store, cat)?;
    Ok(vec![Effect::SetSalary { cat, salary }])
}
