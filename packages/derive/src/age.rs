//! Age bracketing.

use velo_map_accident_models::AgeGroup;

/// Places an age into its right-open bracket.
///
/// Returns `None` for a missing age, `NaN`, or an age outside `[0, 100)`.
#[must_use]
pub fn age_group(age: Option<f64>) -> Option<AgeGroup> {
    let age = age?;
    AgeGroup::all().iter().copied().find(|group| {
        let (lower, upper) = group.bounds();
        age >= lower && age < upper
    })
}
