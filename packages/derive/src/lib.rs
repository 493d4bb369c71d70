#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived fields for accident records.
//!
//! Turns loaded [`AccidentRecord`] values into [`DerivedAccident`] values:
//! a composed timestamp with its calendar parts, the day of week, the age
//! bracket, and the lighting and intersection labels collapsed into the
//! reduced sets the charts use. Everything here is a pure function of its
//! input, so deriving the records carried by a previous derivation gives the
//! same output again.

pub mod age;
pub mod recode;
pub mod temporal;

use chrono::{Datelike as _, Timelike as _};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;
use velo_map_accident_models::{AccidentRecord, DerivedAccident};

pub use age::age_group;
pub use recode::{recode_intersection, recode_lighting};
pub use temporal::{compose_date_heure, day_of_week};

/// Errors that can occur while deriving fields.
#[derive(Debug, Error)]
pub enum DeriveError {
    /// A record's year, month, day, and time do not form a valid timestamp.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of what went wrong.
        message: String,
    },
}

/// What to do with records whose timestamp cannot be composed.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InvalidDatePolicy {
    /// Fail the whole derivation on the first invalid record.
    #[default]
    Strict,
    /// Drop invalid records and report how many were dropped.
    Lenient,
}

/// Output of [`derive_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    /// Derived records, in input order.
    pub accidents: Vec<DerivedAccident>,
    /// Records dropped under [`InvalidDatePolicy::Lenient`]. Always 0 under
    /// [`InvalidDatePolicy::Strict`].
    pub excluded: usize,
}

/// Derives every field for a single record.
///
/// # Errors
///
/// Returns [`DeriveError::InvalidDate`] if the record's date parts and time
/// do not compose into a valid timestamp.
pub fn derive(record: &AccidentRecord) -> Result<DerivedAccident, DeriveError> {
    let date_heure = compose_date_heure(record.annee, record.mois, record.jour, &record.hrmn)?;

    let mut record = record.clone();
    record.eclairage = record.eclairage.as_deref().map(recode_lighting);
    record.intersection = record.intersection.as_deref().map(recode_intersection);

    Ok(DerivedAccident {
        date_heure,
        year: date_heure.year(),
        month: date_heure.month(),
        day: date_heure.day(),
        hour: date_heure.hour(),
        dayofweek: day_of_week(date_heure.date()),
        age_group: age_group(record.age),
        record,
    })
}

/// Derives every record, applying `policy` to records with invalid dates.
///
/// # Errors
///
/// Under [`InvalidDatePolicy::Strict`], returns [`DeriveError::InvalidDate`]
/// naming the first offending row (1-based). Never fails under
/// [`InvalidDatePolicy::Lenient`].
pub fn derive_all(
    records: &[AccidentRecord],
    policy: InvalidDatePolicy,
) -> Result<Derivation, DeriveError> {
    let mut accidents = Vec::with_capacity(records.len());
    let mut excluded = 0;

    for (index, record) in records.iter().enumerate() {
        match derive(record) {
            Ok(accident) => accidents.push(accident),
            Err(DeriveError::InvalidDate { message }) => match policy {
                InvalidDatePolicy::Strict => {
                    return Err(DeriveError::InvalidDate {
                        message: format!("row {}: {message}", index + 1),
                    });
                }
                InvalidDatePolicy::Lenient => {
                    log::debug!("Excluding row {}: {message}", index + 1);
                    excluded += 1;
                }
            },
        }
    }

    if excluded > 0 {
        log::warn!("Excluded {excluded} records with invalid dates");
    }
    log::info!("Derived fields for {} records", accidents.len());

    Ok(Derivation {
        accidents,
        excluded,
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;
    use velo_map_accident_models::{AgeGroup, DayOfWeek};

    #[test]
    fn derives_calendar_fields() {
        let derived = derive(&record()).unwrap();
        assert_eq!(derived.date_heure.to_string(), "2021-06-11 08:15:00");
        assert_eq!(derived.year, 2021);
        assert_eq!(derived.month, 6);
        assert_eq!(derived.day, 11);
        assert_eq!(derived.hour, 8);
        assert_eq!(derived.dayofweek, DayOfWeek::Vendredi);
        assert_eq!(derived.age_group, None);
    }

    #[test]
    fn recodes_categoricals_and_buckets_age() {
        let mut input = record();
        input.eclairage = Some("Nuit avec éclairage public non allumé".to_string());
        input.intersection = Some("Intersection à plus de 4 branches".to_string());
        input.age = Some(45.0);

        let derived = derive(&input).unwrap();
        assert_eq!(
            derived.record.eclairage.as_deref(),
            Some("Nuit sans éclairage")
        );
        assert_eq!(
            derived.record.intersection.as_deref(),
            Some("Plus de 4 branches")
        );
        assert_eq!(derived.age_group, Some(AgeGroup::From41To50));
        assert_eq!(input.eclairage.as_deref(), Some("Nuit avec éclairage public non allumé"));
    }

    #[test]
    fn rederiving_is_idempotent() {
        let mut a = record();
        a.eclairage = Some("Nuit avec éclairage public allumé".to_string());
        a.intersection = Some("Intersection à plus de 4 branches".to_string());
        a.age = Some(18.0);
        let mut b = record();
        b.eclairage = Some("Plein jour".to_string());
        b.hrmn = "23:59".to_string();

        let first = derive_all(&[a, b], InvalidDatePolicy::Strict).unwrap();
        let carried: Vec<AccidentRecord> =
            first.accidents.iter().map(|d| d.record.clone()).collect();
        let second = derive_all(&carried, InvalidDatePolicy::Strict).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn strict_policy_fails_on_invalid_date() {
        let mut bad = record();
        bad.mois = 2;
        bad.jour = 30;
        let err = derive_all(&[record(), bad], InvalidDatePolicy::Strict).unwrap_err();
        let DeriveError::InvalidDate { message } = err;
        assert!(message.starts_with("row 2:"), "{message}");
    }

    #[test]
    fn lenient_policy_excludes_and_counts() {
        let mut bad_date = record();
        bad_date.jour = 31;
        let mut bad_time = record();
        bad_time.hrmn = "25:00".to_string();
        let mut negative_month = record();
        negative_month.mois = -1;

        let derivation = derive_all(
            &[record(), bad_date, record(), bad_time, negative_month],
            InvalidDatePolicy::Lenient,
        )
        .unwrap();
        assert_eq!(derivation.accidents.len(), 2);
        assert_eq!(derivation.excluded, 3);
    }

    #[test]
    fn empty_input_derives_to_empty_output() {
        let derivation = derive_all(&[], InvalidDatePolicy::Strict).unwrap();
        assert!(derivation.accidents.is_empty());
        assert_eq!(derivation.excluded, 0);
    }

    #[test]
    fn policy_parses_from_config_labels() {
        assert_eq!("strict".parse::<InvalidDatePolicy>().unwrap(), InvalidDatePolicy::Strict);
        assert_eq!("lenient".parse::<InvalidDatePolicy>().unwrap(), InvalidDatePolicy::Lenient);
        assert_eq!(InvalidDatePolicy::default(), InvalidDatePolicy::Strict);
    }
}
