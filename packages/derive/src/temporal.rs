//! Timestamp composition and day-of-week labelling.

use chrono::{Datelike as _, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use velo_map_accident_models::DayOfWeek;

use crate::DeriveError;

/// Time-of-day formats accepted for `hrmn`, tried in order.
const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S"];

/// Composes a timestamp from the dataset's year, month, day, and `HH:MM`
/// time columns.
///
/// # Errors
///
/// Returns [`DeriveError::InvalidDate`] if the calendar date does not exist
/// (including negative or overflowing parts) or `hrmn` is not a valid time
/// of day.
pub fn compose_date_heure(
    annee: i64,
    mois: i64,
    jour: i64,
    hrmn: &str,
) -> Result<NaiveDateTime, DeriveError> {
    let date = i32::try_from(annee)
        .ok()
        .zip(u32::try_from(mois).ok())
        .zip(u32::try_from(jour).ok())
        .and_then(|((year, month), day)| NaiveDate::from_ymd_opt(year, month, day))
        .ok_or_else(|| DeriveError::InvalidDate {
            message: format!("{annee}-{mois}-{jour} is not a calendar date"),
        })?;

    let hrmn = hrmn.trim();
    let time = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(hrmn, format).ok())
        .ok_or_else(|| DeriveError::InvalidDate {
            message: format!("'{hrmn}' is not a time of day"),
        })?;

    Ok(date.and_time(time))
}

/// Returns the French day-of-week label for a date.
#[must_use]
pub fn day_of_week(date: NaiveDate) -> DayOfWeek {
    match date.weekday() {
        Weekday::Mon => DayOfWeek::Lundi,
        Weekday::Tue => DayOfWeek::Mardi,
        Weekday::Wed => DayOfWeek::Mercredi,
        Weekday::Thu => DayOfWeek::Jeudi,
        Weekday::Fri => DayOfWeek::Vendredi,
        Weekday::Sat => DayOfWeek::Samedi,
        Weekday::Sun => DayOfWeek::Dimanche,
    }
}
