#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bicycle accident record, severity, and calendar types.
//!
//! This crate defines the typed row shape of the accident dataset and the
//! closed value sets (severity, day of week, age bucket) that every chart
//! groups by. The loader produces [`AccidentRecord`] values and the deriver
//! turns them into [`DerivedAccident`] values.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Outcome for the cyclist involved in an accident, from unharmed to killed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Severity {
    /// Unharmed.
    #[serde(rename = "Indemne")]
    #[strum(serialize = "Indemne")]
    Indemne,
    /// Lightly injured.
    #[serde(rename = "Blessé léger")]
    #[strum(serialize = "Blessé léger")]
    BlesseLeger,
    /// Injured and hospitalized.
    #[serde(rename = "Blessé hospitalisé")]
    #[strum(serialize = "Blessé hospitalisé")]
    BlesseHospitalise,
    /// Killed.
    #[serde(rename = "Tué")]
    #[strum(serialize = "Tué")]
    Tue,
}

impl Severity {
    /// Number of severity levels.
    pub const COUNT: usize = 4;

    /// Returns all variants in chart series order.
    #[must_use]
    pub const fn all() -> &'static [Self; Self::COUNT] {
        &[
            Self::Indemne,
            Self::BlesseLeger,
            Self::BlesseHospitalise,
            Self::Tue,
        ]
    }

    /// Parses a severity label as it appears in the dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is not one of the four known values.
    pub fn from_label(label: &str) -> Result<Self, InvalidSeverityError> {
        label
            .trim()
            .parse()
            .map_err(|_| InvalidSeverityError {
                value: label.to_string(),
            })
    }
}

/// Error returned when a `gravite` cell holds a value outside the fixed
/// severity set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSeverityError {
    /// The unrecognized label.
    pub value: String,
}

impl std::fmt::Display for InvalidSeverityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid severity '{}': expected one of Indemne, Blessé léger, Blessé hospitalisé, Tué",
            self.value
        )
    }
}

impl std::error::Error for InvalidSeverityError {}

/// Day of the week, ordered Monday first.
///
/// The derived `Ord` follows declaration order, so sorting by this type
/// always yields Lundi … Dimanche.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DayOfWeek {
    /// Monday.
    Lundi,
    /// Tuesday.
    Mardi,
    /// Wednesday.
    Mercredi,
    /// Thursday.
    Jeudi,
    /// Friday.
    Vendredi,
    /// Saturday.
    Samedi,
    /// Sunday.
    Dimanche,
}

impl DayOfWeek {
    /// Returns all variants, Monday first.
    #[must_use]
    pub const fn all() -> &'static [Self; 7] {
        &[
            Self::Lundi,
            Self::Mardi,
            Self::Mercredi,
            Self::Jeudi,
            Self::Vendredi,
            Self::Samedi,
            Self::Dimanche,
        ]
    }
}

/// Age bracket of the cyclist.
///
/// Brackets are right-open over the edges `0, 18, 30, …, 100`; see
/// [`AgeGroup::bounds`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AgeGroup {
    /// Under 18.
    #[serde(rename = "0-18")]
    #[strum(serialize = "0-18")]
    Under18,
    /// 18 up to 30.
    #[serde(rename = "19-30")]
    #[strum(serialize = "19-30")]
    From19To30,
    /// 30 up to 40.
    #[serde(rename = "31-40")]
    #[strum(serialize = "31-40")]
    From31To40,
    /// 40 up to 50.
    #[serde(rename = "41-50")]
    #[strum(serialize = "41-50")]
    From41To50,
    /// 50 up to 60.
    #[serde(rename = "51-60")]
    #[strum(serialize = "51-60")]
    From51To60,
    /// 60 up to 70.
    #[serde(rename = "61-70")]
    #[strum(serialize = "61-70")]
    From61To70,
    /// 70 up to 80.
    #[serde(rename = "71-80")]
    #[strum(serialize = "71-80")]
    From71To80,
    /// 80 up to 90.
    #[serde(rename = "81-90")]
    #[strum(serialize = "81-90")]
    From81To90,
    /// 90 up to 100.
    #[serde(rename = "91-100")]
    #[strum(serialize = "91-100")]
    From91To100,
}

impl AgeGroup {
    /// Returns all brackets in ascending age order.
    #[must_use]
    pub const fn all() -> &'static [Self; 9] {
        &[
            Self::Under18,
            Self::From19To30,
            Self::From31To40,
            Self::From41To50,
            Self::From51To60,
            Self::From61To70,
            Self::From71To80,
            Self::From81To90,
            Self::From91To100,
        ]
    }

    /// Returns the `[lower, upper)` age bounds of this bracket.
    #[must_use]
    pub const fn bounds(self) -> (f64, f64) {
        match self {
            Self::Under18 => (0.0, 18.0),
            Self::From19To30 => (18.0, 30.0),
            Self::From31To40 => (30.0, 40.0),
            Self::From41To50 => (40.0, 50.0),
            Self::From51To60 => (50.0, 60.0),
            Self::From61To70 => (60.0, 70.0),
            Self::From71To80 => (70.0, 80.0),
            Self::From81To90 => (80.0, 90.0),
            Self::From91To100 => (90.0, 100.0),
        }
    }
}

/// One accident row as loaded from the records file.
///
/// Field names follow the dataset's column headers. Categorical cells that
/// are empty in the source are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccidentRecord {
    /// Year of the accident.
    pub annee: i64,
    /// Month, 1-12 when valid. Out-of-range values are kept as read.
    pub mois: i64,
    /// Day of month.
    pub jour: i64,
    /// Time of day as `HH:MM`.
    pub hrmn: String,
    /// Pre-formatted date string carried by the source, shown in map popups.
    pub date: Option<String>,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub long: f64,
    /// Street address.
    pub adresse: Option<String>,
    /// Outcome for the cyclist.
    pub gravite: Severity,
    /// Weather conditions.
    pub meteo: Option<String>,
    /// Collision type.
    pub collision: Option<String>,
    /// Position on the road (bike lane, carriageway, …).
    pub situation: Option<String>,
    /// Trip purpose.
    pub trajet: Option<String>,
    /// Zone type (in or out of built-up area).
    pub agglomeration: Option<String>,
    /// Presence of a dedicated bike lane.
    pub voie_speciale: Option<String>,
    /// Intersection type.
    pub intersection: Option<String>,
    /// Lighting conditions.
    #[serde(rename = "éclairage")]
    pub eclairage: Option<String>,
    /// First safety equipment.
    pub secu1: Option<String>,
    /// Second safety equipment.
    pub secu2: Option<String>,
    /// Third safety equipment.
    pub secu3: Option<String>,
    /// Sex of the cyclist.
    pub sexe: Option<String>,
    /// Age of the cyclist in years.
    pub age: Option<f64>,
}

/// An [`AccidentRecord`] with its recoded categoricals and derived calendar
/// and age fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DerivedAccident {
    /// The source record, with `eclairage` and `intersection` recoded.
    pub record: AccidentRecord,
    /// Timestamp composed from `annee`, `mois`, `jour`, and `hrmn`.
    pub date_heure: NaiveDateTime,
    /// Calendar year.
    pub year: i32,
    /// Month (1-12).
    pub month: u32,
    /// Day of month.
    pub day: u32,
    /// Hour of day (0-23).
    pub hour: u32,
    /// Day of week.
    pub dayofweek: DayOfWeek,
    /// Age bracket, `None` when the age is missing or outside 0-100.
    pub age_group: Option<AgeGroup>,
}
