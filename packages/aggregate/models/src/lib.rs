#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart-ready aggregate table types.
//!
//! Frequency tables feed the line and pie charts; severity cross-tabs feed
//! the grouped bar charts. Both are keyed by a [`GroupColumn`] so a
//! misspelled column is a compile error rather than an empty chart.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use velo_map_accident_models::Severity;

/// A column of the derived records that can be grouped on.
///
/// The string form matches the dataset's column header.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupColumn {
    // ── Temporal ────────────────────────────────────────
    /// Calendar year of the accident.
    Year,
    /// Month of the year (1-12).
    Month,
    /// Day of the month.
    Day,
    /// Day of the week, Monday first.
    #[serde(rename = "dayofweek")]
    #[strum(serialize = "dayofweek")]
    DayOfWeek,
    /// Hour of the day (0-23).
    Hour,

    // ── Categorical ─────────────────────────────────────
    /// Age bracket of the cyclist.
    AgeGroup,
    /// Outcome for the cyclist.
    Gravite,
    /// Weather conditions.
    Meteo,
    /// Collision type.
    Collision,
    /// Position on the road.
    Situation,
    /// Trip purpose.
    Trajet,
    /// In or out of a built-up area.
    Agglomeration,
    /// Presence of a dedicated bike lane.
    VoieSpeciale,
    /// Intersection type, recoded.
    Intersection,
    /// Lighting conditions, recoded.
    #[serde(rename = "éclairage")]
    #[strum(serialize = "éclairage")]
    Eclairage,
    /// First safety equipment.
    Secu1,
    /// Second safety equipment.
    Secu2,
    /// Third safety equipment.
    Secu3,
    /// Sex of the cyclist.
    Sexe,
}

impl GroupColumn {
    /// Whether counts over this column are ordered by value rather than by
    /// frequency.
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(
            self,
            Self::Year | Self::Month | Self::Day | Self::DayOfWeek | Self::Hour
        )
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Year,
            Self::Month,
            Self::Day,
            Self::DayOfWeek,
            Self::Hour,
            Self::AgeGroup,
            Self::Gravite,
            Self::Meteo,
            Self::Collision,
            Self::Situation,
            Self::Trajet,
            Self::Agglomeration,
            Self::VoieSpeciale,
            Self::Intersection,
            Self::Eclairage,
            Self::Secu1,
            Self::Secu2,
            Self::Secu3,
            Self::Sexe,
        ]
    }
}

/// Number of records sharing one value of the grouped column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountRow {
    /// Display label of the value.
    pub value: String,
    /// Number of records.
    pub count: u64,
}

/// Frequency table for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountTable {
    /// Column that was grouped on.
    pub column: GroupColumn,
    /// One row per distinct value, values unique.
    pub rows: Vec<CountRow>,
}

impl CountTable {
    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|row| row.count).sum()
    }

    /// Largest single count, 0 for an empty table.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.rows.iter().map(|row| row.count).max().unwrap_or(0)
    }

    /// Count for a value label, if present.
    #[must_use]
    pub fn count_of(&self, value: &str) -> Option<u64> {
        self.rows
            .iter()
            .find(|row| row.value == value)
            .map(|row| row.count)
    }
}

/// Per-severity counts. Every severity is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// Unharmed cyclists.
    #[serde(rename = "Indemne")]
    pub indemne: u64,
    /// Lightly injured cyclists.
    #[serde(rename = "Blessé léger")]
    pub blesse_leger: u64,
    /// Hospitalized cyclists.
    #[serde(rename = "Blessé hospitalisé")]
    pub blesse_hospitalise: u64,
    /// Killed cyclists.
    #[serde(rename = "Tué")]
    pub tue: u64,
}

impl SeverityCounts {
    /// Count for one severity.
    #[must_use]
    pub const fn get(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Indemne => self.indemne,
            Severity::BlesseLeger => self.blesse_leger,
            Severity::BlesseHospitalise => self.blesse_hospitalise,
            Severity::Tue => self.tue,
        }
    }

    /// Adds one record of the given severity.
    pub const fn increment(&mut self, severity: Severity) {
        match severity {
            Severity::Indemne => self.indemne += 1,
            Severity::BlesseLeger => self.blesse_leger += 1,
            Severity::BlesseHospitalise => self.blesse_hospitalise += 1,
            Severity::Tue => self.tue += 1,
        }
    }
}

/// Severity breakdown for one value of the grouped column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityRow {
    /// Display label of the value.
    pub value: String,
    /// Counts for each severity, zero-filled.
    pub counts: SeverityCounts,
}

/// Two-way table of a column against accident severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCrossTab {
    /// Column that was grouped on.
    pub column: GroupColumn,
    /// Series headers, always all four severities in order.
    pub severities: Vec<Severity>,
    /// One row per distinct value.
    pub rows: Vec<SeverityRow>,
}

impl SeverityCrossTab {
    /// Creates a table with the full severity header and no rows.
    #[must_use]
    pub fn empty(column: GroupColumn) -> Self {
        Self {
            column,
            severities: Severity::all().to_vec(),
            rows: Vec::new(),
        }
    }

    /// Row for a value label, if present.
    #[must_use]
    pub fn row(&self, value: &str) -> Option<&SeverityRow> {
        self.rows.iter().find(|row| row.value == value)
    }
}
