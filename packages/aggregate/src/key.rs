//! Typed grouping keys.
//!
//! Values are grouped on their typed form so that ordering follows the
//! column's natural order (numbers numerically, days Monday first, age
//! brackets ascending) and only become display labels at the end.

use std::fmt;

use velo_map_accident_models::{AgeGroup, DayOfWeek, DerivedAccident, Severity};
use velo_map_aggregate_models::GroupColumn;

/// One value of a [`GroupColumn`]. Keys of a single column always share a
/// variant, so the derived `Ord` is the column's natural order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum GroupKey {
    /// Calendar part (year, month, day, or hour).
    Number(i64),
    /// Day of the week.
    DayOfWeek(DayOfWeek),
    /// Age bracket.
    AgeGroup(AgeGroup),
    /// Accident severity.
    Severity(Severity),
    /// Free-text categorical label.
    Label(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::DayOfWeek(day) => write!(f, "{day}"),
            Self::AgeGroup(group) => write!(f, "{group}"),
            Self::Severity(severity) => write!(f, "{severity}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// Extracts the grouping key of `column` from a record, `None` when the
/// record has no value for it.
pub fn group_key(accident: &DerivedAccident, column: GroupColumn) -> Option<GroupKey> {
    let record = &accident.record;
    let label = |value: &Option<String>| value.clone().map(GroupKey::Label);

    match column {
        GroupColumn::Year => Some(GroupKey::Number(i64::from(accident.year))),
        GroupColumn::Month => Some(GroupKey::Number(i64::from(accident.month))),
        GroupColumn::Day => Some(GroupKey::Number(i64::from(accident.day))),
        GroupColumn::DayOfWeek => Some(GroupKey::DayOfWeek(accident.dayofweek)),
        GroupColumn::Hour => Some(GroupKey::Number(i64::from(accident.hour))),
        GroupColumn::AgeGroup => accident.age_group.map(GroupKey::AgeGroup),
        GroupColumn::Gravite => Some(GroupKey::Severity(record.gravite)),
        GroupColumn::Meteo => label(&record.meteo),
        GroupColumn::Collision => label(&record.collision),
        GroupColumn::Situation => label(&record.situation),
        GroupColumn::Trajet => label(&record.trajet),
        GroupColumn::Agglomeration => label(&record.agglomeration),
        GroupColumn::VoieSpeciale => label(&record.voie_speciale),
        GroupColumn::Intersection => label(&record.intersection),
        GroupColumn::Eclairage => label(&record.eclairage),
        GroupColumn::Secu1 => label(&record.secu1),
        GroupColumn::Secu2 => label(&record.secu2),
        GroupColumn::Secu3 => label(&record.secu3),
        GroupColumn::Sexe => label(&record.sexe),
    }
}
