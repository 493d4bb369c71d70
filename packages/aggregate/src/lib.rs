#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Frequency counts and severity cross-tabulations over derived accident
//! records.
//!
//! Both operations are pure and never fail: an empty input yields a table
//! with its headers and no rows. Neither filters its input; callers that
//! want to drop a sentinel value (such as an unreported sex) pass a
//! filtered iterator, for example via [`excluding`].

mod key;

use std::collections::BTreeMap;

use velo_map_accident_models::DerivedAccident;
use velo_map_aggregate_models::{
    CountRow, CountTable, GroupColumn, SeverityCounts, SeverityCrossTab, SeverityRow,
};

use crate::key::{GroupKey, group_key};

/// Counts records per distinct value of `column`.
///
/// Temporal columns are ordered by value (days of the week Monday first).
/// Other columns are ordered by descending count, ties kept in order of
/// first appearance. Records with no value for the column are skipped.
#[must_use]
pub fn count_by<'a>(
    records: impl IntoIterator<Item = &'a DerivedAccident>,
    column: GroupColumn,
) -> CountTable {
    let rows = if column.is_temporal() {
        count_in_value_order(records, column)
    } else {
        count_in_frequency_order(records, column)
    };

    log::debug!("count_by({column}): {} distinct values", rows.len());

    CountTable { column, rows }
}

/// Cross-tabulates `column` against severity.
///
/// Every row carries all four severity counts, zero-filled. Rows are
/// ordered by the column's natural order. Records with no value for the
/// column are skipped.
#[must_use]
pub fn cross_tab_by_severity<'a>(
    records: impl IntoIterator<Item = &'a DerivedAccident>,
    column: GroupColumn,
) -> SeverityCrossTab {
    let mut cells: BTreeMap<GroupKey, SeverityCounts> = BTreeMap::new();
    for record in records {
        if let Some(key) = group_key(record, column) {
            cells
                .entry(key)
                .or_default()
                .increment(record.record.gravite);
        }
    }

    log::debug!(
        "cross_tab_by_severity({column}): {} distinct values",
        cells.len()
    );

    let mut table = SeverityCrossTab::empty(column);
    table.rows = cells
        .into_iter()
        .map(|(key, counts)| SeverityRow {
            value: key.to_string(),
            counts,
        })
        .collect();
    table
}

/// Filters out records whose `column` value has the label `value`.
///
/// Records with no value for the column are kept.
pub fn excluding<'a>(
    records: impl IntoIterator<Item = &'a DerivedAccident>,
    column: GroupColumn,
    value: &'a str,
) -> impl Iterator<Item = &'a DerivedAccident> {
    records
        .into_iter()
        .filter(move |record| group_key(record, column).is_none_or(|key| key.to_string() != value))
}

fn count_in_value_order<'a>(
    records: impl IntoIterator<Item = &'a DerivedAccident>,
    column: GroupColumn,
) -> Vec<CountRow> {
    let mut counts: BTreeMap<GroupKey, u64> = BTreeMap::new();
    for record in records {
        if let Some(key) = group_key(record, column) {
            *counts.entry(key).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(key, count)| CountRow {
            value: key.to_string(),
            count,
        })
        .collect()
}

fn count_in_frequency_order<'a>(
    records: impl IntoIterator<Item = &'a DerivedAccident>,
    column: GroupColumn,
) -> Vec<CountRow> {
    let mut positions: BTreeMap<GroupKey, usize> = BTreeMap::new();
    let mut rows: Vec<CountRow> = Vec::new();

    for record in records {
        let Some(key) = group_key(record, column) else {
            continue;
        };
        if let Some(&position) = positions.get(&key) {
            rows[position].count += 1;
        } else {
            positions.insert(key.clone(), rows.len());
            rows.push(CountRow {
                value: key.to_string(),
                count: 1,
            });
        }
    }

    // Stable sort keeps first-appearance order among equal counts.
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}


#[cfg(test)]
mod tests {
    use super::test_support::{accident, with_collision};
    use super::*;
    use velo_map_accident_models::{AgeGroup, Severity};

    #[test]
    fn day_of_week_counts_follow_week_order() {
        // 2024-01-07 is a Sunday, 2024-01-03 a Wednesday, 2024-01-01 a Monday.
        let records = vec![
            accident((2024, 1, 7), 9, Severity::Indemne),
            accident((2024, 1, 3), 9, Severity::Indemne),
            accident((2024, 1, 7), 9, Severity::Indemne),
            accident((2024, 1, 1), 9, Severity::Indemne),
        ];

        let table = count_by(&records, GroupColumn::DayOfWeek);
        let labels: Vec<&str> = table.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(labels, vec!["Lundi", "Mercredi", "Dimanche"]);
        assert_eq!(table.count_of("Dimanche"), Some(2));
    }

    #[test]
    fn day_of_week_order_ignores_input_order() {
        let mut records: Vec<DerivedAccident> = (1..=7)
            .map(|d| accident((2024, 1, d), 9, Severity::Indemne))
            .collect();
        records.reverse();
        let table = count_by(&records, GroupColumn::DayOfWeek);
        let labels: Vec<&str> = table.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi", "Dimanche"
            ]
        );
    }

    #[test]
    fn numeric_temporal_columns_sort_numerically() {
        let records = vec![
            accident((2021, 12, 1), 17, Severity::Indemne),
            accident((2019, 2, 10), 8, Severity::Indemne),
            accident((2021, 9, 2), 17, Severity::Indemne),
        ];

        let months = count_by(&records, GroupColumn::Month);
        let labels: Vec<&str> = months.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(labels, vec!["2", "9", "12"]);

        let years = count_by(&records, GroupColumn::Year);
        assert_eq!(years.rows[0].value, "2019");
        assert_eq!(years.count_of("2021"), Some(2));

        let hours = count_by(&records, GroupColumn::Hour);
        assert_eq!(hours.rows.len(), 2);
        assert_eq!(hours.rows[0].value, "8");
        assert_eq!(hours.count_of("17"), Some(2));
    }

    #[test]
    fn categorical_counts_order_by_frequency_then_first_seen() {
        let records = vec![
            with_collision(Severity::Indemne, "Latérale"),
            with_collision(Severity::Indemne, "Frontale"),
            with_collision(Severity::Indemne, "Par l'arrière"),
            with_collision(Severity::Indemne, "Frontale"),
        ];
        let table = count_by(&records, GroupColumn::Collision);
        let rows: Vec<(&str, u64)> = table
            .rows
            .iter()
            .map(|r| (r.value.as_str(), r.count))
            .collect();
        assert_eq!(
            rows,
            vec![("Frontale", 2), ("Latérale", 1), ("Par l'arrière", 1)]
        );
    }

    #[test]
    fn missing_values_are_not_counted() {
        let mut records = vec![
            with_collision(Severity::Indemne, "Frontale"),
            accident((2021, 6, 11), 8, Severity::Indemne),
        ];
        records[1].age_group = None;
        let table = count_by(&records, GroupColumn::Collision);
        assert_eq!(table.total(), 1);
        assert!(count_by(&records, GroupColumn::AgeGroup).rows.is_empty());
    }

    #[test]
    fn severity_column_counts_labels() {
        let records = vec![
            accident((2021, 6, 11), 8, Severity::Tue),
            accident((2021, 6, 11), 8, Severity::BlesseLeger),
            accident((2021, 6, 11), 8, Severity::BlesseLeger),
        ];
        let table = count_by(&records, GroupColumn::Gravite);
        assert_eq!(table.rows[0].value, "Blessé léger");
        assert_eq!(table.count_of("Tué"), Some(1));
    }

    #[test]
    fn cross_tab_matches_three_record_scenario() {
        let records = vec![
            with_collision(Severity::Tue, "Frontale"),
            with_collision(Severity::Indemne, "Frontale"),
            with_collision(Severity::Indemne, "Latérale"),
        ];

        let table = cross_tab_by_severity(&records, GroupColumn::Collision);
        assert_eq!(table.rows.len(), 2);

        let frontale = table.row("Frontale").unwrap().counts;
        assert_eq!(frontale.get(Severity::Indemne), 1);
        assert_eq!(frontale.get(Severity::BlesseLeger), 0);
        assert_eq!(frontale.get(Severity::BlesseHospitalise), 0);
        assert_eq!(frontale.get(Severity::Tue), 1);

        let laterale = table.row("Latérale").unwrap().counts;
        assert_eq!(laterale.get(Severity::Indemne), 1);
        assert_eq!(laterale.get(Severity::BlesseLeger), 0);
        assert_eq!(laterale.get(Severity::BlesseHospitalise), 0);
        assert_eq!(laterale.get(Severity::Tue), 0);
    }

    #[test]
    fn cross_tab_zero_fills_value_seen_only_as_fatal() {
        let records = vec![
            with_collision(Severity::Tue, "Sans collision"),
            with_collision(Severity::Indemne, "Frontale"),
        ];
        let table = cross_tab_by_severity(&records, GroupColumn::Collision);
        let row = table.row("Sans collision").unwrap();
        assert_eq!(
            row.counts,
            SeverityCounts {
                indemne: 0,
                blesse_leger: 0,
                blesse_hospitalise: 0,
                tue: 1,
            }
        );
        assert_eq!(table.severities, Severity::all().to_vec());
    }

    #[test]
    fn cross_tab_orders_age_groups_by_bracket() {
        let mut old = accident((2021, 6, 11), 8, Severity::BlesseHospitalise);
        old.age_group = Some(AgeGroup::From71To80);
        let mut young = accident((2021, 6, 11), 8, Severity::Indemne);
        young.age_group = Some(AgeGroup::Under18);
        let mut mid = accident((2021, 6, 11), 8, Severity::Indemne);
        mid.age_group = Some(AgeGroup::From31To40);

        let table = cross_tab_by_severity(&[old, young, mid], GroupColumn::AgeGroup);
        let labels: Vec<&str> = table.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(labels, vec!["0-18", "31-40", "71-80"]);
    }

    #[test]
    fn empty_input_gives_empty_tables() {
        let records: Vec<DerivedAccident> = Vec::new();

        let counts = count_by(&records, GroupColumn::Meteo);
        assert_eq!(counts.column, GroupColumn::Meteo);
        assert!(counts.rows.is_empty());

        let cross = cross_tab_by_severity(&records, GroupColumn::Sexe);
        assert_eq!(cross.column, GroupColumn::Sexe);
        assert_eq!(cross.severities.len(), Severity::COUNT);
        assert!(cross.rows.is_empty());
    }

    #[test]
    fn excluding_drops_only_the_sentinel() {
        let mut records = vec![
            accident((2021, 6, 11), 8, Severity::Indemne),
            accident((2021, 6, 11), 8, Severity::Tue),
            accident((2021, 6, 11), 8, Severity::Indemne),
        ];
        records[0].record.sexe = Some("Masculin".to_string());
        records[1].record.sexe = Some("Non renseigné".to_string());

        let kept: Vec<&DerivedAccident> =
            excluding(&records, GroupColumn::Sexe, "Non renseigné").collect();
        assert_eq!(kept.len(), 2);

        let table = cross_tab_by_severity(
            excluding(&records, GroupColumn::Sexe, "Non renseigné"),
            GroupColumn::Sexe,
        );
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].value, "Masculin");
    }

    #[test]
    fn aggregation_does_not_filter_sentinels() {
        let mut records = vec![accident((2021, 6, 11), 8, Severity::Indemne)];
        records[0].record.sexe = Some("Non renseigné".to_string());
        let table = count_by(&records, GroupColumn::Sexe);
        assert_eq!(table.count_of("Non renseigné"), Some(1));
    }
}
