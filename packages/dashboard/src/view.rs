//! Chart view models for every chart on the dashboard page.
//!
//! Each chart is declared once in [`CHARTS`] (identifier, title, chart type,
//! grouped column, and which rows it reads) and computed from the derived
//! records by [`build_charts`].

use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use velo_map_accident_models::{DerivedAccident, Severity};
use velo_map_aggregate::{count_by, cross_tab_by_severity, excluding};
use velo_map_aggregate_models::{CountTable, GroupColumn, SeverityCrossTab};

/// How a chart presents its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    /// Counts over an ordered domain.
    Line,
    /// Share of each value.
    Pie,
    /// Severity series side by side for each value.
    GroupedBar,
}

/// Which records a chart reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rows {
    All,
    /// Records whose sex is reported.
    ReportedSex,
}

/// Static description of one chart.
#[derive(Debug, Clone, Copy)]
struct ChartDefinition {
    id: &'static str,
    title: &'static str,
    kind: ChartKind,
    column: GroupColumn,
    rows: Rows,
}

const fn chart(
    id: &'static str,
    title: &'static str,
    kind: ChartKind,
    column: GroupColumn,
    rows: Rows,
) -> ChartDefinition {
    ChartDefinition {
        id,
        title,
        kind,
        column,
        rows,
    }
}

/// Every chart on the page, in page order.
const CHARTS: &[ChartDefinition] = &[
    // ── Calendar ────────────────────────────────────────
    chart("year", "Nombre d'accidents par année", ChartKind::Line, GroupColumn::Year, Rows::All),
    chart("month", "Nombre d'accidents par mois", ChartKind::Line, GroupColumn::Month, Rows::All),
    chart("day", "Nombre d'accidents par jour", ChartKind::Line, GroupColumn::Day, Rows::All),
    chart(
        "dayofweek",
        "Nombre d'accidents par jour de la semaine",
        ChartKind::Line,
        GroupColumn::DayOfWeek,
        Rows::All,
    ),
    chart("hour", "Nombre d'accidents par heure", ChartKind::Line, GroupColumn::Hour, Rows::All),
    // ── Situation ───────────────────────────────────────
    chart(
        "agglomeration",
        "Accidents par zone de circulation",
        ChartKind::Pie,
        GroupColumn::Agglomeration,
        Rows::All,
    ),
    chart("meteo", "Accidents par météo", ChartKind::Pie, GroupColumn::Meteo, Rows::All),
    chart(
        "eclairage",
        "Accidents par luminosité",
        ChartKind::Pie,
        GroupColumn::Eclairage,
        Rows::All,
    ),
    // ── Severity ────────────────────────────────────────
    chart("gravite", "Accidents par gravité", ChartKind::Pie, GroupColumn::Gravite, Rows::All),
    chart(
        "severity_by_sexe",
        "Gravité des accidents par sexe",
        ChartKind::GroupedBar,
        GroupColumn::Sexe,
        Rows::ReportedSex,
    ),
    chart(
        "severity_by_age_group",
        "Gravité des accidents par tranches d'âges",
        ChartKind::GroupedBar,
        GroupColumn::AgeGroup,
        Rows::All,
    ),
    // ── Road ────────────────────────────────────────────
    chart("trajet", "Accidents par type de trajet", ChartKind::Pie, GroupColumn::Trajet, Rows::All),
    chart(
        "voie_speciale",
        "Présence de voie spéciale pour vélo",
        ChartKind::Pie,
        GroupColumn::VoieSpeciale,
        Rows::All,
    ),
    chart(
        "intersection",
        "Accidents par type d'intersection",
        ChartKind::Pie,
        GroupColumn::Intersection,
        Rows::ReportedSex,
    ),
    // ── Collision ───────────────────────────────────────
    chart(
        "collision",
        "Accidents par type de collision",
        ChartKind::Pie,
        GroupColumn::Collision,
        Rows::All,
    ),
    chart(
        "severity_by_collision",
        "Gravité des accidents par type de collision",
        ChartKind::GroupedBar,
        GroupColumn::Collision,
        Rows::All,
    ),
];

/// Aggregated data behind a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "table", rename_all = "snake_case")]
pub enum ChartData {
    /// Frequency table (line and pie charts).
    Counts(CountTable),
    /// Severity cross-tab (grouped bar charts).
    Severity(SeverityCrossTab),
}

impl ChartData {
    /// Number of records the table counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        match self {
            Self::Counts(table) => table.total(),
            Self::Severity(table) => table
                .rows
                .iter()
                .flat_map(|row| Severity::all().iter().map(|severity| row.counts.get(*severity)))
                .sum(),
        }
    }
}

/// One chart, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    /// Stable identifier, unique on the page.
    pub id: String,
    /// French title shown above the chart.
    pub title: String,
    /// Chart type.
    pub kind: ChartKind,
    /// Upper bound of the y axis for line charts: one above the largest
    /// count, so the top point's label stays inside the plot.
    pub y_max: Option<u64>,
    /// Records counted by the chart.
    pub total: u64,
    /// Aggregated table.
    pub data: ChartData,
}

/// Computes every chart from the derived records.
///
/// `unreported_sex` is the `sexe` value dropped from charts that only read
/// records with a reported sex.
#[must_use]
pub fn build_charts(accidents: &[DerivedAccident], unreported_sex: &str) -> Vec<ChartView> {
    CHARTS
        .iter()
        .map(|definition| {
            let data = match definition.rows {
                Rows::All => aggregate(definition, accidents.iter()),
                Rows::ReportedSex => aggregate(
                    definition,
                    excluding(accidents, GroupColumn::Sexe, unreported_sex),
                ),
            };
            let y_max = match (&data, definition.kind) {
                (ChartData::Counts(table), ChartKind::Line) => Some(table.max_count() + 1),
                _ => None,
            };
            let total = data.total();
            log::debug!(
                "Built chart '{}' ({}) over {total} records",
                definition.id,
                definition.kind
            );
            ChartView {
                id: definition.id.to_string(),
                title: definition.title.to_string(),
                kind: definition.kind,
                y_max,
                total,
                data,
            }
        })
        .collect()
}

fn aggregate<'a>(
    definition: &ChartDefinition,
    rows: impl IntoIterator<Item = &'a DerivedAccident>,
) -> ChartData {
    match definition.kind {
        ChartKind::Line | ChartKind::Pie => ChartData::Counts(count_by(rows, definition.column)),
        ChartKind::GroupedBar => {
            ChartData::Severity(cross_tab_by_severity(rows, definition.column))
        }
    }
}
