//! Categorical label recoding.
//!
//! Collapses verbose source labels into the shorter sets shown on the pie
//! charts. Each mapping is total: labels without an entry are returned
//! unchanged, and every output label maps to itself.

/// Lighting labels collapsed into "with / without lighting" at night.
const LIGHTING_RECODES: &[(&str, &str)] = &[
    ("Nuit avec éclairage public allumé", "Nuit avec éclairage"),
    ("Nuit sans éclairage public", "Nuit sans éclairage"),
    ("Nuit avec éclairage public non allumé", "Nuit sans éclairage"),
];

/// Intersection labels shortened for display.
const INTERSECTION_RECODES: &[(&str, &str)] =
    &[("Intersection à plus de 4 branches", "Plus de 4 branches")];

/// Recodes an `éclairage` (lighting) label.
#[must_use]
pub fn recode_lighting(raw: &str) -> String {
    recode(LIGHTING_RECODES, raw)
}

/// Recodes an `intersection` label.
#[must_use]
pub fn recode_intersection(raw: &str) -> String {
    recode(INTERSECTION_RECODES, raw)
}

fn recode(table: &[(&str, &str)], raw: &str) -> String {
    table
        .iter()
        .find(|(from, _)| *from == raw)
        .map_or(raw, |&(_, to)| to)
        .to_string()
}
