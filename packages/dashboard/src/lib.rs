#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard assembly for the Toulouse bicycle accident map.
//!
//! Ties the pipeline together: the configured dataset is loaded once through
//! a [`DatasetCache`], derived, aggregated into every chart, and returned as
//! a serializable [`DashboardView`] alongside the accident map.

pub mod config;
pub mod map;
pub mod view;

use serde::Serialize;
use thiserror::Error;
use velo_map_dataset::{Dataset, DatasetCache, DatasetError};
use velo_map_derive::{DeriveError, derive_all};

use crate::config::DashboardConfig;
use crate::map::{MapView, build_map};
use crate::view::{ChartView, build_charts};

/// Errors that can occur while building the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Loading the input files failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Deriving fields failed.
    #[error(transparent)]
    Derive(#[from] DeriveError),

    /// The configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// Serializing the view failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the page shows, ready for the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Records that made it into the charts.
    pub record_count: usize,
    /// Records dropped for an invalid timestamp (lenient policy only).
    pub excluded_records: usize,
    /// Clustered accident map.
    pub map: MapView,
    /// Charts, in page order.
    pub charts: Vec<ChartView>,
}

/// Builds the full view of a loaded dataset.
///
/// # Errors
///
/// Returns [`DashboardError::Derive`] if a record has an invalid timestamp
/// and the configuration asks for strict handling.
pub fn build_view(
    dataset: &Dataset,
    config: &DashboardConfig,
) -> Result<DashboardView, DashboardError> {
    let derivation = derive_all(dataset.records(), config.invalid_dates)?;
    let charts = build_charts(&derivation.accidents, &config.unreported_sex);
    let map = build_map(dataset.records(), dataset.geometry(), &config.map);

    log::info!(
        "Built dashboard from {} and {}: {} records, {} excluded, {} charts, {} markers",
        dataset.records_path().display(),
        dataset.geometry_path().display(),
        derivation.accidents.len(),
        derivation.excluded,
        charts.len(),
        map.markers.len()
    );

    Ok(DashboardView {
        record_count: derivation.accidents.len(),
        excluded_records: derivation.excluded,
        map,
        charts,
    })
}

/// A configured dashboard holding its session dataset cache.
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    cache: DatasetCache,
}

impl Dashboard {
    /// Creates a dashboard for `config` with an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the configured delimiter is not
    /// usable.
    pub fn new(config: DashboardConfig) -> Result<Self, DashboardError> {
        let cache = DatasetCache::with_loader(config.records_loader()?);
        Ok(Self { config, cache })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Renders the dashboard, reading the input files only on first use.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if loading or deriving fails.
    pub fn render(&self) -> Result<DashboardView, DashboardError> {
        let dataset = self
            .cache
            .get_or_load(&self.config.records_path, &self.config.geometry_path)?;
        build_view(&dataset, &self.config)
    }

    /// Renders the view and serializes it as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if rendering or serialization fails.
    pub fn render_json(&self) -> Result<String, DashboardError> {
        Ok(serde_json::to_string_pretty(&self.render()?)?)
    }

    /// Forgets the cached dataset so the next render reads the files again.
    pub fn reload(&self) {
        if self
            .cache
            .invalidate(&self.config.records_path, &self.config.geometry_path)
        {
            log::info!("Dropped cached dataset");
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    use velo_map_accident_models::{AccidentRecord, Severity};

    use crate::config::{DashboardConfig, MapConfig};

    pub const HEADER: &str = "annee,mois,jour,hrmn,date,lat,long,adresse,gravite,meteo,collision,situation,trajet,agglomeration,voie_speciale,intersection,éclairage,secu1,secu2,secu3,sexe,age";

    pub const GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Piste Canal du Midi" },
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[1.43, 43.61], [1.45, 43.60]]
                }
            }
        ]
    }"#;

    /// A record on Friday 2021-06-11 at 08:15 with the given severity.
    pub fn record(gravite: Severity) -> AccidentRecord {
        AccidentRecord {
            annee: 2021,
            mois: 6,
            jour: 11,
            hrmn: "08:15".to_string(),
            date: Some("11/06/2021".to_string()),
            lat: 43.6045,
            long: 1.444,
            adresse: None,
            gravite,
            meteo: None,
            collision: None,
            situation: None,
            trajet: None,
            agglomeration: None,
            voie_speciale: None,
            intersection: None,
            eclairage: None,
            secu1: None,
            secu2: None,
            secu3: None,
            sexe: None,
            age: None,
        }
    }

    /// Creates a fresh scratch directory under the system temp dir.
    pub fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("velo_map_dashboard_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Writes the records and geometry files into `dir` and returns a
    /// configuration pointing at them.
    pub fn write_inputs(dir: &Path, rows: &[&str]) -> DashboardConfig {
        let records_path = dir.join("accidents.csv");
        let geometry_path = dir.join("pistes.geojson");

        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv.push('\n');
        std::fs::write(&records_path, csv).unwrap();
        std::fs::write(&geometry_path, GEOJSON).unwrap();

        DashboardConfig {
            records_path,
            geometry_path,
            delimiter: ',',
            invalid_dates: velo_map_derive::InvalidDatePolicy::Strict,
            unreported_sex: "Non renseigné".to_string(),
            map: MapConfig {
                center: [43.6045, 1.444],
                zoom: 12,
                geometry_layer: "Pistes Cyclables".to_string(),
            },
        }
    }
}
