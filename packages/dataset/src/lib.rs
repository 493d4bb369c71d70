#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident records and bike-lane geometry loading.
//!
//! Reads the delimited accident file into typed [`AccidentRecord`] values
//! (normalizing comma decimal separators in coordinates) and the `GeoJSON`
//! overlay into a [`BoundaryGeometry`]. [`DatasetCache`] keeps each loaded
//! pair in memory for the rest of the session so every view reads the same
//! data without touching the disk again.

pub mod cache;
pub mod geometry;
pub mod records;

use std::path::{Path, PathBuf};

use thiserror::Error;
use velo_map_accident_models::AccidentRecord;

pub use cache::DatasetCache;
pub use geometry::BoundaryGeometry;
pub use records::{RecordsLoader, normalize_lat_long};

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// An input file could not be read.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// File that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The records file is not valid delimited text.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Input was readable but does not match the expected data shape.
    #[error("Data format error: {message}")]
    DataFormat {
        /// Description of what went wrong.
        message: String,
    },
}

/// Accident records paired with the bike-lane overlay they are shown on.
#[derive(Debug, Clone)]
pub struct Dataset {
    records_path: PathBuf,
    geometry_path: PathBuf,
    records: Vec<AccidentRecord>,
    geometry: BoundaryGeometry,
}

impl Dataset {
    /// Path the records were read from.
    #[must_use]
    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    /// Path the geometry was read from.
    #[must_use]
    pub fn geometry_path(&self) -> &Path {
        &self.geometry_path
    }

    /// Loaded accident records, in file order.
    #[must_use]
    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    /// Loaded bike-lane overlay.
    #[must_use]
    pub const fn geometry(&self) -> &BoundaryGeometry {
        &self.geometry
    }
}

/// Loads the records and geometry files with the default comma delimiter.
///
/// # Errors
///
/// Returns [`DatasetError`] if either file cannot be read or does not
/// match the expected format.
pub fn load(records_path: &Path, geometry_path: &Path) -> Result<Dataset, DatasetError> {
    load_with(&RecordsLoader::new(), records_path, geometry_path)
}

/// Loads the records and geometry files using the given records loader.
///
/// # Errors
///
/// Returns [`DatasetError`] if either file cannot be read or does not
/// match the expected format.
pub fn load_with(
    loader: &RecordsLoader,
    records_path: &Path,
    geometry_path: &Path,
) -> Result<Dataset, DatasetError> {
    log::info!("Loading accident records from {}", records_path.display());
    let records = loader.load_path(records_path)?;
    log::info!("Loaded {} accident records", records.len());

    log::info!("Loading boundary geometry from {}", geometry_path.display());
    let geometry = BoundaryGeometry::load_path(geometry_path)?;
    log::info!(
        "Loaded boundary geometry with {} features",
        geometry.feature_count()
    );

    Ok(Dataset {
        records_path: records_path.to_path_buf(),
        geometry_path: geometry_path.to_path_buf(),
        records,
        geometry,
    })
}
