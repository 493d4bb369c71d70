//! Dashboard configuration.
//!
//! The default configuration is a TOML file embedded at compile time. It
//! names the two input files and the handful of constants the views need
//! (map framing, the unreported-sex sentinel, the invalid-date policy).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use velo_map_dataset::RecordsLoader;
use velo_map_derive::InvalidDatePolicy;

use crate::DashboardError;

/// Embedded default configuration.
const DEFAULT_TOML: &str = include_str!("../dashboard.toml");

/// Top-level dashboard configuration, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Accident records file.
    pub records_path: PathBuf,
    /// Bike-lane `GeoJSON` file.
    pub geometry_path: PathBuf,
    /// Field delimiter of the records file. Must be a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// What to do with records whose timestamp cannot be composed.
    #[serde(default)]
    pub invalid_dates: InvalidDatePolicy,
    /// `sexe` value meaning "not reported", left out of the by-sex views.
    pub unreported_sex: String,
    /// Map framing.
    pub map: MapConfig,
}

/// Initial framing of the accident map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// `[lat, long]` of the initial map centre.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: u8,
    /// Display name of the bike-lane overlay layer.
    pub geometry_layer: String,
}

const fn default_delimiter() -> char {
    ','
}

impl DashboardConfig {
    /// Returns the configuration embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the embedded file is invalid.
    pub fn embedded() -> Result<Self, DashboardError> {
        Self::from_toml_str(DEFAULT_TOML)
    }

    /// Parses and validates a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the TOML does not match the
    /// schema or the delimiter is not a single ASCII character.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, DashboardError> {
        let config: Self = toml::de::from_str(toml_str).map_err(|e| DashboardError::Config {
            message: format!("Failed to parse dashboard config: {e}"),
        })?;
        config.delimiter_byte()?;
        Ok(config)
    }

    /// Builds the records loader this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the delimiter is not ASCII.
    pub fn records_loader(&self) -> Result<RecordsLoader, DashboardError> {
        Ok(RecordsLoader::new().with_delimiter(self.delimiter_byte()?))
    }

    fn delimiter_byte(&self) -> Result<u8, DashboardError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| DashboardError::Config {
                message: format!(
                    "delimiter '{}' must be a single ASCII character",
                    self.delimiter
                ),
            })
    }
}
