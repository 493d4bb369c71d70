//! Bike-lane overlay loaded from a `GeoJSON` file.
//!
//! The overlay is parsed once for validation and then handed to the
//! presentation layer as-is.

use std::path::Path;
use std::sync::Arc;

use geojson::GeoJson;
use serde::{Serialize, Serializer};

use crate::DatasetError;

/// Immutable `GeoJSON` overlay drawn under the accident markers.
///
/// Clones share the parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryGeometry {
    geojson: Arc<GeoJson>,
}

impl Serialize for BoundaryGeometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.geojson.as_ref().serialize(serializer)
    }
}

impl BoundaryGeometry {
    /// Reads and parses the `GeoJSON` file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the file cannot be read, or
    /// [`DatasetError::DataFormat`] if it is not valid `GeoJSON`.
    pub fn load_path(path: &Path) -> Result<Self, DatasetError> {
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses a `GeoJSON` document.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::DataFormat`] if `text` is not valid `GeoJSON`.
    pub fn parse(text: &str) -> Result<Self, DatasetError> {
        let geojson: GeoJson = text.parse().map_err(|e| DatasetError::DataFormat {
            message: format!("Failed to parse GeoJSON: {e}"),
        })?;
        Ok(Self {
            geojson: Arc::new(geojson),
        })
    }

    /// The parsed document, untouched.
    #[must_use]
    pub fn as_geojson(&self) -> &GeoJson {
        &self.geojson
    }

    /// Number of features in the overlay (1 for a bare feature or geometry).
    #[must_use]
    pub fn feature_count(&self) -> usize {
        match self.geojson.as_ref() {
            GeoJson::FeatureCollection(collection) => collection.features.len(),
            GeoJson::Feature(_) | GeoJson::Geometry(_) => 1,
        }
    }
}
