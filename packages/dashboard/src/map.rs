//! Accident map view model: one marker per record plus the bike-lane layer.

use serde::Serialize;
use velo_map_accident_models::{AccidentRecord, Severity};
use velo_map_dataset::BoundaryGeometry;

use crate::config::MapConfig;

/// Everything the presentation layer needs to draw the clustered map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// `[lat, long]` of the initial centre.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: u8,
    /// Display name of the overlay layer.
    pub geometry_layer: String,
    /// Bike-lane overlay, untouched.
    pub geometry: BoundaryGeometry,
    /// One marker per accident.
    pub markers: Vec<MapMarker>,
}

/// A single accident marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub long: f64,
    /// Details shown when the marker is opened.
    pub popup: MarkerPopup,
}

/// Details shown when a marker is opened, with labels as they appear in the
/// source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPopup {
    /// Date as formatted in the source file.
    pub date: Option<String>,
    /// Outcome for the cyclist.
    pub gravite: Severity,
    /// Street address.
    pub adresse: Option<String>,
    /// Lighting conditions, not recoded.
    pub eclairage: Option<String>,
    /// Weather conditions.
    pub meteo: Option<String>,
    /// Collision type.
    pub collision: Option<String>,
    /// Position on the road.
    pub situation: Option<String>,
    /// Trip purpose.
    pub trajet: Option<String>,
    /// First safety equipment.
    pub secu1: Option<String>,
    /// Second safety equipment.
    pub secu2: Option<String>,
    /// Third safety equipment.
    pub secu3: Option<String>,
}

impl From<&AccidentRecord> for MapMarker {
    fn from(record: &AccidentRecord) -> Self {
        Self {
            lat: record.lat,
            long: record.long,
            popup: MarkerPopup {
                date: record.date.clone(),
                gravite: record.gravite,
                adresse: record.adresse.clone(),
                eclairage: record.eclairage.clone(),
                meteo: record.meteo.clone(),
                collision: record.collision.clone(),
                situation: record.situation.clone(),
                trajet: record.trajet.clone(),
                secu1: record.secu1.clone(),
                secu2: record.secu2.clone(),
                secu3: record.secu3.clone(),
            },
        }
    }
}

/// Builds the map view for the loaded records and overlay.
#[must_use]
pub fn build_map(
    records: &[AccidentRecord],
    geometry: &BoundaryGeometry,
    config: &MapConfig,
) -> MapView {
    MapView {
        center: config.center,
        zoom: config.zoom,
        geometry_layer: config.geometry_layer.clone(),
        geometry: geometry.clone(),
        markers: records.iter().map(MapMarker::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{GEOJSON, record};

    #[test]
    fn one_marker_per_record_with_raw_labels() {
        let mut a = record(Severity::Tue);
        a.eclairage = Some("Nuit sans éclairage public".to_string());
        a.adresse = Some("Allées Jean Jaurès".to_string());
        let b = record(Severity::Indemne);

        let geometry = BoundaryGeometry::parse(GEOJSON).unwrap();
        let config = MapConfig {
            center: [43.6045, 1.444],
            zoom: 12,
            geometry_layer: "Pistes Cyclables".to_string(),
        };
        let map = build_map(&[a, b], &geometry, &config);

        assert_eq!(map.markers.len(), 2);
        assert_eq!(map.markers[0].popup.gravite, Severity::Tue);
        assert_eq!(
            map.markers[0].popup.eclairage.as_deref(),
            Some("Nuit sans éclairage public")
        );
        assert_eq!(
            map.markers[0].popup.adresse.as_deref(),
            Some("Allées Jean Jaurès")
        );
        assert_eq!(map.geometry_layer, "Pistes Cyclables");
        assert_eq!(map.geometry.feature_count(), 1);
    }

    #[test]
    fn empty_records_give_empty_markers() {
        let geometry = BoundaryGeometry::parse(GEOJSON).unwrap();
        let config = MapConfig {
            center: [0.0, 0.0],
            zoom: 1,
            geometry_layer: String::new(),
        };
        assert!(build_map(&[], &geometry, &config).markers.is_empty());
    }
}
