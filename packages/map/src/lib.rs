#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident map view.
//!
//! [`MapView`] turns the visible incidents into a [`RenderedMap`]: one
//! [`Marker`] per incident, keyed by incident ID, plus the tile layer and
//! icon assets the mapping library needs. Drawing tiles and fetching icons is
//! left to that library; [`MarkerDiff`] tells it which markers it can keep
//! between renders.

pub mod export;
pub mod marker;

use incident_map_incident_models::{Incident, IncidentId, Location};
use incident_map_map_models::{MapConfig, MarkerIconConfig, TileCoord, TileLayerConfig};
use serde::Serialize;

pub use marker::{Marker, MarkerDiff, Popup};

/// The current viewport plus the configuration it renders with.
///
/// Center and zoom are independent of the incident set: moving the map never
/// filters markers.
#[derive(Debug, Clone)]
pub struct MapView {
    config: MapConfig,
    center: Location,
    zoom: u8,
}

impl MapView {
    /// Creates a view at the configured initial center and zoom.
    #[must_use]
    pub fn new(config: MapConfig) -> Self {
        let center = config.center;
        let zoom = config.tile_layer.clamp_zoom(config.zoom);
        Self {
            config,
            center,
            zoom,
        }
    }

    /// Current map center.
    #[must_use]
    pub const fn center(&self) -> Location {
        self.center
    }

    /// Current zoom level.
    #[must_use]
    pub const fn zoom(&self) -> u8 {
        self.zoom
    }

    /// The configuration this view renders with.
    #[must_use]
    pub const fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Moves the map.
    pub fn set_center(&mut self, center: Location) {
        log::debug!("Map center moved to {center}");
        self.center = center;
    }

    /// Changes zoom, clamped to what the tile layer serves.
    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = self.config.tile_layer.clamp_zoom(zoom);
        log::debug!("Map zoom set to {}", self.zoom);
    }

    /// The tile under the current center.
    #[must_use]
    pub fn center_tile(&self) -> TileCoord {
        TileCoord::containing(self.center, self.zoom)
    }

    /// URL of the tile under the current center.
    #[must_use]
    pub fn center_tile_url(&self) -> String {
        self.config.tile_layer.tile_url(self.center_tile())
    }

    /// Renders one marker per incident, in the order given.
    #[must_use]
    pub fn render(&self, incidents: &[&Incident]) -> RenderedMap {
        let markers: Vec<Marker> = incidents.iter().map(|i| Marker::for_incident(i)).collect();

        log::debug!(
            "Rendered {} marker(s) at {} zoom {}",
            markers.len(),
            self.center,
            self.zoom
        );

        RenderedMap {
            center: self.center,
            zoom: self.zoom,
            tile_layer: self.config.tile_layer.clone(),
            icons: self.config.icons.clone(),
            markers,
        }
    }
}

/// Everything a mapping library needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMap {
    /// Map center.
    pub center: Location,
    /// Zoom level.
    pub zoom: u8,
    /// Tile source and its verbatim attribution.
    pub tile_layer: TileLayerConfig,
    /// Marker icon assets.
    pub icons: MarkerIconConfig,
    /// One marker per visible incident.
    pub markers: Vec<Marker>,
}

impl RenderedMap {
    /// Finds the marker for an incident.
    #[must_use]
    pub fn marker(&self, key: IncidentId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.key == key)
    }

    /// Marker keys in render order.
    #[must_use]
    pub fn keys(&self) -> Vec<IncidentId> {
        self.markers.iter().map(|m| m.key).collect()
    }

    /// Attribution text that must be displayed with the tiles.
    #[must_use]
    pub fn attribution(&self) -> &str {
        &self.tile_layer.attribution
    }

    /// Marker changes needed to go from `previous` to this render.
    #[must_use]
    pub fn diff_from(&self, previous: &Self) -> MarkerDiff {
        MarkerDiff::between(&previous.markers, &self.markers)
    }
}

#[cfg(test)]
mod tests {
    use incident_map_incident_models::{CrimeType, NewIncident, Severity};

    use super::*;

    fn incident(id: u64, lat: f64, lng: f64) -> Incident {
        NewIncident {
            location: Location::new(lat, lng).unwrap(),
            crime_type: CrimeType::Assault,
            severity: Severity::High,
            date: None,
            description: None,
        }
        .into_incident(IncidentId(id))
    }

    #[test]
    fn renders_one_marker_per_incident_at_its_location() {
        let view = MapView::new(MapConfig::default());
        let a = incident(1, 51.5, -0.1);
        let b = incident(2, 40.7, -74.0);

        let rendered = view.render(&[&a, &b]);

        assert_eq!(rendered.keys(), vec![IncidentId(1), IncidentId(2)]);
        assert_eq!(rendered.marker(IncidentId(2)).unwrap().position, b.location);
        assert!(rendered.marker(IncidentId(3)).is_none());
    }

    #[test]
    fn moving_center_does_not_change_markers() {
        let mut view = MapView::new(MapConfig::default());
        let a = incident(1, 51.5, -0.1);
        let before = view.render(&[&a]);

        view.set_center(Location::new(40.7, -74.0).unwrap());
        let after = view.render(&[&a]);

        assert_eq!(before.markers, after.markers);
        assert!(after.diff_from(&before).is_unchanged());
        assert_ne!(before.center, after.center);
    }

    #[test]
    fn zoom_is_clamped_to_tile_layer() {
        let mut view = MapView::new(MapConfig::default());
        view.set_zoom(40);
        assert_eq!(view.zoom(), 19);
    }

    #[test]
    fn center_tile_url_uses_current_view() {
        let view = MapView::new(MapConfig::default());
        assert_eq!(
            view.center_tile_url(),
            "https://b.tile.openstreetmap.org/13/4093/2724.png"
        );
    }

    #[test]
    fn rendered_map_carries_attribution_and_icons() {
        let config = MapConfig::default();
        let view = MapView::new(config.clone());
        let rendered = view.render(&[]);
        assert!(rendered.markers.is_empty());
        assert_eq!(rendered.attribution(), config.tile_layer.attribution);
        assert_eq!(rendered.icons, config.icons);
    }
}
