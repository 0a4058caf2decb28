#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map view configuration types.
//!
//! Tile rendering and icon loading belong to whatever mapping library draws
//! the map. This crate only describes what that library is handed: the
//! initial view, the tile URL template with its attribution, and the marker
//! icon assets. The defaults are embedded from `config/default.toml`.

use std::path::{Path, PathBuf};

use incident_map_incident_models::Location;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Highest zoom level any slippy-map tile scheme uses.
pub const MAX_SUPPORTED_ZOOM: u8 = 30;

/// Web-Mercator latitude limit; tiles do not extend past it.
const MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Errors that can occur while loading a map configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has invalid values.
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error after parsing.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// Complete map view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Initial map center.
    pub center: Location,
    /// Initial zoom level.
    pub zoom: u8,
    /// Raster tile source.
    pub tile_layer: TileLayerConfig,
    /// Marker icon assets.
    pub icons: MarkerIconConfig,
}

impl MapConfig {
    /// Parses and validates a TOML config document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the document is malformed or fails
    /// validation.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is malformed, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the zoom range is inverted or out
    /// of bounds, the initial zoom is outside it, or the tile template uses
    /// `{s}` without any subdomains.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layer = &self.tile_layer;

        if layer.min_zoom > layer.max_zoom || layer.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(ConfigError::Invalid {
                message: format!(
                    "zoom range {}..={} must be ascending and at most {MAX_SUPPORTED_ZOOM}",
                    layer.min_zoom, layer.max_zoom
                ),
            });
        }

        if !(layer.min_zoom..=layer.max_zoom).contains(&self.zoom) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "initial zoom {} is outside {}..={}",
                    self.zoom, layer.min_zoom, layer.max_zoom
                ),
            });
        }

        if layer.url_template.contains("{s}") && layer.subdomains.is_empty() {
            return Err(ConfigError::Invalid {
                message: "tile template uses {s} but no subdomains are configured".to_string(),
            });
        }

        for placeholder in ["{z}", "{x}", "{y}"] {
            if !layer.url_template.contains(placeholder) {
                return Err(ConfigError::Invalid {
                    message: format!("tile template is missing {placeholder}"),
                });
            }
        }

        Ok(())
    }
}

impl Default for MapConfig {
    /// Returns the embedded default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (this is a compile-time
    /// guarantee since the file is embedded).
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_CONFIG_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse default.toml: {e}"))
    }
}

/// A templated raster tile source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayerConfig {
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders.
    pub url_template: String,
    /// Values substituted for `{s}`.
    #[serde(default)]
    pub subdomains: Vec<String>,
    /// Attribution that must be shown verbatim.
    pub attribution: String,
    /// Lowest zoom the source serves.
    #[serde(default)]
    pub min_zoom: u8,
    /// Highest zoom the source serves.
    pub max_zoom: u8,
}

impl TileLayerConfig {
    /// Expands the URL template for one tile.
    ///
    /// The subdomain is picked as `(x + y) % subdomains.len()` so the same
    /// tile always hits the same server.
    #[must_use]
    pub fn tile_url(&self, tile: TileCoord) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let sum = u64::from(tile.x) + u64::from(tile.y);
            let idx = usize::try_from(sum).unwrap_or(0) % self.subdomains.len();
            self.subdomains[idx].as_str()
        };

        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    /// Clamps a requested zoom to the range this source serves.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: u8) -> u8 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

/// Static image assets for map markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerIconConfig {
    /// Standard-density marker image.
    pub icon_url: String,
    /// High-density marker image.
    pub icon_retina_url: String,
    /// Marker shadow image.
    pub shadow_url: String,
}

/// A Web-Mercator slippy-map tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level.
    pub zoom: u8,
    /// Column, counted east from the antimeridian.
    pub x: u32,
    /// Row, counted south from the northern Mercator limit.
    pub y: u32,
}

impl TileCoord {
    /// Returns the tile containing `location` at `zoom`.
    ///
    /// Latitudes beyond the Mercator limit land in the first or last row.
    /// `zoom` is capped at [`MAX_SUPPORTED_ZOOM`].
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn containing(location: Location, zoom: u8) -> Self {
        let zoom = zoom.min(MAX_SUPPORTED_ZOOM);
        let n = f64::from(1_u32 << zoom);
        let max_index = (1_u64 << zoom) - 1;

        let lat_rad = location
            .latitude()
            .clamp(-MERCATOR_MAX_LATITUDE, MERCATOR_MAX_LATITUDE)
            .to_radians();

        let x = ((location.longitude() + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - lat_rad.tan().asinh() / std::f64::consts::PI) / 2.0 * n).floor();

        let clamp = |v: f64| (v.max(0.0) as u64).min(max_index) as u32;

        Self {
            zoom,
            x: clamp(x),
            y: clamp(y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = MapConfig::default();
        assert_eq!(config.zoom, 13);
        assert_eq!(config.center, Location::new(51.505, -0.09).unwrap());
        assert_eq!(config.tile_layer.subdomains, vec!["a", "b", "c"]);
        assert!(config.icons.icon_url.ends_with("marker-icon.png"));
        assert!(config.icons.icon_retina_url.ends_with("marker-icon-2x.png"));
        assert!(config.icons.shadow_url.ends_with("marker-shadow.png"));
    }

    #[test]
    fn default_attribution_is_verbatim() {
        let config = MapConfig::default();
        assert_eq!(
            config.tile_layer.attribution,
            r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#
        );
    }

    #[test]
    fn tile_url_expands_every_placeholder() {
        let layer = MapConfig::default().tile_layer;
        let url = layer.tile_url(TileCoord {
            zoom: 13,
            x: 4093,
            y: 2724,
        });
        // (4093 + 2724) % 3 == 1
        assert_eq!(url, "https://b.tile.openstreetmap.org/13/4093/2724.png");
    }

    #[test]
    fn tile_url_without_subdomains() {
        let layer = TileLayerConfig {
            url_template: "https://tiles.example.com/{z}/{x}/{y}.png".to_string(),
            subdomains: Vec::new(),
            attribution: String::new(),
            min_zoom: 0,
            max_zoom: 18,
        };
        let url = layer.tile_url(TileCoord { zoom: 1, x: 0, y: 1 });
        assert_eq!(url, "https://tiles.example.com/1/0/1.png");
    }

    #[test]
    fn containing_tile_matches_known_values() {
        let london = Location::new(51.505, -0.09).unwrap();
        assert_eq!(
            TileCoord::containing(london, 13),
            TileCoord {
                zoom: 13,
                x: 4093,
                y: 2724
            }
        );
        assert_eq!(
            TileCoord::containing(london, 0),
            TileCoord { zoom: 0, x: 0, y: 0 }
        );
    }

    #[test]
    fn containing_tile_clamps_edges() {
        let north_east = Location::new(90.0, 180.0).unwrap();
        assert_eq!(
            TileCoord::containing(north_east, 2),
            TileCoord { zoom: 2, x: 3, y: 0 }
        );

        let south_west = Location::new(-90.0, -180.0).unwrap();
        assert_eq!(
            TileCoord::containing(south_west, 2),
            TileCoord { zoom: 2, x: 0, y: 3 }
        );
    }

    #[test]
    fn rejects_inverted_zoom_range() {
        let toml_str = DEFAULT_CONFIG_TOML.replace("min_zoom = 0", "min_zoom = 20");
        assert!(matches!(
            MapConfig::from_toml_str(&toml_str),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_subdomain_placeholder_without_subdomains() {
        let toml_str =
            DEFAULT_CONFIG_TOML.replace(r#"subdomains = ["a", "b", "c"]"#, "subdomains = []");
        assert!(matches!(
            MapConfig::from_toml_str(&toml_str),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_center() {
        let toml_str = DEFAULT_CONFIG_TOML.replace("latitude = 51.505", "latitude = 151.505");
        assert!(matches!(
            MapConfig::from_toml_str(&toml_str),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn clamp_zoom_respects_layer_range() {
        let layer = MapConfig::default().tile_layer;
        assert_eq!(layer.clamp_zoom(25), 19);
        assert_eq!(layer.clamp_zoom(5), 5);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = MapConfig::load(Path::new("/nonexistent/incident_map.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
