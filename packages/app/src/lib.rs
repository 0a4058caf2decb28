#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident map coordinator.
//!
//! [`App`] owns the [`IncidentStore`] and wires the sidebar components and
//! the [`MapView`] around it. All mutation goes through the store; every
//! render re-derives the visible subset from scratch and reports which
//! markers changed since the previous render.

pub mod interactive;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use incident_map_incident_models::{IncidentId, Location};
use incident_map_map::{MapView, MarkerDiff, RenderedMap};
use incident_map_map_models::{ConfigError, MapConfig};
use incident_map_sidebar::{FilterError, FilterPanel, ReportError, ReportForm};
use incident_map_store::{IncidentStore, StoreError};

/// Errors surfaced by the binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Map configuration failed to load.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Seed incidents failed to load.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A terminal prompt failed.
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Writing output failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// How to start a session.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Map config file replacing the embedded default.
    pub config_path: Option<PathBuf>,
    /// Start with no incidents instead of the embedded seed.
    pub no_seed: bool,
}

/// One render of the map plus the marker changes since the previous one.
#[derive(Debug, Clone)]
pub struct Frame {
    /// What to draw.
    pub map: RenderedMap,
    /// Which markers the renderer can keep.
    pub diff: MarkerDiff,
}

/// The top-level coordinator.
#[derive(Debug)]
pub struct App {
    store: IncidentStore,
    map: MapView,
    form: ReportForm,
    last_render: Option<RenderedMap>,
}

impl App {
    /// Creates a coordinator around an existing store.
    #[must_use]
    pub fn new(store: IncidentStore, config: MapConfig) -> Self {
        Self {
            store,
            map: MapView::new(config),
            form: ReportForm::new(),
            last_render: None,
        }
    }

    /// Builds a coordinator from command-line options.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the config file cannot be loaded.
    pub fn from_options(options: &AppOptions) -> Result<Self, AppError> {
        let config = match &options.config_path {
            Some(path) => {
                log::info!("Loading map config from {}", path.display());
                MapConfig::load(path)?
            }
            None => MapConfig::default(),
        };

        let store = if options.no_seed {
            IncidentStore::new()
        } else {
            IncidentStore::seeded()
        };

        log::info!("Starting with {} incident(s)", store.len());

        Ok(Self::new(store, config))
    }

    /// The incident store.
    #[must_use]
    pub const fn store(&self) -> &IncidentStore {
        &self.store
    }

    /// The map view.
    #[must_use]
    pub const fn map(&self) -> &MapView {
        &self.map
    }

    /// The report form.
    #[must_use]
    pub const fn form(&self) -> &ReportForm {
        &self.form
    }

    /// Mutable access to the report form's fields.
    pub const fn form_mut(&mut self) -> &mut ReportForm {
        &mut self.form
    }

    /// Filter panel for the current criteria.
    #[must_use]
    pub const fn filter_panel(&self) -> FilterPanel {
        FilterPanel::new(*self.store.filter())
    }

    /// Submits the report form into the store.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if the form is invalid; nothing is added.
    pub fn submit_report(&mut self) -> Result<IncidentId, ReportError> {
        self.form.submit(&mut self.store)
    }

    /// Applies a raw type selector value.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if the value names no crime type.
    pub fn change_type_filter(&mut self, value: &str) -> Result<(), FilterError> {
        self.filter_panel().on_type_change(value, &mut self.store)
    }

    /// Applies a raw date selector value.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if the value is not a real date.
    pub fn change_date_filter(&mut self, value: &str) -> Result<(), FilterError> {
        self.filter_panel().on_date_change(value, &mut self.store)
    }

    /// Removes both filters.
    pub fn clear_filters(&mut self) {
        self.store.clear_filter();
    }

    /// Moves the map without affecting which incidents are shown.
    pub fn set_center(&mut self, center: Location) {
        self.map.set_center(center);
    }

    /// Renders the visible incidents and diffs against the last render.
    pub fn render(&mut self) -> Frame {
        let visible = self.store.visible();
        let map = self.map.render(&visible);

        let diff = match &self.last_render {
            Some(previous) => map.diff_from(previous),
            None => MarkerDiff::between(&[], &map.markers),
        };

        self.last_render = Some(map.clone());

        Frame { map, diff }
    }
}

/// Formats a frame for the terminal.
#[must_use]
pub fn format_frame(frame: &Frame, total: usize) -> String {
    let map = &frame.map;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Map centered on {} at zoom {}",
        map.center, map.zoom
    );
    let _ = writeln!(out, "Tiles: {}", map.tile_layer.url_template);
    let _ = writeln!(out, "Attribution: {}", map.attribution());
    let _ = writeln!(out);

    if map.markers.is_empty() {
        let _ = writeln!(out, "No incidents match the current filters.");
    } else {
        let _ = writeln!(out, "{:<6} {:<24} POPUP", "ID", "LOCATION");
        let _ = writeln!(out, "{}", "-".repeat(80));
        for marker in &map.markers {
            let _ = writeln!(
                out,
                "{:<6} {:<24} {}",
                marker.key,
                marker.position.to_string(),
                marker.popup.to_text()
            );
        }
    }

    let _ = writeln!(
        out,
        "\n{} of {total} incident(s) shown (+{} -{} ={})",
        map.markers.len(),
        frame.diff.added.len(),
        frame.diff.removed.len(),
        frame.diff.retained.len()
    );

    out
}

/// Writes the frame's markers to `path` as a `GeoJSON` `FeatureCollection`.
///
/// # Errors
///
/// Returns [`AppError`] if serialization or the write fails.
pub fn export_geojson(frame: &Frame, path: &Path) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(&frame.map.to_geojson())?;
    std::fs::write(path, json).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "Exported {} marker(s) to {}",
        frame.map.markers.len(),
        path.display()
    );
    Ok(())
}
