#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Sidebar components: the incident report form and the filter panel.
//!
//! Neither component owns incident or filter state. Both validate raw input
//! at the boundary and hand the result upward through the
//! [`incident_map_store::IncidentSink`] and [`incident_map_store::FilterSink`]
//! traits.

pub mod filters;
pub mod form;

pub use filters::{ALL_TYPES_LABEL, FilterError, FilterOption, FilterPanel};
pub use form::{ReportError, ReportForm};
