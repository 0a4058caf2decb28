#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record and filter criteria types.
//!
//! These are the values that flow between the incident store, the map view,
//! and the sidebar. Everything a user types is validated into one of these
//! types at the input boundary, so downstream code never sees a malformed
//! coordinate, an unknown crime type, or an impossible date.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Unique identifier of a reported incident.
///
/// Assigned by the store at creation time from a monotonically increasing
/// counter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncidentId(pub u64);

impl IncidentId {
    /// Returns the raw numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for IncidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of crime an incident reports.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum CrimeType {
    /// Unlawful taking of property (pickpocketing, shoplifting, etc.)
    Theft,
    /// Physical attack or threat of one
    Assault,
    /// Unlawful entry to commit a theft or felony
    Burglary,
    /// Taking property by force or threat
    Robbery,
    /// Willful damage to property
    Vandalism,
}

impl CrimeType {
    /// Returns all variants of this enum, in selector order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Theft,
            Self::Assault,
            Self::Burglary,
            Self::Robbery,
            Self::Vandalism,
        ]
    }

    /// Parses a selector value, ignoring surrounding whitespace and case.
    ///
    /// # Errors
    ///
    /// Returns [`strum::ParseError`] if the value names no crime type.
    pub fn parse_label(value: &str) -> Result<Self, strum::ParseError> {
        Self::from_str(value.trim())
    }
}

/// How serious a reported incident is.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Severity {
    /// Minor incident
    #[default]
    Low,
    /// Moderate incident
    Medium,
    /// Serious incident
    High,
}

impl Severity {
    /// Returns all variants of this enum, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// A calendar date in `YYYY-MM-DD` form.
///
/// Only real dates are representable: `2023-02-30` is rejected when parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncidentDate(NaiveDate);

impl IncidentDate {
    /// The only accepted textual format.
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// Wraps an already-validated [`NaiveDate`].
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the underlying [`NaiveDate`].
    #[must_use]
    pub const fn as_naive(self) -> NaiveDate {
        self.0
    }
}

impl FromStr for IncidentDate {
    type Err = InvalidDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(trimmed, Self::FORMAT)
            .map(Self)
            .map_err(|_| InvalidDateError {
                value: trimmed.to_string(),
            })
    }
}

impl std::fmt::Display for IncidentDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

/// Error returned when text is not a real `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date {value:?}: expected a calendar date as YYYY-MM-DD")]
pub struct InvalidDateError {
    /// The rejected input.
    pub value: String,
}

/// A point on the map in WGS84 degrees.
///
/// Can only be constructed through [`Location::new`] or by parsing
/// `"lat,lng"` text, both of which reject non-finite and out-of-range
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation", into = "RawLocation")]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawLocation {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Creates a location from latitude and longitude in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLocationError`] if either value is not finite, the
    /// latitude is outside -90..=90, or the longitude is outside
    /// -180..=180.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidLocationError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(InvalidLocationError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidLocationError::LatitudeOutOfRange { latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidLocationError::LongitudeOutOfRange { longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.longitude
    }
}

impl TryFrom<RawLocation> for Location {
    type Error = InvalidLocationError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl From<Location> for RawLocation {
    fn from(location: Location) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

impl FromStr for Location {
    type Err = InvalidLocationError;

    /// Parses `"latitude,longitude"`, e.g. `"51.505, -0.09"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [lat, lng] = *parts.as_slice() else {
            return Err(InvalidLocationError::ComponentCount { found: parts.len() });
        };

        let parse = |part: &str| {
            part.parse::<f64>()
                .map_err(|_| InvalidLocationError::NotANumber {
                    value: part.to_string(),
                })
        };

        Self::new(parse(lat)?, parse(lng)?)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Reasons a location can be rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidLocationError {
    /// The text did not split into exactly two comma-separated parts.
    #[error("expected \"latitude,longitude\" but found {found} component(s)")]
    ComponentCount {
        /// Number of comma-separated parts in the input.
        found: usize,
    },

    /// One of the parts is not a number.
    #[error("{value:?} is not a number")]
    NotANumber {
        /// The offending part, trimmed.
        value: String,
    },

    /// A coordinate is NaN or infinite.
    #[error("coordinates must be finite numbers")]
    NotFinite,

    /// Latitude outside -90..=90.
    #[error("latitude {latitude} is outside -90..90")]
    LatitudeOutOfRange {
        /// The rejected latitude.
        latitude: f64,
    },

    /// Longitude outside -180..=180.
    #[error("longitude {longitude} is outside -180..180")]
    LongitudeOutOfRange {
        /// The rejected longitude.
        longitude: f64,
    },
}

/// A reported incident.
///
/// Incidents are immutable once created; the store only hands out shared
/// references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Unique incident ID.
    pub id: IncidentId,
    /// Where the incident happened.
    pub location: Location,
    /// What kind of crime was reported.
    #[serde(rename = "type")]
    pub crime_type: CrimeType,
    /// How serious it was.
    pub severity: Severity,
    /// When it happened, if the reporter gave a date.
    pub date: Option<IncidentDate>,
    /// Free-text description.
    pub description: Option<String>,
}

/// An incident that has been validated but not yet assigned an ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncident {
    /// Where the incident happened.
    pub location: Location,
    /// What kind of crime was reported.
    #[serde(rename = "type")]
    pub crime_type: CrimeType,
    /// How serious it was.
    #[serde(default)]
    pub severity: Severity,
    /// When it happened, if known.
    #[serde(default)]
    pub date: Option<IncidentDate>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

impl NewIncident {
    /// Attaches an ID, producing the final immutable record.
    #[must_use]
    pub fn into_incident(self, id: IncidentId) -> Incident {
        Incident {
            id,
            location: self.location,
            crime_type: self.crime_type,
            severity: self.severity,
            date: self.date,
            description: self.description,
        }
    }
}

/// The active (type, date) predicate restricting which incidents render.
///
/// A `None` field matches every incident.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Only show incidents of this type.
    #[serde(rename = "type")]
    pub crime_type: Option<CrimeType>,
    /// Only show incidents on this date.
    pub date: Option<IncidentDate>,
}

impl FilterCriteria {
    /// Returns `true` if the incident satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, incident: &Incident) -> bool {
        self.crime_type.is_none_or(|t| incident.crime_type == t)
            && self.date.is_none_or(|d| incident.date == Some(d))
    }

    /// Returns `true` when no criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.crime_type.is_none() && self.date.is_none()
    }

    /// Replaces the one field named by `update`, leaving the other as is.
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Type(crime_type) => self.crime_type = crime_type,
            FilterUpdate::Date(date) => self.date = date,
        }
    }
}

/// A change to a single field of [`FilterCriteria`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterUpdate {
    /// Set or clear the type filter.
    Type(Option<CrimeType>),
    /// Set or clear the date filter.
    Date(Option<IncidentDate>),
}
