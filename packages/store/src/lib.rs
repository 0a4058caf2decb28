#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory incident store.
//!
//! [`IncidentStore`] is the single owner of the reported incidents and the
//! active [`FilterCriteria`]. Child components never mutate either directly:
//! they request changes through the [`IncidentSink`] and [`FilterSink`]
//! traits and receive shared references back for rendering.

pub mod seed;

use std::collections::BTreeSet;

use incident_map_incident_models::{FilterCriteria, FilterUpdate, Incident, IncidentId, NewIncident};

/// Errors that can occur when building a store from existing incidents.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Two incidents share an ID.
    #[error("Duplicate incident ID: {id}")]
    DuplicateId {
        /// The repeated ID.
        id: IncidentId,
    },

    /// A seed document failed to parse.
    #[error("Seed parse error: {0}")]
    Seed(#[from] toml::de::Error),
}

/// Receives newly reported incidents.
///
/// The report form only knows about this trait, not about the store.
pub trait IncidentSink {
    /// Appends the incident and returns the ID it was assigned.
    fn add_incident(&mut self, incident: NewIncident) -> IncidentId;
}

/// Receives single-field filter changes.
pub trait FilterSink {
    /// Replaces the filter field named by `update`.
    fn update_filter(&mut self, update: FilterUpdate);
}

/// Returns the incidents matching `criteria`, in their original order.
///
/// Pure function of its inputs: absent criteria fields match everything,
/// and no criteria combination is an error.
#[must_use]
pub fn visible_subset<'a>(
    incidents: &'a [Incident],
    criteria: &FilterCriteria,
) -> Vec<&'a Incident> {
    incidents.iter().filter(|i| criteria.matches(i)).collect()
}

/// Append-only list of incidents plus the active filter.
#[derive(Debug, Clone)]
pub struct IncidentStore {
    incidents: Vec<Incident>,
    filter: FilterCriteria,
    next_id: u64,
}

impl IncidentStore {
    /// Creates an empty store. The first reported incident gets ID 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            incidents: Vec::new(),
            filter: FilterCriteria {
                crime_type: None,
                date: None,
            },
            next_id: 1,
        }
    }

    /// Creates a store pre-populated with the embedded seed incidents.
    ///
    /// # Panics
    ///
    /// Panics if the embedded seed has duplicate IDs.
    #[must_use]
    pub fn seeded() -> Self {
        Self::from_incidents(seed::seed_incidents())
            .unwrap_or_else(|e| panic!("Invalid embedded seed: {e}"))
    }

    /// Creates a store from existing incidents, keeping their order.
    ///
    /// New IDs continue after the largest existing one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if two incidents share an ID.
    pub fn from_incidents(incidents: Vec<Incident>) -> Result<Self, StoreError> {
        let mut seen = BTreeSet::new();
        for incident in &incidents {
            if !seen.insert(incident.id) {
                return Err(StoreError::DuplicateId { id: incident.id });
            }
        }

        let next_id = seen.last().map_or(1, |id| id.value() + 1);

        log::debug!("Loaded {} incident(s), next ID {next_id}", incidents.len());

        Ok(Self {
            incidents,
            filter: FilterCriteria::default(),
            next_id,
        })
    }

    /// Parses a seed TOML document into a store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the document is malformed or has duplicate
    /// IDs.
    pub fn from_seed_toml(toml_str: &str) -> Result<Self, StoreError> {
        Self::from_incidents(seed::parse_seed_toml(toml_str)?)
    }

    /// Appends a new incident, assigning it a fresh ID.
    ///
    /// Never rejects based on content; identical reports become two
    /// incidents.
    pub fn add(&mut self, incident: NewIncident) -> &Incident {
        let id = IncidentId(self.next_id);
        self.next_id += 1;

        log::debug!(
            "Adding incident {id}: {} at {}",
            incident.crime_type,
            incident.location
        );

        let index = self.incidents.len();
        self.incidents.push(incident.into_incident(id));
        &self.incidents[index]
    }

    /// All incidents in insertion order.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Looks up an incident by ID.
    #[must_use]
    pub fn get(&self, id: IncidentId) -> Option<&Incident> {
        self.incidents.iter().find(|i| i.id == id)
    }

    /// Number of incidents, ignoring the filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Whether no incidents have been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// The active filter.
    #[must_use]
    pub const fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    /// Replaces the whole filter.
    pub fn set_filter(&mut self, filter: FilterCriteria) {
        log::debug!("Filter set to {filter:?}");
        self.filter = filter;
    }

    /// Replaces one filter field, leaving the other untouched.
    pub fn apply_filter_update(&mut self, update: FilterUpdate) {
        self.filter.apply(update);
        log::debug!("Filter updated with {update:?}, now {:?}", self.filter);
    }

    /// Removes every filter criterion.
    pub fn clear_filter(&mut self) {
        self.set_filter(FilterCriteria::default());
    }

    /// Incidents matching the active filter, in insertion order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Incident> {
        visible_subset(&self.incidents, &self.filter)
    }
}

impl Default for IncidentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IncidentSink for IncidentStore {
    fn add_incident(&mut self, incident: NewIncident) -> IncidentId {
        self.add(incident).id
    }
}

impl FilterSink for IncidentStore {
    fn update_filter(&mut self, update: FilterUpdate) {
        self.apply_filter_update(update);
    }
}
