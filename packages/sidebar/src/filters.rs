//! Filter panel.
//!
//! Two independent selectors, crime type and date. Each change replaces only
//! its own field of the filter criteria.

use incident_map_incident_models::{
    CrimeType, FilterCriteria, FilterUpdate, IncidentDate, InvalidDateError,
};
use incident_map_store::FilterSink;

/// Label of the type selector's "no filter" entry.
pub const ALL_TYPES_LABEL: &str = "All Crime Types";

/// Reasons a filter change is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// The type selector value names no known crime type.
    #[error("unknown crime type {value:?}")]
    UnknownCrimeType {
        /// The rejected value.
        value: String,
    },

    /// The date selector value is not a real calendar date.
    #[error(transparent)]
    InvalidDate(#[from] InvalidDateError),
}

/// One entry in the type selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// Value submitted when chosen; empty for "all".
    pub value: String,
    /// Text shown to the user.
    pub label: String,
    /// Whether this entry matches the current criteria.
    pub selected: bool,
}

/// Filter selectors rendered from a snapshot of the current criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPanel {
    criteria: FilterCriteria,
}

impl FilterPanel {
    /// Creates the panel for the given criteria snapshot.
    #[must_use]
    pub const fn new(criteria: FilterCriteria) -> Self {
        Self { criteria }
    }

    /// Type selector entries: the "all" sentinel, then every crime type.
    #[must_use]
    pub fn type_options(&self) -> Vec<FilterOption> {
        std::iter::once(FilterOption {
            value: String::new(),
            label: ALL_TYPES_LABEL.to_string(),
            selected: self.criteria.crime_type.is_none(),
        })
        .chain(CrimeType::all().iter().map(|t| FilterOption {
            value: t.to_string(),
            label: t.to_string(),
            selected: self.criteria.crime_type == Some(*t),
        }))
        .collect()
    }

    /// Current date selector value; empty when no date filter is set.
    #[must_use]
    pub fn date_value(&self) -> String {
        self.criteria.date.map(|d| d.to_string()).unwrap_or_default()
    }

    /// Translates a raw type selector value into a filter update.
    ///
    /// An empty value clears the type filter.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownCrimeType`] for an unrecognized value.
    pub fn type_update(value: &str) -> Result<FilterUpdate, FilterError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(FilterUpdate::Type(None));
        }
        CrimeType::parse_label(value)
            .map(|t| FilterUpdate::Type(Some(t)))
            .map_err(|_| FilterError::UnknownCrimeType {
                value: value.to_string(),
            })
    }

    /// Translates a raw date selector value into a filter update.
    ///
    /// An empty value clears the date filter.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidDate`] if the value is not a real date.
    pub fn date_update(value: &str) -> Result<FilterUpdate, FilterError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(FilterUpdate::Date(None));
        }
        Ok(FilterUpdate::Date(Some(value.parse::<IncidentDate>()?)))
    }

    /// Handles a change of the type selector.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if the value is invalid; `sink` is not called.
    pub fn on_type_change(
        &mut self,
        value: &str,
        sink: &mut impl FilterSink,
    ) -> Result<(), FilterError> {
        let update = Self::type_update(value)?;
        self.criteria.apply(update);
        sink.update_filter(update);
        Ok(())
    }

    /// Handles a change of the date selector.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if the value is invalid; `sink` is not called.
    pub fn on_date_change(
        &mut self,
        value: &str,
        sink: &mut impl FilterSink,
    ) -> Result<(), FilterError> {
        let update = Self::date_update(value).inspect_err(|e| {
            log::warn!("Rejected date filter: {e}");
        })?;
        self.criteria.apply(update);
        sink.update_filter(update);
        Ok(())
    }
}
