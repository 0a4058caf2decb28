//! Incident report form.
//!
//! Holds the raw text of each field between submissions. On submit the
//! fields are validated into a [`NewIncident`]; a rejected submission adds
//! nothing and leaves every field as typed.

use incident_map_incident_models::{
    CrimeType, IncidentDate, IncidentId, InvalidDateError, InvalidLocationError, Location,
    NewIncident, Severity,
};
use incident_map_store::IncidentSink;

/// Reasons a submission is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    /// A required field was left empty.
    #[error("{field} is required")]
    MissingField {
        /// Human-readable field name.
        field: &'static str,
    },

    /// The type field names no known crime type.
    #[error("unknown crime type {value:?}")]
    UnknownCrimeType {
        /// The rejected value.
        value: String,
    },

    /// The location text is not two finite in-range numbers.
    #[error("invalid location: {0}")]
    InvalidLocation(#[from] InvalidLocationError),

    /// The date text is not a real calendar date.
    #[error(transparent)]
    InvalidDate(#[from] InvalidDateError),
}

/// State of the "Report Incident" form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportForm {
    crime_type: String,
    severity: Severity,
    date: String,
    description: String,
    location: String,
    last_error: Option<ReportError>,
}

impl ReportForm {
    /// Creates an empty form with severity `Low`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw type selector value; empty means nothing selected.
    #[must_use]
    pub fn crime_type(&self) -> &str {
        &self.crime_type
    }

    /// Selected severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Raw date text.
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Description text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Raw `"lat,lng"` location text.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The error from the most recent rejected submission, cleared on the
    /// next successful one.
    #[must_use]
    pub const fn last_error(&self) -> Option<&ReportError> {
        self.last_error.as_ref()
    }

    /// Sets the raw type selector value.
    pub fn set_crime_type(&mut self, value: impl Into<String>) {
        self.crime_type = value.into();
    }

    /// Selects a crime type, or clears the selection.
    pub fn select_crime_type(&mut self, crime_type: Option<CrimeType>) {
        self.crime_type = crime_type.map(|t| t.to_string()).unwrap_or_default();
    }

    /// Selects a severity.
    pub const fn set_severity(&mut self, severity: Severity) {
        self.severity = severity;
    }

    /// Sets the raw date text.
    pub fn set_date(&mut self, value: impl Into<String>) {
        self.date = value.into();
    }

    /// Sets the description text.
    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
    }

    /// Sets the raw location text.
    pub fn set_location(&mut self, value: impl Into<String>) {
        self.location = value.into();
    }

    /// Validates the current fields without submitting.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] for the first invalid field, checked in the
    /// order type, location, date.
    pub fn validate(&self) -> Result<NewIncident, ReportError> {
        let crime_type = self.crime_type.trim();
        if crime_type.is_empty() {
            return Err(ReportError::MissingField { field: "Crime type" });
        }
        let crime_type =
            CrimeType::parse_label(crime_type).map_err(|_| ReportError::UnknownCrimeType {
                value: crime_type.to_string(),
            })?;

        if self.location.trim().is_empty() {
            return Err(ReportError::MissingField { field: "Location" });
        }
        let location: Location = self.location.parse()?;

        let date = match self.date.trim() {
            "" => None,
            text => Some(text.parse::<IncidentDate>()?),
        };

        let description = match self.description.trim() {
            "" => None,
            text => Some(text.to_string()),
        };

        Ok(NewIncident {
            location,
            crime_type,
            severity: self.severity,
            date,
            description,
        })
    }

    /// Validates the form and hands the new incident to `sink`.
    ///
    /// On success only the description and location are cleared; type,
    /// severity, and date keep their values for the next report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if validation fails. Nothing is added and no
    /// field is cleared; the error is also kept in [`Self::last_error`].
    pub fn submit(&mut self, sink: &mut impl IncidentSink) -> Result<IncidentId, ReportError> {
        match self.validate() {
            Ok(incident) => {
                let id = sink.add_incident(incident);
                self.description.clear();
                self.location.clear();
                self.last_error = None;
                Ok(id)
            }
            Err(e) => {
                log::warn!("Rejected incident report: {e}");
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use incident_map_store::IncidentStore;

    use super::*;

    fn filled_form() -> ReportForm {
        let mut form = ReportForm::new();
        form.set_crime_type("Theft");
        form.set_severity(Severity::High);
        form.set_date("2023-07-15");
        form.set_description("Bag snatched");
        form.set_location("51.505, -0.09");
        form
    }

    #[test]
    fn submit_adds_incident_at_parsed_location() {
        let mut store = IncidentStore::new();
        let mut form = filled_form();

        let id = form.submit(&mut store).unwrap();

        let incident = store.get(id).unwrap();
        assert_eq!(incident.location, Location::new(51.505, -0.09).unwrap());
        assert_eq!(incident.crime_type, CrimeType::Theft);
        assert_eq!(incident.severity, Severity::High);
        assert_eq!(incident.date, Some("2023-07-15".parse().unwrap()));
        assert_eq!(incident.description.as_deref(), Some("Bag snatched"));
    }

    #[test]
    fn submit_clears_only_description_and_location() {
        let mut store = IncidentStore::new();
        let mut form = filled_form();

        form.submit(&mut store).unwrap();

        assert_eq!(form.description(), "");
        assert_eq!(form.location(), "");
        assert_eq!(form.crime_type(), "Theft");
        assert_eq!(form.severity(), Severity::High);
        assert_eq!(form.date(), "2023-07-15");
    }

    #[test]
    fn non_numeric_location_is_rejected() {
        let mut store = IncidentStore::new();
        let mut form = filled_form();
        form.set_location("abc");

        let err = form.submit(&mut store).unwrap_err();

        assert!(matches!(err, ReportError::InvalidLocation(_)));
        assert!(store.is_empty());
        assert_eq!(form.location(), "abc");
        assert_eq!(form.description(), "Bag snatched");
        assert_eq!(form.last_error(), Some(&err));
    }

    #[test]
    fn half_empty_location_is_rejected() {
        let mut form = filled_form();
        form.set_location("51.505,");
        assert_eq!(
            form.validate(),
            Err(ReportError::InvalidLocation(
                InvalidLocationError::NotANumber {
                    value: String::new()
                }
            ))
        );
    }

    #[test]
    fn out_of_range_location_is_rejected() {
        let mut form = filled_form();
        form.set_location("95, 10");
        assert!(matches!(
            form.validate(),
            Err(ReportError::InvalidLocation(
                InvalidLocationError::LatitudeOutOfRange { .. }
            ))
        ));
    }

    #[test]
    fn missing_type_is_rejected() {
        let mut store = IncidentStore::new();
        let mut form = filled_form();
        form.select_crime_type(None);

        assert_eq!(
            form.submit(&mut store),
            Err(ReportError::MissingField { field: "Crime type" })
        );
        assert!(store.is_empty());
    }

    #[test]
    fn missing_location_is_rejected() {
        let mut form = filled_form();
        form.set_location("   ");
        assert_eq!(
            form.validate(),
            Err(ReportError::MissingField { field: "Location" })
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut form = filled_form();
        form.set_crime_type("Jaywalking");
        assert!(matches!(
            form.validate(),
            Err(ReportError::UnknownCrimeType { .. })
        ));
    }

    #[test]
    fn impossible_date_is_rejected() {
        let mut form = filled_form();
        form.set_date("2023-02-30");
        assert!(matches!(form.validate(), Err(ReportError::InvalidDate(_))));
    }

    #[test]
    fn defaults_produce_low_severity_undated_incident() {
        let mut form = ReportForm::new();
        form.select_crime_type(Some(CrimeType::Assault));
        form.set_location("1,2");

        let incident = form.validate().unwrap();
        assert_eq!(incident.severity, Severity::Low);
        assert_eq!(incident.date, None);
        assert_eq!(incident.description, None);
    }

    #[test]
    fn success_clears_previous_error() {
        let mut store = IncidentStore::new();
        let mut form = filled_form();
        form.set_location("abc");
        assert!(form.submit(&mut store).is_err());

        form.set_location("1,2");
        form.submit(&mut store).unwrap();
        assert_eq!(form.last_error(), None);
    }

    #[test]
    fn rapid_entry_reuses_type_and_date() {
        let mut store = IncidentStore::new();
        let mut form = filled_form();
        form.submit(&mut store).unwrap();

        form.set_location("51.51,-0.1");
        let second = form.submit(&mut store).unwrap();

        let incident = store.get(second).unwrap();
        assert_eq!(incident.crime_type, CrimeType::Theft);
        assert_eq!(incident.date, Some("2023-07-15".parse().unwrap()));
        assert_eq!(incident.description, None);
        assert_eq!(store.len(), 2);
    }
}
