//! Initial incidents embedded at compile time.
//!
//! The seed list lives in `packages/store/seed/incidents.toml` and is baked
//! into the binary via [`include_str!`], the same way source and service
//! registries are embedded elsewhere in the workspace.

use incident_map_incident_models::Incident;
use serde::Deserialize;

const SEED_TOML: &str = include_str!("../seed/incidents.toml");

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    incidents: Vec<Incident>,
}

/// Parses a seed document.
///
/// # Errors
///
/// Returns [`toml::de::Error`] if the document is malformed or any incident
/// fails validation (e.g. an out-of-range location).
pub fn parse_seed_toml(toml_str: &str) -> Result<Vec<Incident>, toml::de::Error> {
    toml::de::from_str::<SeedFile>(toml_str).map(|seed| seed.incidents)
}

/// Returns the embedded seed incidents.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (this is a compile-time guarantee
/// since the file is embedded).
#[must_use]
pub fn seed_incidents() -> Vec<Incident> {
    parse_seed_toml(SEED_TOML).unwrap_or_else(|e| panic!("Failed to parse incidents.toml: {e}"))
}

#[cfg(test)]
mod tests {
    use incident_map_incident_models::{CrimeType, IncidentId, Location, Severity};

    use super::*;

    #[test]
    fn loads_embedded_seed() {
        let incidents = seed_incidents();
        assert_eq!(incidents.len(), 1);

        let first = &incidents[0];
        assert_eq!(first.id, IncidentId(1));
        assert_eq!(first.crime_type, CrimeType::Theft);
        assert_eq!(first.severity, Severity::Medium);
        assert_eq!(first.location, Location::new(51.505, -0.09).unwrap());
        assert_eq!(first.date.map(|d| d.to_string()).as_deref(), Some("2023-07-15"));
        assert_eq!(first.description.as_deref(), Some("Pickpocketing incident"));
    }

    #[test]
    fn rejects_out_of_range_seed_location() {
        let toml_str = r#"
            [[incidents]]
            id = 1
            type = "Theft"
            severity = "Low"
            location = { latitude = 120.0, longitude = 0.0 }
        "#;
        assert!(parse_seed_toml(toml_str).is_err());
    }

    #[test]
    fn missing_optional_fields_parse_as_none() {
        let toml_str = r#"
            [[incidents]]
            id = 4
            type = "Assault"
            severity = "High"
            location = { latitude = 1.0, longitude = 2.0 }
        "#;
        let incidents = parse_seed_toml(toml_str).unwrap();
        assert_eq!(incidents[0].date, None);
        assert_eq!(incidents[0].description, None);
    }

    #[test]
    fn empty_document_has_no_incidents() {
        assert!(parse_seed_toml("").unwrap().is_empty());
    }
}
