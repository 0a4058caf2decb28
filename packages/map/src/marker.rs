//! Markers, popups, and keyed marker diffing.

use std::collections::BTreeSet;

use incident_map_incident_models::{Incident, IncidentId, Location};
use serde::Serialize;

/// Popup content bound to a marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    /// Heading, the crime type.
    pub title: String,
    /// Severity label.
    pub severity: String,
    /// ISO date, empty when the incident is undated.
    pub date: String,
    /// Free-text description, empty when none was given.
    pub description: String,
}

impl Popup {
    /// Builds the popup for one incident.
    #[must_use]
    pub fn for_incident(incident: &Incident) -> Self {
        Self {
            title: incident.crime_type.to_string(),
            severity: incident.severity.to_string(),
            date: incident.date.map(|d| d.to_string()).unwrap_or_default(),
            description: incident.description.clone().unwrap_or_default(),
        }
    }

    /// Renders the popup as an HTML fragment with all text escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        format!(
            "<h3>{}</h3><p>Severity: {}</p><p>Date: {}</p><p>{}</p>",
            escape_html(&self.title),
            escape_html(&self.severity),
            escape_html(&self.date),
            escape_html(&self.description),
        )
    }

    /// Renders the popup as one line of plain text, skipping empty fields.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = format!("{} (severity: {})", self.title, self.severity);
        if !self.date.is_empty() {
            text.push_str(" on ");
            text.push_str(&self.date);
        }
        if !self.description.is_empty() {
            text.push_str(": ");
            text.push_str(&self.description);
        }
        text
    }
}

/// One map marker, keyed by the incident it shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Stable key; equal to the incident ID.
    pub key: IncidentId,
    /// Where to place the marker.
    pub position: Location,
    /// Popup shown when the marker is clicked.
    pub popup: Popup,
}

impl Marker {
    /// Builds the marker for one incident.
    #[must_use]
    pub fn for_incident(incident: &Incident) -> Self {
        Self {
            key: incident.id,
            position: incident.location,
            popup: Popup::for_incident(incident),
        }
    }
}

/// Which markers a renderer must create, destroy, or keep between two
/// renders.
///
/// Incidents never change after creation, so a retained key always refers
/// to an identical marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerDiff {
    /// Keys present only in the new render, in new-render order.
    pub added: Vec<IncidentId>,
    /// Keys present only in the old render, in old-render order.
    pub removed: Vec<IncidentId>,
    /// Keys present in both, in new-render order.
    pub retained: Vec<IncidentId>,
}

impl MarkerDiff {
    /// Compares two marker lists by key.
    #[must_use]
    pub fn between(previous: &[Marker], next: &[Marker]) -> Self {
        let previous_keys: BTreeSet<IncidentId> = previous.iter().map(|m| m.key).collect();
        let next_keys: BTreeSet<IncidentId> = next.iter().map(|m| m.key).collect();

        let (retained, added): (Vec<_>, Vec<_>) = next
            .iter()
            .map(|m| m.key)
            .partition(|key| previous_keys.contains(key));

        let removed = previous
            .iter()
            .map(|m| m.key)
            .filter(|key| !next_keys.contains(key))
            .collect();

        Self {
            added,
            removed,
            retained,
        }
    }

    /// Whether the two renders show the same markers.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use incident_map_incident_models::{CrimeType, NewIncident, Severity};

    use super::*;

    fn incident(id: u64, description: Option<&str>, date: Option<&str>) -> Incident {
        NewIncident {
            location: Location::new(51.505, -0.09).unwrap(),
            crime_type: CrimeType::Theft,
            severity: Severity::Medium,
            date: date.map(|d| d.parse().unwrap()),
            description: description.map(ToString::to_string),
        }
        .into_incident(IncidentId(id))
    }

    fn markers(ids: &[u64]) -> Vec<Marker> {
        ids.iter()
            .map(|id| Marker::for_incident(&incident(*id, None, None)))
            .collect()
    }

    #[test]
    fn popup_shows_every_attribute() {
        let popup = Popup::for_incident(&incident(
            1,
            Some("Pickpocketing incident"),
            Some("2023-07-15"),
        ));
        assert_eq!(
            popup.to_html(),
            "<h3>Theft</h3><p>Severity: Medium</p><p>Date: 2023-07-15</p><p>Pickpocketing incident</p>"
        );
        assert_eq!(
            popup.to_text(),
            "Theft (severity: Medium) on 2023-07-15: Pickpocketing incident"
        );
    }

    #[test]
    fn popup_escapes_user_text() {
        let popup = Popup::for_incident(&incident(
            1,
            Some("<script>alert('x')</script> & co"),
            None,
        ));
        assert!(popup
            .to_html()
            .ends_with("<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; co</p>"));
    }

    #[test]
    fn popup_text_skips_missing_fields() {
        let popup = Popup::for_incident(&incident(1, None, None));
        assert_eq!(popup.to_text(), "Theft (severity: Medium)");
    }

    #[test]
    fn marker_key_is_incident_id() {
        let marker = Marker::for_incident(&incident(42, None, None));
        assert_eq!(marker.key, IncidentId(42));
    }

    #[test]
    fn diff_reports_added_removed_and_retained() {
        let diff = MarkerDiff::between(&markers(&[1, 2, 3]), &markers(&[2, 3, 4, 5]));
        assert_eq!(diff.added, vec![IncidentId(4), IncidentId(5)]);
        assert_eq!(diff.removed, vec![IncidentId(1)]);
        assert_eq!(diff.retained, vec![IncidentId(2), IncidentId(3)]);
        assert!(!diff.is_unchanged());
    }

    #[test]
    fn diff_of_identical_renders_is_unchanged() {
        let diff = MarkerDiff::between(&markers(&[1, 2]), &markers(&[1, 2]));
        assert!(diff.is_unchanged());
        assert_eq!(diff.retained.len(), 2);
    }
}
