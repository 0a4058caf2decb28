//! `GeoJSON` export of rendered markers.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value, feature::Id};

use crate::{Marker, RenderedMap};

impl RenderedMap {
    /// Converts the markers into a `GeoJSON` `FeatureCollection` of points.
    ///
    /// Each feature's `id` is the incident ID and its properties carry the
    /// popup fields.
    #[must_use]
    pub fn to_geojson(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.markers.iter().map(marker_feature).collect(),
            foreign_members: None,
        }
    }
}

fn marker_feature(marker: &Marker) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), marker.key.value().into());
    properties.insert("type".to_string(), marker.popup.title.clone().into());
    properties.insert("severity".to_string(), marker.popup.severity.clone().into());
    properties.insert("date".to_string(), optional_string(&marker.popup.date));
    properties.insert(
        "description".to_string(),
        optional_string(&marker.popup.description),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            marker.position.longitude(),
            marker.position.latitude(),
        ]))),
        id: Some(Id::Number(marker.key.value().into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

fn optional_string(s: &str) -> serde_json::Value {
    if s.is_empty() {
        serde_json::Value::Null
    } else {
        s.into()
    }
}
