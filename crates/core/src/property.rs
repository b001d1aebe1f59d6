//! The static property record and its default outline.

use geojson::{Feature, Geometry, JsonObject, Value};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::geometry::LngLat;

/// Tooltip content for the property popup. Every part is optional and
/// rendered only when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TooltipInfo {
    pub badge: Option<String>,
    pub kicker: Option<String>,
    pub metric: Option<String>,
    pub unit: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// The record behind the fixed property marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    pub position: LngLat,
    pub tooltip: TooltipInfo,
}

impl PropertyInfo {
    /// The built-in city-center property.
    pub fn city_center() -> Self {
        Self {
            name: "City Center".to_string(),
            position: LngLat::new(-76.525583, 39.25904),
            tooltip: TooltipInfo {
                badge: Some("Urban".to_string()),
                kicker: Some("Verfügbarkeit September 2025".to_string()),
                metric: Some("27,288".to_string()),
                unit: Some("SF".to_string()),
                title: Some("Prologis Business Center North #3".to_string()),
                description: Some(
                    "5503 Havana Street, Unit 140\nDenver, Colorado, 80238".to_string(),
                ),
                image: Some("property.png".to_string()),
            },
        }
    }
}

/// The default property outline: a closed 9-point ring.
pub fn default_outline() -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), json!("property-outline"));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![vec![
            vec![-76.5350, 39.2660],
            vec![-76.5250, 39.2690],
            vec![-76.5145, 39.2665],
            vec![-76.5105, 39.2595],
            vec![-76.5125, 39.2525],
            vec![-76.5200, 39.2495],
            vec![-76.5315, 39.2525],
            vec![-76.5370, 39.2585],
            vec![-76.5350, 39.2660],
        ]]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_outline_is_closed() {
        let feature = default_outline();
        let Some(Geometry {
            value: Value::Polygon(rings),
            ..
        }) = feature.geometry
        else {
            panic!("expected a polygon outline");
        };

        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 9);
        assert_eq!(rings[0].first(), rings[0].last());
    }

    #[test]
    fn test_city_center_record() {
        let info = PropertyInfo::city_center();
        assert_eq!(info.position, LngLat::new(-76.525583, 39.25904));
        assert_eq!(info.tooltip.metric.as_deref(), Some("27,288"));
        assert_eq!(info.tooltip.unit.as_deref(), Some("SF"));
        assert!(info.tooltip.description.as_deref().unwrap().contains('\n'));
    }
}
