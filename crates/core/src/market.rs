//! The fixed table of market regions.
//!
//! Markets are defined statically at startup and never mutated. Each
//! one carries a boundary geometry (Polygon with optional holes, or
//! MultiPolygon), a label anchor point and a display name.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use crate::geometry::LngLat;

/// The market selected when the application starts.
pub const DEFAULT_ACTIVE: &str = "dc-md-va";

/// A named market region with boundary geometry and a label anchor.
#[derive(Debug, Clone)]
pub struct Market {
    pub id: &'static str,
    pub name: &'static str,
    pub label: LngLat,
    feature: Feature,
}

impl Market {
    fn new(id: &'static str, name: &'static str, label: LngLat, geometry: Geometry) -> Self {
        let mut properties = JsonObject::new();
        properties.insert("id".to_string(), json!(id));

        Self {
            id,
            name,
            label,
            feature: Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            },
        }
    }

    /// The market's boundary as a GeoJSON feature.
    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    /// The boundary geometry; always present by construction.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.feature.geometry.as_ref()
    }

    /// A single-point feature collection for the label layer, carrying
    /// the market id and display name.
    pub fn label_collection(&self) -> FeatureCollection {
        let mut properties = JsonObject::new();
        properties.insert("id".to_string(), json!(self.id));
        properties.insert("name".to_string(), json!(self.name));

        FeatureCollection {
            bbox: None,
            features: vec![Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![
                    self.label.lon,
                    self.label.lat,
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }],
            foreign_members: None,
        }
    }
}

/// The fixed set of markets, looked up by id.
#[derive(Debug, Clone)]
pub struct MarketTable {
    markets: Vec<Market>,
}

impl Default for MarketTable {
    fn default() -> Self {
        Self::defaults()
    }
}

impl MarketTable {
    /// The built-in market regions around the Chesapeake.
    pub fn defaults() -> Self {
        let markets = vec![
            Market::new(
                "dc-md-va",
                "Maryland, Washington D.C., and Northern Virginia",
                LngLat::new(-77.0369, 38.9072),
                Geometry::new(Value::Polygon(vec![ring(&[
                    [-77.60, 39.10],
                    [-77.30, 39.35],
                    [-76.95, 39.45],
                    [-76.55, 39.40],
                    [-76.25, 39.05],
                    [-76.30, 38.70],
                    [-76.70, 38.55],
                    [-77.20, 38.55],
                    [-77.55, 38.75],
                    [-77.60, 39.10],
                ])])),
            ),
            Market::new(
                "baltimore",
                "Baltimore Metro",
                LngLat::new(-76.6122, 39.2904),
                Geometry::new(Value::Polygon(vec![ring(&[
                    [-76.92, 39.45],
                    [-76.75, 39.56],
                    [-76.52, 39.60],
                    [-76.30, 39.52],
                    [-76.22, 39.36],
                    [-76.33, 39.20],
                    [-76.58, 39.14],
                    [-76.82, 39.24],
                    [-76.92, 39.45],
                ])])),
            ),
            // Polygon with a hole
            Market::new(
                "annapolis-eastern-shore",
                "Annapolis & Eastern Shore",
                LngLat::new(-76.4922, 38.9784),
                Geometry::new(Value::Polygon(vec![
                    ring(&[
                        [-76.80, 39.20],
                        [-76.55, 39.30],
                        [-76.30, 39.25],
                        [-76.05, 39.10],
                        [-75.95, 38.85],
                        [-76.15, 38.70],
                        [-76.45, 38.65],
                        [-76.75, 38.80],
                        [-76.80, 39.20],
                    ]),
                    ring(&[
                        [-76.55, 39.10],
                        [-76.35, 39.15],
                        [-76.20, 39.00],
                        [-76.30, 38.85],
                        [-76.50, 38.85],
                        [-76.55, 39.10],
                    ]),
                ])),
            ),
            Market::new(
                "chesapeake-bay",
                "Chesapeake Bay",
                LngLat::new(-76.55, 39.05),
                Geometry::new(Value::MultiPolygon(vec![
                    vec![ring(&[
                        [-76.78, 39.34],
                        [-76.62, 39.38],
                        [-76.45, 39.32],
                        [-76.42, 39.18],
                        [-76.55, 39.08],
                        [-76.72, 39.16],
                        [-76.78, 39.34],
                    ])],
                    vec![ring(&[
                        [-76.70, 39.05],
                        [-76.52, 39.12],
                        [-76.35, 39.05],
                        [-76.28, 38.92],
                        [-76.38, 38.78],
                        [-76.58, 38.80],
                        [-76.70, 39.05],
                    ])],
                ])),
            ),
        ];

        Self { markets }
    }

    pub fn get(&self, id: &str) -> Option<&Market> {
        self.markets.iter().find(|m| m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Market> {
        self.markets.iter()
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

fn ring(coords: &[[f64; 2]]) -> Vec<Vec<f64>> {
    coords.iter().map(|c| vec![c[0], c[1]]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygons;

    #[test]
    fn test_table_lookup() {
        let table = MarketTable::defaults();
        assert_eq!(table.len(), 4);
        assert!(table.get(DEFAULT_ACTIVE).is_some());
        assert!(table.get("nowhere").is_none());
        assert_eq!(table.get("baltimore").unwrap().name, "Baltimore Metro");
    }

    #[test]
    fn test_every_ring_is_closed_with_at_least_four_points() {
        let table = MarketTable::defaults();
        for market in table.iter() {
            let geometry = market.geometry().unwrap();
            for polygon in polygons(geometry).unwrap() {
                for ring in polygon {
                    assert!(ring.len() >= 4, "{}: ring too short", market.id);
                    assert_eq!(
                        ring.first(),
                        ring.last(),
                        "{}: ring not closed",
                        market.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_label_collection_contents() {
        let table = MarketTable::defaults();
        let baltimore = table.get("baltimore").unwrap();
        let collection = baltimore.label_collection();

        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties["name"], "Baltimore Metro");
        assert_eq!(properties["id"], "baltimore");
        assert_eq!(
            feature.geometry.as_ref().unwrap().value,
            Value::Point(vec![-76.6122, 39.2904])
        );
    }
}
