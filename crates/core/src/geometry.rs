//! Positions, extents and GeoJSON geometry helpers.
//!
//! Coordinates follow the GeoJSON convention: longitude first, then
//! latitude, in WGS-84 degrees.

use geojson::{Feature, GeoJson, Geometry, JsonObject, PolygonType, Value};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A WGS-84 position (longitude, latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lon: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Axis-aligned geographic extent (west, south, east, north).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Bounds {
    /// An empty extent; `extend` grows it to enclose positions.
    pub fn empty() -> Self {
        Self {
            west: f64::INFINITY,
            south: f64::INFINITY,
            east: f64::NEG_INFINITY,
            north: f64::NEG_INFINITY,
        }
    }

    /// Grow the extent to enclose the given position.
    pub fn extend(&mut self, lon: f64, lat: f64) {
        self.west = self.west.min(lon);
        self.south = self.south.min(lat);
        self.east = self.east.max(lon);
        self.north = self.north.max(lat);
    }

    /// True once at least one position has been folded in.
    pub fn is_valid(&self) -> bool {
        self.west <= self.east && self.south <= self.north
    }

    pub fn center(&self) -> LngLat {
        LngLat::new((self.west + self.east) / 2.0, (self.south + self.north) / 2.0)
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }

    /// Minimal box enclosing every coordinate of every ring.
    ///
    /// Polygon and MultiPolygon are flattened uniformly; any other
    /// geometry kind is rejected.
    pub fn from_geometry(geometry: &Geometry) -> Result<Self> {
        let mut bounds = Self::empty();
        for polygon in polygons(geometry)? {
            for ring in polygon {
                for position in ring {
                    if let [lon, lat, ..] = position.as_slice() {
                        bounds.extend(*lon, *lat);
                    }
                }
            }
        }
        if !bounds.is_valid() {
            return Err(Error::EmptyGeometry);
        }
        Ok(bounds)
    }
}

/// The GeoJSON type name of a geometry value.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// The ring lists of a Polygon or MultiPolygon, one entry per polygon.
///
/// Within each entry the first ring is the outer boundary and the rest
/// are holes.
pub fn polygons(geometry: &Geometry) -> Result<Vec<&PolygonType>> {
    match &geometry.value {
        Value::Polygon(polygon) => Ok(vec![polygon]),
        Value::MultiPolygon(multi) => Ok(multi.iter().collect()),
        other => Err(Error::UnsupportedGeometry(kind_name(other).to_string())),
    }
}

/// Normalize outline input into a feature.
///
/// A bare Polygon/MultiPolygon geometry is wrapped into a feature with
/// empty properties; a full feature passes through unchanged; anything
/// else is rejected.
pub fn normalize_outline(input: GeoJson) -> Result<Feature> {
    match input {
        GeoJson::Geometry(geometry) => match geometry.value {
            Value::Polygon(_) | Value::MultiPolygon(_) => Ok(Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: Some(JsonObject::new()),
                foreign_members: None,
            }),
            other => Err(Error::InvalidOutline(kind_name(&other).to_string())),
        },
        GeoJson::Feature(feature) => Ok(feature),
        GeoJson::FeatureCollection(_) => {
            Err(Error::InvalidOutline("FeatureCollection".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Vec<Vec<f64>> {
        vec![
            vec![min, min],
            vec![max, min],
            vec![max, max],
            vec![min, max],
            vec![min, min],
        ]
    }

    #[test]
    fn test_bounds_polygon_with_hole() {
        let geometry = Geometry::new(Value::Polygon(vec![
            square(-2.0, 2.0),
            square(-1.0, 1.0), // hole
        ]));

        let bounds = Bounds::from_geometry(&geometry).unwrap();
        assert_eq!(bounds.west, -2.0);
        assert_eq!(bounds.south, -2.0);
        assert_eq!(bounds.east, 2.0);
        assert_eq!(bounds.north, 2.0);

        // Every input coordinate is contained.
        for ring in [square(-2.0, 2.0), square(-1.0, 1.0)] {
            for position in ring {
                assert!(bounds.contains(position[0], position[1]));
            }
        }
    }

    #[test]
    fn test_bounds_multipolygon_is_minimal() {
        let geometry = Geometry::new(Value::MultiPolygon(vec![
            vec![square(0.0, 1.0)],
            vec![square(3.0, 5.0)],
        ]));

        let bounds = Bounds::from_geometry(&geometry).unwrap();
        assert_eq!((bounds.west, bounds.south), (0.0, 0.0));
        assert_eq!((bounds.east, bounds.north), (5.0, 5.0));
    }

    #[test]
    fn test_bounds_rejects_point() {
        let geometry = Geometry::new(Value::Point(vec![1.0, 2.0]));
        assert_eq!(
            Bounds::from_geometry(&geometry),
            Err(Error::UnsupportedGeometry("Point".to_string()))
        );
    }

    #[test]
    fn test_bounds_center() {
        let geometry = Geometry::new(Value::Polygon(vec![square(0.0, 4.0)]));
        let center = Bounds::from_geometry(&geometry).unwrap().center();
        assert_eq!(center, LngLat::new(2.0, 2.0));
    }

    #[test]
    fn test_normalize_bare_polygon() {
        let geometry = Geometry::new(Value::Polygon(vec![square(0.0, 1.0)]));
        let feature = normalize_outline(GeoJson::Geometry(geometry.clone())).unwrap();

        assert_eq!(feature.geometry, Some(geometry));
        assert_eq!(feature.properties, Some(JsonObject::new()));
    }

    #[test]
    fn test_normalize_feature_passthrough() {
        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(vec![square(0.0, 1.0)]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        let normalized = normalize_outline(GeoJson::Feature(feature.clone())).unwrap();
        assert_eq!(normalized, feature);
    }

    #[test]
    fn test_normalize_rejects_point_geometry() {
        let geometry = Geometry::new(Value::Point(vec![1.0, 2.0]));
        assert_eq!(
            normalize_outline(GeoJson::Geometry(geometry)),
            Err(Error::InvalidOutline("Point".to_string()))
        );
    }

    #[test]
    fn test_normalize_rejects_feature_collection() {
        let collection = geojson::FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: None,
        };
        assert!(normalize_outline(GeoJson::FeatureCollection(collection)).is_err());
    }
}
