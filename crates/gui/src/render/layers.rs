//! Draws the registry's layers on top of the basemap tiles.
//!
//! One walkers plugin walks the layers in registration order, resolves
//! each one's source data and paints through the projector, so what is
//! on screen is exactly what the registry holds.

use egui::{Align2, Color32, FontId, Pos2, Response, Stroke, Ui};
use geojson::{Feature, Geometry, Value};
use walkers::{lon_lat, MapMemory, Plugin, Projector};

use propmap_core::geometry::polygons;

use crate::map::layers::{LayerPaint, LayerRegistry, SourceData};

/// Plugin rendering every registered layer.
pub struct GeoJsonLayers<'a> {
    pub registry: &'a LayerRegistry,
}

impl Plugin for GeoJsonLayers<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        _response: &Response,
        projector: &Projector,
        memory: &MapMemory,
    ) {
        for layer in self.registry.layers() {
            let Some(source) = self.registry.source(layer.source) else {
                continue;
            };

            match layer.paint {
                LayerPaint::Fill { color, opacity } => {
                    draw_fills(ui, projector, source, color, opacity);
                }
                LayerPaint::Line { color, width } => {
                    draw_outlines(ui, projector, source, Stroke::new(width, color));
                }
                LayerPaint::Symbol {
                    text,
                    halo,
                    halo_width,
                } => {
                    draw_labels(ui, projector, source, memory.zoom(), text, halo, halo_width);
                }
            }
        }
    }
}

fn features(source: &SourceData) -> Vec<&Feature> {
    match source {
        SourceData::Feature(feature) => vec![feature],
        SourceData::Collection(collection) => collection.features.iter().collect(),
    }
}

fn project_ring(projector: &Projector, ring: &[Vec<f64>]) -> Vec<Pos2> {
    ring.iter()
        .filter_map(|position| match position.as_slice() {
            [lon, lat, ..] => {
                let projected = projector.project(lon_lat(*lon, *lat));
                Some(egui::pos2(projected.x, projected.y))
            }
            _ => None,
        })
        .collect()
}

fn draw_fills(
    ui: &mut Ui,
    projector: &Projector,
    source: &SourceData,
    color: Color32,
    opacity: f32,
) {
    if opacity <= 0.0 {
        return;
    }
    let fill = color.gamma_multiply(opacity);

    for feature in features(source) {
        for polygon in feature_polygons(feature) {
            // Outer ring only; holes are stroked, not subtracted.
            let Some(outer) = polygon.first() else {
                continue;
            };
            let points = project_ring(projector, outer);
            if points.len() >= 3 {
                ui.painter()
                    .add(egui::Shape::convex_polygon(points, fill, Stroke::NONE));
            }
        }
    }
}

fn draw_outlines(ui: &mut Ui, projector: &Projector, source: &SourceData, stroke: Stroke) {
    for feature in features(source) {
        for polygon in feature_polygons(feature) {
            for ring in polygon {
                let points = project_ring(projector, ring);
                if points.len() >= 2 {
                    ui.painter().add(egui::Shape::closed_line(points, stroke));
                }
            }
        }
    }
}

fn draw_labels(
    ui: &mut Ui,
    projector: &Projector,
    source: &SourceData,
    zoom: f64,
    text: Color32,
    halo: Color32,
    halo_width: f32,
) {
    let font = FontId::proportional(label_size(zoom));

    for feature in features(source) {
        let Some(Geometry {
            value: Value::Point(position),
            ..
        }) = &feature.geometry
        else {
            continue;
        };
        let [lon, lat, ..] = position.as_slice() else {
            continue;
        };
        let Some(name) = feature
            .properties
            .as_ref()
            .and_then(|p| p.get("name"))
            .and_then(|v| v.as_str())
        else {
            continue;
        };

        let projected = projector.project(lon_lat(*lon, *lat));
        let anchor = egui::pos2(projected.x, projected.y);

        // Halo: repaint the text offset around the anchor.
        let w = halo_width;
        for (dx, dy) in [
            (-w, 0.0),
            (w, 0.0),
            (0.0, -w),
            (0.0, w),
            (-w, -w),
            (-w, w),
            (w, -w),
            (w, w),
        ] {
            ui.painter().text(
                anchor + egui::vec2(dx, dy),
                Align2::CENTER_CENTER,
                name,
                font.clone(),
                halo,
            );
        }
        ui.painter()
            .text(anchor, Align2::CENTER_CENTER, name, font.clone(), text);
    }
}

fn feature_polygons(feature: &Feature) -> Vec<&geojson::PolygonType> {
    feature
        .geometry
        .as_ref()
        .and_then(|geometry| polygons(geometry).ok())
        .unwrap_or_default()
}

/// Label size by zoom, matching the style stops 8→14, 11→18, 13→22.
fn label_size(zoom: f64) -> f32 {
    const STOPS: [(f64, f32); 3] = [(8.0, 14.0), (11.0, 18.0), (13.0, 22.0)];

    if zoom <= STOPS[0].0 {
        return STOPS[0].1;
    }
    for pair in STOPS.windows(2) {
        let (z0, s0) = pair[0];
        let (z1, s1) = pair[1];
        if zoom <= z1 {
            let t = ((zoom - z0) / (z1 - z0)) as f32;
            return s0 + (s1 - s0) * t;
        }
    }
    STOPS[STOPS.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_size_interpolates_between_stops() {
        assert_eq!(label_size(5.0), 14.0);
        assert_eq!(label_size(8.0), 14.0);
        assert!((label_size(9.5) - 16.0).abs() < 1e-5);
        assert_eq!(label_size(11.0), 18.0);
        assert!((label_size(12.0) - 20.0).abs() < 1e-5);
        assert_eq!(label_size(13.0), 22.0);
        assert_eq!(label_size(18.0), 22.0);
    }
}
