//! Property overlay: one mutable outline polygon synchronized to a
//! fill and a line layer, plus the fixed marker with its tooltip popup.

use egui::Color32;
use geojson::{Feature, GeoJson};
use tracing::error;

use propmap_core::geometry::normalize_outline;
use propmap_core::{property, PropertyInfo};

use crate::map::layers::{reconcile, LayerPaint, LayerSpec, SourceData, SourceSpec};
use crate::map::{MapEvent, MapHandle};

pub const OUTLINE_SOURCE: &str = "property-outline-source";
pub const OUTLINE_FILL_LAYER: &str = "property-outline-fill";
pub const OUTLINE_LINE_LAYER: &str = "property-outline-line";

const ACCENT: Color32 = Color32::from_rgb(0x23, 0xF1, 0xE0);
// Outline-only; raise for a subtle fill.
const FILL_OPACITY: f32 = 0.0;
const OUTLINE_WIDTH: f32 = 1.8;

/// Owns the outline feature and the marker/popup state.
pub struct PropertyOverlay {
    outline: Feature,
    /// The static record behind the marker and its tooltip.
    pub info: PropertyInfo,
    marker_added: bool,
    /// Whether the tooltip popup is open; toggled by marker clicks.
    pub popup_open: bool,
}

impl Default for PropertyOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyOverlay {
    pub fn new() -> Self {
        Self {
            outline: property::default_outline(),
            info: PropertyInfo::city_center(),
            marker_added: false,
            popup_open: false,
        }
    }

    pub fn outline(&self) -> &Feature {
        &self.outline
    }

    /// True once the marker has been placed (first map load).
    pub fn marker_added(&self) -> bool {
        self.marker_added
    }

    fn specs(&self) -> (Vec<SourceSpec>, Vec<LayerSpec>) {
        let sources = vec![SourceSpec {
            id: OUTLINE_SOURCE,
            data: SourceData::Feature(self.outline.clone()),
        }];

        let layers = vec![
            LayerSpec {
                id: OUTLINE_FILL_LAYER,
                source: OUTLINE_SOURCE,
                paint: LayerPaint::Fill {
                    color: ACCENT,
                    opacity: FILL_OPACITY,
                },
            },
            LayerSpec {
                id: OUTLINE_LINE_LAYER,
                source: OUTLINE_SOURCE,
                paint: LayerPaint::Line {
                    color: ACCENT,
                    width: OUTLINE_WIDTH,
                },
            },
        ];

        (sources, layers)
    }

    /// Create-or-update the outline source and add any missing layer.
    pub fn ensure_layers(&self, map: &mut MapHandle) {
        let (sources, layers) = self.specs();
        if let Err(err) = reconcile(map.registry_mut(), &sources, &layers) {
            error!("property layer reconcile failed: {err}");
        }
    }

    /// Replace the outline. Accepts a bare Polygon/MultiPolygon
    /// geometry or a full feature; anything else is logged and dropped,
    /// keeping the prior outline.
    pub fn update_outline(&mut self, map: &mut MapHandle, input: GeoJson) {
        let feature = match normalize_outline(input) {
            Ok(feature) => feature,
            Err(err) => {
                error!("invalid outline update: {err}");
                return;
            }
        };

        self.outline = feature;

        // Push to the live source if one exists; otherwise the next
        // ensure pass seeds it.
        if map.registry().source(OUTLINE_SOURCE).is_some() {
            let _ = map
                .registry_mut()
                .set_source_data(OUTLINE_SOURCE, SourceData::Feature(self.outline.clone()));
        }
    }

    pub fn handle_event(&mut self, map: &mut MapHandle, event: MapEvent) {
        match event {
            MapEvent::StyleLoad => self.ensure_layers(map),
            MapEvent::Load => {
                self.ensure_layers(map);
                self.marker_added = true;
            }
        }
    }
}
