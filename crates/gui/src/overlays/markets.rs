//! Market overlay: keeps the boundary fill, boundary outline and
//! centered label layers showing the active market, across activations
//! and base-style reloads.

use egui::Color32;
use geojson::Feature;
use tracing::{error, warn};

use propmap_core::market::{Market, DEFAULT_ACTIVE};
use propmap_core::{Bounds, MarketTable};

use crate::map::camera::FitOptions;
use crate::map::gate::ReadyGate;
use crate::map::layers::{reconcile, LayerPaint, LayerSpec, SourceData, SourceSpec};
use crate::map::{MapEvent, MapHandle};

pub const BOUNDARY_SOURCE: &str = "market-active-source";
pub const FILL_LAYER: &str = "market-active-fill";
pub const OUTLINE_LAYER: &str = "market-active-outline";
pub const LABEL_SOURCE: &str = "market-label-source";
pub const LABEL_LAYER: &str = "market-label-layer";

const ACCENT: Color32 = Color32::from_rgb(0x23, 0xF1, 0xE0);
const LABEL_HALO: Color32 = Color32::from_rgb(0x06, 0x4A, 0x4B);
// Outline-only; raise for a subtle fill.
const FILL_OPACITY: f32 = 0.0;
const OUTLINE_WIDTH: f32 = 1.8;
const LABEL_HALO_WIDTH: f32 = 3.0;

#[derive(Debug, Clone, Copy)]
struct Activation {
    id: &'static str,
    fit: bool,
}

/// Tracks the active market and synchronizes its three layers.
pub struct MarketOverlay {
    table: MarketTable,
    active: &'static str,
    gate: ReadyGate<Activation>,
}

impl Default for MarketOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketOverlay {
    pub fn new() -> Self {
        Self {
            table: MarketTable::defaults(),
            active: DEFAULT_ACTIVE,
            gate: ReadyGate::new(),
        }
    }

    pub fn table(&self) -> &MarketTable {
        &self.table
    }

    pub fn active_id(&self) -> &str {
        self.active
    }

    /// Selector highlight state, derived from the active id.
    pub fn is_active(&self, id: &str) -> bool {
        self.active == id
    }

    fn active_market(&self) -> Option<&Market> {
        self.table.get(self.active)
    }

    /// The active market's boundary feature; `None` only if the table
    /// is inconsistent, which the fixed table rules out.
    pub fn active_feature(&self) -> Option<&Feature> {
        self.active_market().map(Market::feature)
    }

    fn specs(&self) -> Option<(Vec<SourceSpec>, Vec<LayerSpec>)> {
        let market = self.active_market()?;

        let sources = vec![
            SourceSpec {
                id: BOUNDARY_SOURCE,
                data: SourceData::Feature(market.feature().clone()),
            },
            SourceSpec {
                id: LABEL_SOURCE,
                data: SourceData::Collection(market.label_collection()),
            },
        ];

        let layers = vec![
            LayerSpec {
                id: FILL_LAYER,
                source: BOUNDARY_SOURCE,
                paint: LayerPaint::Fill {
                    color: ACCENT,
                    opacity: FILL_OPACITY,
                },
            },
            LayerSpec {
                id: OUTLINE_LAYER,
                source: BOUNDARY_SOURCE,
                paint: LayerPaint::Line {
                    color: ACCENT,
                    width: OUTLINE_WIDTH,
                },
            },
            LayerSpec {
                id: LABEL_LAYER,
                source: LABEL_SOURCE,
                paint: LayerPaint::Symbol {
                    text: Color32::WHITE,
                    halo: LABEL_HALO,
                    halo_width: LABEL_HALO_WIDTH,
                },
            },
        ];

        Some((sources, layers))
    }

    /// Create-or-update both sources and add any missing layer.
    pub fn ensure_layers(&self, map: &mut MapHandle) {
        let Some((sources, layers)) = self.specs() else {
            return;
        };
        if let Err(err) = reconcile(map.registry_mut(), &sources, &layers) {
            error!("market layer reconcile failed: {err}");
        }
    }

    /// Activate a market by id. Unknown ids are logged and ignored;
    /// activations arriving before the style is ready are queued and
    /// replayed on the next style load.
    pub fn set_active(&mut self, map: &mut MapHandle, id: &str, fit: bool, now: f64) {
        let Some(market) = self.table.get(id) else {
            warn!(market = id, "ignoring activation of unknown market");
            return;
        };
        let id = market.id;

        if !map.style_ready() {
            self.gate.defer(Activation { id, fit });
            return;
        }

        self.active = id;
        self.ensure_layers(map);
        if fit {
            self.fit_active(map, now);
        }
    }

    fn fit_active(&self, map: &mut MapHandle, now: f64) {
        let Some(geometry) = self.active_market().and_then(Market::geometry) else {
            return;
        };
        match Bounds::from_geometry(geometry) {
            Ok(bounds) => map.fit_bounds(&bounds, FitOptions::default(), now),
            Err(err) => warn!("skipping camera fit: {err}"),
        }
    }

    pub fn handle_event(&mut self, map: &mut MapHandle, event: MapEvent, now: f64) {
        match event {
            MapEvent::StyleLoad => {
                let pending = self.gate.take();
                if pending.is_empty() {
                    // A style swap must not move the viewport.
                    self.ensure_layers(map);
                } else {
                    for activation in pending {
                        self.set_active(map, activation.id, activation.fit, now);
                    }
                }
            }
            MapEvent::Load => {
                self.ensure_layers(map);
                self.fit_active(map, now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::BaseStyle;
    use crossbeam_channel::{unbounded, Receiver};
    use geojson::Value;
    use propmap_core::LngLat;

    fn ready_map() -> (MapHandle, Receiver<MapEvent>) {
        let (tx, rx) = unbounded();
        let mut map = MapHandle::new(
            BaseStyle::Map,
            LngLat::new(-76.525583, 39.25904),
            12.0,
            None,
            tx,
        );
        map.tick(0.0);
        map.tick(0.1);
        let _ = rx.try_iter().count();
        (map, rx)
    }

    fn boundary_data(map: &MapHandle) -> &SourceData {
        map.registry().source(BOUNDARY_SOURCE).unwrap()
    }

    #[test]
    fn test_ensure_twice_registers_each_id_once() {
        let (mut map, _rx) = ready_map();
        let overlay = MarketOverlay::new();

        overlay.ensure_layers(&mut map);
        overlay.ensure_layers(&mut map);

        assert_eq!(map.registry().source_count(), 2);
        assert_eq!(map.registry().layer_count(), 3);
        assert!(map.registry().has_layer(FILL_LAYER));
        assert!(map.registry().has_layer(OUTLINE_LAYER));
        assert!(map.registry().has_layer(LABEL_LAYER));
    }

    #[test]
    fn test_activate_baltimore_scenario() {
        let (mut map, _rx) = ready_map();
        let mut overlay = MarketOverlay::new();
        overlay.ensure_layers(&mut map);

        overlay.set_active(&mut map, "baltimore", true, 1.0);

        assert_eq!(overlay.active_id(), "baltimore");
        let baltimore = overlay.table().get("baltimore").unwrap();
        assert_eq!(
            boundary_data(&map),
            &SourceData::Feature(baltimore.feature().clone())
        );
        assert_eq!(overlay.active_feature(), Some(baltimore.feature()));

        let SourceData::Collection(labels) = map.registry().source(LABEL_SOURCE).unwrap() else {
            panic!("label source should be a collection");
        };
        assert_eq!(labels.features.len(), 1);
        let label = &labels.features[0];
        assert_eq!(
            label.properties.as_ref().unwrap()["name"],
            "Baltimore Metro"
        );
        assert_eq!(
            label.geometry.as_ref().unwrap().value,
            Value::Point(vec![-76.6122, 39.2904])
        );

        // Every other selector reads as not-active.
        for market in overlay.table().iter() {
            assert_eq!(overlay.is_active(market.id), market.id == "baltimore");
        }

        assert!(map.is_camera_animating());
    }

    #[test]
    fn test_unknown_id_changes_nothing() {
        let (mut map, _rx) = ready_map();
        let mut overlay = MarketOverlay::new();
        overlay.ensure_layers(&mut map);
        let before = boundary_data(&map).clone();

        overlay.set_active(&mut map, "atlantis", true, 1.0);

        assert_eq!(overlay.active_id(), DEFAULT_ACTIVE);
        assert_eq!(boundary_data(&map), &before);
        assert!(!map.is_camera_animating());
    }

    #[test]
    fn test_activation_before_ready_is_deferred_and_replayed() {
        let (tx, rx) = unbounded();
        let mut map = MapHandle::new(BaseStyle::Map, LngLat::new(0.0, 0.0), 10.0, None, tx);
        let mut overlay = MarketOverlay::new();

        // Style not loaded yet: the activation must not touch the registry.
        overlay.set_active(&mut map, "baltimore", false, 0.0);
        assert_eq!(overlay.active_id(), DEFAULT_ACTIVE);
        assert_eq!(map.registry().layer_count(), 0);

        map.tick(0.0);
        map.tick(0.1);
        for event in rx.try_iter().collect::<Vec<_>>() {
            overlay.handle_event(&mut map, event, 0.2);
        }

        assert_eq!(overlay.active_id(), "baltimore");
        assert_eq!(map.registry().layer_count(), 3);
    }

    #[test]
    fn test_later_deferred_activation_wins() {
        let (tx, rx) = unbounded();
        let mut map = MapHandle::new(BaseStyle::Map, LngLat::new(0.0, 0.0), 10.0, None, tx);
        let mut overlay = MarketOverlay::new();

        overlay.set_active(&mut map, "baltimore", false, 0.0);
        overlay.set_active(&mut map, "chesapeake-bay", false, 0.0);

        map.tick(0.0);
        map.tick(0.1);
        for event in rx.try_iter().collect::<Vec<_>>() {
            overlay.handle_event(&mut map, event, 0.2);
        }

        assert_eq!(overlay.active_id(), "chesapeake-bay");
    }

    #[test]
    fn test_style_reload_restores_current_data() {
        let (mut map, rx) = ready_map();
        let mut overlay = MarketOverlay::new();
        overlay.ensure_layers(&mut map);
        overlay.set_active(&mut map, "baltimore", false, 0.0);

        // Swap wipes everything registered on the widget.
        assert!(map.set_base_style(BaseStyle::Map));
        assert_eq!(map.registry().layer_count(), 0);

        map.tick(1.0);
        for event in rx.try_iter().collect::<Vec<_>>() {
            overlay.handle_event(&mut map, event, 1.0);
        }

        assert_eq!(map.registry().layer_count(), 3);
        let baltimore = overlay.table().get("baltimore").unwrap();
        assert_eq!(
            boundary_data(&map),
            &SourceData::Feature(baltimore.feature().clone())
        );
        // Reload alone must not move the camera.
        assert!(!map.is_camera_animating());
    }
}
