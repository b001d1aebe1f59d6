//! The injected map-widget handle.
//!
//! `MapHandle` wraps everything the overlay managers are allowed to
//! touch: the source/layer registry, the camera, and the base-style
//! state machine. It is created once by the application and passed down
//! explicitly; there is no global handle.
//!
//! Style lifecycle: `Unloaded → Loading → Ready`. A base-style swap
//! re-enters `Loading` and clears the whole registry, which is how the
//! widget platform behaves; overlays tolerate it by re-ensuring their
//! layers on every `StyleLoad` event. The first transition to `Ready`
//! additionally emits `Load`, exactly once.

pub mod camera;
pub mod gate;
pub mod layers;
pub mod style;

use crossbeam_channel::Sender;
use egui::Vec2;
use thiserror::Error;
use tracing::warn;
use walkers::{lon_lat, MapMemory};

use propmap_core::{Bounds, LngLat};

use camera::{camera_for_bounds, CameraAnimator, FitOptions};
use layers::LayerRegistry;
pub use style::BaseStyle;

/// Errors surfaced by the raw registry API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("duplicate source id: {0}")]
    DuplicateSource(String),

    #[error("duplicate layer id: {0}")]
    DuplicateLayer(String),

    #[error("unknown source id: {0}")]
    UnknownSource(String),
}

/// Events emitted by the handle, drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    /// The style finished loading (fires after every style swap).
    StyleLoad,
    /// The map is ready for the first time (fires once).
    Load,
}

/// Style lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleState {
    Unloaded,
    Loading,
    Ready,
}

/// The long-lived map handle. See module docs.
pub struct MapHandle {
    base: BaseStyle,
    state: StyleState,
    pub(crate) registry: LayerRegistry,
    /// walkers camera state, rendered against each frame.
    pub(crate) memory: MapMemory,
    center: LngLat,
    zoom: f64,
    camera: CameraAnimator,
    viewport: Vec2,
    first_load_done: bool,
    satellite_token: Option<String>,
    events: Sender<MapEvent>,
}

impl MapHandle {
    pub fn new(
        base: BaseStyle,
        center: LngLat,
        zoom: f64,
        satellite_token: Option<String>,
        events: Sender<MapEvent>,
    ) -> Self {
        let mut memory = MapMemory::default();
        let _ = memory.set_zoom(zoom);

        Self {
            base,
            state: StyleState::Unloaded,
            registry: LayerRegistry::new(),
            memory,
            center,
            zoom,
            camera: CameraAnimator::default(),
            viewport: Vec2::new(1280.0, 720.0),
            first_load_done: false,
            satellite_token,
            events,
        }
    }

    pub fn base_style(&self) -> BaseStyle {
        self.base
    }

    pub fn style_state(&self) -> StyleState {
        self.state
    }

    pub fn style_ready(&self) -> bool {
        self.state == StyleState::Ready
    }

    pub fn center(&self) -> LngLat {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn satellite_token(&self) -> Option<&str> {
        self.satellite_token.as_deref()
    }

    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut LayerRegistry {
        &mut self.registry
    }

    /// Advance the style state machine and the camera. Call once per
    /// frame, before draining events. Returns true while another frame
    /// should follow immediately.
    pub fn tick(&mut self, now: f64) -> bool {
        let state_advanced = match self.state {
            StyleState::Unloaded => {
                self.state = StyleState::Loading;
                true
            }
            StyleState::Loading => {
                self.state = StyleState::Ready;
                let _ = self.events.send(MapEvent::StyleLoad);
                if !self.first_load_done {
                    self.first_load_done = true;
                    let _ = self.events.send(MapEvent::Load);
                }
                true
            }
            StyleState::Ready => false,
        };

        if let Some((center, zoom)) = self.camera.tick(now) {
            self.center = center;
            self.zoom = zoom;
            self.memory.center_at(lon_lat(center.lon, center.lat));
            let _ = self.memory.set_zoom(zoom);
        }

        state_advanced || self.camera.is_animating()
    }

    /// Swap the base style. Clears every registered source and layer
    /// and re-enters `Loading`; returns false when the swap is refused
    /// (satellite without an access token).
    pub fn set_base_style(&mut self, kind: BaseStyle) -> bool {
        if kind == BaseStyle::Satellite && self.satellite_token.is_none() {
            warn!("satellite style requested without an access token; keeping current style");
            return false;
        }

        self.base = kind;
        self.registry.clear();
        self.state = StyleState::Loading;
        true
    }

    /// Record the map panel's size, used for camera fitting.
    pub fn set_viewport(&mut self, size: Vec2) {
        if size.x > 0.0 && size.y > 0.0 {
            self.viewport = size;
        }
    }

    /// Animated transition to the pose that fits `bounds`.
    pub fn fit_bounds(&mut self, bounds: &Bounds, options: FitOptions, now: f64) {
        let target = camera_for_bounds(bounds, self.viewport, options.padding);
        self.camera
            .start((self.center, self.zoom), target, options.duration_ms, now);
    }

    pub fn is_camera_animating(&self) -> bool {
        self.camera.is_animating()
    }
}
