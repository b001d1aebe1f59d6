//! Main application: PropmapApp implements eframe::App.

use crossbeam_channel::Receiver;
use walkers::{lon_lat, HttpTiles, Map};

use propmap_core::LngLat;

use crate::map::{style, BaseStyle, MapEvent, MapHandle};
use crate::overlays::markets::MarketOverlay;
use crate::overlays::property::PropertyOverlay;
use crate::panels::controls::{show_market_buttons, show_top_bar, ControlAction};
use crate::render::layers::GeoJsonLayers;
use crate::render::marker::PropertyMarker;

/// Initial view and provider configuration from the CLI.
pub struct ViewConfig {
    pub center: LngLat,
    pub zoom: f64,
    pub satellite_token: Option<String>,
}

/// The main application state.
pub struct PropmapApp {
    /// The injected map handle shared with the overlay managers.
    map: MapHandle,

    /// Tile fetcher for the current base style.
    tiles: HttpTiles,

    /// Map events drained once per frame.
    rx: Receiver<MapEvent>,

    markets: MarketOverlay,
    property: PropertyOverlay,

    /// Filter panel visibility.
    filters_visible: bool,
}

impl PropmapApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ViewConfig) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();

        let map = MapHandle::new(
            BaseStyle::Map,
            config.center,
            config.zoom,
            config.satellite_token,
            tx,
        );
        let tiles = style::tiles_for(BaseStyle::Map, None, &cc.egui_ctx);

        let app = Self {
            map,
            tiles,
            rx,
            markets: MarketOverlay::new(),
            property: PropertyOverlay::new(),
            filters_visible: false,
        };
        app.apply_chrome(&cc.egui_ctx);
        app
    }

    /// Drain pending map events into the overlay managers.
    fn process_events(&mut self, now: f64) {
        while let Ok(event) = self.rx.try_recv() {
            self.markets.handle_event(&mut self.map, event, now);
            self.property.handle_event(&mut self.map, event);
        }
    }

    /// Chrome follows the base style; satellite gets darker panels.
    fn apply_chrome(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.window_shadow = egui::epaint::Shadow::NONE;
        if self.map.base_style() == BaseStyle::Satellite {
            visuals.panel_fill = egui::Color32::from_rgb(8, 24, 24);
        }
        ctx.set_visuals(visuals);
    }

    fn set_base_style(&mut self, ctx: &egui::Context, kind: BaseStyle) {
        if self.map.set_base_style(kind) {
            self.tiles = style::tiles_for(kind, self.map.satellite_token(), ctx);
            self.apply_chrome(ctx);
        }
    }
}

impl eframe::App for PropmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        // Style state machine and camera first, then the events they
        // emitted, so layer mutation never runs against an unloaded
        // style in the same frame.
        if self.map.tick(now) {
            ctx.request_repaint();
        }
        self.process_events(now);

        let mut action = ControlAction::None;
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            action = show_top_bar(ui, self.map.base_style(), self.filters_visible);
        });
        match action {
            ControlAction::SetStyle(kind) => self.set_base_style(ctx, kind),
            ControlAction::ToggleFilters => self.filters_visible = !self.filters_visible,
            ControlAction::None => {}
        }

        let mut clicked_market = None;
        if self.filters_visible {
            egui::TopBottomPanel::bottom("filter_panel").show(ctx, |ui| {
                clicked_market = show_market_buttons(ui, &self.markets);
            });
        }
        if let Some(id) = clicked_market {
            self.markets.set_active(&mut self.map, id, true, now);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::default())
            .show(ctx, |ui| {
                self.map.set_viewport(ui.available_size());
                let center = self.map.center();

                let mut widget = Map::new(
                    Some(&mut self.tiles),
                    &mut self.map.memory,
                    lon_lat(center.lon, center.lat),
                )
                .with_plugin(GeoJsonLayers {
                    registry: &self.map.registry,
                });

                if self.property.marker_added() {
                    widget = widget.with_plugin(PropertyMarker {
                        info: &self.property.info,
                        open: &mut self.property.popup_open,
                    });
                }

                ui.add(widget);
            });
    }
}
