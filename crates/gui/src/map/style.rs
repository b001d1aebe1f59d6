//! Base style discriminant and tile-provider construction.

use walkers::sources::{Mapbox, MapboxStyle, OpenStreetMap};
use walkers::HttpTiles;

/// The two base styles the viewer can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseStyle {
    /// Street map (OpenStreetMap tiles).
    Map,
    /// Satellite imagery (Mapbox, requires an access token).
    Satellite,
}

impl BaseStyle {
    pub const ALL: [BaseStyle; 2] = [BaseStyle::Map, BaseStyle::Satellite];

    pub fn label(self) -> &'static str {
        match self {
            BaseStyle::Map => "Map",
            BaseStyle::Satellite => "Satellite",
        }
    }
}

/// Build the tile fetcher for a base style.
///
/// Satellite falls back to street tiles when no token is available;
/// `MapHandle::set_base_style` refuses the swap before that happens.
pub fn tiles_for(
    style: BaseStyle,
    satellite_token: Option<&str>,
    ctx: &egui::Context,
) -> HttpTiles {
    match (style, satellite_token) {
        (BaseStyle::Satellite, Some(token)) => HttpTiles::new(
            Mapbox {
                style: MapboxStyle::Satellite,
                access_token: token.to_string(),
                high_resolution: false,
            },
            ctx.clone(),
        ),
        _ => HttpTiles::new(OpenStreetMap, ctx.clone()),
    }
}
