//! Propmap Desktop GUI
//!
//! Interactive market & property map viewer.

mod app;
mod map;
mod overlays;
mod panels;
mod render;

use clap::Parser;

use app::{PropmapApp, ViewConfig};
use propmap_core::LngLat;

#[derive(Parser)]
#[command(name = "propmap")]
#[command(author, version, about = "Interactive market & property map viewer", long_about = None)]
struct Cli {
    /// Initial view center longitude
    #[arg(long, default_value_t = -76.525583)]
    lon: f64,

    /// Initial view center latitude
    #[arg(long, default_value_t = 39.25904)]
    lat: f64,

    /// Initial zoom level
    #[arg(long, default_value_t = 12.0)]
    zoom: f64,

    /// Mapbox access token for the satellite style
    #[arg(long, env = "PROPMAP_MAPBOX_TOKEN")]
    satellite_token: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> eframe::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Propmap — Markets & Properties")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    let config = ViewConfig {
        center: LngLat::new(cli.lon, cli.lat),
        zoom: cli.zoom,
        satellite_token: cli.satellite_token,
    };

    eframe::run_native(
        "Propmap",
        native_options,
        Box::new(|cc| Ok(Box::new(PropmapApp::new(cc, config)))),
    )
}
