//! # Propmap Core
//!
//! Data and geometry layer for the Propmap viewer.
//!
//! This crate provides:
//! - `LngLat` / `Bounds`: WGS-84 positions and axis-aligned extents
//! - `Market` / `MarketTable`: the fixed table of market regions
//! - `PropertyInfo`: the static property record behind the map marker
//! - Outline normalization for GeoJSON geometry/feature input

pub mod error;
pub mod geometry;
pub mod market;
pub mod property;

pub use error::{Error, Result};
pub use geometry::{Bounds, LngLat};
pub use market::{Market, MarketTable};
pub use property::{PropertyInfo, TooltipInfo};
