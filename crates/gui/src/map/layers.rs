//! Declarative source/layer specs and the widget-facing registry.
//!
//! The registry mirrors the map widget's own bookkeeping: sources hold
//! GeoJSON data, layers reference a source by id and carry paint
//! parameters. Adding a duplicate id is an error at this level;
//! [`reconcile`] is the routine that upserts sources and adds only the
//! layers that are missing, so callers never trigger that error across
//! repeated ensure passes or style reloads.

use egui::Color32;
use geojson::{Feature, FeatureCollection};

use super::MapError;

/// GeoJSON payload of a source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceData {
    Feature(Feature),
    Collection(FeatureCollection),
}

/// Desired state of one source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpec {
    pub id: &'static str,
    pub data: SourceData,
}

/// Paint parameters for a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerPaint {
    Fill { color: Color32, opacity: f32 },
    Line { color: Color32, width: f32 },
    Symbol { text: Color32, halo: Color32, halo_width: f32 },
}

/// Desired state of one layer: a named rendering rule over a source.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: &'static str,
    pub source: &'static str,
    pub paint: LayerPaint,
}

/// The set of sources and layers currently registered on the widget.
///
/// A style swap destroys this set wholesale (see `MapHandle`); in-memory
/// overlay state survives and re-registers through [`reconcile`].
#[derive(Debug, Default)]
pub struct LayerRegistry {
    sources: Vec<(&'static str, SourceData)>,
    layers: Vec<LayerSpec>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every source and layer (a style swap does this).
    pub fn clear(&mut self) {
        self.sources.clear();
        self.layers.clear();
    }

    pub fn source(&self, id: &str) -> Option<&SourceData> {
        self.sources
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, data)| data)
    }

    pub fn add_source(&mut self, id: &'static str, data: SourceData) -> Result<(), MapError> {
        if self.source(id).is_some() {
            return Err(MapError::DuplicateSource(id.to_string()));
        }
        self.sources.push((id, data));
        Ok(())
    }

    pub fn set_source_data(&mut self, id: &str, data: SourceData) -> Result<(), MapError> {
        match self.sources.iter_mut().find(|(sid, _)| *sid == id) {
            Some((_, slot)) => {
                *slot = data;
                Ok(())
            }
            None => Err(MapError::UnknownSource(id.to_string())),
        }
    }

    pub fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    pub fn add_layer(&mut self, layer: LayerSpec) -> Result<(), MapError> {
        if self.has_layer(layer.id) {
            return Err(MapError::DuplicateLayer(layer.id.to_string()));
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Layers in registration (draw) order.
    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

/// Apply the desired specs to the registry: create-or-update every
/// source, add every layer that is not yet present. Idempotent.
pub fn reconcile(
    registry: &mut LayerRegistry,
    sources: &[SourceSpec],
    layers: &[LayerSpec],
) -> Result<(), MapError> {
    for spec in sources {
        if registry.source(spec.id).is_none() {
            registry.add_source(spec.id, spec.data.clone())?;
        } else {
            registry.set_source_data(spec.id, spec.data.clone())?;
        }
    }

    for layer in layers {
        if !registry.has_layer(layer.id) {
            registry.add_layer(layer.clone())?;
        }
    }

    Ok(())
}
