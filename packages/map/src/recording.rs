//! In-memory [`MapSurface`] for headless use and tests.

use std::collections::BTreeMap;

use sylithe_analysis_models::AreaOfInterest;

use crate::{LatLng, LayerSlot, MapSurface, MapView, TileLayer};

/// Every call a [`RecordingSurface`] received, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    ViewSet(MapView),
    LayerAdded(LayerSlot, TileLayer),
    LayerRemoved(LayerSlot),
    DrawingsCleared,
    DrawingAdded,
    MarkerSet(LatLng),
    MarkerRemoved,
}

/// Keeps the resulting map state alongside the call log.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    view: Option<MapView>,
    layers: BTreeMap<LayerSlot, TileLayer>,
    drawings: Vec<AreaOfInterest>,
    marker: Option<LatLng>,
    events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    #[must_use]
    pub const fn view(&self) -> Option<MapView> {
        self.view
    }

    #[must_use]
    pub fn layer(&self, slot: LayerSlot) -> Option<&TileLayer> {
        self.layers.get(&slot)
    }

    /// Layers currently on the map, bottom to top.
    #[must_use]
    pub fn layers(&self) -> Vec<(LayerSlot, &TileLayer)> {
        self.layers.iter().map(|(slot, layer)| (*slot, layer)).collect()
    }

    #[must_use]
    pub fn drawings(&self) -> &[AreaOfInterest] {
        &self.drawings
    }

    #[must_use]
    pub const fn marker(&self) -> Option<LatLng> {
        self.marker
    }

    #[must_use]
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// How many times a layer was added to `slot`.
    #[must_use]
    pub fn count_adds(&self, slot: LayerSlot) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::LayerAdded(s, _) if *s == slot))
            .count()
    }
}

impl MapSurface for RecordingSurface {
    fn set_view(&mut self, view: MapView) {
        self.view = Some(view);
        self.events.push(SurfaceEvent::ViewSet(view));
    }

    fn add_tile_layer(&mut self, slot: LayerSlot, layer: TileLayer) {
        self.layers.insert(slot, layer.clone());
        self.events.push(SurfaceEvent::LayerAdded(slot, layer));
    }

    fn remove_layer(&mut self, slot: LayerSlot) {
        if self.layers.remove(&slot).is_some() {
            self.events.push(SurfaceEvent::LayerRemoved(slot));
        }
    }

    fn clear_drawings(&mut self) {
        self.drawings.clear();
        self.events.push(SurfaceEvent::DrawingsCleared);
    }

    fn add_drawing(&mut self, shape: &AreaOfInterest) {
        self.drawings.push(shape.clone());
        self.events.push(SurfaceEvent::DrawingAdded);
    }

    fn set_marker(&mut self, at: LatLng) {
        self.marker = Some(at);
        self.events.push(SurfaceEvent::MarkerSet(at));
    }

    fn remove_marker(&mut self) {
        self.marker = None;
        self.events.push(SurfaceEvent::MarkerRemoved);
    }
}
