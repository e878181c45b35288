//! The map widget state machine.

use sylithe_analysis_models::AreaOfInterest;

use crate::aoi::Footprint;
use crate::{
    BaseLayer, GeometryCapture, INITIAL_VIEW, LOCATION_ZOOM, LatLng, LayerSlot, MapSurface,
    MapView, OverlayUrls, TileLayer, TileOverlayRenderer,
};

const LULC_OPACITY: f64 = 0.7;
const BUFFER_OPACITY: f64 = 1.0;

/// Map widget driving a [`MapSurface`].
///
/// Constructed only through [`MapWidget::mount`], so the surface is
/// initialised exactly once. At most one drawn shape, one LULC overlay,
/// one buffer overlay and one location marker exist at any time.
pub struct MapWidget<S: MapSurface> {
    surface: S,
    base_layer: BaseLayer,
    shape: Option<AreaOfInterest>,
    lulc_tile_url: Option<String>,
    buffer_tile_url: Option<String>,
    location: Option<LatLng>,
}

impl<S: MapSurface> MapWidget<S> {
    /// Initialises `surface` with the default view and street imagery.
    pub fn mount(mut surface: S) -> Self {
        surface.set_view(INITIAL_VIEW);
        surface.add_tile_layer(LayerSlot::Base, BaseLayer::Street.tile_layer());
        log::debug!("Map mounted at {:?}", INITIAL_VIEW.center);

        Self {
            surface,
            base_layer: BaseLayer::Street,
            shape: None,
            lulc_tile_url: None,
            buffer_tile_url: None,
            location: None,
        }
    }

    #[must_use]
    pub const fn base_layer(&self) -> BaseLayer {
        self.base_layer
    }

    pub fn set_base_layer(&mut self, layer: BaseLayer) {
        if layer == self.base_layer {
            return;
        }
        self.surface.remove_layer(LayerSlot::Base);
        self.surface.add_tile_layer(LayerSlot::Base, layer.tile_layer());
        self.base_layer = layer;
    }

    pub fn toggle_base_layer(&mut self) {
        self.set_base_layer(self.base_layer.toggled());
    }

    /// Handles a "shape created" event: clears the drawing layer, draws the
    /// new shape and returns it for the orchestrator. The geometry is not
    /// validated.
    pub fn shape_created(&mut self, shape: AreaOfInterest) -> AreaOfInterest {
        self.surface.clear_drawings();
        self.surface.add_drawing(&shape);
        self.shape = Some(shape.clone());
        shape
    }

    /// The currently drawn shape.
    #[must_use]
    pub const fn shape(&self) -> Option<&AreaOfInterest> {
        self.shape.as_ref()
    }

    /// Replaces overlay layers whose URL changed.
    ///
    /// A missing LULC URL leaves the current LULC layer on the map; a
    /// missing buffer URL removes the buffer layer.
    pub fn sync_overlays(&mut self, overlays: &OverlayUrls) {
        if let Some(url) = &overlays.lulc_tile_url
            && self.lulc_tile_url.as_ref() != Some(url)
        {
            self.replace_overlay(LayerSlot::Lulc, url, LULC_OPACITY);
            self.lulc_tile_url = Some(url.clone());
        }

        match &overlays.buffer_tile_url {
            Some(url) if self.buffer_tile_url.as_ref() != Some(url) => {
                self.replace_overlay(LayerSlot::Buffer, url, BUFFER_OPACITY);
                self.buffer_tile_url = Some(url.clone());
            }
            Some(_) => {}
            None => {
                if self.buffer_tile_url.take().is_some() {
                    self.surface.remove_layer(LayerSlot::Buffer);
                }
            }
        }
    }

    fn replace_overlay(&mut self, slot: LayerSlot, url: &str, opacity: f64) {
        self.surface.remove_layer(slot);
        self.surface.add_tile_layer(
            slot,
            TileLayer {
                url: url.to_string(),
                opacity,
                attribution: None,
            },
        );
    }

    /// Current overlay URLs as rendered.
    #[must_use]
    pub fn overlays(&self) -> OverlayUrls {
        OverlayUrls {
            lulc_tile_url: self.lulc_tile_url.clone(),
            buffer_tile_url: self.buffer_tile_url.clone(),
        }
    }

    /// Centres on `at` at street zoom, replacing any previous location
    /// marker.
    pub fn go_to(&mut self, at: LatLng) {
        self.surface.set_view(MapView {
            center: at,
            zoom: LOCATION_ZOOM,
        });
        if self.location.is_some() {
            self.surface.remove_marker();
        }
        self.surface.set_marker(at);
        self.location = Some(at);
    }

    /// Centres on a shape's footprint at a zoom that fits its extent.
    pub fn frame(&mut self, footprint: &Footprint) {
        self.surface.set_view(MapView {
            center: footprint.centroid,
            zoom: footprint.fit_zoom(),
        });
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

impl<S: MapSurface> TileOverlayRenderer for MapWidget<S> {
    fn render_overlays(&mut self, overlays: &OverlayUrls) {
        self.sync_overlays(overlays);
    }
}

impl<S: MapSurface> GeometryCapture for MapWidget<S> {
    fn capture(&mut self, shape: AreaOfInterest) -> AreaOfInterest {
        self.shape_created(shape)
    }
}
