#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map widget model behind a rendering capability trait.
//!
//! [`MapWidget`] owns the bookkeeping an interactive map needs (the single
//! drawn area of interest, the active base layer, the LULC and buffer tile
//! overlays and the location marker) and drives any [`MapSurface`]
//! implementation. The workflow never talks to a concrete map library; it
//! only produces [`OverlayUrls`] and consumes the [`AreaOfInterest`]
//! returned by [`GeometryCapture::capture`].

pub mod aoi;
pub mod recording;
pub mod widget;

use serde::{Deserialize, Serialize};
use sylithe_analysis_models::AreaOfInterest;

pub use aoi::{Footprint, import_aoi, rectangle};
pub use recording::{RecordingSurface, SurfaceEvent};
pub use widget::MapWidget;

/// A geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Map centre and zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

/// View shown when the map is first mounted (central India).
pub const INITIAL_VIEW: MapView = MapView {
    center: LatLng::new(20.0, 78.0),
    zoom: 5,
};

/// Zoom used when centring on a location.
pub const LOCATION_ZOOM: u8 = 13;

/// Layer slots a surface keeps at most one layer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LayerSlot {
    Base,
    Lulc,
    Buffer,
}

/// A raster tile layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    /// URL template with `{z}`, `{x}`, `{y}` (and optionally `{s}`).
    pub url: String,
    pub opacity: f64,
    pub attribution: Option<String>,
}

/// Selectable background imagery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseLayer {
    #[default]
    Street,
    Satellite,
}

impl BaseLayer {
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::Street => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            Self::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
        }
    }

    #[must_use]
    pub const fn attribution(self) -> &'static str {
        match self {
            Self::Street => "© OpenStreetMap",
            Self::Satellite => "© Esri",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Street => "Street",
            Self::Satellite => "Satellite",
        }
    }

    /// The other base layer.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Street => Self::Satellite,
            Self::Satellite => Self::Street,
        }
    }

    #[must_use]
    pub fn tile_layer(self) -> TileLayer {
        TileLayer {
            url: self.url().to_string(),
            opacity: 1.0,
            attribution: Some(self.attribution().to_string()),
        }
    }
}

/// Tile URLs the current analysis state wants on the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayUrls {
    pub lulc_tile_url: Option<String>,
    pub buffer_tile_url: Option<String>,
}

/// Rendering capabilities a concrete map implementation provides.
pub trait MapSurface {
    fn set_view(&mut self, view: MapView);

    /// Adds a layer in `slot`. The widget always removes the previous
    /// occupant first.
    fn add_tile_layer(&mut self, slot: LayerSlot, layer: TileLayer);

    fn remove_layer(&mut self, slot: LayerSlot);

    /// Empties the drawing layer.
    fn clear_drawings(&mut self);

    fn add_drawing(&mut self, shape: &AreaOfInterest);

    fn set_marker(&mut self, at: LatLng);

    fn remove_marker(&mut self);
}

/// Renders analysis tile overlays.
pub trait TileOverlayRenderer {
    fn render_overlays(&mut self, overlays: &OverlayUrls);
}

/// Accepts a user-drawn or imported shape and emits it for analysis.
pub trait GeometryCapture {
    /// Replaces the current shape and returns it unchanged.
    fn capture(&mut self, shape: AreaOfInterest) -> AreaOfInterest;
}
