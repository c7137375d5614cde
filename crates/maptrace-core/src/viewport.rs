//! Viewport state (center/zoom) for the external render surface.

use crate::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

/// Maximum tile zoom of the basemap.
pub const MAX_ZOOM: u8 = 19;

/// The pan/zoom state owned by the tiled basemap.
///
/// The render surface does the actual tile math; this mirrors just enough of
/// it (center plus a tile-style zoom level) for recentring commands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for Viewport {
    /// Initial view over New York.
    fn default() -> Self {
        Self {
            center: LatLng::new(40.7128, -74.0060),
            zoom: 10,
        }
    }
}

impl Viewport {
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.min(MAX_ZOOM),
        }
    }

    /// Recenter at a fixed zoom.
    pub fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.center = center;
        self.zoom = zoom.min(MAX_ZOOM);
    }

    /// Center on `bounds` and pick the deepest zoom that still shows the
    /// whole extent, capped at `max_zoom`.
    pub fn fit_bounds(&mut self, bounds: LatLngBounds, max_zoom: u8) {
        self.center = bounds.center();
        let span = bounds.lat_span().max(bounds.lng_span());
        let zoom = if span <= 0.0 {
            max_zoom
        } else {
            // 360 degrees of longitude fit at zoom 0
            let z = (360.0 / span).log2().floor().clamp(0.0, MAX_ZOOM as f64);
            z as u8
        };
        self.zoom = zoom.min(max_zoom);
    }
}
