//! Geographic primitives and spherical geometry.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mean Earth radius used for great-circle distances, in meters.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_000.0;

/// WGS84 equatorial radius used by the geodesic area formula, in meters.
pub const EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;

/// Degrees of latitude per meter, the approximation used to turn a circle
/// radius into a bounding box.
const DEGREES_PER_METER: f64 = 1.0 / 111_000.0;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another coordinate, in meters (haversine).
    pub fn distance_to(&self, other: LatLng) -> f64 {
        let d2r = PI / 180.0;
        let lat1 = self.lat * d2r;
        let lat2 = other.lat * d2r;
        let dlat = (other.lat - self.lat) * d2r;
        let dlng = (other.lng - self.lng) * d2r;

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * MEAN_EARTH_RADIUS_M * a.sqrt().asin()
    }
}

/// An axis-aligned extent in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    /// Build bounds from two opposite corners, in any order.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south: a.lat.min(b.lat),
            west: a.lng.min(b.lng),
            north: a.lat.max(b.lat),
            east: a.lng.max(b.lng),
        }
    }

    /// Smallest bounds enclosing all points. `None` for an empty slice.
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let first = *points.first()?;
        let mut bounds = Self::from_corners(first, first);
        for &p in &points[1..] {
            bounds.extend(p);
        }
        Some(bounds)
    }

    /// Square box around a circle, using the flat degrees-per-meter
    /// approximation.
    pub fn from_center_radius(center: LatLng, radius_m: f64) -> Self {
        let delta = radius_m * DEGREES_PER_METER;
        Self {
            south: center.lat - delta,
            west: center.lng - delta,
            north: center.lat + delta,
            east: center.lng + delta,
        }
    }

    /// Grow the bounds to include a point.
    pub fn extend(&mut self, p: LatLng) {
        self.south = self.south.min(p.lat);
        self.west = self.west.min(p.lng);
        self.north = self.north.max(p.lat);
        self.east = self.east.max(p.lng);
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lng >= self.west && p.lng <= self.east
    }

    pub fn center(&self) -> LatLng {
        LatLng::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// Corner ring in draw order: SW, SE, NE, NW.
    pub fn corners(&self) -> [LatLng; 4] {
        [
            LatLng::new(self.south, self.west),
            LatLng::new(self.south, self.east),
            LatLng::new(self.north, self.east),
            LatLng::new(self.north, self.west),
        ]
    }
}

/// Sum of great-circle distances between consecutive vertices, in meters.
pub fn polyline_length(points: &[LatLng]) -> f64 {
    points
        .windows(2)
        .map(|w| w[0].distance_to(w[1]))
        .sum()
}

/// Geodesic surface area of a ring, in square meters.
///
/// Signed spherical excess summation over the ring's edges; the ring is
/// treated as closed, so the last vertex does not need to repeat the first.
pub fn geodesic_ring_area(ring: &[LatLng]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let d2r = PI / 180.0;
    let mut area = 0.0;
    for i in 0..ring.len() {
        let p1 = ring[i];
        let p2 = ring[(i + 1) % ring.len()];
        area += (p2.lng - p1.lng) * d2r * (2.0 + (p1.lat * d2r).sin() + (p2.lat * d2r).sin());
    }
    (area * EQUATORIAL_RADIUS_M * EQUATORIAL_RADIUS_M / 2.0).abs()
}
