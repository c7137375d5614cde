//! Drawn feature definitions.

use crate::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for features, stable across save/reload.
pub type FeatureId = Uuid;

/// How close a click must land to claim a marker, in meters.
pub const MARKER_CLICK_RADIUS_M: f64 = 50.0;

/// The five drawable feature kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    Marker,
    Line,
    Polygon,
    Rectangle,
    Circle,
}

impl FeatureKind {
    /// Display name used by the info panel.
    pub fn name(&self) -> &'static str {
        match self {
            FeatureKind::Marker => "Marker",
            FeatureKind::Line => "Line",
            FeatureKind::Polygon => "Polygon",
            FeatureKind::Rectangle => "Rectangle",
            FeatureKind::Circle => "Circle",
        }
    }
}

/// Kind-specific geometry of a drawn feature.
///
/// Line and Polygon carry their vertices in draw order; the polygon ring is
/// stored unclosed. Rectangles keep their bounds so the kind survives a
/// save/reload round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Marker(LatLng),
    Line(Vec<LatLng>),
    Polygon(Vec<LatLng>),
    Rectangle(LatLngBounds),
    Circle { center: LatLng, radius_m: f64 },
}

impl Geometry {
    pub fn kind(&self) -> FeatureKind {
        match self {
            Geometry::Marker(_) => FeatureKind::Marker,
            Geometry::Line(_) => FeatureKind::Line,
            Geometry::Polygon(_) => FeatureKind::Polygon,
            Geometry::Rectangle(_) => FeatureKind::Rectangle,
            Geometry::Circle { .. } => FeatureKind::Circle,
        }
    }

    /// Bounding box in geographic coordinates.
    pub fn bounds(&self) -> LatLngBounds {
        match self {
            Geometry::Marker(p) => LatLngBounds::from_corners(*p, *p),
            Geometry::Line(points) | Geometry::Polygon(points) => {
                LatLngBounds::from_points(points)
                    .unwrap_or_else(|| LatLngBounds::from_corners(LatLng::new(0.0, 0.0), LatLng::new(0.0, 0.0)))
            }
            Geometry::Rectangle(bounds) => *bounds,
            Geometry::Circle { center, radius_m } => {
                LatLngBounds::from_center_radius(*center, *radius_m)
            }
        }
    }

    /// Whether a map click at `point` belongs to this feature.
    ///
    /// Markers claim clicks within a fixed proximity radius, circles by
    /// center distance, everything else by bounding-box containment.
    pub fn claims_click(&self, point: LatLng) -> bool {
        match self {
            Geometry::Marker(p) => p.distance_to(point) <= MARKER_CLICK_RADIUS_M,
            Geometry::Circle { center, radius_m } => center.distance_to(point) <= *radius_m,
            _ => self.bounds().contains(point),
        }
    }
}

/// Stroke style of a feature. Exactly two states exist: normal and selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureStyle {
    pub color: String,
    pub weight: u32,
}

impl FeatureStyle {
    pub fn normal() -> Self {
        Self {
            color: "#3388ff".to_string(),
            weight: 3,
        }
    }

    pub fn selected() -> Self {
        Self {
            color: "#ff7800".to_string(),
            weight: 4,
        }
    }
}

impl Default for FeatureStyle {
    fn default() -> Self {
        Self::normal()
    }
}

/// One user-drawn geometric object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
    pub style: FeatureStyle,
}

impl Feature {
    /// Create a feature with a fresh id and normal style.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry,
            style: FeatureStyle::normal(),
        }
    }

    /// Rebuild a feature with a known id (used when restoring a saved record).
    pub fn reconstruct(id: FeatureId, geometry: Geometry) -> Self {
        Self {
            id,
            geometry,
            style: FeatureStyle::normal(),
        }
    }

    pub fn kind(&self) -> FeatureKind {
        self.geometry.kind()
    }

    pub fn bounds(&self) -> LatLngBounds {
        self.geometry.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_geometry() {
        let circle = Geometry::Circle {
            center: LatLng::new(0.0, 0.0),
            radius_m: 100.0,
        };
        assert_eq!(circle.kind(), FeatureKind::Circle);
        assert_eq!(Geometry::Marker(LatLng::new(1.0, 2.0)).kind(), FeatureKind::Marker);
    }

    #[test]
    fn test_marker_claims_nearby_clicks_only() {
        let marker = Geometry::Marker(LatLng::new(40.0, -74.0));
        // ~11 m east of the marker
        assert!(marker.claims_click(LatLng::new(40.0, -73.9999)));
        // ~1.1 km east
        assert!(!marker.claims_click(LatLng::new(40.0, -73.99)));
    }

    #[test]
    fn test_circle_claims_by_center_distance() {
        let circle = Geometry::Circle {
            center: LatLng::new(40.0, -74.0),
            radius_m: 1000.0,
        };
        assert!(circle.claims_click(LatLng::new(40.005, -74.0)));
        assert!(!circle.claims_click(LatLng::new(40.02, -74.0)));
    }

    #[test]
    fn test_rectangle_claims_by_containment() {
        let rect = Geometry::Rectangle(LatLngBounds::from_corners(
            LatLng::new(0.0, 0.0),
            LatLng::new(1.0, 1.0),
        ));
        assert!(rect.claims_click(LatLng::new(0.5, 0.5)));
        assert!(!rect.claims_click(LatLng::new(1.5, 0.5)));
    }

    #[test]
    fn test_fresh_features_get_unique_ids() {
        let a = Feature::new(Geometry::Marker(LatLng::new(0.0, 0.0)));
        let b = Feature::new(Geometry::Marker(LatLng::new(0.0, 0.0)));
        assert_ne!(a.id, b.id);
        assert_eq!(a.style, FeatureStyle::normal());
    }
}
