//! Selection metrics and the info panel text.

use crate::features::{Feature, Geometry};
use crate::geo::{geodesic_ring_area, polyline_length};
use crate::store::FeatureStore;
use std::f64::consts::PI;

/// Kind-specific measurement of a selected feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// Geodesic surface area (polygons and rectangles), in square meters.
    Area { square_meters: f64 },
    /// Circle radius plus its planar area.
    Circle { radius_m: f64, square_meters: f64 },
    /// Polyline length, in meters.
    Length { meters: f64 },
}

impl Measurement {
    /// Human-readable panel lines for this measurement.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Measurement::Area { square_meters } => vec![format!(
                "Area: {:.2} km\u{b2} ({:.2} hectares)",
                square_meters / 1e6,
                square_meters / 1e4
            )],
            Measurement::Circle {
                radius_m,
                square_meters,
            } => vec![
                format!("Radius: {radius_m:.0} m"),
                format!("Area: {:.2} km\u{b2}", square_meters / 1e6),
            ],
            Measurement::Length { meters } => vec![format!(
                "Length: {:.2} km ({meters:.0} m)",
                meters / 1e3
            )],
        }
    }
}

/// Measure a feature. Markers have no measurement.
///
/// Circle area is the planar pi*r^2 approximation, not geodesic.
pub fn measure(feature: &Feature) -> Option<Measurement> {
    match &feature.geometry {
        Geometry::Marker(_) => None,
        Geometry::Line(points) => Some(Measurement::Length {
            meters: polyline_length(points),
        }),
        Geometry::Polygon(ring) => Some(Measurement::Area {
            square_meters: geodesic_ring_area(ring),
        }),
        Geometry::Rectangle(bounds) => Some(Measurement::Area {
            square_meters: geodesic_ring_area(&bounds.corners()),
        }),
        Geometry::Circle { radius_m, .. } => Some(Measurement::Circle {
            radius_m: *radius_m,
            square_meters: PI * radius_m * radius_m,
        }),
    }
}

/// Info panel text: feature count always, plus kind and measurement of the
/// current selection. Pure function of the store.
pub fn panel_lines(store: &FeatureStore) -> Vec<String> {
    if store.is_empty() {
        return vec!["No areas drawn yet. Use the tools above to mark areas.".to_string()];
    }

    let mut lines = vec![format!("Total areas drawn: {}", store.len())];
    match store.selected() {
        Some(feature) => {
            lines.push(format!("Selected: {}", feature.kind().name()));
            if let Some(measurement) = measure(feature) {
                lines.extend(measurement.lines());
            }
        }
        None => lines.push("Click on any drawn area to select it.".to_string()),
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{LatLng, LatLngBounds};

    #[test]
    fn test_rectangle_area_scenario() {
        let feature = Feature::new(Geometry::Rectangle(LatLngBounds::from_corners(
            LatLng::new(0.0, 0.0),
            LatLng::new(0.01, 0.01),
        )));
        let Some(Measurement::Area { square_meters }) = measure(&feature) else {
            panic!("expected an area measurement");
        };
        let expected = 1.236e6;
        assert!((square_meters - expected).abs() / expected < 0.01);
        let line = &measure(&feature).unwrap().lines()[0];
        assert!(line.starts_with("Area: 1.2"), "got {line}");
        assert!(line.contains("hectares"));
    }

    #[test]
    fn test_circle_scenario() {
        let feature = Feature::new(Geometry::Circle {
            center: LatLng::new(40.0, -74.0),
            radius_m: 1000.0,
        });
        let lines = measure(&feature).unwrap().lines();
        assert_eq!(lines[0], "Radius: 1000 m");
        assert_eq!(lines[1], "Area: 3.14 km\u{b2}");
    }

    #[test]
    fn test_line_scenario() {
        let feature = Feature::new(Geometry::Line(vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(1.0, 0.0),
        ]));
        let lines = measure(&feature).unwrap().lines();
        assert_eq!(lines[0], "Length: 111.19 km (111195 m)");
    }

    #[test]
    fn test_marker_has_no_measurement() {
        let feature = Feature::new(Geometry::Marker(LatLng::new(0.0, 0.0)));
        assert_eq!(measure(&feature), None);
    }

    #[test]
    fn test_panel_without_features() {
        let store = FeatureStore::new();
        let lines = panel_lines(&store);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("No areas drawn yet"));
    }

    #[test]
    fn test_panel_with_selection() {
        let mut store = FeatureStore::new();
        store.add(Geometry::Marker(LatLng::new(0.0, 0.0)));
        let id = store.add(Geometry::Circle {
            center: LatLng::new(40.0, -74.0),
            radius_m: 1000.0,
        });
        store.select(id).unwrap();

        let lines = panel_lines(&store);
        assert_eq!(lines[0], "Total areas drawn: 2");
        assert_eq!(lines[1], "Selected: Circle");
        assert_eq!(lines[2], "Radius: 1000 m");
    }

    #[test]
    fn test_panel_without_selection_computes_nothing() {
        let mut store = FeatureStore::new();
        store.add(Geometry::Circle {
            center: LatLng::new(40.0, -74.0),
            radius_m: 1000.0,
        });
        let lines = panel_lines(&store);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Click on any drawn area to select it.");
    }
}
