//! Drawing-mode controller.

use crate::features::Geometry;
use crate::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

/// The five creation tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Marker,
    Line,
    Polygon,
    Rectangle,
    Circle,
}

/// State of the controller. At most one tool is armed at a time.
#[derive(Debug, Clone, Default)]
enum ToolState {
    #[default]
    Idle,
    Active { kind: ToolKind, points: Vec<LatLng> },
}

/// One-shot drawing controller.
///
/// `activate` arms a tool; the armed tool consumes pointer input until it
/// produces one geometry, then the controller disarms itself. Markers
/// complete on their first point, rectangles and circles on their second,
/// lines and polygons accumulate points until `finish`.
#[derive(Debug, Clone, Default)]
pub struct DrawController {
    state: ToolState,
}

impl DrawController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a tool, disarming whichever tool was active before.
    pub fn activate(&mut self, kind: ToolKind) {
        self.state = ToolState::Active {
            kind,
            points: Vec::new(),
        };
    }

    /// Disarm without producing a geometry.
    pub fn deactivate(&mut self) {
        self.state = ToolState::Idle;
    }

    pub fn active_tool(&self) -> Option<ToolKind> {
        match &self.state {
            ToolState::Idle => None,
            ToolState::Active { kind, .. } => Some(*kind),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    /// Feed one pointer position to the armed tool.
    ///
    /// Returns the created geometry once the gesture is complete, at which
    /// point the controller has disarmed itself.
    pub fn add_point(&mut self, point: LatLng) -> Option<Geometry> {
        let ToolState::Active { kind, points } = &mut self.state else {
            return None;
        };
        let kind = *kind;
        points.push(point);

        let geometry = match kind {
            ToolKind::Marker => Some(Geometry::Marker(point)),
            ToolKind::Rectangle if points.len() == 2 => Some(Geometry::Rectangle(
                LatLngBounds::from_corners(points[0], points[1]),
            )),
            ToolKind::Circle if points.len() == 2 => {
                let center = points[0];
                Some(Geometry::Circle {
                    center,
                    radius_m: center.distance_to(points[1]),
                })
            }
            _ => None,
        };

        if geometry.is_some() {
            self.state = ToolState::Idle;
        }
        geometry
    }

    /// Complete a line or polygon gesture.
    ///
    /// A line needs at least 2 vertices and a polygon at least 3; anything
    /// less cancels the gesture. The controller disarms either way.
    pub fn finish(&mut self) -> Option<Geometry> {
        let state = std::mem::take(&mut self.state);
        let ToolState::Active { kind, points } = state else {
            return None;
        };
        match kind {
            ToolKind::Line if points.len() >= 2 => Some(Geometry::Line(points)),
            ToolKind::Polygon if points.len() >= 3 => Some(Geometry::Polygon(points)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureKind;

    #[test]
    fn test_single_active_tool() {
        let mut tools = DrawController::new();
        assert_eq!(tools.active_tool(), None);

        tools.activate(ToolKind::Line);
        tools.activate(ToolKind::Circle);
        assert_eq!(tools.active_tool(), Some(ToolKind::Circle));
    }

    #[test]
    fn test_marker_completes_on_first_point() {
        let mut tools = DrawController::new();
        tools.activate(ToolKind::Marker);

        let geometry = tools.add_point(LatLng::new(40.0, -74.0)).unwrap();
        assert_eq!(geometry, Geometry::Marker(LatLng::new(40.0, -74.0)));
        // one-shot: disarmed after creation
        assert!(!tools.is_active());
        assert_eq!(tools.add_point(LatLng::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_rectangle_completes_on_second_corner() {
        let mut tools = DrawController::new();
        tools.activate(ToolKind::Rectangle);

        assert_eq!(tools.add_point(LatLng::new(1.0, 1.0)), None);
        let geometry = tools.add_point(LatLng::new(0.0, 0.0)).unwrap();
        assert_eq!(geometry.kind(), FeatureKind::Rectangle);
        assert!(!tools.is_active());
    }

    #[test]
    fn test_circle_radius_from_drag() {
        let mut tools = DrawController::new();
        tools.activate(ToolKind::Circle);

        tools.add_point(LatLng::new(0.0, 0.0));
        let geometry = tools.add_point(LatLng::new(1.0, 0.0)).unwrap();
        let Geometry::Circle { center, radius_m } = geometry else {
            panic!("expected a circle");
        };
        assert_eq!(center, LatLng::new(0.0, 0.0));
        assert!((radius_m - 111_194.9).abs() < 10.0);
    }

    #[test]
    fn test_polygon_accumulates_until_finish() {
        let mut tools = DrawController::new();
        tools.activate(ToolKind::Polygon);

        assert_eq!(tools.add_point(LatLng::new(0.0, 0.0)), None);
        assert_eq!(tools.add_point(LatLng::new(0.0, 1.0)), None);
        assert_eq!(tools.add_point(LatLng::new(1.0, 1.0)), None);

        let geometry = tools.finish().unwrap();
        let Geometry::Polygon(ring) = geometry else {
            panic!("expected a polygon");
        };
        assert_eq!(ring.len(), 3);
        assert!(!tools.is_active());
    }

    #[test]
    fn test_too_few_vertices_cancels() {
        let mut tools = DrawController::new();

        tools.activate(ToolKind::Line);
        tools.add_point(LatLng::new(0.0, 0.0));
        assert_eq!(tools.finish(), None);
        assert!(!tools.is_active());

        tools.activate(ToolKind::Polygon);
        tools.add_point(LatLng::new(0.0, 0.0));
        tools.add_point(LatLng::new(0.0, 1.0));
        assert_eq!(tools.finish(), None);
    }

    #[test]
    fn test_activation_resets_pending_points() {
        let mut tools = DrawController::new();
        tools.activate(ToolKind::Rectangle);
        tools.add_point(LatLng::new(5.0, 5.0));

        // re-arming drops the pending corner
        tools.activate(ToolKind::Rectangle);
        assert_eq!(tools.add_point(LatLng::new(0.0, 0.0)), None);
        let geometry = tools.add_point(LatLng::new(1.0, 1.0)).unwrap();
        let Geometry::Rectangle(bounds) = geometry else {
            panic!("expected a rectangle");
        };
        assert_eq!(bounds.north, 1.0);
    }
}
