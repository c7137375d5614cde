//! Serialization of drawn features to the persisted record.
//!
//! The record is a JSON array of GeoJSON-flavoured Feature objects. Circles
//! have no GeoJSON primitive, so they are written as a synthetic record
//! carrying center and radius in the property bag. The feature id is
//! duplicated into the property bag so it survives encodings that drop
//! top-level identifiers.

use crate::features::{Feature, FeatureId, Geometry};
use crate::geo::{LatLng, LatLngBounds};
use log::warn;
use serde_json::{Value, json};
use uuid::Uuid;

/// Default radius applied to circle records missing one, in meters.
const DEFAULT_CIRCLE_RADIUS_M: f64 = 1000.0;

/// Encode features to the persisted record.
///
/// Coordinates use GeoJSON `[lng, lat]` order; polygon rings are closed on
/// encode and carry the winding they were drawn with.
pub fn encode(features: &[Feature]) -> String {
    let records: Vec<Value> = features.iter().map(encode_feature).collect();
    Value::Array(records).to_string()
}

/// Decode the persisted record.
///
/// A corrupt blob is logged and treated as no saved data. Records with an
/// unrecognized geometry tag fall back to generic reconstruction, with
/// point-like coordinates defaulting to markers.
pub fn decode(blob: &str) -> Vec<Feature> {
    let value: Value = match serde_json::from_str(blob) {
        Ok(v) => v,
        Err(e) => {
            warn!("discarding corrupt drawing record: {e}");
            return Vec::new();
        }
    };
    let Some(records) = value.as_array() else {
        warn!("drawing record is not an array; ignoring it");
        return Vec::new();
    };
    records.iter().filter_map(decode_record).collect()
}

fn encode_feature(feature: &Feature) -> Value {
    let id = feature.id.to_string();
    match &feature.geometry {
        Geometry::Marker(p) => json!({
            "type": "Feature",
            "id": id,
            "geometry": { "type": "Point", "coordinates": [p.lng, p.lat] },
            "properties": { "id": id },
        }),
        Geometry::Line(points) => json!({
            "type": "Feature",
            "id": id,
            "geometry": { "type": "LineString", "coordinates": coordinates(points) },
            "properties": { "id": id },
        }),
        Geometry::Polygon(ring) => json!({
            "type": "Feature",
            "id": id,
            "geometry": { "type": "Polygon", "coordinates": [closed_ring(ring)] },
            "properties": { "id": id },
        }),
        Geometry::Rectangle(bounds) => json!({
            "type": "Feature",
            "id": id,
            "geometry": { "type": "Polygon", "coordinates": [closed_ring(&bounds.corners())] },
            // the kind tag is what keeps a rectangle a rectangle across reload
            "properties": { "id": id, "kind": "Rectangle" },
        }),
        Geometry::Circle { center, radius_m } => json!({
            "type": "Feature",
            "id": id,
            "geometry": { "type": "Circle" },
            "properties": {
                "id": id,
                "centerLat": center.lat,
                "centerLng": center.lng,
                "radius": radius_m,
            },
        }),
    }
}

fn coordinates(points: &[LatLng]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.lng, p.lat]).collect()
}

fn closed_ring(points: &[LatLng]) -> Vec<[f64; 2]> {
    let mut coords = coordinates(points);
    if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(first);
        }
    }
    coords
}

fn decode_record(record: &Value) -> Option<Feature> {
    let geometry_value = record.get("geometry")?;
    let tag = geometry_value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("");
    let properties = record.get("properties");
    let id = record_id(record);

    let geometry = match tag {
        "Point" => Some(Geometry::Marker(as_latlng(
            geometry_value.get("coordinates")?,
        )?)),
        "LineString" => {
            let points = point_list(geometry_value.get("coordinates")?)?;
            Some(Geometry::Line(points))
        }
        "Polygon" => {
            let outer = geometry_value.get("coordinates")?.as_array()?.first()?;
            let ring = unclosed_ring(point_list(outer)?);
            let is_rectangle = properties
                .and_then(|p| p.get("kind"))
                .and_then(Value::as_str)
                == Some("Rectangle");
            if is_rectangle {
                LatLngBounds::from_points(&ring).map(Geometry::Rectangle)
            } else {
                Some(Geometry::Polygon(ring))
            }
        }
        "Circle" => {
            let props = properties?;
            let lat = props.get("centerLat").and_then(Value::as_f64)?;
            let lng = props.get("centerLng").and_then(Value::as_f64)?;
            let radius_m = props
                .get("radius")
                .and_then(Value::as_f64)
                .unwrap_or(DEFAULT_CIRCLE_RADIUS_M);
            Some(Geometry::Circle {
                center: LatLng::new(lat, lng),
                radius_m,
            })
        }
        other => {
            warn!("unrecognized geometry tag {other:?}; reconstructing generically");
            decode_generic(geometry_value)
        }
    }?;

    Some(Feature::reconstruct(id, geometry))
}

/// Best-effort reconstruction for unknown geometry tags: walk the
/// coordinates and pick the shallowest shape that fits. A single position
/// becomes a marker.
fn decode_generic(geometry_value: &Value) -> Option<Geometry> {
    let coords = geometry_value.get("coordinates")?;
    if let Some(p) = as_latlng(coords) {
        return Some(Geometry::Marker(p));
    }
    let arr = coords.as_array()?;
    if let Some(points) = point_list(coords) {
        if points.len() >= 2 {
            return Some(Geometry::Line(points));
        }
        if let Some(&p) = points.first() {
            return Some(Geometry::Marker(p));
        }
    }
    // nested rings: take the outer one
    let outer = arr.first()?;
    let ring = unclosed_ring(point_list(outer)?);
    if ring.len() >= 3 {
        return Some(Geometry::Polygon(ring));
    }
    None
}

fn record_id(record: &Value) -> FeatureId {
    record
        .get("id")
        .and_then(Value::as_str)
        .or_else(|| {
            record
                .get("properties")
                .and_then(|p| p.get("id"))
                .and_then(Value::as_str)
        })
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4)
}

fn as_latlng(value: &Value) -> Option<LatLng> {
    let arr = value.as_array()?;
    let lng = arr.first()?.as_f64()?;
    let lat = arr.get(1)?.as_f64()?;
    Some(LatLng::new(lat, lng))
}

fn point_list(value: &Value) -> Option<Vec<LatLng>> {
    let arr = value.as_array()?;
    let points: Vec<LatLng> = arr.iter().filter_map(as_latlng).collect();
    if points.len() == arr.len() {
        Some(points)
    } else {
        None
    }
}

/// Drop the closing vertex a GeoJSON ring repeats, restoring the drawn list.
fn unclosed_ring(mut ring: Vec<LatLng>) -> Vec<LatLng> {
    if ring.len() >= 2 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}
