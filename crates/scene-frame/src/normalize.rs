//! Lenient field coercion for raw frame JSON.

use crate::{Cuboid, Orientation, Point, UNKNOWN_LABEL};
use serde_json::Value;

/// A point as read off the wire, before validation.
///
/// A component is `None` when it was absent or not a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawPoint {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl RawPoint {
    /// Reads the three components from a JSON object. Non-objects yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            x: obj.get("x").and_then(Value::as_f64),
            y: obj.get("y").and_then(Value::as_f64),
            z: obj.get("z").and_then(Value::as_f64),
        })
    }

    /// Keeps the point only if every component is present and finite.
    /// Invalid points are never corrected.
    pub fn normalize(self) -> Option<Point> {
        let p = Point::new(self.x?, self.y?, self.z?);
        p.is_finite().then_some(p)
    }
}

/// Builds a cuboid from one raw `cuboids[]` entry, defaulting every field
/// that is absent or unusable.
pub fn normalize_cuboid(value: &Value) -> Cuboid {
    let center = value.get("center");
    let dims = value.get("dimensions");

    Cuboid {
        center: Point::new(
            coerce_or(center.and_then(|c| c.get("x")), 0.0),
            coerce_or(center.and_then(|c| c.get("y")), 0.0),
            coerce_or(center.and_then(|c| c.get("z")), 0.0),
        ),
        size: Point::new(
            coerce_or(dims.and_then(|d| d.get("x")), 1.0).abs(),
            coerce_or(dims.and_then(|d| d.get("y")), 1.0).abs(),
            coerce_or(dims.and_then(|d| d.get("z")), 1.0).abs(),
        ),
        orientation: Orientation {
            z: coerce_or(value.get("yaw"), 0.0),
        },
        label: coerce_label(value.get("label")),
    }
}

/// Numeric coercion for cuboid fields.
///
/// Numbers pass through, numeric strings are parsed and `true` is 1.
/// Zero, empty, null, false, non-numeric and non-finite values all count as
/// "not provided".
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(true) => 1.0,
        _ => return None,
    };
    (n != 0.0 && n.is_finite()).then_some(n)
}

#[inline]
fn coerce_or(value: Option<&Value>, default: f64) -> f64 {
    coerce_number(value).unwrap_or(default)
}

fn coerce_label(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) if n.as_f64().is_some_and(|v| v != 0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_owned(),
        _ => UNKNOWN_LABEL.to_owned(),
    }
}
