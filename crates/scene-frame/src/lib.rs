//! scene_frame: one timestep of recorded LiDAR data, as points + labelled cuboids.
//!
//! A frame arrives as a JSON object fetched from a remote endpoint:
//!
//!   {
//!     "points":  [ { "x": f, "y": f, "z": f }, ... ],
//!     "cuboids": [ { "center":     { "x": f, "y": f, "z": f },
//!                    "dimensions": { "x": f, "y": f, "z": f },
//!                    "yaw": f,
//!                    "label": "Car" }, ... ]
//!   }
//!
//! Both arrays are optional. Decoding is lenient:
//! - a point survives only if `x`, `y`, `z` are all finite JSON numbers;
//!   anything else drops the point without error.
//! - a cuboid is never dropped. Each field falls back independently
//!   (center 0, size 1, yaw 0, label "Unknown"), and sizes are made
//!   non-negative.
//!
//! In memory the canonical shape is `size` + `orientation.z`; `dimensions`
//! and `yaw` only exist on the wire.

mod color;
mod normalize;

pub use color::HeightRange;
pub use normalize::{normalize_cuboid, RawPoint};

use serde::{Deserialize, Serialize};

/// Label assigned to cuboids that arrive without a usable one.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Errors raised while decoding a frame body.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected frame shape: {0}")]
    Shape(&'static str),
}

/// A 3D coordinate in the sensor's world frame (meters, Z up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// True when all three components are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Rotation of a cuboid. Only the yaw about the vertical axis is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    /// Radians about +Z.
    pub z: f64,
}

/// An oriented bounding box annotating one object in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    pub center: Point,
    /// Full edge lengths; every component is non-negative.
    pub size: Point,
    pub orientation: Orientation,
    pub label: String,
}

impl Default for Cuboid {
    fn default() -> Self {
        Self {
            center: Point::default(),
            size: Point::new(1.0, 1.0, 1.0),
            orientation: Orientation::default(),
            label: UNKNOWN_LABEL.to_owned(),
        }
    }
}

/// Immutable snapshot of a single frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneData {
    pub points: Vec<Point>,
    pub cuboids: Vec<Cuboid>,
}

impl SceneData {
    /// Decodes and normalizes a raw frame body.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, FrameError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        Self::from_value(&value)
    }

    /// Normalizes an already parsed frame body.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, FrameError> {
        let obj = value
            .as_object()
            .ok_or(FrameError::Shape("frame body is not an object"))?;

        let points = match obj.get("points") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Array(items)) => {
                let kept: Vec<Point> = items
                    .iter()
                    .filter_map(RawPoint::from_value)
                    .filter_map(|raw| raw.normalize())
                    .collect();
                if kept.len() != items.len() {
                    log::debug!(
                        "Discarded {} malformed points out of {}",
                        items.len() - kept.len(),
                        items.len()
                    );
                }
                kept
            }
            Some(_) => return Err(FrameError::Shape("`points` is not an array")),
        };

        let cuboids = match obj.get("cuboids") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Array(items)) => items.iter().map(normalize_cuboid).collect(),
            Some(_) => return Err(FrameError::Shape("`cuboids` is not an array")),
        };

        Ok(Self { points, cuboids })
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.cuboids.is_empty()
    }

    /// Height range of the point cloud, if it has any points.
    pub fn height_range(&self) -> Option<HeightRange> {
        HeightRange::from_points(&self.points)
    }
}
