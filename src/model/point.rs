//! Layout coordinates.

use serde::{Deserialize, Serialize};

/// A node position in layout space.
///
/// Layout space has y pointing up; raster space has y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f32,
    pub y: f32,
}

impl Coordinate {
    /// The value dense storage reports for unset slots.
    pub const ABSENT: Coordinate = Coordinate { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
