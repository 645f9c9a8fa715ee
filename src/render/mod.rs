//! # Density Map Rendering
//!
//! Edges accumulate into an opacity grid, nodes are painted as translucent
//! discs on a separate overlay, and the composer flattens both into one
//! RGB raster.
//!
//! ```text
//! PointStore + record references → EdgeRasterizer → AccumulationBuffer ─┐
//! PointStore                      → NodeRasterizer → NodeLayer ──────────┴→ ImageComposer → PNG
//! ```
//!
//! All surfaces are square, `size × size` pixels. Layout space has y up,
//! raster space has y down, so every projection flips y.

pub mod accumulation;
pub mod edges;
pub mod nodes;
pub mod compose;

pub use accumulation::{AccumulationBuffer, DEFAULT_EDGE_ALPHA};
pub use edges::EdgeRasterizer;
pub use nodes::{NodeLayer, NodeRasterizer, DEFAULT_DOT_SIZE, NODE_COLOR};
pub use compose::ImageComposer;

use crate::model::Coordinate;

/// Mapping from layout space to raster space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width and height of the raster in pixels.
    pub size: u32,
    /// Layout units → pixels.
    pub scale: f32,
}

impl Viewport {
    pub fn new(size: u32, scale: f32) -> Self {
        Self { size, scale }
    }

    /// Scaled, y-flipped position in continuous raster space.
    pub fn project(&self, point: Coordinate) -> (f32, f32) {
        (point.x * self.scale, self.size as f32 - point.y * self.scale)
    }

    /// Projected position truncated toward zero to a pixel.
    pub fn pixel(&self, point: Coordinate) -> (i64, i64) {
        let (x, y) = self.project(point);
        (to_pixel(x), to_pixel(y))
    }
}

/// Truncate toward zero, saturating. NaN maps to `i64::MIN` so it can never
/// land inside a raster.
pub(crate) fn to_pixel(v: f32) -> i64 {
    if v.is_nan() { i64::MIN } else { v as i64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_flips_y() {
        let vp = Viewport::new(10_000, 0.5);
        assert_eq!(vp.project(Coordinate::new(100.0, 200.0)), (50.0, 9900.0));
        assert_eq!(vp.pixel(Coordinate::new(100.0, 200.0)), (50, 9900));
        assert_eq!(vp.pixel(Coordinate::new(0.0, 0.0)), (0, 10_000));
    }

    #[test]
    fn test_pixel_truncates() {
        let vp = Viewport::new(100, 1.0);
        assert_eq!(vp.pixel(Coordinate::new(3.9, 10.5)), (3, 89));
    }

    #[test]
    fn test_non_finite_pixel_is_off_raster() {
        let vp = Viewport::new(100, 1.0);
        assert_eq!(vp.pixel(Coordinate::new(f32::NAN, 10.0)).0, i64::MIN);
        assert_eq!(vp.pixel(Coordinate::new(f32::INFINITY, 10.0)).0, i64::MAX);
        assert_eq!(vp.pixel(Coordinate::new(1.0, f32::NAN)).1, i64::MIN);
    }
}
