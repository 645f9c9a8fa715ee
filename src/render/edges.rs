//! Edge rasterization into the accumulation buffer.

use crate::model::Coordinate;
use crate::Result;
use super::{AccumulationBuffer, Viewport};

/// Draws straight edges between projected node positions.
///
/// Owns the accumulation buffer for the whole run; hand it to the composer
/// with [`EdgeRasterizer::into_buffer`].
#[derive(Debug)]
pub struct EdgeRasterizer {
    viewport: Viewport,
    buffer: AccumulationBuffer,
    drawn: usize,
}

impl EdgeRasterizer {
    pub fn new(viewport: Viewport, alpha: f32) -> Self {
        Self {
            viewport,
            buffer: AccumulationBuffer::new(viewport.size, viewport.size, alpha),
            drawn: 0,
        }
    }

    /// Draw the edge between two optional endpoints.
    ///
    /// Returns `Ok(false)` without touching the buffer when either endpoint
    /// has no coordinate. Both endpoints are bounds-checked before any pixel
    /// is written, so a failing edge leaves the buffer unchanged.
    pub fn draw_edge(&mut self, from: Option<Coordinate>, to: Option<Coordinate>) -> Result<bool> {
        let (Some(from), Some(to)) = (from, to) else {
            return Ok(false);
        };
        let (x1, y1) = self.viewport.pixel(from);
        let (x2, y2) = self.viewport.pixel(to);
        self.buffer.check_bounds(x1, y1)?;
        self.buffer.check_bounds(x2, y2)?;
        self.draw_line(x1, y1, x2, y2)?;
        self.drawn += 1;
        Ok(true)
    }

    /// Major-axis stepping: the axis with the larger extent is walked one
    /// pixel at a time in increasing order, the other is interpolated.
    fn draw_line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) -> Result<()> {
        if (x2 - x1).abs() > (y2 - y1).abs() {
            let ((x1, y1), (x2, y2)) = ordered((x1, y1), (x2, y2));
            for x in x1..=x2 {
                let y = interpolate(x - x1, x2 - x1, y1, y2);
                self.buffer.accumulate(x, y)?;
            }
        } else {
            let ((y1, x1), (y2, x2)) = ordered((y1, x1), (y2, x2));
            for y in y1..=y2 {
                let x = interpolate(y - y1, y2 - y1, x1, x2);
                self.buffer.accumulate(x, y)?;
            }
        }
        Ok(())
    }

    /// Edges drawn so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub fn buffer(&self) -> &AccumulationBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> AccumulationBuffer {
        self.buffer
    }
}

/// Order two `(major, minor)` endpoints by their major coordinate.
fn ordered(a: (i64, i64), b: (i64, i64)) -> ((i64, i64), (i64, i64)) {
    if a.0 > b.0 { (b, a) } else { (a, b) }
}

/// Minor coordinate at `step` of `span` between `from` and `to`, truncated.
fn interpolate(step: i64, span: i64, from: i64, to: i64) -> i64 {
    if span == 0 {
        return from;
    }
    let t = step as f32 / span as f32;
    (t * (to - from) as f32 + from as f32) as i64
}
