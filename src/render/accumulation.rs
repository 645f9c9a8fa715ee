//! Per-pixel opacity accumulation.

use crate::{Error, Result};

/// Opacity added by one edge crossing a pixel.
pub const DEFAULT_EDGE_ALPHA: f32 = 0.001;

/// Row-major grid of opacities in `[0, 1)`.
///
/// Every hit composites a constant `alpha` over the current value
/// (`v ← v + α − v·α`), so a pixel's value depends only on how many times
/// it was hit, never on the order of the hits.
#[derive(Debug, Clone)]
pub struct AccumulationBuffer {
    width: u32,
    height: u32,
    alpha: f32,
    values: Vec<f32>,
}

impl AccumulationBuffer {
    pub fn new(width: u32, height: u32, alpha: f32) -> Self {
        Self {
            width,
            height,
            alpha,
            values: vec![0.0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// Fail unless `(x, y)` lies inside the grid.
    pub fn check_bounds(&self, x: i64, y: i64) -> Result<()> {
        if self.contains(x, y) {
            Ok(())
        } else {
            Err(Error::OutOfBounds { x, y, width: self.width, height: self.height })
        }
    }

    fn offset(&self, x: i64, y: i64) -> Result<usize> {
        self.check_bounds(x, y)?;
        Ok(y as usize * self.width as usize + x as usize)
    }

    /// Composite one hit onto `(x, y)`.
    pub fn accumulate(&mut self, x: i64, y: i64) -> Result<()> {
        let idx = self.offset(x, y)?;
        let v = self.values[idx];
        self.values[idx] = v + self.alpha - v * self.alpha;
        Ok(())
    }

    pub fn get(&self, x: i64, y: i64) -> Option<f32> {
        self.offset(x, y).ok().map(|idx| self.values[idx])
    }

    /// Number of pixels hit at least once.
    pub fn touched(&self) -> usize {
        self.values.iter().filter(|v| **v > 0.0).count()
    }

    /// Values row by row, `(x, y, v)`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, f32)> + '_ {
        let width = self.width.max(1) as usize;
        self.values
            .iter()
            .enumerate()
            .map(move |(i, v)| ((i % width) as u32, (i / width) as u32, *v))
    }
}
