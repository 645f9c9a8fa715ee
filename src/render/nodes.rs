//! Node discs on a translucent overlay.

use hashbrown::HashMap;
use image::Rgba;

use crate::model::Coordinate;
use super::{to_pixel, Viewport};

/// Disc diameter in pixels.
pub const DEFAULT_DOT_SIZE: u32 = 4;

/// Translucent blue.
pub const NODE_COLOR: Rgba<u8> = Rgba([0, 0, 255, 16]);

/// Straight (non-premultiplied) RGBA with channels in `[0, 1]`.
pub type Rgbaf = [f32; 4];

/// Sparse overlay surface. Only pixels covered by a disc are stored;
/// everything else is fully transparent.
#[derive(Debug, Clone, Default)]
pub struct NodeLayer {
    width: u32,
    height: u32,
    pixels: HashMap<(u32, u32), Rgbaf>,
}

impl NodeLayer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: HashMap::new() }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Source-over `color` onto `(x, y)`. Pixels outside the layer are
    /// clipped; returns false for those.
    pub fn blend(&mut self, x: i64, y: i64, color: Rgba<u8>) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        let src = to_float(color);
        let dst = self.pixels.entry((x as u32, y as u32)).or_insert([0.0; 4]);
        *dst = source_over(src, *dst);
        true
    }

    /// Overlay color at `(x, y)`, if anything was painted there.
    pub fn get(&self, x: u32, y: u32) -> Option<Rgbaf> {
        self.pixels.get(&(x, y)).copied()
    }

    /// Painted pixels in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = ((u32, u32), Rgbaf)> + '_ {
        self.pixels.iter().map(|(k, v)| (*k, *v))
    }

    pub fn painted(&self) -> usize {
        self.pixels.len()
    }
}

fn to_float(c: Rgba<u8>) -> Rgbaf {
    let [r, g, b, a] = c.0;
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0]
}

/// Porter-Duff source-over for straight alpha.
pub(crate) fn source_over(src: Rgbaf, dst: Rgbaf) -> Rgbaf {
    let sa = src[3];
    let da = dst[3] * (1.0 - sa);
    let out_a = sa + da;
    if out_a <= 0.0 {
        return [0.0; 4];
    }
    let mix = |i: usize| (src[i] * sa + dst[i] * da) / out_a;
    [mix(0), mix(1), mix(2), out_a]
}

// ============================================================================
// NodeRasterizer
// ============================================================================

/// Paints one filled disc per node onto a [`NodeLayer`].
#[derive(Debug)]
pub struct NodeRasterizer {
    viewport: Viewport,
    dot_size: u32,
    color: Rgba<u8>,
    layer: NodeLayer,
    drawn: usize,
}

impl NodeRasterizer {
    pub fn new(viewport: Viewport, dot_size: u32) -> Self {
        Self {
            viewport,
            dot_size,
            color: NODE_COLOR,
            layer: NodeLayer::new(viewport.size, viewport.size),
            drawn: 0,
        }
    }

    pub fn with_color(mut self, color: Rgba<u8>) -> Self {
        self.color = color;
        self
    }

    /// Center of the disc for `point`, in continuous raster coordinates.
    pub fn disc_center(&self, point: Coordinate) -> (f32, f32) {
        self.viewport.project(point)
    }

    /// Top-left pixel of the disc's bounding square.
    pub fn disc_origin(&self, point: Coordinate) -> (i64, i64) {
        let (cx, cy) = self.disc_center(point);
        let half = self.dot_size as f32 / 2.0;
        (to_pixel(cx - half), to_pixel(cy - half))
    }

    /// Paint a disc for `point`. `None` is a no-op and returns false.
    ///
    /// A pixel of the bounding square is painted when its center lies
    /// inside the inscribed circle.
    pub fn draw_node(&mut self, point: Option<Coordinate>) -> bool {
        let Some(point) = point else {
            return false;
        };
        let (left, top) = self.disc_origin(point);
        let d = i64::from(self.dot_size);
        let r = self.dot_size as f32 / 2.0;
        for dy in 0..d {
            for dx in 0..d {
                let fx = dx as f32 + 0.5 - r;
                let fy = dy as f32 + 0.5 - r;
                if fx * fx + fy * fy <= r * r {
                    self.layer.blend(left.saturating_add(dx), top.saturating_add(dy), self.color);
                }
            }
        }
        self.drawn += 1;
        true
    }

    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub fn layer(&self) -> &NodeLayer {
        &self.layer
    }

    pub fn into_layer(self) -> NodeLayer {
        self.layer
    }
}
