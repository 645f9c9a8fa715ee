//! Flatten density and node overlay into one RGB image.

use std::path::Path;

use image::{Rgb, RgbImage};
use tracing::info;

use crate::Result;
use super::{AccumulationBuffer, NodeLayer};

/// Gray steps spread across the `[0, 1)` density range.
const DENSITY_LEVELS: f32 = 123.0;

/// Turns an [`AccumulationBuffer`] and a [`NodeLayer`] into pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageComposer;

impl ImageComposer {
    /// Darkness of a pixel with accumulated value `v`. Zero stays zero so
    /// untouched pixels are pure white; any hit is at least one step dark.
    pub fn intensity(v: f32) -> u8 {
        if v > 0.0 {
            ((v * DENSITY_LEVELS).floor() + 1.0).clamp(0.0, 255.0) as u8
        } else {
            0
        }
    }

    /// Gray level for density `v`: white minus intensity in every channel.
    pub fn density_color(v: f32) -> Rgb<u8> {
        let level = 255 - Self::intensity(v);
        Rgb([level, level, level])
    }

    /// Render density as grays, then composite the overlay on top.
    pub fn compose(&self, buffer: &AccumulationBuffer, layer: &NodeLayer) -> RgbImage {
        let mut image = RgbImage::new(buffer.width(), buffer.height());
        for (x, y, v) in buffer.iter() {
            image.put_pixel(x, y, Self::density_color(v));
        }
        for ((x, y), [r, g, b, a]) in layer.iter() {
            if x >= image.width() || y >= image.height() {
                continue;
            }
            let base = image.get_pixel(x, y).0;
            let over = |c: f32, under: u8| {
                (c * 255.0 * a + f32::from(under) * (1.0 - a)).round().clamp(0.0, 255.0) as u8
            };
            image.put_pixel(x, y, Rgb([over(r, base[0]), over(g, base[1]), over(b, base[2])]));
        }
        image
    }

    /// Encode as PNG.
    pub fn save(&self, image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!(path = %path.display(), "Writing image");
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NODE_COLOR;

    #[test]
    fn test_intensity() {
        assert_eq!(ImageComposer::intensity(0.0), 0);
        assert_eq!(ImageComposer::intensity(0.001), 1);
        assert_eq!(ImageComposer::intensity(0.5), 62);
        assert_eq!(ImageComposer::intensity(0.999), 123);
        assert_eq!(ImageComposer::intensity(1.0), 124);
    }

    #[test]
    fn test_density_grays() {
        assert_eq!(ImageComposer::density_color(0.0), Rgb([255, 255, 255]));
        assert_eq!(ImageComposer::density_color(0.5), Rgb([193, 193, 193]));
    }

    #[test]
    fn test_compose_overlays_nodes() {
        let mut buffer = AccumulationBuffer::new(3, 1, 0.5);
        buffer.accumulate(1, 0).unwrap();
        let mut layer = NodeLayer::new(3, 1);
        layer.blend(2, 0, image::Rgba([0, 0, 255, 255]));
        layer.blend(0, 0, NODE_COLOR);

        let img = ImageComposer.compose(&buffer, &layer);
        assert_eq!(img.get_pixel(1, 0), &Rgb([193, 193, 193]));
        assert_eq!(img.get_pixel(2, 0), &Rgb([0, 0, 255]));
        // 16/255 blue over white
        let p = img.get_pixel(0, 0).0;
        assert_eq!(p[2], 255);
        assert_eq!(p[0], p[1]);
        assert!(p[0] < 255 && p[0] > 230);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let img = ImageComposer.compose(&AccumulationBuffer::new(4, 4, 0.1), &NodeLayer::new(4, 4));
        ImageComposer.save(&img, &path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }
}
