use rayon::prelude::*;

use crate::pattern::RingPattern;
use crate::types::{PixelCoord, Rgba, SurfaceAlpha};
use crate::uniforms::FrameUniforms;

/// CPU frame buffer, row-major with the top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Number of pixels with a non-zero alpha.
    pub fn coverage(&self) -> usize {
        self.pixels.iter().filter(|px| !px.is_transparent()).count()
    }

    /// Packs the frame into 8-bit RGBA bytes, applying the alpha policy.
    pub fn to_rgba8(&self, alpha: SurfaceAlpha) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|px| alpha.resolve(*px).to_rgba8())
            .collect()
    }
}

/// Texture coordinate sampled for pixel `(x, y)`.
///
/// Pixels are sampled at their centres. Image rows run top-down while texture
/// coordinates grow upwards, so row 0 maps to the largest `v`.
pub fn pixel_coord(x: u32, y: u32, width: u32, height: u32) -> PixelCoord {
    PixelCoord::new(
        (x as f32 + 0.5) / width.max(1) as f32,
        1.0 - (y as f32 + 0.5) / height.max(1) as f32,
    )
}

/// Evaluates the pattern for every pixel of a frame.
///
/// The frame size is taken from `uniforms.resolution`. Rows are independent so
/// they are shaded in parallel without any shared state.
pub fn rasterize(pattern: &RingPattern, uniforms: &FrameUniforms) -> Frame {
    let width = uniforms.resolution[0].max(0.0) as u32;
    let height = uniforms.resolution[1].max(0.0) as u32;
    let mut frame = Frame::new(width, height);
    if width == 0 || height == 0 {
        return frame;
    }

    frame
        .pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let coord = pixel_coord(x as u32, y as u32, width, height);
                *pixel = pattern.evaluate(coord, uniforms);
            }
        });

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::RingParams;

    #[test]
    fn pixel_centres_flip_vertically() {
        let top_left = pixel_coord(0, 0, 4, 2);
        assert_eq!(top_left, PixelCoord::new(0.125, 0.75));
        let bottom_right = pixel_coord(3, 1, 4, 2);
        assert_eq!(bottom_right, PixelCoord::new(0.875, 0.25));
    }

    #[test]
    fn frame_matches_resolution() {
        let frame = rasterize(&RingPattern::default(), &FrameUniforms::at_time(32, 16, 0.0));
        assert_eq!(frame.width(), 32);
        assert_eq!(frame.height(), 16);
        assert_eq!(frame.pixels().len(), 32 * 16);
        assert!(frame.pixel(32, 0).is_none());
    }

    #[test]
    fn zero_sized_frame_is_empty() {
        let frame = rasterize(&RingPattern::default(), &FrameUniforms::at_time(0, 0, 0.0));
        assert!(frame.pixels().is_empty());
    }

    #[test]
    fn centre_is_empty_and_ring_is_drawn() {
        let pattern = RingPattern::new(RingParams::coarse());
        let frame = rasterize(&pattern, &FrameUniforms::at_time(128, 128, 0.0));
        assert!(frame.pixel(64, 64).unwrap().is_transparent());
        assert!(frame.pixel(0, 0).unwrap().is_transparent());
        let coverage = frame.coverage();
        assert!(coverage > 0);
        // The annulus covers well under half of the square even before gaps.
        assert!(coverage < 128 * 128 / 4);
    }

    #[test]
    fn rasterizing_matches_direct_evaluation() {
        let pattern = RingPattern::default();
        let uniforms = FrameUniforms::at_time(40, 30, 1.25);
        let frame = rasterize(&pattern, &uniforms);
        for (x, y) in [(0, 0), (10, 5), (39, 29), (31, 12)] {
            let expected = pattern.evaluate(pixel_coord(x, y, 40, 30), &uniforms);
            assert_eq!(frame.pixel(x, y), Some(expected));
        }
    }

    #[test]
    fn packs_rgba_bytes() {
        let frame = Frame::new(2, 1);
        assert_eq!(frame.to_rgba8(SurfaceAlpha::Transparent), vec![0; 8]);
        let flat = frame.to_rgba8(SurfaceAlpha::Opaque {
            background: [1.0, 0.0, 0.0],
        });
        assert_eq!(flat, vec![255, 0, 0, 255, 255, 0, 0, 255]);
    }
}
