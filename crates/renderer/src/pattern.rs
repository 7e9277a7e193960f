//! The segmented rainbow ring.
//!
//! Every pixel is evaluated independently from its texture coordinate and the
//! frame uniforms:
//!
//! ```text
//!   (u, v) ─▶ centred, aspect-corrected uv ─▶ (dist, angle)
//!                                                 │
//!        angle + time * rotation_speed ──▶ segment index ──▶ snapped angle
//!                                                 │
//!     visible? (index % visible_period == 0) ─▶ wave-shifted radii ─▶ hue + soft edges
//! ```
//!
//! The angle is quantised to whole segments, so rotation advances in discrete
//! steps and every pixel of a visible segment shares one hue.

use std::f32::consts::TAU;

use crate::shading::{hsv_to_rgb, smoothstep};
use crate::types::{PixelCoord, Rgba};
use crate::uniforms::FrameUniforms;

/// Segment count of the fine ring variant.
pub const FINE_SEGMENTS: u32 = 180;
/// Segment count of the coarse ring variant.
pub const COARSE_SEGMENTS: u32 = 81;

/// Tunable constants of the ring pattern.
///
/// The defaults reproduce the fine variant; only `segments` differs between
/// the two stock variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingParams {
    /// Number of equal angular buckets around the circle.
    pub segments: u32,
    /// Radians per second added to the polar angle before quantising.
    pub rotation_speed: f32,
    /// Peak radial displacement of the wave.
    pub wave_amplitude: f32,
    /// Wave peaks around the circle.
    pub wave_frequency: f32,
    /// Inner radius before the wave is applied.
    pub inner_radius: f32,
    /// Outer radius before the wave is applied.
    pub outer_radius: f32,
    /// Width of the anti-aliased band at each edge.
    pub edge_softness: f32,
    /// Only every `visible_period`-th segment is drawn.
    pub visible_period: u32,
}

impl Default for RingParams {
    fn default() -> Self {
        Self {
            segments: FINE_SEGMENTS,
            rotation_speed: 0.1,
            wave_amplitude: 0.03,
            wave_frequency: 7.0,
            inner_radius: 0.25,
            outer_radius: 0.4,
            edge_softness: 0.01,
            visible_period: 3,
        }
    }
}

impl RingParams {
    /// Default parameters with a custom segment count.
    pub fn with_segments(segments: u32) -> Self {
        Self {
            segments,
            ..Self::default()
        }
    }

    pub fn coarse() -> Self {
        Self::with_segments(COARSE_SEGMENTS)
    }

    pub fn segment_width(&self) -> f32 {
        TAU / self.segments.max(1) as f32
    }

    /// Whether the visible pattern repeats cleanly across the wrap at 2π.
    ///
    /// When `segments` is not a multiple of `visible_period`, the last and
    /// first buckets break the spacing and that seam travels with the rotation.
    pub fn is_seamless(&self) -> bool {
        self.segments % self.visible_period.max(1) == 0
    }
}

/// Pure evaluator for the ring pattern.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RingPattern {
    params: RingParams,
}

/// Intermediate values for one pixel, exposed for probing and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSample {
    /// Distance from the viewport centre in height-normalised units.
    pub dist: f32,
    /// Polar angle in `[0, 2π)` before animation.
    pub angle: f32,
    /// Segment bucket in `[0, segments)`.
    pub index: u32,
    /// Angle of the segment's leading edge.
    pub snapped_angle: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
}

impl RingPattern {
    pub fn new(params: RingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RingParams {
        &self.params
    }

    /// Computes the geometric quantities for a coordinate, or `None` when the
    /// inputs are degenerate (zero-sized viewport, non-finite values).
    pub fn sample(&self, coord: PixelCoord, uniforms: &FrameUniforms) -> Option<RingSample> {
        let [width, height] = uniforms.resolution;
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return None;
        }
        if !coord.u.is_finite() || !coord.v.is_finite() || !uniforms.time.is_finite() {
            return None;
        }
        let segments = self.params.segments.max(1);

        let x = (coord.u * width - 0.5 * width) / height;
        let y = (coord.v * height - 0.5 * height) / height;
        let dist = (x * x + y * y).sqrt();
        let angle = (y.atan2(x) + TAU).rem_euclid(TAU);

        let animated = angle + uniforms.time * self.params.rotation_speed;
        let segment_width = TAU / segments as f32;
        let raw_index = (animated / segment_width).floor();
        if !raw_index.is_finite() {
            return None;
        }
        let index = (raw_index as i64).rem_euclid(i64::from(segments)) as u32;
        let snapped_angle = index as f32 * segment_width;

        let wave = (snapped_angle * self.params.wave_frequency + uniforms.time).sin();
        let radius_mod = self.params.wave_amplitude * wave;

        Some(RingSample {
            dist,
            angle,
            index,
            snapped_angle,
            inner_radius: self.params.inner_radius + radius_mod,
            outer_radius: self.params.outer_radius + radius_mod,
        })
    }

    /// Whether the segment bucket is one of the drawn chicklets.
    pub fn is_visible_segment(&self, index: u32) -> bool {
        index % self.params.visible_period.max(1) == 0
    }

    /// Hue of a segment, constant across the whole bucket.
    pub fn hue(&self, snapped_angle: f32) -> f32 {
        snapped_angle.rem_euclid(TAU) / TAU
    }

    /// Evaluates the colour of one pixel.
    pub fn evaluate(&self, coord: PixelCoord, uniforms: &FrameUniforms) -> Rgba {
        let Some(sample) = self.sample(coord, uniforms) else {
            return Rgba::TRANSPARENT;
        };

        if !self.is_visible_segment(sample.index) {
            return Rgba::TRANSPARENT;
        }
        if sample.dist < sample.inner_radius || sample.dist > sample.outer_radius {
            return Rgba::TRANSPARENT;
        }

        let rgb = hsv_to_rgb(self.hue(sample.snapped_angle), 1.0, 1.0);
        let softness = self.params.edge_softness;
        let outer = smoothstep(
            sample.outer_radius,
            sample.outer_radius - softness,
            sample.dist,
        );
        let inner = smoothstep(
            sample.inner_radius,
            sample.inner_radius + softness,
            sample.dist,
        );

        let alpha = outer * inner;
        if alpha <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        Rgba::from_rgb(rgb, alpha)
    }
}
