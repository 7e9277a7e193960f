//! CPU renderer for the segmented rainbow ring.
//!
//! The crate evaluates the ring pattern per pixel and writes frames to disk.
//! The overall flow is:
//!
//! ```text
//!   CLI / ringshade
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ TimeSource ──▶ FrameUniforms ──▶ rasterize() ──▶ export_png()
//!                                                        │
//!                                                        └─▶ RingPattern::evaluate() per pixel (rayon)
//! ```
//!
//! `RingPattern` is a pure function of the texture coordinate and the frame
//! uniforms; everything else here only decides which frames to produce and
//! where they go.

mod export;
mod pattern;
mod raster;
mod runtime;
mod shading;
mod types;
mod uniforms;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub use export::{export_format_for, export_png, sequence_frame_path};
pub use pattern::{RingParams, RingPattern, RingSample, COARSE_SEGMENTS, FINE_SEGMENTS};
pub use raster::{pixel_coord, rasterize, Frame};
pub use runtime::{
    time_source_for_policy, BoxedTimeSource, ExportFormat, FixedTimeSource, RenderPolicy,
    SteppedTimeSource, SystemTimeSource, TimeSample, TimeSource,
};
pub use shading::{hsv_to_rgb, smoothstep};
pub use types::{
    PixelCoord, RendererConfig, Rgba, SurfaceAlpha, DEFAULT_BACKGROUND, DEFAULT_SURFACE_SIZE,
};
pub use uniforms::FrameUniforms;

/// Summary of a completed render.
#[derive(Debug, Clone, Default)]
pub struct RenderReport {
    /// Files written, in frame order.
    pub written: Vec<PathBuf>,
    /// Wall-clock time spent rendering and encoding.
    pub elapsed: Duration,
}

impl RenderReport {
    pub fn frames(&self) -> usize {
        self.written.len()
    }
}

/// Entry point that turns a [`RendererConfig`] into image files.
pub struct Renderer {
    config: RendererConfig,
    pattern: RingPattern,
}

impl Renderer {
    /// Creates a renderer with the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        let pattern = RingPattern::new(config.params);
        Self { config, pattern }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Renders a single frame at `time` without writing it anywhere.
    pub fn render_frame(&self, time: f32) -> Frame {
        let (width, height) = self.config.surface_size;
        rasterize(&self.pattern, &FrameUniforms::at_time(width, height, time))
    }

    /// Runs the configured render policy to completion.
    pub fn run(&mut self) -> Result<RenderReport> {
        let (width, height) = self.config.surface_size;
        if width == 0 || height == 0 {
            anyhow::bail!("surface size must be non-zero, got {width}x{height}");
        }

        let started = Instant::now();
        let mut source =
            time_source_for_policy(&self.config.policy).context("invalid render policy")?;
        let mut uniforms = FrameUniforms::new(width, height);
        let mut last_sample = None;
        let mut report = RenderReport::default();

        let frame_count = self.config.policy.frame_count();
        tracing::info!(
            width,
            height,
            segments = self.config.params.segments,
            frames = frame_count,
            "rendering ring pattern"
        );

        for _ in 0..frame_count {
            let sample = source.sample();
            uniforms.update_time(&mut last_sample, sample);
            let frame = rasterize(&self.pattern, &uniforms);
            let path = self.output_path(sample.frame_index);
            export_png(&frame, &path, self.config.surface_alpha)?;
            tracing::debug!(
                frame = sample.frame_index,
                time = uniforms.time,
                delta = uniforms.delta_time,
                coverage = frame.coverage(),
                path = %path.display(),
                "frame written"
            );
            report.written.push(path);
        }

        report.elapsed = started.elapsed();
        tracing::info!(
            frames = report.frames(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "render finished"
        );
        Ok(report)
    }

    fn output_path(&self, frame_index: u64) -> PathBuf {
        match &self.config.policy {
            RenderPolicy::Still { path, .. } => path.clone(),
            RenderPolicy::Sequence { directory, .. } => {
                sequence_frame_path(directory, frame_index, ExportFormat::Png)
            }
        }
    }
}
