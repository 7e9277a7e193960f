use std::time::Duration;

use anyhow::{bail, Result};
use renderer::{RingParams, SurfaceAlpha, DEFAULT_SURFACE_SIZE};
use ringconfig::{ResolvedRing, RingConfig};

use crate::cli::{PatternArgs, RunArgs};

pub const DEFAULT_FPS: f32 = 30.0;
pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

/// Render settings after layering CLI flags over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub params: RingParams,
    pub size: (u32, u32),
    pub surface_alpha: SurfaceAlpha,
    pub fps: f32,
    pub duration: Duration,
}

pub fn ring_params(ring: &ResolvedRing) -> RingParams {
    RingParams {
        segments: ring.segments,
        rotation_speed: ring.rotation_speed,
        wave_amplitude: ring.wave_amplitude,
        wave_frequency: ring.wave_frequency,
        inner_radius: ring.inner_radius,
        outer_radius: ring.outer_radius,
        edge_softness: ring.edge_softness,
        visible_period: ring.visible_period,
    }
}

/// Ring parameters and frame size; everything `probe` needs.
pub fn resolve_pattern(
    args: &PatternArgs,
    config: &RingConfig,
) -> Result<(RingParams, (u32, u32))> {
    let mut params = ring_params(&config.resolved_ring());
    if let Some(segments) = args.segments {
        params.segments = segments;
    } else if let Some(variant) = args.variant {
        params.segments = variant.segments();
    }
    if params.segments == 0 {
        bail!("segment count must be at least 1");
    }
    if !params.is_seamless() {
        tracing::warn!(
            segments = params.segments,
            visible_period = params.visible_period,
            "segment count is not a multiple of the visible period; the ring will show a rotating seam"
        );
    }

    let size = args
        .size
        .or(config.output.size)
        .unwrap_or(DEFAULT_SURFACE_SIZE);
    Ok((params, size))
}

pub fn resolve_settings(args: &RunArgs, config: &RingConfig) -> Result<RenderSettings> {
    let (params, size) = resolve_pattern(&args.pattern, config)?;

    let surface_alpha = if args.transparent {
        SurfaceAlpha::Transparent
    } else if let Some(background) = args.background.or(config.output.background) {
        SurfaceAlpha::Opaque { background }
    } else {
        SurfaceAlpha::Transparent
    };

    let fps = args.fps.or(config.output.fps).unwrap_or(DEFAULT_FPS);
    if !fps.is_finite() || fps <= 0.0 {
        bail!("frame rate must be positive, got {fps}");
    }

    Ok(RenderSettings {
        params,
        size,
        surface_alpha,
        fps,
        duration: args
            .duration
            .or(config.output.duration)
            .unwrap_or(DEFAULT_DURATION),
    })
}
