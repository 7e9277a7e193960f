use std::time::{SystemTime, UNIX_EPOCH};

use crate::runtime::TimeSample;

/// Per-frame inputs handed to the pattern evaluator.
///
/// Only `time` and `resolution` feed the ring. `delta_time` and `epoch_time`
/// are kept so hosts that already publish them keep a stable interface; the
/// evaluator never reads them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Elapsed seconds driving the rotation and the radial wave.
    pub time: f32,
    /// Seconds since the previous frame. Reserved.
    pub delta_time: f32,
    /// Seconds since the Unix epoch when the frame was prepared. Reserved.
    pub epoch_time: f64,
    /// Viewport size in pixels.
    pub resolution: [f32; 2],
}

impl FrameUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            time: 0.0,
            delta_time: 0.0,
            epoch_time: epoch_seconds(),
            resolution: [width as f32, height as f32],
        }
    }

    /// Builds uniforms pinned to `time` without touching the wall clock.
    pub fn at_time(width: u32, height: u32, time: f32) -> Self {
        Self {
            time,
            delta_time: 0.0,
            epoch_time: 0.0,
            resolution: [width as f32, height as f32],
        }
    }

    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution = [width, height];
    }

    /// Advances the clock to `sample`, tracking the previous sample to derive
    /// a non-negative delta.
    pub fn update_time(&mut self, last_sample: &mut Option<TimeSample>, sample: TimeSample) {
        let previous = last_sample.replace(sample);
        self.delta_time = previous
            .map(|prev| (sample.seconds - prev.seconds).max(0.0))
            .unwrap_or(0.0);
        self.time = sample.seconds;
        self.epoch_time = epoch_seconds();
    }
}

fn epoch_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
