use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Result};

/// High-level behaviour requested by the caller.
///
/// The render policy decides whether a single frame or a timed sequence of
/// frames is produced, and where the output lands.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPolicy {
    /// Render a single frame at a fixed timestamp and write it to `path`.
    Still {
        /// Timestamp to evaluate the pattern at (seconds).
        time: f32,
        /// Destination image path.
        path: PathBuf,
    },
    /// Render a fixed-step sequence of frames into a directory.
    Sequence {
        /// Timestamp of the first frame (seconds).
        start: f32,
        /// Length of the sequence in seconds.
        duration: f32,
        /// Frames per second; the step between frames is `1 / fps`.
        fps: f32,
        /// Directory receiving `frame_NNNNN.png` files.
        directory: PathBuf,
    },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Still {
            time: 0.0,
            path: PathBuf::from("ring.png"),
        }
    }
}

impl RenderPolicy {
    /// Number of frames the policy will produce.
    pub fn frame_count(&self) -> u64 {
        match self {
            RenderPolicy::Still { .. } => 1,
            RenderPolicy::Sequence { duration, fps, .. } => {
                if *fps <= 0.0 || *duration <= 0.0 {
                    0
                } else {
                    (duration * fps).ceil() as u64
                }
            }
        }
    }
}

/// File formats supported by the export pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
        }
    }
}

/// Snapshot of the time state supplied to the frame uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed wall-clock or simulated time in seconds.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Abstraction over where time values originate from.
pub trait TimeSource: Send {
    /// Resets the source to its initial state.
    fn reset(&mut self);
    /// Produces a time sample for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let elapsed = self.origin.elapsed();
        let sample = TimeSample::new(elapsed.as_secs_f32(), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Time source that always reports a fixed timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    time: f32,
}

impl FixedTimeSource {
    pub fn new(time: f32) -> Self {
        Self { time }
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

impl TimeSource for FixedTimeSource {
    fn reset(&mut self) {}

    fn sample(&mut self) -> TimeSample {
        TimeSample::new(self.time, 0)
    }
}

/// Deterministic source advancing by `1 / fps` per sample.
#[derive(Debug, Clone, Copy)]
pub struct SteppedTimeSource {
    start: f32,
    step: f32,
    frame: u64,
}

impl SteppedTimeSource {
    /// Fails when `fps` is not a positive finite number.
    pub fn new(start: f32, fps: f32) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(anyhow!("frame rate must be positive, got {fps}"));
        }
        Ok(Self {
            start,
            step: fps.recip(),
            frame: 0,
        })
    }
}

impl TimeSource for SteppedTimeSource {
    fn reset(&mut self) {
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        // Multiply instead of accumulating so long sequences do not drift.
        let seconds = self.start + self.frame as f32 * self.step;
        let sample = TimeSample::new(seconds, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Builds a time source suited to the requested render policy.
pub fn time_source_for_policy(policy: &RenderPolicy) -> Result<BoxedTimeSource> {
    match policy {
        RenderPolicy::Still { time, .. } => Ok(Box::new(FixedTimeSource::new(*time))),
        RenderPolicy::Sequence { start, fps, .. } => {
            Ok(Box::new(SteppedTimeSource::new(*start, *fps)?))
        }
    }
}
