use crate::pattern::RingParams;
use crate::runtime::RenderPolicy;

/// Default surface size used when neither the config nor the CLI picks one.
pub const DEFAULT_SURFACE_SIZE: (u32, u32) = (800, 600);

/// Clear colour applied underneath the ring when frames are flattened.
pub const DEFAULT_BACKGROUND: [f32; 3] = [0.1, 0.1, 0.1];

/// Straight (non-premultiplied) RGBA colour with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black, written for every pixel outside the ring.
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb(rgb: [f32; 3], a: f32) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2], a)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0.0
    }

    /// Composites this colour over an opaque background (`src over dst`).
    pub fn over(&self, background: [f32; 3]) -> Self {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |src: f32, dst: f32| src * a + dst * (1.0 - a);
        Self::new(
            mix(self.r, background[0]),
            mix(self.g, background[1]),
            mix(self.b, background[2]),
            1.0,
        )
    }

    /// Quantises to 8-bit channels for image export.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let quantise = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantise(self.r),
            quantise(self.g),
            quantise(self.b),
            quantise(self.a),
        ]
    }
}

/// Normalised texture coordinate with the origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelCoord {
    pub u: f32,
    pub v: f32,
}

impl PixelCoord {
    pub fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

/// Declares how the alpha channel of rendered frames is handled on export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceAlpha {
    /// Keep the ring's straight alpha; pixels outside the ring stay transparent.
    Transparent,
    /// Flatten every frame over a solid background colour.
    Opaque { background: [f32; 3] },
}

impl Default for SurfaceAlpha {
    fn default() -> Self {
        Self::Transparent
    }
}

impl SurfaceAlpha {
    /// Applies the alpha policy to a single evaluated colour.
    pub fn resolve(&self, colour: Rgba) -> Rgba {
        match self {
            SurfaceAlpha::Transparent => colour,
            SurfaceAlpha::Opaque { background } => colour.over(*background),
        }
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors the CLI flags and config file: how large each
/// frame is, which ring parameters to evaluate, how alpha is exported, and
/// which frames to produce.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Frame size in pixels.
    pub surface_size: (u32, u32),
    /// Ring pattern parameters (segment count, radii, animation speeds).
    pub params: RingParams,
    /// Alpha handling for exported images.
    pub surface_alpha: SurfaceAlpha,
    /// Which frames to render and where to write them.
    pub policy: RenderPolicy,
}

impl Default for RendererConfig {
    /// Provides an 800x600 still at `t = 0` with the fine ring variant.
    fn default() -> Self {
        Self {
            surface_size: DEFAULT_SURFACE_SIZE,
            params: RingParams::default(),
            surface_alpha: SurfaceAlpha::default(),
            policy: RenderPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_over_background_yields_background() {
        let flat = Rgba::TRANSPARENT.over(DEFAULT_BACKGROUND);
        assert_eq!(flat, Rgba::new(0.1, 0.1, 0.1, 1.0));
    }

    #[test]
    fn opaque_colour_hides_background() {
        let flat = Rgba::new(1.0, 0.0, 0.5, 1.0).over([0.2, 0.2, 0.2]);
        assert_eq!(flat, Rgba::new(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn quantises_with_rounding_and_clamping() {
        assert_eq!(Rgba::new(1.0, 0.5, -0.2, 2.0).to_rgba8(), [255, 128, 0, 255]);
    }

    #[test]
    fn surface_alpha_passthrough_keeps_alpha() {
        let colour = Rgba::new(0.3, 0.6, 0.9, 0.25);
        assert_eq!(SurfaceAlpha::Transparent.resolve(colour), colour);
        let flattened = SurfaceAlpha::Opaque {
            background: [0.0, 0.0, 0.0],
        }
        .resolve(colour);
        assert_eq!(flattened.a, 1.0);
        assert!((flattened.b - 0.225).abs() < 1e-6);
    }
}
