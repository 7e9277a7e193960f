//! Scalar helpers shared by the pattern evaluator.
//!
//! Both functions follow the GLSL built-ins they stand in for so that a frame
//! produced here matches what a fragment shader would have written.

/// Cubic Hermite interpolation between two edges.
///
/// `edge0 > edge1` is allowed and yields a falling transition, which is how
/// the ring's outer edge fades out. Coincident edges behave like a step.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let span = edge1 - edge0;
    if span == 0.0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Converts HSV (all components in `[0, 1]`) to linear RGB.
///
/// Uses the six-sector piecewise-linear form: the sector is picked by comparing
/// `h` against `k / 6`, then the lightness offset `m = v - c` is added.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let x = c * (1.0 - (((h * 6.0).rem_euclid(2.0)) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 1.0 / 6.0 {
        (c, x, 0.0)
    } else if h < 2.0 / 6.0 {
        (x, c, 0.0)
    } else if h < 3.0 / 6.0 {
        (0.0, c, x)
    } else if h < 4.0 / 6.0 {
        (0.0, x, c)
    } else if h < 5.0 / 6.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    [r + m, g + m, b + m]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn smoothstep_hits_edges_and_midpoint() {
        assert!(approx(smoothstep(0.0, 1.0, -1.0), 0.0));
        assert!(approx(smoothstep(0.0, 1.0, 0.0), 0.0));
        assert!(approx(smoothstep(0.0, 1.0, 0.5), 0.5));
        assert!(approx(smoothstep(0.0, 1.0, 1.0), 1.0));
        assert!(approx(smoothstep(0.0, 1.0, 2.0), 1.0));
    }

    #[test]
    fn reversed_edges_fall_off() {
        assert!(approx(smoothstep(0.4, 0.39, 0.4), 0.0));
        assert!(approx(smoothstep(0.4, 0.39, 0.39), 1.0));
        assert!(approx(smoothstep(0.4, 0.39, 0.3), 1.0));
        assert!(approx(smoothstep(0.4, 0.39, 0.5), 0.0));
        let mid = smoothstep(0.4, 0.39, 0.395);
        assert!(mid > 0.4 && mid < 0.6);
    }

    #[test]
    fn coincident_edges_step() {
        assert_eq!(smoothstep(0.3, 0.3, 0.29), 0.0);
        assert_eq!(smoothstep(0.3, 0.3, 0.3), 1.0);
    }

    #[test]
    fn primary_hues_map_to_primaries() {
        let red = hsv_to_rgb(0.0, 1.0, 1.0);
        let green = hsv_to_rgb(1.0 / 3.0, 1.0, 1.0);
        let blue = hsv_to_rgb(2.0 / 3.0, 1.0, 1.0);
        for (got, want) in [(red, [1.0, 0.0, 0.0]), (green, [0.0, 1.0, 0.0]), (blue, [0.0, 0.0, 1.0])] {
            for channel in 0..3 {
                assert!(approx(got[channel], want[channel]), "{got:?} != {want:?}");
            }
        }
    }

    #[test]
    fn secondary_hues_mix_two_channels() {
        let yellow = hsv_to_rgb(1.0 / 6.0, 1.0, 1.0);
        assert!(approx(yellow[0], 1.0) && approx(yellow[1], 1.0) && approx(yellow[2], 0.0));
        let magenta = hsv_to_rgb(5.0 / 6.0, 1.0, 1.0);
        assert!(approx(magenta[0], 1.0) && approx(magenta[1], 0.0) && approx(magenta[2], 1.0));
    }

    #[test]
    fn zero_saturation_is_grey() {
        let grey = hsv_to_rgb(0.42, 0.0, 0.5);
        assert!(grey.iter().all(|c| approx(*c, 0.5)));
    }
}
