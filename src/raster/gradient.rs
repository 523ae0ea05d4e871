//! Two-stop linear and radial gradients.

use crate::color::Rgba;

/// Interpolates two straight-alpha colors into unit floats.
fn lerp_stops(a: Rgba, b: Rgba, t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    let ca = a.rgb.to_unit();
    let cb = b.rgb.to_unit();
    [
        ca[0] + (cb[0] - ca[0]) * t,
        ca[1] + (cb[1] - ca[1]) * t,
        ca[2] + (cb[2] - ca[2]) * t,
        a.alpha + (b.alpha - a.alpha) * t,
    ]
}

/// Top-to-bottom gradient spanning the full canvas height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalGradient {
    pub top: Rgba,
    pub bottom: Rgba,
    pub height: u32,
}

impl VerticalGradient {
    /// Color at the center of pixel row `y`.
    pub fn at_row(&self, y: u32) -> [f32; 4] {
        let t = (y as f32 + 0.5) / self.height.max(1) as f32;
        lerp_stops(self.top, self.bottom, t)
    }
}

/// Concentric radial gradient: `inner` up to `r0`, `outer` from `r1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub cx: f32,
    pub cy: f32,
    pub r0: f32,
    pub r1: f32,
    pub inner: Rgba,
    pub outer: Rgba,
}

impl RadialGradient {
    /// Interpolation parameter at a point, in [0, 1].
    pub fn t_at(&self, x: f32, y: f32) -> f32 {
        let d = ((x - self.cx).powi(2) + (y - self.cy).powi(2)).sqrt();
        let span = self.r1 - self.r0;
        if span <= f32::EPSILON {
            return if d < self.r0 { 0.0 } else { 1.0 };
        }
        ((d - self.r0) / span).clamp(0.0, 1.0)
    }

    /// Color at the center of pixel `(x, y)`.
    pub fn at_pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let t = self.t_at(x as f32 + 0.5, y as f32 + 0.5);
        lerp_stops(self.inner, self.outer, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_vertical_endpoints() {
        let g = VerticalGradient {
            top: Rgb::BLACK.with_opacity(1.0),
            bottom: Rgb::WHITE.with_opacity(1.0),
            height: 100,
        };
        assert!(g.at_row(0)[0] < 0.01);
        assert!(g.at_row(99)[0] > 0.99);
        assert!((g.at_row(49)[0] - 0.495).abs() < 1e-4);
    }

    #[test]
    fn test_radial_stops() {
        let g = RadialGradient {
            cx: 50.0,
            cy: 50.0,
            r0: 10.0,
            r1: 30.0,
            inner: Rgba::TRANSPARENT,
            outer: Rgb::BLACK.with_opacity(0.8),
        };
        assert_eq!(g.t_at(50.0, 50.0), 0.0);
        assert_eq!(g.t_at(50.0, 70.0), 0.5);
        assert_eq!(g.t_at(0.0, 0.0), 1.0);
        assert!((g.at_pixel(99, 99)[3] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_radial_is_step() {
        let g = RadialGradient {
            cx: 0.0,
            cy: 0.0,
            r0: 5.0,
            r1: 5.0,
            inner: Rgba::TRANSPARENT,
            outer: Rgb::BLACK.with_opacity(1.0),
        };
        assert_eq!(g.t_at(1.0, 0.0), 0.0);
        assert_eq!(g.t_at(6.0, 0.0), 1.0);
    }
}
