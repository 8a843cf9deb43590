//! Four-channel float colors.
//!
//! `Color` is a `Vec4` whose x/y/z/w channels are r/g/b/a. Arithmetic is
//! component-wise over all four channels, alpha included.

use glam::Vec4;

pub type Color = Vec4;

pub const BLACK: Color = Vec4::new(0.0, 0.0, 0.0, 1.0);
pub const WHITE: Color = Vec4::new(1.0, 1.0, 1.0, 1.0);
pub const RED: Color = Vec4::new(1.0, 0.0, 0.0, 1.0);
pub const BLUE: Color = Vec4::new(0.0, 0.0, 1.0, 1.0);
pub const CLEAR: Color = Vec4::new(0.0, 0.0, 0.0, 0.0);

/// Opaque color from three channels.
#[inline]
pub const fn rgb(r: f32, g: f32, b: f32) -> Color {
    Vec4::new(r, g, b, 1.0)
}

/// Opaque grey with every color channel set to `value`.
#[inline]
pub const fn grey(value: f32) -> Color {
    Vec4::new(value, value, value, 1.0)
}

/// The same color with its alpha replaced.
#[inline]
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    Vec4::new(color.x, color.y, color.z, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_opaque() {
        for c in [BLACK, WHITE, RED, BLUE] {
            assert_eq!(c.w, 1.0);
        }
        assert_eq!(CLEAR.w, 0.0);
    }

    #[test]
    fn test_scaling_touches_alpha() {
        let c = rgb(1.0, 0.5, 0.25) * 0.5;
        assert_eq!(c, Vec4::new(0.5, 0.25, 0.125, 0.5));
        assert_eq!(with_alpha(c, 1.0).w, 1.0);
    }

    #[test]
    fn test_grey() {
        assert_eq!(grey(0.3), Vec4::new(0.3, 0.3, 0.3, 1.0));
    }
}
