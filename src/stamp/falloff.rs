//! Edge falloff curves for stamps

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::Vec2;

/// Below this magnitude the exponential curve is replaced by a linear ramp
const LINEAR_SHARPNESS: f32 = 1e-4;

/// Weight reducing a stamp's influence toward its UV edges
///
/// The exponential shape evaluates `1 - (k / -s) * (1 - e^(s * x))` per axis, where
/// `x` is the distance from the UV center (0 at the center, 0.5 at the edge), and
/// takes the minimum over both axes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Falloff {
    /// Full weight everywhere inside the stamp
    #[default]
    None,
    Exponential {
        /// Negative decay rate; more negative keeps full weight further out
        sharpness: f32,
        strength: f32,
    },
}

impl Falloff {
    /// Exponential falloff whose weight reaches exactly zero at the stamp edge
    pub fn exponential(sharpness: f32) -> Self {
        let sharpness = -sharpness.abs();
        if sharpness.abs() < LINEAR_SHARPNESS {
            return Falloff::Exponential { sharpness: 0.0, strength: 0.0 };
        }
        let strength = -sharpness / (1.0 - (sharpness * 0.5).exp());
        Falloff::Exponential { sharpness, strength }
    }

    /// Weight in [0, 1] at a stamp UV
    pub fn evaluate(&self, uv: Vec2) -> f32 {
        match *self {
            Falloff::None => 1.0,
            Falloff::Exponential { sharpness, strength } => {
                let axis = |u: f32| {
                    let x = 0.5 - u.min(1.0 - u);
                    let curve = if sharpness.abs() < LINEAR_SHARPNESS {
                        1.0 - 2.0 * x
                    } else {
                        1.0 - (strength / -sharpness) * (1.0 - (sharpness * x).exp())
                    };
                    curve.clamp(0.0, 1.0)
                };
                axis(uv.x).min(axis(uv.y))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_falloff() {
        assert_eq!(Falloff::None.evaluate(Vec2::new(0.01, 0.99)), 1.0);
    }

    #[test]
    fn test_exponential_center_and_edge() {
        let falloff = Falloff::exponential(-8.0);
        assert!((falloff.evaluate(Vec2::splat(0.5)) - 1.0).abs() < 1e-6);
        assert!(falloff.evaluate(Vec2::new(0.0, 0.5)) < 1e-5);
        assert!(falloff.evaluate(Vec2::new(0.5, 1.0)) < 1e-5);
    }

    #[test]
    fn test_exponential_is_symmetric_and_monotonic() {
        let falloff = Falloff::exponential(-6.0);
        let mut previous = 0.0;
        for i in 0..=10 {
            let u = i as f32 * 0.05;
            let w = falloff.evaluate(Vec2::new(u, 0.5));
            let mirrored = falloff.evaluate(Vec2::new(1.0 - u, 0.5));
            assert!((w - mirrored).abs() < 1e-5);
            assert!(w >= previous - 1e-6);
            previous = w;
        }
    }

    #[test]
    fn test_minimum_over_axes() {
        let falloff = Falloff::exponential(-4.0);
        let near_x_edge = falloff.evaluate(Vec2::new(0.05, 0.5));
        let corner = falloff.evaluate(Vec2::new(0.05, 0.3));
        assert!(corner <= near_x_edge);
        assert!((corner - near_x_edge).abs() < 1e-6);
    }

    #[test]
    fn test_zero_sharpness_is_linear() {
        let falloff = Falloff::exponential(0.0);
        assert!((falloff.evaluate(Vec2::new(0.25, 0.5)) - 0.5).abs() < 1e-6);
        assert!((falloff.evaluate(Vec2::splat(0.5)) - 1.0).abs() < 1e-6);
    }
}
