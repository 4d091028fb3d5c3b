//! Terrain sampling on sphere surfaces
//!
//! Provides the sampling seam used by the mesh pipeline and by external
//! placement tools, plus the stamp-stack implementation.

mod stamps;

pub use stamps::{StampSampler, SurfaceProbe};

use glam::{Vec2, Vec3};

/// Height and biome signal at one point on the sphere
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeightSample {
    /// Unscaled height; the mesh multiplies it by the grid's height scale
    pub height: f32,
    /// Temperature (`x`) and humidity (`y`), each in [-1, 1]
    pub biome: Vec2,
    /// Number of stamps that covered the point
    pub stamp_count: u32,
}

impl HeightSample {
    /// A sample untouched by any stamp
    pub fn flat(height: f32) -> Self {
        Self {
            height,
            biome: Vec2::ZERO,
            stamp_count: 0,
        }
    }

    #[inline]
    pub fn temperature(&self) -> f32 {
        self.biome.x
    }

    #[inline]
    pub fn humidity(&self) -> f32 {
        self.biome.y
    }
}

/// Trait for sampling terrain at directions on a sphere
///
/// Implementations must be deterministic: the same direction always yields the
/// same sample, whichever stage or tool asks.
pub trait TerrainSampler: Sync {
    /// Sample terrain along a direction from the planet center
    fn sample(&self, direction: Vec3) -> HeightSample;
}

impl<F> TerrainSampler for F
where
    F: Fn(Vec3) -> HeightSample + Sync,
{
    fn sample(&self, direction: Vec3) -> HeightSample {
        self(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sampler() {
        let sampler = |dir: Vec3| HeightSample::flat(dir.y * 2.0);
        let sample = sampler.sample(Vec3::Y);
        assert_eq!(sample.height, 2.0);
        assert_eq!(sample.stamp_count, 0);
        assert_eq!(sample.biome, Vec2::ZERO);
    }

    #[test]
    fn test_biome_accessors() {
        let sample = HeightSample {
            height: 0.0,
            biome: Vec2::new(0.25, -0.5),
            stamp_count: 1,
        };
        assert_eq!(sample.temperature(), 0.25);
        assert_eq!(sample.humidity(), -0.5);
    }
}
