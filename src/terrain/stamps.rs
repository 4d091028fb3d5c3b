//! Stamp-stack terrain sampler

use glam::{Mat4, Vec2, Vec3};

use super::{HeightSample, TerrainSampler};
use crate::error::{Result, TerrainError};
use crate::geometry::{angle_between_degrees, perpendicular, plane_raycast};
use crate::stamp::{BlendMode, HeightmapAtlas, Stamp};

/// Sample plus the local slope around it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceProbe {
    pub sample: HeightSample,
    /// Angle between the local surface normal and straight up, in degrees
    pub slope_degrees: f32,
}

/// Projects sphere directions through a stack of stamps
///
/// Stamps are applied in order, so later stamps see the height produced by
/// earlier ones. The terrain transform places the planet in the space the
/// stamps were authored in.
///
/// # Example
///
/// ```rust
/// use stamp_terrain::*;
/// use glam::{Vec2, Vec3};
///
/// let atlas = HeightmapAtlas::new().with_map(0, 2, &[u16::MAX; 4]).unwrap();
/// let stamp = Stamp::on_surface(Vec3::Y, 100.0, Vec2::splat(50.0), 0);
/// let sampler = StampSampler::new(vec![stamp], atlas).unwrap();
///
/// let sample = sampler.sample(Vec3::Y);
/// assert_eq!(sample.stamp_count, 1);
/// assert!((sample.height - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct StampSampler {
    stamps: Vec<Stamp>,
    atlas: HeightmapAtlas,
    local_to_world: Mat4,
    start_height: f32,
}

impl StampSampler {
    /// Create a sampler over a stamp list and the atlas it references
    ///
    /// # Errors
    ///
    /// Returns `UnknownHeightmap` if a stamp references a map missing from the
    /// atlas, or `InvalidConfig` for a stamp with non-positive extents.
    pub fn new(stamps: Vec<Stamp>, atlas: HeightmapAtlas) -> Result<Self> {
        for stamp in &stamps {
            if !atlas.contains(stamp.heightmap) {
                return Err(TerrainError::UnknownHeightmap(stamp.heightmap));
            }
            if !(stamp.extents.x > 0.0 && stamp.extents.y > 0.0) {
                return Err(TerrainError::InvalidConfig(format!(
                    "stamp extents must be positive (got {:?})",
                    stamp.extents
                )));
            }
        }

        Ok(Self {
            stamps,
            atlas,
            local_to_world: Mat4::IDENTITY,
            start_height: 0.0,
        })
    }

    /// Place the planet in stamp space
    pub fn with_transform(mut self, local_to_world: Mat4) -> Self {
        self.local_to_world = local_to_world;
        self
    }

    /// Height returned where no stamp applies
    pub fn with_start_height(mut self, height: f32) -> Self {
        self.start_height = height;
        self
    }

    pub fn stamps(&self) -> &[Stamp] {
        &self.stamps
    }

    pub fn atlas(&self) -> &HeightmapAtlas {
        &self.atlas
    }

    pub fn start_height(&self) -> f32 {
        self.start_height
    }

    pub fn local_to_world(&self) -> Mat4 {
        self.local_to_world
    }

    /// Sample at `direction` and estimate the slope from two tangent offsets one
    /// surface unit away
    pub fn probe(&self, direction: Vec3, planet_radius: f32) -> SurfaceProbe {
        let center = direction.normalize_or(Vec3::Y);
        let right = perpendicular(center);
        let forward = center.cross(right);
        let offset = 1.0 / planet_radius;

        let sample = self.sample(center);
        let height_a = self.sample(center + right * offset).height;
        let height_b = self.sample(center + forward * offset).height;

        let origin = Vec3::new(0.0, sample.height, 0.0);
        let a = Vec3::new(1.0, height_a, 0.0) - origin;
        let b = Vec3::new(0.0, height_b, 1.0) - origin;
        let normal = a.cross(b);

        SurfaceProbe {
            sample,
            slope_degrees: angle_between_degrees(normal, Vec3::NEG_Y),
        }
    }
}

impl TerrainSampler for StampSampler {
    fn sample(&self, direction: Vec3) -> HeightSample {
        let ray_origin = self.local_to_world.transform_point3(Vec3::ZERO);
        let ray_direction = self.local_to_world.transform_vector3(direction);

        let mut height = self.start_height;
        let mut biome = Vec2::ZERO;
        let mut stamp_count = 0;

        for stamp in &self.stamps {
            let Some(hit) = plane_raycast(stamp.origin(), stamp.up(), ray_origin, ray_direction)
            else {
                continue;
            };
            let Some(uv) = stamp.uv_of(hit) else {
                continue;
            };
            let Some(raw) = self.atlas.sample(stamp.heightmap, uv) else {
                continue;
            };

            let falloff = stamp.falloff.evaluate(uv);
            let value = raw * stamp.height_scale + stamp.height_offset;
            let stamp_biome = Vec2::new(stamp.temperature, stamp.humidity);

            match stamp.blend_mode {
                BlendMode::Add => {
                    height += value * falloff;
                    biome += stamp_biome * falloff * stamp.blend_strength;
                }
                BlendMode::Subtract => {
                    height -= value * falloff;
                    biome -= stamp_biome * falloff * stamp.blend_strength;
                }
                BlendMode::Max => {
                    height = height.max(lerp(height, value, falloff));
                    biome += stamp_biome * falloff * stamp.blend_strength;
                }
                BlendMode::Min => {
                    height = height.min(lerp(height, value, falloff));
                    biome += stamp_biome * falloff * stamp.blend_strength;
                }
                BlendMode::Blend => {
                    height = lerp(height, value, falloff.min(0.5));
                    biome += stamp_biome * falloff * stamp.blend_strength;
                }
                BlendMode::BiomeOnly | BlendMode::BiomeBlend => {
                    biome += stamp_biome * (falloff * raw * stamp.height_scale);
                }
            }

            stamp_count += 1;
        }

        HeightSample {
            height,
            biome: biome.clamp(Vec2::NEG_ONE, Vec2::ONE),
            stamp_count,
        }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
