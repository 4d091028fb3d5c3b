//! Oriented heightmap stamps
//!
//! A stamp projects a square heightmap onto the planet surface. Stamps are
//! produced by an external placement tool and read-only during sampling.

mod atlas;
mod falloff;

pub use atlas::{sample_bilinear, AtlasEntry, HeightmapAtlas};
pub use falloff::Falloff;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::error::TerrainError;

/// How a stamp combines with the height already accumulated under it
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BlendMode {
    #[default]
    Add = 0,
    Subtract = 1,
    Max = 2,
    Min = 3,
    /// Interpolate toward the stamp value, never more than halfway
    Blend = 4,
    /// Leave height untouched and add the stamp's biome weighted by its height
    BiomeOnly = 5,
    /// Leave height untouched and pull the biome toward the stamp's biome
    BiomeBlend = 6,
}

impl BlendMode {
    /// Whether this mode only affects the biome signal
    pub fn is_biome_only(&self) -> bool {
        matches!(self, BlendMode::BiomeOnly | BlendMode::BiomeBlend)
    }
}

impl TryFrom<u8> for BlendMode {
    type Error = TerrainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BlendMode::Add),
            1 => Ok(BlendMode::Subtract),
            2 => Ok(BlendMode::Max),
            3 => Ok(BlendMode::Min),
            4 => Ok(BlendMode::Blend),
            5 => Ok(BlendMode::BiomeOnly),
            6 => Ok(BlendMode::BiomeBlend),
            other => Err(TerrainError::UnknownBlendMode(other)),
        }
    }
}

/// An oriented rectangular heightmap projector
///
/// The stamp plane passes through the stamp origin with the stamp's local `+Y` as
/// its normal. Local `x`/`z` span `[-extents / 2, extents / 2]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    pub local_to_world: Mat4,
    pub world_to_local: Mat4,
    /// Size of the projected rectangle along local `x` and `z`
    pub extents: Vec2,
    /// Heightmap id in the shared atlas
    pub heightmap: u16,
    pub blend_mode: BlendMode,
    pub height_scale: f32,
    pub height_offset: f32,
    /// Biome weight used by the height-changing modes
    pub blend_strength: f32,
    pub falloff: Falloff,
    pub temperature: f32,
    pub humidity: f32,
}

impl Stamp {
    /// Create an additive stamp with no falloff and no biome contribution
    pub fn new(position: Vec3, rotation: Quat, extents: Vec2, heightmap: u16) -> Self {
        let local_to_world = Mat4::from_rotation_translation(rotation, position);
        Self {
            local_to_world,
            world_to_local: local_to_world.inverse(),
            extents,
            heightmap,
            blend_mode: BlendMode::Add,
            height_scale: 1.0,
            height_offset: 0.0,
            blend_strength: 0.0,
            falloff: Falloff::None,
            temperature: 0.0,
            humidity: 0.0,
        }
    }

    /// Create a stamp lying on the sphere surface above `direction`, facing outward
    pub fn on_surface(direction: Vec3, radius: f32, extents: Vec2, heightmap: u16) -> Self {
        let up = direction.normalize_or(Vec3::Y);
        Self::new(up * radius, crate::geometry::align_to_surface(up), extents, heightmap)
    }

    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = mode;
        self
    }

    pub fn with_height(mut self, scale: f32, offset: f32) -> Self {
        self.height_scale = scale;
        self.height_offset = offset;
        self
    }

    pub fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }

    /// Set the biome this stamp pushes toward and the weight used by height modes
    pub fn with_biome(mut self, temperature: f32, humidity: f32, blend_strength: f32) -> Self {
        self.temperature = temperature;
        self.humidity = humidity;
        self.blend_strength = blend_strength;
        self
    }

    /// World-space origin of the stamp plane
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.local_to_world.transform_point3(Vec3::ZERO)
    }

    /// World-space normal of the stamp plane
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.local_to_world.transform_vector3(Vec3::Y).normalize_or_zero()
    }

    /// UV of a world-space point on the stamp plane; `None` outside `[0, 1)^2`
    pub fn uv_of(&self, world_point: Vec3) -> Option<Vec2> {
        let local = self.world_to_local.transform_point3(world_point);
        let uv = Vec2::new(local.x, local.z) / self.extents + 0.5;
        let inside = uv.x >= 0.0 && uv.x < 1.0 && uv.y >= 0.0 && uv.y < 1.0;
        inside.then_some(uv)
    }
}
