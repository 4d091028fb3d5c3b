//! Packed heightmap storage shared by all stamps

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::Vec2;

use crate::error::{Result, TerrainError};

/// Location of one square heightmap inside the atlas
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasEntry {
    pub offset: usize,
    pub size: u32,
}

/// Flat array of 16-bit texels plus an id to slice index
///
/// Built once before a generation pass and read-only afterwards. Each map is
/// square and stored column-major: texel `(x, y)` lives at `y + x * size`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeightmapAtlas {
    texels: Vec<u16>,
    entries: HashMap<u16, AtlasEntry>,
}

impl HeightmapAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a square heightmap under `id`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the id is taken, the size is zero, or the texel
    /// count is not `size * size`.
    pub fn insert(&mut self, id: u16, size: u32, texels: &[u16]) -> Result<()> {
        if self.entries.contains_key(&id) {
            return Err(TerrainError::InvalidConfig(format!(
                "heightmap id {} is already in the atlas",
                id
            )));
        }
        let expected = size as usize * size as usize;
        if size == 0 || texels.len() != expected {
            return Err(TerrainError::InvalidConfig(format!(
                "heightmap {} needs {} texels for size {} (got {})",
                id,
                expected,
                size,
                texels.len()
            )));
        }

        let offset = self.texels.len();
        self.texels.extend_from_slice(texels);
        self.entries.insert(id, AtlasEntry { offset, size });
        Ok(())
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with_map(mut self, id: u16, size: u32, texels: &[u16]) -> Result<Self> {
        self.insert(id, size, texels)?;
        Ok(self)
    }

    pub fn contains(&self, id: u16) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn entry(&self, id: u16) -> Option<AtlasEntry> {
        self.entries.get(&id).copied()
    }

    /// Texel slice and side length of one map
    pub fn map(&self, id: u16) -> Option<(&[u16], u32)> {
        let entry = self.entries.get(&id)?;
        let len = entry.size as usize * entry.size as usize;
        let texels = self.texels.get(entry.offset..entry.offset + len)?;
        Some((texels, entry.size))
    }

    /// Bilinear sample of map `id` at `uv` in [0, 1), normalized to [0, 1]
    pub fn sample(&self, id: u16, uv: Vec2) -> Option<f32> {
        let (texels, size) = self.map(id)?;
        Some(sample_bilinear(texels, size, uv))
    }

    /// Number of maps in the atlas
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of stored texels
    pub fn texel_count(&self) -> usize {
        self.texels.len()
    }
}

#[inline]
fn texel(texels: &[u16], size: u32, x: u32, y: u32) -> f32 {
    let index = y as usize + x as usize * size as usize;
    texels[index] as f32 / u16::MAX as f32
}

/// Bilinear interpolation over the four texels around `uv * size`
///
/// The upper neighbors are clamped to the last row and column, so sampling at a
/// texel-aligned UV returns exactly that texel.
pub fn sample_bilinear(texels: &[u16], size: u32, uv: Vec2) -> f32 {
    let last = size.saturating_sub(1);
    let pos = uv * size as f32;
    let x1 = (pos.x.floor().max(0.0) as u32).min(last);
    let y1 = (pos.y.floor().max(0.0) as u32).min(last);
    let x2 = (x1 + 1).min(last);
    let y2 = (y1 + 1).min(last);

    let xp = pos.x - x1 as f32;
    let yp = pos.y - y1 as f32;

    let p11 = texel(texels, size, x1, y1);
    let p12 = texel(texels, size, x2, y1);
    let p21 = texel(texels, size, x1, y2);
    let p22 = texel(texels, size, x2, y2);

    let px1 = p11 + (p12 - p11) * xp;
    let px2 = p21 + (p22 - p21) * xp;
    px1 + (px2 - px1) * yp
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_map(size: u32) -> Vec<u16> {
        let mut texels = vec![0u16; (size * size) as usize];
        for x in 0..size {
            for y in 0..size {
                texels[(y + x * size) as usize] = (x * 1000 + y * 37) as u16;
            }
        }
        texels
    }

    #[test]
    fn test_insert_and_lookup() {
        let atlas = HeightmapAtlas::new()
            .with_map(3, 2, &[0, 1, 2, 3])
            .unwrap()
            .with_map(7, 1, &[9])
            .unwrap();

        assert_eq!(atlas.len(), 2);
        assert_eq!(atlas.texel_count(), 5);
        assert_eq!(atlas.entry(7), Some(AtlasEntry { offset: 4, size: 1 }));
        assert_eq!(atlas.map(3).unwrap().0, &[0, 1, 2, 3]);
        assert!(atlas.map(4).is_none());
    }

    #[test]
    fn test_insert_rejects_bad_maps() {
        let mut atlas = HeightmapAtlas::new();
        assert!(atlas.insert(0, 2, &[1, 2, 3]).is_err());
        assert!(atlas.insert(0, 0, &[]).is_err());
        atlas.insert(0, 1, &[5]).unwrap();
        assert!(atlas.insert(0, 1, &[5]).is_err());
    }

    #[test]
    fn test_texel_aligned_samples_are_exact() {
        let size = 8;
        let texels = gradient_map(size);
        for x in 0..size {
            for y in 0..size {
                let uv = Vec2::new(x as f32 / size as f32, y as f32 / size as f32);
                let expected = texels[(y + x * size) as usize] as f32 / u16::MAX as f32;
                let sampled = sample_bilinear(&texels, size, uv);
                assert!((sampled - expected).abs() < 1e-6, "texel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_bilinear_midpoint() {
        // column-major 2x2: (0,0)=0, (0,1)=u16::MAX, (1,0)=0, (1,1)=u16::MAX
        let texels = [0, u16::MAX, 0, u16::MAX];
        let value = sample_bilinear(&texels, 2, Vec2::new(0.25, 0.25));
        assert!((value - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_edge_clamps_to_last_texel() {
        let texels = [0, 0, 0, u16::MAX];
        let value = sample_bilinear(&texels, 2, Vec2::new(0.99, 0.99));
        assert!((value - 1.0).abs() < 1e-6);
    }
}
