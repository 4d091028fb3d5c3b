//! Height stage: one sample per point of the padded grid

use rayon::prelude::*;

use crate::config::GridSettings;
use crate::geometry::{cube_to_sphere, face_point};
use crate::terrain::{HeightSample, TerrainSampler};

/// Samples for the tile grid plus a one-point ring around it
///
/// Stored column-major with side `vertex_count + 2`. Grid coordinates run from
/// `-1` to `vertex_count`, so every tile point has four sampled neighbors.
#[derive(Debug, Clone)]
pub struct HeightGrid {
    side: u32,
    samples: Vec<HeightSample>,
}

impl HeightGrid {
    /// Sample at grid coordinate `(x, y)`, where `-1` addresses the padding ring
    #[inline]
    pub fn at(&self, x: i32, y: i32) -> &HeightSample {
        let px = (x + 1) as usize;
        let py = (y + 1) as usize;
        &self.samples[py + px * self.side as usize]
    }

    /// Side length including padding
    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn samples(&self) -> &[HeightSample] {
        &self.samples
    }

    /// Largest number of stamps covering any sampled point
    pub fn max_stamp_count(&self) -> u32 {
        self.samples.iter().map(|s| s.stamp_count).max().unwrap_or(0)
    }
}

/// Unit sphere direction of a grid point
///
/// Padding points past the cube face edge fall back to radial projection once the
/// cube-to-sphere mapping is no longer defined there.
#[inline]
pub fn grid_direction(settings: &GridSettings, x: i32, y: i32) -> glam::Vec3 {
    let point = face_point(settings.grid_uv(x, y));
    cube_to_sphere(point).normalize_or(point.normalize())
}

/// Sample every point of the padded grid in parallel
pub fn sample_heights<S>(settings: &GridSettings, sampler: &S) -> HeightGrid
where
    S: TerrainSampler + ?Sized,
{
    let side = settings.padded_count();
    let samples = (0..side as usize * side as usize)
        .into_par_iter()
        .map(|index| {
            let x = (index / side as usize) as i32 - 1;
            let y = (index % side as usize) as i32 - 1;
            sampler.sample(grid_direction(settings, x, y))
        })
        .collect();

    HeightGrid { side, samples }
}
