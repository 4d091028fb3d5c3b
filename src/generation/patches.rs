//! Patch stage: independent triangulation of core-grid cells

use std::f32::consts::SQRT_2;

use glam::{UVec2, Vec2};
use rayon::prelude::*;

use super::vertices::VertexMap;
use crate::config::GridSettings;
use crate::delaunay::{triangulate, TriangulationStats};
use crate::error::{Result, TerrainError};

/// Concatenated triangles of every patch, in global vertex indices
#[derive(Debug, Clone, Default)]
pub struct PatchTriangles {
    pub triangles: Vec<[u32; 3]>,
    pub patch_count: usize,
    /// Counters summed over all patches; `peak_slots` is the largest single patch
    pub stats: TriangulationStats,
}

/// Lower-left grid corner of a patch
pub fn patch_origin(settings: &GridSettings, patch: usize) -> UVec2 {
    let per_line = settings.patches_per_line() as usize;
    let spacing = settings.core_grid_spacing;
    UVec2::new((patch / per_line) as u32 * spacing, (patch % per_line) as u32 * spacing)
}

/// Present grid points of a patch, boundary included, in column order
pub fn patch_points(settings: &GridSettings, map: &VertexMap, patch: usize) -> Vec<UVec2> {
    let start = patch_origin(settings, patch);
    let spacing = settings.core_grid_spacing;
    let mut points = Vec::with_capacity(((spacing + 1) * (spacing + 1)) as usize);

    for x in start.x..=start.x + spacing {
        for y in start.y..=start.y + spacing {
            let point = UVec2::new(x, y);
            if map.contains(point) {
                points.push(point);
            }
        }
    }

    points
}

fn triangulate_patch(
    settings: &GridSettings,
    map: &VertexMap,
    patch: usize,
) -> Result<(Vec<[u32; 3]>, TriangulationStats)> {
    let points = patch_points(settings, map, patch);
    let origin = patch_origin(settings, patch);
    if points.first() != Some(&origin) {
        return Err(TerrainError::GenerationFailed(format!(
            "patch {} is missing its corner vertex {:?}",
            patch, origin
        )));
    }

    let local: Vec<Vec2> = points.iter().map(|p| p.as_vec2()).collect();
    let size = (settings.core_grid_spacing + 1) as f32 * SQRT_2;
    let triangulation = triangulate(&local, size)?;

    let mut triangles = Vec::with_capacity(triangulation.triangles.len());
    for triangle in &triangulation.triangles {
        let mut global = [0u32; 3];
        for (slot, &local_index) in global.iter_mut().zip(triangle) {
            let point = points[local_index as usize];
            *slot = map.get(point).ok_or_else(|| {
                TerrainError::GenerationFailed(format!("grid point {:?} has no vertex", point))
            })?;
        }
        triangles.push(global);
    }

    Ok((triangles, triangulation.stats))
}

/// Triangulate every patch in parallel and concatenate the results in patch order
///
/// # Errors
///
/// Fails if any patch fails; no partial triangle list is returned.
pub fn triangulate_patches(settings: &GridSettings, map: &VertexMap) -> Result<PatchTriangles> {
    let patch_count = settings.patch_count();
    let patches: Vec<(Vec<[u32; 3]>, TriangulationStats)> = (0..patch_count)
        .into_par_iter()
        .map(|patch| triangulate_patch(settings, map, patch))
        .collect::<Result<_>>()?;

    let total: usize = patches.iter().map(|(t, _)| t.len()).sum();
    let mut output = PatchTriangles {
        triangles: Vec::with_capacity(total),
        patch_count,
        stats: TriangulationStats::default(),
    };

    for (triangles, stats) in patches {
        output.triangles.extend(triangles);
        output.stats.inserted += stats.inserted;
        output.stats.unresolved += stats.unresolved;
        output.stats.degenerate_rejected += stats.degenerate_rejected;
        output.stats.recycled_slots += stats.recycled_slots;
        output.stats.peak_slots = output.stats.peak_slots.max(stats.peak_slots);
    }

    Ok(output)
}
