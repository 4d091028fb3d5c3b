//! Mesh assembly for terrain tiles
//!
//! Runs the generation stages in order and packs the result into
//! engine-agnostic vertex and index buffers.

mod colors;

pub use colors::{BiomeColorMapper, ColorMapper, CustomColorMapper, TerrainColor};

use parry3d::bounding_volume::Aabb;
use parry3d::math::Point;

use crate::config::GridSettings;
use crate::error::Result;
use crate::generation::{add_skirts, generate_vertices, sample_heights, triangulate_patches, Vertex};
use crate::terrain::{HeightSample, TerrainSampler};
use crate::util::Timed;

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions in planet-local space
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals
    pub normals: Vec<[f32; 3]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<[f32; 4]>,
    /// Cube-face coordinates in [0, 1]
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Pack vertices and triangles into flat buffers
    pub fn from_parts(vertices: &[Vertex], triangles: &[[u32; 3]]) -> Self {
        Self {
            positions: vertices.iter().map(|v| v.position.to_array()).collect(),
            normals: vertices.iter().map(|v| v.normal.to_array()).collect(),
            colors: vertices.iter().map(|v| v.color).collect(),
            uvs: vertices.iter().map(|v| v.uv.to_array()).collect(),
            indices: triangles.iter().flatten().copied().collect(),
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A finished terrain tile mesh with its bounds and build counters
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    pub data: MeshData,
    pub bounds: Aabb,
    /// Largest stamp overlap seen by any height sample
    pub max_stamp_count: u32,
    /// Surface vertices that survived decimation (skirt vertices excluded)
    pub vertices_kept: usize,
    pub vertices_skipped: usize,
    pub skirt_vertices: usize,
    pub patch_count: usize,
    /// Points the triangulator could not place; zero for a healthy build
    pub unresolved_points: usize,
}

/// Axis-aligned bounds of a position buffer by linear scan
///
/// An empty buffer yields an inverted (invalid) box.
pub fn compute_bounds(positions: &[[f32; 3]]) -> Aabb {
    let mut mins = [f32::MAX; 3];
    let mut maxs = [-f32::MAX; 3];

    for position in positions {
        for axis in 0..3 {
            mins[axis] = mins[axis].min(position[axis]);
            maxs[axis] = maxs[axis].max(position[axis]);
        }
    }

    Aabb::new(
        Point::new(mins[0], mins[1], mins[2]),
        Point::new(maxs[0], maxs[1], maxs[2]),
    )
}

/// Generate the mesh for one terrain tile
///
/// Stages: padded height sampling, vertex generation with decimation, parallel
/// patch triangulation, optional skirts, then buffer packing and bounds.
///
/// # Arguments
/// * `settings` - Tile grid configuration
/// * `sampler` - Height and biome source, typically a `StampSampler`
/// * `color_mapper` - Maps each height sample to a vertex color
///
/// # Errors
///
/// Returns `InvalidConfig` before any work if the settings are invalid, or the
/// first error of any stage. Nothing partially built is returned.
///
/// # Example
///
/// ```rust
/// use stamp_terrain::*;
///
/// let settings = GridSettingsBuilder::new()
///     .vertex_count(17)
///     .core_grid_spacing(8)
///     .build()
///     .unwrap();
/// let flat = |_: Vec3| HeightSample::flat(0.0);
///
/// let mesh = generate_terrain_mesh(&settings, &flat, &BiomeColorMapper::default()).unwrap();
/// assert!(mesh.data.triangle_count() > 0);
/// ```
pub fn generate_terrain_mesh<S, C>(settings: &GridSettings, sampler: &S, color_mapper: &C) -> Result<TerrainMesh>
where
    S: TerrainSampler + ?Sized,
    C: ColorMapper<HeightSample> + ?Sized,
{
    settings.validate()?;
    let _build = Timed::info("terrain mesh");

    let heights = {
        let _stage = Timed::debug("height sampling");
        sample_heights(settings, sampler)
    };

    let vertex_set = {
        let _stage = Timed::debug("vertex generation");
        generate_vertices(settings, &heights, color_mapper)
    };
    log::debug!(
        "kept {} of {} grid points",
        vertex_set.vertices.len(),
        settings.point_count()
    );

    let patches = {
        let _stage = Timed::debug("patch triangulation");
        triangulate_patches(settings, &vertex_set.map)?
    };
    if patches.stats.unresolved > 0 {
        log::warn!("{} points could not be inserted", patches.stats.unresolved);
    }

    let vertices_kept = vertex_set.vertices.len();
    let mut vertices = vertex_set.vertices;
    let mut triangles = patches.triangles;

    let skirt_vertices = if settings.skirts {
        let _stage = Timed::debug("skirts");
        add_skirts(settings, &vertex_set.map, &mut vertices, &mut triangles)?
    } else {
        0
    };

    let data = MeshData::from_parts(&vertices, &triangles);
    let bounds = compute_bounds(&data.positions);

    Ok(TerrainMesh {
        data,
        bounds,
        max_stamp_count: heights.max_stamp_count(),
        vertices_kept,
        vertices_skipped: vertex_set.skipped,
        skirt_vertices,
        patch_count: patches.patch_count,
        unresolved_points: patches.stats.unresolved,
    })
}
