//! Vertex stage: positions, normals and colors, with flat-area decimation

use std::collections::HashMap;

use glam::{UVec2, Vec2, Vec3};
use rayon::prelude::*;

use super::heights::{grid_direction, HeightGrid};
use crate::config::GridSettings;
use crate::geometry::{align_to_surface, angle_between_degrees};
use crate::mesh::{ColorMapper, TerrainColor};
use crate::terrain::HeightSample;

/// A surface vertex in planet-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: TerrainColor,
    /// Position on the cube face in [0, 1]
    pub uv: Vec2,
}

/// Sparse map from grid coordinate to vertex index
///
/// A grid point is present exactly when it survived decimation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexMap {
    indices: HashMap<UVec2, u32>,
}

impl VertexMap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, point: UVec2, index: u32) {
        self.indices.insert(point, index);
    }

    #[inline]
    pub fn get(&self, point: UVec2) -> Option<u32> {
        self.indices.get(&point).copied()
    }

    #[inline]
    pub fn contains(&self, point: UVec2) -> bool {
        self.indices.contains_key(&point)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Output of the vertex stage
#[derive(Debug, Clone, Default)]
pub struct VertexSet {
    pub vertices: Vec<Vertex>,
    pub map: VertexMap,
    /// Grid points dropped as too flat
    pub skipped: usize,
}

/// Surface normal and curvature estimate at one grid point
///
/// Two partial normals are built from the left/back and right/front neighbor
/// pairs; the angle between them measures how far the surface bends.
pub fn normal_and_curvature(settings: &GridSettings, heights: &HeightGrid, x: i32, y: i32) -> (Vec3, f32) {
    let scale = settings.height_scale / settings.planet_radius;
    let step = settings.distance;
    let h = |dx: i32, dy: i32| heights.at(x + dx, y + dy).height * scale;

    let center = Vec3::new(0.0, h(0, 0), 0.0);
    let left = Vec3::new(-step, h(-1, 0), 0.0);
    let right = Vec3::new(step, h(1, 0), 0.0);
    let back = Vec3::new(0.0, h(0, -1), -step);
    let front = Vec3::new(0.0, h(0, 1), step);

    let normal_a = (back - center).cross(left - center);
    let normal_b = (front - center).cross(right - center);

    let normal = (normal_a + normal_b).normalize_or(Vec3::Y);
    (normal, angle_between_degrees(normal_a, normal_b))
}

/// Build one vertex per surviving grid point
///
/// Rows are processed in parallel into private buffers and concatenated in row
/// order, so vertex indices do not depend on scheduling.
pub fn generate_vertices<C>(settings: &GridSettings, heights: &HeightGrid, color_mapper: &C) -> VertexSet
where
    C: ColorMapper<HeightSample> + ?Sized,
{
    let count = settings.vertex_count;

    let rows: Vec<Vec<(UVec2, Vertex)>> = (0..count)
        .into_par_iter()
        .map(|x| {
            (0..count)
                .filter_map(|y| build_vertex(settings, heights, color_mapper, x, y))
                .collect()
        })
        .collect();

    let kept: usize = rows.iter().map(Vec::len).sum();
    let mut vertices = Vec::with_capacity(kept);
    let mut map = VertexMap::with_capacity(kept);

    for (point, vertex) in rows.into_iter().flatten() {
        map.insert(point, vertices.len() as u32);
        vertices.push(vertex);
    }

    VertexSet {
        vertices,
        map,
        skipped: settings.point_count() - kept,
    }
}

fn build_vertex<C>(
    settings: &GridSettings,
    heights: &HeightGrid,
    color_mapper: &C,
    x: u32,
    y: u32,
) -> Option<(UVec2, Vertex)>
where
    C: ColorMapper<HeightSample> + ?Sized,
{
    let (gx, gy) = (x as i32, y as i32);
    let (normal, curvature) = normal_and_curvature(settings, heights, gx, gy);

    if !settings.is_core_point(x, y) && curvature < settings.normal_reduce_threshold {
        return None;
    }

    let sample = heights.at(gx, gy);
    let radius = settings.planet_radius + sample.height * settings.height_scale;
    let position = grid_direction(settings, gx, gy) * radius;

    let vertex = Vertex {
        position,
        normal: align_to_surface(position) * normal,
        color: color_mapper.map_color(sample),
        uv: settings.grid_uv(gx, gy),
    };
    Some((UVec2::new(x, y), vertex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSettingsBuilder;
    use crate::generation::sample_heights;
    use crate::mesh::BiomeColorMapper;

    fn settings(count: u32, spacing: u32, threshold: f32) -> GridSettings {
        GridSettingsBuilder::new()
            .vertex_count(count)
            .core_grid_spacing(spacing)
            .tile(Vec2::new(0.25, 0.25), 0.5)
            .normal_reduce_threshold(threshold)
            .unwrap()
            .build()
            .unwrap()
    }

    fn flat(_: Vec3) -> HeightSample {
        HeightSample::flat(0.0)
    }

    #[test]
    fn test_flat_normals_point_outward() {
        let settings = settings(9, 4, 0.0);
        let heights = sample_heights(&settings, &flat);
        let set = generate_vertices(&settings, &heights, &BiomeColorMapper::default());

        assert_eq!(set.vertices.len(), 81);
        assert_eq!(set.skipped, 0);
        for vertex in &set.vertices {
            let outward = vertex.position.normalize();
            assert!(vertex.normal.dot(outward) > 0.999);
            assert!((vertex.position.length() - settings.planet_radius).abs() < 1e-3);
        }
    }

    #[test]
    fn test_flat_grid_keeps_only_core_lines() {
        let settings = settings(9, 4, 2.0);
        let heights = sample_heights(&settings, &flat);
        let set = generate_vertices(&settings, &heights, &BiomeColorMapper::default());

        // lines x, y in {0, 4, 8}: 81 points minus 4 interior blocks of 3x3
        assert_eq!(set.vertices.len(), 81 - 36);
        assert_eq!(set.skipped, 36);
        for x in 0..9 {
            for y in 0..9 {
                let point = UVec2::new(x, y);
                assert_eq!(set.map.contains(point), settings.is_core_point(x, y));
            }
        }
    }

    #[test]
    fn test_map_indices_are_dense() {
        let settings = settings(9, 4, 2.0);
        let heights = sample_heights(&settings, &flat);
        let set = generate_vertices(&settings, &heights, &BiomeColorMapper::default());

        let mut seen = vec![false; set.vertices.len()];
        for x in 0..9 {
            for y in 0..9 {
                if let Some(index) = set.map.get(UVec2::new(x, y)) {
                    assert!(!seen[index as usize]);
                    seen[index as usize] = true;
                    let expected = settings.grid_uv(x as i32, y as i32);
                    assert_eq!(set.vertices[index as usize].uv, expected);
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_bumps_keep_vertices() {
        let settings = settings(9, 4, 0.5);
        // ridge along the face x axis
        let ridge = |dir: Vec3| HeightSample::flat((dir.x * 40.0).sin() * 2.0);
        let heights = sample_heights(&settings, &ridge);
        let set = generate_vertices(&settings, &heights, &BiomeColorMapper::default());
        assert!(set.vertices.len() > 81 - 36);
    }

    #[test]
    fn test_curvature_of_tilted_plane_is_zero() {
        let settings = settings(9, 4, 2.0);
        let tilted = |dir: Vec3| HeightSample::flat(dir.x * 10.0);
        let heights = sample_heights(&settings, &tilted);
        let (normal, curvature) = normal_and_curvature(&settings, &heights, 4, 4);
        assert!(curvature < 1.0);
        assert!(normal.y > 0.0);
    }
}
