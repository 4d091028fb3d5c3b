//! Edge skirts hiding cracks between neighboring tiles

use glam::UVec2;

use super::vertices::{Vertex, VertexMap};
use crate::config::GridSettings;
use crate::error::{Result, TerrainError};

/// The four tile edges, each walked so its wall faces away from the tile
fn edge_walks(count: u32) -> [Vec<UVec2>; 4] {
    let last = count - 1;
    [
        (0..count).map(|i| UVec2::new(i, 0)).collect(),
        (0..count).map(|i| UVec2::new(0, last - i)).collect(),
        (0..count).map(|i| UVec2::new(last - i, last)).collect(),
        (0..count).map(|i| UVec2::new(last, i)).collect(),
    ]
}

/// Extrude a wall below every tile edge
///
/// Each present edge vertex gets a copy pushed toward the planet center by
/// [`GridSettings::skirt_depth`]; consecutive pairs are joined by two triangles.
/// Returns the number of vertices added.
///
/// # Errors
///
/// `GenerationFailed` if an edge walk does not start at a present corner.
pub fn add_skirts(
    settings: &GridSettings,
    map: &VertexMap,
    vertices: &mut Vec<Vertex>,
    triangles: &mut Vec<[u32; 3]>,
) -> Result<usize> {
    let depth = settings.skirt_depth();
    let before = vertices.len();

    for walk in edge_walks(settings.vertex_count) {
        let mut present = walk.iter().filter_map(|&point| map.get(point));

        let first = walk[0];
        let Some(mut last) = present.next().filter(|&index| map.get(first) == Some(index)) else {
            return Err(TerrainError::GenerationFailed(format!(
                "skirt corner {:?} has no vertex",
                first
            )));
        };
        let mut last_down = push_lowered(vertices, last, depth)?;

        for current in present {
            let current_down = push_lowered(vertices, current, depth)?;
            triangles.push([last, current, current_down]);
            triangles.push([last, current_down, last_down]);
            last = current;
            last_down = current_down;
        }
    }

    Ok(vertices.len() - before)
}

fn push_lowered(vertices: &mut Vec<Vertex>, index: u32, depth: f32) -> Result<u32> {
    let mut lowered = vertices[index as usize];
    lowered.position -= lowered.position.normalize_or_zero() * depth;

    let new_index = u32::try_from(vertices.len()).map_err(|_| TerrainError::IndexOverflow {
        count: vertices.len(),
        limit: u32::MAX as usize,
    })?;
    vertices.push(lowered);
    Ok(new_index)
}
