//! Terrain mesh generation stages
//!
//! Heights are sampled on a padded grid, turned into decimated vertices, then
//! each core-grid patch is triangulated on its own. Every stage finishes before
//! the next one starts.

mod heights;
mod patches;
mod skirts;
mod vertices;

pub use heights::{grid_direction, sample_heights, HeightGrid};
pub use patches::{patch_origin, patch_points, triangulate_patches, PatchTriangles};
pub use skirts::add_skirts;
pub use vertices::{generate_vertices, normal_and_curvature, Vertex, VertexMap, VertexSet};
