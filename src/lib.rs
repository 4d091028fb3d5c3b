//! Stamp-based spherical terrain generation
//!
//! A standalone library that turns a stack of projected heightmap stamps into
//! triangulated terrain tiles on a cube-sphere planet, suitable for use with any
//! game engine (Bevy, Godot, etc.)
//!
//! # Quick Start
//!
//! ```rust
//! use stamp_terrain::*;
//!
//! // One 8x8 heightmap, raised in the middle
//! let texels: Vec<u16> = (0..64)
//!     .map(|i| if (2..6).contains(&(i % 8)) && (2..6).contains(&(i / 8)) { u16::MAX } else { 0 })
//!     .collect();
//! let atlas = HeightmapAtlas::new().with_map(0, 8, &texels).unwrap();
//!
//! // A stamp on the north pole, 40 units wide
//! let stamp = Stamp::on_surface(Vec3::Y, 100.0, glam::Vec2::splat(40.0), 0).with_height(5.0, 0.0);
//! let sampler = StampSampler::new(vec![stamp], atlas).unwrap();
//!
//! let settings = GridSettingsBuilder::new()
//!     .vertex_count(17)
//!     .core_grid_spacing(8)
//!     .tile(glam::Vec2::new(0.4, 0.4), 0.2)
//!     .build()
//!     .unwrap();
//!
//! let tile = TerrainTile::generate(settings, &sampler).unwrap();
//! println!("Generated {} triangles", tile.triangle_count());
//! ```
//!
//! The triangulator is usable on its own:
//!
//! ```rust
//! use stamp_terrain::*;
//!
//! let points = random_lattice(16, 0.5, 7);
//! let triangulation = triangulate(&points, 17.0 * std::f32::consts::SQRT_2).unwrap();
//! assert!(triangulation.validate().is_ok());
//! ```
//!
//! # Features
//!
//! - `serde`: Enables serialization support for settings, stamps and the heightmap atlas

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod stamp;
pub mod terrain;
pub mod delaunay;
pub mod generation;
pub mod mesh;
pub mod tile;
pub mod util;

// Re-export core types for convenience
pub use error::{TerrainError, Result};
pub use config::{GridSettings, GridSettingsBuilder};
pub use stamp::{BlendMode, Falloff, HeightmapAtlas, Stamp};
pub use terrain::{HeightSample, StampSampler, SurfaceProbe, TerrainSampler};
pub use delaunay::{random_lattice, triangulate, Triangulation, TriangulationStats};
pub use mesh::{
    compute_bounds, generate_terrain_mesh, BiomeColorMapper, ColorMapper, CustomColorMapper, MeshData,
    TerrainColor, TerrainMesh,
};
pub use tile::TerrainTile;

// Re-export glam::Vec3 for convenience
pub use glam::Vec3;
