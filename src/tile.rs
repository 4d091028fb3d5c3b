//! TerrainTile main structure

use glam::Vec3;
use parry3d::bounding_volume::Aabb;

use crate::config::GridSettings;
use crate::error::Result;
use crate::mesh::{generate_terrain_mesh, BiomeColorMapper, ColorMapper, MeshData, TerrainMesh};
use crate::terrain::{HeightSample, TerrainSampler};

/// One generated square of terrain on a cube face
///
/// Holds the settings and color mapper it was built from next to the finished
/// mesh, so a renderer can keep the tile around and rebuild it when stamps change.
///
/// # Type Parameters
///
/// * `C` - Color mapper reused by every rebuild
///
/// # Examples
///
/// ```
/// use stamp_terrain::*;
///
/// let settings = GridSettingsBuilder::new()
///     .vertex_count(9)
///     .core_grid_spacing(4)
///     .build()
///     .unwrap();
///
/// let tile = TerrainTile::generate(settings, &|_: Vec3| HeightSample::flat(0.0)).unwrap();
/// println!("{} triangles", tile.triangle_count());
/// ```
#[derive(Debug, Clone)]
pub struct TerrainTile<C = BiomeColorMapper> {
    settings: GridSettings,
    color_mapper: C,
    mesh: TerrainMesh,
}

impl TerrainTile<BiomeColorMapper> {
    /// Generate a tile colored with the default [`BiomeColorMapper`]
    ///
    /// # Errors
    ///
    /// Any error of [`generate_terrain_mesh`].
    pub fn generate<S>(settings: GridSettings, sampler: &S) -> Result<Self>
    where
        S: TerrainSampler + ?Sized,
    {
        Self::generate_with_colors(settings, sampler, BiomeColorMapper::default())
    }
}

impl<C: ColorMapper<HeightSample>> TerrainTile<C> {
    /// Generate a tile with a custom color mapper
    ///
    /// # Arguments
    ///
    /// * `settings` - Grid configuration, kept on the tile
    /// * `sampler` - Height and biome source
    /// * `color_mapper` - Vertex color source, kept on the tile for rebuilds
    pub fn generate_with_colors<S>(settings: GridSettings, sampler: &S, color_mapper: C) -> Result<Self>
    where
        S: TerrainSampler + ?Sized,
    {
        let mesh = generate_terrain_mesh(&settings, sampler, &color_mapper)?;
        log::info!(
            "tile at {:?}: {} vertices, {} triangles",
            settings.uv_start,
            mesh.data.vertex_count(),
            mesh.data.triangle_count()
        );
        Ok(Self {
            settings,
            color_mapper,
            mesh,
        })
    }

    /// Rebuild in place with the tile's own color mapper
    ///
    /// On error the previous mesh is kept untouched.
    pub fn regenerate<S>(&mut self, sampler: &S) -> Result<()>
    where
        S: TerrainSampler + ?Sized,
    {
        self.mesh = generate_terrain_mesh(&self.settings, sampler, &self.color_mapper)?;
        Ok(())
    }

    /// Rebuild in place and switch to a new color mapper
    ///
    /// On error both the previous mesh and the previous mapper are kept.
    pub fn regenerate_with_colors<S>(&mut self, sampler: &S, color_mapper: C) -> Result<()>
    where
        S: TerrainSampler + ?Sized,
    {
        self.mesh = generate_terrain_mesh(&self.settings, sampler, &color_mapper)?;
        self.color_mapper = color_mapper;
        Ok(())
    }

    pub fn color_mapper(&self) -> &C {
        &self.color_mapper
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    /// Render buffers
    pub fn data(&self) -> &MeshData {
        &self.mesh.data
    }

    pub fn bounds(&self) -> &Aabb {
        &self.mesh.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.data.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.data.triangle_count()
    }

    /// Center of the bounding box in planet-local space
    pub fn center(&self) -> Vec3 {
        let center = self.mesh.bounds.center();
        Vec3::new(center.x, center.y, center.z)
    }

    /// Consume the tile, keeping only the render buffers
    pub fn into_mesh_data(self) -> MeshData {
        self.mesh.data
    }
}
