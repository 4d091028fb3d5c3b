//! Terrain grid configuration and builder
//!
//! A `GridSettings` value describes one square tile of a cube-face grid that is
//! projected onto the planet sphere. It is immutable for the duration of a build.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::Vec2;

use crate::error::{Result, TerrainError};

/// Configuration for one terrain tile
///
/// Grid coordinates run from `0` to `vertex_count - 1` on both axes. Point `(x, y)`
/// sits at `uv_start * 2 - 1 + (x, y) * distance` on the `+Y` face of the unit cube
/// before being pushed onto the sphere.
///
/// # Example
///
/// ```rust
/// use stamp_terrain::*;
///
/// let settings = GridSettingsBuilder::new()
///     .vertex_count(33)
///     .core_grid_spacing(8)
///     .build()
///     .unwrap();
///
/// assert_eq!(settings.patch_count(), 16);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSettings {
    /// Number of vertices per grid side
    pub vertex_count: u32,

    /// Spacing between neighboring grid points, in cube-face units (the face spans [-1, 1])
    pub distance: f32,

    /// Vertices whose partial normals differ by less than this angle (degrees) may be dropped
    pub normal_reduce_threshold: f32,

    /// Multiplier applied to sampled heights before displacing the sphere surface
    pub height_scale: f32,

    /// Stride of the core grid lines whose vertices are never dropped
    ///
    /// `(vertex_count - 1)` must be divisible by this value.
    pub core_grid_spacing: u32,

    /// Radius of the undisplaced planet surface
    pub planet_radius: f32,

    /// Lower-left corner of the tile on the cube face, in [0, 1] face UV
    pub uv_start: Vec2,

    /// Extrude skirts along the four tile edges
    pub skirts: bool,
}

impl GridSettings {
    /// Spacing that makes a tile of `vertex_count` points span `uv_size` of a cube face
    pub fn spacing_for_tile(uv_size: f32, vertex_count: u32) -> f32 {
        uv_size * 2.0 / (vertex_count.max(2) - 1) as f32
    }

    /// Extent of the tile in face UV units
    #[inline]
    pub fn uv_size(&self) -> f32 {
        self.distance * (self.vertex_count - 1) as f32 / 2.0
    }

    /// Total number of grid points
    #[inline]
    pub fn point_count(&self) -> usize {
        self.vertex_count as usize * self.vertex_count as usize
    }

    /// Side length of the height grid, which carries a one-point border
    #[inline]
    pub fn padded_count(&self) -> u32 {
        self.vertex_count + 2
    }

    /// Number of patches along one side of the tile
    #[inline]
    pub fn patches_per_line(&self) -> u32 {
        (self.vertex_count - 1) / self.core_grid_spacing
    }

    /// Total number of independently triangulated patches
    #[inline]
    pub fn patch_count(&self) -> usize {
        let per_line = self.patches_per_line() as usize;
        per_line * per_line
    }

    /// Face UV of a grid point; coordinates of `-1` and `vertex_count` address the
    /// padding ring around the tile
    #[inline]
    pub fn grid_uv(&self, x: i32, y: i32) -> Vec2 {
        self.uv_start + Vec2::new(x as f32, y as f32) * (self.distance / 2.0)
    }

    /// Depth of the edge skirts below the surface
    #[inline]
    pub fn skirt_depth(&self) -> f32 {
        self.uv_size() * self.planet_radius * self.height_scale / self.vertex_count as f32 / 50.0
    }

    /// Whether the grid point lies on a core grid line and can never be dropped
    #[inline]
    pub fn is_core_point(&self, x: u32, y: u32) -> bool {
        x % self.core_grid_spacing == 0 || y % self.core_grid_spacing == 0
    }

    /// Check every invariant the pipeline relies on
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.vertex_count < 2 {
            return Err(TerrainError::InvalidConfig(format!(
                "vertex count must be >= 2 (got {})",
                self.vertex_count
            )));
        }
        if self.core_grid_spacing == 0 {
            return Err(TerrainError::InvalidConfig(
                "core grid spacing must be >= 1".to_string(),
            ));
        }
        if (self.vertex_count - 1) % self.core_grid_spacing != 0 {
            return Err(TerrainError::InvalidConfig(format!(
                "vertex count - 1 ({}) is not divisible by core grid spacing {}",
                self.vertex_count - 1,
                self.core_grid_spacing
            )));
        }
        let padded = self.padded_count() as u64;
        if padded * padded > u32::MAX as u64 {
            return Err(TerrainError::InvalidConfig(format!(
                "vertex count {} exceeds the 32-bit index range",
                self.vertex_count
            )));
        }
        if !(self.distance > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "grid spacing must be positive (got {})",
                self.distance
            )));
        }
        if !(self.planet_radius > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "planet radius must be positive (got {})",
                self.planet_radius
            )));
        }
        if !(self.normal_reduce_threshold >= 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "normal reduce threshold must be >= 0 (got {})",
                self.normal_reduce_threshold
            )));
        }
        Ok(())
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        GridSettingsBuilder::new().settings
    }
}

/// Builder for `GridSettings` with validation
///
/// # Example
///
/// ```rust
/// use stamp_terrain::*;
///
/// let settings = GridSettingsBuilder::new()
///     .vertex_count(65)
///     .core_grid_spacing(16)
///     .tile(glam::Vec2::new(0.25, 0.25), 0.5)
///     .normal_reduce_threshold(1.5)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert!((settings.uv_size() - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct GridSettingsBuilder {
    settings: GridSettings,
    uv_size: Option<f32>,
}

impl GridSettingsBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - vertex_count: 65
    /// - core_grid_spacing: 8
    /// - tile: the whole cube face (uv_start 0, uv_size 1)
    /// - normal_reduce_threshold: 2 degrees
    /// - height_scale: 1.0, planet_radius: 100.0
    /// - skirts: enabled
    pub fn new() -> Self {
        Self {
            settings: GridSettings {
                vertex_count: 65,
                distance: GridSettings::spacing_for_tile(1.0, 65),
                normal_reduce_threshold: 2.0,
                height_scale: 1.0,
                core_grid_spacing: 8,
                planet_radius: 100.0,
                uv_start: Vec2::ZERO,
                skirts: true,
            },
            uv_size: Some(1.0),
        }
    }

    /// Set the number of vertices per side
    ///
    /// If the tile was given as a UV extent, the spacing is re-derived at build time.
    pub fn vertex_count(mut self, count: u32) -> Self {
        self.settings.vertex_count = count;
        self
    }

    /// Set the grid spacing directly, overriding any tile extent
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the spacing is not positive
    pub fn distance(mut self, distance: f32) -> Result<Self> {
        if !(distance > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "grid spacing must be positive (got {})",
                distance
            )));
        }
        self.settings.distance = distance;
        self.uv_size = None;
        Ok(self)
    }

    /// Place the tile on the cube face by its lower-left UV corner and UV extent
    pub fn tile(mut self, uv_start: Vec2, uv_size: f32) -> Self {
        self.settings.uv_start = uv_start;
        self.uv_size = Some(uv_size);
        self
    }

    /// Set the angle (degrees) below which non-core vertices are dropped
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the threshold is negative
    pub fn normal_reduce_threshold(mut self, degrees: f32) -> Result<Self> {
        if !(degrees >= 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "normal reduce threshold must be >= 0 (got {})",
                degrees
            )));
        }
        self.settings.normal_reduce_threshold = degrees;
        Ok(self)
    }

    /// Set the height multiplier
    pub fn height_scale(mut self, scale: f32) -> Self {
        self.settings.height_scale = scale;
        self
    }

    /// Set the core grid stride
    pub fn core_grid_spacing(mut self, spacing: u32) -> Self {
        self.settings.core_grid_spacing = spacing;
        self
    }

    /// Set the planet radius
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if radius <= 0.0
    pub fn planet_radius(mut self, radius: f32) -> Result<Self> {
        if !(radius > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "planet radius must be positive (got {})",
                radius
            )));
        }
        self.settings.planet_radius = radius;
        Ok(self)
    }

    /// Enable or disable edge skirts
    pub fn skirts(mut self, enabled: bool) -> Self {
        self.settings.skirts = enabled;
        self
    }

    /// Build and validate the settings
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if any grid invariant is violated, most commonly a
    /// vertex count that does not line up with the core grid spacing.
    pub fn build(self) -> Result<GridSettings> {
        let mut settings = self.settings;
        if let Some(uv_size) = self.uv_size {
            if !(uv_size > 0.0) {
                return Err(TerrainError::InvalidConfig(format!(
                    "tile UV size must be positive (got {})",
                    uv_size
                )));
            }
            settings.distance = GridSettings::spacing_for_tile(uv_size, settings.vertex_count);
        }
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for GridSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let settings = GridSettingsBuilder::new().build().unwrap();
        assert_eq!(settings.vertex_count, 65);
        assert_eq!(settings.core_grid_spacing, 8);
        assert_eq!(settings.patches_per_line(), 8);
        assert_eq!(settings.patch_count(), 64);
        assert!((settings.uv_size() - 1.0).abs() < 1e-6);
        assert!(settings.skirts);
    }

    #[test]
    fn test_core_spacing_must_divide_grid() {
        let result = GridSettingsBuilder::new()
            .vertex_count(10)
            .core_grid_spacing(4)
            .build();
        assert!(matches!(result, Err(TerrainError::InvalidConfig(_))));

        let result = GridSettingsBuilder::new()
            .vertex_count(9)
            .core_grid_spacing(4)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_zero_spacing_rejected() {
        let result = GridSettingsBuilder::new().core_grid_spacing(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_tiny_grid_rejected() {
        let result = GridSettingsBuilder::new()
            .vertex_count(1)
            .core_grid_spacing(1)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_radius() {
        assert!(GridSettingsBuilder::new().planet_radius(0.0).is_err());
        assert!(GridSettingsBuilder::new().planet_radius(-3.0).is_err());
        assert!(GridSettingsBuilder::new().planet_radius(f32::NAN).is_err());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        assert!(GridSettingsBuilder::new().normal_reduce_threshold(-1.0).is_err());
    }

    #[test]
    fn test_explicit_distance_overrides_tile() {
        let settings = GridSettingsBuilder::new()
            .vertex_count(5)
            .core_grid_spacing(4)
            .distance(0.5)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(settings.distance, 0.5);
        assert!((settings.uv_size() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_core_points_are_grid_lines() {
        let settings = GridSettingsBuilder::new()
            .vertex_count(9)
            .core_grid_spacing(4)
            .build()
            .unwrap();
        assert!(settings.is_core_point(0, 3));
        assert!(settings.is_core_point(3, 8));
        assert!(settings.is_core_point(4, 4));
        assert!(!settings.is_core_point(1, 3));
    }

    #[test]
    fn test_grid_uv_spans_tile() {
        let settings = GridSettingsBuilder::new()
            .vertex_count(9)
            .core_grid_spacing(4)
            .tile(Vec2::new(0.5, 0.25), 0.5)
            .build()
            .unwrap();
        assert!((settings.grid_uv(0, 0) - Vec2::new(0.5, 0.25)).length() < 1e-6);
        assert!((settings.grid_uv(8, 8) - Vec2::new(1.0, 0.75)).length() < 1e-6);
        assert!(settings.grid_uv(-1, 0).x < 0.5);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_settings_serialization() {
        let settings = GridSettingsBuilder::new()
            .vertex_count(17)
            .core_grid_spacing(4)
            .build()
            .unwrap();

        let json = serde_json::to_string(&settings).unwrap();
        let restored: GridSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, restored);
    }
}
