//! Vertex color mapping from height samples

use crate::terrain::HeightSample;

/// RGBA color type
pub type TerrainColor = [f32; 4];

/// Trait for mapping a terrain sample to a vertex color
pub trait ColorMapper<T>: Sync {
    /// Map a sample to an RGBA color
    fn map_color(&self, sample: &T) -> TerrainColor;
}

/// Encodes the biome signal directly into the color channels
///
/// Red carries temperature and green carries humidity, both remapped from
/// [-1, 1] to [0, 1]. Blue is the stamp overlap count relative to
/// `stamp_saturation`, which shaders can use to fade in detail.
#[derive(Debug, Clone, Copy)]
pub struct BiomeColorMapper {
    pub stamp_saturation: u32,
}

impl Default for BiomeColorMapper {
    fn default() -> Self {
        Self { stamp_saturation: 4 }
    }
}

impl ColorMapper<HeightSample> for BiomeColorMapper {
    fn map_color(&self, sample: &HeightSample) -> TerrainColor {
        let saturation = self.stamp_saturation.max(1);
        let share = sample.stamp_count.min(saturation) as f32 / saturation as f32;
        [
            (sample.temperature() + 1.0) / 2.0,
            (sample.humidity() + 1.0) / 2.0,
            share,
            1.0,
        ]
    }
}

/// Blends four corner colors over the temperature/humidity plane
#[derive(Debug, Clone)]
pub struct CustomColorMapper {
    pub cold_dry: TerrainColor,
    pub cold_wet: TerrainColor,
    pub hot_dry: TerrainColor,
    pub hot_wet: TerrainColor,
}

impl Default for CustomColorMapper {
    fn default() -> Self {
        Self {
            cold_dry: [0.85, 0.85, 0.9, 1.0],  // Tundra
            cold_wet: [0.95, 0.95, 1.0, 1.0],  // Snow
            hot_dry: [0.9, 0.8, 0.5, 1.0],     // Sand
            hot_wet: [0.2, 0.6, 0.2, 1.0],     // Jungle
        }
    }
}

impl ColorMapper<HeightSample> for CustomColorMapper {
    fn map_color(&self, sample: &HeightSample) -> TerrainColor {
        let t = ((sample.temperature() + 1.0) / 2.0).clamp(0.0, 1.0);
        let h = ((sample.humidity() + 1.0) / 2.0).clamp(0.0, 1.0);

        let mut color = [0.0; 4];
        for (i, channel) in color.iter_mut().enumerate() {
            let cold = self.cold_dry[i] + (self.cold_wet[i] - self.cold_dry[i]) * h;
            let hot = self.hot_dry[i] + (self.hot_wet[i] - self.hot_dry[i]) * h;
            *channel = cold + (hot - cold) * t;
        }
        color
    }
}
