//! Demonstration of terrain tile generation
//!
//! Run with `RUST_LOG=debug` to see per-stage timings.

use glam::Vec2;
use stamp_terrain::*;

fn crater(size: u32) -> Vec<u16> {
    let half = size as f32 / 2.0;
    (0..size * size)
        .map(|i| {
            let (x, y) = ((i / size) as f32 - half, (i % size) as f32 - half);
            let r = (x * x + y * y).sqrt() / half;
            let rim = (-(r - 0.7) * (r - 0.7) * 40.0).exp();
            let bowl = if r < 0.7 { 0.3 * (1.0 - r / 0.7) } else { 0.0 };
            ((rim - bowl).clamp(0.0, 1.0) * u16::MAX as f32) as u16
        })
        .collect()
}

fn ridge(size: u32) -> Vec<u16> {
    (0..size * size)
        .map(|i| {
            let x = (i / size) as f32 / (size - 1) as f32;
            let ridge = 1.0 - (x * 2.0 - 1.0).abs();
            (ridge * ridge * u16::MAX as f32) as u16
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let radius = 100.0;
    let atlas = HeightmapAtlas::new()
        .with_map(0, 64, &crater(64))?
        .with_map(1, 32, &ridge(32))?;

    let stamps = vec![
        Stamp::on_surface(Vec3::Y, radius, Vec2::splat(30.0), 0)
            .with_height(6.0, 0.0)
            .with_falloff(Falloff::exponential(-4.0))
            .with_biome(-0.5, 0.2, 0.8),
        Stamp::on_surface(Vec3::new(0.15, 1.0, -0.1), radius, Vec2::new(40.0, 12.0), 1)
            .with_height(3.0, 0.0)
            .with_blend_mode(BlendMode::Max),
        Stamp::on_surface(Vec3::new(-0.1, 1.0, 0.1), radius, Vec2::splat(25.0), 1)
            .with_height(1.0, 0.0)
            .with_blend_mode(BlendMode::BiomeOnly)
            .with_biome(0.9, -0.6, 0.0),
    ];

    let sampler = StampSampler::new(stamps, atlas)?;

    let settings = GridSettingsBuilder::new()
        .vertex_count(129)
        .core_grid_spacing(16)
        .tile(Vec2::new(0.35, 0.35), 0.3)
        .planet_radius(radius)?
        .normal_reduce_threshold(1.0)?
        .build()?;

    println!("Generating tile...");
    let tile = TerrainTile::generate(settings, &sampler)?;
    let mesh = tile.mesh();

    println!("\nMesh statistics:");
    println!("  Grid points: {}", settings.point_count());
    println!("  Kept: {}", mesh.vertices_kept);
    println!("  Skipped: {}", mesh.vertices_skipped);
    println!("  Skirt vertices: {}", mesh.skirt_vertices);
    println!("  Patches: {}", mesh.patch_count);
    println!("  Triangles: {}", tile.triangle_count());
    println!("  Max stamp overlap: {}", mesh.max_stamp_count);
    println!("  Bounds: {:?} .. {:?}", tile.bounds().mins, tile.bounds().maxs);

    // Memory estimate
    let data = tile.data();
    let total = data.positions.len() * 12
        + data.normals.len() * 12
        + data.colors.len() * 16
        + data.uvs.len() * 8
        + data.indices.len() * 4;
    println!("\nMemory usage: {} bytes ({:.2} MB)", total, total as f32 / 1024.0 / 1024.0);

    // Same tile with climate colors
    let custom = CustomColorMapper {
        cold_dry: [0.9, 0.9, 0.95, 1.0],
        hot_dry: [0.8, 0.6, 0.3, 1.0],
        ..Default::default()
    };
    let tinted = TerrainTile::generate_with_colors(settings, &sampler, custom)?;
    println!("Custom color mapper: {} vertices", tinted.vertex_count());

    Ok(())
}
