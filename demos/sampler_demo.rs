//! Demonstration of the stamp height sampler

use glam::Vec2;
use stamp_terrain::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("Stamp Sampler Demo\n");

    let radius = 100.0;
    let hill: Vec<u16> = (0..32 * 32)
        .map(|i| {
            let (x, y) = ((i / 32) as f32 / 31.0 - 0.5, (i % 32) as f32 / 31.0 - 0.5);
            ((1.0 - (x * x + y * y).sqrt() * 2.0).max(0.0) * u16::MAX as f32) as u16
        })
        .collect();
    let atlas = HeightmapAtlas::new().with_map(7, 32, &hill)?;

    let stamps = vec![
        Stamp::on_surface(Vec3::Y, radius, Vec2::splat(50.0), 7)
            .with_height(10.0, 0.0)
            .with_falloff(Falloff::exponential(-6.0))
            .with_biome(-1.0, 0.5, 0.5),
        Stamp::on_surface(Vec3::new(0.2, 1.0, 0.0), radius, Vec2::splat(30.0), 7)
            .with_height(4.0, 0.0)
            .with_blend_mode(BlendMode::Subtract),
    ];
    let sampler = StampSampler::new(stamps, atlas)?.with_start_height(-1.0);

    println!("Sampling along a meridian:");
    println!("{:-<60}", "");

    for step in 0..=12 {
        let angle = (step as f32 - 6.0) * 0.05;
        let direction = Vec3::new(angle.sin(), angle.cos(), 0.0);
        let probe = sampler.probe(direction, radius);
        println!(
            "{:>6.2} rad -> height {:>7.3}, slope {:>6.2} deg, biome ({:>5.2}, {:>5.2}), stamps {}",
            angle,
            probe.sample.height,
            probe.slope_degrees,
            probe.sample.temperature(),
            probe.sample.humidity(),
            probe.sample.stamp_count
        );
    }

    println!("\n{:-<60}", "");
    println!("Far side (no stamps): {:?}", sampler.sample(Vec3::NEG_Y));

    Ok(())
}
