//! Benchmark of the standalone Delaunay triangulator on sparse lattices

use std::f32::consts::SQRT_2;
use std::time::Instant;

use stamp_terrain::*;

fn main() -> Result<()> {
    env_logger::init();

    println!(
        "{:>6} {:>6} {:>8} {:>8} {:>8} {:>9} {:>10}",
        "grid", "keep", "points", "tris", "peak", "coverage", "time"
    );
    println!("{:-<62}", "");

    for grid_size in [16, 32, 64, 128] {
        for keep_chance in [0.25, 0.5, 1.0] {
            let points = random_lattice(grid_size, keep_chance, 42);
            let size = (grid_size + 1) as f32 * SQRT_2;

            let start = Instant::now();
            let triangulation = triangulate(&points, size)?;
            let elapsed = start.elapsed();

            triangulation.validate()?;
            if grid_size <= 32 {
                assert!(triangulation.is_delaunay(1e-9), "not Delaunay at grid {}", grid_size);
            }

            // sparse hulls can lose triangles attached to the bootstrap corners
            let coverage = triangulation.total_area() / (grid_size as f64 * grid_size as f64);

            println!(
                "{:>6} {:>6.2} {:>8} {:>8} {:>8} {:>8.2}% {:>10.3?}",
                grid_size,
                keep_chance,
                points.len(),
                triangulation.triangle_count(),
                triangulation.stats.peak_slots,
                coverage * 100.0,
                elapsed
            );
            if triangulation.stats.unresolved > 0 {
                println!("  {} unresolved points", triangulation.stats.unresolved);
            }
        }
    }

    Ok(())
}
