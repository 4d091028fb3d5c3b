//! Incremental Bowyer-Watson insertion

use glam::{DVec2, Vec2};
use log::{debug, trace};

use super::store::{TriangleId, TriangleStore};
use super::{Triangulation, TriangulationStats};
use crate::error::{Result, TerrainError};
use crate::geometry::orientation;

/// Corners of the bootstrap triangle for points starting at `first` and spreading
/// at most `size` in any direction
pub fn super_triangle(first: DVec2, size: f64) -> [DVec2; 3] {
    [
        first + DVec2::new(size / 2.0, -3.0 * size),
        first + DVec2::new(-3.0 * size, 3.0 * size),
        first + DVec2::new(3.0 * size, 3.0 * size),
    ]
}

/// Delaunay triangulation of a 2D point set
///
/// `size` bounds how far any point lies from the first one; it scales the
/// bootstrap triangle that encloses the whole set. Output indices refer to
/// `points` and every triangle winds clockwise.
///
/// # Arguments
///
/// * `points` - Input points; insertion follows this order
/// * `size` - Upper bound on the spread of the points around `points[0]`
///
/// # Errors
///
/// - `InvalidConfig` if `size` is not positive and finite
/// - `IndexOverflow` if the point count does not fit 32-bit indices
/// - `PointOutsideSuperTriangle` if `size` is too small for the input
/// - `GenerationFailed` if connectivity becomes inconsistent
///
/// # Example
///
/// ```rust
/// use stamp_terrain::triangulate;
/// use glam::Vec2;
///
/// let square = [
///     Vec2::new(0.0, 0.0),
///     Vec2::new(1.0, 0.0),
///     Vec2::new(0.0, 1.0),
///     Vec2::new(1.0, 1.0),
/// ];
/// let triangulation = triangulate(&square, 10.0).unwrap();
/// assert_eq!(triangulation.triangle_count(), 2);
/// ```
pub fn triangulate(points: &[Vec2], size: f32) -> Result<Triangulation> {
    if !(size > 0.0 && size.is_finite()) {
        return Err(TerrainError::InvalidConfig(format!(
            "triangulation size must be positive (got {})",
            size
        )));
    }

    let limit = u32::MAX as usize - 3;
    if points.len() > limit {
        return Err(TerrainError::IndexOverflow {
            count: points.len(),
            limit,
        });
    }

    if points.len() < 3 {
        return Ok(Triangulation {
            points: points.to_vec(),
            triangles: Vec::new(),
            stats: TriangulationStats::default(),
        });
    }

    let real_count = points.len() as u32;
    let mut positions: Vec<DVec2> = points.iter().map(|p| p.as_dvec2()).collect();
    let corners = super_triangle(positions[0], size as f64);
    check_enclosed(&positions, &corners)?;
    positions.extend_from_slice(&corners);

    let mut store = TriangleStore::new(positions);
    let mut stats = TriangulationStats::default();

    store
        .add_triangle([real_count, real_count + 1, real_count + 2])?
        .ok_or_else(|| TerrainError::GenerationFailed("degenerate super-triangle".to_string()))?;

    for index in 0..real_count {
        insert_point(&mut store, index, &mut stats)?;
        stats.peak_slots = stats.peak_slots.max(store.slot_count());
    }

    // Drop everything still attached to the bootstrap corners
    let triangles: Vec<[u32; 3]> = store
        .live()
        .map(|(_, triangle)| triangle.vertices)
        .filter(|vertices| vertices.iter().all(|&v| v < real_count))
        .collect();
    stats.recycled_slots = store.recycled_count();

    Ok(Triangulation {
        points: points.to_vec(),
        triangles,
        stats,
    })
}

fn check_enclosed(points: &[DVec2], corners: &[DVec2; 3]) -> Result<()> {
    let [a, b, c] = *corners;
    let winding = orientation(a, b, c).signum();
    for (index, &p) in points.iter().enumerate() {
        let inside = orientation(a, b, p) * winding > 0.0
            && orientation(b, c, p) * winding > 0.0
            && orientation(c, a, p) * winding > 0.0;
        if !inside {
            return Err(TerrainError::PointOutsideSuperTriangle { index });
        }
    }
    Ok(())
}

fn insert_point(store: &mut TriangleStore, index: u32, stats: &mut TriangulationStats) -> Result<()> {
    let point = store.point(index);
    stats.inserted += 1;

    // Step 1: seed the cavity with the newest bad triangle, then grow it through
    // shared edges
    let Some(seed) = store.find_bad_triangle(point) else {
        debug!("point {} ({:?}) is inside no circumcircle; skipped", index, point);
        stats.unresolved += 1;
        return Ok(());
    };
    let bad = flood_fill(store, seed, point);

    // Step 2: edges not shared with another bad triangle bound the cavity
    let mut boundary = Vec::with_capacity(bad.len() + 2);
    for &id in &bad {
        let triangle = store.get(id);
        for i in 0..3 {
            let shared = store
                .neighbor_across(id, triangle.edge(i))
                .is_some_and(|other| bad.contains(&other));
            if !shared {
                boundary.push(triangle.directed_edge(i));
            }
        }
    }

    // Step 3: free the cavity
    for &id in bad.iter().rev() {
        store.remove_triangle(id);
    }

    // Step 4: fan the cavity from the new point
    for (a, b) in boundary {
        if store.add_triangle([a, b, index])?.is_none() {
            trace!("rejected collinear triangle ({}, {}, {})", a, b, index);
            stats.degenerate_rejected += 1;
        }
    }

    Ok(())
}

fn flood_fill(store: &TriangleStore, seed: TriangleId, point: DVec2) -> Vec<TriangleId> {
    let mut bad = vec![seed];
    let mut stack = vec![seed];

    while let Some(id) = stack.pop() {
        for edge in store.get(id).edges() {
            let Some(neighbor) = store.neighbor_across(id, edge) else {
                continue;
            };
            if bad.contains(&neighbor) {
                continue;
            }
            if store.get(neighbor).circle.contains(point) {
                bad.push(neighbor);
                stack.push(neighbor);
            }
        }
    }

    bad
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delaunay::random_lattice;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn lattice(side: u32) -> Vec<Vec2> {
        let mut points = Vec::new();
        for x in 0..side {
            for y in 0..side {
                points.push(Vec2::new(x as f32, y as f32));
            }
        }
        points
    }

    fn random_points(count: usize, extent: f32, seed: u64) -> Vec<Vec2> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut points = vec![Vec2::ZERO];
        points.extend(
            (1..count).map(|_| Vec2::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent))),
        );
        points
    }

    fn triangle_set(triangulation: &Triangulation) -> HashSet<[u32; 3]> {
        triangulation
            .triangles
            .iter()
            .map(|t| {
                let mut sorted = *t;
                sorted.sort_unstable();
                sorted
            })
            .collect()
    }

    #[test]
    fn test_five_by_five_lattice() {
        let triangulation = triangulate(&lattice(5), 10.0).unwrap();
        assert_eq!(triangulation.triangle_count(), 32);
        assert_eq!(triangulation.stats.unresolved, 0);
        triangulation.validate().unwrap();
        assert!(triangulation.is_delaunay(1e-9));
    }

    #[test]
    fn test_unit_square() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
        ];
        let triangulation = triangulate(&points, 10.0).unwrap();
        assert_eq!(triangulation.triangle_count(), 2);
        triangulation.validate().unwrap();

        let area: f64 = triangulation
            .triangles
            .iter()
            .map(|&t| triangulation.signed_area(t).abs())
            .sum();
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_row_has_no_triangles() {
        let points: Vec<Vec2> = (0..6).map(|x| Vec2::new(x as f32, 0.0)).collect();
        let triangulation = triangulate(&points, 10.0).unwrap();
        assert!(triangulation.is_empty());
        assert_eq!(triangulation.points.len(), 6);
    }

    #[test]
    fn test_too_few_points() {
        let triangulation = triangulate(&[Vec2::ZERO, Vec2::X], 1.0).unwrap();
        assert!(triangulation.is_empty());
        assert!(triangulate(&[], 1.0).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_size() {
        assert!(matches!(
            triangulate(&lattice(2), 0.0),
            Err(TerrainError::InvalidConfig(_))
        ));
        assert!(triangulate(&lattice(2), f32::NAN).is_err());
    }

    #[test]
    fn test_point_outside_super_triangle() {
        let points = [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 100.0)];
        assert_eq!(
            triangulate(&points, 2.0).err(),
            Some(TerrainError::PointOutsideSuperTriangle { index: 2 })
        );
    }

    #[test]
    fn test_random_sets_are_delaunay() {
        for seed in 0..8 {
            let points = random_points(120, 50.0, seed);
            let triangulation = triangulate(&points, 100.0).unwrap();
            triangulation.validate().unwrap();
            assert!(triangulation.is_delaunay(1e-6), "seed {} not Delaunay", seed);
            assert!(triangulation.triangle_count() > 0);
        }
    }

    #[test]
    fn test_triangles_reference_real_points() {
        let points = random_points(60, 20.0, 7);
        let triangulation = triangulate(&points, 40.0).unwrap();
        for t in &triangulation.triangles {
            assert!(t.iter().all(|&v| (v as usize) < points.len()));
            assert!(t[0] != t[1] && t[1] != t[2] && t[0] != t[2]);
        }
    }

    #[test]
    fn test_repeat_runs_match() {
        let points = random_lattice(12, 0.6, 3);
        let first = triangulate(&points, 12.0).unwrap();
        let second = triangulate(&points, 12.0).unwrap();
        assert_eq!(triangle_set(&first), triangle_set(&second));
    }

    #[test]
    fn test_insertion_order_keeps_geometry() {
        let points = random_points(80, 30.0, 21);
        let forward = triangulate(&points, 60.0).unwrap();

        let mut reversed = points.clone();
        reversed[1..].reverse();
        let backward = triangulate(&reversed, 60.0).unwrap();

        let remap = |t: &Triangulation| -> HashSet<[u32; 3]> {
            t.triangles
                .iter()
                .map(|tri| {
                    let mut mapped = tri.map(|v| {
                        let p = t.points[v as usize];
                        points.iter().position(|&q| q == p).unwrap_or(usize::MAX) as u32
                    });
                    mapped.sort_unstable();
                    mapped
                })
                .collect()
        };
        assert_eq!(remap(&forward), remap(&backward));
    }

    #[test]
    fn test_duplicate_point_is_unresolved() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 4.0),
            Vec2::new(4.0, 0.0),
        ];
        let triangulation = triangulate(&points, 10.0).unwrap();
        assert_eq!(triangulation.stats.unresolved, 1);
        assert_eq!(triangulation.triangle_count(), 1);
    }

    #[test]
    fn test_slots_are_recycled() {
        let triangulation = triangulate(&lattice(6), 10.0).unwrap();
        assert!(triangulation.stats.recycled_slots > 0);
        assert_eq!(triangulation.stats.inserted, 36);
        assert!(triangulation.stats.peak_slots < 36 * 4);
    }
}
