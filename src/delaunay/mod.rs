//! Incremental Delaunay triangulation
//!
//! A Bowyer-Watson triangulator over sparse 2D point sets. Bad triangles are
//! found by a backward scan for the first one whose circumcircle holds the new
//! point, then a flood fill across shared edges. The cavity is refilled with a
//! fan from the new point. Triangle slots come from a pooled arena with a free
//! list, and an edge index answers "who is on the other side" in constant time.
//!
//! Circumcircle containment is strict: a point exactly on a circumcircle does not
//! invalidate the triangle. This keeps regular lattices, where every cell is
//! cocircular, stable under repeated runs.

mod bowyer_watson;
mod store;

pub use bowyer_watson::{super_triangle, triangulate};
pub use store::{Edge, Triangle, TriangleId, TriangleStore};

use std::collections::HashMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, TerrainError};
use crate::geometry::{circumcircle, orientation};

/// Counters collected while triangulating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriangulationStats {
    /// Points processed
    pub inserted: usize,
    /// Points that fell inside no circumcircle and produced no triangles
    pub unresolved: usize,
    /// Collinear fan candidates that were skipped
    pub degenerate_rejected: usize,
    /// Largest arena size reached, excluding the sentinel slot
    pub peak_slots: usize,
    /// Triangles placed into previously freed slots
    pub recycled_slots: usize,
}

/// Output of [`triangulate`]
#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    /// The input points, unchanged
    pub points: Vec<Vec2>,
    /// Triangles as indices into `points`, all wound clockwise
    pub triangles: Vec<[u32; 3]>,
    pub stats: TriangulationStats,
}

impl Triangulation {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Signed area of a triangle; negative for clockwise winding
    pub fn signed_area(&self, triangle: [u32; 3]) -> f64 {
        let [a, b, c] = triangle.map(|v| self.points[v as usize].as_dvec2());
        orientation(a, b, c) / 2.0
    }

    /// Area covered by all triangles
    pub fn total_area(&self) -> f64 {
        self.triangles.iter().map(|&t| self.signed_area(t).abs()).sum()
    }

    /// Whether no point lies inside the circumcircle of a triangle it is not part of
    ///
    /// `tolerance` is relative to each squared radius so that cocircular points do
    /// not count as violations.
    pub fn is_delaunay(&self, tolerance: f64) -> bool {
        self.triangles.iter().all(|triangle| {
            let [a, b, c] = triangle.map(|v| self.points[v as usize].as_dvec2());
            let Some(circle) = circumcircle(a, b, c) else {
                return false;
            };
            let limit = circle.radius_sq * (1.0 - tolerance);
            self.points.iter().enumerate().all(|(index, point)| {
                triangle.contains(&(index as u32))
                    || point.as_dvec2().distance_squared(circle.center) >= limit
            })
        })
    }

    /// Structural checks: indices in range and distinct, no degenerate triangles,
    /// one consistent winding, and no edge used by more than two triangles
    ///
    /// # Errors
    ///
    /// `GenerationFailed` naming the first violated check.
    pub fn validate(&self) -> Result<()> {
        let mut edge_use: HashMap<Edge, u32> = HashMap::new();

        for (i, &triangle) in self.triangles.iter().enumerate() {
            let [a, b, c] = triangle;
            if triangle.iter().any(|&v| v as usize >= self.points.len()) {
                return Err(TerrainError::GenerationFailed(format!(
                    "triangle {} references a missing point: {:?}",
                    i, triangle
                )));
            }
            if a == b || b == c || a == c {
                return Err(TerrainError::GenerationFailed(format!(
                    "triangle {} repeats a vertex: {:?}",
                    i, triangle
                )));
            }
            if self.signed_area(triangle) >= 0.0 {
                return Err(TerrainError::GenerationFailed(format!(
                    "triangle {} is degenerate or wound counter-clockwise: {:?}",
                    i, triangle
                )));
            }
            for edge in [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)] {
                let count = edge_use.entry(edge).or_insert(0);
                *count += 1;
                if *count > 2 {
                    return Err(TerrainError::GenerationFailed(format!(
                        "edge ({}, {}) is shared by more than two triangles",
                        edge.a(),
                        edge.b()
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Lattice points in `[0, grid_size]^2`, each kept with probability `keep_chance`
///
/// The four corners are always kept so the hull stays fixed. The result starts at
/// the origin and spreads at most `grid_size`, so `grid_size` keeps every point
/// inside the bootstrap triangle of [`triangulate`].
///
/// Enclosure does not guarantee full coverage: on sparse sets a thin hull
/// triangle can circumscribe a bootstrap corner and be dropped with it, leaving
/// [`Triangulation::total_area`] short of `grid_size^2`. Inputs with complete
/// boundary rows, like terrain patches, cover the whole square.
pub fn random_lattice(grid_size: u32, keep_chance: f32, seed: u64) -> Vec<Vec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let side = grid_size.max(1);
    let mut points = Vec::new();

    for x in 0..=side {
        for y in 0..=side {
            let is_corner = x % side == 0 && y % side == 0;
            let roll: f32 = rng.gen();
            if roll > keep_chance && !is_corner {
                continue;
            }
            points.push(Vec2::new(x as f32, y as f32));
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_lattice_keeps_corners() {
        let points = random_lattice(10, 0.0, 1);
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], Vec2::ZERO);
        assert!(points.contains(&Vec2::new(10.0, 10.0)));

        let full = random_lattice(10, 1.0, 1);
        assert_eq!(full.len(), 121);
    }

    #[test]
    fn test_full_boundary_covers_square() {
        for seed in 0..20 {
            let mut points = random_lattice(16, 0.3, seed);
            for i in 1..16 {
                for edge in [
                    Vec2::new(i as f32, 0.0),
                    Vec2::new(i as f32, 16.0),
                    Vec2::new(0.0, i as f32),
                    Vec2::new(16.0, i as f32),
                ] {
                    if !points.contains(&edge) {
                        points.push(edge);
                    }
                }
            }
            let triangulation = triangulate(&points, 17.0 * std::f32::consts::SQRT_2).unwrap();
            assert!((triangulation.total_area() - 256.0).abs() < 1e-6, "seed {}", seed);
        }
    }

    #[test]
    fn test_sparse_lattice_area_never_exceeds_square() {
        for seed in 0..20 {
            let points = random_lattice(32, 0.1, seed);
            let triangulation = triangulate(&points, 33.0 * std::f32::consts::SQRT_2).unwrap();
            assert!(triangulation.total_area() <= 1024.0 + 1e-6);
            triangulation.validate().unwrap();
        }
    }

    #[test]
    fn test_random_lattice_is_reproducible() {
        assert_eq!(random_lattice(16, 0.5, 9), random_lattice(16, 0.5, 9));
        assert_ne!(random_lattice(16, 0.5, 9), random_lattice(16, 0.5, 10));
    }

    #[test]
    fn test_validate_rejects_bad_triangles() {
        let points = vec![Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::ONE];
        let mut triangulation = Triangulation {
            points,
            triangles: vec![[0, 2, 1]],
            stats: TriangulationStats::default(),
        };
        triangulation.validate().unwrap();

        triangulation.triangles = vec![[0, 1, 2]];
        assert!(triangulation.validate().is_err());

        triangulation.triangles = vec![[0, 0, 1]];
        assert!(triangulation.validate().is_err());

        triangulation.triangles = vec![[0, 2, 7]];
        assert!(triangulation.validate().is_err());
    }

    #[test]
    fn test_is_delaunay_detects_bad_diagonal() {
        // a thin rhombus split along its long diagonal violates the empty circle
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, -0.5),
            Vec2::new(4.0, 0.0),
            Vec2::new(2.0, 0.5),
        ];
        let bad = Triangulation {
            points: points.clone(),
            triangles: vec![[0, 3, 2], [0, 2, 1]],
            stats: TriangulationStats::default(),
        };
        assert!(!bad.is_delaunay(1e-9));

        let good = Triangulation {
            points,
            triangles: vec![[0, 3, 1], [1, 3, 2]],
            stats: TriangulationStats::default(),
        };
        assert!(good.is_delaunay(1e-9));
    }
}
