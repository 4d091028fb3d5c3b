//! Pooled triangle storage with edge connectivity
//!
//! Triangles live in a growable arena. Removing a triangle only marks it deleted
//! and pushes its slot onto a free stack, so ids held elsewhere stay valid until
//! the slot is handed out again. Slot 0 is a permanently deleted sentinel and is
//! never returned as a live id.

use std::collections::HashMap;
use std::num::NonZeroU32;

use glam::DVec2;

use crate::error::{Result, TerrainError};
use crate::geometry::{circumcircle, Circle};

/// Index of a triangle slot in a [`TriangleStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId(NonZeroU32);

impl TriangleId {
    fn from_slot(slot: usize) -> Result<Self> {
        u32::try_from(slot)
            .ok()
            .and_then(NonZeroU32::new)
            .map(TriangleId)
            .ok_or(TerrainError::IndexOverflow {
                count: slot,
                limit: u32::MAX as usize,
            })
    }

    /// Arena slot of this triangle
    #[inline]
    pub fn slot(self) -> usize {
        self.0.get() as usize
    }
}

/// Unordered pair of point indices, stored smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(u32, u32);

impl Edge {
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Edge(a, b)
        } else {
            Edge(b, a)
        }
    }

    #[inline]
    pub fn a(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn b(&self) -> u32 {
        self.1
    }
}

/// A triangle record with its cached circumcircle
///
/// Vertex order defines the edges `v0-v1`, `v1-v2` and `v2-v0`; `neighbors[i]`
/// is the triangle across edge `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [u32; 3],
    pub circle: Circle,
    pub neighbors: [Option<TriangleId>; 3],
    pub deleted: bool,
}

impl Triangle {
    fn sentinel() -> Self {
        Self {
            vertices: [0; 3],
            circle: Circle {
                center: DVec2::ZERO,
                radius_sq: f64::NEG_INFINITY,
            },
            neighbors: [None; 3],
            deleted: true,
        }
    }

    /// Directed edge `i`, following the vertex winding
    #[inline]
    pub fn directed_edge(&self, i: usize) -> (u32, u32) {
        (self.vertices[i], self.vertices[(i + 1) % 3])
    }

    #[inline]
    pub fn edge(&self, i: usize) -> Edge {
        let (a, b) = self.directed_edge(i);
        Edge::new(a, b)
    }

    pub fn edges(&self) -> [Edge; 3] {
        [self.edge(0), self.edge(1), self.edge(2)]
    }

    pub fn contains_vertex(&self, vertex: u32) -> bool {
        self.vertices.contains(&vertex)
    }

    fn edge_index(&self, edge: Edge) -> Option<usize> {
        (0..3).find(|&i| self.edge(i) == edge)
    }
}

/// The at most two triangles that share an edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TrianglePair {
    first: Option<TriangleId>,
    second: Option<TriangleId>,
}

impl TrianglePair {
    fn insert(&mut self, id: TriangleId) -> bool {
        if self.first.is_none() {
            self.first = Some(id);
            true
        } else if self.second.is_none() {
            self.second = Some(id);
            true
        } else {
            false
        }
    }

    fn remove(&mut self, id: TriangleId) {
        if self.first == Some(id) {
            self.first = None;
        } else if self.second == Some(id) {
            self.second = None;
        }
    }

    fn other(&self, id: TriangleId) -> Option<TriangleId> {
        if self.first == Some(id) {
            self.second
        } else {
            self.first
        }
    }

    fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }
}

/// Triangle arena, free list and edge-to-triangle index for one triangulation
#[derive(Debug, Clone)]
pub struct TriangleStore {
    points: Vec<DVec2>,
    triangles: Vec<Triangle>,
    free: Vec<TriangleId>,
    connectivity: HashMap<Edge, TrianglePair>,
    recycled: usize,
}

impl TriangleStore {
    /// Create an empty store over a fixed point array
    pub fn new(points: Vec<DVec2>) -> Self {
        let capacity = points.len() * 2 + 1;
        let mut triangles = Vec::with_capacity(capacity);
        triangles.push(Triangle::sentinel());
        Self {
            connectivity: HashMap::with_capacity(points.len() * 3),
            points,
            triangles,
            free: Vec::new(),
            recycled: 0,
        }
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    #[inline]
    pub fn point(&self, index: u32) -> DVec2 {
        self.points[index as usize]
    }

    /// Add a triangle, reusing a freed slot when one is available
    ///
    /// Returns `Ok(None)` without touching the store when the three points are
    /// collinear.
    ///
    /// # Errors
    ///
    /// `IndexOverflow` if the arena outgrows 32-bit ids, `GenerationFailed` if an
    /// edge would be shared by a third triangle.
    pub fn add_triangle(&mut self, vertices: [u32; 3]) -> Result<Option<TriangleId>> {
        let [a, b, c] = vertices;
        let Some(circle) = circumcircle(self.point(a), self.point(b), self.point(c)) else {
            return Ok(None);
        };

        let triangle = Triangle {
            vertices,
            circle,
            neighbors: [None; 3],
            deleted: false,
        };

        let id = match self.free.pop() {
            Some(id) => {
                self.triangles[id.slot()] = triangle;
                self.recycled += 1;
                id
            }
            None => {
                let id = TriangleId::from_slot(self.triangles.len())?;
                self.triangles.push(triangle);
                id
            }
        };

        for i in 0..3 {
            let edge = self.triangles[id.slot()].edge(i);
            let pair = self.connectivity.entry(edge).or_default();
            if !pair.insert(id) {
                return Err(TerrainError::GenerationFailed(format!(
                    "edge ({}, {}) is already shared by two triangles",
                    edge.a(),
                    edge.b()
                )));
            }
            let neighbor = pair.other(id);
            self.triangles[id.slot()].neighbors[i] = neighbor;
            if let Some(neighbor) = neighbor {
                self.link(neighbor, edge, Some(id));
            }
        }

        Ok(Some(id))
    }

    /// Mark a triangle deleted, unlink it from its edges and free its slot
    pub fn remove_triangle(&mut self, id: TriangleId) {
        if self.triangles[id.slot()].deleted {
            return;
        }

        for edge in self.triangles[id.slot()].edges() {
            let mut neighbor = None;
            if let Some(pair) = self.connectivity.get_mut(&edge) {
                neighbor = pair.other(id);
                pair.remove(id);
                if pair.is_empty() {
                    self.connectivity.remove(&edge);
                }
            }
            if let Some(neighbor) = neighbor {
                self.link(neighbor, edge, None);
            }
        }

        let triangle = &mut self.triangles[id.slot()];
        triangle.deleted = true;
        triangle.neighbors = [None; 3];
        self.free.push(id);
    }

    fn link(&mut self, id: TriangleId, edge: Edge, neighbor: Option<TriangleId>) {
        let triangle = &mut self.triangles[id.slot()];
        if let Some(i) = triangle.edge_index(edge) {
            triangle.neighbors[i] = neighbor;
        }
    }

    #[inline]
    pub fn get(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id.slot()]
    }

    /// Triangle on the other side of `edge` from `id`, read from the edge index
    pub fn neighbor_across(&self, id: TriangleId, edge: Edge) -> Option<TriangleId> {
        self.connectivity.get(&edge).and_then(|pair| pair.other(id))
    }

    /// Neighbors across each of the three edges
    pub fn neighbors(&self, id: TriangleId) -> [Option<TriangleId>; 3] {
        self.triangles[id.slot()].neighbors
    }

    /// Newest live triangle whose circumcircle strictly contains `point`
    pub fn find_bad_triangle(&self, point: DVec2) -> Option<TriangleId> {
        self.triangles
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .find(|(_, triangle)| !triangle.deleted && triangle.circle.contains(point))
            .and_then(|(slot, _)| TriangleId::from_slot(slot).ok())
    }

    /// Live triangles in slot order
    pub fn live(&self) -> impl Iterator<Item = (TriangleId, &Triangle)> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, triangle)| !triangle.deleted)
            .filter_map(|(slot, triangle)| Some((TriangleId::from_slot(slot).ok()?, triangle)))
    }

    pub fn live_count(&self) -> usize {
        self.triangles.iter().filter(|t| !t.deleted).count()
    }

    /// Allocated slots, excluding the sentinel
    pub fn slot_count(&self) -> usize {
        self.triangles.len() - 1
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of triangles placed into previously freed slots
    pub fn recycled_count(&self) -> usize {
        self.recycled
    }

    /// Number of edges currently referenced by a live triangle
    pub fn edge_count(&self) -> usize {
        self.connectivity.len()
    }
}
