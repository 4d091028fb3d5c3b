//! Numeric primitives shared by the sampler, the vertex pass and the triangulator

use glam::{DVec2, Quat, Vec2, Vec3};

/// Rays closer than this to parallel with a plane are treated as missing it
pub const RAY_PLANE_EPSILON: f32 = 1e-6;

/// Circumscribed circle of a triangle, stored with its squared radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: DVec2,
    pub radius_sq: f64,
}

impl Circle {
    /// Strict containment: a point exactly on the circle is outside
    #[inline]
    pub fn contains(&self, point: DVec2) -> bool {
        point.distance_squared(self.center) < self.radius_sq
    }
}

/// Circumcircle through three points, or `None` when they are collinear
///
/// Computed in `f64` so that lattice inputs produce exact centers and ties stay ties.
pub fn circumcircle(a: DVec2, b: DVec2, c: DVec2) -> Option<Circle> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d == 0.0 || !d.is_finite() {
        return None;
    }

    let a_sq = a.length_squared();
    let b_sq = b.length_squared();
    let c_sq = c.length_squared();
    let center = DVec2::new(
        (a_sq * (b.y - c.y) + b_sq * (c.y - a.y) + c_sq * (a.y - b.y)) / d,
        (a_sq * (c.x - b.x) + b_sq * (a.x - c.x) + c_sq * (b.x - a.x)) / d,
    );
    let radius_sq = center.distance_squared(a);
    if !radius_sq.is_finite() {
        return None;
    }

    Some(Circle { center, radius_sq })
}

/// Twice the signed area of triangle `abc`; positive when counter-clockwise
#[inline]
pub fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

/// Intersect a ray with a plane
///
/// Returns `None` if the ray direction does not face along the plane normal
/// (`dot <= RAY_PLANE_EPSILON`), which also rejects rays running parallel to it.
pub fn plane_raycast(
    plane_position: Vec3,
    plane_normal: Vec3,
    ray_origin: Vec3,
    ray_direction: Vec3,
) -> Option<Vec3> {
    let denominator = ray_direction.dot(plane_normal);
    if denominator <= RAY_PLANE_EPSILON {
        return None;
    }

    let t = (plane_position - ray_origin).dot(plane_normal) / denominator;
    Some(ray_origin + ray_direction * t)
}

/// Map a point on the surface of the unit cube onto the unit sphere
///
/// Distributes points more evenly than plain normalization.
#[inline]
pub fn cube_to_sphere(point: Vec3) -> Vec3 {
    let p2 = point * point;
    Vec3::new(
        point.x * (1.0 - p2.y / 2.0 - p2.z / 2.0 + p2.y * p2.z / 3.0).sqrt(),
        point.y * (1.0 - p2.x / 2.0 - p2.z / 2.0 + p2.x * p2.z / 3.0).sqrt(),
        point.z * (1.0 - p2.x / 2.0 - p2.y / 2.0 + p2.x * p2.y / 3.0).sqrt(),
    )
}

/// Project a cube-face point onto a sphere of the given radius around `center`
#[inline]
pub fn flat_to_sphere(point: Vec3, center: Vec3, radius: f32) -> Vec3 {
    center + cube_to_sphere(point - center) * radius
}

/// Position on the `+Y` cube face for a face UV in [0, 1]
#[inline]
pub fn face_point(uv: Vec2) -> Vec3 {
    Vec3::new(uv.x * 2.0 - 1.0, 1.0, uv.y * 2.0 - 1.0)
}

/// Rotation that carries `+Y` onto the given surface direction
pub fn align_to_surface(direction: Vec3) -> Quat {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(Vec3::Y, dir)
}

/// Unsigned angle between two vectors in degrees, `0` for degenerate input
pub fn angle_between_degrees(a: Vec3, b: Vec3) -> f32 {
    let denominator = (a.length_squared() * b.length_squared()).sqrt();
    if denominator < 1e-15 {
        return 0.0;
    }
    let cos = (a.dot(b) / denominator).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Unit vector perpendicular to `direction`
#[inline]
pub fn perpendicular(direction: Vec3) -> Vec3 {
    direction.normalize_or(Vec3::Y).any_orthonormal_vector()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circumcircle_right_triangle() {
        let circle = circumcircle(
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(0.0, 2.0),
        )
        .unwrap();
        assert_eq!(circle.center, DVec2::new(1.0, 1.0));
        assert_eq!(circle.radius_sq, 2.0);
    }

    #[test]
    fn test_circumcircle_collinear_is_none() {
        let circle = circumcircle(
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(3.0, 3.0),
        );
        assert!(circle.is_none());
    }

    #[test]
    fn test_contains_is_strict() {
        let circle = circumcircle(
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 1.0),
        )
        .unwrap();
        // fourth corner of the unit square is exactly on the circle
        assert!(!circle.contains(DVec2::new(1.0, 1.0)));
        assert!(circle.contains(DVec2::new(0.5, 0.5)));
        assert!(!circle.contains(DVec2::new(2.0, 2.0)));
    }

    #[test]
    fn test_orientation_sign() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(1.0, 0.0);
        let c = DVec2::new(0.0, 1.0);
        assert!(orientation(a, b, c) > 0.0);
        assert!(orientation(a, c, b) < 0.0);
    }

    #[test]
    fn test_plane_raycast_hits_plane() {
        let hit = plane_raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::Y, Vec3::ZERO, Vec3::Y).unwrap();
        assert!((hit - Vec3::new(0.0, 10.0, 0.0)).length() < 1e-6);

        let dir = Vec3::new(1.0, 1.0, 0.0).normalize();
        let hit = plane_raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::Y, Vec3::ZERO, dir).unwrap();
        assert!((hit.y - 10.0).abs() < 1e-4);
        assert!((hit.x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_plane_raycast_facing_away() {
        assert!(plane_raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::Y, Vec3::ZERO, -Vec3::Y).is_none());
        assert!(plane_raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::Y, Vec3::ZERO, Vec3::X).is_none());
    }

    #[test]
    fn test_cube_to_sphere_is_unit_on_face() {
        for &(x, z) in &[(0.0, 0.0), (1.0, 1.0), (-0.3, 0.8), (1.0, -1.0)] {
            let p = cube_to_sphere(Vec3::new(x, 1.0, z));
            assert!((p.length() - 1.0).abs() < 1e-5, "{:?} not on unit sphere", p);
        }
    }

    #[test]
    fn test_flat_to_sphere_scales_radius() {
        let p = flat_to_sphere(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, 50.0);
        assert!((p - Vec3::new(0.0, 50.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_align_to_surface() {
        let dir = Vec3::new(1.0, 2.0, -0.5).normalize();
        let rotated = align_to_surface(dir) * Vec3::Y;
        assert!((rotated - dir).length() < 1e-5);
        assert_eq!(align_to_surface(Vec3::ZERO), Quat::IDENTITY);
    }

    #[test]
    fn test_angle_between_degrees() {
        assert!((angle_between_degrees(Vec3::X, Vec3::Y) - 90.0).abs() < 1e-4);
        assert!(angle_between_degrees(Vec3::Y, Vec3::Y * 3.0).abs() < 1e-2);
        assert_eq!(angle_between_degrees(Vec3::ZERO, Vec3::Y), 0.0);
    }

    #[test]
    fn test_perpendicular() {
        for dir in [Vec3::X, Vec3::Z, Vec3::new(0.3, -0.2, 0.9)] {
            let p = perpendicular(dir);
            assert!(p.dot(dir.normalize()).abs() < 1e-5);
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }
}
