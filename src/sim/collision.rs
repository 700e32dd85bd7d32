//! Separating-axis collision for convex polygons
//!
//! Every moving thing is approximated by a small convex polygon: bullets and
//! the player are triangles, enemies and bonuses are octagons. Two polygons
//! overlap unless some edge normal of either one separates their projections.
//!
//! The test is exact for convex input only. All footprints built here are
//! convex by construction.

use glam::Vec2;

use crate::consts::{BULLET_LENGTH, BULLET_WIDTH, OCTAGON_SIDES};
use crate::polar_to_cartesian;

/// Closed interval of a polygon projected onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub min: f32,
    pub max: f32,
}

impl Projection {
    /// Project a polygon onto an axis (min/max dot product)
    pub fn of(polygon: &[Vec2], axis: Vec2) -> Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &p in polygon {
            let d = p.dot(axis);
            min = min.min(d);
            max = max.max(d);
        }
        Self { min, max }
    }

    /// Touching intervals count as overlapping
    #[inline]
    pub fn overlaps(&self, other: &Projection) -> bool {
        !(self.max < other.min || other.max < self.min)
    }
}

/// Unit edge normals of a polygon, one per edge.
///
/// Degenerate (zero-length) edges yield no axis.
fn edge_normals(polygon: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    let n = polygon.len();
    (0..n).filter_map(move |i| {
        let edge = polygon[(i + 1) % n] - polygon[i];
        let normal = edge.perp().normalize_or_zero();
        (normal != Vec2::ZERO).then_some(normal)
    })
}

fn separated_along_edges_of(reference: &[Vec2], a: &[Vec2], b: &[Vec2]) -> bool {
    edge_normals(reference).any(|axis| !Projection::of(a, axis).overlaps(&Projection::of(b, axis)))
}

/// Check whether two convex polygons overlap.
///
/// Polygons with fewer than three vertices never collide.
pub fn check_collision(a: &[Vec2], b: &[Vec2]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    !separated_along_edges_of(a, a, b) && !separated_along_edges_of(b, a, b)
}

/// Triangle pointing along `direction`: tip `length` ahead, base `length / 2`
/// behind and `width` wide
pub fn arrow_triangle(position: Vec2, direction: Vec2, length: f32, width: f32) -> [Vec2; 3] {
    let dir = direction.normalize_or_zero();
    let perp = dir.perp();
    let tip = position + dir * length;
    let back = position - dir * (length / 2.0);
    [tip, back + perp * (width / 2.0), back - perp * (width / 2.0)]
}

/// Bullet footprint
#[inline]
pub fn bullet_triangle(position: Vec2, direction: Vec2) -> [Vec2; 3] {
    arrow_triangle(position, direction, BULLET_LENGTH, BULLET_WIDTH)
}

/// Regular octagon around a center
pub fn octagon(center: Vec2, radius: f32) -> [Vec2; OCTAGON_SIDES] {
    let step = std::f32::consts::TAU / OCTAGON_SIDES as f32;
    std::array::from_fn(|i| center + polar_to_cartesian(radius, step * i as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_at(x: f32, y: f32) -> [Vec2; 3] {
        [
            Vec2::new(x, y),
            Vec2::new(x + 10.0, y),
            Vec2::new(x + 5.0, y + 10.0),
        ]
    }

    #[test]
    fn test_overlapping_triangles_collide() {
        assert!(check_collision(&triangle_at(0.0, 0.0), &triangle_at(4.0, 2.0)));
    }

    #[test]
    fn test_translated_triangles_do_not_collide() {
        assert!(!check_collision(&triangle_at(0.0, 0.0), &triangle_at(500.0, 0.0)));
    }

    #[test]
    fn test_touching_edges_count_as_collision() {
        let a = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let b = [
            Vec2::new(10.0, 0.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(20.0, 10.0),
            Vec2::new(10.0, 10.0),
        ];
        assert!(check_collision(&a, &b));
    }

    #[test]
    fn test_bounding_boxes_overlap_but_separated_diagonally() {
        // Two right triangles whose boxes overlap but hypotenuses face each other
        let a = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
        let b = [Vec2::new(10.0, 10.0), Vec2::new(10.0, 4.0), Vec2::new(4.0, 10.0)];
        assert!(!check_collision(&a, &b));
    }

    #[test]
    fn test_containment_collides() {
        let big = octagon(Vec2::ZERO, 100.0);
        let small = bullet_triangle(Vec2::new(5.0, 5.0), Vec2::X);
        assert!(check_collision(&big, &small));
        assert!(check_collision(&small, &big));
    }

    #[test]
    fn test_degenerate_edges_do_not_panic() {
        // Repeated vertex: one zero-length edge
        let a = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(check_collision(&a, &triangle_at(1.0, 1.0)));
        assert!(!check_collision(&a, &triangle_at(100.0, 100.0)));

        // Fully collapsed polygon still behaves like a point
        let point = [Vec2::new(2.0, 2.0); 3];
        assert!(check_collision(&point, &triangle_at(0.0, 0.0)));
    }

    #[test]
    fn test_too_few_vertices_never_collide() {
        let segment = [Vec2::ZERO, Vec2::new(10.0, 10.0)];
        assert!(!check_collision(&segment, &triangle_at(0.0, 0.0)));
    }

    #[test]
    fn test_octagon_is_regular() {
        let oct = octagon(Vec2::new(50.0, 50.0), 30.0);
        for p in oct {
            assert!(((p - Vec2::new(50.0, 50.0)).length() - 30.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_bullet_triangle_points_forward() {
        let tri = bullet_triangle(Vec2::ZERO, Vec2::new(0.0, 2.0));
        assert!((tri[0] - Vec2::new(0.0, BULLET_LENGTH)).length() < 1e-4);
        assert!((tri[1].y + BULLET_LENGTH / 2.0).abs() < 1e-4);
    }
}
