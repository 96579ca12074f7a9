//! View-frustum clipping
//!
//! Planes live in camera space as a point plus an inward unit normal.
//! Triangles are clipped plane by plane (Sutherland-Hodgman) into a
//! bounded convex polygon, then fan-triangulated back into triangles.

use super::math::{Vec2, Vec3};

/// A triangle clipped against all 6 planes can gain at most one vertex
/// per plane, so 9 is the hard cap. Exceeding it means a caller or
/// algorithm bug, not a runtime input condition.
pub const MAX_POLY_VERTICES: usize = 9;

/// A polygon vertex: position in camera space plus its texture coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolyVertex {
    pub pos: Vec3,
    pub uv: Vec2,
}

impl PolyVertex {
    pub fn new(pos: Vec3, uv: Vec2) -> Self {
        Self { pos, uv }
    }

    /// Interpolate position and UV together at t along the edge to other
    fn lerp(self, other: PolyVertex, t: f32) -> PolyVertex {
        PolyVertex {
            pos: self.pos.lerp(other.pos, t),
            uv: self.uv.lerp(other.uv, t),
        }
    }
}

/// Clipper intermediate: an ordered, bounded vertex list. Lives only
/// within one face's trip through the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Polygon {
    verts: [PolyVertex; MAX_POLY_VERTICES],
    len: usize,
}

impl Polygon {
    pub fn from_triangle(a: PolyVertex, b: PolyVertex, c: PolyVertex) -> Self {
        let mut verts = [PolyVertex::default(); MAX_POLY_VERTICES];
        verts[0] = a;
        verts[1] = b;
        verts[2] = c;
        Self { verts, len: 3 }
    }

    fn empty() -> Self {
        Self { verts: [PolyVertex::default(); MAX_POLY_VERTICES], len: 0 }
    }

    fn push(&mut self, v: PolyVertex) {
        debug_assert!(self.len < MAX_POLY_VERTICES, "clip output exceeded vertex cap");
        if self.len < MAX_POLY_VERTICES {
            self.verts[self.len] = v;
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn vertices(&self) -> &[PolyVertex] {
        &self.verts[..self.len]
    }

    /// Fewer than 3 vertices cannot form a triangle; the face is simply
    /// invisible this frame.
    pub fn is_degenerate(&self) -> bool {
        self.len < 3
    }

    /// Fan-triangulate from vertex 0: (0,1,2), (0,2,3), ...
    /// Yields exactly len - 2 triangles. Correct because clipping a
    /// convex polygon against half-spaces keeps it convex.
    pub fn triangles(&self) -> impl Iterator<Item = [PolyVertex; 3]> + '_ {
        (1..self.len.saturating_sub(1))
            .map(move |i| [self.verts[0], self.verts[i], self.verts[i + 1]])
    }
}

/// One frustum plane: a point on the plane and its inward unit normal
#[derive(Debug, Clone, Copy)]
pub struct FrustumPlane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl FrustumPlane {
    /// Signed distance of p to the plane; >= 0 means inside the frustum
    fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p - self.point)
    }
}

/// The 6 view-frustum planes, derived once from the field-of-view angles
/// and the near/far distances.
pub struct Frustum {
    planes: [FrustumPlane; 6],
}

impl Frustum {
    /// Build the planes from the horizontal/vertical FOV (radians) and
    /// near/far distances. The near plane is stored first so clipping
    /// runs it first, keeping the downstream w-divide well-conditioned.
    pub fn new(fov_x: f32, fov_y: f32, znear: f32, zfar: f32) -> Self {
        let (sin_half_x, cos_half_x) = (fov_x / 2.0).sin_cos();
        let (sin_half_y, cos_half_y) = (fov_y / 2.0).sin_cos();

        let planes = [
            // Near
            FrustumPlane {
                point: Vec3::new(0.0, 0.0, znear),
                normal: Vec3::new(0.0, 0.0, 1.0),
            },
            // Far
            FrustumPlane {
                point: Vec3::new(0.0, 0.0, zfar),
                normal: Vec3::new(0.0, 0.0, -1.0),
            },
            // Left
            FrustumPlane {
                point: Vec3::ZERO,
                normal: Vec3::new(cos_half_x, 0.0, sin_half_x),
            },
            // Right
            FrustumPlane {
                point: Vec3::ZERO,
                normal: Vec3::new(-cos_half_x, 0.0, sin_half_x),
            },
            // Top
            FrustumPlane {
                point: Vec3::ZERO,
                normal: Vec3::new(0.0, -cos_half_y, sin_half_y),
            },
            // Bottom
            FrustumPlane {
                point: Vec3::ZERO,
                normal: Vec3::new(0.0, cos_half_y, sin_half_y),
            },
        ];

        Self { planes }
    }

    /// Clip a polygon against all 6 planes in turn. The result may be
    /// degenerate (fewer than 3 vertices) if the polygon left the frustum.
    pub fn clip_polygon(&self, polygon: Polygon) -> Polygon {
        let mut result = polygon;
        for plane in &self.planes {
            if result.is_degenerate() {
                break;
            }
            result = clip_against_plane(&result, plane);
        }
        result
    }
}

/// Sutherland-Hodgman: walk the polygon's edges, keep inside endpoints,
/// and emit the interpolated intersection wherever an edge crosses the
/// plane.
fn clip_against_plane(polygon: &Polygon, plane: &FrustumPlane) -> Polygon {
    let mut output = Polygon::empty();
    let verts = polygon.vertices();

    for i in 0..verts.len() {
        let current = verts[i];
        let next = verts[(i + 1) % verts.len()];

        let d_current = plane.signed_distance(current.pos);
        let d_next = plane.signed_distance(next.pos);

        if d_current >= 0.0 {
            output.push(current);
        }

        // Edge crosses the plane: emit the intersection point
        if (d_current >= 0.0) != (d_next >= 0.0) {
            let t = d_current / (d_current - d_next);
            output.push(current.lerp(next, t));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-4;

    fn test_frustum() -> Frustum {
        // 90 degree symmetric frustum, near 1, far 100
        Frustum::new(FRAC_PI_2, FRAC_PI_2, 1.0, 100.0)
    }

    fn tri(a: Vec3, b: Vec3, c: Vec3) -> Polygon {
        Polygon::from_triangle(
            PolyVertex::new(a, Vec2::new(0.0, 0.0)),
            PolyVertex::new(b, Vec2::new(1.0, 0.0)),
            PolyVertex::new(c, Vec2::new(0.0, 1.0)),
        )
    }

    #[test]
    fn test_fully_inside_triangle_is_unchanged() {
        let frustum = test_frustum();
        let input = tri(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(1.0, 0.0, 5.0),
            Vec3::new(0.0, 1.0, 5.0),
        );
        let clipped = frustum.clip_polygon(input);

        assert_eq!(clipped.len(), 3);
        for (a, b) in clipped.vertices().iter().zip(input.vertices()) {
            assert!((a.pos - b.pos).len() < EPS);
            assert!((a.uv.x - b.uv.x).abs() < EPS);
            assert!((a.uv.y - b.uv.y).abs() < EPS);
        }
    }

    #[test]
    fn test_fully_behind_near_plane_is_clipped_away() {
        let frustum = test_frustum();
        let clipped = frustum.clip_polygon(tri(
            Vec3::new(0.0, 0.0, 0.5),
            Vec3::new(1.0, 0.0, 0.5),
            Vec3::new(0.0, 1.0, -2.0),
        ));
        assert_eq!(clipped.len(), 0);
        assert!(clipped.is_degenerate());
    }

    #[test]
    fn test_single_plane_clip_of_outside_triangle_is_empty() {
        let plane = FrustumPlane {
            point: Vec3::new(0.0, 0.0, 1.0),
            normal: Vec3::new(0.0, 0.0, 1.0),
        };
        let poly = tri(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.5),
            Vec3::new(0.0, 1.0, -3.0),
        );
        assert_eq!(clip_against_plane(&poly, &plane).len(), 0);
    }

    #[test]
    fn test_fully_outside_one_side_plane_is_clipped_away() {
        let frustum = test_frustum();
        // At z = 10 the 90 degree frustum spans x in [-10, 10]
        let clipped = frustum.clip_polygon(tri(
            Vec3::new(50.0, 0.0, 10.0),
            Vec3::new(60.0, 0.0, 10.0),
            Vec3::new(55.0, 5.0, 10.0),
        ));
        assert!(clipped.is_degenerate());
    }

    #[test]
    fn test_near_plane_crossing_interpolates_position_and_uv() {
        let plane = FrustumPlane {
            point: Vec3::new(0.0, 0.0, 1.0),
            normal: Vec3::new(0.0, 0.0, 1.0),
        };
        // Edge from z = 0 to z = 2 crosses the plane halfway
        let poly = tri(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(2.0, 0.0, 2.0),
        );
        let clipped = clip_against_plane(&poly, &plane);

        let crossing = clipped
            .vertices()
            .iter()
            .find(|v| (v.pos.z - 1.0).abs() < EPS && v.pos.x.abs() < EPS)
            .expect("expected an interpolated vertex on the plane");
        // UV interpolated at t = 0.5 between (0,0) and (1,0)
        assert!((crossing.uv.x - 0.5).abs() < EPS);
        assert!(crossing.uv.y.abs() < EPS);
    }

    #[test]
    fn test_clip_output_never_exceeds_cap() {
        let frustum = test_frustum();
        // A huge triangle that pokes out of every side plane
        let clipped = frustum.clip_polygon(tri(
            Vec3::new(0.0, 500.0, 2.0),
            Vec3::new(-500.0, -500.0, 2.0),
            Vec3::new(500.0, -500.0, 2.0),
        ));
        assert!(clipped.len() <= MAX_POLY_VERTICES);
        assert!(clipped.len() >= 3);
    }

    #[test]
    fn test_fan_triangulation_yields_n_minus_2() {
        let frustum = test_frustum();
        // Clipping a corner off a triangle grows the vertex count
        let clipped = frustum.clip_polygon(tri(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(20.0, 0.0, 5.0),
            Vec3::new(0.0, 3.0, 5.0),
        ));
        let n = clipped.len();
        assert!(n > 3, "expected the side plane to add vertices, got {}", n);
        assert_eq!(clipped.triangles().count(), n - 2);
    }

    #[test]
    fn test_fan_triangles_share_vertex_zero() {
        let poly = tri(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(1.0, 0.0, 5.0),
            Vec3::new(0.0, 1.0, 5.0),
        );
        let tris: Vec<_> = poly.triangles().collect();
        assert_eq!(tris.len(), 1);
        assert_eq!(tris[0][0].pos, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_degenerate_polygon_yields_no_triangles() {
        let frustum = test_frustum();
        let clipped = frustum.clip_polygon(tri(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(1.0, 0.0, -5.0),
            Vec3::new(0.0, 1.0, -5.0),
        ));
        assert_eq!(clipped.triangles().count(), 0);
    }
}
