//! # Frustum Culling
//!
//! Planes are extracted from the combined projection-view matrix (Gribb and
//! Hartmann). Each plane is stored as `(a, b, c, d)` with the normal pointing
//! into the visible volume, so a point `p` is inside iff
//! `a*p.x + b*p.y + c*p.z + d >= 0` for all six planes.

use cgmath::{Matrix, Matrix4, Point3, Vector4};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frustum {
    planes: [Vector4<f32>; 6],
}

impl Frustum {
    /// Extracts the six planes of `view_projection` (`projection * view`).
    ///
    /// The near plane is taken as `row3 + row2`, the -1..1 depth convention. For
    /// 0..1 depth projections that plane lies slightly behind the true near plane,
    /// which only keeps a few more boxes.
    pub fn from_matrix(view_projection: Matrix4<f32>) -> Self {
        let r0 = view_projection.row(0);
        let r1 = view_projection.row(1);
        let r2 = view_projection.row(2);
        let r3 = view_projection.row(3);

        let planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r3 + r2, r3 - r2].map(normalize_plane);
        Self { planes }
    }

    /// Builds a frustum directly from six inward-facing planes.
    pub fn from_planes(planes: [Vector4<f32>; 6]) -> Self {
        Self {
            planes: planes.map(normalize_plane),
        }
    }

    pub fn planes(&self) -> &[Vector4<f32>; 6] {
        &self.planes
    }

    /// Whether the axis-aligned box `[min, max]` is at least partly inside.
    ///
    /// For every plane, the box corner furthest along the plane normal is tested;
    /// if even that corner is behind the plane, the whole box is outside. Boxes
    /// straddling a plane are kept.
    pub fn intersects_aabb(&self, min: Point3<f32>, max: Point3<f32>) -> bool {
        self.planes.iter().all(|plane| {
            let p = Point3::new(
                if plane.x >= 0.0 { max.x } else { min.x },
                if plane.y >= 0.0 { max.y } else { min.y },
                if plane.z >= 0.0 { max.z } else { min.z },
            );
            plane.x * p.x + plane.y * p.y + plane.z * p.z + plane.w >= 0.0
        })
    }
}

fn normalize_plane(plane: Vector4<f32>) -> Vector4<f32> {
    let length = (plane.x * plane.x + plane.y * plane.y + plane.z * plane.z).sqrt();
    if length > f32::EPSILON {
        plane / length
    } else {
        plane
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{perspective, Deg, Vector3};

    use super::*;

    fn unit_box_frustum() -> Frustum {
        // -10..10 on every axis.
        Frustum::from_planes([
            Vector4::new(1.0, 0.0, 0.0, 10.0),
            Vector4::new(-1.0, 0.0, 0.0, 10.0),
            Vector4::new(0.0, 1.0, 0.0, 10.0),
            Vector4::new(0.0, -1.0, 0.0, 10.0),
            Vector4::new(0.0, 0.0, 1.0, 10.0),
            Vector4::new(0.0, 0.0, -1.0, 10.0),
        ])
    }

    #[test]
    fn synthetic_planes_inside_outside_straddling() {
        let frustum = unit_box_frustum();
        assert!(frustum.intersects_aabb(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)));
        assert!(!frustum.intersects_aabb(Point3::new(11.0, 0.0, 0.0), Point3::new(12.0, 1.0, 1.0)));
        assert!(!frustum.intersects_aabb(Point3::new(0.0, -30.0, 0.0), Point3::new(1.0, -20.0, 1.0)));
        assert!(frustum.intersects_aabb(Point3::new(9.0, 9.0, 9.0), Point3::new(40.0, 40.0, 40.0)));
    }

    #[test]
    fn perspective_camera_culls_what_is_behind_it() {
        let projection = perspective(Deg(90.0), 1.0, 0.1, 500.0);
        let view = Matrix4::look_at_rh(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
            Vector3::unit_y(),
        );
        let frustum = Frustum::from_matrix(projection * view);

        let ahead = (Point3::new(-16.0, -16.0, -100.0), Point3::new(16.0, 16.0, -68.0));
        let behind = (Point3::new(-16.0, -16.0, 68.0), Point3::new(16.0, 16.0, 100.0));
        let far_left = (Point3::new(-300.0, -16.0, -100.0), Point3::new(-268.0, 16.0, -68.0));
        let beyond_far = (Point3::new(-16.0, -16.0, -700.0), Point3::new(16.0, 16.0, -600.0));
        let around_camera = (Point3::new(-16.0, -16.0, -16.0), Point3::new(16.0, 16.0, 16.0));

        assert!(frustum.intersects_aabb(ahead.0, ahead.1));
        assert!(!frustum.intersects_aabb(behind.0, behind.1));
        assert!(!frustum.intersects_aabb(far_left.0, far_left.1));
        assert!(!frustum.intersects_aabb(beyond_far.0, beyond_far.1));
        assert!(frustum.intersects_aabb(around_camera.0, around_camera.1));
    }
}
