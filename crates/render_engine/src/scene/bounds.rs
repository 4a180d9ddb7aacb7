//! Bounding volumes and view-frustum culling tests
//!
//! Provides the pure-math primitives the renderer uses for visibility
//! culling: oriented bounding boxes, bounding spheres, planes, and a view
//! frustum extracted from a combined view-projection matrix.
//!
//! The culling tests are conservative ("certainly outside" semantics):
//! `true` guarantees the volume has no intersection with the frustum, while
//! `false` only means "possibly visible". See the per-test docs for the
//! accepted false-negative case.

use crate::foundation::math::{Mat4, Vec3, Vec4};

/// Plane defined by a point on the plane and a normal direction
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// A point known to lie on the plane
    pub position: Vec3,
    /// Plane normal (normalized on use, need not be stored normalized)
    pub normal: Vec3,
}

impl Plane {
    /// Signed distance from the plane to a point, positive along the normal
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        (point - self.position).dot(&self.normal.normalize())
    }
}

/// Oriented bounding box described by its full extents and a world transform
///
/// Corners are generated at `±size/2` in model space and mapped through
/// `world_transform`, so `size` holds full (not half) extents. Both fields
/// are queried fresh from a renderable at submission time; nothing here is
/// cached across frames.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    /// Full extent of the box along each local axis
    pub size: Vec3,
    /// Model-to-world transform of the box center
    pub world_transform: Mat4,
}

/// Fixed corner ordering used by [`BoundingBox::corners`]: the local
/// z = -size.z/2 face counter-clockwise starting at (-x, -y), then the
/// z = +size.z/2 face in the same winding.
const BOX_CORNER_SIGNS: [(f32, f32, f32); 8] = [
    (-0.5, -0.5, -0.5),
    (0.5, -0.5, -0.5),
    (0.5, 0.5, -0.5),
    (-0.5, 0.5, -0.5),
    (-0.5, -0.5, 0.5),
    (0.5, -0.5, 0.5),
    (0.5, 0.5, 0.5),
    (-0.5, 0.5, 0.5),
];

impl BoundingBox {
    /// Create a bounding box from full extents and a world transform
    pub fn new(size: Vec3, world_transform: Mat4) -> Self {
        Self { size, world_transform }
    }

    /// Compute the 8 world-space corners of the box
    ///
    /// Uses the fixed ordering documented on [`BOX_CORNER_SIGNS`]. Consumers
    /// may rely on the count and on the ordering being stable, but not on any
    /// particular corner landing at a particular world position.
    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::zeros(); 8];
        for (corner, (sx, sy, sz)) in corners.iter_mut().zip(BOX_CORNER_SIGNS.iter()) {
            let local = Vec4::new(sx * self.size.x, sy * self.size.y, sz * self.size.z, 1.0);
            let world = self.world_transform * local;
            *corner = world.xyz();
        }
        corners
    }
}

/// Bounding sphere in world space
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// Sphere radius
    pub radius: f32,
    /// Sphere center in world space
    pub world_position: Vec3,
}

impl BoundingSphere {
    /// Create a bounding sphere from radius and world-space center
    pub fn new(radius: f32, world_position: Vec3) -> Self {
        Self { radius, world_position }
    }
}

/// View frustum: 8 world-space corner points and 6 bounding planes
///
/// Derived once per submission from `projection * view` and immutable after
/// construction. Plane normals point *out* of the frustum volume, so a
/// positive signed distance means "outside that plane".
#[derive(Debug, Clone)]
pub struct Frustum {
    /// Corners in the same ordering as the NDC cube they were unprojected
    /// from: near face (-1,-1), (1,-1), (1,1), (-1,1), then the far face
    pub corners: [Vec3; 8],
    /// Planes in the order: near, far, left, right, top, bottom
    pub planes: [Plane; 6],
    degenerate: bool,
}

/// NDC-cube corners unprojected to build the frustum, near face first
const NDC_CUBE_CORNERS: [(f32, f32, f32); 8] = [
    (-1.0, -1.0, -1.0),
    (1.0, -1.0, -1.0),
    (1.0, 1.0, -1.0),
    (-1.0, 1.0, -1.0),
    (-1.0, -1.0, 1.0),
    (1.0, -1.0, 1.0),
    (1.0, 1.0, 1.0),
    (-1.0, 1.0, 1.0),
];

impl Frustum {
    /// Build a frustum from a combined `projection * view` matrix
    ///
    /// Corners are found by unprojecting the NDC cube through the inverse
    /// matrix with a perspective divide; planes are then spanned by corner
    /// differences. A non-invertible matrix indicates a degenerate camera;
    /// the returned frustum is marked degenerate and both culling tests
    /// report nothing as certainly outside, so the render loop keeps
    /// running with culling effectively off for the frame.
    pub fn from_view_proj(view_proj: &Mat4) -> Self {
        let Some(inv_view_proj) = view_proj.try_inverse() else {
            log::warn!("View-projection matrix is not invertible; frustum culling disabled this frame");
            return Self::cull_nothing();
        };

        let mut corners = [Vec3::zeros(); 8];
        for (corner, (x, y, z)) in corners.iter_mut().zip(NDC_CUBE_CORNERS.iter()) {
            let unprojected = inv_view_proj * Vec4::new(*x, *y, *z, 1.0);
            *corner = unprojected.xyz() / unprojected.w;
        }

        let plane_from = |anchor: usize, a: usize, b: usize| Plane {
            position: corners[anchor],
            normal: (corners[a] - corners[anchor])
                .cross(&(corners[b] - corners[anchor]))
                .normalize(),
        };

        let planes = [
            plane_from(0, 1, 3), // near
            plane_from(5, 4, 6), // far
            plane_from(4, 0, 7), // left
            plane_from(1, 5, 2), // right
            plane_from(2, 6, 3), // top
            plane_from(4, 5, 0), // bottom
        ];

        Self {
            corners,
            planes,
            degenerate: false,
        }
    }

    /// Placeholder frustum whose culling tests never discard anything
    fn cull_nothing() -> Self {
        Self {
            corners: [Vec3::zeros(); 8],
            planes: [Plane {
                position: Vec3::zeros(),
                normal: Vec3::new(1.0, 0.0, 0.0),
            }; 6],
            degenerate: true,
        }
    }

    /// Whether this frustum came from a non-invertible matrix
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Conservative test: is the box certainly outside this frustum?
    ///
    /// Returns `true` only when all 8 box corners lie on the outer side of a
    /// single frustum plane, which guarantees zero intersection. The test can
    /// return `false` for boxes that are actually outside when they straddle
    /// two planes near a frustum edge or corner; that false negative is
    /// accepted (it only costs over-draw) and callers must not rely on
    /// `false` meaning "visible". A full inside/outside/intersecting
    /// classification would cost noticeably more per volume, so this discard
    /// check is kept as-is.
    pub fn certainly_outside_box(&self, bbox: &BoundingBox) -> bool {
        if self.degenerate {
            return false;
        }
        let corners = bbox.corners();
        for plane in &self.planes {
            let min_distance = corners
                .iter()
                .map(|corner| plane.signed_distance(*corner))
                .fold(f32::INFINITY, f32::min);
            if min_distance > 0.0 {
                return true;
            }
        }
        false
    }

    /// Conservative test: is the sphere certainly outside this frustum?
    ///
    /// `true` when the center lies farther than `radius` outside any single
    /// plane. Shares the accepted false-negative behavior of
    /// [`Self::certainly_outside_box`] for spheres near frustum edges.
    pub fn certainly_outside_sphere(&self, bsphere: &BoundingSphere) -> bool {
        if self.degenerate {
            return false;
        }
        self.planes
            .iter()
            .any(|plane| plane.signed_distance(bsphere.world_position) > bsphere.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, utils};
    use approx::assert_relative_eq;

    /// Camera at (0, 0, 10) looking at the origin, 45 degree vertical FOV,
    /// square aspect, near 0.1, far 100 - the reference frustum used below.
    fn reference_view_proj() -> Mat4 {
        let proj = Mat4::perspective(utils::deg_to_rad(45.0), 1.0, 0.1, 100.0);
        let view = Mat4::look_at(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::zeros(),
            Vec3::new(0.0, 1.0, 0.0),
        );
        proj * view
    }

    fn box_at(center: Vec3, size: Vec3) -> BoundingBox {
        BoundingBox::new(size, Mat4::new_translation(&center))
    }

    #[test]
    fn test_frustum_corners_round_trip_to_ndc_cube() {
        let view_proj = reference_view_proj();
        let frustum = Frustum::from_view_proj(&view_proj);

        for (corner, (x, y, z)) in frustum.corners.iter().zip(NDC_CUBE_CORNERS.iter()) {
            let projected = view_proj * Vec4::new(corner.x, corner.y, corner.z, 1.0);
            let ndc = projected.xyz() / projected.w;
            assert_relative_eq!(ndc, Vec3::new(*x, *y, *z), epsilon = 1e-3);
        }
    }

    #[test]
    fn test_box_corner_count_and_extent() {
        let bbox = box_at(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
        let corners = bbox.corners();

        assert_eq!(corners.len(), 8);
        for corner in &corners {
            assert_relative_eq!((corner.x - 1.0).abs(), 1.0, epsilon = 1e-6);
            assert_relative_eq!((corner.y - 2.0).abs(), 2.0, epsilon = 1e-6);
            assert_relative_eq!((corner.z - 3.0).abs(), 3.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_box_inside_frustum_is_not_culled() {
        let frustum = Frustum::from_view_proj(&reference_view_proj());
        let bbox = box_at(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));

        assert!(!frustum.certainly_outside_box(&bbox));
    }

    #[test]
    fn test_box_behind_near_plane_is_culled() {
        let frustum = Frustum::from_view_proj(&reference_view_proj());
        // Camera sits at z = 10 looking down -z; this box is well behind it.
        let bbox = box_at(Vec3::new(0.0, 0.0, 50.0), Vec3::new(2.0, 2.0, 2.0));

        assert!(frustum.certainly_outside_box(&bbox));
    }

    #[test]
    fn test_box_beyond_far_plane_is_culled() {
        let frustum = Frustum::from_view_proj(&reference_view_proj());
        let bbox = box_at(Vec3::new(0.0, 0.0, -200.0), Vec3::new(2.0, 2.0, 2.0));

        assert!(frustum.certainly_outside_box(&bbox));
    }

    #[test]
    fn test_box_far_to_the_side_is_culled() {
        let frustum = Frustum::from_view_proj(&reference_view_proj());
        let bbox = box_at(Vec3::new(1000.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));

        assert!(frustum.certainly_outside_box(&bbox));
    }

    #[test]
    fn test_box_straddling_frustum_corner_is_tolerated_as_not_outside() {
        // Known, accepted false negative: a box that sits in the notch past a
        // frustum edge straddles the right and top planes simultaneously, so
        // no single plane has all 8 corners on its outer side even though the
        // box is disjoint from the frustum.
        //
        // Camera at the origin looking down -z with a 90 degree FOV: the
        // frustum cross-section at z = -10 is |x| <= 10, |y| <= 10. A thin
        // box rotated 45 degrees about z and centered at (12.5, 12.5, -10)
        // with half-diagonal 3 stays outside (its closest points keep
        // x + y >= 22 > 20.2) yet leaves one corner inside each of the right
        // and top planes.
        let proj = Mat4::perspective(utils::deg_to_rad(90.0), 1.0, 1.0, 100.0);
        let view = Mat4::look_at(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0));
        let frustum = Frustum::from_view_proj(&(proj * view));

        let half_diagonal = 3.0_f32;
        let side = half_diagonal * std::f32::consts::SQRT_2;
        let transform = Mat4::new_translation(&Vec3::new(12.5, 12.5, -10.0))
            * Mat4::from_axis_angle(&Vec3::z_axis(), utils::deg_to_rad(45.0));
        let bbox = BoundingBox::new(Vec3::new(side, side, 0.2), transform);

        assert!(!frustum.certainly_outside_box(&bbox));
    }

    #[test]
    fn test_sphere_inside_and_outside() {
        let frustum = Frustum::from_view_proj(&reference_view_proj());

        let inside = BoundingSphere::new(1.0, Vec3::zeros());
        let outside = BoundingSphere::new(1.0, Vec3::new(1000.0, 0.0, 0.0));
        let behind = BoundingSphere::new(1.0, Vec3::new(0.0, 0.0, 50.0));

        assert!(!frustum.certainly_outside_sphere(&inside));
        assert!(frustum.certainly_outside_sphere(&outside));
        assert!(frustum.certainly_outside_sphere(&behind));
    }

    #[test]
    fn test_non_invertible_matrix_disables_culling() {
        let frustum = Frustum::from_view_proj(&Mat4::zeros());
        assert!(frustum.is_degenerate());

        // Even geometry far from the origin must survive: the fallback
        // frustum culls nothing rather than pretending to be a real volume.
        let distant_box = box_at(Vec3::new(1000.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let distant_sphere = BoundingSphere::new(1.0, Vec3::new(0.0, 0.0, -5000.0));

        assert!(!frustum.certainly_outside_box(&distant_box));
        assert!(!frustum.certainly_outside_sphere(&distant_sphere));
    }

    #[test]
    fn test_sphere_touching_plane_is_not_culled() {
        let frustum = Frustum::from_view_proj(&reference_view_proj());
        // Straddles the near plane region close to the camera.
        let straddling = BoundingSphere::new(5.0, Vec3::new(0.0, 0.0, 9.9));

        assert!(!frustum.certainly_outside_sphere(&straddling));
    }
}
