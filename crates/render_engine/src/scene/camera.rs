//! Camera types and view/projection matrix generation

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Projection model used by a camera
#[derive(Debug, Clone, Copy)]
pub enum CameraProjection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in radians
        fov_y: f32,
    },
    /// Orthographic projection
    Orthographic {
        /// Half-width of the view volume
        half_width: f32,
    },
}

/// A named camera with a pose and a projection
///
/// The view and projection matrices are derived on demand; the camera holds
/// only plain pose and lens data, so cloning one is cheap.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Unique name used for scene lookups
    pub name: String,
    /// Eye position in world space
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Up direction hint
    pub up: Vec3,
    /// Projection model
    pub projection: CameraProjection,
    /// Viewport aspect ratio (width / height)
    pub aspect: f32,
    /// Near clipping distance
    pub z_near: f32,
    /// Far clipping distance
    pub z_far: f32,
}

impl Camera {
    /// Create a perspective camera with common defaults (45 degree FOV,
    /// near 0.1, far 100)
    pub fn perspective(name: impl Into<String>, position: Vec3, target: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            target,
            up: Vec3::new(0.0, 1.0, 0.0),
            projection: CameraProjection::Perspective {
                fov_y: std::f32::consts::FRAC_PI_4,
            },
            aspect: 1.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }

    /// Create an orthographic camera
    pub fn orthographic(
        name: impl Into<String>,
        position: Vec3,
        target: Vec3,
        half_width: f32,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            target,
            up: Vec3::new(0.0, 1.0, 0.0),
            projection: CameraProjection::Orthographic { half_width },
            aspect: 1.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }

    /// Forward direction from position toward target
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Compute the view matrix
    pub fn mat_view(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Compute the projection matrix
    pub fn mat_proj(&self) -> Mat4 {
        match self.projection {
            CameraProjection::Perspective { fov_y } => {
                Mat4::perspective(fov_y, self.aspect, self.z_near, self.z_far)
            }
            CameraProjection::Orthographic { half_width } => {
                let half_height = half_width / self.aspect;
                Mat4::orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.z_near,
                    self.z_far,
                )
            }
        }
    }

    /// Combined `projection * view` matrix
    pub fn mat_view_proj(&self) -> Mat4 {
        self.mat_proj() * self.mat_view()
    }
}
