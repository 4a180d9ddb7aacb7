//! Shadow map resource and light matrix fitting
//!
//! The shadow map owns a depth framebuffer and the light-space
//! view-projection matrix used by the shadow pass. Directional lights get an
//! orthographic projection whose volume either comes from user-fixed clip
//! extents or is auto-fitted around the camera frustum; point and spot
//! lights get a perspective projection from the light's position.
//!
//! `bind`/`unbind` bracket the shadow pass: binding saves the context
//! viewport, switches to the map's resolution and clears the target;
//! unbinding restores both.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec4};
use crate::render::context::{ClearMask, FramebufferId, GraphicsContext, Viewport};
use crate::scene::bounds::Frustum;
use crate::scene::light::{Light, LightType};

/// How the directional-light shadow volume is determined
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ShadowRange {
    /// Fixed clip-space extents around a user-chosen focus point
    FixedUser {
        /// Center of the shadow volume
        focus_point: Vec3,
        /// Volume width along the light's right axis
        clip_width: f32,
        /// Volume height along the light's up axis
        clip_height: f32,
        /// Volume depth along the light direction
        clip_depth: f32,
    },
    /// Volume fitted each frame around the camera frustum, padded by the
    /// extra margins on every side
    AutoFitCamera {
        /// Padding along the light's right axis
        extra_width: f32,
        /// Padding along the light's up axis
        extra_height: f32,
        /// Padding along the light direction
        extra_depth: f32,
    },
}

impl Default for ShadowRange {
    fn default() -> Self {
        Self::FixedUser {
            focus_point: Vec3::zeros(),
            clip_width: 20.0,
            clip_height: 20.0,
            clip_depth: 20.0,
        }
    }
}

/// Shadow map construction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadowMapConfig {
    /// Map width in pixels
    #[serde(default = "default_map_size")]
    pub width: u32,
    /// Map height in pixels
    #[serde(default = "default_map_size")]
    pub height: u32,
    /// Shadow volume fitting strategy
    #[serde(default)]
    pub range: ShadowRange,
    /// World up hint for building the light's view basis
    #[serde(default = "default_world_up")]
    pub world_up: Vec3,
}

fn default_map_size() -> u32 {
    2048
}

fn default_world_up() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

impl Default for ShadowMapConfig {
    fn default() -> Self {
        Self {
            width: default_map_size(),
            height: default_map_size(),
            range: ShadowRange::default(),
            world_up: default_world_up(),
        }
    }
}

/// Depth framebuffer plus the light matrices rendered into it
pub struct ShadowMap {
    config: ShadowMapConfig,
    framebuffer: FramebufferId,
    light_view_proj: Mat4,
    saved_viewport: Option<Viewport>,
}

impl ShadowMap {
    /// Create a shadow map over an existing depth framebuffer
    pub fn new(config: ShadowMapConfig, framebuffer: FramebufferId) -> Self {
        Self {
            config,
            framebuffer,
            light_view_proj: Mat4::identity(),
            saved_viewport: None,
        }
    }

    /// Light-space view-projection matrix from the last update
    pub fn light_view_proj(&self) -> Mat4 {
        self.light_view_proj
    }

    /// Replace the volume fitting strategy, e.g. from per-frame options
    pub fn set_range(&mut self, range: ShadowRange) {
        self.config.range = range;
    }

    /// Recompute the light matrices for this frame
    ///
    /// `camera_frustum` is the frustum of the camera the frame renders from;
    /// the auto-fit range encloses its corners, and point lights without a
    /// direction aim at its centroid.
    pub fn update_light_matrices(&mut self, light: &Light, camera_frustum: &Frustum) {
        self.light_view_proj = match light.light_type {
            LightType::Directional => self.directional_matrices(light, camera_frustum),
            LightType::Point | LightType::Spot => self.projective_matrices(light, camera_frustum),
        };
    }

    /// Begin the shadow pass: save the viewport, switch to the map's
    /// resolution, bind and clear the depth target
    pub fn bind(&mut self, ctx: &mut dyn GraphicsContext) {
        self.saved_viewport = Some(ctx.viewport());
        ctx.set_viewport(Viewport::with_size(self.config.width, self.config.height));
        ctx.bind_framebuffer(self.framebuffer);
        ctx.clear(Vec4::new(1.0, 1.0, 1.0, 1.0), ClearMask::DEPTH);
    }

    /// End the shadow pass: restore the default target and the saved
    /// viewport
    pub fn unbind(&mut self, ctx: &mut dyn GraphicsContext) {
        ctx.unbind_framebuffer();
        if let Some(viewport) = self.saved_viewport.take() {
            ctx.set_viewport(viewport);
        }
    }

    /// Up hint that is not parallel to the light direction
    fn up_hint(&self, direction: Vec3) -> Vec3 {
        if direction.dot(&self.config.world_up).abs() > 0.99 {
            Vec3::new(0.0, 0.0, 1.0)
        } else {
            self.config.world_up
        }
    }

    fn directional_matrices(&self, light: &Light, camera_frustum: &Frustum) -> Mat4 {
        let direction = light.direction.normalize();
        let up_hint = self.up_hint(direction);

        match self.config.range {
            ShadowRange::FixedUser {
                focus_point,
                clip_width,
                clip_height,
                clip_depth,
            } => {
                let eye = focus_point - direction * (clip_depth * 0.5);
                let view = Mat4::look_at(eye, focus_point, up_hint);
                let proj = Mat4::orthographic(
                    -clip_width * 0.5,
                    clip_width * 0.5,
                    -clip_height * 0.5,
                    clip_height * 0.5,
                    0.0,
                    clip_depth,
                );
                proj * view
            }
            ShadowRange::AutoFitCamera {
                extra_width,
                extra_height,
                extra_depth,
            } => {
                let right = direction.cross(&up_hint).normalize();
                let up = right.cross(&direction);

                // Corner extents along each light axis.
                let mut min = Vec3::from_element(f32::INFINITY);
                let mut max = Vec3::from_element(f32::NEG_INFINITY);
                for corner in &camera_frustum.corners {
                    let projected =
                        Vec3::new(corner.dot(&right), corner.dot(&up), corner.dot(&direction));
                    min = min.inf(&projected);
                    max = max.sup(&projected);
                }

                let center_right = 0.5 * (min.x + max.x);
                let center_up = 0.5 * (min.y + max.y);
                let eye = right * center_right + up * center_up + direction * (min.z - extra_depth);

                let view = Mat4::look_at(eye, eye + direction, up);
                let proj = Mat4::orthographic(
                    -(0.5 * (max.x - min.x) + extra_width),
                    0.5 * (max.x - min.x) + extra_width,
                    -(0.5 * (max.y - min.y) + extra_height),
                    0.5 * (max.y - min.y) + extra_height,
                    0.0,
                    (max.z - min.z) + 2.0 * extra_depth,
                );
                proj * view
            }
        }
    }

    fn projective_matrices(&self, light: &Light, camera_frustum: &Frustum) -> Mat4 {
        let target = if light.light_type == LightType::Spot {
            light.position + light.direction
        } else {
            // Point lights have no direction; aim at the camera frustum.
            let centroid = camera_frustum.corners.iter().sum::<Vec3>() / 8.0;
            if (centroid - light.position).magnitude() < 1e-4 {
                light.position + Vec3::new(0.0, -1.0, 0.0)
            } else {
                centroid
            }
        };
        let aim = (target - light.position).normalize();

        let fov_y = if light.light_type == LightType::Spot && light.cone_angle > 0.0 {
            (2.0 * light.cone_angle).min(std::f32::consts::PI - 0.01)
        } else {
            std::f32::consts::FRAC_PI_2
        };

        let far = match self.config.range {
            ShadowRange::FixedUser { clip_depth, .. } => clip_depth,
            ShadowRange::AutoFitCamera { extra_depth, .. } => {
                camera_frustum
                    .corners
                    .iter()
                    .map(|corner| (corner - light.position).magnitude())
                    .fold(0.0_f32, f32::max)
                    + extra_depth
            }
        };

        let view = Mat4::look_at(light.position, target, self.up_hint(aim));
        let proj = Mat4::perspective(
            fov_y,
            self.config.width as f32 / self.config.height as f32,
            0.1,
            far.max(0.2),
        );
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::utils;
    use crate::render::context::RecordingContext;

    fn camera_frustum() -> Frustum {
        let proj = Mat4::perspective(utils::deg_to_rad(45.0), 1.0, 0.1, 20.0);
        let view = Mat4::look_at(
            Vec3::new(0.0, 5.0, 10.0),
            Vec3::zeros(),
            Vec3::new(0.0, 1.0, 0.0),
        );
        Frustum::from_view_proj(&(proj * view))
    }

    #[test]
    fn test_bind_unbind_restores_viewport_and_target() {
        let mut map = ShadowMap::new(ShadowMapConfig::default(), FramebufferId(1));
        let mut ctx = RecordingContext::new(800, 600);

        map.bind(&mut ctx);
        assert_eq!(ctx.viewport(), Viewport::with_size(2048, 2048));
        assert_eq!(ctx.bound_framebuffer(), Some(FramebufferId(1)));

        map.unbind(&mut ctx);
        assert_eq!(ctx.viewport(), Viewport::with_size(800, 600));
        assert_eq!(ctx.bound_framebuffer(), None);
    }

    #[test]
    fn test_fixed_range_volume_contains_focus_point() {
        let config = ShadowMapConfig {
            range: ShadowRange::FixedUser {
                focus_point: Vec3::new(2.0, 0.0, -3.0),
                clip_width: 20.0,
                clip_height: 20.0,
                clip_depth: 20.0,
            },
            ..ShadowMapConfig::default()
        };
        let mut map = ShadowMap::new(config, FramebufferId(1));
        let light = Light::directional("sun", Vec3::new(-0.3, -1.0, -0.2));
        map.update_light_matrices(&light, &camera_frustum());

        let projected = map.light_view_proj() * Vec4::new(2.0, 0.0, -3.0, 1.0);
        let ndc = projected.xyz() / projected.w;
        assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0 && ndc.z.abs() <= 1.0);
    }

    #[test]
    fn test_auto_fit_volume_contains_camera_frustum() {
        let config = ShadowMapConfig {
            range: ShadowRange::AutoFitCamera {
                extra_width: 1.0,
                extra_height: 1.0,
                extra_depth: 1.0,
            },
            ..ShadowMapConfig::default()
        };
        let mut map = ShadowMap::new(config, FramebufferId(1));
        let light = Light::directional("sun", Vec3::new(0.4, -1.0, 0.3));
        let frustum = camera_frustum();
        map.update_light_matrices(&light, &frustum);

        for corner in &frustum.corners {
            let projected = map.light_view_proj() * Vec4::new(corner.x, corner.y, corner.z, 1.0);
            let ndc = projected.xyz() / projected.w;
            assert!(
                ndc.x.abs() <= 1.0 + 1e-3 && ndc.y.abs() <= 1.0 + 1e-3 && ndc.z.abs() <= 1.0 + 1e-3,
                "frustum corner {corner:?} fell outside the fitted shadow volume"
            );
        }
    }

    #[test]
    fn test_vertical_light_direction_does_not_degenerate() {
        let mut map = ShadowMap::new(ShadowMapConfig::default(), FramebufferId(1));
        let light = Light::directional("noon", Vec3::new(0.0, -1.0, 0.0));
        map.update_light_matrices(&light, &camera_frustum());

        let matrix = map.light_view_proj();
        assert!(matrix.iter().all(|value| value.is_finite()));
    }
}
