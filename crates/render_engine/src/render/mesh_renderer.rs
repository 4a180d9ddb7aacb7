//! Mesh renderer: per-frame item storage and pass execution
//!
//! Holds the frame's two draw item lists, the pre-cull visible set fed to
//! the shadow pass and the post-cull in-view set fed to the shaded passes,
//! bucketed by a [`RenderQueue`], together with a snapshot of the
//! camera and light state taken at submit time. The main renderer calls
//! into the pass methods in order; each pass turns its bucket into draw
//! calls on the context.

use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::render::context::{DrawCall, GraphicsContext, PassKind};
use crate::render::options::DepthViewParams;
use crate::render::queue::{DrawItem, RenderQueue};
use crate::scene::camera::Camera;
use crate::scene::light::{Light, LightType};

use std::collections::HashMap;

/// Light state snapshotted at submission
#[derive(Debug, Clone)]
pub struct LightUniforms {
    /// Light type
    pub light_type: LightType,
    /// Light position (point/spot)
    pub position: Vec3,
    /// Light direction (directional/spot)
    pub direction: Vec3,
    /// Light color scaled by intensity
    pub color: Vec3,
}

impl LightUniforms {
    /// Snapshot a scene light
    pub fn from_light(light: &Light) -> Self {
        Self {
            light_type: light.light_type,
            position: light.position,
            direction: light.direction,
            color: light.color * light.intensity,
        }
    }
}

/// Renders the bucketed draw items of one frame
pub struct MeshRenderer {
    visible_items: Vec<DrawItem>,
    in_view_items: Vec<DrawItem>,
    queue: RenderQueue,
    view: Mat4,
    light: Option<LightUniforms>,
}

impl MeshRenderer {
    /// Create an empty mesh renderer
    pub fn new() -> Self {
        Self {
            visible_items: Vec::new(),
            in_view_items: Vec::new(),
            queue: RenderQueue::default(),
            view: Mat4::identity(),
            light: None,
        }
    }

    /// Drop all items and buckets from the previous frame
    pub fn clear(&mut self) {
        self.visible_items.clear();
        self.in_view_items.clear();
        self.queue = RenderQueue::default();
        self.light = None;
    }

    /// Append this frame's item sets and refresh the camera/light snapshot
    ///
    /// `visible` is the pre-cull set, `in_view` the post-cull subset. A
    /// frame may submit several times before rendering; both sets
    /// accumulate and the buckets are rebuilt over the full lists each
    /// call.
    pub fn submit(
        &mut self,
        visible: Vec<DrawItem>,
        in_view: Vec<DrawItem>,
        camera: &Camera,
        light: Option<&Light>,
        use_blending: bool,
    ) {
        self.view = camera.mat_view();
        self.light = light.map(LightUniforms::from_light);
        self.visible_items.extend(visible);
        self.in_view_items.extend(in_view);
        self.queue = RenderQueue::build(
            &self.visible_items,
            &self.in_view_items,
            camera.position,
            use_blending,
        );
    }

    /// Number of items in the pre-cull visible set
    pub fn visible_count(&self) -> usize {
        self.visible_items.len()
    }

    /// Number of items in the post-cull in-view set
    pub fn in_view_count(&self) -> usize {
        self.in_view_items.len()
    }

    /// Number of items in the opaque bucket
    pub fn opaque_count(&self) -> usize {
        self.queue.opaque.len()
    }

    /// Number of items in the transparent bucket
    pub fn transparent_count(&self) -> usize {
        self.queue.transparent.len()
    }

    /// Number of items in the shadow caster bucket
    pub fn shadow_caster_count(&self) -> usize {
        self.queue.shadow_casters.len()
    }

    /// Light snapshot taken at submission, if a light was given
    pub fn light(&self) -> Option<&LightUniforms> {
        self.light.as_ref()
    }

    /// Draw every shadow caster into the currently bound shadow target
    pub fn render_shadow_pass(&self, ctx: &mut dyn GraphicsContext) {
        for &index in &self.queue.shadow_casters {
            let item = &self.visible_items[index];
            ctx.draw(
                PassKind::Shadow,
                &DrawCall {
                    geometry: item.geometry.clone(),
                    model_matrix: item.mat_model(),
                    color: Vec4::new(1.0, 1.0, 1.0, 1.0),
                },
            );
        }
    }

    /// Draw the opaque bucket
    pub fn render_opaque(&self, ctx: &mut dyn GraphicsContext) {
        for &index in &self.queue.opaque {
            let item = &self.in_view_items[index];
            let diffuse = item.material.diffuse;
            ctx.draw(
                PassKind::Opaque,
                &DrawCall {
                    geometry: item.geometry.clone(),
                    model_matrix: item.mat_model(),
                    color: Vec4::new(diffuse.x, diffuse.y, diffuse.z, 1.0),
                },
            );
        }
    }

    /// Draw the transparent bucket, already ordered back to front
    pub fn render_transparent(&self, ctx: &mut dyn GraphicsContext) {
        for &index in &self.queue.transparent {
            let item = &self.in_view_items[index];
            let diffuse = item.material.diffuse;
            ctx.draw(
                PassKind::Transparent,
                &DrawCall {
                    geometry: item.geometry.clone(),
                    model_matrix: item.mat_model(),
                    color: Vec4::new(diffuse.x, diffuse.y, diffuse.z, item.material.alpha),
                },
            );
        }
    }

    /// Draw every item tinted by its view-space depth
    ///
    /// Depth is taken at the item origin and mapped linearly from
    /// `params.z_min` (near color) to `params.z_max` (far color), clamped at
    /// both ends.
    pub fn render_depth_view(&self, ctx: &mut dyn GraphicsContext, params: &DepthViewParams) {
        for item in &self.in_view_items {
            let position = self.view * Vec4::new(item.position.x, item.position.y, item.position.z, 1.0);
            let depth = -position.z;
            let span = (params.z_max - params.z_min).max(1e-6);
            let t = ((depth - params.z_min) / span).clamp(0.0, 1.0);
            let color = params.color_near.lerp(&params.color_far, t);
            ctx.draw(
                PassKind::DepthView,
                &DrawCall {
                    geometry: item.geometry.clone(),
                    model_matrix: item.mat_model(),
                    color: Vec4::new(color.x, color.y, color.z, 1.0),
                },
            );
        }
    }

    /// Draw every item in the flat color mapped from its mask id
    ///
    /// Ids missing from the map render black.
    pub fn render_semantic_view(
        &self,
        ctx: &mut dyn GraphicsContext,
        id_colors: &HashMap<i32, Vec3>,
    ) {
        for item in &self.in_view_items {
            let color = id_colors
                .get(&item.mask_id)
                .copied()
                .unwrap_or_else(Vec3::zeros);
            ctx.draw(
                PassKind::SemanticView,
                &DrawCall {
                    geometry: item.geometry.clone(),
                    model_matrix: item.mat_model(),
                    color: Vec4::new(color.x, color.y, color.z, 1.0),
                },
            );
        }
    }
}

impl Default for MeshRenderer {
    fn default() -> Self {
        Self::new()
    }
}
