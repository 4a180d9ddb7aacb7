//! Main renderer: frame protocol, option validation and pass sequencing
//!
//! A frame is driven as `begin` (validate options against the scene),
//! `submit` one or more times (flatten, cull, bucket), then `render`
//! (shadow pass, main pass). Validation distinguishes two failure tiers:
//! feature requests the scene cannot honor (fog, skybox, shadow map) are
//! logged and switched off so the frame still renders; a missing camera, or
//! a missing light in normal mode, invalidates the whole cycle and turns
//! `submit`/`render` into silent no-ops until the next `begin`.

use std::fmt;

use crate::config::RendererConfig;
use crate::render::context::{ClearMask, FramebufferId, GraphicsContext, Viewport};
use crate::render::mesh_renderer::MeshRenderer;
use crate::render::options::{CullingGeometry, RenderMode, RenderOptions};
use crate::render::queue::collect_draw_items;
use crate::render::shadow_map::ShadowMap;
use crate::render::skybox_renderer::SkyboxRenderer;
use crate::scene::bounds::Frustum;
use crate::scene::environment::{Fog, Skybox};
use crate::scene::light::Light;
use crate::scene::renderable::Renderable;
use crate::scene::scene::Scene;

/// Counters accumulated over the submissions of one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    /// Draw items produced by flattening the visible set
    pub submitted: usize,
    /// Items dropped because their whole renderable was culled
    pub culled: usize,
    /// Items that survived culling
    pub in_view: usize,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "submitted={} culled={} in_view={}",
            self.submitted, self.culled, self.in_view
        )
    }
}

/// Drives whole frames through validation, submission and the render passes
pub struct MainRenderer {
    options: RenderOptions,
    has_valid_info: bool,
    mesh_renderer: MeshRenderer,
    skybox_renderer: SkyboxRenderer,
    shadow_map: Option<ShadowMap>,
    light: Option<Light>,
    fog: Option<Fog>,
    skybox: Option<Skybox>,
    frustum: Option<Frustum>,
    stats: FrameStats,
}

impl MainRenderer {
    /// Create a renderer without a shadow map
    pub fn new() -> Self {
        Self {
            options: RenderOptions::default(),
            has_valid_info: false,
            mesh_renderer: MeshRenderer::new(),
            skybox_renderer: SkyboxRenderer::new(),
            shadow_map: None,
            light: None,
            fog: None,
            skybox: None,
            frustum: None,
            stats: FrameStats::default(),
        }
    }

    /// Create a renderer from a static configuration
    pub fn from_config(config: &RendererConfig) -> Self {
        let mut renderer = Self::new();
        if let Some(section) = &config.shadow_map {
            renderer.shadow_map = Some(ShadowMap::new(
                section.config.clone(),
                FramebufferId(section.framebuffer),
            ));
        }
        renderer
    }

    /// Give the renderer a shadow map, or take it away with `None`
    pub fn set_shadow_map(&mut self, shadow_map: Option<ShadowMap>) {
        self.shadow_map = shadow_map;
    }

    /// The owned shadow map, for callers inspecting shadow-pass output
    pub fn shadow_map(&self) -> Option<&ShadowMap> {
        self.shadow_map.as_ref()
    }

    /// Whether the last `begin` produced a renderable cycle
    pub fn has_valid_info(&self) -> bool {
        self.has_valid_info
    }

    /// Options in effect for the current cycle, after validation
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Counters for the current cycle
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// One-line summary of the current cycle for logs and overlays
    pub fn status(&self) -> String {
        format!(
            "{} {} opaque={} transparent={} shadow_casters={}",
            self.options,
            self.stats,
            self.mesh_renderer.opaque_count(),
            self.mesh_renderer.transparent_count(),
            self.mesh_renderer.shadow_caster_count(),
        )
    }

    /// Start a frame, validating the requested options against the scene
    ///
    /// Missing optional resources (fog, skybox, shadow map) disable their
    /// feature with a warning. A missing camera, or a missing light in
    /// normal mode, marks the cycle invalid; subsequent `submit` and
    /// `render` calls do nothing until the next `begin`.
    pub fn begin(&mut self, scene: &Scene, options: RenderOptions) {
        let mut options = options;
        self.mesh_renderer.clear();
        self.stats = FrameStats::default();
        self.frustum = None;
        self.light = None;
        self.has_valid_info = true;

        // Independent auto-corrections: disable what the scene cannot honor.
        if options.use_shadow_mapping && self.shadow_map.is_none() {
            log::warn!("Shadow mapping requested but no shadow map is configured; disabling it");
            options.use_shadow_mapping = false;
        }
        if options.use_fog && scene.fog().is_none() {
            log::warn!("Fog requested but the scene has no fog resource; disabling it");
            options.use_fog = false;
        }
        self.fog = if options.use_fog { scene.fog().cloned() } else { None };

        if options.use_skybox && scene.skybox().is_none() {
            log::warn!("Skybox requested but the scene has no skybox resource; disabling it");
            options.use_skybox = false;
        }
        self.skybox = if options.use_skybox {
            scene.skybox().cloned()
        } else {
            None
        };

        // Hard invalidation: the rest of the cycle becomes a no-op.
        let camera_handle = options.camera.or_else(|| scene.current_camera_handle());
        if camera_handle.and_then(|handle| scene.camera(handle)).is_some() {
            options.camera = camera_handle;
        } else {
            log::warn!("Cannot begin render cycle: no camera available");
            self.has_valid_info = false;
            self.options = options;
            return;
        }

        if options.mode == RenderMode::Normal {
            let light_handle = options.light.or_else(|| scene.main_light_handle());
            match light_handle.and_then(|handle| scene.light(handle)) {
                Some(light) => {
                    options.light = light_handle;
                    self.light = Some(light.clone());
                }
                None => {
                    log::warn!("Cannot render in normal mode: no light available");
                    self.has_valid_info = false;
                    self.options = options;
                    return;
                }
            }
        }

        if options.use_shadow_mapping {
            if let (Some(shadow_map), Some(range)) =
                (self.shadow_map.as_mut(), options.shadow_range.clone())
            {
                shadow_map.set_range(range);
            }
        }

        self.options = options;
    }

    /// Submit renderables for this frame
    ///
    /// Culls whole renderables against a frustum computed fresh from the
    /// camera's current matrices (a model is kept or dropped as a unit,
    /// using bounds that enclose all of its submeshes), then flattens both
    /// the pre-cull visible set and the post-cull in-view set to draw
    /// items. The shadow pass draws from the former, the shaded passes from
    /// the latter. In no-submit mode the call stops after culling, so the
    /// counters still reflect what would have been drawn. Does nothing when
    /// the cycle is invalid.
    pub fn submit(&mut self, scene: &Scene, renderables: &[&Renderable]) {
        if !self.has_valid_info {
            return;
        }
        let Some(camera) = self.options.camera.and_then(|handle| scene.camera(handle)) else {
            log::warn!("Camera was removed from the scene mid-frame; invalidating the cycle");
            self.has_valid_info = false;
            return;
        };

        let visible_renderables: Vec<&Renderable> =
            renderables.iter().copied().filter(|r| r.visible()).collect();

        let frustum = Frustum::from_view_proj(&camera.mat_view_proj());
        let in_view_renderables: Vec<&Renderable> = if self.options.use_frustum_culling {
            visible_renderables
                .iter()
                .copied()
                .filter(|renderable| match self.options.culling_geometry {
                    CullingGeometry::BoundingBox => {
                        !frustum.certainly_outside_box(&renderable.bbox())
                    }
                    CullingGeometry::BoundingSphere => {
                        !frustum.certainly_outside_sphere(&renderable.bsphere())
                    }
                })
                .collect()
        } else {
            visible_renderables.clone()
        };

        let visible = collect_draw_items(&visible_renderables);
        let in_view = collect_draw_items(&in_view_renderables);
        self.stats.submitted += visible.len();
        self.stats.culled += visible.len() - in_view.len();
        self.stats.in_view += in_view.len();
        self.frustum = Some(frustum);

        if self.options.mode == RenderMode::NoSubmit {
            return;
        }

        self.mesh_renderer.submit(
            visible,
            in_view,
            camera,
            self.light.as_ref(),
            self.options.use_blending,
        );
    }

    /// Render the frame: shadow pass if due, then the main pass
    ///
    /// The main pass saves the context viewport, applies the frame's
    /// viewport and render target, clears, draws according to the render
    /// mode, and restores viewport and target before returning. Does nothing
    /// when the cycle is invalid or in no-submit mode.
    pub fn render(&mut self, ctx: &mut dyn GraphicsContext) {
        if !self.has_valid_info || self.options.mode == RenderMode::NoSubmit {
            return;
        }

        if self.options.mode == RenderMode::Normal
            && self.options.use_shadow_mapping
            && self.options.redraw_shadow_map
        {
            if let (Some(shadow_map), Some(light), Some(frustum)) =
                (self.shadow_map.as_mut(), self.light.as_ref(), self.frustum.as_ref())
            {
                shadow_map.update_light_matrices(light, frustum);
                shadow_map.bind(ctx);
                self.mesh_renderer.render_shadow_pass(ctx);
                shadow_map.unbind(ctx);
            }
        }

        let saved_viewport = ctx.viewport();
        let target_size = self.options.viewport.unwrap_or(saved_viewport);
        ctx.set_viewport(Viewport::with_size(target_size.width, target_size.height));
        if let Some(target) = self.options.render_target {
            ctx.bind_framebuffer(target);
        }
        ctx.clear(self.options.clear_color, ClearMask::COLOR | ClearMask::DEPTH);

        if self.options.mode == RenderMode::Normal {
            ctx.set_fog(self.fog.as_ref());
            if let Some(skybox) = &self.skybox {
                self.skybox_renderer.render(ctx, skybox);
            }
        }

        match self.options.mode {
            RenderMode::Normal => {
                self.mesh_renderer.render_opaque(ctx);
                if self.options.use_blending {
                    self.mesh_renderer.render_transparent(ctx);
                }
            }
            RenderMode::DepthOnly => {
                self.mesh_renderer
                    .render_depth_view(ctx, &self.options.depth_view);
            }
            RenderMode::SemanticOnly => {
                self.mesh_renderer
                    .render_semantic_view(ctx, &self.options.semantic_colors);
            }
            // None clears the target but draws no geometry; NoSubmit never
            // reaches this point.
            RenderMode::None | RenderMode::NoSubmit => {}
        }

        ctx.set_viewport(saved_viewport);
        if self.options.render_target.is_some() {
            ctx.unbind_framebuffer();
        }
    }
}

impl Default for MainRenderer {
    fn default() -> Self {
        Self::new()
    }
}
