//! Per-frame render options
//!
//! A [`RenderOptions`] value parameterizes one `begin`/`submit`/`render`
//! cycle of the main renderer. Options are validated against the scene at
//! `begin`: requests the scene cannot honor (fog without a fog resource,
//! shadows without a shadow map) are logged and switched off, while a
//! missing camera, or a missing light in [`RenderMode::Normal`], invalidates
//! the whole cycle.

use std::collections::HashMap;
use std::fmt;

use crate::foundation::math::{Vec3, Vec4};
use crate::render::context::{FramebufferId, Viewport};
use crate::render::shadow_map::ShadowRange;
use crate::scene::scene::{CameraHandle, LightHandle};

/// What the frame renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Lit color rendering with all enabled features
    #[default]
    Normal,
    /// Grayscale visualization of view-space depth
    DepthOnly,
    /// Flat-color visualization of semantic mask ids
    SemanticOnly,
    /// Run validation and culling but draw nothing
    NoSubmit,
    /// Run the main pass state changes and clear, but draw no geometry
    None,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::DepthOnly => "depth-only",
            Self::SemanticOnly => "semantic-only",
            Self::NoSubmit => "no-submit",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

/// Bounding volume used for frustum culling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullingGeometry {
    /// Oriented bounding box (8-corner test)
    BoundingBox,
    /// Bounding sphere (center-distance test)
    #[default]
    BoundingSphere,
}

impl fmt::Display for CullingGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BoundingBox => "bounding-box",
            Self::BoundingSphere => "bounding-sphere",
        };
        f.write_str(name)
    }
}

/// Parameters of the depth visualization mode
#[derive(Debug, Clone)]
pub struct DepthViewParams {
    /// Distance mapped to `color_near`
    pub z_min: f32,
    /// Distance mapped to `color_far`
    pub z_max: f32,
    /// Color of geometry at or before `z_min`
    pub color_near: Vec3,
    /// Color of geometry at or beyond `z_max`
    pub color_far: Vec3,
}

impl Default for DepthViewParams {
    fn default() -> Self {
        Self {
            z_min: 0.0,
            z_max: 6.0,
            color_near: Vec3::new(1.0, 1.0, 1.0),
            color_far: Vec3::new(0.0, 0.0, 0.0),
        }
    }
}

/// Options for one render cycle
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Render mode for this cycle
    pub mode: RenderMode,
    /// Camera to render from; `None` selects the scene's current camera
    pub camera: Option<CameraHandle>,
    /// Light used for shading and shadows; `None` selects the scene's main
    /// light
    pub light: Option<LightHandle>,
    /// Offscreen target for the main pass; `None` draws to the default
    /// target
    pub render_target: Option<FramebufferId>,
    /// Discard out-of-view geometry before drawing
    pub use_frustum_culling: bool,
    /// Bounding volume used when culling is on
    pub culling_geometry: CullingGeometry,
    /// Render and sample a shadow map (normal mode only)
    pub use_shadow_mapping: bool,
    /// Re-render the shadow map this cycle; leave off to reuse the previous
    /// map when neither light nor casters moved
    pub redraw_shadow_map: bool,
    /// Shadow volume fitting for this cycle; `None` keeps the shadow map's
    /// configured range
    pub shadow_range: Option<ShadowRange>,
    /// Alpha-blend transparent materials in a separate sorted pass
    pub use_blending: bool,
    /// Apply the scene's fog resource
    pub use_fog: bool,
    /// Draw the scene's skybox behind all geometry
    pub use_skybox: bool,
    /// Viewport for the main pass; `None` keeps the context's current one
    pub viewport: Option<Viewport>,
    /// Clear color of the main pass
    pub clear_color: Vec4,
    /// Depth visualization parameters
    pub depth_view: DepthViewParams,
    /// Mask id to display color mapping for the semantic view; unmapped ids
    /// render black
    pub semantic_colors: HashMap<i32, Vec3>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: RenderMode::Normal,
            camera: None,
            light: None,
            render_target: None,
            use_frustum_culling: false,
            culling_geometry: CullingGeometry::BoundingSphere,
            use_shadow_mapping: false,
            redraw_shadow_map: true,
            shadow_range: None,
            use_blending: false,
            use_fog: false,
            use_skybox: false,
            viewport: None,
            clear_color: Vec4::new(0.1, 0.1, 0.1, 1.0),
            depth_view: DepthViewParams::default(),
            semantic_colors: HashMap::new(),
        }
    }
}

impl fmt::Display for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mode={} culling={}({}) shadows={} blending={} fog={} skybox={}",
            self.mode,
            self.use_frustum_culling,
            self.culling_geometry,
            self.use_shadow_mapping,
            self.use_blending,
            self.use_fog,
            self.use_skybox,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let options = RenderOptions::default();

        assert_eq!(options.mode, RenderMode::Normal);
        assert_eq!(options.culling_geometry, CullingGeometry::BoundingSphere);
        assert!(!options.use_frustum_culling);
        assert!(!options.use_shadow_mapping);
        assert!(options.redraw_shadow_map);
        assert!(options.viewport.is_none());
        assert!(options.semantic_colors.is_empty());
    }

    #[test]
    fn test_mode_display_names() {
        assert_eq!(RenderMode::Normal.to_string(), "normal");
        assert_eq!(RenderMode::DepthOnly.to_string(), "depth-only");
        assert_eq!(RenderMode::SemanticOnly.to_string(), "semantic-only");
        assert_eq!(RenderMode::NoSubmit.to_string(), "no-submit");
        assert_eq!(RenderMode::None.to_string(), "none");
    }
}
