//! Rendering system
//!
//! The frame pipeline: [`MainRenderer`] validates per-frame
//! [`RenderOptions`] against a scene, flattens and culls submissions into
//! draw items, and sequences the shadow and main passes over a
//! [`GraphicsContext`]. The context trait is the only seam to the GPU; the
//! bundled [`RecordingContext`] runs the whole pipeline headless.

pub mod context;
pub mod main_renderer;
pub mod mesh_renderer;
pub mod options;
pub mod queue;
pub mod shadow_map;
pub mod skybox_renderer;

pub use context::{
    ClearMask, DrawCall, FramebufferId, GraphicsContext, PassKind, RecordedCommand,
    RecordingContext, Viewport,
};
pub use main_renderer::{FrameStats, MainRenderer};
pub use mesh_renderer::{LightUniforms, MeshRenderer};
pub use options::{CullingGeometry, DepthViewParams, RenderMode, RenderOptions};
pub use queue::{collect_draw_items, DrawItem, RenderQueue};
pub use shadow_map::{ShadowMap, ShadowMapConfig, ShadowRange};
pub use skybox_renderer::SkyboxRenderer;
