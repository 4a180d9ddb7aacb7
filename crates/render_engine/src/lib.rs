//! A small real-time rendering engine core
//!
//! Organizes scenes of meshes, models, cameras and lights, and drives them
//! through a multi-pass frame pipeline: option validation, model
//! flattening, frustum culling, an optional shadow pass, and a main pass
//! with normal, depth-only and semantic render modes.
//!
//! The GPU is abstracted behind [`render::GraphicsContext`]; the crate
//! ships a headless recording implementation so the full pipeline can run
//! and be inspected without a graphics device.
//!
//! ## Frame protocol
//!
//! ```
//! use render_engine::prelude::*;
//!
//! let mut scene = Scene::new();
//! scene.add_camera(Camera::perspective("main", Vec3::new(0.0, 0.0, 10.0), Vec3::zeros()));
//! scene.add_light(Light::directional("sun", Vec3::new(0.0, -1.0, 0.0)));
//!
//! let cube = Renderable::Mesh(Mesh::new("cube", "cube_geometry"));
//!
//! let mut renderer = MainRenderer::new();
//! let mut ctx = RecordingContext::new(800, 600);
//!
//! renderer.begin(&scene, RenderOptions::default());
//! renderer.submit(&scene, &[&cube]);
//! renderer.render(&mut ctx);
//!
//! assert_eq!(ctx.draw_count(PassKind::Opaque), 1);
//! ```

pub mod config;
pub mod foundation;
pub mod render;
pub mod scene;

/// Commonly used types, re-exported for convenience
pub mod prelude {
    pub use crate::config::RendererConfig;
    pub use crate::foundation::math::{Mat3, Mat4, Mat4Ext, Vec2, Vec3, Vec4};
    pub use crate::render::{
        CullingGeometry, FramebufferId, FrameStats, GraphicsContext, MainRenderer, PassKind,
        RecordingContext, RenderMode, RenderOptions, ShadowMap, ShadowMapConfig, ShadowRange,
        Viewport,
    };
    pub use crate::scene::{
        Camera, CameraHandle, Fog, Light, LightHandle, LightType, Material, Mesh, Model,
        Renderable, Scene, Skybox,
    };
}
