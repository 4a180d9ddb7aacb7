//! Skybox renderer
//!
//! Draws the scene's skybox cubemap first in the main pass, before any
//! geometry, so everything else composites over it.

use crate::render::context::GraphicsContext;
use crate::scene::environment::Skybox;

/// Draws the skybox behind the scene
#[derive(Default)]
pub struct SkyboxRenderer;

impl SkyboxRenderer {
    /// Create a skybox renderer
    pub fn new() -> Self {
        Self
    }

    /// Draw the skybox on the current target
    pub fn render(&self, ctx: &mut dyn GraphicsContext, skybox: &Skybox) {
        ctx.draw_skybox(&skybox.cubemap, skybox.tint);
    }
}
