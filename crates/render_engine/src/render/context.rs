//! Graphics context abstraction
//!
//! The renderer never talks to a GPU API directly; it issues state changes
//! and draw calls through the [`GraphicsContext`] trait. A context owns the
//! mutable pipeline state the renderer must save and restore around passes
//! (viewport, bound framebuffer).
//!
//! [`RecordingContext`] is the bundled implementation: a headless context
//! that records every command it receives. It backs the test suite and the
//! demo binaries, and is the template for wiring a real GPU backend.

use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::scene::environment::Fog;

bitflags::bitflags! {
    /// Buffers affected by [`GraphicsContext::clear`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        /// Color attachment
        const COLOR = 1;
        /// Depth attachment
        const DEPTH = 1 << 1;
    }
}

/// Identifier of an offscreen framebuffer known to the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub u32);

/// Viewport rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge
    pub x: i32,
    /// Bottom edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport anchored at the origin
    pub fn with_size(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// Which render pass a draw call belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Depth-only pass into the shadow map
    Shadow,
    /// Opaque geometry in the main color pass
    Opaque,
    /// Blended geometry in the main color pass
    Transparent,
    /// Grayscale depth visualization
    DepthView,
    /// Flat-color semantic mask visualization
    SemanticView,
}

/// One draw call with its per-object uniforms
#[derive(Debug, Clone)]
pub struct DrawCall {
    /// Geometry buffer to draw
    pub geometry: String,
    /// Model-to-world matrix
    pub model_matrix: Mat4,
    /// Flat output color (rgb) and opacity (a) for this call
    pub color: Vec4,
}

/// Abstraction over the GPU pipeline state the renderer drives
pub trait GraphicsContext {
    /// Current viewport
    fn viewport(&self) -> Viewport;

    /// Set the viewport
    fn set_viewport(&mut self, viewport: Viewport);

    /// Bind an offscreen framebuffer as the draw target
    fn bind_framebuffer(&mut self, framebuffer: FramebufferId);

    /// Restore the default draw target
    fn unbind_framebuffer(&mut self);

    /// Clear the selected buffers of the current draw target
    fn clear(&mut self, color: Vec4, mask: ClearMask);

    /// Enable fog with the given parameters, or disable it with `None`
    fn set_fog(&mut self, fog: Option<&Fog>);

    /// Issue one draw call in the given pass
    fn draw(&mut self, pass: PassKind, call: &DrawCall);

    /// Draw the skybox cubemap behind all geometry
    fn draw_skybox(&mut self, cubemap: &str, tint: Vec3);
}

/// A command as observed by [`RecordingContext`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    /// Viewport change
    SetViewport(Viewport),
    /// Framebuffer bound
    BindFramebuffer(FramebufferId),
    /// Default target restored
    UnbindFramebuffer,
    /// Clear with the given color and buffer mask
    Clear(Vec4, ClearMask),
    /// Fog enabled or disabled
    SetFog(bool),
    /// Draw call; only pass and geometry are kept for inspection
    Draw {
        /// Pass the call was issued in
        pass: PassKind,
        /// Geometry that was drawn
        geometry: String,
    },
    /// Skybox draw
    DrawSkybox(String),
}

/// Headless context that records every command for later inspection
pub struct RecordingContext {
    viewport: Viewport,
    bound_framebuffer: Option<FramebufferId>,
    commands: Vec<RecordedCommand>,
}

impl RecordingContext {
    /// Create a recording context with the given initial viewport size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::with_size(width, height),
            bound_framebuffer: None,
            commands: Vec::new(),
        }
    }

    /// All commands recorded so far, in issue order
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Currently bound offscreen framebuffer, if any
    pub fn bound_framebuffer(&self) -> Option<FramebufferId> {
        self.bound_framebuffer
    }

    /// Count draw calls issued in one pass
    pub fn draw_count(&self, pass: PassKind) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, RecordedCommand::Draw { pass: p, .. } if *p == pass))
            .count()
    }

    /// Drop the recorded command list, keeping viewport and binding state
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

impl GraphicsContext for RecordingContext {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.commands.push(RecordedCommand::SetViewport(viewport));
    }

    fn bind_framebuffer(&mut self, framebuffer: FramebufferId) {
        self.bound_framebuffer = Some(framebuffer);
        self.commands.push(RecordedCommand::BindFramebuffer(framebuffer));
    }

    fn unbind_framebuffer(&mut self) {
        self.bound_framebuffer = None;
        self.commands.push(RecordedCommand::UnbindFramebuffer);
    }

    fn clear(&mut self, color: Vec4, mask: ClearMask) {
        self.commands.push(RecordedCommand::Clear(color, mask));
    }

    fn set_fog(&mut self, fog: Option<&Fog>) {
        self.commands.push(RecordedCommand::SetFog(fog.is_some()));
    }

    fn draw(&mut self, pass: PassKind, call: &DrawCall) {
        self.commands.push(RecordedCommand::Draw {
            pass,
            geometry: call.geometry.clone(),
        });
    }

    fn draw_skybox(&mut self, cubemap: &str, _tint: Vec3) {
        self.commands.push(RecordedCommand::DrawSkybox(cubemap.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_context_tracks_viewport() {
        let mut ctx = RecordingContext::new(800, 600);
        assert_eq!(ctx.viewport(), Viewport::with_size(800, 600));

        ctx.set_viewport(Viewport::with_size(1024, 768));
        assert_eq!(ctx.viewport(), Viewport::with_size(1024, 768));
    }

    #[test]
    fn test_recording_context_tracks_framebuffer_binding() {
        let mut ctx = RecordingContext::new(800, 600);
        assert_eq!(ctx.bound_framebuffer(), None);

        ctx.bind_framebuffer(FramebufferId(3));
        assert_eq!(ctx.bound_framebuffer(), Some(FramebufferId(3)));

        ctx.unbind_framebuffer();
        assert_eq!(ctx.bound_framebuffer(), None);
    }

    #[test]
    fn test_draw_count_filters_by_pass() {
        let mut ctx = RecordingContext::new(800, 600);
        let call = DrawCall {
            geometry: "cube".to_string(),
            model_matrix: Mat4::identity(),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
        };

        ctx.draw(PassKind::Opaque, &call);
        ctx.draw(PassKind::Opaque, &call);
        ctx.draw(PassKind::Shadow, &call);

        assert_eq!(ctx.draw_count(PassKind::Opaque), 2);
        assert_eq!(ctx.draw_count(PassKind::Shadow), 1);
        assert_eq!(ctx.draw_count(PassKind::Transparent), 0);
    }
}
