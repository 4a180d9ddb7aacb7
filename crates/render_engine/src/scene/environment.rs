//! Scene environment: fog and skybox resources
//!
//! These are optional per-scene resources. Render options that request fog
//! or skybox rendering are validated against their presence and degrade
//! gracefully when the scene has not been given one.

use crate::foundation::math::Vec3;

/// Fog falloff model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FogType {
    /// Linear falloff between `start` and `end`
    Linear,
    /// Exponential falloff using `density`
    Exponential,
}

/// Fog parameters applied during the main color pass
#[derive(Debug, Clone)]
pub struct Fog {
    /// Falloff model
    pub fog_type: FogType,
    /// Fog color blended toward at full density
    pub color: Vec3,
    /// Exponential falloff density
    pub density: f32,
    /// Distance where linear fog starts
    pub start: f32,
    /// Distance where linear fog reaches full density
    pub end: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            fog_type: FogType::Linear,
            color: Vec3::new(0.5, 0.5, 0.5),
            density: 0.05,
            start: 10.0,
            end: 50.0,
        }
    }
}

/// Skybox resource drawn first in the main pass, before any geometry
#[derive(Debug, Clone)]
pub struct Skybox {
    /// Name of the cubemap texture backing this skybox
    pub cubemap: String,
    /// Color multiplier applied to the cubemap sample
    pub tint: Vec3,
}

impl Skybox {
    /// Create a skybox from a cubemap texture name
    pub fn new(cubemap: impl Into<String>) -> Self {
        Self {
            cubemap: cubemap.into(),
            tint: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}
