//! Light sources

use crate::foundation::math::Vec3;

/// Light types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    /// Directional light (like sunlight)
    Directional,
    /// Point light (like a lightbulb)
    Point,
    /// Spot light (like a flashlight)
    Spot,
}

/// A named light source
///
/// Directional lights only use `direction`; point lights only use
/// `position`; spot lights use both. The unused fields keep their
/// constructor defaults and are ignored by the renderer.
#[derive(Debug, Clone)]
pub struct Light {
    /// Unique name used for scene lookups
    pub name: String,
    /// Light type
    pub light_type: LightType,
    /// Light position (for point/spot lights)
    pub position: Vec3,
    /// Light direction (for directional/spot lights)
    pub direction: Vec3,
    /// Light color
    pub color: Vec3,
    /// Light intensity
    pub intensity: f32,
    /// Outer cone angle for spot lights (in radians)
    pub cone_angle: f32,
}

impl Light {
    /// Create a directional light
    pub fn directional(name: impl Into<String>, direction: Vec3) -> Self {
        Self {
            name: name.into(),
            light_type: LightType::Directional,
            position: Vec3::zeros(),
            direction: direction.normalize(),
            color: Vec3::new(1.0, 1.0, 1.0),
            intensity: 1.0,
            cone_angle: 0.0,
        }
    }

    /// Create a point light
    pub fn point(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            light_type: LightType::Point,
            position,
            direction: Vec3::zeros(),
            color: Vec3::new(1.0, 1.0, 1.0),
            intensity: 1.0,
            cone_angle: 0.0,
        }
    }

    /// Create a spot light
    pub fn spot(name: impl Into<String>, position: Vec3, direction: Vec3, cone_angle: f32) -> Self {
        Self {
            name: name.into(),
            light_type: LightType::Spot,
            position,
            direction: direction.normalize(),
            color: Vec3::new(1.0, 1.0, 1.0),
            intensity: 1.0,
            cone_angle,
        }
    }

    /// Set the light color (builder style)
    #[must_use]
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Set the light intensity (builder style)
    #[must_use]
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }
}
