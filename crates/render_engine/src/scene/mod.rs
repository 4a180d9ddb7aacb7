//! Scene management
//!
//! Owns the data the renderer draws from: cameras, lights, renderable
//! objects, and optional environment resources (fog, skybox). Also provides
//! the bounding-volume math used for frustum culling.

pub mod bounds;
pub mod camera;
pub mod environment;
pub mod light;
pub mod renderable;
#[allow(clippy::module_inception)]
pub mod scene;

pub use bounds::{BoundingBox, BoundingSphere, Frustum, Plane};
pub use camera::{Camera, CameraProjection};
pub use environment::{Fog, FogType, Skybox};
pub use light::{Light, LightType};
pub use renderable::{Material, MaterialKind, Mesh, Model, Renderable};
pub use scene::{CameraHandle, LightHandle, Scene};
