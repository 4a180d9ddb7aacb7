//! Renderable scene objects: meshes, models and materials
//!
//! A [`Mesh`] is a single drawable with its own pose and material. A
//! [`Model`] is a collection of submeshes, each offset by a local transform
//! relative to the model pose; at submission time models are flattened into
//! per-submesh draw items (see `render::queue`).

use crate::foundation::math::{Mat3, Mat4, Vec3};
use crate::scene::bounds::{BoundingBox, BoundingSphere};

/// Shading model for a material
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Diffuse-only shading
    Lambert,
    /// Diffuse plus specular shading
    Phong {
        /// Specular exponent
        shininess: f32,
    },
}

/// Surface material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Shading model
    pub kind: MaterialKind,
    /// Ambient reflectance
    pub ambient: Vec3,
    /// Diffuse reflectance
    pub diffuse: Vec3,
    /// Specular reflectance
    pub specular: Vec3,
    /// Opacity in [0, 1]; values below 1 mark the surface as transparent
    /// when blending is enabled
    pub alpha: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Lambert,
            ambient: Vec3::new(0.1, 0.1, 0.1),
            diffuse: Vec3::new(0.8, 0.8, 0.8),
            specular: Vec3::new(0.5, 0.5, 0.5),
            alpha: 1.0,
        }
    }
}

impl Material {
    /// Whether this material takes the transparent path when blending is on
    pub fn is_transparent(&self) -> bool {
        self.alpha < 1.0
    }
}

/// A single drawable mesh
///
/// `rotation` is stored as a 3x3 matrix rather than a quaternion so the
/// pose matches the draw-item convention used at flattening time, where
/// the upper 3x3 of a composed world matrix can carry a parent model's
/// folded scale.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Name for logs and debugging
    pub name: String,
    /// Name of the geometry buffer this mesh draws
    pub geometry: String,
    /// Surface material
    pub material: Material,
    /// World-space position
    pub position: Vec3,
    /// World-space rotation
    pub rotation: Mat3,
    /// Per-axis scale
    pub scale: Vec3,
    /// Whether this mesh is drawn at all
    pub visible: bool,
    /// Whether this mesh is drawn into the shadow map
    pub casts_shadows: bool,
    /// Whether shadows are sampled when shading this mesh
    pub receives_shadows: bool,
    /// Id written to the semantic view for this mesh
    pub mask_id: i32,
    /// Full extents of the geometry in model space
    pub bound_extents: Vec3,
    /// Center of the geometry bounds in model space
    pub bound_center: Vec3,
}

impl Mesh {
    /// Create a mesh at the origin with unit bounds and a default material
    pub fn new(name: impl Into<String>, geometry: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geometry: geometry.into(),
            material: Material::default(),
            position: Vec3::zeros(),
            rotation: Mat3::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            visible: true,
            casts_shadows: true,
            receives_shadows: true,
            mask_id: 0,
            bound_extents: Vec3::new(1.0, 1.0, 1.0),
            bound_center: Vec3::zeros(),
        }
    }

    /// Model matrix: translation, then rotation, then scale
    pub fn mat_model(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// World-space oriented bounding box of this mesh
    pub fn bbox(&self) -> BoundingBox {
        let scaled_center = self.bound_center.component_mul(&self.scale);
        BoundingBox::new(
            self.bound_extents.component_mul(&self.scale),
            Mat4::new_translation(&self.position)
                * self.rotation.to_homogeneous()
                * Mat4::new_translation(&scaled_center),
        )
    }

    /// World-space bounding sphere of this mesh
    pub fn bsphere(&self) -> BoundingSphere {
        let scaled_center = self.bound_center.component_mul(&self.scale);
        BoundingSphere::new(
            0.5 * self.bound_extents.component_mul(&self.scale).magnitude(),
            self.position + self.rotation * scaled_center,
        )
    }
}

/// A group of submeshes sharing a parent pose
///
/// Each submesh is paired with a local transform relative to the model; the
/// pair list is kept in lockstep by [`Model::add_submesh`].
#[derive(Debug, Clone)]
pub struct Model {
    /// Name for logs and debugging
    pub name: String,
    /// Submeshes with their local transforms relative to the model pose
    pub submeshes: Vec<(Mesh, Mat4)>,
    /// World-space position
    pub position: Vec3,
    /// World-space rotation
    pub rotation: Mat3,
    /// Per-axis scale
    pub scale: Vec3,
    /// Whether the whole model is drawn
    pub visible: bool,
    /// Id written to the semantic view, propagated to every submesh
    pub mask_id: i32,
}

impl Model {
    /// Create an empty model at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            submeshes: Vec::new(),
            position: Vec3::zeros(),
            rotation: Mat3::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            visible: true,
            mask_id: 0,
        }
    }

    /// Add a submesh with a local transform relative to the model pose
    pub fn add_submesh(&mut self, mesh: Mesh, local_transform: Mat4) {
        self.submeshes.push((mesh, local_transform));
    }

    /// Model matrix: translation, then rotation, then scale
    pub fn mat_model(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// World-space min and max over all submesh box corners
    fn world_bounds(&self) -> Option<(Vec3, Vec3)> {
        if self.submeshes.is_empty() {
            return None;
        }
        let world = self.mat_model();
        let mut min = Vec3::from_element(f32::INFINITY);
        let mut max = Vec3::from_element(f32::NEG_INFINITY);
        for (submesh, local_transform) in &self.submeshes {
            let scaled_center = submesh.bound_center.component_mul(&submesh.scale);
            let corners = BoundingBox::new(
                submesh.bound_extents.component_mul(&submesh.scale),
                world * local_transform * Mat4::new_translation(&scaled_center),
            )
            .corners();
            for corner in &corners {
                min = min.inf(corner);
                max = max.sup(corner);
            }
        }
        Some((min, max))
    }

    /// World-space box enclosing every submesh
    ///
    /// Axis-aligned in world space and conservative: the model is culled as
    /// a whole, so a straddling model keeps all of its submeshes.
    pub fn bbox(&self) -> BoundingBox {
        match self.world_bounds() {
            Some((min, max)) => {
                BoundingBox::new(max - min, Mat4::new_translation(&(0.5 * (min + max))))
            }
            None => BoundingBox::new(Vec3::zeros(), Mat4::new_translation(&self.position)),
        }
    }

    /// World-space sphere enclosing every submesh
    pub fn bsphere(&self) -> BoundingSphere {
        match self.world_bounds() {
            Some((min, max)) => BoundingSphere::new(0.5 * (max - min).magnitude(), 0.5 * (min + max)),
            None => BoundingSphere::new(0.0, self.position),
        }
    }
}

/// Anything that can be handed to the renderer's submit step
#[derive(Debug, Clone)]
pub enum Renderable {
    /// A single mesh
    Mesh(Mesh),
    /// A model flattened into submesh draw items at submission
    Model(Model),
}

impl Renderable {
    /// Whether this renderable is drawn at all
    pub fn visible(&self) -> bool {
        match self {
            Self::Mesh(mesh) => mesh.visible,
            Self::Model(model) => model.visible,
        }
    }

    /// Name for logs and debugging
    pub fn name(&self) -> &str {
        match self {
            Self::Mesh(mesh) => &mesh.name,
            Self::Model(model) => &model.name,
        }
    }

    /// World-space bounding box used for frustum culling
    pub fn bbox(&self) -> BoundingBox {
        match self {
            Self::Mesh(mesh) => mesh.bbox(),
            Self::Model(model) => model.bbox(),
        }
    }

    /// World-space bounding sphere used for frustum culling
    pub fn bsphere(&self) -> BoundingSphere {
        match self {
            Self::Mesh(mesh) => mesh.bsphere(),
            Self::Model(model) => model.bsphere(),
        }
    }
}
