//! Draw item collection and render queue bucketing
//!
//! Submission happens in two steps. [`collect_draw_items`] flattens the
//! submitted renderables into a list of [`DrawItem`]s: meshes map one to
//! one, models expand into one item per visible submesh with the submesh
//! pose composed into world space. [`RenderQueue::build`] then buckets the
//! surviving items for the passes that consume them.

use crate::foundation::math::{Mat3, Mat4, Vec3};
use crate::scene::renderable::{Material, Mesh, Renderable};

/// A flattened, world-posed drawable produced from a submitted renderable
///
/// Items are owned snapshots: flattening never mutates the scene's meshes.
/// For submeshes, `rotation` holds the upper 3x3 of the composed world
/// matrix and can carry the parent model's scale folded in; `scale` keeps
/// only the submesh's own scale. The reconstructed model matrix stays
/// consistent with that convention. Culling happens per renderable before
/// flattening, so items carry no bounding volumes of their own.
#[derive(Debug, Clone)]
pub struct DrawItem {
    /// Name for logs and debugging
    pub name: String,
    /// Geometry buffer to draw
    pub geometry: String,
    /// Surface material
    pub material: Material,
    /// World-space position
    pub position: Vec3,
    /// World-space rotation (may include folded parent scale)
    pub rotation: Mat3,
    /// Per-axis scale
    pub scale: Vec3,
    /// Whether this item is drawn into the shadow map
    pub casts_shadows: bool,
    /// Id written to the semantic view
    pub mask_id: i32,
}

impl DrawItem {
    /// Snapshot a standalone mesh
    fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            name: mesh.name.clone(),
            geometry: mesh.geometry.clone(),
            material: mesh.material.clone(),
            position: mesh.position,
            rotation: mesh.rotation,
            scale: mesh.scale,
            casts_shadows: mesh.casts_shadows,
            mask_id: mesh.mask_id,
        }
    }

    /// Snapshot a submesh posed by its composed world transform
    ///
    /// Position comes from the translation column and rotation from the
    /// upper 3x3 of `world_transform`. The parent model's semantic mask id
    /// overrides the submesh's own.
    fn from_submesh(mesh: &Mesh, world_transform: &Mat4, mask_id: i32) -> Self {
        let position = Vec3::new(world_transform.m14, world_transform.m24, world_transform.m34);
        let rotation = world_transform.fixed_view::<3, 3>(0, 0).into_owned();
        Self {
            name: mesh.name.clone(),
            geometry: mesh.geometry.clone(),
            material: mesh.material.clone(),
            position,
            rotation,
            scale: mesh.scale,
            casts_shadows: mesh.casts_shadows,
            mask_id,
        }
    }

    /// Model matrix: translation, then rotation, then scale
    pub fn mat_model(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Flatten submitted renderables into world-posed draw items
///
/// Invisible renderables are skipped entirely; invisible submeshes of a
/// visible model are skipped individually. Submesh world pose is
/// `model.mat_model() * local_transform`, and the parent model's mask id is
/// propagated to every emitted submesh item.
pub fn collect_draw_items(renderables: &[&Renderable]) -> Vec<DrawItem> {
    let mut items = Vec::new();
    for renderable in renderables {
        if !renderable.visible() {
            continue;
        }
        match renderable {
            Renderable::Mesh(mesh) => items.push(DrawItem::from_mesh(mesh)),
            Renderable::Model(model) => {
                let model_world = model.mat_model();
                for (submesh, local_transform) in &model.submeshes {
                    if !submesh.visible {
                        continue;
                    }
                    let world = model_world * local_transform;
                    items.push(DrawItem::from_submesh(submesh, &world, model.mask_id));
                }
            }
        }
    }
    items
}

/// Per-frame buckets of draw items, ready for the render passes
///
/// Shadow casters are taken from the pre-cull visible set, because casters
/// behind the camera can still throw shadows into view. The shaded buckets
/// come from the post-cull in-view set. Indices point into the respective
/// list the bucket was built from. Transparent items are ordered farthest
/// from the camera first so blending composites back to front.
#[derive(Debug, Default)]
pub struct RenderQueue {
    /// Indices into the visible set: items drawn into the shadow map
    pub shadow_casters: Vec<usize>,
    /// Indices into the in-view set: items drawn in the opaque pass
    pub opaque: Vec<usize>,
    /// Indices into the in-view set: transparent pass, back to front
    pub transparent: Vec<usize>,
}

impl RenderQueue {
    /// Bucket the frame's items
    ///
    /// With blending disabled every in-view item goes to the opaque bucket
    /// regardless of material alpha.
    pub fn build(
        visible: &[DrawItem],
        in_view: &[DrawItem],
        camera_position: Vec3,
        use_blending: bool,
    ) -> Self {
        let mut queue = Self::default();
        for (index, item) in visible.iter().enumerate() {
            if item.casts_shadows {
                queue.shadow_casters.push(index);
            }
        }
        for (index, item) in in_view.iter().enumerate() {
            if use_blending && item.material.is_transparent() {
                queue.transparent.push(index);
            } else {
                queue.opaque.push(index);
            }
        }

        queue.transparent.sort_by(|a, b| {
            let da = (in_view[*a].position - camera_position).magnitude_squared();
            let db = (in_view[*b].position - camera_position).magnitude_squared();
            db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
        });

        queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::renderable::Model;
    use approx::assert_relative_eq;

    fn mesh_at(name: &str, position: Vec3) -> Mesh {
        let mut mesh = Mesh::new(name, format!("{name}_geometry"));
        mesh.position = position;
        mesh
    }

    #[test]
    fn test_invisible_mesh_is_skipped() {
        let mut mesh = mesh_at("hidden", Vec3::zeros());
        mesh.visible = false;
        let renderable = Renderable::Mesh(mesh);

        let items = collect_draw_items(&[&renderable]);
        assert!(items.is_empty());
    }

    #[test]
    fn test_model_flattens_to_world_posed_submeshes() {
        let mut model = Model::new("pair");
        model.position = Vec3::new(10.0, 0.0, 0.0);
        model.add_submesh(
            mesh_at("left", Vec3::zeros()),
            Mat4::new_translation(&Vec3::new(-1.0, 0.0, 0.0)),
        );
        model.add_submesh(
            mesh_at("right", Vec3::zeros()),
            Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0)),
        );
        let renderable = Renderable::Model(model);

        let items = collect_draw_items(&[&renderable]);

        assert_eq!(items.len(), 2);
        assert_relative_eq!(items[0].position, Vec3::new(9.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(items[1].position, Vec3::new(11.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_model_mask_id_propagates_to_submeshes() {
        let mut model = Model::new("masked");
        model.mask_id = 7;
        let mut submesh = mesh_at("part", Vec3::zeros());
        submesh.mask_id = 3;
        model.add_submesh(submesh, Mat4::identity());
        let renderable = Renderable::Model(model);

        let items = collect_draw_items(&[&renderable]);
        assert_eq!(items[0].mask_id, 7);
    }

    #[test]
    fn test_invisible_submesh_is_skipped() {
        let mut model = Model::new("partial");
        let mut hidden = mesh_at("hidden", Vec3::zeros());
        hidden.visible = false;
        model.add_submesh(hidden, Mat4::identity());
        model.add_submesh(mesh_at("shown", Vec3::zeros()), Mat4::identity());
        let renderable = Renderable::Model(model);

        let items = collect_draw_items(&[&renderable]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "shown");
    }

    #[test]
    fn test_submesh_rotation_folds_model_scale() {
        let mut model = Model::new("scaled");
        model.scale = Vec3::new(2.0, 2.0, 2.0);
        model.add_submesh(
            mesh_at("part", Vec3::zeros()),
            Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0)),
        );
        let renderable = Renderable::Model(model);

        let items = collect_draw_items(&[&renderable]);

        // Local offset is scaled by the model, and the scale lands in the
        // item's rotation matrix rather than its scale field.
        assert_relative_eq!(items[0].position, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(items[0].rotation.m11, 2.0, epsilon = 1e-6);
        assert_relative_eq!(items[0].scale, Vec3::new(1.0, 1.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_queue_separates_transparent_and_sorts_back_to_front() {
        let mut near = mesh_at("near", Vec3::new(0.0, 0.0, 1.0));
        near.material.alpha = 0.5;
        let mut far = mesh_at("far", Vec3::new(0.0, 0.0, 8.0));
        far.material.alpha = 0.5;
        let solid = mesh_at("solid", Vec3::new(0.0, 0.0, 4.0));

        let renderables = [
            Renderable::Mesh(near),
            Renderable::Mesh(far),
            Renderable::Mesh(solid),
        ];
        let refs: Vec<&Renderable> = renderables.iter().collect();
        let items = collect_draw_items(&refs);

        // Camera sits at z = 0: "far" must be drawn before "near".
        let queue = RenderQueue::build(&items, &items, Vec3::zeros(), true);

        assert_eq!(queue.opaque.len(), 1);
        assert_eq!(queue.transparent.len(), 2);
        assert_eq!(items[queue.transparent[0]].name, "far");
        assert_eq!(items[queue.transparent[1]].name, "near");
    }

    #[test]
    fn test_blending_disabled_keeps_everything_opaque() {
        let mut glassy = mesh_at("glassy", Vec3::zeros());
        glassy.material.alpha = 0.3;
        let renderable = Renderable::Mesh(glassy);

        let items = collect_draw_items(&[&renderable]);
        let queue = RenderQueue::build(&items, &items, Vec3::zeros(), false);

        assert_eq!(queue.opaque.len(), 1);
        assert!(queue.transparent.is_empty());
    }

    #[test]
    fn test_shadow_bucket_honors_casts_shadows_flag() {
        let caster = mesh_at("caster", Vec3::zeros());
        let mut no_shadow = mesh_at("no_shadow", Vec3::zeros());
        no_shadow.casts_shadows = false;

        let renderables = [Renderable::Mesh(caster), Renderable::Mesh(no_shadow)];
        let refs: Vec<&Renderable> = renderables.iter().collect();
        let items = collect_draw_items(&refs);
        let queue = RenderQueue::build(&items, &items, Vec3::zeros(), false);

        assert_eq!(queue.shadow_casters.len(), 1);
        assert_eq!(items[queue.shadow_casters[0]].name, "caster");
    }

    #[test]
    fn test_shadow_casters_come_from_visible_set() {
        let caster = mesh_at("offscreen_caster", Vec3::new(50.0, 0.0, 0.0));
        let renderables = [Renderable::Mesh(caster)];
        let refs: Vec<&Renderable> = renderables.iter().collect();
        let visible = collect_draw_items(&refs);

        // Culled from view entirely, but still a shadow caster.
        let queue = RenderQueue::build(&visible, &[], Vec3::zeros(), false);

        assert_eq!(queue.shadow_casters.len(), 1);
        assert!(queue.opaque.is_empty());
    }
}
