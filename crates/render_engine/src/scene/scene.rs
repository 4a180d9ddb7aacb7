//! Scene container: cameras, lights, renderables and environment resources
//!
//! The scene owns everything the renderer reads. Cameras and lights are
//! stored behind generational handles so render options can reference them
//! without borrowing the scene; stale handles resolve to `None` instead of
//! aliasing a newer object.
//!
//! Error handling follows two deliberate tiers. Adding under a duplicate
//! name, or switching to a name that does not exist, logs a warning and
//! keeps the scene usable. The `current_camera`/`main_light` accessors
//! instead panic when nothing is selected: calling them without having added
//! a camera or light is a programming error in the calling code, not a
//! runtime condition to limp through.

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use crate::scene::camera::Camera;
use crate::scene::environment::{Fog, Skybox};
use crate::scene::light::{Light, LightType};
use crate::scene::renderable::Renderable;

new_key_type! {
    /// Handle to a camera stored in a [`Scene`]
    pub struct CameraHandle;

    /// Handle to a light stored in a [`Scene`]
    pub struct LightHandle;
}

/// Container for all objects the renderer draws from
#[derive(Default)]
pub struct Scene {
    cameras: SlotMap<CameraHandle, Camera>,
    camera_names: HashMap<String, CameraHandle>,
    current_camera: Option<CameraHandle>,

    lights: SlotMap<LightHandle, Light>,
    light_names: HashMap<String, LightHandle>,
    main_light: Option<LightHandle>,

    renderables: Vec<Renderable>,

    fog: Option<Fog>,
    skybox: Option<Skybox>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a camera to the scene
    ///
    /// The first camera added becomes the current camera. Adding under a
    /// name that already exists logs a warning and replaces the previous
    /// camera; the returned handle always refers to the new one.
    pub fn add_camera(&mut self, camera: Camera) -> CameraHandle {
        if let Some(previous) = self.camera_names.remove(&camera.name) {
            log::warn!(
                "Adding a camera with the name '{}' that already exists; deleting the previous one",
                camera.name
            );
            self.cameras.remove(previous);
            if self.current_camera == Some(previous) {
                self.current_camera = None;
            }
        }

        let name = camera.name.clone();
        let handle = self.cameras.insert(camera);
        self.camera_names.insert(name, handle);
        if self.current_camera.is_none() {
            self.current_camera = Some(handle);
        }
        handle
    }

    /// Add a light to the scene
    ///
    /// The first light added becomes the main light. Duplicate names replace
    /// the previous light with a warning, like [`Self::add_camera`].
    pub fn add_light(&mut self, light: Light) -> LightHandle {
        if let Some(previous) = self.light_names.remove(&light.name) {
            log::warn!(
                "Adding a light with the name '{}' that already exists; deleting the previous one",
                light.name
            );
            self.lights.remove(previous);
            if self.main_light == Some(previous) {
                self.main_light = None;
            }
        }

        let name = light.name.clone();
        let handle = self.lights.insert(light);
        self.light_names.insert(name, handle);
        if self.main_light.is_none() {
            self.main_light = Some(handle);
        }
        handle
    }

    /// Add a renderable to the scene, returning a reference for further
    /// tweaking
    pub fn add_renderable(&mut self, renderable: Renderable) -> &mut Renderable {
        self.renderables.push(renderable);
        let index = self.renderables.len() - 1;
        &mut self.renderables[index]
    }

    /// Switch the current camera by name; warns and keeps the previous
    /// selection if no camera has that name
    pub fn change_to_camera(&mut self, name: &str) {
        match self.camera_names.get(name) {
            Some(handle) => self.current_camera = Some(*handle),
            None => log::warn!("Cannot change to camera '{name}': no camera with that name"),
        }
    }

    /// Switch the main light by name; warns and keeps the previous selection
    /// if no light has that name
    pub fn change_main_light(&mut self, name: &str) {
        match self.light_names.get(name) {
            Some(handle) => self.main_light = Some(*handle),
            None => log::warn!("Cannot change main light to '{name}': no light with that name"),
        }
    }

    /// Resolve a camera handle
    pub fn camera(&self, handle: CameraHandle) -> Option<&Camera> {
        self.cameras.get(handle)
    }

    /// Mutable access to a camera through its handle
    pub fn camera_mut(&mut self, handle: CameraHandle) -> Option<&mut Camera> {
        self.cameras.get_mut(handle)
    }

    /// Resolve a light handle
    pub fn light(&self, handle: LightHandle) -> Option<&Light> {
        self.lights.get(handle)
    }

    /// Look up a camera handle by name
    pub fn camera_handle(&self, name: &str) -> Option<CameraHandle> {
        self.camera_names.get(name).copied()
    }

    /// Look up a light handle by name
    pub fn light_handle(&self, name: &str) -> Option<LightHandle> {
        self.light_names.get(name).copied()
    }

    /// Handle of the current camera, if any
    pub fn current_camera_handle(&self) -> Option<CameraHandle> {
        self.current_camera
    }

    /// Handle of the main light, if any
    pub fn main_light_handle(&self) -> Option<LightHandle> {
        self.main_light
    }

    /// The current camera
    ///
    /// # Panics
    ///
    /// Panics if no camera has been added to the scene. Use
    /// [`Self::current_camera_handle`] first when absence is an expected
    /// state.
    pub fn current_camera(&self) -> &Camera {
        let handle = self
            .current_camera
            .unwrap_or_else(|| panic!("Scene has no current camera"));
        &self.cameras[handle]
    }

    /// The main light
    ///
    /// # Panics
    ///
    /// Panics if no light has been added to the scene.
    pub fn main_light(&self) -> &Light {
        let handle = self
            .main_light
            .unwrap_or_else(|| panic!("Scene has no main light"));
        &self.lights[handle]
    }

    /// All renderables in insertion order
    pub fn renderables(&self) -> &[Renderable] {
        &self.renderables
    }

    /// Iterate over lights of one type
    pub fn lights_of_type(&self, light_type: LightType) -> impl Iterator<Item = &Light> {
        self.lights
            .values()
            .filter(move |light| light.light_type == light_type)
    }

    /// Number of cameras in the scene
    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    /// Number of lights in the scene
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Set or replace the fog resource
    pub fn set_fog(&mut self, fog: Fog) {
        self.fog = Some(fog);
    }

    /// Fog resource, if the scene has one
    pub fn fog(&self) -> Option<&Fog> {
        self.fog.as_ref()
    }

    /// Set or replace the skybox resource
    pub fn set_skybox(&mut self, skybox: Skybox) {
        self.skybox = Some(skybox);
    }

    /// Skybox resource, if the scene has one
    pub fn skybox(&self) -> Option<&Skybox> {
        self.skybox.as_ref()
    }

    /// Update every camera's aspect ratio after a viewport resize
    pub fn resize(&mut self, width: u32, height: u32) {
        let aspect = width as f32 / height.max(1) as f32;
        for camera in self.cameras.values_mut() {
            camera.aspect = aspect;
        }
    }

    /// Remove every renderable while keeping cameras, lights and environment
    pub fn remove_all_renderables(&mut self) {
        self.renderables.clear();
    }

    /// Reset the scene to empty
    pub fn remove_all(&mut self) {
        self.cameras.clear();
        self.camera_names.clear();
        self.current_camera = None;
        self.lights.clear();
        self.light_names.clear();
        self.main_light = None;
        self.renderables.clear();
        self.fog = None;
        self.skybox = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn camera(name: &str) -> Camera {
        Camera::perspective(name, Vec3::new(0.0, 0.0, 10.0), Vec3::zeros())
    }

    #[test]
    fn test_first_camera_becomes_current() {
        let mut scene = Scene::new();
        scene.add_camera(camera("main"));
        scene.add_camera(camera("debug"));

        assert_eq!(scene.current_camera().name, "main");
    }

    #[test]
    fn test_duplicate_camera_name_replaces_previous() {
        let mut scene = Scene::new();
        let old = scene.add_camera(camera("main"));
        let new = scene.add_camera(camera("main"));

        assert_eq!(scene.camera_count(), 1);
        assert!(scene.camera(old).is_none());
        assert!(scene.camera(new).is_some());
    }

    #[test]
    fn test_change_to_unknown_camera_keeps_selection() {
        let mut scene = Scene::new();
        scene.add_camera(camera("main"));
        scene.change_to_camera("does-not-exist");

        assert_eq!(scene.current_camera().name, "main");
    }

    #[test]
    fn test_change_to_camera_switches_selection() {
        let mut scene = Scene::new();
        scene.add_camera(camera("main"));
        scene.add_camera(camera("debug"));
        scene.change_to_camera("debug");

        assert_eq!(scene.current_camera().name, "debug");
    }

    #[test]
    #[should_panic(expected = "no current camera")]
    fn test_current_camera_panics_on_empty_scene() {
        let scene = Scene::new();
        let _ = scene.current_camera();
    }

    #[test]
    #[should_panic(expected = "no main light")]
    fn test_main_light_panics_on_empty_scene() {
        let scene = Scene::new();
        let _ = scene.main_light();
    }

    #[test]
    fn test_first_light_becomes_main() {
        let mut scene = Scene::new();
        scene.add_light(Light::directional("sun", Vec3::new(0.0, -1.0, 0.0)));
        scene.add_light(Light::point("lamp", Vec3::new(1.0, 2.0, 3.0)));

        assert_eq!(scene.main_light().name, "sun");
    }

    #[test]
    fn test_lights_of_type_filters() {
        let mut scene = Scene::new();
        scene.add_light(Light::directional("sun", Vec3::new(0.0, -1.0, 0.0)));
        scene.add_light(Light::point("lamp", Vec3::new(1.0, 2.0, 3.0)));
        scene.add_light(Light::point("lamp2", Vec3::new(-1.0, 2.0, 3.0)));

        assert_eq!(scene.lights_of_type(LightType::Point).count(), 2);
        assert_eq!(scene.lights_of_type(LightType::Directional).count(), 1);
        assert_eq!(scene.lights_of_type(LightType::Spot).count(), 0);
    }

    #[test]
    fn test_stale_handle_resolves_to_none() {
        let mut scene = Scene::new();
        let handle = scene.add_camera(camera("main"));
        scene.remove_all();

        assert!(scene.camera(handle).is_none());
    }

    #[test]
    fn test_resize_updates_all_cameras() {
        let mut scene = Scene::new();
        let a = scene.add_camera(camera("main"));
        let b = scene.add_camera(camera("debug"));
        scene.resize(1600, 900);

        let expected = 16.0 / 9.0;
        assert!((scene.camera(a).map(|c| c.aspect).unwrap_or_default() - expected).abs() < 1e-6);
        assert!((scene.camera(b).map(|c| c.aspect).unwrap_or_default() - expected).abs() < 1e-6);
    }
}
