//! Render mode demo
//!
//! Builds a small tabletop scene with a shadow map, a skybox and a
//! transparent pane, then runs one headless frame in each render mode and
//! prints the command stream lengths.

use render_engine::prelude::*;

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let mut camera = Camera::perspective("main", Vec3::new(0.0, 3.0, 8.0), Vec3::zeros());
    camera.aspect = 800.0 / 600.0;
    scene.add_camera(camera);
    scene.add_light(Light::directional("sun", Vec3::new(-0.4, -1.0, -0.3)));
    scene.set_skybox(Skybox::new("dusk_cubemap"));
    scene.set_fog(Fog::default());

    scene
}

fn build_renderables() -> Vec<Renderable> {
    let mut table = Mesh::new("table", "table_top");
    table.scale = Vec3::new(6.0, 0.2, 4.0);
    table.mask_id = 1;

    let mut teapot = Model::new("teapot");
    teapot.position = Vec3::new(0.0, 0.6, 0.0);
    teapot.mask_id = 2;
    teapot.add_submesh(Mesh::new("body", "teapot_body"), Mat4::identity());
    teapot.add_submesh(
        Mesh::new("lid", "teapot_lid"),
        Mat4::new_translation(&Vec3::new(0.0, 0.5, 0.0)),
    );

    let mut pane = Mesh::new("pane", "glass_pane");
    pane.position = Vec3::new(1.5, 1.0, 1.0);
    pane.material.alpha = 0.4;
    pane.casts_shadows = false;
    pane.mask_id = 3;

    vec![
        Renderable::Mesh(table),
        Renderable::Model(teapot),
        Renderable::Mesh(pane),
    ]
}

fn main() {
    env_logger::init();
    log::info!("Starting render mode demo");

    let scene = build_scene();
    let renderables = build_renderables();
    let refs: Vec<&Renderable> = renderables.iter().collect();

    let mut renderer = MainRenderer::new();
    renderer.set_shadow_map(Some(ShadowMap::new(
        ShadowMapConfig::default(),
        FramebufferId(1),
    )));
    let mut ctx = RecordingContext::new(800, 600);

    for mode in [
        RenderMode::Normal,
        RenderMode::DepthOnly,
        RenderMode::SemanticOnly,
        RenderMode::NoSubmit,
    ] {
        let mut options = RenderOptions {
            mode,
            use_shadow_mapping: true,
            use_blending: true,
            use_skybox: true,
            use_fog: true,
            ..RenderOptions::default()
        };
        options.semantic_colors.insert(1, Vec3::new(0.8, 0.2, 0.2));
        options.semantic_colors.insert(2, Vec3::new(0.2, 0.8, 0.2));
        options.semantic_colors.insert(3, Vec3::new(0.2, 0.2, 0.8));

        ctx.clear_commands();
        renderer.begin(&scene, options);
        renderer.submit(&scene, &refs);
        renderer.render(&mut ctx);

        println!(
            "{mode}: {} commands recorded ({})",
            ctx.commands().len(),
            renderer.status(),
        );
    }
}
