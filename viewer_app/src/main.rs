//! Frustum culling demo
//!
//! Scatters a ring of cubes around the origin, renders the scene headless
//! from a camera that only sees part of the ring, and prints how many draw
//! items the culling pass discarded.

use render_engine::prelude::*;

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let mut camera = Camera::perspective("main", Vec3::new(0.0, 4.0, 30.0), Vec3::zeros());
    camera.aspect = 800.0 / 600.0;
    scene.add_camera(camera);

    scene.add_light(
        Light::directional("sun", Vec3::new(-0.3, -1.0, -0.2))
            .with_color(Vec3::new(1.0, 0.96, 0.9)),
    );

    scene
}

fn cube_ring(count: usize, radius: f32) -> Vec<Renderable> {
    (0..count)
        .map(|index| {
            let angle = index as f32 / count as f32 * std::f32::consts::TAU;
            let mut mesh = Mesh::new(format!("cube_{index}"), "unit_cube");
            mesh.position = Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
            Renderable::Mesh(mesh)
        })
        .collect()
}

fn main() {
    env_logger::init();
    log::info!("Starting frustum culling demo");

    let scene = build_scene();
    let cubes = cube_ring(64, 60.0);
    let refs: Vec<&Renderable> = cubes.iter().collect();

    let mut renderer = MainRenderer::new();
    let mut ctx = RecordingContext::new(800, 600);

    for culling_geometry in [CullingGeometry::BoundingSphere, CullingGeometry::BoundingBox] {
        let options = RenderOptions {
            use_frustum_culling: true,
            culling_geometry,
            ..RenderOptions::default()
        };

        ctx.clear_commands();
        renderer.begin(&scene, options);
        renderer.submit(&scene, &refs);
        renderer.render(&mut ctx);

        let stats = renderer.stats();
        println!(
            "{culling_geometry}: {} of {} cubes culled, {} draw calls issued",
            stats.culled,
            stats.submitted,
            ctx.draw_count(PassKind::Opaque),
        );
        println!("  status: {}", renderer.status());
    }
}
