//! Built-in scenes.

use std::sync::Arc;

use prism_core::{Color, Material, Mesh, PointLight, Scene};
use prism_math::{UVec3, Vec3};
use prism_renderer::{Camera, RenderConfig};

/// Scenes the binary knows how to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenePreset {
    /// Walled room with coloured side walls, a glass lens sphere and two rods
    Lens,
    /// A white unit sphere lit from above and in front, viewed orthographically
    Sphere,
    /// A glass ball over a matte floor, for photon caustics
    Caustic,
}

/// Everything needed to start a render.
pub struct SceneSetup {
    pub scene: Scene,
    pub camera: Camera,
    pub config: RenderConfig,
}

impl ScenePreset {
    pub fn build(self) -> SceneSetup {
        match self {
            ScenePreset::Lens => build_lens(),
            ScenePreset::Sphere => build_sphere(),
            ScenePreset::Caustic => build_caustic(),
        }
    }
}

/// Several quads merged into one mesh.
fn panels(quads: &[[Vec3; 4]]) -> Mesh {
    let mut positions = Vec::with_capacity(quads.len() * 4);
    let mut faces = Vec::with_capacity(quads.len() * 2);
    for quad in quads {
        let base = positions.len() as u32;
        positions.extend_from_slice(quad);
        faces.push(UVec3::new(base, base + 1, base + 2));
        faces.push(UVec3::new(base, base + 2, base + 3));
    }
    Mesh::new(positions, faces)
}

fn wall_material(albedo: Color) -> Material {
    Material::diffuse(albedo)
        .with_roughness(0.7)
        .with_gloss(0.0, 0.0)
        .with_light_reflection(0.75)
}

fn build_lens() -> SceneSetup {
    const HALF_WIDTH: f32 = 4.0;
    const FLOOR: f32 = -4.0;
    const CEILING: f32 = 4.0;
    const BACK: f32 = -8.0;
    const FRONT: f32 = 5.0;

    let corner = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
    let (w, f, c) = (HALF_WIDTH, FLOOR, CEILING);

    let main_walls = panels(&[
        [corner(-w, f, FRONT), corner(w, f, FRONT), corner(w, f, BACK), corner(-w, f, BACK)],
        [corner(-w, c, BACK), corner(w, c, BACK), corner(w, c, FRONT), corner(-w, c, FRONT)],
        [corner(-w, f, BACK), corner(w, f, BACK), corner(w, c, BACK), corner(-w, c, BACK)],
        [corner(w, f, FRONT), corner(-w, f, FRONT), corner(-w, c, FRONT), corner(w, c, FRONT)],
    ]);
    let left_wall = panels(&[[corner(-w, f, BACK), corner(-w, c, BACK), corner(-w, c, FRONT), corner(-w, f, FRONT)]]);
    let right_wall = panels(&[[corner(w, f, FRONT), corner(w, c, FRONT), corner(w, c, BACK), corner(w, f, BACK)]]);

    let lens = Material::glass(Color::new(0.97, 1.0, 0.95), 1.52).with_roughness(0.05);
    let rod = Arc::new(Mesh::cuboid(Vec3::new(-2.5, -0.2, -0.2), Vec3::new(2.5, 0.2, 0.2)));

    let mut scene = Scene::new();
    scene.attach_mesh("walls_main", Arc::new(main_walls), wall_material(Color::splat(0.9)), Vec3::ZERO);
    scene.attach_mesh("walls_left", Arc::new(left_wall), wall_material(Color::new(0.0, 0.9, 0.0)), Vec3::ZERO);
    scene.attach_mesh("walls_right", Arc::new(right_wall), wall_material(Color::new(0.9, 0.0, 0.0)), Vec3::ZERO);
    scene.attach_mesh("lens", Arc::new(Mesh::uv_sphere(1.0, 64, 32)), lens, Vec3::new(0.0, 0.0, -2.0));
    scene.attach_mesh(
        "rod",
        rod.clone(),
        Material::diffuse(Color::new(1.0, 0.6, 0.6)).with_roughness(0.3),
        Vec3::new(0.0, -2.0, -2.5),
    );
    scene.attach_mesh(
        "rod2",
        rod,
        Material::diffuse(Color::new(0.4, 0.5, 1.0)).with_roughness(0.3),
        Vec3::new(0.0, 0.0, -3.5),
    );
    scene.add_light(PointLight::new(Vec3::new(0.0, 3.5, -2.0), Color::ONE, 600.0));

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_fov(90.0)
        .with_clip(0.01, 1000.0);

    SceneSetup {
        scene,
        camera,
        config: RenderConfig::default(),
    }
}

fn build_sphere() -> SceneSetup {
    let mut scene = Scene::new();
    scene.attach_mesh(
        "sphere",
        Arc::new(Mesh::uv_sphere(1.0, 64, 32)),
        Material::diffuse(Color::ONE).with_roughness(0.0),
        Vec3::ZERO,
    );
    scene.add_light(PointLight::new(Vec3::new(0.0, 3.0, 1.0), Color::ONE, 300.0));

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Vec3::Y)
        .with_orthographic(2.4)
        .with_jitter(false);

    let mut config = RenderConfig {
        width: 256,
        height: 256,
        samples_per_pixel: 1,
        ..RenderConfig::default()
    };
    config.photons.passes = 0;

    SceneSetup { scene, camera, config }
}

fn build_caustic() -> SceneSetup {
    let mut scene = Scene::new();
    let floor = Mesh::quad(
        Vec3::new(-6.0, 0.0, 6.0),
        Vec3::new(6.0, 0.0, 6.0),
        Vec3::new(6.0, 0.0, -6.0),
        Vec3::new(-6.0, 0.0, -6.0),
    );
    scene.attach_mesh("floor", Arc::new(floor), wall_material(Color::splat(0.8)), Vec3::ZERO);
    scene.attach_mesh(
        "ball",
        Arc::new(Mesh::uv_sphere(0.8, 64, 32)),
        Material::glass(Color::ONE, 1.5),
        Vec3::new(0.0, 1.2, 0.0),
    );
    scene.add_light(PointLight::new(Vec3::new(0.5, 5.0, 0.5), Color::ONE, 800.0));

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 3.5, 5.0), Vec3::new(0.0, 0.5, 0.0), Vec3::Y)
        .with_fov(45.0);

    let mut config = RenderConfig {
        width: 480,
        height: 360,
        ..RenderConfig::default()
    };
    config.photons.passes = 16;

    SceneSetup { scene, camera, config }
}
