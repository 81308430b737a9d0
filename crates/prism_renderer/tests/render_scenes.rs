//! Scene-level checks of the full render pipeline.

use std::f32::consts::PI;
use std::sync::Arc;

use prism_core::Mesh;
use prism_renderer::{
    Camera, Color, FrameBuffer, Material, PhotonConfig, PointLight, RenderConfig, Renderer, Scene, Vec3,
};

fn white_mirror_sphere() -> Material {
    Material::diffuse(Color::ONE).with_roughness(0.0)
}

fn config(width: u32, height: u32, samples: u32) -> RenderConfig {
    RenderConfig {
        width,
        height,
        samples_per_pixel: samples,
        bucket_size: 4,
        ..RenderConfig::default()
    }
}

fn direct(scene: &Scene, camera: Camera, config: RenderConfig) -> FrameBuffer {
    Renderer::new(scene, camera, config).unwrap().render_direct()
}

#[test]
fn test_unit_sphere_lit_from_above_front() {
    let mut scene = Scene::new();
    scene.attach_mesh(
        "sphere",
        Arc::new(Mesh::uv_sphere(1.0, 64, 32)),
        white_mirror_sphere(),
        Vec3::ZERO,
    );
    scene.add_light(PointLight::new(Vec3::new(0.0, 3.0, 1.0), Vec3::ONE, 300.0));

    // Orthographic rays along +z; rows 1 and 9 pass through y = 0.8 and y = -0.8
    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Vec3::Y)
        .with_orthographic(2.2)
        .with_jitter(false);
    let frame = direct(&scene, camera, config(11, 11, 1));

    let top = frame.get(5, 1);
    let bottom = frame.get(5, 9);
    assert!(top.x > 0.0, "top = {top:?}");
    assert_eq!(bottom, Color::ZERO);
}

#[test]
fn test_brightness_falls_off_from_pole() {
    let mut scene = Scene::new();
    scene.attach_mesh(
        "sphere",
        Arc::new(Mesh::uv_sphere(1.0, 96, 48)),
        white_mirror_sphere(),
        Vec3::ZERO,
    );
    let light = Vec3::new(0.0, 10.0, 0.0);
    scene.add_light(PointLight::new(light, Vec3::ONE, 1000.0));

    // Looking straight down at the pole
    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::Z)
        .with_orthographic(2.2)
        .with_jitter(false);
    let frame = direct(&scene, camera, config(11, 11, 1));

    let mut previous = f32::INFINITY;
    for i in 5..10 {
        let value = frame.get(i, 5).x;
        assert!(value < previous, "pixel {i}: {value} >= {previous}");
        previous = value;

        // Lambert facing ratio over pi with inverse-square falloff
        let offset = (i - 5) as f32 * 0.2;
        let point = Vec3::new(offset, (1.0 - offset * offset).sqrt(), 0.0);
        let to_light = light - point;
        let d = to_light.length();
        let facing = point.dot(to_light) / d;
        let expected = 1000.0 * facing / (4.0 * PI * d * d) / PI;
        assert!(
            (value - expected).abs() < expected * 0.05,
            "pixel {i}: {value} vs {expected}"
        );
    }
}

fn shadow_scene(with_occluder: bool) -> Scene {
    let mut scene = Scene::new();
    let floor = Mesh::quad(
        Vec3::new(-5.0, 0.0, 5.0),
        Vec3::new(5.0, 0.0, 5.0),
        Vec3::new(5.0, 0.0, -5.0),
        Vec3::new(-5.0, 0.0, -5.0),
    );
    let matte = Material::diffuse(Color::ONE).with_light_reflection(0.0);
    scene.attach_mesh("floor", Arc::new(floor), matte, Vec3::ZERO);

    if with_occluder {
        let blocker = Mesh::quad(
            Vec3::new(-2.0, 1.0, 2.0),
            Vec3::new(2.0, 1.0, 2.0),
            Vec3::new(2.0, 1.0, -2.0),
            Vec3::new(-2.0, 1.0, -2.0),
        );
        scene.attach_mesh("blocker", Arc::new(blocker), matte, Vec3::ZERO);
    }

    scene.add_light(PointLight::new(Vec3::new(0.3, 3.0, 0.1), Vec3::ONE, 100.0));
    scene
}

#[test]
fn test_point_behind_occluder_is_black() {
    // The camera looks under the blocker at the floor point below the light
    let camera = || {
        Camera::new()
            .with_position(Vec3::new(0.3, 0.5, 4.1), Vec3::new(0.3, 0.0, 0.1), Vec3::Y)
            .with_fov(5.0)
            .with_jitter(false)
    };

    let lit = direct(&shadow_scene(false), camera(), config(3, 3, 1));
    let shadowed = direct(&shadow_scene(true), camera(), config(3, 3, 1));

    assert!(lit.get(1, 1).x > 0.0);
    assert_eq!(shadowed.get(1, 1), Color::ZERO);
}

fn room() -> Scene {
    let mut scene = Scene::new();
    let walls = Mesh::cuboid(Vec3::new(-2.0, -1.0, -4.0), Vec3::new(2.0, 3.0, 1.0));
    scene.attach_mesh("room", Arc::new(walls), Material::default(), Vec3::ZERO);

    let glass = Material::glass(Vec3::new(0.97, 1.0, 0.95), 1.52).with_roughness(0.05);
    scene.attach_mesh(
        "ball",
        Arc::new(Mesh::uv_sphere(0.6, 32, 16)),
        glass,
        Vec3::new(0.0, -0.4, -2.0),
    );
    scene.add_light(PointLight::new(Vec3::new(0.0, 2.5, -2.0), Vec3::ONE, 200.0));
    scene
}

fn room_camera() -> Camera {
    Camera::new()
        .with_position(Vec3::new(0.0, 0.5, 0.5), Vec3::new(0.0, 0.0, -2.0), Vec3::Y)
        .with_fov(70.0)
}

#[test]
fn test_same_seed_is_bit_identical() {
    let scene = room();
    let mut cfg = config(16, 12, 3);
    cfg.seed = 1234;

    let a = direct(&scene, room_camera(), cfg.clone());
    let b = direct(&scene, room_camera(), cfg.clone());
    assert_eq!(a, b);

    // Scheduling does not matter either
    let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    let c = pool.install(|| direct(&scene, room_camera(), cfg.clone()));
    assert_eq!(a, c);

    cfg.seed = 4321;
    let d = direct(&scene, room_camera(), cfg);
    assert_ne!(a, d);
}

#[test]
fn test_progressive_adds_photon_light() {
    let scene = room();
    let mut cfg = config(12, 9, 2);
    cfg.photons = PhotonConfig {
        photons_per_light: 4000,
        passes: 3,
        ..PhotonConfig::default()
    };
    let renderer = Renderer::new(&scene, room_camera(), cfg).unwrap();

    let mut first: Option<FrameBuffer> = None;
    let mut passes = 0;
    let last = renderer
        .render_progressive(|report, frame| {
            passes += 1;
            assert_eq!(report.photons_emitted, 4000);
            assert!(report.photons_stored > 0);
            if first.is_none() {
                first = Some(frame.clone());
            }
            Ok::<(), ()>(())
        })
        .unwrap();

    assert_eq!(passes, 3);
    assert!(last.pixels.iter().all(|c| c.is_finite() && c.min_element() >= 0.0));
    assert!(last.pixels.iter().any(|c| c.max_element() > 0.0));
    assert_ne!(first.unwrap(), last);
}

#[test]
fn test_direct_light_is_not_counted_twice() {
    // Floor point 3 units below the light
    let camera = Camera::new()
        .with_position(Vec3::new(0.3, 0.5, 4.1), Vec3::new(0.3, 0.0, 0.1), Vec3::Y)
        .with_fov(5.0)
        .with_jitter(false);
    let mut cfg = config(3, 3, 1);
    cfg.photons = PhotonConfig {
        photons_per_light: 20_000,
        passes: 3,
        ..PhotonConfig::default()
    };

    let scene = shadow_scene(false);
    let renderer = Renderer::new(&scene, camera, cfg).unwrap();
    let direct = renderer.render_direct().get(1, 1).x;
    let progressive = renderer
        .render_progressive(|_, _| Ok::<(), ()>(()))
        .unwrap()
        .get(1, 1)
        .x;

    let expected = 100.0 / (4.0 * PI * 9.0) / PI;
    assert!((direct - expected).abs() < expected * 0.01, "direct {direct} vs {expected}");
    assert!(
        (progressive - direct).abs() < direct * 0.02,
        "progressive {progressive} vs direct {direct}"
    );
}

#[test]
fn test_search_radius_shrinks_across_passes() {
    // A wall bounces light onto the matte floor
    let mut scene = shadow_scene(false);
    let wall = Mesh::quad(
        Vec3::new(-5.0, 0.0, -2.0),
        Vec3::new(5.0, 0.0, -2.0),
        Vec3::new(5.0, 4.0, -2.0),
        Vec3::new(-5.0, 4.0, -2.0),
    );
    scene.attach_mesh("wall", Arc::new(wall), Material::default(), Vec3::ZERO);
    scene.add_light(PointLight::new(Vec3::new(-1.0, 2.0, -1.0), Vec3::ONE, 50.0));

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 3.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_fov(40.0);
    let mut cfg = config(8, 8, 1);
    cfg.photons = PhotonConfig {
        photons_per_light: 3000,
        passes: 6,
        ..PhotonConfig::default()
    };
    let renderer = Renderer::new(&scene, camera, cfg).unwrap();

    let mut radii = Vec::new();
    renderer
        .render_progressive(|report, _| {
            radii.push(report.mean_radius);
            Ok::<(), ()>(())
        })
        .unwrap();

    assert_eq!(radii.len(), 6);
    assert!(radii[0] > 0.0);
    for pair in radii.windows(2) {
        assert!(pair[1] <= pair[0], "{radii:?}");
    }
}
