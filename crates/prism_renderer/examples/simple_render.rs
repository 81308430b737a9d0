//! Simple photon-mapped render.
//!
//! A glass sphere over a matte floor with one light, rendered
//! progressively; the final frame is saved in PPM format.

use prism_core::Mesh;
use prism_renderer::{color_to_rgb, Camera, FrameBuffer, Material, PointLight, RenderConfig, Renderer, Scene, Vec3};
use std::convert::Infallible;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

fn main() {
    println!("Prism - Simple Example");
    println!("======================");

    let scene = build_scene();

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 0.5, 0.0), Vec3::Y)
        .with_fov(40.0);

    let mut config = RenderConfig {
        width: 320,
        height: 240,
        samples_per_pixel: 4,
        ..RenderConfig::default()
    };
    config.photons.photons_per_light = 50_000;
    config.photons.passes = 4;

    let renderer = Renderer::new(&scene, camera, config).expect("Failed to set up render");

    let start = std::time::Instant::now();
    let image = renderer
        .render_progressive(|report, _| {
            println!("Pass {}: {} photons stored", report.pass + 1, report.photons_stored);
            Ok::<(), Infallible>(())
        })
        .unwrap_or_else(|never| match never {});
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    save_ppm(&image, filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let floor = Mesh::quad(
        Vec3::new(-4.0, 0.0, 4.0),
        Vec3::new(4.0, 0.0, 4.0),
        Vec3::new(4.0, 0.0, -4.0),
        Vec3::new(-4.0, 0.0, -4.0),
    );
    scene.attach_mesh("floor", Arc::new(floor), Material::diffuse(Vec3::splat(0.8)), Vec3::ZERO);

    let ball = Mesh::uv_sphere(0.75, 48, 24);
    scene.attach_mesh(
        "ball",
        Arc::new(ball),
        Material::glass(Vec3::ONE, 1.5),
        Vec3::new(0.0, 0.75, 0.0),
    );

    scene.add_light(PointLight::new(Vec3::new(1.0, 4.0, 1.0), Vec3::ONE, 400.0));
    scene
}

fn save_ppm(image: &FrameBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for y in 0..image.height {
        for x in 0..image.width {
            let rgb = color_to_rgb(image.get(x, y), true);
            writeln!(writer, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
        }
    }

    Ok(())
}
