//! Frame output.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ColorType, ImageEncoder, RgbImage};
use prism_renderer::FrameBuffer;

/// Write `frame` to `path`.
///
/// `.ppm` files are written as plain-text P3 pixmaps; any other extension is
/// handed to `image`, which picks the format from it.
pub fn write_frame(frame: &FrameBuffer, path: &Path, gamma: bool) -> Result<()> {
    let rgb = frame.to_rgb8(gamma);

    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let encoder = PnmEncoder::new(BufWriter::new(file))
            .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Ascii));
        encoder
            .write_image(&rgb, frame.width, frame.height, ColorType::Rgb8)
            .with_context(|| format!("writing {}", path.display()))?;
    } else {
        let image = RgbImage::from_raw(frame.width, frame.height, rgb)
            .context("frame buffer size does not match its resolution")?;
        image
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    log::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_renderer::Color;

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("prism_output_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_ppm_is_ascii_pixmap() {
        let mut frame = FrameBuffer::new(2, 1);
        frame.set(0, 0, Color::new(1.0, 0.5, 0.0));
        frame.set(1, 0, Color::new(2.0, -1.0, 0.25));

        let path = scratch("frame.ppm");
        write_frame(&frame, &path, false).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let tokens: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(tokens[0], "P3");
        assert_eq!(&tokens[1..4], ["2", "1", "255"]);
        let samples: Vec<u8> = tokens[4..].iter().map(|t| t.parse().unwrap()).collect();
        assert_eq!(samples, [255, 128, 0, 255, 0, 64]);
    }

    #[test]
    fn test_gamma_brightens_midtones() {
        let mut frame = FrameBuffer::new(1, 1);
        frame.set(0, 0, Color::splat(0.25));

        let path = scratch("gamma.ppm");
        write_frame(&frame, &path, true).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(text.split_whitespace().skip(4).all(|t| t == "128"));
    }

    #[test]
    fn test_png_by_extension() {
        let frame = FrameBuffer::new(3, 2);
        let path = scratch("frame.png");
        write_frame(&frame, &path, false).unwrap();
        let decoded = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();
        assert_eq!(decoded.dimensions(), (3, 2));
    }
}
