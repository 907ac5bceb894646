use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use image::{ImageError, ImageFormat, RgbImage};

use crate::config::IconConfig;
use crate::error::IconError;
use crate::font::load_font_or_fallback;
use crate::logger::log_line;
use crate::models::{FontKind, IconReport};

/// Top-left origin that centers a `text_width` x `text_height` box on a square canvas.
/// Uses floor division, so oversized text gets a negative origin.
pub fn centered_origin(canvas: u32, text_width: i32, text_height: i32) -> (i64, i64) {
    let c = canvas as i64;
    (
        (c - text_width as i64).div_euclid(2),
        (c - text_height as i64).div_euclid(2),
    )
}

/// Check that the PNG encoder is compiled in before anything touches the disk.
pub fn preflight() -> Result<(), IconError> {
    let probe = image::DynamicImage::ImageRgb8(RgbImage::new(1, 1));
    match probe.write_to(&mut Cursor::new(Vec::new()), ImageFormat::Png) {
        Ok(()) => Ok(()),
        Err(ImageError::Unsupported(_)) => Err(IconError::PngUnsupported),
        Err(e) => Err(e.into()),
    }
}

/// Render the labelled square into a canvas, without touching the disk.
pub fn render_icon(size: u32, config: &IconConfig) -> Result<(RgbImage, FontKind), IconError> {
    if size == 0 {
        return Err(IconError::InvalidSize(size));
    }
    let mut canvas = RgbImage::from_pixel(size, size, config.background);

    let mut font = load_font_or_fallback(size / 3, &config.font_file);
    let text = font.rasterize(&config.label);
    let bbox = text.bbox();
    let origin = centered_origin(size, bbox.width(), bbox.height());
    text.draw(&mut canvas, origin, config.foreground);

    Ok((canvas, font.kind()))
}

/// Render, save as PNG and report one icon on `out`.
pub fn create_icon(
    size: u32,
    path: &Path,
    config: &IconConfig,
    out: &mut dyn Write,
) -> Result<IconReport, IconError> {
    let (canvas, font) = render_icon(size, config)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    canvas
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| IconError::Write { path: path.to_path_buf(), source })?;

    writeln!(out, "Created {} ({}x{})", path.display(), size, size)?;
    log_line(&format!("Created {} ({}x{}, {:?} font)", path.display(), size, size, font));
    Ok(IconReport { path: path.to_path_buf(), size, font })
}

/// Generate every configured icon in order; the first failure aborts the rest.
pub fn generate_all(
    config: &IconConfig,
    out: &mut dyn Write,
) -> Result<Vec<IconReport>, IconError> {
    config
        .targets
        .iter()
        .map(|target| create_icon(target.size, &config.target_path(target), config, &mut *out))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::any_system_font;
    use crate::models::IconTarget;
    use image::Rgb;
    use std::io;

    fn fallback_config(dir: &Path) -> IconConfig {
        IconConfig {
            font_file: "no-such-font-waicons.ttf".to_string(),
            output_dir: dir.to_path_buf(),
            ..IconConfig::default()
        }
    }

    #[test]
    fn test_centered_origin() {
        assert_eq!(centered_origin(16, 11, 7), (2, 4));
        assert_eq!(centered_origin(48, 11, 7), (18, 20));
        assert_eq!(centered_origin(16, 0, 0), (8, 8));
        assert_eq!(centered_origin(4, 11, 7), (-4, -2));
    }

    #[test]
    fn test_preflight() {
        assert!(preflight().is_ok());
    }

    #[test]
    fn test_generate_all_sizes() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = fallback_config(tmp.path());
        let reports = generate_all(&cfg, &mut io::sink()).unwrap();
        assert_eq!(reports.len(), 3);

        for (report, size) in reports.iter().zip([16u32, 48, 128]) {
            assert_eq!(report.size, size);
            assert_eq!(report.font, FontKind::Fallback);
            assert_eq!(report.path, tmp.path().join(format!("icon{}.png", size)));

            let img = image::open(&report.path).unwrap().to_rgb8();
            assert_eq!(img.dimensions(), (size, size));
            assert_eq!(*img.get_pixel(0, 0), Rgb([0x25, 0xd3, 0x66]));
            assert_eq!(*img.get_pixel(size - 1, size - 1), Rgb([0x25, 0xd3, 0x66]));
            assert!(img.pixels().any(|p| *p == Rgb([255, 255, 255])));
        }
    }

    #[test]
    fn test_fallback_label_is_centered() {
        let cfg = fallback_config(Path::new("unused"));
        let (canvas, font) = render_icon(16, &cfg).unwrap();
        assert_eq!(font, FontKind::Fallback);
        // "WA" is 11x7 in the built-in font, so it lands at (2, 4)
        let white = Rgb([255, 255, 255]);
        assert_eq!(*canvas.get_pixel(2, 4), white);
        assert_eq!(*canvas.get_pixel(1, 4), cfg.background);
        assert_eq!(*canvas.get_pixel(2, 3), cfg.background);
        assert!(canvas.enumerate_pixels().filter(|(_, _, p)| **p == white).all(|(x, y, _)| {
            (2..13).contains(&x) && (4..11).contains(&y)
        }));
    }

    #[test]
    fn test_scalable_label_is_drawn_inside_canvas() {
        let Some(font) = any_system_font() else {
            eprintln!("no scalable system font installed, skipping");
            return;
        };
        let cfg = IconConfig {
            font_file: font.to_string_lossy().into_owned(),
            ..IconConfig::default()
        };
        for size in [16u32, 48, 128] {
            let (canvas, kind) = render_icon(size, &cfg).unwrap();
            assert_eq!(kind, FontKind::Scalable);
            assert_eq!(canvas.dimensions(), (size, size));
            assert_eq!(*canvas.get_pixel(0, 0), cfg.background);
            assert_eq!(*canvas.get_pixel(size - 1, size - 1), cfg.background);

            let inked: Vec<(u32, u32)> = canvas
                .enumerate_pixels()
                .filter(|(_, _, p)| **p != cfg.background)
                .map(|(x, y, _)| (x, y))
                .collect();
            assert!(!inked.is_empty(), "no label ink at {}px", size);
            // ink sits around the middle, not along an edge
            let min_x = inked.iter().map(|p| p.0).min().unwrap();
            let max_x = inked.iter().map(|p| p.0).max().unwrap();
            assert!(min_x > 0 && max_x < size - 1);
            assert!((min_x + max_x) / 2 >= size / 4 && (min_x + max_x) / 2 <= size * 3 / 4);
        }
    }

    #[test]
    fn test_create_icon_reports_on_output() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = fallback_config(tmp.path());
        let path = tmp.path().join("icon16.png");
        let mut out = Vec::new();
        create_icon(16, &path, &cfg, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, format!("Created {} (16x16)\n", path.display()));
    }

    #[test]
    fn test_rerun_overwrites_identically() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = fallback_config(tmp.path());
        let path = tmp.path().join("icon48.png");
        create_icon(48, &path, &cfg, &mut io::sink()).unwrap();
        let first = fs::read(&path).unwrap();
        create_icon(48, &path, &cfg, &mut io::sink()).unwrap();
        assert_eq!(first, fs::read(&path).unwrap());
    }

    #[test]
    fn test_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = fallback_config(tmp.path());
        let path = tmp.path().join("nested/deeper/icon16.png");
        let report = create_icon(16, &path, &cfg, &mut io::sink()).unwrap();
        assert!(report.path.is_file());
        assert_eq!(image::open(&path).unwrap().to_rgb8().dimensions(), (16, 16));
    }

    #[test]
    fn test_zero_size_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = IconConfig {
            targets: vec![IconTarget::new(0, "icon0.png")],
            ..fallback_config(tmp.path())
        };
        assert!(matches!(generate_all(&cfg, &mut io::sink()), Err(IconError::InvalidSize(0))));
        assert!(!tmp.path().join("icon0.png").exists());
    }

    #[test]
    fn test_failure_aborts_remaining() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = IconConfig {
            targets: vec![
                IconTarget::new(16, "a.png"),
                IconTarget::new(0, "b.png"),
                IconTarget::new(48, "c.png"),
            ],
            ..fallback_config(tmp.path())
        };
        assert!(generate_all(&cfg, &mut io::sink()).is_err());
        assert!(tmp.path().join("a.png").exists());
        assert!(!tmp.path().join("c.png").exists());
    }
}
