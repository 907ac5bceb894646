use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use cosmic_text::{
    fontdb, Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache,
};
use image::{Rgb, RgbImage};
use walkdir::WalkDir;

use crate::bitmap_font;
use crate::error::IconError;
use crate::logger::{log_error, log_line};
use crate::models::{FontKind, TextBox};

/// Coverage mask of rendered text, relative to the text origin.
/// Overlapping glyphs keep the strongest coverage per pixel.
#[derive(Debug, Clone, Default)]
pub struct RasterText {
    pixels: BTreeMap<(i32, i32), u8>,
}

impl RasterText {
    pub fn push(&mut self, x: i32, y: i32, alpha: u8) {
        if alpha > 0 {
            let cell = self.pixels.entry((x, y)).or_insert(0);
            *cell = (*cell).max(alpha);
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn bbox(&self) -> TextBox {
        let mut iter = self.pixels.keys();
        let Some(&(x, y)) = iter.next() else {
            return TextBox::default();
        };
        let mut b = TextBox { left: x, top: y, right: x + 1, bottom: y + 1 };
        for &(x, y) in iter {
            b.left = b.left.min(x);
            b.top = b.top.min(y);
            b.right = b.right.max(x + 1);
            b.bottom = b.bottom.max(y + 1);
        }
        b
    }

    /// Blend the coverage over `canvas` at `origin`, clipping at the edges.
    pub fn draw(&self, canvas: &mut RgbImage, origin: (i64, i64), color: Rgb<u8>) {
        let (w, h) = (canvas.width() as i64, canvas.height() as i64);
        for (&(x, y), &alpha) in &self.pixels {
            let px = origin.0 + x as i64;
            let py = origin.1 + y as i64;
            if px < 0 || py < 0 || px >= w || py >= h {
                continue;
            }
            let dst = canvas.get_pixel_mut(px as u32, py as u32);
            *dst = blend(*dst, color, alpha);
        }
    }
}

fn blend(bg: Rgb<u8>, fg: Rgb<u8>, alpha: u8) -> Rgb<u8> {
    let a = alpha as u32;
    let mix = |b: u8, f: u8| ((f as u32 * a + b as u32 * (255 - a) + 127) / 255) as u8;
    Rgb([mix(bg[0], fg[0]), mix(bg[1], fg[1]), mix(bg[2], fg[2])])
}

pub struct ScalableFont {
    system: FontSystem,
    family: String,
    px: u32,
}

/// Font handle used for one icon.
pub enum IconFont {
    Scalable(ScalableFont),
    Fallback,
}

impl IconFont {
    pub fn kind(&self) -> FontKind {
        match self {
            IconFont::Scalable(_) => FontKind::Scalable,
            IconFont::Fallback => FontKind::Fallback,
        }
    }

    pub fn rasterize(&mut self, text: &str) -> RasterText {
        match self {
            IconFont::Scalable(font) => font.rasterize(text),
            IconFont::Fallback => bitmap_font::rasterize(text),
        }
    }
}

impl ScalableFont {
    fn rasterize(&mut self, text: &str) -> RasterText {
        let px = self.px as f32;
        let mut buffer = Buffer::new(&mut self.system, Metrics::new(px, px));
        buffer.set_size(&mut self.system, None, None);
        let attrs = Attrs::new().family(Family::Name(self.family.as_str()));
        buffer.set_text(&mut self.system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.system, false);

        let mut out = RasterText::default();
        let mut cache = SwashCache::new();
        let white = Color::rgb(255, 255, 255);
        buffer.draw(&mut self.system, &mut cache, white, |x, y, w, h, color| {
            for dy in 0..h as i32 {
                for dx in 0..w as i32 {
                    out.push(x + dx, y + dy, color.a());
                }
            }
        });
        out
    }
}

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from(r"C:\Windows\Fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
    ];
    if let Some(base) = directories::BaseDirs::new() {
        let home = base.home_dir();
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join("Library/Fonts"));
    }
    dirs
}

/// Find a font by path, or by exact file name in the system font directories.
pub fn resolve_font_file(name: &str) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.is_file() {
        return Some(direct.to_path_buf());
    }
    find_font_in(&font_dirs(), direct.file_name()?)
}

fn find_font_in(dirs: &[PathBuf], file_name: &OsStr) -> Option<PathBuf> {
    dirs.iter().filter(|d| d.is_dir()).find_map(|dir| {
        WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .find(|e| e.file_type().is_file() && e.file_name() == file_name)
            .map(|e| e.into_path())
    })
}

pub fn load_font(px: u32, name: &str) -> Result<IconFont, IconError> {
    let unavailable = |reason: String| IconError::FontUnavailable {
        name: name.to_string(),
        reason,
    };
    if px == 0 {
        return Err(unavailable("point size is zero".into()));
    }
    let path = resolve_font_file(name).ok_or_else(|| unavailable("not found".into()))?;
    let data = fs::read(&path).map_err(|e| unavailable(format!("{}: {}", path.display(), e)))?;

    let mut db = fontdb::Database::new();
    db.load_font_data(data);
    let family = db
        .faces()
        .find_map(|face| face.families.first().map(|(family, _)| family.clone()))
        .ok_or_else(|| unavailable(format!("{}: no usable face", path.display())))?;

    log_line(&format!("Loaded font {} ({}) at {}px", family, path.display(), px));
    Ok(IconFont::Scalable(ScalableFont {
        system: FontSystem::new_with_locale_and_db("en-US".to_string(), db),
        family,
        px,
    }))
}

/// Preferred font at `px`, or the built-in bitmap font if it cannot be loaded.
pub fn load_font_or_fallback(px: u32, name: &str) -> IconFont {
    match load_font(px, name) {
        Ok(font) => font,
        Err(e) => {
            log_error("font load failed, using built-in font", &e);
            IconFont::Fallback
        }
    }
}

/// A scalable face that is commonly installed, for tests that need real glyphs.
#[cfg(test)]
pub(crate) fn any_system_font() -> Option<PathBuf> {
    [
        "DejaVuSans.ttf",
        "LiberationSans-Regular.ttf",
        "arial.ttf",
        "Arial.ttf",
        "NotoSans-Regular.ttf",
        "FreeSans.ttf",
    ]
    .iter()
    .find_map(|name| resolve_font_file(name))
}
