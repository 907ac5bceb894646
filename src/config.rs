use std::path::PathBuf;

use image::Rgb;

use crate::models::IconTarget;

/// `#25d366`
pub const BACKGROUND: Rgb<u8> = Rgb([0x25, 0xd3, 0x66]);
pub const FOREGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const LABEL: &str = "WA";
pub const PREFERRED_FONT: &str = "arial.ttf";
pub const OUTPUT_DIR: &str = "assets";
pub const SIZES: [u32; 3] = [16, 48, 128];

/// Built-in generation settings. Nothing is read from disk or the environment.
#[derive(Debug, Clone)]
pub struct IconConfig {
    pub background: Rgb<u8>,
    pub foreground: Rgb<u8>,
    pub label: String,
    pub font_file: String,
    pub output_dir: PathBuf,
    pub targets: Vec<IconTarget>,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            background: BACKGROUND,
            foreground: FOREGROUND,
            label: LABEL.to_string(),
            font_file: PREFERRED_FONT.to_string(),
            output_dir: PathBuf::from(OUTPUT_DIR),
            targets: default_targets(),
        }
    }
}

impl IconConfig {
    pub fn target_path(&self, target: &IconTarget) -> PathBuf {
        self.output_dir.join(&target.file_name)
    }
}

pub fn default_targets() -> Vec<IconTarget> {
    SIZES
        .iter()
        .map(|&sz| IconTarget::new(sz, &format!("icon{}.png", sz)))
        .collect()
}
