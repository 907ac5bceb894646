use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconTarget { pub size: u32, pub file_name: String }

impl IconTarget {
    pub fn new(size: u32, file_name: &str) -> Self {
        Self { size, file_name: file_name.to_string() }
    }
}

/// Which font ended up drawing the label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    Scalable,
    Fallback,
}

/// Ink bounding box relative to the text origin (right/bottom exclusive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBox {
    pub fn width(&self) -> i32 { self.right - self.left }
    pub fn height(&self) -> i32 { self.bottom - self.top }
    pub fn is_empty(&self) -> bool { self.width() <= 0 || self.height() <= 0 }
}

#[derive(Debug, Clone)]
pub struct IconReport {
    pub path: PathBuf,
    pub size: u32,
    pub font: FontKind,
}
