use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid icon size: {0}")]
    InvalidSize(u32),
    #[error("font {name:?} unavailable: {reason}")]
    FontUnavailable { name: String, reason: String },
    #[error("PNG encoder not available")]
    PngUnsupported,
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: image::ImageError },
}
