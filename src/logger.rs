use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Error => "ERROR",
        }
    }
}

fn data_dir() -> PathBuf {
    // unit tests never touch the real per-user data directory
    if cfg!(test) {
        return std::env::temp_dir().join("waicons-tests");
    }
    directories::ProjectDirs::from("com", "waicons", "WaIcons")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn log_path() -> PathBuf {
    data_dir().join("waicons.log")
}

/// Append one timestamped record to `path`, creating the file and its directory.
pub fn append(path: &Path, level: Level, message: &str) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(f, "[{}] {:<5} {}", stamp, level.tag(), message)
}

/// Best effort; logging never fails a run.
pub fn log_line(message: &str) {
    let _ = append(&log_path(), Level::Info, message);
}

pub fn log_error(context: &str, e: &dyn std::error::Error) {
    let _ = append(&log_path(), Level::Error, &format!("{}: {}", context, e));
}
