use std::io::Write;

use crate::config::IconConfig;
use crate::error::IconError;
use crate::icon::generate_all;
use crate::logger::{log_error, log_line};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

pub const PNG_HINT: &str =
    "PNG support is required. Rebuild with the \"png\" feature of the image crate.";

/// Run the whole generation and return the process exit status.
/// `check` runs before anything is written; its failure ends the run early.
pub fn run<F>(config: &IconConfig, check: F, out: &mut dyn Write, err: &mut dyn Write) -> u8
where
    F: FnOnce() -> Result<(), IconError>,
{
    if let Err(e) = check() {
        match &e {
            IconError::PngUnsupported => {
                let _ = writeln!(err, "{}", PNG_HINT);
            }
            _ => {
                let _ = writeln!(err, "Image encoder check failed: {}", e);
            }
        }
        log_error("preflight", &e);
        return EXIT_FAILURE;
    }

    let _ = writeln!(out, "Generating extension icons...");
    log_line("Generating extension icons");
    match generate_all(config, out) {
        Ok(reports) => {
            let _ = writeln!(out, "Icons generated successfully!");
            log_line(&format!("Generated {} icons", reports.len()));
            EXIT_OK
        }
        Err(e) => {
            let _ = writeln!(err, "Icon generation failed: {}", e);
            log_error("generate", &e);
            EXIT_FAILURE
        }
    }
}
