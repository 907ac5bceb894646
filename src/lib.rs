pub mod app;
pub mod bitmap_font;
pub mod config;
pub mod error;
pub mod font;
pub mod icon;
pub mod logger;
pub mod models;

pub use app::run;
pub use config::IconConfig;
pub use error::IconError;
pub use icon::{create_icon, generate_all, preflight};
