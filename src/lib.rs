pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::Settings;
pub use utils::error::{Result, ToolError};
