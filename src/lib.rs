pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use adapters::SystemClipboard;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use config::ToolkitConfig;
pub use self::core::engine::ToolEngine;
pub use utils::error::{Result, ZaloError};
