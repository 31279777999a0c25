//! Configuration management with TOML and atomic section updates.

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, LoggingSettings, OutputSettings, PathSettings, Settings, ToolSettings,
};
