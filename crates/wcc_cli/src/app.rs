//! Shared startup state for the subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wcc_core::config::ConfigManager;
use wcc_core::merge::Combiner;
use wcc_core::probe::FfprobeProber;
use wcc_core::tools::ToolPaths;

use crate::paths;

pub struct App {
    pub config: ConfigManager,
    pub logs_dir: PathBuf,
}

impl App {
    /// Load (or create) the settings file.
    pub fn load(config_path: PathBuf) -> Result<Self> {
        let mut config = ConfigManager::new(&config_path);
        config
            .load_or_create()
            .with_context(|| format!("load settings {}", config_path.display()))?;
        let logs_dir = paths::logs_dir(&config_path, config.settings());
        Ok(Self { config, logs_dir })
    }

    pub fn prober(&self) -> FfprobeProber {
        FfprobeProber::new(ToolPaths::from_settings(&self.config.settings().tools).ffprobe)
    }

    /// Combiner per settings; `force_overwrite` turns on `-y` regardless.
    pub fn combiner(&self, force_overwrite: bool) -> Combiner {
        let mut settings = self.config.settings().clone();
        settings.output.overwrite |= force_overwrite;
        Combiner::from_settings(&settings, &self.logs_dir)
    }

    pub fn default_output(&self) -> PathBuf {
        paths::default_output(self.config.settings())
    }

    /// Persist the chosen output directory; failures only warn.
    pub fn remember_output(&mut self, output: &Path) {
        let output = std::path::absolute(output).unwrap_or_else(|_| output.to_path_buf());
        if let Err(e) = self.config.remember_output_path(&output) {
            tracing::warn!("Could not save last output directory: {}", e);
        }
    }
}
