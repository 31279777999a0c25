//! Location of the external media tools.

use std::path::{Path, PathBuf};

use crate::config::ToolSettings;
use crate::errors::ToolError;

/// Merger executable name.
pub const FFMPEG: &str = "ffmpeg";

/// Prober executable name.
pub const FFPROBE: &str = "ffprobe";

/// One external tool: its name, and an optional explicit location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolLocator {
    name: String,
    configured: Option<PathBuf>,
}

impl ToolLocator {
    /// Look the tool up on `PATH`.
    pub fn on_path(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            configured: None,
        }
    }

    /// Use an explicit path. An empty path falls back to a `PATH` lookup.
    pub fn at(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: name.into(),
            configured: (!path.as_os_str().is_empty()).then_some(path),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Find the executable.
    pub fn resolve(&self) -> Result<PathBuf, ToolError> {
        match &self.configured {
            Some(path) => resolve_configured(&self.name, path),
            None => which::which(&self.name).map_err(|e| {
                tracing::debug!("{} lookup failed: {}", self.name, e);
                ToolError::not_found(&self.name)
            }),
        }
    }
}

fn resolve_configured(name: &str, path: &Path) -> Result<PathBuf, ToolError> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    // A bare name such as "ffmpeg-6" is still searched on PATH
    if path.components().count() == 1 {
        if let Ok(found) = which::which(path) {
            return Ok(found);
        }
    }
    Err(ToolError::missing_at_path(name, path))
}

/// Locators for both tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: ToolLocator,
    pub ffprobe: ToolLocator,
}

impl ToolPaths {
    /// Build from the `[tools]` config section.
    pub fn from_settings(settings: &ToolSettings) -> Self {
        Self {
            ffmpeg: ToolLocator::at(FFMPEG, &settings.ffmpeg_path),
            ffprobe: ToolLocator::at(FFPROBE, &settings.ffprobe_path),
        }
    }
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: ToolLocator::on_path(FFMPEG),
            ffprobe: ToolLocator::on_path(FFPROBE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn configured_file_resolves_to_itself() {
        let dir = tempdir().unwrap();
        let exe = dir.path().join("my-ffmpeg");
        std::fs::write(&exe, "").unwrap();

        let locator = ToolLocator::at(FFMPEG, &exe);
        assert_eq!(locator.resolve().unwrap(), exe);
    }

    #[test]
    fn missing_configured_path_is_not_found() {
        let dir = tempdir().unwrap();
        let locator = ToolLocator::at(FFMPEG, dir.path().join("nope"));

        let err = locator.resolve().unwrap_err();
        assert!(matches!(err, ToolError::MissingAtPath { .. }));
        assert!(err.to_string().starts_with("ffmpeg at "));
        assert!(err.to_string().ends_with("not found"));
    }

    #[test]
    fn unknown_program_on_path_is_not_found() {
        let locator = ToolLocator::on_path("wcc-definitely-not-installed-tool");
        assert_eq!(
            locator.resolve().unwrap_err(),
            ToolError::not_found("wcc-definitely-not-installed-tool")
        );
    }

    #[test]
    fn empty_setting_means_path_lookup() {
        let paths = ToolPaths::from_settings(&ToolSettings::default());
        assert_eq!(paths, ToolPaths::default());
        assert_eq!(paths.ffprobe.name(), "ffprobe");
    }
}
