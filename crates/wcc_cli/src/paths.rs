//! Where the settings file, logs and output land on disk.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use wcc_core::config::Settings;

const SETTINGS_FILE: &str = "settings.toml";

/// Settings file: `--config` if given, else the per-user config directory.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => {
            let dirs = ProjectDirs::from("dev", "wcc", "wav-channel-combiner")
                .ok_or_else(|| anyhow!("failed to resolve default config directory"))?;
            Ok(dirs.config_dir().join(SETTINGS_FILE))
        }
    }
}

/// Logs folder; a relative setting is taken relative to the settings file.
pub fn logs_dir(config_path: &Path, settings: &Settings) -> PathBuf {
    let folder = Path::new(&settings.paths.logs_folder);
    if folder.is_absolute() {
        return folder.to_path_buf();
    }
    match config_path.parent() {
        Some(dir) => dir.join(folder),
        None => folder.to_path_buf(),
    }
}

/// Destination proposed when the user did not name one.
pub fn default_output(settings: &Settings) -> PathBuf {
    let name = &settings.output.default_file_name;
    let dir = settings.paths.last_output_dir.trim();
    if dir.is_empty() {
        PathBuf::from(name)
    } else {
        Path::new(dir).join(name)
    }
}

/// False when the output's parent directory is missing.
///
/// A bare file name (current directory) always passes.
pub fn output_dir_exists(output: &Path) -> bool {
    match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.is_dir(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_config_wins() {
        let path = config_path(Some(Path::new("/tmp/wcc.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/wcc.toml"));
    }

    #[test]
    fn relative_logs_follow_config_file() {
        let settings = Settings::default();
        assert_eq!(
            logs_dir(Path::new("/home/u/.config/wcc/settings.toml"), &settings),
            PathBuf::from("/home/u/.config/wcc/.logs")
        );

        let mut settings = Settings::default();
        settings.paths.logs_folder = "/var/log/wcc".to_string();
        assert_eq!(
            logs_dir(Path::new("/etc/settings.toml"), &settings),
            PathBuf::from("/var/log/wcc")
        );
    }

    #[test]
    fn default_output_uses_last_directory() {
        let mut settings = Settings::default();
        assert_eq!(default_output(&settings), PathBuf::from("combined_output.wav"));

        settings.paths.last_output_dir = "/mnt/renders".to_string();
        assert_eq!(
            default_output(&settings),
            PathBuf::from("/mnt/renders/combined_output.wav")
        );
    }

    #[test]
    fn output_dir_check() {
        let dir = tempdir().unwrap();
        assert!(output_dir_exists(&dir.path().join("out.wav")));
        assert!(!output_dir_exists(&dir.path().join("missing").join("out.wav")));
        assert!(output_dir_exists(Path::new("relative.wav")));
    }
}
