//! The settings file on disk.
//!
//! Whole-file saves are regenerated with section comments; single-section
//! updates go through `toml_edit` so the rest of the file keeps its text.
//! Every write lands in a sibling temp file and is renamed into place.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item};

use super::settings::{ConfigSection, Settings};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("settings file is not editable TOML: {0}")]
    Edit(#[from] toml_edit::TomlError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// In-memory [`Settings`] bound to one file.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Defaults only; nothing is read until `load` or `load_or_create`.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// In-memory edits; persist with `save` or `update_section`.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Read the file, or write a default one if there is none.
    ///
    /// Unknown sections are dropped and missing keys filled in; the file is
    /// rewritten when that changes anything.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            let (settings, stale) = self.normalize(&content)?;
            self.settings = settings;

            if stale {
                tracing::debug!("Config normalized, rewriting {}", self.config_path.display());
                self.save()?;
            }
        } else {
            if let Some(parent) = self.config_path.parent() {
                fs::create_dir_all(parent)?;
            }

            self.settings = Settings::default();
            self.save()?;
        }
        Ok(())
    }

    /// Remember the directory of a chosen output file.
    ///
    /// Persists only the `[paths]` section.
    pub fn remember_output_path(&mut self, output: &Path) -> ConfigResult<()> {
        let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) else {
            return Ok(());
        };
        let dir = dir.display().to_string();
        if self.settings.paths.last_output_dir == dir {
            return Ok(());
        }
        self.settings.paths.last_output_dir = dir;
        self.update_section(ConfigSection::Paths)
    }

    /// Parse `content`; the flag is true when the text on disk should be
    /// regenerated.
    fn normalize(&self, content: &str) -> ConfigResult<(Settings, bool)> {
        let doc: DocumentMut = content.parse()?;
        // Serde defaults cover absent keys
        let settings: Settings = toml::from_str(content)?;

        let has_unknown = doc.iter().any(|(key, _)| {
            !ConfigSection::ALL
                .iter()
                .any(|section| section.table_name() == key)
        });

        // Any missing key means the file differs from a full serialization
        let mut missing_key = false;
        for section in ConfigSection::ALL {
            let expected = self.section_table(&settings, section)?;
            let present = doc.get(section.table_name()).and_then(|i| i.as_table());
            missing_key |= match present {
                Some(table) => expected.iter().any(|(k, _)| !table.contains_key(k)),
                None => true,
            };
        }

        Ok((settings, has_unknown || missing_key))
    }

    /// Rewrite the whole file from the in-memory settings.
    pub fn save(&self) -> ConfigResult<()> {
        let content = self.render()?;
        self.write_replacing(&content)?;
        Ok(())
    }

    /// Replace one section on disk, leaving the others untouched.
    pub fn update_section(&mut self, section: ConfigSection) -> ConfigResult<()> {
        let on_disk = match fs::read_to_string(&self.config_path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        let mut doc: DocumentMut = on_disk.parse()?;

        doc[section.table_name()] = Item::Table(self.section_table(&self.settings, section)?);
        self.write_replacing(&doc.to_string())?;
        Ok(())
    }

    fn section_table(
        &self,
        settings: &Settings,
        section: ConfigSection,
    ) -> ConfigResult<toml_edit::Table> {
        let text = match section {
            ConfigSection::Tools => toml::to_string_pretty(&settings.tools)?,
            ConfigSection::Output => toml::to_string_pretty(&settings.output)?,
            ConfigSection::Paths => toml::to_string_pretty(&settings.paths)?,
            ConfigSection::Logging => toml::to_string_pretty(&settings.logging)?,
        };
        let parsed: DocumentMut = text.parse()?;
        Ok(parsed.as_table().clone())
    }

    /// Full file text: a banner, then each section under its comment.
    fn render(&self) -> ConfigResult<String> {
        let mut output = String::from(
            "# WAV Channel Combiner Configuration\n\
             # Regenerated when keys are missing; edits to known keys are kept.\n\n",
        );

        for (i, section) in ConfigSection::ALL.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(section.comment());
            output.push('\n');
            output.push_str(&format!("[{}]\n", section.table_name()));
            let table = self.section_table(&self.settings, *section)?;
            let mut body = DocumentMut::new();
            for (key, item) in table.iter() {
                body[key] = item.clone();
            }
            output.push_str(&body.to_string());
        }

        Ok(output)
    }

    /// Write `content` to `<name>.toml.tmp` beside the target, then rename.
    fn write_replacing(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let staging = self.config_path.with_extension("toml.tmp");

        let mut file = fs::File::create(&staging)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&staging, &self.config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_or_create_creates_default() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(".config").join("settings.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert!(config_path.exists());
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[tools]"));
        assert!(content.contains("[output]"));
        assert!(content.contains("[logging]"));

        // The generated file loads back unchanged
        let mut reloaded = ConfigManager::new(&config_path);
        reloaded.load_or_create().unwrap();
        assert_eq!(reloaded.settings(), &Settings::default());
        assert_eq!(fs::read_to_string(&config_path).unwrap(), content);
    }

    #[test]
    fn load_or_create_preserves_existing() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");

        fs::write(&config_path, "[output]\noverwrite = true\n").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert!(manager.settings().output.overwrite);
        // Missing sections were filled in on disk
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[paths]"));
    }

    #[test]
    fn load_or_create_drops_unknown_sections() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();
        let mut content = fs::read_to_string(&config_path).unwrap();
        content.push_str("\n[legacy]\nvalue = 1\n");
        fs::write(&config_path, content).unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(!content.contains("[legacy]"));
    }

    #[test]
    fn invalid_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");
        fs::write(&config_path, "[output]\noverwrite = \"sometimes\"\n").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        assert!(matches!(manager.load_or_create(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn update_section_only_changes_target() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        manager.settings_mut().logging.compact = false;
        manager.update_section(ConfigSection::Logging).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("compact = false"));
        // Other sections and the header comment survive
        assert!(content.contains("[tools]"));
        assert!(content.contains("# WAV Channel Combiner Configuration"));
    }

    #[test]
    fn remember_output_path_persists_directory() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();
        manager
            .remember_output_path(Path::new("/mnt/renders/mix.wav"))
            .unwrap();

        let mut reloaded = ConfigManager::new(&config_path);
        reloaded.load_or_create().unwrap();
        assert_eq!(reloaded.settings().paths.last_output_dir, "/mnt/renders");
    }

    #[test]
    fn save_leaves_no_staging_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        let temp_path = config_path.with_extension("toml.tmp");
        assert!(!temp_path.exists());
    }
}
