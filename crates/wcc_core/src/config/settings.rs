//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Output encoding and naming.
    #[serde(default)]
    pub output: OutputSettings,

    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where to find the external media tools.
///
/// An empty path means "look it up on `PATH`".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Path to the merger executable.
    #[serde(default)]
    pub ffmpeg_path: String,

    /// Path to the prober executable.
    #[serde(default)]
    pub ffprobe_path: String,
}

/// Output file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// File name proposed when choosing a destination.
    #[serde(default = "default_file_name")]
    pub default_file_name: String,

    /// Audio codec for the merged stream.
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Replace an existing destination file instead of failing.
    #[serde(default)]
    pub overwrite: bool,
}

fn default_file_name() -> String {
    "combined_output.wav".to_string()
}

fn default_codec() -> String {
    "pcm_s24le".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            default_file_name: default_file_name(),
            codec: default_codec(),
            overwrite: false,
        }
    }
}

/// Path configuration for logs and remembered locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder for application and job log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Directory of the last chosen output file.
    #[serde(default)]
    pub last_output_dir: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            logs_folder: default_logs_folder(),
            last_output_dir: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Use compact job logs (progress filtered, tool output kept in tail only).
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of diagnostic lines to show on error (tail).
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    /// Write one log file per combine job.
    #[serde(default = "default_true")]
    pub job_logs: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            error_tail: default_error_tail(),
            progress_step: default_progress_step(),
            job_logs: true,
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Tools,
    Output,
    Paths,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::Tools,
        ConfigSection::Output,
        ConfigSection::Paths,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Tools => "tools",
            ConfigSection::Output => "output",
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section in a generated file.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Tools => "# External tools (empty = search PATH)",
            ConfigSection::Output => "# Merged file encoding",
            ConfigSection::Paths => "# Log folder and remembered locations",
            ConfigSection::Logging => "# Logging configuration",
        }
    }
}
