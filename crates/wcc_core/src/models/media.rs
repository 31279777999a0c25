//! Media-related data structures (input files and their audio metadata).

use std::path::{Path, PathBuf};

use super::enums::ProbeStatus;
use crate::errors::ProbeResult;

/// Stable identifier for a row in the input list.
///
/// Ids are never reused within a session, so a probe result that arrives
/// after its row was moved, removed or reset still finds the right target
/// (or nothing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u64);

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Audio properties read from the first audio stream of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioMetadata {
    /// Number of audio channels (always >= 1).
    pub channels: u32,
    /// Stream duration in seconds.
    pub duration_seconds: Option<f64>,
    /// Sample rate in Hz.
    pub sample_rate_hz: Option<u32>,
    /// Bits per sample.
    pub bit_depth: Option<u32>,
}

impl AudioMetadata {
    /// Create metadata with only a channel count.
    pub fn new(channels: u32) -> Self {
        Self {
            channels,
            duration_seconds: None,
            sample_rate_hz: None,
            bit_depth: None,
        }
    }

    /// Set the duration.
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, hz: u32) -> Self {
        self.sample_rate_hz = Some(hz);
        self
    }

    /// Set the bit depth.
    pub fn with_bit_depth(mut self, bits: u32) -> Self {
        self.bit_depth = Some(bits);
        self
    }

    /// Duration as `m:ss`, if known.
    pub fn duration_display(&self) -> Option<String> {
        self.duration_seconds.map(crate::probe::format_duration)
    }
}

/// What a metadata probe hands back for one file.
pub type ProbeOutcome = ProbeResult<AudioMetadata>;

/// A file selected for combining.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFile {
    /// Session-unique id.
    pub id: FileId,
    /// Path as selected by the user.
    pub path: PathBuf,
    /// Display name (basename of `path`).
    pub name: String,
    /// Probe lifecycle state.
    pub status: ProbeStatus,
    /// Filled in once when the probe succeeds.
    pub metadata: Option<AudioMetadata>,
}

impl InputFile {
    /// Create a pending entry for a freshly added path.
    pub fn new(id: FileId, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self {
            id,
            path,
            name,
            status: ProbeStatus::Pending,
            metadata: None,
        }
    }

    /// Record a probe result.
    ///
    /// Only the first result is kept; returns false if the entry had
    /// already settled.
    pub fn apply_probe(&mut self, outcome: ProbeOutcome) -> bool {
        if self.status.is_settled() {
            return false;
        }

        match outcome {
            Ok(metadata) => {
                self.metadata = Some(metadata);
                self.status = ProbeStatus::Ready;
            }
            Err(e) => {
                self.status = ProbeStatus::Failed(e.to_string());
            }
        }
        true
    }

    /// Channel count, once resolved.
    pub fn channels(&self) -> Option<u32> {
        self.metadata.as_ref().map(|m| m.channels)
    }

    /// Duration in seconds, once resolved.
    pub fn duration_seconds(&self) -> Option<f64> {
        self.metadata.as_ref().and_then(|m| m.duration_seconds)
    }

    /// Sample rate in Hz, once resolved.
    pub fn sample_rate_hz(&self) -> Option<u32> {
        self.metadata.as_ref().and_then(|m| m.sample_rate_hz)
    }

    /// Bit depth, once resolved.
    pub fn bit_depth(&self) -> Option<u32> {
        self.metadata.as_ref().and_then(|m| m.bit_depth)
    }

    /// Probe error message, if the probe failed.
    pub fn probe_error(&self) -> Option<&str> {
        match &self.status {
            ProbeStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// True once the channel count is known.
    pub fn has_channels(&self) -> bool {
        self.channels().is_some()
    }
}

/// Basename of a path, falling back to the full path when there is none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
