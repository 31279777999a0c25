//! Error types shared by the probe and merge orchestration.
//!
//! Every error here is `Clone` so it can travel inside UI events. Failures
//! are always returned as values; one file's or one job's failure never
//! aborts unrelated in-flight work.

use std::path::PathBuf;

use thiserror::Error;

/// An external tool could not be located.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Not configured and not on `PATH`.
    #[error("{tool} not found")]
    NotFound { tool: String },

    /// Configured explicitly, but nothing exists at that path.
    #[error("{tool} at {} not found", .path.display())]
    MissingAtPath { tool: String, path: PathBuf },
}

impl ToolError {
    /// Create a not found error.
    pub fn not_found(tool: impl Into<String>) -> Self {
        Self::NotFound { tool: tool.into() }
    }

    /// Create a missing-at-path error.
    pub fn missing_at_path(tool: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingAtPath {
            tool: tool.into(),
            path: path.into(),
        }
    }
}

/// Why a metadata probe produced no usable channel count.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The prober executable is not available.
    #[error(transparent)]
    ToolUnavailable(#[from] ToolError),

    /// The OS refused to start the prober.
    #[error("Failed to run ffprobe: {0}")]
    Spawn(String),

    /// The prober ran but exited non-zero.
    #[error("{message}")]
    ExitFailure { exit_code: i32, message: String },

    /// The prober's output was not the expected document.
    #[error("Failed to parse ffprobe output: {0}")]
    Parse(String),

    /// The document parsed, but no stream carried a channel count.
    #[error("No audio stream found")]
    NoAudioStream,
}

impl ProbeError {
    /// Create an exit failure, falling back to a generic message when the
    /// tool wrote nothing to stderr.
    pub fn exit_failure(exit_code: i32, stderr: &str) -> Self {
        let trimmed = stderr.trim();
        let message = if trimmed.is_empty() {
            format!("ffprobe exited with code {}", exit_code)
        } else {
            trimmed.to_string()
        };
        Self::ExitFailure { exit_code, message }
    }
}

/// Why a combine job did not produce an output file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CombineError {
    /// The merger executable is not available.
    #[error(transparent)]
    ToolUnavailable(#[from] ToolError),

    /// The OS refused to start the merger.
    #[error("Failed to start ffmpeg: {0}")]
    Spawn(String),

    /// The merger exited non-zero. `diagnostics` holds its full stderr.
    #[error("ffmpeg failed with code {exit_code}")]
    ExitFailure { exit_code: i32, diagnostics: String },

    /// Reading the merger's output or waiting on it failed.
    #[error("I/O error in {operation}: {message}")]
    Io { operation: String, message: String },

    /// Another combine job holds the single-flight guard.
    #[error("Another combine job is already running")]
    Busy,

    /// The session does not satisfy the readiness gate.
    #[error("Not ready to combine: {0}")]
    NotReady(String),
}

impl CombineError {
    /// Create an exit failure error.
    pub fn exit_failure(exit_code: i32, diagnostics: impl Into<String>) -> Self {
        Self::ExitFailure {
            exit_code,
            diagnostics: diagnostics.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io(operation: impl Into<String>, source: &std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            message: source.to_string(),
        }
    }

    /// Create a not-ready error.
    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self::NotReady(reason.into())
    }

    /// Captured diagnostic output, if the merger got far enough to produce any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            Self::ExitFailure { diagnostics, .. } => Some(diagnostics),
            _ => None,
        }
    }
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Result type for combine operations.
pub type CombineResult<T> = Result<T, CombineError>;
