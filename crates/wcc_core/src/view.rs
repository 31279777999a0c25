//! View models for front ends.
//!
//! Everything a screen needs, already formatted. Front ends only lay these
//! out; they make no decisions of their own.

use std::collections::BTreeSet;

use crate::errors::CombineResult;
use crate::merge::CombineReport;
use crate::models::{InputFile, ProbeStatus, ProgressEvent};
use crate::probe::{format_duration, MediaProber};
use crate::session::Session;

/// Placeholder for a value that is unknown.
pub const UNKNOWN_CELL: &str = "—";

/// Channel cell while the probe is running.
pub const PENDING_CHANNELS: &str = "...";

/// Channel cell after the probe failed.
pub const FAILED_CHANNELS: &str = "?";

/// Column titles, in display order.
pub const COLUMNS: [&str; 5] = ["Filename", "Duration", "Sample Rate", "Bit Depth", "Channels"];

/// `48000` -> `48.0 kHz`
pub fn format_sample_rate(hz: u32) -> String {
    format!("{:.1} kHz", hz as f64 / 1000.0)
}

/// `24` -> `24-bit`
pub fn format_bit_depth(bits: u32) -> String {
    format!("{}-bit", bits)
}

/// One rendered row of the input list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    /// Zero-based position.
    pub index: usize,
    pub name: String,
    pub duration: String,
    pub sample_rate: String,
    pub bit_depth: String,
    pub channels: String,
    /// Waiting for the probe.
    pub loading: bool,
    /// Probe failure text.
    pub error: Option<String>,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

impl FileRow {
    fn new(index: usize, count: usize, file: &InputFile) -> Self {
        let cell = |value: Option<String>| value.unwrap_or_else(|| UNKNOWN_CELL.to_string());
        let channels = match (&file.status, file.channels()) {
            (_, Some(n)) => n.to_string(),
            (ProbeStatus::Failed(_), None) => FAILED_CHANNELS.to_string(),
            _ => PENDING_CHANNELS.to_string(),
        };

        Self {
            index,
            name: file.name.clone(),
            duration: cell(file.duration_seconds().map(format_duration)),
            sample_rate: cell(file.sample_rate_hz().map(format_sample_rate)),
            bit_depth: cell(file.bit_depth().map(format_bit_depth)),
            channels,
            loading: file.status == ProbeStatus::Pending,
            error: file.probe_error().map(str::to_string),
            can_move_up: index > 0,
            can_move_down: index + 1 < count,
        }
    }

    /// The row's cells in [`COLUMNS`] order.
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.name,
            &self.duration,
            &self.sample_rate,
            &self.bit_depth,
            &self.channels,
        ]
    }
}

/// Snapshot of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub rows: Vec<FileRow>,
    pub total_channels: u32,
    pub output_path: Option<String>,
    pub combine_enabled: bool,
    /// Format mismatches between resolved files.
    pub warnings: Vec<String>,
}

impl SessionView {
    pub fn build<P: MediaProber>(session: &Session<P>) -> Self {
        let files = session.files();
        let count = files.len();

        Self {
            rows: files
                .iter()
                .enumerate()
                .map(|(i, f)| FileRow::new(i, count, f))
                .collect(),
            total_channels: session.total_channels(),
            output_path: session.output_path().map(|p| p.display().to_string()),
            combine_enabled: session.is_ready_to_combine(),
            warnings: format_warnings(files),
        }
    }

    /// True when there is nothing to list (show the "add files" prompt).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Mismatched sample rates or bit depths among resolved files.
///
/// The merger does not reconcile formats, so these are only surfaced.
pub fn format_warnings(files: &[InputFile]) -> Vec<String> {
    let mut warnings = Vec::new();

    let rates: BTreeSet<u32> = files.iter().filter_map(|f| f.sample_rate_hz()).collect();
    if rates.len() > 1 {
        let list: Vec<String> = rates.into_iter().map(format_sample_rate).collect();
        warnings.push(format!("Sample rates differ: {}", list.join(", ")));
    }

    let depths: BTreeSet<u32> = files.iter().filter_map(|f| f.bit_depth()).collect();
    if depths.len() > 1 {
        let list: Vec<String> = depths.into_iter().map(format_bit_depth).collect();
        warnings.push(format!("Bit depths differ: {}", list.join(", ")));
    }

    warnings
}

/// Progress bar state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub percent: u32,
    pub message: String,
}

impl ProgressView {
    /// Filled cells of a `width`-cell bar.
    pub fn filled(&self, width: usize) -> usize {
        width * self.percent.min(100) as usize / 100
    }
}

impl From<&ProgressEvent> for ProgressView {
    fn from(event: &ProgressEvent) -> Self {
        Self {
            percent: event.percent,
            message: event.message.clone(),
        }
    }
}

/// Final message for a finished combine job.
pub fn result_message(result: &CombineResult<CombineReport>) -> String {
    match result {
        Ok(report) => format!("Successfully created {}-channel file", report.total_channels),
        Err(e) => format!("Error: {}", e),
    }
}
