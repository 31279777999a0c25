//! Progress estimation from the merger's diagnostic output.
//!
//! The merger never reports a total, so percent is a heartbeat: every
//! `time=HH:MM:SS.ff` marker advances it by a fixed step, capped below 100.
//! Only a clean exit reaches 100.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ProgressEvent;

/// Percent added per observed timestamp.
pub const PROGRESS_STEP: u32 = 5;

/// Highest percent reachable before the process exits.
pub const PROGRESS_CAP: u32 = 95;

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"time=(\d{2}):(\d{2}):(\d{2}\.\d{2})").expect("regex for merger time markers")
});

/// Seconds encoded in the first `time=` marker of a segment.
pub fn parse_elapsed(segment: &str) -> Option<f64> {
    let caps = TIME_PATTERN.captures(segment)?;
    let hours: f64 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: f64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: f64 = caps.get(3)?.as_str().parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Turns diagnostic segments into monotonic progress events.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    percent: u32,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan one segment; returns an event if it carried a time marker.
    pub fn observe(&mut self, segment: &str) -> Option<ProgressEvent> {
        let elapsed = parse_elapsed(segment)?;
        self.percent = (self.percent + PROGRESS_STEP).min(PROGRESS_CAP);
        Some(ProgressEvent::processing(self.percent, elapsed))
    }
}

/// Splits a byte stream into segments ended by `\n` or `\r`.
///
/// The merger redraws its status line with bare carriage returns, so
/// newline-only splitting would hold every update until the very end.
#[derive(Debug, Default)]
pub struct SegmentSplitter {
    pending: Vec<u8>,
}

impl SegmentSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk; returns the segments it completed (empty ones skipped).
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut segments = Vec::new();
        for &byte in chunk {
            if byte == b'\n' || byte == b'\r' {
                self.take_into(&mut segments);
            } else {
                self.pending.push(byte);
            }
        }
        segments
    }

    /// Remaining text after the stream ended without a terminator.
    pub fn finish(&mut self) -> Option<String> {
        let mut segments = Vec::new();
        self.take_into(&mut segments);
        segments.pop()
    }

    fn take_into(&mut self, segments: &mut Vec<String>) {
        if self.pending.is_empty() {
            return;
        }
        let bytes = std::mem::take(&mut self.pending);
        segments.push(String::from_utf8_lossy(&bytes).into_owned());
    }
}
