//! Progress events emitted while a combine job runs.

/// Message sent the moment the merger has been spawned.
pub const STARTING_MESSAGE: &str = "Starting...";

/// Message sent after the merger exits successfully.
pub const COMPLETE_MESSAGE: &str = "Complete!";

/// One progress update for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Percent in `0..=100`.
    pub percent: u32,
    /// Human-readable status.
    pub message: String,
}

impl ProgressEvent {
    /// Create a progress event; percent is clamped to 100.
    pub fn new(percent: u32, message: impl Into<String>) -> Self {
        Self {
            percent: percent.min(100),
            message: message.into(),
        }
    }

    /// The initial event of every run.
    pub fn starting() -> Self {
        Self::new(0, STARTING_MESSAGE)
    }

    /// The final event of a successful run.
    pub fn complete() -> Self {
        Self::new(100, COMPLETE_MESSAGE)
    }

    /// An intermediate event reporting how much audio has been written.
    pub fn processing(percent: u32, elapsed_seconds: f64) -> Self {
        let secs = elapsed_seconds.max(0.0).floor() as u64;
        Self::new(percent, format!("Processing... {}s processed", secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_match_contract() {
        assert_eq!(ProgressEvent::starting(), ProgressEvent::new(0, "Starting..."));
        assert_eq!(ProgressEvent::complete(), ProgressEvent::new(100, "Complete!"));
    }

    #[test]
    fn processing_floors_seconds() {
        let event = ProgressEvent::processing(15, 83.99);
        assert_eq!(event.percent, 15);
        assert_eq!(event.message, "Processing... 83s processed");
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(ProgressEvent::new(250, "x").percent, 100);
    }
}
