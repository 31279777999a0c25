//! Data models for WAV Channel Combiner.
//!
//! This module contains the core data structures used throughout the application:
//! - Enums for probe status and list movement
//! - Input file and audio metadata structures
//! - Progress events emitted during a combine run

mod enums;
mod media;
mod progress;

// Re-export all public types
pub use enums::{MoveDirection, ProbeStatus};
pub use media::{AudioMetadata, FileId, InputFile, ProbeOutcome};
pub use progress::{ProgressEvent, COMPLETE_MESSAGE, STARTING_MESSAGE};
