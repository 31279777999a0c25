//! Channel-merge orchestration around `ffmpeg`.
//!
//! - [`args`]: invocation arguments (`amerge` filter graph, codec, overwrite)
//! - [`progress`]: heuristic percent from `time=` markers on stderr
//! - [`combiner`]: spawning, streaming and the single-flight guard

pub mod args;
pub mod combiner;
pub mod progress;

pub use args::{amerge_filter, build_merge_args, MergeOptions, DEFAULT_CODEC};
pub use combiner::{CombineReport, CombineRequest, Combiner};
pub use progress::{parse_elapsed, ProgressTracker, SegmentSplitter, PROGRESS_CAP, PROGRESS_STEP};
