//! Merger invocation arguments.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::OutputSettings;

/// Encoding options for the merged output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Audio codec for the merged stream.
    pub codec: String,
    /// Pass `-y` so an existing destination is replaced.
    pub overwrite: bool,
}

/// 24-bit little-endian linear PCM.
pub const DEFAULT_CODEC: &str = "pcm_s24le";

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            codec: DEFAULT_CODEC.to_string(),
            overwrite: false,
        }
    }
}

impl From<&OutputSettings> for MergeOptions {
    fn from(settings: &OutputSettings) -> Self {
        let codec = settings.codec.trim();
        Self {
            codec: if codec.is_empty() {
                DEFAULT_CODEC.to_string()
            } else {
                codec.to_string()
            },
            overwrite: settings.overwrite,
        }
    }
}

/// `[0:a][1:a]...[n-1:a]amerge=inputs=n`
pub fn amerge_filter(inputs: usize) -> String {
    let labels: String = (0..inputs).map(|i| format!("[{}:a]", i)).collect();
    format!("{}amerge=inputs={}", labels, inputs)
}

/// Full argument list: inputs in order, the merge filter, codec, destination.
pub fn build_merge_args(inputs: &[PathBuf], output: &Path, options: &MergeOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(inputs.len() * 2 + 6);

    if options.overwrite {
        args.push("-y".into());
    }

    for input in inputs {
        args.push("-i".into());
        args.push(input.as_os_str().to_owned());
    }

    args.push("-filter_complex".into());
    args.push(amerge_filter(inputs.len()).into());
    args.push("-c:a".into());
    args.push(options.codec.clone().into());
    args.push(output.as_os_str().to_owned());

    args
}
