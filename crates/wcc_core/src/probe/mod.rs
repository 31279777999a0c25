//! Audio metadata probing.
//!
//! The session only needs "path in, [`ProbeOutcome`] out", so probing sits
//! behind the [`MediaProber`] trait. [`FfprobeProber`] is the real
//! implementation; tests substitute their own.

mod parse;

pub use parse::{format_duration, parse_probe_json, parse_probe_output, STREAM_ENTRIES};

use std::ffi::OsString;
use std::future::Future;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::errors::ProbeError;
use crate::models::ProbeOutcome;
use crate::tools::{ToolLocator, FFPROBE};

/// Reads audio metadata for one file.
///
/// Implementations never panic on bad input; every failure is reported as a
/// `ProbeError` inside the outcome.
pub trait MediaProber: Send + Sync + 'static {
    fn probe(&self, path: &Path) -> impl Future<Output = ProbeOutcome> + Send;
}

/// Arguments for one prober invocation.
pub fn probe_args(path: &Path) -> Vec<OsString> {
    vec![
        "-v".into(),
        "error".into(),
        "-show_entries".into(),
        STREAM_ENTRIES.into(),
        "-of".into(),
        "json".into(),
        path.as_os_str().to_owned(),
    ]
}

/// Probes files by running `ffprobe`.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    locator: ToolLocator,
}

impl FfprobeProber {
    pub fn new(locator: ToolLocator) -> Self {
        Self { locator }
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new(ToolLocator::on_path(FFPROBE))
    }
}

impl MediaProber for FfprobeProber {
    async fn probe(&self, path: &Path) -> ProbeOutcome {
        let program = self.locator.resolve()?;

        tracing::debug!("Probing file: {}", path.display());

        let output = Command::new(&program)
            .args(probe_args(path))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProbeError::Spawn(e.to_string()))?;

        if !output.status.success() {
            let err = ProbeError::exit_failure(
                output.status.code().unwrap_or(-1),
                &String::from_utf8_lossy(&output.stderr),
            );
            tracing::warn!("Probe failed for {}: {}", path.display(), err);
            return Err(err);
        }

        let metadata = parse_probe_output(&output.stdout)?;
        tracing::debug!(
            "Probed {}: {} channel(s), {:?} Hz, {:?}-bit",
            path.display(),
            metadata.channels,
            metadata.sample_rate_hz,
            metadata.bit_depth
        );
        Ok(metadata)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::errors::ToolError;
    use crate::test_support::write_script;
    use tempfile::tempdir;

    fn prober_at(path: &Path) -> FfprobeProber {
        FfprobeProber::new(ToolLocator::at(FFPROBE, path))
    }

    #[test]
    fn args_request_stream_entries_as_json() {
        let args = probe_args(Path::new("/takes/kick in.wav"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            [
                "-v",
                "error",
                "-show_entries",
                "stream=channels,sample_rate,duration,bits_per_sample,bits_per_raw_sample",
                "-of",
                "json",
                "/takes/kick in.wav",
            ]
        );
    }

    #[tokio::test]
    async fn reads_metadata_from_tool_output() {
        let dir = tempdir().unwrap();
        let tool = write_script(
            dir.path(),
            "ffprobe",
            r#"cat <<'JSON'
{
    "programs": [],
    "streams": [
        {
            "sample_rate": "48000",
            "channels": 2,
            "bits_per_sample": 24,
            "duration": "59.200000"
        }
    ]
}
JSON"#,
        );

        let meta = prober_at(&tool).probe(Path::new("stereo.wav")).await.unwrap();
        assert_eq!(meta.channels, 2);
        assert_eq!(meta.sample_rate_hz, Some(48000));
        assert_eq!(meta.bit_depth, Some(24));
        assert_eq!(meta.duration_display().as_deref(), Some("0:59"));
    }

    #[tokio::test]
    async fn nonzero_exit_reports_stderr() {
        let dir = tempdir().unwrap();
        let tool = write_script(
            dir.path(),
            "ffprobe",
            "echo \"broken.wav: Invalid data found when processing input\" >&2\nexit 1",
        );

        let err = prober_at(&tool).probe(Path::new("broken.wav")).await.unwrap_err();
        assert_eq!(
            err,
            ProbeError::ExitFailure {
                exit_code: 1,
                message: "broken.wav: Invalid data found when processing input".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn silent_failure_reports_exit_code() {
        let dir = tempdir().unwrap();
        let tool = write_script(dir.path(), "ffprobe", "exit 3");

        let err = prober_at(&tool).probe(Path::new("x.wav")).await.unwrap_err();
        assert_eq!(err.to_string(), "ffprobe exited with code 3");
    }

    #[tokio::test]
    async fn garbage_output_is_parse_error() {
        let dir = tempdir().unwrap();
        let tool = write_script(dir.path(), "ffprobe", "echo 'this is not json'");

        let err = prober_at(&tool).probe(Path::new("x.wav")).await.unwrap_err();
        assert!(matches!(err, ProbeError::Parse(_)));
    }

    #[tokio::test]
    async fn missing_tool_is_reported_not_thrown() {
        let dir = tempdir().unwrap();
        let err = prober_at(&dir.path().join("ffprobe"))
            .probe(Path::new("x.wav"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProbeError::ToolUnavailable(ToolError::MissingAtPath { .. })
        ));
    }

    #[tokio::test]
    async fn unstartable_tool_is_spawn_error() {
        let dir = tempdir().unwrap();
        let tool = dir.path().join("ffprobe");
        std::fs::write(&tool, "not a program").unwrap();

        let err = prober_at(&tool).probe(Path::new("x.wav")).await.unwrap_err();
        assert!(matches!(err, ProbeError::Spawn(_)), "{:?}", err);
    }
}
