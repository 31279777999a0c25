//! Runs the merger and relays its progress.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use super::args::{build_merge_args, MergeOptions};
use super::progress::{ProgressTracker, SegmentSplitter};
use crate::config::Settings;
use crate::errors::{CombineError, CombineResult};
use crate::logging::{combine_job_name, JobLogger, LogConfig};
use crate::models::ProgressEvent;
use crate::tools::{ToolLocator, FFMPEG};

/// Everything one combine job needs, produced by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineRequest {
    /// Inputs in channel order.
    pub inputs: Vec<PathBuf>,
    /// Destination file.
    pub output: PathBuf,
    /// Sum of the inputs' channel counts.
    pub total_channels: u32,
}

/// Outcome of a successful combine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineReport {
    pub output: PathBuf,
    pub total_channels: u32,
    /// Job log written for this run, if job logs are enabled.
    pub log_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
struct JobLogTarget {
    dir: PathBuf,
    config: LogConfig,
}

/// Spawns the merger, one job at a time.
///
/// Clones share the busy flag, so a second `combine` on any clone fails
/// with [`CombineError::Busy`] while the first is still running.
#[derive(Debug, Clone)]
pub struct Combiner {
    locator: ToolLocator,
    options: MergeOptions,
    job_logs: Option<JobLogTarget>,
    busy: Arc<AtomicBool>,
}

/// Holds the busy flag for the duration of one job.
struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Combiner {
    pub fn new(locator: ToolLocator, options: MergeOptions) -> Self {
        Self {
            locator,
            options,
            job_logs: None,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Build from settings: tool path, output options and job log policy.
    ///
    /// `logs_dir` is the resolved `[paths] logs_folder`.
    pub fn from_settings(settings: &Settings, logs_dir: &Path) -> Self {
        let combiner = Self::new(
            ToolLocator::at(FFMPEG, &settings.tools.ffmpeg_path),
            MergeOptions::from(&settings.output),
        );
        if settings.logging.job_logs {
            combiner.with_job_logs(logs_dir, LogConfig::from(&settings.logging))
        } else {
            combiner
        }
    }

    /// Write a log file per job into `dir`.
    pub fn with_job_logs(mut self, dir: impl Into<PathBuf>, config: LogConfig) -> Self {
        self.job_logs = Some(JobLogTarget {
            dir: dir.into(),
            config,
        });
        self
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// True while a job holds the single-flight guard.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Merge `request.inputs` into `request.output`.
    ///
    /// `on_progress` receives `0 "Starting..."` right after spawn, one
    /// event per time marker, and `100 "Complete!"` on a clean exit. If
    /// the tool cannot be found or started, no events are sent.
    pub async fn combine<F>(
        &self,
        request: &CombineRequest,
        mut on_progress: F,
    ) -> CombineResult<CombineReport>
    where
        F: FnMut(ProgressEvent) + Send,
    {
        let _guard = BusyGuard::acquire(&self.busy).ok_or(CombineError::Busy)?;

        let program = self.locator.resolve()?;
        let args = build_merge_args(&request.inputs, &request.output, &self.options);

        let logger = self.open_job_log();
        if let Some(logger) = &logger {
            logger.section("Combine");
            for (i, input) in request.inputs.iter().enumerate() {
                logger.info(&format!("Input {}: {}", i, input.display()));
            }
            logger.info(&format!("Output: {}", request.output.display()));
            logger.command(&program, &args);
        }

        tracing::info!(
            "Combining {} file(s) into {}",
            request.inputs.len(),
            request.output.display()
        );
        tracing::debug!("Running FFmpeg: {} {:?}", program.display(), args);

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                let err = CombineError::Spawn(e.to_string());
                if let Some(logger) = &logger {
                    logger.error(&err.to_string());
                }
                err
            })?;

        on_progress(ProgressEvent::starting());
        if let Some(logger) = &logger {
            logger.progress(0);
        }

        let diagnostics = match child.stderr.take() {
            Some(mut stderr) => {
                read_diagnostics(&mut stderr, &mut on_progress, logger.as_ref()).await
            }
            None => Ok(String::new()),
        };

        let status = child
            .wait()
            .await
            .map_err(|e| CombineError::io("waiting for ffmpeg", &e))?;
        let diagnostics = diagnostics?;

        if !status.success() {
            let err = CombineError::exit_failure(status.code().unwrap_or(-1), diagnostics);
            tracing::warn!("{}", err);
            if let Some(logger) = &logger {
                logger.error(&err.to_string());
                logger.show_tail("ffmpeg");
            }
            return Err(err);
        }

        on_progress(ProgressEvent::complete());
        if let Some(logger) = &logger {
            logger.progress(100);
            logger.success(&format!(
                "Created {}-channel file {}",
                request.total_channels,
                request.output.display()
            ));
        }
        tracing::info!("Combine complete: {}", request.output.display());

        Ok(CombineReport {
            output: request.output.clone(),
            total_channels: request.total_channels,
            log_path: logger.as_ref().map(|l| l.log_path().to_path_buf()),
        })
    }

    fn open_job_log(&self) -> Option<JobLogger> {
        let target = self.job_logs.as_ref()?;
        match JobLogger::new(combine_job_name(), &target.dir, target.config.clone()) {
            Ok(logger) => Some(logger),
            Err(e) => {
                tracing::warn!("Could not create job log in {}: {}", target.dir.display(), e);
                None
            }
        }
    }
}

/// Merger output kept for the error report; older bytes are discarded.
const MAX_DIAGNOSTIC_BYTES: usize = 1 << 20;

/// Stream stderr to the tracker; returns the last
/// [`MAX_DIAGNOSTIC_BYTES`] read.
async fn read_diagnostics<R, F>(
    stderr: &mut R,
    on_progress: &mut F,
    logger: Option<&JobLogger>,
) -> CombineResult<String>
where
    R: tokio::io::AsyncRead + Unpin,
    F: FnMut(ProgressEvent),
{
    let mut tracker = ProgressTracker::new();
    let mut splitter = SegmentSplitter::new();
    let mut collected = Vec::new();
    let mut buf = [0u8; 4096];

    let mut handle_segment = |segment: String| {
        if let Some(logger) = logger {
            logger.output_line(&segment);
        }
        if let Some(event) = tracker.observe(&segment) {
            if let Some(logger) = logger {
                logger.progress(event.percent);
            }
            on_progress(event);
        }
    };

    loop {
        let n = stderr
            .read(&mut buf)
            .await
            .map_err(|e| CombineError::io("reading ffmpeg output", &e))?;
        if n == 0 {
            break;
        }
        collected.extend_from_slice(&buf[..n]);
        if collected.len() > MAX_DIAGNOSTIC_BYTES {
            collected.drain(..collected.len() - MAX_DIAGNOSTIC_BYTES);
        }
        for segment in splitter.push(&buf[..n]) {
            handle_segment(segment);
        }
    }
    if let Some(segment) = splitter.finish() {
        handle_segment(segment);
    }

    Ok(String::from_utf8_lossy(&collected).into_owned())
}
