//! Ingestion manager: the ordered input list and its readiness gate.
//!
//! A [`Session`] is owned by a single task (the UI loop). Adding files
//! spawns one probe task per file; each reports back as a
//! [`SessionEvent`] on the channel returned by [`Session::new`], and the
//! owner feeds it to [`Session::handle_event`]. Results are routed by
//! [`FileId`], so the list can be reordered, trimmed or reset while probes
//! are still running.

mod events;

pub use events::{SessionEvent, UiEvent};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::errors::{CombineError, CombineResult};
use crate::merge::CombineRequest;
use crate::models::{FileId, InputFile, MoveDirection, ProbeOutcome, ProbeStatus};
use crate::probe::MediaProber;

/// Extension accepted from drag-and-drop style ingestion.
pub const WAV_EXTENSION: &str = "wav";

/// True if `path` has a `.wav` extension (any case).
pub fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(WAV_EXTENSION))
}

/// Input files, output destination and in-flight probes of one job.
pub struct Session<P: MediaProber> {
    prober: Arc<P>,
    files: Vec<InputFile>,
    output_path: Option<PathBuf>,
    next_id: u64,
    events: EventSink,
}

/// Delivers a finished probe to whichever channel the owner listens on.
type EventSink = Arc<dyn Fn(SessionEvent) + Send + Sync>;

impl<P: MediaProber> Session<P> {
    /// Create a session and the receiver its probe results arrive on.
    pub fn new(prober: P) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::with_sender(Arc::new(prober), tx), rx)
    }

    /// Create a session reporting to an existing channel.
    ///
    /// The channel may carry a wider event type (such as [`UiEvent`]) so a
    /// front end can drive everything from one receiver.
    pub fn with_sender<E>(prober: Arc<P>, events: mpsc::UnboundedSender<E>) -> Self
    where
        E: From<SessionEvent> + Send + 'static,
    {
        Self {
            prober,
            files: Vec::new(),
            output_path: None,
            next_id: 1,
            // Receiver gone means the owner was dropped; nothing to update.
            events: Arc::new(move |event| {
                let _ = events.send(E::from(event));
            }),
        }
    }

    pub fn files(&self) -> &[InputFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Append one pending row per path, in order, and start probing each.
    ///
    /// Must be called from within a Tokio runtime. Returns the new ids.
    pub fn add_files<I, T>(&mut self, paths: I) -> Vec<FileId>
    where
        I: IntoIterator<Item = T>,
        T: Into<PathBuf>,
    {
        let mut ids = Vec::new();
        for path in paths {
            let id = FileId(self.next_id);
            self.next_id += 1;

            let file = InputFile::new(id, path);
            tracing::debug!("Added {} {}", id, file.path.display());
            self.spawn_probe(id, file.path.clone());
            self.files.push(file);
            ids.push(id);
        }
        ids
    }

    /// Like [`add_files`](Self::add_files), keeping only `.wav` paths.
    pub fn add_dropped<I, T>(&mut self, paths: I) -> Vec<FileId>
    where
        I: IntoIterator<Item = T>,
        T: Into<PathBuf>,
    {
        let accepted: Vec<PathBuf> = paths
            .into_iter()
            .map(Into::into)
            .filter(|p| {
                let keep = is_wav(p);
                if !keep {
                    tracing::debug!("Ignoring dropped non-wav file {}", p.display());
                }
                keep
            })
            .collect();
        self.add_files(accepted)
    }

    fn spawn_probe(&self, id: FileId, path: PathBuf) {
        let prober = Arc::clone(&self.prober);
        let events = Arc::clone(&self.events);
        tokio::spawn(async move {
            let outcome = prober.probe(&path).await;
            events(SessionEvent::ProbeFinished { id, outcome });
        });
    }

    /// Route a background event to its row.
    ///
    /// Returns true if any visible state changed.
    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::ProbeFinished { id, outcome } => self.apply_probe(id, outcome),
        }
    }

    /// Record a probe result for `id`.
    ///
    /// Ignored (returns false) when the row no longer exists or already
    /// has a result.
    pub fn apply_probe(&mut self, id: FileId, outcome: ProbeOutcome) -> bool {
        let Some(file) = self.files.iter_mut().find(|f| f.id == id) else {
            tracing::debug!("Dropping probe result for removed file {}", id);
            return false;
        };
        if let Err(e) = &outcome {
            tracing::warn!("Probe failed for {}: {}", file.name, e);
        }
        file.apply_probe(outcome)
    }

    /// Swap the row at `index` with its neighbour.
    ///
    /// No-op (returns false) if either position is out of range.
    pub fn reorder(&mut self, index: usize, direction: MoveDirection) -> bool {
        let Some(target) = index.checked_add_signed(direction.offset()) else {
            return false;
        };
        if index >= self.files.len() || target >= self.files.len() {
            return false;
        }
        self.files.swap(index, target);
        true
    }

    /// Delete the row at `index`; `None` if out of range.
    pub fn remove(&mut self, index: usize) -> Option<InputFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn set_output_path(&mut self, path: impl Into<PathBuf>) {
        self.output_path = Some(path.into());
    }

    /// Start a new job: no files, no output path.
    ///
    /// Probes still in flight finish in the background and are ignored.
    pub fn reset(&mut self) {
        self.files.clear();
        self.output_path = None;
    }

    /// Rows still waiting for their probe.
    pub fn pending_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status == ProbeStatus::Pending)
            .count()
    }

    /// Non-empty, every channel count known, and an output path chosen.
    pub fn is_ready_to_combine(&self) -> bool {
        self.readiness().is_ok()
    }

    /// Sum of the known channel counts.
    pub fn total_channels(&self) -> u32 {
        self.files.iter().filter_map(|f| f.channels()).sum()
    }

    /// Snapshot the job for the combiner, or explain why it is not ready.
    pub fn combine_request(&self) -> CombineResult<CombineRequest> {
        let output = self.readiness()?;
        Ok(CombineRequest {
            inputs: self.files.iter().map(|f| f.path.clone()).collect(),
            output: output.to_path_buf(),
            total_channels: self.total_channels(),
        })
    }

    fn readiness(&self) -> CombineResult<&Path> {
        if self.files.is_empty() {
            return Err(CombineError::not_ready("no input files"));
        }
        if let Some(file) = self.files.iter().find(|f| !f.has_channels()) {
            let reason = match &file.status {
                ProbeStatus::Failed(_) => format!("{} could not be read", file.name),
                _ => format!("{} is still being analyzed", file.name),
            };
            return Err(CombineError::not_ready(reason));
        }
        self.output_path
            .as_deref()
            .ok_or_else(|| CombineError::not_ready("no output file selected"))
    }

    /// Apply events until no row is pending.
    pub async fn settle(&mut self, events: &mut mpsc::UnboundedReceiver<SessionEvent>) {
        while self.pending_count() > 0 {
            match events.recv().await {
                Some(event) => {
                    self.handle_event(event);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use crate::errors::ProbeError;
    use crate::models::AudioMetadata;

    /// Answers from a table, optionally after a per-file delay.
    #[derive(Default)]
    struct TableProber {
        answers: HashMap<PathBuf, (u64, ProbeOutcome)>,
    }

    impl TableProber {
        fn answer(mut self, path: &str, delay_ms: u64, outcome: ProbeOutcome) -> Self {
            self.answers.insert(PathBuf::from(path), (delay_ms, outcome));
            self
        }

        fn channels(self, path: &str, delay_ms: u64, channels: u32) -> Self {
            let meta = AudioMetadata::new(channels)
                .with_sample_rate(48000)
                .with_duration(10.0);
            self.answer(path, delay_ms, Ok(meta))
        }
    }

    impl MediaProber for TableProber {
        async fn probe(&self, path: &Path) -> ProbeOutcome {
            match self.answers.get(path) {
                Some((delay, outcome)) => {
                    tokio::time::sleep(Duration::from_millis(*delay)).await;
                    outcome.clone()
                }
                None => Err(ProbeError::Parse("unexpected path".to_string())),
            }
        }
    }

    fn names<P: MediaProber>(session: &Session<P>) -> Vec<&str> {
        session.files().iter().map(|f| f.name.as_str()).collect()
    }

    #[tokio::test]
    async fn completion_order_never_reorders_list() {
        let prober = TableProber::default()
            .channels("a.wav", 60, 1)
            .channels("b.wav", 30, 2)
            .channels("c.wav", 0, 1);
        let (mut session, mut rx) = Session::new(prober);

        session.add_files(["a.wav", "b.wav", "c.wav"]);
        assert_eq!(session.pending_count(), 3);
        assert!(session.files().iter().all(|f| f.channels().is_none()));

        // Apply results one by one in arrival order (c, b, a)
        let mut arrival = Vec::new();
        while session.pending_count() > 0 {
            let SessionEvent::ProbeFinished { id, outcome } = rx.recv().await.unwrap();
            arrival.push(id);
            session.apply_probe(id, outcome);
            assert_eq!(names(&session), ["a.wav", "b.wav", "c.wav"]);
        }

        assert_eq!(arrival, [FileId(3), FileId(2), FileId(1)]);
        assert_eq!(session.total_channels(), 4);
    }

    #[tokio::test]
    async fn reorder_out_of_range_is_noop() {
        let prober = TableProber::default()
            .channels("a.wav", 0, 1)
            .channels("b.wav", 0, 1);
        let (mut session, mut rx) = Session::new(prober);
        session.add_files(["a.wav", "b.wav"]);
        session.settle(&mut rx).await;

        assert!(!session.reorder(0, MoveDirection::Up));
        assert!(!session.reorder(1, MoveDirection::Down));
        assert!(!session.reorder(7, MoveDirection::Up));
        assert_eq!(names(&session), ["a.wav", "b.wav"]);

        assert!(session.reorder(0, MoveDirection::Down));
        assert_eq!(names(&session), ["b.wav", "a.wav"]);
        assert!(session.reorder(1, MoveDirection::Up));
        assert_eq!(names(&session), ["a.wav", "b.wav"]);
    }

    #[tokio::test]
    async fn remove_out_of_range_is_noop() {
        let prober = TableProber::default().channels("a.wav", 0, 2);
        let (mut session, _rx) = Session::new(prober);
        session.add_files(["a.wav"]);

        assert!(session.remove(1).is_none());
        assert_eq!(session.len(), 1);
        assert_eq!(session.remove(0).map(|f| f.name), Some("a.wav".to_string()));
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn readiness_gate() {
        let prober = TableProber::default()
            .channels("a.wav", 0, 1)
            .channels("b.wav", 0, 2);
        let (mut session, mut rx) = Session::new(prober);

        assert!(!session.is_ready_to_combine());
        assert!(matches!(
            session.combine_request(),
            Err(CombineError::NotReady(_))
        ));

        session.add_files(["a.wav", "b.wav"]);
        // Pending rows block readiness
        assert_eq!(
            session.combine_request().unwrap_err(),
            CombineError::not_ready("a.wav is still being analyzed")
        );

        session.settle(&mut rx).await;
        let err = session.combine_request().unwrap_err();
        assert_eq!(err, CombineError::not_ready("no output file selected"));

        session.set_output_path("/out/mix.wav");
        assert!(session.is_ready_to_combine());
        let request = session.combine_request().unwrap();
        assert_eq!(
            request.inputs,
            [PathBuf::from("a.wav"), PathBuf::from("b.wav")]
        );
        assert_eq!(request.output, PathBuf::from("/out/mix.wav"));
        assert_eq!(request.total_channels, 3);
    }

    #[tokio::test]
    async fn failed_probe_blocks_until_removed() {
        let prober = TableProber::default()
            .channels("a.wav", 0, 1)
            .answer("broken.wav", 0, Err(ProbeError::NoAudioStream))
            .channels("c.wav", 0, 2);
        let (mut session, mut rx) = Session::new(prober);

        session.add_files(["a.wav", "broken.wav", "c.wav"]);
        session.set_output_path("out.wav");
        session.settle(&mut rx).await;

        // Sibling probes are unaffected by the failure
        assert_eq!(session.files()[0].channels(), Some(1));
        assert_eq!(session.files()[2].channels(), Some(2));
        assert_eq!(
            session.files()[1].probe_error(),
            Some("No audio stream found")
        );
        assert!(!session.is_ready_to_combine());
        assert_eq!(
            session.combine_request().unwrap_err(),
            CombineError::not_ready("broken.wav could not be read")
        );

        session.remove(1);
        assert!(session.is_ready_to_combine());
        assert_eq!(session.total_channels(), 3);
    }

    #[tokio::test]
    async fn late_results_after_reset_are_ignored() {
        let prober = TableProber::default().channels("slow.wav", 40, 2);
        let (mut session, mut rx) = Session::new(prober);

        session.add_files(["slow.wav"]);
        session.set_output_path("out.wav");
        session.reset();
        assert!(session.is_empty());
        assert_eq!(session.output_path(), None);

        let event = rx.recv().await.unwrap();
        assert!(!session.handle_event(event));
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_reset() {
        let prober = TableProber::default()
            .channels("a.wav", 40, 1)
            .channels("b.wav", 0, 6);
        let (mut session, mut rx) = Session::new(prober);

        let first = session.add_files(["a.wav"]);
        session.reset();
        let second = session.add_files(["b.wav"]);
        assert_ne!(first, second);

        // Both results arrive; only the live row is updated
        for _ in 0..2 {
            let event = rx.recv().await.unwrap();
            session.handle_event(event);
        }
        assert_eq!(names(&session), ["b.wav"]);
        assert_eq!(session.total_channels(), 6);
    }

    #[tokio::test]
    async fn duplicate_paths_are_separate_rows() {
        let prober = TableProber::default().channels("same.wav", 0, 2);
        let (mut session, mut rx) = Session::new(prober);

        session.add_files(["same.wav", "same.wav"]);
        session.settle(&mut rx).await;

        assert_eq!(session.len(), 2);
        assert_eq!(session.total_channels(), 4);
    }

    #[tokio::test]
    async fn probe_results_share_the_ui_channel() {
        let prober = TableProber::default().channels("a.wav", 0, 2);
        let (tx, mut rx) = mpsc::unbounded_channel::<UiEvent>();
        let mut session = Session::with_sender(Arc::new(prober), tx.clone());

        session.add_files(["a.wav"]);
        match rx.recv().await.unwrap() {
            UiEvent::Session(event) => assert!(session.handle_event(event)),
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(session.total_channels(), 2);

        // Progress travels on the same receiver
        tx.send(crate::models::ProgressEvent::starting().into()).unwrap();
        assert!(matches!(rx.recv().await, Some(UiEvent::Progress(_))));
    }

    #[tokio::test]
    async fn dropped_files_keep_only_wav() {
        let prober = TableProber::default()
            .channels("a.WAV", 0, 1)
            .channels("b.wav", 0, 1);
        let (mut session, _rx) = Session::new(prober);

        let ids = session.add_dropped(["a.WAV", "notes.txt", "b.wav", "c.flac", "noext"]);
        assert_eq!(ids.len(), 2);
        assert_eq!(names(&session), ["a.WAV", "b.wav"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn three_files_end_to_end() {
        use crate::merge::{Combiner, MergeOptions};
        use crate::models::ProgressEvent;
        use crate::test_support::fake_ffmpeg;
        use crate::tools::{ToolLocator, FFMPEG};

        let dir = tempfile::tempdir().unwrap();
        let prober = TableProber::default()
            .channels("a.wav", 0, 1)
            .channels("b.wav", 0, 1)
            .channels("c.wav", 0, 2);
        let (mut session, mut rx) = Session::new(prober);
        session.add_files(["a.wav", "b.wav", "c.wav"]);
        session.set_output_path(dir.path().join("out.wav"));
        session.settle(&mut rx).await;

        let tool = fake_ffmpeg(dir.path(), &["00:00:01.00", "00:00:02.00"], 0);
        let combiner = Combiner::new(ToolLocator::at(FFMPEG, tool), MergeOptions::default());

        let request = session.combine_request().unwrap();
        let mut events = Vec::new();
        let report = combiner.combine(&request, |e| events.push(e)).await.unwrap();

        assert_eq!(report.total_channels, 4);
        assert_eq!(events.last(), Some(&ProgressEvent::complete()));
    }
}
