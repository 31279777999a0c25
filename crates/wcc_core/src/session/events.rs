//! Messages delivered to the task that owns the session.

use crate::errors::CombineResult;
use crate::merge::CombineReport;
use crate::models::{FileId, ProbeOutcome, ProgressEvent};

/// Background work reporting back to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A metadata probe finished (successfully or not).
    ProbeFinished { id: FileId, outcome: ProbeOutcome },
}

/// Everything a front end's event loop reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Session(SessionEvent),
    /// Progress of the running combine job.
    Progress(ProgressEvent),
    /// Terminal result of the running combine job. Sent exactly once per job.
    CombineFinished(CombineResult<CombineReport>),
}

impl From<SessionEvent> for UiEvent {
    fn from(event: SessionEvent) -> Self {
        UiEvent::Session(event)
    }
}

impl From<ProgressEvent> for UiEvent {
    fn from(event: ProgressEvent) -> Self {
        UiEvent::Progress(event)
    }
}
