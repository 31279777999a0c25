//! Core enums used throughout the application.

/// Where an input file is in its one-shot metadata lifecycle.
///
/// Moves from `Pending` to either `Ready` or `Failed` exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProbeStatus {
    /// Probe in flight; channels unknown.
    #[default]
    Pending,
    /// Probe succeeded; channels known.
    Ready,
    /// Probe failed; channels stay unknown until the file is removed.
    Failed(String),
}

impl ProbeStatus {
    /// True once the probe has produced any result.
    pub fn is_settled(&self) -> bool {
        !matches!(self, ProbeStatus::Pending)
    }
}

/// Direction for moving a file within the ordered input list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    /// Towards index 0.
    Up,
    /// Towards the end of the list.
    Down,
}

impl MoveDirection {
    /// Signed offset applied to an index.
    pub fn offset(self) -> isize {
        match self {
            MoveDirection::Up => -1,
            MoveDirection::Down => 1,
        }
    }
}

impl std::fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveDirection::Up => write!(f, "up"),
            MoveDirection::Down => write!(f, "down"),
        }
    }
}
