//! Run phases of the synchronization orchestrator.

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Discovering,
    SerialReconcile,
    ConcurrentPull,
    Done,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }

    /// Phases only move forward; discovery is the only one that can fail
    pub fn can_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Discovering, Phase::SerialReconcile)
                | (Phase::Discovering, Phase::Failed)
                | (Phase::SerialReconcile, Phase::ConcurrentPull)
                | (Phase::ConcurrentPull, Phase::Done)
        )
    }

    pub fn text(self) -> &'static str {
        match self {
            Phase::Discovering => "discovering",
            Phase::SerialReconcile => "serial-reconcile",
            Phase::ConcurrentPull => "concurrent-pull",
            Phase::Done => "done",
            Phase::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IllegalTransition {
    pub from: Phase,
    pub to: Phase,
}

impl fmt::Display for IllegalTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "illegal phase transition {} -> {}", self.from, self.to)
    }
}

impl std::error::Error for IllegalTransition {}

pub struct SyncState {
    phase: Phase,
    start_time: Instant,
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Discovering,
            start_time: Instant::now(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn advance(&mut self, next: Phase) -> Result<Phase, IllegalTransition> {
        if !self.phase.can_advance_to(next) {
            return Err(IllegalTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(next)
    }
}
