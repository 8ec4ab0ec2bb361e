//! Structured reporting of synchronization events
//!
//! Components never log directly. They emit [`SyncEvent`]s into a
//! [`Reporter`] handed to them by the caller; the binary uses
//! [`TracingReporter`], tests substitute a recorder.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::core::sync::Phase;

/// One observable step of a run, keyed by repository path where relevant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    PhaseChanged { phase: Phase },
    DiscoveryFinished { count: usize },
    WalkEntrySkipped { path: Option<PathBuf>, error: String },
    StatusCheckFailed { repo: PathBuf, error: String },
    Dirty { repo: PathBuf },
    CommitSkipped { repo: PathBuf },
    CommittedAndPushed { repo: PathBuf },
    ReconcileFailed { repo: PathBuf, error: String },
    PullFailed { repo: PathBuf, output: String, error: String },
    PullDone { repo: PathBuf },
}

impl SyncEvent {
    /// Repository the event is about, if any
    pub fn repo(&self) -> Option<&PathBuf> {
        match self {
            SyncEvent::StatusCheckFailed { repo, .. }
            | SyncEvent::Dirty { repo }
            | SyncEvent::CommitSkipped { repo }
            | SyncEvent::CommittedAndPushed { repo }
            | SyncEvent::ReconcileFailed { repo, .. }
            | SyncEvent::PullFailed { repo, .. }
            | SyncEvent::PullDone { repo } => Some(repo),
            SyncEvent::PhaseChanged { .. }
            | SyncEvent::DiscoveryFinished { .. }
            | SyncEvent::WalkEntrySkipped { .. } => None,
        }
    }
}

/// Sink for [`SyncEvent`]s, shared by the serial phase and every pull worker
pub trait Reporter: Send + Sync {
    fn report(&self, event: &SyncEvent);
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn report(&self, event: &SyncEvent) {
        (**self).report(event);
    }
}

/// Forwards every event to `first`, then `second`
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A, B> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Reporter, B: Reporter> Reporter for Tee<A, B> {
    fn report(&self, event: &SyncEvent) {
        self.first.report(event);
        self.second.report(event);
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: &SyncEvent) {}
}

/// Emits each event as a `tracing` event with structured fields
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &SyncEvent) {
        match event {
            SyncEvent::PhaseChanged { phase } => debug!(phase = %phase, "phase changed"),
            SyncEvent::DiscoveryFinished { count } => {
                info!(count = *count, "repository discovery finished")
            }
            SyncEvent::WalkEntrySkipped { path, error } => match path {
                Some(path) => warn!(path = %path.display(), error = %error, "skipping unreadable entry"),
                None => warn!(error = %error, "skipping unreadable entry"),
            },
            SyncEvent::StatusCheckFailed { repo, error } => {
                error!(dir = %repo.display(), error = %error, "failed to check git status")
            }
            SyncEvent::Dirty { repo } => {
                warn!(dir = %repo.display(), "repository has uncommitted changes")
            }
            SyncEvent::CommitSkipped { repo } => {
                info!(dir = %repo.display(), "skipping commit (no message provided)")
            }
            SyncEvent::CommittedAndPushed { repo } => {
                info!(dir = %repo.display(), "committed and pushed")
            }
            SyncEvent::ReconcileFailed { repo, error } => {
                error!(dir = %repo.display(), error = %error, "failed to commit and push")
            }
            SyncEvent::PullFailed {
                repo,
                output,
                error,
            } => error!(
                dir = %repo.display(),
                output = %output.trim(),
                error = %error,
                "error with directory"
            ),
            SyncEvent::PullDone { repo } => info!(dir = %repo.display(), "done"),
        }
    }
}
