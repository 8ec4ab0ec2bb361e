//! Error types for repository synchronization
//!
//! Only [`DiscoveryError`] is fatal to a run. Everything else is scoped to a
//! single repository and is reported, never propagated past the orchestrator.

use std::path::PathBuf;
use thiserror::Error;

/// The initial traversal could not start
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("cannot access search root '{}': {source}", root.display())]
    RootInaccessible {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("search root '{}' is not a directory", root.display())]
    NotADirectory { root: PathBuf },

    #[error("repository discovery was interrupted: {message}")]
    Interrupted { message: String },
}

/// An external command could not be run to completion
///
/// A command that ran and exited non-zero is not an `ExecutionError`; that is
/// reported through [`crate::git::CommandResult::success`].
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("working directory '{}' does not exist", dir.display())]
    MissingDirectory { dir: PathBuf },

    #[error("failed to start '{program}' in '{}': {source}", dir.display())]
    Spawn {
        program: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' in '{}' timed out after {limit:?}", dir.display())]
    TimedOut {
        program: String,
        dir: PathBuf,
        limit: std::time::Duration,
    },
}

/// The operator input channel could not deliver a line
#[derive(Debug, Error)]
pub enum InputError {
    #[error("operator input closed")]
    Closed,

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// The status query could not produce a usable answer
#[derive(Debug, Error)]
pub enum StatusCheckError {
    #[error("git status failed: {output}")]
    Failed { output: String },

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Failure of the interactive commit-and-push flow for one repository
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("git commit failed: {output}")]
    Commit { output: String },

    #[error("git push failed: {output}")]
    Push { output: String },

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Failure of one pull unit
#[derive(Debug, Error)]
pub enum PullError {
    /// Output is not part of the message, see [`PullError::output`]
    #[error("git pull failed")]
    Failed { output: String },

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl PullError {
    /// Captured command output, empty when the command never ran
    pub fn output(&self) -> &str {
        match self {
            PullError::Failed { output } => output,
            PullError::Execution(_) => "",
        }
    }
}
