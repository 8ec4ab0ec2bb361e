//! Git status enumeration and utilities

/// Per-repository outcome of one synchronization step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Working tree had no uncommitted changes
    Clean,
    /// Local changes were committed and pushed
    Committed,
    /// Operator declined to commit (empty message)
    Skipped,
    /// Status query could not run; repository treated as clean
    StatusError,
    /// Reading the message, committing or pushing failed
    ReconcileError,
    /// Pull completed
    Pulled,
    /// Pull failed or could not run
    PullError,
}

impl Status {
    /// Returns the emoji symbol for this status
    pub fn symbol(&self) -> &str {
        match self {
            Status::Clean | Status::Committed | Status::Pulled => "🟢",
            Status::Skipped => "🟠",
            Status::StatusError => "🟡",
            Status::ReconcileError | Status::PullError => "🔴",
        }
    }

    /// Returns the text representation of this status
    pub fn text(&self) -> &str {
        match self {
            Status::Clean => "clean",
            Status::Committed => "committed",
            Status::Skipped => "skipped",
            Status::StatusError => "status-unknown",
            Status::ReconcileError => "commit-failed",
            Status::Pulled => "pulled",
            Status::PullError => "pull-failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Status::StatusError | Status::ReconcileError | Status::PullError
        )
    }
}
