//! Statistics tracking for repository operations

use crate::core::config::{
    ERROR_MESSAGE_MAX_LENGTH, ERROR_MESSAGE_TRUNCATE_LENGTH, PATH_DISPLAY_WIDTH,
};
use crate::core::report::{Reporter, SyncEvent};
use crate::git::Status;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Statistics for one synchronization run, fed from [`SyncEvent`]s
///
/// Uses atomic counters for lock-free updates from concurrent pull workers,
/// while the failure list remains behind a Mutex.
#[derive(Debug)]
pub struct SyncStatistics {
    pub discovered_repos: AtomicU64,
    pub dirty_repos: AtomicU64,
    pub committed_repos: AtomicU64,
    pub skipped_repos: AtomicU64,
    pub status_errors: AtomicU64,
    pub reconcile_errors: AtomicU64,
    pub pulls_done: AtomicU64,
    pub pull_errors: AtomicU64,
    pub walk_skipped: AtomicU64,
    pub failed_repos: Mutex<Vec<(String, Status, String)>>, // (repo_path, status, error_message)
}

impl Default for SyncStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncStatistics {
    /// Creates a new statistics tracker with all counters initialized to zero
    pub fn new() -> Self {
        Self {
            discovered_repos: AtomicU64::new(0),
            dirty_repos: AtomicU64::new(0),
            committed_repos: AtomicU64::new(0),
            skipped_repos: AtomicU64::new(0),
            status_errors: AtomicU64::new(0),
            reconcile_errors: AtomicU64::new(0),
            pulls_done: AtomicU64::new(0),
            pull_errors: AtomicU64::new(0),
            walk_skipped: AtomicU64::new(0),
            failed_repos: Mutex::new(Vec::new()),
        }
    }

    /// Updates statistics from one event
    pub fn record(&self, event: &SyncEvent) {
        match event {
            SyncEvent::PhaseChanged { .. } => {}
            SyncEvent::DiscoveryFinished { count } => {
                self.discovered_repos.store(*count as u64, Ordering::Relaxed);
            }
            SyncEvent::WalkEntrySkipped { .. } => {
                self.walk_skipped.fetch_add(1, Ordering::Relaxed);
            }
            SyncEvent::StatusCheckFailed { repo, error } => {
                self.status_errors.fetch_add(1, Ordering::Relaxed);
                self.push_failure(&repo.to_string_lossy(), Status::StatusError, error);
            }
            SyncEvent::Dirty { .. } => {
                self.dirty_repos.fetch_add(1, Ordering::Relaxed);
            }
            SyncEvent::CommitSkipped { .. } => {
                self.skipped_repos.fetch_add(1, Ordering::Relaxed);
            }
            SyncEvent::CommittedAndPushed { .. } => {
                self.committed_repos.fetch_add(1, Ordering::Relaxed);
            }
            SyncEvent::ReconcileFailed { repo, error } => {
                self.reconcile_errors.fetch_add(1, Ordering::Relaxed);
                self.push_failure(&repo.to_string_lossy(), Status::ReconcileError, error);
            }
            SyncEvent::PullFailed { repo, output, error } => {
                self.pull_errors.fetch_add(1, Ordering::Relaxed);
                let detail = if output.trim().is_empty() { error } else { output };
                self.push_failure(&repo.to_string_lossy(), Status::PullError, detail);
            }
            SyncEvent::PullDone { .. } => {
                self.pulls_done.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn push_failure(&self, repo_path: &str, status: Status, message: &str) {
        if let Ok(mut guard) = self.failed_repos.lock() {
            guard.push((repo_path.to_string(), status, clean_error_message(message)));
        }
    }

    /// Pulls that finished without error
    pub fn pulled(&self) -> u64 {
        self.pulls_done
            .load(Ordering::Relaxed)
            .saturating_sub(self.pull_errors.load(Ordering::Relaxed))
    }

    pub fn failure_count(&self) -> u64 {
        self.status_errors.load(Ordering::Relaxed)
            + self.reconcile_errors.load(Ordering::Relaxed)
            + self.pull_errors.load(Ordering::Relaxed)
    }

    /// Generates the one-line summary of the run
    pub fn generate_summary(&self, duration: Duration) -> String {
        let duration_secs = duration.as_secs_f64();

        let discovered = self.discovered_repos.load(Ordering::Relaxed);
        let committed = self.committed_repos.load(Ordering::Relaxed);
        let skipped = self.skipped_repos.load(Ordering::Relaxed);
        let pulled = self.pulled();
        let failed = self.failure_count();

        let mut summary = format!(
            "✅ Completed in {duration_secs:.1}s • {discovered} repos • {committed} committed • {skipped} skipped • {pulled} pulled"
        );
        if failed > 0 {
            summary.push_str(&format!(" • {failed} failed"));
        }
        summary
    }

    /// Generates detailed lines for repositories needing attention
    pub fn generate_detailed_summary(&self) -> String {
        let failed_repos = match self.failed_repos.lock() {
            Ok(guard) => guard,
            Err(_) => return String::new(),
        };
        if failed_repos.is_empty() {
            return String::new();
        }

        let mut lines = vec![format!("🔴 FAILED REPOS ({})", failed_repos.len())];
        for (i, (repo_path, status, error)) in failed_repos.iter().enumerate() {
            let tree_char = if i == failed_repos.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            let short_path = crate::utils::shorten_path(repo_path, PATH_DISPLAY_WIDTH);
            lines.push(format!(
                "   {} {} {:14} {:30} # {}",
                tree_char,
                status.symbol(),
                status.text(),
                short_path,
                error
            ));
        }
        lines.join("\n")
    }
}

impl Reporter for SyncStatistics {
    fn report(&self, event: &SyncEvent) {
        self.record(event);
    }
}

/// Cleans and formats error messages for display
pub(crate) fn clean_error_message(error: &str) -> String {
    // Replace newlines/tabs with spaces and collapse whitespace
    let cleaned = error.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.contains("timed out") {
        "timeout".to_string()
    } else if cleaned.contains("Authentication failed") || cleaned.contains("Permission denied") {
        "authentication failed".to_string()
    } else if cleaned.contains("CONFLICT") || cleaned.contains("diverged") {
        "merge conflict".to_string()
    } else if cleaned.contains("Could not resolve host") || cleaned.contains("Connection") {
        "network error".to_string()
    } else if cleaned.chars().count() > ERROR_MESSAGE_MAX_LENGTH {
        let truncated: String = cleaned.chars().take(ERROR_MESSAGE_TRUNCATE_LENGTH).collect();
        format!("{truncated}...")
    } else {
        cleaned
    }
}
