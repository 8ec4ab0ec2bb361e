//! Public API for git operations.
//!
//! This module provides the stable public API for git-related functionality:
//! - Running the external tool ([`ProcessRunner`], [`SystemRunner`])
//! - Dirty-state detection
//! - The interactive commit-and-push flow
//! - Pulling
//!
//! ## Example: Checking for changes
//!
//! ```rust,no_run
//! use sync_repos::core::NullReporter;
//! use sync_repos::git::{is_dirty, GitCommands, SystemRunner};
//! use std::path::Path;
//!
//! async fn check(path: &Path) {
//!     let runner = SystemRunner::new();
//!     if is_dirty(&runner, &GitCommands::default(), path, &NullReporter).await {
//!         println!("Repository has changes");
//!     }
//! }
//! ```

// Process execution
pub use super::runner::{CommandResult, ProcessRunner, SystemRunner};

// Operations
pub use super::operations::{
    check_dirty, commit_and_push, commit_prompt, is_dirty, pull, GitCommands, ReconcileOutcome,
};

// Status
pub use super::status::Status;
