//! # sync-repos
//!
//! `sync-repos` keeps a directory full of git repositories in step with
//! their remotes. It powers the `sync-repos` CLI tool.
//!
//! A run has two phases:
//!
//! - **Serial reconcile**: every repository with uncommitted changes is
//!   shown to the operator, one at a time. A typed message commits all
//!   tracked changes and pushes; an empty answer skips the repository.
//! - **Concurrent pull**: once every prompt is answered, all repositories
//!   are pulled at the same time and the run waits for each one to finish.
//!
//! Failures in one repository are reported and never stop the others.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sync_repos::core::{StdinInput, SyncOptions, SyncOrchestrator, TracingReporter};
//! use sync_repos::git::SystemRunner;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = SyncOrchestrator::new(
//!         SyncOptions::new("."),
//!         Arc::new(SystemRunner::new()),
//!         Arc::new(TracingReporter),
//!     );
//!     let summary = orchestrator.run(&mut StdinInput::stdio()).await?;
//!     println!("{} repositories", summary.repositories.len());
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod core;
pub mod error;
pub mod git;
pub mod utils;
