//! Public API for the core module.
//!
//! This module provides the stable public API for core functionality including:
//! - Repository discovery
//! - The synchronization orchestrator
//! - Operator input and event reporting seams
//! - Statistics tracking
//! - Configuration utilities
//!
//! Internal implementation details are not exposed through this API.

// Discovery
pub use super::discovery::{find_repositories, DiscoveryOptions, Repository, RepositorySet};

// Orchestration
pub use super::sync::{Phase, SyncOrchestrator, SyncSummary};

// Collaborator seams
pub use super::input::{LineInput, OperatorInput, StdinInput};
pub use super::report::{NullReporter, Reporter, SyncEvent, Tee, TracingReporter};

// Statistics and progress
pub use super::progress::{create_pull_progress_bar, ProgressReporter};
pub use super::stats::SyncStatistics;

// Configuration
pub use super::config::{
    default_config_path, get_pull_concurrency, load_file_config, CliConfig, EnvConfig,
    FileConfig, SyncOptions,
};

// User-facing messages
pub use super::config::{NO_REPOS_MESSAGE, SCANNING_MESSAGE};

// Terminal utilities (re-exported from utils)
pub use crate::utils::{set_terminal_title, set_terminal_title_and_flush};
