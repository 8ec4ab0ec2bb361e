//! Common test utilities and helpers
#![allow(dead_code, unused_imports)]

pub mod fakes;
pub mod fixtures;
pub mod git;

pub use self::fakes::{name_of, FakeRunner, RecordingReporter, Reply, ScriptedInput};
pub use self::fixtures::{RemoteFixture, TestTree};
pub use self::git::{git, head_subject, is_git_available};

use std::path::Path;
use sync_repos::core::SyncOptions;

/// Options for a run over `root` with every default
pub fn options_for(root: &Path) -> SyncOptions {
    SyncOptions::new(root)
}
