//! Repository discovery

use ignore::WalkBuilder;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use super::config::{DEFAULT_REPO_NAME, METADATA_DIR_NAME, UNKNOWN_REPO_NAME};
use crate::core::report::{Reporter, SyncEvent};
use crate::error::DiscoveryError;

/// How the tree below the search root is walked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Name of the directory that marks a repository root
    pub metadata_dir: String,
    /// Deepest repository root to report, the search root being depth 0
    pub max_depth: Option<usize>,
    /// Directory names never entered
    pub skip_dirs: Vec<String>,
    pub follow_links: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            metadata_dir: METADATA_DIR_NAME.to_string(),
            max_depth: None,
            skip_dirs: Vec::new(),
            follow_links: false,
        }
    }
}

/// Root of one working copy: the parent of its metadata directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    /// Short display name, unique within one run
    pub name: String,
    pub path: PathBuf,
}

/// Repositories in discovery order
pub type RepositorySet = Vec<Repository>;

/// Walks `root` once and collects every repository below it
///
/// Entries are visited depth-first in file-name order, so the result is
/// stable for a fixed tree. Metadata directories are never entered, but
/// working trees are, so nested repositories appear as flat entries.
/// Unreadable entries below the root are reported and skipped; only an
/// unusable root is an error.
pub fn find_repositories(
    root: &Path,
    options: &DiscoveryOptions,
    reporter: &dyn Reporter,
) -> Result<RepositorySet, DiscoveryError> {
    check_root(root)?;

    let metadata_dir = options.metadata_dir.clone();
    let skip_dirs = options.skip_dirs.clone();

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(options.follow_links)
        // a repository at depth N has its metadata directory at N + 1
        .max_depth(options.max_depth.map(|depth| depth + 1))
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            if is_dir && skip_dirs.iter().any(|skip| entry.file_name() == OsStr::new(skip)) {
                return false;
            }
            // Yield the metadata directory itself but nothing inside it
            entry.depth() < 2 || !parent_is(entry.path(), &metadata_dir)
        });

    let mut paths = Vec::new();
    for result in builder.build() {
        match result {
            Ok(entry) => {
                if entry.depth() == 0 || entry.file_name() != OsStr::new(&options.metadata_dir) {
                    continue;
                }
                if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    continue;
                }
                if let Some(parent) = entry.path().parent() {
                    paths.push(parent.to_path_buf());
                }
            }
            Err(err) => reporter.report(&SyncEvent::WalkEntrySkipped {
                path: error_path(&err),
                error: err.to_string(),
            }),
        }
    }

    Ok(name_repositories(root, paths))
}

fn check_root(root: &Path) -> Result<(), DiscoveryError> {
    let metadata = fs::metadata(root).map_err(|source| DiscoveryError::RootInaccessible {
        root: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(DiscoveryError::NotADirectory {
            root: root.to_path_buf(),
        });
    }
    fs::read_dir(root).map_err(|source| DiscoveryError::RootInaccessible {
        root: root.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn parent_is(path: &Path, name: &str) -> bool {
    path.parent()
        .and_then(Path::file_name)
        .is_some_and(|parent| parent == OsStr::new(name))
}

fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        _ => None,
    }
}

/// Assigns display names, suffixing duplicates in discovery order
fn name_repositories(root: &Path, paths: Vec<PathBuf>) -> RepositorySet {
    let mut name_counts: HashMap<String, usize> = HashMap::new();

    paths
        .into_iter()
        .map(|path| {
            let base_name = if path == root {
                // "." has no file name of its own
                root.canonicalize()
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                    .unwrap_or_else(|| DEFAULT_REPO_NAME.to_string())
            } else {
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| UNKNOWN_REPO_NAME.to_string())
            };

            let count = name_counts.entry(base_name.clone()).or_insert(0);
            *count += 1;
            let name = if *count > 1 {
                format!("{base_name}-{count}")
            } else {
                base_name
            };

            Repository { name, path }
        })
        .collect()
}
