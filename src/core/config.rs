//! Configuration constants and settings
//!
//! Settings are layered: command line, then environment, then the TOML
//! config file, then the built-in defaults below.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::discovery::DiscoveryOptions;
use crate::git::GitCommands;

// Version control tool
pub const DEFAULT_GIT_PROGRAM: &str = "git";
pub const METADATA_DIR_NAME: &str = ".git";

// Environment overrides
pub const JOBS_ENV_VAR: &str = "SYNC_REPOS_JOBS";
pub const TIMEOUT_ENV_VAR: &str = "SYNC_REPOS_TIMEOUT";

// Config file location: <config_dir>/sync-repos/config.toml
pub const CONFIG_DIR_NAME: &str = "sync-repos";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// Repository naming
pub const DEFAULT_REPO_NAME: &str = "current";
pub const UNKNOWN_REPO_NAME: &str = "unknown";

// UI Constants
pub const SCANNING_MESSAGE: &str = "🔍 Scanning for git repositories...";
pub const NO_REPOS_MESSAGE: &str = "No git repositories found in";
pub const PROMPT_SUFFIX: &str = "Enter commit message (or press Enter to skip): ";
pub const PROGRESS_CHARS: &str = "##-";
pub const PROGRESS_TEMPLATE: &str = "{prefix:.bold} [{bar:30}] {pos}/{len} {wide_msg}";

// Display formatting constants
pub const PATH_DISPLAY_WIDTH: usize = 30;
pub const ERROR_MESSAGE_MAX_LENGTH: usize = 60;
pub const ERROR_MESSAGE_TRUNCATE_LENGTH: usize = 57;

/// Contents of the optional TOML config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub git: Option<String>,
    pub jobs: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub max_depth: Option<usize>,
    pub skip: Vec<String>,
    pub follow_links: Option<bool>,
    pub progress: Option<bool>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid config file")
    }
}

/// Default config file path, if the platform has a config directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads the config file
///
/// An explicitly named file must exist. The default location is optional.
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(FileConfig::default()),
        },
    };

    if !required && !path.exists() {
        return Ok(FileConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    FileConfig::parse(&content).with_context(|| format!("in {}", path.display()))
}

/// Values read from the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub jobs: Option<usize>,
    pub timeout_secs: Option<u64>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds from an arbitrary lookup; unparsable or zero values are ignored
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            jobs: parse_positive(JOBS_ENV_VAR, lookup(JOBS_ENV_VAR)),
            timeout_secs: parse_positive(TIMEOUT_ENV_VAR, lookup(TIMEOUT_ENV_VAR)),
        }
    }
}

fn parse_positive<T>(key: &str, raw: Option<String>) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let raw = raw?;
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Some(value),
        _ => {
            tracing::warn!(variable = key, value = %raw, "ignoring invalid environment value");
            None
        }
    }
}

/// Settings given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub root: PathBuf,
    pub jobs: Option<usize>,
    pub sequential: bool,
    pub timeout_secs: Option<u64>,
    pub git: Option<String>,
    pub max_depth: Option<usize>,
    pub skip: Vec<String>,
    pub follow_links: bool,
    pub no_progress: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub root: PathBuf,
    pub discovery: DiscoveryOptions,
    pub commands: GitCommands,
    /// Upper bound on simultaneously running pulls, `None` for one per repository
    pub jobs: Option<usize>,
    pub command_timeout: Option<Duration>,
    pub show_progress: bool,
}

impl SyncOptions {
    /// Defaults for `root`: the exact behavior of a plain run
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            discovery: DiscoveryOptions::default(),
            commands: GitCommands::default(),
            jobs: None,
            command_timeout: None,
            show_progress: false,
        }
    }

    pub fn resolve(cli: CliConfig, env: &EnvConfig, file: &FileConfig) -> Self {
        let mut options = Self::new(cli.root);

        options.jobs = get_pull_concurrency(cli.jobs, cli.sequential, env, file);
        options.command_timeout = cli
            .timeout_secs
            .or(env.timeout_secs)
            .or(file.timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        if let Some(program) = cli.git.or_else(|| file.git.clone()) {
            options.commands.program = program;
        }

        options.discovery.max_depth = cli.max_depth.or(file.max_depth);
        options.discovery.follow_links = cli.follow_links || file.follow_links.unwrap_or(false);
        let mut skip = file.skip.clone();
        for dir in cli.skip {
            if !skip.contains(&dir) {
                skip.push(dir);
            }
        }
        options.discovery.skip_dirs = skip;

        options.show_progress = !cli.no_progress && file.progress.unwrap_or(true);
        options
    }
}

/// Determines the pull-phase concurrency bound
///
/// Priority order:
/// 1. --sequential flag → 1
/// 2. --jobs N flag → N
/// 3. SYNC_REPOS_JOBS env var → N
/// 4. config file `jobs` → N
/// 5. unbounded (one live worker per repository)
pub fn get_pull_concurrency(
    jobs: Option<usize>,
    sequential: bool,
    env: &EnvConfig,
    file: &FileConfig,
) -> Option<usize> {
    if sequential {
        return Some(1);
    }
    jobs.or(env.jobs)
        .or(file.jobs)
        .map(|n| n.max(1))
}
