//! Basic git operations and command execution

use std::path::Path;

use super::runner::{CommandResult, ProcessRunner};
use crate::core::config::{DEFAULT_GIT_PROGRAM, PROMPT_SUFFIX};
use crate::core::input::OperatorInput;
use crate::core::report::{Reporter, SyncEvent};
use crate::error::{PullError, ReconcileError, StatusCheckError};

// Git command arguments
const GIT_STATUS_PORCELAIN_ARGS: &[&str] = &["status", "--porcelain"];
const GIT_COMMIT_ALL_ARGS: &[&str] = &["commit", "-a", "-m"];
const GIT_PUSH_ARGS: &[&str] = &["push"];
const GIT_PULL_ARGS: &[&str] = &["pull"];

/// The tool binary and the four subcommands a run issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommands {
    pub program: String,
    pub status: Vec<String>,
    /// The commit message is appended as the final argument
    pub commit: Vec<String>,
    pub push: Vec<String>,
    pub pull: Vec<String>,
}

impl Default for GitCommands {
    fn default() -> Self {
        Self {
            program: DEFAULT_GIT_PROGRAM.to_string(),
            status: to_owned_args(GIT_STATUS_PORCELAIN_ARGS),
            commit: to_owned_args(GIT_COMMIT_ALL_ARGS),
            push: to_owned_args(GIT_PUSH_ARGS),
            pull: to_owned_args(GIT_PULL_ARGS),
        }
    }
}

fn to_owned_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

fn as_args(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

/// What the commit-and-push flow did for a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Empty message, nothing was run
    Skipped,
    CommittedAndPushed,
}

/// Asks the status query whether `repo` has uncommitted changes
///
/// Dirty iff the trimmed stdout is non-empty; warnings on stderr are ignored.
/// A status query that cannot run, or exits non-zero, is an error rather
/// than an answer.
pub async fn check_dirty(
    runner: &dyn ProcessRunner,
    commands: &GitCommands,
    repo: &Path,
) -> Result<bool, StatusCheckError> {
    let result = runner
        .run(repo, &commands.program, &as_args(&commands.status))
        .await?;
    if !result.success {
        return Err(StatusCheckError::Failed {
            output: result.trimmed_output().to_string(),
        });
    }
    Ok(!result.trimmed_stdout().is_empty())
}

/// Checks if a repository has uncommitted changes
///
/// Fails open: when the status query errors the repository is reported and
/// classified clean, so one broken repository never blocks the run.
pub async fn is_dirty(
    runner: &dyn ProcessRunner,
    commands: &GitCommands,
    repo: &Path,
    reporter: &dyn Reporter,
) -> bool {
    match check_dirty(runner, commands, repo).await {
        Ok(dirty) => dirty,
        Err(err) => {
            reporter.report(&SyncEvent::StatusCheckFailed {
                repo: repo.to_path_buf(),
                error: err.to_string(),
            });
            false
        }
    }
}

/// Prompt shown to the operator for one dirty repository
pub fn commit_prompt(repo: &Path) -> String {
    format!("[{}] {PROMPT_SUFFIX}", repo.display())
}

/// Prompts for a message, then commits all changes and pushes
///
/// An empty (or whitespace-only) answer skips the repository. Push is never
/// attempted when the commit fails.
pub async fn commit_and_push(
    runner: &dyn ProcessRunner,
    commands: &GitCommands,
    input: &mut dyn OperatorInput,
    repo: &Path,
) -> Result<ReconcileOutcome, ReconcileError> {
    let answer = input.read_line(&commit_prompt(repo)).await?;
    let message = answer.trim();
    if message.is_empty() {
        return Ok(ReconcileOutcome::Skipped);
    }

    let mut commit_args = as_args(&commands.commit);
    commit_args.push(message);
    let commit = runner.run(repo, &commands.program, &commit_args).await?;
    if !commit.success {
        return Err(ReconcileError::Commit {
            output: commit.trimmed_output().to_string(),
        });
    }

    let push = runner
        .run(repo, &commands.program, &as_args(&commands.push))
        .await?;
    if !push.success {
        return Err(ReconcileError::Push {
            output: push.trimmed_output().to_string(),
        });
    }

    Ok(ReconcileOutcome::CommittedAndPushed)
}

/// Updates `repo` from its remote
///
/// On failure the repository is left as the tool left it.
pub async fn pull(
    runner: &dyn ProcessRunner,
    commands: &GitCommands,
    repo: &Path,
) -> Result<CommandResult, PullError> {
    let result = runner
        .run(repo, &commands.program, &as_args(&commands.pull))
        .await?;
    if !result.success {
        return Err(PullError::Failed {
            output: result.output,
        });
    }
    Ok(result)
}
