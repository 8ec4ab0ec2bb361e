//! Repository sync command implementation
//!
//! This module wires the real collaborators (OS processes, the terminal,
//! `tracing`) into the orchestrator: dirty repositories are committed and
//! pushed one by one, then every repository is pulled concurrently.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::{
    create_pull_progress_bar, load_file_config, set_terminal_title, set_terminal_title_and_flush,
    CliConfig, EnvConfig, ProgressReporter, Reporter, StdinInput, SyncOptions, SyncOrchestrator,
    SyncSummary, TracingReporter, NO_REPOS_MESSAGE, SCANNING_MESSAGE,
};
use crate::git::{ProcessRunner, SystemRunner};

/// Handles the sync command
///
/// Returns an error only when configuration is invalid or discovery fails.
/// Per-repository failures are logged and summarized, never returned.
pub async fn handle_sync_command(cli: CliConfig, config_file: Option<PathBuf>) -> Result<()> {
    let file = load_file_config(config_file.as_deref())?;
    let options = SyncOptions::resolve(cli, &EnvConfig::from_env(), &file);

    // Set terminal title to indicate sync-repos is running
    set_terminal_title("🚀 sync-repos");
    if std::io::stdout().is_terminal() {
        println!("{SCANNING_MESSAGE}");
    }

    let show_progress = options.show_progress && std::io::stderr().is_terminal();
    let runner: Arc<dyn ProcessRunner> =
        Arc::new(SystemRunner::with_timeout(options.command_timeout));
    let progress = create_pull_progress_bar(show_progress)?;
    let reporter: Arc<dyn Reporter> =
        Arc::new(ProgressReporter::new(TracingReporter, progress.clone()));
    let root = options.root.clone();

    let orchestrator =
        SyncOrchestrator::new(options, runner, reporter).with_progress(progress);
    let mut input = StdinInput::stdio();
    let result = orchestrator.run(&mut input).await;

    // Set terminal title to green checkbox to indicate completion
    set_terminal_title_and_flush("✅ sync-repos");

    let summary =
        result.with_context(|| format!("could not walk filesystem at {}", root.display()))?;
    print_summary(&root, &summary);
    Ok(())
}

fn no_repos_message(root: &Path) -> String {
    format!("{NO_REPOS_MESSAGE} {}", root.display())
}

fn print_summary(root: &Path, summary: &SyncSummary) {
    if summary.repositories.is_empty() {
        println!("{}", no_repos_message(root));
        return;
    }

    println!();
    println!("{}", summary.statistics.generate_summary(summary.elapsed));

    let detailed_summary = summary.statistics.generate_detailed_summary();
    if !detailed_summary.is_empty() {
        println!("\n{}", "━".repeat(70));
        println!("{detailed_summary}");
        println!("{}", "━".repeat(70));
    }
}
