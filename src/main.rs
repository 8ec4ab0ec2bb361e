//! sync-repos: commit, push and pull every git repository below a directory
//!
//! Repositories with uncommitted changes are committed (with a message typed
//! by the operator) and pushed one at a time, then every repository is pulled
//! concurrently.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command as ClapCommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sync_repos::commands::handle_sync_command;
use sync_repos::core::CliConfig;

fn build_cli() -> ClapCommand {
    ClapCommand::new("sync-repos")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Commit, push and pull every git repository below a directory")
        .arg(
            Arg::new("root")
                .help("Directory to search for repositories")
                .default_value(".")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Maximum number of pulls running at once (default: one per repository)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("sequential")
                .long("sequential")
                .help("Pull one repository at a time (same as --jobs 1)")
                .action(ArgAction::SetTrue)
                .conflicts_with("jobs"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECS")
                .help("Kill any git command still running after SECS seconds")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("git")
                .long("git")
                .value_name("PATH")
                .help("git binary to run"),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .help("Ignore repositories nested deeper than this below the root")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("skip")
                .long("skip")
                .value_name("DIR")
                .help("Directory name to never descend into (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("follow-links")
                .long("follow-links")
                .help("Follow symbolic links while searching")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .help("Do not draw a progress bar while pulling")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Read settings from this TOML file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log warnings and errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

fn cli_config(matches: &ArgMatches) -> CliConfig {
    CliConfig {
        root: matches
            .get_one::<PathBuf>("root")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        jobs: matches.get_one::<usize>("jobs").copied(),
        sequential: matches.get_flag("sequential"),
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
        git: matches.get_one::<String>("git").cloned(),
        max_depth: matches.get_one::<usize>("max-depth").copied(),
        skip: matches
            .get_many::<String>("skip")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        follow_links: matches.get_flag("follow-links"),
        no_progress: matches.get_flag("no-progress"),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("verbose"), matches.get_flag("quiet"));

    let config_file = matches.get_one::<PathBuf>("config").cloned();
    match handle_sync_command(cli_config(&matches), config_file).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "sync aborted");
            ExitCode::FAILURE
        }
    }
}
