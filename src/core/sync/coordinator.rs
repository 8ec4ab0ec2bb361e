//! Two-phase synchronization: serial reconcile, then concurrent pull.

use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::core::config::SyncOptions;
use crate::core::discovery::{find_repositories, RepositorySet};
use crate::core::input::OperatorInput;
use crate::core::report::{Reporter, SyncEvent, Tee};
use crate::core::stats::SyncStatistics;
use crate::core::sync::state::{Phase, SyncState};
use crate::error::DiscoveryError;
use crate::git::{commit_and_push, is_dirty, pull, GitCommands, ProcessRunner, ReconcileOutcome};

/// Result of a run that got past discovery
pub struct SyncSummary {
    pub repositories: RepositorySet,
    pub statistics: Arc<SyncStatistics>,
    pub elapsed: Duration,
}

/// Drives one run: `Discovering → SerialReconcile → ConcurrentPull → Done`
///
/// Every per-repository failure is reported and absorbed here. The only
/// error a run returns is a failed discovery.
pub struct SyncOrchestrator {
    options: SyncOptions,
    commands: Arc<GitCommands>,
    runner: Arc<dyn ProcessRunner>,
    reporter: Arc<dyn Reporter>,
    statistics: Arc<SyncStatistics>,
    state: SyncState,
    progress: ProgressBar,
}

impl SyncOrchestrator {
    pub fn new(
        options: SyncOptions,
        runner: Arc<dyn ProcessRunner>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        let statistics = Arc::new(SyncStatistics::new());
        let reporter: Arc<dyn Reporter> =
            Arc::new(Tee::new(Arc::clone(&statistics), reporter));
        Self {
            commands: Arc::new(options.commands.clone()),
            options,
            runner,
            reporter,
            statistics,
            state: SyncState::new(),
            progress: ProgressBar::hidden(),
        }
    }

    /// Advances `progress` once per finished pull
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub async fn run(
        mut self,
        input: &mut dyn OperatorInput,
    ) -> Result<SyncSummary, DiscoveryError> {
        self.reporter.report(&SyncEvent::PhaseChanged {
            phase: Phase::Discovering,
        });

        let repositories = match self.discover().await {
            Ok(repositories) => repositories,
            Err(err) => {
                self.enter(Phase::Failed);
                return Err(err);
            }
        };

        self.enter(Phase::SerialReconcile);
        self.reconcile_all(&repositories, input).await;

        // Hard barrier: no pull starts before every prompt has been answered
        self.enter(Phase::ConcurrentPull);
        self.pull_all(&repositories).await;

        self.enter(Phase::Done);
        Ok(SyncSummary {
            repositories,
            statistics: Arc::clone(&self.statistics),
            elapsed: self.state.elapsed(),
        })
    }

    /// Moves to `next` and reports it; an illegal move leaves the phase as is
    fn enter(&mut self, next: Phase) {
        let advanced = self.state.advance(next);
        // run() is the only caller and walks the phases in order
        debug_assert!(advanced.is_ok(), "{advanced:?}");
        if let Ok(phase) = advanced {
            self.reporter.report(&SyncEvent::PhaseChanged { phase });
        }
    }

    async fn discover(&self) -> Result<RepositorySet, DiscoveryError> {
        let root = self.options.root.clone();
        let discovery = self.options.discovery.clone();
        let reporter = Arc::clone(&self.reporter);

        let repositories = tokio::task::spawn_blocking(move || {
            find_repositories(&root, &discovery, reporter.as_ref())
        })
        .await
        .map_err(|err| DiscoveryError::Interrupted {
            message: err.to_string(),
        })??;

        self.reporter.report(&SyncEvent::DiscoveryFinished {
            count: repositories.len(),
        });
        Ok(repositories)
    }

    /// One repository at a time, in discovery order
    async fn reconcile_all(&self, repositories: &RepositorySet, input: &mut dyn OperatorInput) {
        for repository in repositories {
            let path = &repository.path;
            if !is_dirty(
                self.runner.as_ref(),
                &self.commands,
                path,
                self.reporter.as_ref(),
            )
            .await
            {
                continue;
            }

            self.reporter.report(&SyncEvent::Dirty { repo: path.clone() });
            let event = match commit_and_push(self.runner.as_ref(), &self.commands, input, path)
                .await
            {
                Ok(ReconcileOutcome::Skipped) => SyncEvent::CommitSkipped { repo: path.clone() },
                Ok(ReconcileOutcome::CommittedAndPushed) => {
                    SyncEvent::CommittedAndPushed { repo: path.clone() }
                }
                Err(err) => SyncEvent::ReconcileFailed {
                    repo: path.clone(),
                    error: err.to_string(),
                },
            };
            self.reporter.report(&event);
        }
    }

    /// One worker per repository, joined before returning
    async fn pull_all(&self, repositories: &RepositorySet) {
        let limit = self.options.jobs.unwrap_or(repositories.len()).max(1);
        let semaphore = Arc::new(Semaphore::new(limit));
        self.progress.set_length(repositories.len() as u64);

        let mut workers = FuturesUnordered::new();
        for repository in repositories {
            let path = repository.path.clone();
            let handle = tokio::spawn(pull_worker(
                path.clone(),
                Arc::clone(&self.runner),
                Arc::clone(&self.commands),
                Arc::clone(&self.reporter),
                Arc::clone(&semaphore),
                self.progress.clone(),
            ));
            workers.push(async move { (path, handle.await) });
        }

        while let Some((path, joined)) = workers.next().await {
            if let Err(err) = joined {
                self.reporter.report(&SyncEvent::PullFailed {
                    repo: path.clone(),
                    output: String::new(),
                    error: format!("pull worker failed: {err}"),
                });
                self.reporter.report(&SyncEvent::PullDone { repo: path });
                self.progress.inc(1);
            }
        }

        self.progress.finish_and_clear();
    }
}

async fn pull_worker(
    path: PathBuf,
    runner: Arc<dyn ProcessRunner>,
    commands: Arc<GitCommands>,
    reporter: Arc<dyn Reporter>,
    semaphore: Arc<Semaphore>,
    progress: ProgressBar,
) {
    // acquire only fails on a closed semaphore
    let _permit = semaphore.acquire_owned().await.ok();

    if let Err(err) = pull(runner.as_ref(), &commands, &path).await {
        reporter.report(&SyncEvent::PullFailed {
            repo: path.clone(),
            output: err.output().to_string(),
            error: err.to_string(),
        });
    }
    reporter.report(&SyncEvent::PullDone { repo: path });
    progress.inc(1);
}
