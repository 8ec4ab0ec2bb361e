//! In-memory collaborators for orchestrator tests
//!
//! `FakeRunner` answers git invocations from a script keyed by the
//! repository's directory name and the subcommand, and records every start
//! and finish in one ordered log.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use sync_repos::core::{OperatorInput, Reporter, SyncEvent};
use sync_repos::error::{ExecutionError, InputError};
use sync_repos::git::{CommandResult, ProcessRunner};

/// Scripted answer for one (repository, subcommand) pair
#[derive(Debug, Clone)]
pub enum Reply {
    Exit {
        success: bool,
        output: String,
        stderr: String,
        delay: Duration,
    },
    SpawnFailure,
}

impl Reply {
    pub fn ok(output: &str) -> Self {
        Reply::Exit {
            success: true,
            output: output.to_string(),
            stderr: String::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn fail(output: &str) -> Self {
        Reply::Exit {
            success: false,
            output: output.to_string(),
            stderr: String::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn after(self, wait: Duration) -> Self {
        match self {
            Reply::Exit {
                success,
                output,
                stderr,
                ..
            } => Reply::Exit {
                success,
                output,
                stderr,
                delay: wait,
            },
            other => other,
        }
    }

    /// Adds text on stderr; `output` stays the stdout text
    pub fn with_stderr(self, text: &str) -> Self {
        match self {
            Reply::Exit {
                success,
                output,
                delay,
                ..
            } => Reply::Exit {
                success,
                output,
                stderr: text.to_string(),
                delay,
            },
            other => other,
        }
    }
}

/// One entry of the runner's timeline, e.g. `start pull b` or `end push a`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub stage: &'static str,
    pub program: String,
    pub verb: String,
    pub repo: String,
    pub args: Vec<String>,
}

#[derive(Default)]
pub struct FakeRunner {
    replies: Mutex<HashMap<(String, String), Reply>>,
    log: Mutex<Vec<LogEntry>>,
    active_pulls: AtomicUsize,
    max_active_pulls: AtomicUsize,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `verb` (status, commit, push, pull) for the repository named `repo`
    pub fn on(self, repo: &str, verb: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert((repo.to_string(), verb.to_string()), reply);
        self
    }

    /// Marks `repo` dirty
    pub fn dirty(self, repo: &str) -> Self {
        self.on(repo, "status", Reply::ok(" M src/lib.rs\n"))
    }

    pub fn log(&self) -> Vec<LogEntry> {
        self.log.lock().unwrap().clone()
    }

    /// `"<stage> <verb> <repo>"` lines in the order they happened
    pub fn timeline(&self) -> Vec<String> {
        self.log()
            .into_iter()
            .map(|entry| format!("{} {} {}", entry.stage, entry.verb, entry.repo))
            .collect()
    }

    /// Every started invocation of `verb`, as repository names
    pub fn started(&self, verb: &str) -> Vec<String> {
        self.log()
            .into_iter()
            .filter(|entry| entry.stage == "start" && entry.verb == verb)
            .map(|entry| entry.repo)
            .collect()
    }

    pub fn max_active_pulls(&self) -> usize {
        self.max_active_pulls.load(Ordering::SeqCst)
    }

    fn record(&self, stage: &'static str, program: &str, verb: &str, repo: &str, args: &[&str]) {
        self.log.lock().unwrap().push(LogEntry {
            stage,
            program: program.to_string(),
            verb: verb.to_string(),
            repo: repo.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        });
    }
}

fn repo_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn run(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<CommandResult, ExecutionError> {
        let repo = repo_name(dir);
        let verb = args.first().copied().unwrap_or_default().to_string();
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&(repo.clone(), verb.clone()))
            .cloned()
            .unwrap_or_else(|| Reply::ok(""));

        self.record("start", program, &verb, &repo, args);
        if verb == "pull" {
            let active = self.active_pulls.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active_pulls.fetch_max(active, Ordering::SeqCst);
        }

        let result = match reply {
            Reply::Exit {
                success,
                output,
                stderr,
                delay,
            } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(CommandResult {
                    success,
                    code: Some(if success { 0 } else { 1 }),
                    output: format!("{output}{stderr}"),
                    stdout: output,
                })
            }
            Reply::SpawnFailure => Err(ExecutionError::Spawn {
                program: program.to_string(),
                dir: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such program"),
            }),
        };

        if verb == "pull" {
            self.active_pulls.fetch_sub(1, Ordering::SeqCst);
        }
        self.record("end", program, &verb, &repo, args);
        result
    }
}

/// Operator that answers prompts from a fixed list, then reports EOF
pub struct ScriptedInput {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|answer| answer.to_string()).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

#[async_trait]
impl OperatorInput for ScriptedInput {
    async fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or(InputError::Closed)
    }
}

/// Keeps every reported event
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Events about the repository named `repo`
    pub fn for_repo(&self, repo: &str) -> Vec<SyncEvent> {
        self.events()
            .into_iter()
            .filter(|event| {
                event
                    .repo()
                    .map(|path| repo_name(path) == repo)
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&SyncEvent) -> bool) -> usize {
        self.events().iter().filter(|event| matches(event)).count()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &SyncEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Directory name of a reported path
pub fn name_of(path: &Path) -> String {
    repo_name(path)
}
