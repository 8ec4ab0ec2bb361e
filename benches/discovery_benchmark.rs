use async_trait::async_trait;
use criterion::{criterion_group, criterion_main, Criterion};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use sync_repos::core::{
    find_repositories, DiscoveryOptions, LineInput, NullReporter, SyncOptions, SyncOrchestrator,
};
use sync_repos::error::ExecutionError;
use sync_repos::git::{CommandResult, ProcessRunner};
use tempfile::TempDir;

/// `count` repositories spread over nested folders, each with some working files
fn setup_many_repos(count: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for i in 0..count {
        let repo_path = root.join(format!("group-{}", i % 10)).join(format!("repo-{i}"));
        fs::create_dir_all(repo_path.join(".git/objects")).unwrap();
        fs::create_dir_all(repo_path.join("src")).unwrap();
        fs::write(repo_path.join("src/main.rs"), "fn main() {}\n").unwrap();
    }

    temp_dir
}

/// Answers every command instantly: measures orchestration overhead only
struct InstantRunner;

#[async_trait]
impl ProcessRunner for InstantRunner {
    async fn run(
        &self,
        _dir: &Path,
        _program: &str,
        _args: &[&str],
    ) -> Result<CommandResult, ExecutionError> {
        Ok(CommandResult {
            success: true,
            code: Some(0),
            output: String::new(),
            stdout: String::new(),
        })
    }
}

fn bench_discovery(c: &mut Criterion) {
    let temp_dir = setup_many_repos(200);
    let path = temp_dir.path().to_path_buf();
    let options = DiscoveryOptions::default();

    c.bench_function("discovery_200_repos", |b| {
        b.iter(|| find_repositories(&path, &options, &NullReporter).unwrap())
    });
}

fn bench_full_run(c: &mut Criterion) {
    let temp_dir = setup_many_repos(200);
    let path = temp_dir.path().to_path_buf();
    let runtime = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("sync_200_clean_repos", |b| {
        b.to_async(&runtime).iter(|| async {
            let mut input = LineInput::new(&b""[..], tokio::io::sink());
            SyncOrchestrator::new(
                SyncOptions::new(&path),
                Arc::new(InstantRunner),
                Arc::new(NullReporter),
            )
            .run(&mut input)
            .await
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_discovery, bench_full_run);
criterion_main!(benches);
