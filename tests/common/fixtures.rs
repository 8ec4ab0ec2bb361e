//! Test fixtures and builders

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::git::{clone_repo, create_bare_remote, create_test_commit, push_initial, setup_git_repo};

/// A directory tree of repository-shaped folders with automatic cleanup
///
/// Repositories are only marked with an empty `.git` directory, which is all
/// discovery looks at. Use [`RemoteFixture`] when real git state is needed.
pub struct TestTree {
    pub temp_dir: TempDir,
}

impl TestTree {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Creates `relative` with a `.git` directory inside it
    pub fn repo(&self, relative: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        fs::create_dir_all(path.join(".git"))?;
        Ok(path)
    }

    /// Creates a plain directory
    pub fn dir(&self, relative: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Creates a file, including missing parents
    pub fn file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }
}

/// Real working copies cloned from bare remotes under one workspace directory
///
/// Layout: `<temp>/remotes/<name>.git` and `<temp>/workspace/<name>`.
pub struct RemoteFixture {
    pub temp_dir: TempDir,
}

impl RemoteFixture {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        fs::create_dir(temp_dir.path().join("remotes"))?;
        fs::create_dir(temp_dir.path().join("workspace"))?;
        Ok(Self { temp_dir })
    }

    pub fn workspace(&self) -> PathBuf {
        self.temp_dir.path().join("workspace")
    }

    pub fn remote(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join("remotes").join(format!("{name}.git"))
    }

    /// Creates a bare remote with one commit and a working copy tracking it
    pub fn add_repo(&self, name: &str) -> Result<PathBuf> {
        let remote = self.remote(name);
        create_bare_remote(&remote)?;

        let seed = self.temp_dir.path().join(format!("seed-{name}"));
        fs::create_dir(&seed)?;
        setup_git_repo(&seed)?;
        create_test_commit(&seed, "README.md", &format!("# {name}\n"), "Initial commit")?;
        push_initial(&seed, &remote)?;

        let working_copy = self.workspace().join(name);
        clone_repo(&remote, &working_copy)?;
        Ok(working_copy)
    }

    /// Clones `name`'s remote somewhere outside the workspace, for pushing
    /// upstream changes the workspace copy has not seen yet
    pub fn second_clone(&self, name: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(format!("other-{name}"));
        clone_repo(&self.remote(name), &path)?;
        Ok(path)
    }
}
