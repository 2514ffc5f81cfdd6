//! Git working tree builders
//!
//! Ahead/behind states need an upstream, so `TestRemote` creates a bare
//! repository that `TestRepo::clone_from` can track.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// True when a `git` executable is on PATH. Git-backed tests return early
/// otherwise.
pub fn git_available() -> bool {
    which::which("git").is_ok()
}

fn run_git(dir: &Path, args: &[&str]) -> Output {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

/// Bare repository acting as `origin`
pub struct TestRemote {
    dir: TempDir,
}

impl TestRemote {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        run_git(dir.path(), &["init", "--bare", "--quiet"]);
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// A git working tree in a temp dir
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Fresh `git init` with a local identity
    pub fn new() -> Self {
        let repo = Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        };
        repo.git(&["init", "--quiet"]);
        repo.configure_identity();
        repo
    }

    /// Clone `remote` and track it
    pub fn clone_from(remote: &TestRemote) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let remote_url = remote.path().to_string_lossy().to_string();
        run_git(dir.path(), &["clone", "--quiet", &remote_url, "."]);
        let repo = Self { dir };
        repo.configure_identity();
        repo
    }

    fn configure_identity(&self) {
        self.git(&["config", "user.email", "test@test.com"]);
        self.git(&["config", "user.name", "Test User"]);
        self.git(&["config", "commit.gpgsign", "false"]);
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git in this tree, asserting success
    pub fn git(&self, args: &[&str]) -> Output {
        run_git(self.path(), args)
    }

    /// Write a file relative to the tree root
    pub fn add_file(&self, relative_path: &str, content: &str) -> &Self {
        let full_path = self.path().join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        self
    }

    /// Stage everything and commit
    pub fn commit(&self, message: &str) -> &Self {
        self.git(&["add", "-A"]);
        self.git(&["commit", "--quiet", "-m", message]);
        self
    }

    /// Write `file` and commit it in one step
    pub fn commit_file(&self, file: &str, content: &str) -> &Self {
        self.add_file(file, content);
        self.commit(&format!("update {}", file))
    }

    /// Push the current branch and set upstream
    pub fn push(&self) -> &Self {
        self.git(&["push", "--quiet", "-u", "origin", "HEAD"]);
        self
    }

    pub fn fetch(&self) -> &Self {
        self.git(&["fetch", "--quiet"]);
        self
    }
}

/// A config file in its own temp dir
pub struct ConfigFile {
    dir: TempDir,
    path: PathBuf,
}

impl ConfigFile {
    /// Write a config watching `repos` (name, location) every `interval` seconds
    pub fn new(repos: &[(&str, &Path)], interval: u64) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        let file = Self { dir, path };
        file.rewrite(repos, interval);
        file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn rewrite(&self, repos: &[(&str, &Path)], interval: u64) {
        let repositories: Vec<_> = repos
            .iter()
            .map(|(name, location)| {
                serde_json::json!({"name": name, "location": location.to_string_lossy()})
            })
            .collect();
        let body = serde_json::json!({"repositories": repositories, "interval": interval});
        self.write_raw(&body.to_string());
    }

    pub fn write_raw(&self, body: &str) {
        fs::write(&self.path, body).expect("Failed to write config");
    }
}
