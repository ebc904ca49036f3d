//! System git backend - zero git crate dependencies
//!
//! One `GitRepo` handle per local working copy, each subprocess call
//! time-limited and run in an isolated environment. Porcelain wrappers map
//! "not found" cases onto `Option`/`Ok` so callers can tell them apart from
//! real failures.

use crate::core::error::{AlignError, AlignResult, GitError, ResultExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

/// Git backend driving the system `git` binary for one working copy
pub struct GitRepo {
  repo_path: PathBuf,
  timeout: Duration,
}

impl GitRepo {
  /// Open a git repository, verifying the path is inside a work tree
  pub fn open(path: &Path, timeout: Duration) -> AlignResult<Self> {
    let repo = Self {
      repo_path: path.to_path_buf(),
      timeout,
    };

    let output = repo.run_raw(&["rev-parse", "--is-inside-work-tree"])?;
    if !output.status.success() {
      return Err(AlignError::Git(GitError::RepoNotFound {
        path: path.to_path_buf(),
      }));
    }

    Ok(repo)
  }

  /// Working copy path this handle operates on
  pub fn path(&self) -> &Path {
    &self.repo_path
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the repo path
  /// - Clears environment variables, whitelisting only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }

  /// Run a git command, enforcing the configured time budget
  ///
  /// Returns the raw output regardless of exit status; callers decide how to
  /// interpret a non-zero exit.
  fn run_raw(&self, args: &[&str]) -> AlignResult<Output> {
    let mut cmd = self.git_cmd();
    cmd.args(args);
    cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = cmd
      .spawn()
      .with_context(|| format!("Failed to spawn git {}", args.join(" ")))?;

    let started = Instant::now();
    loop {
      match child.try_wait()? {
        Some(_) => break,
        None if started.elapsed() >= self.timeout => {
          let _ = child.kill();
          let _ = child.wait();
          return Err(AlignError::Git(GitError::Timeout {
            command: format!("git {}", args.join(" ")),
            limit: self.timeout,
          }));
        }
        None => std::thread::sleep(Duration::from_millis(25)),
      }
    }

    Ok(child.wait_with_output()?)
  }

  /// Run a git command, requiring success and returning trimmed stdout
  fn run(&self, args: &[&str]) -> AlignResult<String> {
    let output = self.run_raw(args)?;

    if !output.status.success() {
      return Err(AlignError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Checkout a branch
  pub fn checkout(&self, branch: &str) -> AlignResult<()> {
    self.run(&["checkout", branch]).map(|_| ())
  }

  /// Pull a branch from a remote
  pub fn pull(&self, remote: &str, branch: &str) -> AlignResult<()> {
    self.run(&["pull", remote, branch]).map(|_| ())
  }

  /// Fetch tags from a remote (keeps the release-tag window accurate)
  pub fn fetch_tags(&self, remote: &str) -> AlignResult<()> {
    self.run(&["fetch", "--tags", remote]).map(|_| ())
  }

  /// Create and checkout a new branch from the current HEAD
  pub fn create_branch(&self, branch: &str) -> AlignResult<()> {
    self.run(&["checkout", "-b", branch]).map(|_| ())
  }

  /// Delete a local branch if it exists; absence is not an error
  pub fn delete_branch_if_exists(&self, branch: &str) -> AlignResult<()> {
    let output = self.run_raw(&["branch", "-D", branch])?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not found") {
        return Ok(());
      }
      return Err(AlignError::Git(GitError::CommandFailed {
        command: format!("git branch -D {}", branch),
        stderr: stderr.trim().to_string(),
      }));
    }

    Ok(())
  }

  /// Most recent tag matching a glob pattern, by version sort
  ///
  /// Returns `None` when no tag matches; only a failed invocation is an error.
  pub fn latest_tag(&self, pattern: &str) -> AlignResult<Option<String>> {
    let stdout = self.run(&["tag", "--list", pattern, "--sort=-version:refname"])?;

    Ok(stdout.lines().next().map(|s| s.trim().to_string()))
  }

  /// Commit subjects in a revision range (e.g. `v1.2.0..HEAD`)
  pub fn subjects_in_range(&self, range: &str) -> AlignResult<Vec<String>> {
    let stdout = self.run(&["log", range, "--pretty=format:%s"])?;
    Ok(non_empty_lines(&stdout))
  }

  /// The most recent `count` commit subjects
  pub fn recent_subjects(&self, count: usize) -> AlignResult<Vec<String>> {
    let limit = format!("-{}", count);
    let stdout = self.run(&["log", "--pretty=format:%s", &limit])?;
    Ok(non_empty_lines(&stdout))
  }

  /// Stage paths
  pub fn add(&self, paths: &[&str]) -> AlignResult<()> {
    let mut args = vec!["add"];
    args.extend_from_slice(paths);
    self.run(&args).map(|_| ())
  }

  /// Commit staged changes
  pub fn commit(&self, message: &str) -> AlignResult<()> {
    self.run(&["commit", "-m", message]).map(|_| ())
  }

  /// Push a branch with upstream tracking
  ///
  /// Force-with-lease keeps the push honest under concurrent runs: it only
  /// wins when the remote branch still matches the last-known state.
  pub fn push_branch(&self, remote: &str, branch: &str, force_with_lease: bool) -> AlignResult<()> {
    let mut args = vec!["push"];
    if force_with_lease {
      args.push("--force-with-lease");
    }
    args.extend_from_slice(&["--set-upstream", remote, branch]);

    let output = self.run_raw(&args)?;
    if !output.status.success() {
      return Err(AlignError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        branch: branch.to_string(),
        reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(())
  }

  /// Create a lightweight tag; an already-existing tag is tolerated so a
  /// partially-failed run can be retried
  pub fn tag(&self, name: &str) -> AlignResult<()> {
    let output = self.run_raw(&["tag", name])?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("already exists") {
        return Ok(());
      }
      return Err(AlignError::Git(GitError::CommandFailed {
        command: format!("git tag {}", name),
        stderr: stderr.trim().to_string(),
      }));
    }

    Ok(())
  }

  /// Push a single tag to a remote
  pub fn push_tag(&self, remote: &str, name: &str) -> AlignResult<()> {
    let refspec = format!("refs/tags/{}", name);
    let output = self.run_raw(&["push", remote, &refspec])?;

    if !output.status.success() {
      return Err(AlignError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        branch: refspec,
        reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(())
  }

  /// URL of a remote, or `None` when the remote is not configured
  pub fn remote_url(&self, remote: &str) -> AlignResult<Option<String>> {
    let output = self.run_raw(&["remote", "get-url", remote])?;

    if !output.status.success() {
      return Ok(None);
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(if url.is_empty() { None } else { Some(url) })
  }
}

fn non_empty_lines(stdout: &str) -> Vec<String> {
  stdout
    .lines()
    .map(|l| l.trim().to_string())
    .filter(|l| !l.is_empty())
    .collect()
}
