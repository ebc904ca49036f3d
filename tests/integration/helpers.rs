//! Shared fixtures: local bare origins plus working clones, driven through
//! the real git binary so pushes and tags behave exactly like production.

use monorel::core::config::{AlignConfig, RepoConfig, RepoSet, Settings};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run git in a directory, asserting success
pub fn git(dir: &Path, args: &[&str]) {
  let output = Command::new("git")
    .arg("-C")
    .arg(dir)
    .args(args)
    .output()
    .expect("failed to spawn git");
  assert!(
    output.status.success(),
    "git {:?} in {} failed: {}",
    args,
    dir.display(),
    String::from_utf8_lossy(&output.stderr)
  );
}

/// Run git in a directory, returning trimmed stdout
pub fn git_stdout(dir: &Path, args: &[&str]) -> String {
  let output = Command::new("git")
    .arg("-C")
    .arg(dir)
    .args(args)
    .output()
    .expect("failed to spawn git");
  assert!(
    output.status.success(),
    "git {:?} in {} failed: {}",
    args,
    dir.display(),
    String::from_utf8_lossy(&output.stderr)
  );
  String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Whether a ref exists in a repository (works on bare origins)
pub fn has_ref(dir: &Path, reference: &str) -> bool {
  Command::new("git")
    .arg("-C")
    .arg(dir)
    .args(["rev-parse", "--verify", "--quiet", reference])
    .output()
    .expect("failed to spawn git")
    .status
    .success()
}

/// One repository under test: a bare origin plus a working clone
pub struct RepoFixture {
  pub origin: PathBuf,
  pub work: PathBuf,
}

/// How to seed a repository fixture
pub struct RepoSpec<'a> {
  pub name: &'a str,
  /// Branch the origin starts with ("develop", "main", "master")
  pub branch: &'a str,
  /// Baseline version written to VERSION and tagged as `v<version>`
  pub version: &'a str,
  /// Commit subjects landed after the baseline tag
  pub commits: &'a [&'a str],
}

/// Build a bare origin and a working clone seeded from a `RepoSpec`
pub fn build_repo(root: &Path, spec: &RepoSpec) -> RepoFixture {
  let origin = root.join("origins").join(format!("{}.git", spec.name));
  let work = root.join("work").join(spec.name);
  std::fs::create_dir_all(origin.parent().unwrap()).unwrap();
  std::fs::create_dir_all(work.parent().unwrap()).unwrap();

  git(root, &["init", "--bare", origin.to_str().unwrap()]);
  git(root, &["clone", origin.to_str().unwrap(), work.to_str().unwrap()]);

  git(&work, &["config", "user.name", "Fixture Author"]);
  git(&work, &["config", "user.email", "fixture@example.com"]);
  git(&work, &["checkout", "-b", spec.branch]);

  std::fs::write(work.join("VERSION"), format!("{}\n", spec.version)).unwrap();
  std::fs::write(work.join("CHANGELOG.md"), "## History\n\n").unwrap();
  git(&work, &["add", "-A"]);
  git(&work, &["commit", "-m", "chore: initial service scaffold"]);
  git(&work, &["push", "-u", "origin", spec.branch]);

  let tag = format!("v{}", spec.version);
  git(&work, &["tag", &tag]);
  git(&work, &["push", "origin", &tag]);

  for (idx, subject) in spec.commits.iter().enumerate() {
    std::fs::write(work.join(format!("change-{}.txt", idx)), subject).unwrap();
    git(&work, &["add", "-A"]);
    git(&work, &["commit", "-m", subject]);
  }
  if !spec.commits.is_empty() {
    git(&work, &["push", "origin", spec.branch]);
  }

  RepoFixture { origin, work }
}

/// Config covering a list of (name, working copy) pairs in one set
pub fn config_for(repos: &[(&str, &Path)]) -> AlignConfig {
  AlignConfig {
    settings: Settings::default(),
    sets: vec![RepoSet {
      name: "test".to_string(),
      repos: repos
        .iter()
        .map(|(name, path)| RepoConfig {
          name: name.to_string(),
          path: path.to_path_buf(),
        })
        .collect(),
    }],
  }
}

/// Fresh temp root for a test
pub fn temp_root() -> TempDir {
  tempfile::tempdir().expect("failed to create temp dir")
}
