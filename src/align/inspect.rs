//! Repository state reader
//!
//! Determines one repository's current released version and the commit
//! window produced since that release. The window is bounded by the newest
//! release tag when one exists; that tag is what makes repeated runs
//! idempotent, because commits behind it are never reclassified.

use crate::align::classify::{self, Classification};
use crate::align::version::{self, Bump};
use crate::core::config::RepoConfig;
use crate::core::error::{AlignResult, ResultExt};
use crate::core::vcs::GitRepo;
use semver::Version;
use std::path::PathBuf;

/// Tag glob selecting release tags (`v` + digits)
pub const RELEASE_TAG_PATTERN: &str = "v[0-9]*";

/// Everything the reconciler needs to know about one repository
#[derive(Debug, Clone)]
pub struct RepoState {
  pub name: String,
  pub path: PathBuf,
  pub remote_url: Option<String>,
  pub current_version: Version,
  pub commits: Vec<String>,
  pub bump: Bump,
  pub relevant: Vec<String>,
}

/// Read the version marker file; a missing file means the repository was
/// never released under this scheme, malformed contents fail loudly
pub fn current_version(repo_root: &std::path::Path, version_file: &str) -> AlignResult<Version> {
  let marker = repo_root.join(version_file);
  if !marker.exists() {
    return Ok(Version::new(0, 0, 0));
  }

  let content =
    std::fs::read_to_string(&marker).with_context(|| format!("Failed to read {}", marker.display()))?;
  version::parse_version(&content)
}

/// Commit subjects since the last release
///
/// Preferred path: subjects strictly after the newest release tag. Fallback
/// when no tag matches: the most recent `window` subjects. Fallback on total
/// failure (e.g. empty history): an empty window.
pub fn commits_since_release(git: &GitRepo, window: usize) -> Vec<String> {
  let ranged = match git.latest_tag(RELEASE_TAG_PATTERN) {
    Ok(Some(tag)) => git.subjects_in_range(&format!("{}..HEAD", tag)),
    Ok(None) => git.recent_subjects(window),
    Err(err) => Err(err),
  };

  match ranged {
    Ok(subjects) => subjects,
    Err(_) => git.recent_subjects(window).unwrap_or_default(),
  }
}

/// Inspect one repository: version marker, commit window, classification
pub fn inspect(repo: &RepoConfig, git: &GitRepo, version_file: &str, window: usize) -> AlignResult<RepoState> {
  let current = current_version(git.path(), version_file)
    .with_context(|| format!("while inspecting repo '{}'", repo.name))?;

  let commits = commits_since_release(git, window);
  let Classification { bump, relevant } = classify::classify(&commits);
  let remote_url = git.remote_url("origin").unwrap_or(None);

  Ok(RepoState {
    name: repo.name.clone(),
    path: repo.path.clone(),
    remote_url,
    current_version: current,
    commits,
    bump,
    relevant,
  })
}
