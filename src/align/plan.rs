//! Per-repository release plans and run outcomes

use crate::align::inspect::RepoState;
use crate::align::reconcile::GlobalDecision;
use semver::Version;
use serde::Serialize;
use std::path::PathBuf;

/// What the applier must do to one repository this run
#[derive(Debug, Clone, Serialize)]
pub struct RepoPlan {
  pub name: String,
  pub path: PathBuf,
  pub remote_url: Option<String>,
  pub current: Version,
  pub target: Version,
  pub relevant: Vec<String>,
  /// True when the repository moves purely to match the group's version
  pub aligned_only: bool,
  pub branch: String,
}

impl RepoPlan {
  /// Build a plan from inspected state and the global decision
  pub fn from_state(state: &RepoState, decision: &GlobalDecision, branch: String) -> Self {
    Self {
      name: state.name.clone(),
      path: state.path.clone(),
      remote_url: state.remote_url.clone(),
      current: state.current_version.clone(),
      target: decision.target.clone(),
      relevant: state.relevant.clone(),
      aligned_only: state.relevant.is_empty(),
      branch,
    }
  }

  /// Whether the repository already sits on the target version
  pub fn already_aligned(&self) -> bool {
    self.current == self.target
  }

  /// Commit message used for the alignment commit
  pub fn commit_message(&self) -> String {
    format!("chore: align monolithic release to {}", self.target)
  }

  /// Tag created for the target version
  pub fn tag_name(&self) -> String {
    format!("v{}", self.target)
  }
}

/// Result of processing one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "kebab-case")]
pub enum Outcome {
  /// Current version already equals the global target
  SkippedAligned,
  /// Simulation mode: the repository would have been processed
  WouldApply,
  /// Branch, version file, changelog, commit, push and tag all landed
  Applied,
  /// Processing failed; carries the underlying diagnostic
  Failed(String),
}

impl Outcome {
  pub fn is_applied(&self) -> bool {
    matches!(self, Outcome::Applied)
  }

  pub fn is_failure(&self) -> bool {
    matches!(self, Outcome::Failed(_))
  }
}

/// Outcome labeled with its repository
#[derive(Debug, Clone, Serialize)]
pub struct RepoOutcome {
  pub name: String,
  pub outcome: Outcome,
}
