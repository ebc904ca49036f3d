//! Synchronization onto the integration branch
//!
//! Modeled as an explicit ordered ladder of named strategies instead of
//! nested catch blocks: use the integration branch where it exists, else
//! create it from the first primary branch that works and push it upstream.
//! The last rung's failure propagates to the caller, which records it as a
//! per-repository failure and excludes the repository from the run.

use crate::core::error::AlignResult;
use crate::core::vcs::GitRepo;
use std::fmt;

/// One rung of the fallback ladder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStrategy {
  /// Checkout and pull an existing integration branch
  UseExisting { branch: String },
  /// Checkout and pull a primary branch, cut the integration branch from it
  /// and push the new branch upstream
  CreateFrom { base: String, branch: String },
}

impl SyncStrategy {
  fn attempt(&self, git: &GitRepo) -> AlignResult<()> {
    match self {
      SyncStrategy::UseExisting { branch } => {
        git.checkout(branch)?;
        git.pull("origin", branch)
      }
      SyncStrategy::CreateFrom { base, branch } => {
        git.checkout(base)?;
        git.pull("origin", base)?;
        git.create_branch(branch)?;
        git.push_branch("origin", branch, false)
      }
    }
  }
}

impl fmt::Display for SyncStrategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SyncStrategy::UseExisting { branch } => write!(f, "use existing '{}'", branch),
      SyncStrategy::CreateFrom { base, branch } => write!(f, "create '{}' from '{}'", branch, base),
    }
  }
}

/// Build the ladder for an integration branch and its primary fallbacks
pub fn ladder(integration: &str, primaries: &[String]) -> Vec<SyncStrategy> {
  let mut strategies = vec![SyncStrategy::UseExisting {
    branch: integration.to_string(),
  }];

  for base in primaries {
    strategies.push(SyncStrategy::CreateFrom {
      base: base.clone(),
      branch: integration.to_string(),
    });
  }

  strategies
}

/// Bring a working copy onto its integration branch, up to date
///
/// Tags are fetched after a successful rung so the release-tag commit window
/// stays accurate even for clones that never created the tag locally.
pub fn sync_to_integration(git: &GitRepo, integration: &str, primaries: &[String]) -> AlignResult<()> {
  let strategies = ladder(integration, primaries);
  let mut last_err = None;

  for strategy in &strategies {
    match strategy.attempt(git) {
      Ok(()) => {
        // Tag fetch failures are not fatal; the tag window falls back to a
        // bounded commit count anyway
        let _ = git.fetch_tags("origin");
        return Ok(());
      }
      Err(err) => last_err = Some(err),
    }
  }

  Err(last_err.unwrap_or_else(|| "sync ladder was empty".into()))
}
