//! Global reconciliation
//!
//! Every repository in the set ships under one shared version number. The
//! most severe required bump and the highest already-reached version decide
//! the number for everyone.

use crate::align::inspect::RepoState;
use crate::align::version::{max_version, Bump};
use semver::Version;
use serde::Serialize;

/// The run-wide version decision shared by every repository
#[derive(Debug, Clone, Serialize)]
pub struct GlobalDecision {
  pub severity: Bump,
  pub base: Version,
  pub target: Version,
}

/// Compute the global severity, base version and target version
///
/// Severity is the maximum across all repositories; the base is the highest
/// current version (0.0.0 for an empty set); the target is the base bumped
/// by the global severity.
pub fn reconcile(states: &[RepoState]) -> GlobalDecision {
  let severity = states.iter().map(|s| s.bump).max().unwrap_or(Bump::None);
  let base = max_version(states.iter().map(|s| &s.current_version));
  let target = severity.apply(&base);

  GlobalDecision { severity, base, target }
}
