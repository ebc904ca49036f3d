//! Release application for a single repository
//!
//! Materializes the target version into a fresh release branch: version
//! marker, changelog entry, commit, push, tag. Steps run strictly in order
//! since each depends on the previous one's on-disk effect. The tag is
//! pushed immediately after the branch so the very next run's commit window
//! starts behind it even if later phases fail.

use crate::align::changelog;
use crate::align::plan::RepoPlan;
use crate::core::config::Settings;
use crate::core::error::{AlignResult, ResultExt};
use crate::core::vcs::GitRepo;

/// Apply a plan to one repository
///
/// Callers must only invoke this when `plan.current != plan.target`; the
/// working copy must already sit on the synchronized integration branch.
pub fn apply(git: &GitRepo, plan: &RepoPlan, settings: &Settings) -> AlignResult<()> {
  // Fresh branch from the integration branch; a leftover branch from an
  // earlier partial run is discarded
  git.checkout(&settings.integration_branch)?;
  git.delete_branch_if_exists(&plan.branch)?;
  git.create_branch(&plan.branch)?;

  let marker = git.path().join(&settings.version_file);
  std::fs::write(&marker, format!("{}\n", plan.target))
    .with_context(|| format!("Failed to write {}", marker.display()))?;

  let entry = changelog::entry_today(&plan.target, &plan.relevant, plan.aligned_only);
  changelog::prepend(git.path(), &settings.changelog_file, &entry)?;

  git.add(&[&settings.version_file, &settings.changelog_file])?;
  git.commit(&plan.commit_message())?;
  git.push_branch("origin", &plan.branch, true)?;

  git.tag(&plan.tag_name())?;
  git.push_tag("origin", &plan.tag_name())?;

  Ok(())
}
