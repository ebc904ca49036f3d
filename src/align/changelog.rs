//! Changelog entries, most-recent-first
//!
//! Each entry is a dated heading followed by one bullet per relevant commit,
//! or a fixed note when the repository is bumped purely for alignment.

use crate::core::error::{AlignResult, ResultExt};
use std::path::Path;

/// Note used for repositories that carry no own code change
pub const ALIGNMENT_NOTE: &str = "Version alignment (no code changes in this service)";

/// Format one changelog entry
pub fn entry(version: &semver::Version, date: &str, commits: &[String], aligned_only: bool) -> String {
  let mut lines = vec![format!("## [{}] - {}", version, date)];

  if aligned_only {
    lines.push(format!("- {}", ALIGNMENT_NOTE));
  } else {
    for commit in commits {
      lines.push(format!("- {}", commit));
    }
  }

  format!("{}\n\n", lines.join("\n"))
}

/// Entry dated today (UTC)
pub fn entry_today(version: &semver::Version, commits: &[String], aligned_only: bool) -> String {
  let date = chrono::Utc::now().format("%Y-%m-%d").to_string();
  entry(version, &date, commits, aligned_only)
}

/// Prepend an entry to the changelog file, creating it if absent
pub fn prepend(repo_root: &Path, changelog_file: &str, new_entry: &str) -> AlignResult<()> {
  let path = repo_root.join(changelog_file);
  let existing = if path.exists() {
    std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?
  } else {
    String::new()
  };

  std::fs::write(&path, format!("{}{}", new_entry, existing))
    .with_context(|| format!("Failed to write {}", path.display()))?;

  Ok(())
}
