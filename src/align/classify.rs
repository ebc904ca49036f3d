//! Commit-message classification into a bump severity
//!
//! Classification is message-text-only: a breaking marker anywhere forces a
//! major bump with every commit considered relevant; otherwise `feat` raises
//! the severity to minor and `fix` keeps commits in the relevant list. A
//! non-empty window with no matches still yields a patch bump so quiet
//! housekeeping commits get released; an empty window yields no bump at all,
//! which is what lets an already-tagged repository skip on re-runs.

use crate::align::version::Bump;
use regex::Regex;
use std::sync::OnceLock;

/// Result of scanning one repository's commit window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
  pub bump: Bump,
  pub relevant: Vec<String>,
}

fn breaking_patterns() -> &'static [Regex] {
  static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
  PATTERNS.get_or_init(|| {
    vec![
      Regex::new(r"(?i)breaking[ -]change").expect("valid breaking-change pattern"),
      Regex::new(r"!\s*:").expect("valid bang-colon pattern"),
      Regex::new(r"(?i)\bmajor\b").expect("valid major pattern"),
    ]
  })
}

fn is_breaking(subject: &str) -> bool {
  breaking_patterns().iter().any(|p| p.is_match(subject))
}

/// Classify an ordered window of commit subjects
///
/// Pure function; the order of the input only matters for the early exit on
/// a breaking marker, where the result is identical anyway.
pub fn classify(commits: &[String]) -> Classification {
  for commit in commits {
    if is_breaking(commit) {
      return Classification {
        bump: Bump::Major,
        relevant: commits.to_vec(),
      };
    }
  }

  let mut bump = if commits.is_empty() { Bump::None } else { Bump::Patch };
  let mut relevant = Vec::new();

  for commit in commits {
    let lower = commit.to_lowercase();
    if lower.contains("feat") {
      bump = bump.max(Bump::Minor);
      relevant.push(commit.clone());
    } else if lower.contains("fix") {
      relevant.push(commit.clone());
    }
  }

  // Aligned-only repositories still record their literal commits, if any
  if relevant.is_empty() {
    relevant = commits.to_vec();
  }

  Classification { bump, relevant }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn subjects(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn test_breaking_marker_forces_major_with_all_relevant() {
    for marker in [
      "feat!: drop the v1 api",
      "refactor: BREAKING CHANGE in payload shape",
      "chore: major rework of the scheduler",
      "fix: BREAKING-CHANGE handling of nulls",
    ] {
      let commits = subjects(&["fix: typo", marker, "docs: readme"]);
      let result = classify(&commits);
      assert_eq!(result.bump, Bump::Major, "marker {:?}", marker);
      assert_eq!(result.relevant, commits);
    }
  }

  #[test]
  fn test_breaking_position_does_not_matter() {
    let first = classify(&subjects(&["feat!: new", "fix: a"]));
    let last = classify(&subjects(&["fix: a", "feat!: new"]));
    assert_eq!(first.bump, Bump::Major);
    assert_eq!(last.bump, Bump::Major);
  }

  #[test]
  fn test_feat_is_exactly_minor_even_with_fixes() {
    let result = classify(&subjects(&["feat: add export", "fix: off-by-one", "fix: typo"]));
    assert_eq!(result.bump, Bump::Minor);
    assert_eq!(result.relevant.len(), 3);
  }

  #[test]
  fn test_fix_only_is_patch_with_fixes_relevant() {
    let result = classify(&subjects(&["fix: off-by-one", "docs: readme", "fix: typo"]));
    assert_eq!(result.bump, Bump::Patch);
    assert_eq!(result.relevant, subjects(&["fix: off-by-one", "fix: typo"]));
  }

  #[test]
  fn test_no_match_defaults_to_patch_with_full_window() {
    let commits = subjects(&["docs: readme", "chore: bump deps"]);
    let result = classify(&commits);
    assert_eq!(result.bump, Bump::Patch);
    assert_eq!(result.relevant, commits);
  }

  #[test]
  fn test_empty_window_yields_no_bump() {
    let result = classify(&[]);
    assert_eq!(result.bump, Bump::None);
    assert!(result.relevant.is_empty());
  }

  #[test]
  fn test_case_insensitive_matching() {
    let result = classify(&subjects(&["FEAT: shouting feature"]));
    assert_eq!(result.bump, Bump::Minor);

    let breaking = classify(&subjects(&["Breaking Change: payload"]));
    assert_eq!(breaking.bump, Bump::Major);
  }

  #[test]
  fn test_major_must_be_a_standalone_word() {
    let result = classify(&subjects(&["fix: majordomo integration"]));
    assert_eq!(result.bump, Bump::Patch);
  }
}
