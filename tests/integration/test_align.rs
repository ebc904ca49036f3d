//! End-to-end alignment runs against local bare origins

use crate::helpers::{build_repo, config_for, git_stdout, has_ref, temp_root, RepoSpec};
use monorel::align::changelog::ALIGNMENT_NOTE;
use monorel::align::orchestrate::{Orchestrator, RunReport};
use monorel::align::plan::Outcome;
use semver::Version;

fn outcome_of<'a>(report: &'a RunReport, name: &str) -> &'a Outcome {
  &report
    .outcomes
    .iter()
    .find(|o| o.name == name)
    .unwrap_or_else(|| panic!("no outcome for {}", name))
    .outcome
}

#[test]
fn test_feat_and_fix_repos_share_one_minor_target() {
  let root = temp_root();

  let repo_a = build_repo(
    root.path(),
    &RepoSpec {
      name: "service-auth",
      branch: "develop",
      version: "1.0.0",
      commits: &["feat: add export endpoint"],
    },
  );
  let repo_b = build_repo(
    root.path(),
    &RepoSpec {
      name: "service-billing",
      branch: "develop",
      version: "1.0.0",
      commits: &["fix: handle empty payload"],
    },
  );

  let config = config_for(&[
    ("service-auth", &repo_a.work),
    ("service-billing", &repo_b.work),
  ]);
  let report = Orchestrator::new(config, false, Some(2)).run(None).unwrap();

  let decision = report.decision.as_ref().unwrap();
  assert_eq!(decision.target, Version::new(1, 1, 0));
  assert_eq!(outcome_of(&report, "service-auth"), &Outcome::Applied);
  assert_eq!(outcome_of(&report, "service-billing"), &Outcome::Applied);

  // Both working copies sit on the release branch with the new marker
  for fixture in [&repo_a, &repo_b] {
    assert_eq!(
      git_stdout(&fixture.work, &["rev-parse", "--abbrev-ref", "HEAD"]),
      "release-alignment-v1.1.0"
    );
    let marker = std::fs::read_to_string(fixture.work.join("VERSION")).unwrap();
    assert_eq!(marker.trim(), "1.1.0");

    assert!(has_ref(&fixture.origin, "refs/heads/release-alignment-v1.1.0"));
    assert!(has_ref(&fixture.origin, "refs/tags/v1.1.0"));
  }

  // The service with its own feature lists it; the fix repo lists the fix
  let changelog_a = std::fs::read_to_string(repo_a.work.join("CHANGELOG.md")).unwrap();
  assert!(changelog_a.contains("## [1.1.0]"));
  assert!(changelog_a.contains("- feat: add export endpoint"));

  let changelog_b = std::fs::read_to_string(repo_b.work.join("CHANGELOG.md")).unwrap();
  assert!(changelog_b.contains("- fix: handle empty payload"));
}

#[test]
fn test_dry_run_leaves_repositories_untouched() {
  let root = temp_root();

  let repo = build_repo(
    root.path(),
    &RepoSpec {
      name: "service-auth",
      branch: "develop",
      version: "1.0.0",
      commits: &["fix: handle empty payload"],
    },
  );

  let config = config_for(&[("service-auth", &repo.work)]);
  let report = Orchestrator::new(config, true, Some(1)).run(None).unwrap();

  assert_eq!(outcome_of(&report, "service-auth"), &Outcome::WouldApply);
  assert_eq!(report.decision.as_ref().unwrap().target, Version::new(1, 0, 1));

  let marker = std::fs::read_to_string(repo.work.join("VERSION")).unwrap();
  assert_eq!(marker.trim(), "1.0.0");
  assert!(!has_ref(&repo.origin, "refs/heads/release-alignment-v1.0.1"));
  assert!(!has_ref(&repo.origin, "refs/tags/v1.0.1"));
  assert!(report.publications.is_empty());
}

#[test]
fn test_quiet_repo_is_carried_along_with_alignment_note() {
  let root = temp_root();

  let noisy = build_repo(
    root.path(),
    &RepoSpec {
      name: "service-core",
      branch: "develop",
      version: "2.1.3",
      commits: &["feat!: drop legacy endpoints"],
    },
  );
  let quiet = build_repo(
    root.path(),
    &RepoSpec {
      name: "service-quiet",
      branch: "develop",
      version: "1.4.0",
      commits: &[],
    },
  );

  let config = config_for(&[("service-core", &noisy.work), ("service-quiet", &quiet.work)]);
  let report = Orchestrator::new(config, false, Some(2)).run(None).unwrap();

  // Breaking marker wins across the set; base is the highest current version
  let decision = report.decision.as_ref().unwrap();
  assert_eq!(decision.base, Version::new(2, 1, 3));
  assert_eq!(decision.target, Version::new(3, 0, 0));

  assert_eq!(outcome_of(&report, "service-core"), &Outcome::Applied);
  assert_eq!(outcome_of(&report, "service-quiet"), &Outcome::Applied);

  let quiet_marker = std::fs::read_to_string(quiet.work.join("VERSION")).unwrap();
  assert_eq!(quiet_marker.trim(), "3.0.0");

  let quiet_changelog = std::fs::read_to_string(quiet.work.join("CHANGELOG.md")).unwrap();
  assert!(quiet_changelog.contains(ALIGNMENT_NOTE));

  let noisy_changelog = std::fs::read_to_string(noisy.work.join("CHANGELOG.md")).unwrap();
  assert!(noisy_changelog.contains("- feat!: drop legacy endpoints"));
  assert!(!noisy_changelog.contains(ALIGNMENT_NOTE));
}

#[test]
fn test_fully_quiet_set_skips_every_repository() {
  let root = temp_root();

  let repo = build_repo(
    root.path(),
    &RepoSpec {
      name: "service-quiet",
      branch: "develop",
      version: "1.4.0",
      commits: &[],
    },
  );

  let config = config_for(&[("service-quiet", &repo.work)]);
  let report = Orchestrator::new(config, false, Some(1)).run(None).unwrap();

  let decision = report.decision.as_ref().unwrap();
  assert_eq!(decision.target, Version::new(1, 4, 0));
  assert_eq!(outcome_of(&report, "service-quiet"), &Outcome::SkippedAligned);

  assert!(!has_ref(&repo.origin, "refs/heads/release-alignment-v1.4.0"));
  assert!(report.publications.is_empty());
}

#[test]
fn test_second_run_skips_what_the_first_released() {
  let root = temp_root();

  let repo = build_repo(
    root.path(),
    &RepoSpec {
      name: "service-auth",
      branch: "develop",
      version: "1.0.0",
      commits: &["feat: add export endpoint"],
    },
  );

  let config = config_for(&[("service-auth", &repo.work)]);

  let first = Orchestrator::new(config.clone(), false, Some(1)).run(None).unwrap();
  assert_eq!(outcome_of(&first, "service-auth"), &Outcome::Applied);
  assert!(has_ref(&repo.origin, "refs/tags/v1.1.0"));

  // The new tag bounds the next commit window, so the second run sees an
  // empty window and leaves everything alone
  let second = Orchestrator::new(config, false, Some(1)).run(None).unwrap();
  assert_eq!(outcome_of(&second, "service-auth"), &Outcome::SkippedAligned);
  assert!(!has_ref(&repo.origin, "refs/heads/release-alignment-v1.0.0"));
}
