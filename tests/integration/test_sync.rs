//! Integration-branch synchronization and repository-level fail-soft

use crate::helpers::{build_repo, config_for, git_stdout, has_ref, temp_root, RepoSpec};
use monorel::align::orchestrate::Orchestrator;
use monorel::align::plan::Outcome;
use monorel::align::sync::sync_to_integration;
use monorel::core::vcs::GitRepo;
use std::time::Duration;

fn primaries() -> Vec<String> {
  vec!["main".to_string(), "master".to_string()]
}

fn open(fixture: &crate::helpers::RepoFixture) -> GitRepo {
  GitRepo::open(&fixture.work, Duration::from_secs(60)).unwrap()
}

#[test]
fn test_integration_branch_created_from_main() {
  let root = temp_root();

  let repo = build_repo(
    root.path(),
    &RepoSpec {
      name: "service-main-only",
      branch: "main",
      version: "1.0.0",
      commits: &["fix: small thing"],
    },
  );

  sync_to_integration(&open(&repo), "develop", &primaries()).unwrap();

  assert_eq!(git_stdout(&repo.work, &["rev-parse", "--abbrev-ref", "HEAD"]), "develop");
  // The new branch is pushed upstream so later release branches have a base
  assert!(has_ref(&repo.origin, "refs/heads/develop"));
}

#[test]
fn test_integration_branch_created_from_master_when_main_missing() {
  let root = temp_root();

  let repo = build_repo(
    root.path(),
    &RepoSpec {
      name: "service-master-only",
      branch: "master",
      version: "1.0.0",
      commits: &[],
    },
  );

  sync_to_integration(&open(&repo), "develop", &primaries()).unwrap();

  assert_eq!(git_stdout(&repo.work, &["rev-parse", "--abbrev-ref", "HEAD"]), "develop");
  assert!(has_ref(&repo.origin, "refs/heads/develop"));
}

#[test]
fn test_existing_integration_branch_is_reused() {
  let root = temp_root();

  let repo = build_repo(
    root.path(),
    &RepoSpec {
      name: "service-develop",
      branch: "develop",
      version: "1.0.0",
      commits: &[],
    },
  );

  let before = git_stdout(&repo.work, &["rev-parse", "HEAD"]);
  sync_to_integration(&open(&repo), "develop", &primaries()).unwrap();
  let after = git_stdout(&repo.work, &["rev-parse", "HEAD"]);

  assert_eq!(git_stdout(&repo.work, &["rev-parse", "--abbrev-ref", "HEAD"]), "develop");
  assert_eq!(before, after);
}

#[test]
fn test_sync_fails_without_any_known_branch() {
  let root = temp_root();

  let repo = build_repo(
    root.path(),
    &RepoSpec {
      name: "service-oddball",
      branch: "trunk",
      version: "1.0.0",
      commits: &[],
    },
  );

  let result = sync_to_integration(&open(&repo), "develop", &primaries());
  assert!(result.is_err());
}

#[test]
fn test_unreachable_repository_does_not_sink_the_set() {
  let root = temp_root();

  let good = build_repo(
    root.path(),
    &RepoSpec {
      name: "service-good",
      branch: "develop",
      version: "1.0.0",
      commits: &["fix: keep going"],
    },
  );
  let ghost_path = root.path().join("work").join("service-ghost");

  let config = config_for(&[("service-ghost", &ghost_path), ("service-good", &good.work)]);
  let report = Orchestrator::new(config, false, Some(2)).run(None).unwrap();

  let ghost = report.outcomes.iter().find(|o| o.name == "service-ghost").unwrap();
  assert!(matches!(ghost.outcome, Outcome::Failed(_)));

  let survivor = report.outcomes.iter().find(|o| o.name == "service-good").unwrap();
  assert_eq!(survivor.outcome, Outcome::Applied);
  assert!(has_ref(&good.origin, "refs/heads/release-alignment-v1.0.1"));
}
