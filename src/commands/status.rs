//! `monorel status` command

use crate::align::inspect;
use crate::core::config::AlignConfig;
use crate::core::error::{AlignResult, ResultExt};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct RepoStatus {
  name: String,
  path: String,
  version: Option<String>,
}

#[derive(Debug, Serialize)]
struct SetStatus {
  name: String,
  repos: Vec<RepoStatus>,
}

/// Show configured sets and the version each repository currently carries
pub fn run_status(json: bool) -> AlignResult<()> {
  let cwd = std::env::current_dir().context("Failed to resolve the current directory")?;
  run_status_in(&cwd, json)
}

/// Same as `run_status`, rooted at an explicit directory
pub fn run_status_in(root: &Path, json: bool) -> AlignResult<()> {
  let config = AlignConfig::load(root)?;
  let version_file = &config.settings.version_file;

  let sets: Vec<SetStatus> = config
    .sets
    .iter()
    .map(|set| SetStatus {
      name: set.name.clone(),
      repos: set
        .repos
        .iter()
        .map(|repo| RepoStatus {
          name: repo.name.clone(),
          path: repo.path.display().to_string(),
          version: inspect::current_version(&repo.path, version_file)
            .ok()
            .map(|v| v.to_string()),
        })
        .collect(),
    })
    .collect();

  if json {
    println!("{}", serde_json::to_string_pretty(&sets)?);
    return Ok(());
  }

  for set in &sets {
    println!("📦 Set '{}' ({} repositories)", set.name, set.repos.len());
    for repo in &set.repos {
      match &repo.version {
        Some(version) => println!("   {} {} ({})", repo.name, version, repo.path),
        None => println!("   {} (unreadable version marker, {})", repo.name, repo.path),
      }
    }
  }

  Ok(())
}
