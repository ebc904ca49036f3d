//! Configuration for monorel
//!
//! Loaded once per run from monorel.toml into an immutable `AlignConfig`
//! that is handed to the orchestrator at construction time. Searched in
//! order: monorel.toml, .monorel.toml, .config/monorel.toml.

use crate::core::error::{AlignResult, ConfigError, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignConfig {
  #[serde(default)]
  pub settings: Settings,
  #[serde(default)]
  pub sets: Vec<RepoSet>,
}

/// Run-wide knobs with defaults matching the expected fleet layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
  /// Long-lived branch that release branches are cut from
  #[serde(default = "default_integration_branch")]
  pub integration_branch: String,

  /// Branches the integration branch may be created from, tried in order
  #[serde(default = "default_primary_branches")]
  pub primary_branches: Vec<String>,

  /// Release branch name becomes `<prefix>-v<version>`
  #[serde(default = "default_branch_prefix")]
  pub branch_prefix: String,

  /// Version marker file at each repository root
  #[serde(default = "default_version_file")]
  pub version_file: String,

  /// Changelog file at each repository root
  #[serde(default = "default_changelog_file")]
  pub changelog_file: String,

  /// Commit-subject window used when no release tag exists yet
  #[serde(default = "default_commit_window")]
  pub fallback_commit_window: usize,

  /// Worker pool size for the apply and publish phases
  #[serde(default = "default_jobs")]
  pub jobs: usize,

  /// Per-command time budget for git subprocesses
  #[serde(default = "default_git_timeout")]
  pub git_timeout_secs: u64,

  /// Time budget for pull-request API calls
  #[serde(default = "default_http_timeout")]
  pub http_timeout_secs: u64,

  /// Environment variable holding the hosting API credential
  #[serde(default = "default_token_env")]
  pub token_env: String,

  /// Host matched as GitHub-style (API pull requests)
  #[serde(default = "default_github_host")]
  pub github_host: String,

  /// Host matched as GitLab-style (manual merge-request URLs)
  #[serde(default = "default_gitlab_host")]
  pub gitlab_host: String,

  /// Override for the GitHub API base URL; derived from the matched host
  /// when unset (api.github.com, or `<host>/api/v3` for self-hosted)
  #[serde(default)]
  pub github_api_url: Option<String>,
}

fn default_integration_branch() -> String {
  "develop".to_string()
}

fn default_primary_branches() -> Vec<String> {
  vec!["main".to_string(), "master".to_string()]
}

fn default_branch_prefix() -> String {
  "release-alignment".to_string()
}

fn default_version_file() -> String {
  "VERSION".to_string()
}

fn default_changelog_file() -> String {
  "CHANGELOG.md".to_string()
}

fn default_commit_window() -> usize {
  10
}

fn default_jobs() -> usize {
  4
}

fn default_git_timeout() -> u64 {
  120
}

fn default_http_timeout() -> u64 {
  30
}

fn default_token_env() -> String {
  "GITHUB_TOKEN".to_string()
}

fn default_github_host() -> String {
  "github.com".to_string()
}

fn default_gitlab_host() -> String {
  "gitlab.com".to_string()
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      integration_branch: default_integration_branch(),
      primary_branches: default_primary_branches(),
      branch_prefix: default_branch_prefix(),
      version_file: default_version_file(),
      changelog_file: default_changelog_file(),
      fallback_commit_window: default_commit_window(),
      jobs: default_jobs(),
      git_timeout_secs: default_git_timeout(),
      http_timeout_secs: default_http_timeout(),
      token_env: default_token_env(),
      github_host: default_github_host(),
      gitlab_host: default_gitlab_host(),
      github_api_url: None,
    }
  }
}

/// A named group of repositories aligned together (e.g. "test", "production")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSet {
  pub name: String,
  #[serde(default)]
  pub repos: Vec<RepoConfig>,
}

/// One repository in a set: logical name plus local working-copy path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
  pub name: String,
  pub path: PathBuf,
}

impl AlignConfig {
  /// Find config file in search order
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("monorel.toml"),
      path.join(".monorel.toml"),
      path.join(".config").join("monorel.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from monorel.toml (searches multiple locations)
  pub fn load(path: &Path) -> AlignResult<Self> {
    let config_path = Self::find_config_path(path).ok_or(ConfigError::NotFound {
      search_root: path.to_path_buf(),
    })?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: AlignConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config.validate()?;
    Ok(config)
  }

  /// Check that every set is usable
  pub fn validate(&self) -> AlignResult<()> {
    for set in &self.sets {
      if set.repos.is_empty() {
        return Err(ConfigError::EmptySet { name: set.name.clone() }.into());
      }
    }
    Ok(())
  }

  /// Resolve the requested set, or the first configured one
  pub fn select_set(&self, name: Option<&str>) -> AlignResult<&RepoSet> {
    match name {
      Some(wanted) => self.sets.iter().find(|s| s.name == wanted).ok_or_else(|| {
        ConfigError::SetNotFound {
          name: wanted.to_string(),
          available: self.set_names(),
        }
        .into()
      }),
      None => self.sets.first().ok_or_else(|| {
        ConfigError::SetNotFound {
          name: "(default)".to_string(),
          available: vec![],
        }
        .into()
      }),
    }
  }

  /// Names of all configured sets
  pub fn set_names(&self) -> Vec<String> {
    self.sets.iter().map(|s| s.name.clone()).collect()
  }

  /// Hosting API credential from the process environment, if configured
  pub fn credential(&self) -> Option<String> {
    std::env::var(&self.settings.token_env).ok().filter(|t| !t.is_empty())
  }

  /// Release branch name for a target version
  pub fn release_branch(&self, version: &semver::Version) -> String {
    format!("{}-v{}", self.settings.branch_prefix, version)
  }
}
