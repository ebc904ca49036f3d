//! Change-request publication
//!
//! The hosting platform is inferred from the repository's origin URL. GitLab
//! remotes always get a manually-constructed merge-request URL; GitHub
//! remotes get a real pull request when a credential is configured, with the
//! compare URL as the soft fallback for every failure mode.

use crate::align::plan::RepoPlan;
use crate::align::reconcile::GlobalDecision;
use crate::core::config::Settings;
use regex::Regex;
use serde::Serialize;
use std::time::Duration;

/// Hosting platform derived from a remote URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
  GitHub,
  GitLab,
}

/// Owner and repository name extracted from a remote URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
  pub platform: Platform,
  pub host: String,
  pub owner: String,
  pub name: String,
}

/// How the change request ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "kebab-case")]
pub enum Publication {
  /// Pull request created through the hosting API
  Created(String),
  /// Manual action required; carries the prepared URL
  Manual(String),
  /// Remote URL matched neither platform
  Unidentified,
}

/// Match `host[:/]owner/name(.git)` over SSH and HTTPS remote forms
fn host_matcher(host: &str) -> Regex {
  let escaped = regex::escape(host);
  Regex::new(&format!(r"{}[:/]([^/]+)/(.+?)(?:\.git)?/?$", escaped)).expect("valid remote matcher")
}

/// Identify the hosting platform, owner and repository from a remote URL
pub fn identify_remote(url: &str, settings: &Settings) -> Option<RemoteRepo> {
  for (host, platform) in [
    (&settings.github_host, Platform::GitHub),
    (&settings.gitlab_host, Platform::GitLab),
  ] {
    if let Some(caps) = host_matcher(host).captures(url) {
      return Some(RemoteRepo {
        platform,
        host: host.clone(),
        owner: caps[1].to_string(),
        name: caps[2].to_string(),
      });
    }
  }
  None
}

/// Pull/merge request body shared by both platforms
pub fn request_body(plan: &RepoPlan, decision: &GlobalDecision, updated: &[String], integration: &str) -> String {
  let services = updated
    .iter()
    .map(|name| format!("- {}", name))
    .collect::<Vec<_>>()
    .join("\n");

  format!(
    "## Monolithic release alignment v{target}\n\n\
     This change request updates the version to `{target}` as part of the monolithic alignment.\n\n\
     **Bump severity:** {severity}\n\n\
     ### Goal\n\
     Every service in this release ships under the **same version** to guarantee cross-component compatibility.\n\n\
     ### Services updated in this run\n{services}\n\n\
     ### Checklist\n\
     - [x] Version marker file updated\n\
     - [x] Changelog updated\n\
     - [x] Tag v{target} created and pushed\n\n\
     **Note:** This is an automated version alignment against `{integration}`. Review and approve.",
    target = plan.target,
    severity = decision.severity.as_str(),
    services = services,
    integration = integration,
  )
}

fn request_title(plan: &RepoPlan) -> String {
  format!("Release v{} (monolithic alignment)", plan.target)
}

/// Manually-constructed new-merge-request URL for a GitLab-style remote
fn gitlab_mr_url(remote: &RemoteRepo, plan: &RepoPlan, integration: &str) -> String {
  format!(
    "https://{host}/{owner}/{name}/-/merge_requests/new\
     ?merge_request%5Bsource_branch%5D={source}\
     &merge_request%5Btarget_branch%5D={target}\
     &merge_request%5Btitle%5D=Release%20v{version}%20(monolithic%20alignment)",
    host = remote.host,
    owner = remote.owner,
    name = remote.name,
    source = plan.branch,
    target = integration,
    version = plan.target,
  )
}

/// REST API base for a GitHub-style remote
///
/// github.com serves its API from a separate subdomain; self-hosted
/// instances expose it under `/api/v3` on the instance host. An explicit
/// `github_api_url` setting overrides both.
fn github_api_base(remote: &RemoteRepo, settings: &Settings) -> String {
  if let Some(url) = &settings.github_api_url {
    return url.trim_end_matches('/').to_string();
  }

  if remote.host == "github.com" {
    "https://api.github.com".to_string()
  } else {
    format!("https://{}/api/v3", remote.host)
  }
}

/// Manually-constructed compare URL for a GitHub-style remote
fn github_compare_url(remote: &RemoteRepo, plan: &RepoPlan, integration: &str) -> String {
  format!(
    "https://{}/{}/{}/compare/{}...{}",
    remote.host, remote.owner, remote.name, integration, plan.branch
  )
}

/// Create the pull request through the GitHub API
///
/// Any non-success status or transport failure is a soft failure; the caller
/// falls back to the manual compare URL.
fn create_github_pr(
  remote: &RemoteRepo,
  plan: &RepoPlan,
  decision: &GlobalDecision,
  updated: &[String],
  integration: &str,
  api_base: &str,
  token: &str,
  timeout: Duration,
) -> Result<String, String> {
  let url = format!("{}/repos/{}/{}/pulls", api_base, remote.owner, remote.name);
  let agent = ureq::AgentBuilder::new().timeout(timeout).build();

  let response = agent
    .post(&url)
    .set("Authorization", &format!("token {}", token))
    .set("Accept", "application/vnd.github+json")
    .set("User-Agent", "monorel")
    .send_json(serde_json::json!({
      "title": request_title(plan),
      "head": plan.branch,
      "base": integration,
      "body": request_body(plan, decision, updated, integration),
    }));

  match response {
    Ok(resp) => {
      let body: serde_json::Value = resp.into_json().map_err(|e| e.to_string())?;
      body
        .get("html_url")
        .and_then(|u| u.as_str())
        .map(|u| u.to_string())
        .ok_or_else(|| "response carried no html_url".to_string())
    }
    Err(ureq::Error::Status(code, resp)) => {
      let text = resp.into_string().unwrap_or_default();
      Err(format!("status {}: {}", code, text))
    }
    Err(err) => Err(err.to_string()),
  }
}

/// Publish the change request for one applied repository
pub fn publish(
  plan: &RepoPlan,
  decision: &GlobalDecision,
  updated: &[String],
  settings: &Settings,
  token: Option<&str>,
) -> Publication {
  let Some(url) = plan.remote_url.as_deref() else {
    return Publication::Unidentified;
  };
  let Some(remote) = identify_remote(url, settings) else {
    return Publication::Unidentified;
  };

  let integration = settings.integration_branch.as_str();

  match remote.platform {
    Platform::GitLab => Publication::Manual(gitlab_mr_url(&remote, plan, integration)),
    Platform::GitHub => match token {
      None => Publication::Manual(github_compare_url(&remote, plan, integration)),
      Some(token) => {
        let timeout = Duration::from_secs(settings.http_timeout_secs);
        let api_base = github_api_base(&remote, settings);
        match create_github_pr(&remote, plan, decision, updated, integration, &api_base, token, timeout) {
          Ok(html_url) => Publication::Created(html_url),
          Err(_) => Publication::Manual(github_compare_url(&remote, plan, integration)),
        }
      }
    },
  }
}
