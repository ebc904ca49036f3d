//! End-to-end orchestration
//!
//! Phases run strictly in order: Sync, Inspect, Reconcile, Apply, Publish,
//! Report. Sync and Inspect are sequential per repository; Reconcile is the
//! barrier that needs every Inspect result; Apply and Publish fan out over a
//! bounded worker pool. A repository-level failure downgrades that
//! repository's outcome but never halts a phase, and the final report is
//! always reached.

use crate::align::apply;
use crate::align::inspect::{self, RepoState};
use crate::align::plan::{Outcome, RepoOutcome, RepoPlan};
use crate::align::publish::{self, Publication};
use crate::align::reconcile::{reconcile, GlobalDecision};
use crate::align::sync;
use crate::core::config::{AlignConfig, RepoConfig};
use crate::core::error::{AlignError, AlignResult};
use crate::core::vcs::GitRepo;
use crate::ui::progress::PhaseProgress;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Duration;

/// Per-repository publication record
#[derive(Debug, Clone, Serialize)]
pub struct PublicationRecord {
  pub name: String,
  pub publication: Publication,
}

/// Aggregated result of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  pub set: String,
  pub dry_run: bool,
  /// None when no repository survived inspection
  pub decision: Option<GlobalDecision>,
  pub outcomes: Vec<RepoOutcome>,
  pub publications: Vec<PublicationRecord>,
}

/// Drives the full alignment flow for one repository set
pub struct Orchestrator {
  config: AlignConfig,
  dry_run: bool,
  jobs: usize,
}

impl Orchestrator {
  pub fn new(config: AlignConfig, dry_run: bool, jobs: Option<usize>) -> Self {
    let jobs = jobs.unwrap_or(config.settings.jobs).max(1);
    Self { config, dry_run, jobs }
  }

  fn git_timeout(&self) -> Duration {
    Duration::from_secs(self.config.settings.git_timeout_secs)
  }

  /// Run the alignment flow against the selected repository set
  pub fn run(&self, set_name: Option<&str>) -> AlignResult<RunReport> {
    let set = self.config.select_set(set_name)?;
    let settings = &self.config.settings;

    let mut outcomes: Vec<RepoOutcome> = Vec::new();

    // Phase 1: Sync. Sequential and fail-soft; a repository that will not
    // reach its integration branch is excluded from the rest of the run.
    println!("\n🔄 Syncing {} repositories onto '{}'...", set.repos.len(), settings.integration_branch);
    let mut synced: Vec<(RepoConfig, GitRepo)> = Vec::new();
    for repo in &set.repos {
      match self.sync_one(repo) {
        Ok(git) => {
          println!("   ✅ {} synced", repo.name);
          synced.push((repo.clone(), git));
        }
        Err(err) => {
          println!("   ⚠️  {}: {}", repo.name, err);
          outcomes.push(RepoOutcome {
            name: repo.name.clone(),
            outcome: Outcome::Failed(err.to_string()),
          });
        }
      }
    }

    // Phase 2: Inspect. Version marker plus tag-bounded commit window.
    let mut states: Vec<(RepoState, GitRepo)> = Vec::new();
    for (repo, git) in synced {
      println!("\n🔍 Inspecting {} ({})", repo.name, repo.path.display());
      match inspect::inspect(&repo, &git, &settings.version_file, settings.fallback_commit_window) {
        Ok(state) => {
          println!("   • Current version: {}", state.current_version);
          println!("   • Commits in window: {}", state.commits.len());
          println!("   • Suggested bump: {}", state.bump.as_str());
          states.push((state, git));
        }
        Err(err) => {
          println!("   ⚠️  {}: {}", repo.name, err);
          outcomes.push(RepoOutcome {
            name: repo.name.clone(),
            outcome: Outcome::Failed(err.to_string()),
          });
        }
      }
    }

    // Phase 3: Reconcile (barrier). One shared target for the whole set.
    if states.is_empty() {
      println!("\n⚠️  No repository survived inspection; nothing to reconcile.");
      return Ok(RunReport {
        set: set.name.clone(),
        dry_run: self.dry_run,
        decision: None,
        outcomes,
        publications: vec![],
      });
    }

    let decision = reconcile(&states.iter().map(|(s, _)| s.clone()).collect::<Vec<_>>());
    println!("\n================ Managing as a monolith ================");
    println!("Global base version: {}", decision.base);
    println!("Global bump: {}", decision.severity.as_str());
    println!("➡️  New global version: {}", decision.target);
    println!("========================================================");

    // Phase 4: Apply. Per-repository units on the bounded pool; each
    // working copy is exclusive to its unit of work.
    let branch = self.config.release_branch(&decision.target);
    let mut pending: Vec<(RepoPlan, GitRepo)> = Vec::new();

    for (state, git) in states {
      let plan = RepoPlan::from_state(&state, &decision, branch.clone());
      if plan.already_aligned() {
        println!("📦 {}: already at {}. Skipping.", plan.name, plan.target);
        outcomes.push(RepoOutcome {
          name: plan.name.clone(),
          outcome: Outcome::SkippedAligned,
        });
      } else {
        pending.push((plan, git));
      }
    }

    let mut applied_plans: Vec<RepoPlan> = Vec::new();

    // A pool failure must not keep the run from its report; sequential
    // execution is the degraded mode.
    let pool = if self.dry_run {
      None
    } else {
      match self.pool() {
        Ok(pool) => Some(pool),
        Err(err) => {
          println!("⚠️  Worker pool unavailable ({}); processing repositories sequentially.", err);
          None
        }
      }
    };

    if self.dry_run {
      for (plan, _) in &pending {
        println!(
          "📦 {}: [simulation] would move {} -> {} on branch {}",
          plan.name, plan.current, plan.target, plan.branch
        );
        outcomes.push(RepoOutcome {
          name: plan.name.clone(),
          outcome: Outcome::WouldApply,
        });
      }
    } else if !pending.is_empty() {
      println!("\n🚀 Applying {} to {} repositories...", decision.target, pending.len());
      let results = self.apply_units(pool.as_ref(), pending);

      for (plan, result) in results {
        match result {
          Ok(()) => {
            println!("   ✅ {} moved to {} on {}", plan.name, plan.target, plan.branch);
            outcomes.push(RepoOutcome {
              name: plan.name.clone(),
              outcome: Outcome::Applied,
            });
            applied_plans.push(plan);
          }
          Err(err) => {
            println!("   ❌ {}: {}", plan.name, err);
            outcomes.push(RepoOutcome {
              name: plan.name.clone(),
              outcome: Outcome::Failed(err.to_string()),
            });
          }
        }
      }
    }

    // Phase 5: Publish. One change request per modified repository.
    let mut publications: Vec<PublicationRecord> = Vec::new();
    if self.dry_run {
      let would_update: Vec<&RepoOutcome> = outcomes.iter().filter(|o| o.outcome == Outcome::WouldApply).collect();
      if would_update.is_empty() {
        println!("\n📝 [simulation] Everything already aligned. No change requests needed.");
      } else {
        println!("\n📝 [simulation] Change requests would be opened for:");
        for outcome in would_update {
          println!("   - {} (base: {}, head: {})", outcome.name, settings.integration_branch, branch);
        }
      }
    } else if !applied_plans.is_empty() {
      println!("\n🔁 Opening change requests...");
      let updated: Vec<String> = applied_plans.iter().map(|p| p.name.clone()).collect();
      let token = self.config.credential();

      publications = self.publish_units(pool.as_ref(), &applied_plans, &decision, &updated, token.as_deref());

      for record in &publications {
        match &record.publication {
          Publication::Created(url) => println!("   🔁 {}: pull request created: {}", record.name, url),
          Publication::Manual(url) => println!("   🔁 {}: open the change request manually at {}", record.name, url),
          Publication::Unidentified => {
            println!("   ❌ {}: cannot identify the hosting platform from the origin remote", record.name)
          }
        }
      }
    }

    // Phase 6: Report.
    Ok(RunReport {
      set: set.name.clone(),
      dry_run: self.dry_run,
      decision: Some(decision),
      outcomes,
      publications,
    })
  }

  fn sync_one(&self, repo: &RepoConfig) -> AlignResult<GitRepo> {
    let git = GitRepo::open(&repo.path, self.git_timeout())?;
    sync::sync_to_integration(
      &git,
      &self.config.settings.integration_branch,
      &self.config.settings.primary_branches,
    )?;
    Ok(git)
  }

  fn apply_units(
    &self,
    pool: Option<&rayon::ThreadPool>,
    pending: Vec<(RepoPlan, GitRepo)>,
  ) -> Vec<(RepoPlan, AlignResult<()>)> {
    let settings = &self.config.settings;

    let progress = PhaseProgress::new();
    let bars: Vec<_> = pending
      .iter()
      .map(|(plan, _)| progress.add_bar(1, format!("Applying {}", plan.name)))
      .collect();

    run_units(pool, pending, |idx, (plan, git)| {
      let result = apply::apply(&git, &plan, settings);
      progress.inc(&bars[idx]);
      (plan, result)
    })
  }

  fn publish_units(
    &self,
    pool: Option<&rayon::ThreadPool>,
    plans: &[RepoPlan],
    decision: &GlobalDecision,
    updated: &[String],
    token: Option<&str>,
  ) -> Vec<PublicationRecord> {
    let settings = &self.config.settings;

    run_units(pool, plans.to_vec(), |_, plan| PublicationRecord {
      name: plan.name.clone(),
      publication: publish::publish(&plan, decision, updated, settings, token),
    })
  }

  fn pool(&self) -> AlignResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
      .num_threads(self.jobs)
      .build()
      .map_err(|e| AlignError::message(format!("Failed to build worker pool: {}", e)))
  }
}

/// Run per-repository units on the pool, or in order when no pool exists
fn run_units<T, R, F>(pool: Option<&rayon::ThreadPool>, items: Vec<T>, work: F) -> Vec<R>
where
  T: Send,
  R: Send,
  F: Fn(usize, T) -> R + Send + Sync,
{
  match pool {
    Some(pool) => pool.install(|| {
      items
        .into_par_iter()
        .enumerate()
        .map(|(idx, item)| work(idx, item))
        .collect()
    }),
    None => items.into_iter().enumerate().map(|(idx, item)| work(idx, item)).collect(),
  }
}
