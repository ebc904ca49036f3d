//! `monorel align` command

use crate::align::orchestrate::{Orchestrator, RunReport};
use crate::align::plan::Outcome;
use crate::core::config::AlignConfig;
use crate::core::error::{AlignResult, ResultExt};
use std::path::Path;

/// Align every repository in a set to one shared version
pub fn run_align(set: Option<&str>, dry_run: bool, jobs: Option<usize>, json: bool) -> AlignResult<()> {
  let cwd = std::env::current_dir().context("Failed to resolve the current directory")?;
  run_align_in(&cwd, set, dry_run, jobs, json)
}

/// Same as `run_align`, rooted at an explicit directory
pub fn run_align_in(
  root: &Path,
  set: Option<&str>,
  dry_run: bool,
  jobs: Option<usize>,
  json: bool,
) -> AlignResult<()> {
  let config = AlignConfig::load(root)?;

  if dry_run {
    println!("🌪️  Simulation mode: no repository will be modified.");
  }

  let report = Orchestrator::new(config, dry_run, jobs).run(set)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_summary(&report);
  }

  Ok(())
}

fn print_summary(report: &RunReport) {
  println!("\n📊 Run summary for set '{}'", report.set);

  match &report.decision {
    Some(decision) => println!(
      "   Version: {} -> {} ({})",
      decision.base,
      decision.target,
      decision.severity.as_str()
    ),
    None => println!("   Version: no decision (no repository inspected)"),
  }

  for outcome in &report.outcomes {
    let label = match &outcome.outcome {
      Outcome::SkippedAligned => "⏭️  already aligned".to_string(),
      Outcome::WouldApply => "🌪️  would apply (simulation)".to_string(),
      Outcome::Applied => "✅ applied".to_string(),
      Outcome::Failed(reason) => format!("❌ failed: {}", reason),
    };
    println!("   {} {}", outcome.name, label);
  }

  let failures = report.outcomes.iter().filter(|o| o.outcome.is_failure()).count();
  if failures > 0 {
    println!("\n⚠️  {} repositories failed; the rest of the set was still processed.", failures);
  } else {
    println!("\n✅ Process finished.");
  }
}
