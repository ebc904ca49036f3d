//! Progress indicators for parallel phases
//!
//! Uses `linya` for allocation-free, concurrency-optimized progress bars.

use linya::{Bar, Progress};
use std::sync::{Arc, Mutex, MutexGuard};

/// Thread-safe multi-bar progress for per-repository work
#[derive(Clone)]
pub struct PhaseProgress {
  progress: Arc<Mutex<Progress>>,
}

impl PhaseProgress {
  pub fn new() -> Self {
    Self {
      progress: Arc::new(Mutex::new(Progress::new())),
    }
  }

  /// Add a new bar with a label and total
  pub fn add_bar(&self, total: usize, label: impl Into<String>) -> Bar {
    self.lock().bar(total, label.into())
  }

  /// Increment a bar (thread-safe)
  pub fn inc(&self, bar: &Bar) {
    self.lock().inc_and_draw(bar, 1);
  }

  // A panicked sibling worker must not take the shared bars down with it
  fn lock(&self) -> MutexGuard<'_, Progress> {
    self.progress.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl Default for PhaseProgress {
  fn default() -> Self {
    Self::new()
  }
}
