//! monorel: monolithic release alignment across a fleet of repositories
//!
//! Several services are versioned as one product. `monorel` inspects each
//! repository's commits since its last release, reconciles a single global
//! target version, and applies it everywhere: release branch, version
//! marker, changelog entry, commit, push, tag, change request.

pub mod align;
pub mod commands;
pub mod core;
pub mod ui;
