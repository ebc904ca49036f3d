//! Shared infrastructure: errors, configuration, and the git backend

pub mod config;
pub mod error;
pub mod vcs;
