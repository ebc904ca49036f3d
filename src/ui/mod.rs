//! Console presentation helpers

pub mod progress;
