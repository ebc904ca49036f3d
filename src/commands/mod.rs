//! Command handlers for the CLI surface

pub mod align;
pub mod status;
