//! Monolithic release alignment
//!
//! Every repository in a set ships under one shared version number. The
//! modules here cover the pipeline from raw commit subjects to opened change
//! requests: `classify` turns subjects into a bump severity, `inspect` reads
//! per-repository state, `reconcile` picks the single global target,
//! `apply` mutates working copies and `publish` opens the review surface.
//! `orchestrate` wires the phases together.

pub mod apply;
pub mod changelog;
pub mod classify;
pub mod inspect;
pub mod orchestrate;
pub mod plan;
pub mod publish;
pub mod reconcile;
pub mod sync;
pub mod version;
