//! xcgen - Bazel to Xcode target consolidation and naming
//!
//! This crate provides the core library functionality for xcgen: merging
//! per-configuration Bazel targets into Xcode targets, and giving each
//! resulting target a unique, readable name.

pub mod consolidate;
pub mod core;
pub mod disambiguate;
pub mod ops;
pub mod util;

/// Test utilities for xcgen unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides target fixtures and a recording logger.
#[cfg(test)]
pub mod test_support;

pub use consolidate::{consolidate_targets, ConsolidatedTarget, ConsolidatedTargets, Key};
pub use crate::core::{Target, TargetId, TargetUniverse};
pub use disambiguate::{disambiguate_targets, DisambiguatedTarget, DisambiguatedTargets};
