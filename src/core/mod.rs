//! Core data structures for xcgen.
//!
//! This module contains the read-only description of the target universe:
//! - Target identifiers and Bazel labels
//! - Platforms, OS versions and product types
//! - Per-configuration targets and scheme build-for values

pub mod build_for;
pub mod label;
pub mod platform;
pub mod product;
pub mod target;
pub mod target_id;
pub mod version;

pub use build_for::{BuildFor, BuildForValue};
pub use label::BazelLabel;
pub use platform::{Environment, Os, Platform, PlatformVariant};
pub use product::{Product, ProductType};
pub use target::{Inputs, LinkerInputs, Outputs, Target};
pub use target_id::TargetId;
pub use version::OsVersion;

use std::collections::BTreeMap;

/// The full set of configured targets for one run.
pub type TargetUniverse = BTreeMap<TargetId, Target>;
