//! Target definitions - one configured Bazel target.
//!
//! A Target is the leaf entity of the universe: a label built for one
//! platform in one configuration. Targets are read-only to the
//! consolidation and disambiguation engines.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::label::BazelLabel;
use crate::core::platform::Platform;
use crate::core::product::Product;
use crate::core::target_id::TargetId;

/// Source-level inputs of a target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inputs {
    /// Ordered; the order is preserved in the Xcode build phase.
    pub srcs: Vec<PathBuf>,
    pub non_arc_srcs: Vec<PathBuf>,
    pub hdrs: BTreeSet<PathBuf>,
    pub pch: Option<PathBuf>,
    pub resources: BTreeSet<PathBuf>,
    pub entitlements: Option<PathBuf>,
}

impl Inputs {
    /// Every input file except resources.
    pub fn non_resources(&self) -> BTreeSet<PathBuf> {
        self.srcs
            .iter()
            .chain(&self.non_arc_srcs)
            .chain(&self.hdrs)
            .chain(&self.pch)
            .chain(&self.entitlements)
            .cloned()
            .collect()
    }

    pub fn all(&self) -> BTreeSet<PathBuf> {
        let mut files = self.non_resources();
        files.extend(self.resources.iter().cloned());
        files
    }
}

/// Inputs handed to the linker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerInputs {
    pub dynamic_frameworks: Vec<PathBuf>,
}

/// Outputs a target produces besides its product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Outputs {
    pub product: Option<PathBuf>,
    pub swift_module: Option<PathBuf>,
}

impl Outputs {
    pub fn has_outputs(&self) -> bool {
        self.product.is_some() || self.swift_module.is_some()
    }

    pub fn has_swift_outputs(&self) -> bool {
        self.swift_module.is_some()
    }
}

fn default_xcode_configurations() -> Vec<String> {
    vec!["Debug".to_string()]
}

fn default_true() -> bool {
    true
}

/// One (label, platform, configuration) target description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub label: BazelLabel,
    /// Opaque Bazel configuration string (output directory mnemonic).
    pub configuration: String,
    /// Sorted, deduplicated Xcode configuration names.
    #[serde(default = "default_xcode_configurations")]
    pub xcode_configurations: Vec<String>,
    pub platform: Platform,
    pub product: Product,
    #[serde(default = "default_true")]
    pub is_swift: bool,
    #[serde(default)]
    pub test_host: Option<TargetId>,
    #[serde(default)]
    pub dependencies: BTreeSet<TargetId>,
    #[serde(default)]
    pub resource_bundle_dependencies: BTreeSet<TargetId>,
    /// Watch app embedded in this (iOS) application.
    #[serde(default)]
    pub watch_application: Option<TargetId>,
    #[serde(default)]
    pub extensions: BTreeSet<TargetId>,
    #[serde(default)]
    pub app_clips: BTreeSet<TargetId>,
    #[serde(default)]
    pub inputs: Inputs,
    #[serde(default)]
    pub linker_inputs: LinkerInputs,
    #[serde(default)]
    pub resource_bundles: BTreeSet<PathBuf>,
    #[serde(default)]
    pub outputs: Outputs,
}

impl Target {
    /// Dependencies that must resolve to the same Xcode targets across
    /// every member of a consolidated target.
    pub fn all_dependencies(&self) -> BTreeSet<TargetId> {
        self.dependencies
            .union(&self.resource_bundle_dependencies)
            .cloned()
            .collect()
    }

    /// Targets embedded in this one's product.
    pub fn embedded_targets(&self) -> impl Iterator<Item = &TargetId> {
        self.watch_application
            .iter()
            .chain(&self.extensions)
            .chain(&self.app_clips)
    }

    /// Files that `EXCLUDED_SOURCE_FILE_NAMES` / `INCLUDED_SOURCE_FILE_NAMES`
    /// can apply to.
    pub fn all_excludable_files(&self) -> BTreeSet<PathBuf> {
        let mut files = self.inputs.all();
        files.extend(self.linker_inputs.dynamic_frameworks.iter().cloned());
        files.extend(self.resource_bundles.iter().cloned());
        files
    }

    /// Normalizes `xcode_configurations` to sorted, unique names.
    pub fn normalize(&mut self) {
        self.xcode_configurations.sort();
        self.xcode_configurations.dedup();
    }
}
