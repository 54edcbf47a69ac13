//! Consolidated targets - one Xcode target built from several configured
//! Bazel targets.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Serialize;

use crate::consolidate::errors::ConsolidationError;
use crate::consolidate::key::Key;
use crate::consolidate::merge::merge_ordered;
use crate::core::platform::compare_arch;
use crate::core::{BazelLabel, ProductType, Target, TargetId};

/// The product of a consolidated target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidatedProduct {
    pub name: String,
    pub product_type: ProductType,
    pub basename: Option<String>,
    /// Product paths of every member.
    pub paths: BTreeSet<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsolidatedInputs {
    pub srcs: Vec<PathBuf>,
    pub non_arc_srcs: Vec<PathBuf>,
    pub hdrs: BTreeSet<PathBuf>,
    pub resources: BTreeSet<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsolidatedLinkerInputs {
    pub dynamic_frameworks: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConsolidatedOutputs {
    pub has_outputs: bool,
    pub has_swift_outputs: bool,
}

/// Several configured targets represented by one Xcode target.
///
/// Differences between members are expressed downstream as conditional
/// build settings; the fields here are what the members have in common or
/// the union of what they have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedTarget {
    pub name: String,
    pub label: BazelLabel,
    pub product: ConsolidatedProduct,
    pub is_swift: bool,
    pub inputs: ConsolidatedInputs,
    pub linker_inputs: ConsolidatedLinkerInputs,
    pub resource_bundles: BTreeSet<PathBuf>,
    pub watch_application: Option<TargetId>,
    pub extensions: BTreeSet<TargetId>,
    pub app_clips: BTreeSet<TargetId>,
    pub outputs: ConsolidatedOutputs,
    /// Excludable files every member references.
    pub baseline_files: BTreeSet<PathBuf>,
    /// Excludable files each member references above the baseline.
    pub unique_files: BTreeMap<TargetId, BTreeSet<PathBuf>>,
    pub targets: BTreeMap<TargetId, Target>,
    /// Member ids, most likely to be built first.
    pub sorted_target_ids: Vec<TargetId>,
}

/// Order used whenever one member has to stand in for the whole target.
///
/// Xcode configuration lists first, then simulators before devices with
/// `arm64` first, then platform order, then id.
fn compare_members(lhs: (&TargetId, &Target), rhs: (&TargetId, &Target)) -> Ordering {
    let (lhs_id, lhs) = lhs;
    let (rhs_id, rhs) = rhs;

    lhs.xcode_configurations
        .cmp(&rhs.xcode_configurations)
        .then_with(|| lhs.platform.environment().cmp(&rhs.platform.environment()))
        .then_with(|| compare_arch(&lhs.platform.arch, &rhs.platform.arch))
        .then_with(|| lhs.platform.cmp(&rhs.platform))
        .then_with(|| lhs_id.cmp(rhs_id))
}

impl ConsolidatedTarget {
    /// Build a consolidated target from its members.
    ///
    /// `targets` must not be empty.
    pub fn new(targets: BTreeMap<TargetId, Target>) -> Result<Self, ConsolidationError> {
        let mut sorted: Vec<(&TargetId, &Target)> = targets.iter().collect();
        sorted.sort_by(|lhs, rhs| compare_members(*lhs, *rhs));

        let Some(&(_, representative)) = sorted.first() else {
            return Err(ConsolidationError::EmptyGroup);
        };
        let sorted_targets: Vec<&Target> = sorted.iter().map(|(_, target)| *target).collect();

        let product = ConsolidatedProduct {
            name: representative.product.name.clone(),
            product_type: representative.product.product_type,
            basename: representative.product.basename(),
            paths: sorted_targets
                .iter()
                .flat_map(|target| target.product.all_paths())
                .map(PathBuf::from)
                .collect(),
        };

        let srcs: Vec<&[PathBuf]> = sorted_targets
            .iter()
            .map(|t| t.inputs.srcs.as_slice())
            .collect();
        let non_arc_srcs: Vec<&[PathBuf]> = sorted_targets
            .iter()
            .map(|t| t.inputs.non_arc_srcs.as_slice())
            .collect();
        let inputs = ConsolidatedInputs {
            srcs: merge_ordered(&srcs),
            non_arc_srcs: merge_ordered(&non_arc_srcs),
            hdrs: sorted_targets
                .iter()
                .flat_map(|t| t.inputs.hdrs.iter().cloned())
                .collect(),
            resources: sorted_targets
                .iter()
                .flat_map(|t| t.inputs.resources.iter().cloned())
                .collect(),
        };

        let dynamic_frameworks: Vec<&[PathBuf]> = sorted_targets
            .iter()
            .map(|t| t.linker_inputs.dynamic_frameworks.as_slice())
            .collect();
        let linker_inputs = ConsolidatedLinkerInputs {
            dynamic_frameworks: merge_ordered(&dynamic_frameworks),
        };

        let excludable: BTreeMap<TargetId, BTreeSet<PathBuf>> = targets
            .iter()
            .map(|(id, target)| (id.clone(), target.all_excludable_files()))
            .collect();
        let baseline_files = baseline(excludable.values());
        let unique_files = excludable
            .into_iter()
            .map(|(id, files)| (id, &files - &baseline_files))
            .collect();

        let outputs = ConsolidatedOutputs {
            has_outputs: sorted_targets.iter().any(|t| t.outputs.has_outputs()),
            has_swift_outputs: sorted_targets.iter().any(|t| t.outputs.has_swift_outputs()),
        };
        let resource_bundles = sorted_targets
            .iter()
            .flat_map(|t| t.resource_bundles.iter().cloned())
            .collect();
        let name = representative.name.clone();
        let label = representative.label.clone();
        let is_swift = representative.is_swift;
        let watch_application = representative.watch_application.clone();
        let extensions = representative.extensions.clone();
        let app_clips = representative.app_clips.clone();
        let sorted_target_ids = sorted.iter().map(|(id, _)| (*id).clone()).collect();

        Ok(ConsolidatedTarget {
            name,
            label,
            product,
            is_swift,
            inputs,
            linker_inputs,
            resource_bundles,
            watch_application,
            extensions,
            app_clips,
            outputs,
            baseline_files,
            unique_files,
            targets,
            sorted_target_ids,
        })
    }

    /// Members in their sorted order.
    pub fn sorted_targets(&self) -> impl Iterator<Item = (&TargetId, &Target)> {
        self.sorted_target_ids
            .iter()
            .filter_map(|id| self.targets.get_key_value(id))
    }

    /// The member that stands in for the whole target.
    pub fn representative(&self) -> Option<(&TargetId, &Target)> {
        self.sorted_targets().next()
    }

    /// Keys of everything this target depends on, test host and watch
    /// application included.
    ///
    /// Members are consistent by construction, so the representative's
    /// dependencies speak for all of them.
    pub fn dependencies(
        &self,
        keys: &BTreeMap<TargetId, Key>,
    ) -> Result<BTreeSet<Key>, ConsolidationError> {
        let Some((id, target)) = self.representative() else {
            return Ok(BTreeSet::new());
        };

        let mut dependencies = BTreeSet::new();
        for dependency in target.all_dependencies() {
            let key = keys
                .get(&dependency)
                .ok_or_else(|| ConsolidationError::MissingDependency {
                    target: id.clone(),
                    dependency: dependency.clone(),
                })?;
            dependencies.insert(key.clone());
        }
        if let Some(test_host) = &target.test_host {
            let key = keys
                .get(test_host)
                .ok_or_else(|| ConsolidationError::MissingTestHost {
                    target: id.clone(),
                    test_host: test_host.clone(),
                })?;
            dependencies.insert(key.clone());
        }
        if let Some(watch_application) = &target.watch_application {
            let key = keys
                .get(watch_application)
                .ok_or_else(|| ConsolidationError::MissingDependency {
                    target: id.clone(),
                    dependency: watch_application.clone(),
                })?;
            dependencies.insert(key.clone());
        }
        Ok(dependencies)
    }
}

fn baseline<'a>(mut sets: impl Iterator<Item = &'a BTreeSet<PathBuf>>) -> BTreeSet<PathBuf> {
    let Some(first) = sets.next() else {
        return BTreeSet::new();
    };
    sets.fold(first.clone(), |baseline, files| &baseline & files)
}
