//! Target consolidation.
//!
//! Bazel reports one target per (label, platform, configuration). Xcode wants
//! one target per logical product. Consolidation runs in four stages:
//!
//! 1. `grouping` buckets targets into candidate groups
//! 2. `dependencies` resolves each member's dependencies to candidate keys
//! 3. `deconsolidate` splits groups whose members disagree on dependencies,
//!    test host or watch application, propagating through dependents
//! 4. [`ConsolidatedTarget::new`] merges each final group

mod deconsolidate;
mod dependencies;
pub mod errors;
pub mod graph;
mod grouping;
pub mod key;
pub mod merge;
pub mod target;

use std::collections::BTreeMap;

use tracing::{debug, info};

pub use errors::ConsolidationError;
pub use graph::KeyGraph;
pub use key::Key;
pub use target::ConsolidatedTarget;

use crate::core::{TargetId, TargetUniverse};
use crate::util::Logger;
use dependencies::DependencyIndex;

/// Result of consolidation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidatedTargets {
    /// Every target id to the key of the consolidated target it belongs to.
    pub keys: BTreeMap<TargetId, Key>,
    pub targets: BTreeMap<Key, ConsolidatedTarget>,
}

impl ConsolidatedTargets {
    /// Build the key-level dependency graph.
    pub fn dependency_graph(&self) -> Result<KeyGraph, ConsolidationError> {
        let mut graph = KeyGraph::new();
        for key in self.targets.keys() {
            graph.add_key(key.clone());
        }
        for (key, target) in &self.targets {
            for dependency in target.dependencies(&self.keys)? {
                graph.add_edge(key, &dependency);
            }
        }
        Ok(graph)
    }

    /// Keys in the order targets should be emitted: dependencies first.
    pub fn emission_order(&self) -> Result<Vec<Key>, ConsolidationError> {
        self.dependency_graph()?.topological_order()
    }
}

/// Consolidate targets that differ only by configuration.
///
/// Conflicts that prevent a consolidation are reported to `logger`; the
/// affected targets stay separate. Fails only when the universe references a
/// target it does not contain.
pub fn consolidate_targets(
    targets: &TargetUniverse,
    logger: &dyn Logger,
) -> Result<ConsolidatedTargets, ConsolidationError> {
    let groups = grouping::candidate_groups(targets);
    debug!("{} targets in {} candidate groups", targets.len(), groups.len());

    let mut index = DependencyIndex::new(targets, groups)?;
    deconsolidate::deconsolidate(targets, &mut index, logger)?;

    let mut consolidated = BTreeMap::new();
    for key in &index.live {
        let mut members = BTreeMap::new();
        for id in key.target_ids() {
            let target = targets
                .get(id)
                .ok_or_else(|| ConsolidationError::MissingTarget { target: id.clone() })?;
            members.insert(id.clone(), target.clone());
        }
        consolidated.insert(key.clone(), ConsolidatedTarget::new(members)?);
    }

    info!(
        "consolidated {} targets into {} Xcode targets",
        targets.len(),
        consolidated.len()
    );

    Ok(ConsolidatedTargets {
        keys: index.keys,
        targets: consolidated,
    })
}
