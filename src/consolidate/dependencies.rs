//! Dependency, test host and watch application resolution at the key
//! level.

use std::collections::{BTreeMap, BTreeSet};

use crate::consolidate::errors::ConsolidationError;
use crate::consolidate::key::Key;
use crate::core::{Target, TargetId, TargetUniverse};

/// A member's dependencies, resolved to candidate keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResolvedDependencies {
    pub dependencies: BTreeSet<Key>,
    pub test_host: Option<Key>,
    pub watch_application: Option<Key>,
}

/// Current key assignment plus the resolved dependencies of every member.
#[derive(Debug, Default)]
pub(crate) struct DependencyIndex {
    /// Target id to the key it currently belongs to.
    pub keys: BTreeMap<TargetId, Key>,
    /// Every live key.
    pub live: BTreeSet<Key>,
    resolved: BTreeMap<TargetId, ResolvedDependencies>,
    /// Key to the keys that depend on it (possibly stale).
    rdeps: BTreeMap<Key, BTreeSet<Key>>,
}

impl DependencyIndex {
    /// Assign each group a key and resolve every member's dependencies.
    pub fn new(
        targets: &TargetUniverse,
        groups: Vec<BTreeSet<TargetId>>,
    ) -> Result<Self, ConsolidationError> {
        let mut index = DependencyIndex::default();
        for group in groups {
            index.insert_key(Key::new(group));
        }

        let live: Vec<Key> = index.live.iter().cloned().collect();
        for key in &live {
            index.update_dependencies(targets, key)?;
        }

        Ok(index)
    }

    fn insert_key(&mut self, key: Key) {
        for id in key.target_ids() {
            self.keys.insert(id.clone(), key.clone());
        }
        self.live.insert(key);
    }

    pub fn resolved(&self, id: &TargetId) -> Option<&ResolvedDependencies> {
        self.resolved.get(id)
    }

    /// Re-resolve the dependencies of every member of `key`.
    pub fn update_dependencies(
        &mut self,
        targets: &TargetUniverse,
        key: &Key,
    ) -> Result<(), ConsolidationError> {
        for id in key.target_ids() {
            let target = targets
                .get(id)
                .ok_or_else(|| ConsolidationError::MissingTarget { target: id.clone() })?;
            let resolved = resolve(&self.keys, id, target)?;

            let edges = resolved
                .dependencies
                .iter()
                .chain(&resolved.test_host)
                .chain(&resolved.watch_application);
            for dependency in edges {
                self.rdeps
                    .entry(dependency.clone())
                    .or_default()
                    .insert(key.clone());
            }
            self.resolved.insert(id.clone(), resolved);
        }
        Ok(())
    }

    /// Replace `key` with one singleton key per member.
    ///
    /// Returns the keys that depended on `key` and are still live.
    pub fn split(
        &mut self,
        targets: &TargetUniverse,
        key: &Key,
    ) -> Result<Vec<Key>, ConsolidationError> {
        self.live.remove(key);
        let singletons: Vec<Key> = key.target_ids().iter().cloned().map(Key::single).collect();
        for singleton in &singletons {
            self.insert_key(singleton.clone());
        }
        for singleton in &singletons {
            self.update_dependencies(targets, singleton)?;
        }

        let dependents = self.rdeps.remove(key).unwrap_or_default();
        let mut live_dependents = Vec::new();
        for dependent in dependents {
            if self.live.contains(&dependent) {
                self.update_dependencies(targets, &dependent)?;
                live_dependents.push(dependent);
            }
        }
        Ok(live_dependents)
    }
}

fn resolve(
    keys: &BTreeMap<TargetId, Key>,
    id: &TargetId,
    target: &Target,
) -> Result<ResolvedDependencies, ConsolidationError> {
    let dependencies = target
        .all_dependencies()
        .into_iter()
        .map(|dependency| {
            keys.get(&dependency)
                .cloned()
                .ok_or_else(|| ConsolidationError::MissingDependency {
                    target: id.clone(),
                    dependency,
                })
        })
        .collect::<Result<BTreeSet<Key>, _>>()?;

    let test_host = match &target.test_host {
        Some(test_host) => Some(keys.get(test_host).cloned().ok_or_else(|| {
            ConsolidationError::MissingTestHost {
                target: id.clone(),
                test_host: test_host.clone(),
            }
        })?),
        None => None,
    };

    let watch_application = match &target.watch_application {
        Some(watch_application) => Some(keys.get(watch_application).cloned().ok_or_else(|| {
            ConsolidationError::MissingDependency {
                target: id.clone(),
                dependency: watch_application.clone(),
            }
        })?),
        None => None,
    };

    Ok(ResolvedDependencies {
        dependencies,
        test_host,
        watch_application,
    })
}
