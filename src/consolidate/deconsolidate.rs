//! Consistency enforcement for candidate groups.
//!
//! Xcode cannot express per-configuration dependencies, test hosts or watch
//! applications inside one target. A candidate group whose members disagree
//! on any of them is split into singletons, and every group that depended on
//! it is checked again since its own dependency shape just changed.

use std::collections::BTreeSet;
use std::fmt;

use rayon::prelude::*;
use tracing::debug;

use crate::consolidate::dependencies::DependencyIndex;
use crate::consolidate::errors::ConsolidationError;
use crate::consolidate::key::Key;
use crate::core::TargetUniverse;
use crate::util::Logger;

/// Properties on which the members of a group disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Conflict {
    pub test_host: bool,
    pub watch_application: bool,
    pub dependencies: bool,
}

impl Conflict {
    fn any(&self) -> bool {
        self.test_host || self.watch_application || self.dependencies
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.test_host {
            names.push("test host");
        }
        if self.watch_application {
            names.push("watch application");
        }
        if self.dependencies {
            names.push("dependencies");
        }
        match names.split_last() {
            Some((last, [])) => write!(f, "{}", last),
            Some((last, rest)) => write!(f, "{} and {}", rest.join(", "), last),
            None => Ok(()),
        }
    }
}

/// Checks whether every member of `key` resolves to the same test host,
/// watch application and dependency keys.
pub(crate) fn find_conflict(
    index: &DependencyIndex,
    key: &Key,
) -> Result<Option<Conflict>, ConsolidationError> {
    if key.len() < 2 {
        return Ok(None);
    }

    let mut test_hosts = BTreeSet::new();
    let mut watch_applications = BTreeSet::new();
    let mut dependencies = BTreeSet::new();
    for id in key.target_ids() {
        let resolved = index
            .resolved(id)
            .ok_or_else(|| ConsolidationError::MissingTarget { target: id.clone() })?;
        test_hosts.insert(&resolved.test_host);
        watch_applications.insert(&resolved.watch_application);
        dependencies.insert(&resolved.dependencies);
    }

    let conflict = Conflict {
        test_host: test_hosts.len() > 1,
        watch_application: watch_applications.len() > 1,
        dependencies: dependencies.len() > 1,
    };
    Ok(conflict.any().then_some(conflict))
}

/// Split every inconsistent group, propagating through dependents until
/// nothing changes.
pub(crate) fn deconsolidate(
    targets: &TargetUniverse,
    index: &mut DependencyIndex,
    logger: &dyn Logger,
) -> Result<(), ConsolidationError> {
    // Groups are independent before the first split
    let candidates: Vec<&Key> = index.live.iter().filter(|key| key.len() > 1).collect();
    let mut worklist: BTreeSet<Key> = {
        let shared: &DependencyIndex = index;
        let checked: Vec<Option<Key>> = candidates
            .par_iter()
            .map(|key| find_conflict(shared, key).map(|conflict| conflict.map(|_| (*key).clone())))
            .collect::<Result<_, _>>()?;
        checked.into_iter().flatten().collect()
    };
    debug!(
        "{} candidate groups, {} inconsistent",
        candidates.len(),
        worklist.len()
    );

    while let Some(key) = worklist.pop_first() {
        if !index.live.contains(&key) {
            continue;
        }
        let Some(conflict) = find_conflict(index, &key)? else {
            continue;
        };

        logger.log_warning(&format!(
            "unable to consolidate targets {} since they have conditional {}",
            key, conflict
        ));

        for dependent in index.split(targets, &key)? {
            if dependent.len() > 1 {
                worklist.insert(dependent);
            }
        }
    }

    Ok(())
}
