//! Target name disambiguation.
//!
//! Every consolidated target gets a name that is unique across the project.
//! The short target name is preferred; when two different labels share it
//! (ignoring case) the full label is used instead. Targets that still share
//! a base name get the fewest parenthesized distinguishers that tell them
//! apart, for example `Lib (iOS)` and `Lib (macOS)`.

mod components;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info, warn};

use crate::consolidate::{ConsolidatedTarget, ConsolidatedTargets, Key};
use crate::core::TargetId;
use crate::util::hash::{short_hash, Fingerprint};
use components::TargetComponents;

/// A consolidated target and its project-wide unique name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisambiguatedTarget {
    pub name: String,
    pub target: ConsolidatedTarget,
}

/// Result of disambiguation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisambiguatedTargets {
    pub keys: BTreeMap<TargetId, Key>,
    pub targets: BTreeMap<Key, DisambiguatedTarget>,
}

impl DisambiguatedTargets {
    /// Name of the Xcode target for `key`.
    pub fn name_of_key(&self, key: &Key) -> Option<&str> {
        self.targets.get(key).map(|target| target.name.as_str())
    }
}

/// Memoized short hashes of configuration lists.
#[derive(Debug, Default)]
pub(crate) struct ConfigurationHashes {
    hashes: HashMap<Vec<String>, String>,
}

impl ConfigurationHashes {
    /// Short hash of `configurations`, independent of their order.
    pub(crate) fn get(&mut self, configurations: Vec<String>) -> String {
        if let Some(hash) = self.hashes.get(&configurations) {
            return hash.clone();
        }

        let mut sorted: Vec<&str> = configurations.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        let hash = short_hash(sorted);

        self.hashes.insert(configurations, hash.clone());
        hash
    }

    pub(crate) fn len(&self) -> usize {
        self.hashes.len()
    }
}

/// Naming engine. Configuration hashes are cached for the engine's lifetime.
#[derive(Debug, Default)]
pub struct Disambiguator {
    hashes: ConfigurationHashes,
}

impl Disambiguator {
    pub fn new() -> Self {
        Disambiguator::default()
    }

    /// Assign a unique name to every consolidated target.
    pub fn disambiguate(&mut self, consolidated: ConsolidatedTargets) -> DisambiguatedTargets {
        let mut names = self.names(&consolidated.targets);
        resolve_collisions(&mut names);

        let targets: BTreeMap<Key, DisambiguatedTarget> = consolidated
            .targets
            .into_iter()
            .map(|(key, target)| {
                let name = names.remove(&key).unwrap_or_else(|| target.name.clone());
                (key, DisambiguatedTarget { name, target })
            })
            .collect();

        info!("named {} Xcode targets", targets.len());

        DisambiguatedTargets {
            keys: consolidated.keys,
            targets,
        }
    }

    fn names(&mut self, targets: &BTreeMap<Key, ConsolidatedTarget>) -> BTreeMap<Key, String> {
        let mut labels_by_name: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut by_name: HashMap<String, TargetComponents<'_>> = HashMap::new();
        let mut by_label: HashMap<String, TargetComponents<'_>> = HashMap::new();

        for (key, target) in targets {
            let name = normalized_name(target);
            let label = normalized_label(target);
            labels_by_name
                .entry(name.clone())
                .or_default()
                .insert(label.clone());
            by_name.entry(name).or_default().add(target, key);
            by_label.entry(label).or_default().add(target, key);
        }

        let mut names = BTreeMap::new();
        for (key, target) in targets {
            let name = normalized_name(target);
            let shares_name = labels_by_name
                .get(&name)
                .is_some_and(|labels| labels.len() > 1);

            // A name claimed by several labels falls back to the full label
            let (base_name, components) = if shares_name {
                (target.label.to_string(), by_label.get(&normalized_label(target)))
            } else {
                (target.name.clone(), by_name.get(&name))
            };

            let unique_name = match components {
                Some(components) => {
                    components.unique_name(target, key, &base_name, &mut self.hashes)
                }
                None => base_name,
            };
            names.insert(key.clone(), unique_name);
        }

        debug!("{} configuration hashes computed", self.hashes.len());
        names
    }
}

/// Assign a unique name to every consolidated target with a fresh engine.
pub fn disambiguate_targets(consolidated: ConsolidatedTargets) -> DisambiguatedTargets {
    Disambiguator::new().disambiguate(consolidated)
}

fn normalized_name(target: &ConsolidatedTarget) -> String {
    target.name.to_lowercase()
}

fn normalized_label(target: &ConsolidatedTarget) -> String {
    target.label.to_string().to_lowercase()
}

/// Keys whose names collide, ignoring case.
fn colliding_keys(names: &BTreeMap<Key, String>) -> Vec<Key> {
    let mut by_name: HashMap<String, Vec<&Key>> = HashMap::new();
    for (key, name) in names {
        by_name.entry(name.to_lowercase()).or_default().push(key);
    }

    let mut colliding: Vec<Key> = by_name
        .into_values()
        .filter(|keys| keys.len() > 1)
        .flatten()
        .cloned()
        .collect();
    colliding.sort();
    colliding
}

/// Suffix colliding names with a hash of their member ids.
///
/// The hierarchy and configuration hash leave collisions only for targets
/// whose names differ by case alone, or on a short hash collision.
fn resolve_collisions(names: &mut BTreeMap<Key, String>) {
    for key in colliding_keys(names) {
        let hash = short_hash(key.target_ids().iter().map(TargetId::as_str));
        if let Some(name) = names.get_mut(&key) {
            debug!("suffixing colliding name {}", name);
            name.push_str(&format!(" ({})", hash));
        }
    }

    for key in colliding_keys(names) {
        let mut fingerprint = Fingerprint::new();
        fingerprint.update_strs(key.target_ids().iter().map(TargetId::as_str));
        if let Some(name) = names.get_mut(&key) {
            warn!("short hash collision for {}", name);
            name.push_str(&format!(" ({})", fingerprint.finish()));
        }
    }
}
