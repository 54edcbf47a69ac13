//! Distinguisher accumulators.
//!
//! Every target sharing a base name is fed, member by member, into a fixed
//! hierarchy: product type, OS, minimum OS version, environment, then
//! architecture. Each level only speaks up when the keys it has seen differ
//! at that level, so names stay as short as the collision allows.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::consolidate::{ConsolidatedTarget, Key};
use crate::core::{Environment, Os, OsVersion, Target};
use crate::disambiguate::ConfigurationHashes;

/// Pushes `value` unless it is already present, keeping first-seen order.
fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// The most specific distinguisher the hierarchy can produce for a member.
///
/// Two keys sharing one of these cannot be told apart by the hierarchy.
fn distinguisher_key(target: &Target) -> String {
    let platform = &target.platform;
    let mut parts = vec![
        platform.arch.clone(),
        platform.os.as_str().to_string(),
        platform.minimum_os_version.pretty(),
        platform.environment().to_string(),
    ];
    parts.extend(target.xcode_configurations.iter().cloned());
    parts.join("-")
}

/// All targets sharing one base name.
#[derive(Debug, Default)]
pub(crate) struct TargetComponents<'a> {
    keys: BTreeSet<&'a Key>,
    product_types: BTreeMap<&'static str, ProductTypeComponents<'a>>,
}

impl<'a> TargetComponents<'a> {
    pub(crate) fn add(&mut self, target: &'a ConsolidatedTarget, key: &'a Key) {
        self.keys.insert(key);
        self.product_types
            .entry(target.product.product_type.pretty_name())
            .or_default()
            .add(target, key);
    }

    /// `base_name` followed by each distinguisher in parentheses.
    pub(crate) fn unique_name(
        &self,
        target: &ConsolidatedTarget,
        key: &Key,
        base_name: &str,
        hashes: &mut ConfigurationHashes,
    ) -> String {
        // Differences within one consolidated target never need a name
        if self.keys.len() <= 1 {
            return base_name.to_string();
        }

        let Some(product_type) = self
            .product_types
            .get(target.product.product_type.pretty_name())
        else {
            return base_name.to_string();
        };

        let distinguishers =
            product_type.distinguishers(target, key, self.product_types.len() > 1, hashes);

        let mut name = base_name.to_string();
        for distinguisher in distinguishers {
            name.push_str(" (");
            name.push_str(&distinguisher);
            name.push(')');
        }
        name
    }
}

#[derive(Debug, Default)]
struct ProductTypeComponents<'a> {
    oses: BTreeMap<Os, OsComponents<'a>>,
    distinguisher_keys: HashMap<String, BTreeSet<&'a Key>>,
}

impl<'a> ProductTypeComponents<'a> {
    fn add(&mut self, target: &'a ConsolidatedTarget, key: &'a Key) {
        for member in target.targets.values() {
            self.oses
                .entry(member.platform.os)
                .or_default()
                .add(member, key);
            self.distinguisher_keys
                .entry(distinguisher_key(member))
                .or_default()
                .insert(key);
        }
    }

    fn distinguishers(
        &self,
        target: &ConsolidatedTarget,
        key: &Key,
        include_product_type: bool,
        hashes: &mut ConfigurationHashes,
    ) -> Vec<String> {
        let mut distinguishers = Vec::new();
        let mut composite = Vec::new();
        let mut xcode_configurations = BTreeSet::new();

        if include_product_type {
            distinguishers.push(target.product.product_type.pretty_name().to_string());
        }

        let include_os = self.oses.len() > 1;

        if self.needs_configuration_distinguishing(target) {
            // The hierarchy would produce the same name for another key
            if include_os {
                for (_, member) in target.sorted_targets() {
                    push_unique(&mut composite, member.platform.os.pretty_name().to_string());
                }
                distinguishers.push(composite.join(", "));
            }

            let configurations: Vec<String> = target
                .sorted_targets()
                .map(|(_, member)| member.configuration.clone())
                .collect();
            distinguishers.push(hashes.get(configurations));

            return distinguishers;
        }

        for (_, member) in target.sorted_targets() {
            let Some(os) = self.oses.get(&member.platform.os) else {
                continue;
            };
            let distinguisher = os.distinguisher(member, key, include_os);

            if !distinguisher.components.is_empty() {
                push_unique(&mut composite, distinguisher.components.join(" "));
            }
            xcode_configurations.extend(distinguisher.xcode_configurations);
        }

        if !composite.is_empty() {
            distinguishers.push(composite.join(", "));
        }
        if !xcode_configurations.is_empty() {
            let configurations: Vec<String> = xcode_configurations.into_iter().collect();
            distinguishers.push(configurations.join(", "));
        }

        distinguishers
    }

    fn needs_configuration_distinguishing(&self, target: &ConsolidatedTarget) -> bool {
        target.sorted_targets().any(|(_, member)| {
            self.distinguisher_keys
                .get(&distinguisher_key(member))
                .is_some_and(|keys| keys.len() > 1)
        })
    }
}

#[derive(Debug, Default)]
struct OsDistinguisher {
    components: Vec<String>,
    xcode_configurations: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct OsComponents<'a> {
    versions_by_key: HashMap<&'a Key, BTreeSet<OsVersion>>,
    versions: BTreeMap<OsVersion, VersionComponents<'a>>,
}

impl<'a> OsComponents<'a> {
    fn add(&mut self, target: &'a Target, key: &'a Key) {
        let version = &target.platform.minimum_os_version;
        self.versions_by_key
            .entry(key)
            .or_default()
            .insert(version.clone());
        self.versions
            .entry(version.clone())
            .or_default()
            .add(target, key);
    }

    fn distinguisher(&self, target: &Target, key: &Key, include_os: bool) -> OsDistinguisher {
        let platform = &target.platform;

        // Only the OS name is shown when every difference is inside one key
        let needs_subcomponents = self.versions_by_key.len() > 1;
        let include_version = needs_subcomponents && self.versions.len() > 1;

        let version = if needs_subcomponents {
            let force_include_environment = self
                .versions_by_key
                .get(key)
                .is_some_and(|versions| versions.len() > 1);
            self.versions.get(&platform.minimum_os_version).map(|components| {
                components.distinguisher(target, include_version, force_include_environment)
            })
        } else {
            None
        };

        let mut components = Vec::new();
        let mut xcode_configurations = BTreeSet::new();
        if let Some(prefix) = version.as_ref().and_then(|v| v.prefix.clone()) {
            components.push(prefix);
        }
        if include_os || include_version {
            components.push(platform.os.pretty_name().to_string());
        }
        if let Some(version) = version {
            components.extend(version.suffix);
            xcode_configurations = version.xcode_configurations;
        }

        OsDistinguisher {
            components,
            xcode_configurations,
        }
    }
}

#[derive(Debug)]
struct VersionDistinguisher {
    prefix: Option<String>,
    suffix: Vec<String>,
    xcode_configurations: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct VersionComponents<'a> {
    keys: BTreeSet<&'a Key>,
    environments: BTreeMap<Environment, EnvironmentComponents<'a>>,
}

impl<'a> VersionComponents<'a> {
    fn add(&mut self, target: &'a Target, key: &'a Key) {
        self.keys.insert(key);
        self.environments
            .entry(target.platform.environment())
            .or_default()
            .add(target, key);
    }

    fn distinguisher(
        &self,
        target: &Target,
        include_version: bool,
        force_include_environment: bool,
    ) -> VersionDistinguisher {
        let platform = &target.platform;

        // Only the version is shown when every difference is inside one key
        let needs_subcomponents = force_include_environment || self.keys.len() > 1;

        let environment = if needs_subcomponents {
            let include_environment = force_include_environment || self.environments.len() > 1;
            self.environments
                .get(&platform.environment())
                .map(|components| components.distinguisher(target, include_environment))
        } else {
            None
        };

        let mut suffix = Vec::new();
        if include_version {
            suffix.push(platform.minimum_os_version.pretty());
        }

        match environment {
            Some(environment) => {
                suffix.extend(environment.suffix);
                VersionDistinguisher {
                    prefix: environment.prefix,
                    suffix,
                    xcode_configurations: environment.xcode_configurations,
                }
            }
            None => VersionDistinguisher {
                prefix: None,
                suffix,
                xcode_configurations: BTreeSet::new(),
            },
        }
    }
}

#[derive(Debug)]
struct EnvironmentDistinguisher {
    prefix: Option<String>,
    suffix: Option<String>,
    xcode_configurations: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct EnvironmentComponents<'a> {
    keys: BTreeSet<&'a Key>,
    archs: BTreeMap<String, ArchComponents<'a>>,
}

impl<'a> EnvironmentComponents<'a> {
    fn add(&mut self, target: &'a Target, key: &'a Key) {
        self.keys.insert(key);
        self.archs
            .entry(target.platform.arch.clone())
            .or_default()
            .add(target, key);
    }

    fn distinguisher(&self, target: &Target, include_environment: bool) -> EnvironmentDistinguisher {
        let platform = &target.platform;

        // Only the environment is shown when every difference is inside one key
        let arch = if self.keys.len() > 1 {
            self.archs
                .get(&platform.arch)
                .map(|components| components.distinguisher(target, self.archs.len() > 1))
        } else {
            None
        };

        let suffix = include_environment.then(|| platform.environment().to_string());

        match arch {
            Some(arch) => EnvironmentDistinguisher {
                prefix: arch.arch,
                suffix,
                xcode_configurations: arch.xcode_configurations,
            },
            None => EnvironmentDistinguisher {
                prefix: None,
                suffix,
                xcode_configurations: BTreeSet::new(),
            },
        }
    }
}

#[derive(Debug)]
struct ArchDistinguisher {
    arch: Option<String>,
    xcode_configurations: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct ArchComponents<'a> {
    keys: BTreeSet<&'a Key>,
    xcode_configurations: BTreeSet<&'a str>,
}

impl<'a> ArchComponents<'a> {
    fn add(&mut self, target: &'a Target, key: &'a Key) {
        self.keys.insert(key);
        self.xcode_configurations
            .extend(target.xcode_configurations.iter().map(String::as_str));
    }

    fn distinguisher(&self, target: &Target, include_arch: bool) -> ArchDistinguisher {
        // Only the Xcode configuration is shown when every difference is
        // inside one key
        let xcode_configurations = if self.keys.len() > 1 && self.xcode_configurations.len() > 1 {
            target.xcode_configurations.iter().cloned().collect()
        } else {
            BTreeSet::new()
        };

        ArchDistinguisher {
            arch: include_arch.then(|| target.platform.arch.clone()),
            xcode_configurations,
        }
    }
}
