//! Test fixtures for common test scenarios.
//!
//! Builders for configured targets and small target universes, so engine
//! tests only spell out the fields that matter to them.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::consolidate::{ConsolidatedTarget, ConsolidatedTargets, Key};
use crate::core::{
    BazelLabel, Inputs, LinkerInputs, OsVersion, Outputs, Platform, PlatformVariant, Product,
    ProductType, Target, TargetId, TargetUniverse,
};

/// A platform for `variant`, with the OS derived from the variant.
pub fn platform(variant: PlatformVariant, arch: &str, minimum_os_version: &str) -> Platform {
    Platform {
        os: variant.os(),
        variant,
        arch: arch.to_string(),
        minimum_os_version: minimum_os_version
            .parse::<OsVersion>()
            .unwrap_or_else(|e| panic!("bad fixture version: {e}")),
    }
}

pub fn ios_simulator(arch: &str) -> Platform {
    platform(PlatformVariant::IOsSimulator, arch, "15.0")
}

pub fn ios_device() -> Platform {
    platform(PlatformVariant::IOsDevice, "arm64", "15.0")
}

pub fn macos(arch: &str) -> Platform {
    platform(PlatformVariant::MacOs, arch, "12.0")
}

pub fn tvos_device() -> Platform {
    platform(PlatformVariant::TvOsDevice, "arm64", "15.0")
}

pub fn watchos_simulator() -> Platform {
    platform(PlatformVariant::WatchOsSimulator, "arm64", "8.0")
}

pub fn watchos_device() -> Platform {
    platform(PlatformVariant::WatchOsDevice, "arm64_32", "8.0")
}

/// Builder for a single configured [`Target`].
///
/// Defaults to a static library for the arm64 iOS simulator, built in the
/// `Debug` Xcode configuration. Unless set explicitly, the Bazel
/// configuration string is derived from the platform.
#[derive(Debug, Clone)]
pub struct TargetBuilder {
    target: Target,
    configuration: Option<String>,
}

fn paths<'a>(items: &'a [&'a str]) -> impl Iterator<Item = PathBuf> + 'a {
    items.iter().map(PathBuf::from)
}

fn ids<'a>(items: &'a [&'a str]) -> impl Iterator<Item = TargetId> + 'a {
    items.iter().map(|id| TargetId::from(*id))
}

impl TargetBuilder {
    pub fn new(label: &str) -> Self {
        let label: BazelLabel = label
            .parse()
            .unwrap_or_else(|e| panic!("bad fixture label: {e}"));
        let name = label.name().to_string();

        TargetBuilder {
            target: Target {
                product: Product {
                    name: name.clone(),
                    product_type: ProductType::StaticLibrary,
                    path: PathBuf::from(format!("bazel-out/lib{name}.a")),
                    additional_paths: Vec::new(),
                },
                name,
                label,
                configuration: String::new(),
                xcode_configurations: vec!["Debug".to_string()],
                platform: ios_simulator("arm64"),
                is_swift: true,
                test_host: None,
                dependencies: Default::default(),
                resource_bundle_dependencies: Default::default(),
                watch_application: None,
                extensions: Default::default(),
                app_clips: Default::default(),
                inputs: Inputs::default(),
                linker_inputs: LinkerInputs::default(),
                resource_bundles: Default::default(),
                outputs: Outputs::default(),
            },
            configuration: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.target.name = name.to_string();
        self.target.product.name = name.to_string();
        self
    }

    pub fn configuration(mut self, configuration: &str) -> Self {
        self.configuration = Some(configuration.to_string());
        self
    }

    pub fn xcode_configurations(mut self, names: &[&str]) -> Self {
        self.target.xcode_configurations = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.target.platform = platform;
        self
    }

    pub fn product_type(mut self, product_type: ProductType) -> Self {
        self.target.product.product_type = product_type;
        self
    }

    pub fn product_path(mut self, path: &str) -> Self {
        self.target.product.path = PathBuf::from(path);
        self
    }

    pub fn test_host(mut self, id: &str) -> Self {
        self.target.test_host = Some(TargetId::from(id));
        self
    }

    pub fn dependencies(mut self, deps: &[&str]) -> Self {
        self.target.dependencies.extend(ids(deps));
        self
    }

    pub fn watch_application(mut self, id: &str) -> Self {
        self.target.watch_application = Some(TargetId::from(id));
        self
    }

    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.target.extensions.extend(ids(extensions));
        self
    }

    pub fn app_clips(mut self, app_clips: &[&str]) -> Self {
        self.target.app_clips.extend(ids(app_clips));
        self
    }

    pub fn resource_bundle_dependencies(mut self, deps: &[&str]) -> Self {
        self.target.resource_bundle_dependencies.extend(ids(deps));
        self
    }

    pub fn srcs(mut self, srcs: &[&str]) -> Self {
        self.target.inputs.srcs.extend(paths(srcs));
        self
    }

    pub fn non_arc_srcs(mut self, srcs: &[&str]) -> Self {
        self.target.inputs.non_arc_srcs.extend(paths(srcs));
        self
    }

    pub fn hdrs(mut self, hdrs: &[&str]) -> Self {
        self.target.inputs.hdrs.extend(paths(hdrs));
        self
    }

    pub fn resources(mut self, resources: &[&str]) -> Self {
        self.target.inputs.resources.extend(paths(resources));
        self
    }

    pub fn dynamic_frameworks(mut self, frameworks: &[&str]) -> Self {
        self.target
            .linker_inputs
            .dynamic_frameworks
            .extend(paths(frameworks));
        self
    }

    pub fn resource_bundles(mut self, bundles: &[&str]) -> Self {
        self.target.resource_bundles.extend(paths(bundles));
        self
    }

    pub fn swift_module(mut self, path: &str) -> Self {
        self.target.outputs.swift_module = Some(PathBuf::from(path));
        self
    }

    pub fn build(self) -> Target {
        let mut target = self.target;
        target.configuration = match self.configuration {
            Some(configuration) => configuration,
            None => format!(
                "{}-{}-min{}",
                target.platform.variant.name(),
                target.platform.arch,
                target.platform.minimum_os_version.full()
            ),
        };
        target.normalize();
        target
    }
}

/// Collect `(id, target)` pairs into a universe.
pub fn universe(targets: impl IntoIterator<Item = (&'static str, Target)>) -> TargetUniverse {
    targets
        .into_iter()
        .map(|(id, target)| (TargetId::from(id), target))
        .collect()
}

/// Consolidated targets where each inner list becomes one key, skipping the
/// grouping and deconsolidation stages.
pub fn consolidated(
    groups: impl IntoIterator<Item = Vec<(&'static str, Target)>>,
) -> ConsolidatedTargets {
    let mut result = ConsolidatedTargets::default();
    for group in groups {
        let members: BTreeMap<TargetId, Target> = group
            .into_iter()
            .map(|(id, target)| (TargetId::from(id), target))
            .collect();
        let key = Key::new(members.keys().cloned().collect());
        for id in members.keys() {
            result.keys.insert(id.clone(), key.clone());
        }
        let target = ConsolidatedTarget::new(members)
            .unwrap_or_else(|e| panic!("bad fixture group: {e}"));
        result.targets.insert(key, target);
    }
    result
}
