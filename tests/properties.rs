//! Property tests for consolidation, naming and the ordered merge.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use xcgen::consolidate::merge::merge_ordered;
use xcgen::ops::parse_shard;
use xcgen::util::CollectingLogger;
use xcgen::{consolidate_targets, disambiguate_targets, Key, TargetId, TargetUniverse};

const LABELS: [&str; 4] = ["//p:A", "//p:a", "//q:A", "//r:B"];
const PLATFORMS: [(&str, &str); 4] = [
    ("iphonesimulator", "ios"),
    ("iphoneos", "ios"),
    ("macosx", "macos"),
    ("appletvos", "tvos"),
];
const ARCHS: [&str; 2] = ["arm64", "x86_64"];
const VERSIONS: [&str; 2] = ["13.0", "15.0"];
const PRODUCT_TYPES: [&str; 2] = [
    "com.apple.product-type.library.static",
    "com.apple.product-type.application",
];

/// label, platform, arch, version, xcode configuration mask, product type,
/// dependency mask, test host, watch application
type TargetSeed = (usize, usize, usize, usize, u8, usize, u16, usize, usize);

fn target_seed() -> impl Strategy<Value = TargetSeed> {
    (
        0..4usize,
        0..4usize,
        0..2usize,
        0..2usize,
        1..4u8,
        0..2usize,
        any::<u16>(),
        0..16usize,
        0..16usize,
    )
}

/// `t{index}` if it names an earlier target.
fn earlier(index: usize, i: usize) -> Option<String> {
    (index < i).then(|| format!("t{index}"))
}

/// Builds a universe where target `i` may only depend on targets before it.
fn build_universe(seeds: &[TargetSeed]) -> TargetUniverse {
    let mut targets = Map::new();
    for (i, seed) in seeds.iter().enumerate() {
        let (label, platform, arch, version, xcode, product, deps, host, watch) = seed;
        let label = LABELS[*label];
        let name = label.rsplit(':').next().unwrap_or(label);
        let (variant, os) = PLATFORMS[*platform];
        let arch = ARCHS[*arch];
        let version = VERSIONS[*version];

        let mut xcode_configurations = Vec::new();
        if xcode & 1 != 0 {
            xcode_configurations.push("Debug");
        }
        if xcode & 2 != 0 {
            xcode_configurations.push("Release");
        }

        let dependencies: Vec<String> = (0..i)
            .filter(|j| deps & (1 << j) != 0)
            .map(|j| format!("t{j}"))
            .collect();

        targets.insert(
            format!("t{i}"),
            json!({
                "name": name,
                "label": label,
                "configuration": format!("{variant}-{arch}-{version}"),
                "xcode_configurations": xcode_configurations,
                "platform": {
                    "os": os,
                    "variant": variant,
                    "arch": arch,
                    "minimum_os_version": version
                },
                "product": {
                    "name": name,
                    "type": PRODUCT_TYPES[*product],
                    "path": format!("bazel-out/{variant}/{name}")
                },
                "dependencies": dependencies,
                "test_host": earlier(*host, i),
                "watch_application": earlier(*watch, i)
            }),
        );
    }

    parse_shard(&Value::Object(targets).to_string()).unwrap()
}

/// The keys a member's dependencies, test host and watch application
/// resolve to.
fn dependency_keys(
    universe: &TargetUniverse,
    keys: &BTreeMap<TargetId, Key>,
    id: &TargetId,
) -> (BTreeSet<Key>, Option<Key>, Option<Key>) {
    let target = &universe[id];
    let dependencies = target
        .all_dependencies()
        .iter()
        .map(|dependency| keys[dependency].clone())
        .collect();
    let test_host = target.test_host.as_ref().map(|host| keys[host].clone());
    let watch_application = target
        .watch_application
        .as_ref()
        .map(|watch| keys[watch].clone());
    (dependencies, test_host, watch_application)
}

fn is_subsequence(needle: &[u32], haystack: &[u32]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|item| rest.any(|candidate| candidate == item))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn every_target_lands_in_exactly_one_key(seeds in prop::collection::vec(target_seed(), 1..12)) {
        let universe = build_universe(&seeds);
        let result = consolidate_targets(&universe, &CollectingLogger::new()).unwrap();

        let mut seen = HashSet::new();
        for (key, target) in &result.targets {
            prop_assert!(!key.is_empty());
            for id in key.target_ids() {
                prop_assert!(seen.insert(id.clone()), "{} is in two keys", id);
                prop_assert_eq!(&result.keys[id], key);
                prop_assert!(target.targets.contains_key(id));
            }
        }
        prop_assert_eq!(seen.len(), universe.len());
        prop_assert_eq!(result.keys.len(), universe.len());
    }

    #[test]
    fn members_agree_on_dependencies(seeds in prop::collection::vec(target_seed(), 1..12)) {
        let universe = build_universe(&seeds);
        let result = consolidate_targets(&universe, &CollectingLogger::new()).unwrap();

        for key in result.targets.keys() {
            let resolved: BTreeSet<_> = key
                .target_ids()
                .iter()
                .map(|id| dependency_keys(&universe, &result.keys, id))
                .collect();
            prop_assert_eq!(resolved.len(), 1, "{} has conditional dependencies or hosts", key);
        }
    }

    #[test]
    fn names_are_unique(seeds in prop::collection::vec(target_seed(), 1..12)) {
        let universe = build_universe(&seeds);
        let consolidated = consolidate_targets(&universe, &CollectingLogger::new()).unwrap();
        let count = consolidated.targets.len();

        let result = disambiguate_targets(consolidated);

        let names: HashSet<String> = result
            .targets
            .values()
            .map(|target| target.name.to_lowercase())
            .collect();
        prop_assert_eq!(names.len(), count);
    }

    #[test]
    fn merge_keeps_each_list_in_order(
        first in prop::sample::subsequence((0..16u32).collect::<Vec<_>>(), 0..16),
        second in prop::sample::subsequence((0..16u32).collect::<Vec<_>>(), 0..16),
    ) {
        let merged = merge_ordered(&[&first[..], &second[..]]);

        prop_assert!(is_subsequence(&first, &merged), "{:?} not in {:?}", first, merged);
        prop_assert!(is_subsequence(&second, &merged), "{:?} not in {:?}", second, merged);
    }

    #[test]
    fn merge_contains_the_union_once(
        lists in prop::collection::vec(
            prop::collection::vec(0..10u32, 0..8).prop_map(|mut list| {
                let mut seen = HashSet::new();
                list.retain(|item| seen.insert(*item));
                list
            }),
            1..5,
        ),
    ) {
        let slices: Vec<&[u32]> = lists.iter().map(Vec::as_slice).collect();
        let merged = merge_ordered(&slices);

        let union: BTreeSet<u32> = lists.iter().flatten().copied().collect();
        let unique: BTreeSet<u32> = merged.iter().copied().collect();
        prop_assert_eq!(merged.len(), unique.len());
        prop_assert_eq!(unique, union);
    }
}
