//! Candidate consolidation groups.
//!
//! Targets that share a label and product type (and are either all watchOS
//! or all not) may become one Xcode target. Within such a group only one
//! target per (Xcode configuration, platform name) pair can join a bucket:
//! each pair's targets are ranked and rank `i` goes to bucket `i`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::core::{BazelLabel, Os, Platform, PlatformVariant, ProductType, Target, TargetId};

/// Targets with the same key can potentially be consolidated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct ConsolidatableKey<'a> {
    label: &'a BazelLabel,
    product_type: ProductType,
    /// Xcode mishandles watchOS apps depending on a target consolidated
    /// with another OS, so watchOS never joins other platforms.
    is_watch_os: bool,
}

impl<'a> ConsolidatableKey<'a> {
    fn new(target: &'a Target) -> Self {
        ConsolidatableKey {
            label: &target.label,
            product_type: target.product.product_type,
            is_watch_os: target.platform.os == Os::WatchOs,
        }
    }
}

/// Rank order inside one (Xcode configuration, platform name) partition.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct PlatformAndConfiguration<'a> {
    pub platform: &'a Platform,
    pub configuration: &'a str,
}

impl Ord for PlatformAndConfiguration<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.platform
            .cmp(other.platform)
            .then_with(|| self.configuration.cmp(other.configuration))
    }
}

impl PartialOrd for PlatformAndConfiguration<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Buckets the universe into candidate groups.
///
/// Every target lands in exactly one group. A target listed under several
/// Xcode configurations is ranked in each of those partitions and joins the
/// bucket of its lowest rank.
pub(crate) fn candidate_groups<'a>(
    targets: impl IntoIterator<Item = (&'a TargetId, &'a Target)>,
) -> Vec<BTreeSet<TargetId>> {
    let mut consolidatable: BTreeMap<ConsolidatableKey<'a>, Vec<(&'a TargetId, &'a Target)>> =
        BTreeMap::new();
    for (id, target) in targets {
        consolidatable
            .entry(ConsolidatableKey::new(target))
            .or_default()
            .push((id, target));
    }

    let mut groups = Vec::new();
    for members in consolidatable.values() {
        let mut partitions: BTreeMap<(&str, PlatformVariant), Vec<(&TargetId, &Target)>> =
            BTreeMap::new();
        for &(id, target) in members {
            for xcode_configuration in &target.xcode_configurations {
                partitions
                    .entry((xcode_configuration.as_str(), target.platform.variant))
                    .or_default()
                    .push((id, target));
            }
        }

        let mut rank_of: BTreeMap<&TargetId, usize> = BTreeMap::new();
        for partition in partitions.values_mut() {
            partition.sort_by(|(lhs_id, lhs), (rhs_id, rhs)| {
                platform_and_configuration(lhs)
                    .cmp(&platform_and_configuration(rhs))
                    .then_with(|| lhs_id.cmp(rhs_id))
            });
            for (rank, (id, _)) in partition.iter().enumerate() {
                rank_of
                    .entry(*id)
                    .and_modify(|current| *current = (*current).min(rank))
                    .or_insert(rank);
            }
        }

        // Targets without any Xcode configuration still need a home
        for &(id, _) in members {
            rank_of.entry(id).or_insert(0);
        }

        let mut buckets: BTreeMap<usize, BTreeSet<TargetId>> = BTreeMap::new();
        for (id, rank) in rank_of {
            buckets.entry(rank).or_default().insert(id.clone());
        }
        groups.extend(buckets.into_values());
    }

    groups
}

fn platform_and_configuration(target: &Target) -> PlatformAndConfiguration<'_> {
    PlatformAndConfiguration {
        platform: &target.platform,
        configuration: &target.configuration,
    }
}
