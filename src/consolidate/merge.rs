//! Ordered merge of per-configuration file lists.
//!
//! Configurations of one target usually list the same files in the same
//! order, with a few extras at the edges. The merge keeps the files common to
//! every list as fixed anchors and threads each list's extras in between
//! them, so each input list survives as a subsequence of the output
//! whenever the lists agree on the order of their shared items.

use std::collections::HashSet;
use std::hash::Hash;

/// Merge `lists` into one list containing every item exactly once.
///
/// Lists are processed in the given order, which makes the result
/// deterministic.
pub fn merge_ordered<T>(lists: &[&[T]]) -> Vec<T>
where
    T: Clone + Eq + Hash,
{
    let Some((first, rest)) = lists.split_first() else {
        return Vec::new();
    };

    let mut common: HashSet<&T> = first.iter().collect();
    for list in rest {
        let present: HashSet<&T> = list.iter().collect();
        common.retain(|item| present.contains(item));
    }

    // Baseline in the first list's order
    let mut merged: Vec<T> = Vec::new();
    let mut seen: HashSet<T> = HashSet::new();
    for item in first.iter() {
        if common.contains(item) && seen.insert(item.clone()) {
            merged.push(item.clone());
        }
    }

    for list in lists {
        let mut cursor = 0;
        let mut remaining = list.iter();

        while cursor < merged.len() {
            let Some(item) = remaining.next() else {
                break;
            };

            if merged[cursor] == *item {
                cursor += 1;
                continue;
            }

            if seen.contains(item) {
                // Already placed; only ever move the cursor forward
                if let Some(found) = merged.iter().position(|placed| placed == item) {
                    if found > cursor {
                        cursor = found + 1;
                    }
                }
                continue;
            }

            seen.insert(item.clone());
            merged.insert(cursor, item.clone());
            cursor += 1;
        }

        for item in remaining {
            if seen.insert(item.clone()) {
                merged.push(item.clone());
            }
        }
    }

    merged
}
