//! Identity of a consolidated target.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::TargetId;

/// The set of configured targets that make up one Xcode target.
///
/// Across one run the keys partition the target universe: every [`TargetId`]
/// belongs to exactly one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(BTreeSet<TargetId>);

impl Key {
    pub fn new(target_ids: BTreeSet<TargetId>) -> Self {
        Key(target_ids)
    }

    pub fn single(target_id: TargetId) -> Self {
        Key(BTreeSet::from([target_id]))
    }

    pub fn target_ids(&self) -> &BTreeSet<TargetId> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id)?;
        }
        write!(f, "]")
    }
}

impl<'a> FromIterator<&'a str> for Key {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Key(iter.into_iter().map(TargetId::from).collect())
    }
}

impl FromIterator<TargetId> for Key {
    fn from_iter<I: IntoIterator<Item = TargetId>>(iter: I) -> Self {
        Key(iter.into_iter().collect())
    }
}
