//! Scheme `build_for` values.
//!
//! Each scheme action (run, test, profile, archive, analyze) can explicitly
//! enable or disable building a target, or leave it unspecified. Values from
//! different sources are merged; an explicit enable never silently overrides
//! an explicit disable.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::product::ProductType;

/// Tri-state build-for value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildForValue {
    #[default]
    Unspecified,
    Enabled,
    Disabled,
}

impl BuildForValue {
    /// Merge two values. `Unspecified` is the identity.
    pub fn merged(self, other: BuildForValue) -> Result<BuildForValue, IncompatibleMerge> {
        use BuildForValue::*;

        match (self, other) {
            (Enabled, Disabled) | (Disabled, Enabled) => Err(IncompatibleMerge),
            (Enabled, _) | (_, Enabled) => Ok(Enabled),
            (Disabled, _) | (_, Disabled) => Ok(Disabled),
            (Unspecified, Unspecified) => Ok(Unspecified),
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self == BuildForValue::Enabled
    }
}

/// Enabled and Disabled were both requested for the same action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot merge an enabled build_for value with a disabled one")]
pub struct IncompatibleMerge;

/// Scheme action a build-for value applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeAction {
    Running,
    Testing,
    Profiling,
    Archiving,
    Analyzing,
}

impl fmt::Display for SchemeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemeAction::Running => "running",
            SchemeAction::Testing => "testing",
            SchemeAction::Profiling => "profiling",
            SchemeAction::Archiving => "archiving",
            SchemeAction::Analyzing => "analyzing",
        };
        f.write_str(name)
    }
}

/// Error merging two [`BuildFor`] sets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to merge `build_for` values for {action}: current {current:?}, other {other:?}")]
pub struct BuildForError {
    pub action: SchemeAction,
    pub current: BuildForValue,
    pub other: BuildForValue,
}

/// Per-action build-for values for one scheme build target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildFor {
    pub running: BuildForValue,
    pub testing: BuildForValue,
    pub profiling: BuildForValue,
    pub archiving: BuildForValue,
    pub analyzing: BuildForValue,
}

impl BuildFor {
    /// The build-for a product gets when a scheme only references it
    /// implicitly.
    pub fn default_for(product_type: ProductType) -> BuildFor {
        let mut build_for = BuildFor {
            running: BuildForValue::Enabled,
            ..BuildFor::default()
        };
        if product_type.is_test_bundle() {
            build_for.running = BuildForValue::Unspecified;
            build_for.testing = BuildForValue::Enabled;
        }
        if product_type.is_launchable() {
            build_for.profiling = BuildForValue::Enabled;
        }
        build_for
    }

    pub fn get(&self, action: SchemeAction) -> BuildForValue {
        match action {
            SchemeAction::Running => self.running,
            SchemeAction::Testing => self.testing,
            SchemeAction::Profiling => self.profiling,
            SchemeAction::Archiving => self.archiving,
            SchemeAction::Analyzing => self.analyzing,
        }
    }

    fn slot(&mut self, action: SchemeAction) -> &mut BuildForValue {
        match action {
            SchemeAction::Running => &mut self.running,
            SchemeAction::Testing => &mut self.testing,
            SchemeAction::Profiling => &mut self.profiling,
            SchemeAction::Archiving => &mut self.archiving,
            SchemeAction::Analyzing => &mut self.analyzing,
        }
    }

    /// Merge `other` into `self`, action by action.
    ///
    /// On failure `self` is left with the actions merged before the
    /// conflicting one.
    pub fn merge(&mut self, other: &BuildFor) -> Result<(), BuildForError> {
        const ACTIONS: [SchemeAction; 5] = [
            SchemeAction::Running,
            SchemeAction::Testing,
            SchemeAction::Profiling,
            SchemeAction::Archiving,
            SchemeAction::Analyzing,
        ];

        for action in ACTIONS {
            let current = self.get(action);
            let incoming = other.get(action);
            *self.slot(action) = current.merged(incoming).map_err(|_| BuildForError {
                action,
                current,
                other: incoming,
            })?;
        }
        Ok(())
    }

    /// Fold a sequence of values starting from all-unspecified.
    pub fn merge_all<'a>(values: impl IntoIterator<Item = &'a BuildFor>) -> Result<BuildFor, BuildForError> {
        let mut result = BuildFor::default();
        for value in values {
            result.merge(value)?;
        }
        Ok(result)
    }

    /// Actions this value builds for.
    pub fn enabled_actions(&self) -> Vec<SchemeAction> {
        [
            SchemeAction::Running,
            SchemeAction::Testing,
            SchemeAction::Profiling,
            SchemeAction::Archiving,
            SchemeAction::Analyzing,
        ]
        .into_iter()
        .filter(|action| self.get(*action).is_enabled())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BuildForValue::*;

    #[test]
    fn test_value_merge_table() {
        assert_eq!(Unspecified.merged(Unspecified), Ok(Unspecified));
        assert_eq!(Unspecified.merged(Enabled), Ok(Enabled));
        assert_eq!(Disabled.merged(Unspecified), Ok(Disabled));
        assert_eq!(Enabled.merged(Enabled), Ok(Enabled));
        assert_eq!(Disabled.merged(Disabled), Ok(Disabled));
        assert_eq!(Enabled.merged(Disabled), Err(IncompatibleMerge));
        assert_eq!(Disabled.merged(Enabled), Err(IncompatibleMerge));
    }

    #[test]
    fn test_merge_reports_conflicting_action() {
        let mut current = BuildFor {
            testing: Disabled,
            ..BuildFor::default()
        };
        let other = BuildFor {
            running: Enabled,
            testing: Enabled,
            ..BuildFor::default()
        };

        let err = current.merge(&other).unwrap_err();
        assert_eq!(err.action, SchemeAction::Testing);
        assert_eq!(err.current, Disabled);
        assert_eq!(err.other, Enabled);
        // Running was merged before the conflict was hit
        assert_eq!(current.running, Enabled);
        assert!(err.to_string().contains("testing"));
    }

    #[test]
    fn test_merge_all() {
        let a = BuildFor {
            running: Enabled,
            ..BuildFor::default()
        };
        let b = BuildFor {
            archiving: Disabled,
            ..BuildFor::default()
        };

        let merged = BuildFor::merge_all([&a, &b]).unwrap();
        assert_eq!(merged.running, Enabled);
        assert_eq!(merged.archiving, Disabled);
        assert_eq!(merged.testing, Unspecified);
    }

    #[test]
    fn test_default_for_product_types() {
        let tests = BuildFor::default_for(ProductType::UnitTestBundle);
        assert_eq!(tests.enabled_actions(), vec![SchemeAction::Testing]);

        let app = BuildFor::default_for(ProductType::Application);
        assert_eq!(
            app.enabled_actions(),
            vec![SchemeAction::Running, SchemeAction::Profiling]
        );

        let lib = BuildFor::default_for(ProductType::StaticLibrary);
        assert_eq!(lib.enabled_actions(), vec![SchemeAction::Running]);
    }

    #[test]
    fn test_all_enabled_absorbs_unspecified() {
        let all = BuildFor {
            running: BuildForValue::Enabled,
            testing: BuildForValue::Enabled,
            profiling: BuildForValue::Enabled,
            archiving: BuildForValue::Enabled,
            analyzing: BuildForValue::Enabled,
        };
        let merged = BuildFor::merge_all([&all, &BuildFor::default()]).unwrap();
        assert_eq!(merged, all);
    }
}
