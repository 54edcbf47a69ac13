//! Consolidation error types and diagnostics.

use thiserror::Error;

use crate::core::TargetId;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// A required mapping was missing while consolidating.
///
/// These are precondition failures: the target universe references a target
/// it does not contain, or the engine's own bookkeeping lost a target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsolidationError {
    #[error("target `{target}` depends on `{dependency}`, which is not in the target universe")]
    MissingDependency {
        target: TargetId,
        dependency: TargetId,
    },

    #[error("target `{target}` has test host `{test_host}`, which is not in the target universe")]
    MissingTestHost {
        target: TargetId,
        test_host: TargetId,
    },

    #[error("target `{target}` was not found in the target universe")]
    MissingTarget { target: TargetId },

    #[error("cannot consolidate an empty group of targets")]
    EmptyGroup,

    #[error("dependency cycle through consolidated target {key}")]
    DependencyCycle { key: String },
}

impl ConsolidationError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConsolidationError::MissingDependency { target, dependency } => {
                Diagnostic::error(format!(
                    "dependency `{}` of `{}` was not loaded",
                    dependency, target
                ))
                .with_target(target)
                .with_context("every dependency must be present in the target specs")
                .with_suggestion(suggestions::MISSING_DEPENDENCY)
            }

            ConsolidationError::MissingTestHost { target, test_host } => {
                Diagnostic::error(format!(
                    "test host `{}` of `{}` was not loaded",
                    test_host, target
                ))
                .with_target(target)
                .with_context("test hosts are resolved like dependencies")
                .with_suggestion(suggestions::MISSING_DEPENDENCY)
            }

            ConsolidationError::MissingTarget { target } => {
                Diagnostic::error(format!("target `{}` is missing", target))
                    .with_target(target)
                    .with_context("this is an internal error in xcgen")
            }

            ConsolidationError::EmptyGroup => Diagnostic::error(self.to_string())
                .with_context("this is an internal error in xcgen"),

            ConsolidationError::DependencyCycle { key } => {
                Diagnostic::error(format!("dependency cycle through {}", key))
                    .with_context("consolidated targets must form a DAG to be emitted in order")
            }
        }
    }
}
