//! Restricting a universe to a set of focused labels.
//!
//! Focusing keeps every configuration of the focused labels plus everything
//! they reach through dependencies, resource bundle dependencies, test hosts
//! and embedded targets (watch applications, extensions, app clips).

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use thiserror::Error;
use tracing::debug;

use crate::core::label::LabelParseError;
use crate::core::{BazelLabel, TargetId, TargetUniverse};
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error focusing a universe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FocusError {
    #[error(transparent)]
    InvalidLabel(#[from] LabelParseError),

    #[error("no target has label `{label}`")]
    UnknownLabel { label: BazelLabel },
}

impl FocusError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            FocusError::InvalidLabel(_) => Diagnostic::error(self.to_string())
                .with_context("labels look like `//package:name` or `@repo//package:name`"),
            FocusError::UnknownLabel { .. } => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::UNKNOWN_LABEL)
            }
        }
    }
}

/// Targets reachable from any configuration of `labels`.
///
/// An empty `labels` keeps the whole universe.
pub fn focus(universe: &TargetUniverse, labels: &[String]) -> Result<TargetUniverse, FocusError> {
    if labels.is_empty() {
        return Ok(universe.clone());
    }

    let mut graph: DiGraph<&TargetId, ()> = DiGraph::new();
    let mut nodes: HashMap<&TargetId, NodeIndex> = HashMap::new();
    for id in universe.keys() {
        nodes.insert(id, graph.add_node(id));
    }
    for (id, target) in universe {
        let Some(&from) = nodes.get(id) else {
            continue;
        };
        let dependencies = target.all_dependencies();
        // Dangling edges are left for consolidation to report
        let edges = dependencies
            .iter()
            .chain(target.test_host.iter())
            .chain(target.embedded_targets());
        for dependency in edges {
            if let Some(&to) = nodes.get(dependency) {
                graph.update_edge(from, to, ());
            }
        }
    }

    let mut dfs = Dfs::empty(&graph);
    let mut focused = TargetUniverse::new();
    for label in labels {
        let label: BazelLabel = label.parse()?;
        let roots: Vec<NodeIndex> = universe
            .iter()
            .filter(|(_, target)| target.label == label)
            .filter_map(|(id, _)| nodes.get(id).copied())
            .collect();
        if roots.is_empty() {
            return Err(FocusError::UnknownLabel { label });
        }

        for root in roots {
            dfs.move_to(root);
            while let Some(node) = dfs.next(&graph) {
                let id = graph[node];
                if let Some(target) = universe.get(id) {
                    focused.insert(id.clone(), target.clone());
                }
            }
        }
    }

    debug!("focused {} of {} targets", focused.len(), universe.len());
    Ok(focused)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ios_device, universe, watchos_device, TargetBuilder};

    fn sample() -> TargetUniverse {
        universe([
            (
                "App-sim",
                TargetBuilder::new("//app:App").dependencies(&["Lib-sim"]).build(),
            ),
            (
                "App-device",
                TargetBuilder::new("//app:App")
                    .platform(ios_device())
                    .dependencies(&["Lib-device"])
                    .build(),
            ),
            (
                "Tests",
                TargetBuilder::new("//app:AppTests").test_host("App-sim").build(),
            ),
            (
                "Lib-sim",
                TargetBuilder::new("//lib:Lib").resource_bundle_dependencies(&["Res"]).build(),
            ),
            ("Lib-device", TargetBuilder::new("//lib:Lib").platform(ios_device()).build()),
            ("Res", TargetBuilder::new("//lib:Res").build()),
            ("Other", TargetBuilder::new("//other:Other").build()),
            (
                "Host",
                TargetBuilder::new("//host:Host")
                    .platform(ios_device())
                    .watch_application("Watch")
                    .extensions(&["Widget"])
                    .build(),
            ),
            ("Watch", TargetBuilder::new("//host:Watch").platform(watchos_device()).build()),
            ("Widget", TargetBuilder::new("//host:Widget").platform(ios_device()).build()),
        ])
    }

    #[test]
    fn test_empty_focus_keeps_everything() {
        let targets = sample();
        assert_eq!(focus(&targets, &[]).unwrap(), targets);
    }

    #[test]
    fn test_focus_follows_dependencies() {
        let focused = focus(&sample(), &["//app:App".to_string()]).unwrap();

        let ids: Vec<&str> = focused.keys().map(TargetId::as_str).collect();
        assert_eq!(ids, ["App-device", "App-sim", "Lib-device", "Lib-sim", "Res"]);
    }

    #[test]
    fn test_focus_follows_test_host() {
        let focused = focus(&sample(), &["//app:AppTests".to_string()]).unwrap();

        assert!(focused.contains_key("App-sim"));
        assert!(!focused.contains_key("App-device"));
        assert!(!focused.contains_key("Other"));
    }

    #[test]
    fn test_focus_follows_embedded_targets() {
        let focused = focus(&sample(), &["//host:Host".to_string()]).unwrap();

        let ids: Vec<&str> = focused.keys().map(TargetId::as_str).collect();
        assert_eq!(ids, ["Host", "Watch", "Widget"]);
    }

    #[test]
    fn test_unknown_label() {
        let err = focus(&sample(), &["//missing:Missing".to_string()]).unwrap_err();

        assert!(matches!(err, FocusError::UnknownLabel { .. }));
        assert!(err.to_diagnostic().format(false).contains("--focus"));
    }

    #[test]
    fn test_invalid_label() {
        let err = focus(&sample(), &["not a label".to_string()]).unwrap_err();
        assert!(matches!(err, FocusError::InvalidLabel(_)));
    }
}
