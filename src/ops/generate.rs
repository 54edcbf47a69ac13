//! The full pipeline: load, focus, consolidate, disambiguate.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::consolidate::{consolidate_targets, Key};
use crate::core::{BuildFor, ProductType, TargetId, TargetUniverse};
use crate::disambiguate::Disambiguator;
use crate::ops::focus::focus;
use crate::ops::load::{discover, load_universe};
use crate::util::{CollectingLogger, Logger};

/// Where to find target specs and what to keep of them.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Target spec shards.
    pub files: Vec<PathBuf>,
    /// Directory searched for additional `*.json` shards.
    pub dir: Option<PathBuf>,
    /// Labels to focus on; empty keeps every target.
    pub focus: Vec<String>,
}

/// One Xcode target to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedTarget {
    pub name: String,
    pub label: String,
    pub product_type: ProductType,
    /// Member target ids in sorted member order.
    pub members: Vec<TargetId>,
    /// Names of the Xcode targets this one depends on.
    pub dependencies: Vec<String>,
    /// Names of the Xcode targets that depend on this one.
    pub dependents: Vec<String>,
    pub build_for: BuildFor,
}

/// Xcode targets in emission order, plus the conflicts that kept targets
/// apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectPlan {
    pub targets: Vec<PlannedTarget>,
    pub warnings: Vec<String>,
}

/// Load every shard named by `opts` and apply its focus.
pub fn load_targets(opts: &GenerateOptions) -> Result<TargetUniverse> {
    let mut paths = opts.files.clone();
    if let Some(dir) = &opts.dir {
        paths.extend(discover(dir)?);
    }

    let universe = load_universe(&paths)?;
    info!("loaded {} targets from {} files", universe.len(), paths.len());

    Ok(focus(&universe, &opts.focus)?)
}

/// Consolidate and name every target of `universe`.
pub fn plan_universe(universe: &TargetUniverse) -> Result<ProjectPlan> {
    let logger = CollectingLogger::new();
    let plan = plan_with_logger(universe, &logger)?;
    Ok(ProjectPlan {
        warnings: logger.take_warnings(),
        ..plan
    })
}

/// Consolidate and name every target, reporting conflicts to `logger`.
///
/// The returned plan carries no warnings; they went to `logger`.
pub fn plan_with_logger(universe: &TargetUniverse, logger: &dyn Logger) -> Result<ProjectPlan> {
    let consolidated = consolidate_targets(universe, logger)?;
    let order = consolidated
        .emission_order()
        .context("failed to order Xcode targets")?;
    let graph = consolidated.dependency_graph()?;

    let disambiguated = Disambiguator::new().disambiguate(consolidated);
    let names = |keys: Vec<&Key>| -> Vec<String> {
        let mut names: Vec<String> = keys
            .into_iter()
            .filter_map(|key| disambiguated.name_of_key(key))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    };

    let mut targets = Vec::with_capacity(order.len());
    for key in &order {
        let entry = disambiguated
            .targets
            .get(key)
            .with_context(|| format!("no named target for {}", key))?;
        let target = &entry.target;

        let defaults: Vec<BuildFor> = target
            .targets
            .values()
            .map(|member| BuildFor::default_for(member.product.product_type))
            .collect();
        let build_for = BuildFor::merge_all(&defaults)
            .with_context(|| format!("conflicting build_for values in {}", entry.name))?;

        targets.push(PlannedTarget {
            name: entry.name.clone(),
            label: target.label.to_string(),
            product_type: target.product.product_type,
            members: target.sorted_target_ids.clone(),
            dependencies: names(graph.dependencies(key)),
            dependents: names(graph.dependents(key)),
            build_for,
        });
    }

    Ok(ProjectPlan {
        targets,
        warnings: Vec::new(),
    })
}

/// Run the whole pipeline.
pub fn generate(opts: &GenerateOptions) -> Result<ProjectPlan> {
    let universe = load_targets(opts)?;
    plan_universe(&universe)
}
