//! `xcgen explain` command

use anyhow::Result;

use crate::cli::ExplainArgs;
use xcgen::core::BazelLabel;
use xcgen::ops::{load_targets, plan_with_logger, FocusError, GenerateOptions};
use xcgen::util::TracingLogger;

pub fn execute(args: ExplainArgs) -> Result<()> {
    let label: BazelLabel = args.label.parse().map_err(FocusError::from)?;

    let universe = load_targets(&GenerateOptions {
        files: args.files,
        dir: args.dir,
        focus: Vec::new(),
    })?;

    let configurations = universe
        .values()
        .filter(|target| target.label == label)
        .count();
    if configurations == 0 {
        return Err(FocusError::UnknownLabel { label }.into());
    }

    let plan = plan_with_logger(&universe, &TracingLogger)?;
    let label_str = label.to_string();
    let targets: Vec<_> = plan
        .targets
        .iter()
        .filter(|target| target.label == label_str)
        .collect();

    println!(
        "{}: {} configuration(s) in {} Xcode target(s)",
        label,
        configurations,
        targets.len()
    );

    for target in targets {
        println!();
        println!("{} ({})", target.name, target.product_type.pretty_name());
        for id in &target.members {
            let Some(member) = universe.get(id) else {
                continue;
            };
            let platform = &member.platform;
            println!(
                "  {}: {} {} {} [{}]",
                id,
                platform.name(),
                platform.arch,
                platform.minimum_os_version.pretty(),
                member.xcode_configurations.join(", ")
            );
        }
        let actions: Vec<String> = target
            .build_for
            .enabled_actions()
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("  build for: {}", actions.join(", "));
        if !target.dependencies.is_empty() {
            println!("  depends on: {}", target.dependencies.join(", "));
        }
        if !target.dependents.is_empty() {
            println!("  used by: {}", target.dependents.join(", "));
        }
    }

    Ok(())
}
