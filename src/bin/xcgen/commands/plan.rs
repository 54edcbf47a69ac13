//! `xcgen plan` command

use anyhow::{Context, Result};

use crate::cli::PlanArgs;
use xcgen::ops::{generate, GenerateOptions, ProjectPlan};
use xcgen::util::config::{global_config_path, load_config, project_config_path, OutputFormat};
use xcgen::util::diagnostic::{emit, suggestions, Diagnostic};

pub fn execute(args: PlanArgs, color: bool) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let config = load_config(global_config_path().as_deref(), &project_config_path(&cwd));

    // Flags override config
    let focus = if args.focus.is_empty() {
        config.focus.labels.clone()
    } else {
        args.focus
    };
    let format = if args.json {
        OutputFormat::Json
    } else {
        config.output_format()
    };

    let plan = generate(&GenerateOptions {
        files: args.files,
        dir: args.dir,
        focus,
    })?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&plan).context("failed to serialize plan")?;
            println!("{}", json);
        }
        OutputFormat::Human => print_plan(&plan, color),
    }

    Ok(())
}

fn print_plan(plan: &ProjectPlan, color: bool) {
    for target in &plan.targets {
        let members: Vec<&str> = target.members.iter().map(|id| id.as_str()).collect();
        println!("{}  <- {}", target.name, members.join(", "));
    }

    if !plan.warnings.is_empty() {
        let diagnostic = Diagnostic::warning(format!(
            "{} target group(s) could not be consolidated",
            plan.warnings.len()
        ))
        .with_suggestion(suggestions::CONDITIONAL_DEPENDENCIES);
        emit(&diagnostic, color);
    }
}
