use std::path::Path;
use std::process;

use loom_core::validate_plan;

use super::{load_plan, print_json};
use crate::OutputFormat;

pub(crate) fn cmd_validate(plan_path: &Path, output: OutputFormat, quiet: bool) {
    let plan = load_plan(plan_path, output, quiet);
    let validation = validate_plan(&plan);

    match output {
        OutputFormat::Json => print_json(&validation, output, quiet),
        OutputFormat::Text => {
            if validation.valid {
                if !quiet {
                    println!(
                        "Valid plan: {} layout, {} components",
                        plan.structure,
                        plan.node_count()
                    );
                }
            } else {
                println!("Invalid plan: {} error(s)", validation.errors.len());
                for error in &validation.errors {
                    println!("  - {}", error);
                }
            }
        }
    }

    if !validation.valid {
        process::exit(1);
    }
}
