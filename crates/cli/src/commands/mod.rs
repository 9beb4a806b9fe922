pub(crate) mod explain;
pub(crate) mod generate;
pub(crate) mod render;
pub(crate) mod validate;

use std::path::Path;
use std::process;

use loom_core::{parse_plan, LayoutPlan};

use crate::{report_error, OutputFormat};

/// Read and parse a plan file, exiting with status 1 on failure.
///
/// Accepts the same text a planner may return, fenced or bare.
pub(crate) fn load_plan(path: &Path, output: OutputFormat, quiet: bool) -> LayoutPlan {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    match parse_plan(&text) {
        Ok(plan) => plan,
        Err(e) => {
            let msg = format!("error parsing plan in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Pretty-print a JSON value to stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T, output: OutputFormat, quiet: bool) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            report_error(&format!("error serializing output: {}", e), output, quiet);
            process::exit(1);
        }
    }
}
