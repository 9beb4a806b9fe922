use std::path::Path;

use loom_agent::{explain, format_for_user};
use loom_codegen::generate;

use super::{load_plan, print_json};
use crate::OutputFormat;

pub(crate) fn cmd_explain(plan_path: &Path, output: OutputFormat, quiet: bool) {
    let plan = load_plan(plan_path, output, quiet);
    let explanation = explain(&plan, &generate(&plan));

    match output {
        OutputFormat::Json => print_json(&explanation, output, quiet),
        OutputFormat::Text => print!("{}", format_for_user(&explanation)),
    }
}
