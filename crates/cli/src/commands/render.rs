use std::path::Path;
use std::process;

use loom_agent::{explain, format_for_user};
use loom_codegen::generate;
use loom_core::validate_plan;

use super::{load_plan, print_json};
use crate::{report_error, OutputFormat};

/// Offline generation: plan file in, source out. No model is involved.
pub(crate) fn cmd_render(plan_path: &Path, with_explanation: bool, output: OutputFormat, quiet: bool) {
    let plan = load_plan(plan_path, output, quiet);

    let validation = validate_plan(&plan);
    if !validation.valid {
        let msg = format!(
            "Plan validation failed: {}",
            validation.errors.join(", ")
        );
        report_error(&msg, output, quiet);
        process::exit(1);
    }

    let code = generate(&plan);
    if !code.valid {
        let msg = format!(
            "Code validation failed: {}",
            code.errors.clone().unwrap_or_default().join(", ")
        );
        report_error(&msg, output, quiet);
        process::exit(1);
    }

    let explanation = with_explanation.then(|| explain(&plan, &code));

    match output {
        OutputFormat::Json => {
            let mut body = serde_json::json!({ "code": code });
            if let Some(explanation) = &explanation {
                body["explanation"] = serde_json::json!(explanation);
            }
            print_json(&body, output, quiet);
        }
        OutputFormat::Text => {
            println!("{}", code.code);
            if let Some(explanation) = &explanation {
                println!();
                print!("{}", format_for_user(explanation));
            }
        }
    }
}
