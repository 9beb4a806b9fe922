use std::process;
use std::sync::Arc;

use loom_agent::{
    format_for_user, GenerationRequest, OpenAiClient, OrchestrationResult, Orchestrator,
};

use super::print_json;
use crate::config::Config;
use crate::{report_error, runtime, OutputFormat};

/// One-shot generation through the full pipeline.
pub(crate) fn cmd_generate(intent: &str, config: Config, output: OutputFormat, quiet: bool) {
    let orchestrator = Orchestrator::new(Arc::new(OpenAiClient::new(config.llm)));
    let request = GenerationRequest::new(intent);

    let rt = runtime(output, quiet);
    let result = rt.block_on(orchestrator.run(&request));

    match (&result, output) {
        (_, OutputFormat::Json) => print_json(&result, output, quiet),
        (OrchestrationResult::Success(response), OutputFormat::Text) => {
            println!("{}", response.code.code);
            if !quiet {
                eprintln!();
                eprint!("{}", format_for_user(&response.explanation));
            }
        }
        (OrchestrationResult::Failure { error, step }, OutputFormat::Text) => {
            let msg = match step {
                Some(step) => format!("generation failed at {}: {}", step, error),
                None => format!("generation failed: {}", error),
            };
            report_error(&msg, output, quiet);
        }
    }

    if !result.is_success() {
        process::exit(1);
    }
}
