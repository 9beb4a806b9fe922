//! `loom chat` -- interactive generation session.
//!
//! Free text is sent through the pipeline; follow-up turns modify the
//! current code. Lines starting with `:` are session commands.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use loom_agent::{
    format_for_user, OpenAiClient, OrchestrationResult, Orchestrator, Session,
};

use crate::config::Config;

/// Run the REPL until EOF or `:quit`.
pub(crate) async fn run_chat(config: Config) {
    if !config.llm.is_configured() {
        eprintln!("warning: OPENAI_API_KEY is not set; generation requests will fail");
    }

    let client = OpenAiClient::new(config.llm);
    println!("Loom chat (model: {})", client.model());
    println!("  Describe the UI you want. Type :help for commands.");
    println!();

    let orchestrator = Orchestrator::new(Arc::new(client));
    let mut session = Session::new();

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("loom> ");
        if io::stdout().flush().is_err() {
            break;
        }

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => {
                // EOF (Ctrl-D)
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("error reading input: {}", e);
                break;
            }
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(command) = trimmed.strip_prefix(':') else {
            let result = session.send(&orchestrator, trimmed).await;
            print_result(&result);
            continue;
        };

        let parts: Vec<&str> = command.split_whitespace().collect();
        match parts.first().copied().unwrap_or("") {
            "help" | "h" => print_help(),
            "regen" | "regenerate" => match session.regenerate(&orchestrator).await {
                Ok(result) => print_result(&result),
                Err(e) => eprintln!("  {}", e),
            },
            "versions" | "v" => print_versions(&session),
            "rollback" => {
                let Some(version) = parts.get(1).and_then(|v| v.parse::<u64>().ok()) else {
                    eprintln!("usage: :rollback <version>");
                    continue;
                };
                match session.rollback(version) {
                    Ok(()) => {
                        if let Some(message) = session.messages().last() {
                            println!("  {}", message.content);
                        }
                    }
                    Err(e) => eprintln!("  {}", e),
                }
            }
            "code" => {
                if session.current_code().is_empty() {
                    println!("  (no code yet)");
                } else {
                    println!("{}", session.current_code());
                }
            }
            "quit" | "q" | "exit" => break,
            other => {
                eprintln!("unknown command: :{}. Type :help for available commands.", other);
            }
        }
    }
}

fn print_result(result: &OrchestrationResult) {
    match result {
        OrchestrationResult::Success(response) => {
            println!();
            println!("{}", response.code.code);
            println!();
            print!("{}", format_for_user(&response.explanation));
            println!("  (version {})", response.version);
            println!();
        }
        OrchestrationResult::Failure { error, step } => match step {
            Some(step) => eprintln!("  error [{}]: {}", step, error),
            None => eprintln!("  error: {}", error),
        },
    }
}

fn print_versions(session: &Session) {
    if session.versions().is_empty() {
        println!("  (no versions yet)");
        return;
    }
    let current = session.current_code();
    for (i, v) in session.versions().iter().enumerate() {
        let marker = if v.code.code == current { "*" } else { " " };
        println!(
            " {} #{} version {} - {}",
            marker,
            i + 1,
            v.version,
            v.explanation.summary
        );
    }
}

fn print_help() {
    println!();
    println!("  <text>              Generate, or modify the current UI");
    println!("  :regen              Regenerate from the last request");
    println!("  :versions           List generated versions");
    println!("  :rollback <version> Restore a version's code");
    println!("  :code               Print the current code");
    println!("  :help               Show this help");
    println!("  :quit               Exit");
    println!();
}
