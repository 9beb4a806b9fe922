mod chat;
mod commands;
mod config;
mod serve;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Generate UI code from natural language, using a fixed component library.
#[derive(Parser)]
#[command(
    name = "loom",
    version,
    about = "Natural-language UI generation over a fixed component library"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full plan -> generate -> explain pipeline for one request
    Generate {
        /// What to build, in plain language
        intent: String,
        /// LLM model to use (default: $LOOM_MODEL or openai/gpt-4-turbo-preview)
        #[arg(long)]
        model: Option<String>,
    },

    /// Check a plan JSON file against the component registry
    Validate {
        /// Path to the plan JSON file
        plan: PathBuf,
    },

    /// Generate code from a plan JSON file without calling a model
    Render {
        /// Path to the plan JSON file
        plan: PathBuf,
        /// Also print the design explanation
        #[arg(long)]
        explain: bool,
    },

    /// Explain the design decisions in a plan JSON file
    Explain {
        /// Path to the plan JSON file
        plan: PathBuf,
    },

    /// Start an interactive generation session
    Chat {
        /// LLM model to use
        #[arg(long)]
        model: Option<String>,
    },

    /// Start the Loom HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "3000")]
        port: u16,
        /// LLM model to use
        #[arg(long)]
        model: Option<String>,
        /// Path to TLS certificate PEM file (requires --tls-key)
        #[arg(long)]
        tls_cert: Option<PathBuf>,
        /// Path to TLS private key PEM file (requires --tls-cert)
        #[arg(long)]
        tls_key: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match cli.command {
        Commands::Generate { intent, model } => {
            let config = Config::from_env().with_model(model);
            commands::generate::cmd_generate(&intent, config, cli.output, cli.quiet);
        }
        Commands::Validate { plan } => {
            commands::validate::cmd_validate(&plan, cli.output, cli.quiet);
        }
        Commands::Render { plan, explain } => {
            commands::render::cmd_render(&plan, explain, cli.output, cli.quiet);
        }
        Commands::Explain { plan } => {
            commands::explain::cmd_explain(&plan, cli.output, cli.quiet);
        }
        Commands::Chat { model } => {
            let config = Config::from_env().with_model(model);
            let rt = runtime(cli.output, cli.quiet);
            rt.block_on(chat::run_chat(config));
        }
        Commands::Serve {
            port,
            model,
            tls_cert,
            tls_key,
        } => {
            // Validate TLS flags: both must be provided or neither
            if tls_cert.is_some() != tls_key.is_some() {
                report_error(
                    "error: --tls-cert and --tls-key must both be provided",
                    cli.output,
                    cli.quiet,
                );
                process::exit(1);
            }
            let config = Config::from_env().with_model(model);
            let rt = runtime(cli.output, cli.quiet);
            if let Err(e) = rt.block_on(serve::start_server(port, config, tls_cert, tls_key)) {
                report_error(&format!("Server error: {}", e), cli.output, cli.quiet);
                process::exit(1);
            }
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing(quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else {
        "loom_cli=info,loom_agent=info,loom_codegen=warn,loom_core=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub(crate) fn runtime(output: OutputFormat, quiet: bool) -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            report_error(
                &format!("failed to create tokio runtime: {}", e),
                output,
                quiet,
            );
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
