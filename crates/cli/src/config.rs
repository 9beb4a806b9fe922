//! Runtime configuration, read once from the environment.
//!
//! | variable          | meaning                                   |
//! |-------------------|-------------------------------------------|
//! | `OPENAI_API_KEY`  | LLM credential (generation fails without) |
//! | `OPENAI_BASE_URL` | chat-completions base URL                 |
//! | `LOOM_MODEL`      | model identifier                          |
//! | `LOOM_API_KEY`    | enables server authentication             |
//! | `LOOM_RATE_LIMIT` | server requests per minute per IP         |

use loom_agent::OpenAiConfig;

/// Default rate limit: 60 requests per minute per IP.
pub(crate) const DEFAULT_RATE_LIMIT: u64 = 60;

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) llm: OpenAiConfig,
    /// Server API key. None = no auth required.
    pub(crate) api_key: Option<String>,
    pub(crate) rate_limit: u64,
}

impl Config {
    pub(crate) fn from_env() -> Self {
        let mut llm = OpenAiConfig::from_env();
        if let Some(model) = non_empty_var("LOOM_MODEL") {
            llm = llm.with_model(model);
        }

        Self {
            llm,
            api_key: non_empty_var("LOOM_API_KEY"),
            rate_limit: non_empty_var("LOOM_RATE_LIMIT")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RATE_LIMIT),
        }
    }

    /// Apply a `--model` flag over the environment.
    pub(crate) fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model {
            self.llm = self.llm.with_model(model);
        }
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
