//! loom-agent: the generation pipeline around an injected LLM client.
//!
//! The planner is the only stage that talks to a model. Code generation
//! and explanation are deterministic derivations from the validated plan.

pub mod explain;
pub mod llm;
pub mod orchestrator;
pub mod prompt;
pub mod request;
pub mod session;

pub use explain::{explain, format_for_user, Decision, Explanation};
pub use llm::{LlmClient, LlmError, LlmRequest, LlmResponse, OpenAiClient, OpenAiConfig};
pub use orchestrator::{
    validate_agent_response, OrchestrationResult, Orchestrator, Stage, Step, MISSING_INTENT,
};
pub use request::{AgentResponse, ChatMessage, GenerationRequest, Role};
pub use session::{Session, SessionError};
