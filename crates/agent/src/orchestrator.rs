//! The generation pipeline: plan, validate, generate, validate, explain.
//!
//! Strictly sequential. The only suspension point is the planner's LLM
//! call; every later stage is a pure function of the validated plan.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use loom_codegen::{generate, validate_code};
use loom_core::{parse_plan, validate_plan, LayoutPlan, Validation};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use time::OffsetDateTime;

use crate::explain::explain;
use crate::llm::{LlmClient, LlmError, LlmRequest};
use crate::prompt::{build_planner_prompt, planner_system_prompt};
use crate::request::{AgentResponse, GenerationRequest};

/// Message returned when a request carries no intent.
pub const MISSING_INTENT: &str = "userIntent is required";

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Pipeline position, in transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Planning,
    PlanValidating,
    Generating,
    CodeValidating,
    Explaining,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Planning => "planning",
            Stage::PlanValidating => "plan-validating",
            Stage::Generating => "generating",
            Stage::CodeValidating => "code-validating",
            Stage::Explaining => "explaining",
            Stage::Done => "done",
        };
        f.write_str(s)
    }
}

/// The step a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Planner,
    Generator,
    Explainer,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Planner => f.write_str("planner"),
            Step::Generator => f.write_str("generator"),
            Step::Explainer => f.write_str("explainer"),
        }
    }
}

/// Outcome of one pipeline run.
///
/// Serializes as `{"success": true, "data": ...}` or
/// `{"success": false, "error": ..., "step": ...}` (step omitted when the
/// failure happened before attribution).
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestrationResult {
    Success(AgentResponse),
    Failure { error: String, step: Option<Step> },
}

impl OrchestrationResult {
    fn failure(error: impl Into<String>, step: Option<Step>) -> Self {
        OrchestrationResult::Failure {
            error: error.into(),
            step,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OrchestrationResult::Success(_))
    }

    pub fn response(&self) -> Option<&AgentResponse> {
        match self {
            OrchestrationResult::Success(response) => Some(response),
            OrchestrationResult::Failure { .. } => None,
        }
    }
}

impl Serialize for OrchestrationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OrchestrationResult::Success(response) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", response)?;
                map.end()
            }
            OrchestrationResult::Failure { error, step } => {
                let len = if step.is_some() { 3 } else { 2 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
                if let Some(step) = step {
                    map.serialize_entry("step", step)?;
                }
                map.end()
            }
        }
    }
}

/// Runs generation requests against an injected LLM client.
pub struct Orchestrator {
    client: Arc<dyn LlmClient>,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Run the full pipeline for one request. Never panics; every failure
    /// comes back as [`OrchestrationResult::Failure`].
    pub async fn run(&self, request: &GenerationRequest) -> OrchestrationResult {
        if request.user_intent.trim().is_empty() {
            tracing::warn!("rejected request without intent");
            return OrchestrationResult::failure(MISSING_INTENT, None);
        }

        tracing::info!(
            modification = request.is_modification,
            history = request.conversation_history.len(),
            "generation started"
        );

        enter(Stage::Planning);
        let plan = match self.plan(request).await {
            Ok(plan) => plan,
            Err(failure) => return failure,
        };

        enter(Stage::PlanValidating);
        let validation = validate_plan(&plan);
        if !validation.valid {
            return fail(
                format!("Plan validation failed: {}", validation.errors.join(", ")),
                Step::Planner,
            );
        }

        enter(Stage::Generating);
        let code = generate(&plan);

        enter(Stage::CodeValidating);
        if !code.valid {
            let errors = code.errors.clone().unwrap_or_default();
            return fail(
                format!("Code validation failed: {}", errors.join(", ")),
                Step::Generator,
            );
        }

        enter(Stage::Explaining);
        let explanation = explain(&plan, &code);

        let response = AgentResponse {
            plan,
            code,
            explanation,
            version: next_version(),
            timestamp: now_millis(),
        };
        enter(Stage::Done);
        tracing::info!(version = response.version, "generation finished");

        OrchestrationResult::Success(response)
    }

    async fn plan(&self, request: &GenerationRequest) -> Result<LayoutPlan, OrchestrationResult> {
        let user_prompt = build_planner_prompt(request, request.resolve_previous_plan());
        let llm_request = LlmRequest::new(planner_system_prompt(), user_prompt).json();

        let response = self.client.complete(llm_request).await.map_err(|e| {
            let step = match e {
                LlmError::NotConfigured(_) => None,
                _ => Some(Step::Planner),
            };
            tracing::warn!(error = %e, "planner call failed");
            OrchestrationResult::failure(e.to_string(), step)
        })?;

        if let Some(usage) = response.usage {
            tracing::debug!(total_tokens = usage.total_tokens, "planner usage");
        }

        parse_plan(&response.content).map_err(|e| fail(e.to_string(), Step::Planner))
    }
}

fn enter(stage: Stage) {
    tracing::debug!(stage = %stage, "pipeline stage");
}

fn fail(error: String, step: Step) -> OrchestrationResult {
    tracing::warn!(step = %step, error = %error, "generation failed");
    OrchestrationResult::failure(error, Some(step))
}

/// Next process-wide version number.
fn next_version() -> u64 {
    NEXT_VERSION.fetch_add(1, Ordering::SeqCst)
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Re-check a finished response: both validators plus explanation shape.
pub fn validate_agent_response(response: &AgentResponse) -> Validation {
    let mut errors: Vec<String> = validate_plan(&response.plan)
        .errors
        .into_iter()
        .map(|e| format!("Plan: {}", e))
        .collect();

    errors.extend(
        validate_code(&response.code.code)
            .errors
            .into_iter()
            .map(|e| format!("Code: {}", e)),
    );

    if response.explanation.summary.is_empty() {
        errors.push("Explanation: Missing summary".to_string());
    }
    if response.explanation.decisions.is_empty() {
        errors.push("Explanation: No decisions provided".to_string());
    }

    Validation::from_errors(errors)
}
