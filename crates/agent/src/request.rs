//! Inbound request and outbound response types (camelCase JSON).

use std::fmt;

use loom_codegen::GeneratedCode;
use loom_core::LayoutPlan;
use serde::{Deserialize, Serialize};

use crate::explain::Explanation;

/// Speaker of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// One conversation turn. Assistant turns that completed a generation
/// carry the full [`AgentResponse`], plan included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_response: Option<AgentResponse>,
    #[serde(default)]
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            agent_response: None,
            timestamp: crate::orchestrator::now_millis(),
        }
    }
}

/// A generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub user_intent: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_code: Option<String>,
    /// Plan behind `previous_code`, when the caller kept it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_plan: Option<LayoutPlan>,
    #[serde(default)]
    pub is_modification: bool,
}

impl GenerationRequest {
    pub fn new(user_intent: impl Into<String>) -> Self {
        Self {
            user_intent: user_intent.into(),
            ..Self::default()
        }
    }

    /// The plan a modification should start from.
    ///
    /// An explicit `previous_plan` wins; otherwise the most recent
    /// assistant turn that carries a response supplies it.
    pub fn resolve_previous_plan(&self) -> Option<&LayoutPlan> {
        self.previous_plan.as_ref().or_else(|| {
            self.conversation_history
                .iter()
                .rev()
                .filter(|m| m.role == Role::Assistant)
                .find_map(|m| m.agent_response.as_ref())
                .map(|r| &r.plan)
        })
    }
}

/// One completed generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub plan: LayoutPlan,
    pub code: GeneratedCode,
    pub explanation: Explanation,
    /// Process-wide, strictly increasing.
    pub version: u64,
    /// Completion time, milliseconds since the Unix epoch.
    pub timestamp: i64,
}
