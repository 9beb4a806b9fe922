//! In-memory conversation session: messages, append-only version history,
//! and the currently selected code together with the plan behind it.
//!
//! Nothing here persists. A session lives as long as its owner.

use loom_core::LayoutPlan;

use crate::orchestrator::{OrchestrationResult, Orchestrator};
use crate::request::{AgentResponse, ChatMessage, GenerationRequest, Role};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no version {0} in this session")]
    UnknownVersion(u64),
    #[error("nothing to regenerate: no user message in this session")]
    NothingToRegenerate,
}

#[derive(Debug, Default)]
pub struct Session {
    messages: Vec<ChatMessage>,
    versions: Vec<AgentResponse>,
    current_code: String,
    current_plan: Option<LayoutPlan>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn versions(&self) -> &[AgentResponse] {
        &self.versions
    }

    pub fn current_code(&self) -> &str {
        &self.current_code
    }

    /// Plan that produced [`Session::current_code`].
    pub fn current_plan(&self) -> Option<&LayoutPlan> {
        self.current_plan.as_ref()
    }

    /// Send a user turn through the pipeline.
    ///
    /// The turn is a modification when the session already has messages
    /// and some current code. On failure an `Error: ...` assistant message
    /// is appended and nothing else changes.
    pub async fn send(&mut self, orchestrator: &Orchestrator, text: &str) -> OrchestrationResult {
        let is_modification = !self.messages.is_empty() && !self.current_code.is_empty();
        self.submit(orchestrator, text, is_modification).await
    }

    /// Re-send the most recent user message as a fresh request.
    pub async fn regenerate(
        &mut self,
        orchestrator: &Orchestrator,
    ) -> Result<OrchestrationResult, SessionError> {
        let text = self
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .ok_or(SessionError::NothingToRegenerate)?;
        Ok(self.submit(orchestrator, &text, false).await)
    }

    /// Make a prior version's code current again.
    pub fn rollback(&mut self, version: u64) -> Result<(), SessionError> {
        let index = self
            .versions
            .iter()
            .position(|v| v.version == version)
            .ok_or(SessionError::UnknownVersion(version))?;

        let selected = &self.versions[index];
        self.current_code = selected.code.code.clone();
        self.current_plan = Some(selected.plan.clone());
        self.messages.push(ChatMessage::new(
            Role::Assistant,
            format!("Rolled back to version {}", index + 1),
        ));
        tracing::info!(version, "rolled back");
        Ok(())
    }

    async fn submit(
        &mut self,
        orchestrator: &Orchestrator,
        text: &str,
        is_modification: bool,
    ) -> OrchestrationResult {
        self.messages.push(ChatMessage::new(Role::User, text));
        let request = GenerationRequest {
            user_intent: text.to_string(),
            conversation_history: self.messages.clone(),
            previous_code: (!self.current_code.is_empty()).then(|| self.current_code.clone()),
            previous_plan: self.current_plan.clone(),
            is_modification,
        };

        let result = orchestrator.run(&request).await;
        match &result {
            OrchestrationResult::Success(response) => {
                let mut message =
                    ChatMessage::new(Role::Assistant, response.explanation.summary.clone());
                message.agent_response = Some(response.clone());
                self.messages.push(message);
                self.current_code = response.code.code.clone();
                self.current_plan = Some(response.plan.clone());
                self.versions.push(response.clone());
            }
            OrchestrationResult::Failure { error, .. } => {
                self.messages
                    .push(ChatMessage::new(Role::Assistant, format!("Error: {}", error)));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_empty() {
        let session = Session::new();
        assert!(session.messages().is_empty());
        assert!(session.versions().is_empty());
        assert_eq!(session.current_code(), "");
    }

    #[test]
    fn rollback_unknown_version_changes_nothing() {
        let mut session = Session::new();
        assert_eq!(session.rollback(7), Err(SessionError::UnknownVersion(7)));
        assert!(session.messages().is_empty());
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            SessionError::UnknownVersion(3).to_string(),
            "no version 3 in this session"
        );
    }
}
