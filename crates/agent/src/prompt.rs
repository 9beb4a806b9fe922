//! Prompt construction for the planner stage, plus the reference prompts
//! for the generator and explainer stages.
//!
//! Only the planner prompt is sent to a model. The other two document the
//! contract the deterministic stages implement and are exposed for
//! inspection via [`agent_prompts()`].

use loom_core::registry::{documented_props, Layout, ALLOWED_COMPONENTS};
use loom_core::LayoutPlan;
use serde::Serialize;

use crate::request::GenerationRequest;

/// Number of trailing conversation messages included as context.
const RECENT_MESSAGES: usize = 3;

/// Build the planner system prompt from the registry.
pub fn planner_system_prompt() -> String {
    let mut prompt = String::from(
        "You are a UI Planning Agent. Your job is to analyze user intent and create a structured plan.\n\n\
         CRITICAL RULES:\n",
    );
    prompt.push_str(&format!(
        "1. You can ONLY use these components: {}\n",
        ALLOWED_COMPONENTS.join(", ")
    ));
    prompt.push_str(
        "2. You CANNOT create new components\n\
         3. You CANNOT use inline styles or custom CSS\n\
         4. Output MUST be valid JSON\n\n\
         Available Layout Structures:\n",
    );
    for layout in Layout::ALL {
        prompt.push_str(&format!("- \"{}\": {}\n", layout, layout.description()));
    }

    prompt.push_str("\nComponent props:\n");
    for name in ALLOWED_COMPONENTS {
        let props = documented_props(name).unwrap_or_default();
        prompt.push_str(&format!("- {}: {}\n", name, props.join(", ")));
    }

    prompt.push_str(PLANNER_RESPONSE_SHAPE);
    prompt
}

const PLANNER_RESPONSE_SHAPE: &str = r#"
Your response MUST be a JSON object with this structure:
{
  "structure": "layout-type",
  "components": [
    {
      "type": "ComponentName",
      "props": {
        "propName": "value"
      },
      "children": "text content, or an array of nested components"
    }
  ],
  "reasoning": "Brief explanation of layout choice"
}

Examples:

User: "Create a login form"
Response:
{
  "structure": "single",
  "components": [
    {
      "type": "Card",
      "props": { "title": "Login", "variant": "elevated", "padding": "lg" },
      "children": [
        { "type": "Input", "props": { "label": "Email", "type": "email", "placeholder": "Enter your email" } },
        { "type": "Input", "props": { "label": "Password", "type": "password", "placeholder": "Enter your password" } },
        { "type": "Button", "props": { "variant": "primary", "fullWidth": true }, "children": "Sign In" }
      ]
    }
  ],
  "reasoning": "Single centered card with form inputs and submit button"
}

User: "Make a dashboard with sidebar navigation"
Response:
{
  "structure": "dashboard",
  "components": [
    { "type": "Navbar", "props": { "brand": "Dashboard", "brandLogo": "📊", "sticky": true } },
    {
      "type": "Sidebar",
      "props": {
        "items": [
          { "label": "Overview", "icon": "🏠", "active": true },
          { "label": "Analytics", "icon": "📈" },
          { "label": "Settings", "icon": "⚙️" }
        ],
        "width": "md"
      }
    },
    { "type": "Card", "props": { "title": "Welcome", "variant": "elevated" }, "children": "Dashboard content goes here" }
  ],
  "reasoning": "Dashboard layout with top navbar, left sidebar navigation, and main content area"
}

Remember:
- Think about user needs
- Choose the simplest layout that works
- Use appropriate components
- Keep it deterministic and reproducible"#;

/// Reference contract for the code generation stage.
pub const GENERATOR_SYSTEM_PROMPT: &str = r#"You are a Code Generation Agent. Your job is to convert a structured plan into valid React code.

CRITICAL RULES:
1. ONLY use imports from: 'import { ComponentName } from "@/components/library"'
2. NO inline styles
3. NO custom CSS classes beyond what components provide
4. NO external libraries
5. Generate a SINGLE React component called "GeneratedUI"
6. Code must be valid TypeScript/React"#;

/// Reference contract for the explanation stage.
pub const EXPLAINER_SYSTEM_PROMPT: &str = r#"You are a UI Explanation Agent. Your job is to explain UI generation decisions in plain English.

Your response should help the user understand:
1. WHY you chose this layout structure
2. WHY you selected specific components
3. WHAT alternatives you considered
4. WHAT tradeoffs were made

Output format:
{
  "summary": "Brief 1-2 sentence overview of what was created",
  "decisions": [{ "component": "ComponentName", "reason": "Why this component was chosen" }],
  "tradeoffs": ["Alternative approach that wasn't used and why"]
}"#;

/// All three stage prompts.
#[derive(Debug, Clone, Serialize)]
pub struct AgentPrompts {
    pub planner: String,
    pub generator: &'static str,
    pub explainer: &'static str,
}

pub fn agent_prompts() -> AgentPrompts {
    AgentPrompts {
        planner: planner_system_prompt(),
        generator: GENERATOR_SYSTEM_PROMPT,
        explainer: EXPLAINER_SYSTEM_PROMPT,
    }
}

/// Build the planner user prompt: intent, modification context, recent turns.
pub fn build_planner_prompt(request: &GenerationRequest, previous_plan: Option<&LayoutPlan>) -> String {
    let mut prompt = request.user_intent.clone();

    if request.is_modification {
        if let Some(plan) = previous_plan {
            let plan_json = serde_json::to_string_pretty(plan).unwrap_or_else(|_| "{}".to_string());
            prompt.push_str(&format!(
                "\n\nCONTEXT: This is a modification request. Here's the current plan:\n{}\n\n\
                 Please make incremental changes to this plan based on the user's request. \
                 Do NOT recreate everything from scratch.",
                plan_json
            ));
        }
    }

    let history = &request.conversation_history;
    if history.len() > 1 {
        prompt.push_str("\n\nRECENT CONVERSATION:\n");
        for msg in &history[history.len().saturating_sub(RECENT_MESSAGES)..] {
            prompt.push_str(&format!("{}: {}\n", msg.role, msg.content));
        }
    }

    prompt
}
