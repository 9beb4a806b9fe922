//! Layout plan data model and planner-output parsing.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// One node of a plan's component tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSelection {
    /// Library component name. Empty when the planner omitted it.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub component_type: String,
    /// Props in the order the planner wrote them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub props: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
}

/// Content nested inside a component: a text leaf or a list of nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Children {
    Text(String),
    Nodes(Vec<ComponentSelection>),
}

/// A structured plan: layout topology plus a forest of components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    /// Layout tag as received; checked against [`crate::Layout`] by the validator.
    #[serde(default, deserialize_with = "null_as_default")]
    pub structure: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Vec<ComponentSelection>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reasoning: String,
}

/// Reads an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ComponentSelection {
    /// A node with no props and no children.
    pub fn new(component_type: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            props: serde_json::Map::new(),
            children: None,
        }
    }

    /// Builder: add a prop.
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Builder: set a text child.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children = Some(Children::Text(text.into()));
        self
    }

    /// Builder: set nested component children.
    pub fn nodes(mut self, nodes: Vec<ComponentSelection>) -> Self {
        self.children = Some(Children::Nodes(nodes));
        self
    }

    /// Nested component children, empty for text leaves and childless nodes.
    pub fn child_nodes(&self) -> &[ComponentSelection] {
        match &self.children {
            Some(Children::Nodes(nodes)) => nodes,
            _ => &[],
        }
    }

    /// Whether `key` is set to a JSON-truthy value.
    pub fn prop_is_truthy(&self, key: &str) -> bool {
        self.props.get(key).is_some_and(is_truthy)
    }
}

impl LayoutPlan {
    /// Visit every node in pre-order, siblings in array order.
    pub fn walk_preorder<'a>(&'a self, visit: &mut impl FnMut(&'a ComponentSelection)) {
        walk(&self.components, visit);
    }

    /// Distinct component types in first-sighted pre-order.
    pub fn component_types(&self) -> Vec<String> {
        let mut types: Vec<String> = Vec::new();
        self.walk_preorder(&mut |node| {
            if !node.component_type.is_empty() && !types.contains(&node.component_type) {
                types.push(node.component_type.clone());
            }
        });
        types
    }

    /// Total number of nodes in the forest, nested children included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk_preorder(&mut |_| count += 1);
        count
    }

    /// Whether a component of type `name` appears at any depth.
    pub fn contains_type(&self, name: &str) -> bool {
        let mut found = false;
        self.walk_preorder(&mut |node| found |= node.component_type == name);
        found
    }
}

fn walk<'a>(nodes: &'a [ComponentSelection], visit: &mut impl FnMut(&'a ComponentSelection)) {
    for node in nodes {
        visit(node);
        walk(node.child_nodes(), visit);
    }
}

/// JavaScript-style truthiness for prop values.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// Parse planner output into a [`LayoutPlan`].
///
/// Accepts bare JSON or JSON wrapped in a ```` ```json ```` / ```` ``` ```` fence.
pub fn parse_plan(response_text: &str) -> Result<LayoutPlan, PlanError> {
    let trimmed = response_text.trim();
    if trimmed.is_empty() {
        return Err(PlanError::Empty);
    }

    let json_str = strip_code_fences(trimmed);
    serde_json::from_str(json_str).map_err(|e| PlanError::Json {
        message: e.to_string(),
        excerpt: truncate(trimmed, 200),
    })
}

/// Strip a surrounding markdown code fence, if present.
pub fn strip_code_fences(s: &str) -> &str {
    let trimmed = s.trim();

    if let Some(stripped) = trimmed.strip_prefix("```json") {
        if let Some(inner) = stripped.strip_suffix("```") {
            return inner.trim();
        }
    }
    if let Some(stripped) = trimmed.strip_prefix("```") {
        if let Some(inner) = stripped.strip_suffix("```") {
            return inner.trim();
        }
    }

    trimmed
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_PLAN: &str = r#"{
      "structure": "single",
      "components": [
        {
          "type": "Card",
          "props": { "title": "Login", "variant": "elevated", "padding": "lg" },
          "children": [
            { "type": "Input", "props": { "label": "Email", "type": "email" } },
            { "type": "Input", "props": { "label": "Password", "type": "password" } },
            { "type": "Button", "props": { "variant": "primary", "fullWidth": true }, "children": "Sign In" }
          ]
        }
      ],
      "reasoning": "Single centered card with form inputs and submit button"
    }"#;

    #[test]
    fn parses_nested_plan() {
        let plan = parse_plan(LOGIN_PLAN).unwrap();
        assert_eq!(plan.structure, "single");
        assert_eq!(plan.components.len(), 1);

        let card = &plan.components[0];
        assert_eq!(card.component_type, "Card");
        assert_eq!(card.child_nodes().len(), 3);

        let button = &card.child_nodes()[2];
        assert_eq!(button.children, Some(Children::Text("Sign In".to_string())));
        assert!(button.child_nodes().is_empty());
    }

    #[test]
    fn props_keep_planner_order() {
        let plan = parse_plan(LOGIN_PLAN).unwrap();
        let keys: Vec<&str> = plan.components[0].props.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["title", "variant", "padding"]);
    }

    #[test]
    fn parses_fenced_response() {
        let fenced = format!("```json\n{}\n```", LOGIN_PLAN);
        assert_eq!(parse_plan(&fenced).unwrap(), parse_plan(LOGIN_PLAN).unwrap());

        let bare_fence = format!("```\n{}\n```", LOGIN_PLAN);
        assert!(parse_plan(&bare_fence).is_ok());
    }

    #[test]
    fn missing_type_and_props_default() {
        let plan = parse_plan(r#"{"structure":"single","components":[{"children":null}],"reasoning":""}"#)
            .unwrap();
        let node = &plan.components[0];
        assert!(node.component_type.is_empty());
        assert!(node.props.is_empty());
        assert!(node.children.is_none());
    }

    #[test]
    fn explicit_nulls_read_as_absent() {
        let plan = parse_plan(
            r#"{"structure":null,"components":[{"type":null,"props":null}],"reasoning":null}"#,
        )
        .unwrap();
        assert!(plan.structure.is_empty());
        assert!(plan.reasoning.is_empty());
        let node = &plan.components[0];
        assert!(node.component_type.is_empty());
        assert!(node.props.is_empty());

        let plan = parse_plan(r#"{"structure":"single","components":null}"#).unwrap();
        assert!(plan.components.is_empty());
    }

    #[test]
    fn rejects_non_json() {
        match parse_plan("Sure! Here is your plan.") {
            Err(PlanError::Json { message, excerpt }) => {
                assert!(!message.is_empty());
                assert_eq!(excerpt, "Sure! Here is your plan.");
            }
            other => panic!("expected Json error, got {:?}", other),
        }
        assert!(matches!(parse_plan("   "), Err(PlanError::Empty)));
    }

    #[test]
    fn tree_helpers_descend_into_children() {
        let plan = parse_plan(LOGIN_PLAN).unwrap();
        assert_eq!(plan.node_count(), 4);
        assert_eq!(plan.component_types(), vec!["Card", "Input", "Button"]);
        assert!(plan.contains_type("Button"));
        assert!(!plan.contains_type("Modal"));
    }

    #[test]
    fn truthiness_follows_javascript() {
        let node = ComponentSelection::new("Button")
            .prop("fullWidth", true)
            .prop("sticky", false)
            .prop("variant", "")
            .prop("size", 0);
        assert!(node.prop_is_truthy("fullWidth"));
        assert!(!node.prop_is_truthy("sticky"));
        assert!(!node.prop_is_truthy("variant"));
        assert!(!node.prop_is_truthy("size"));
        assert!(!node.prop_is_truthy("missing"));
    }

    #[test]
    fn serializes_without_absent_children() {
        let node = ComponentSelection::new("Input").prop("label", "Email");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Input", "props": {"label": "Email"}}));
    }

    #[test]
    fn strip_code_fences_variants() {
        assert_eq!(strip_code_fences("{}"), "{}");
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```json\n{}"), "```json\n{}");
    }
}
