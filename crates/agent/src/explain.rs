//! Explanation derivation: a plain-language rationale built from the plan.
//!
//! Deterministic. No model call and no randomness; the same plan always
//! produces the same explanation.

use loom_codegen::GeneratedCode;
use loom_core::{ComponentSelection, Layout, LayoutPlan};
use serde::{Deserialize, Serialize};

/// Maximum component types named in the summary.
const SUMMARY_TYPE_LIMIT: usize = 3;

/// Why one component (or the layout) was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub component: String,
    pub reason: String,
}

/// Human-readable rationale for a generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub decisions: Vec<Decision>,
    #[serde(default)]
    pub tradeoffs: Vec<String>,
}

/// Derive the explanation for a plan and the code generated from it.
pub fn explain(plan: &LayoutPlan, _code: &GeneratedCode) -> Explanation {
    Explanation {
        summary: summarize(plan),
        decisions: decisions(plan),
        tradeoffs: tradeoffs(plan),
    }
}

fn layout_phrase(structure: &str) -> &'static str {
    match Layout::from_tag(structure) {
        Some(Layout::Single) => "a centered single-column layout",
        Some(Layout::SidebarMain) => "a layout with sidebar navigation and main content area",
        Some(Layout::NavbarContent) => "a layout with top navigation bar",
        Some(Layout::Dashboard) => "a full dashboard with navbar, sidebar, and content area",
        Some(Layout::ModalOverlay) => "a modal dialog overlay",
        None => "a custom layout",
    }
}

fn summarize(plan: &LayoutPlan) -> String {
    let mut main_types: Vec<&str> = Vec::new();
    for component in &plan.components {
        let name = component.component_type.as_str();
        if !main_types.contains(&name) {
            main_types.push(name);
        }
    }
    main_types.truncate(SUMMARY_TYPE_LIMIT);

    format!(
        "Created {} using {} components including {}.",
        layout_phrase(&plan.structure),
        plan.node_count(),
        main_types.join(", ")
    )
}

fn decisions(plan: &LayoutPlan) -> Vec<Decision> {
    let mut out = vec![Decision {
        component: format!("Layout ({})", plan.structure),
        reason: plan.reasoning.clone(),
    }];

    plan.walk_preorder(&mut |node| {
        out.push(Decision {
            component: node.component_type.clone(),
            reason: component_reason(node),
        });
    });

    out
}

fn component_reason(node: &ComponentSelection) -> String {
    let mut parts: Vec<String> = Vec::new();

    if node.prop_is_truthy("variant") {
        parts.push(format!("Using '{}' variant", prop_text(node, "variant")));
    }

    if node.prop_is_truthy("size") {
        let size = prop_text(node, "size");
        let purpose = if size == "lg" { "emphasis" } else { "balance" };
        parts.push(format!("{} size for {}", size, purpose));
    }

    if node.prop_is_truthy("fullWidth") {
        parts.push("full width for better mobile experience".to_string());
    }

    if node.prop_is_truthy("sticky") {
        parts.push("sticky positioning for persistent navigation".to_string());
    }

    if parts.is_empty() {
        format!("Standard {} component for this use case", node.component_type)
    } else {
        parts.join(", ")
    }
}

/// A prop rendered for prose: strings bare, anything else as JSON.
fn prop_text(node: &ComponentSelection, key: &str) -> String {
    match node.props.get(key) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn tradeoffs(plan: &LayoutPlan) -> Vec<String> {
    let mut notes = Vec::new();

    match Layout::from_tag(&plan.structure) {
        Some(Layout::Single) => {
            notes.push("Simple layout prioritizes focus over navigation complexity".to_string())
        }
        Some(Layout::Dashboard) => notes.push(
            "Dashboard layout provides rich navigation but requires more screen space".to_string(),
        ),
        _ => {}
    }

    if plan.contains_type("Modal") {
        notes.push(
            "Modal provides focus but may interrupt user flow - consider inline alternatives for less critical actions"
                .to_string(),
        );
    }
    if plan.contains_type("Table") {
        notes.push(
            "Table is great for data but less mobile-friendly - consider Card grid for responsive layouts"
                .to_string(),
        );
    }
    if plan.contains_type("Sidebar") {
        notes.push(
            "Sidebar navigation is efficient but may need hamburger menu on mobile".to_string(),
        );
    }

    notes
}

/// Render an explanation as markdown for chat display.
pub fn format_for_user(explanation: &Explanation) -> String {
    let mut out = format!("## {}\n\n", explanation.summary);

    out.push_str("### Design Decisions\n");
    for decision in &explanation.decisions {
        out.push_str(&format!("- **{}**: {}\n", decision.component, decision.reason));
    }

    if !explanation.tradeoffs.is_empty() {
        out.push_str("\n### Considerations\n");
        for tradeoff in &explanation.tradeoffs {
            out.push_str(&format!("- {}\n", tradeoff));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(structure: &str, components: Vec<ComponentSelection>) -> LayoutPlan {
        LayoutPlan {
            structure: structure.to_string(),
            components,
            reasoning: "Because it fits".to_string(),
        }
    }

    fn explain_plan(plan: &LayoutPlan) -> Explanation {
        explain(plan, &loom_codegen::generate(plan))
    }

    fn dashboard() -> LayoutPlan {
        plan(
            "dashboard",
            vec![
                ComponentSelection::new("Navbar").prop("sticky", true),
                ComponentSelection::new("Sidebar"),
                ComponentSelection::new("Card")
                    .prop("variant", "elevated")
                    .nodes(vec![
                        ComponentSelection::new("Chart"),
                        ComponentSelection::new("Button").prop("size", "lg"),
                    ]),
            ],
        )
    }

    #[test]
    fn dashboard_summary_counts_nested_nodes() {
        assert_eq!(
            explain_plan(&dashboard()).summary,
            "Created a full dashboard with navbar, sidebar, and content area using 5 components including Navbar, Sidebar, Card."
        );
    }

    #[test]
    fn summary_names_at_most_three_distinct_top_level_types() {
        let p = plan(
            "navbar-content",
            vec![
                ComponentSelection::new("Card"),
                ComponentSelection::new("Card"),
                ComponentSelection::new("Table"),
                ComponentSelection::new("Chart"),
                ComponentSelection::new("Button"),
            ],
        );
        assert_eq!(
            explain_plan(&p).summary,
            "Created a layout with top navigation bar using 5 components including Card, Table, Chart."
        );
    }

    #[test]
    fn unknown_structure_uses_custom_phrase() {
        let p = plan("grid", vec![ComponentSelection::new("Card")]);
        assert!(explain_plan(&p).summary.starts_with("Created a custom layout using 1 components"));
    }

    #[test]
    fn decisions_start_with_layout_and_follow_preorder() {
        let e = explain_plan(&dashboard());
        let components: Vec<&str> = e.decisions.iter().map(|d| d.component.as_str()).collect();
        assert_eq!(
            components,
            vec!["Layout (dashboard)", "Navbar", "Sidebar", "Card", "Chart", "Button"]
        );
        assert_eq!(e.decisions[0].reason, "Because it fits");
        assert_eq!(e.decisions[1].reason, "sticky positioning for persistent navigation");
        assert_eq!(e.decisions[2].reason, "Standard Sidebar component for this use case");
        assert_eq!(e.decisions[3].reason, "Using 'elevated' variant");
        assert_eq!(e.decisions[5].reason, "lg size for emphasis");
    }

    #[test]
    fn reason_clauses_join_in_fixed_order() {
        let node = ComponentSelection::new("Button")
            .prop("fullWidth", true)
            .prop("size", "md")
            .prop("variant", "primary");
        assert_eq!(
            component_reason(&node),
            "Using 'primary' variant, md size for balance, full width for better mobile experience"
        );
    }

    #[test]
    fn false_flags_do_not_add_clauses() {
        let node = ComponentSelection::new("Navbar")
            .prop("sticky", false)
            .prop("fullWidth", false);
        assert_eq!(component_reason(&node), "Standard Navbar component for this use case");
    }

    #[test]
    fn tradeoffs_detect_nested_modal_and_table() {
        let p = plan(
            "sidebar-main",
            vec![ComponentSelection::new("Card").nodes(vec![
                ComponentSelection::new("Table"),
                ComponentSelection::new("Card").nodes(vec![ComponentSelection::new("Modal")]),
            ])],
        );
        let notes = explain_plan(&p).tradeoffs;
        assert_eq!(notes.len(), 2);
        assert!(notes[0].starts_with("Modal provides focus"));
        assert!(notes[1].starts_with("Table is great for data"));
        assert!(!notes.iter().any(|n| n.contains("hamburger")));
    }

    #[test]
    fn tradeoffs_follow_fixed_order() {
        let p = plan(
            "dashboard",
            vec![
                ComponentSelection::new("Sidebar"),
                ComponentSelection::new("Table"),
                ComponentSelection::new("Modal"),
            ],
        );
        let notes = explain_plan(&p).tradeoffs;
        assert_eq!(notes.len(), 4);
        assert!(notes[0].starts_with("Dashboard layout"));
        assert!(notes[1].starts_with("Modal"));
        assert!(notes[2].starts_with("Table"));
        assert!(notes[3].starts_with("Sidebar"));
    }

    #[test]
    fn single_layout_note() {
        let notes = explain_plan(&plan("single", vec![])).tradeoffs;
        assert_eq!(
            notes,
            vec!["Simple layout prioritizes focus over navigation complexity"]
        );
    }

    #[test]
    fn markdown_rendering() {
        let e = Explanation {
            summary: "Created a thing.".to_string(),
            decisions: vec![Decision {
                component: "Card".to_string(),
                reason: "Grouping".to_string(),
            }],
            tradeoffs: vec!["Could use a Modal".to_string()],
        };
        assert_eq!(
            format_for_user(&e),
            "## Created a thing.\n\n### Design Decisions\n- **Card**: Grouping\n\n### Considerations\n- Could use a Modal\n"
        );

        let no_tradeoffs = Explanation {
            tradeoffs: vec![],
            ..e
        };
        assert!(!format_for_user(&no_tradeoffs).contains("Considerations"));
    }
}
