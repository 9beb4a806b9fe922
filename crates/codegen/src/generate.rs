use loom_core::{Children, ComponentSelection, LayoutPlan};
use serde::{Deserialize, Serialize};

use crate::error::CodegenError;
use crate::templates;
use crate::validate::validate_code;

/// Source produced for one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCode {
    pub code: String,
    /// Library components imported, first-sighted pre-order.
    pub imports: Vec<String>,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl GeneratedCode {
    fn failed(message: String) -> Self {
        Self {
            code: String::new(),
            imports: Vec::new(),
            valid: false,
            errors: Some(vec![message]),
        }
    }
}

/// Render a plan into a `GeneratedUI` component.
///
/// Never panics or returns an error: emission problems come back as an
/// invalid [`GeneratedCode`] with an empty `code`. The output is scanned
/// with [`validate_code`] and `valid` reflects that scan.
pub fn generate(plan: &LayoutPlan) -> GeneratedCode {
    let (code, imports) = match emit(plan) {
        Ok(out) => out,
        Err(e) => {
            tracing::warn!(error = %e, "code emission failed");
            return GeneratedCode::failed(e.to_string());
        }
    };

    let validation = validate_code(&code);
    GeneratedCode {
        code,
        imports,
        valid: validation.valid,
        errors: (!validation.valid).then_some(validation.errors),
    }
}

fn emit(plan: &LayoutPlan) -> Result<(String, Vec<String>), CodegenError> {
    let imports = plan.component_types();
    let header = templates::import_header(&imports);
    let wrapper = templates::layout_wrapper(&plan.structure);
    let tree = emit_nodes(&plan.components, 1, "components")?;

    Ok((templates::component_unit(&header, &wrapper, &tree), imports))
}

/// Transcribe sibling nodes at the given depth, one element per line group.
fn emit_nodes(
    nodes: &[ComponentSelection],
    indent: usize,
    path: &str,
) -> Result<String, CodegenError> {
    let pad = "  ".repeat(indent + 2);

    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let node_path = format!("{}[{}]", path, i);
            if node.component_type.is_empty() {
                return Err(CodegenError::MissingType { path: node_path });
            }
            let tag = &node.component_type;
            let attrs = emit_props(node)?;

            Ok(match &node.children {
                Some(Children::Nodes(children)) => {
                    let inner =
                        emit_nodes(children, indent + 1, &format!("{}.children", node_path))?;
                    format!("{pad}<{tag}{attrs}>\n{inner}\n{pad}</{tag}>")
                }
                Some(Children::Text(text)) => format!("{pad}<{tag}{attrs}>{text}</{tag}>"),
                None => format!("{pad}<{tag}{attrs} />"),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|lines| lines.join("\n"))
}

/// Render props as JSX attributes, with a leading space when non-empty.
fn emit_props(node: &ComponentSelection) -> Result<String, CodegenError> {
    let mut parts: Vec<String> = Vec::new();

    for (key, value) in &node.props {
        match value {
            serde_json::Value::Bool(true) => parts.push(key.clone()),
            serde_json::Value::Bool(false) => {}
            serde_json::Value::String(s) => parts.push(format!("{}=\"{}\"", key, s)),
            other => {
                let literal =
                    serde_json::to_string(other).map_err(|e| CodegenError::PropValue {
                        key: key.clone(),
                        message: e.to_string(),
                    })?;
                parts.push(format!("{}={{{}}}", key, literal));
            }
        }
    }

    if parts.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!(" {}", parts.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plan(structure: &str, components: Vec<ComponentSelection>) -> LayoutPlan {
        LayoutPlan {
            structure: structure.to_string(),
            components,
            reasoning: String::new(),
        }
    }

    fn login_plan() -> LayoutPlan {
        plan(
            "single",
            vec![ComponentSelection::new("Card")
                .prop("title", "Login")
                .nodes(vec![
                    ComponentSelection::new("Input").prop("label", "Email"),
                    ComponentSelection::new("Input").prop("label", "Password"),
                    ComponentSelection::new("Button")
                        .prop("variant", "primary")
                        .prop("fullWidth", true)
                        .text("Sign In"),
                ])],
        )
    }

    #[test]
    fn login_form_renders_expected_source() {
        let out = generate(&login_plan());
        assert!(out.valid, "errors: {:?}", out.errors);
        assert!(out.errors.is_none());
        assert_eq!(out.imports, vec!["Card", "Input", "Button"]);

        let expected = r#"import React from 'react';
import { Card, Input, Button } from '@/components/library';

export default function GeneratedUI() {
  // State management
  const [isModalOpen, setIsModalOpen] = React.useState(false);

  return (
    <div className="min-h-screen bg-gray-50 flex items-center justify-center p-4">
      <div className="w-full max-w-2xl">
      <Card title="Login">
        <Input label="Email" />
        <Input label="Password" />
        <Button variant="primary" fullWidth>Sign In</Button>
      </Card>
      </div>
    </div>
  );
}"#;
        assert_eq!(out.code, expected);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate(&login_plan());
        let b = generate(&login_plan().clone());
        assert_eq!(a.code, b.code);
        assert_eq!(a.imports, b.imports);
    }

    #[test]
    fn prop_rendering_rules() {
        let node = ComponentSelection::new("Table")
            .prop("hoverable", true)
            .prop("disabled", false)
            .prop("variant", "striped")
            .prop("height", 300)
            .prop("columns", json!([{"key": "name", "label": "Name"}]));
        assert_eq!(
            emit_props(&node).unwrap(),
            r#" hoverable variant="striped" height={300} columns={[{"key":"name","label":"Name"}]}"#
        );
        assert_eq!(emit_props(&ComponentSelection::new("Button")).unwrap(), "");
    }

    #[test]
    fn false_only_props_render_bare_tag() {
        let node = ComponentSelection::new("Modal").prop("isOpen", false);
        let tree = emit_nodes(&[node], 1, "components").unwrap();
        assert_eq!(tree, "      <Modal />");
    }

    #[test]
    fn nested_children_indent_one_level_per_depth() {
        let tree = ComponentSelection::new("Card").nodes(vec![ComponentSelection::new("Card")
            .nodes(vec![ComponentSelection::new("Button").text("Go")])]);
        let out = emit_nodes(&[tree], 1, "components").unwrap();
        assert_eq!(
            out,
            "      <Card>\n        <Card>\n          <Button>Go</Button>\n        </Card>\n      </Card>"
        );
    }

    #[test]
    fn layout_selects_wrapper() {
        let out = generate(&plan("sidebar-main", vec![ComponentSelection::new("Sidebar")]));
        assert!(out.code.contains("<div className=\"min-h-screen bg-gray-50 flex\">"));
        assert!(!out.code.contains("max-w-2xl"));
    }

    #[test]
    fn unknown_structure_falls_back_to_single() {
        let out = generate(&plan("grid", vec![ComponentSelection::new("Card")]));
        assert!(out.code.contains("max-w-2xl"));
        assert!(out.valid);
    }

    #[test]
    fn untyped_node_yields_invalid_empty_code() {
        let out = generate(&plan(
            "single",
            vec![ComponentSelection::new("Card").nodes(vec![ComponentSelection::new("")])],
        ));
        assert!(!out.valid);
        assert!(out.code.is_empty());
        assert!(out.imports.is_empty());
        let errors = out.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("components[0].children[0]"));
    }

    #[test]
    fn style_prop_marks_output_invalid() {
        let out = generate(&plan(
            "single",
            vec![ComponentSelection::new("Card").prop("style", "color: red")],
        ));
        assert!(!out.valid);
        assert_eq!(out.errors, Some(vec!["Inline styles detected".to_string()]));
        assert!(!out.code.is_empty());
    }

    #[test]
    fn serialized_shape_omits_errors_when_valid() {
        let out = generate(&login_plan());
        let value = serde_json::to_value(&out).unwrap();
        assert!(value.get("errors").is_none());
        assert_eq!(value["imports"], json!(["Card", "Input", "Button"]));
    }
}
