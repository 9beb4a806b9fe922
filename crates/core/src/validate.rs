//! Plan validation against the component registry.
//!
//! Validation never fails; it reports. Every problem found in one pass is
//! collected so a single response can surface all nested errors.

use serde::{Deserialize, Serialize};

use crate::plan::{ComponentSelection, LayoutPlan};
use crate::registry::{is_allowed_component, Layout};

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl Validation {
    /// Build from collected errors; valid iff there are none.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Check a plan's layout tag and every component type, recursively.
pub fn validate_plan(plan: &LayoutPlan) -> Validation {
    let mut errors = Vec::new();

    if Layout::from_tag(&plan.structure).is_none() {
        errors.push(format!("Invalid structure: {}", plan.structure));
    }

    for component in &plan.components {
        validate_component(component, &mut errors);
    }

    Validation::from_errors(errors)
}

fn validate_component(component: &ComponentSelection, errors: &mut Vec<String>) {
    if component.component_type.is_empty() {
        errors.push("Component missing type".to_string());
        return;
    }

    if !is_allowed_component(&component.component_type) {
        errors.push(format!("Invalid component: {}", component.component_type));
    }

    // Keep descending past an invalid type so nested problems show up too.
    for child in component.child_nodes() {
        validate_component(child, errors);
    }
}
