//! loom-core: the fixed component registry and the layout plan model.
//!
//! A layout plan is the structured description the planner produces:
//! which library components to use, nested how, under which layout
//! topology. This crate owns the plan types, parses planner output into
//! them, and validates plans against the registry before any code is
//! generated.
//!
//! # Public API
//!
//! - [`registry`] -- allow-listed component names and [`Layout`] tags
//! - [`LayoutPlan`], [`ComponentSelection`], [`Children`] -- plan tree
//! - [`parse_plan()`] -- decode planner text (fenced or bare JSON)
//! - [`validate_plan()`] -- registry check, returns a [`Validation`]

pub mod error;
pub mod plan;
pub mod registry;
pub mod validate;

pub use error::PlanError;
pub use plan::{parse_plan, strip_code_fences, Children, ComponentSelection, LayoutPlan};
pub use registry::{is_allowed_component, Layout, ALLOWED_COMPONENTS};
pub use validate::{validate_plan, Validation};
