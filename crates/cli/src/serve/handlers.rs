//! HTTP route handlers: health, registry, generate, validate, render.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use loom_agent::{explain, GenerationRequest, OrchestrationResult, MISSING_INTENT};
use loom_codegen::generate;
use loom_core::registry::{documented_props, Layout, ALLOWED_COMPONENTS};
use loom_core::{validate_plan, LayoutPlan};

use super::json_error;
use super::state::AppState;

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// GET /registry
pub(crate) async fn handle_registry() -> impl IntoResponse {
    let components: Vec<serde_json::Value> = ALLOWED_COMPONENTS
        .iter()
        .map(|name| {
            serde_json::json!({
                "name": name,
                "props": documented_props(name).unwrap_or_default(),
            })
        })
        .collect();

    let layouts: Vec<serde_json::Value> = Layout::ALL
        .iter()
        .map(|layout| {
            serde_json::json!({
                "id": layout.as_str(),
                "description": layout.description(),
            })
        })
        .collect();

    let response = serde_json::json!({
        "components": components,
        "layouts": layouts,
    });
    (StatusCode::OK, Json(response))
}

/// POST /api/generate
pub(crate) async fn handle_generate(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: GenerationRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            return json_error(StatusCode::BAD_REQUEST, &format!("invalid request body: {}", e))
                .into_response()
        }
    };

    if request.user_intent.trim().is_empty() {
        return json_error(StatusCode::BAD_REQUEST, MISSING_INTENT).into_response();
    }

    let result = state.orchestrator.run(&request).await;
    let status = match result {
        OrchestrationResult::Success(_) => StatusCode::OK,
        OrchestrationResult::Failure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(result)).into_response()
}

/// POST /api/validate
pub(crate) async fn handle_validate(body: Bytes) -> Response {
    let plan = match parse_plan_body(&body) {
        Ok(plan) => plan,
        Err(response) => return response,
    };
    (StatusCode::OK, Json(validate_plan(&plan))).into_response()
}

/// POST /api/render
///
/// Offline generation from a caller-supplied plan. 422 when the plan
/// fails validation.
pub(crate) async fn handle_render(body: Bytes) -> Response {
    let plan = match parse_plan_body(&body) {
        Ok(plan) => plan,
        Err(response) => return response,
    };

    let validation = validate_plan(&plan);
    if !validation.valid {
        let response = serde_json::json!({
            "success": false,
            "error": format!("Plan validation failed: {}", validation.errors.join(", ")),
            "errors": validation.errors,
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(response)).into_response();
    }

    let code = generate(&plan);
    let explanation = explain(&plan, &code);
    let response = serde_json::json!({
        "success": true,
        "data": {
            "code": code,
            "explanation": explanation,
        },
    });
    (StatusCode::OK, Json(response)).into_response()
}

fn parse_plan_body(body: &[u8]) -> Result<LayoutPlan, Response> {
    serde_json::from_slice(body).map_err(|e| {
        json_error(StatusCode::BAD_REQUEST, &format!("invalid plan: {}", e)).into_response()
    })
}
