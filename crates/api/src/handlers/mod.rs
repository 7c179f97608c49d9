//! Request handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod client;
pub mod contact;
pub mod dashboard;
pub mod demo;
pub mod onboarding;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

/// Body of the lead note endpoints. Length is checked after trimming.
#[derive(Debug, Deserialize, Validate)]
pub struct NoteRequest {
    #[serde(default)]
    pub note: String,
}

/// Fallback for unmatched routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Route not found" })),
    )
}
