//! Handlers for `/demo`: public demo booking plus staff pipeline management.

use axum::extract::State;
use bizdesk_core::error::CoreError;
use bizdesk_core::lead::{CurrentSoftware, DemoBusinessType, DemoPriority, DemoResponse, DemoStatus};
use bizdesk_core::listing::PageInfo;
use bizdesk_core::notes::{AdminNote, LEAD_NOTE_MAX, LEAD_NOTE_MIN};
use bizdesk_core::types::{RecordId, Timestamp};
use bizdesk_core::validation::{
    email_normalized, not_blank, note_text, nullable, trimmed, trimmed_opt, PHONE_RE,
};
use bizdesk_db::models::dashboard::count_map;
use bizdesk_db::models::demo::{CreateDemoRequest, UpdateDemoRequest};
use bizdesk_db::repositories::{DashboardRepo, DemoRepo};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{IdPath, ValidQuery, ValidatedJson};
use crate::handlers::NoteRequest;
use crate::middleware::auth::AuthAdmin;
use crate::populate::{populate_many, populate_one};
use crate::query::{DateRangeParams, DemoListParams, ListParams};
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDemoBody {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2-100 characters"))]
    pub name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = 200, message = "Business name must be between 2-200 characters"))]
    pub business: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(regex(path = *PHONE_RE, message = "Please provide a valid 10-digit phone number"))]
    pub phone: String,
    #[serde(deserialize_with = "email_normalized")]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    pub business_type: DemoBusinessType,
    #[serde(default)]
    pub current_software: CurrentSoftware,
    #[serde(deserialize_with = "trimmed")]
    #[validate(custom(function = not_blank, message = "Preferred time is required"))]
    pub preferred_time: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDemoBody {
    #[serde(default)]
    pub status: Option<DemoStatus>,
    #[serde(default)]
    pub demo_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(max = 500, message = "Demo notes cannot exceed 500 characters"))]
    pub demo_notes: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_to: Option<Option<RecordId>>,
    #[serde(default)]
    pub customer_response: Option<DemoResponse>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(max = 500, message = "Customer feedback cannot exceed 500 characters"))]
    pub customer_feedback: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Conversion value must be a positive number"))]
    pub conversion_value: Option<f64>,
    #[serde(default)]
    pub follow_up_date: Option<Timestamp>,
    #[serde(default)]
    pub priority: Option<DemoPriority>,
}

fn not_found(id: &RecordId) -> AppError {
    AppError::Core(CoreError::not_found("Demo request", id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/demo
pub async fn create_demo(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateDemoBody>,
) -> AppResult<ApiResponse<Value>> {
    let demo = DemoRepo::create(
        &state.pool,
        &CreateDemoRequest {
            name: input.name,
            business: input.business,
            phone: input.phone,
            email: input.email,
            business_type: input.business_type,
            current_software: input.current_software,
            preferred_time: input.preferred_time,
        },
    )
    .await?;

    tracing::info!(demo_id = %demo.id, "Demo request received");
    Ok(ApiResponse::created(
        "Demo request submitted successfully",
        json!({ "demoRequest": demo }),
    ))
}

/// GET /api/demo
pub async fn list_demos(
    State(state): State<AppState>,
    AuthAdmin(_admin): AuthAdmin,
    ValidQuery(list): ValidQuery<ListParams>,
    ValidQuery(params): ValidQuery<DemoListParams>,
) -> AppResult<ApiResponse<Value>> {
    let filter = params.into_filter(&list)?;
    let (demos, total, status_counts, type_counts) = tokio::try_join!(
        DemoRepo::list(&state.pool, &filter),
        DemoRepo::count(&state.pool, &filter),
        DemoRepo::status_counts(&state.pool),
        DemoRepo::business_type_counts(&state.pool),
    )?;

    let demos = populate_many(&state.pool, &demos).await?;
    Ok(ApiResponse::ok(json!({
        "demos": demos,
        "pagination": PageInfo::new(filter.page, total),
        "statusCounts": count_map(status_counts),
        "businessTypeCounts": count_map(type_counts),
    })))
}

/// GET /api/demo/analytics
pub async fn demo_analytics(
    State(state): State<AppState>,
    AuthAdmin(_admin): AuthAdmin,
    ValidQuery(params): ValidQuery<DateRangeParams>,
) -> AppResult<ApiResponse<Value>> {
    let analytics = DashboardRepo::demo_analytics(&state.pool, params.range()).await?;
    Ok(ApiResponse::ok(json!({ "analytics": analytics })))
}

/// GET /api/demo/{id}
pub async fn get_demo(
    State(state): State<AppState>,
    AuthAdmin(_admin): AuthAdmin,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<Value>> {
    let demo = DemoRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    let demo = populate_one(&state.pool, &demo).await?;
    Ok(ApiResponse::ok(json!({ "demo": demo })))
}

/// PUT /api/demo/{id}
pub async fn update_demo(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateDemoBody>,
) -> AppResult<ApiResponse<Value>> {
    let update = UpdateDemoRequest {
        status: input.status,
        demo_date: input.demo_date,
        demo_notes: input.demo_notes,
        assigned_to: input.assigned_to,
        customer_response: input.customer_response,
        customer_feedback: input.customer_feedback,
        conversion_value: input.conversion_value,
        follow_up_date: input.follow_up_date,
        priority: input.priority,
    };
    let demo = DemoRepo::update(&state.pool, &id, &update)
        .await?
        .ok_or_else(|| not_found(&id))?;

    tracing::info!(demo_id = %id, admin_id = %admin.id, status = ?demo.status, "Demo request updated");
    let demo = populate_one(&state.pool, &demo).await?;
    Ok(ApiResponse::with_message(
        "Demo request updated successfully",
        json!({ "demo": demo }),
    ))
}

/// POST /api/demo/{id}/notes
pub async fn add_demo_note(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<NoteRequest>,
) -> AppResult<ApiResponse<Value>> {
    let note = note_text(&input.note, LEAD_NOTE_MIN, LEAD_NOTE_MAX)?;
    let demo = DemoRepo::add_note(&state.pool, &id, &AdminNote::new(note, admin.id))
        .await?
        .ok_or_else(|| not_found(&id))?;

    let demo = populate_one(&state.pool, &demo).await?;
    Ok(ApiResponse::with_message(
        "Admin note added successfully",
        json!({ "demo": demo }),
    ))
}

/// DELETE /api/demo/{id}
pub async fn delete_demo(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<()>> {
    if !DemoRepo::delete(&state.pool, &id).await? {
        return Err(not_found(&id));
    }
    tracing::info!(demo_id = %id, admin_id = %admin.id, "Demo request deleted");
    Ok(ApiResponse::message("Demo request deleted successfully"))
}
