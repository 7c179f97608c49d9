//! Handlers for `/client`: the eight-section client record.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use bizdesk_core::client::{
    estimated_monthly_revenue, ClientInput, ClientProfile, ClientStatus, InternalNote,
    IssuePriority, OngoingIssue, PaymentUpdate, INTERNAL_NOTE_MAX, INTERNAL_NOTE_MIN, ISSUE_MAX,
    ISSUE_MIN, UPCOMING_PAYMENT_DAYS, UPCOMING_PAYMENT_LIMIT,
};
use bizdesk_core::error::CoreError;
use bizdesk_core::listing::PageInfo;
use bizdesk_core::types::RecordId;
use bizdesk_core::validation::note_text;
use bizdesk_db::models::client::ClientDashboardStats;
use bizdesk_db::models::dashboard::count_map;
use bizdesk_db::repositories::ClientRepo;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{as_duplicate, AppError, AppResult};
use crate::extract::{IdPath, ValidQuery, ValidatedJson};
use crate::middleware::auth::AuthAdmin;
use crate::populate::{populate_many, populate_one};
use crate::query::{ClientListParams, DeleteParams, ListParams};
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InternalNoteRequest {
    pub note: String,
    #[serde(default = "default_private")]
    pub is_private: bool,
}

fn default_private() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    pub issue: String,
    #[serde(default)]
    pub priority: IssuePriority,
    #[serde(default)]
    pub assigned_to: Option<RecordId>,
}

fn not_found(id: impl ToString) -> AppError {
    AppError::Core(CoreError::not_found("Client", id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/client
pub async fn create_client(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    ValidatedJson(input): ValidatedJson<ClientInput>,
) -> AppResult<ApiResponse<Value>> {
    let profile = ClientProfile::from_input(input, &admin.id)?;
    let client = ClientRepo::create(&state.pool, &profile)
        .await
        .map_err(as_duplicate)?;

    tracing::info!(client_id = %client.client_id, admin_id = %admin.id, "Client created");
    let client = populate_one(&state.pool, &client).await?;
    Ok(ApiResponse::created(
        "Client created successfully",
        json!({ "client": client }),
    ))
}

/// GET /api/client
pub async fn list_clients(
    State(state): State<AppState>,
    AuthAdmin(_admin): AuthAdmin,
    ValidQuery(list): ValidQuery<ListParams>,
    ValidQuery(params): ValidQuery<ClientListParams>,
) -> AppResult<ApiResponse<Value>> {
    let filter = params.into_filter(&list)?;
    let (clients, total, status_counts, cycle_counts, upcoming) = tokio::try_join!(
        ClientRepo::list(&state.pool, &filter),
        ClientRepo::count(&state.pool, &filter),
        ClientRepo::status_counts(&state.pool),
        ClientRepo::billing_cycle_counts(&state.pool),
        ClientRepo::upcoming_payments(&state.pool, UPCOMING_PAYMENT_DAYS, UPCOMING_PAYMENT_LIMIT),
    )?;

    let clients = populate_many(&state.pool, &clients).await?;
    Ok(ApiResponse::ok(json!({
        "clients": clients,
        "pagination": PageInfo::new(filter.page, total),
        "statusCounts": count_map(status_counts),
        "billingCycleCounts": count_map(cycle_counts),
        "upcomingPayments": upcoming,
    })))
}

/// GET /api/client/dashboard-stats
pub async fn client_dashboard_stats(
    State(state): State<AppState>,
    AuthAdmin(_admin): AuthAdmin,
) -> AppResult<ApiResponse<Value>> {
    let pool = &state.pool;
    let (total, active, suspended, overdue, with_issues, billings) = tokio::try_join!(
        ClientRepo::count_by_status(pool, None),
        ClientRepo::count_by_status(pool, Some(ClientStatus::Active)),
        ClientRepo::count_by_status(pool, Some(ClientStatus::Suspended)),
        ClientRepo::count_overdue(pool),
        ClientRepo::count_with_issues(pool),
        ClientRepo::active_billings(pool),
    )?;

    let stats = ClientDashboardStats {
        total_clients: total,
        active_clients: active,
        suspended_clients: suspended,
        overdue_payments: overdue,
        clients_with_issues: with_issues,
        estimated_monthly_revenue: estimated_monthly_revenue(&billings),
    };
    Ok(ApiResponse::ok(json!({ "stats": stats })))
}

/// GET /api/client/client-id/{client_id}
pub async fn get_client_by_client_id(
    State(state): State<AppState>,
    AuthAdmin(_admin): AuthAdmin,
    Path(client_id): Path<String>,
) -> AppResult<ApiResponse<Value>> {
    let client = ClientRepo::find_by_client_id(&state.pool, client_id.trim())
        .await?
        .ok_or_else(|| not_found(&client_id))?;
    let client = populate_one(&state.pool, &client).await?;
    Ok(ApiResponse::ok(json!({ "client": client })))
}

/// GET /api/client/{id}
pub async fn get_client(
    State(state): State<AppState>,
    AuthAdmin(_admin): AuthAdmin,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<Value>> {
    let client = ClientRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    let client = populate_one(&state.pool, &client).await?;
    Ok(ApiResponse::ok(json!({ "client": client })))
}

/// PUT /api/client/{id}
///
/// Section-wise merge of the provided fields. Read-modify-write; concurrent
/// edits are last-writer-wins, but note and issue logs are never lost.
pub async fn update_client(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<ClientInput>,
) -> AppResult<ApiResponse<Value>> {
    let mut profile = ClientRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(&id))?
        .into_profile();
    profile.apply_patch(input)?;

    let client = ClientRepo::save(&state.pool, &id, &profile)
        .await
        .map_err(as_duplicate)?
        .ok_or_else(|| not_found(&id))?;

    tracing::info!(client_id = %client.client_id, admin_id = %admin.id, "Client updated");
    let client = populate_one(&state.pool, &client).await?;
    Ok(ApiResponse::with_message(
        "Client updated successfully",
        json!({ "client": client }),
    ))
}

/// POST /api/client/{id}/notes
pub async fn add_internal_note(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<InternalNoteRequest>,
) -> AppResult<ApiResponse<Value>> {
    let note = InternalNote {
        note: note_text(&input.note, INTERNAL_NOTE_MIN, INTERNAL_NOTE_MAX)?,
        added_by: admin.id,
        added_at: chrono::Utc::now(),
        is_private: input.is_private,
    };
    let client = ClientRepo::add_internal_note(&state.pool, &id, &note)
        .await?
        .ok_or_else(|| not_found(&id))?;

    let client = populate_one(&state.pool, &client).await?;
    Ok(ApiResponse::with_message(
        "Internal note added successfully",
        json!({ "client": client }),
    ))
}

/// POST /api/client/{id}/issues
pub async fn add_ongoing_issue(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<IssueRequest>,
) -> AppResult<ApiResponse<Value>> {
    let issue = note_text(&input.issue, ISSUE_MIN, ISSUE_MAX).map_err(|_| {
        CoreError::Validation(format!("Issue must be between {ISSUE_MIN}-{ISSUE_MAX} characters"))
    })?;
    let issue = OngoingIssue {
        issue,
        priority: input.priority,
        assigned_to: Some(input.assigned_to.unwrap_or(admin.id)),
        reported_date: chrono::Utc::now(),
    };
    let client = ClientRepo::add_ongoing_issue(&state.pool, &id, &issue)
        .await?
        .ok_or_else(|| not_found(&id))?;

    let client = populate_one(&state.pool, &client).await?;
    Ok(ApiResponse::with_message(
        "Ongoing issue added successfully",
        json!({ "client": client }),
    ))
}

/// PUT /api/client/{id}/payment
pub async fn update_payment(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<PaymentUpdate>,
) -> AppResult<ApiResponse<Value>> {
    let client = ClientRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    let mut billing = client.billing.0;
    billing.apply_payment(input);

    let client = ClientRepo::save_billing(&state.pool, &id, &billing)
        .await?
        .ok_or_else(|| not_found(&id))?;

    tracing::info!(client_id = %client.client_id, admin_id = %admin.id, "Payment recorded");
    let client = populate_one(&state.pool, &client).await?;
    Ok(ApiResponse::with_message(
        "Payment information updated successfully",
        json!({ "client": client }),
    ))
}

/// DELETE /api/client/{id}?permanent=true
///
/// Soft delete (status `terminated`) unless `permanent` is set.
pub async fn delete_client(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
    ValidQuery(params): ValidQuery<DeleteParams>,
) -> AppResult<Response> {
    if params.permanent {
        if !ClientRepo::delete(&state.pool, &id).await? {
            return Err(not_found(&id));
        }
        tracing::info!(client = %id, admin_id = %admin.id, "Client permanently deleted");
        return Ok(ApiResponse::message("Client permanently deleted").into_response());
    }

    let client = ClientRepo::set_status(&state.pool, &id, ClientStatus::Terminated)
        .await?
        .ok_or_else(|| not_found(&id))?;

    tracing::info!(client = %id, admin_id = %admin.id, "Client terminated");
    let client = populate_one(&state.pool, &client).await?;
    Ok(ApiResponse::with_message(
        "Client status changed to terminated",
        json!({ "client": client }),
    )
    .into_response())
}
