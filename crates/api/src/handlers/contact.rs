//! Handlers for `/contact`: public contact form plus staff triage.

use axum::extract::State;
use bizdesk_core::error::CoreError;
use bizdesk_core::lead::{ContactPriority, ContactResponse, ContactStatus};
use bizdesk_core::listing::PageInfo;
use bizdesk_core::notes::{AdminNote, LEAD_NOTE_MAX, LEAD_NOTE_MIN};
use bizdesk_core::types::RecordId;
use bizdesk_core::validation::{
    email_normalized, note_text, nullable, trimmed, trimmed_opt, PHONE_RE,
};
use bizdesk_db::models::contact::{CreateContactMessage, UpdateContactMessage};
use bizdesk_db::models::dashboard::count_map;
use bizdesk_db::repositories::ContactRepo;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{IdPath, ValidQuery, ValidatedJson};
use crate::handlers::NoteRequest;
use crate::middleware::auth::AuthAdmin;
use crate::populate::{populate_many, populate_one};
use crate::query::{ContactListParams, ListParams};
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContactRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2-100 characters"))]
    pub name: String,
    #[serde(deserialize_with = "email_normalized")]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(regex(path = *PHONE_RE, message = "Please provide a valid 10-digit phone number"))]
    pub phone: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 5, max = 200, message = "Subject must be between 5-200 characters"))]
    pub subject: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 10, max = 1000, message = "Message must be between 10-1000 characters"))]
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    #[serde(default)]
    pub status: Option<ContactStatus>,
    #[serde(default)]
    pub priority: Option<ContactPriority>,
    #[serde(default, deserialize_with = "nullable")]
    pub assigned_to: Option<Option<RecordId>>,
    #[serde(default)]
    pub customer_response: Option<ContactResponse>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(max = 500, message = "Customer feedback cannot exceed 500 characters"))]
    pub customer_feedback: Option<String>,
    #[serde(default)]
    pub issue_solved: Option<bool>,
}

fn not_found(id: &RecordId) -> AppError {
    AppError::Core(CoreError::not_found("Contact message", id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/contact
pub async fn create_contact(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateContactRequest>,
) -> AppResult<ApiResponse<Value>> {
    let contact = ContactRepo::create(
        &state.pool,
        &CreateContactMessage {
            name: input.name,
            email: input.email,
            phone: input.phone,
            subject: input.subject,
            message: input.message,
        },
    )
    .await?;

    tracing::info!(contact_id = %contact.id, "Contact message received");
    Ok(ApiResponse::created(
        "Contact message submitted successfully",
        json!({ "contactMessage": contact }),
    ))
}

/// GET /api/contact
pub async fn list_contacts(
    State(state): State<AppState>,
    AuthAdmin(_admin): AuthAdmin,
    ValidQuery(list): ValidQuery<ListParams>,
    ValidQuery(params): ValidQuery<ContactListParams>,
) -> AppResult<ApiResponse<Value>> {
    let filter = params.into_filter(&list)?;
    let (contacts, total, counts) = tokio::try_join!(
        ContactRepo::list(&state.pool, &filter),
        ContactRepo::count(&state.pool, &filter),
        ContactRepo::status_counts(&state.pool),
    )?;

    let contacts = populate_many(&state.pool, &contacts).await?;
    Ok(ApiResponse::ok(json!({
        "contacts": contacts,
        "pagination": PageInfo::new(filter.page, total),
        "statusCounts": count_map(counts),
    })))
}

/// GET /api/contact/{id}
pub async fn get_contact(
    State(state): State<AppState>,
    AuthAdmin(_admin): AuthAdmin,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<Value>> {
    let contact = ContactRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    let contact = populate_one(&state.pool, &contact).await?;
    Ok(ApiResponse::ok(json!({ "contact": contact })))
}

/// PUT /api/contact/{id}
pub async fn update_contact(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateContactRequest>,
) -> AppResult<ApiResponse<Value>> {
    let update = UpdateContactMessage {
        status: input.status,
        priority: input.priority,
        assigned_to: input.assigned_to,
        customer_response: input.customer_response,
        customer_feedback: input.customer_feedback,
        issue_solved: input.issue_solved,
    };
    let contact = ContactRepo::update(&state.pool, &id, &update)
        .await?
        .ok_or_else(|| not_found(&id))?;

    tracing::info!(contact_id = %id, admin_id = %admin.id, "Contact message updated");
    let contact = populate_one(&state.pool, &contact).await?;
    Ok(ApiResponse::with_message(
        "Contact message updated successfully",
        json!({ "contact": contact }),
    ))
}

/// POST /api/contact/{id}/notes
pub async fn add_contact_note(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<NoteRequest>,
) -> AppResult<ApiResponse<Value>> {
    let note = note_text(&input.note, LEAD_NOTE_MIN, LEAD_NOTE_MAX)?;
    let contact = ContactRepo::add_note(&state.pool, &id, &AdminNote::new(note, admin.id))
        .await?
        .ok_or_else(|| not_found(&id))?;

    let contact = populate_one(&state.pool, &contact).await?;
    Ok(ApiResponse::with_message(
        "Admin note added successfully",
        json!({ "contact": contact }),
    ))
}

/// DELETE /api/contact/{id}
pub async fn delete_contact(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<()>> {
    if !ContactRepo::delete(&state.pool, &id).await? {
        return Err(not_found(&id));
    }
    tracing::info!(contact_id = %id, admin_id = %admin.id, "Contact message deleted");
    Ok(ApiResponse::message("Contact message deleted successfully"))
}
