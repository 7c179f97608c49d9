//! Handlers for `/onboarding`: the public five-step form and staff review.
//!
//! Anyone may create a draft and edit it while it is a draft; once
//! submitted only staff can change it.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use bizdesk_core::districts::TAMIL_NADU_DISTRICTS;
use bizdesk_core::error::CoreError;
use bizdesk_core::listing::PageInfo;
use bizdesk_core::notes::AdminNote;
use bizdesk_core::onboarding::{
    ensure_editable, ensure_submittable, parse_step, OnboardingForm, OnboardingStatus,
    StepPayload, StepProgress,
};
use bizdesk_core::types::RecordId;
use bizdesk_db::models::onboarding::Onboarding;
use bizdesk_db::repositories::OnboardingRepo;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{IdPath, JsonBody, ValidQuery, ValidatedJson};
use crate::middleware::auth::{AuthAdmin, MaybeAdmin};
use crate::populate::{light_onboarding, populate_many, populate_one};
use crate::query::{ListParams, OnboardingListParams};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Number of entries in the stats "recent" list.
const RECENT_ONBOARDINGS: i64 = 5;
/// Upper bound on a staff note.
const NOTE_MAX: usize = 1000;

#[derive(Debug, Deserialize, Validate)]
pub struct StatusRequest {
    pub status: OnboardingStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OnboardingNoteRequest {
    #[serde(default)]
    pub note: Option<String>,
}

fn not_found(id: &RecordId) -> AppError {
    AppError::Core(CoreError::not_found("Onboarding", id))
}

async fn load(state: &AppState, id: &RecordId) -> AppResult<Onboarding> {
    OnboardingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Persist new form content and progress, returning the record as the
/// caller is allowed to see it.
async fn save(
    state: &AppState,
    id: &RecordId,
    form: &OnboardingForm,
    progress: &StepProgress,
    staff: bool,
) -> AppResult<Value> {
    let saved = OnboardingRepo::save_content(&state.pool, id, form, progress)
        .await?
        .ok_or_else(|| not_found(id))?;
    render(state, &saved, staff).await
}

async fn render(state: &AppState, record: &Onboarding, staff: bool) -> AppResult<Value> {
    if staff {
        populate_one(&state.pool, record).await
    } else {
        light_onboarding(record)
    }
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/onboarding/districts
pub async fn list_districts() -> ApiResponse<Vec<&'static str>> {
    ApiResponse::ok(TAMIL_NADU_DISTRICTS.to_vec())
}

/// POST /api/onboarding
pub async fn create_onboarding(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<OnboardingForm>,
) -> AppResult<ApiResponse<Value>> {
    let form = OnboardingForm::new_draft(input);
    let onboarding = OnboardingRepo::create(&state.pool, &form).await?;

    tracing::info!(onboarding_id = %onboarding.id, "Onboarding draft created");
    Ok(ApiResponse::created(
        "Onboarding created successfully",
        light_onboarding(&onboarding)?,
    ))
}

/// GET /api/onboarding
///
/// Staff see resolved reviewers and notes; anonymous callers get the light
/// projection.
pub async fn list_onboardings(
    State(state): State<AppState>,
    MaybeAdmin(admin): MaybeAdmin,
    ValidQuery(list): ValidQuery<ListParams>,
    ValidQuery(params): ValidQuery<OnboardingListParams>,
) -> AppResult<ApiResponse<Value>> {
    let filter = params.into_filter(&list)?;
    let (records, total) = tokio::try_join!(
        OnboardingRepo::list(&state.pool, &filter),
        OnboardingRepo::count(&state.pool, &filter),
    )?;

    let onboardings = if admin.is_some() {
        populate_many(&state.pool, &records).await?
    } else {
        records
            .iter()
            .map(light_onboarding)
            .collect::<AppResult<Vec<_>>>()?
    };

    Ok(ApiResponse::ok(json!({
        "onboardings": onboardings,
        "pagination": PageInfo::new(filter.page, total),
    })))
}

/// PUT /api/onboarding/{id}
///
/// Deep merge across every section.
pub async fn update_onboarding(
    State(state): State<AppState>,
    MaybeAdmin(admin): MaybeAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<OnboardingForm>,
) -> AppResult<ApiResponse<Value>> {
    let staff = admin.is_some();
    let record = load(&state, &id).await?;
    ensure_editable(record.status, staff)?;

    let mut form = record.form();
    form.apply_patch(input);
    let data = save(&state, &id, &form, &record.progress(), staff).await?;

    Ok(ApiResponse::with_message("Onboarding updated successfully", data))
}

/// PUT /api/onboarding/{id}/step/{n}
pub async fn update_step(
    State(state): State<AppState>,
    MaybeAdmin(admin): MaybeAdmin,
    Path((raw_id, raw_step)): Path<(String, String)>,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<ApiResponse<Value>> {
    let id = RecordId::parse(&raw_id)?;
    let step = parse_step(&raw_step)?;
    let staff = admin.is_some();

    let record = load(&state, &id).await?;
    ensure_editable(record.status, staff)?;

    let payload = StepPayload::from_json(step, body)?;
    let mut form = record.form();
    form.apply_step(payload);
    let mut progress = record.progress();
    progress.complete_step(step);

    let data = save(&state, &id, &form, &progress, staff).await?;
    tracing::debug!(onboarding_id = %id, step, "Onboarding step saved");
    Ok(ApiResponse::with_message(format!("Step {step} updated successfully"), data))
}

/// POST /api/onboarding/{id}/submit
pub async fn submit_onboarding(
    State(state): State<AppState>,
    MaybeAdmin(admin): MaybeAdmin,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<Value>> {
    let record = load(&state, &id).await?;
    ensure_submittable(record.status, &record.progress())?;

    // Another request may have submitted between the load and this update.
    let submitted = OnboardingRepo::submit(&state.pool, &id).await?.ok_or_else(|| {
        AppError::Core(CoreError::InvalidState(
            "Onboarding has already been submitted".into(),
        ))
    })?;

    tracing::info!(onboarding_id = %id, "Onboarding submitted");
    let data = render(&state, &submitted, admin.is_some()).await?;
    Ok(ApiResponse::with_message("Onboarding submitted successfully", data))
}

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

/// GET /api/onboarding/stats
pub async fn onboarding_stats(
    State(state): State<AppState>,
    AuthAdmin(_admin): AuthAdmin,
) -> AppResult<ApiResponse<Value>> {
    let (counts, recent) = tokio::try_join!(
        OnboardingRepo::status_counts(&state.pool),
        OnboardingRepo::recent(&state.pool, RECENT_ONBOARDINGS),
    )?;

    let mut status_counts: BTreeMap<&str, i64> =
        OnboardingStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    let mut total = 0;
    for row in &counts {
        total += row.count;
        if let Some(slot) = row.key.as_deref().and_then(|k| status_counts.get_mut(k)) {
            *slot = row.count;
        }
    }

    Ok(ApiResponse::ok(json!({
        "totalOnboardings": total,
        "statusCounts": status_counts,
        "recentOnboardings": recent,
    })))
}

/// GET /api/onboarding/{id}
pub async fn get_onboarding(
    State(state): State<AppState>,
    AuthAdmin(_admin): AuthAdmin,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<Value>> {
    let record = load(&state, &id).await?;
    Ok(ApiResponse::ok(populate_one(&state.pool, &record).await?))
}

/// PUT /api/onboarding/{id}/status
///
/// Any of the five statuses may be set; there is no transition table.
pub async fn update_status(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<StatusRequest>,
) -> AppResult<ApiResponse<Value>> {
    let record = OnboardingRepo::update_status(&state.pool, &id, input.status, &admin.id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    tracing::info!(
        onboarding_id = %id,
        admin_id = %admin.id,
        status = input.status.as_str(),
        "Onboarding status changed",
    );
    Ok(ApiResponse::with_message(
        "Status updated successfully",
        populate_one(&state.pool, &record).await?,
    ))
}

/// POST /api/onboarding/{id}/notes
pub async fn add_onboarding_note(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<OnboardingNoteRequest>,
) -> AppResult<ApiResponse<Value>> {
    let note = input
        .note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("Note is required".into())))?;
    if note.chars().count() > NOTE_MAX {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Note cannot exceed {NOTE_MAX} characters"
        ))));
    }

    let note = AdminNote::new(note.to_string(), admin.id);
    let record = OnboardingRepo::add_note(&state.pool, &id, &note)
        .await?
        .ok_or_else(|| not_found(&id))?;

    Ok(ApiResponse::with_message(
        "Note added successfully",
        populate_one(&state.pool, &record).await?,
    ))
}

/// DELETE /api/onboarding/{id}
pub async fn delete_onboarding(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<()>> {
    if !OnboardingRepo::delete(&state.pool, &id).await? {
        return Err(not_found(&id));
    }
    tracing::info!(onboarding_id = %id, admin_id = %admin.id, "Onboarding deleted");
    Ok(ApiResponse::message("Onboarding deleted successfully"))
}
