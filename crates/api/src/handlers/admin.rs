//! Handlers for `/admin/admins` (super-admin only account management).

use axum::extract::State;
use bizdesk_core::error::CoreError;
use bizdesk_core::listing::PageInfo;
use bizdesk_core::roles::AdminRole;
use bizdesk_core::validation::{email_normalized_opt, trimmed_opt, USERNAME_RE};
use bizdesk_db::models::admin::{AdminResponse, UpdateAdmin};
use bizdesk_db::repositories::{AdminRepo, ClientRepo, ContactRepo, DemoRepo};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{as_duplicate, AppError, AppResult};
use crate::extract::{IdPath, ValidQuery, ValidatedJson};
use crate::handlers::auth::{ensure_unique_admin, register_admin, SignupRequest};
use crate::middleware::rbac::RequireSuperAdmin;
use crate::query::{AdminListParams, ListParams};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminRequest {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(
        length(min = 3, max = 30, message = "Username must be between 3-30 characters"),
        regex(path = *USERNAME_RE, message = "Username can only contain letters and numbers")
    )]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "email_normalized_opt")]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<AdminRole>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// GET /api/admin/admins
pub async fn list_admins(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    ValidQuery(list): ValidQuery<ListParams>,
    ValidQuery(params): ValidQuery<AdminListParams>,
) -> AppResult<ApiResponse<Value>> {
    let filter = params.into_filter(&list)?;
    let (admins, total) = tokio::try_join!(
        AdminRepo::list(&state.pool, &filter),
        AdminRepo::count(&state.pool, &filter),
    )?;

    let admins: Vec<AdminResponse> = admins.into_iter().map(AdminResponse::from).collect();
    Ok(ApiResponse::ok(json!({
        "admins": admins,
        "pagination": PageInfo::new(filter.page, total),
    })))
}

/// POST /api/admin/admins
pub async fn create_admin(
    State(state): State<AppState>,
    RequireSuperAdmin(creator): RequireSuperAdmin,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> AppResult<ApiResponse<Value>> {
    let admin = register_admin(&state.pool, input).await?;
    tracing::info!(admin_id = %admin.id, created_by = %creator.id, "Admin created by super admin");
    Ok(ApiResponse::created(
        "Admin created successfully",
        json!({ "admin": AdminResponse::from(admin) }),
    ))
}

/// PUT /api/admin/admins/{id}
pub async fn update_admin(
    State(state): State<AppState>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateAdminRequest>,
) -> AppResult<ApiResponse<Value>> {
    AdminRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Admin", &id)))?;

    ensure_unique_admin(
        &state.pool,
        input.username.as_deref(),
        input.email.as_deref(),
        Some(&id),
    )
    .await?;

    let update = UpdateAdmin {
        username: input.username,
        email: input.email,
        role: input.role,
        is_active: input.is_active,
    };
    let updated = AdminRepo::update(&state.pool, &id, &update)
        .await
        .map_err(as_duplicate)?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Admin", &id)))?;

    Ok(ApiResponse::with_message(
        "Admin updated successfully",
        json!({ "admin": AdminResponse::from(updated) }),
    ))
}

/// DELETE /api/admin/admins/{id}
///
/// Hard delete, then clear every assignment pointing at the removed admin.
/// Note authorship is left in place and renders as `null`.
pub async fn delete_admin(
    State(state): State<AppState>,
    RequireSuperAdmin(current): RequireSuperAdmin,
    IdPath(id): IdPath,
) -> AppResult<ApiResponse<()>> {
    if current.id == id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot delete your own account".into(),
        )));
    }

    if !AdminRepo::delete(&state.pool, &id).await? {
        return Err(AppError::Core(CoreError::not_found("Admin", &id)));
    }

    let contacts = ContactRepo::unassign_admin(&state.pool, &id).await?;
    let demos = DemoRepo::unassign_admin(&state.pool, &id).await?;
    let clients = ClientRepo::unassign_sales_rep(&state.pool, &id).await?;
    tracing::info!(
        admin_id = %id,
        deleted_by = %current.id,
        contacts,
        demos,
        clients,
        "Admin deleted and assignments cleared",
    );

    Ok(ApiResponse::message("Admin deleted successfully"))
}
