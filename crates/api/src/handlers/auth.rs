//! Handlers for the `/auth` resource (signup, login, refresh, profile).

use axum::extract::State;
use bizdesk_core::error::CoreError;
use bizdesk_core::roles::AdminRole;
use bizdesk_core::types::{RecordId, Timestamp};
use bizdesk_core::validation::{
    email_normalized, email_normalized_opt, password_strength, trimmed, trimmed_opt, USERNAME_RE,
};
use bizdesk_db::models::admin::{Admin, AdminResponse, CreateAdmin, UpdateAdmin};
use bizdesk_db::repositories::AdminRepo;
use bizdesk_db::DbPool;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::auth::jwt::{generate_token_pair, validate_token, TokenKind};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup` and `POST /admin/admins`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(
        length(min = 3, max = 30, message = "Username must be between 3-30 characters"),
        regex(path = *USERNAME_RE, message = "Username can only contain letters and numbers")
    )]
    pub username: String,
    #[serde(deserialize_with = "email_normalized")]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(custom(function = password_strength))]
    pub password: String,
    #[serde(default)]
    pub role: Option<AdminRole>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(deserialize_with = "email_normalized")]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(
        length(min = 3, max = 30, message = "Username must be between 3-30 characters"),
        regex(path = *USERNAME_RE, message = "Username can only contain letters and numbers")
    )]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "email_normalized_opt")]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(custom(function = password_strength))]
    pub new_password: String,
}

/// Admin identity embedded in auth responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub role: AdminRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<Timestamp>,
}

impl From<&Admin> for AdminSummary {
    fn from(a: &Admin) -> Self {
        Self {
            id: a.id.clone(),
            username: a.username.clone(),
            email: a.email.clone(),
            role: a.role,
            last_login: a.last_login,
        }
    }
}

/// Successful authentication payload returned by signup, login and refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub admin: AdminSummary,
    pub token: String,
    pub refresh_token: String,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Reject a username or email already held by another admin.
pub(crate) async fn ensure_unique_admin(
    pool: &DbPool,
    username: Option<&str>,
    email: Option<&str>,
    exclude: Option<&RecordId>,
) -> AppResult<()> {
    if username.is_none() && email.is_none() {
        return Ok(());
    }
    if let Some(existing) = AdminRepo::find_conflict(pool, username, email, exclude).await? {
        let field = if username == Some(existing.username.as_str()) {
            "username"
        } else {
            "email"
        };
        return Err(AppError::Core(CoreError::Duplicate {
            field: field.into(),
        }));
    }
    Ok(())
}

/// Validate uniqueness, hash the password and insert the admin.
pub(crate) async fn register_admin(pool: &DbPool, input: SignupRequest) -> AppResult<Admin> {
    ensure_unique_admin(pool, Some(&input.username), Some(&input.email), None).await?;

    let password_hash = hash_password_blocking(input.password).await?;
    let admin = AdminRepo::create(
        pool,
        &CreateAdmin {
            username: input.username,
            email: input.email,
            password_hash,
            role: input.role.unwrap_or_default(),
        },
    )
    .await
    .map_err(crate::error::as_duplicate)?;

    tracing::info!(admin_id = %admin.id, role = admin.role.as_str(), "Admin registered");
    Ok(admin)
}

fn auth_payload(admin: &Admin, state: &AppState) -> AppResult<AuthPayload> {
    let pair = generate_token_pair(&admin.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;
    Ok(AuthPayload {
        admin: AdminSummary::from(admin),
        token: pair.access_token,
        refresh_token: pair.refresh_token,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> AppResult<ApiResponse<AuthPayload>> {
    let admin = register_admin(&state.pool, input).await?;
    let payload = auth_payload(&admin, &state)?;
    Ok(ApiResponse::created("Admin created successfully", payload))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password share one message so accounts cannot be
/// enumerated.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthPayload>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let admin = AdminRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid)?;

    if !admin.is_active {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Admin account is inactive".into(),
        )));
    }

    if !verify_password_blocking(input.password, admin.password_hash.clone()).await? {
        tracing::warn!(admin_id = %admin.id, "Failed login attempt");
        return Err(invalid());
    }

    let admin = AdminRepo::record_login(&state.pool, &admin.id)
        .await?
        .ok_or_else(invalid)?;

    tracing::info!(admin_id = %admin.id, "Admin logged in");
    let payload = auth_payload(&admin, &state)?;
    Ok(ApiResponse::with_message("Login successful", payload))
}

/// POST /api/auth/refresh
///
/// Exchange a valid refresh token of an active admin for a new token pair.
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> AppResult<ApiResponse<AuthPayload>> {
    let claims = validate_token(&input.refresh_token, TokenKind::Refresh, &state.config.jwt)?;

    let admin = AdminRepo::find_by_id(&state.pool, &claims.id)
        .await?
        .filter(|a| a.is_active)
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid token.".into())))?;

    let payload = auth_payload(&admin, &state)?;
    Ok(ApiResponse::with_message("Token refreshed successfully", payload))
}

/// GET /api/auth/profile
pub async fn get_profile(
    AuthAdmin(admin): AuthAdmin,
) -> AppResult<ApiResponse<serde_json::Value>> {
    Ok(ApiResponse::ok(json!({ "admin": AdminResponse::from(admin) })))
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    ValidatedJson(input): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_unique_admin(
        &state.pool,
        input.username.as_deref(),
        input.email.as_deref(),
        Some(&admin.id),
    )
    .await?;

    let update = UpdateAdmin {
        username: input.username,
        email: input.email,
        ..Default::default()
    };
    let updated = AdminRepo::update(&state.pool, &admin.id, &update)
        .await
        .map_err(crate::error::as_duplicate)?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Admin", &admin.id)))?;

    Ok(ApiResponse::with_message(
        "Profile updated successfully",
        json!({ "admin": AdminResponse::from(updated) }),
    ))
}

/// PUT /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    if !verify_password_blocking(input.current_password, admin.password_hash.clone()).await? {
        return Err(AppError::Core(CoreError::Validation(
            "Current password is incorrect".into(),
        )));
    }

    let password_hash = hash_password_blocking(input.new_password).await?;
    AdminRepo::update_password(&state.pool, &admin.id, &password_hash).await?;

    tracing::info!(admin_id = %admin.id, "Password changed");
    Ok(ApiResponse::message("Password changed successfully"))
}
