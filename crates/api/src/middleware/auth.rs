//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bizdesk_core::error::CoreError;
use bizdesk_db::models::admin::Admin;
use bizdesk_db::repositories::AdminRepo;

use crate::auth::jwt::{validate_token, TokenKind};
use crate::error::AppError;
use crate::state::AppState;

/// The active admin behind a valid access token in the `Authorization` header.
///
/// The admin row is loaded on every request so a deactivated or deleted
/// account loses access immediately, not when its token expires.
///
/// ```ignore
/// async fn my_handler(AuthAdmin(admin): AuthAdmin) -> AppResult<ApiResponse<()>> {
///     tracing::info!(admin_id = %admin.id, "handling request");
///     Ok(ApiResponse::message("done"))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub Admin);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Access denied. No token provided.".into(),
            ))
        })?;

        let claims = validate_token(token, TokenKind::Access, &state.config.jwt).map_err(|e| {
            match e {
                CoreError::TokenExpired => AppError::Core(e),
                _ => AppError::Core(CoreError::Unauthorized("Invalid token.".into())),
            }
        })?;

        let admin = AdminRepo::find_by_id(&state.pool, &claims.id)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid token.".into())))?;

        if !admin.is_active {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Admin account is inactive".into(),
            )));
        }

        Ok(AuthAdmin(admin))
    }
}

/// Optional authentication: any failure (no header, bad token, inactive
/// admin) resolves to `None` instead of rejecting the request.
#[derive(Debug, Clone)]
pub struct MaybeAdmin(pub Option<Admin>);

impl FromRequestParts<AppState> for MaybeAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthAdmin::from_request_parts(parts, state).await {
            Ok(AuthAdmin(admin)) => Ok(MaybeAdmin(Some(admin))),
            Err(_) => Ok(MaybeAdmin(None)),
        }
    }
}
