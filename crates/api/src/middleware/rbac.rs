//! Role-based access control (RBAC) extractors.
//!
//! Wraps [`AuthAdmin`] and rejects requests whose role does not meet the
//! minimum requirement, so authorization is enforced at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bizdesk_core::error::CoreError;
use bizdesk_db::models::admin::Admin;

use super::auth::AuthAdmin;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `super_admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn super_only(RequireSuperAdmin(admin): RequireSuperAdmin) -> AppResult<ApiResponse<()>> {
///     // admin is guaranteed to be a super admin here
///     Ok(ApiResponse::message("ok"))
/// }
/// ```
pub struct RequireSuperAdmin(pub Admin);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthAdmin(admin) = AuthAdmin::from_request_parts(parts, state).await?;
        if !admin.role.is_super_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Access denied. Super admin rights required.".into(),
            )));
        }
        Ok(RequireSuperAdmin(admin))
    }
}
