//! Route definitions for the `/admin` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{admin, dashboard};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /dashboard      -> dashboard
/// GET    /system-stats   -> system_stats
/// GET    /admins         -> list_admins (super admin)
/// POST   /admins         -> create_admin (super admin)
/// PUT    /admins/{id}    -> update_admin (super admin)
/// DELETE /admins/{id}    -> delete_admin (super admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/system-stats", get(dashboard::system_stats))
        .route("/admins", get(admin::list_admins).post(admin::create_admin))
        .route(
            "/admins/{id}",
            put(admin::update_admin).delete(admin::delete_admin),
        )
}
