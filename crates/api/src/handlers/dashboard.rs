//! Handlers for the admin dashboards.

use axum::extract::State;
use bizdesk_db::repositories::DashboardRepo;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::extract::ValidQuery;
use crate::middleware::auth::AuthAdmin;
use crate::query::DateRangeParams;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Entries in each "recent" list.
const RECENT_LIMIT: i64 = 5;
/// Entries in the business type ranking.
const TOP_BUSINESS_TYPES: i64 = 10;

/// GET /api/admin/dashboard?startDate=&endDate=
///
/// Lead counts, recent activity and the business type ranking. The date
/// window applies only when both bounds are given.
pub async fn dashboard(
    State(state): State<AppState>,
    AuthAdmin(_admin): AuthAdmin,
    ValidQuery(params): ValidQuery<DateRangeParams>,
) -> AppResult<ApiResponse<Value>> {
    let range = params.range();
    let pool = &state.pool;
    let (contacts, demos, recent_contacts, recent_demos, business_types) = tokio::try_join!(
        DashboardRepo::contact_counts(pool, range),
        DashboardRepo::demo_counts(pool, range),
        DashboardRepo::recent_contacts(pool, range, RECENT_LIMIT),
        DashboardRepo::recent_demos(pool, range, RECENT_LIMIT),
        DashboardRepo::top_business_types(pool, range, TOP_BUSINESS_TYPES),
    )?;

    Ok(ApiResponse::ok(json!({
        "contacts": contacts,
        "demos": demos,
        "recentActivities": {
            "contacts": recent_contacts,
            "demos": recent_demos,
        },
        "businessTypeStats": business_types,
    })))
}

/// GET /api/admin/system-stats
pub async fn system_stats(
    State(state): State<AppState>,
    AuthAdmin(_admin): AuthAdmin,
) -> AppResult<ApiResponse<Value>> {
    let stats = DashboardRepo::system_stats(&state.pool).await?;
    Ok(ApiResponse::ok(json!({ "stats": stats })))
}
