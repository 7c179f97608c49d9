//! Route definitions for the `/onboarding` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Routes mounted at `/onboarding`.
///
/// ```text
/// GET    /districts         -> list_districts (public)
/// GET    /stats             -> onboarding_stats
/// POST   /                  -> create_onboarding (public)
/// GET    /                  -> list_onboardings (optional auth)
/// GET    /{id}              -> get_onboarding
/// PUT    /{id}              -> update_onboarding (public while draft)
/// DELETE /{id}              -> delete_onboarding
/// PUT    /{id}/step/{n}     -> update_step (public while draft)
/// POST   /{id}/submit       -> submit_onboarding (public)
/// PUT    /{id}/status       -> update_status
/// POST   /{id}/notes        -> add_onboarding_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/districts", get(onboarding::list_districts))
        .route("/stats", get(onboarding::onboarding_stats))
        .route(
            "/",
            post(onboarding::create_onboarding).get(onboarding::list_onboardings),
        )
        .route(
            "/{id}",
            get(onboarding::get_onboarding)
                .put(onboarding::update_onboarding)
                .delete(onboarding::delete_onboarding),
        )
        .route("/{id}/step/{step}", put(onboarding::update_step))
        .route("/{id}/submit", post(onboarding::submit_onboarding))
        .route("/{id}/status", put(onboarding::update_status))
        .route("/{id}/notes", post(onboarding::add_onboarding_note))
}
