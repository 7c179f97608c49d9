//! Route definitions for the `/auth` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /signup           -> signup
/// POST /login            -> login
/// POST /refresh          -> refresh
/// GET  /profile          -> get_profile (requires auth)
/// PUT  /profile          -> update_profile (requires auth)
/// PUT  /change-password  -> change_password (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/profile", get(auth::get_profile).put(auth::update_profile))
        .route("/change-password", put(auth::change_password))
}
