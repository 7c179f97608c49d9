//! Route definitions for the `/demo` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::demo;
use crate::state::AppState;

/// Routes mounted at `/demo`.
///
/// ```text
/// POST   /              -> create_demo (public)
/// GET    /              -> list_demos
/// GET    /analytics     -> demo_analytics
/// GET    /{id}          -> get_demo
/// PUT    /{id}          -> update_demo
/// DELETE /{id}          -> delete_demo
/// POST   /{id}/notes    -> add_demo_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(demo::create_demo).get(demo::list_demos))
        .route("/analytics", get(demo::demo_analytics))
        .route(
            "/{id}",
            get(demo::get_demo)
                .put(demo::update_demo)
                .delete(demo::delete_demo),
        )
        .route("/{id}/notes", post(demo::add_demo_note))
}
