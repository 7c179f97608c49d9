//! Route definitions for the `/client` resource. Every route requires auth.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::client;
use crate::state::AppState;

/// Routes mounted at `/client`.
///
/// ```text
/// POST   /                        -> create_client
/// GET    /                        -> list_clients
/// GET    /dashboard-stats         -> client_dashboard_stats
/// GET    /client-id/{client_id}   -> get_client_by_client_id
/// GET    /{id}                    -> get_client
/// PUT    /{id}                    -> update_client
/// DELETE /{id}?permanent=true     -> delete_client
/// POST   /{id}/notes              -> add_internal_note
/// POST   /{id}/issues             -> add_ongoing_issue
/// PUT    /{id}/payment            -> update_payment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(client::create_client).get(client::list_clients))
        .route("/dashboard-stats", get(client::client_dashboard_stats))
        .route("/client-id/{client_id}", get(client::get_client_by_client_id))
        .route(
            "/{id}",
            get(client::get_client)
                .put(client::update_client)
                .delete(client::delete_client),
        )
        .route("/{id}/notes", post(client::add_internal_note))
        .route("/{id}/issues", post(client::add_ongoing_issue))
        .route("/{id}/payment", put(client::update_payment))
}
