//! Route definitions for the `/contact` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contact;
use crate::state::AppState;

/// Routes mounted at `/contact`.
///
/// ```text
/// POST   /              -> create_contact (public)
/// GET    /              -> list_contacts
/// GET    /{id}          -> get_contact
/// PUT    /{id}          -> update_contact
/// DELETE /{id}          -> delete_contact
/// POST   /{id}/notes    -> add_contact_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(contact::create_contact).get(contact::list_contacts))
        .route(
            "/{id}",
            get(contact::get_contact)
                .put(contact::update_contact)
                .delete(contact::delete_contact),
        )
        .route("/{id}/notes", post(contact::add_contact_note))
}
