pub mod admin;
pub mod auth;
pub mod client;
pub mod contact;
pub mod demo;
pub mod health;
pub mod onboarding;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup | /auth/login | /auth/refresh       public
/// /auth/profile                                    get, update (auth)
/// /auth/change-password                            change password (auth)
///
/// /admin/dashboard                                 lead dashboard (auth)
/// /admin/system-stats                              system counters (auth)
/// /admin/admins                                    list, create (super admin)
/// /admin/admins/{id}                               update, delete (super admin)
///
/// /contact                                         submit (public), list
/// /contact/{id}                                    get, update, delete
/// /contact/{id}/notes                              append note
///
/// /demo                                            submit (public), list
/// /demo/analytics                                  pipeline analytics
/// /demo/{id}                                       get, update, delete
/// /demo/{id}/notes                                 append note
///
/// /onboarding/districts                            district list (public)
/// /onboarding/stats                                status counts
/// /onboarding                                      create (public), list (optional auth)
/// /onboarding/{id}                                 get, update, delete
/// /onboarding/{id}/step/{n}                        save one step
/// /onboarding/{id}/submit                          submit draft
/// /onboarding/{id}/status                          set review status
/// /onboarding/{id}/notes                           append note
///
/// /client                                          create, list
/// /client/dashboard-stats                          client counters
/// /client/client-id/{client_id}                    lookup by business id
/// /client/{id}                                     get, update, delete
/// /client/{id}/notes | /issues | /payment          appends and payment
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/contact", contact::router())
        .nest("/demo", demo::router())
        .nest("/onboarding", onboarding::router())
        .nest("/client", client::router())
}
