use std::sync::atomic::{AtomicBool, Ordering};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bizdesk_core::error::{CoreError, FieldError};
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the standard failure envelope
/// `{ "success": false, "message": ..., "errors"?: [...], "data"?: ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `bizdesk_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

static EXPOSE_INTERNAL: AtomicBool = AtomicBool::new(true);

/// Whether 500 responses carry the underlying error text. Switched off in
/// production by [`crate::router::build_app_router`].
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL.store(expose, Ordering::Relaxed);
}

fn internal_message(detail: &str) -> String {
    if EXPOSE_INTERNAL.load(Ordering::Relaxed) {
        format!("Internal server error: {detail}")
    } else {
        "Internal server error".to_string()
    }
}

/// Everything needed to render one failure envelope.
struct Failure {
    status: StatusCode,
    message: String,
    errors: Option<Vec<FieldError>>,
    data: Option<Value>,
}

impl Failure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
            data: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let failure = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => Failure::new(StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Failure::new(StatusCode::INTERNAL_SERVER_ERROR, internal_message(msg))
            }
        };

        let mut body = json!({
            "success": false,
            "message": failure.message,
        });
        if let Some(errors) = failure.errors {
            body["errors"] = json!(errors);
        }
        if let Some(data) = failure.data {
            body["data"] = data;
        }

        (failure.status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> Failure {
    match core {
        CoreError::NotFound { entity, id } => {
            tracing::debug!(entity, id = %id, "Record not found");
            Failure::new(StatusCode::NOT_FOUND, format!("{entity} not found"))
        }
        CoreError::Validation(msg) | CoreError::InvalidState(msg) => {
            Failure::new(StatusCode::BAD_REQUEST, msg.clone())
        }
        CoreError::InvalidFields(errors) => Failure {
            errors: Some(errors.clone()),
            ..Failure::new(StatusCode::BAD_REQUEST, "Validation failed")
        },
        CoreError::Duplicate { field } => {
            Failure::new(StatusCode::BAD_REQUEST, format!("{field} already exists"))
        }
        CoreError::MissingSteps(steps) => Failure {
            data: Some(json!({ "missingSteps": steps })),
            ..Failure::new(StatusCode::BAD_REQUEST, "Please complete all required steps")
        },
        CoreError::Unauthorized(msg) => Failure::new(StatusCode::UNAUTHORIZED, msg.clone()),
        CoreError::TokenExpired => Failure::new(StatusCode::UNAUTHORIZED, "Token expired."),
        CoreError::Forbidden(msg) => Failure::new(StatusCode::FORBIDDEN, msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            Failure::new(StatusCode::INTERNAL_SERVER_ERROR, internal_message(msg))
        }
    }
}

/// Classify a sqlx error into a failure envelope.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map
///   to a 400 naming the offending field.
/// - Everything else maps to 500.
fn classify_sqlx_error(err: &sqlx::Error) -> Failure {
    match err {
        sqlx::Error::RowNotFound => Failure::new(StatusCode::NOT_FOUND, "Resource not found"),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                if let Some(field) = db_err.constraint().and_then(duplicate_field) {
                    return classify_core_error(&CoreError::Duplicate { field });
                }
            }
            tracing::error!(error = %db_err, "Database error");
            Failure::new(StatusCode::INTERNAL_SERVER_ERROR, internal_message(db_err.message()))
        }
        other => {
            tracing::error!(error = %other, "Database error");
            Failure::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                internal_message(&other.to_string()),
            )
        }
    }
}

/// Map a `uq_<table>_<column>` constraint name to the camelCase API field.
fn duplicate_field(constraint: &str) -> Option<String> {
    let (_table, column) = constraint.strip_prefix("uq_")?.split_once('_')?;
    let mut field = String::with_capacity(column.len());
    let mut upper = false;
    for ch in column.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            field.push(ch.to_ascii_uppercase());
            upper = false;
        } else {
            field.push(ch);
        }
    }
    Some(field)
}

/// Convert a unique violation into the domain [`CoreError::Duplicate`] so
/// handlers can pattern-match on it; other errors pass through.
pub fn as_duplicate(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            if let Some(field) = db_err.constraint().and_then(duplicate_field) {
                return AppError::Core(CoreError::Duplicate { field });
            }
        }
    }
    AppError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_names_map_to_api_fields() {
        assert_eq!(duplicate_field("uq_admins_username").as_deref(), Some("username"));
        assert_eq!(duplicate_field("uq_clients_client_id").as_deref(), Some("clientId"));
        assert_eq!(duplicate_field("pk_clients"), None);
    }

    #[test]
    fn status_mapping() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                CoreError::Duplicate { field: "email".into() }.into(),
                StatusCode::BAD_REQUEST,
            ),
            (CoreError::MissingSteps(vec![4]).into(), StatusCode::BAD_REQUEST),
            (CoreError::TokenExpired.into(), StatusCode::UNAUTHORIZED),
            (CoreError::Forbidden("no".into()).into(), StatusCode::FORBIDDEN),
            (
                CoreError::not_found("Client", "abc").into(),
                StatusCode::NOT_FOUND,
            ),
            (AppError::Database(sqlx::Error::RowNotFound), StatusCode::NOT_FOUND),
            (
                AppError::InternalError("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
