//! Tests for the failure envelope: `AppError` to HTTP mapping, plus the
//! router-level rejections (malformed ids, bad JSON, unknown routes).

mod common;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use bizdesk_api::error::AppError;
use bizdesk_core::error::{CoreError, FieldError};
use bizdesk_core::roles::AdminRole;
use common::{body_json, create_admin, get, get_auth, put_json};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// AppError mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::not_found("Client", "0123456789abcdef01234567"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Client not found");
    assert!(json.get("errors").is_none());
}

#[tokio::test]
async fn field_errors_are_listed() {
    let err = AppError::Core(CoreError::InvalidFields(vec![
        FieldError::new("email", "Please provide a valid email"),
        FieldError::new("phone", "Please provide a valid 10-digit phone number"),
    ]));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Validation failed");
    assert_eq!(json["errors"][1]["field"], "phone");
    assert_eq!(json["errors"][0]["message"], "Please provide a valid email");
}

#[tokio::test]
async fn duplicate_returns_400_naming_the_field() {
    let err = AppError::Core(CoreError::Duplicate {
        field: "username".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "username already exists");
}

#[tokio::test]
async fn missing_steps_carry_data() {
    let err = AppError::Core(CoreError::MissingSteps(vec![2, 4]));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["data"]["missingSteps"], json!([2, 4]));
}

#[tokio::test]
async fn auth_errors_map_to_401_and_403() {
    let (status, json) = error_to_response(AppError::Core(CoreError::TokenExpired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Token expired.");

    let (status, _) =
        error_to_response(AppError::Core(CoreError::Forbidden("nope".into()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn internal_error_returns_500() {
    let (status, json) = error_to_response(AppError::InternalError("boom".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("Internal server error"));
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let (status, _) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Router-level rejections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_id_is_a_bad_request(pool: PgPool) {
    let (_, token) = create_admin(&pool, "staff", AdminRole::Admin).await;

    for uri in [
        "/api/contact/not-an-id",
        "/api/demo/123",
        "/api/client/zzzzzzzzzzzzzzzzzzzzzzzz",
        "/api/onboarding/abc",
    ] {
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, uri, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn well_formed_unknown_id_is_not_found(pool: PgPool) {
    let (_, token) = create_admin(&pool, "staff", AdminRole::Admin).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/demo/aaaaaaaaaaaaaaaaaaaaaaaa", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Demo request not found");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_json_body_is_a_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_uses_fallback(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Route not found");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_sort_field_is_rejected(pool: PgPool) {
    let (_, token) = create_admin(&pool, "staff", AdminRole::Admin).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/contact?sortBy=password", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn public_edit_of_unknown_onboarding_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = put_json(app, "/api/onboarding/bbbbbbbbbbbbbbbbbbbbbbbb", json!({})).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_database(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
