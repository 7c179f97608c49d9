//! HTTP-level tests for signup, login, token refresh, profile and the
//! super-admin management endpoints.

mod common;

use axum::http::StatusCode;
use bizdesk_api::auth::jwt::{generate_access_token, generate_refresh_token, JwtConfig};
use bizdesk_core::roles::AdminRole;
use bizdesk_core::types::RecordId;
use bizdesk_db::models::contact::UpdateContactMessage;
use bizdesk_db::repositories::{AdminRepo, ContactRepo};
use common::{
    body_json, create_admin, delete_auth, get, get_auth, post_json, post_json_auth, put_json_auth,
    TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

fn signup_body(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "Passw0rd",
    })
}

// ---------------------------------------------------------------------------
// Signup / login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_returns_tokens_and_admin(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/auth/signup", signup_body("alice")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Admin created successfully");
    assert_eq!(json["data"]["admin"]["username"], "alice");
    assert_eq!(json["data"]["admin"]["role"], "admin");
    assert!(json["data"]["token"].is_string());
    assert!(json["data"]["refreshToken"].is_string());
    assert!(json["data"]["admin"].get("password").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_rejects_duplicate_email(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let first = post_json(app, "/api/auth/signup", signup_body("alice")).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let body = json!({
        "username": "alice2",
        "email": "ALICE@example.com",
        "password": "Passw0rd",
    });
    let response = post_json(app, "/api/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "email already exists");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signup_rejects_weak_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "username": "bob", "email": "bob@example.com", "password": "abcdef" });

    let response = post_json(app, "/api/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Validation failed");
    assert_eq!(json["errors"][0]["field"], "password");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_success_records_last_login(pool: PgPool) {
    let (admin, _) = create_admin(&pool, "carol", AdminRole::Admin).await;
    assert!(admin.last_login.is_none());
    let app = common::build_test_app(pool.clone());

    let body = json!({ "email": "carol@test.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Login successful");
    assert_eq!(json["data"]["admin"]["id"], admin.id.as_str());
    assert!(json["data"]["admin"]["lastLogin"].is_string());

    let stored = AdminRepo::find_by_id(&pool, &admin.id).await.unwrap().unwrap();
    assert!(stored.last_login.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_wrong_password_and_unknown_email_look_the_same(pool: PgPool) {
    create_admin(&pool, "dave", AdminRole::Admin).await;

    let app = common::build_test_app(pool.clone());
    let wrong = post_json(
        app,
        "/api/auth/login",
        json!({ "email": "dave@test.com", "password": "Nope1234" }),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong = body_json(wrong).await;

    let app = common::build_test_app(pool);
    let unknown = post_json(
        app,
        "/api/auth/login",
        json!({ "email": "ghost@test.com", "password": "Nope1234" }),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown = body_json(unknown).await;

    assert_eq!(wrong["message"], "Invalid email or password");
    assert_eq!(wrong["message"], unknown["message"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_inactive_admin_is_rejected(pool: PgPool) {
    create_admin(&pool, "erin", AdminRole::Admin).await;
    AdminRepo::set_active_by_email(&pool, "erin@test.com", false)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let body = json!({ "email": "erin@test.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Admin account is inactive");
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_issues_new_pair(pool: PgPool) {
    let (admin, _) = create_admin(&pool, "frank", AdminRole::Admin).await;
    let refresh = generate_refresh_token(&admin.id, &common::test_jwt_config()).unwrap();
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/auth/refresh", json!({ "refreshToken": refresh })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Token refreshed successfully");
    assert!(json["data"]["token"].is_string());
    assert!(json["data"]["refreshToken"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn access_token_cannot_be_used_to_refresh(pool: PgPool) {
    let (_, access) = create_admin(&pool, "grace", AdminRole::Admin).await;
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/auth/refresh", json!({ "refreshToken": access })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn refresh_token_cannot_authenticate_requests(pool: PgPool) {
    let (admin, _) = create_admin(&pool, "heidi", AdminRole::Admin).await;
    let refresh = generate_refresh_token(&admin.id, &common::test_jwt_config()).unwrap();
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/auth/profile", &refresh).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn expired_token_reports_expiry(pool: PgPool) {
    let (admin, _) = create_admin(&pool, "ivan", AdminRole::Admin).await;
    let expired_config = JwtConfig {
        access_token_expiry_hours: -1,
        ..common::test_jwt_config()
    };
    let token = generate_access_token(&admin.id, &expired_config).unwrap();
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/auth/profile", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Token expired.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_token_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/auth/profile").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Access denied. No token provided.");
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn profile_update_rejects_taken_username(pool: PgPool) {
    create_admin(&pool, "judy", AdminRole::Admin).await;
    let (_, token) = create_admin(&pool, "mallory", AdminRole::Admin).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(app, "/api/auth/profile", json!({ "username": "judy" }), &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "username already exists");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn change_password_requires_current_password(pool: PgPool) {
    let (_, token) = create_admin(&pool, "niaj", AdminRole::Admin).await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "currentPassword": "Wrong1234", "newPassword": "NewPass99" });
    let response = put_json_auth(app, "/api/auth/change-password", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let body = json!({ "currentPassword": TEST_PASSWORD, "newPassword": "NewPass99" });
    let response = put_json_auth(app, "/api/auth/change-password", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let body = json!({ "email": "niaj@test.com", "password": "NewPass99" });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Super admin management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn plain_admin_cannot_manage_admins(pool: PgPool) {
    let (_, token) = create_admin(&pool, "olivia", AdminRole::Admin).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/admin/admins", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Access denied. Super admin rights required.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn super_admin_creates_and_lists_admins(pool: PgPool) {
    let (_, token) = create_admin(&pool, "root", AdminRole::SuperAdmin).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/admin/admins", signup_body("peggy"), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/admin/admins?role=admin", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let admins = json["data"]["admins"].as_array().unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0]["username"], "peggy");
    assert_eq!(json["data"]["pagination"]["total"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn super_admin_cannot_delete_self(pool: PgPool) {
    let (root, token) = create_admin(&pool, "root", AdminRole::SuperAdmin).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/admin/admins/{}", root.id);
    let response = delete_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_admin_clears_lead_assignments(pool: PgPool) {
    let (_, token) = create_admin(&pool, "root", AdminRole::SuperAdmin).await;
    let (staff, _) = create_admin(&pool, "sybil", AdminRole::Admin).await;

    let app = common::build_test_app(pool.clone());
    let contact = json!({
        "name": "Ravi Kumar",
        "email": "ravi@example.com",
        "phone": "9876543210",
        "subject": "Pricing question",
        "message": "Please share the pricing for the jewellery plan.",
    });
    let response = post_json(app, "/api/contact", contact).await;
    let contact_id: RecordId = body_json(response).await["data"]["contactMessage"]["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    ContactRepo::update(
        &pool,
        &contact_id,
        &UpdateContactMessage {
            assigned_to: Some(Some(staff.id.clone())),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/admin/admins/{}", staff.id), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let contact = ContactRepo::find_by_id(&pool, &contact_id).await.unwrap().unwrap();
    assert!(contact.assigned_to.is_none());
    assert!(AdminRepo::find_by_id(&pool, &staff.id).await.unwrap().is_none());
}
