//! Admin repository against a real database.

use bizdesk_core::listing::{PageRequest, SortOrder, SortSpec};
use bizdesk_core::roles::AdminRole;
use bizdesk_core::types::RecordId;
use bizdesk_db::models::admin::{AdminFilter, CreateAdmin, UpdateAdmin};
use bizdesk_db::repositories::AdminRepo;
use sqlx::PgPool;

fn new_admin(username: &str, role: AdminRole) -> CreateAdmin {
    CreateAdmin {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "$argon2id$placeholder".to_string(),
        role,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_find(pool: PgPool) {
    let admin = AdminRepo::create(&pool, &new_admin("alice", AdminRole::Admin))
        .await
        .unwrap();
    assert_eq!(admin.id.as_str().len(), 24);
    assert!(admin.is_active);
    assert!(admin.last_login.is_none());

    let by_email = AdminRepo::find_by_email(&pool, "alice@example.com")
        .await
        .unwrap()
        .expect("admin by email");
    assert_eq!(by_email.id, admin.id);

    let missing = AdminRepo::find_by_id(&pool, &RecordId::generate()).await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_username_hits_named_constraint(pool: PgPool) {
    AdminRepo::create(&pool, &new_admin("bob", AdminRole::Admin))
        .await
        .unwrap();
    let mut dup = new_admin("bob", AdminRole::Admin);
    dup.email = "other@example.com".to_string();

    let err = AdminRepo::create(&pool, &dup).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_admins_username"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_conflict_excludes_self(pool: PgPool) {
    let carol = AdminRepo::create(&pool, &new_admin("carol", AdminRole::Admin))
        .await
        .unwrap();
    let dave = AdminRepo::create(&pool, &new_admin("dave", AdminRole::Admin))
        .await
        .unwrap();

    let clash = AdminRepo::find_conflict(&pool, Some("carol"), None, Some(&dave.id))
        .await
        .unwrap();
    assert_eq!(clash.map(|a| a.id), Some(carol.id.clone()));

    let own = AdminRepo::find_conflict(&pool, Some("carol"), None, Some(&carol.id))
        .await
        .unwrap();
    assert!(own.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_refs_skips_unknown_ids(pool: PgPool) {
    let erin = AdminRepo::create(&pool, &new_admin("erin", AdminRole::SuperAdmin))
        .await
        .unwrap();
    let refs = AdminRepo::find_refs(&pool, &[erin.id.clone(), RecordId::generate()])
        .await
        .unwrap();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].username, "erin");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_filters_and_paginates(pool: PgPool) {
    for name in ["frank", "grace", "heidi"] {
        AdminRepo::create(&pool, &new_admin(name, AdminRole::Admin))
            .await
            .unwrap();
    }
    AdminRepo::create(&pool, &new_admin("ivan", AdminRole::SuperAdmin))
        .await
        .unwrap();

    let filter = AdminFilter {
        role: Some(AdminRole::Admin),
        page: PageRequest::new(Some(1), Some(2)),
        sort: SortSpec {
            column: "username",
            order: SortOrder::Asc,
        },
        ..Default::default()
    };
    let page = AdminRepo::list(&pool, &filter).await.unwrap();
    let names: Vec<_> = page.iter().map(|a| a.username.as_str()).collect();
    assert_eq!(names, ["frank", "grace"]);
    assert_eq!(AdminRepo::count(&pool, &filter).await.unwrap(), 3);

    let search = AdminFilter {
        search: Some("%IVA%".to_string()),
        ..Default::default()
    };
    assert_eq!(AdminRepo::count(&pool, &search).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_deactivate_and_delete(pool: PgPool) {
    let judy = AdminRepo::create(&pool, &new_admin("judy", AdminRole::Admin))
        .await
        .unwrap();
    assert!(!AdminRepo::exists_with_role(&pool, AdminRole::SuperAdmin)
        .await
        .unwrap());

    let updated = AdminRepo::update(
        &pool,
        &judy.id,
        &UpdateAdmin {
            role: Some(AdminRole::SuperAdmin),
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("row exists");
    assert_eq!(updated.role, AdminRole::SuperAdmin);
    assert!(!updated.is_active);
    assert_eq!(updated.username, "judy");
    assert!(AdminRepo::exists_with_role(&pool, AdminRole::SuperAdmin)
        .await
        .unwrap());

    let logged = AdminRepo::record_login(&pool, &judy.id)
        .await
        .unwrap()
        .expect("row exists");
    assert!(logged.last_login.is_some());

    assert!(AdminRepo::delete(&pool, &judy.id).await.unwrap());
    assert!(!AdminRepo::delete(&pool, &judy.id).await.unwrap());
}
