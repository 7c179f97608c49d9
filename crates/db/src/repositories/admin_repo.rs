//! Repository for the `admins` table.

use bizdesk_core::notes::AdminRef;
use bizdesk_core::roles::AdminRole;
use bizdesk_core::types::RecordId;
use sqlx::PgPool;

use crate::models::admin::{Admin, AdminFilter, CreateAdmin, UpdateAdmin};
use crate::query::WhereClause;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, role, is_active, \
                       last_login, created_at, updated_at";

/// Sortable fields of the admin list.
pub const SORT_FIELDS: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("username", "username"),
    ("email", "email"),
    ("role", "role"),
    ("lastLogin", "last_login"),
];

/// Provides CRUD operations for admins.
pub struct AdminRepo;

impl AdminRepo {
    /// Insert a new admin, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAdmin) -> Result<Admin, sqlx::Error> {
        let query = format!(
            "INSERT INTO admins (id, username, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Admin>(&query)
            .bind(String::from(RecordId::generate()))
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &RecordId) -> Result<Option<Admin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE id = $1");
        sqlx::query_as::<_, Admin>(&query)
            .bind(id.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Find an admin by (already lowercased) email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Admin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE email = $1");
        sqlx::query_as::<_, Admin>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find any admin, other than `exclude`, holding the given username or
    /// email. Used for duplicate checks on signup and profile edits.
    pub async fn find_conflict(
        pool: &PgPool,
        username: Option<&str>,
        email: Option<&str>,
        exclude: Option<&RecordId>,
    ) -> Result<Option<Admin>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM admins
             WHERE (username = $1 OR email = $2)
               AND ($3::TEXT IS NULL OR id <> $3)
             LIMIT 1"
        );
        sqlx::query_as::<_, Admin>(&query)
            .bind(username)
            .bind(email)
            .bind(exclude.map(RecordId::as_str))
            .fetch_optional(pool)
            .await
    }

    /// Resolve a batch of ids to their display projection. Unknown ids are
    /// silently absent from the result.
    pub async fn find_refs(pool: &PgPool, ids: &[RecordId]) -> Result<Vec<AdminRef>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<&str> = ids.iter().map(RecordId::as_str).collect();
        let rows = sqlx::query_as::<_, (String, String, String)>(
            "SELECT id, username, email FROM admins WHERE id = ANY($1)",
        )
        .bind(&raw)
        .fetch_all(pool)
        .await?;
        rows.into_iter()
            .map(|(id, username, email)| {
                let id = RecordId::try_from(id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
                Ok(AdminRef { id, username, email })
            })
            .collect()
    }

    /// List admins matching `filter`, one page at a time.
    pub async fn list(pool: &PgPool, filter: &AdminFilter) -> Result<Vec<Admin>, sqlx::Error> {
        let clause = build_filter(filter);
        let idx = clause.next_param();
        let query = format!(
            "SELECT {COLUMNS} FROM admins {} ORDER BY {} LIMIT ${idx} OFFSET ${}",
            clause.sql(),
            filter.sort.to_sql(),
            idx + 1
        );
        clause
            .bind_as(sqlx::query_as::<_, Admin>(&query))
            .bind(filter.page.limit)
            .bind(filter.page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count admins matching `filter` (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &AdminFilter) -> Result<i64, sqlx::Error> {
        let clause = build_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT FROM admins {}", clause.sql());
        clause
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Update an admin. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &RecordId,
        input: &UpdateAdmin,
    ) -> Result<Option<Admin>, sqlx::Error> {
        let query = format!(
            "UPDATE admins SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Admin>(&query)
            .bind(id.as_str())
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.role.map(AdminRole::as_str))
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Set `last_login` to now, returning the refreshed row.
    pub async fn record_login(pool: &PgPool, id: &RecordId) -> Result<Option<Admin>, sqlx::Error> {
        let query =
            format!("UPDATE admins SET last_login = NOW() WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Admin>(&query)
            .bind(id.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Replace an admin's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: &RecordId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE admins SET password_hash = $2 WHERE id = $1")
            .bind(id.as_str())
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Toggle `is_active` by email, returning the updated row.
    pub async fn set_active_by_email(
        pool: &PgPool,
        email: &str,
        active: bool,
    ) -> Result<Option<Admin>, sqlx::Error> {
        let query =
            format!("UPDATE admins SET is_active = $2 WHERE email = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Admin>(&query)
            .bind(email)
            .bind(active)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists_with_role(pool: &PgPool, role: AdminRole) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM admins WHERE role = $1)")
            .bind(role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Hard-delete an admin. References to it elsewhere are not touched here.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn build_filter(filter: &AdminFilter) -> WhereClause {
    let mut clause = WhereClause::new();
    clause
        .eq_enum("role", filter.role)
        .eq_bool("is_active", filter.is_active)
        .search(&["username", "email"], filter.search.as_deref());
    clause
}
