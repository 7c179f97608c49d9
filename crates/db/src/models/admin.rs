//! Admin entity model and DTOs.

use bizdesk_core::listing::{PageRequest, SortSpec};
use bizdesk_core::notes::AdminRef;
use bizdesk_core::roles::AdminRole;
use bizdesk_core::types::{RecordId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `admins` table.
///
/// Carries the password hash and is therefore not `Serialize`; use
/// [`AdminResponse`] for anything leaving the process.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    #[sqlx(try_from = "String")]
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: AdminRole,
    pub is_active: bool,
    pub last_login: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Admin as exposed over the API (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub last_login: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Admin> for AdminResponse {
    fn from(a: Admin) -> Self {
        Self {
            id: a.id,
            username: a.username,
            email: a.email,
            role: a.role,
            is_active: a.is_active,
            last_login: a.last_login,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

impl From<&Admin> for AdminRef {
    fn from(a: &Admin) -> Self {
        AdminRef {
            id: a.id.clone(),
            username: a.username.clone(),
            email: a.email.clone(),
        }
    }
}

/// DTO for inserting an admin. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct CreateAdmin {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: AdminRole,
}

/// DTO for updating an admin. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateAdmin {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<AdminRole>,
    pub is_active: Option<bool>,
}

/// Filters for the admin list.
#[derive(Debug, Clone, Default)]
pub struct AdminFilter {
    pub search: Option<String>,
    pub role: Option<AdminRole>,
    pub is_active: Option<bool>,
    pub page: PageRequest,
    pub sort: SortSpec,
}
