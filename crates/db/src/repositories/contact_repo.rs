//! Repository for the `contact_messages` table.

use bizdesk_core::lead::{ContactPriority, ContactResponse, ContactStatus};
use bizdesk_core::notes::AdminNote;
use bizdesk_core::types::RecordId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::contact::{
    ContactFilter, ContactMessage, CreateContactMessage, UpdateContactMessage,
};
use crate::models::dashboard::GroupCount;
use crate::query::WhereClause;

const COLUMNS: &str = "id, name, email, phone, subject, message, status, priority, \
                       assigned_to, admin_notes, customer_response, customer_feedback, \
                       issue_solved, created_at, updated_at";

/// Sortable fields of the contact list.
pub const SORT_FIELDS: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("name", "name"),
    ("email", "email"),
    ("subject", "subject"),
    ("status", "status"),
    ("priority", "priority"),
];

pub struct ContactRepo;

impl ContactRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateContactMessage,
    ) -> Result<ContactMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_messages (id, name, email, phone, subject, message)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(String::from(RecordId::generate()))
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.subject)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: &RecordId,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contact_messages WHERE id = $1");
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Every contact message, oldest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<ContactMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contact_messages ORDER BY created_at ASC");
        sqlx::query_as::<_, ContactMessage>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &ContactFilter,
    ) -> Result<Vec<ContactMessage>, sqlx::Error> {
        let clause = build_filter(filter);
        let idx = clause.next_param();
        let query = format!(
            "SELECT {COLUMNS} FROM contact_messages {} ORDER BY {} LIMIT ${idx} OFFSET ${}",
            clause.sql(),
            filter.sort.to_sql(),
            idx + 1
        );
        clause
            .bind_as(sqlx::query_as::<_, ContactMessage>(&query))
            .bind(filter.page.limit)
            .bind(filter.page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &ContactFilter) -> Result<i64, sqlx::Error> {
        let clause = build_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT FROM contact_messages {}", clause.sql());
        clause
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Per-status totals over the whole table.
    pub async fn status_counts(pool: &PgPool) -> Result<Vec<GroupCount>, sqlx::Error> {
        sqlx::query_as::<_, GroupCount>(
            "SELECT status::text AS key, COUNT(*)::BIGINT AS count
             FROM contact_messages GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Apply a staff update. Only non-`None` fields are written;
    /// `assigned_to: Some(None)` clears the assignee.
    pub async fn update(
        pool: &PgPool,
        id: &RecordId,
        input: &UpdateContactMessage,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_messages SET
                status = COALESCE($2, status),
                priority = COALESCE($3, priority),
                assigned_to = CASE WHEN $4 THEN $5 ELSE assigned_to END,
                customer_response = COALESCE($6, customer_response),
                customer_feedback = COALESCE($7, customer_feedback),
                issue_solved = COALESCE($8, issue_solved)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id.as_str())
            .bind(input.status.map(ContactStatus::as_str))
            .bind(input.priority.map(ContactPriority::as_str))
            .bind(input.assigned_to.is_some())
            .bind(input.assigned_to.as_ref().and_then(Option::as_ref).map(RecordId::as_str))
            .bind(input.customer_response.map(ContactResponse::as_str))
            .bind(&input.customer_feedback)
            .bind(input.issue_solved)
            .fetch_optional(pool)
            .await
    }

    /// Append a note in a single statement.
    pub async fn add_note(
        pool: &PgPool,
        id: &RecordId,
        note: &AdminNote,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_messages SET admin_notes = admin_notes || $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id.as_str())
            .bind(Json([note]))
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: &RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear `assigned_to` wherever it points at `admin_id`.
    pub async fn unassign_admin(pool: &PgPool, admin_id: &RecordId) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE contact_messages SET assigned_to = NULL WHERE assigned_to = $1")
                .bind(admin_id.as_str())
                .execute(pool)
                .await?;
        tracing::debug!(
            admin_id = %admin_id,
            rows = result.rows_affected(),
            "Cleared assigned_to on contact_messages",
        );
        Ok(result.rows_affected())
    }
}

fn build_filter(filter: &ContactFilter) -> WhereClause {
    let mut clause = WhereClause::new();
    clause
        .eq_enum("status", filter.status)
        .eq_enum("priority", filter.priority)
        .eq_text("assigned_to", filter.assigned_to.as_ref().map(RecordId::as_str))
        .eq_enum("customer_response", filter.customer_response)
        .eq_bool("issue_solved", filter.issue_solved)
        .search(
            &["name", "email", "subject", "message"],
            filter.search.as_deref(),
        );
    clause
}
