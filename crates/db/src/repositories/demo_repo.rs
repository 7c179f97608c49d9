//! Repository for the `demo_requests` table.

use bizdesk_core::lead::{DemoPriority, DemoResponse, DemoStatus};
use bizdesk_core::notes::AdminNote;
use bizdesk_core::types::RecordId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::dashboard::GroupCount;
use crate::models::demo::{CreateDemoRequest, DemoFilter, DemoRequest, UpdateDemoRequest};
use crate::query::WhereClause;

const COLUMNS: &str = "id, name, business, phone, email, business_type, current_software, \
                       preferred_time, status, demo_date, demo_notes, assigned_to, admin_notes, \
                       customer_response, customer_feedback, conversion_value, follow_up_date, \
                       priority, created_at, updated_at";

/// Sortable fields of the demo list.
pub const SORT_FIELDS: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("name", "name"),
    ("business", "business"),
    ("status", "status"),
    ("priority", "priority"),
    ("demoDate", "demo_date"),
    ("followUpDate", "follow_up_date"),
    ("conversionValue", "conversion_value"),
];

pub struct DemoRepo;

impl DemoRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateDemoRequest,
    ) -> Result<DemoRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO demo_requests
                (id, name, business, phone, email, business_type, current_software, preferred_time)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DemoRequest>(&query)
            .bind(String::from(RecordId::generate()))
            .bind(&input.name)
            .bind(&input.business)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(input.business_type.as_str())
            .bind(input.current_software.as_str())
            .bind(&input.preferred_time)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: &RecordId,
    ) -> Result<Option<DemoRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM demo_requests WHERE id = $1");
        sqlx::query_as::<_, DemoRequest>(&query)
            .bind(id.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, filter: &DemoFilter) -> Result<Vec<DemoRequest>, sqlx::Error> {
        let clause = build_filter(filter);
        let idx = clause.next_param();
        let query = format!(
            "SELECT {COLUMNS} FROM demo_requests {} ORDER BY {} LIMIT ${idx} OFFSET ${}",
            clause.sql(),
            filter.sort.to_sql(),
            idx + 1
        );
        clause
            .bind_as(sqlx::query_as::<_, DemoRequest>(&query))
            .bind(filter.page.limit)
            .bind(filter.page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &DemoFilter) -> Result<i64, sqlx::Error> {
        let clause = build_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT FROM demo_requests {}", clause.sql());
        clause
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    pub async fn status_counts(pool: &PgPool) -> Result<Vec<GroupCount>, sqlx::Error> {
        sqlx::query_as::<_, GroupCount>(
            "SELECT status::text AS key, COUNT(*)::BIGINT AS count
             FROM demo_requests GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn business_type_counts(pool: &PgPool) -> Result<Vec<GroupCount>, sqlx::Error> {
        sqlx::query_as::<_, GroupCount>(
            "SELECT business_type::text AS key, COUNT(*)::BIGINT AS count
             FROM demo_requests GROUP BY business_type",
        )
        .fetch_all(pool)
        .await
    }

    /// Apply a staff update. Only non-`None` fields are written;
    /// `assigned_to: Some(None)` clears the assignee.
    pub async fn update(
        pool: &PgPool,
        id: &RecordId,
        input: &UpdateDemoRequest,
    ) -> Result<Option<DemoRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE demo_requests SET
                status = COALESCE($2, status),
                demo_date = COALESCE($3, demo_date),
                demo_notes = COALESCE($4, demo_notes),
                assigned_to = CASE WHEN $5 THEN $6 ELSE assigned_to END,
                customer_response = COALESCE($7, customer_response),
                customer_feedback = COALESCE($8, customer_feedback),
                conversion_value = COALESCE($9, conversion_value),
                follow_up_date = COALESCE($10, follow_up_date),
                priority = COALESCE($11, priority)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DemoRequest>(&query)
            .bind(id.as_str())
            .bind(input.status.map(DemoStatus::as_str))
            .bind(input.demo_date)
            .bind(&input.demo_notes)
            .bind(input.assigned_to.is_some())
            .bind(input.assigned_to.as_ref().and_then(Option::as_ref).map(RecordId::as_str))
            .bind(input.customer_response.map(DemoResponse::as_str))
            .bind(&input.customer_feedback)
            .bind(input.conversion_value)
            .bind(input.follow_up_date)
            .bind(input.priority.map(DemoPriority::as_str))
            .fetch_optional(pool)
            .await
    }

    /// Append a note in a single statement.
    pub async fn add_note(
        pool: &PgPool,
        id: &RecordId,
        note: &AdminNote,
    ) -> Result<Option<DemoRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE demo_requests SET admin_notes = admin_notes || $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DemoRequest>(&query)
            .bind(id.as_str())
            .bind(Json([note]))
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: &RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM demo_requests WHERE id = $1")
            .bind(id.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear `assigned_to` wherever it points at `admin_id`.
    pub async fn unassign_admin(pool: &PgPool, admin_id: &RecordId) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE demo_requests SET assigned_to = NULL WHERE assigned_to = $1")
                .bind(admin_id.as_str())
                .execute(pool)
                .await?;
        tracing::debug!(
            admin_id = %admin_id,
            rows = result.rows_affected(),
            "Cleared assigned_to on demo_requests",
        );
        Ok(result.rows_affected())
    }
}

fn build_filter(filter: &DemoFilter) -> WhereClause {
    let mut clause = WhereClause::new();
    clause
        .eq_enum("status", filter.status)
        .eq_enum("business_type", filter.business_type)
        .eq_text("assigned_to", filter.assigned_to.as_ref().map(RecordId::as_str))
        .eq_enum("customer_response", filter.customer_response)
        .eq_enum("priority", filter.priority)
        .search(&["name", "email", "business"], filter.search.as_deref());
    clause
}
