//! Repository for the `clients` table.
//!
//! Sections are JSONB. Writes of a whole profile never overwrite the
//! append-only `ongoingIssues` / `internalNotes` arrays: the stored arrays
//! are carried over inside the same statement.

use bizdesk_core::client::{Billing, ClientProfile, ClientStatus, InternalNote, OngoingIssue};
use bizdesk_core::types::RecordId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};

use crate::models::client::{Client, ClientFilter, UpcomingPayment};
use crate::models::dashboard::GroupCount;
use crate::query::WhereClause;

const COLUMNS: &str = "id, client_id, business_name, owner_contact_name, email, phone, \
                       business_address, onboarding_date, assigned_sales_rep, business_type, \
                       business_category, target_audience, business_description, domain_hosting, \
                       database_system, billing, service_support, automation_notifications, \
                       attachments_notes, status, created_at, updated_at";

/// Sortable fields of the client list.
pub const SORT_FIELDS: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("clientId", "client_id"),
    ("businessName", "business_name"),
    ("ownerContactName", "owner_contact_name"),
    ("email", "email"),
    ("status", "status"),
    ("onboardingDate", "onboarding_date"),
    ("nextPaymentDate", "(billing->>'nextPaymentDate')::timestamptz"),
];

pub struct ClientRepo;

impl ClientRepo {
    /// Insert a resolved profile, returning the created row.
    pub async fn create(pool: &PgPool, profile: &ClientProfile) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (
                id, client_id, business_name, owner_contact_name, email, phone,
                business_address, onboarding_date, assigned_sales_rep, business_type,
                business_category, target_audience, business_description, domain_hosting,
                database_system, billing, service_support, automation_notifications,
                attachments_notes, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                     $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
             RETURNING {COLUMNS}"
        );
        let id = RecordId::generate();
        bind_profile(sqlx::query_as::<_, Client>(&query).bind(id.as_str()), profile)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: &RecordId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Find by the human-facing `clientId` (e.g. `CL1760832000000AB12`).
    pub async fn find_by_client_id(
        pool: &PgPool,
        client_id: &str,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE client_id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(client_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists_by_email(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM clients WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool, filter: &ClientFilter) -> Result<Vec<Client>, sqlx::Error> {
        let clause = build_filter(filter);
        let idx = clause.next_param();
        let query = format!(
            "SELECT {COLUMNS} FROM clients {} ORDER BY {} LIMIT ${idx} OFFSET ${}",
            clause.sql(),
            filter.sort.to_sql(),
            idx + 1
        );
        clause
            .bind_as(sqlx::query_as::<_, Client>(&query))
            .bind(filter.page.limit)
            .bind(filter.page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &ClientFilter) -> Result<i64, sqlx::Error> {
        let clause = build_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT FROM clients {}", clause.sql());
        clause
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    pub async fn status_counts(pool: &PgPool) -> Result<Vec<GroupCount>, sqlx::Error> {
        sqlx::query_as::<_, GroupCount>(
            "SELECT status::text AS key, COUNT(*)::BIGINT AS count FROM clients GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn billing_cycle_counts(pool: &PgPool) -> Result<Vec<GroupCount>, sqlx::Error> {
        sqlx::query_as::<_, GroupCount>(
            "SELECT billing->>'billingCycle' AS key, COUNT(*)::BIGINT AS count
             FROM clients GROUP BY billing->>'billingCycle'",
        )
        .fetch_all(pool)
        .await
    }

    /// Active clients due within `days` (overdue included), soonest first.
    pub async fn upcoming_payments(
        pool: &PgPool,
        days: i64,
        limit: i64,
    ) -> Result<Vec<UpcomingPayment>, sqlx::Error> {
        sqlx::query_as::<_, UpcomingPayment>(
            "SELECT id, client_id, business_name,
                    (billing->>'nextPaymentDate')::timestamptz AS next_payment_date,
                    COALESCE(billing->'maintenanceFee', '{}'::jsonb) AS maintenance_fee
             FROM clients
             WHERE status = 'active'
               AND billing ? 'nextPaymentDate'
               AND (billing->>'nextPaymentDate')::timestamptz <= NOW() + $1::BIGINT * INTERVAL '1 day'
             ORDER BY (billing->>'nextPaymentDate')::timestamptz ASC
             LIMIT $2",
        )
        .bind(days)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Overwrite every editable column from `profile`, keeping the stored
    /// issue and note logs. Returns `None` if the row does not exist.
    pub async fn save(
        pool: &PgPool,
        id: &RecordId,
        profile: &ClientProfile,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                client_id = $2,
                business_name = $3,
                owner_contact_name = $4,
                email = $5,
                phone = $6,
                business_address = $7,
                onboarding_date = $8,
                assigned_sales_rep = $9,
                business_type = $10,
                business_category = $11,
                target_audience = $12,
                business_description = $13,
                domain_hosting = $14,
                database_system = $15,
                billing = $16,
                service_support = $17::jsonb || jsonb_build_object(
                    'ongoingIssues', COALESCE(service_support->'ongoingIssues', '[]'::jsonb)),
                automation_notifications = $18,
                attachments_notes = $19::jsonb || jsonb_build_object(
                    'internalNotes', COALESCE(attachments_notes->'internalNotes', '[]'::jsonb)),
                status = $20
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        bind_profile(sqlx::query_as::<_, Client>(&query).bind(id.as_str()), profile)
            .fetch_optional(pool)
            .await
    }

    /// Replace only the billing section (payment bookkeeping).
    pub async fn save_billing(
        pool: &PgPool,
        id: &RecordId,
        billing: &Billing,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("UPDATE clients SET billing = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Client>(&query)
            .bind(id.as_str())
            .bind(Json(billing))
            .fetch_optional(pool)
            .await
    }

    /// Append an internal note in a single statement.
    pub async fn add_internal_note(
        pool: &PgPool,
        id: &RecordId,
        note: &InternalNote,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET attachments_notes = jsonb_set(
                attachments_notes, '{{internalNotes}}',
                COALESCE(attachments_notes->'internalNotes', '[]'::jsonb) || $2)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id.as_str())
            .bind(Json([note]))
            .fetch_optional(pool)
            .await
    }

    /// Append an ongoing issue in a single statement.
    pub async fn add_ongoing_issue(
        pool: &PgPool,
        id: &RecordId,
        issue: &OngoingIssue,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET service_support = jsonb_set(
                service_support, '{{ongoingIssues}}',
                COALESCE(service_support->'ongoingIssues', '[]'::jsonb) || $2)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id.as_str())
            .bind(Json([issue]))
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: &RecordId,
        status: ClientStatus,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("UPDATE clients SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Client>(&query)
            .bind(id.as_str())
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: &RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear `assigned_sales_rep` wherever it points at `admin_id`.
    pub async fn unassign_sales_rep(
        pool: &PgPool,
        admin_id: &RecordId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE clients SET assigned_sales_rep = NULL WHERE assigned_sales_rep = $1",
        )
        .bind(admin_id.as_str())
        .execute(pool)
        .await?;
        tracing::debug!(
            admin_id = %admin_id,
            rows = result.rows_affected(),
            "Cleared assigned_sales_rep on clients",
        );
        Ok(result.rows_affected())
    }

    // -- Dashboard --

    /// Count clients, optionally restricted to one status.
    pub async fn count_by_status(
        pool: &PgPool,
        status: Option<ClientStatus>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM clients WHERE ($1::TEXT IS NULL OR status = $1)",
        )
        .bind(status.map(ClientStatus::as_str))
        .fetch_one(pool)
        .await
    }

    /// Active clients whose next payment date has passed.
    pub async fn count_overdue(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM clients
             WHERE status = 'active'
               AND billing ? 'nextPaymentDate'
               AND (billing->>'nextPaymentDate')::timestamptz < NOW()",
        )
        .fetch_one(pool)
        .await
    }

    /// Clients with at least one ongoing issue.
    pub async fn count_with_issues(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM clients
             WHERE jsonb_array_length(COALESCE(service_support->'ongoingIssues', '[]'::jsonb)) > 0",
        )
        .fetch_one(pool)
        .await
    }

    /// Billing sections of every active client.
    pub async fn active_billings(pool: &PgPool) -> Result<Vec<Billing>, sqlx::Error> {
        let rows = sqlx::query_scalar::<_, Json<Billing>>(
            "SELECT billing FROM clients WHERE status = 'active'",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|b| b.0).collect())
    }
}

/// Bind `$2..=$20` from a profile, in column order.
fn bind_profile<'q>(
    q: QueryAs<'q, Postgres, Client, PgArguments>,
    p: &'q ClientProfile,
) -> QueryAs<'q, Postgres, Client, PgArguments> {
    q.bind(&p.client_id)
        .bind(&p.business_name)
        .bind(&p.owner_contact_name)
        .bind(&p.email)
        .bind(&p.phone)
        .bind(Json(&p.business_address))
        .bind(p.onboarding_date)
        .bind(p.assigned_sales_rep.as_ref().map(RecordId::as_str))
        .bind(p.business_type.as_str())
        .bind(&p.business_category)
        .bind(&p.target_audience)
        .bind(&p.business_description)
        .bind(Json(&p.domain_hosting))
        .bind(Json(&p.database_system))
        .bind(Json(&p.billing))
        .bind(Json(&p.service_support))
        .bind(Json(&p.automation_notifications))
        .bind(Json(&p.attachments_notes))
        .bind(p.status.as_str())
}

fn build_filter(filter: &ClientFilter) -> WhereClause {
    let mut clause = WhereClause::new();
    clause
        .eq_enum("status", filter.status)
        .eq_enum("business_type", filter.business_type)
        .eq_enum("service_support->>'serviceLevel'", filter.service_level)
        .eq_enum("domain_hosting->>'dnsStatus'", filter.dns_status)
        .eq_enum("billing->>'billingCycle'", filter.billing_cycle)
        .eq_text(
            "assigned_sales_rep",
            filter.assigned_sales_rep.as_ref().map(RecordId::as_str),
        )
        .search(
            &[
                "business_name",
                "owner_contact_name",
                "email",
                "client_id",
                "domain_hosting->>'subdomain'",
            ],
            filter.search.as_deref(),
        );
    clause
}
