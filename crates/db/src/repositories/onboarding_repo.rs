//! Repository for the `onboardings` table.

use bizdesk_core::notes::AdminNote;
use bizdesk_core::onboarding::{OnboardingForm, OnboardingStatus, StepProgress};
use bizdesk_core::types::RecordId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::dashboard::GroupCount;
use crate::models::onboarding::{Onboarding, OnboardingFilter, RecentOnboarding};
use crate::query::WhereClause;

const COLUMNS: &str = "id, personal_details, business_details, plan_details, payment_details, \
                       notes, status, current_step, completed_steps, submitted_at, reviewed_at, \
                       reviewed_by, admin_notes, created_at, updated_at";

/// Sortable fields of the onboarding list.
pub const SORT_FIELDS: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("submittedAt", "submitted_at"),
    ("status", "status"),
    ("currentStep", "current_step"),
    ("name", "personal_details->>'name'"),
    ("businessName", "business_details->>'businessName'"),
];

pub struct OnboardingRepo;

impl OnboardingRepo {
    /// Insert a new draft.
    pub async fn create(pool: &PgPool, form: &OnboardingForm) -> Result<Onboarding, sqlx::Error> {
        let query = format!(
            "INSERT INTO onboardings
                (id, personal_details, business_details, plan_details, payment_details, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(String::from(RecordId::generate()))
            .bind(Json(&form.personal_details))
            .bind(Json(&form.business_details))
            .bind(Json(&form.plan_details))
            .bind(Json(&form.payment_details))
            .bind(&form.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: &RecordId,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM onboardings WHERE id = $1");
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &OnboardingFilter,
    ) -> Result<Vec<Onboarding>, sqlx::Error> {
        let clause = build_filter(filter);
        let idx = clause.next_param();
        let query = format!(
            "SELECT {COLUMNS} FROM onboardings {} ORDER BY {} LIMIT ${idx} OFFSET ${}",
            clause.sql(),
            filter.sort.to_sql(),
            idx + 1
        );
        clause
            .bind_as(sqlx::query_as::<_, Onboarding>(&query))
            .bind(filter.page.limit)
            .bind(filter.page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &OnboardingFilter) -> Result<i64, sqlx::Error> {
        let clause = build_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT FROM onboardings {}", clause.sql());
        clause
            .bind_scalar(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Write back the form content and step progress after a merge.
    pub async fn save_content(
        pool: &PgPool,
        id: &RecordId,
        form: &OnboardingForm,
        progress: &StepProgress,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "UPDATE onboardings SET
                personal_details = $2,
                business_details = $3,
                plan_details = $4,
                payment_details = $5,
                notes = $6,
                current_step = $7,
                completed_steps = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id.as_str())
            .bind(Json(&form.personal_details))
            .bind(Json(&form.business_details))
            .bind(Json(&form.plan_details))
            .bind(Json(&form.payment_details))
            .bind(&form.notes)
            .bind(progress.current_step)
            .bind(&progress.completed_steps)
            .fetch_optional(pool)
            .await
    }

    /// Move a draft to `Submitted`. The status check is part of the
    /// statement, so `None` means the row is missing or no longer a draft.
    pub async fn submit(pool: &PgPool, id: &RecordId) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "UPDATE onboardings SET status = 'Submitted', submitted_at = NOW()
             WHERE id = $1 AND status = 'Draft'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Set any status and stamp the reviewer.
    pub async fn update_status(
        pool: &PgPool,
        id: &RecordId,
        status: OnboardingStatus,
        reviewer: &RecordId,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "UPDATE onboardings SET status = $2, reviewed_at = NOW(), reviewed_by = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id.as_str())
            .bind(status.as_str())
            .bind(reviewer.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Append a note in a single statement.
    pub async fn add_note(
        pool: &PgPool,
        id: &RecordId,
        note: &AdminNote,
    ) -> Result<Option<Onboarding>, sqlx::Error> {
        let query = format!(
            "UPDATE onboardings SET admin_notes = admin_notes || $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Onboarding>(&query)
            .bind(id.as_str())
            .bind(Json([note]))
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: &RecordId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM onboardings WHERE id = $1")
            .bind(id.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn status_counts(pool: &PgPool) -> Result<Vec<GroupCount>, sqlx::Error> {
        sqlx::query_as::<_, GroupCount>(
            "SELECT status::text AS key, COUNT(*)::BIGINT AS count
             FROM onboardings GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// The `limit` most recently created onboardings.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<RecentOnboarding>, sqlx::Error> {
        sqlx::query_as::<_, RecentOnboarding>(
            "SELECT id,
                    personal_details->>'name' AS name,
                    business_details->>'businessName' AS business_name,
                    status, created_at
             FROM onboardings ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

fn build_filter(filter: &OnboardingFilter) -> WhereClause {
    let mut clause = WhereClause::new();
    clause.eq_enum("status", filter.status).search(
        &[
            "personal_details->>'name'",
            "personal_details->>'fatherName'",
            "business_details->>'businessName'",
            "personal_details->>'phoneNumber1'",
        ],
        filter.search.as_deref(),
    );
    clause
}
