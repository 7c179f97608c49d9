//! Cross-table aggregates for the dashboard endpoints.

use sqlx::PgPool;

use crate::models::dashboard::{
    BusinessTypeStat, ContactCounts, DateRange, DemoAnalytics, DemoCounts, RecentContact,
    RecentDemo, SystemStats,
};

/// Shared `created_at` window predicate over `$1` / `$2`.
const RANGE: &str = "($1::timestamptz IS NULL OR created_at >= $1) \
                     AND ($2::timestamptz IS NULL OR created_at <= $2)";

/// Window used by the "recent" counters of the system stats.
const RECENT_DAYS: i64 = 30;

pub struct DashboardRepo;

impl DashboardRepo {
    /// Contact totals per status within `range`.
    pub async fn contact_counts(
        pool: &PgPool,
        range: DateRange,
    ) -> Result<ContactCounts, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)::BIGINT AS total_contacts,
                    COUNT(*) FILTER (WHERE status = 'new')::BIGINT AS new_contacts,
                    COUNT(*) FILTER (WHERE status = 'in_progress')::BIGINT AS in_progress_contacts,
                    COUNT(*) FILTER (WHERE status = 'resolved')::BIGINT AS resolved_contacts,
                    COUNT(*) FILTER (WHERE status = 'closed')::BIGINT AS closed_contacts
             FROM contact_messages WHERE {RANGE}"
        );
        sqlx::query_as::<_, ContactCounts>(&query)
            .bind(range.start)
            .bind(range.end)
            .fetch_one(pool)
            .await
    }

    /// Demo totals per status plus the summed conversion value within `range`.
    pub async fn demo_counts(pool: &PgPool, range: DateRange) -> Result<DemoCounts, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)::BIGINT AS total_demos,
                    COUNT(*) FILTER (WHERE status = 'pending')::BIGINT AS pending_demos,
                    COUNT(*) FILTER (WHERE status = 'demo_scheduled')::BIGINT AS scheduled_demos,
                    COUNT(*) FILTER (WHERE status = 'demo_completed')::BIGINT AS completed_demos,
                    COUNT(*) FILTER (WHERE status = 'demo_accepted')::BIGINT AS accepted_demos,
                    COUNT(*) FILTER (WHERE status = 'converted')::BIGINT AS converted_demos,
                    COALESCE(SUM(conversion_value), 0)::DOUBLE PRECISION AS total_conversion_value
             FROM demo_requests WHERE {RANGE}"
        );
        sqlx::query_as::<_, DemoCounts>(&query)
            .bind(range.start)
            .bind(range.end)
            .fetch_one(pool)
            .await
    }

    pub async fn recent_contacts(
        pool: &PgPool,
        range: DateRange,
        limit: i64,
    ) -> Result<Vec<RecentContact>, sqlx::Error> {
        let query = format!(
            "SELECT id, name, email, subject, status, created_at
             FROM contact_messages WHERE {RANGE}
             ORDER BY created_at DESC, id DESC LIMIT $3"
        );
        sqlx::query_as::<_, RecentContact>(&query)
            .bind(range.start)
            .bind(range.end)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn recent_demos(
        pool: &PgPool,
        range: DateRange,
        limit: i64,
    ) -> Result<Vec<RecentDemo>, sqlx::Error> {
        let query = format!(
            "SELECT id, name, business, email, status, created_at
             FROM demo_requests WHERE {RANGE}
             ORDER BY created_at DESC, id DESC LIMIT $3"
        );
        sqlx::query_as::<_, RecentDemo>(&query)
            .bind(range.start)
            .bind(range.end)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Most requested demo business types, largest first.
    pub async fn top_business_types(
        pool: &PgPool,
        range: DateRange,
        limit: i64,
    ) -> Result<Vec<BusinessTypeStat>, sqlx::Error> {
        let query = format!(
            "SELECT business_type, COUNT(*)::BIGINT AS count
             FROM demo_requests WHERE {RANGE}
             GROUP BY business_type
             ORDER BY count DESC, business_type ASC
             LIMIT $3"
        );
        sqlx::query_as::<_, BusinessTypeStat>(&query)
            .bind(range.start)
            .bind(range.end)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn system_stats(pool: &PgPool) -> Result<SystemStats, sqlx::Error> {
        sqlx::query_as::<_, SystemStats>(
            "SELECT
                (SELECT COUNT(*) FROM admins)::BIGINT AS total_admins,
                (SELECT COUNT(*) FROM admins WHERE is_active)::BIGINT AS active_admins,
                (SELECT COUNT(*) FROM contact_messages)::BIGINT AS total_contacts,
                (SELECT COUNT(*) FROM demo_requests)::BIGINT AS total_demos,
                (SELECT COUNT(*) FROM contact_messages
                   WHERE created_at >= NOW() - $1::BIGINT * INTERVAL '1 day')::BIGINT AS recent_contacts,
                (SELECT COUNT(*) FROM demo_requests
                   WHERE created_at >= NOW() - $1::BIGINT * INTERVAL '1 day')::BIGINT AS recent_demos",
        )
        .bind(RECENT_DAYS)
        .fetch_one(pool)
        .await
    }

    /// Demo funnel numbers within `range`.
    pub async fn demo_analytics(
        pool: &PgPool,
        range: DateRange,
    ) -> Result<DemoAnalytics, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)::BIGINT AS total_requests,
                    COUNT(*) FILTER (WHERE status = 'pending')::BIGINT AS pending_requests,
                    COUNT(*) FILTER (WHERE status = 'demo_scheduled')::BIGINT AS scheduled_demos,
                    COUNT(*) FILTER (WHERE status = 'demo_completed')::BIGINT AS completed_demos,
                    COUNT(*) FILTER (WHERE status = 'demo_accepted')::BIGINT AS accepted_demos,
                    COUNT(*) FILTER (WHERE status = 'converted')::BIGINT AS converted_leads,
                    COALESCE(SUM(conversion_value), 0)::DOUBLE PRECISION AS total_conversion_value,
                    COALESCE(AVG(conversion_value), 0)::DOUBLE PRECISION AS avg_conversion_value
             FROM demo_requests WHERE {RANGE}"
        );
        sqlx::query_as::<_, DemoAnalytics>(&query)
            .bind(range.start)
            .bind(range.end)
            .fetch_one(pool)
            .await
    }
}
