//! Read-only aggregate shapes for the dashboard endpoints.

use std::collections::BTreeMap;

use bizdesk_core::lead::{ContactStatus, DemoBusinessType, DemoStatus};
use bizdesk_core::types::{RecordId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// `(value, count)` pair produced by a `GROUP BY`.
#[derive(Debug, Clone, FromRow)]
pub struct GroupCount {
    pub key: Option<String>,
    pub count: i64,
}

/// Fold group rows into a `value -> count` map. A `NULL` group is keyed
/// `"unset"`.
pub fn count_map(rows: Vec<GroupCount>) -> BTreeMap<String, i64> {
    rows.into_iter()
        .map(|r| (r.key.unwrap_or_else(|| "unset".to_string()), r.count))
        .collect()
}

/// Optional `[start, end]` window on `created_at`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl DateRange {
    /// A window applies only when both bounds are given.
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) => Self {
                start: Some(start),
                end: Some(end),
            },
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Default, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCounts {
    pub total_contacts: i64,
    pub new_contacts: i64,
    pub in_progress_contacts: i64,
    pub resolved_contacts: i64,
    pub closed_contacts: i64,
}

#[derive(Debug, Clone, Default, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoCounts {
    pub total_demos: i64,
    pub pending_demos: i64,
    pub scheduled_demos: i64,
    pub completed_demos: i64,
    pub accepted_demos: i64,
    pub converted_demos: i64,
    pub total_conversion_value: f64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentContact {
    #[sqlx(try_from = "String")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub subject: String,
    #[sqlx(try_from = "String")]
    pub status: ContactStatus,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentDemo {
    #[sqlx(try_from = "String")]
    pub id: RecordId,
    pub name: String,
    pub business: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub status: DemoStatus,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessTypeStat {
    #[sqlx(try_from = "String")]
    pub business_type: DemoBusinessType,
    pub count: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub total_admins: i64,
    pub active_admins: i64,
    pub total_contacts: i64,
    pub total_demos: i64,
    pub recent_contacts: i64,
    pub recent_demos: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoAnalytics {
    pub total_requests: i64,
    pub pending_requests: i64,
    pub scheduled_demos: i64,
    pub completed_demos: i64,
    pub accepted_demos: i64,
    pub converted_leads: i64,
    pub total_conversion_value: f64,
    pub avg_conversion_value: f64,
}
