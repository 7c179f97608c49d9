//! Demo request entity model and DTOs.

use bizdesk_core::lead::{
    CurrentSoftware, DemoBusinessType, DemoPriority, DemoResponse, DemoStatus,
};
use bizdesk_core::listing::{PageRequest, SortSpec};
use bizdesk_core::notes::AdminNote;
use bizdesk_core::types::{RecordId, Timestamp};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row};

use crate::decode;

/// A row from the `demo_requests` table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoRequest {
    pub id: RecordId,
    pub name: String,
    pub business: String,
    pub phone: String,
    pub email: String,
    pub business_type: DemoBusinessType,
    pub current_software: CurrentSoftware,
    pub preferred_time: String,
    pub status: DemoStatus,
    pub demo_date: Option<Timestamp>,
    pub demo_notes: Option<String>,
    pub assigned_to: Option<RecordId>,
    pub admin_notes: Json<Vec<AdminNote>>,
    pub customer_response: DemoResponse,
    pub customer_feedback: Option<String>,
    pub conversion_value: Option<f64>,
    pub follow_up_date: Option<Timestamp>,
    pub priority: DemoPriority,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for DemoRequest {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode::text(row, "id")?,
            name: row.try_get("name")?,
            business: row.try_get("business")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            business_type: decode::text(row, "business_type")?,
            current_software: decode::text(row, "current_software")?,
            preferred_time: row.try_get("preferred_time")?,
            status: decode::text(row, "status")?,
            demo_date: row.try_get("demo_date")?,
            demo_notes: row.try_get("demo_notes")?,
            assigned_to: decode::optional_text(row, "assigned_to")?,
            admin_notes: row.try_get("admin_notes")?,
            customer_response: decode::text(row, "customer_response")?,
            customer_feedback: row.try_get("customer_feedback")?,
            conversion_value: row.try_get("conversion_value")?,
            follow_up_date: row.try_get("follow_up_date")?,
            priority: decode::text(row, "priority")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// DTO for inserting a demo request.
#[derive(Debug, Clone)]
pub struct CreateDemoRequest {
    pub name: String,
    pub business: String,
    pub phone: String,
    pub email: String,
    pub business_type: DemoBusinessType,
    pub current_software: CurrentSoftware,
    pub preferred_time: String,
}

/// DTO for staff updates. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateDemoRequest {
    pub status: Option<DemoStatus>,
    pub demo_date: Option<Timestamp>,
    pub demo_notes: Option<String>,
    /// `Some(None)` clears the assignee.
    pub assigned_to: Option<Option<RecordId>>,
    pub customer_response: Option<DemoResponse>,
    pub customer_feedback: Option<String>,
    pub conversion_value: Option<f64>,
    pub follow_up_date: Option<Timestamp>,
    pub priority: Option<DemoPriority>,
}

/// Filters for the demo list.
#[derive(Debug, Clone, Default)]
pub struct DemoFilter {
    pub status: Option<DemoStatus>,
    pub business_type: Option<DemoBusinessType>,
    pub assigned_to: Option<RecordId>,
    pub customer_response: Option<DemoResponse>,
    pub priority: Option<DemoPriority>,
    /// Pre-built `ILIKE` pattern.
    pub search: Option<String>,
    pub page: PageRequest,
    pub sort: SortSpec,
}
