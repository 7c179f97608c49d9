//! Contact message entity model and DTOs.

use bizdesk_core::client::ContactLead;
use bizdesk_core::lead::{ContactPriority, ContactResponse, ContactStatus};
use bizdesk_core::listing::{PageRequest, SortSpec};
use bizdesk_core::notes::AdminNote;
use bizdesk_core::types::{RecordId, Timestamp};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row};

use crate::decode;

/// A row from the `contact_messages` table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub priority: ContactPriority,
    pub assigned_to: Option<RecordId>,
    pub admin_notes: Json<Vec<AdminNote>>,
    pub customer_response: ContactResponse,
    pub customer_feedback: Option<String>,
    pub issue_solved: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for ContactMessage {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode::text(row, "id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            subject: row.try_get("subject")?,
            message: row.try_get("message")?,
            status: decode::text(row, "status")?,
            priority: decode::text(row, "priority")?,
            assigned_to: decode::optional_text(row, "assigned_to")?,
            admin_notes: row.try_get("admin_notes")?,
            customer_response: decode::text(row, "customer_response")?,
            customer_feedback: row.try_get("customer_feedback")?,
            issue_solved: row.try_get("issue_solved")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl ContactMessage {
    /// The fields needed to open a client record from this message.
    pub fn to_lead(&self) -> ContactLead {
        ContactLead {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            subject: self.subject.clone(),
            message: self.message.clone(),
            status: self.status,
            priority: self.priority,
            assigned_to: self.assigned_to.clone(),
            admin_notes: self.admin_notes.0.clone(),
            created_at: self.created_at,
        }
    }
}

/// DTO for inserting a contact message.
#[derive(Debug, Clone)]
pub struct CreateContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

/// DTO for staff updates. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateContactMessage {
    pub status: Option<ContactStatus>,
    pub priority: Option<ContactPriority>,
    /// `Some(None)` clears the assignee.
    pub assigned_to: Option<Option<RecordId>>,
    pub customer_response: Option<ContactResponse>,
    pub customer_feedback: Option<String>,
    pub issue_solved: Option<bool>,
}

/// Filters for the contact list.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
    pub priority: Option<ContactPriority>,
    pub assigned_to: Option<RecordId>,
    pub customer_response: Option<ContactResponse>,
    pub issue_solved: Option<bool>,
    /// Pre-built `ILIKE` pattern.
    pub search: Option<String>,
    pub page: PageRequest,
    pub sort: SortSpec,
}
