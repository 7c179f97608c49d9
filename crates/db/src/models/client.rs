//! Client entity model and DTOs.

use bizdesk_core::client::{
    AttachmentsNotes, AutomationNotifications, Billing, BillingCycle, BusinessAddress,
    ClientBusinessType, ClientProfile, ClientStatus, DatabaseSystem, DnsStatus, DomainHosting,
    MaintenanceFee, ServiceLevel, ServiceSupport,
};
use bizdesk_core::listing::{PageRequest, SortSpec};
use bizdesk_core::types::{RecordId, Timestamp};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row};

use crate::decode;

/// A row from the `clients` table. Sections are JSONB columns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: RecordId,
    pub client_id: String,
    pub business_name: String,
    pub owner_contact_name: String,
    pub email: String,
    pub phone: String,
    pub business_address: Json<BusinessAddress>,
    pub onboarding_date: Timestamp,
    pub assigned_sales_rep: Option<RecordId>,
    pub business_type: ClientBusinessType,
    pub business_category: Option<String>,
    pub target_audience: Option<String>,
    pub business_description: Option<String>,
    pub domain_hosting: Json<DomainHosting>,
    pub database_system: Json<DatabaseSystem>,
    pub billing: Json<Billing>,
    pub service_support: Json<ServiceSupport>,
    pub automation_notifications: Json<AutomationNotifications>,
    pub attachments_notes: Json<AttachmentsNotes>,
    pub status: ClientStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for Client {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode::text(row, "id")?,
            client_id: row.try_get("client_id")?,
            business_name: row.try_get("business_name")?,
            owner_contact_name: row.try_get("owner_contact_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            business_address: row.try_get("business_address")?,
            onboarding_date: row.try_get("onboarding_date")?,
            assigned_sales_rep: decode::optional_text(row, "assigned_sales_rep")?,
            business_type: decode::text(row, "business_type")?,
            business_category: row.try_get("business_category")?,
            target_audience: row.try_get("target_audience")?,
            business_description: row.try_get("business_description")?,
            domain_hosting: row.try_get("domain_hosting")?,
            database_system: row.try_get("database_system")?,
            billing: row.try_get("billing")?,
            service_support: row.try_get("service_support")?,
            automation_notifications: row.try_get("automation_notifications")?,
            attachments_notes: row.try_get("attachments_notes")?,
            status: decode::text(row, "status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl Client {
    /// Editable content of the row, for read-modify-write updates.
    pub fn into_profile(self) -> ClientProfile {
        ClientProfile {
            client_id: self.client_id,
            business_name: self.business_name,
            owner_contact_name: self.owner_contact_name,
            email: self.email,
            phone: self.phone,
            business_address: self.business_address.0,
            onboarding_date: self.onboarding_date,
            assigned_sales_rep: self.assigned_sales_rep,
            business_type: self.business_type,
            business_category: self.business_category,
            target_audience: self.target_audience,
            business_description: self.business_description,
            domain_hosting: self.domain_hosting.0,
            database_system: self.database_system.0,
            billing: self.billing.0,
            service_support: self.service_support.0,
            automation_notifications: self.automation_notifications.0,
            attachments_notes: self.attachments_notes.0,
            status: self.status,
        }
    }
}

/// Filters for the client list.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub status: Option<ClientStatus>,
    pub business_type: Option<ClientBusinessType>,
    pub service_level: Option<ServiceLevel>,
    pub dns_status: Option<DnsStatus>,
    pub billing_cycle: Option<BillingCycle>,
    pub assigned_sales_rep: Option<RecordId>,
    /// Pre-built `ILIKE` pattern.
    pub search: Option<String>,
    pub page: PageRequest,
    pub sort: SortSpec,
}

/// An active client whose next payment falls inside the look-ahead window.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingPayment {
    #[sqlx(try_from = "String")]
    pub id: RecordId,
    pub client_id: String,
    pub business_name: String,
    pub next_payment_date: Timestamp,
    pub maintenance_fee: Json<MaintenanceFee>,
}

/// Headline numbers for the client dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDashboardStats {
    pub total_clients: i64,
    pub active_clients: i64,
    pub suspended_clients: i64,
    pub overdue_payments: i64,
    pub clients_with_issues: i64,
    pub estimated_monthly_revenue: f64,
}
