//! Client records: the eight sections, merge rules, creation defaults,
//! payment bookkeeping and the contact-to-client conversion.
//!
//! Every section struct has only optional leaves so a single shape serves
//! create bodies, partial updates and stored JSONB. Completeness is checked
//! once, on create, by [`ClientProfile::from_input`].

use chrono::Duration;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{CoreError, FieldError};
use crate::lead::{ContactPriority, ContactStatus};
use crate::notes::AdminNote;
use crate::types::{text_codes, RecordId, Timestamp};
use crate::validation::{email_normalized_opt, trimmed_opt, PHONE_RE, PINCODE_RE, REPO_LINK_RE, SUBDOMAIN_RE};

/// Minimum trimmed length of an internal note.
pub const INTERNAL_NOTE_MIN: usize = 5;
/// Maximum trimmed length of an internal note.
pub const INTERNAL_NOTE_MAX: usize = 1000;
/// Minimum trimmed length of an ongoing issue description.
pub const ISSUE_MIN: usize = 5;
/// Maximum trimmed length of an ongoing issue description.
pub const ISSUE_MAX: usize = 500;
/// Look-ahead window for upcoming payments.
pub const UPCOMING_PAYMENT_DAYS: i64 = 30;
/// Maximum number of upcoming payments listed.
pub const UPCOMING_PAYMENT_LIMIT: i64 = 10;

const DEFAULT_COUNTRY: &str = "India";
const DEFAULT_CURRENCY: &str = "INR";

macro_rules! merge_fields {
    ($target:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if $patch.$field.is_some() {
                $target.$field = $patch.$field;
            }
        )+
    };
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientBusinessType {
    Jewellery,
    Pawn,
    Other,
}

text_codes!(ClientStatus {
    Active => "active",
    Inactive => "inactive",
    Suspended => "suspended",
    Terminated => "terminated",
});
text_codes!(ClientBusinessType {
    Jewellery => "jewellery",
    Pawn => "pawn",
    Other => "other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DnsStatus {
    Active,
    Pending,
    Suspended,
}

impl DnsStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DnsStatus::Active => "active",
            DnsStatus::Pending => "pending",
            DnsStatus::Suspended => "suspended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontendPlatform {
    Netlify,
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendPlatform {
    Render,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SslStatus {
    Active,
    Pending,
    Expired,
    NotConfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupFrequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Quarterly => "quarterly",
            BillingCycle::Yearly => "yearly",
        }
    }

    /// Number of months one fee covers, as used by the revenue estimate.
    fn months(cycle: Option<BillingCycle>) -> f64 {
        match cycle {
            Some(BillingCycle::Monthly) => 1.0,
            Some(BillingCycle::Yearly) => 12.0,
            _ => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Upi,
    BankTransfer,
    Card,
    Cash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceLevel {
    Basic,
    Premium,
    Custom,
}

impl ServiceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceLevel::Basic => "basic",
            ServiceLevel::Premium => "premium",
            ServiceLevel::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl From<ContactPriority> for IssuePriority {
    fn from(p: ContactPriority) -> Self {
        match p {
            ContactPriority::Low => IssuePriority::Low,
            ContactPriority::Medium => IssuePriority::Medium,
            ContactPriority::High => IssuePriority::High,
            ContactPriority::Urgent => IssuePriority::Critical,
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BusinessAddress {
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "Street address cannot exceed 200 characters"))]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "City cannot exceed 100 characters"))]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "State cannot exceed 100 characters"))]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PINCODE_RE, message = "Please provide a valid 6-digit pincode"))]
    pub pincode: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl BusinessAddress {
    pub fn merge(&mut self, patch: BusinessAddress) {
        merge_fields!(self, patch; street, city, state, pincode, country);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DomainHosting {
    #[serde(default, deserialize_with = "subdomain_opt", skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 3, max = 50, message = "Subdomain must be between 3-50 characters"),
        regex(path = *SUBDOMAIN_RE, message = "Subdomain can only contain lowercase letters, numbers, and hyphens")
    )]
    pub subdomain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_status: Option<DnsStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_hosting_platform: Option<FrontendPlatform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_hosting_platform: Option<BackendPlatform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_certificate_status: Option<SslStatus>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Website theme cannot exceed 100 characters"))]
    pub website_theme_template: Option<String>,
}

impl DomainHosting {
    pub fn merge(&mut self, patch: DomainHosting) {
        merge_fields!(self, patch;
            subdomain, dns_status, frontend_hosting_platform,
            backend_hosting_platform, ssl_certificate_status, website_theme_template);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSystem {
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 100, message = "Database name must be between 3-100 characters"))]
    pub database_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 10, message = "Database connection URI must be at least 10 characters"))]
    pub connection_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_frequency: Option<BackupFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_backup_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 50, message = "Server environment cannot exceed 50 characters"))]
    pub server_environment: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Storage usage cannot exceed 100 characters"))]
    pub storage_usage: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *REPO_LINK_RE, message = "Please enter a valid GitHub or GitLab repository URL"))]
    pub backend_repo_link: Option<String>,
}

impl DatabaseSystem {
    pub fn merge(&mut self, patch: DatabaseSystem) {
        merge_fields!(self, patch;
            database_name, connection_uri, backup_frequency, last_backup_date,
            server_environment, storage_usage, backend_repo_link);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetupCost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Setup cost amount must be a positive number"))]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceFee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Maintenance fee amount must be a positive number"))]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PendingDues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Pending dues must be a positive number"))]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Billing {
    #[serde(default)]
    #[validate(nested)]
    pub setup_cost: SetupCost,
    #[serde(default)]
    #[validate(nested)]
    pub maintenance_fee: MaintenanceFee,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_cycle: Option<BillingCycle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_payment_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_payment_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    #[validate(nested)]
    pub pending_dues: PendingDues,
}

impl Billing {
    pub fn merge(&mut self, patch: Billing) {
        merge_fields!(self.setup_cost, patch.setup_cost; paid, amount);
        merge_fields!(self.maintenance_fee, patch.maintenance_fee; amount, currency);
        merge_fields!(self, patch;
            billing_cycle, last_payment_date, next_payment_date, payment_method);
        merge_fields!(self.pending_dues, patch.pending_dues; amount, description);
    }

    /// Fee normalised to one month: monthly as-is, yearly / 12, anything
    /// else / 3.
    pub fn monthly_equivalent(&self) -> f64 {
        self.maintenance_fee.amount.unwrap_or(0.0) / BillingCycle::months(self.billing_cycle)
    }

    /// Record a payment. Provided dates and method overwrite the stored ones;
    /// a positive amount reduces pending dues, never below zero.
    pub fn apply_payment(&mut self, payment: PaymentUpdate) {
        merge_fields!(self, payment; payment_method, next_payment_date);
        if payment.payment_date.is_some() {
            self.last_payment_date = payment.payment_date;
        }
        if let Some(amount) = payment.amount.filter(|a| *a > 0.0) {
            let due = self.pending_dues.amount.unwrap_or(0.0);
            self.pending_dues.amount = Some((due - amount).max(0.0));
        }
    }
}

/// Body of the payment endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Payment amount must be a positive number"))]
    pub amount: Option<f64>,
    #[serde(default)]
    pub payment_date: Option<Timestamp>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub next_payment_date: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OngoingIssue {
    pub issue: String,
    pub priority: IssuePriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<RecordId>,
    pub reported_date: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSupport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Support tickets count must be a non-negative integer"))]
    pub support_tickets_count: Option<i32>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    pub ticket_system_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_support_request_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_level: Option<ServiceLevel>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Custom features requested cannot exceed 1000 characters"))]
    pub custom_features_requested: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Previous issues history cannot exceed 2000 characters"))]
    pub previous_issues_history: Option<String>,
    /// Append-only; grows through the issues endpoint only.
    #[serde(default)]
    pub ongoing_issues: Vec<OngoingIssue>,
}

impl ServiceSupport {
    /// Merge scalar fields. `ongoing_issues` is never replaced by a patch.
    pub fn merge(&mut self, patch: ServiceSupport) {
        merge_fields!(self, patch;
            support_tickets_count, ticket_system_link, last_support_request_date,
            service_level, custom_features_requested, previous_issues_history);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_notifications: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_notifications: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationNotifications {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_email_alerts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reminder: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_expiry: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_renewal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_sla_reminder: Option<bool>,
    #[serde(default)]
    pub notification_settings: NotificationSettings,
}

impl AutomationNotifications {
    pub fn merge(&mut self, patch: AutomationNotifications) {
        merge_fields!(self, patch;
            auto_email_alerts, backup_completed, payment_reminder,
            ssl_expiry, domain_renewal, support_sla_reminder);
        merge_fields!(self.notification_settings, patch.notification_settings;
            email_notifications, sms_notifications, whatsapp_notifications);
    }

    fn fill_defaults(&mut self) {
        for flag in [
            &mut self.auto_email_alerts,
            &mut self.backup_completed,
            &mut self.payment_reminder,
            &mut self.ssl_expiry,
            &mut self.domain_renewal,
            &mut self.support_sla_reminder,
        ] {
            flag.get_or_insert(true);
        }
        let settings = &mut self.notification_settings;
        settings.email_notifications.get_or_insert(true);
        settings.sms_notifications.get_or_insert(false);
        settings.whatsapp_notifications.get_or_insert(false);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalNote {
    pub note: String,
    pub added_by: RecordId,
    pub added_at: Timestamp,
    pub is_private: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentsNotes {
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Contract PDF path cannot exceed 500 characters"))]
    pub contract_pdf: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Custom design files info cannot exceed 1000 characters"))]
    pub custom_design_files: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Client specific instructions cannot exceed 2000 characters"))]
    pub client_specific_instructions: Option<String>,
    /// Append-only; grows through the notes endpoint only.
    #[serde(default)]
    pub internal_notes: Vec<InternalNote>,
}

impl AttachmentsNotes {
    /// Merge scalar fields. `internal_notes` is never replaced by a patch.
    pub fn merge(&mut self, patch: AttachmentsNotes) {
        merge_fields!(self, patch; contract_pdf, custom_design_files, client_specific_instructions);
    }
}

fn subdomain_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_lowercase()))
}

// ---------------------------------------------------------------------------
// Input & profile
// ---------------------------------------------------------------------------

/// Request body for both create and partial update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 3, max = 50, message = "Client ID must be between 3-50 characters"))]
    pub client_id: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 2, max = 200, message = "Business name must be between 2-200 characters"))]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 2, max = 100, message = "Owner/Contact name must be between 2-100 characters"))]
    pub owner_contact_name: Option<String>,
    #[serde(default, deserialize_with = "email_normalized_opt")]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(regex(path = *PHONE_RE, message = "Please provide a valid 10-digit phone number"))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub business_address: BusinessAddress,
    #[serde(default)]
    pub onboarding_date: Option<Timestamp>,
    #[serde(default)]
    pub assigned_sales_rep: Option<RecordId>,
    #[serde(default)]
    pub business_type: Option<ClientBusinessType>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(max = 100, message = "Business category cannot exceed 100 characters"))]
    pub business_category: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub target_audience: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(max = 1000, message = "Business description cannot exceed 1000 characters"))]
    pub business_description: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub domain_hosting: DomainHosting,
    #[serde(default)]
    #[validate(nested)]
    pub database_system: DatabaseSystem,
    #[serde(default)]
    #[validate(nested)]
    pub billing: Billing,
    #[serde(default)]
    #[validate(nested)]
    pub service_support: ServiceSupport,
    #[serde(default)]
    pub automation_notifications: AutomationNotifications,
    #[serde(default)]
    #[validate(nested)]
    pub attachments_notes: AttachmentsNotes,
    #[serde(default)]
    pub status: Option<ClientStatus>,
}

/// The editable content of a client, with required fields resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientProfile {
    pub client_id: String,
    pub business_name: String,
    pub owner_contact_name: String,
    pub email: String,
    pub phone: String,
    pub business_address: BusinessAddress,
    pub onboarding_date: Timestamp,
    pub assigned_sales_rep: Option<RecordId>,
    pub business_type: ClientBusinessType,
    pub business_category: Option<String>,
    pub target_audience: Option<String>,
    pub business_description: Option<String>,
    pub domain_hosting: DomainHosting,
    pub database_system: DatabaseSystem,
    pub billing: Billing,
    pub service_support: ServiceSupport,
    pub automation_notifications: AutomationNotifications,
    pub attachments_notes: AttachmentsNotes,
    pub status: ClientStatus,
}

fn required<T>(value: Option<T>, field: &str, label: &str, missing: &mut Vec<FieldError>) -> Option<T> {
    if value.is_none() {
        missing.push(FieldError::new(field, format!("{label} is required")));
    }
    value
}

impl ClientProfile {
    /// Resolve a create body into a full profile: check required fields,
    /// default the rest, and start with empty note and issue logs.
    ///
    /// `sales_rep` is used when the body names no sales rep.
    pub fn from_input(input: ClientInput, sales_rep: &RecordId) -> Result<Self, CoreError> {
        let mut missing = Vec::new();
        let ClientInput {
            client_id,
            business_name,
            owner_contact_name,
            email,
            phone,
            business_address,
            onboarding_date,
            assigned_sales_rep,
            business_type,
            business_category,
            target_audience,
            business_description,
            mut domain_hosting,
            mut database_system,
            mut billing,
            mut service_support,
            mut automation_notifications,
            mut attachments_notes,
            status,
        } = input;

        let business_name = required(business_name, "businessName", "Business name", &mut missing);
        let owner_contact_name = required(
            owner_contact_name,
            "ownerContactName",
            "Owner/Contact name",
            &mut missing,
        );
        let email = required(email, "email", "Email", &mut missing);
        let phone = required(phone, "phone", "Phone number", &mut missing);
        let business_type = required(business_type, "businessType", "Business type", &mut missing);
        required(
            domain_hosting.subdomain.as_ref(),
            "domainHosting.subdomain",
            "Subdomain",
            &mut missing,
        );
        required(
            database_system.database_name.as_ref(),
            "databaseSystem.databaseName",
            "Database name",
            &mut missing,
        );
        required(
            database_system.connection_uri.as_ref(),
            "databaseSystem.connectionUri",
            "Database connection URI",
            &mut missing,
        );
        required(
            billing.maintenance_fee.amount,
            "billing.maintenanceFee.amount",
            "Maintenance fee amount",
            &mut missing,
        );
        required(billing.billing_cycle, "billing.billingCycle", "Billing cycle", &mut missing);
        required(billing.payment_method, "billing.paymentMethod", "Payment method", &mut missing);

        let status = status.unwrap_or_default();
        if status == ClientStatus::Active {
            required(
                billing.next_payment_date,
                "billing.nextPaymentDate",
                "Next payment date",
                &mut missing,
            );
        }

        let (
            Some(business_name),
            Some(owner_contact_name),
            Some(email),
            Some(phone),
            Some(business_type),
            true,
        ) = (
            business_name,
            owner_contact_name,
            email,
            phone,
            business_type,
            missing.is_empty(),
        )
        else {
            return Err(CoreError::InvalidFields(missing));
        };

        let mut business_address = business_address;
        business_address
            .country
            .get_or_insert_with(|| DEFAULT_COUNTRY.to_string());
        domain_hosting.dns_status.get_or_insert(DnsStatus::Pending);
        domain_hosting
            .frontend_hosting_platform
            .get_or_insert(FrontendPlatform::Netlify);
        domain_hosting
            .backend_hosting_platform
            .get_or_insert(BackendPlatform::Render);
        domain_hosting
            .ssl_certificate_status
            .get_or_insert(SslStatus::Pending);
        database_system
            .backup_frequency
            .get_or_insert(BackupFrequency::Weekly);
        billing.setup_cost.paid.get_or_insert(false);
        billing
            .maintenance_fee
            .currency
            .get_or_insert_with(|| DEFAULT_CURRENCY.to_string());
        billing.pending_dues.amount.get_or_insert(0.0);
        service_support.support_tickets_count.get_or_insert(0);
        service_support.service_level.get_or_insert(ServiceLevel::Basic);
        service_support.ongoing_issues.clear();
        automation_notifications.fill_defaults();
        attachments_notes.internal_notes.clear();

        Ok(Self {
            client_id: client_id.unwrap_or_else(generate_client_id),
            business_name,
            owner_contact_name,
            email,
            phone,
            business_address,
            onboarding_date: onboarding_date.unwrap_or_else(chrono::Utc::now),
            assigned_sales_rep: assigned_sales_rep.or_else(|| Some(sales_rep.clone())),
            business_type,
            business_category,
            target_audience,
            business_description,
            domain_hosting,
            database_system,
            billing,
            service_support,
            automation_notifications,
            attachments_notes,
            status,
        })
    }

    /// Merge a partial update. Provided fields overwrite stored ones,
    /// section by section; note and issue logs are left untouched.
    pub fn apply_patch(&mut self, patch: ClientInput) -> Result<(), CoreError> {
        merge_fields!(self, patch;
            assigned_sales_rep, business_category, target_audience, business_description);
        if let Some(v) = patch.client_id {
            self.client_id = v;
        }
        if let Some(v) = patch.business_name {
            self.business_name = v;
        }
        if let Some(v) = patch.owner_contact_name {
            self.owner_contact_name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.onboarding_date {
            self.onboarding_date = v;
        }
        if let Some(v) = patch.business_type {
            self.business_type = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        self.business_address.merge(patch.business_address);
        self.domain_hosting.merge(patch.domain_hosting);
        self.database_system.merge(patch.database_system);
        self.billing.merge(patch.billing);
        self.service_support.merge(patch.service_support);
        self.automation_notifications.merge(patch.automation_notifications);
        self.attachments_notes.merge(patch.attachments_notes);
        self.check_active_billing()
    }

    /// Active clients must carry a next payment date.
    pub fn check_active_billing(&self) -> Result<(), CoreError> {
        if self.status == ClientStatus::Active && self.billing.next_payment_date.is_none() {
            return Err(CoreError::InvalidFields(vec![FieldError::new(
                "billing.nextPaymentDate",
                "Next payment date is required",
            )]));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// `"CL"` + Unix milliseconds + 4 upper-case alphanumerics.
pub fn generate_client_id() -> String {
    format!(
        "CL{}{}",
        chrono::Utc::now().timestamp_millis(),
        random_alphanumeric(4).to_uppercase()
    )
}

/// Estimated monthly revenue over the given billing sections.
pub fn estimated_monthly_revenue<'a>(billings: impl IntoIterator<Item = &'a Billing>) -> f64 {
    billings.into_iter().map(Billing::monthly_equivalent).sum()
}

/// Lowercased alphanumeric characters of `name`.
fn slug(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ---------------------------------------------------------------------------
// Contact conversion
// ---------------------------------------------------------------------------

/// The parts of a contact message needed to open a client record.
#[derive(Debug, Clone)]
pub struct ContactLead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub priority: ContactPriority,
    pub assigned_to: Option<RecordId>,
    pub admin_notes: Vec<AdminNote>,
    pub created_at: Timestamp,
}

/// Open a client record from a contact message with placeholder billing
/// and hosting values that staff complete later.
pub fn client_from_contact(contact: ContactLead) -> ClientProfile {
    let now = chrono::Utc::now();
    let base = slug(&contact.name);
    let subdomain = format!("{base}{}", random_alphanumeric(4).to_lowercase());
    let database_name = format!("db_{base}_{}", now.timestamp_millis());

    let ongoing_issues = if contact.status == ContactStatus::Resolved {
        Vec::new()
    } else {
        vec![OngoingIssue {
            issue: contact.message.clone(),
            priority: contact.priority.into(),
            assigned_to: contact.assigned_to.clone(),
            reported_date: contact.created_at,
        }]
    };

    let internal_notes = contact
        .admin_notes
        .into_iter()
        .map(|n| InternalNote {
            note: n.note,
            added_by: n.added_by,
            added_at: n.added_at,
            is_private: true,
        })
        .collect();

    let business_name = if contact.subject.trim().is_empty() {
        format!("Business - {}", contact.name)
    } else {
        contact.subject
    };

    let mut automation_notifications = AutomationNotifications::default();
    automation_notifications.fill_defaults();

    ClientProfile {
        client_id: generate_client_id(),
        business_name,
        owner_contact_name: contact.name,
        email: contact.email,
        phone: contact.phone,
        business_address: BusinessAddress {
            country: Some(DEFAULT_COUNTRY.to_string()),
            ..Default::default()
        },
        onboarding_date: contact.created_at,
        assigned_sales_rep: contact.assigned_to,
        business_type: ClientBusinessType::Other,
        business_category: None,
        target_audience: None,
        business_description: Some(contact.message),
        domain_hosting: DomainHosting {
            subdomain: Some(subdomain),
            dns_status: Some(DnsStatus::Pending),
            frontend_hosting_platform: Some(FrontendPlatform::Netlify),
            backend_hosting_platform: Some(BackendPlatform::Render),
            ssl_certificate_status: Some(SslStatus::Pending),
            website_theme_template: Some("default".to_string()),
        },
        database_system: DatabaseSystem {
            connection_uri: Some(format!("postgres://localhost:5432/{database_name}")),
            database_name: Some(database_name),
            backup_frequency: Some(BackupFrequency::Weekly),
            ..Default::default()
        },
        billing: Billing {
            setup_cost: SetupCost {
                paid: Some(false),
                amount: Some(0.0),
            },
            maintenance_fee: MaintenanceFee {
                amount: Some(1000.0),
                currency: Some(DEFAULT_CURRENCY.to_string()),
            },
            billing_cycle: Some(BillingCycle::Monthly),
            last_payment_date: None,
            next_payment_date: Some(now + Duration::days(UPCOMING_PAYMENT_DAYS)),
            payment_method: Some(PaymentMethod::Upi),
            pending_dues: PendingDues {
                amount: Some(0.0),
                description: None,
            },
        },
        service_support: ServiceSupport {
            support_tickets_count: Some(1),
            last_support_request_date: Some(contact.created_at),
            service_level: Some(ServiceLevel::Basic),
            ongoing_issues,
            ..Default::default()
        },
        automation_notifications,
        attachments_notes: AttachmentsNotes {
            internal_notes,
            ..Default::default()
        },
        status: if contact.status == ContactStatus::Closed {
            ClientStatus::Inactive
        } else {
            ClientStatus::Active
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn rep() -> RecordId {
        RecordId::generate()
    }

    fn create_body() -> ClientInput {
        serde_json::from_value(json!({
            "businessName": "Lakshmi Jewellers",
            "ownerContactName": "Lakshmi",
            "email": "  Owner@Lakshmi.IN ",
            "phone": "9876543210",
            "businessType": "jewellery",
            "domainHosting": { "subdomain": "Lakshmi-Gold" },
            "databaseSystem": {
                "databaseName": "lakshmi_db",
                "connectionUri": "postgres://db.internal/lakshmi"
            },
            "billing": {
                "maintenanceFee": { "amount": 1200 },
                "billingCycle": "quarterly",
                "paymentMethod": "upi",
                "nextPaymentDate": "2026-11-01T00:00:00Z",
                "pendingDues": { "amount": 500 }
            },
            "serviceSupport": {
                "ongoingIssues": [{
                    "issue": "smuggled", "priority": "low",
                    "reportedDate": "2026-01-01T00:00:00Z"
                }]
            }
        }))
        .unwrap()
    }

    #[test]
    fn create_applies_defaults_and_normalises() {
        let sales_rep = rep();
        let body = create_body();
        assert!(body.validate().is_ok());
        let profile = ClientProfile::from_input(body, &sales_rep).unwrap();

        assert_eq!(profile.email, "owner@lakshmi.in");
        assert_eq!(profile.domain_hosting.subdomain.as_deref(), Some("lakshmi-gold"));
        assert_eq!(profile.status, ClientStatus::Active);
        assert_eq!(profile.assigned_sales_rep, Some(sales_rep));
        assert_eq!(profile.business_address.country.as_deref(), Some("India"));
        assert_eq!(profile.billing.maintenance_fee.currency.as_deref(), Some("INR"));
        assert_eq!(profile.domain_hosting.dns_status, Some(DnsStatus::Pending));
        assert_eq!(profile.automation_notifications.auto_email_alerts, Some(true));
        assert_eq!(
            profile.automation_notifications.notification_settings.sms_notifications,
            Some(false)
        );
        assert!(profile.service_support.ongoing_issues.is_empty());
        assert!(profile.client_id.starts_with("CL"));
    }

    #[test]
    fn create_reports_every_missing_field() {
        let err = ClientProfile::from_input(ClientInput::default(), &rep()).unwrap_err();
        let CoreError::InvalidFields(fields) = err else {
            panic!("expected InvalidFields");
        };
        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert!(names.contains(&"businessName"));
        assert!(names.contains(&"domainHosting.subdomain"));
        assert!(names.contains(&"billing.nextPaymentDate"));
    }

    #[test]
    fn inactive_client_needs_no_next_payment() {
        let mut body = create_body();
        body.billing.next_payment_date = None;
        body.status = Some(ClientStatus::Inactive);
        assert!(ClientProfile::from_input(body, &rep()).is_ok());
    }

    #[test]
    fn patch_merges_sections_and_keeps_logs() {
        let mut profile = ClientProfile::from_input(create_body(), &rep()).unwrap();
        profile.service_support.ongoing_issues.push(OngoingIssue {
            issue: "SSL renewal failing".into(),
            priority: IssuePriority::High,
            assigned_to: None,
            reported_date: chrono::Utc::now(),
        });

        let patch: ClientInput = serde_json::from_value(json!({
            "billing": { "billingCycle": "yearly" },
            "serviceSupport": { "serviceLevel": "premium", "ongoingIssues": [] }
        }))
        .unwrap();
        profile.apply_patch(patch).unwrap();

        assert_eq!(profile.billing.billing_cycle, Some(BillingCycle::Yearly));
        assert_eq!(profile.billing.payment_method, Some(PaymentMethod::Upi));
        assert_eq!(profile.billing.maintenance_fee.amount, Some(1200.0));
        assert_eq!(profile.service_support.service_level, Some(ServiceLevel::Premium));
        assert_eq!(profile.service_support.ongoing_issues.len(), 1);
    }

    #[test]
    fn reactivating_without_next_payment_is_rejected() {
        let mut body = create_body();
        body.billing.next_payment_date = None;
        body.status = Some(ClientStatus::Suspended);
        let mut profile = ClientProfile::from_input(body, &rep()).unwrap();

        let patch = ClientInput {
            status: Some(ClientStatus::Active),
            ..Default::default()
        };
        assert_matches!(profile.apply_patch(patch), Err(CoreError::InvalidFields(_)));
    }

    #[test]
    fn payment_reduces_dues_and_floors_at_zero() {
        let mut billing = Billing {
            pending_dues: PendingDues {
                amount: Some(500.0),
                description: None,
            },
            ..Default::default()
        };
        billing.apply_payment(PaymentUpdate {
            amount: Some(200.0),
            ..Default::default()
        });
        assert_eq!(billing.pending_dues.amount, Some(300.0));

        let paid_at = chrono::Utc::now();
        billing.apply_payment(PaymentUpdate {
            amount: Some(1000.0),
            payment_date: Some(paid_at),
            payment_method: Some(PaymentMethod::Cash),
            next_payment_date: None,
        });
        assert_eq!(billing.pending_dues.amount, Some(0.0));
        assert_eq!(billing.last_payment_date, Some(paid_at));
        assert_eq!(billing.payment_method, Some(PaymentMethod::Cash));
    }

    #[test]
    fn monthly_revenue_normalises_cycles() {
        let fee = |amount: f64, cycle| Billing {
            maintenance_fee: MaintenanceFee {
                amount: Some(amount),
                currency: None,
            },
            billing_cycle: cycle,
            ..Default::default()
        };
        let billings = [
            fee(1000.0, Some(BillingCycle::Monthly)),
            fee(12000.0, Some(BillingCycle::Yearly)),
            fee(3000.0, Some(BillingCycle::Quarterly)),
            fee(300.0, None),
        ];
        assert_eq!(estimated_monthly_revenue(&billings), 3100.0);
    }

    #[test]
    fn client_id_shape() {
        let id = generate_client_id();
        assert!(id.starts_with("CL"));
        let suffix = &id[id.len() - 4..];
        assert!(suffix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    fn lead(status: ContactStatus) -> ContactLead {
        let author = RecordId::generate();
        ContactLead {
            name: "Arun Kumar".into(),
            email: "arun@example.com".into(),
            phone: "9876543210".into(),
            subject: String::new(),
            message: "Need billing software for my shop".into(),
            status,
            priority: ContactPriority::Urgent,
            assigned_to: None,
            admin_notes: vec![AdminNote::new("Called back".into(), author)],
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn contact_conversion_defaults() {
        let client = client_from_contact(lead(ContactStatus::InProgress));
        assert_eq!(client.business_name, "Business - Arun Kumar");
        assert_eq!(client.business_type, ClientBusinessType::Other);
        assert_eq!(client.status, ClientStatus::Active);
        assert!(client
            .domain_hosting
            .subdomain
            .as_deref()
            .unwrap()
            .starts_with("arunkumar"));
        assert_eq!(client.billing.maintenance_fee.amount, Some(1000.0));
        assert_eq!(client.billing.billing_cycle, Some(BillingCycle::Monthly));
        assert_eq!(client.service_support.ongoing_issues.len(), 1);
        assert_eq!(
            client.service_support.ongoing_issues[0].priority,
            IssuePriority::Critical
        );
        assert!(client.attachments_notes.internal_notes[0].is_private);
        assert!(client.check_active_billing().is_ok());
    }

    #[test]
    fn closed_or_resolved_contacts_convert_accordingly() {
        let closed = client_from_contact(lead(ContactStatus::Closed));
        assert_eq!(closed.status, ClientStatus::Inactive);

        let resolved = client_from_contact(lead(ContactStatus::Resolved));
        assert!(resolved.service_support.ongoing_issues.is_empty());
    }
}
