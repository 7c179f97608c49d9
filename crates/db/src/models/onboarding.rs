//! Onboarding entity model and DTOs.

use bizdesk_core::listing::{PageRequest, SortSpec};
use bizdesk_core::notes::AdminNote;
use bizdesk_core::onboarding::{
    BusinessDetails, OnboardingForm, OnboardingStatus, PaymentDetails, PersonalDetails,
    PlanDetails, StepProgress,
};
use bizdesk_core::types::{RecordId, Timestamp};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row};

use crate::decode;

/// A row from the `onboardings` table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Onboarding {
    pub id: RecordId,
    pub personal_details: Json<PersonalDetails>,
    pub business_details: Json<BusinessDetails>,
    pub plan_details: Json<PlanDetails>,
    pub payment_details: Json<PaymentDetails>,
    pub notes: Option<String>,
    pub status: OnboardingStatus,
    pub current_step: i16,
    pub completed_steps: Vec<i16>,
    pub submitted_at: Option<Timestamp>,
    pub reviewed_at: Option<Timestamp>,
    pub reviewed_by: Option<RecordId>,
    pub admin_notes: Json<Vec<AdminNote>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for Onboarding {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode::text(row, "id")?,
            personal_details: row.try_get("personal_details")?,
            business_details: row.try_get("business_details")?,
            plan_details: row.try_get("plan_details")?,
            payment_details: row.try_get("payment_details")?,
            notes: row.try_get("notes")?,
            status: decode::text(row, "status")?,
            current_step: row.try_get("current_step")?,
            completed_steps: row.try_get("completed_steps")?,
            submitted_at: row.try_get("submitted_at")?,
            reviewed_at: row.try_get("reviewed_at")?,
            reviewed_by: decode::optional_text(row, "reviewed_by")?,
            admin_notes: row.try_get("admin_notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl Onboarding {
    pub fn form(&self) -> OnboardingForm {
        OnboardingForm {
            personal_details: self.personal_details.0.clone(),
            business_details: self.business_details.0.clone(),
            plan_details: self.plan_details.0.clone(),
            payment_details: self.payment_details.0.clone(),
            notes: self.notes.clone(),
        }
    }

    pub fn progress(&self) -> StepProgress {
        StepProgress {
            current_step: self.current_step,
            completed_steps: self.completed_steps.clone(),
        }
    }
}

/// Filters for the onboarding list.
#[derive(Debug, Clone, Default)]
pub struct OnboardingFilter {
    pub status: Option<OnboardingStatus>,
    /// Pre-built `ILIKE` pattern.
    pub search: Option<String>,
    pub page: PageRequest,
    pub sort: SortSpec,
}

/// Compact projection for the "recent" panel of the stats endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOnboarding {
    #[sqlx(try_from = "String")]
    pub id: RecordId,
    pub name: Option<String>,
    pub business_name: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: OnboardingStatus,
    pub created_at: Timestamp,
}
