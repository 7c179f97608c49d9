//! Onboarding lifecycle: section structs, step tracking, pricing and the
//! edit / submit guards.
//!
//! An onboarding is one permissive shape: every field is optional while the
//! form is a `Draft`. Completeness is only enforced at [`ensure_submittable`],
//! which requires steps 1-4 to have been saved at least once.
//!
//! Step map:
//!
//! | Step | Section            | Merge                       |
//! |------|--------------------|-----------------------------|
//! | 1    | `personalDetails`  | shallow                     |
//! | 2    | `businessDetails`  | shallow                     |
//! | 3    | `planDetails`      | shallow                     |
//! | 4    | `paymentDetails`   | shallow                     |
//! | 5    | `notes`            | replaced when non-empty     |

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::text_codes;
use crate::validation::{GST_RE, PHONE_RE};

/// First step of the form.
pub const FIRST_STEP: i16 = 1;
/// Last step of the form.
pub const LAST_STEP: i16 = 5;
/// Steps that must be completed before the form can be submitted.
pub const REQUIRED_STEPS: [i16; 4] = [1, 2, 3, 4];

/// Default for `personalDetails.state` on a new form.
pub const DEFAULT_STATE: &str = "Tamil Nadu";
/// Default for `planDetails.accessType` on a new form.
pub const DEFAULT_ACCESS_TYPE: &str = "Lifetime Access";

/// Copy every `Some` field of `$patch` onto `$target`, leaving the rest.
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
// Status
// ---------------------------------------------------------------------------

/// Review status of an onboarding.
///
/// Only `Draft -> Submitted` is guarded; staff may set any value directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OnboardingStatus {
    #[default]
    Draft,
    Submitted,
    #[serde(rename = "Under Review")]
    UnderReview,
    Approved,
    Rejected,
}

text_codes!(OnboardingStatus {
    Draft => "Draft",
    Submitted => "Submitted",
    UnderReview => "Under Review",
    Approved => "Approved",
    Rejected => "Rejected",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessSize {
    Small,
    Medium,
    Large,
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenanceFrequency {
    Monthly,
    Quarterly,
    #[serde(rename = "Half Yearly")]
    HalfYearly,
    Yearly,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Step 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 100, message = "Name must be between 2-100 characters"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 100, message = "Father name must be between 2-100 characters"))]
    pub father_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 10, max = 500, message = "Address must be between 10-500 characters"))]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 50, message = "State must be between 2-50 characters"))]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 50, message = "District must be between 2-50 characters"))]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE_RE, message = "Please provide a valid 10-digit phone number"))]
    pub phone_number1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE_RE, message = "Please provide a valid 10-digit phone number"))]
    pub phone_number2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 100, message = "Nominee name must be between 2-100 characters"))]
    pub nominee_name: Option<String>,
}

impl PersonalDetails {
    pub fn merge(&mut self, patch: PersonalDetails) {
        merge_fields!(self, patch;
            name, father_name, address, state, district,
            phone_number1, phone_number2, nominee_name);
    }
}

/// Step 2.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 200, message = "Business name must be between 2-200 characters"))]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 10, max = 500, message = "Business address must be between 10-500 characters"))]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 50, message = "Business state must be between 2-50 characters"))]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 50, message = "Business district must be between 2-50 characters"))]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE_RE, message = "Please provide a valid 10-digit business phone number"))]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *GST_RE, message = "Please provide a valid GST number"))]
    pub gst_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 10, max = 1000, message = "Business description must be between 10-1000 characters"))]
    pub business_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_size: Option<BusinessSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 100, message = "Years of business must be between 0-100"))]
    pub years_of_business: Option<i32>,
}

impl BusinessDetails {
    pub fn merge(&mut self, patch: BusinessDetails) {
        merge_fields!(self, patch;
            business_name, address, state, district, phone_number, gst_number,
            business_description, business_size, years_of_business);
    }
}

/// Step 3.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlanDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Access type cannot exceed 100 characters"))]
    pub access_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_frequency: Option<MaintenanceFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_pricing: Option<bool>,
    /// Free-form pricing sheet chosen on the client side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_data: Option<serde_json::Value>,
}

impl PlanDetails {
    pub fn merge(&mut self, patch: PlanDetails) {
        merge_fields!(self, patch; access_type, maintenance_frequency, custom_pricing, pricing_data);
    }
}

/// One-off extras added on top of the plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalCosts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Cost cannot be negative"))]
    pub constant: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Cost cannot be negative"))]
    pub hosting: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Cost cannot be negative"))]
    pub domain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Cost cannot be negative"))]
    pub storage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Cost cannot be negative"))]
    pub maintenance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Cost cannot be negative"))]
    pub website_cost: Option<f64>,
}

impl AdditionalCosts {
    pub fn merge(&mut self, patch: AdditionalCosts) {
        merge_fields!(self, patch; constant, hosting, domain, storage, maintenance, website_cost);
    }

    pub fn sum(&self) -> f64 {
        [
            self.constant,
            self.hosting,
            self.domain,
            self.storage,
            self.maintenance,
            self.website_cost,
        ]
        .iter()
        .map(|c| c.unwrap_or(0.0))
        .sum()
    }
}

/// Step 4. `total_amount` is derived; values sent by callers are discarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Plan price must be a positive number"))]
    pub plan_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Project price must be a positive number"))]
    pub project_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "Hosting yearly price must be a positive number"))]
    pub hosting_yearly_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub additional_costs: Option<AdditionalCosts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
}

impl PaymentDetails {
    /// Shallow merge: a provided `additionalCosts` object replaces the stored one.
    pub fn merge(&mut self, patch: PaymentDetails) {
        merge_fields!(self, patch; plan_price, project_price, hosting_yearly_price, additional_costs);
    }

    /// Deep merge: `additionalCosts` is merged field by field.
    pub fn merge_deep(&mut self, patch: PaymentDetails) {
        merge_fields!(self, patch; plan_price, project_price, hosting_yearly_price);
        if let Some(costs) = patch.additional_costs {
            self.additional_costs
                .get_or_insert_with(AdditionalCosts::default)
                .merge(costs);
        }
    }

    /// Sum of every price component; absent components count as zero.
    pub fn calculate_total(&self) -> f64 {
        self.plan_price.unwrap_or(0.0)
            + self.project_price.unwrap_or(0.0)
            + self.hosting_yearly_price.unwrap_or(0.0)
            + self.additional_costs.as_ref().map_or(0.0, AdditionalCosts::sum)
    }

    /// Refresh `total_amount`. Runs before every save; a no-op until a plan
    /// price has been entered.
    pub fn recompute_total(&mut self) {
        if self.plan_price.is_some() {
            self.total_amount = Some(self.calculate_total());
        }
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// The editable content of an onboarding (everything except review metadata).
///
/// Also the request body for create and for the generic update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingForm {
    #[serde(default)]
    #[validate(nested)]
    pub personal_details: PersonalDetails,
    #[serde(default)]
    #[validate(nested)]
    pub business_details: BusinessDetails,
    #[serde(default)]
    #[validate(nested)]
    pub plan_details: PlanDetails,
    #[serde(default)]
    #[validate(nested)]
    pub payment_details: PaymentDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

impl OnboardingForm {
    /// Build a fresh draft from a public submission, applying field defaults.
    pub fn new_draft(mut input: OnboardingForm) -> Self {
        if input.personal_details.state.is_none() {
            input.personal_details.state = Some(DEFAULT_STATE.to_string());
        }
        if input.plan_details.access_type.is_none() {
            input.plan_details.access_type = Some(DEFAULT_ACCESS_TYPE.to_string());
        }
        if input.plan_details.custom_pricing.is_none() {
            input.plan_details.custom_pricing = Some(false);
        }
        input.payment_details.total_amount = None;
        input.finalize();
        input
    }

    /// Generic update: merge every section field by field.
    pub fn apply_patch(&mut self, patch: OnboardingForm) {
        self.personal_details.merge(patch.personal_details);
        self.business_details.merge(patch.business_details);
        self.plan_details.merge(patch.plan_details);
        self.payment_details.merge_deep(patch.payment_details);
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
        self.finalize();
    }

    /// Merge one step's payload into the section the step owns.
    pub fn apply_step(&mut self, payload: StepPayload) {
        match payload {
            StepPayload::Personal(p) => self.personal_details.merge(p),
            StepPayload::Business(p) => self.business_details.merge(p),
            StepPayload::Plan(p) => self.plan_details.merge(p),
            StepPayload::Payment(p) => self.payment_details.merge(p),
            StepPayload::Notes(p) => {
                if let Some(notes) = p.notes.filter(|n| !n.is_empty()) {
                    self.notes = Some(notes);
                }
            }
        }
        self.finalize();
    }

    /// Invariants enforced before persistence.
    pub fn finalize(&mut self) {
        self.payment_details.recompute_total();
    }
}

/// Body of step 5.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct NotesStep {
    #[serde(default)]
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

/// A validated step body, tagged with the section it targets.
#[derive(Debug, Clone, PartialEq)]
pub enum StepPayload {
    Personal(PersonalDetails),
    Business(BusinessDetails),
    Plan(PlanDetails),
    Payment(PaymentDetails),
    Notes(NotesStep),
}

impl StepPayload {
    /// Decode and validate a raw step body for the given step number.
    pub fn from_json(step: i16, body: serde_json::Value) -> Result<Self, CoreError> {
        fn decode<T>(body: serde_json::Value) -> Result<T, CoreError>
        where
            T: serde::de::DeserializeOwned + Validate,
        {
            let value: T = serde_json::from_value(body)
                .map_err(|e| CoreError::Validation(format!("Invalid step data: {e}")))?;
            value.validate()?;
            Ok(value)
        }

        match step {
            1 => Ok(StepPayload::Personal(decode(body)?)),
            2 => Ok(StepPayload::Business(decode(body)?)),
            3 => Ok(StepPayload::Plan(decode(body)?)),
            4 => Ok(StepPayload::Payment(decode(body)?)),
            5 => Ok(StepPayload::Notes(decode(body)?)),
            _ => Err(CoreError::Validation("Invalid step number".into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Step tracking
// ---------------------------------------------------------------------------

/// Parse a step path segment, accepting only 1..=5.
pub fn parse_step(raw: &str) -> Result<i16, CoreError> {
    raw.trim()
        .parse::<i16>()
        .ok()
        .filter(|n| (FIRST_STEP..=LAST_STEP).contains(n))
        .ok_or_else(|| CoreError::Validation("Invalid step number".into()))
}

/// Progress markers stored next to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepProgress {
    pub current_step: i16,
    pub completed_steps: Vec<i16>,
}

impl Default for StepProgress {
    fn default() -> Self {
        Self {
            current_step: FIRST_STEP,
            completed_steps: Vec::new(),
        }
    }
}

impl StepProgress {
    /// Record `step` as saved and advance the cursor. Never moves backwards.
    pub fn complete_step(&mut self, step: i16) {
        if !self.completed_steps.contains(&step) {
            self.completed_steps.push(step);
        }
        self.current_step = self.current_step.max(step + 1).min(LAST_STEP);
    }

    /// Required steps not yet completed, in ascending order.
    pub fn missing_required_steps(&self) -> Vec<i16> {
        REQUIRED_STEPS
            .iter()
            .copied()
            .filter(|s| !self.completed_steps.contains(s))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

/// The public may edit only drafts; staff may edit at any status.
pub fn ensure_editable(status: OnboardingStatus, is_staff: bool) -> Result<(), CoreError> {
    if status != OnboardingStatus::Draft && !is_staff {
        return Err(CoreError::Forbidden(
            "Cannot edit submitted onboarding".into(),
        ));
    }
    Ok(())
}

/// `Draft -> Submitted` requires a draft with steps 1-4 completed.
pub fn ensure_submittable(
    status: OnboardingStatus,
    progress: &StepProgress,
) -> Result<(), CoreError> {
    if status != OnboardingStatus::Draft {
        return Err(CoreError::InvalidState(
            "Onboarding has already been submitted".into(),
        ));
    }
    let missing = progress.missing_required_steps();
    if !missing.is_empty() {
        return Err(CoreError::MissingSteps(missing));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn payment_example() -> PaymentDetails {
        serde_json::from_value(json!({
            "planPrice": 100,
            "projectPrice": 200,
            "hostingYearlyPrice": 50,
            "additionalCosts": {
                "constant": 10, "hosting": 5, "domain": 5,
                "storage": 0, "maintenance": 0, "websiteCost": 0
            }
        }))
        .unwrap()
    }

    // -- Pricing --

    #[test]
    fn total_amount_sums_every_component() {
        let mut form = OnboardingForm {
            payment_details: payment_example(),
            ..Default::default()
        };
        form.finalize();
        assert_eq!(form.payment_details.total_amount, Some(370.0));
    }

    #[test]
    fn caller_supplied_total_is_overwritten() {
        let mut payment = payment_example();
        payment.total_amount = Some(1.0);
        let mut form = OnboardingForm::default();
        form.apply_step(StepPayload::Payment(payment));
        assert_eq!(form.payment_details.total_amount, Some(370.0));
    }

    #[test]
    fn total_is_not_computed_without_plan_price() {
        let mut form = OnboardingForm::new_draft(OnboardingForm {
            payment_details: PaymentDetails {
                project_price: Some(200.0),
                total_amount: Some(999.0),
                ..Default::default()
            },
            ..Default::default()
        });
        form.finalize();
        assert_eq!(form.payment_details.total_amount, None);
    }

    #[test]
    fn absent_components_count_as_zero() {
        let payment = PaymentDetails {
            plan_price: Some(500.0),
            ..Default::default()
        };
        assert_eq!(payment.calculate_total(), 500.0);
    }

    // -- Merging --

    #[test]
    fn step_merge_preserves_sibling_fields() {
        let mut form = OnboardingForm::new_draft(OnboardingForm::default());
        form.apply_step(StepPayload::Personal(PersonalDetails {
            name: Some("Kavya".into()),
            ..Default::default()
        }));
        form.apply_step(StepPayload::Personal(PersonalDetails {
            father_name: Some("Ravi".into()),
            ..Default::default()
        }));
        assert_eq!(form.personal_details.name.as_deref(), Some("Kavya"));
        assert_eq!(form.personal_details.father_name.as_deref(), Some("Ravi"));
        assert_eq!(form.personal_details.state.as_deref(), Some(DEFAULT_STATE));
    }

    #[test]
    fn step_four_replaces_additional_costs_but_patch_merges_them() {
        let mut form = OnboardingForm {
            payment_details: payment_example(),
            ..Default::default()
        };
        let mut shallow = form.clone();
        let costs = AdditionalCosts {
            domain: Some(20.0),
            ..Default::default()
        };

        shallow.apply_step(StepPayload::Payment(PaymentDetails {
            additional_costs: Some(costs.clone()),
            ..Default::default()
        }));
        assert_eq!(shallow.payment_details.additional_costs, Some(costs.clone()));
        assert_eq!(shallow.payment_details.total_amount, Some(370.0));

        form.apply_patch(OnboardingForm {
            payment_details: PaymentDetails {
                additional_costs: Some(costs),
                ..Default::default()
            },
            ..Default::default()
        });
        let merged = form.payment_details.additional_costs.as_ref().unwrap();
        assert_eq!(merged.constant, Some(10.0));
        assert_eq!(merged.domain, Some(20.0));
        assert_eq!(form.payment_details.total_amount, Some(385.0));
    }

    #[test]
    fn notes_step_only_replaces_when_non_empty() {
        let mut form = OnboardingForm {
            notes: Some("call after 5pm".into()),
            ..Default::default()
        };
        form.apply_step(StepPayload::Notes(NotesStep { notes: None }));
        assert_eq!(form.notes.as_deref(), Some("call after 5pm"));
        form.apply_step(StepPayload::Notes(NotesStep {
            notes: Some(String::new()),
        }));
        assert_eq!(form.notes.as_deref(), Some("call after 5pm"));
        form.apply_step(StepPayload::Notes(NotesStep {
            notes: Some("prefers email".into()),
        }));
        assert_eq!(form.notes.as_deref(), Some("prefers email"));
    }

    #[test]
    fn new_draft_applies_defaults() {
        let form = OnboardingForm::new_draft(OnboardingForm::default());
        assert_eq!(form.personal_details.state.as_deref(), Some(DEFAULT_STATE));
        assert_eq!(form.plan_details.access_type.as_deref(), Some(DEFAULT_ACCESS_TYPE));
        assert_eq!(form.plan_details.custom_pricing, Some(false));
    }

    // -- Step tracking --

    #[test]
    fn completing_step_two_then_one_never_regresses() {
        let mut progress = StepProgress::default();
        progress.complete_step(2);
        assert_eq!(progress.completed_steps, vec![2]);
        assert_eq!(progress.current_step, 3);

        progress.complete_step(1);
        assert_eq!(progress.completed_steps, vec![2, 1]);
        assert_eq!(progress.current_step, 3);
    }

    #[test]
    fn current_step_caps_at_five() {
        let mut progress = StepProgress::default();
        progress.complete_step(5);
        progress.complete_step(5);
        assert_eq!(progress.current_step, 5);
        assert_eq!(progress.completed_steps, vec![5]);
    }

    #[test]
    fn parse_step_bounds() {
        assert_eq!(parse_step("3").unwrap(), 3);
        assert_matches!(parse_step("0"), Err(CoreError::Validation(_)));
        assert_matches!(parse_step("6"), Err(CoreError::Validation(_)));
        assert_matches!(parse_step("two"), Err(CoreError::Validation(_)));
    }

    // -- Guards --

    #[test]
    fn submit_reports_missing_steps() {
        let progress = StepProgress {
            current_step: 4,
            completed_steps: vec![1, 2, 3],
        };
        assert_matches!(
            ensure_submittable(OnboardingStatus::Draft, &progress),
            Err(CoreError::MissingSteps(ref missing)) if missing == &vec![4]
        );
    }

    #[test]
    fn submit_succeeds_with_required_steps() {
        let progress = StepProgress {
            current_step: 5,
            completed_steps: vec![4, 3, 2, 1],
        };
        assert!(ensure_submittable(OnboardingStatus::Draft, &progress).is_ok());
        assert_matches!(
            ensure_submittable(OnboardingStatus::Submitted, &progress),
            Err(CoreError::InvalidState(_))
        );
    }

    #[test]
    fn only_staff_edit_after_submission() {
        assert!(ensure_editable(OnboardingStatus::Draft, false).is_ok());
        assert_matches!(
            ensure_editable(OnboardingStatus::Submitted, false),
            Err(CoreError::Forbidden(_))
        );
        assert!(ensure_editable(OnboardingStatus::Approved, true).is_ok());
    }

    // -- Decoding --

    #[test]
    fn step_payload_validates_fields() {
        let err = StepPayload::from_json(1, json!({ "phoneNumber1": "12345" })).unwrap_err();
        assert_matches!(err, CoreError::InvalidFields(ref f) if f[0].field == "phoneNumber1");

        let ok = StepPayload::from_json(2, json!({ "businessSize": "Medium" })).unwrap();
        assert_matches!(ok, StepPayload::Business(ref b) if b.business_size == Some(BusinessSize::Medium));
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&OnboardingStatus::UnderReview).unwrap(),
            "\"Under Review\""
        );
        assert_eq!(OnboardingStatus::UnderReview.as_str(), "Under Review");
        let freq: MaintenanceFrequency = serde_json::from_str("\"Half Yearly\"").unwrap();
        assert_eq!(freq, MaintenanceFrequency::HalfYearly);
    }
}
