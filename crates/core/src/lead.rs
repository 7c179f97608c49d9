//! Lead intake vocabularies: contact messages and demo requests.
//!
//! Each enum is stored as its text code; the allowed values are pinned by
//! CHECK constraints in `20261019000002_create_leads.sql`.

use serde::{Deserialize, Serialize};

use crate::types::text_codes;

// ---------------------------------------------------------------------------
// Contact messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    New,
    InProgress,
    Resolved,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactResponse {
    #[default]
    Pending,
    Satisfied,
    NotSatisfied,
}

// ---------------------------------------------------------------------------
// Demo requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoStatus {
    #[default]
    Pending,
    DemoScheduled,
    DemoCompleted,
    DemoAccepted,
    OnProceed,
    Converted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoResponse {
    #[default]
    Pending,
    Okay,
    NotOkay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DemoBusinessType {
    RetailStore,
    Restaurant,
    ServiceBusiness,
    #[serde(rename = "e-commerce")]
    ECommerce,
    Manufacturing,
    Healthcare,
    Education,
    RealEstate,
    Construction,
    Consulting,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrentSoftware {
    #[default]
    None,
    Excel,
    Tally,
    Quickbooks,
    Zoho,
    Other,
}

text_codes!(ContactStatus {
    New => "new",
    InProgress => "in_progress",
    Resolved => "resolved",
    Closed => "closed",
});
text_codes!(ContactPriority {
    Low => "low",
    Medium => "medium",
    High => "high",
    Urgent => "urgent",
});
text_codes!(ContactResponse {
    Pending => "pending",
    Satisfied => "satisfied",
    NotSatisfied => "not_satisfied",
});
text_codes!(DemoStatus {
    Pending => "pending",
    DemoScheduled => "demo_scheduled",
    DemoCompleted => "demo_completed",
    DemoAccepted => "demo_accepted",
    OnProceed => "on_proceed",
    Converted => "converted",
    Rejected => "rejected",
});
text_codes!(DemoPriority {
    Low => "low",
    Medium => "medium",
    High => "high",
});
text_codes!(DemoResponse {
    Pending => "pending",
    Okay => "okay",
    NotOkay => "not_okay",
});
text_codes!(DemoBusinessType {
    RetailStore => "retail-store",
    Restaurant => "restaurant",
    ServiceBusiness => "service-business",
    ECommerce => "e-commerce",
    Manufacturing => "manufacturing",
    Healthcare => "healthcare",
    Education => "education",
    RealEstate => "real-estate",
    Construction => "construction",
    Consulting => "consulting",
    Other => "other",
});
text_codes!(CurrentSoftware {
    None => "none",
    Excel => "excel",
    Tally => "tally",
    Quickbooks => "quickbooks",
    Zoho => "zoho",
    Other => "other",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_type_uses_kebab_case() {
        let parsed: DemoBusinessType = serde_json::from_str("\"e-commerce\"").unwrap();
        assert_eq!(parsed, DemoBusinessType::ECommerce);
        assert_eq!(
            serde_json::to_string(&DemoBusinessType::RetailStore).unwrap(),
            "\"retail-store\""
        );
    }

    #[test]
    fn defaults_match_intake_workflow() {
        assert_eq!(ContactStatus::default(), ContactStatus::New);
        assert_eq!(ContactPriority::default(), ContactPriority::Medium);
        assert_eq!(DemoStatus::default(), DemoStatus::Pending);
        assert_eq!(CurrentSoftware::default(), CurrentSoftware::None);
    }

    #[test]
    fn text_codes_match_serde_names() {
        for ty in DemoBusinessType::ALL {
            let json = serde_json::to_string(ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
            assert_eq!(ty.as_str().parse::<DemoBusinessType>().unwrap(), *ty);
        }
        for status in DemoStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        for status in ContactStatus::ALL {
            assert_eq!(ContactStatus::try_from(status.as_str().to_string()).unwrap(), *status);
        }
        assert!("archived".parse::<ContactStatus>().is_err());
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<ContactStatus>("\"archived\"").is_err());
        let s: DemoStatus = serde_json::from_str("\"demo_scheduled\"").unwrap();
        assert_eq!(s, DemoStatus::DemoScheduled);
    }
}
