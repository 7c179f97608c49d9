//! Query-string types for the list endpoints.
//!
//! Handlers extract [`ListParams`] and a per-entity filter struct from the
//! same query string; the two combine into the repository filter, resolving
//! `sortBy` against the repository's whitelist and turning `search` into a
//! literal `ILIKE` pattern.

use bizdesk_core::client::{BillingCycle, ClientBusinessType, ClientStatus, DnsStatus, ServiceLevel};
use bizdesk_core::error::CoreError;
use bizdesk_core::lead::{
    ContactPriority, ContactResponse, ContactStatus, DemoBusinessType, DemoPriority,
    DemoResponse, DemoStatus,
};
use bizdesk_core::listing::{normalize_search, resolve_sort, PageRequest};
use bizdesk_core::onboarding::OnboardingStatus;
use bizdesk_core::roles::AdminRole;
use bizdesk_core::types::{RecordId, Timestamp};
use bizdesk_db::models::admin::AdminFilter;
use bizdesk_db::models::client::ClientFilter;
use bizdesk_db::models::contact::ContactFilter;
use bizdesk_db::models::dashboard::DateRange;
use bizdesk_db::models::demo::DemoFilter;
use bizdesk_db::models::onboarding::OnboardingFilter;
use bizdesk_db::repositories::{
    admin_repo, client_repo, contact_repo, demo_repo, onboarding_repo,
};
use serde::Deserialize;

/// `?page=&limit=&sortBy=&order=&search=` shared by every list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    #[serde(alias = "sortOrder")]
    pub order: Option<String>,
    pub search: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    pub fn search(&self) -> Option<String> {
        normalize_search(self.search.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminListParams {
    pub role: Option<AdminRole>,
    pub is_active: Option<bool>,
}

impl AdminListParams {
    pub fn into_filter(self, list: &ListParams) -> Result<AdminFilter, CoreError> {
        Ok(AdminFilter {
            sort: resolve_sort(
                list.sort_by.as_deref(),
                list.order.as_deref(),
                admin_repo::SORT_FIELDS,
            )?,
            page: list.page(),
            search: list.search(),
            role: self.role,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListParams {
    pub status: Option<ContactStatus>,
    pub priority: Option<ContactPriority>,
    pub assigned_to: Option<RecordId>,
    pub customer_response: Option<ContactResponse>,
    pub issue_solved: Option<bool>,
}

impl ContactListParams {
    pub fn into_filter(self, list: &ListParams) -> Result<ContactFilter, CoreError> {
        Ok(ContactFilter {
            sort: resolve_sort(
                list.sort_by.as_deref(),
                list.order.as_deref(),
                contact_repo::SORT_FIELDS,
            )?,
            page: list.page(),
            search: list.search(),
            status: self.status,
            priority: self.priority,
            assigned_to: self.assigned_to,
            customer_response: self.customer_response,
            issue_solved: self.issue_solved,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoListParams {
    pub status: Option<DemoStatus>,
    pub business_type: Option<DemoBusinessType>,
    pub assigned_to: Option<RecordId>,
    pub customer_response: Option<DemoResponse>,
    pub priority: Option<DemoPriority>,
}

impl DemoListParams {
    pub fn into_filter(self, list: &ListParams) -> Result<DemoFilter, CoreError> {
        Ok(DemoFilter {
            sort: resolve_sort(
                list.sort_by.as_deref(),
                list.order.as_deref(),
                demo_repo::SORT_FIELDS,
            )?,
            page: list.page(),
            search: list.search(),
            status: self.status,
            business_type: self.business_type,
            assigned_to: self.assigned_to,
            customer_response: self.customer_response,
            priority: self.priority,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientListParams {
    pub status: Option<ClientStatus>,
    pub business_type: Option<ClientBusinessType>,
    pub service_level: Option<ServiceLevel>,
    pub dns_status: Option<DnsStatus>,
    pub billing_cycle: Option<BillingCycle>,
    pub assigned_sales_rep: Option<RecordId>,
}

impl ClientListParams {
    pub fn into_filter(self, list: &ListParams) -> Result<ClientFilter, CoreError> {
        Ok(ClientFilter {
            sort: resolve_sort(
                list.sort_by.as_deref(),
                list.order.as_deref(),
                client_repo::SORT_FIELDS,
            )?,
            page: list.page(),
            search: list.search(),
            status: self.status,
            business_type: self.business_type,
            service_level: self.service_level,
            dns_status: self.dns_status,
            billing_cycle: self.billing_cycle,
            assigned_sales_rep: self.assigned_sales_rep,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingListParams {
    pub status: Option<OnboardingStatus>,
}

impl OnboardingListParams {
    pub fn into_filter(self, list: &ListParams) -> Result<OnboardingFilter, CoreError> {
        Ok(OnboardingFilter {
            sort: resolve_sort(
                list.sort_by.as_deref(),
                list.order.as_deref(),
                onboarding_repo::SORT_FIELDS,
            )?,
            page: list.page(),
            search: list.search(),
            status: self.status,
        })
    }
}

/// `?startDate=&endDate=` for the dashboards. The window applies only when
/// both ends are given.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeParams {
    #[serde(default, deserialize_with = "flexible_date")]
    pub start_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub end_date: Option<Timestamp>,
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
fn flexible_date<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&chrono::Utc)));
    }
    chrono::NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map(|d| Some(d.and_time(chrono::NaiveTime::MIN).and_utc()))
        .map_err(|_| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

impl DateRangeParams {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// `?permanent=true` on client delete.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub permanent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<T: serde::de::DeserializeOwned>(qs: &str) -> T {
        serde_urlencoded::from_str(qs).expect("query should parse")
    }

    #[test]
    fn dates_accept_plain_days_and_timestamps() {
        let p: DateRangeParams = parse("startDate=2026-01-01&endDate=2026-01-31T12:00:00Z");
        assert_eq!(p.start_date.unwrap().to_rfc3339(), "2026-01-01T00:00:00+00:00");
        assert!(p.range().end.is_some());
    }

    #[test]
    fn single_bound_disables_the_window() {
        let p: DateRangeParams = parse("startDate=2026-01-01");
        assert!(p.range().start.is_none());
    }

    #[test]
    fn list_params_build_a_filter() {
        let list: ListParams = parse("page=2&limit=10&sortBy=name&sortOrder=asc&search=ann");
        let params: ContactListParams = parse("status=in_progress&issueSolved=false");
        let filter = params.into_filter(&list).unwrap();
        assert_eq!(filter.page.offset(), 10);
        assert_eq!(filter.sort.column, "name");
        assert_eq!(filter.search.as_deref(), Some("%ann%"));
        assert_eq!(filter.status, Some(ContactStatus::InProgress));
        assert_eq!(filter.issue_solved, Some(false));
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        let list: ListParams = parse("sortBy=password_hash");
        assert!(OnboardingListParams::default().into_filter(&list).is_err());
    }
}
