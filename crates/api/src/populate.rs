//! Resolve weak admin references for display.
//!
//! Records store admin ids (`assignedTo`, note authors, reviewers). Before a
//! record leaves the API those ids are replaced by `{id, username, email}`,
//! or `null` when the admin no longer exists. Every response issues exactly
//! one batched admin lookup regardless of how many records it carries.

use std::collections::HashMap;

use bizdesk_core::notes::AdminRef;
use bizdesk_core::types::RecordId;
use bizdesk_db::models::client::Client;
use bizdesk_db::models::contact::ContactMessage;
use bizdesk_db::models::demo::DemoRequest;
use bizdesk_db::models::onboarding::Onboarding;
use bizdesk_db::repositories::AdminRepo;
use bizdesk_db::DbPool;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// A record type carrying admin references.
pub trait AdminLinks: Serialize {
    /// Every admin id referenced by this record.
    fn admin_ids(&self) -> Vec<RecordId>;

    /// Replace the references inside the serialised record.
    fn expand(value: &mut Value, directory: &AdminDirectory);
}

/// Admins loaded for one response, keyed by id.
#[derive(Debug, Default)]
pub struct AdminDirectory {
    admins: HashMap<RecordId, AdminRef>,
}

impl AdminDirectory {
    pub async fn load(pool: &DbPool, mut ids: Vec<RecordId>) -> AppResult<Self> {
        ids.sort();
        ids.dedup();
        if ids.is_empty() {
            return Ok(Self::default());
        }
        let admins = AdminRepo::find_refs(pool, &ids)
            .await?
            .into_iter()
            .map(|a| (a.id.clone(), a))
            .collect();
        Ok(Self { admins })
    }

    /// Swap the id string at `slot` for the admin object, or `null`.
    fn resolve(&self, slot: &mut Value) {
        let resolved = slot
            .as_str()
            .and_then(|raw| RecordId::parse(raw).ok())
            .and_then(|id| self.admins.get(&id))
            .map(|admin| serde_json::json!(admin))
            .unwrap_or(Value::Null);
        *slot = resolved;
    }

    fn resolve_field(&self, object: &mut Value, field: &str) {
        if let Some(slot) = object.get_mut(field) {
            self.resolve(slot);
        }
    }

    /// Resolve `field` on every element of the array at `path`.
    fn resolve_each(&self, object: &mut Value, path: &[&str], field: &str) {
        let mut cursor = Some(object);
        for key in path {
            cursor = cursor.and_then(|v| v.get_mut(*key));
        }
        if let Some(Value::Array(items)) = cursor {
            for item in items {
                self.resolve_field(item, field);
            }
        }
    }
}

fn to_value<T: Serialize>(record: &T) -> AppResult<Value> {
    serde_json::to_value(record)
        .map_err(|e| AppError::InternalError(format!("Serialization failed: {e}")))
}

/// Serialise one record with its admin references resolved.
pub async fn populate_one<T: AdminLinks>(pool: &DbPool, record: &T) -> AppResult<Value> {
    let directory = AdminDirectory::load(pool, record.admin_ids()).await?;
    let mut value = to_value(record)?;
    T::expand(&mut value, &directory);
    Ok(value)
}

/// Serialise a page of records with one shared admin lookup.
pub async fn populate_many<T: AdminLinks>(pool: &DbPool, records: &[T]) -> AppResult<Vec<Value>> {
    let ids = records.iter().flat_map(AdminLinks::admin_ids).collect();
    let directory = AdminDirectory::load(pool, ids).await?;
    records
        .iter()
        .map(|record| {
            let mut value = to_value(record)?;
            T::expand(&mut value, &directory);
            Ok(value)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

impl AdminLinks for ContactMessage {
    fn admin_ids(&self) -> Vec<RecordId> {
        self.assigned_to
            .iter()
            .cloned()
            .chain(self.admin_notes.0.iter().map(|n| n.added_by.clone()))
            .collect()
    }

    fn expand(value: &mut Value, directory: &AdminDirectory) {
        directory.resolve_field(value, "assignedTo");
        directory.resolve_each(value, &["adminNotes"], "addedBy");
    }
}

impl AdminLinks for DemoRequest {
    fn admin_ids(&self) -> Vec<RecordId> {
        self.assigned_to
            .iter()
            .cloned()
            .chain(self.admin_notes.0.iter().map(|n| n.added_by.clone()))
            .collect()
    }

    fn expand(value: &mut Value, directory: &AdminDirectory) {
        directory.resolve_field(value, "assignedTo");
        directory.resolve_each(value, &["adminNotes"], "addedBy");
    }
}

impl AdminLinks for Client {
    fn admin_ids(&self) -> Vec<RecordId> {
        let issues = self
            .service_support
            .0
            .ongoing_issues
            .iter()
            .filter_map(|i| i.assigned_to.clone());
        let notes = self
            .attachments_notes
            .0
            .internal_notes
            .iter()
            .map(|n| n.added_by.clone());
        self.assigned_sales_rep
            .iter()
            .cloned()
            .chain(issues)
            .chain(notes)
            .collect()
    }

    fn expand(value: &mut Value, directory: &AdminDirectory) {
        directory.resolve_field(value, "assignedSalesRep");
        directory.resolve_each(value, &["serviceSupport", "ongoingIssues"], "assignedTo");
        directory.resolve_each(value, &["attachmentsNotes", "internalNotes"], "addedBy");
    }
}

impl AdminLinks for Onboarding {
    fn admin_ids(&self) -> Vec<RecordId> {
        self.reviewed_by
            .iter()
            .cloned()
            .chain(self.admin_notes.0.iter().map(|n| n.added_by.clone()))
            .collect()
    }

    fn expand(value: &mut Value, directory: &AdminDirectory) {
        directory.resolve_field(value, "reviewedBy");
        directory.resolve_each(value, &["adminNotes"], "addedBy");
    }
}

/// Anonymous view of an onboarding: admin notes dropped, ids left raw.
pub fn light_onboarding(record: &Onboarding) -> AppResult<Value> {
    let mut value = to_value(record)?;
    if let Value::Object(map) = &mut value {
        map.remove("adminNotes");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn directory_with(admin: &AdminRef) -> AdminDirectory {
        AdminDirectory {
            admins: HashMap::from([(admin.id.clone(), admin.clone())]),
        }
    }

    #[test]
    fn known_ids_expand_and_unknown_become_null() {
        let admin = AdminRef {
            id: RecordId::generate(),
            username: "ops".into(),
            email: "ops@example.com".into(),
        };
        let directory = directory_with(&admin);
        let mut value = json!({
            "assignedTo": admin.id.to_string(),
            "adminNotes": [
                { "note": "called back", "addedBy": admin.id.to_string() },
                { "note": "left voicemail", "addedBy": RecordId::generate().to_string() }
            ]
        });

        ContactMessage::expand(&mut value, &directory);

        assert_eq!(value["assignedTo"]["username"], "ops");
        assert_eq!(value["adminNotes"][0]["addedBy"]["email"], "ops@example.com");
        assert!(value["adminNotes"][1]["addedBy"].is_null());
    }

    #[test]
    fn nested_client_logs_expand() {
        let admin = AdminRef {
            id: RecordId::generate(),
            username: "rep".into(),
            email: "rep@example.com".into(),
        };
        let directory = directory_with(&admin);
        let mut value = json!({
            "assignedSalesRep": null,
            "serviceSupport": { "ongoingIssues": [{ "issue": "DNS down", "assignedTo": admin.id.to_string() }] },
            "attachmentsNotes": { "internalNotes": [{ "note": "VIP", "addedBy": admin.id.to_string() }] }
        });

        Client::expand(&mut value, &directory);

        assert!(value["assignedSalesRep"].is_null());
        assert_eq!(value["serviceSupport"]["ongoingIssues"][0]["assignedTo"]["username"], "rep");
        assert_eq!(value["attachmentsNotes"]["internalNotes"][0]["addedBy"]["username"], "rep");
    }
}
