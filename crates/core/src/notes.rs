//! Append-only staff note logs shared by leads and onboardings.

use serde::{Deserialize, Serialize};

use crate::types::{RecordId, Timestamp};

/// Minimum trimmed length of a lead note.
pub const LEAD_NOTE_MIN: usize = 5;
/// Maximum trimmed length of a lead note.
pub const LEAD_NOTE_MAX: usize = 500;

/// One entry in an admin note log, stored inside a JSONB array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNote {
    pub note: String,
    pub added_by: RecordId,
    pub added_at: Timestamp,
}

impl AdminNote {
    pub fn new(note: String, added_by: RecordId) -> Self {
        Self {
            note,
            added_by,
            added_at: chrono::Utc::now(),
        }
    }
}

/// Minimal admin projection used when resolving weak references for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRef {
    pub id: RecordId,
    pub username: String,
    pub email: String,
}
