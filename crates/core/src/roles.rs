//! Staff roles.
//!
//! Stored as text; `20261019000001_create_admins.sql` pins the allowed codes.

use serde::{Deserialize, Serialize};

use crate::types::text_codes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    #[default]
    Admin,
    SuperAdmin,
}

text_codes!(AdminRole {
    Admin => "admin",
    SuperAdmin => "super_admin",
});

impl AdminRole {
    pub fn is_super_admin(self) -> bool {
        self == AdminRole::SuperAdmin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&AdminRole::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
        let role: AdminRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, AdminRole::Admin);
        assert!(serde_json::from_str::<AdminRole>("\"owner\"").is_err());
        assert_eq!("super_admin".parse::<AdminRole>().unwrap(), AdminRole::SuperAdmin);
        assert!(AdminRole::try_from("owner".to_string()).is_err());
    }
}
