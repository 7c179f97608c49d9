use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Length of the hex form of a [`RecordId`].
pub const RECORD_ID_LEN: usize = 24;

/// Primary key shared by every stored entity: 24 lowercase hex characters.
///
/// The first 4 bytes encode the creation second (big-endian), the remaining
/// 8 are random, so ids sort roughly by creation time. Stored as `TEXT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh id stamped with the current time.
    pub fn generate() -> Self {
        let secs = chrono::Utc::now().timestamp() as u32;
        let tail: [u8; 8] = rand::random();
        let mut hex = String::with_capacity(RECORD_ID_LEN);
        for byte in secs.to_be_bytes().iter().chain(tail.iter()) {
            hex.push_str(&format!("{byte:02x}"));
        }
        Self(hex)
    }

    /// Parse a caller-supplied id. Anything other than 24 hex characters is
    /// rejected with a validation error before it can reach storage.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw.len() == RECORD_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(CoreError::Validation(format!("Invalid id format: '{raw}'")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

/// Text codes for enums stored in `TEXT` columns.
///
/// Generates `ALL`, `as_str`, `FromStr` and `TryFrom<String>`. Each code must
/// equal the variant's serde name, since JSON and storage share one spelling.
macro_rules! text_codes {
    ($ty:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $code,)+
                }
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok($ty::$variant),)+
                    other => Err($crate::error::CoreError::Validation(format!(
                        "Unknown {} '{other}'",
                        stringify!($ty)
                    ))),
                }
            }
        }

        impl TryFrom<String> for $ty {
            type Error = $crate::error::CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub(crate) use text_codes;
