//! Field-format rules shared by request DTOs and section structs.
//!
//! Regexes are compiled once and referenced from `#[validate(regex(...))]`
//! attributes. Rules that need lookahead (password strength) are written as
//! plain functions.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

use crate::error::CoreError;

/// Indian mobile number: 10 digits starting with 6-9.
pub static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9]\d{9}$").expect("valid regex"));

/// 15-character GSTIN.
pub static GST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z]{1}[1-9A-Z]{1}Z[0-9A-Z]{1}$").expect("valid regex")
});

/// 6-digit postal code, no leading zero.
pub static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("valid regex"));

pub static SUBDOMAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid regex"));

pub static REPO_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https://(github|gitlab)\.com/.*$").expect("valid regex"));

pub static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid regex"));

/// Minimum admin password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

// ---------------------------------------------------------------------------
// Custom validators
// ---------------------------------------------------------------------------

/// Password must be at least [`MIN_PASSWORD_LENGTH`] characters and contain
/// a lowercase letter, an uppercase letter and a digit.
pub fn password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new("password_length").with_message(
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long").into(),
        ));
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(ValidationError::new("password_strength").with_message(
            "Password must contain at least one lowercase letter, one uppercase letter, and one number"
                .into(),
        ));
    }
    Ok(())
}

/// Reject strings that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Value cannot be empty".into()));
    }
    Ok(())
}

/// Trim a free-text note and check its length (in characters) against bounds.
pub fn note_text(raw: &str, min: usize, max: usize) -> Result<String, CoreError> {
    let note = raw.trim();
    let len = note.chars().count();
    if len < min || len > max {
        return Err(CoreError::Validation(format!(
            "Note must be between {min}-{max} characters"
        )));
    }
    Ok(note.to_string())
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

/// Deserialize a string, trimming surrounding whitespace.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

/// Deserialize an optional string, trimming it. `null` stays `None`.
pub fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()))
}

/// Deserialize an email, trimming and lowercasing it.
pub fn email_normalized<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_lowercase())
}

/// Optional variant of [`email_normalized`].
pub fn email_normalized_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_lowercase()))
}

/// Deserialize a field where an explicit `null` means "clear it".
///
/// Pair with `#[serde(default)]`: an absent key stays `None`, `null` becomes
/// `Some(None)` and a value becomes `Some(Some(v))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
