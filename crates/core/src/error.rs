use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

/// A single field-level validation failure, reported to clients in the
/// `errors` array of the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted camelCase path of the offending field (e.g. `billing.billingCycle`).
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed")]
    InvalidFields(Vec<FieldError>),

    #[error("{field} already exists")]
    Duplicate { field: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Missing required steps: {0:?}")]
    MissingSteps(Vec<i16>),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] keyed by any displayable id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        CoreError::InvalidFields(flatten_validation_errors(&errors))
    }
}

/// Flatten nested `validator` output into a sorted list of [`FieldError`]s.
pub fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let name = camel_case(&field.to_string());
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}.{name}")
        };
        match kind {
            ValidationErrorsKind::Field(items) => {
                for item in items {
                    let message = item
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {path}"));
                    out.push(FieldError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    collect(inner, &format!("{path}[{idx}]"), out);
                }
            }
        }
    }
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for ch in snake.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.push(ch.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Inner {
        #[validate(length(min = 3, message = "too short"))]
        street_name: String,
    }

    #[derive(Validate)]
    struct Outer {
        #[validate(range(min = 0.0, message = "must be positive"))]
        plan_price: f64,
        #[validate(nested)]
        business_address: Inner,
    }

    #[test]
    fn nested_errors_use_dotted_camel_case_paths() {
        let value = Outer {
            plan_price: -1.0,
            business_address: Inner {
                street_name: "x".into(),
            },
        };
        let errors = value.validate().unwrap_err();
        let flat = flatten_validation_errors(&errors);
        assert_eq!(
            flat,
            vec![
                FieldError::new("businessAddress.streetName", "too short"),
                FieldError::new("planPrice", "must be positive"),
            ]
        );
    }

    #[test]
    fn camel_case_conversion() {
        assert_eq!(camel_case("phone_number1"), "phoneNumber1");
        assert_eq!(camel_case("email"), "email");
    }
}
