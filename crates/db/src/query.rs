//! Dynamic `WHERE` clause builder shared by the list queries.
//!
//! Placeholders are numbered in push order, so a clause must be fully built
//! before its [`WhereClause::next_param`] is used for `LIMIT` / `OFFSET`.

use bizdesk_core::types::Timestamp;
use serde::Serialize;
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;

/// Typed bind value for dynamically-built queries.
#[derive(Debug, Clone)]
enum BindValue {
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct WhereClause {
    conditions: Vec<String>,
    values: Vec<BindValue>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next positional parameter.
    pub fn next_param(&self) -> usize {
        self.values.len() + 1
    }

    fn push(&mut self, template: impl FnOnce(usize) -> String, value: BindValue) {
        let idx = self.next_param();
        self.conditions.push(template(idx));
        self.values.push(value);
    }

    /// `expr = $n` against a text value.
    pub fn eq_text(&mut self, expr: &str, value: Option<impl Into<String>>) -> &mut Self {
        if let Some(v) = value {
            self.push(|i| format!("{expr} = ${i}"), BindValue::Text(v.into()));
        }
        self
    }

    /// `expr::text = $n` against the serde name of an enum value. Works for
    /// both checked text columns and JSONB string fields.
    pub fn eq_enum<T: Serialize>(&mut self, expr: &str, value: Option<T>) -> &mut Self {
        if let Some(name) = value.as_ref().and_then(wire_name) {
            self.push(|i| format!("({expr})::text = ${i}"), BindValue::Text(name));
        }
        self
    }

    pub fn eq_bool(&mut self, expr: &str, value: Option<bool>) -> &mut Self {
        if let Some(v) = value {
            self.push(|i| format!("{expr} = ${i}"), BindValue::Bool(v));
        }
        self
    }

    /// `expr >= $n`.
    pub fn since(&mut self, expr: &str, value: Option<Timestamp>) -> &mut Self {
        if let Some(v) = value {
            self.push(|i| format!("{expr} >= ${i}"), BindValue::Timestamp(v));
        }
        self
    }

    /// `expr <= $n`.
    pub fn until(&mut self, expr: &str, value: Option<Timestamp>) -> &mut Self {
        if let Some(v) = value {
            self.push(|i| format!("{expr} <= ${i}"), BindValue::Timestamp(v));
        }
        self
    }

    /// Case-insensitive match of one pre-built `ILIKE` pattern against any of
    /// `exprs`. The pattern is bound once and reused.
    pub fn search(&mut self, exprs: &[&str], pattern: Option<&str>) -> &mut Self {
        if let Some(p) = pattern {
            self.push(
                |i| {
                    let parts: Vec<String> =
                        exprs.iter().map(|e| format!("{e} ILIKE ${i}")).collect();
                    format!("({})", parts.join(" OR "))
                },
                BindValue::Text(p.to_string()),
            );
        }
        self
    }

    /// Render as `WHERE ...`, or an empty string when no filter applies.
    pub fn sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn bind_as<'q, O>(
        &'q self,
        mut q: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for val in &self.values {
            q = match val {
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Bool(v) => q.bind(*v),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }

    pub fn bind_scalar<'q, O>(
        &'q self,
        mut q: QueryScalar<'q, Postgres, O, PgArguments>,
    ) -> QueryScalar<'q, Postgres, O, PgArguments> {
        for val in &self.values {
            q = match val {
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Bool(v) => q.bind(*v),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }
}

/// The serialized name of a unit enum variant (`"in_progress"`, `"Under Review"`).
pub(crate) fn wire_name<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdesk_core::lead::ContactStatus;
    use bizdesk_core::onboarding::OnboardingStatus;

    #[test]
    fn placeholders_follow_push_order() {
        let mut w = WhereClause::new();
        w.eq_enum("status", Some(ContactStatus::InProgress))
            .eq_bool("issue_solved", None)
            .eq_bool("issue_solved", Some(true))
            .search(&["name", "email"], Some("%ann%"));
        assert_eq!(
            w.sql(),
            "WHERE (status)::text = $1 AND issue_solved = $2 AND (name ILIKE $3 OR email ILIKE $3)"
        );
        assert_eq!(w.next_param(), 4);
    }

    #[test]
    fn empty_clause_renders_nothing() {
        let w = WhereClause::new();
        assert_eq!(w.sql(), "");
        assert_eq!(w.next_param(), 1);
    }

    #[test]
    fn wire_names_follow_serde() {
        assert_eq!(wire_name(&OnboardingStatus::UnderReview).as_deref(), Some("Under Review"));
        assert_eq!(wire_name(&ContactStatus::InProgress).as_deref(), Some("in_progress"));
    }
}
