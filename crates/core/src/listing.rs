//! Pagination, sorting and search helpers shared by every list endpoint.

use serde::Serialize;

use crate::error::CoreError;

/// Default page size when the caller omits `limit`.
pub const DEFAULT_LIMIT: i64 = 10;
/// Upper bound on `limit`.
pub const MAX_LIMIT: i64 = 100;
/// Upper bound on `page`, keeping `offset()` within `i64`.
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// A clamped `page` / `limit` pair (1-based page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1).min(MAX_PAGE);
        let limit = limit
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination block returned alongside every list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl PageInfo {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let pages = if total <= 0 {
            0
        } else {
            (total + request.limit - 1) / request.limit
        };
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages,
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything other than `asc` (case-insensitive) sorts descending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A resolved `ORDER BY` target: a whitelisted SQL expression plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: &'static str,
    pub order: SortOrder,
}

impl Default for SortSpec {
    /// Newest first.
    fn default() -> Self {
        Self {
            column: "created_at",
            order: SortOrder::Desc,
        }
    }
}

impl SortSpec {
    /// Render as an `ORDER BY` clause body. `id` breaks ties so pages are stable.
    pub fn to_sql(&self) -> String {
        format!("{} {}, id {}", self.column, self.order.as_sql(), self.order.as_sql())
    }
}

/// Resolve a `sortBy` query value against a per-entity whitelist of
/// `(api field, sql expression)` pairs. Omitted means `createdAt`.
pub fn resolve_sort(
    sort_by: Option<&str>,
    order: Option<&str>,
    allowed: &[(&str, &'static str)],
) -> Result<SortSpec, CoreError> {
    let field = sort_by.filter(|s| !s.is_empty()).unwrap_or("createdAt");
    let column = allowed
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, column)| *column)
        .ok_or_else(|| CoreError::Validation(format!("Cannot sort by '{field}'")))?;
    Ok(SortSpec {
        column,
        order: SortOrder::parse(order),
    })
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Build an `ILIKE` pattern matching `term` as a literal substring.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Trim a search term, treating blank input as absent.
pub fn normalize_search(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const FIELDS: &[(&str, &str)] = &[("createdAt", "created_at"), ("name", "name")];

    #[test]
    fn second_page_of_twenty_five() {
        let req = PageRequest::new(Some(2), Some(10));
        assert_eq!(req.offset(), 10);
        let info = PageInfo::new(req, 25);
        assert_eq!(info.pages, 3);
        assert_eq!(info.total, 25);
    }

    #[test]
    fn page_request_clamps_input() {
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(-3), Some(500)).limit, MAX_LIMIT);

        let huge = PageRequest::new(Some(i64::MAX), Some(MAX_LIMIT));
        assert_eq!(huge.page, MAX_PAGE);
        assert!(huge.offset() > 0);
        assert_eq!(PageRequest::new(Some(i64::MAX), Some(10)).offset(), (MAX_PAGE - 1) * 10);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        assert_eq!(PageInfo::new(PageRequest::default(), 0).pages, 0);
    }

    #[test]
    fn sort_defaults_to_created_at_desc() {
        let spec = resolve_sort(None, None, FIELDS).unwrap();
        assert_eq!(spec.column, "created_at");
        assert_eq!(spec.order, SortOrder::Desc);
        assert_eq!(spec.to_sql(), "created_at DESC, id DESC");
    }

    #[test]
    fn sort_rejects_unknown_fields() {
        assert_matches!(
            resolve_sort(Some("password_hash"), None, FIELDS),
            Err(CoreError::Validation(_))
        );
        let spec = resolve_sort(Some("name"), Some("ASC"), FIELDS).unwrap();
        assert_eq!(spec.order, SortOrder::Asc);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(normalize_search(Some("   ")), None);
        assert_eq!(normalize_search(Some(" ann ")), Some("%ann%".to_string()));
    }
}
